//! Reference data - categories and banks
//!
//! Server-owned reference lists, fetched once per workflow entry and then
//! treated as read-only. The reconciler never refreshes these itself;
//! callers reload by calling [`ReferenceData::load`] again.

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{BankAccount, Category};
use crate::ports::PaymentsApi;

/// Snapshot of the category and bank reference lists
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    categories: Vec<Category>,
    banks: Vec<BankAccount>,
}

impl ReferenceData {
    /// Fetch both reference lists from the API
    pub async fn load(api: &Arc<dyn PaymentsApi>) -> Result<Self> {
        let categories = api.list_categories().await?;
        let banks = api.list_banks().await?;
        Ok(Self { categories, banks })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn banks(&self) -> &[BankAccount] {
        &self.banks
    }

    /// Banks that can be offered as statement import sources: active,
    /// with a slug that maps to a known statement dialect.
    pub fn importable_banks(&self) -> Vec<&BankAccount> {
        self.banks.iter().filter(|b| b.supports_import()).collect()
    }

    /// Resolve a bank by id or slug, as the CLI accepts either
    pub fn find_bank(&self, id_or_slug: &str) -> Option<&BankAccount> {
        self.banks
            .iter()
            .find(|b| b.id == id_or_slug || b.slug == id_or_slug)
    }

    /// Split out the owned lists for handing to a reconciler
    pub fn into_parts(self) -> (Vec<Category>, Vec<BankAccount>) {
        (self.categories, self.banks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockPaymentsApi;

    fn bank(id: &str, slug: &str, is_active: bool) -> BankAccount {
        BankAccount {
            id: id.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            color_hex: None,
            logo_url: None,
            is_active,
        }
    }

    #[tokio::test]
    async fn test_importable_banks_filters_by_dialect_and_active() {
        let mock = MockPaymentsApi::new();
        mock.set_banks(vec![
            bank("b1", "nubank", true),
            bank("b2", "itau", true),
            bank("b3", "bradesco", true),
            bank("b4", "nubank", false),
        ]);
        let api: Arc<dyn PaymentsApi> = Arc::new(mock);

        let reference = ReferenceData::load(&api).await.unwrap();
        let importable: Vec<&str> = reference
            .importable_banks()
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(importable, vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_find_bank_by_id_or_slug() {
        let mock = MockPaymentsApi::new();
        mock.set_banks(vec![bank("b1", "nubank", true)]);
        let api: Arc<dyn PaymentsApi> = Arc::new(mock);

        let reference = ReferenceData::load(&api).await.unwrap();
        assert!(reference.find_bank("b1").is_some());
        assert!(reference.find_bank("nubank").is_some());
        assert!(reference.find_bank("itau").is_none());
    }
}
