//! Statement import reconciler
//!
//! Orchestrates one import workflow: upload a statement, curate the
//! candidate rows the server extracted, assign categories, and submit the
//! selected subset as payment records. All state is local to the struct;
//! nothing is persisted, and a new import replaces everything.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    BankAccount, CandidateCategory, Category, ImportCandidate, PaymentCreate, PaymentMethod,
    StatementDialect,
};
use crate::ports::{PaymentsApi, StatementFile};

/// Outcome of a successful import call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows extracted from the statement
    pub total: usize,
    /// Rows the server flagged as probable duplicates
    pub duplicates: usize,
}

/// Local reconcile state over a remote payments API.
///
/// Reference lists (categories, banks) are loaded once per workflow entry
/// and are read-only here; see [`crate::services::ReferenceData`].
pub struct StatementReconciler {
    api: Arc<dyn PaymentsApi>,
    categories: Vec<Category>,
    banks: Vec<BankAccount>,

    file: Option<StatementFile>,
    bank_id: String,
    payment_method: PaymentMethod,
    candidates: Vec<ImportCandidate>,
    selection: BTreeSet<usize>,
    importing: bool,
    saving: bool,
}

impl StatementReconciler {
    pub fn new(
        api: Arc<dyn PaymentsApi>,
        categories: Vec<Category>,
        banks: Vec<BankAccount>,
    ) -> Self {
        Self {
            api,
            categories,
            banks,
            file: None,
            bank_id: String::new(),
            payment_method: PaymentMethod::default(),
            candidates: Vec::new(),
            selection: BTreeSet::new(),
            importing: false,
            saving: false,
        }
    }

    // State mutators -------------------------------------------------------

    pub fn set_file(&mut self, file: StatementFile) {
        self.file = Some(file);
    }

    pub fn set_bank(&mut self, bank_id: impl Into<String>) {
        self.bank_id = bank_id.into();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Assign a category to one candidate by id.
    ///
    /// Unknown category ids and out-of-range indices are silent no-ops:
    /// they can only come from a stale reference list, and this is a
    /// UI-level assignment, not a validated transition. Selection is
    /// unaffected.
    pub fn set_category(&mut self, index: usize, category_id: &str) {
        let Some(category) = self.categories.iter().find(|c| c.id == category_id) else {
            return;
        };
        if let Some(candidate) = self.candidates.get_mut(index) {
            candidate.category = Some(CandidateCategory::from(category));
        }
    }

    /// Toggle one candidate index in or out of the selection
    pub fn toggle_selection(&mut self, index: usize) {
        if !self.selection.remove(&index) {
            self.selection.insert(index);
        }
    }

    /// Replace the selection wholesale. No validation here; submission
    /// re-projects against the current candidate list.
    pub fn replace_selection(&mut self, selection: BTreeSet<usize>) {
        self.selection = selection;
    }

    // Async operations -----------------------------------------------------

    /// Upload the chosen file and replace the candidate list with the
    /// server's parsed rows.
    ///
    /// The selection is reset to exactly the non-duplicate rows. On
    /// failure the previous candidates and selection are left untouched.
    pub async fn import(&mut self) -> Result<ImportSummary> {
        let file = match (&self.file, self.bank_id.is_empty()) {
            (Some(file), false) => file.clone(),
            _ => return Err(Error::validation("Select a bank and a file.")),
        };

        let dialect = self
            .banks
            .iter()
            .find(|b| b.id == self.bank_id)
            .map(|b| StatementDialect::from_slug(&b.slug))
            .unwrap_or(StatementDialect::Nubank);

        self.importing = true;
        let result = self.api.import_statement(&file, dialect).await;
        self.importing = false;

        let candidates = result?;

        self.selection = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.already_exists)
            .map(|(i, _)| i)
            .collect();
        let summary = ImportSummary {
            total: candidates.len(),
            duplicates: candidates.len() - self.selection.len(),
        };
        self.candidates = candidates;

        Ok(summary)
    }

    /// Submit the selected candidates as payment records.
    ///
    /// Preconditions, checked in order before any network call: a
    /// non-empty candidate list, a category on every candidate (selected
    /// or not - partial categorization is rejected outright), and a
    /// selected bank. On success all workflow state is cleared; on
    /// failure everything is left as it was for a full resubmission.
    pub async fn submit(&mut self) -> Result<usize> {
        if self.candidates.is_empty() {
            return Err(Error::validation("No imported payments to save."));
        }
        if self.candidates.iter().any(|c| !c.is_categorized()) {
            return Err(Error::validation(
                "Select a category for every imported payment.",
            ));
        }
        if self.bank_id.is_empty() {
            return Err(Error::validation("No bank selected."));
        }

        let records: Vec<PaymentCreate> = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| self.selection.contains(i))
            .filter_map(|(_, c)| {
                PaymentCreate::from_candidate(c, &self.bank_id, self.payment_method)
            })
            .collect();

        self.saving = true;
        let result = self.api.create_payments_bulk(&records).await;
        self.saving = false;

        result?;

        self.candidates.clear();
        self.selection.clear();
        self.file = None;

        Ok(records.len())
    }

    // Accessors ------------------------------------------------------------

    pub fn candidates(&self) -> &[ImportCandidate] {
        &self.candidates
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    pub fn bank_id(&self) -> &str {
        &self.bank_id
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn file(&self) -> Option<&StatementFile> {
        self.file.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn banks(&self) -> &[BankAccount] {
        &self.banks
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockPaymentsApi;
    use crate::domain::CategoryType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            color_hex: "#888888".to_string(),
            category_type: CategoryType::Expense,
            created_at: None,
            updated_at: None,
        }
    }

    fn bank(id: &str, slug: &str) -> BankAccount {
        BankAccount {
            id: id.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            color_hex: None,
            logo_url: None,
            is_active: true,
        }
    }

    fn candidate(title: &str, cents: i64, already_exists: bool) -> ImportCandidate {
        ImportCandidate {
            id: None,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            title: title.to_string(),
            amount: Decimal::new(cents, 2),
            category: None,
            has_merchant: Some(false),
            already_exists,
            payment_method: None,
        }
    }

    fn reconciler_with(api: Arc<MockPaymentsApi>) -> StatementReconciler {
        StatementReconciler::new(
            api,
            vec![category("c1", "Mercado"), category("c2", "Transporte")],
            vec![bank("b1", "nubank"), bank("b2", "itau")],
        )
    }

    fn ready_reconciler(api: Arc<MockPaymentsApi>) -> StatementReconciler {
        let mut reconciler = reconciler_with(api);
        reconciler.set_file(StatementFile::new("fatura.csv", b"data".to_vec()));
        reconciler.set_bank("b1");
        reconciler
    }

    #[tokio::test]
    async fn test_import_requires_file_and_bank() {
        let api = Arc::new(MockPaymentsApi::new());

        let mut reconciler = reconciler_with(api.clone());
        let err = reconciler.import().await.unwrap_err();
        assert!(err.is_validation());

        // Bank without file fails the same way
        reconciler.set_bank("b1");
        assert!(reconciler.import().await.is_err());

        // Neither attempt reached the network
        assert_eq!(api.import_call_count(), 0);
    }

    #[tokio::test]
    async fn test_import_resolves_dialect_from_bank_slug() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![]));
        api.script_import(Ok(vec![]));

        let mut reconciler = ready_reconciler(api.clone());
        reconciler.set_bank("b2");
        reconciler.import().await.unwrap();
        assert_eq!(api.last_import_dialect(), Some(StatementDialect::Itau));

        reconciler.set_bank("b1");
        reconciler.import().await.unwrap();
        assert_eq!(api.last_import_dialect(), Some(StatementDialect::Nubank));
    }

    #[tokio::test]
    async fn test_default_selection_is_exactly_non_duplicates() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![
            candidate("A", 1000, false),
            candidate("B", 2000, true),
            candidate("C", 3000, false),
            candidate("D", 4000, true),
        ]));

        let mut reconciler = ready_reconciler(api);
        let summary = reconciler.import().await.unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(
            reconciler.selection().iter().copied().collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[tokio::test]
    async fn test_import_failure_preserves_prior_state() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![candidate("A", 1000, false)]));
        api.script_import(Err(Error::api("HTTP 500")));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        assert_eq!(reconciler.candidates().len(), 1);

        let err = reconciler.import().await.unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(reconciler.candidates().len(), 1);
        assert!(reconciler.is_selected(0));
    }

    #[tokio::test]
    async fn test_reimport_replaces_candidates_and_selection() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![
            candidate("old-1", 1000, false),
            candidate("old-2", 2000, false),
            candidate("old-3", 3000, false),
        ]));
        api.script_import(Ok(vec![candidate("new-1", 500, true)]));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        assert_eq!(reconciler.selection().len(), 3);

        reconciler.import().await.unwrap();
        assert_eq!(reconciler.candidates().len(), 1);
        assert_eq!(reconciler.candidates()[0].title, "new-1");
        // No residue from the first import: the only row is a duplicate,
        // so nothing is selected.
        assert!(reconciler.selection().is_empty());
    }

    #[tokio::test]
    async fn test_busy_flag_cleared_on_every_import_exit() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![]));
        api.script_import(Err(Error::api("boom")));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        assert!(!reconciler.is_importing());

        let _ = reconciler.import().await;
        assert!(!reconciler.is_importing());
    }

    #[tokio::test]
    async fn test_set_category_known_and_unknown() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![candidate("A", 1000, false)]));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();

        // Unknown id: silent no-op
        reconciler.set_category(0, "unknown-id");
        assert!(reconciler.candidates()[0].category.is_none());

        // Out-of-range index: silent no-op
        reconciler.set_category(5, "c1");

        reconciler.set_category(0, "c2");
        let assigned = reconciler.candidates()[0].category.as_ref().unwrap();
        assert_eq!(assigned.id, "c2");
        assert_eq!(assigned.name, "Transporte");
    }

    #[tokio::test]
    async fn test_submit_gating() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![
            candidate("A", 1000, false),
            candidate("B", 2000, true),
        ]));

        let mut reconciler = ready_reconciler(api.clone());

        // 1. Empty candidate list
        let err = reconciler.submit().await.unwrap_err();
        assert!(err.is_validation());

        reconciler.import().await.unwrap();

        // 2. Uncategorized candidate - even a deselected one blocks
        reconciler.set_category(0, "c1");
        assert!(!reconciler.is_selected(1));
        let err = reconciler.submit().await.unwrap_err();
        assert!(err.is_validation());

        // 3. Missing bank
        reconciler.set_category(1, "c1");
        reconciler.set_bank("");
        let err = reconciler.submit().await.unwrap_err();
        assert!(err.is_validation());

        // No gated attempt reached the network
        assert_eq!(api.bulk_call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_projects_only_selected_candidates() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![
            candidate("A", 1000, false),
            candidate("B", 2000, false),
        ]));
        api.script_bulk(Ok(()));

        let mut reconciler = ready_reconciler(api.clone());
        reconciler.set_payment_method(PaymentMethod::Pix);
        reconciler.import().await.unwrap();
        reconciler.set_category(0, "c1");
        reconciler.set_category(1, "c2");
        reconciler.replace_selection([0].into_iter().collect());

        let saved = reconciler.submit().await.unwrap();
        assert_eq!(saved, 1);

        let batches = api.bulk_calls();
        assert_eq!(batches.len(), 1);
        let records = &batches[0];
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].amount, Decimal::new(1000, 2));
        assert_eq!(records[0].bank_id, "b1");
        assert_eq!(records[0].category_id, "c1");
        assert_eq!(records[0].payment_method, PaymentMethod::Pix);
    }

    #[tokio::test]
    async fn test_submit_success_clears_state() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![candidate("A", 1000, false)]));
        api.script_bulk(Ok(()));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        reconciler.set_category(0, "c1");
        reconciler.submit().await.unwrap();

        assert!(reconciler.candidates().is_empty());
        assert!(reconciler.selection().is_empty());
        assert!(reconciler.file().is_none());
    }

    #[tokio::test]
    async fn test_submit_failure_preserves_state() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![
            candidate("A", 1000, false),
            candidate("B", 2000, false),
        ]));
        api.script_bulk(Err(Error::api("HTTP 502")));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        reconciler.set_category(0, "c1");
        reconciler.set_category(1, "c1");

        let err = reconciler.submit().await.unwrap_err();
        assert!(!err.is_validation());
        assert!(!reconciler.is_saving());

        // Candidates, selection, and file survive for a full resubmission
        assert_eq!(reconciler.candidates().len(), 2);
        assert_eq!(reconciler.selection().len(), 2);
        assert!(reconciler.file().is_some());
    }

    #[tokio::test]
    async fn test_toggle_selection() {
        let api = Arc::new(MockPaymentsApi::new());
        api.script_import(Ok(vec![candidate("A", 1000, false)]));

        let mut reconciler = ready_reconciler(api);
        reconciler.import().await.unwrap();
        assert!(reconciler.is_selected(0));

        reconciler.toggle_selection(0);
        assert!(!reconciler.is_selected(0));
        reconciler.toggle_selection(0);
        assert!(reconciler.is_selected(0));
    }
}
