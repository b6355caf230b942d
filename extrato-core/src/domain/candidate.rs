//! Import candidate domain model
//!
//! A candidate is a statement row the server extracted from an uploaded
//! file. Candidates live only for the duration of one reconcile workflow:
//! they are created in bulk by the import response, mutated in place only
//! to attach a category, and discarded on save or on the next import.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryType};

/// Denormalized category fields carried on a candidate after assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

impl From<&Category> for CandidateCategory {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            category_type: category.category_type,
            color_hex: Some(category.color_hex.clone()),
        }
    }
}

/// Payment method descriptor as the API reports it on existing payments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodInfo {
    pub value: String,
    pub display_name: String,
}

/// A prospective transaction extracted from an uploaded statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: NaiveDate,
    pub title: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CandidateCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_merchant: Option<bool>,
    /// Server-computed hint that this row likely matches a stored payment
    #[serde(default)]
    pub already_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethodInfo>,
}

impl ImportCandidate {
    /// Whether the user has assigned a category to this row
    pub fn is_categorized(&self) -> bool {
        self.category.is_some()
    }
}
