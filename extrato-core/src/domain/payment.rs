//! Outbound payment record and payment method enumeration

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::candidate::ImportCandidate;

/// How a payment was made. Fixed enumeration shared with the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    #[default]
    CreditCard,
    DebitCard,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Other => "Other",
        }
    }

    /// All methods, in the order they are offered for selection
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::DebitCard,
        PaymentMethod::CreditCard,
        PaymentMethod::Pix,
        PaymentMethod::Other,
    ];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pix" => Ok(PaymentMethod::Pix),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "other" => Ok(PaymentMethod::Other),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// Normalized record sent to the bulk-create endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub title: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub bank_id: String,
    pub category_id: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_merchant: Option<bool>,
}

impl PaymentCreate {
    /// Project a categorized candidate into an outbound record.
    ///
    /// Returns None when the candidate has no category; callers must
    /// validate categorization before projecting.
    pub fn from_candidate(
        candidate: &ImportCandidate,
        bank_id: &str,
        payment_method: PaymentMethod,
    ) -> Option<Self> {
        let category = candidate.category.as_ref()?;
        Some(Self {
            title: candidate.title.clone(),
            date: candidate.date,
            amount: candidate.amount,
            bank_id: bank_id.to_string(),
            category_id: category.id.clone(),
            payment_method,
            has_merchant: candidate.has_merchant,
        })
    }
}
