//! Payments API port
//!
//! Defines the interface to the remote personal-finance API. The core
//! depends only on this trait; the HTTP adapter (and test mocks)
//! implement it.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{BankAccount, Category, ImportCandidate, PaymentCreate, StatementDialect};

/// A statement file chosen by the user for upload
#[derive(Debug, Clone)]
pub struct StatementFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl StatementFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Remote payments API contract
///
/// Statement parsing, duplicate detection, and persistence all live on
/// the server; this trait is the full surface the reconciler consumes.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Upload a statement and get back the parsed candidate rows,
    /// each flagged if the server considers it a probable duplicate.
    async fn import_statement(
        &self,
        file: &StatementFile,
        dialect: StatementDialect,
    ) -> Result<Vec<ImportCandidate>>;

    /// Persist a batch of curated payment records.
    async fn create_payments_bulk(&self, payments: &[PaymentCreate]) -> Result<()>;

    /// Fetch the category reference list.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Fetch the registered banks.
    async fn list_banks(&self) -> Result<Vec<BankAccount>>;
}
