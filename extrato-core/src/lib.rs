//! Extrato Core - Business logic for statement import reconciliation
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Category, BankAccount, ImportCandidate, etc.)
//! - **ports**: Trait definitions for external dependencies (PaymentsApi)
//! - **services**: Business logic orchestration (reconciler, reference data, logging)
//! - **adapters**: Concrete implementations (HTTP client)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::http::HttpPaymentsApi;
use config::Config;
use ports::PaymentsApi;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    BankAccount, CandidateCategory, Category, CategoryType, ImportCandidate, PaymentCreate,
    PaymentMethod, StatementDialect,
};
pub use ports::StatementFile;
pub use services::{
    EntryPoint, ImportSummary, LogEvent, LoggingService, ReferenceData, StatementReconciler,
};

/// Main context for Extrato operations
///
/// Holds the configuration and the payments API client. Reconcilers are
/// created per workflow entry from freshly loaded reference data.
pub struct ExtratoContext {
    pub config: Config,
    pub api: Arc<dyn PaymentsApi>,
}

impl ExtratoContext {
    /// Create a new context from the settings in `extrato_dir`
    pub fn new(extrato_dir: &Path) -> Result<Self> {
        let config = Config::load(extrato_dir)?;
        let api = HttpPaymentsApi::new(&config.api_url, config.api_token.clone())?;

        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }

    /// Load reference data and start a reconcile workflow
    pub async fn start_reconcile(&self) -> Result<StatementReconciler> {
        let reference = ReferenceData::load(&self.api).await?;
        let (categories, banks) = reference.into_parts();
        Ok(StatementReconciler::new(
            Arc::clone(&self.api),
            categories,
            banks,
        ))
    }
}
