//! Scripted in-memory payments API for tests
//!
//! Responses are queued ahead of each call and consumed in order, and
//! every call is recorded so tests can assert that validation failures
//! never reach the network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{BankAccount, Category, ImportCandidate, PaymentCreate, StatementDialect};
use crate::ports::{PaymentsApi, StatementFile};

#[derive(Default)]
pub struct MockPaymentsApi {
    import_responses: Mutex<VecDeque<Result<Vec<ImportCandidate>>>>,
    bulk_responses: Mutex<VecDeque<Result<()>>>,
    categories: Mutex<Vec<Category>>,
    banks: Mutex<Vec<BankAccount>>,

    import_dialects: Mutex<Vec<StatementDialect>>,
    bulk_calls: Mutex<Vec<Vec<PaymentCreate>>>,
}

impl MockPaymentsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_import(&self, response: Result<Vec<ImportCandidate>>) {
        self.import_responses.lock().unwrap().push_back(response);
    }

    pub fn script_bulk(&self, response: Result<()>) {
        self.bulk_responses.lock().unwrap().push_back(response);
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        *self.categories.lock().unwrap() = categories;
    }

    pub fn set_banks(&self, banks: Vec<BankAccount>) {
        *self.banks.lock().unwrap() = banks;
    }

    pub fn import_call_count(&self) -> usize {
        self.import_dialects.lock().unwrap().len()
    }

    pub fn last_import_dialect(&self) -> Option<StatementDialect> {
        self.import_dialects.lock().unwrap().last().copied()
    }

    pub fn bulk_call_count(&self) -> usize {
        self.bulk_calls.lock().unwrap().len()
    }

    pub fn bulk_calls(&self) -> Vec<Vec<PaymentCreate>> {
        self.bulk_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentsApi for MockPaymentsApi {
    async fn import_statement(
        &self,
        _file: &StatementFile,
        dialect: StatementDialect,
    ) -> Result<Vec<ImportCandidate>> {
        self.import_dialects.lock().unwrap().push(dialect);
        self.import_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::api("no scripted import response")))
    }

    async fn create_payments_bulk(&self, payments: &[PaymentCreate]) -> Result<()> {
        self.bulk_calls.lock().unwrap().push(payments.to_vec());
        self.bulk_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::api("no scripted bulk response")))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn list_banks(&self) -> Result<Vec<BankAccount>> {
        Ok(self.banks.lock().unwrap().clone())
    }
}
