//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod bank;
mod candidate;
mod category;
mod payment;
pub mod result;

pub use bank::{BankAccount, StatementDialect};
pub use candidate::{CandidateCategory, ImportCandidate, PaymentMethodInfo};
pub use category::{Category, CategoryType};
pub use payment::{PaymentCreate, PaymentMethod};
