//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - HTTP client (reqwest) for the PaymentsApi port
//! - Scripted in-memory mock for tests

pub mod http;

#[cfg(test)]
pub mod mock;
