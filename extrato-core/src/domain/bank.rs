//! Bank account domain model and statement dialect resolution

use serde::{Deserialize, Serialize};

/// A financial institution registered on the server, read-only here.
///
/// The slug doubles as the key for statement dialect resolution: only
/// banks whose slug maps to a known dialect can be import sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl BankAccount {
    /// Whether this bank can be offered as a statement import source
    pub fn supports_import(&self) -> bool {
        self.is_active && StatementDialect::known(&self.slug).is_some()
    }
}

/// Statement format variant understood by the server-side parser.
///
/// Closed mapping: each supported institution has exactly one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementDialect {
    Nubank,
    Itau,
}

impl StatementDialect {
    /// Resolve a bank slug to its dialect, if the slug is a supported one
    pub fn known(slug: &str) -> Option<Self> {
        match slug {
            "nubank" => Some(StatementDialect::Nubank),
            "itau" => Some(StatementDialect::Itau),
            _ => None,
        }
    }

    /// Resolve a bank slug to a dialect, falling back to the default
    /// (Nubank) for unknown slugs.
    pub fn from_slug(slug: &str) -> Self {
        Self::known(slug).unwrap_or(StatementDialect::Nubank)
    }

    /// Wire identifier sent to the import endpoint as the `source` field
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementDialect::Nubank => "nubank",
            StatementDialect::Itau => "itau",
        }
    }
}
