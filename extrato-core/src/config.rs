//! Configuration management
//!
//! Settings live in `settings.json` inside the extrato directory:
//! ```json
//! {
//!   "api": { "baseUrl": "http://localhost:8000/api", "token": "..." },
//!   "app": { "defaultPaymentMethod": "credit_card" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::PaymentMethod;

/// Default API URL for a local server
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variables overriding the settings file (for CI/testing)
pub const API_URL_ENV: &str = "EXTRATO_API_URL";
pub const API_TOKEN_ENV: &str = "EXTRATO_API_TOKEN";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    default_payment_method: Option<PaymentMethod>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Extrato configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub default_payment_method: PaymentMethod,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            default_payment_method: PaymentMethod::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the extrato directory.
    ///
    /// `EXTRATO_API_URL` and `EXTRATO_API_TOKEN` override the file values.
    pub fn load(extrato_dir: &Path) -> Result<Self> {
        let settings_path = extrato_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .or_else(|| raw.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_token = std::env::var(API_TOKEN_ENV).ok().or_else(|| raw.api.token.clone());

        Ok(Self {
            api_url,
            api_token,
            default_payment_method: raw.app.default_payment_method.unwrap_or_default(),
            _raw_settings: raw,
        })
    }

    /// Save config to the extrato directory.
    /// Preserves settings fields the CLI doesn't manage.
    pub fn save(&self, extrato_dir: &Path) -> Result<()> {
        let settings_path = extrato_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.api.base_url = Some(self.api_url.clone());
        settings.api.token = self.api_token.clone();
        settings.app.default_payment_method = Some(self.default_payment_method);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
