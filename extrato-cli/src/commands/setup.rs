//! Setup command - configure the API connection and defaults

use anyhow::Result;
use dialoguer::{Input, Select};

use super::{get_extrato_dir, get_logger, log_event};
use crate::output;
use extrato_core::config::Config;
use extrato_core::{LogEvent, PaymentMethod};

pub fn run(
    api_url: Option<String>,
    token: Option<String>,
    default_method: Option<PaymentMethod>,
) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command("setup"));

    let extrato_dir = get_extrato_dir();
    std::fs::create_dir_all(&extrato_dir)?;

    let mut config = Config::load(&extrato_dir)?;

    let flags_given = api_url.is_some() || token.is_some() || default_method.is_some();

    if let Some(url) = api_url {
        config.api_url = url;
    }
    if let Some(token) = token {
        config.api_token = Some(token);
    }
    if let Some(method) = default_method {
        config.default_payment_method = method;
    }

    // With no flags, walk through the settings interactively
    if !flags_given {
        if !atty::is(atty::Stream::Stdin) {
            anyhow::bail!(
                "No settings given. Pass --api-url, --token, or --default-method, or run from a terminal."
            );
        }

        config.api_url = Input::new()
            .with_prompt("API base URL")
            .default(config.api_url.clone())
            .interact_text()?;

        let token: String = Input::new()
            .with_prompt("API token (empty to keep current)")
            .allow_empty(true)
            .interact_text()?;
        if !token.is_empty() {
            config.api_token = Some(token);
        }

        let methods: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.display_name()).collect();
        let current = PaymentMethod::ALL
            .iter()
            .position(|m| *m == config.default_payment_method)
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt("Default payment method")
            .items(&methods)
            .default(current)
            .interact()?;
        config.default_payment_method = PaymentMethod::ALL[index];
    }

    config.save(&extrato_dir)?;
    output::success(&format!(
        "Settings saved to {}",
        extrato_dir.join("settings.json").display()
    ));
    Ok(())
}
