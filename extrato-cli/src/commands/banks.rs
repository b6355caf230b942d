//! Banks command - list registered banks

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_event};
use crate::output;
use extrato_core::ports::PaymentsApi;
use extrato_core::LogEvent;

pub async fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command("banks"));

    let ctx = get_context()?;
    let banks = ctx.api.list_banks().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&banks)?);
        return Ok(());
    }

    if banks.is_empty() {
        println!("No banks registered.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Name", "Slug", "Import"]);

    for bank in &banks {
        let import = if bank.supports_import() {
            "yes".green().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![bank.name.clone(), bank.slug.clone(), import]);
    }

    println!("{table}");
    Ok(())
}
