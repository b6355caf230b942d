//! Categories command - list spending categories

use anyhow::Result;

use super::{get_context, get_logger, log_event};
use crate::output;
use extrato_core::ports::PaymentsApi;
use extrato_core::LogEvent;

pub async fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("command_executed").with_command("categories"),
    );

    let ctx = get_context()?;
    let categories = ctx.api.list_categories().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Name", "Slug", "Type"]);

    for category in &categories {
        table.add_row(vec![
            category.name.clone(),
            category.slug.clone(),
            category.category_type.as_str().to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
