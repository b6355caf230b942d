//! Import command - the statement reconcile workflow
//!
//! Uploads a statement, shows the candidate rows the server extracted,
//! lets the user assign categories and toggle selection, then saves the
//! selected rows as payments.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use super::{get_context, get_logger, log_event};
use crate::output;
use extrato_core::{
    LogEvent, PaymentMethod, StatementDialect, StatementFile, StatementReconciler,
};

pub async fn run(
    file: PathBuf,
    bank: Option<String>,
    method: Option<PaymentMethod>,
    category: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command("import"));

    let ctx = get_context()?;

    let bytes =
        std::fs::read(&file).with_context(|| format!("Failed to read statement file: {:?}", file))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement.csv")
        .to_string();

    let pb = spinner("Loading reference data...", json);
    let reconciler = ctx.start_reconcile().await;
    finish(pb);
    let mut reconciler = reconciler?;

    let bank_id = resolve_bank(&reconciler, bank)?;
    let dialect = reconciler
        .banks()
        .iter()
        .find(|b| b.id == bank_id)
        .map(|b| StatementDialect::from_slug(&b.slug))
        .unwrap_or(StatementDialect::Nubank);

    reconciler.set_bank(&bank_id);
    reconciler.set_file(StatementFile::new(file_name, bytes));
    reconciler.set_payment_method(method.unwrap_or(ctx.config.default_payment_method));

    log_event(
        &logger,
        LogEvent::new("import_started").with_dialect(dialect.as_str()),
    );
    let pb = spinner("Uploading statement...", json);
    let imported = reconciler.import().await;
    finish(pb);

    match imported {
        Ok(summary) => {
            log_event(
                &logger,
                LogEvent::new("import_completed")
                    .with_dialect(dialect.as_str())
                    .with_row_count(summary.total as i64),
            );
            if !json {
                output::success(&format!(
                    "Imported {} rows ({} flagged as duplicates).",
                    summary.total, summary.duplicates
                ));
            }
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("import_failed")
                    .with_dialect(dialect.as_str())
                    .with_error(e.to_string()),
            );
            // Collaborator messages are surfaced verbatim
            return Err(e.into());
        }
    }

    if let Some(category_arg) = &category {
        assign_to_uncategorized(&mut reconciler, category_arg)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(reconciler.candidates())?);
    } else {
        print_candidates(&reconciler);
    }

    if !yes && atty::is(atty::Stream::Stdin) {
        if !curate(&mut reconciler)? {
            output::info("Nothing saved.");
            return Ok(());
        }
    }

    log_event(
        &logger,
        LogEvent::new("save_started").with_dialect(dialect.as_str()),
    );
    let pb = spinner("Saving payments...", json);
    let saved = reconciler.submit().await;
    finish(pb);

    match saved {
        Ok(count) => {
            log_event(
                &logger,
                LogEvent::new("save_completed")
                    .with_dialect(dialect.as_str())
                    .with_row_count(count as i64),
            );
            if json {
                println!("{}", serde_json::json!({ "saved": count }));
            } else {
                output::success(&format!("Saved {} payments.", count));
            }
            Ok(())
        }
        // Local precondition failures carry their own actionable message
        Err(e) if e.is_validation() => Err(e.into()),
        // Server failures are shown generically; the detail goes to the log
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("save_failed")
                    .with_dialect(dialect.as_str())
                    .with_error("Failed to save payments.")
                    .with_error_details(e.to_string()),
            );
            anyhow::bail!("Failed to save payments.");
        }
    }
}

/// Resolve the bank argument (id or slug) or prompt among import sources
fn resolve_bank(reconciler: &StatementReconciler, arg: Option<String>) -> Result<String> {
    if let Some(arg) = arg {
        let bank = reconciler
            .banks()
            .iter()
            .find(|b| b.id == arg || b.slug == arg)
            .ok_or_else(|| anyhow::anyhow!("Unknown bank: {}", arg))?;
        if !bank.supports_import() {
            anyhow::bail!("Statement import is not supported for {}", bank.name);
        }
        return Ok(bank.id.clone());
    }

    let importable: Vec<_> = reconciler
        .banks()
        .iter()
        .filter(|b| b.supports_import())
        .collect();
    if importable.is_empty() {
        anyhow::bail!("No banks with statement import support are registered");
    }
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("--bank is required when not attached to a terminal");
    }

    let names: Vec<&str> = importable.iter().map(|b| b.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("Bank")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(importable[index].id.clone())
}

/// Assign one category (id or slug) to every row that has none yet
fn assign_to_uncategorized(reconciler: &mut StatementReconciler, arg: &str) -> Result<()> {
    let category_id = reconciler
        .categories()
        .iter()
        .find(|c| c.id == arg || c.slug == arg)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", arg))?;

    let uncategorized: Vec<usize> = reconciler
        .candidates()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_categorized())
        .map(|(i, _)| i)
        .collect();
    for index in uncategorized {
        reconciler.set_category(index, &category_id);
    }
    Ok(())
}

/// Interactive curation loop. Returns false when the user quits.
fn curate(reconciler: &mut StatementReconciler) -> Result<bool> {
    const ACTIONS: [&str; 6] = [
        "Assign a category to a row",
        "Assign a category to all uncategorized rows",
        "Toggle a row's selection",
        "Show rows",
        "Save selected payments",
        "Quit without saving",
    ];

    loop {
        let selected = reconciler.selection().len();
        let total = reconciler.candidates().len();
        let choice = Select::new()
            .with_prompt(format!("Selected {}/{}", selected, total))
            .items(&ACTIONS)
            .default(4)
            .interact()?;

        match choice {
            0 => {
                let row = prompt_row(reconciler)?;
                let category_id = pick_category(reconciler)?;
                reconciler.set_category(row, &category_id);
            }
            1 => {
                let category_id = pick_category(reconciler)?;
                let uncategorized: Vec<usize> = reconciler
                    .candidates()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_categorized())
                    .map(|(i, _)| i)
                    .collect();
                for index in uncategorized {
                    reconciler.set_category(index, &category_id);
                }
            }
            2 => {
                let row = prompt_row(reconciler)?;
                reconciler.toggle_selection(row);
            }
            3 => print_candidates(reconciler),
            4 => {
                // Saving requires a category on every row, selected or not
                if reconciler.candidates().iter().any(|c| !c.is_categorized()) {
                    output::warning("Select a category for every imported payment.");
                    continue;
                }
                return Ok(true);
            }
            _ => return Ok(false),
        }
    }
}

fn prompt_row(reconciler: &StatementReconciler) -> Result<usize> {
    let total = reconciler.candidates().len();
    let row: usize = Input::new()
        .with_prompt(format!("Row (1-{})", total))
        .validate_with(|value: &usize| {
            if (1..=total).contains(value) {
                Ok(())
            } else {
                Err(format!("enter a row between 1 and {}", total))
            }
        })
        .interact_text()?;
    Ok(row - 1)
}

fn pick_category(reconciler: &StatementReconciler) -> Result<String> {
    let categories = reconciler.categories();
    let names: Vec<String> = categories
        .iter()
        .map(|c| format!("{} ({})", c.name, c.category_type.as_str()))
        .collect();
    let index = Select::new()
        .with_prompt("Category")
        .items(&names)
        .interact()?;
    Ok(categories[index].id.clone())
}

fn print_candidates(reconciler: &StatementReconciler) {
    let mut table = output::create_table();
    table.set_header(vec!["#", "", "Date", "Title", "Amount", "Category", ""]);

    for (index, candidate) in reconciler.candidates().iter().enumerate() {
        let marker = if reconciler.is_selected(index) { "x" } else { "" };
        let category = candidate
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "-".yellow().to_string());
        let duplicate = if candidate.already_exists {
            "duplicate".yellow().to_string()
        } else {
            String::new()
        };

        table.add_row(vec![
            (index + 1).to_string(),
            marker.to_string(),
            candidate.date.format("%Y-%m-%d").to_string(),
            candidate.title.clone(),
            candidate.amount.to_string(),
            category,
            duplicate,
        ]);
    }

    println!("{table}");
}

fn spinner(msg: &str, json: bool) -> Option<ProgressBar> {
    if json || !atty::is(atty::Stream::Stderr) {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}
