//! Extrato CLI - import bank statements from your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use extrato_core::PaymentMethod;

mod commands;
mod output;

use commands::{banks, categories, import, logs, setup};

/// Extrato - bank statement import for your payment history
#[derive(Parser)]
#[command(name = "ext", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a bank statement and save the reconciled payments
    Import {
        /// Path to the statement file (CSV)
        file: PathBuf,
        /// Bank to import for (id or slug); prompts when omitted
        #[arg(long)]
        bank: Option<String>,
        /// Payment method for the created records
        #[arg(long)]
        method: Option<PaymentMethod>,
        /// Category (id or slug) to assign to every uncategorized row
        #[arg(long)]
        category: Option<String>,
        /// Skip interactive curation and save immediately
        #[arg(long, short = 'y')]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered banks
    Banks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List spending categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure the API connection
    Setup {
        /// API base URL
        #[arg(long)]
        api_url: Option<String>,
        /// API token
        #[arg(long)]
        token: Option<String>,
        /// Default payment method for imports
        #[arg(long)]
        default_method: Option<PaymentMethod>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            file,
            bank,
            method,
            category,
            yes,
            json,
        } => import::run(file, bank, method, category, yes, json).await,
        Commands::Banks { json } => banks::run(json).await,
        Commands::Categories { json } => categories::run(json).await,
        Commands::Setup {
            api_url,
            token,
            default_method,
        } => setup::run(api_url, token, default_method),
        Commands::Logs { command } => logs::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
