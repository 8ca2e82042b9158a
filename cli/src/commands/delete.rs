//! DELETE command - Delete an item or a category.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// What kind of record to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Item,
    Category,
}

impl Target {
    fn path(self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Category => "categories",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Category => "category",
        }
    }
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Record kind
    #[arg(value_enum)]
    pub target: Target,

    /// Record ID
    pub id: i32,

    /// The record's secret key, or the administrator key
    #[arg(long, short = 'k')]
    pub key: String,

    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    confirm_key: &'a str,
}

/// Response from DELETE /items/{id} or /categories/{id}.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub id: i32,
    pub rows_affected: u64,
}

impl HumanReadable for DeleteResponse {
    fn print_human(&self) {
        println!("{}", "Deleted.".green().bold());
        println!("  {} {}", "ID:".cyan(), self.id);
        println!("  {} {}", "Rows:".cyan(), self.rows_affected);
    }
}

/// Execute the delete command.
pub async fn execute(base_url: &str, human: bool, args: DeleteArgs) -> Result<()> {
    // Confirmation prompt for interactive use
    if human && !args.yes {
        eprint!(
            "{} Are you sure you want to delete {} {}? [y/N] ",
            "Warning:".yellow().bold(),
            args.target.label(),
            args.id
        );

        use std::io::Write;
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let client = reqwest::Client::new();
    let url = format!("{}/{}/{}", base_url, args.target.path(), args.id);
    let body = DeleteRequest {
        confirm_key: &args.key,
    };

    let response: DeleteResponse = make_request(&client, client.delete(&url).json(&body)).await?;

    output(&response, human)
}
