//! Command-line interface for the WhereIsIt lost-and-found board.
//!
//! Commands:
//! - list: List categories, or every item with `--items`
//! - browse: Items filed under one category
//! - read: One item with its categories
//! - delete: Delete an item or a category with its secret key
//!
//! Configuration via environment:
//! - WHEREISIT_URL: Base URL of the server (default: http://localhost:3000)

mod commands;

use clap::{Parser, Subcommand};

use commands::{browse::BrowseArgs, delete::DeleteArgs, list::ListArgs, read::ReadArgs};

/// WhereIsIt CLI
///
/// Browse and manage the lost-and-found board from the command line.
/// Prints JSON by default; pass --human for formatted output.
#[derive(Parser)]
#[command(name = "whereisit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// WhereIsIt server URL
    #[arg(
        long,
        env = "WHEREISIT_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories (or items)
    List(ListArgs),

    /// Show the items filed under a category
    Browse(BrowseArgs),

    /// Read an item with its categories
    Read(ReadArgs),

    /// Delete an item or a category
    Delete(DeleteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let base_url = cli.url.trim_end_matches('/');

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(base_url, cli.human, args).await,
        Commands::Browse(args) => commands::browse::execute(base_url, cli.human, args).await,
        Commands::Read(args) => commands::read::execute(base_url, cli.human, args).await,
        Commands::Delete(args) => commands::delete::execute(base_url, cli.human, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_delete() {
        let cli = Cli::try_parse_from([
            "whereisit", "delete", "item", "12", "--key", "xyz99", "--yes",
        ])
        .unwrap();
        assert!(!cli.human);
        assert!(matches!(cli.command, Commands::Delete(_)));
    }

    #[test]
    fn test_cli_global_human_flag() {
        let cli = Cli::try_parse_from(["whereisit", "browse", "3", "--human"]).unwrap();
        assert!(cli.human);
    }

    #[test]
    fn test_cli_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["whereisit", "read", "backpack"]).is_err());
    }
}
