//! READ command - One item with its categories.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use whereisit_core::{ItemDetails, ItemId};

use super::list::status_tag;
use super::{HumanReadable, format_timestamp, make_request, output};

/// Arguments for the read command.
#[derive(Args)]
pub struct ReadArgs {
    /// Item ID to read
    pub item_id: ItemId,
}

/// Response from GET /items/{id}.
#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReadItemResponse(pub ItemDetails);

impl HumanReadable for ReadItemResponse {
    fn print_human(&self) {
        let item = &self.0.item;

        println!("{} {}", status_tag(item.status), item.name.bold());
        println!("{}", "=".repeat(60));
        println!("  {} {}", "ID:".cyan(), item.id);
        println!("  {} {}", "Posted by:".cyan(), item.username);
        println!("  {} {}", "Contact:".cyan(), item.contact);
        println!("  {} {}", "Added:".cyan(), format_timestamp(&item.added));

        let categories: Vec<_> = self.0.categories.iter().map(|c| c.name.as_str()).collect();
        println!("  {} {}", "Categories:".cyan(), categories.join(", "));

        if let Some(details) = &item.details {
            println!();
            println!("{}", details);
        }
    }
}

/// Execute the read command.
pub async fn execute(base_url: &str, human: bool, args: ReadArgs) -> Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/items/{}", base_url, args.item_id);

    let response: ReadItemResponse = make_request(&client, client.get(&url)).await?;

    output(&response, human)
}
