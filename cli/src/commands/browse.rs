//! BROWSE command - Items filed under one category.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use whereisit_core::{CategorizedItem, CategoryId};

use super::list::status_tag;
use super::{HumanReadable, format_timestamp, make_request, output, truncate};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Category ID to browse
    pub category_id: CategoryId,
}

/// Response from GET /categories/{id}/items.
#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryItemsResponse {
    pub category_id: CategoryId,
    pub items: Vec<CategorizedItem>,
}

impl HumanReadable for CategoryItemsResponse {
    fn print_human(&self) {
        let title = self
            .items
            .first()
            .map(|i| i.category_name.clone())
            .unwrap_or_else(|| format!("Category {}", self.category_id));

        println!("{}", title.green().bold());
        println!("{}", "=".repeat(60));

        if self.items.is_empty() {
            println!("  {}", "(Nothing filed here)".dimmed());
            return;
        }

        for entry in &self.items {
            let item = &entry.item;
            println!(
                "  {:>5}  {}  {}",
                item.id.to_string().cyan(),
                status_tag(item.status),
                item.name.bold()
            );
            if let Some(details) = &item.details {
                println!("         {}", truncate(details, 50));
            }
            println!(
                "         {} {}  {} {}  {}",
                "by".dimmed(),
                item.username,
                "contact".dimmed(),
                item.contact,
                format_timestamp(&item.added).dimmed()
            );
        }

        println!();
        println!("  {} {}", "Total:".cyan(), self.items.len());
    }
}

/// Execute the browse command.
pub async fn execute(base_url: &str, human: bool, args: BrowseArgs) -> Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/categories/{}/items", base_url, args.category_id);

    let response: CategoryItemsResponse = make_request(&client, client.get(&url)).await?;

    output(&response, human)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialize_flattened_item() {
        let json = r#"{"category_id": 3, "items": [{
            "id": 1, "name": "Ring", "username": "baklick", "details": "Golden ring",
            "contact": "+12834567890", "added": "2024-05-01T10:00:00Z", "status": 1,
            "category_name": "Gold"
        }]}"#;
        let response: CategoryItemsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.category_id, CategoryId::new(3));
        assert_eq!(response.items[0].category_name, "Gold");
        assert_eq!(response.items[0].item.name, "Ring");
    }
}
