//! LIST command - List categories, or every item.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use whereisit_core::{Category, Item, ItemStatus};

use super::{HumanReadable, format_timestamp, make_request, output, truncate};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// List items instead of categories
    #[arg(long)]
    pub items: bool,
}

/// Response from GET /categories.
#[derive(Debug, Deserialize, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
}

/// Response from GET /items.
#[derive(Debug, Deserialize, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<Item>,
}

impl HumanReadable for ListCategoriesResponse {
    fn print_human(&self) {
        println!("{}", "Categories".green().bold());
        println!("{}", "=".repeat(60));

        if self.categories.is_empty() {
            println!("  {}", "(No categories yet)".dimmed());
            return;
        }

        for category in &self.categories {
            println!("  {:>5}  {}", category.id.to_string().cyan(), category.name.bold());
        }

        println!();
        println!("  {} {}", "Total:".cyan(), self.categories.len());
    }
}

/// Colored status tag shared by item listings.
pub(crate) fn status_tag(status: ItemStatus) -> colored::ColoredString {
    match status {
        ItemStatus::Lost => "LOST ".red().bold(),
        ItemStatus::Found => "FOUND".green().bold(),
    }
}

impl HumanReadable for ListItemsResponse {
    fn print_human(&self) {
        println!("{}", "Items".green().bold());
        println!("{}", "=".repeat(60));

        if self.items.is_empty() {
            println!("  {}", "(No items posted)".dimmed());
            return;
        }

        for item in &self.items {
            println!(
                "  {:>5}  {}  {}",
                item.id.to_string().cyan(),
                status_tag(item.status),
                truncate(&item.name, 40).bold()
            );
            println!(
                "         {} {} · {}",
                "by".dimmed(),
                item.username,
                format_timestamp(&item.added).dimmed()
            );
        }

        println!();
        println!("  {} {}", "Total:".cyan(), self.items.len());
    }
}

/// Execute the list command.
pub async fn execute(base_url: &str, human: bool, args: ListArgs) -> Result<()> {
    let client = reqwest::Client::new();

    if args.items {
        let url = format!("{}/items", base_url);
        let response: ListItemsResponse = make_request(&client, client.get(&url)).await?;
        return output(&response, human);
    }

    let url = format!("{}/categories", base_url);
    let response: ListCategoriesResponse = make_request(&client, client.get(&url)).await?;
    output(&response, human)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_response_deserialize() {
        let json = r#"{"categories": [{"id": 1, "name": "Laptop"}, {"id": 2, "name": "Money"}]}"#;
        let response: ListCategoriesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.categories.len(), 2);
        assert_eq!(response.categories[1].name, "Money");
    }

    #[test]
    fn test_items_response_deserialize() {
        let json = r#"{"items": [{
            "id": 1, "name": "Ring", "username": "baklick", "details": null,
            "contact": "+12834567890", "added": "2024-05-01T10:00:00Z", "status": 1
        }]}"#;
        let response: ListItemsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items[0].status, ItemStatus::Found);
    }
}
