//! Command implementations and shared helpers.

pub mod browse;
pub mod delete;
pub mod list;
pub mod read;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Output that can be printed for humans as well as as JSON.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    code: String,
    message: String,
}

/// Send a request and decode a JSON response.
///
/// Non-success responses become errors carrying the server's error code
/// and message when the body has them.
pub async fn make_request<T: DeserializeOwned>(
    client: &Client,
    request: RequestBuilder,
) -> Result<T> {
    let response = client.execute(request.build()?).await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("{}", describe_failure(status.as_u16(), &body));
    }

    Ok(response.json().await?)
}

fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!(
            "{} ({}): {}",
            parsed.error.code, status, parsed.error.message
        ),
        Err(_) if body.trim().is_empty() => format!("request failed with status {}", status),
        Err(_) => format!("request failed with status {}: {}", status, body.trim()),
    }
}

/// Print a response as pretty JSON, or formatted when `human` is set.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Format a timestamp in the local timezone.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Shorten text to at most `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
