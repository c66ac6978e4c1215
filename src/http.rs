use anyhow::{Context, Result};
use std::time::Duration;

use crate::request::{RenderMode, TargetDescriptor};
use crate::user_agents::get_random_user_agent;

/// Plain-fetch half of the page acquirer: one HTTP GET per target, no retry.
/// Transport errors and non-success statuses propagate unchanged.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the target's body as text (HTML vendors).
    pub async fn fetch_text(&self, target: &TargetDescriptor) -> Result<String> {
        let response = self.send(target).await?;
        response.text().await.context("Failed to read response body")
    }

    /// Fetch and parse the target's body as JSON (API vendors).
    pub async fn fetch_json(&self, target: &TargetDescriptor) -> Result<serde_json::Value> {
        let response = self.send(target).await?;
        response
            .json::<serde_json::Value>()
            .await
            .context("Failed to parse response as JSON")
    }

    async fn send(&self, target: &TargetDescriptor) -> Result<reqwest::Response> {
        debug_assert_eq!(target.mode, RenderMode::PlainFetch);

        let url = url::Url::parse(&target.url)
            .with_context(|| format!("Invalid target URL: {}", target.url))?;

        log::debug!("GET {} ({} query params)", url, target.query.len());

        let mut request = self
            .client
            .get(url)
            .query(&target.query)
            .header("User-Agent", get_random_user_agent())
            .header("Accept", "text/html,application/json;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5");

        for (key, value) in &target.headers {
            request = request.header(key, value);
        }

        let response = request.send().await.context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_construction() {
        assert!(HttpFetcher::new().is_ok());
    }
}
