//! Poll rankings (AP, Coaches, CFP) from the ESPN rankings endpoint.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpFetcher;
use crate::request::TargetDescriptor;

const RANKINGS_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/college-football/rankings";

/// Week/year filter for the poll rankings. Omitting both returns the
/// current polls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingsOptions {
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub week: Option<u8>,
}

pub fn build_rankings_target(options: &RankingsOptions) -> TargetDescriptor {
    let mut target = TargetDescriptor::plain(RANKINGS_URL);

    if let Some(year) = options.year {
        target = target.query("year", year);
    }
    if let Some(week) = options.week {
        target = target.query("weeks", week);
    }

    target
}

pub fn extract_rankings(raw: Value) -> Result<Value> {
    raw.get("rankings")
        .cloned()
        .context("missing rankings in response")
}

/// Poll rankings for a week (current polls when no filter is given).
pub async fn get_rankings(http: &HttpFetcher, options: &RankingsOptions) -> Result<Value> {
    let raw = http.fetch_json(&build_rankings_target(options)).await?;
    extract_rankings(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rankings_target_omits_missing_filters() {
        let target = build_rankings_target(&RankingsOptions::default());
        assert!(target.query.is_empty());

        let target = build_rankings_target(&RankingsOptions {
            year: Some(2019),
            week: Some(12),
        });
        assert!(target.query.contains(&("year".to_string(), "2019".to_string())));
        assert!(target.query.contains(&("weeks".to_string(), "12".to_string())));
    }

    #[test]
    fn test_extract_rankings() {
        let raw = json!({"rankings": [{"name": "AP Top 25", "ranks": []}]});
        let rankings = extract_rankings(raw).unwrap();
        assert_eq!(rankings[0]["name"], json!("AP Top 25"));
        assert!(extract_rankings(json!({})).is_err());
    }
}
