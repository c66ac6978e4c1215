//! Game-centric ESPN operations: play-by-play, box score, summary, picks,
//! scoreboard, and schedule. These endpoints return structured JSON that is
//! passed through after projecting out the documented subtree.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpFetcher;
use crate::request::{
    format_date_param, TargetDescriptor, DEFAULT_GROUPS, DEFAULT_LIMIT, DEFAULT_SEASON_TYPE,
};

const CDN_BASE: &str = "https://cdn.espn.com/core/college-football";
const SITE_API_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports/football/college-football";

/// Date and grouping filters shared by the scoreboard and schedule
/// endpoints. The `dates` parameter is only sent when year, month, and day
/// are all present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardOptions {
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub month: Option<u8>,
    #[serde(default)]
    pub day: Option<u8>,
    #[serde(default)]
    pub groups: Option<u32>,
    #[serde(default)]
    pub season_type: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

fn cdn_target(page: &str, game_id: u64) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/{}", CDN_BASE, page))
        .query("gameId", game_id)
        .query("xhr", 1)
        .query("render", "false")
        .query("userab", 18)
}

pub fn build_play_by_play_target(game_id: u64) -> TargetDescriptor {
    cdn_target("playbyplay", game_id)
}

pub fn build_box_score_target(game_id: u64) -> TargetDescriptor {
    cdn_target("boxscore", game_id)
}

pub fn build_picks_target(game_id: u64) -> TargetDescriptor {
    cdn_target("game", game_id)
}

pub fn build_summary_target(game_id: u64) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/summary", SITE_API_BASE)).query("event", game_id)
}

pub fn build_scoreboard_target(options: &ScoreboardOptions) -> TargetDescriptor {
    let mut target = TargetDescriptor::plain(format!("{}/scoreboard", SITE_API_BASE))
        .query("groups", options.groups.unwrap_or(DEFAULT_GROUPS))
        .query("seasontype", options.season_type.unwrap_or(DEFAULT_SEASON_TYPE))
        .query("limit", options.limit.unwrap_or(DEFAULT_LIMIT));

    if let Some(dates) = format_date_param(options.year, options.month, options.day) {
        target = target.query("dates", dates);
    }

    target
}

pub fn build_schedule_target(options: &ScoreboardOptions) -> TargetDescriptor {
    let mut target = TargetDescriptor::plain(format!("{}/schedule", CDN_BASE))
        .query("groups", options.groups.unwrap_or(DEFAULT_GROUPS))
        .query("xhr", 1)
        .query("render", "false");

    if let Some(dates) = format_date_param(options.year, options.month, options.day) {
        target = target.query("dates", dates);
    }

    target
}

/// The cdn endpoints wrap their payload in a `gamepackageJSON` envelope.
fn extract_gamepackage(raw: Value) -> Result<Value> {
    raw.get("gamepackageJSON")
        .cloned()
        .context("missing gamepackageJSON in response")
}

pub fn extract_box_score(raw: Value) -> Result<Value> {
    extract_gamepackage(raw)?
        .get("boxscore")
        .cloned()
        .context("missing boxscore in game package")
}

pub fn extract_picks(raw: Value) -> Result<Value> {
    extract_gamepackage(raw)?
        .get("pickcenter")
        .cloned()
        .context("missing pickcenter in game package")
}

pub fn extract_schedule(raw: Value) -> Result<Value> {
    raw.get("content")
        .and_then(|content| content.get("schedule"))
        .cloned()
        .context("missing schedule content in response")
}

/// Full play-by-play feed for one game.
pub async fn get_play_by_play(http: &HttpFetcher, game_id: u64) -> Result<Value> {
    let raw = http.fetch_json(&build_play_by_play_target(game_id)).await?;
    extract_gamepackage(raw)
}

/// Team and player box score for one game.
pub async fn get_box_score(http: &HttpFetcher, game_id: u64) -> Result<Value> {
    let raw = http.fetch_json(&build_box_score_target(game_id)).await?;
    extract_box_score(raw)
}

/// Game summary: header, leaders, news, and win probability.
pub async fn get_game_summary(http: &HttpFetcher, game_id: u64) -> Result<Value> {
    http.fetch_json(&build_summary_target(game_id)).await
}

/// Pick-center odds and predictions for one game.
pub async fn get_picks(http: &HttpFetcher, game_id: u64) -> Result<Value> {
    let raw = http.fetch_json(&build_picks_target(game_id)).await?;
    extract_picks(raw)
}

/// Scoreboard for a date (or the current slate when no date is given).
pub async fn get_scoreboard(http: &HttpFetcher, options: &ScoreboardOptions) -> Result<Value> {
    http.fetch_json(&build_scoreboard_target(options)).await
}

/// Weekly schedule grid.
pub async fn get_schedule(http: &HttpFetcher, options: &ScoreboardOptions) -> Result<Value> {
    let raw = http.fetch_json(&build_schedule_target(options)).await?;
    extract_schedule(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query_value<'a>(target: &'a TargetDescriptor, key: &str) -> Option<&'a str> {
        target
            .query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_scoreboard_target_defaults() {
        let target = build_scoreboard_target(&ScoreboardOptions::default());
        assert_eq!(query_value(&target, "groups"), Some("80"));
        assert_eq!(query_value(&target, "seasontype"), Some("2"));
        assert_eq!(query_value(&target, "limit"), Some("300"));
        assert_eq!(query_value(&target, "dates"), None);
    }

    #[test]
    fn test_scoreboard_target_includes_padded_date() {
        let options = ScoreboardOptions {
            year: Some(2019),
            month: Some(1),
            day: Some(5),
            ..ScoreboardOptions::default()
        };
        let target = build_scoreboard_target(&options);
        assert_eq!(query_value(&target, "dates"), Some("20190105"));
    }

    #[test]
    fn test_scoreboard_target_omits_partial_date() {
        let options = ScoreboardOptions {
            year: Some(2019),
            month: Some(11),
            ..ScoreboardOptions::default()
        };
        let target = build_scoreboard_target(&options);
        assert_eq!(query_value(&target, "dates"), None);
    }

    #[test]
    fn test_cdn_target_shape() {
        let target = build_play_by_play_target(401132983);
        assert_eq!(target.url, "https://cdn.espn.com/core/college-football/playbyplay");
        assert_eq!(query_value(&target, "gameId"), Some("401132983"));
        assert_eq!(query_value(&target, "xhr"), Some("1"));
    }

    #[test]
    fn test_extract_picks_from_game_package() {
        let raw = json!({
            "gamepackageJSON": {
                "pickcenter": [{"provider": {"name": "consensus"}, "spread": -7.5}]
            }
        });
        let picks = extract_picks(raw).unwrap();
        assert_eq!(picks[0]["spread"], json!(-7.5));
    }

    #[test]
    fn test_extract_picks_missing_key_is_fatal() {
        assert!(extract_picks(json!({"gamepackageJSON": {}})).is_err());
        assert!(extract_picks(json!({})).is_err());
    }

    #[test]
    fn test_extract_schedule() {
        let raw = json!({"content": {"schedule": {"20191116": {"games": []}}}});
        let schedule = extract_schedule(raw).unwrap();
        assert!(schedule.get("20191116").is_some());
    }
}
