//! Team-centric ESPN operations: team list, single team, roster,
//! conferences, and standings.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::http::HttpFetcher;
use crate::request::{TargetDescriptor, DEFAULT_GROUPS, DEFAULT_LIMIT};

const SITE_API_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports/football/college-football";
const STANDINGS_BASE: &str = "https://site.web.api.espn.com/apis/v2/sports/football/college-football/standings";

pub fn build_teams_target(limit: Option<u32>) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/teams", SITE_API_BASE))
        .query("limit", limit.unwrap_or(DEFAULT_LIMIT))
}

pub fn build_team_target(team_id: u64) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/teams/{}", SITE_API_BASE, team_id))
}

pub fn build_roster_target(team_id: u64) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/teams/{}/roster", SITE_API_BASE, team_id))
        .query("enable", "roster")
}

pub fn build_conferences_target(groups: Option<u32>) -> TargetDescriptor {
    TargetDescriptor::plain(format!("{}/scoreboard/conferences", SITE_API_BASE))
        .query("groups", groups.unwrap_or(DEFAULT_GROUPS))
}

pub fn build_standings_target(season: Option<u16>, group: Option<u32>) -> TargetDescriptor {
    let mut target = TargetDescriptor::plain(STANDINGS_BASE)
        .query("region", "us")
        .query("lang", "en")
        .query("group", group.unwrap_or(DEFAULT_GROUPS));

    if let Some(season) = season {
        target = target.query("season", season);
    }

    target
}

/// The team list nests under `sports[0].leagues[0].teams`.
pub fn extract_team_list(raw: Value) -> Result<Value> {
    raw.get("sports")
        .and_then(|sports| sports.get(0))
        .and_then(|sport| sport.get("leagues"))
        .and_then(|leagues| leagues.get(0))
        .and_then(|league| league.get("teams"))
        .cloned()
        .context("missing teams list in response")
}

pub fn extract_team(raw: Value) -> Result<Value> {
    raw.get("team").cloned().context("missing team in response")
}

pub fn extract_conferences(raw: Value) -> Result<Value> {
    raw.get("conferences")
        .cloned()
        .context("missing conferences in response")
}

/// All FBS teams.
pub async fn get_teams(http: &HttpFetcher, limit: Option<u32>) -> Result<Value> {
    let raw = http.fetch_json(&build_teams_target(limit)).await?;
    extract_team_list(raw)
}

/// A single team with record and links.
pub async fn get_team(http: &HttpFetcher, team_id: u64) -> Result<Value> {
    let raw = http.fetch_json(&build_team_target(team_id)).await?;
    extract_team(raw)
}

/// A team's current roster, grouped by position.
pub async fn get_roster(http: &HttpFetcher, team_id: u64) -> Result<Value> {
    let raw = http.fetch_json(&build_roster_target(team_id)).await?;
    extract_team(raw)
}

/// Conference groupings for the scoreboard filters.
pub async fn get_conferences(http: &HttpFetcher, groups: Option<u32>) -> Result<Value> {
    let raw = http.fetch_json(&build_conferences_target(groups)).await?;
    extract_conferences(raw)
}

/// Conference standings, optionally for a past season.
pub async fn get_standings(
    http: &HttpFetcher,
    season: Option<u16>,
    group: Option<u32>,
) -> Result<Value> {
    http.fetch_json(&build_standings_target(season, group)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roster_target_enables_roster() {
        let target = build_roster_target(130);
        assert!(target.url.ends_with("/teams/130/roster"));
        assert!(target
            .query
            .contains(&("enable".to_string(), "roster".to_string())));
    }

    #[test]
    fn test_extract_team_list() {
        let raw = json!({
            "sports": [{
                "leagues": [{
                    "teams": [{"team": {"id": "130", "displayName": "Michigan Wolverines"}}]
                }]
            }]
        });
        let teams = extract_team_list(raw).unwrap();
        assert_eq!(teams[0]["team"]["id"], json!("130"));
    }

    #[test]
    fn test_extract_team_list_missing_is_fatal() {
        assert!(extract_team_list(json!({"sports": []})).is_err());
    }

    #[test]
    fn test_standings_target_optional_season() {
        let target = build_standings_target(None, None);
        assert!(!target.query.iter().any(|(k, _)| k == "season"));

        let target = build_standings_target(Some(2019), Some(81));
        assert!(target.query.contains(&("season".to_string(), "2019".to_string())));
        assert!(target.query.contains(&("group".to_string(), "81".to_string())));
    }
}
