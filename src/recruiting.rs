//! Recruiting rankings across three vendors: 247Sports (server-rendered
//! HTML), Rivals (client-rendered, acquired through the headless browser),
//! and the ESPN recruiting feed (JSON).
//!
//! Vendor choice is an explicit [`RankingService`] value parsed once from
//! caller input; an unrecognized identifier fails before any network
//! activity. HTML extraction degrades silently per field, but rows that
//! yield neither a name nor a rating are dropped as decorative.

use anyhow::{Context, Result};
use chrono::Datelike;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::browser::{fetch_rendered, ScrollSettings};
use crate::http::HttpFetcher;
use crate::models::{Commit, RankedPlayer, RankedSchool};
use crate::request::{TargetDescriptor, DEFAULT_INSTITUTION_GROUP, DEFAULT_PAGE};

/// Recruiting sites paginate at 50 rows per page.
pub const SITE_PAGE_SIZE: usize = 50;
/// The ESPN recruiting feed paginates at 25.
pub const ESPN_FEED_PAGE_SIZE: usize = 25;

const TWO_FOUR_SEVEN_BASE: &str = "https://247sports.com";
const RIVALS_BASE: &str = "https://n.rivals.com";
const ESPN_RECRUITING_URL: &str =
    "https://site.web.api.espn.com/apis/common/v3/sports/football/recruiting/rankings";

/// Row selector for the Rivals prospect list; also what the scroll loop
/// counts while the page lazily loads.
const RIVALS_PLAYER_ROW: &str = "div.prospect-item";
const RIVALS_SCHOOL_ROW: &str = "div.team-rank-item";

/// The supported ranking vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingService {
    #[serde(rename = "247sports")]
    TwoFourSeven,
    Rivals,
    Espn,
}

impl FromStr for RankingService {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "247sports" | "247" => Ok(Self::TwoFourSeven),
            "rivals" => Ok(Self::Rivals),
            "espn" => Ok(Self::Espn),
            other => anyhow::bail!("Unrecognized ranking service: {other}"),
        }
    }
}

/// Recruiting classes are identified by the year they sign; mid-season that
/// is the next calendar year.
pub fn default_class_year() -> u16 {
    (chrono::Local::now().year() + 1) as u16
}

/// Parameters for the player/school ranking lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitingOptions {
    pub service: RankingService,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub page: Option<usize>,
}

impl RecruitingOptions {
    pub fn new(service: RankingService) -> Self {
        Self {
            service,
            year: None,
            page: None,
        }
    }

    fn year(&self) -> u16 {
        self.year.unwrap_or_else(default_class_year)
    }

    fn page(&self) -> usize {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }
}

/// Parameters for a school's commitment list (247Sports only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsOptions {
    pub service: RankingService,
    pub school: String,
    #[serde(default)]
    pub year: Option<u16>,
}

/// Positional rank for vendors without a reliable displayed rank:
/// `1 + page_size * (page - 1) + row_index`, for a 1-based page.
pub fn backfill_rank(page_size: usize, page: usize, row_index: usize) -> usize {
    1 + page_size * (page.max(1) - 1) + row_index
}

pub fn build_player_rankings_target(options: &RecruitingOptions) -> TargetDescriptor {
    match options.service {
        RankingService::TwoFourSeven => TargetDescriptor::plain(format!(
            "{}/Season/{}-Football/CompositeRecruitRankings/",
            TWO_FOUR_SEVEN_BASE,
            options.year()
        ))
        .query("InstitutionGroup", DEFAULT_INSTITUTION_GROUP)
        .query("Page", options.page()),
        RankingService::Rivals => TargetDescriptor::browser_rendered(format!(
            "{}/prospect_rankings/rivals250/{}",
            RIVALS_BASE,
            options.year()
        )),
        RankingService::Espn => TargetDescriptor::plain(ESPN_RECRUITING_URL)
            .query("class", options.year())
            .query("page", options.page())
            .query("institutionGroup", DEFAULT_INSTITUTION_GROUP),
    }
}

pub fn build_school_rankings_target(options: &RecruitingOptions) -> Result<TargetDescriptor> {
    match options.service {
        RankingService::TwoFourSeven => Ok(TargetDescriptor::plain(format!(
            "{}/Season/{}-Football/CompositeTeamRankings/",
            TWO_FOUR_SEVEN_BASE,
            options.year()
        ))
        .query("Page", options.page())),
        RankingService::Rivals => Ok(TargetDescriptor::browser_rendered(format!(
            "{}/team_rankings/{}",
            RIVALS_BASE,
            options.year()
        ))),
        RankingService::Espn => {
            anyhow::bail!("School rankings are not available from espn")
        }
    }
}

pub fn build_commits_target(options: &CommitsOptions) -> Result<TargetDescriptor> {
    match options.service {
        RankingService::TwoFourSeven => {
            let slug = options.school.trim().to_lowercase().replace(' ', "-");
            Ok(TargetDescriptor::plain(format!(
                "{}/college/{}/Season/{}-Football/Commits/",
                TWO_FOUR_SEVEN_BASE,
                slug,
                options.year.unwrap_or_else(default_class_year)
            )))
        }
        service => anyhow::bail!("School commitments are not available from {service:?}"),
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| anyhow::anyhow!("Failed to parse selector {selector}: {e:?}"))
}

fn select_text(row: &ElementRef, selector: &Selector) -> Option<String> {
    row.select(selector).next().and_then(|el| {
        let text: String = el.text().collect();
        let text = text.trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    })
}

/// Split a "6-2 / 190" metrics cell into height text and weight pounds.
fn split_metrics(metrics: Option<String>) -> (String, Option<u32>) {
    let Some(metrics) = metrics else {
        return (String::new(), None);
    };

    let re = match Regex::new(r"^\s*([^/]+?)\s*/\s*(\d+)") {
        Ok(re) => re,
        Err(_) => return (metrics.trim().to_string(), None),
    };

    match re.captures(&metrics) {
        Some(caps) => (
            caps[1].to_string(),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ),
        None => (metrics.trim().to_string(), None),
    }
}

/// Extract players from a 247Sports composite-rankings page.
///
/// Rows that yield neither a name nor a rating are header/decoration rows
/// matched by the same selector and are dropped.
pub fn extract_247_players(html: &str, page: usize) -> Result<Vec<RankedPlayer>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("li.rankings-page__list-item")?;
    let name_sel = parse_selector("a.rankings-page__name-link")?;
    let meta_sel = parse_selector("span.meta")?;
    let position_sel = parse_selector("div.position")?;
    let metrics_sel = parse_selector("div.metrics")?;
    let score_sel = parse_selector("span.score")?;
    let star_sel = parse_selector("span.icon-starsolid.yellow")?;
    let commit_sel = parse_selector("div.status img")?;

    let mut players = Vec::new();

    for row in document.select(&row_sel) {
        let name = select_text(&row, &name_sel);
        let score = select_text(&row, &score_sel);

        // Name + rating filter: decorative rows carry neither.
        let (Some(name), Some(score)) = (name, score) else {
            continue;
        };

        let (height, weight) = split_metrics(select_text(&row, &metrics_sel));
        let committed_school = match row.select(&commit_sel).next() {
            Some(img) => match img.value().attr("alt").map(str::trim) {
                Some(alt) if !alt.is_empty() => alt.to_string(),
                _ => "unknown".to_string(),
            },
            None => "uncommitted".to_string(),
        };

        players.push(RankedPlayer {
            rank: backfill_rank(SITE_PAGE_SIZE, page, players.len()),
            name,
            high_school: select_text(&row, &meta_sel).unwrap_or_default(),
            position: select_text(&row, &position_sel).unwrap_or_default(),
            height,
            weight,
            star_rating: row.select(&star_sel).count() as u32,
            score: Some(score),
            committed_school,
        });
    }

    Ok(players)
}

/// Extract players from a rendered Rivals prospect list.
pub fn extract_rivals_players(html: &str) -> Result<Vec<RankedPlayer>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector(RIVALS_PLAYER_ROW)?;
    let name_sel = parse_selector("a.prospect-name")?;
    let school_sel = parse_selector("span.prospect-high-school")?;
    let position_sel = parse_selector("span.prospect-position")?;
    let height_sel = parse_selector("span.prospect-height")?;
    let weight_sel = parse_selector("span.prospect-weight")?;
    let rating_sel = parse_selector("span.prospect-rating")?;
    let star_sel = parse_selector("span.star.filled")?;
    let commit_sel = parse_selector("a.prospect-commit")?;

    let mut players = Vec::new();

    for row in document.select(&row_sel) {
        let name = select_text(&row, &name_sel);
        let rating = select_text(&row, &rating_sel);

        let (Some(name), Some(rating)) = (name, rating) else {
            continue;
        };

        // The rivals250 list is one continuously-scrolled page.
        players.push(RankedPlayer {
            rank: backfill_rank(SITE_PAGE_SIZE, 1, players.len()),
            name,
            high_school: select_text(&row, &school_sel).unwrap_or_default(),
            position: select_text(&row, &position_sel).unwrap_or_default(),
            height: select_text(&row, &height_sel).unwrap_or_default(),
            weight: select_text(&row, &weight_sel).and_then(|w| w.parse().ok()),
            star_rating: row.select(&star_sel).count() as u32,
            score: Some(rating),
            committed_school: select_text(&row, &commit_sel)
                .unwrap_or_else(|| "uncommitted".to_string()),
        });
    }

    Ok(players)
}

/// Extract players from one page of the ESPN recruiting feed.
///
/// The feed's displayed rank attribute is unreliable upstream, so rank is
/// always the positional backfill at the feed's 25-row page size.
pub fn extract_espn_players(raw: &Value, page: usize) -> Result<Vec<RankedPlayer>> {
    let items = raw
        .get("items")
        .and_then(Value::as_array)
        .context("missing items in recruiting feed")?;

    let mut players = Vec::new();

    for item in items {
        let athlete = item.get("athlete").context("missing athlete in feed item")?;
        let name = athlete
            .get("displayName")
            .and_then(Value::as_str)
            .context("missing athlete displayName in feed item")?
            .to_string();

        let committed_school = item
            .get("status")
            .and_then(|s| s.get("college"))
            .and_then(|c| c.get("displayName"))
            .and_then(Value::as_str)
            .unwrap_or("uncommitted")
            .to_string();

        players.push(RankedPlayer {
            rank: backfill_rank(ESPN_FEED_PAGE_SIZE, page, players.len()),
            name,
            high_school: athlete
                .get("highSchool")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            position: athlete
                .get("position")
                .and_then(|p| p.get("abbreviation"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            height: athlete
                .get("height")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            weight: athlete
                .get("weight")
                .and_then(Value::as_u64)
                .map(|w| w as u32),
            star_rating: item.get("stars").and_then(Value::as_u64).unwrap_or(0) as u32,
            score: item
                .get("grade")
                .and_then(Value::as_str)
                .map(str::to_string),
            committed_school,
        });
    }

    Ok(players)
}

/// Extract schools from a 247Sports team-rankings page.
pub fn extract_247_schools(html: &str, page: usize) -> Result<Vec<RankedSchool>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("li.rankings-page__list-item")?;
    let name_sel = parse_selector("a.rankings-page__name-link")?;
    let rank_sel = parse_selector("div.rank-column div.primary")?;
    let total_sel = parse_selector("div.total a")?;
    let avg_sel = parse_selector("div.avg")?;
    let points_sel = parse_selector("a.number")?;

    let mut schools = Vec::new();

    for row in document.select(&row_sel) {
        let school = select_text(&row, &name_sel);
        let points = select_text(&row, &points_sel);

        let (Some(school), Some(points)) = (school, points) else {
            continue;
        };

        let rank = select_text(&row, &rank_sel)
            .and_then(|r| r.parse().ok())
            .unwrap_or_else(|| backfill_rank(SITE_PAGE_SIZE, page, schools.len()));

        schools.push(RankedSchool {
            rank,
            school,
            total_commits: select_text(&row, &total_sel)
                .and_then(|t| t.split_whitespace().next().and_then(|n| n.parse().ok())),
            average_rating: select_text(&row, &avg_sel).and_then(|a| a.parse().ok()),
            points: Some(points),
        });
    }

    Ok(schools)
}

/// Extract schools from a rendered Rivals team-rankings page.
pub fn extract_rivals_schools(html: &str) -> Result<Vec<RankedSchool>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector(RIVALS_SCHOOL_ROW)?;
    let rank_sel = parse_selector("span.team-rank")?;
    let name_sel = parse_selector("a.team-name")?;
    let commits_sel = parse_selector("span.team-commits")?;
    let points_sel = parse_selector("span.team-points")?;

    let mut schools = Vec::new();

    for row in document.select(&row_sel) {
        let school = select_text(&row, &name_sel);
        let points = select_text(&row, &points_sel);

        let (Some(school), Some(points)) = (school, points) else {
            continue;
        };

        let rank = select_text(&row, &rank_sel)
            .and_then(|r| r.parse().ok())
            .unwrap_or_else(|| backfill_rank(SITE_PAGE_SIZE, 1, schools.len()));

        schools.push(RankedSchool {
            rank,
            school,
            total_commits: select_text(&row, &commits_sel).and_then(|c| c.parse().ok()),
            average_rating: None,
            points: Some(points),
        });
    }

    Ok(schools)
}

/// Extract commitments from a 247Sports school class page.
pub fn extract_247_commits(html: &str) -> Result<Vec<Commit>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("li.ri-page__list-item")?;
    let name_sel = parse_selector("a.ri-page__name-link")?;
    let meta_sel = parse_selector("span.meta")?;
    let position_sel = parse_selector("div.position")?;
    let metrics_sel = parse_selector("div.metrics")?;
    let score_sel = parse_selector("span.score")?;
    let star_sel = parse_selector("span.icon-starsolid.yellow")?;

    let mut commits = Vec::new();

    for row in document.select(&row_sel) {
        let name = select_text(&row, &name_sel);
        let rating = select_text(&row, &score_sel);

        let (Some(name), Some(rating)) = (name, rating) else {
            continue;
        };

        let (height, weight) = split_metrics(select_text(&row, &metrics_sel));

        commits.push(Commit {
            name,
            high_school: select_text(&row, &meta_sel).unwrap_or_default(),
            position: select_text(&row, &position_sel).unwrap_or_default(),
            height,
            weight,
            star_rating: row.select(&star_sel).count() as u32,
            rating: Some(rating),
        });
    }

    Ok(commits)
}

/// Player rankings for a recruiting class, from the chosen vendor.
pub async fn get_player_rankings(
    http: &HttpFetcher,
    options: &RecruitingOptions,
) -> Result<Vec<RankedPlayer>> {
    let target = build_player_rankings_target(options);

    match options.service {
        RankingService::TwoFourSeven => {
            let html = http.fetch_text(&target).await?;
            extract_247_players(&html, options.page())
        }
        RankingService::Rivals => {
            let html =
                fetch_rendered(&target.url, RIVALS_PLAYER_ROW, &ScrollSettings::default()).await?;
            extract_rivals_players(&html)
        }
        RankingService::Espn => {
            let raw = http.fetch_json(&target).await?;
            extract_espn_players(&raw, options.page())
        }
    }
}

/// Team recruiting-class rankings, from 247Sports or Rivals.
pub async fn get_school_rankings(
    http: &HttpFetcher,
    options: &RecruitingOptions,
) -> Result<Vec<RankedSchool>> {
    let target = build_school_rankings_target(options)?;

    match options.service {
        RankingService::TwoFourSeven => {
            let html = http.fetch_text(&target).await?;
            extract_247_schools(&html, options.page())
        }
        RankingService::Rivals => {
            // Team lists top out around a hundred rows; no need to scroll
            // for the full player target.
            let settings = ScrollSettings {
                target_rows: 100,
                ..ScrollSettings::default()
            };
            let html = fetch_rendered(&target.url, RIVALS_SCHOOL_ROW, &settings).await?;
            extract_rivals_schools(&html)
        }
        RankingService::Espn => unreachable!("rejected by build_school_rankings_target"),
    }
}

/// A school's commitment list for a recruiting class (247Sports).
pub async fn get_school_commits(
    http: &HttpFetcher,
    options: &CommitsOptions,
) -> Result<Vec<Commit>> {
    let target = build_commits_target(options)?;
    let html = http.fetch_text(&target).await?;
    extract_247_commits(&html)
}
