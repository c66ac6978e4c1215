use serde::{Deserialize, Serialize};

/// One prospect row from a recruiting ranking, normalized across vendors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    /// 1-based overall rank. Vendors without a reliable displayed rank get
    /// a positional backfill: `1 + page_size * (page - 1) + row_index`.
    pub rank: usize,
    pub name: String,
    pub high_school: String,
    pub position: String,
    /// Height as displayed by the vendor, e.g. "6-2".
    pub height: String,
    /// Weight in pounds, when the vendor publishes one.
    pub weight: Option<u32>,
    /// Star rating, 0 through 5.
    pub star_rating: u32,
    /// Vendor composite score, kept verbatim (formats differ per vendor).
    pub score: Option<String>,
    /// Committed school, or "uncommitted" when the vendor shows none, or
    /// "unknown" when the commitment block could not be read.
    pub committed_school: String,
}

/// One school row from a team recruiting ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSchool {
    pub rank: usize,
    pub school: String,
    pub total_commits: Option<u32>,
    pub average_rating: Option<f64>,
    /// Vendor ranking points, kept verbatim.
    pub points: Option<String>,
}

/// One commitment row from a school's recruiting class page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub name: String,
    pub high_school: String,
    pub position: String,
    pub height: String,
    pub weight: Option<u32>,
    pub star_rating: u32,
    pub rating: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_player_serializes_camel_case() {
        let player = RankedPlayer {
            rank: 51,
            name: "Sample Player".to_string(),
            high_school: "Central HS".to_string(),
            position: "QB".to_string(),
            height: "6-2".to_string(),
            weight: Some(195),
            star_rating: 4,
            score: Some("0.9812".to_string()),
            committed_school: "uncommitted".to_string(),
        };

        let json = serde_json::to_value(&player).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "committedSchool",
                "height",
                "highSchool",
                "name",
                "position",
                "rank",
                "score",
                "starRating",
                "weight"
            ]
        );
    }
}
