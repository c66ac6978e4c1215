use serde::{Deserialize, Serialize};

/// How the target's content must be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// A single HTTP GET is enough; the document arrives fully formed.
    PlainFetch,
    /// The rows only exist after client-side rendering; the target must be
    /// loaded in a headless browser and scrolled until its list fills in.
    BrowserRendered,
}

/// Everything needed to acquire one page of content. Built fresh per call,
/// immutable once built, discarded after use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub mode: RenderMode,
}

impl TargetDescriptor {
    pub fn plain(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            mode: RenderMode::PlainFetch,
        }
    }

    /// Browser-rendered targets carry no query string; their URLs are fully
    /// parameterized by path segments.
    pub fn browser_rendered(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            mode: RenderMode::BrowserRendered,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// Per-operation defaults shared across the ESPN endpoints.
pub const DEFAULT_PAGE: usize = 1;
/// Group 80 is the FBS (top-tier) division.
pub const DEFAULT_GROUPS: u32 = 80;
/// Season type 2 is the regular season.
pub const DEFAULT_SEASON_TYPE: u32 = 2;
pub const DEFAULT_LIMIT: u32 = 300;
pub const DEFAULT_INSTITUTION_GROUP: &str = "HighSchool";

/// Format a (year, month, day) triple as the fixed-width `dates` parameter
/// the scoreboard and schedule endpoints expect, e.g. (2019, 11, 16) ->
/// "20191116". Returns `None` unless all three components are present; a
/// partial date is never sent upstream.
pub fn format_date_param(year: Option<u16>, month: Option<u8>, day: Option<u8>) -> Option<String> {
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => Some(format!("{:04}{:02}{:02}", y, m, d)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_param_zero_padding() {
        assert_eq!(
            format_date_param(Some(2019), Some(11), Some(16)),
            Some("20191116".to_string())
        );
        assert_eq!(
            format_date_param(Some(2019), Some(1), Some(5)),
            Some("20190105".to_string())
        );
    }

    #[test]
    fn test_date_param_requires_full_triple() {
        assert_eq!(format_date_param(Some(2019), Some(11), None), None);
        assert_eq!(format_date_param(Some(2019), None, Some(16)), None);
        assert_eq!(format_date_param(None, Some(11), Some(16)), None);
        assert_eq!(format_date_param(None, None, None), None);
    }

    #[test]
    fn test_browser_targets_carry_no_query() {
        let target = TargetDescriptor::browser_rendered("https://n.rivals.com/prospect_rankings/rivals250/2020");
        assert_eq!(target.mode, RenderMode::BrowserRendered);
        assert!(target.query.is_empty());

        let plain = TargetDescriptor::plain("https://example.com").query("page", 2);
        assert_eq!(plain.mode, RenderMode::PlainFetch);
        assert_eq!(plain.query, vec![("page".to_string(), "2".to_string())]);
    }
}
