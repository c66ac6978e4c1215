// College Football Data Client
//
// A data-access library for college football statistics, aggregating the
// ESPN JSON API family and the recruiting-ranking sites (247Sports, Rivals)
// behind one uniform set of functions. Every operation is a single request:
// build a target, fetch it, extract fields, return a normalized record.

pub mod browser;
pub mod games;
pub mod http;
pub mod models;
pub mod rankings;
pub mod recruiting;
pub mod request;
pub mod teams;
pub mod user_agents;

// Re-export main types for convenience
pub use browser::{scroll_until_loaded, BrowserSession, ScrollSettings, ScrollSurface};
pub use http::HttpFetcher;
pub use models::{Commit, RankedPlayer, RankedSchool};
pub use recruiting::RankingService;
pub use request::{RenderMode, TargetDescriptor};
pub use user_agents::{get_random_user_agent, USER_AGENTS};
