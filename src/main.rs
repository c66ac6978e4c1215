use anyhow::Result;
use clap::{Parser, Subcommand};

use cfb_data::games::{self, ScoreboardOptions};
use cfb_data::rankings::{self, RankingsOptions};
use cfb_data::recruiting::{self, CommitsOptions, RecruitingOptions};
use cfb_data::teams;
use cfb_data::HttpFetcher;

#[derive(Parser)]
#[command(name = "cfb", about = "College football data client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Args)]
struct DateArgs {
    #[arg(long)]
    year: Option<u16>,
    #[arg(long)]
    month: Option<u8>,
    #[arg(long)]
    day: Option<u8>,
    /// Division group (80 = FBS)
    #[arg(long)]
    groups: Option<u32>,
    /// Season type (2 = regular season)
    #[arg(long)]
    season_type: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<DateArgs> for ScoreboardOptions {
    fn from(args: DateArgs) -> Self {
        Self {
            year: args.year,
            month: args.month,
            day: args.day,
            groups: args.groups,
            season_type: args.season_type,
            limit: args.limit,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Play-by-play feed for a game
    PlayByPlay { game_id: u64 },
    /// Box score for a game
    BoxScore { game_id: u64 },
    /// Game summary (header, leaders, win probability)
    Summary { game_id: u64 },
    /// Pick-center odds for a game
    Picks { game_id: u64 },
    /// Scoreboard for a date or the current slate
    Scoreboard(DateArgs),
    /// Weekly schedule grid
    Schedule(DateArgs),
    /// All FBS teams
    Teams {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// A single team
    Team { team_id: u64 },
    /// A team's roster
    Roster { team_id: u64 },
    /// Conference groupings
    Conferences {
        #[arg(long)]
        groups: Option<u32>,
    },
    /// Conference standings
    Standings {
        #[arg(long)]
        season: Option<u16>,
        #[arg(long)]
        group: Option<u32>,
    },
    /// Poll rankings (AP, Coaches, CFP)
    Rankings {
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        week: Option<u8>,
    },
    /// Player recruiting rankings from 247sports, rivals, or espn
    PlayerRankings {
        #[arg(long)]
        service: String,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        page: Option<usize>,
    },
    /// Team recruiting-class rankings from 247sports or rivals
    SchoolRankings {
        #[arg(long)]
        service: String,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        page: Option<usize>,
    },
    /// A school's commitment list (247sports)
    Commits {
        #[arg(long, default_value = "247sports")]
        service: String,
        #[arg(long)]
        school: String,
        #[arg(long)]
        year: Option<u16>,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let http = HttpFetcher::new()?;

    match cli.command {
        Command::PlayByPlay { game_id } => {
            print_json(&games::get_play_by_play(&http, game_id).await?)
        }
        Command::BoxScore { game_id } => print_json(&games::get_box_score(&http, game_id).await?),
        Command::Summary { game_id } => {
            print_json(&games::get_game_summary(&http, game_id).await?)
        }
        Command::Picks { game_id } => print_json(&games::get_picks(&http, game_id).await?),
        Command::Scoreboard(args) => {
            print_json(&games::get_scoreboard(&http, &args.into()).await?)
        }
        Command::Schedule(args) => print_json(&games::get_schedule(&http, &args.into()).await?),
        Command::Teams { limit } => print_json(&teams::get_teams(&http, limit).await?),
        Command::Team { team_id } => print_json(&teams::get_team(&http, team_id).await?),
        Command::Roster { team_id } => print_json(&teams::get_roster(&http, team_id).await?),
        Command::Conferences { groups } => {
            print_json(&teams::get_conferences(&http, groups).await?)
        }
        Command::Standings { season, group } => {
            print_json(&teams::get_standings(&http, season, group).await?)
        }
        Command::Rankings { year, week } => {
            let options = RankingsOptions { year, week };
            print_json(&rankings::get_rankings(&http, &options).await?)
        }
        Command::PlayerRankings {
            service,
            year,
            page,
        } => {
            let options = RecruitingOptions {
                service: service.parse()?,
                year,
                page,
            };
            print_json(&recruiting::get_player_rankings(&http, &options).await?)
        }
        Command::SchoolRankings {
            service,
            year,
            page,
        } => {
            let options = RecruitingOptions {
                service: service.parse()?,
                year,
                page,
            };
            print_json(&recruiting::get_school_rankings(&http, &options).await?)
        }
        Command::Commits {
            service,
            school,
            year,
        } => {
            let options = CommitsOptions {
                service: service.parse()?,
                school,
                year,
            };
            print_json(&recruiting::get_school_commits(&http, &options).await?)
        }
    }
}
