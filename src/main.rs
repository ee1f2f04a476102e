use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nflviz_export::{schedule_fetch, team_games, viz_export};

const OUTPUT_FILE: &str = "nfl_data.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rows = schedule_fetch::load_games(schedule_fetch::GAMES_CSV_URL)?;
    let games = team_games::expand_rows(&rows);
    let bundle = viz_export::build_bundle(games)?;
    viz_export::write_bundle(Path::new(OUTPUT_FILE), &bundle)?;

    let meta = &bundle.metadata;
    println!("Data exported successfully!");
    println!("Total games: {}", meta.total_games);
    println!("Teams: {}", meta.teams.len());
    println!("Seasons: {} - {}", meta.min_season, meta.max_season);

    Ok(())
}
