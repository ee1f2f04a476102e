use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::info;

use crate::game_stats::{self, SeasonBounds, SeasonStats, TeamStats};
use crate::team_games::{Location, TeamGame};

/// One perspective record plus its 3D plot coordinates: x is points
/// scored, y is points allowed, z is the season normalized to [0, 100].
#[derive(Debug, Clone, Serialize)]
pub struct ExportedGame {
    pub team: String,
    pub opponent: String,
    pub points_scored: f64,
    pub points_allowed: f64,
    pub margin: f64,
    pub total_points: f64,
    pub season: i32,
    pub location: Location,
    pub game_type: String,
    pub game_date: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub min_season: i32,
    pub max_season: i32,
    pub total_games: usize,
    pub teams: Vec<String>,
    pub seasons: Vec<i32>,
}

/// The complete artifact consumed by the visualization.
#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub games: Vec<ExportedGame>,
    pub team_stats: BTreeMap<String, TeamStats>,
    pub season_stats: BTreeMap<i32, SeasonStats>,
    pub metadata: ExportMetadata,
}

/// Assembles the bundle from the expanded table, preserving its order in
/// `games`. Errors if no complete game survived filtering, since season
/// bounds are undefined there.
pub fn build_bundle(games: Vec<TeamGame>) -> Result<ExportBundle> {
    let bounds = SeasonBounds::from_games(&games)
        .ok_or_else(|| anyhow!("no complete games in source table"))?;

    let team_stats = game_stats::team_stats(&games);
    let season_stats = game_stats::season_stats(&games);

    let teams: Vec<String> = games
        .iter()
        .map(|g| g.team.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let seasons: Vec<i32> = games
        .iter()
        .map(|g| g.season)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let exported: Vec<ExportedGame> = games.into_iter().map(|g| export_game(g, bounds)).collect();

    let metadata = ExportMetadata {
        min_season: bounds.min_season,
        max_season: bounds.max_season,
        total_games: exported.len(),
        teams,
        seasons,
    };

    Ok(ExportBundle {
        games: exported,
        team_stats,
        season_stats,
        metadata,
    })
}

fn export_game(game: TeamGame, bounds: SeasonBounds) -> ExportedGame {
    let z = bounds.depth(game.season);
    ExportedGame {
        x: game.points_scored,
        y: game.points_allowed,
        z,
        team: game.team,
        opponent: game.opponent,
        points_scored: game.points_scored,
        points_allowed: game.points_allowed,
        margin: game.margin,
        total_points: game.total_points,
        season: game.season,
        location: game.location,
        game_type: game.game_type,
        game_date: game.game_date,
    }
}

/// Writes the bundle as pretty-printed JSON. Goes through a tmp sibling
/// and a rename so the artifact is either complete or absent.
pub fn write_bundle(path: &Path, bundle: &ExportBundle) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle).context("serialize export bundle")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write export tmp {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed writing export to {}", path.display()))?;
    info!(path = %path.display(), games = bundle.metadata.total_games, "wrote export bundle");
    Ok(())
}
