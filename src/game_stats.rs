use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::team_games::TeamGame;

/// Season extremes over the filtered table, computed once and reused for
/// every record's depth coordinate.
#[derive(Debug, Clone, Copy)]
pub struct SeasonBounds {
    pub min_season: i32,
    pub max_season: i32,
}

impl SeasonBounds {
    /// Returns `None` for an empty table, where the bounds are undefined.
    pub fn from_games(games: &[TeamGame]) -> Option<Self> {
        let mut seasons = games.iter().map(|g| g.season);
        let first = seasons.next()?;
        let (min_season, max_season) = seasons.fold((first, first), |(min, max), s| {
            (min.min(s), max.max(s))
        });
        Some(SeasonBounds {
            min_season,
            max_season,
        })
    }

    /// Span of seasons, floored at 1 so a single-season dataset does not
    /// divide by zero (every depth is then 0).
    pub fn season_range(&self) -> f64 {
        f64::from((self.max_season - self.min_season).max(1))
    }

    /// Normalized plot depth in [0, 100].
    pub fn depth(&self, season: i32) -> f64 {
        f64::from(season - self.min_season) / self.season_range() * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStats {
    pub avg_points_scored: f64,
    pub avg_points_allowed: f64,
    pub total_games: usize,
    pub seasons: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonStats {
    pub avg_points_scored: f64,
    pub avg_points_allowed: f64,
    pub avg_total_points: f64,
    pub total_games: usize,
}

#[derive(Default)]
struct TeamAccumulator {
    scored: f64,
    allowed: f64,
    count: usize,
    seasons: BTreeSet<i32>,
}

#[derive(Default)]
struct SeasonAccumulator {
    scored: f64,
    allowed: f64,
    total: f64,
    count: usize,
}

/// Per-team grouped means in one linear pass: running sums and counts per
/// team, finalized by division.
pub fn team_stats(games: &[TeamGame]) -> BTreeMap<String, TeamStats> {
    let mut acc: HashMap<&str, TeamAccumulator> = HashMap::new();
    for game in games {
        let entry = acc.entry(game.team.as_str()).or_default();
        entry.scored += game.points_scored;
        entry.allowed += game.points_allowed;
        entry.count += 1;
        entry.seasons.insert(game.season);
    }

    acc.into_iter()
        .map(|(team, a)| {
            let n = a.count as f64;
            (
                team.to_string(),
                TeamStats {
                    avg_points_scored: a.scored / n,
                    avg_points_allowed: a.allowed / n,
                    total_games: a.count,
                    seasons: a.seasons.into_iter().collect(),
                },
            )
        })
        .collect()
}

/// Per-season grouped means; the BTreeMap keeps keys in ascending order.
pub fn season_stats(games: &[TeamGame]) -> BTreeMap<i32, SeasonStats> {
    let mut acc: BTreeMap<i32, SeasonAccumulator> = BTreeMap::new();
    for game in games {
        let entry = acc.entry(game.season).or_default();
        entry.scored += game.points_scored;
        entry.allowed += game.points_allowed;
        entry.total += game.total_points;
        entry.count += 1;
    }

    acc.into_iter()
        .map(|(season, a)| {
            let n = a.count as f64;
            (
                season,
                SeasonStats {
                    avg_points_scored: a.scored / n,
                    avg_points_allowed: a.allowed / n,
                    avg_total_points: a.total / n,
                    total_games: a.count,
                },
            )
        })
        .collect()
}
