use chrono::NaiveDate;
use serde::Serialize;

use crate::schedule_fetch::GameRow;

/// Which side of the game a derived record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Location {
    Home,
    Away,
}

/// One game seen from one team's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct TeamGame {
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
}

/// Expands each complete source row into its two perspectives.
///
/// The output keeps all home-perspective records ahead of all
/// away-perspective records; downstream emission preserves this order.
/// Rows missing a score or the season are dropped before expansion, so an
/// incomplete game never yields a lone perspective.
pub fn expand_rows(rows: &[GameRow]) -> Vec<TeamGame> {
    let complete: Vec<&GameRow> = rows.iter().filter(|row| is_complete(row)).collect();
    let mut games = Vec::with_capacity(complete.len() * 2);
    for location in [Location::Home, Location::Away] {
        for row in &complete {
            games.push(perspective(row, location));
        }
    }
    games
}

fn is_complete(row: &GameRow) -> bool {
    row.season.is_some() && row.home_score.is_some() && row.away_score.is_some()
}

fn perspective(row: &GameRow, location: Location) -> TeamGame {
    // is_complete ran first; these cannot be None here.
    let home_score = row.home_score.unwrap_or_default();
    let away_score = row.away_score.unwrap_or_default();
    let (team, opponent, scored, allowed) = match location {
        Location::Home => (&row.home_team, &row.away_team, home_score, away_score),
        Location::Away => (&row.away_team, &row.home_team, away_score, home_score),
    };
    TeamGame {
        team: team.clone(),
        opponent: opponent.clone(),
        points_scored: scored,
        points_allowed: allowed,
        margin: scored - allowed,
        total_points: scored + allowed,
        season: row.season.unwrap_or_default(),
        location,
        game_type: row.game_type.clone(),
        game_date: format_game_date(&row.gameday),
    }
}

/// Normalizes a game day to ISO `YYYY-MM-DD`. A date that fails every
/// known format is passed through trimmed rather than dropping the game.
pub fn format_game_date(raw: &str) -> String {
    let trimmed = raw.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::{Location, expand_rows, format_game_date};
    use crate::schedule_fetch::GameRow;

    fn row(season: Option<i32>, home: Option<f64>, away: Option<f64>) -> GameRow {
        GameRow {
            season,
            game_type: "REG".to_string(),
            week: Some(1),
            gameday: "2020-09-13".to_string(),
            home_team: "A".to_string(),
            home_score: home,
            away_team: "B".to_string(),
            away_score: away,
        }
    }

    #[test]
    fn complete_row_yields_symmetric_perspectives() {
        let games = expand_rows(&[row(Some(2020), Some(24.0), Some(17.0))]);
        assert_eq!(games.len(), 2);

        let home = &games[0];
        assert_eq!(home.team, "A");
        assert_eq!(home.opponent, "B");
        assert_eq!(home.points_scored, 24.0);
        assert_eq!(home.points_allowed, 17.0);
        assert_eq!(home.margin, 7.0);
        assert_eq!(home.total_points, 41.0);
        assert_eq!(home.location, Location::Home);

        let away = &games[1];
        assert_eq!(away.team, "B");
        assert_eq!(away.opponent, "A");
        assert_eq!(away.points_scored, 17.0);
        assert_eq!(away.points_allowed, 24.0);
        assert_eq!(away.margin, -7.0);
        assert_eq!(away.total_points, 41.0);
        assert_eq!(away.location, Location::Away);
    }

    #[test]
    fn home_block_precedes_away_block() {
        let games = expand_rows(&[
            row(Some(2020), Some(24.0), Some(17.0)),
            row(Some(2021), Some(10.0), Some(3.0)),
        ]);
        assert_eq!(games.len(), 4);
        assert!(games[..2].iter().all(|g| g.location == Location::Home));
        assert!(games[2..].iter().all(|g| g.location == Location::Away));
    }

    #[test]
    fn incomplete_row_drops_both_perspectives() {
        let games = expand_rows(&[
            row(Some(2020), Some(24.0), None),
            row(None, Some(24.0), Some(17.0)),
        ]);
        assert!(games.is_empty());
    }

    #[test]
    fn game_date_is_iso_formatted() {
        assert_eq!(format_game_date("2020-09-13"), "2020-09-13");
        assert_eq!(format_game_date("9/13/2020"), "2020-09-13");
        assert_eq!(format_game_date(" 2020-09-13 "), "2020-09-13");
        assert_eq!(format_game_date("unknown"), "unknown");
    }
}
