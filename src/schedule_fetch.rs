use std::fs;
use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{info, warn};

/// Canonical nflverse results table, one row per game.
pub const GAMES_CSV_URL: &str =
    "https://raw.githubusercontent.com/nflverse/nfldata/master/data/games.csv";

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// One source row. Scores and season are optional because nflverse leaves
/// the cells blank for games that have not been played yet.
#[derive(Debug, Clone, Deserialize)]
pub struct GameRow {
    pub season: Option<i32>,
    pub game_type: String,
    pub week: Option<u32>,
    pub gameday: String,
    pub home_team: String,
    pub home_score: Option<f64>,
    pub away_team: String,
    pub away_score: Option<f64>,
}

/// Loads the schedule from an http(s) URL or a local file path.
///
/// Transport and reader-level failures are fatal; individual rows that do
/// not decode are dropped (the drop policy for incomplete data lives at
/// row granularity).
pub fn load_games(source: &str) -> Result<Vec<GameRow>> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_csv(source)?
    } else {
        fs::read_to_string(source).with_context(|| format!("read schedule file {source}"))?
    };
    let rows = parse_games_csv(body.as_bytes())?;
    info!(rows = rows.len(), source, "loaded schedule");
    Ok(rows)
}

fn fetch_csv(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .with_context(|| format!("fetch schedule from {url}"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading schedule body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

/// Decodes the schedule CSV. Unknown columns are ignored; a record that
/// fails to deserialize (for example a non-numeric score cell) is logged
/// and skipped so it cannot contribute either game perspective later.
pub fn parse_games_csv<R: Read>(rdr: R) -> Result<Vec<GameRow>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<GameRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("skipping malformed schedule row: {e}"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::parse_games_csv;

    const SAMPLE: &str = "\
season,game_type,week,gameday,home_team,home_score,away_team,away_score,stadium
2020,REG,1,2020-09-13,KC,34,HOU,20,Arrowhead
2020,REG,2,2020-09-20,BAL,,CLE,6,M&T Bank
nonsense,REG,3,2020-09-27,NE,36,LV,20,Gillette
";

    #[test]
    fn parses_rows_and_ignores_extra_columns() {
        let rows = parse_games_csv(SAMPLE.as_bytes()).expect("sample should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].home_team, "KC");
        assert_eq!(rows[0].home_score, Some(34.0));
        assert_eq!(rows[0].season, Some(2020));
    }

    #[test]
    fn blank_score_is_none() {
        let rows = parse_games_csv(SAMPLE.as_bytes()).expect("sample should parse");
        assert_eq!(rows[1].home_score, None);
        assert_eq!(rows[1].away_score, Some(6.0));
    }

    #[test]
    fn malformed_record_is_dropped() {
        // The third row has a non-numeric season and must not survive.
        let rows = parse_games_csv(SAMPLE.as_bytes()).expect("sample should parse");
        assert!(rows.iter().all(|r| r.home_team != "NE"));
    }
}
