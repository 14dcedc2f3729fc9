use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};

use crate::http_client::http_client;
use crate::state::{MatchRecord, TeamRecord};

const SHEET_BASE: &str =
    "https://docs.google.com/spreadsheets/d/1qWODf41ji57p3BB1gmIZ1tvHSfHNUOPR71iX3QVdTMc/gviz/tq?tqx=out:csv";

pub fn fetch_matches() -> Result<Vec<MatchRecord>> {
    let url = url_env_or_default("MATCHES_CSV_URL", &format!("{SHEET_BASE}&sheet=Matches"));
    let raw = fetch_csv(&url).context("match sheet fetch failed")?;
    Ok(parse_match_csv(&raw))
}

pub fn fetch_teams() -> Result<HashMap<String, TeamRecord>> {
    let url = url_env_or_default("TEAMS_CSV_URL", &format!("{SHEET_BASE}&sheet=TeamData"));
    let raw = fetch_csv(&url).context("team sheet fetch failed")?;
    Ok(parse_team_csv(&raw))
}

fn fetch_csv(url: &str) -> Result<String> {
    let client = http_client()?;
    let response = client.get(url).send().context("request failed")?;
    let response = response
        .error_for_status()
        .context("sheet endpoint returned an error status")?;
    response.text().context("failed to read response body")
}

fn url_env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Positional parse of the match sheet: the first line is a header and is
/// discarded unconditionally, every remaining line becomes a record. Fields
/// past the third are ignored, missing fields come back blank. A trailing
/// newline therefore yields one all-blank record; the sheet we consume does
/// not correct for that and neither do we.
pub fn parse_match_csv(raw: &str) -> Vec<MatchRecord> {
    raw.split('\n')
        .skip(1)
        .map(|line| {
            let mut fields = line.split(',');
            MatchRecord {
                id: next_field(&mut fields),
                team_a: next_field(&mut fields),
                team_b: next_field(&mut fields),
            }
        })
        .collect()
}

/// Positional parse of the team sheet, same policy as [`parse_match_csv`].
/// The first field keys the map; duplicate ids keep the last row seen.
pub fn parse_team_csv(raw: &str) -> HashMap<String, TeamRecord> {
    let mut teams = HashMap::new();
    for line in raw.split('\n').skip(1) {
        let mut fields = line.split(',');
        let id = next_field(&mut fields);
        let record = TeamRecord {
            name: next_field(&mut fields),
            founded: next_field(&mut fields),
            town: next_field(&mut fields),
            state: next_field(&mut fields),
            robot: next_field(&mut fields),
            kind: next_field(&mut fields),
        };
        teams.insert(id, record);
    }
    teams
}

fn next_field<'a>(fields: &mut impl Iterator<Item = &'a str>) -> String {
    fields.next().unwrap_or("").to_string()
}
