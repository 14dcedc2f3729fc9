use std::fs;
use std::path::PathBuf;

use nepe_terminal::sheet_fetch::{parse_match_csv, parse_team_csv};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_match_fixture_in_row_order() {
    let raw = read_fixture("matches.csv");
    let matches = parse_match_csv(&raw);

    // Three data rows plus the degenerate record from the trailing newline.
    assert_eq!(matches.len(), 4);
    assert_eq!(matches[0].id, "1");
    assert_eq!(matches[0].team_a, "100");
    assert_eq!(matches[0].team_b, "200");
    assert_eq!(matches[2].id, "3");
    assert_eq!(matches[3].id, "");
    assert_eq!(matches[3].team_a, "");
    assert_eq!(matches[3].team_b, "");
}

#[test]
fn parses_team_fixture_keyed_by_id() {
    let raw = read_fixture("teams.csv");
    let teams = parse_team_csv(&raw);

    // Four data rows plus the blank-keyed entry from the trailing newline.
    assert_eq!(teams.len(), 5);

    let alpha = teams.get("100").expect("team 100 should be present");
    assert_eq!(alpha.name, "Alpha");
    assert_eq!(alpha.founded, "2012");
    assert_eq!(alpha.town, "Nashua");
    assert_eq!(alpha.state, "NH");
    assert_eq!(alpha.robot, "Crusher");
    assert_eq!(alpha.kind, "Varsity");

    let degenerate = teams.get("").expect("trailing newline yields a blank entry");
    assert_eq!(degenerate.name, "");
    assert_eq!(degenerate.kind, "");
}

#[test]
fn header_row_is_discarded_without_inspection() {
    let matches = parse_match_csv("anything,at,all\n7,500,600");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "7");
}

#[test]
fn short_rows_yield_blank_fields_not_errors() {
    let matches = parse_match_csv("Match,Red,Blue\n5,100");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "5");
    assert_eq!(matches[0].team_a, "100");
    assert_eq!(matches[0].team_b, "");

    let teams = parse_team_csv("Team,Name\n42,Echo");
    let echo = teams.get("42").expect("short team row still keyed");
    assert_eq!(echo.name, "Echo");
    assert_eq!(echo.founded, "");
    assert_eq!(echo.town, "");
}

#[test]
fn extra_fields_are_ignored() {
    let matches = parse_match_csv("Match,Red,Blue,Field,Time\n8,100,200,Field 2,09:30");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].team_b, "200");

    let teams = parse_team_csv("h\n1,N,F,T,S,R,K,extra,columns");
    assert_eq!(teams.get("1").map(|t| t.kind.as_str()), Some("K"));
}

#[test]
fn header_only_input_yields_no_records() {
    assert!(parse_match_csv("Match,Red,Blue").is_empty());
    assert!(parse_team_csv("Team,Name,Founded,Town,State,Robot,Type").is_empty());
    assert!(parse_match_csv("").is_empty());
}

#[test]
fn duplicate_team_ids_keep_the_last_row() {
    let teams = parse_team_csv("h\n9,First\n9,Second");
    assert_eq!(teams.len(), 1);
    assert_eq!(teams.get("9").map(|t| t.name.as_str()), Some("Second"));
}
