use std::collections::HashMap;

use nepe_terminal::state::{apply_delta, AppState, Delta, MatchRecord, TeamRecord};

fn record(id: &str) -> MatchRecord {
    MatchRecord {
        id: id.to_string(),
        team_a: String::new(),
        team_b: String::new(),
    }
}

#[test]
fn set_matches_installs_the_collection_and_stamps_it() {
    let mut state = AppState::new();
    assert!(state.matches_fetched_at.is_none());

    apply_delta(&mut state, Delta::SetMatches(vec![record("1"), record("2")]));
    assert_eq!(state.matches.len(), 2);
    assert!(state.matches_fetched_at.is_some());
}

#[test]
fn set_matches_clamps_the_cursor_to_the_new_length() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetMatches(vec![record("1"), record("2"), record("3"), record("4")]),
    );
    state.match_cursor = 3;

    apply_delta(&mut state, Delta::SetMatches(vec![record("1"), record("2")]));
    assert_eq!(state.match_cursor, 1);

    apply_delta(&mut state, Delta::SetMatches(Vec::new()));
    assert_eq!(state.match_cursor, 0);
}

#[test]
fn set_teams_clamps_the_team_cursor() {
    let mut state = AppState::new();
    let mut teams = HashMap::new();
    for id in ["1", "2", "3"] {
        teams.insert(id.to_string(), TeamRecord::default());
    }
    apply_delta(&mut state, Delta::SetTeams(teams));
    state.team_cursor = 2;

    let mut smaller = HashMap::new();
    smaller.insert("1".to_string(), TeamRecord::default());
    apply_delta(&mut state, Delta::SetTeams(smaller));
    assert_eq!(state.team_cursor, 0);
}

#[test]
fn selection_survives_a_refresh_that_drops_the_match() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetMatches(vec![record("1"), record("2")]));
    state.select_match(record("2"));

    apply_delta(&mut state, Delta::SetMatches(vec![record("5")]));
    // The dangling selection is kept; traversal from it is a no-op.
    assert_eq!(state.selected_match.as_ref().map(|m| m.id.as_str()), Some("2"));
    state.next_match();
    assert_eq!(state.selected_match.as_ref().map(|m| m.id.as_str()), Some("2"));
}

#[test]
fn set_teams_refreshes_the_derived_order() {
    let mut state = AppState::new();
    let mut teams = HashMap::new();
    teams.insert("45".to_string(), TeamRecord::default());
    teams.insert("9".to_string(), TeamRecord::default());
    apply_delta(&mut state, Delta::SetTeams(teams));
    assert_eq!(state.sorted_team_ids(), vec!["9", "45"]);

    let mut teams = HashMap::new();
    teams.insert("100".to_string(), TeamRecord::default());
    teams.insert("45".to_string(), TeamRecord::default());
    teams.insert("9".to_string(), TeamRecord::default());
    apply_delta(&mut state, Delta::SetTeams(teams));
    assert_eq!(state.sorted_team_ids(), vec!["9", "45", "100"]);
}

#[test]
fn log_deltas_append_and_the_ring_is_capped() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
    assert_eq!(state.logs.back().map(String::as_str), Some("line 249"));
}
