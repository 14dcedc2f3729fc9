use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::time::SystemTime;

/// One row of the match schedule. Row order in the source sheet is the
/// display and traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: String,
    pub team_a: String,
    pub team_b: String,
}

/// One row of the team directory, keyed externally by team id. Fields are
/// whatever the sheet said, blank when the row was short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub name: String,
    pub founded: String,
    pub town: String,
    pub state: String,
    pub robot: String,
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Matches,
    Teams,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub matches: Vec<MatchRecord>,
    pub teams: HashMap<String, TeamRecord>,
    // At most one of these is set at a time; screen stays put while a
    // selection is active and only go_home resets it.
    pub selected_match: Option<MatchRecord>,
    pub selected_team: Option<String>,
    pub match_cursor: usize,
    pub team_cursor: usize,
    pub matches_fetched_at: Option<SystemTime>,
    pub teams_fetched_at: Option<SystemTime>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            matches: Vec::with_capacity(64),
            teams: HashMap::with_capacity(64),
            selected_match: None,
            selected_team: None,
            match_cursor: 0,
            team_cursor: 0,
            matches_fetched_at: None,
            teams_fetched_at: None,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn enter_matches(&mut self) {
        if self.screen == Screen::Home {
            self.screen = Screen::Matches;
        }
    }

    pub fn enter_teams(&mut self) {
        if self.screen == Screen::Home {
            self.screen = Screen::Teams;
        }
    }

    /// The record is trusted as-is; it is not re-validated against the
    /// current schedule.
    pub fn select_match(&mut self, record: MatchRecord) {
        self.selected_match = Some(record);
        self.selected_team = None;
    }

    /// Unknown ids are accepted; they resolve to "details not found" at
    /// render time.
    pub fn select_team(&mut self, team_id: impl Into<String>) {
        self.selected_team = Some(team_id.into());
        self.selected_match = None;
    }

    pub fn back_from_match(&mut self) {
        self.selected_match = None;
    }

    pub fn back_from_team(&mut self) {
        self.selected_team = None;
    }

    pub fn go_home(&mut self) {
        self.selected_match = None;
        self.selected_team = None;
        self.screen = Screen::Home;
    }

    pub fn next_match(&mut self) {
        self.step_match(1);
    }

    pub fn prev_match(&mut self) {
        self.step_match(-1);
    }

    // No wraparound: at a boundary, or when the current match has vanished
    // from the schedule, this is a no-op.
    fn step_match(&mut self, dir: isize) {
        let Some(current) = &self.selected_match else {
            return;
        };
        let Some(idx) = self.matches.iter().position(|m| m.id == current.id) else {
            return;
        };
        let Some(target) = idx.checked_add_signed(dir) else {
            return;
        };
        if let Some(record) = self.matches.get(target) {
            self.selected_match = Some(record.clone());
        }
    }

    pub fn next_team(&mut self) {
        self.step_team(1);
    }

    pub fn prev_team(&mut self) {
        self.step_team(-1);
    }

    fn step_team(&mut self, dir: isize) {
        let Some(current) = &self.selected_team else {
            return;
        };
        let order = self.sorted_team_ids();
        let Some(idx) = order.iter().position(|id| id == current) else {
            return;
        };
        let Some(target) = idx.checked_add_signed(dir) else {
            return;
        };
        if let Some(id) = order.get(target) {
            self.selected_team = Some(id.clone());
        }
    }

    /// Traversal order for teams, recomputed from the map on every call so it
    /// can never go stale across a refresh.
    pub fn sorted_team_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.teams.keys().cloned().collect();
        ids.sort_by(|a, b| compare_team_ids(a, b));
        ids
    }

    pub fn team(&self, team_id: &str) -> Option<&TeamRecord> {
        self.teams.get(team_id)
    }

    pub fn selected_team_record(&self) -> Option<&TeamRecord> {
        self.selected_team.as_deref().and_then(|id| self.teams.get(id))
    }

    pub fn cursor_match(&self) -> Option<&MatchRecord> {
        self.matches.get(self.match_cursor)
    }

    pub fn cursor_team_id(&self) -> Option<String> {
        self.sorted_team_ids().get(self.team_cursor).cloned()
    }

    pub fn match_cursor_next(&mut self) {
        let total = self.matches.len();
        if total == 0 {
            self.match_cursor = 0;
            return;
        }
        self.match_cursor = (self.match_cursor + 1) % total;
    }

    pub fn match_cursor_prev(&mut self) {
        let total = self.matches.len();
        if total == 0 {
            self.match_cursor = 0;
            return;
        }
        if self.match_cursor == 0 {
            self.match_cursor = total - 1;
        } else {
            self.match_cursor -= 1;
        }
    }

    pub fn team_cursor_next(&mut self) {
        let total = self.teams.len();
        if total == 0 {
            self.team_cursor = 0;
            return;
        }
        self.team_cursor = (self.team_cursor + 1) % total;
    }

    pub fn team_cursor_prev(&mut self) {
        let total = self.teams.len();
        if total == 0 {
            self.team_cursor = 0;
            return;
        }
        if self.team_cursor == 0 {
            self.team_cursor = total - 1;
        } else {
            self.team_cursor -= 1;
        }
    }

    pub fn clamp_cursors(&mut self) {
        if self.matches.is_empty() {
            self.match_cursor = 0;
        } else if self.match_cursor >= self.matches.len() {
            self.match_cursor = self.matches.len() - 1;
        }
        if self.teams.is_empty() {
            self.team_cursor = 0;
        } else if self.team_cursor >= self.teams.len() {
            self.team_cursor = self.teams.len() - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Numeric ids compare as numbers and sort before non-numeric ids;
/// non-numeric ids fall back to lexicographic order among themselves.
pub fn compare_team_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetMatches(Vec<MatchRecord>),
    SetTeams(HashMap<String, TeamRecord>),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchMatches,
    FetchTeams,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetMatches(matches) => {
            state.matches = matches;
            state.matches_fetched_at = Some(SystemTime::now());
            state.clamp_cursors();
        }
        Delta::SetTeams(teams) => {
            state.teams = teams;
            state.teams_fetched_at = Some(SystemTime::now());
            state.clamp_cursors();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
