use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use nepe_terminal::feed;
use nepe_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Screen};

const EVENT_TITLE: &str = "New England Premier Event - 2025";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.state.help_overlay = !self.state.help_overlay;
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.request_refresh(true);
                return;
            }
            KeyCode::Char('h') => {
                self.state.go_home();
                return;
            }
            _ => {}
        }

        match self.state.screen {
            Screen::Home => self.on_key_home(key),
            Screen::Matches => self.on_key_matches(key),
            Screen::Teams => self.on_key_teams(key),
        }
    }

    fn on_key_home(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('m') => self.state.enter_matches(),
            KeyCode::Char('t') => self.state.enter_teams(),
            _ => {}
        }
    }

    fn on_key_matches(&mut self, key: KeyEvent) {
        if self.state.selected_match.is_some() {
            match key.code {
                KeyCode::Char('n') | KeyCode::Right => self.state.next_match(),
                KeyCode::Char('p') | KeyCode::Left => self.state.prev_match(),
                KeyCode::Char('b') | KeyCode::Esc => self.state.back_from_match(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.match_cursor_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.match_cursor_prev(),
            KeyCode::Enter => {
                if let Some(record) = self.state.cursor_match().cloned() {
                    self.state.select_match(record);
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.go_home(),
            _ => {}
        }
    }

    fn on_key_teams(&mut self, key: KeyEvent) {
        if self.state.selected_team.is_some() {
            match key.code {
                KeyCode::Char('n') | KeyCode::Right => self.state.next_team(),
                KeyCode::Char('p') | KeyCode::Left => self.state.prev_team(),
                KeyCode::Char('b') | KeyCode::Esc => self.state.back_from_team(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.team_cursor_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.team_cursor_prev(),
            KeyCode::Enter => {
                if let Some(id) = self.state.cursor_team_id() {
                    self.state.select_team(id);
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.go_home(),
            _ => {}
        }
    }

    fn request_refresh(&mut self, announce: bool) {
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log("[INFO] Refresh unavailable");
            }
            return;
        };
        let sent = tx.send(ProviderCommand::FetchMatches).is_ok()
            && tx.send(ProviderCommand::FetchTeams).is_ok();
        if sent {
            if announce {
                self.state.push_log("[INFO] Refresh requested");
            }
        } else if announce {
            self.state.push_log("[WARN] Refresh request failed");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_sheet_provider(tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[1]),
        Screen::Matches => {
            if app.state.selected_match.is_some() {
                render_match_detail(frame, chunks[1], &app.state);
            } else {
                render_match_list(frame, chunks[1], &app.state);
            }
        }
        Screen::Teams => {
            if app.state.selected_team.is_some() {
                render_team_detail(frame, chunks[1], &app.state);
            } else {
                render_team_list(frame, chunks[1], &app.state);
            }
        }
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let loaded = format!(
        "{} matches | {} teams",
        state.matches.len(),
        state.teams.len()
    );
    let screen = match state.screen {
        Screen::Home => "HOME",
        Screen::Matches if state.selected_match.is_some() => "MATCH",
        Screen::Matches => "MATCHES",
        Screen::Teams if state.selected_team.is_some() => "TEAM",
        Screen::Teams => "TEAMS",
    };
    format!(" [*] {EVENT_TITLE}\n     {screen} | {loaded}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Home => "m Matches | t Teams | r Refresh | ? Help | q Quit".to_string(),
        Screen::Matches if state.selected_match.is_some() => {
            "n/→ Next | p/← Prev | b/Esc Back | h Home | ? Help | q Quit".to_string()
        }
        Screen::Matches => {
            "j/k/↑/↓ Move | Enter Select | b/Esc/h Home | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Teams if state.selected_team.is_some() => {
            "n/→ Next | p/← Prev | b/Esc Back | h Home | ? Help | q Quit".to_string()
        }
        Screen::Teams => {
            "j/k/↑/↓ Move | Enter Select | b/Esc/h Home | r Refresh | ? Help | q Quit".to_string()
        }
    }
}

fn render_home(frame: &mut Frame, area: Rect) {
    let text = [
        EVENT_TITLE,
        "",
        "  m  Browse matches",
        "  t  Browse teams",
    ]
    .join("\n");
    let home = Paragraph::new(text).block(Block::default().borders(Borders::NONE));
    frame.render_widget(home, area);
}

fn render_match_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Select a Match").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.matches.is_empty() {
        let empty = Paragraph::new("No matches yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.match_cursor, state.matches.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let m = &state.matches[idx];
        let prefix = if idx == state.match_cursor { "> " } else { "  " };
        lines.push(format!("{prefix}Match {}", m.id));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_match_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(m) = &state.selected_match else {
        return;
    };

    let block = Block::default()
        .title(format!("Match {}", m.id))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_team_card(frame, cols[0], state, &m.team_a);
    render_team_card(frame, cols[1], state, &m.team_b);
}

fn render_team_card(frame: &mut Frame, area: Rect, state: &AppState, team_id: &str) {
    let block = Block::default()
        .title(format!("Team {team_id}"))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = team_info_text(state, team_id);
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_team_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Select a Team").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let order = state.sorted_team_ids();
    if order.is_empty() {
        let empty = Paragraph::new("No teams yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.team_cursor, order.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let prefix = if idx == state.team_cursor { "> " } else { "  " };
        lines.push(format!("{prefix}Team {}", order[idx]));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_team_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(id) = state.selected_team.as_deref() else {
        return;
    };

    let block = Block::default()
        .title(format!("Team {id}"))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = team_info_text(state, id);
    frame.render_widget(Paragraph::new(text), inner);
}

// Soft references may dangle; that renders as a plain message, never an
// error.
fn team_info_text(state: &AppState, team_id: &str) -> String {
    match state.team(team_id) {
        Some(team) => [
            format!("Name: {}", team.name),
            format!("Founded: {}", team.founded),
            format!("Location: {}, {}", team.town, team.state),
            format!("Robot: {}", team.robot),
            format!("Type: {}", team.kind),
        ]
        .join("\n"),
        None => "Team details not found.".to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        EVENT_TITLE,
        "",
        "Global:",
        "  r            Refresh both sheets",
        "  h            Home",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Home:",
        "  m / t        Matches / Teams",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  Enter        Select",
        "  b / Esc      Home",
        "",
        "Detail:",
        "  n/→ p/←      Next / previous",
        "  b / Esc      Back to list",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
