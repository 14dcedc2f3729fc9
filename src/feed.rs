use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::sheet_fetch;
use crate::state::{Delta, ProviderCommand};

/// Background provider for the two sheet resources. The startup fetches run
/// independently of each other; afterwards the thread serves refresh
/// commands until the UI side hangs up. All results cross the channel as
/// deltas, so a fetch that outlives the UI is dropped at the send rather
/// than applied to torn-down state.
pub fn spawn_sheet_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let team_tx = tx.clone();
        thread::spawn(move || refresh_teams(&team_tx));
        refresh_matches(&tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchMatches => refresh_matches(&tx),
                ProviderCommand::FetchTeams => refresh_teams(&tx),
            }
        }
    });
}

fn refresh_matches(tx: &Sender<Delta>) {
    match sheet_fetch::fetch_matches() {
        Ok(matches) => {
            let _ = tx.send(Delta::Log(format!("[INFO] Loaded {} matches", matches.len())));
            let _ = tx.send(Delta::SetMatches(matches));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Match fetch error: {err:#}")));
        }
    }
}

fn refresh_teams(tx: &Sender<Delta>) {
    match sheet_fetch::fetch_teams() {
        Ok(teams) => {
            let _ = tx.send(Delta::Log(format!("[INFO] Loaded {} teams", teams.len())));
            let _ = tx.send(Delta::SetTeams(teams));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Team fetch error: {err:#}")));
        }
    }
}
