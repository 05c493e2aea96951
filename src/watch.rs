// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data file watcher: reload the dataset and re-run a search on change

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crate::query::search::{self, SearchArgs};
use crate::query::Session;

/// Quiet period that folds a burst of writes into one reload
const SETTLE: Duration = Duration::from_millis(300);

/// Watches one data file through its parent directory
pub struct Watcher {
    file: PathBuf,
    file_name: OsString,
    dir: PathBuf,
}

impl Watcher {
    pub fn new(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref().to_path_buf();
        let file_name = file
            .file_name()
            .map(|n| n.to_os_string())
            .with_context(|| format!("Not a file path: {}", file.display()))?;
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            file,
            file_name,
            dir,
        })
    }

    /// Render once, then re-render after every change until the channel closes
    pub fn watch(&self, session: &Session, args: &SearchArgs) -> Result<()> {
        let (tx, rx) = channel();
        let config = Config::default().with_poll_interval(Duration::from_secs(2));
        let mut watcher = RecommendedWatcher::new(tx, config)?;
        watcher
            .watch(&self.dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Cannot watch {}", self.dir.display()))?;

        search::render(session, &session.load(), args)?;
        eprintln!("{} Watching {} for changes...", "👁".cyan(), self.file.display());
        eprintln!("Press Ctrl+C to stop\n");

        while let Ok(res) = rx.recv() {
            match res {
                Ok(event) if self.is_relevant(&event) => {
                    drain_burst(&rx);
                    tracing::info!(path = %self.file.display(), "data file changed, reloading");
                    eprintln!("{} Change detected, reloading...", "🔄".yellow());
                    if let Err(e) = search::render(session, &session.load(), args) {
                        eprintln!("{} Render failed: {}", "✗".red(), e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{} Watch error: {}", "✗".red(), e);
                }
            }
        }

        Ok(())
    }

    fn is_relevant(&self, event: &Event) -> bool {
        should_reload(event)
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}

/// Check if event should trigger a reload
fn should_reload(event: &Event) -> bool {
    use notify::EventKind::*;

    matches!(event.kind, Create(_) | Modify(_))
}

fn drain_burst(rx: &Receiver<notify::Result<Event>>) {
    while rx.recv_timeout(SETTLE).is_ok() {}
}

/// Run the watch command
pub fn run(session: &Session, args: &SearchArgs) -> Result<()> {
    let watcher = Watcher::new(&session.data_file)?;
    watcher.watch(session, args)
}
