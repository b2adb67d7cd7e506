//! Terminal feedback while poetry runs
//!
//! Every poetry call blocks, so a spinner names the command in flight. In
//! latest mode a bar counts the `poetry add` batches, one per group.

use crate::domain::DependencyGroup;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Spinner or batch bar on stderr; inert when disabled
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// `enabled` is false in quiet and JSON mode
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Run one poetry command under a spinner labelled `poetry <args>`
    pub fn command<T>(&mut self, args: &str, run: impl FnOnce() -> T) -> T {
        self.show(|| command_spinner(args));
        let outcome = run();
        self.clear();
        outcome
    }

    /// Start the bar over `batches` add commands
    pub fn start_batches(&mut self, batches: usize) {
        if batches > 0 {
            self.show(|| batch_bar(batches as u64));
        }
    }

    /// Name the group whose batch is being added
    pub fn batch(&self, group: &DependencyGroup) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("poetry add ({})", group));
        }
    }

    pub fn batch_done(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn show(&mut self, build: impl FnOnce() -> ProgressBar) {
        if !self.enabled {
            return;
        }
        self.clear();
        let bar = build();
        bar.enable_steady_tick(TICK);
        self.bar = Some(bar);
    }
}

/// An early return through `?` still removes the bar from the terminal
impl Drop for Progress {
    fn drop(&mut self) {
        self.clear();
    }
}

fn command_spinner(args: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("static template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(format!("poetry {}", args));
    spinner
}

fn batch_bar(batches: u64) -> ProgressBar {
    ProgressBar::new(batches).with_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} groups")
            .expect("static template")
            .progress_chars("█▓▒░"),
    )
}
