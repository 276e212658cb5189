//! Spinner shown while npm is working.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Check if stderr is a terminal (for deciding whether to show spinners)
pub fn is_interactive() -> bool {
    std::io::stderr().is_terminal()
}

/// A spinner with a message. Hidden when dropped.
pub struct Status {
    bar: Option<ProgressBar>,
}

impl Status {
    /// No-op when stderr is not a terminal; the log already says what is running.
    pub fn new(message: &str) -> Self {
        if !is_interactive() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar: Some(bar) }
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Status {
    fn drop(&mut self) {
        if let Some(ref bar) = self.bar {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
    }
}

/// Show "running..." status
pub fn running(command: &str) -> Status {
    Status::new(&format!("running '{}'...", command))
}
