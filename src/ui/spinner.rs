//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::shell::{OutputCallback, OutputLine};

use super::theme::Theme;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for silent mode or CI).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Get a clone of the inner progress bar for use in callbacks.
    ///
    /// The cloned bar can be passed to a callback running on another thread;
    /// `set_message` calls on it update the spinner display in real time.
    pub fn bar_clone(&self) -> ProgressBar {
        self.bar.clone()
    }

    /// Update the spinner message.
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Mark the operation as successful.
    pub fn finish_success(&self, theme: &Theme, msg: &str) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_success(msg));
    }

    /// Mark the operation as failed.
    pub fn finish_error(&self, theme: &Theme, msg: &str) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_error(msg));
    }

    /// Mark as skipped.
    pub fn finish_skipped(&self, theme: &Theme, msg: &str) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_skipped(msg));
    }
}

/// Create an output callback that updates a spinner with live output lines.
///
/// The callback maintains a ring buffer of the last `max_lines` output lines
/// and updates the spinner message to show the base message plus those lines,
/// so users see that pip is actually making progress.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    max_lines: usize,
) -> OutputCallback {
    let buffer: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    let theme = Theme::new();

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) => s.trim_end().to_string(),
            OutputLine::Stderr(s) => s.trim_end().to_string(),
        };

        if text.is_empty() {
            return;
        }

        // Truncate long lines for display; pip output can contain
        // multibyte characters, so cut on display width, not bytes.
        let display_text = console::truncate_str(&text, 72, "...").to_string();

        let mut buf = buffer.lock().unwrap();
        buf.push_back(display_text);
        while buf.len() > max_lines {
            buf.pop_front();
        }

        let mut msg = base_message.clone();
        for line in buf.iter() {
            msg.push('\n');
            msg.push_str("    ");
            msg.push_str(&theme.dim.apply_to(format!("» {}", line)).to_string());
        }

        bar.set_message(msg);
    })
}
