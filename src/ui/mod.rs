//! Terminal output: theme, verbosity modes, and spinners.

pub mod output;
pub mod spinner;
pub mod theme;

pub use output::{Output, OutputMode};
pub use spinner::{live_output_callback, ProgressSpinner};
pub use theme::{should_use_colors, Theme};

use std::time::Duration;

/// Format a duration for display ("820ms", "2.4s", "1m 12s").
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let minutes = duration.as_secs() / 60;
        let seconds = duration.as_secs() % 60;
        format!("{}m {}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_millis() {
        assert_eq!(format_duration(Duration::from_millis(820)), "820ms");
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(2400)), "2.4s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(72)), "1m 12s");
    }
}
