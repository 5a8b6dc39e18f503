// SPDX-License-Identifier: MIT
//
// Command-line interface. The CLI is the whole configuration surface: no
// config files, no environment variables.

use clap::Parser;
use countdown_core::settings::{DEFAULT_LABEL, TickInterval, TimerSettings};
use countdown_core::CountdownDuration;

/// A terminal countdown timer with big digits and single-key controls.
#[derive(Debug, Parser)]
#[command(name = "countdown", version, about)]
#[command(after_help = "Examples: countdown 90, countdown 2m30s, countdown 00:10")]
pub struct Cli {
    /// Duration (seconds, 2m30s, or mm:ss)
    #[arg(allow_hyphen_values = true)]
    pub duration: CountdownDuration,

    /// Label text
    #[arg(short, long, default_value = DEFAULT_LABEL)]
    pub label: String,

    /// Refresh interval seconds
    #[arg(
        long,
        default_value = "0.1",
        value_parser = parse_tick,
        allow_negative_numbers = true
    )]
    pub tick: TickInterval,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Loop settings from the parsed flags.
    pub fn settings(&self) -> TimerSettings {
        TimerSettings {
            label: self.label.clone(),
            tick: self.tick,
        }
    }

    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "warn" };
        format!("countdown={level},countdown_core={level},countdown_term={level}")
    }
}

fn parse_tick(s: &str) -> Result<TickInterval, String> {
    let secs = s.trim().parse::<f64>().map_err(|e| e.to_string())?;
    TickInterval::from_secs_f64(secs).map_err(|e| e.to_string())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("countdown").chain(args.iter().copied()))
    }

    // ── Accepted input ──────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let cli = parse(&["90"]).unwrap();
        assert_eq!(cli.duration.as_secs(), 90);
        assert_eq!(cli.label, "Countdown");
        assert_eq!(cli.tick.as_duration(), Duration::from_millis(100));
        assert!(!cli.verbose);
    }

    #[test]
    fn every_duration_form() {
        assert_eq!(parse(&["2m30s"]).unwrap().duration.as_secs(), 150);
        assert_eq!(parse(&["00:10"]).unwrap().duration.as_secs(), 10);
        assert_eq!(parse(&["1:00:00"]).unwrap().duration.as_secs(), 3600);
    }

    #[test]
    fn label_and_tick() {
        let cli = parse(&["5", "-l", "Tea", "--tick", "0.5"]).unwrap();
        assert_eq!(cli.label, "Tea");
        assert_eq!(cli.tick.as_duration(), Duration::from_millis(500));

        let settings = cli.settings();
        assert_eq!(settings.label, "Tea");
        assert_eq!(settings.tick, cli.tick);
    }

    #[test]
    fn long_label_flag() {
        assert_eq!(parse(&["--label", "Pasta", "9m"]).unwrap().label, "Pasta");
    }

    // ── Usage errors ────────────────────────────────────────────────────

    fn rejected(args: &[&str]) -> String {
        let err = parse(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        err.to_string()
    }

    #[test]
    fn zero_duration_is_a_usage_error() {
        assert!(rejected(&["0"]).contains("Duration must be greater than 0"));
        assert!(rejected(&["00:00"]).contains("Duration must be greater than 0"));
    }

    #[test]
    fn malformed_durations_are_usage_errors() {
        assert!(rejected(&["abc"]).contains("Invalid duration: abc"));
        assert!(rejected(&["1:xx"]).contains("Invalid time format: 1:xx"));
        assert!(rejected(&["-5"]).contains("Invalid duration: -5"));
        assert!(rejected(&[""]).contains("Empty duration"));
    }

    #[test]
    fn bad_tick_is_a_usage_error() {
        assert!(rejected(&["5", "--tick", "0"]).contains("--tick must be greater than 0"));
        assert!(rejected(&["5", "--tick", "-1"]).contains("--tick must be greater than 0"));
        assert!(rejected(&["5", "--tick", "1e300"]).contains("--tick is too large"));
        assert!(rejected(&["5", "--tick", "inf"]).contains("--tick is too large"));
        rejected(&["5", "--tick", "fast"]);
    }

    #[test]
    fn missing_duration() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    // ── Logging ─────────────────────────────────────────────────────────

    #[test]
    fn verbose_raises_every_crate_to_debug() {
        assert_eq!(
            parse(&["5"]).unwrap().log_filter(),
            "countdown=warn,countdown_core=warn,countdown_term=warn"
        );
        assert_eq!(
            parse(&["-v", "5"]).unwrap().log_filter(),
            "countdown=debug,countdown_core=debug,countdown_term=debug"
        );
    }
}
