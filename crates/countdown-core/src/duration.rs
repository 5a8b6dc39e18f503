//! Duration strings.
//!
//! A countdown length can be written three ways, tried in this order:
//!
//! | Form           | Example          | Meaning                        |
//! |----------------|------------------|--------------------------------|
//! | Clock          | `05:00`, `1:02:03` | `mm:ss` or `hh:mm:ss`        |
//! | Bare integer   | `90`             | seconds                        |
//! | Compound       | `2m30s`, `1H 5M` | optional `h`, `m`, `s` groups  |
//!
//! Parsing and range checking are separate steps: [`parse`] turns text
//! into a signed second count, [`validate`] rejects anything that is not
//! strictly positive. [`CountdownDuration`]'s `FromStr` runs both.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::TimerError;
use crate::format::format_clock;

/// `<h>h<m>m<s>s`, every group optional, h/m/s order, any case, spaces
/// allowed between groups. ASCII digits only: `\d` would accept other
/// scripts' digits that `i64::from_str` then rejects.
static COMPOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?P<hours>[0-9]+)h)?\s*(?:(?P<minutes>[0-9]+)m)?\s*(?:(?P<seconds>[0-9]+)s)?\s*$",
    )
    .expect("compound duration pattern is valid")
});

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a duration string into whole seconds.
///
/// Does not range-check: `"0"` parses to `0`. See [`validate`].
///
/// # Errors
///
/// [`TimerError::EmptyInput`] for blank input, [`TimerError::InvalidFormat`]
/// when no form matches or the value overflows.
pub fn parse(input: &str) -> Result<i64, TimerError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(TimerError::EmptyInput);
    }

    if value.contains(':') {
        return parse_clock(value);
    }

    if is_digits(value) {
        return value
            .parse()
            .map_err(|_| TimerError::invalid_duration(value));
    }

    parse_compound(value)
}

/// `mm:ss` or `hh:mm:ss`. Components may carry surrounding spaces.
fn parse_clock(value: &str) -> Result<i64, TimerError> {
    let invalid = || TimerError::invalid_time(value);

    let numbers = value
        .split(':')
        .map(str::trim)
        .map(|part| {
            if is_digits(part) {
                part.parse::<i64>().ok()
            } else {
                None
            }
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    let total = match numbers[..] {
        [minutes, seconds] => to_seconds(0, minutes, seconds),
        [hours, minutes, seconds] => to_seconds(hours, minutes, seconds),
        _ => None,
    };
    total.ok_or_else(invalid)
}

fn parse_compound(value: &str) -> Result<i64, TimerError> {
    let invalid = || TimerError::invalid_duration(value);
    let caps = COMPOUND.captures(value).ok_or_else(invalid)?;

    let group = |name: &str| -> Result<i64, TimerError> {
        caps.name(name)
            .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
    };

    to_seconds(group("hours")?, group("minutes")?, group("seconds")?).ok_or_else(invalid)
}

fn to_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A validated countdown length: a whole number of seconds, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountdownDuration(u64);

impl CountdownDuration {
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

/// Reject zero and negative second counts.
///
/// # Errors
///
/// [`TimerError::NonPositiveDuration`] when `seconds <= 0`.
pub fn validate(seconds: i64) -> Result<CountdownDuration, TimerError> {
    u64::try_from(seconds)
        .ok()
        .filter(|&s| s > 0)
        .map(CountdownDuration)
        .ok_or(TimerError::NonPositiveDuration(seconds))
}

impl FromStr for CountdownDuration {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(parse(s)?)
    }
}

impl fmt::Display for CountdownDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.0 as f64))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid(input: &str) -> bool {
        matches!(parse(input), Err(TimerError::InvalidFormat(_)))
    }

    // -- Bare seconds ---------------------------------------------------------

    #[test]
    fn bare_integer_is_seconds() {
        assert_eq!(parse("90"), Ok(90));
        assert_eq!(parse("  7 "), Ok(7));
        assert_eq!(parse("0"), Ok(0));
    }

    #[test]
    fn sign_is_not_a_digit() {
        assert!(is_invalid("-5"));
        assert!(is_invalid("+5"));
    }

    // -- Clock form -----------------------------------------------------------

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(parse("00:10"), Ok(10));
        assert_eq!(parse("1:2"), Ok(62));
        assert_eq!(parse("90:00"), Ok(5400));
    }

    #[test]
    fn hours_minutes_seconds() {
        assert_eq!(parse("1:02:03"), Ok(3723));
        assert_eq!(parse("0:00:01"), Ok(1));
    }

    #[test]
    fn clock_components_are_trimmed() {
        assert_eq!(parse("1: 30"), Ok(90));
    }

    #[test]
    fn clock_rejects_bad_components() {
        assert!(is_invalid("1:a"));
        assert!(is_invalid(":30"));
        assert!(is_invalid("1:"));
        assert!(is_invalid("1:-2"));
    }

    #[test]
    fn clock_rejects_wrong_arity() {
        assert!(is_invalid("1:2:3:4"));
        assert!(is_invalid("1:2:3:4:5"));
        assert_eq!(
            parse("1:2:3:4").unwrap_err().to_string(),
            "Invalid time format: 1:2:3:4"
        );
    }

    // -- Compound form --------------------------------------------------------

    #[test]
    fn compound_groups() {
        assert_eq!(parse("2m30s"), Ok(150));
        assert_eq!(parse("1h"), Ok(3600));
        assert_eq!(parse("45s"), Ok(45));
        assert_eq!(parse("1h30m"), Ok(5400));
        assert_eq!(parse("1h5s"), Ok(3605));
    }

    #[test]
    fn compound_is_case_insensitive_and_spaced() {
        assert_eq!(parse("1H 2M 3S"), Ok(3723));
        assert_eq!(parse(" 2m 30s "), Ok(150));
    }

    #[test]
    fn compound_requires_hms_order() {
        assert!(is_invalid("30s2m"));
        assert!(is_invalid("1m2h"));
    }

    #[test]
    fn compound_rejects_bare_suffix_and_junk() {
        assert!(is_invalid("m"));
        assert!(is_invalid("abc"));
        assert!(is_invalid("2x"));
        assert!(is_invalid("1.5m"));
        assert_eq!(parse("abc").unwrap_err().to_string(), "Invalid duration: abc");
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        assert!(is_invalid("٣"));
        assert!(is_invalid("٣s"));
    }

    // -- Overflow -------------------------------------------------------------

    #[test]
    fn overflow_is_invalid_not_a_panic() {
        assert!(is_invalid("99999999999999999999"));
        assert!(is_invalid("9999999999999999h"));
        assert!(is_invalid("9999999999999999:00:00"));
    }

    // -- Empty ----------------------------------------------------------------

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(parse(""), Err(TimerError::EmptyInput));
        assert_eq!(parse("   \t"), Err(TimerError::EmptyInput));
    }

    // -- Validation -----------------------------------------------------------

    #[test]
    fn validate_accepts_positive() {
        let d = validate(parse("90").unwrap()).unwrap();
        assert_eq!(d.as_secs(), 90);
        assert_eq!(d.as_duration(), Duration::from_secs(90));
    }

    #[test]
    fn validate_rejects_zero_and_negative() {
        assert_eq!(validate(0), Err(TimerError::NonPositiveDuration(0)));
        assert_eq!(validate(-5), Err(TimerError::NonPositiveDuration(-5)));
    }

    #[test]
    fn from_str_parses_then_validates() {
        assert_eq!("2m30s".parse::<CountdownDuration>().unwrap().as_secs(), 150);
        assert_eq!(
            "0:00".parse::<CountdownDuration>(),
            Err(TimerError::NonPositiveDuration(0))
        );
        assert_eq!("".parse::<CountdownDuration>(), Err(TimerError::EmptyInput));
    }

    #[test]
    fn display_uses_clock_format() {
        assert_eq!(validate(3723).unwrap().to_string(), "01:02:03");
        assert_eq!(validate(150).unwrap().to_string(), "02:30");
    }
}
