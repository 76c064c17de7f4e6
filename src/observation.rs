//! Continuous observation input: plain magnitudes or `hh:mm:ss` durations.

use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

/// A continuous observation as supplied by a collaborator.
///
/// Text values are resolved lazily by [`Observation::resolve`]: an `hh:mm:ss`
/// duration becomes minutes, a numeric string becomes its magnitude, anything
/// else is [`Error::InvalidObservation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Observation {
    Value(f64),
    Text(String),
}

impl Observation {
    /// Resolve to the magnitude used by the update recurrence.
    pub fn resolve(&self) -> Result<f64> {
        match self {
            Observation::Value(x) if x.is_finite() => Ok(*x),
            Observation::Value(_) => Err(Error::InvalidObservation(self.to_string())),
            Observation::Text(s) => {
                let t = s.trim();
                if let Some(minutes) = parse_duration_minutes(t) {
                    return Ok(minutes);
                }
                match t.parse::<f64>() {
                    Ok(x) if x.is_finite() => Ok(x),
                    _ => Err(Error::InvalidObservation(s.clone())),
                }
            }
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Value(x) => write!(f, "{x}"),
            Observation::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Observation {
    fn from(x: f64) -> Self {
        Observation::Value(x)
    }
}

impl From<f32> for Observation {
    fn from(x: f32) -> Self {
        Observation::Value(f64::from(x))
    }
}

impl From<i32> for Observation {
    fn from(x: i32) -> Self {
        Observation::Value(f64::from(x))
    }
}

impl From<u32> for Observation {
    fn from(x: u32) -> Self {
        Observation::Value(f64::from(x))
    }
}

impl From<i64> for Observation {
    fn from(x: i64) -> Self {
        Observation::Value(x as f64)
    }
}

impl From<u64> for Observation {
    fn from(x: u64) -> Self {
        Observation::Value(x as f64)
    }
}

impl From<&str> for Observation {
    fn from(s: &str) -> Self {
        Observation::Text(s.to_string())
    }
}

impl From<String> for Observation {
    fn from(s: String) -> Self {
        Observation::Text(s)
    }
}

impl From<&String> for Observation {
    fn from(s: &String) -> Self {
        Observation::Text(s.clone())
    }
}

/// Durations are observed in minutes.
impl From<Duration> for Observation {
    fn from(d: Duration) -> Self {
        Observation::Value(d.as_secs_f64() / 60.0)
    }
}

/// Parse a clock-style duration into minutes.
///
/// Accepts `hh:mm:ss` with any number of hour digits, minutes and seconds in
/// `0..60`, and an optional fractional part on the seconds.  A leading `-`
/// negates the result and an `N day` / `N days` prefix adds whole days.
///
/// ```rust
/// use tripbandit::parse_duration_minutes;
///
/// assert_eq!(parse_duration_minutes("01:30:00"), Some(90.0));
/// assert_eq!(parse_duration_minutes("00:00:30"), Some(0.5));
/// assert_eq!(parse_duration_minutes("1 day 00:10:00"), Some(1450.0));
/// assert_eq!(parse_duration_minutes("invalid_time"), None);
/// ```
pub fn parse_duration_minutes(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r.trim_start()),
        None => (false, s),
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let (days, clock) = match tokens.as_slice() {
        [clock] => (0u64, *clock),
        [d, unit, clock] if matches!(*unit, "day" | "days") => (parse_digits(d)?, *clock),
        _ => return None,
    };

    let mut parts = clock.split(':');
    let (h, m, sec) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let hours = parse_digits(h)?;
    let minutes = parse_digits(m)?;
    let seconds = parse_seconds(sec)?;
    if minutes >= 60 || seconds >= 60.0 {
        return None;
    }

    let whole = days
        .checked_mul(24 * 60)?
        .checked_add(hours.checked_mul(60)?)?
        .checked_add(minutes)?;
    let total = whole as f64 + seconds / 60.0;
    Some(if negative { -total } else { total })
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_seconds(s: &str) -> Option<f64> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    parse_digits(whole)?;
    if let Some(f) = frac {
        parse_digits(f)?;
    }
    s.parse().ok()
}
