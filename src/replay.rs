//! Timestamped events and the retention-window filter used by replay.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Default retention period for replay, about one quarter.
pub const DEFAULT_WINDOW_DAYS: u32 = 91;

/// One historical observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event<V> {
    pub at: DateTime<Utc>,
    pub arm: String,
    pub value: V,
}

impl<V> Event<V> {
    pub fn new(at: DateTime<Utc>, arm: impl Into<String>, value: V) -> Self {
        Self {
            at,
            arm: arm.into(),
            value,
        }
    }
}

/// `timestamp -> (arm, value)` map entries, as collaborators usually hold them.
impl<A: Into<String>, V> From<(DateTime<Utc>, (A, V))> for Event<V> {
    fn from((at, (arm, value)): (DateTime<Utc>, (A, V))) -> Self {
        Event::new(at, arm, value)
    }
}

/// Naive timestamps are taken as UTC.
impl<A: Into<String>, V> From<(NaiveDateTime, (A, V))> for Event<V> {
    fn from((at, (arm, value)): (NaiveDateTime, (A, V))) -> Self {
        Event::new(at.and_utc(), arm, value)
    }
}

impl<A: Into<String>, V> From<(DateTime<Utc>, A, V)> for Event<V> {
    fn from((at, arm, value): (DateTime<Utc>, A, V)) -> Self {
        Event::new(at, arm, value)
    }
}

/// Result of applying the retention window to a batch.
#[derive(Debug, Clone)]
pub struct WindowSplit<V> {
    /// Surviving events in ascending timestamp order (ties keep input order).
    pub kept: Vec<Event<V>>,
    /// Number of events older than the cutoff.
    pub dropped: usize,
    /// `latest - window`, or `None` for an empty batch.
    pub cutoff: Option<DateTime<Utc>>,
}

/// Window length for `days` whole days.
pub fn window_days(days: u32) -> TimeDelta {
    TimeDelta::days(i64::from(days))
}

/// Keep events with `at >= latest - window`, sorted oldest first.
///
/// The cutoff is anchored on the newest event in the batch, not on the wall
/// clock, so replaying an old export gives the same result as replaying it on
/// the day it was taken.
pub fn retain_window<V, I>(events: I, window: TimeDelta) -> WindowSplit<V>
where
    I: IntoIterator<Item = Event<V>>,
{
    let all: Vec<Event<V>> = events.into_iter().collect();
    let Some(latest) = all.iter().map(|e| e.at).max() else {
        return WindowSplit {
            kept: Vec::new(),
            dropped: 0,
            cutoff: None,
        };
    };
    let cutoff = latest
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let total = all.len();
    let mut kept: Vec<Event<V>> = all.into_iter().filter(|e| e.at >= cutoff).collect();
    kept.sort_by_key(|e| e.at);
    let dropped = total - kept.len();

    WindowSplit {
        kept,
        dropped,
        cutoff: Some(cutoff),
    }
}
