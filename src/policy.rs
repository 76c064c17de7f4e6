//! Unified `ConjugateBandit` trait for both reward models.
//!
//! [`NormalGammaBandit`][crate::NormalGammaBandit] and
//! [`BetaBernoulliBandit`][crate::BetaBernoulliBandit] share the same shape:
//! validate an observation, apply it in place, and grade the arms by one
//! posterior draw each.  Windowed replay is written once here on top of those
//! primitives.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use tracing::debug;

use crate::{retain_window, window_days, Direction, Event, Graded, Ranking, Result};

/// What a replay did to the bandit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplaySummary {
    /// Events applied, in ascending timestamp order.
    pub applied: usize,
    /// Events discarded as older than the window.
    pub dropped: usize,
    /// Oldest timestamp still inside the window, if the batch was non-empty.
    pub cutoff: Option<DateTime<Utc>>,
}

/// Common interface for conjugate Thompson-sampling bandits.
///
/// # Example
///
/// ```rust
/// use tripbandit::{BetaBernoulliBandit, BetaBernoulliConfig, ConjugateBandit};
///
/// fn best<B: ConjugateBandit>(b: &mut B) -> Option<String> {
///     b.grade().best().map(|g| tripbandit::Graded::name(g).to_string())
/// }
///
/// let mut b = BetaBernoulliBandit::with_seed(["a", "b"], BetaBernoulliConfig::default(), 1).unwrap();
/// b.update("a", 1).unwrap();
/// assert!(best(&mut b).is_some());
/// ```
pub trait ConjugateBandit {
    /// Observation type accepted by [`ConjugateBandit::apply`].
    type Value;
    /// Row type of the ranked table.
    type Grade: Graded;

    /// Arm names in roster order.
    fn arms(&self) -> &[String];

    /// Optimization direction.
    fn direction(&self) -> Direction;

    /// Check that `value` could be applied to `arm` without changing anything.
    fn validate(&self, arm: &str, value: &Self::Value) -> Result<()>;

    /// Apply one observation to `arm`.
    ///
    /// On error the bandit is unchanged.
    fn apply(&mut self, arm: &str, value: Self::Value) -> Result<()>;

    /// Rank every arm by one posterior draw from `rng`.
    fn grade_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Ranking<Self::Grade>;

    /// Rank every arm by one posterior draw from the bandit's own generator.
    fn grade(&mut self) -> Ranking<Self::Grade>;

    /// Replay `events`, keeping only those within `window` of the newest one.
    ///
    /// All surviving events are validated, then applied to a staged copy that
    /// replaces `self` only if every event succeeds.  A bad event leaves the
    /// bandit untouched.
    fn replay<I, E, V>(&mut self, events: I, window: TimeDelta) -> Result<ReplaySummary>
    where
        Self: Clone,
        I: IntoIterator<Item = E>,
        E: Into<Event<V>>,
        V: Into<Self::Value>,
    {
        let events = events.into_iter().map(|e| {
            let e: Event<V> = e.into();
            Event::new(e.at, e.arm, e.value.into())
        });
        let split = retain_window::<Self::Value, _>(events, window);
        debug!(
            kept = split.kept.len(),
            dropped = split.dropped,
            cutoff = ?split.cutoff,
            "replaying events"
        );

        for e in &split.kept {
            self.validate(&e.arm, &e.value)?;
        }
        let applied = split.kept.len();
        let mut staged = self.clone();
        for e in split.kept {
            staged.apply(&e.arm, e.value)?;
        }
        *self = staged;

        Ok(ReplaySummary {
            applied,
            dropped: split.dropped,
            cutoff: split.cutoff,
        })
    }

    /// Replay events from the last `days` days, then grade.
    ///
    /// An empty batch, or one where every event is too old, grades the
    /// current state without changing it.
    fn process_events<I, E, V>(&mut self, events: I, days: u32) -> Result<Ranking<Self::Grade>>
    where
        Self: Clone,
        I: IntoIterator<Item = E>,
        E: Into<Event<V>>,
        V: Into<Self::Value>,
    {
        self.replay(events, window_days(days))?;
        Ok(self.grade())
    }
}
