//! Append-only log of applied observations.

/// One applied observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryRecord<V> {
    pub arm: String,
    pub value: V,
}

/// Observations in the order they were applied.
///
/// Only the owning bandit appends; callers get read access.  Records are never
/// rewritten or pruned.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History<V> {
    records: Vec<HistoryRecord<V>>,
}

impl<V> Default for History<V> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<V> History<V> {
    pub(crate) fn push(&mut self, arm: &str, value: V) {
        self.records.push(HistoryRecord {
            arm: arm.to_string(),
            value,
        });
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been applied yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[HistoryRecord<V>] {
        &self.records
    }

    /// The most recently applied record.
    pub fn last(&self) -> Option<&HistoryRecord<V>> {
        self.records.last()
    }

    /// Iterate records applied to `arm`, oldest first.
    pub fn for_arm<'a>(&'a self, arm: &'a str) -> impl Iterator<Item = &'a HistoryRecord<V>> + 'a {
        self.records.iter().filter(move |r| r.arm == arm)
    }
}
