//! Ranked tables returned by `grade()`.

use std::fmt;

/// Rows shown in a leaderboard.
pub const LEADERBOARD_LEN: usize = 5;

/// A graded row: one arm with its statistics and sampled columns.
pub trait Graded {
    /// The arm this row describes.
    fn name(&self) -> &str;

    /// Column headers used by the text table.
    fn header() -> Vec<&'static str>;

    /// Cell values for the text table, aligned with [`Graded::header`].
    fn cells(&self) -> Vec<String>;
}

/// Arms sorted best-first by one Thompson draw.
///
/// Each call to `grade()` builds a fresh table; two tables from the same state
/// generally differ.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranking<G> {
    rows: Vec<G>,
}

impl<G> Ranking<G> {
    pub(crate) fn from_sorted(rows: Vec<G>) -> Self {
        Self { rows }
    }

    /// Rows, best first.
    pub fn rows(&self) -> &[G] {
        &self.rows
    }

    /// Consume into rows, best first.
    pub fn into_rows(self) -> Vec<G> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty (no arms).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The top-ranked row.
    pub fn best(&self) -> Option<&G> {
        self.rows.first()
    }

    /// The first `n` rows.
    pub fn top(&self, n: usize) -> &[G] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// The first [`LEADERBOARD_LEN`] rows.
    pub fn leaderboard(&self) -> &[G] {
        self.top(LEADERBOARD_LEN)
    }

    /// Iterate rows, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, G> {
        self.rows.iter()
    }
}

impl<G: Graded> Ranking<G> {
    /// Arm names, best first.
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(Graded::name).collect()
    }

    /// 0-based position of `arm`, if it is in the table.
    pub fn position(&self, arm: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.name() == arm)
    }
}

impl<'a, G> IntoIterator for &'a Ranking<G> {
    type Item = &'a G;
    type IntoIter = std::slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Plain-text table, one row per arm, best first.
impl<G: Graded> fmt::Display for Ranking<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = G::header();
        let body: Vec<Vec<String>> = self.rows.iter().map(Graded::cells).collect();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write_row(f, &header, &widths)?;
        for row in &body {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            write_row(f, &cells, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            f.write_str("  ")?;
        }
        write!(f, "{cell:<w$}")?;
    }
    writeln!(f)
}
