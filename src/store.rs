//! Arm statistics store: an ordered arena of per-arm records indexed by name.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// One statistics record per arm, kept in roster order.
///
/// Names are unique and fixed at construction.  Lookups go through a name
/// index; iteration follows the order the arms were given in.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmStore<S> {
    names: Vec<String>,
    stats: Vec<S>,
    index: BTreeMap<String, usize>,
}

impl<S> ArmStore<S> {
    /// Build a store with one record per name, each initialized by `init`.
    ///
    /// Fails with [`Error::DuplicateArm`] if a name repeats.
    pub fn new<I, N>(names: I, mut init: impl FnMut(&str) -> S) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut out = Self {
            names: Vec::new(),
            stats: Vec::new(),
            index: BTreeMap::new(),
        };
        for name in names {
            let name = name.into();
            if out.index.contains_key(&name) {
                return Err(Error::DuplicateArm(name));
            }
            out.index.insert(name.clone(), out.names.len());
            out.stats.push(init(&name));
            out.names.push(name);
        }
        Ok(out)
    }

    /// Number of arms.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` is in the roster.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Arm names in roster order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Statistics for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&S> {
        self.index.get(name).map(|&i| &self.stats[i])
    }

    /// Mutable statistics for `name`, or [`Error::ArmNotFound`].
    pub fn get_mut(&mut self, name: &str) -> Result<&mut S> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.stats[i]),
            None => Err(Error::ArmNotFound(name.to_string())),
        }
    }

    /// Statistics for `name`, or [`Error::ArmNotFound`].
    pub fn require(&self, name: &str) -> Result<&S> {
        self.get(name)
            .ok_or_else(|| Error::ArmNotFound(name.to_string()))
    }

    /// Iterate `(name, stats)` in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.stats.iter())
    }
}
