//! # Proposed Transitions
//!
//! A transition is the set of record versions it consumes and the set it
//! produces. The validator never mutates either side.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use stateset_core::PartyKey;

/// Keys that endorsed a transition.
pub type SignerSet = BTreeSet<PartyKey>;

/// Number of consumed and produced records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cardinality {
    pub consumed: usize,
    pub produced: usize,
}

impl Cardinality {
    pub const fn new(consumed: usize, produced: usize) -> Self {
        Self { consumed, produced }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} consumed / {} produced", self.consumed, self.produced)
    }
}

/// Consumed and produced versions of one record family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<R> {
    #[serde(default = "Vec::new")]
    pub consumed: Vec<R>,
    #[serde(default = "Vec::new")]
    pub produced: Vec<R>,
}

impl<R> Transition<R> {
    pub fn new(consumed: Vec<R>, produced: Vec<R>) -> Self {
        Self { consumed, produced }
    }

    /// A transition that brings a record into existence.
    pub fn issue(record: R) -> Self {
        Self::new(Vec::new(), vec![record])
    }

    /// A transition that supersedes `prior` with `next`.
    pub fn evolve(prior: R, next: R) -> Self {
        Self::new(vec![prior], vec![next])
    }

    /// A transition that retires a record.
    pub fn retire(prior: R) -> Self {
        Self::new(vec![prior], Vec::new())
    }

    /// Actual counts.
    pub fn cardinality(&self) -> Cardinality {
        Cardinality::new(self.consumed.len(), self.produced.len())
    }

    /// The sole consumed record, if there is exactly one.
    pub fn single_consumed(&self) -> Option<&R> {
        match self.consumed.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// The sole produced record, if there is exactly one.
    pub fn single_produced(&self) -> Option<&R> {
        match self.produced.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Build a signer set from string keys, skipping invalid ones.
///
/// Intended for tests and fixtures; production callers parse keys with
/// [`PartyKey::new`] and surface the error.
pub fn signers<'a>(keys: impl IntoIterator<Item = &'a str>) -> SignerSet {
    keys.into_iter()
        .filter_map(|k| PartyKey::new(k).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_cardinality() {
        assert_eq!(Transition::issue(1).cardinality(), Cardinality::new(0, 1));
        assert_eq!(Transition::evolve(1, 2).cardinality(), Cardinality::new(1, 1));
        assert_eq!(Transition::retire(1).cardinality(), Cardinality::new(1, 0));
    }

    #[test]
    fn single_accessors_require_exactly_one() {
        let t = Transition::new(vec![1, 2], vec![3]);
        assert_eq!(t.single_consumed(), None);
        assert_eq!(t.single_produced(), Some(&3));
    }

    #[test]
    fn cardinality_display() {
        assert_eq!(Cardinality::new(1, 0).to_string(), "1 consumed / 0 produced");
    }

    #[test]
    fn signer_helper_dedups() {
        let s = signers(["a", "b", "a", ""]);
        assert_eq!(s.len(), 2);
    }
}
