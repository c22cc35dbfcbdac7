//! # Authorization Checker
//!
//! Computing who must endorse a transition is separated from checking that
//! they did. Each contract implements [`SignerRequirement`] as a pure
//! function of intent and records; [`verify`] is the shared subset test.

use thiserror::Error;

use crate::schema::RecordSchema;
use crate::transition::SignerSet;

/// Required endorsers that were not supplied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} required signer(s) missing", .required.difference(.supplied).count())]
pub struct MissingSigners {
    pub required: SignerSet,
    pub supplied: SignerSet,
}

impl MissingSigners {
    /// `required \ supplied`.
    pub fn missing(&self) -> SignerSet {
        self.required.difference(&self.supplied).cloned().collect()
    }
}

/// Policy computing the endorser set an intent requires.
pub trait SignerRequirement<R: RecordSchema> {
    type Intent;

    /// Keys that must appear among the supplied signers. Callers check
    /// cardinality first, so implementations may assume the counts the
    /// intent requires.
    fn required_signers(&self, intent: Self::Intent, consumed: &[R], produced: &[R]) -> SignerSet;
}

/// Succeeds when every required key is in `supplied`.
pub fn verify(required: &SignerSet, supplied: &SignerSet) -> Result<(), MissingSigners> {
    if required.is_subset(supplied) {
        Ok(())
    } else {
        Err(MissingSigners {
            required: required.clone(),
            supplied: supplied.clone(),
        })
    }
}
