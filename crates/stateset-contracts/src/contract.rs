//! # Transition Validator
//!
//! A [`Contract`] decides ACCEPT or REJECT for one record family. Each
//! family implements [`Contract::verify`] as an ordered list of checks that
//! stops at the first failure:
//!
//! ```text
//! cardinality ─▶ structural ─▶ status pre/post ─▶ immutability ─▶ signers
//! ```
//!
//! A status step that breaks the intent's rule is reported before any
//! frozen field that also changed. Accounts skip the status step.
//!
//! Contracts are pure: no I/O, no shared mutable state. A contract value
//! only carries its rule configuration and may be shared freely across
//! threads.

use crate::account::AccountContract;
use crate::agreement::AgreementContract;
use crate::command::{select_intent, Intent};
use crate::reject::RejectReason;
use crate::rules::RulesConfig;
use crate::schema::{RecordFamily, RecordSchema};
use crate::transition::{Cardinality, SignerSet, Transition};

/// Validation rules for one record family.
pub trait Contract {
    type Record: RecordSchema;
    type Intent: Intent;

    /// Run every check for `intent`, returning the first failure.
    fn verify(
        &self,
        intent: Self::Intent,
        consumed: &[Self::Record],
        produced: &[Self::Record],
        supplied: &SignerSet,
    ) -> Result<(), RejectReason>;

    /// [`verify`](Self::verify) plus the verdict log line.
    fn validate(
        &self,
        intent: Self::Intent,
        consumed: &[Self::Record],
        produced: &[Self::Record],
        supplied: &SignerSet,
    ) -> Result<(), RejectReason> {
        let verdict = self.verify(intent, consumed, produced, supplied);
        let family = Self::Record::FAMILY;
        match &verdict {
            Ok(()) => tracing::debug!(
                family = %family,
                intent = intent.command_name(),
                consumed = consumed.len(),
                produced = produced.len(),
                "transition accepted"
            ),
            Err(reason) => tracing::info!(
                family = %family,
                intent = intent.command_name(),
                code = reason.code(),
                %reason,
                "transition rejected"
            ),
        }
        verdict
    }

    /// Validate a whole [`Transition`].
    fn validate_transition(
        &self,
        intent: Self::Intent,
        tx: &Transition<Self::Record>,
        supplied: &SignerSet,
    ) -> Result<(), RejectReason> {
        self.validate(intent, &tx.consumed, &tx.produced, supplied)
    }

    /// Select the intent from a transaction's command names, then validate.
    ///
    /// Returns the selected intent on acceptance.
    fn validate_commands<C: AsRef<str>>(
        &self,
        commands: &[C],
        tx: &Transition<Self::Record>,
        supplied: &SignerSet,
    ) -> Result<Self::Intent, RejectReason> {
        let intent = select_intent::<Self::Intent, C>(commands)?;
        self.validate_transition(intent, tx, supplied)?;
        Ok(intent)
    }
}

/// Step 1: exact consumed/produced counts.
pub(crate) fn check_cardinality<I: Intent>(
    family: RecordFamily,
    intent: I,
    consumed: usize,
    produced: usize,
) -> Result<(), RejectReason> {
    let expected = intent.cardinality();
    let actual = Cardinality::new(consumed, produced);
    if expected == actual {
        Ok(())
    } else {
        Err(RejectReason::CardinalityMismatch {
            family,
            intent: intent.command_name().to_string(),
            expected,
            actual,
        })
    }
}

/// Step 2 (shared half): every produced version satisfies its own invariants.
pub(crate) fn check_produced_invariants<R: RecordSchema>(produced: &[R]) -> Result<(), RejectReason> {
    produced
        .iter()
        .try_for_each(|r| r.check_invariants().map_err(RejectReason::structural))
}

// ─── Contract Set ────────────────────────────────────────────────────

/// Both family contracts built from one [`RulesConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractSet {
    pub account: AccountContract,
    pub agreement: AgreementContract,
}

impl ContractSet {
    /// Contracts configured by `rules`.
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            account: AccountContract,
            agreement: AgreementContract::new(rules),
        }
    }
}

impl From<RulesConfig> for ContractSet {
    fn from(rules: RulesConfig) -> Self {
        Self::new(rules)
    }
}
