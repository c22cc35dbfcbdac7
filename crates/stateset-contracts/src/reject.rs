//! # Rejection Reasons
//!
//! Every way a proposed transition can fail. A rejection is a verdict on
//! caller-supplied input: never process-fatal, never retried automatically.
//! Validation short-circuits on the first failed check, so a transition
//! always yields exactly one reason, and the same input always yields the
//! same reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::authz::MissingSigners;
use crate::diff::DiffViolation;
use crate::schema::RecordFamily;
use crate::status::AgreementStatus;
use crate::transition::{Cardinality, SignerSet};

/// Why a transition was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Wrong number of consumed or produced records for the intent.
    #[error("{family} {intent} expects {expected}, got {actual}")]
    CardinalityMismatch {
        family: RecordFamily,
        intent: String,
        expected: Cardinality,
        actual: Cardinality,
    },

    /// An entity-specific structural rule does not hold.
    #[error("structural violation: {description}")]
    StructuralViolation { description: String },

    /// Prior or target status does not match the intent's status rule.
    #[error("{intent} cannot move an agreement from {from} to {to}")]
    IllegalStatusTransition {
        intent: String,
        from: AgreementStatus,
        to: AgreementStatus,
    },

    /// A field outside the intent's allowed set differs between versions.
    #[error("field `{field}` must not change: {prior} -> {proposed}")]
    ImmutableFieldChanged {
        field: String,
        prior: String,
        proposed: String,
    },

    /// A required endorser is absent from the supplied signer set.
    #[error("missing required signers: {}", render_keys(&missing_of(.required, .supplied)))]
    MissingSigners {
        required: SignerSet,
        supplied: SignerSet,
    },

    /// No recognised intent, or more than one.
    #[error("unrecognised command set [{}]", .commands.join(", "))]
    UnrecognizedCommand { commands: Vec<String> },
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CardinalityMismatch { .. } => "CARDINALITY_MISMATCH",
            Self::StructuralViolation { .. } => "STRUCTURAL_VIOLATION",
            Self::IllegalStatusTransition { .. } => "ILLEGAL_STATUS_TRANSITION",
            Self::ImmutableFieldChanged { .. } => "IMMUTABLE_FIELD_CHANGED",
            Self::MissingSigners { .. } => "MISSING_SIGNERS",
            Self::UnrecognizedCommand { .. } => "UNRECOGNIZED_COMMAND",
        }
    }

    /// Shorthand for a structural violation.
    pub fn structural(description: impl Into<String>) -> Self {
        Self::StructuralViolation {
            description: description.into(),
        }
    }

    /// For `MissingSigners`, the required keys that were not supplied.
    pub fn missing_signers(&self) -> Option<SignerSet> {
        match self {
            Self::MissingSigners { required, supplied } => Some(missing_of(required, supplied)),
            _ => None,
        }
    }
}

impl From<DiffViolation> for RejectReason {
    fn from(v: DiffViolation) -> Self {
        Self::ImmutableFieldChanged {
            field: v.field,
            prior: v.prior.to_string(),
            proposed: v.proposed.to_string(),
        }
    }
}

impl From<MissingSigners> for RejectReason {
    fn from(m: MissingSigners) -> Self {
        Self::MissingSigners {
            required: m.required,
            supplied: m.supplied,
        }
    }
}

fn missing_of(required: &SignerSet, supplied: &SignerSet) -> SignerSet {
    required.difference(supplied).cloned().collect()
}

fn render_keys(keys: &SignerSet) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::signers;

    #[test]
    fn codes_are_stable() {
        let r = RejectReason::structural("x");
        assert_eq!(r.code(), "STRUCTURAL_VIOLATION");
        let r = RejectReason::UnrecognizedCommand { commands: vec![] };
        assert_eq!(r.code(), "UNRECOGNIZED_COMMAND");
    }

    #[test]
    fn missing_signers_message_lists_only_missing() {
        let r = RejectReason::MissingSigners {
            required: signers(["p", "q"]),
            supplied: signers(["p"]),
        };
        assert_eq!(r.to_string(), "missing required signers: q");
        assert_eq!(r.missing_signers(), Some(signers(["q"])));
    }

    #[test]
    fn serializes_with_code_tag() {
        let r = RejectReason::IllegalStatusTransition {
            intent: "ActivateAgreement".into(),
            from: AgreementStatus::InReview,
            to: AgreementStatus::InEffect,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["code"], "ILLEGAL_STATUS_TRANSITION");
        assert_eq!(json["from"], "IN_REVIEW");
        assert_eq!(json["to"], "INEFFECT");
        let back: RejectReason = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn cardinality_message() {
        let r = RejectReason::CardinalityMismatch {
            family: RecordFamily::Account,
            intent: "DeleteAccount".into(),
            expected: Cardinality::new(1, 0),
            actual: Cardinality::new(1, 1),
        };
        assert_eq!(
            r.to_string(),
            "account DeleteAccount expects 1 consumed / 0 produced, got 1 consumed / 1 produced"
        );
    }
}
