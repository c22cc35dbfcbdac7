//! # Agreement Status Model
//!
//! The closed set of agreement statuses and the table of legal status
//! transitions, keyed by intent.
//!
//! ```text
//! REQUEST ──review──▶ IN_REVIEW
//!    │
//!    └──activate──▶ INEFFECT ──terminate──▶ TERMINATED
//!                      ├──────renew───────▶ RENEWED
//!                      ├──────expire──────▶ EXPIRED
//!                      └──────amend───────▶ AMENDED
//! ```
//!
//! Review is special: under the default lenient precondition any prior
//! status except `IN_REVIEW` may move to `IN_REVIEW`. The strict variant
//! requires `REQUEST`, matching the drawing above. See [`ReviewPrecondition`].
//!
//! Accounts have no status model.

use serde::{Deserialize, Serialize};

use crate::agreement::AgreementIntent;
use crate::rules::ReviewPrecondition;

/// Lifecycle status of an agreement version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgreementStatus {
    #[serde(rename = "REQUEST")]
    Request,
    #[serde(rename = "APPROVAL_REQUIRED")]
    ApprovalRequired,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "IN_REVIEW")]
    InReview,
    #[serde(rename = "DELEGATED")]
    Delegated,
    #[serde(rename = "ACTIVATED")]
    Activated,
    #[serde(rename = "INEFFECT")]
    InEffect,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "RENEWED")]
    Renewed,
    #[serde(rename = "TERMINATED")]
    Terminated,
    #[serde(rename = "AMENDED")]
    Amended,
    #[serde(rename = "SUPERSEDED")]
    Superseded,
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl AgreementStatus {
    /// Every status, in declaration order.
    pub const ALL: [AgreementStatus; 13] = [
        Self::Request,
        Self::ApprovalRequired,
        Self::Approved,
        Self::InReview,
        Self::Delegated,
        Self::Activated,
        Self::InEffect,
        Self::Rejected,
        Self::Renewed,
        Self::Terminated,
        Self::Amended,
        Self::Superseded,
        Self::Expired,
    ];

    /// Wire name, e.g. `"INEFFECT"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::ApprovalRequired => "APPROVAL_REQUIRED",
            Self::Approved => "APPROVED",
            Self::InReview => "IN_REVIEW",
            Self::Delegated => "DELEGATED",
            Self::Activated => "ACTIVATED",
            Self::InEffect => "INEFFECT",
            Self::Rejected => "REJECTED",
            Self::Renewed => "RENEWED",
            Self::Terminated => "TERMINATED",
            Self::Amended => "AMENDED",
            Self::Superseded => "SUPERSEDED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Parse a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|st| st.as_str() == s)
    }
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the consumed version's status must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Prior status must equal this one.
    Exactly(AgreementStatus),
    /// Prior status may be anything but this one.
    AnyExcept(AgreementStatus),
}

impl Precondition {
    /// Whether `status` satisfies the precondition.
    pub fn admits(&self, status: AgreementStatus) -> bool {
        match self {
            Self::Exactly(s) => status == *s,
            Self::AnyExcept(s) => status != *s,
        }
    }
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(s) => write!(f, "{s}"),
            Self::AnyExcept(s) => write!(f, "any except {s}"),
        }
    }
}

/// One row of the status transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub intent: AgreementIntent,
    pub from: Precondition,
    pub to: AgreementStatus,
}

/// Status-mutating rules. `Review` is listed with its lenient precondition;
/// [`StatusModel`] swaps it for the strict one when configured.
pub const AGREEMENT_STATUS_RULES: [StatusRule; 6] = [
    StatusRule {
        intent: AgreementIntent::Review,
        from: Precondition::AnyExcept(AgreementStatus::InReview),
        to: AgreementStatus::InReview,
    },
    StatusRule {
        intent: AgreementIntent::Activate,
        from: Precondition::Exactly(AgreementStatus::Request),
        to: AgreementStatus::InEffect,
    },
    StatusRule {
        intent: AgreementIntent::Terminate,
        from: Precondition::Exactly(AgreementStatus::InEffect),
        to: AgreementStatus::Terminated,
    },
    StatusRule {
        intent: AgreementIntent::Renew,
        from: Precondition::Exactly(AgreementStatus::InEffect),
        to: AgreementStatus::Renewed,
    },
    StatusRule {
        intent: AgreementIntent::Expire,
        from: Precondition::Exactly(AgreementStatus::InEffect),
        to: AgreementStatus::Expired,
    },
    StatusRule {
        intent: AgreementIntent::Amend,
        from: Precondition::Exactly(AgreementStatus::InEffect),
        to: AgreementStatus::Amended,
    },
];

/// Status a freshly created agreement must carry.
pub const INITIAL_STATUS: AgreementStatus = AgreementStatus::Request;

/// Table lookups over [`AGREEMENT_STATUS_RULES`] with the configured review
/// precondition applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusModel {
    review: ReviewPrecondition,
}

impl StatusModel {
    pub fn new(review: ReviewPrecondition) -> Self {
        Self { review }
    }

    /// The rule for a status-mutating intent; `None` for `Create`.
    pub fn rule(&self, intent: AgreementIntent) -> Option<StatusRule> {
        let mut rule = AGREEMENT_STATUS_RULES
            .iter()
            .copied()
            .find(|r| r.intent == intent)?;
        if intent == AgreementIntent::Review && self.review == ReviewPrecondition::Strict {
            rule.from = Precondition::Exactly(AgreementStatus::Request);
        }
        Some(rule)
    }

    /// Whether `intent` may move a version from `from` to `to`.
    ///
    /// Unknown combinations, including `Create`, are illegal.
    pub fn is_legal_transition(
        &self,
        intent: AgreementIntent,
        from: AgreementStatus,
        to: AgreementStatus,
    ) -> bool {
        self.rule(intent)
            .map(|r| r.from.admits(from) && r.to == to)
            .unwrap_or(false)
    }

    /// Every legal `(from, to)` pair for `intent`.
    pub fn legal_edges(&self, intent: AgreementIntent) -> Vec<(AgreementStatus, AgreementStatus)> {
        match self.rule(intent) {
            Some(rule) => AgreementStatus::ALL
                .iter()
                .copied()
                .filter(|s| rule.from.admits(*s))
                .map(|s| (s, rule.to))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> StatusModel {
        StatusModel::new(ReviewPrecondition::Lenient)
    }

    #[test]
    fn activation_requires_request() {
        let m = lenient();
        assert!(m.is_legal_transition(
            AgreementIntent::Activate,
            AgreementStatus::Request,
            AgreementStatus::InEffect
        ));
        assert!(!m.is_legal_transition(
            AgreementIntent::Activate,
            AgreementStatus::InReview,
            AgreementStatus::InEffect
        ));
        assert!(!m.is_legal_transition(
            AgreementIntent::Activate,
            AgreementStatus::Request,
            AgreementStatus::Activated
        ));
    }

    #[test]
    fn in_effect_fans_out_to_four_terminal_like_statuses() {
        let m = lenient();
        for (intent, to) in [
            (AgreementIntent::Terminate, AgreementStatus::Terminated),
            (AgreementIntent::Renew, AgreementStatus::Renewed),
            (AgreementIntent::Expire, AgreementStatus::Expired),
            (AgreementIntent::Amend, AgreementStatus::Amended),
        ] {
            assert!(m.is_legal_transition(intent, AgreementStatus::InEffect, to));
            assert!(!m.is_legal_transition(intent, AgreementStatus::Request, to));
        }
    }

    #[test]
    fn create_has_no_status_rule() {
        let m = lenient();
        assert!(m.rule(AgreementIntent::Create).is_none());
        for s in AgreementStatus::ALL {
            assert!(!m.is_legal_transition(AgreementIntent::Create, s, AgreementStatus::Request));
        }
    }

    #[test]
    fn lenient_review_admits_everything_but_in_review() {
        let edges = lenient().legal_edges(AgreementIntent::Review);
        assert_eq!(edges.len(), AgreementStatus::ALL.len() - 1);
        assert!(edges.iter().all(|(from, to)| *from != AgreementStatus::InReview
            && *to == AgreementStatus::InReview));
        assert!(lenient().is_legal_transition(
            AgreementIntent::Review,
            AgreementStatus::Terminated,
            AgreementStatus::InReview
        ));
    }

    #[test]
    fn strict_review_requires_request() {
        let m = StatusModel::new(ReviewPrecondition::Strict);
        assert_eq!(
            m.legal_edges(AgreementIntent::Review),
            vec![(AgreementStatus::Request, AgreementStatus::InReview)]
        );
    }

    #[test]
    fn wire_names_roundtrip() {
        for s in AgreementStatus::ALL {
            assert_eq!(AgreementStatus::parse(s.as_str()), Some(s));
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
        assert_eq!(AgreementStatus::parse("IN_EFFECT"), None);
    }
}
