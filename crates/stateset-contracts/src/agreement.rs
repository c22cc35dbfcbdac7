//! # Agreement Contract
//!
//! Agreements move through the status graph in [`crate::status`]. Every
//! version carries the same linear id; a status-mutating intent consumes
//! one version and produces its successor with only `status` changed.
//! Agreements are never deleted, they only reach terminal statuses.

use serde::{Deserialize, Serialize};
use stateset_core::{LinearId, Party, Timestamp};

use crate::authz::{self, SignerRequirement};
use crate::command::Intent;
use crate::contract::{check_cardinality, check_produced_invariants, Contract};
use crate::diff::check_only_fields_changed;
use crate::reject::RejectReason;
use crate::rules::{AgreementSignerPolicy, RulesConfig};
use crate::schema::{FieldSpec, FieldValue, RecordFamily, RecordSchema};
use crate::status::{AgreementStatus, StatusModel, INITIAL_STATUS};
use crate::transition::{Cardinality, SignerSet};

/// Kind of agreement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgreementType {
    /// Non-disclosure agreement.
    Nda,
    /// Master services agreement.
    Msa,
    /// Service level agreement.
    Sla,
    /// Statement of work.
    Sow,
}

impl AgreementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nda => "NDA",
            Self::Msa => "MSA",
            Self::Sla => "SLA",
            Self::Sow => "SOW",
        }
    }
}

impl std::fmt::Display for AgreementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Agreement Record ────────────────────────────────────────────────

/// One version of a contractual agreement between two parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Business reference number; fixed for the life of the agreement.
    pub number: String,
    pub name: String,
    /// Opaque fingerprint of the external agreement document.
    pub hash: String,
    pub status: AgreementStatus,
    pub agreement_type: AgreementType,
    /// Total value in whole currency units.
    pub value: i64,
    pub party: Party,
    pub counterparty: Party,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Timestamp>,
    pub linear_id: LinearId,
}

impl Agreement {
    /// The successor version carrying `status`, everything else unchanged.
    pub fn with_status(&self, status: AgreementStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agreement({}): {} has a contract with {} for {} and the current status is {}.",
            self.linear_id, self.counterparty, self.party, self.value, self.status
        )
    }
}

/// Field names of [`Agreement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgreementField {
    Number,
    Name,
    Hash,
    Status,
    AgreementType,
    Value,
    Party,
    Counterparty,
    StartDate,
    EndDate,
    Active,
    CreatedAt,
    LastUpdated,
    LinearId,
}

impl AgreementField {
    /// The serialized field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Hash => "hash",
            Self::Status => "status",
            Self::AgreementType => "agreement_type",
            Self::Value => "value",
            Self::Party => "party",
            Self::Counterparty => "counterparty",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Active => "active",
            Self::CreatedAt => "created_at",
            Self::LastUpdated => "last_updated",
            Self::LinearId => "linear_id",
        }
    }
}

impl std::fmt::Display for AgreementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const AGREEMENT_SCHEMA: [FieldSpec<AgreementField>; 14] = [
    FieldSpec::identity(AgreementField::Number),
    FieldSpec::identity(AgreementField::Name),
    FieldSpec::identity(AgreementField::Hash),
    FieldSpec::mutable(AgreementField::Status),
    FieldSpec::identity(AgreementField::AgreementType),
    FieldSpec::identity(AgreementField::Value),
    FieldSpec::identity(AgreementField::Party),
    FieldSpec::identity(AgreementField::Counterparty),
    FieldSpec::identity(AgreementField::StartDate),
    FieldSpec::identity(AgreementField::EndDate),
    FieldSpec::identity(AgreementField::Active),
    FieldSpec::identity(AgreementField::CreatedAt),
    FieldSpec::identity(AgreementField::LastUpdated),
    FieldSpec::identity(AgreementField::LinearId),
];

impl RecordSchema for Agreement {
    type Field = AgreementField;

    const FAMILY: RecordFamily = RecordFamily::Agreement;

    fn schema() -> &'static [FieldSpec<AgreementField>] {
        &AGREEMENT_SCHEMA
    }

    fn field_value(&self, field: AgreementField) -> FieldValue {
        match field {
            AgreementField::Number => FieldValue::Text(self.number.clone()),
            AgreementField::Name => FieldValue::Text(self.name.clone()),
            AgreementField::Hash => FieldValue::Text(self.hash.clone()),
            AgreementField::Status => FieldValue::Text(self.status.to_string()),
            AgreementField::AgreementType => FieldValue::Text(self.agreement_type.to_string()),
            AgreementField::Value => FieldValue::Integer(self.value),
            AgreementField::Party => FieldValue::Participant(self.party.clone()),
            AgreementField::Counterparty => FieldValue::Participant(self.counterparty.clone()),
            AgreementField::StartDate => FieldValue::Moment(self.start_date),
            AgreementField::EndDate => FieldValue::Moment(self.end_date),
            AgreementField::Active => FieldValue::flag(self.active),
            AgreementField::CreatedAt => FieldValue::moment(self.created_at),
            AgreementField::LastUpdated => FieldValue::moment(self.last_updated),
            AgreementField::LinearId => FieldValue::Linear(self.linear_id),
        }
    }

    fn participants(&self) -> Vec<&Party> {
        vec![&self.party, &self.counterparty]
    }

    fn check_invariants(&self) -> Result<(), String> {
        if self.party.owning_key == self.counterparty.owning_key {
            return Err(format!(
                "party and counterparty must differ, both are {}",
                self.party.owning_key
            ));
        }
        Ok(())
    }
}

// ─── Intents ─────────────────────────────────────────────────────────

/// What an agreement transaction is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgreementIntent {
    Create,
    Review,
    Activate,
    Terminate,
    Renew,
    Expire,
    Amend,
}

impl AgreementIntent {
    /// Only `status` may ever change between versions.
    pub const ALLOWED_CHANGES: &'static [AgreementField] = &[AgreementField::Status];
}

impl Intent for AgreementIntent {
    const ALL: &'static [Self] = &[
        Self::Create,
        Self::Review,
        Self::Activate,
        Self::Terminate,
        Self::Renew,
        Self::Expire,
        Self::Amend,
    ];

    fn command_name(&self) -> &'static str {
        match self {
            Self::Create => "CreateAgreement",
            Self::Review => "ReviewAgreement",
            Self::Activate => "ActivateAgreement",
            Self::Terminate => "TerminateAgreement",
            Self::Renew => "RenewAgreement",
            Self::Expire => "ExpireAgreement",
            Self::Amend => "AmendAgreement",
        }
    }

    fn cardinality(&self) -> Cardinality {
        match self {
            Self::Create => Cardinality::new(0, 1),
            _ => Cardinality::new(1, 1),
        }
    }
}

impl std::fmt::Display for AgreementIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command_name())
    }
}

// ─── Contract ────────────────────────────────────────────────────────

/// Validation rules for the agreement family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgreementContract {
    status_model: StatusModel,
    signer_policy: AgreementSignerPolicy,
}

impl AgreementContract {
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            status_model: StatusModel::new(rules.review_precondition),
            signer_policy: rules.agreement_signers,
        }
    }

    /// The status model this contract checks against.
    pub fn status_model(&self) -> &StatusModel {
        &self.status_model
    }

    pub fn signer_policy(&self) -> AgreementSignerPolicy {
        self.signer_policy
    }

    /// The status `intent` moves an agreement to, if it changes status.
    pub fn target_status(&self, intent: AgreementIntent) -> Option<AgreementStatus> {
        self.status_model.rule(intent).map(|r| r.to)
    }

    fn check_create(&self, produced: &Agreement) -> Result<(), RejectReason> {
        if produced.status != INITIAL_STATUS {
            return Err(RejectReason::structural(format!(
                "a new agreement must have status {INITIAL_STATUS}, got {}",
                produced.status
            )));
        }
        Ok(())
    }

    fn check_status_step(
        &self,
        intent: AgreementIntent,
        prior: &Agreement,
        next: &Agreement,
    ) -> Result<(), RejectReason> {
        if self
            .status_model
            .is_legal_transition(intent, prior.status, next.status)
        {
            Ok(())
        } else {
            Err(RejectReason::IllegalStatusTransition {
                intent: intent.command_name().to_string(),
                from: prior.status,
                to: next.status,
            })
        }
    }
}

impl From<RulesConfig> for AgreementContract {
    fn from(rules: RulesConfig) -> Self {
        Self::new(rules)
    }
}

impl SignerRequirement<Agreement> for AgreementContract {
    type Intent = AgreementIntent;

    fn required_signers(
        &self,
        intent: AgreementIntent,
        consumed: &[Agreement],
        produced: &[Agreement],
    ) -> SignerSet {
        let both = |a: &Agreement| -> SignerSet {
            [a.party.owning_key.clone(), a.counterparty.owning_key.clone()]
                .into_iter()
                .collect()
        };
        if intent == AgreementIntent::Create {
            return produced.first().map(both).unwrap_or_default();
        }
        let Some(prior) = consumed.first() else {
            return SignerSet::new();
        };
        match self.signer_policy {
            AgreementSignerPolicy::CreateOnly => SignerSet::new(),
            AgreementSignerPolicy::Party => [prior.party.owning_key.clone()].into_iter().collect(),
            AgreementSignerPolicy::BothParties => both(prior),
        }
    }
}

impl Contract for AgreementContract {
    type Record = Agreement;
    type Intent = AgreementIntent;

    fn verify(
        &self,
        intent: AgreementIntent,
        consumed: &[Agreement],
        produced: &[Agreement],
        supplied: &SignerSet,
    ) -> Result<(), RejectReason> {
        check_cardinality(Agreement::FAMILY, intent, consumed.len(), produced.len())?;
        check_produced_invariants(produced)?;

        match (consumed, produced) {
            ([], [created]) => self.check_create(created)?,
            ([prior], [next]) => {
                self.check_status_step(intent, prior, next)?;
                check_only_fields_changed(prior, next, AgreementIntent::ALLOWED_CHANGES)?;
            }
            _ => {}
        }

        let required = self.required_signers(intent, consumed, produced);
        authz::verify(&required, supplied)?;
        Ok(())
    }
}
