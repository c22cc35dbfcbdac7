//! # Entity Schema
//!
//! Each record family declares its field list once, tagging every field as
//! an identity field (never changes between versions) or a mutable field
//! (changes only when the rule for an intent names it). The immutability
//! checker and the structural checks work off these tables, never off
//! runtime reflection.

use serde::{de::DeserializeOwned, Serialize};
use stateset_core::{LinearId, Party, Timestamp};

/// The record families the ledger knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFamily {
    /// Business accounts: presence/absence lifecycle, no status.
    Account,
    /// Contractual agreements: status-driven lifecycle.
    Agreement,
}

impl RecordFamily {
    /// Lowercase family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Agreement => "agreement",
        }
    }
}

impl std::fmt::Display for RecordFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field may ever change between two versions of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Fixed for the lifetime of the record.
    Identity,
    /// May change, but only under a rule that lists it.
    Mutable,
}

/// One row of a family's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<F> {
    pub field: F,
    pub role: FieldRole,
}

impl<F> FieldSpec<F> {
    pub const fn identity(field: F) -> Self {
        Self {
            field,
            role: FieldRole::Identity,
        }
    }

    pub const fn mutable(field: F) -> Self {
        Self {
            field,
            role: FieldRole::Mutable,
        }
    }
}

/// A field's value lifted into a comparable, printable form.
///
/// Used only for diffing and for rejection messages; records keep their
/// strongly typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Moment(Timestamp),
    Participant(Party),
    Linear(LinearId),
    Absent,
}

impl FieldValue {
    /// Lift an optional flag.
    pub fn flag(value: Option<bool>) -> Self {
        value.map(Self::Flag).unwrap_or(Self::Absent)
    }

    /// Lift an optional timestamp.
    pub fn moment(value: Option<Timestamp>) -> Self {
        value.map(Self::Moment).unwrap_or(Self::Absent)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Moment(ts) => write!(f, "{ts}"),
            Self::Participant(p) => write!(f, "{} ({})", p.name, p.owning_key),
            Self::Linear(id) => write!(f, "{id}"),
            Self::Absent => f.write_str("<absent>"),
        }
    }
}

/// Static description of a record family.
pub trait RecordSchema: Clone + std::fmt::Debug + Serialize + DeserializeOwned {
    /// Field name enumeration for this family.
    type Field: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display + 'static;

    /// Which family this is.
    const FAMILY: RecordFamily;

    /// Every field, in declaration order.
    fn schema() -> &'static [FieldSpec<Self::Field>];

    /// The current value of `field`.
    fn field_value(&self, field: Self::Field) -> FieldValue;

    /// The parties with an interest in this record.
    fn participants(&self) -> Vec<&Party>;

    /// Invariants that hold for any single version, independent of intent.
    ///
    /// Returns a description of the first violated invariant.
    fn check_invariants(&self) -> Result<(), String>;

    /// Fields that may never change.
    fn identity_fields() -> Vec<Self::Field> {
        Self::schema()
            .iter()
            .filter(|s| s.role == FieldRole::Identity)
            .map(|s| s.field)
            .collect()
    }

    /// Fields some rule may allow to change.
    fn mutable_fields() -> Vec<Self::Field> {
        Self::schema()
            .iter()
            .filter(|s| s.role == FieldRole::Mutable)
            .map(|s| s.field)
            .collect()
    }

    /// Role of a given field.
    fn role_of(field: Self::Field) -> FieldRole {
        Self::schema()
            .iter()
            .find(|s| s.field == field)
            .map(|s| s.role)
            .unwrap_or(FieldRole::Mutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stateset_core::PartyKey;

    #[test]
    fn absent_renders_placeholder() {
        assert_eq!(FieldValue::flag(None).to_string(), "<absent>");
        assert_eq!(FieldValue::flag(Some(true)).to_string(), "true");
    }

    #[test]
    fn participant_renders_name_and_key() {
        let p = Party::new("Seller", PartyKey::new("k-seller").unwrap()).unwrap();
        assert_eq!(
            FieldValue::Participant(p).to_string(),
            "Seller (k-seller)"
        );
    }

    #[test]
    fn text_is_quoted() {
        assert_eq!(FieldValue::Text("555".into()).to_string(), "\"555\"");
    }

    #[test]
    fn family_names() {
        assert_eq!(RecordFamily::Account.to_string(), "account");
        assert_eq!(
            serde_json::to_string(&RecordFamily::Agreement).unwrap(),
            "\"agreement\""
        );
    }
}
