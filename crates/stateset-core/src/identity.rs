//! # Participant and Record Identity
//!
//! A [`Party`] is a participant in a record: a human-readable legal name
//! bound to the key it endorses transitions with. Endorsement sets are sets
//! of [`PartyKey`]s; names exist only for display.
//!
//! A [`LinearId`] is the handle that survives across successive versions of
//! "the same" record. Consuming a version and producing its successor keeps
//! the linear id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// The public key (or key fingerprint) a party endorses transitions with.
///
/// Opaque to the ledger: any non-empty string without surrounding
/// whitespace is accepted. Ordering is lexical so signer sets render
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyKey(String);

impl PartyKey {
    /// Validate and wrap a key string.
    pub fn new(key: impl Into<String>) -> Result<Self, CoreError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CoreError::InvalidParty("party key must not be empty".into()));
        }
        if key.trim() != key {
            return Err(CoreError::InvalidParty(format!(
                "party key {key:?} has surrounding whitespace"
            )));
        }
        Ok(Self(key))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PartyKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PartyKey> for String {
    fn from(key: PartyKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for PartyKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A record participant: legal name plus owning key.
///
/// Two parties are equal only if both name and key match, so renaming a
/// participant in a successor version counts as a field change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PartyWire")]
pub struct Party {
    /// Legal or organisation name, e.g. `"Stateset Buyer Ltd"`.
    pub name: String,
    /// Key the party signs with.
    pub owning_key: PartyKey,
}

impl Party {
    /// Build a party, rejecting an empty name.
    pub fn new(name: impl Into<String>, owning_key: PartyKey) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidParty("party name must not be empty".into()));
        }
        Ok(Self { name, owning_key })
    }
}

#[derive(Deserialize)]
struct PartyWire {
    name: String,
    owning_key: PartyKey,
}

impl TryFrom<PartyWire> for Party {
    type Error = CoreError;

    fn try_from(wire: PartyWire) -> Result<Self, Self::Error> {
        Self::new(wire.name, wire.owning_key)
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identity of a record that persists across its versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinearId(pub Uuid);

impl LinearId {
    /// Generate a new random linear identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a hyphenated or simple UUID string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidLinearId {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for LinearId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinearId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_key_rejects_empty_and_padded() {
        assert!(PartyKey::new("").is_err());
        assert!(PartyKey::new(" abc").is_err());
        assert!(PartyKey::new("abc\n").is_err());
        assert_eq!(PartyKey::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn party_requires_name() {
        let key = PartyKey::new("k1").unwrap();
        assert!(Party::new("  ", key.clone()).is_err());
        let p = Party::new("Buyer", key).unwrap();
        assert_eq!(p.to_string(), "Buyer");
    }

    #[test]
    fn parties_with_same_key_but_different_names_differ() {
        let key = PartyKey::new("k1").unwrap();
        let a = Party::new("Buyer", key.clone()).unwrap();
        let b = Party::new("Buyer Holdings", key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn linear_id_parse_roundtrip() {
        let id = LinearId::new();
        let parsed = LinearId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(LinearId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn party_key_serializes_transparently() {
        let key = PartyKey::new("O=Seller,L=London,C=GB").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""O=Seller,L=London,C=GB""#);
    }

    #[test]
    fn party_key_deserialization_validates() {
        let key: PartyKey = serde_json::from_str(r#""k-1""#).unwrap();
        assert_eq!(key.as_str(), "k-1");
        assert!(serde_json::from_str::<PartyKey>("\"\"").is_err());
        assert!(serde_json::from_str::<PartyKey>("\" padded\"").is_err());
    }

    #[test]
    fn party_deserialization_rejects_empty_name() {
        let p: Party = serde_json::from_str(r#"{"name":"Buyer","owning_key":"k1"}"#).unwrap();
        assert_eq!(p.name, "Buyer");
        assert!(serde_json::from_str::<Party>(r#"{"name":"  ","owning_key":"k1"}"#).is_err());
        assert!(serde_json::from_str::<Party>(r#"{"name":"","owning_key":"k1"}"#).is_err());
    }
}
