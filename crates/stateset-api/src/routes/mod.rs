//! # API Route Modules
//!
//! Each module owns one resource prefix. Mutating handlers follow the same
//! shape: build the `(intent, consumed, produced, signers)` tuple from the
//! vault and the request, run the family contract, and commit only on
//! acceptance, all under the entry's write lock.

pub mod accounts;
pub mod agreements;
pub mod parties;
pub mod transitions;

use serde::Deserialize;
use stateset_contracts::SignerSet;
use stateset_core::PartyKey;
use utoipa::ToSchema;

use crate::extractors::{signer_set, Validate};

/// Body of transitions that only need endorsements.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignedRequest {
    /// Keys that endorsed the transition.
    #[schema(value_type = Vec<String>)]
    pub signers: Vec<PartyKey>,
}

impl SignedRequest {
    pub fn signer_set(&self) -> SignerSet {
        self.signers.iter().cloned().collect()
    }
}

impl Validate for SignedRequest {
    fn validate(&self) -> Result<(), String> {
        signer_set(&self.signers).map(|_| ())
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.len() > 255 {
        return Err(format!("{field} must not exceed 255 characters"));
    }
    Ok(())
}
