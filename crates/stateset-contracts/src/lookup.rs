//! # Collaborator Interfaces
//!
//! The validator never looks anything up itself. Callers that assemble
//! transitions from stored records use [`RecordLookup`]; callers that want
//! to show a rejection to a person use [`SignerDirectory`] to turn keys
//! into party names. Neither capability influences a verdict.

use std::collections::BTreeMap;

use stateset_core::{LinearId, PartyKey};

use crate::account::Account;
use crate::agreement::Agreement;
use crate::reject::RejectReason;
use crate::transition::SignerSet;

/// Read-only access to current (unconsumed) record versions.
pub trait RecordLookup {
    /// The current version of an account.
    fn account(&self, account_id: &str) -> Option<Account>;

    /// Accounts whose controller is `owner`.
    fn accounts_by_owner(&self, owner: &PartyKey) -> Vec<Account>;

    /// The current version of an agreement.
    fn agreement(&self, linear_id: &LinearId) -> Option<Agreement>;

    /// Agreements in which `key` is party or counterparty.
    fn agreements_by_party(&self, key: &PartyKey) -> Vec<Agreement>;
}

/// Resolves signing keys to display names.
pub trait SignerDirectory {
    fn party_name(&self, key: &PartyKey) -> Option<String>;
}

impl SignerDirectory for BTreeMap<PartyKey, String> {
    fn party_name(&self, key: &PartyKey) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Render a rejection for a human, naming parties where the directory
/// knows them. Unknown keys are shown as-is.
pub fn describe_rejection<D: SignerDirectory + ?Sized>(reason: &RejectReason, directory: &D) -> String {
    match reason {
        RejectReason::MissingSigners { required, supplied } => {
            let missing: SignerSet = required.difference(supplied).cloned().collect();
            let names = missing
                .iter()
                .map(|k| match directory.party_name(k) {
                    Some(name) => format!("{name} ({k})"),
                    None => k.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("transaction must also be signed by {names}")
        }
        other => other.to_string(),
    }
}
