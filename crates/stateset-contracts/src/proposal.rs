//! # Transaction Proposals
//!
//! A proposal is the wire form of a transaction awaiting validation:
//!
//! ```json
//! {
//!   "family": "agreement",
//!   "commands": ["ActivateAgreement"],
//!   "consumed": [ { ...agreement... } ],
//!   "produced": [ { ...agreement... } ],
//!   "signers": ["key-seller"]
//! }
//! ```
//!
//! The `family` tag picks the contract; the command names pick the intent.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::agreement::Agreement;
use crate::contract::{Contract, ContractSet};
use crate::reject::RejectReason;
use crate::schema::RecordFamily;
use crate::transition::{SignerSet, Transition};

/// Commands, records and signers of one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<R> {
    pub commands: Vec<String>,
    #[serde(default = "Vec::new")]
    pub consumed: Vec<R>,
    #[serde(default = "Vec::new")]
    pub produced: Vec<R>,
    #[serde(default)]
    pub signers: SignerSet,
}

impl<R: Clone> Envelope<R> {
    /// The records as a [`Transition`].
    pub fn transition(&self) -> Transition<R> {
        Transition::new(self.consumed.clone(), self.produced.clone())
    }
}

/// A proposed transaction tagged by record family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Proposal {
    Account(Envelope<Account>),
    Agreement(Envelope<Agreement>),
}

/// An accepted proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accepted {
    pub family: RecordFamily,
    /// Command name of the selected intent.
    pub intent: &'static str,
}

impl Proposal {
    pub fn family(&self) -> RecordFamily {
        match self {
            Self::Account(_) => RecordFamily::Account,
            Self::Agreement(_) => RecordFamily::Agreement,
        }
    }

    pub fn commands(&self) -> &[String] {
        match self {
            Self::Account(e) => &e.commands,
            Self::Agreement(e) => &e.commands,
        }
    }

    pub fn signers(&self) -> &SignerSet {
        match self {
            Self::Account(e) => &e.signers,
            Self::Agreement(e) => &e.signers,
        }
    }

    /// Parse a proposal from JSON.
    pub fn from_json(doc: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(doc)
    }

    /// Validate against the matching contract in `contracts`.
    pub fn validate(&self, contracts: &ContractSet) -> Result<Accepted, RejectReason> {
        use crate::command::Intent;

        let intent = match self {
            Self::Account(e) => contracts
                .account
                .validate_commands(&e.commands, &e.transition(), &e.signers)?
                .command_name(),
            Self::Agreement(e) => contracts
                .agreement
                .validate_commands(&e.commands, &e.transition(), &e.signers)?
                .command_name(),
        };
        Ok(Accepted {
            family: self.family(),
            intent,
        })
    }
}
