//! # stateset-contracts: Transition Validation Engine
//!
//! Decides, for every proposed change to an Account or Agreement record,
//! whether the change is legal before it is committed. A proposed
//! transition is a set of consumed prior versions, a set of produced new
//! versions, a declared intent, and the keys that endorsed it. The verdict
//! is `Ok(())` or exactly one [`RejectReason`].
//!
//! ## Components
//!
//! | Module | Role |
//! |---|---|
//! | [`schema`] | Field tables: identity vs. mutable fields per family |
//! | [`status`] | Agreement status enumeration and legal-transition table |
//! | [`diff`] | "Only these fields may change" structural diff |
//! | [`authz`] | Required-signer computation and subset check |
//! | [`contract`] | The ordered validator composing the above |
//! | [`account`], [`agreement`] | The two record families and their rules |
//!
//! ## Usage
//!
//! ```
//! use stateset_contracts::{AgreementContract, AgreementIntent, Contract};
//! use stateset_contracts::transition::SignerSet;
//!
//! let contract = AgreementContract::default();
//! let verdict = contract.validate(AgreementIntent::Create, &[], &[], &SignerSet::new());
//! assert_eq!(verdict.unwrap_err().code(), "CARDINALITY_MISMATCH");
//! ```
//!
//! ## Crate Policy
//!
//! - Pure: no I/O, no global state, no interior mutability.
//! - Depends only on `stateset-core`.

pub mod account;
pub mod agreement;
pub mod authz;
pub mod command;
pub mod contract;
pub mod diff;
pub mod lookup;
pub mod proposal;
pub mod reject;
pub mod rules;
pub mod schema;
pub mod status;
pub mod transition;

pub use account::{Account, AccountContract, AccountField, AccountIntent, TypeOfBusiness};
pub use agreement::{Agreement, AgreementContract, AgreementField, AgreementIntent, AgreementType};
pub use authz::{MissingSigners, SignerRequirement};
pub use command::{select_intent, Intent};
pub use contract::{Contract, ContractSet};
pub use diff::{changed_fields, check_only_fields_changed, DiffViolation};
pub use lookup::{describe_rejection, RecordLookup, SignerDirectory};
pub use proposal::{Accepted, Envelope, Proposal};
pub use reject::RejectReason;
pub use rules::{AgreementSignerPolicy, ReviewPrecondition, RulesConfig, RulesConfigError};
pub use schema::{FieldRole, FieldSpec, FieldValue, RecordFamily, RecordSchema};
pub use status::{AgreementStatus, Precondition, StatusModel, StatusRule, INITIAL_STATUS};
pub use transition::{Cardinality, SignerSet, Transition};
