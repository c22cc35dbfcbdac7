//! # stateset-core: Foundational Types for the Stateset Ledger
//!
//! Leaf crate of the workspace. It defines the primitives every record
//! family is built from: who a participant is, how a record keeps its
//! identity across versions, how time is represented, and how a record
//! version is content-addressed.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `PartyKey`, `LinearId`: no bare strings
//!    or UUIDs cross a crate boundary where a participant or a record
//!    identity is meant.
//!
//! 2. **`CanonicalBytes` newtype.** Record digests are computed only from
//!    bytes produced by `CanonicalBytes::new()` (RFC 8785 JCS, floats
//!    rejected), so two parties hashing the same record version always agree.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with a `Z` suffix at
//!    seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stateset-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{record_digest, sha256_digest, RecordDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{LinearId, Party, PartyKey};
pub use temporal::Timestamp;
