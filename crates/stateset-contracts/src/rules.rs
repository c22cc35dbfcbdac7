//! # Rule Configuration
//!
//! Two policies are deliberately configurable rather than hard-coded: how
//! strict the agreement review precondition is, and which signers agreement
//! status changes require. Defaults reproduce the ledger's historical rule
//! set; operators tighten them through a YAML rules file.
//!
//! ```yaml
//! review_precondition: strict     # lenient | strict
//! agreement_signers: both_parties # create_only | party | both_parties
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Precondition applied to `ReviewAgreement`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPrecondition {
    /// Any prior status except `IN_REVIEW`.
    #[default]
    Lenient,
    /// Prior status must be `REQUEST`.
    Strict,
}

/// Signers required for agreement intents other than `Create`.
///
/// `Create` always requires both `party` and `counterparty`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementSignerPolicy {
    /// No requirement beyond `Create`.
    #[default]
    CreateOnly,
    /// The consumed version's `party` must sign every status change.
    Party,
    /// Both `party` and `counterparty` must sign every status change.
    BothParties,
}

/// Complete rule configuration for the contracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub review_precondition: ReviewPrecondition,
    pub agreement_signers: AgreementSignerPolicy,
}

/// Error loading a rules file.
#[derive(Error, Debug)]
pub enum RulesConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rules document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RulesConfig {
    /// Parse a YAML rules document. Missing keys take their defaults.
    pub fn from_yaml_str(doc: &str) -> Result<Self, RulesConfigError> {
        if doc.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(doc)?)
    }

    /// Read and parse a YAML rules file.
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self, RulesConfigError> {
        let doc = std::fs::read_to_string(path).map_err(|source| RulesConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&doc)
    }
}
