//! # Validate Subcommand
//!
//! Reads a proposal document, resolves its intent from the command names,
//! and runs the matching contract. Party names for the rejection message
//! come from the records in the proposal itself.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use stateset_contracts::{describe_rejection, ContractSet, Proposal, RecordSchema};
use stateset_core::{Party, PartyKey};

use crate::{load_rules, EXIT_OK, EXIT_REJECTED};

/// Arguments for the `stateset validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the proposal JSON document.
    pub proposal: PathBuf,

    /// YAML rules file; defaults apply when omitted.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Print the verdict as a JSON object.
    #[arg(long)]
    pub json: bool,
}

/// Run `stateset validate`, writing the verdict to `out`.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let doc = std::fs::read_to_string(&args.proposal)
        .with_context(|| format!("reading {}", args.proposal.display()))?;
    let proposal = Proposal::from_json(&doc)
        .with_context(|| format!("parsing proposal {}", args.proposal.display()))?;
    let contracts = ContractSet::new(load_rules(args.rules.as_deref())?);

    tracing::debug!(family = %proposal.family(), commands = ?proposal.commands(), "validating proposal");

    match proposal.validate(&contracts) {
        Ok(accepted) => {
            if args.json {
                writeln!(out, "{}", json!({"accepted": true, "family": accepted.family, "intent": accepted.intent}))?;
            } else {
                writeln!(out, "ACCEPTED {} {}", accepted.family, accepted.intent)?;
            }
            Ok(EXIT_OK)
        }
        Err(reason) => {
            let message = describe_rejection(&reason, &directory_of(&proposal));
            if args.json {
                writeln!(
                    out,
                    "{}",
                    json!({"accepted": false, "code": reason.code(), "message": message, "reason": reason})
                )?;
            } else {
                writeln!(out, "REJECTED {}: {}", reason.code(), message)?;
            }
            Ok(EXIT_REJECTED)
        }
    }
}

/// Key-to-name map of every participant on the proposal's records.
fn directory_of(proposal: &Proposal) -> BTreeMap<PartyKey, String> {
    fn collect<'a, R: RecordSchema + 'a>(
        records: impl IntoIterator<Item = &'a R>,
        into: &mut BTreeMap<PartyKey, String>,
    ) {
        for record in records {
            for Party { name, owning_key } in record.participants() {
                into.insert(owning_key.clone(), name.clone());
            }
        }
    }

    let mut dir = BTreeMap::new();
    match proposal {
        Proposal::Account(e) => collect(e.consumed.iter().chain(&e.produced), &mut dir),
        Proposal::Agreement(e) => collect(e.consumed.iter().chain(&e.produced), &mut dir),
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGREEMENT_CREATE: &str = r#"{
        "family": "agreement",
        "commands": ["CreateAgreement"],
        "produced": [{
            "number": "AGR-1", "name": "Supply", "hash": "abc", "status": "REQUEST",
            "agreement_type": "NDA", "value": 10,
            "party": {"name": "Seller Co", "owning_key": "k-seller"},
            "counterparty": {"name": "Buyer Co", "owning_key": "k-buyer"},
            "start_date": "2026-01-01T00:00:00Z", "end_date": "2026-06-01T00:00:00Z",
            "linear_id": "6f1c1f5e-7a4b-4c4e-9d7a-0b8e2f3c4d5e"
        }],
        "signers": ["k-seller"]
    }"#;

    fn args(dir: &tempfile::TempDir, doc: &str, json: bool) -> ValidateArgs {
        let path = dir.path().join("proposal.json");
        std::fs::write(&path, doc).unwrap();
        ValidateArgs {
            proposal: path,
            rules: None,
            json,
        }
    }

    #[test]
    fn rejection_names_missing_party() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let code = run_validate(&args(&dir, AGREEMENT_CREATE, false), &mut out).unwrap();
        assert_eq!(code, EXIT_REJECTED);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            "REJECTED MISSING_SIGNERS: transaction must also be signed by Buyer Co (k-buyer)"
        );
    }

    #[test]
    fn accepted_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let doc = AGREEMENT_CREATE.replace(r#"["k-seller"]"#, r#"["k-seller", "k-buyer"]"#);
        let mut out = Vec::new();
        let code = run_validate(&args(&dir, &doc, true), &mut out).unwrap();
        assert_eq!(code, EXIT_OK);
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["accepted"], true);
        assert_eq!(v["intent"], "CreateAgreement");
    }

    #[test]
    fn malformed_proposal_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run_validate(&args(&dir, "{\"family\": 3}", false), &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("parsing proposal"));
    }
}
