//! # Graph Subcommand
//!
//! Prints the intent vocabulary of both families and, for agreements, the
//! status rule each intent applies under the selected rules.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use stateset_contracts::{
    AccountIntent, AgreementContract, AgreementIntent, AgreementSignerPolicy, Intent, RecordFamily,
    INITIAL_STATUS,
};

use crate::{load_rules, EXIT_OK};

/// Arguments for the `stateset graph` subcommand.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// YAML rules file; defaults apply when omitted.
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

/// Run `stateset graph`, writing the table to `out`.
pub fn run_graph(args: &GraphArgs, out: &mut impl Write) -> Result<u8> {
    let rules = load_rules(args.rules.as_deref())?;
    let contract = AgreementContract::new(rules);

    writeln!(out, "{}", RecordFamily::Account)?;
    for intent in AccountIntent::ALL {
        writeln!(out, "  {:<20} {}", intent.command_name(), intent.cardinality())?;
    }

    writeln!(out, "{}", RecordFamily::Agreement)?;
    for intent in AgreementIntent::ALL {
        let step = match contract.status_model().rule(*intent) {
            Some(rule) => format!("{} -> {}", rule.from, rule.to),
            None => format!("new in {INITIAL_STATUS}"),
        };
        writeln!(
            out,
            "  {:<20} {:<28} {}",
            intent.command_name(),
            intent.cardinality().to_string(),
            step
        )?;
    }

    let signers = match contract.signer_policy() {
        AgreementSignerPolicy::CreateOnly => "create only",
        AgreementSignerPolicy::Party => "party on every status change",
        AgreementSignerPolicy::BothParties => "both parties on every status change",
    };
    writeln!(out, "agreement signers: {signers}")?;
    Ok(EXIT_OK)
}
