//! # stateset-cli: CLI Tool for the Stateset Ledger
//!
//! Provides the `stateset` command-line interface.
//!
//! ## Subcommands
//!
//! - `stateset validate`: Check a JSON transaction proposal against the
//!   contracts without a running service.
//! - `stateset graph`: Print the agreement status rules and the intent
//!   vocabulary under a given rules file.
//!
//! ```bash
//! stateset validate proposal.json --rules rules.yaml
//! stateset graph --rules rules.yaml
//! ```
//!
//! Exit codes: `0` accepted, `2` rejected, `1` for any other failure.

pub mod graph;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use stateset_contracts::RulesConfig;

/// Exit code for an accepted proposal or a successful command.
pub const EXIT_OK: u8 = 0;

/// Exit code for a rejected proposal.
pub const EXIT_REJECTED: u8 = 2;

/// Load a rules file, or the default rules when none is given.
pub fn load_rules(path: Option<&Path>) -> Result<RulesConfig> {
    match path {
        Some(p) => RulesConfig::from_yaml_file(p)
            .with_context(|| format!("loading rules from {}", p.display())),
        None => Ok(RulesConfig::default()),
    }
}
