//! # Intents and Command Selection
//!
//! A transaction declares what it is doing through command names such as
//! `"ActivateAgreement"`. Each record family owns a closed intent
//! vocabulary; commands of other families are ignored, and exactly one
//! command from the family's vocabulary must be present.

use crate::reject::RejectReason;
use crate::transition::Cardinality;

/// A closed intent vocabulary for one record family.
pub trait Intent: Copy + Eq + std::fmt::Debug + std::fmt::Display + 'static {
    /// Every intent of the family.
    const ALL: &'static [Self];

    /// Wire command name, e.g. `"TransferAccount"`.
    fn command_name(&self) -> &'static str;

    /// Required consumed/produced counts.
    fn cardinality(&self) -> Cardinality;

    /// Look up an intent by command name.
    fn from_command(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.command_name() == name)
    }
}

/// Pick the single intent of family `I` out of a transaction's commands.
///
/// Fails with `UnrecognizedCommand` when no command, or more than one
/// command, belongs to `I`'s vocabulary. Duplicates count twice.
pub fn select_intent<I: Intent, C: AsRef<str>>(commands: &[C]) -> Result<I, RejectReason> {
    let mut recognised = commands.iter().filter_map(|c| I::from_command(c.as_ref()));
    match (recognised.next(), recognised.next()) {
        (Some(intent), None) => Ok(intent),
        _ => Err(RejectReason::UnrecognizedCommand {
            commands: commands.iter().map(|c| c.as_ref().to_string()).collect(),
        }),
    }
}
