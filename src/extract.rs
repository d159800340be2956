use solana_pubkey::Pubkey;

use crate::changelog::{ChangeLogEvent, decode_instruction_data};
use crate::error::Error;
use crate::programs::SPL_NOOP_PROGRAM_ID;
use crate::types::{TransactionRecord, resolve_program_id};

/// Collect every change-log event `log_program_id` emitted in `tx`.
///
/// Events come back in encounter order: inner-instruction group first, then
/// position inside the group. Invocations of other programs are skipped, and so
/// are invocations of the log program whose data is not a change-log event.
/// The only error is a missing transaction.
pub fn extract_change_log_events(
    tx: Option<&TransactionRecord>,
    log_program_id: &Pubkey,
) -> Result<Vec<ChangeLogEvent>, Error> {
    let tx = tx.ok_or(Error::MissingTransaction)?;
    let account_keys = tx.account_keys();

    let events: Vec<ChangeLogEvent> = tx
        .inner_instruction_groups()
        .iter()
        .flat_map(|group| {
            group
                .instructions
                .iter()
                .enumerate()
                .map(move |(position, ix)| (group.index, position, ix))
        })
        .filter(|(_, _, ix)| resolve_program_id(&account_keys, ix).as_ref() == Some(log_program_id))
        .filter_map(|(group, position, ix)| {
            let event = decode_instruction_data(&ix.data);
            if event.is_none() {
                tracing::trace!(group, position, "log program data is not a change-log event");
            }
            event
        })
        .collect();

    tracing::debug!(
        signature = tx.signature().unwrap_or_default(),
        program_id = %log_program_id,
        count = events.len(),
        "extracted change-log events"
    );
    Ok(events)
}

/// Extractor bound to one log program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLogExtractor {
    log_program_id: Pubkey,
}

impl Default for ChangeLogExtractor {
    fn default() -> Self {
        Self::new(SPL_NOOP_PROGRAM_ID)
    }
}

impl ChangeLogExtractor {
    pub fn new(log_program_id: Pubkey) -> Self {
        Self { log_program_id }
    }

    pub fn log_program_id(&self) -> &Pubkey {
        &self.log_program_id
    }

    pub fn extract(&self, tx: Option<&TransactionRecord>) -> Result<Vec<ChangeLogEvent>, Error> {
        extract_change_log_events(tx, &self.log_program_id)
    }
}
