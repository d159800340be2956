//! Codec for the events SPL account-compression writes through the no-op
//! program whenever a concurrent Merkle tree changes.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use crate::error::Error;

/// Node of a Merkle path together with its position in a non-sparse tree.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub node: [u8; 32],
    pub index: u32,
}

/// A decoded `ChangeLogEvent::V1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEvent {
    /// Address of the tree that changed.
    pub tree_id: Pubkey,
    /// Updated nodes, leaf first, root last.
    pub path: Vec<PathNode>,
    /// Number of successful operations on the tree so far.
    pub seq: u64,
    /// Index of the leaf that changed.
    pub index: u32,
}

impl ChangeLogEvent {
    /// Height of the tree: every path node except the root.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn root(&self) -> Option<[u8; 32]> {
        self.path.last().map(|n| n.node)
    }

    pub fn leaf(&self) -> Option<[u8; 32]> {
        self.path.first().map(|n| n.node)
    }
}

#[derive(BorshDeserialize, BorshSerialize)]
enum AccountCompressionEvent {
    ChangeLog(ChangeLogEventVersion),
    ApplicationData(ApplicationDataEventVersion),
}

#[derive(BorshDeserialize, BorshSerialize)]
enum ChangeLogEventVersion {
    V1(ChangeLogEventV1),
}

#[derive(BorshDeserialize, BorshSerialize)]
struct ChangeLogEventV1 {
    id: [u8; 32],
    path: Vec<PathNode>,
    seq: u64,
    index: u32,
}

#[derive(BorshDeserialize, BorshSerialize)]
enum ApplicationDataEventVersion {
    V1(ApplicationDataEventV1),
}

#[derive(BorshDeserialize, BorshSerialize)]
struct ApplicationDataEventV1 {
    application_data: Vec<u8>,
}

/// Decode raw no-op instruction data as a change-log event.
///
/// Returns `None` for application-data events, unknown tags and truncated
/// input. Bytes left over after a complete event are ignored.
pub fn decode_change_log_event(data: &[u8]) -> Option<ChangeLogEvent> {
    let mut buf = data;
    match AccountCompressionEvent::deserialize(&mut buf).ok()? {
        AccountCompressionEvent::ChangeLog(ChangeLogEventVersion::V1(v1)) => Some(ChangeLogEvent {
            tree_id: Pubkey::new_from_array(v1.id),
            path: v1.path,
            seq: v1.seq,
            index: v1.index,
        }),
        AccountCompressionEvent::ApplicationData(_) => None,
    }
}

/// Decode base58 instruction data, as carried by `CompiledInvocation::data`.
pub fn decode_instruction_data(data: &str) -> Option<ChangeLogEvent> {
    let bytes = bs58::decode(data).into_vec().ok()?;
    decode_change_log_event(&bytes)
}

pub fn encode_change_log_event(event: &ChangeLogEvent) -> Result<Vec<u8>, Error> {
    let wire = AccountCompressionEvent::ChangeLog(ChangeLogEventVersion::V1(ChangeLogEventV1 {
        id: event.tree_id.to_bytes(),
        path: event.path.clone(),
        seq: event.seq,
        index: event.index,
    }));
    borsh::to_vec(&wire).map_err(|e| Error::Encode {
        reason: e.to_string(),
    })
}

/// Encode an application-data event, the other payload the no-op program carries.
pub fn encode_application_data(application_data: &[u8]) -> Result<Vec<u8>, Error> {
    let wire = AccountCompressionEvent::ApplicationData(ApplicationDataEventVersion::V1(
        ApplicationDataEventV1 {
            application_data: application_data.to_vec(),
        },
    ));
    borsh::to_vec(&wire).map_err(|e| Error::Encode {
        reason: e.to_string(),
    })
}

pub fn encode_instruction_data(event: &ChangeLogEvent) -> Result<String, Error> {
    encode_change_log_event(event).map(|bytes| bs58::encode(bytes).into_string())
}
