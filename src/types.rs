use solana_pubkey::Pubkey;

/// A finalized transaction as returned by the `getTransaction` JSON-RPC
/// method with `"encoding": "json"`.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Slot in which the transaction landed.
    #[serde(default)]
    pub slot: u64,
    pub transaction: TransactionEnvelope,
    /// Execution metadata. Absent for some historical or pruned transactions.
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    /// `"legacy"` or `0`; kept raw since the node reports it as either a string or a number.
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEnvelope {
    /// Transaction signatures (base58), fee payer first.
    #[serde(default)]
    pub signatures: Vec<String>,
    pub message: TransactionMessage,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMessage {
    /// Static account keys (base58) carried in the message itself.
    pub account_keys: Vec<String>,
}

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    /// `None` when the node did not record CPI metadata.
    #[serde(default)]
    pub inner_instructions: Option<Vec<InnerInstructionGroup>>,
    /// Keys resolved through address lookup tables (versioned transactions only).
    #[serde(default)]
    pub loaded_addresses: Option<LoadedAddresses>,
}

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedAddresses {
    #[serde(default)]
    pub writable: Vec<String>,
    #[serde(default)]
    pub readonly: Vec<String>,
}

/// Every CPI made while executing one top-level instruction.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InnerInstructionGroup {
    /// Index of the top-level instruction that produced this group.
    pub index: u8,
    pub instructions: Vec<CompiledInvocation>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledInvocation {
    /// Position of the invoked program in the flattened account key list.
    pub program_id_index: u8,
    #[serde(default)]
    pub accounts: Vec<u8>,
    /// Instruction data, base58.
    pub data: String,
    #[serde(default)]
    pub stack_height: Option<u32>,
}

impl TransactionRecord {
    pub fn signature(&self) -> Option<&str> {
        self.transaction.signatures.first().map(String::as_str)
    }

    /// Account keys in the order instruction indices refer to them:
    /// static keys, then lookup-table writable keys, then lookup-table readonly keys.
    pub fn account_keys(&self) -> Vec<&str> {
        let loaded = self
            .meta
            .as_ref()
            .and_then(|meta| meta.loaded_addresses.as_ref());
        let static_keys = self.transaction.message.account_keys.iter();
        let writable = loaded.into_iter().flat_map(|l| l.writable.iter());
        let readonly = loaded.into_iter().flat_map(|l| l.readonly.iter());

        static_keys
            .chain(writable)
            .chain(readonly)
            .map(String::as_str)
            .collect()
    }

    /// Inner-instruction groups, empty when the metadata or the list is missing.
    pub fn inner_instruction_groups(&self) -> &[InnerInstructionGroup] {
        self.meta
            .as_ref()
            .and_then(|meta| meta.inner_instructions.as_deref())
            .unwrap_or_default()
    }
}

/// Resolve the program invoked by `invocation`.
///
/// Returns `None` when the index is out of range or the key is not a valid
/// base58 pubkey; callers treat both as "not the program you are looking for".
pub fn resolve_program_id(account_keys: &[&str], invocation: &CompiledInvocation) -> Option<Pubkey> {
    account_keys
        .get(usize::from(invocation.program_id_index))
        .and_then(|key| key.parse::<Pubkey>().ok())
}
