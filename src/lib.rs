#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod asset;
pub mod changelog;
pub mod config;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod programs;
pub mod types;

#[cfg(feature = "server")]
pub mod proxy;

pub use asset::{asset_id_for_event, leaf_asset_id};
pub use changelog::{
    ChangeLogEvent, PathNode, decode_change_log_event, decode_instruction_data,
    encode_change_log_event, encode_instruction_data,
};
pub use config::{Commitment, ProxyConfig, TreeShape};
pub use error::Error;
pub use extract::{ChangeLogExtractor, extract_change_log_events};
pub use programs::{BUBBLEGUM_PROGRAM_ID, SPL_ACCOUNT_COMPRESSION_PROGRAM_ID, SPL_NOOP_PROGRAM_ID};
pub use types::{CompiledInvocation, InnerInstructionGroup, TransactionRecord};

#[cfg(feature = "server")]
pub use proxy::{
    DataAvailabilityService, Datastore,
    http::{router, serve},
    ledger::{Collection, CompressionLedger},
    rpc::{RpcTransactionSource, TransactionSource},
};
