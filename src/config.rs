use std::net::SocketAddr;

use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::programs::SPL_NOOP_PROGRAM_ID;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Depth/buffer pairs SPL account-compression accepts when allocating a tree.
pub const VALID_DEPTH_SIZE_PAIRS: &[(u32, u32)] = &[
    (3, 8),
    (5, 8),
    (6, 16),
    (7, 16),
    (8, 16),
    (9, 16),
    (10, 32),
    (11, 32),
    (12, 32),
    (13, 32),
    (14, 64),
    (14, 256),
    (14, 1024),
    (14, 2048),
    (15, 64),
    (16, 64),
    (17, 64),
    (18, 64),
    (19, 64),
    (20, 64),
    (20, 256),
    (20, 1024),
    (20, 2048),
    (24, 64),
    (24, 256),
    (24, 512),
    (24, 1024),
    (24, 2048),
    (26, 512),
    (26, 1024),
    (26, 2048),
    (30, 512),
    (30, 1024),
    (30, 2048),
];

/// Levels kept off the canopy; the rest of the proof is cached on chain.
const PROOF_LEVELS_OFF_CANOPY: u32 = 5;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeShape {
    pub max_depth: u32,
    pub max_buffer_size: u32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            max_depth: 14,
            max_buffer_size: 64,
        }
    }
}

impl TreeShape {
    pub fn new(max_depth: u32, max_buffer_size: u32) -> Result<Self, Error> {
        let shape = Self {
            max_depth,
            max_buffer_size,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if VALID_DEPTH_SIZE_PAIRS.contains(&(self.max_depth, self.max_buffer_size)) {
            Ok(())
        } else {
            Err(Error::Config {
                reason: format!(
                    "unsupported tree shape: depth {} with buffer {}",
                    self.max_depth, self.max_buffer_size
                ),
            })
        }
    }

    pub fn canopy_depth(&self) -> u32 {
        self.max_depth.saturating_sub(PROOF_LEVELS_OFF_CANOPY)
    }

    /// Number of leaves the tree can hold.
    pub fn capacity(&self) -> u64 {
        1_u64.checked_shl(self.max_depth).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    pub bind_addr: SocketAddr,
    pub tree: TreeShape,
    /// Program whose inner instructions carry change-log events.
    #[serde(deserialize_with = "pubkey_from_base58")]
    pub log_program_id: Pubkey,
}

fn pubkey_from_base58<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid pubkey: {raw}")))
}

fn parse_u32(key: &str, raw: &str) -> Result<u32, Error> {
    raw.parse().map_err(|_| Error::Config {
        reason: format!("{key} is not a number: {raw}"),
    })
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: Commitment::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            tree: TreeShape::default(),
            log_program_id: SPL_NOOP_PROGRAM_ID,
        }
    }
}

impl ProxyConfig {
    /// Build a config from process environment variables.
    ///
    /// `RPC_URL`, `DA_COMMITMENT`, `DA_BIND_ADDR`, `DA_LOG_PROGRAM_ID`,
    /// `DA_TREE_MAX_DEPTH` and `DA_TREE_MAX_BUFFER_SIZE` are read; unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(url) = lookup("RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(raw) = lookup("DA_COMMITMENT") {
            config.commitment = raw.parse().map_err(|_| Error::Config {
                reason: format!("unknown commitment level: {raw}"),
            })?;
        }
        if let Some(raw) = lookup("DA_BIND_ADDR") {
            config.bind_addr = raw.parse().map_err(|_| Error::Config {
                reason: format!("invalid bind address: {raw}"),
            })?;
        }
        if let Some(raw) = lookup("DA_LOG_PROGRAM_ID") {
            config.log_program_id = raw.parse().map_err(|_| Error::Config {
                reason: format!("invalid log program id: {raw}"),
            })?;
        }

        if let Some(raw) = lookup("DA_TREE_MAX_DEPTH") {
            config.tree.max_depth = parse_u32("DA_TREE_MAX_DEPTH", &raw)?;
        }
        if let Some(raw) = lookup("DA_TREE_MAX_BUFFER_SIZE") {
            config.tree.max_buffer_size = parse_u32("DA_TREE_MAX_BUFFER_SIZE", &raw)?;
        }

        config.tree.validate()?;
        Ok(config)
    }
}
