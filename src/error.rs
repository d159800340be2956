#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no transaction record provided")]
    MissingTransaction,

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("encode error: {reason}")]
    Encode { reason: String },

    #[error("rpc error: {reason}")]
    Rpc { reason: String },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("transaction {signature} not found")]
    TransactionNotFound { signature: String },

    #[error("transaction {signature} emitted no change-log event")]
    NoChangeLogEvent { signature: String },

    #[error("datastore is not initialized")]
    NotInitialized,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "server")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
