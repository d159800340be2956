use async_trait::async_trait;

use crate::config::{Commitment, ProxyConfig};
use crate::error::Error;
use crate::types::TransactionRecord;

/// Looks up finalized transactions by signature.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// `Ok(None)` when the node does not know the signature (yet).
    async fn fetch_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>, Error>;
}

#[derive(serde::Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(serde::Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<TransactionRecord>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Interpret a `getTransaction` JSON-RPC response body.
pub fn parse_get_transaction_response(
    body: serde_json::Value,
) -> Result<Option<TransactionRecord>, Error> {
    let response: RpcResponse = serde_json::from_value(body)?;
    if let Some(err) = response.error {
        return Err(Error::Rpc {
            reason: format!("{} (code {})", err.message, err.code),
        });
    }
    Ok(response.result)
}

/// `getTransaction` rejects `processed`, so lookups use at least `confirmed`.
fn lookup_commitment(commitment: Commitment) -> Commitment {
    match commitment {
        Commitment::Processed => Commitment::Confirmed,
        other => other,
    }
}

/// JSON-RPC client for a Solana node.
#[derive(Debug, Clone)]
pub struct RpcTransactionSource {
    client: reqwest::Client,
    url: String,
    commitment: Commitment,
}

impl RpcTransactionSource {
    pub fn new(url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            commitment: lookup_commitment(commitment),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.rpc_url.clone(), config.commitment)
    }

    fn request_body(&self, signature: &str) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "json",
                    "commitment": self.commitment,
                    "maxSupportedTransactionVersion": 0
                }
            ]
        })
    }
}

#[async_trait]
impl TransactionSource for RpcTransactionSource {
    async fn fetch_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>, Error> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.request_body(signature))
            .send()
            .await?
            .error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        let record = parse_get_transaction_response(body)?;
        tracing::debug!(signature, found = record.is_some(), "fetched transaction");
        Ok(record)
    }
}
