use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

use super::DataAvailabilityService;
use super::ledger::CompressionLedger;
use super::rpc::TransactionSource;
use crate::error::Error;

#[derive(serde::Deserialize)]
struct PostDataQuery {
    data: Option<String>,
}

#[derive(serde::Deserialize)]
struct GetTransactionQuery {
    hash: Option<String>,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse { .. } | Self::Config { .. } => StatusCode::BAD_REQUEST,
            Self::NotInitialized => StatusCode::CONFLICT,
            Self::Rpc { .. }
            | Self::Ledger { .. }
            | Self::Http(_)
            | Self::TransactionNotFound { .. }
            | Self::NoChangeLogEvent { .. }
            | Self::MissingTransaction
            | Self::Encode { .. }
            | Self::Json(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

async fn initialize_datastore<L, T>(
    State(service): State<Arc<DataAvailabilityService<L, T>>>,
) -> Result<String, Error>
where
    L: CompressionLedger + 'static,
    T: TransactionSource + 'static,
{
    let datastore = service.initialize_datastore().await?;
    Ok(datastore.tree.to_string())
}

async fn post_data<L, T>(
    State(service): State<Arc<DataAvailabilityService<L, T>>>,
    Query(query): Query<PostDataQuery>,
) -> Result<String, Error>
where
    L: CompressionLedger + 'static,
    T: TransactionSource + 'static,
{
    let data = query.data.ok_or_else(|| Error::Parse {
        reason: "missing `data` query parameter".into(),
    })?;
    let asset_id = service.post_data(&data).await?;
    Ok(asset_id.to_string())
}

/// Unknown or missing handles answer with an empty body.
async fn get_transaction<L, T>(
    State(service): State<Arc<DataAvailabilityService<L, T>>>,
    Query(query): Query<GetTransactionQuery>,
) -> String
where
    L: CompressionLedger + 'static,
    T: TransactionSource + 'static,
{
    match query.hash {
        Some(hash) => service.get_data(&hash).await.unwrap_or_default(),
        None => String::new(),
    }
}

pub fn router<L, T>(service: Arc<DataAvailabilityService<L, T>>) -> Router
where
    L: CompressionLedger + 'static,
    T: TransactionSource + 'static,
{
    Router::new()
        .route("/initializeDatastore", get(initialize_datastore::<L, T>))
        .route("/postData", get(post_data::<L, T>))
        .route("/getTransaction", get(get_transaction::<L, T>))
        .with_state(service)
}

pub async fn serve<L, T>(
    listener: TcpListener,
    service: Arc<DataAvailabilityService<L, T>>,
) -> Result<(), Error>
where
    L: CompressionLedger + 'static,
    T: TransactionSource + 'static,
{
    tracing::info!(addr = ?listener.local_addr().ok(), "data-availability proxy listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}
