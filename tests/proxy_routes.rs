#![cfg(feature = "server")]
#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use solana_da_proxy::metadata::{CollectionMetadata, LeafMetadata};
use solana_da_proxy::{
    ChangeLogExtractor, Collection, CompressionLedger, DataAvailabilityService, Error,
    RpcTransactionSource, TransactionRecord, TransactionSource, TreeShape, router, serve,
};
use solana_pubkey::Pubkey;
use tower::ServiceExt;

const TREE: &str = "Fos6xtCbxdqpczSwUCKH24Y2rJMpaJnnXuwS1KVYb8oF";
const ASSET_ID: &str = "ByLP73cNvCdRTa2UYPgRtwfH8QwmsFwTNiZRZLFawKev";

fn fixture(filename: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

fn mint_record() -> TransactionRecord {
    serde_json::from_str(&fixture("mint_to_collection.json")).unwrap()
}

#[derive(Default)]
struct ChainState {
    tree: Option<Pubkey>,
    trees_created: usize,
    minted: Vec<LeafMetadata>,
    transaction_missing: bool,
}

/// Stands in for both the ledger and the RPC node. Every mint "lands" as the
/// recorded fixture transaction.
#[derive(Clone, Default)]
struct FakeChain {
    state: Arc<Mutex<ChainState>>,
}

impl FakeChain {
    fn with_tree(tree: Pubkey) -> Self {
        let chain = Self::default();
        chain.state.lock().unwrap().tree = Some(tree);
        chain
    }
}

#[async_trait]
impl CompressionLedger for FakeChain {
    fn payer(&self) -> Pubkey {
        Pubkey::new_from_array([1; 32])
    }

    async fn create_tree(&self, shape: TreeShape, canopy_depth: u32) -> Result<Pubkey, Error> {
        assert_eq!(shape, TreeShape::default());
        assert_eq!(canopy_depth, 9);
        let mut state = self.state.lock().unwrap();
        state.trees_created += 1;
        Ok(state.tree.unwrap_or_else(|| TREE.parse().unwrap()))
    }

    async fn create_collection(&self, metadata: &CollectionMetadata) -> Result<Collection, Error> {
        assert_eq!(metadata.symbol, "RD");
        Ok(Collection {
            mint: Pubkey::new_from_array([10; 32]),
            metadata_account: Pubkey::new_from_array([11; 32]),
            master_edition_account: Pubkey::new_from_array([12; 32]),
        })
    }

    async fn mint_compressed(
        &self,
        _tree: &Pubkey,
        collection: &Collection,
        metadata: &LeafMetadata,
    ) -> Result<String, Error> {
        assert_eq!(collection.mint, Pubkey::new_from_array([10; 32]));
        self.state.lock().unwrap().minted.push(metadata.clone());
        Ok(mint_record().signature().unwrap().to_string())
    }
}

#[async_trait]
impl TransactionSource for FakeChain {
    async fn fetch_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>, Error> {
        if self.state.lock().unwrap().transaction_missing {
            return Ok(None);
        }
        let record = mint_record();
        assert_eq!(record.signature(), Some(signature));
        Ok(Some(record))
    }
}

fn service(chain: &FakeChain) -> Arc<DataAvailabilityService<FakeChain, FakeChain>> {
    Arc::new(DataAvailabilityService::new(
        chain.clone(),
        chain.clone(),
        ChangeLogExtractor::default(),
        TreeShape::default(),
    ))
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn post_then_fetch_roundtrip() {
    let chain = FakeChain::default();
    let app = router(service(&chain));

    let (status, body) = get(&app, "/initializeDatastore").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, TREE);

    let (status, body) = get(&app, "/postData?data=batch-0042").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ASSET_ID);

    let (status, body) = get(&app, &format!("/getTransaction?hash={ASSET_ID}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "batch-0042");

    let state = chain.state.lock().unwrap();
    assert_eq!(state.minted.len(), 1);
    assert_eq!(state.minted[0].uri, "batch-0042");
    assert_eq!(state.minted[0].name, "OP Rollup Data");
}

#[tokio::test]
async fn unknown_handle_returns_empty_body() {
    let app = router(service(&FakeChain::default()));

    let (status, body) = get(&app, "/getTransaction?hash=nothing-here").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, body) = get(&app, "/getTransaction").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn post_before_initialize_is_a_conflict() {
    let chain = FakeChain::default();
    let app = router(service(&chain));

    let (status, body) = get(&app, "/postData?data=early").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "datastore is not initialized");
    assert!(chain.state.lock().unwrap().minted.is_empty());
}

#[tokio::test]
async fn post_without_data_is_a_bad_request() {
    let app = router(service(&FakeChain::default()));
    get(&app, "/initializeDatastore").await;

    let (status, _) = get(&app, "/postData").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_transaction_is_reported() {
    let chain = FakeChain::default();
    chain.state.lock().unwrap().transaction_missing = true;
    let service = service(&chain);
    service.initialize_datastore().await.unwrap();

    let err = service.post_data("lost").await.unwrap_err();
    assert!(matches!(err, Error::TransactionNotFound { .. }));
    assert_eq!(service.get_data(ASSET_ID).await, None);

    let app = router(service);
    let (status, body) = get(&app, "/postData?data=lost").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.ends_with("not found"));
}

#[tokio::test]
async fn events_for_other_trees_are_not_used() {
    let chain = FakeChain::with_tree(Pubkey::new_from_array([77; 32]));
    let service = service(&chain);
    service.initialize_datastore().await.unwrap();

    let err = service.post_data("elsewhere").await.unwrap_err();
    assert!(matches!(err, Error::NoChangeLogEvent { .. }));

    let app = router(service);
    let (status, body) = get(&app, "/postData?data=elsewhere").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.ends_with("emitted no change-log event"));
}

#[tokio::test]
async fn reinitialize_keeps_issued_handles() {
    let chain = FakeChain::default();
    let service = service(&chain);
    service.initialize_datastore().await.unwrap();
    let asset_id = service.post_data("first").await.unwrap();

    let datastore = service.initialize_datastore().await.unwrap();
    assert_eq!(datastore.tree.to_string(), TREE);
    assert_eq!(chain.state.lock().unwrap().trees_created, 2);
    assert_eq!(
        service.get_data(&asset_id.to_string()).await.as_deref(),
        Some("first")
    );
}

#[tokio::test]
async fn rpc_source_reads_get_transaction_response() {
    let response: serde_json::Value =
        serde_json::from_str(&fixture("get_transaction_response.json")).unwrap();
    let node = axum::Router::new().route(
        "/",
        post(move |axum::Json(request): axum::Json<serde_json::Value>| {
            let response = response.clone();
            async move {
                assert_eq!(request["method"], "getTransaction");
                assert_eq!(request["params"][1]["maxSupportedTransactionVersion"], 0);
                axum::Json(response)
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, node).await });

    let source = RpcTransactionSource::new(format!("http://{addr}"), Default::default());
    let record = source
        .fetch_transaction(mint_record().signature().unwrap())
        .await
        .unwrap()
        .unwrap();

    let events = ChangeLogExtractor::default().extract(Some(&record)).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 5);
}

#[tokio::test]
async fn serve_answers_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = service(&FakeChain::default());
    tokio::spawn(serve(listener, service));

    let client = reqwest::Client::new();
    let init = client
        .get(format!("http://{addr}/initializeDatastore"))
        .send()
        .await
        .unwrap();
    assert_eq!(init.status(), reqwest::StatusCode::OK);

    let handle = client
        .get(format!("http://{addr}/postData"))
        .query(&[("data", "over tcp")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(handle, ASSET_ID);

    let data = client
        .get(format!("http://{addr}/getTransaction"))
        .query(&[("hash", handle.as_str())])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(data, "over tcp");
}
