pub mod http;
pub mod ledger;
pub mod rpc;
pub mod store;

use solana_pubkey::Pubkey;
use tokio::sync::RwLock;

use crate::asset::asset_id_for_event;
use crate::config::TreeShape;
use crate::error::Error;
use crate::extract::ChangeLogExtractor;
use crate::metadata::{self, CollectionMetadata};
use ledger::{Collection, CompressionLedger};
use rpc::TransactionSource;
use store::DataStore;

/// Tree and collection that new payloads are minted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datastore {
    pub tree: Pubkey,
    pub collection: Collection,
    pub collection_metadata: CollectionMetadata,
}

pub struct DataAvailabilityService<L, T> {
    ledger: L,
    transactions: T,
    extractor: ChangeLogExtractor,
    tree_shape: TreeShape,
    datastore: RwLock<Option<Datastore>>,
    store: DataStore,
}

impl<L, T> DataAvailabilityService<L, T>
where
    L: CompressionLedger,
    T: TransactionSource,
{
    pub fn new(
        ledger: L,
        transactions: T,
        extractor: ChangeLogExtractor,
        tree_shape: TreeShape,
    ) -> Self {
        Self {
            ledger,
            transactions,
            extractor,
            tree_shape,
            datastore: RwLock::new(None),
            store: DataStore::new(),
        }
    }

    /// Create a fresh tree and collection.
    ///
    /// Calling this again replaces the active tree; handles already issued keep
    /// resolving since they live in the store, not in the tree.
    pub async fn initialize_datastore(&self) -> Result<Datastore, Error> {
        self.tree_shape.validate()?;
        let tree = self
            .ledger
            .create_tree(self.tree_shape, self.tree_shape.canopy_depth())
            .await?;
        let collection_metadata = metadata::collection_metadata(self.ledger.payer());
        let collection = self.ledger.create_collection(&collection_metadata).await?;

        let datastore = Datastore {
            tree,
            collection,
            collection_metadata,
        };
        let previous = self.datastore.write().await.replace(datastore.clone());
        if let Some(previous) = previous {
            tracing::warn!(previous_tree = %previous.tree, tree = %tree, "datastore re-initialized");
        } else {
            tracing::info!(
                tree = %tree,
                collection = %collection.mint,
                capacity = self.tree_shape.capacity(),
                "datastore initialized"
            );
        }
        Ok(datastore)
    }

    pub async fn datastore(&self) -> Option<Datastore> {
        self.datastore.read().await.clone()
    }

    /// Mint `data` as a leaf and return the asset id that now resolves to it.
    pub async fn post_data(&self, data: &str) -> Result<Pubkey, Error> {
        let datastore = self.datastore().await.ok_or(Error::NotInitialized)?;
        let leaf = metadata::leaf_metadata(
            self.ledger.payer(),
            &datastore.collection_metadata,
            data,
        );

        let signature = self
            .ledger
            .mint_compressed(&datastore.tree, &datastore.collection, &leaf)
            .await?;
        let tx = self.transactions.fetch_transaction(&signature).await?;
        if tx.is_none() {
            return Err(Error::TransactionNotFound { signature });
        }

        let events = self.extractor.extract(tx.as_ref())?;
        let event = events
            .iter()
            .find(|event| event.tree_id == datastore.tree)
            .ok_or_else(|| Error::NoChangeLogEvent {
                signature: signature.clone(),
            })?;

        let asset_id = asset_id_for_event(event);
        self.store.insert(asset_id.to_string(), data.to_string()).await;
        let stored = self.store.len().await;
        tracing::info!(
            asset_id = %asset_id,
            signature = %signature,
            leaf_index = event.index,
            leaf = %event.leaf().map(|n| bs58::encode(n).into_string()).unwrap_or_default(),
            root = %event.root().map(|n| bs58::encode(n).into_string()).unwrap_or_default(),
            stored,
            "stored payload"
        );
        Ok(asset_id)
    }

    /// Payload previously posted under `handle`.
    pub async fn get_data(&self, handle: &str) -> Option<String> {
        self.store.get(handle).await
    }
}
