use async_trait::async_trait;
use solana_pubkey::Pubkey;

use crate::config::TreeShape;
use crate::error::Error;
use crate::metadata::{CollectionMetadata, LeafMetadata};

/// Accounts created for the collection NFT that every leaf is minted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub mint: Pubkey,
    pub metadata_account: Pubkey,
    pub master_edition_account: Pubkey,
}

/// On-chain side of the proxy: tree allocation, collection creation and
/// compressed mints. Implementations own the payer keypair and submit the
/// transactions; the proxy only orders the calls.
#[async_trait]
pub trait CompressionLedger: Send + Sync {
    /// Fee payer, also the sole creator on every minted leaf.
    fn payer(&self) -> Pubkey;

    /// Allocate a concurrent Merkle tree and return its address.
    async fn create_tree(&self, shape: TreeShape, canopy_depth: u32) -> Result<Pubkey, Error>;

    async fn create_collection(&self, metadata: &CollectionMetadata) -> Result<Collection, Error>;

    /// Mint one compressed NFT into `tree` and return the transaction signature.
    async fn mint_compressed(
        &self,
        tree: &Pubkey,
        collection: &Collection,
        metadata: &LeafMetadata,
    ) -> Result<String, Error>;
}
