use solana_pubkey::Pubkey;

pub const COLLECTION_NAME: &str = "OP Rollup Data";
pub const COLLECTION_SYMBOL: &str = "RD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// Percentage of royalties, 0..=100.
    pub share: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
pub enum TokenProgramVersion {
    Original,
    Token2022,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
pub enum TokenStandard {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
}

/// Token-metadata arguments for the collection NFT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub is_mutable: bool,
}

/// Bubblegum metadata for one compressed leaf. The payload lives in `uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub edition_nonce: Option<u8>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub token_program_version: TokenProgramVersion,
    pub token_standard: Option<TokenStandard>,
}

fn sole_creator(payer: Pubkey) -> Vec<Creator> {
    vec![Creator {
        address: payer,
        verified: false,
        share: 100,
    }]
}

pub fn collection_metadata(payer: Pubkey) -> CollectionMetadata {
    CollectionMetadata {
        name: COLLECTION_NAME.to_string(),
        symbol: COLLECTION_SYMBOL.to_string(),
        uri: String::new(),
        seller_fee_basis_points: 0,
        creators: sole_creator(payer),
        is_mutable: false,
    }
}

pub fn leaf_metadata(payer: Pubkey, collection: &CollectionMetadata, data: &str) -> LeafMetadata {
    LeafMetadata {
        name: COLLECTION_NAME.to_string(),
        symbol: collection.symbol.clone(),
        uri: data.to_string(),
        seller_fee_basis_points: 0,
        creators: sole_creator(payer),
        edition_nonce: Some(0),
        primary_sale_happened: false,
        is_mutable: false,
        token_program_version: TokenProgramVersion::Original,
        token_standard: Some(TokenStandard::NonFungible),
    }
}
