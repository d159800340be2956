use solana_pubkey::Pubkey;

use crate::changelog::ChangeLogEvent;
use crate::programs::BUBBLEGUM_PROGRAM_ID;

const ASSET_SEED: &[u8] = b"asset";

/// Bubblegum asset id of the leaf at `leaf_index` in `tree`.
pub fn leaf_asset_id(tree: &Pubkey, leaf_index: u64) -> Pubkey {
    let (asset_id, _bump) = Pubkey::find_program_address(
        &[ASSET_SEED, tree.as_ref(), &leaf_index.to_le_bytes()],
        &BUBBLEGUM_PROGRAM_ID,
    );
    asset_id
}

/// Asset id of the leaf a change-log event describes.
pub fn asset_id_for_event(event: &ChangeLogEvent) -> Pubkey {
    leaf_asset_id(&event.tree_id, u64::from(event.index))
}
