//! pool-per-asset registry
//!
//! at most one live pool per asset id. the registry hands out lookups by
//! key, never long-lived references, so destroying a pool simply removes
//! its entry.

use std::collections::HashMap;

use crate::value::{AccountId, AssetId};
use crate::POOL_DOMAIN;

/// derivation seed component for custody addresses
pub const CUSTODY_BUMP: u8 = 0xff;

/// one shielded pool: the shared custody account for one asset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pool {
    pub asset_id: AssetId,
    /// owns the actual asset balance, which is ground truth for closure
    pub custody: AccountId,
    pub bump: u8,
}

impl Pool {
    /// derive the custody account address for an asset
    pub fn custody_address(asset_id: &AssetId, bump: u8) -> AccountId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(POOL_DOMAIN);
        hasher.update(&asset_id.0);
        hasher.update(&[bump]);
        AccountId(*hasher.finalize().as_bytes())
    }

    pub fn derive(asset_id: AssetId) -> Self {
        let bump = CUSTODY_BUMP;
        Self {
            asset_id,
            custody: Self::custody_address(&asset_id, bump),
            bump,
        }
    }
}

/// registry of live pools, keyed by asset id
#[derive(Default)]
pub struct PoolManager {
    pools: HashMap<AssetId, Pool>,
}

impl PoolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset_id: &AssetId) -> Option<&Pool> {
        self.pools.get(asset_id)
    }

    pub fn contains(&self, asset_id: &AssetId) -> bool {
        self.pools.contains_key(asset_id)
    }

    /// register a pool; caller must have checked for an existing one
    pub fn insert(&mut self, pool: Pool) {
        debug_assert!(!self.pools.contains_key(&pool.asset_id));
        self.pools.insert(pool.asset_id, pool);
    }

    /// remove a pool; safe because no long-lived references exist
    pub fn remove(&mut self, asset_id: &AssetId) -> Option<Pool> {
        self.pools.remove(asset_id)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
