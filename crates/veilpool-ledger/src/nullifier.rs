//! nullifier store
//!
//! a spender publishes a nullifier derived from the note secret; its
//! presence at a derived storage address is the sole double-spend oracle.
//! markers are permanent tombstones, never deleted.
//!
//! one seed namespace covers both withdrawal opcodes. splitting the
//! namespace per opcode would let a note be spent once via each path.

use std::collections::HashSet;

use crate::error::LedgerError;
use crate::NULLIFIER_DOMAIN;

/// one-time spend marker (32 bytes, derived by the spender)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nullifier(pub [u8; 32]);

impl Nullifier {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// deterministic storage address for this nullifier's marker
    pub fn address(&self) -> NullifierAddress {
        let mut hasher = blake3::Hasher::new();
        hasher.update(NULLIFIER_DOMAIN);
        hasher.update(&self.0);
        NullifierAddress(*hasher.finalize().as_bytes())
    }
}

impl AsRef<[u8]> for Nullifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// derived lookup key for a nullifier marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NullifierAddress(pub [u8; 32]);

/// result of a read-only spend probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendStatus {
    Spent,
    Unspent,
}

/// set of used-note markers, keyed by derived address
#[derive(Default)]
pub struct NullifierStore {
    spent: HashSet<NullifierAddress>,
}

impl NullifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a nullifier marker
    ///
    /// fails with `AlreadySpent` if a marker exists at the derived address,
    /// unconditionally and regardless of caller
    pub fn create(&mut self, nullifier: &Nullifier) -> Result<NullifierAddress, LedgerError> {
        let address = nullifier.address();
        if !self.spent.insert(address) {
            return Err(LedgerError::AlreadySpent);
        }
        Ok(address)
    }

    /// read-only existence probe, side-effect-free
    pub fn check(&self, nullifier: &Nullifier) -> SpendStatus {
        if self.spent.contains(&nullifier.address()) {
            SpendStatus::Spent
        } else {
            SpendStatus::Unspent
        }
    }

    /// number of spent notes
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
