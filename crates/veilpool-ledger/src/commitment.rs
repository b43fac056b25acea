//! commitment ledger
//!
//! deposits and transfers publish an opaque note commitment plus a
//! ciphertext only the note owner can interpret. the ledger appends and
//! never mutates. nothing on-chain links a commitment to the nullifier
//! that will eventually close it — that link lives only in the owner's
//! off-chain secret.

use crate::value::AssetId;

/// opaque note commitment (32 bytes, produced by the depositor)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// encrypted note blob, opaque at this layer
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncryptedNote(pub Vec<u8>);

/// one recorded commitment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentEntry {
    pub asset_id: AssetId,
    pub commitment: Commitment,
    pub note: EncryptedNote,
}

/// append-only record of published commitments
///
/// commitments are not required to be unique: redemption is keyed by
/// nullifier, never by commitment, so a colliding commitment cannot
/// redeem another depositor's funds
#[derive(Default)]
pub struct CommitmentLedger {
    entries: Vec<CommitmentEntry>,
}

impl CommitmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, asset_id: AssetId, commitment: Commitment, note: EncryptedNote) {
        self.entries.push(CommitmentEntry {
            asset_id,
            commitment,
            note,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommitmentEntry> {
        self.entries.iter()
    }
}
