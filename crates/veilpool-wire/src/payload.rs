//! per-opcode payload layouts
//!
//! layouts are fixed and versionless; compatibility testing requires them
//! bit-exact. all integers little-endian.
//!
//! ```text
//! shield / shield-with-init:
//!   asset_id[32] amount[8] commitment[32] note_len[4] note[note_len] flags[1]
//! unshield / unshield-with-close:
//!   asset_id[32] nullifier[32] amount[8] recipient[32] flags[1]
//! masked transfer:
//!   enc_recipient[32] sender[32] enc_amount[8] nonce[8] memo_len[2] memo[memo_len]
//! ```

use crate::cursor::{PayloadReader, PayloadWriter};
use crate::envelope::WireError;

/// domain byte for the shielded pool opcode family
pub const DOMAIN_POOL: u8 = 0x01;
/// domain byte for masked transfers
pub const DOMAIN_TRANSFER: u8 = 0x02;

/// pool domain opcodes
pub const OP_SHIELD_WITH_INIT: u8 = 0x01;
pub const OP_SHIELD: u8 = 0x02;
pub const OP_UNSHIELD: u8 = 0x03;
pub const OP_UNSHIELD_WITH_CLOSE: u8 = 0x04;

/// transfer domain opcodes
pub const OP_MASKED_TRANSFER: u8 = 0x01;

/// deposit payload, shared by `shield` and `shield-with-init`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shield {
    pub asset_id: [u8; 32],
    pub amount: u64,
    /// opaque note commitment published by the depositor
    pub commitment: [u8; 32],
    /// ciphertext only the note owner can interpret
    pub note: Vec<u8>,
    pub flags: u8,
}

impl Shield {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.array(&self.asset_id)
            .u64_le(self.amount)
            .array(&self.commitment)
            .var_bytes_u32(&self.note)
            .u8(self.flags);
        w.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = PayloadReader::new(bytes);
        let asset_id = r.array32()?;
        let amount = r.u64_le()?;
        let commitment = r.array32()?;
        let note = r.var_bytes_u32()?;
        let flags = r.u8()?;
        r.finish()?;
        Ok(Self {
            asset_id,
            amount,
            commitment,
            note,
            flags,
        })
    }
}

/// withdrawal payload, shared by `unshield` and `unshield-with-close`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unshield {
    pub asset_id: [u8; 32],
    /// one-time spend marker derived from the note secret
    pub nullifier: [u8; 32],
    pub amount: u64,
    pub recipient: [u8; 32],
    pub flags: u8,
}

impl Unshield {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.array(&self.asset_id)
            .array(&self.nullifier)
            .u64_le(self.amount)
            .array(&self.recipient)
            .u8(self.flags);
        w.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = PayloadReader::new(bytes);
        let asset_id = r.array32()?;
        let nullifier = r.array32()?;
        let amount = r.u64_le()?;
        let recipient = r.array32()?;
        let flags = r.u8()?;
        r.finish()?;
        Ok(Self {
            asset_id,
            nullifier,
            amount,
            recipient,
            flags,
        })
    }
}

/// masked native transfer
///
/// recipient and amount travel XOR-masked (see [`crate::mask`]); the nonce is
/// on-wire because the amount keystream cannot be derived without it
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskedTransfer {
    pub enc_recipient: [u8; 32],
    pub sender: [u8; 32],
    pub enc_amount: u64,
    pub nonce: [u8; 8],
    /// opaque memo ciphertext, carried but never interpreted
    pub memo: Vec<u8>,
}

impl MaskedTransfer {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.array(&self.enc_recipient)
            .array(&self.sender)
            .u64_le(self.enc_amount)
            .array(&self.nonce)
            .var_bytes_u16(&self.memo);
        w.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = PayloadReader::new(bytes);
        let enc_recipient = r.array32()?;
        let sender = r.array32()?;
        let enc_amount = r.u64_le()?;
        let nonce = r.array8()?;
        let memo = r.var_bytes_u16()?;
        r.finish()?;
        Ok(Self {
            enc_recipient,
            sender,
            enc_amount,
            nonce,
            memo,
        })
    }
}
