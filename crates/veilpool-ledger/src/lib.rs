//! veilpool shielded ledger
//!
//! a custody-pool ledger: depositors lock a fungible asset into a pooled
//! custody account and later withdraw against a cryptographic note
//!
//! # architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     VEILPOOL LEDGER                       │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                           │
//! │  instruction router                                       │
//! │  ├─ envelope decode (veilpool-wire)                       │
//! │  └─ (domain, opcode) → typed instruction                  │
//! │                                                           │
//! │  pool manager (one custody account per asset)             │
//! │  ├─ lazy creation on first deposit (permissionless)       │
//! │  ├─ custody balance is ground truth                       │
//! │  └─ destroyed only when custody reaches exactly zero      │
//! │                                                           │
//! │  nullifier store (spent notes, permanent tombstones)      │
//! │  commitment ledger (opaque notes, append-only)            │
//! │  bank seam (asset transfer + account reservation)         │
//! │                                                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! instructions apply atomically: every operation validates fully before its
//! first mutation, so a rejected instruction leaves no visible state change.
//! concurrency is the surrounding environment's job — it must serialize
//! instructions touching the same pool or nullifier address.

pub mod bank;
pub mod commitment;
pub mod error;
pub mod ledger;
pub mod nullifier;
pub mod pool;
pub mod router;
pub mod value;

pub use bank::{Bank, MemoryBank};
pub use commitment::{Commitment, CommitmentLedger, EncryptedNote};
pub use error::LedgerError;
pub use ledger::{Ledger, LedgerConfig, StateDelta};
pub use nullifier::{Nullifier, NullifierStore, SpendStatus};
pub use pool::{Pool, PoolManager};
pub use router::Instruction;
pub use value::{AccountId, Amount, AssetId};

/// domain separator for nullifier storage addresses
///
/// a single namespace covers every withdrawal opcode, so a note is spendable
/// at most once regardless of which path publishes its nullifier
pub const NULLIFIER_DOMAIN: &[u8] = b"veilpool.nullifier.v1";
/// domain separator for pool custody account derivation
pub const POOL_DOMAIN: &[u8] = b"veilpool.pool.v1";
