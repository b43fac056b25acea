//! ledger error taxonomy
//!
//! all errors are synchronous rejections; nothing is retried automatically
//! and no partial state survives any error path

use veilpool_wire::WireError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// envelope or payload failed to decode, instruction rejected before any
    /// state was touched
    #[error(transparent)]
    Wire(#[from] WireError),

    /// no pool exists for this asset yet, use shield-with-init first
    #[error("no pool exists for this asset")]
    PoolNotFound,

    /// a pool already exists for this asset, use the plain shield opcode
    #[error("pool already initialized for this asset")]
    AlreadyInitialized,

    /// the nullifier was already recorded: a double-spend attempt.
    /// security-relevant, never merely a business error
    #[error("nullifier already spent")]
    AlreadySpent,

    /// requested withdrawal exceeds the pool's custody balance
    #[error("withdrawal exceeds pool custody balance")]
    InsufficientPoolBalance,

    /// a caller account lacks the funds for a transfer or reservation
    #[error("insufficient funds")]
    InsufficientFunds,

    /// unknown (domain, opcode) pair, fatal to this instruction only
    #[error("unsupported instruction: domain={domain:#04x} opcode={opcode:#04x}")]
    UnsupportedInstruction { domain: u8, opcode: u8 },

    /// the on-wire sender field does not match the signing caller
    #[error("sender field does not match caller")]
    SenderMismatch,

    /// balance arithmetic overflowed
    #[error("amount overflow")]
    AmountOverflow,

    /// bank has no record of an account the instruction names
    #[error("unknown account")]
    UnknownAccount,
}
