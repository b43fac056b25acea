//! veilpool wire format
//!
//! the instruction envelope and masking codec shared by every veilpool
//! instruction family
//!
//! ```text
//! byte 0      : domain        (feature family selector)
//! byte 1      : opcode        (operation within domain)
//! bytes 2..N  : payload       (fixed offsets + optional length-prefixed tail)
//! ```
//!
//! payloads use fixed byte offsets, little-endian integers, and explicit
//! length prefixes for variable trailing blobs. there are no self-describing
//! tags. decoders reject truncation and trailing bytes.

pub mod cursor;
pub mod envelope;
pub mod mask;
pub mod payload;

pub use cursor::{PayloadReader, PayloadWriter};
pub use envelope::{Envelope, WireError};
pub use mask::{mask_amount, mask_recipient, unmask_amount, unmask_recipient};
pub use payload::{MaskedTransfer, Shield, Unshield, DOMAIN_POOL, DOMAIN_TRANSFER};

/// domain separator for recipient masking keystreams
pub const MASK_META_DOMAIN: &[u8] = b"veilpool.mask.meta.v1";
/// domain separator for amount masking keystreams
pub const MASK_XFER_DOMAIN: &[u8] = b"veilpool.mask.xfer.v1";
