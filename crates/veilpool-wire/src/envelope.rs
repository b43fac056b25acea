//! instruction envelope
//!
//! every veilpool instruction travels as `[domain:1][opcode:1][payload...]`
//! the envelope layer knows nothing about payload contents

/// wire-level decode failures
///
/// all of these reject the instruction before any state is touched
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// buffer shorter than the two-byte envelope header
    #[error("malformed envelope: need at least 2 bytes, got {0}")]
    MalformedEnvelope(usize),
    /// a fixed-offset or length-prefixed read passes the buffer end
    #[error("truncated payload: need {need} bytes at offset {offset}, have {have}")]
    TruncatedPayload {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// bytes remain after the final field of a payload
    #[error("trailing garbage: {0} bytes after final field")]
    TrailingGarbage(usize),
}

/// a decoded instruction envelope
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// feature family selector
    pub domain: u8,
    /// operation within the domain
    pub opcode: u8,
    /// opcode-specific payload, opaque at this layer
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(domain: u8, opcode: u8, payload: Vec<u8>) -> Self {
        Self {
            domain,
            opcode,
            payload,
        }
    }

    /// encode to wire bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.payload.len());
        out.push(self.domain);
        out.push(self.opcode);
        out.extend_from_slice(&self.payload);
        out
    }

    /// decode from wire bytes
    ///
    /// the payload is carried verbatim; per-opcode decoding happens later
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < 2 {
            return Err(WireError::MalformedEnvelope(bytes.len()));
        }
        Ok(Self {
            domain: bytes[0],
            opcode: bytes[1],
            payload: bytes[2..].to_vec(),
        })
    }
}
