//! instruction router
//!
//! pure dispatch: a decoded envelope resolves to a typed instruction via a
//! static (domain, opcode) match. unknown pairs are fatal to the
//! instruction only, never to ledger state. business logic lives in
//! [`crate::ledger`].

use veilpool_wire::payload::{
    MaskedTransfer, Shield, Unshield, DOMAIN_POOL, DOMAIN_TRANSFER, OP_MASKED_TRANSFER, OP_SHIELD,
    OP_SHIELD_WITH_INIT, OP_UNSHIELD, OP_UNSHIELD_WITH_CLOSE,
};
use veilpool_wire::Envelope;

use crate::error::LedgerError;

/// a fully decoded, validated instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// create the pool for an asset and make its first deposit
    ShieldWithInit(Shield),
    /// deposit into an existing pool
    Shield(Shield),
    /// withdraw against a nullifier
    Unshield(Unshield),
    /// withdraw, then close the pool if custody hits exactly zero
    UnshieldWithClose(Unshield),
    /// masked native transfer
    MaskedTransfer(MaskedTransfer),
}

impl Instruction {
    /// resolve an envelope to a typed instruction
    pub fn decode(envelope: &Envelope) -> Result<Self, LedgerError> {
        match (envelope.domain, envelope.opcode) {
            (DOMAIN_POOL, OP_SHIELD_WITH_INIT) => {
                Ok(Self::ShieldWithInit(Shield::decode(&envelope.payload)?))
            }
            (DOMAIN_POOL, OP_SHIELD) => Ok(Self::Shield(Shield::decode(&envelope.payload)?)),
            (DOMAIN_POOL, OP_UNSHIELD) => Ok(Self::Unshield(Unshield::decode(&envelope.payload)?)),
            (DOMAIN_POOL, OP_UNSHIELD_WITH_CLOSE) => {
                Ok(Self::UnshieldWithClose(Unshield::decode(&envelope.payload)?))
            }
            (DOMAIN_TRANSFER, OP_MASKED_TRANSFER) => {
                Ok(Self::MaskedTransfer(MaskedTransfer::decode(
                    &envelope.payload,
                )?))
            }
            (domain, opcode) => Err(LedgerError::UnsupportedInstruction { domain, opcode }),
        }
    }

    /// wrap back into an envelope (client side and tests)
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::ShieldWithInit(p) => Envelope::new(DOMAIN_POOL, OP_SHIELD_WITH_INIT, p.encode()),
            Self::Shield(p) => Envelope::new(DOMAIN_POOL, OP_SHIELD, p.encode()),
            Self::Unshield(p) => Envelope::new(DOMAIN_POOL, OP_UNSHIELD, p.encode()),
            Self::UnshieldWithClose(p) => {
                Envelope::new(DOMAIN_POOL, OP_UNSHIELD_WITH_CLOSE, p.encode())
            }
            Self::MaskedTransfer(p) => {
                Envelope::new(DOMAIN_TRANSFER, OP_MASKED_TRANSFER, p.encode())
            }
        }
    }

    /// encode to wire bytes
    pub fn encode(&self) -> Vec<u8> {
        self.to_envelope().encode()
    }
}
