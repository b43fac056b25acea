//! transfer masking codec
//!
//! deterministic keystream XOR over fixed-width fields. the keystream is a
//! domain-separated hash of public context, so anyone who can see the
//! instruction can recompute it — this is obfuscation against casual
//! observers, not authenticated encryption. there is no MAC: a corrupted
//! ciphertext unmasks to a wrong-but-plausible plaintext with no error.
//!
//! two instances:
//! - recipient masking keys off the sender key alone
//! - amount masking keys off sender, recipient, and an on-wire nonce

use crate::{MASK_META_DOMAIN, MASK_XFER_DOMAIN};

/// 32-byte keystream for recipient masking
///
/// depends only on the sender key, which is always visible on-chain
fn recipient_keystream(sender: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(MASK_META_DOMAIN);
    hasher.update(sender);
    *hasher.finalize().as_bytes()
}

/// 8-byte keystream for amount masking
fn amount_keystream(sender: &[u8; 32], recipient: &[u8; 32], nonce: &[u8; 8]) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(MASK_XFER_DOMAIN);
    hasher.update(sender);
    hasher.update(recipient);
    hasher.update(nonce);
    let digest = hasher.finalize();
    let mut trunc = [0u8; 8];
    trunc.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(trunc)
}

/// mask a recipient key for the wire
pub fn mask_recipient(recipient: &[u8; 32], sender: &[u8; 32]) -> [u8; 32] {
    let ks = recipient_keystream(sender);
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = recipient[i] ^ ks[i];
    }
    out
}

/// recover a recipient key from the wire (same XOR)
pub fn unmask_recipient(enc_recipient: &[u8; 32], sender: &[u8; 32]) -> [u8; 32] {
    mask_recipient(enc_recipient, sender)
}

/// mask a transfer amount for the wire
pub fn mask_amount(amount: u64, sender: &[u8; 32], recipient: &[u8; 32], nonce: &[u8; 8]) -> u64 {
    amount ^ amount_keystream(sender, recipient, nonce)
}

/// recover a transfer amount from the wire (same XOR)
pub fn unmask_amount(
    enc_amount: u64,
    sender: &[u8; 32],
    recipient: &[u8; 32],
    nonce: &[u8; 8],
) -> u64 {
    mask_amount(enc_amount, sender, recipient, nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_recipient_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut sender = [0u8; 32];
            let mut recipient = [0u8; 32];
            rng.fill_bytes(&mut sender);
            rng.fill_bytes(&mut recipient);

            let enc = mask_recipient(&recipient, &sender);
            assert_eq!(unmask_recipient(&enc, &sender), recipient);
        }
    }

    #[test]
    fn test_amount_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut sender = [0u8; 32];
            let mut recipient = [0u8; 32];
            let mut nonce = [0u8; 8];
            rng.fill_bytes(&mut sender);
            rng.fill_bytes(&mut recipient);
            rng.fill_bytes(&mut nonce);
            let amount = rng.next_u64();

            let enc = mask_amount(amount, &sender, &recipient, &nonce);
            assert_eq!(unmask_amount(enc, &sender, &recipient, &nonce), amount);
        }
    }

    #[test]
    fn test_masking_is_deterministic() {
        let sender = [1u8; 32];
        let recipient = [2u8; 32];
        assert_eq!(
            mask_recipient(&recipient, &sender),
            mask_recipient(&recipient, &sender)
        );
        let nonce = [3u8; 8];
        assert_eq!(
            mask_amount(500, &sender, &recipient, &nonce),
            mask_amount(500, &sender, &recipient, &nonce)
        );
    }

    #[test]
    fn test_nonce_separates_keystreams() {
        let sender = [1u8; 32];
        let recipient = [2u8; 32];
        let a = mask_amount(500, &sender, &recipient, &[0u8; 8]);
        let b = mask_amount(500, &sender, &recipient, &[1u8; 8]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_authentication() {
        // flipping a ciphertext bit flips the same plaintext bit, silently
        let sender = [1u8; 32];
        let recipient = [2u8; 32];
        let mut enc = mask_recipient(&recipient, &sender);
        enc[0] ^= 0x01;
        let wrong = unmask_recipient(&enc, &sender);
        assert_ne!(wrong, recipient);
        assert_eq!(wrong[1..], recipient[1..]);
    }
}
