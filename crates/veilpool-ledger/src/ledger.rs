//! the ledger itself
//!
//! owns the pool registry, nullifier store, commitment ledger, and the
//! bank seam, and applies decoded instructions to them. every operation
//! validates fully before its first mutation: a rejected instruction
//! leaves no visible state change.

use tracing::{debug, info};
use veilpool_wire::payload::{MaskedTransfer, Shield, Unshield};
use veilpool_wire::{mask, Envelope};

use crate::bank::Bank;
use crate::commitment::{Commitment, CommitmentLedger, EncryptedNote};
use crate::error::LedgerError;
use crate::nullifier::{Nullifier, NullifierStore, SpendStatus};
use crate::pool::{Pool, PoolManager};
use crate::router::Instruction;
use crate::value::{AccountId, Amount, AssetId};

/// ledger parameters
#[derive(Clone, Copy, Debug)]
pub struct LedgerConfig {
    /// native-asset reservation locked when a custody account is created,
    /// returned to whoever triggers closure
    pub reservation: Amount,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reservation: Amount::new(1_000_000),
        }
    }
}

/// state change produced by a committed instruction, exposed to collaborators
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateDelta {
    PoolOpened {
        asset_id: AssetId,
        custody: AccountId,
    },
    NoteCommitted {
        asset_id: AssetId,
        commitment: Commitment,
    },
    NullifierRecorded {
        nullifier: Nullifier,
    },
    Unshielded {
        asset_id: AssetId,
        amount: Amount,
        recipient: AccountId,
    },
    PoolClosed {
        asset_id: AssetId,
        refund_to: AccountId,
    },
    Transferred {
        from: AccountId,
        to: AccountId,
        amount: Amount,
        memo: Vec<u8>,
    },
}

/// the shielded pool ledger
pub struct Ledger<B: Bank> {
    pools: PoolManager,
    nullifiers: NullifierStore,
    commitments: CommitmentLedger,
    bank: B,
    config: LedgerConfig,
}

impl<B: Bank> Ledger<B> {
    pub fn new(bank: B, config: LedgerConfig) -> Self {
        Self {
            pools: PoolManager::new(),
            nullifiers: NullifierStore::new(),
            commitments: CommitmentLedger::new(),
            bank,
            config,
        }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn pools(&self) -> &PoolManager {
        &self.pools
    }

    pub fn nullifiers(&self) -> &NullifierStore {
        &self.nullifiers
    }

    pub fn commitments(&self) -> &CommitmentLedger {
        &self.commitments
    }

    /// decode and apply one instruction from wire bytes
    ///
    /// the caller is the signer the surrounding environment authenticated.
    /// the environment must serialize instructions touching the same pool
    /// or nullifier address; within one call everything is synchronous.
    pub fn execute(
        &mut self,
        caller: &AccountId,
        bytes: &[u8],
    ) -> Result<Vec<StateDelta>, LedgerError> {
        let envelope = Envelope::decode(bytes)?;
        let instruction = Instruction::decode(&envelope)?;
        self.apply(caller, instruction)
    }

    /// apply a decoded instruction
    pub fn apply(
        &mut self,
        caller: &AccountId,
        instruction: Instruction,
    ) -> Result<Vec<StateDelta>, LedgerError> {
        match instruction {
            Instruction::ShieldWithInit(p) => self.shield_with_init(caller, &p),
            Instruction::Shield(p) => self.shield(caller, &p),
            Instruction::Unshield(p) => self.unshield(caller, &p, false),
            Instruction::UnshieldWithClose(p) => self.unshield(caller, &p, true),
            Instruction::MaskedTransfer(p) => self.masked_transfer(caller, &p),
        }
    }

    /// first deposit for an asset: create the pool, then shield
    ///
    /// permissionless by design, any depositor may open a pool for a new
    /// asset; they fund the custody account's reservation
    fn shield_with_init(
        &mut self,
        depositor: &AccountId,
        payload: &Shield,
    ) -> Result<Vec<StateDelta>, LedgerError> {
        let asset_id = AssetId::from_bytes(payload.asset_id);
        let amount = Amount::new(payload.amount);

        if self.pools.contains(&asset_id) {
            return Err(LedgerError::AlreadyInitialized);
        }

        // the depositor pays reservation and deposit; when the asset is the
        // native one both come out of the same balance
        let needed_native = if asset_id == AssetId::NATIVE {
            self.config
                .reservation
                .checked_add(amount)
                .ok_or(LedgerError::AmountOverflow)?
        } else {
            self.config.reservation
        };
        if self.bank.balance(depositor, &AssetId::NATIVE) < needed_native {
            return Err(LedgerError::InsufficientFunds);
        }
        if self.bank.balance(depositor, &asset_id) < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        let pool = Pool::derive(asset_id);
        self.bank
            .open_account(&pool.custody, depositor, self.config.reservation)?;
        self.bank
            .transfer(depositor, &pool.custody, &asset_id, amount)?;
        let commitment = Commitment::from_bytes(payload.commitment);
        self.commitments
            .record(asset_id, commitment, EncryptedNote(payload.note.clone()));
        self.pools.insert(pool);

        info!(
            asset = %hex::encode(asset_id.0),
            custody = %hex::encode(pool.custody.0),
            "pool opened"
        );
        debug!(amount = amount.0, "shielded initial deposit");

        Ok(vec![
            StateDelta::PoolOpened {
                asset_id,
                custody: pool.custody,
            },
            StateDelta::NoteCommitted {
                asset_id,
                commitment,
            },
        ])
    }

    /// deposit into an existing pool
    fn shield(
        &mut self,
        depositor: &AccountId,
        payload: &Shield,
    ) -> Result<Vec<StateDelta>, LedgerError> {
        let asset_id = AssetId::from_bytes(payload.asset_id);
        let amount = Amount::new(payload.amount);

        let custody = self
            .pools
            .get(&asset_id)
            .ok_or(LedgerError::PoolNotFound)?
            .custody;
        if self.bank.balance(depositor, &asset_id) < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        self.bank.transfer(depositor, &custody, &asset_id, amount)?;
        let commitment = Commitment::from_bytes(payload.commitment);
        self.commitments
            .record(asset_id, commitment, EncryptedNote(payload.note.clone()));

        debug!(
            asset = %hex::encode(asset_id.0),
            amount = amount.0,
            "shielded deposit"
        );

        Ok(vec![StateDelta::NoteCommitted {
            asset_id,
            commitment,
        }])
    }

    /// withdraw against a nullifier; with `close`, destroy the pool if the
    /// post-withdrawal custody balance is exactly zero
    ///
    /// closure is gated on the custody balance read from the bank at that
    /// moment, never a cached or caller-supplied value. a depositor who has
    /// not withdrawn finds the pool, and their funds, intact after anyone
    /// else's close attempt while the aggregate balance is nonzero. the
    /// custody reservation returns to the caller who triggered closure.
    fn unshield(
        &mut self,
        caller: &AccountId,
        payload: &Unshield,
        close: bool,
    ) -> Result<Vec<StateDelta>, LedgerError> {
        let asset_id = AssetId::from_bytes(payload.asset_id);
        let amount = Amount::new(payload.amount);
        let nullifier = Nullifier::from_bytes(payload.nullifier);
        let recipient = AccountId::from_bytes(payload.recipient);

        let custody = self
            .pools
            .get(&asset_id)
            .ok_or(LedgerError::PoolNotFound)?
            .custody;
        let custody_balance = self.bank.balance(&custody, &asset_id);

        // double-spend check precedes every other precondition: an already
        // spent note is rejected even if the balance check would also fail
        if self.nullifiers.check(&nullifier) == SpendStatus::Spent {
            return Err(LedgerError::AlreadySpent);
        }
        if custody_balance < amount {
            return Err(LedgerError::InsufficientPoolBalance);
        }
        // the credit side must also be provable before the tombstone is
        // written, so a failed payout can never consume the nullifier
        let recipient_after = self
            .bank
            .balance(&recipient, &asset_id)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        if close && custody_balance == amount {
            let refund_base = if *caller == recipient && asset_id == AssetId::NATIVE {
                recipient_after
            } else {
                self.bank.balance(caller, &AssetId::NATIVE)
            };
            refund_base
                .checked_add(self.config.reservation)
                .ok_or(LedgerError::AmountOverflow)?;
        }

        // all checks passed, mutate: tombstone first, then pay out
        self.nullifiers.create(&nullifier)?;
        self.bank.transfer(&custody, &recipient, &asset_id, amount)?;

        debug!(
            asset = %hex::encode(asset_id.0),
            amount = amount.0,
            "unshielded"
        );

        let mut deltas = vec![
            StateDelta::NullifierRecorded { nullifier },
            StateDelta::Unshielded {
                asset_id,
                amount,
                recipient,
            },
        ];

        if close && self.bank.balance(&custody, &asset_id).is_zero() {
            self.bank.close_account(&custody, caller)?;
            self.pools.remove(&asset_id);
            info!(
                asset = %hex::encode(asset_id.0),
                "pool closed, reservation refunded to withdrawer"
            );
            deltas.push(StateDelta::PoolClosed {
                asset_id,
                refund_to: *caller,
            });
        }

        Ok(deltas)
    }

    /// masked native transfer: unmask recipient and amount, then move funds
    fn masked_transfer(
        &mut self,
        caller: &AccountId,
        payload: &MaskedTransfer,
    ) -> Result<Vec<StateDelta>, LedgerError> {
        let sender = AccountId::from_bytes(payload.sender);
        if *caller != sender {
            return Err(LedgerError::SenderMismatch);
        }

        let recipient = AccountId::from_bytes(mask::unmask_recipient(
            &payload.enc_recipient,
            &payload.sender,
        ));
        let amount = Amount::new(mask::unmask_amount(
            payload.enc_amount,
            &payload.sender,
            &recipient.0,
            &payload.nonce,
        ));

        self.bank
            .transfer(&sender, &recipient, &AssetId::NATIVE, amount)?;

        debug!(amount = amount.0, "masked transfer");

        Ok(vec![StateDelta::Transferred {
            from: sender,
            to: recipient,
            amount,
            memo: payload.memo.clone(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::MemoryBank;

    fn acct(b: u8) -> AccountId {
        AccountId([b; 32])
    }

    fn funded_ledger(depositor: &AccountId, asset: &AssetId, bal: u64) -> Ledger<MemoryBank> {
        let mut bank = MemoryBank::new();
        bank.mint(depositor, &AssetId::NATIVE, Amount::new(10_000_000));
        bank.mint(depositor, asset, Amount::new(bal));
        Ledger::new(bank, LedgerConfig::default())
    }

    fn shield_payload(asset: &AssetId, amount: u64, tag: u8) -> Shield {
        Shield {
            asset_id: asset.0,
            amount,
            commitment: [tag; 32],
            note: vec![tag; 64],
            flags: 0,
        }
    }

    #[test]
    fn test_init_then_deposit() {
        let alice = acct(1);
        let asset = AssetId::derive(b"USDT");
        let mut ledger = funded_ledger(&alice, &asset, 2_000_000);

        let deltas = ledger
            .apply(
                &alice,
                Instruction::ShieldWithInit(shield_payload(&asset, 1_000_000, 1)),
            )
            .unwrap();
        assert!(matches!(deltas[0], StateDelta::PoolOpened { .. }));
        let custody = ledger.pools().get(&asset).unwrap().custody;
        assert_eq!(ledger.bank().balance(&custody, &asset), Amount::new(1_000_000));

        // second init is rejected, deposit works
        assert_eq!(
            ledger.apply(
                &alice,
                Instruction::ShieldWithInit(shield_payload(&asset, 1, 2)),
            ),
            Err(LedgerError::AlreadyInitialized)
        );
        ledger
            .apply(&alice, Instruction::Shield(shield_payload(&asset, 500_000, 3)))
            .unwrap();
        assert_eq!(ledger.bank().balance(&custody, &asset), Amount::new(1_500_000));
        assert_eq!(ledger.commitments().len(), 2);
    }

    #[test]
    fn test_deposit_without_pool_rejected() {
        let alice = acct(1);
        let asset = AssetId::derive(b"NOPOOL");
        let mut ledger = funded_ledger(&alice, &asset, 100);
        assert_eq!(
            ledger.apply(&alice, Instruction::Shield(shield_payload(&asset, 50, 1))),
            Err(LedgerError::PoolNotFound)
        );
    }

    #[test]
    fn test_failed_init_leaves_no_state() {
        let alice = acct(1);
        let asset = AssetId::derive(b"POOR");
        // native funds cover the reservation but not the deposit
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &AssetId::NATIVE, Amount::new(10_000_000));
        let mut ledger = Ledger::new(bank, LedgerConfig::default());

        assert_eq!(
            ledger.apply(
                &alice,
                Instruction::ShieldWithInit(shield_payload(&asset, 100, 1)),
            ),
            Err(LedgerError::InsufficientFunds)
        );
        assert!(ledger.pools().is_empty());
        assert!(ledger.commitments().is_empty());
        assert_eq!(
            ledger.bank().balance(&alice, &AssetId::NATIVE),
            Amount::new(10_000_000)
        );
    }

    #[test]
    fn test_native_init_needs_reservation_plus_amount() {
        let alice = acct(1);
        let mut bank = MemoryBank::new();
        // enough for the deposit alone, not deposit + reservation
        bank.mint(&alice, &AssetId::NATIVE, Amount::new(1_200_000));
        let mut ledger = Ledger::new(bank, LedgerConfig::default());

        assert_eq!(
            ledger.apply(
                &alice,
                Instruction::ShieldWithInit(shield_payload(&AssetId::NATIVE, 1_000_000, 1)),
            ),
            Err(LedgerError::InsufficientFunds)
        );
        assert!(ledger.pools().is_empty());
    }

    #[test]
    fn test_masked_transfer_sender_mismatch() {
        let alice = acct(1);
        let mallory = acct(9);
        let mut ledger = funded_ledger(&alice, &AssetId::derive(b"X"), 0);

        let payload = MaskedTransfer {
            enc_recipient: mask::mask_recipient(&acct(2).0, &alice.0),
            sender: alice.0,
            enc_amount: mask::mask_amount(100, &alice.0, &acct(2).0, &[0u8; 8]),
            nonce: [0u8; 8],
            memo: Vec::new(),
        };
        assert_eq!(
            ledger.apply(&mallory, Instruction::MaskedTransfer(payload)),
            Err(LedgerError::SenderMismatch)
        );
    }

    #[test]
    fn test_masked_transfer_moves_unmasked_amount() {
        let alice = acct(1);
        let bob = acct(2);
        let mut ledger = funded_ledger(&alice, &AssetId::derive(b"X"), 0);
        let nonce = [7u8; 8];

        let payload = MaskedTransfer {
            enc_recipient: mask::mask_recipient(&bob.0, &alice.0),
            sender: alice.0,
            enc_amount: mask::mask_amount(250_000, &alice.0, &bob.0, &nonce),
            nonce,
            memo: b"hidden".to_vec(),
        };
        let deltas = ledger
            .apply(&alice, Instruction::MaskedTransfer(payload))
            .unwrap();

        assert_eq!(
            ledger.bank().balance(&bob, &AssetId::NATIVE),
            Amount::new(250_000)
        );
        assert!(matches!(
            &deltas[0],
            StateDelta::Transferred { to, amount, .. }
                if *to == bob && *amount == Amount::new(250_000)
        ));
    }
}
