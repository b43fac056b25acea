//! bank seam
//!
//! the ledger consumes two external primitives: an asset-transfer call
//! (debit/credit custody-held balances) and an account-creation/closure
//! call with rent-like reservation semantics. both are specified here at
//! the interface only; `MemoryBank` is the in-process implementation used
//! by tests and simulation.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::value::{AccountId, Amount, AssetId};

/// asset transfer and account reservation primitives
///
/// every mutating call is all-or-nothing: on error, no balances change
pub trait Bank {
    /// current balance of `account` in `asset`
    fn balance(&self, account: &AccountId, asset: &AssetId) -> Amount;

    /// move `amount` of `asset` from `from` to `to`
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// create `account`, moving a native-asset reservation from `funder`
    fn open_account(
        &mut self,
        account: &AccountId,
        funder: &AccountId,
        reservation: Amount,
    ) -> Result<(), LedgerError>;

    /// destroy `account`, returning its reservation to `refund_to`
    fn close_account(
        &mut self,
        account: &AccountId,
        refund_to: &AccountId,
    ) -> Result<(), LedgerError>;
}

/// in-memory bank
#[derive(Default)]
pub struct MemoryBank {
    balances: HashMap<(AccountId, AssetId), Amount>,
    reservations: HashMap<AccountId, Amount>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// credit an account out of thin air (genesis / test setup)
    pub fn mint(&mut self, account: &AccountId, asset: &AssetId, amount: Amount) {
        let entry = self.balances.entry((*account, *asset)).or_default();
        *entry = Amount(entry.0.saturating_add(amount.0));
    }

    /// reservation currently held for an account, if it exists
    pub fn reservation(&self, account: &AccountId) -> Option<Amount> {
        self.reservations.get(account).copied()
    }

    fn debit(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let entry = self.balances.entry((*account, *asset)).or_default();
        *entry = entry
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        Ok(())
    }

    fn credit(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let entry = self.balances.entry((*account, *asset)).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(())
    }
}

impl Bank for MemoryBank {
    fn balance(&self, account: &AccountId, asset: &AssetId) -> Amount {
        self.balances
            .get(&(*account, *asset))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        // validate both sides before touching either
        self.balance(from, asset)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        self.balance(to, asset)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)?;
        Ok(())
    }

    fn open_account(
        &mut self,
        account: &AccountId,
        funder: &AccountId,
        reservation: Amount,
    ) -> Result<(), LedgerError> {
        if self.reservations.contains_key(account) {
            return Err(LedgerError::AlreadyInitialized);
        }
        self.balance(funder, &AssetId::NATIVE)
            .checked_sub(reservation)
            .ok_or(LedgerError::InsufficientFunds)?;

        self.debit(funder, &AssetId::NATIVE, reservation)?;
        self.reservations.insert(*account, reservation);
        Ok(())
    }

    fn close_account(
        &mut self,
        account: &AccountId,
        refund_to: &AccountId,
    ) -> Result<(), LedgerError> {
        let reservation = self
            .reservations
            .remove(account)
            .ok_or(LedgerError::UnknownAccount)?;
        self.credit(refund_to, &AssetId::NATIVE, reservation)?;
        Ok(())
    }
}
