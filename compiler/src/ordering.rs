//! Canonical account ordering.
//!
//! The compiled account list is laid out in four buckets: writable signers,
//! readonly signers, writable non-signers, readonly non-signers. The fee
//! payer always leads the first bucket; within a bucket, accounts keep their
//! first-appearance order. `compare_accounts` states that order outright so
//! it does not depend on how the resolved accounts happen to be stored.

use {
    crate::{
        roles::{ResolvedAccount, ResolvedAccounts},
        transaction::AccountRole,
    },
    keel_error::error::CompileError,
    trezoa_pubkey::Pubkey,
    std::cmp::Ordering,
};

/// The most accounts a message can address with `u8` indices.
pub const MAX_ACCOUNTS: usize = u8::MAX as usize + 1;

/// An address placed at its final position in the compiled account list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderedAccount {
    pub address: Pubkey,
    pub role: AccountRole,
    pub index: usize,
}

/// The canonical total order on resolved accounts: fee payer, then role
/// bucket, then first appearance.
pub fn compare_accounts(a: &ResolvedAccount, b: &ResolvedAccount) -> Ordering {
    b.is_fee_payer()
        .cmp(&a.is_fee_payer())
        .then(a.role.cmp(&b.role))
        .then(a.first_appearance.cmp(&b.first_appearance))
}

/// Deduplicates and orders resolved accounts.
pub trait AccountOrderer: Send + Sync {
    fn order(&self, resolved: ResolvedAccounts) -> Result<Vec<OrderedAccount>, CompileError>;
}

pub struct DefaultAccountOrderer;

impl AccountOrderer for DefaultAccountOrderer {
    fn order(&self, resolved: ResolvedAccounts) -> Result<Vec<OrderedAccount>, CompileError> {
        order_accounts(resolved)
    }
}

/// Sort resolved accounts into their canonical positions.
///
/// Fails with `AccountIndexOverflow` if the accounts cannot be addressed with
/// `u8` indices, or if there are too many signers to count in the header.
pub fn order_accounts(resolved: ResolvedAccounts) -> Result<Vec<OrderedAccount>, CompileError> {
    let mut accounts = resolved.into_accounts();
    if accounts.len() > MAX_ACCOUNTS {
        return Err(CompileError::AccountIndexOverflow(accounts.len()));
    }
    let num_signers = accounts.iter().filter(|a| a.role.is_signer()).count();
    if num_signers > u8::MAX as usize {
        return Err(CompileError::AccountIndexOverflow(num_signers));
    }

    accounts.sort_by(compare_accounts);

    Ok(accounts
        .into_iter()
        .enumerate()
        .map(|(index, account)| OrderedAccount {
            address: account.address,
            role: account.role,
            index,
        })
        .collect())
}
