//! Durable nonce support.
//!
//! A durable nonce lifetime uses the value stored in a nonce account as the
//! lifetime token. Looking that value up is a network concern: the compiler
//! only encodes a value it is given. `NonceResolver` is the seam through
//! which a caller supplies current nonce values before compiling.

use {
    crate::transaction::{
        AccountReference, AccountRole, Instruction, LifetimeConstraint, Transaction,
    },
    keel_error::error::CompileError,
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::collections::HashMap,
};

/// Serialized `SystemInstruction::AdvanceNonceAccount`.
const ADVANCE_NONCE_ACCOUNT_DATA: [u8; 4] = [4, 0, 0, 0];

/// Build the system program instruction that advances a nonce account.
pub fn advance_nonce_account_instruction(
    nonce_account_address: &Pubkey,
    nonce_authority_address: &Pubkey,
) -> Instruction {
    Instruction::new(
        trezoa_sdk_ids::system_program::id(),
        vec![
            AccountReference::new(*nonce_account_address, AccountRole::Writable),
            AccountReference::new(
                trezoa_sdk_ids::sysvar::recent_blockhashes::id(),
                AccountRole::Readonly,
            ),
            AccountReference::new(*nonce_authority_address, AccountRole::ReadonlySigner),
        ],
        ADVANCE_NONCE_ACCOUNT_DATA.to_vec(),
    )
}

pub fn is_advance_nonce_account_instruction(instruction: &Instruction) -> bool {
    instruction.program_address == trezoa_sdk_ids::system_program::id()
        && instruction.data == ADVANCE_NONCE_ACCOUNT_DATA
        && instruction.accounts.len() == 3
        && instruction.accounts[1].address == trezoa_sdk_ids::sysvar::recent_blockhashes::id()
        && instruction.accounts[2].role.is_signer()
}

/// A source of current on-chain nonce values.
pub trait NonceResolver {
    /// Get the nonce value currently stored in the given nonce account.
    fn current_nonce(&self, nonce_account_address: &Pubkey) -> Option<Hash>;
}

impl NonceResolver for HashMap<Pubkey, Hash> {
    fn current_nonce(&self, nonce_account_address: &Pubkey) -> Option<Hash> {
        self.get(nonce_account_address).copied()
    }
}

/// Return a copy of the transaction whose durable nonce lifetime carries the
/// nonce value the resolver reports. Transactions with any other lifetime are
/// returned unchanged.
pub fn resolve_durable_nonce<R: NonceResolver + ?Sized>(
    transaction: &Transaction,
    resolver: &R,
) -> Result<Transaction, CompileError> {
    let mut resolved = transaction.clone();
    if let LifetimeConstraint::DurableNonce {
        nonce_account_address,
        nonce,
        ..
    } = &mut resolved.lifetime_constraint
    {
        *nonce = resolver
            .current_nonce(nonce_account_address)
            .ok_or(CompileError::NonceUnresolved(*nonce_account_address))?;
        log::debug!(
            "Resolved durable nonce for {}: {}",
            nonce_account_address,
            nonce
        );
    }
    Ok(resolved)
}
