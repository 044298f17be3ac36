//! Core compiled message types.

use {trezoa_hash::Hash, trezoa_pubkey::Pubkey};

/// Message format discriminator, carried through compilation unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum TransactionVersion {
    /// The legacy, unversioned format.
    Legacy,
    /// Version 0.
    #[default]
    V0,
}

/// Account role counts, derived from the ordered account list.
///
/// Signers occupy the first `num_signer_accounts` positions. The last
/// `num_readonly_signer_accounts` of those are readonly, as are the last
/// `num_readonly_non_signer_accounts` positions of the whole list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CompiledHeader {
    /// Number of accounts whose signatures must accompany the message,
    /// including the fee payer.
    pub num_signer_accounts: u8,
    /// Number of signer accounts that are readonly.
    pub num_readonly_signer_accounts: u8,
    /// Number of non-signer accounts that are readonly.
    pub num_readonly_non_signer_accounts: u8,
}

/// An instruction with its addresses rewritten as indices into the message's
/// ordered account list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompiledInstruction {
    /// Index of the invoked program's address.
    pub program_address_index: u8,
    /// Indices of the instruction's accounts, in the instruction's order.
    pub account_indices: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

/// The canonical, index-based form of a transaction, ready for binary
/// encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledMessage {
    pub header: CompiledHeader,
    /// Deduplicated addresses in canonical order. The fee payer is always
    /// at index 0.
    pub ordered_accounts: Vec<Pubkey>,
    pub instructions: Vec<CompiledInstruction>,
    /// The fixed-width token bounding the message's validity: a recent
    /// blockhash or a durable nonce value.
    pub lifetime_token: Hash,
    pub version: TransactionVersion,
}

impl CompiledMessage {
    /// The fee payer, if the account list is not empty.
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.ordered_accounts.first()
    }

    /// The addresses whose signatures must accompany the message, in the
    /// order the signatures are expected.
    pub fn signer_addresses(&self) -> &[Pubkey] {
        let len = (self.header.num_signer_accounts as usize).min(self.ordered_accounts.len());
        &self.ordered_accounts[..len]
    }

    /// Returns `true` if the account at this index must sign.
    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_signer_accounts as usize
    }

    /// Returns `true` if the account at this index may be written to.
    pub fn is_writable(&self, index: usize) -> bool {
        let num_signers = self.header.num_signer_accounts as usize;
        let num_accounts = self.ordered_accounts.len();
        if index >= num_accounts {
            false
        } else if index < num_signers {
            index
                < num_signers.saturating_sub(self.header.num_readonly_signer_accounts as usize)
        } else {
            index
                < num_accounts
                    .saturating_sub(self.header.num_readonly_non_signer_accounts as usize)
        }
    }

    /// The invoked program addresses, one per instruction. Out-of-range
    /// program indices are skipped.
    pub fn program_addresses(&self) -> impl Iterator<Item = &Pubkey> {
        self.instructions.iter().filter_map(|instruction| {
            self.ordered_accounts
                .get(instruction.program_address_index as usize)
        })
    }
}
