//! Transaction descriptions, the input to message compilation.
//!
//! A transaction is described declaratively: a fee payer, an ordered list of
//! instructions (each naming the accounts it touches and the role it needs
//! them in), a lifetime constraint, and a version. The builder methods here
//! consume and return the transaction, so a description is never mutated in
//! place once handed to the compiler.

use {
    crate::nonce::{advance_nonce_account_instruction, is_advance_nonce_account_instruction},
    keel_result::TransactionVersion,
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
};

/// The access an instruction requires on an account.
///
/// Variants are declared in canonical bucket order, so the derived `Ord`
/// sorts accounts the way the compiled account list lays them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountRole {
    WritableSigner,
    ReadonlySigner,
    Writable,
    Readonly,
}

impl AccountRole {
    pub const fn from_flags(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (true, true) => Self::WritableSigner,
            (true, false) => Self::ReadonlySigner,
            (false, true) => Self::Writable,
            (false, false) => Self::Readonly,
        }
    }

    pub const fn is_signer(&self) -> bool {
        matches!(self, Self::WritableSigner | Self::ReadonlySigner)
    }

    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::WritableSigner | Self::Writable)
    }

    /// The least privileged role satisfying both roles: signer if either
    /// signs, writable if either writes.
    pub const fn merge(self, other: Self) -> Self {
        Self::from_flags(
            self.is_signer() || other.is_signer(),
            self.is_writable() || other.is_writable(),
        )
    }
}

/// An account referenced by an instruction, with the role it requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccountReference {
    pub address: Pubkey,
    pub role: AccountRole,
}

impl AccountReference {
    pub const fn new(address: Pubkey, role: AccountRole) -> Self {
        Self { address, role }
    }
}

impl From<&trezoa_instruction::AccountMeta> for AccountReference {
    fn from(meta: &trezoa_instruction::AccountMeta) -> Self {
        Self::new(
            meta.pubkey,
            AccountRole::from_flags(meta.is_signer, meta.is_writable),
        )
    }
}

/// A single program invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The program to invoke.
    pub program_address: Pubkey,
    /// Accounts passed to the program, in the order the program expects.
    pub accounts: Vec<AccountReference>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_address: Pubkey, accounts: Vec<AccountReference>, data: Vec<u8>) -> Self {
        Self {
            program_address,
            accounts,
            data,
        }
    }
}

impl From<trezoa_instruction::Instruction> for Instruction {
    fn from(instruction: trezoa_instruction::Instruction) -> Self {
        Self {
            program_address: instruction.program_id,
            accounts: instruction.accounts.iter().map(Into::into).collect(),
            data: instruction.data,
        }
    }
}

impl From<&trezoa_instruction::Instruction> for Instruction {
    fn from(instruction: &trezoa_instruction::Instruction) -> Self {
        Self {
            program_address: instruction.program_id,
            accounts: instruction.accounts.iter().map(Into::into).collect(),
            data: instruction.data.clone(),
        }
    }
}

/// How long a transaction stays valid, and what prevents it from being
/// replayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifetimeConstraint {
    /// Valid until the referenced blockhash ages out.
    Blockhash {
        blockhash: Hash,
        last_valid_block_height: u64,
    },
    /// Valid until the nonce stored in the nonce account is advanced.
    ///
    /// `nonce` must already hold the value currently stored in the nonce
    /// account; see `nonce::resolve_durable_nonce`.
    DurableNonce {
        nonce_account_address: Pubkey,
        nonce_authority_address: Pubkey,
        nonce: Hash,
    },
    /// A constraint kind that could not be mapped when decoding a
    /// transaction description. It can never be compiled.
    Unrecognized { kind: String },
}

/// A declarative transaction description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub fee_payer: Pubkey,
    pub instructions: Vec<Instruction>,
    pub lifetime_constraint: LifetimeConstraint,
    pub version: TransactionVersion,
}

impl Transaction {
    /// Create a transaction with no instructions.
    pub fn new(
        version: TransactionVersion,
        fee_payer: Pubkey,
        lifetime_constraint: LifetimeConstraint,
    ) -> Self {
        Self {
            fee_payer,
            instructions: Vec::new(),
            lifetime_constraint,
            version,
        }
    }

    pub fn with_fee_payer(mut self, fee_payer: Pubkey) -> Self {
        self.fee_payer = fee_payer;
        self
    }

    pub fn append_instruction(mut self, instruction: impl Into<Instruction>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn append_instructions<I>(mut self, instructions: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Instruction>,
    {
        self.instructions
            .extend(instructions.into_iter().map(Into::into));
        self
    }

    pub fn prepend_instruction(mut self, instruction: impl Into<Instruction>) -> Self {
        self.instructions.insert(0, instruction.into());
        self
    }

    pub fn prepend_instructions<I>(mut self, instructions: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Instruction>,
    {
        self.instructions
            .splice(0..0, instructions.into_iter().map(Into::into));
        self
    }

    pub fn with_blockhash_lifetime(
        mut self,
        blockhash: Hash,
        last_valid_block_height: u64,
    ) -> Self {
        self.lifetime_constraint = LifetimeConstraint::Blockhash {
            blockhash,
            last_valid_block_height,
        };
        self
    }

    /// Bind the transaction's lifetime to a durable nonce.
    ///
    /// The network only honours a durable nonce lifetime when the first
    /// instruction advances that nonce, so this also installs an
    /// `AdvanceNonceAccount` instruction at the front, replacing one that is
    /// already there.
    pub fn with_durable_nonce_lifetime(
        mut self,
        nonce_account_address: Pubkey,
        nonce_authority_address: Pubkey,
        nonce: Hash,
    ) -> Self {
        let advance_nonce =
            advance_nonce_account_instruction(&nonce_account_address, &nonce_authority_address);
        if self
            .instructions
            .first()
            .is_some_and(is_advance_nonce_account_instruction)
        {
            self.instructions[0] = advance_nonce;
        } else {
            self.instructions.insert(0, advance_nonce);
        }
        self.lifetime_constraint = LifetimeConstraint::DurableNonce {
            nonce_account_address,
            nonce_authority_address,
            nonce,
        };
        self
    }
}
