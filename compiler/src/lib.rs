//! # Keel
//!
//! Keel compiles declarative Trezoa transaction descriptions into the
//! canonical, index-based message the network's consensus layer expects.
//!
//! A `Transaction` names a fee payer, an ordered list of instructions (each
//! referencing accounts by address and role, and invoking a program), a
//! lifetime constraint, and a version. Compiling it:
//!
//! * Resolves every referenced address to the strictest role asked of it,
//!   with the fee payer always a writable signer.
//! * Orders the deduplicated addresses into four buckets (writable signers,
//!   readonly signers, writable non-signers, readonly non-signers), fee payer
//!   first and first-appearance order within each bucket.
//! * Derives the header counts from that ordering.
//! * Rewrites each instruction's addresses as indices into the ordering.
//! * Encodes the lifetime constraint as its fixed-width token.
//!
//! Any deviation from that canonical form produces a message nodes reject,
//! or interpret differently than intended, so each stage is exposed on its
//! own and can be tested on its own.
//!
//! ```rust,ignore
//! use {
//!     keel::{
//!         transaction::{
//!             AccountReference, AccountRole, Instruction, LifetimeConstraint, Transaction,
//!         },
//!         result::{Check, CompiledHeader, TransactionVersion},
//!         compile_message,
//!     },
//!     trezoa_hash::Hash,
//!     trezoa_pubkey::Pubkey,
//! };
//!
//! let payer = Pubkey::new_unique();
//! let program = Pubkey::new_unique();
//! let x = Pubkey::new_unique();
//! let y = Pubkey::new_unique();
//!
//! let transaction = Transaction::new(
//!     TransactionVersion::V0,
//!     payer,
//!     LifetimeConstraint::Blockhash {
//!         blockhash: Hash::new_unique(),
//!         last_valid_block_height: 100,
//!     },
//! )
//! .append_instruction(Instruction::new(
//!     program,
//!     vec![
//!         AccountReference::new(x, AccountRole::Writable),
//!         AccountReference::new(y, AccountRole::ReadonlySigner),
//!     ],
//!     vec![],
//! ));
//!
//! let message = compile_message(&transaction).unwrap();
//!
//! message.run_checks(
//!     &[
//!         Check::ordered_accounts(&[payer, y, x, program]),
//!         Check::header(CompiledHeader {
//!             num_signer_accounts: 2,
//!             num_readonly_signer_accounts: 1,
//!             num_readonly_non_signer_accounts: 1,
//!         }),
//!         Check::instruction(0)
//!             .program_address_index(3)
//!             .account_indices(&[2, 1])
//!             .build(),
//!         Check::well_formed(),
//!     ],
//!     &Default::default(),
//! );
//! ```
//!
//! ## Substituting stages
//!
//! `MessageCompiler` holds each stage behind a trait object. The default
//! compiler wires up the canonical implementations, and any stage can be
//! swapped out at construction time, which is mostly useful for testing the
//! orchestration in isolation.
//!
//! ```rust,ignore
//! struct FixedHeader;
//!
//! impl HeaderCompiler for FixedHeader {
//!     fn compile_header(&self, _: &[OrderedAccount]) -> Result<CompiledHeader, CompileError> {
//!         Ok(CompiledHeader::default())
//!     }
//! }
//!
//! let compiler = MessageCompiler::default().with_header_compiler(FixedHeader);
//! ```
//!
//! ## Durable nonces
//!
//! A durable nonce lifetime encodes the value currently stored in the nonce
//! account. Keel never reads network state, so callers supply that value,
//! either directly or through a `NonceResolver` with
//! `nonce::resolve_durable_nonce`.

pub mod header;
pub mod instructions;
pub mod lifetime;
pub mod nonce;
pub mod ordering;
pub mod roles;
pub mod transaction;

// Re-export result module from keel-result crate
pub use {keel_error::error::CompileError, keel_result as result};
use {
    crate::{
        header::{DefaultHeaderCompiler, HeaderCompiler},
        instructions::{DefaultInstructionCompiler, InstructionCompiler},
        lifetime::{DefaultLifetimeTokenCompiler, LifetimeTokenCompiler},
        ordering::{AccountOrderer, DefaultAccountOrderer},
        roles::{AccountRoleResolver, DefaultAccountRoleResolver},
        transaction::Transaction,
    },
    keel_result::CompiledMessage,
};

/// The message compilation pipeline.
///
/// Compilation is a pure function of the transaction: a compiler holds no
/// state between calls and can be shared across threads.
pub struct MessageCompiler {
    pub role_resolver: Box<dyn AccountRoleResolver>,
    pub account_orderer: Box<dyn AccountOrderer>,
    pub header_compiler: Box<dyn HeaderCompiler>,
    pub instruction_compiler: Box<dyn InstructionCompiler>,
    pub lifetime_token_compiler: Box<dyn LifetimeTokenCompiler>,
}

impl Default for MessageCompiler {
    fn default() -> Self {
        Self {
            role_resolver: Box::new(DefaultAccountRoleResolver),
            account_orderer: Box::new(DefaultAccountOrderer),
            header_compiler: Box::new(DefaultHeaderCompiler),
            instruction_compiler: Box::new(DefaultInstructionCompiler),
            lifetime_token_compiler: Box::new(DefaultLifetimeTokenCompiler),
        }
    }
}

impl MessageCompiler {
    pub fn with_role_resolver(mut self, role_resolver: impl AccountRoleResolver + 'static) -> Self {
        self.role_resolver = Box::new(role_resolver);
        self
    }

    pub fn with_account_orderer(mut self, account_orderer: impl AccountOrderer + 'static) -> Self {
        self.account_orderer = Box::new(account_orderer);
        self
    }

    pub fn with_header_compiler(mut self, header_compiler: impl HeaderCompiler + 'static) -> Self {
        self.header_compiler = Box::new(header_compiler);
        self
    }

    pub fn with_instruction_compiler(
        mut self,
        instruction_compiler: impl InstructionCompiler + 'static,
    ) -> Self {
        self.instruction_compiler = Box::new(instruction_compiler);
        self
    }

    pub fn with_lifetime_token_compiler(
        mut self,
        lifetime_token_compiler: impl LifetimeTokenCompiler + 'static,
    ) -> Self {
        self.lifetime_token_compiler = Box::new(lifetime_token_compiler);
        self
    }

    /// Compile a transaction into its canonical message.
    ///
    /// Fails with the first error any stage raises. No partial message is
    /// ever returned, and a failed compile must not be submitted.
    pub fn compile(&self, transaction: &Transaction) -> Result<CompiledMessage, CompileError> {
        let resolved = self.role_resolver.resolve(transaction);
        log::debug!(
            "Resolved {} accounts across {} instructions",
            resolved.len(),
            transaction.instructions.len()
        );

        let ordered_accounts = self.account_orderer.order(resolved)?;
        log::trace!(
            "Ordered accounts: {:?}",
            ordered_accounts
                .iter()
                .map(|account| account.address.to_string())
                .collect::<Vec<_>>()
        );

        let header = self.header_compiler.compile_header(&ordered_accounts)?;
        let instructions = self
            .instruction_compiler
            .compile_instructions(&transaction.instructions, &ordered_accounts)?;
        let lifetime_token = self
            .lifetime_token_compiler
            .compile_lifetime_token(&transaction.lifetime_constraint)?;

        log::debug!(
            "Compiled message: {} signers ({} readonly), {} readonly non-signers, {} \
             instructions",
            header.num_signer_accounts,
            header.num_readonly_signer_accounts,
            header.num_readonly_non_signer_accounts,
            instructions.len()
        );

        Ok(CompiledMessage {
            header,
            ordered_accounts: ordered_accounts
                .into_iter()
                .map(|account| account.address)
                .collect(),
            instructions,
            lifetime_token,
            version: transaction.version,
        })
    }
}

/// Compile a transaction with the canonical stages.
pub fn compile_message(transaction: &Transaction) -> Result<CompiledMessage, CompileError> {
    MessageCompiler::default().compile(transaction)
}
