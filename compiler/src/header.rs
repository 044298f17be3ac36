//! Message header compilation.

use {
    crate::{ordering::OrderedAccount, transaction::AccountRole},
    keel_error::error::CompileError,
    keel_result::CompiledHeader,
};

/// Derives the header counts from the ordered account list.
pub trait HeaderCompiler: Send + Sync {
    fn compile_header(
        &self,
        ordered_accounts: &[OrderedAccount],
    ) -> Result<CompiledHeader, CompileError>;
}

pub struct DefaultHeaderCompiler;

impl HeaderCompiler for DefaultHeaderCompiler {
    fn compile_header(
        &self,
        ordered_accounts: &[OrderedAccount],
    ) -> Result<CompiledHeader, CompileError> {
        get_compiled_message_header(ordered_accounts)
    }
}

fn header_count(count: usize) -> Result<u8, CompileError> {
    u8::try_from(count).map_err(|_| CompileError::AccountIndexOverflow(count))
}

/// Count signers, readonly signers and readonly non-signers.
///
/// The ordered list may come from a substitute `AccountOrderer`, so counts
/// that do not fit the header fail with `AccountIndexOverflow` here too.
pub fn get_compiled_message_header(
    ordered_accounts: &[OrderedAccount],
) -> Result<CompiledHeader, CompileError> {
    let (mut num_signers, mut num_readonly_signers, mut num_readonly_non_signers) = (0, 0, 0);
    for account in ordered_accounts {
        match account.role {
            AccountRole::WritableSigner => num_signers += 1,
            AccountRole::ReadonlySigner => {
                num_signers += 1;
                num_readonly_signers += 1;
            }
            AccountRole::Readonly => num_readonly_non_signers += 1,
            AccountRole::Writable => {}
        }
    }
    Ok(CompiledHeader {
        num_signer_accounts: header_count(num_signers)?,
        num_readonly_signer_accounts: header_count(num_readonly_signers)?,
        num_readonly_non_signer_accounts: header_count(num_readonly_non_signers)?,
    })
}
