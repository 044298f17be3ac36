//! Keel errors. Compilation is all-or-nothing: any of these aborts the
//! compile and no partial message is returned.

use {trezoa_pubkey::Pubkey, thiserror::Error};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// An instruction references an address missing from the compiled
    /// account list. Role resolution and ordering should make this
    /// unreachable, so seeing it means one of those stages is broken.
    #[error("Instruction references an address missing from the compiled account list: {0}")]
    UnresolvedAddress(Pubkey),
    /// The lifetime constraint cannot be encoded as a lifetime token.
    #[error("Invalid lifetime constraint: {0}")]
    InvalidLifetimeConstraint(String),
    /// Account index exceeds maximum (255), or the signer count does not fit
    /// in the message header.
    #[error("Account index exceeds maximum of 255: {0}")]
    AccountIndexOverflow(usize),
    /// No current nonce value is known for the durable nonce account.
    #[error("No current nonce value is known for nonce account: {0}")]
    NonceUnresolved(Pubkey),
}
