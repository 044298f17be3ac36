//! Lifetime token compilation.

use {crate::transaction::LifetimeConstraint, keel_error::error::CompileError, trezoa_hash::Hash};

/// Maps a lifetime constraint to the fixed-width token that bounds the
/// message's validity.
pub trait LifetimeTokenCompiler: Send + Sync {
    fn compile_lifetime_token(
        &self,
        lifetime_constraint: &LifetimeConstraint,
    ) -> Result<Hash, CompileError>;
}

pub struct DefaultLifetimeTokenCompiler;

impl LifetimeTokenCompiler for DefaultLifetimeTokenCompiler {
    fn compile_lifetime_token(
        &self,
        lifetime_constraint: &LifetimeConstraint,
    ) -> Result<Hash, CompileError> {
        get_compiled_lifetime_token(lifetime_constraint)
    }
}

pub fn get_compiled_lifetime_token(
    lifetime_constraint: &LifetimeConstraint,
) -> Result<Hash, CompileError> {
    match lifetime_constraint {
        LifetimeConstraint::Blockhash { blockhash, .. } => Ok(*blockhash),
        LifetimeConstraint::DurableNonce { nonce, .. } => Ok(*nonce),
        LifetimeConstraint::Unrecognized { kind } => Err(
            CompileError::InvalidLifetimeConstraint(format!("unrecognized kind `{kind}`")),
        ),
    }
}
