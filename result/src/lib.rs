//! Compiled message types, along with the check and compare systems used to
//! validate them.

pub mod check;
pub mod compare;
pub mod config;
pub mod types;

pub use {
    check::Check,
    compare::Compare,
    config::Config,
    types::{CompiledHeader, CompiledInstruction, CompiledMessage, TransactionVersion},
};
