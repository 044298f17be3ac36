//! Compare system for comparing two compiled messages.

use crate::{
    config::{compare, Config},
    types::CompiledMessage,
};

/// Checks to run between two `CompiledMessage` instances.
///
/// Similar to `Check`, this allows a developer to dictate which parts of two
/// messages must agree. This is useful for comparing a freshly compiled
/// message against a stored expectation, where some parts (like a recent
/// blockhash) may legitimately differ between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Compare {
    /// Validate the header counts.
    Header,
    /// Validate the ordered account list.
    OrderedAccounts,
    /// Validate every compiled instruction.
    Instructions {
        /// Whether or not to validate each instruction's data.
        data: bool,
    },
    /// Validate the lifetime token.
    LifetimeToken,
    /// Validate the version.
    Version,
}

impl Compare {
    /// Validate every compiled instruction, including its data.
    pub const fn all_instructions() -> Self {
        Self::Instructions { data: true }
    }

    /// Validate everything but the lifetime token.
    pub fn everything_but_lifetime_token() -> Vec<Self> {
        vec![
            Self::Header,
            Self::OrderedAccounts,
            Self::all_instructions(),
            Self::Version,
        ]
    }

    /// Validate everything.
    pub fn everything() -> Vec<Self> {
        vec![
            Self::Header,
            Self::OrderedAccounts,
            Self::all_instructions(),
            Self::LifetimeToken,
            Self::Version,
        ]
    }
}

impl CompiledMessage {
    fn compare_instructions(&self, b: &Self, data: bool, config: &Config) -> bool {
        let c = config;
        let mut pass = true;
        pass &= compare!(
            c,
            "instructions_length",
            self.instructions.len(),
            b.instructions.len()
        );
        for (a, b) in self.instructions.iter().zip(b.instructions.iter()) {
            pass &= compare!(
                c,
                "instruction_program_address_index",
                a.program_address_index,
                b.program_address_index
            );
            pass &= compare!(
                c,
                "instruction_account_indices",
                a.account_indices,
                b.account_indices
            );
            if data {
                pass &= compare!(c, "instruction_data", a.data, b.data);
            }
        }
        pass
    }

    /// Compare a `CompiledMessage` against another `CompiledMessage`.
    pub fn compare_with_config(&self, b: &Self, checks: &[Compare], config: &Config) -> bool {
        let c = config;
        let mut pass = true;
        for check in checks {
            match check {
                Compare::Header => {
                    pass &= compare!(c, "header", self.header, b.header);
                }
                Compare::OrderedAccounts => {
                    pass &= compare!(
                        c,
                        "ordered_accounts",
                        self.ordered_accounts,
                        b.ordered_accounts
                    );
                }
                Compare::Instructions { data } => {
                    pass &= self.compare_instructions(b, *data, c);
                }
                Compare::LifetimeToken => {
                    pass &= compare!(c, "lifetime_token", self.lifetime_token, b.lifetime_token);
                }
                Compare::Version => {
                    pass &= compare!(c, "version", self.version, b.version);
                }
            }
        }
        pass
    }

    /// Compare a `CompiledMessage` against another `CompiledMessage`,
    /// panicking on any mismatches.
    pub fn compare(&self, b: &Self) {
        self.compare_with_config(
            b,
            &Compare::everything(),
            &Config {
                panic: true,
                verbose: true,
            },
        );
    }
}
