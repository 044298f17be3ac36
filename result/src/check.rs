//! Check system for validating individual compiled messages.

use {
    crate::{
        config::{compare, throw, Config},
        types::{CompiledHeader, CompiledMessage, TransactionVersion},
    },
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::collections::HashSet,
};

enum CheckType<'a> {
    /// Check the message header.
    Header(CompiledHeader),
    /// Check the full ordered account list.
    OrderedAccounts(&'a [Pubkey]),
    /// Check the account at index 0.
    FeePayer(Pubkey),
    /// Check the lifetime token.
    LifetimeToken(Hash),
    /// Check the message version.
    Version(TransactionVersion),
    /// Check the number of compiled instructions.
    InstructionCount(usize),
    /// Check a single compiled instruction.
    Instruction(InstructionCheck<'a>),
    /// Check the structural invariants every compiled message must hold.
    WellFormed,
}

pub struct Check<'a> {
    check: CheckType<'a>,
}

impl<'a> Check<'a> {
    const fn new(check: CheckType<'a>) -> Self {
        Self { check }
    }

    /// Check the message header.
    pub const fn header(header: CompiledHeader) -> Self {
        Check::new(CheckType::Header(header))
    }

    /// Check the full ordered account list.
    pub const fn ordered_accounts(accounts: &'a [Pubkey]) -> Self {
        Check::new(CheckType::OrderedAccounts(accounts))
    }

    /// Check the fee payer, which always sits at index 0.
    pub const fn fee_payer(fee_payer: &Pubkey) -> Self {
        Check::new(CheckType::FeePayer(*fee_payer))
    }

    /// Check the lifetime token.
    pub const fn lifetime_token(token: &Hash) -> Self {
        Check::new(CheckType::LifetimeToken(*token))
    }

    /// Check the message version.
    pub const fn version(version: TransactionVersion) -> Self {
        Check::new(CheckType::Version(version))
    }

    /// Check the number of compiled instructions.
    pub const fn instruction_count(count: usize) -> Self {
        Check::new(CheckType::InstructionCount(count))
    }

    /// Check the compiled instruction at the given position.
    pub const fn instruction(index: usize) -> InstructionCheckBuilder<'a> {
        InstructionCheckBuilder::new(index)
    }

    /// Check that the header agrees with the account list, every index is in
    /// range, and no address appears twice.
    pub const fn well_formed() -> Self {
        Check::new(CheckType::WellFormed)
    }
}

struct InstructionCheck<'a> {
    index: usize,
    check_program_address_index: Option<u8>,
    check_account_indices: Option<&'a [u8]>,
    check_data: Option<&'a [u8]>,
}

pub struct InstructionCheckBuilder<'a> {
    check: InstructionCheck<'a>,
}

impl<'a> InstructionCheckBuilder<'a> {
    const fn new(index: usize) -> Self {
        Self {
            check: InstructionCheck {
                index,
                check_program_address_index: None,
                check_account_indices: None,
                check_data: None,
            },
        }
    }

    pub const fn program_address_index(mut self, index: u8) -> Self {
        self.check.check_program_address_index = Some(index);
        self
    }

    pub const fn account_indices(mut self, indices: &'a [u8]) -> Self {
        self.check.check_account_indices = Some(indices);
        self
    }

    pub const fn data(mut self, data: &'a [u8]) -> Self {
        self.check.check_data = Some(data);
        self
    }

    pub const fn build(self) -> Check<'a> {
        Check::new(CheckType::Instruction(self.check))
    }
}

fn check_well_formed(message: &CompiledMessage, config: &Config) -> bool {
    let c = config;
    let mut pass = true;

    let header = &message.header;
    let num_accounts = message.ordered_accounts.len();
    let num_signers = header.num_signer_accounts as usize;
    let num_readonly_signers = header.num_readonly_signer_accounts as usize;
    let num_readonly_non_signers = header.num_readonly_non_signer_accounts as usize;

    if num_signers == 0 {
        pass &= throw!(c, "Message has no signers; the fee payer must sign");
    }
    if num_readonly_signers >= num_signers && num_signers > 0 {
        pass &= throw!(
            c,
            "Readonly signer count {} leaves no writable fee payer among {} signers",
            num_readonly_signers,
            num_signers,
        );
    }
    if num_signers + num_readonly_non_signers > num_accounts {
        pass &= throw!(
            c,
            "Header counts {} signers and {} readonly non-signers, but the message has {} \
             accounts",
            num_signers,
            num_readonly_non_signers,
            num_accounts,
        );
    }

    let mut seen = HashSet::with_capacity(num_accounts);
    for address in &message.ordered_accounts {
        if !seen.insert(address) {
            pass &= throw!(c, "Address appears more than once: {}", address);
        }
    }

    for (position, instruction) in message.instructions.iter().enumerate() {
        let program_index = instruction.program_address_index as usize;
        if program_index >= num_accounts {
            pass &= throw!(
                c,
                "Instruction {} program address index {} out of range ({} accounts)",
                position,
                program_index,
                num_accounts,
            );
        }
        for account_index in &instruction.account_indices {
            if *account_index as usize >= num_accounts {
                pass &= throw!(
                    c,
                    "Instruction {} account index {} out of range ({} accounts)",
                    position,
                    account_index,
                    num_accounts,
                );
            }
        }
    }

    pass
}

impl CompiledMessage {
    /// Perform checks on the compiled message.
    pub fn run_checks(&self, checks: &[Check], config: &Config) -> bool {
        let c = config;
        let mut pass = true;
        for check in checks {
            match &check.check {
                CheckType::Header(check_header) => {
                    pass &= compare!(c, "header", *check_header, self.header);
                }
                CheckType::OrderedAccounts(check_accounts) => {
                    pass &= compare!(
                        c,
                        "ordered_accounts",
                        *check_accounts,
                        self.ordered_accounts.as_slice(),
                    );
                }
                CheckType::FeePayer(check_fee_payer) => {
                    pass &= compare!(c, "fee_payer", Some(check_fee_payer), self.fee_payer());
                }
                CheckType::LifetimeToken(check_token) => {
                    pass &= compare!(c, "lifetime_token", *check_token, self.lifetime_token);
                }
                CheckType::Version(check_version) => {
                    pass &= compare!(c, "version", *check_version, self.version);
                }
                CheckType::InstructionCount(check_count) => {
                    pass &= compare!(
                        c,
                        "instruction_count",
                        *check_count,
                        self.instructions.len()
                    );
                }
                CheckType::Instruction(instruction) => {
                    let Some(compiled) = self.instructions.get(instruction.index) else {
                        pass &= throw!(
                            c,
                            "Instruction {} not found; the message has {} instructions",
                            instruction.index,
                            self.instructions.len(),
                        );
                        continue;
                    };
                    if let Some(check_index) = instruction.check_program_address_index {
                        pass &= compare!(
                            c,
                            "instruction_program_address_index",
                            check_index,
                            compiled.program_address_index,
                        );
                    }
                    if let Some(check_indices) = instruction.check_account_indices {
                        pass &= compare!(
                            c,
                            "instruction_account_indices",
                            check_indices,
                            compiled.account_indices.as_slice(),
                        );
                    }
                    if let Some(check_data) = instruction.check_data {
                        pass &= compare!(
                            c,
                            "instruction_data",
                            check_data,
                            compiled.data.as_slice()
                        );
                    }
                }
                CheckType::WellFormed => {
                    pass &= check_well_formed(self, c);
                }
            }
        }
        pass
    }
}
