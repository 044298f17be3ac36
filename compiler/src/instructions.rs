//! Instruction compilation: rewriting addresses as account list indices.

use {
    crate::{ordering::OrderedAccount, transaction::Instruction},
    keel_error::error::CompileError,
    keel_result::CompiledInstruction,
    trezoa_pubkey::Pubkey,
    std::collections::HashMap,
};

/// Rewrites each instruction's addresses as indices into the ordered
/// account list, preserving instruction order.
pub trait InstructionCompiler: Send + Sync {
    fn compile_instructions(
        &self,
        instructions: &[Instruction],
        ordered_accounts: &[OrderedAccount],
    ) -> Result<Vec<CompiledInstruction>, CompileError>;
}

pub struct DefaultInstructionCompiler;

impl InstructionCompiler for DefaultInstructionCompiler {
    fn compile_instructions(
        &self,
        instructions: &[Instruction],
        ordered_accounts: &[OrderedAccount],
    ) -> Result<Vec<CompiledInstruction>, CompileError> {
        get_compiled_instructions(instructions, ordered_accounts)
    }
}

struct AccountIndexMap(HashMap<Pubkey, u8>);

impl AccountIndexMap {
    fn new(ordered_accounts: &[OrderedAccount]) -> Result<Self, CompileError> {
        ordered_accounts
            .iter()
            .map(|account| {
                u8::try_from(account.index)
                    .map(|index| (account.address, index))
                    .map_err(|_| CompileError::AccountIndexOverflow(account.index))
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    fn position(&self, address: &Pubkey) -> Result<u8, CompileError> {
        self.0
            .get(address)
            .copied()
            .ok_or(CompileError::UnresolvedAddress(*address))
    }
}

pub fn get_compiled_instructions(
    instructions: &[Instruction],
    ordered_accounts: &[OrderedAccount],
) -> Result<Vec<CompiledInstruction>, CompileError> {
    let index_map = AccountIndexMap::new(ordered_accounts)?;

    instructions
        .iter()
        .map(|instruction| {
            Ok(CompiledInstruction {
                program_address_index: index_map.position(&instruction.program_address)?,
                account_indices: instruction
                    .accounts
                    .iter()
                    .map(|account| index_map.position(&account.address))
                    .collect::<Result<_, _>>()?,
                data: instruction.data.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::transaction::{AccountReference, AccountRole},
    };

    fn ordered(addresses: &[Pubkey]) -> Vec<OrderedAccount> {
        addresses
            .iter()
            .enumerate()
            .map(|(index, address)| OrderedAccount {
                address: *address,
                role: AccountRole::Readonly,
                index,
            })
            .collect()
    }

    #[test]
    fn test_compile_with_dups() {
        let program = Pubkey::new_unique();
        let key0 = Pubkey::new_unique();
        let key1 = Pubkey::new_unique();
        let ordered_accounts = ordered(&[key0, key1, program]);

        let compiled = get_compiled_instructions(
            &[
                Instruction::new(
                    program,
                    vec![
                        AccountReference::new(key1, AccountRole::Writable),
                        AccountReference::new(key0, AccountRole::Readonly),
                        AccountReference::new(key1, AccountRole::Writable),
                    ],
                    vec![9, 8, 7],
                ),
                Instruction::new(program, vec![], vec![]),
            ],
            &ordered_accounts,
        )
        .unwrap();

        assert_eq!(
            compiled,
            vec![
                CompiledInstruction {
                    program_address_index: 2,
                    account_indices: vec![1, 0, 1],
                    data: vec![9, 8, 7],
                },
                CompiledInstruction {
                    program_address_index: 2,
                    account_indices: vec![],
                    data: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_unresolved_account() {
        let program = Pubkey::new_unique();
        let missing = Pubkey::new_unique();

        let result = get_compiled_instructions(
            &[Instruction::new(
                program,
                vec![AccountReference::new(missing, AccountRole::Writable)],
                vec![],
            )],
            &ordered(&[program]),
        );
        assert_eq!(result, Err(CompileError::UnresolvedAddress(missing)));
    }

    #[test]
    fn test_unresolved_program() {
        let program = Pubkey::new_unique();
        let key = Pubkey::new_unique();

        let result = get_compiled_instructions(
            &[Instruction::new(
                program,
                vec![AccountReference::new(key, AccountRole::Writable)],
                vec![],
            )],
            &ordered(&[key]),
        );
        assert_eq!(result, Err(CompileError::UnresolvedAddress(program)));
    }
}
