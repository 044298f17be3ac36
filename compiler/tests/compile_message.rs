use {
    keel::{
        compile_message,
        result::{Check, CompiledHeader, Config, TransactionVersion},
        transaction::{AccountReference, AccountRole, Instruction, LifetimeConstraint, Transaction},
        CompileError,
    },
    trezoa_hash::Hash,
    trezoa_instruction::AccountMeta,
    trezoa_pubkey::Pubkey,
};

fn blockhash_lifetime(blockhash: Hash) -> LifetimeConstraint {
    LifetimeConstraint::Blockhash {
        blockhash,
        last_valid_block_height: 1_000,
    }
}

#[test]
fn test_fee_payer_only() {
    let payer = Pubkey::new_unique();
    let blockhash = Hash::new_from_array([1; 32]);

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(blockhash),
    );
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::header(CompiledHeader {
                num_signer_accounts: 1,
                num_readonly_signer_accounts: 0,
                num_readonly_non_signer_accounts: 0,
            }),
            Check::ordered_accounts(&[payer]),
            Check::instruction_count(0),
            Check::lifetime_token(&blockhash),
            Check::version(TransactionVersion::V0),
            Check::well_formed(),
        ],
        &Config::default(),
    );
}

#[test]
fn test_single_instruction() {
    let payer = Pubkey::new_unique();
    let program = Pubkey::new_unique();
    let x = Pubkey::new_unique();
    let y = Pubkey::new_unique();

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::new_from_array([2; 32])),
    )
    .append_instruction(Instruction::new(
        program,
        vec![
            AccountReference::new(x, AccountRole::Writable),
            AccountReference::new(y, AccountRole::ReadonlySigner),
        ],
        vec![0xde, 0xad],
    ));
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::ordered_accounts(&[payer, y, x, program]),
            Check::header(CompiledHeader {
                num_signer_accounts: 2,
                num_readonly_signer_accounts: 1,
                num_readonly_non_signer_accounts: 1,
            }),
            Check::instruction_count(1),
            Check::instruction(0)
                .program_address_index(3)
                .account_indices(&[2, 1])
                .data(&[0xde, 0xad])
                .build(),
            Check::well_formed(),
        ],
        &Config::default(),
    );
}

#[test]
fn test_lifetime_tokens() {
    let payer = Pubkey::new_unique();
    let blockhash = Hash::new_from_array([0x48; 32]);

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(blockhash),
    );
    assert_eq!(
        compile_message(&transaction).unwrap().lifetime_token,
        blockhash
    );

    let transaction = Transaction {
        lifetime_constraint: LifetimeConstraint::Unrecognized {
            kind: "slot".to_string(),
        },
        ..transaction
    };
    assert!(matches!(
        compile_message(&transaction),
        Err(CompileError::InvalidLifetimeConstraint(_))
    ));
}

#[test]
fn test_strictest_role_wins_once() {
    let payer = Pubkey::new_unique();
    let program_a = Pubkey::new_unique();
    let program_b = Pubkey::new_unique();
    let shared = Pubkey::new_unique();

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::default()),
    )
    .append_instructions([
        Instruction::new(
            program_a,
            vec![AccountReference::new(shared, AccountRole::Readonly)],
            vec![],
        ),
        Instruction::new(
            program_b,
            vec![AccountReference::new(shared, AccountRole::ReadonlySigner)],
            vec![],
        ),
    ]);
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::ordered_accounts(&[payer, shared, program_a, program_b]),
            Check::header(CompiledHeader {
                num_signer_accounts: 2,
                num_readonly_signer_accounts: 1,
                num_readonly_non_signer_accounts: 2,
            }),
            Check::instruction(0)
                .program_address_index(2)
                .account_indices(&[1])
                .build(),
            Check::instruction(1)
                .program_address_index(3)
                .account_indices(&[1])
                .build(),
            Check::well_formed(),
        ],
        &Config::default(),
    );
}

#[test]
fn test_fee_payer_referenced_by_instruction() {
    let payer = Pubkey::new_unique();
    let program = Pubkey::new_unique();
    let other_signer = Pubkey::new_unique();

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::default()),
    )
    .append_instruction(Instruction::new(
        program,
        vec![
            AccountReference::new(other_signer, AccountRole::WritableSigner),
            AccountReference::new(payer, AccountRole::Readonly),
        ],
        vec![],
    ));
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::fee_payer(&payer),
            Check::ordered_accounts(&[payer, other_signer, program]),
            Check::instruction(0)
                .program_address_index(2)
                .account_indices(&[1, 0])
                .build(),
            Check::well_formed(),
        ],
        &Config::default(),
    );
    assert!(message.is_writable(0));
    assert_eq!(message.signer_addresses(), &[payer, other_signer]);
}

#[test]
fn test_programs_follow_account_references() {
    let payer = Pubkey::new_unique();
    let program_a = Pubkey::new_unique();
    let program_b = Pubkey::new_unique();
    let readonly_a = Pubkey::new_unique();
    let readonly_b = Pubkey::new_unique();

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::default()),
    )
    .append_instructions([
        Instruction::new(
            program_a,
            vec![AccountReference::new(readonly_a, AccountRole::Readonly)],
            vec![],
        ),
        Instruction::new(
            program_b,
            vec![AccountReference::new(readonly_b, AccountRole::Readonly)],
            vec![],
        ),
    ]);
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::ordered_accounts(&[payer, readonly_a, readonly_b, program_a, program_b]),
            Check::well_formed(),
        ],
        &Config::default(),
    );
    assert_eq!(
        message.program_addresses().collect::<Vec<_>>(),
        vec![&program_a, &program_b]
    );
}

#[test]
fn test_from_trezoa_instructions() {
    let payer = Pubkey::new_unique();
    let program = Pubkey::new_unique();
    let source = Pubkey::new_unique();
    let destination = Pubkey::new_unique();

    let instruction = trezoa_instruction::Instruction::new_with_bytes(
        program,
        &[2, 0, 0, 0],
        vec![
            AccountMeta::new(source, true),
            AccountMeta::new(destination, false),
        ],
    );
    let transaction = Transaction::new(
        TransactionVersion::Legacy,
        payer,
        blockhash_lifetime(Hash::default()),
    )
    .append_instruction(&instruction);
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::ordered_accounts(&[payer, source, destination, program]),
            Check::header(CompiledHeader {
                num_signer_accounts: 2,
                num_readonly_signer_accounts: 0,
                num_readonly_non_signer_accounts: 1,
            }),
            Check::instruction(0)
                .program_address_index(3)
                .account_indices(&[1, 2])
                .data(&[2, 0, 0, 0])
                .build(),
            Check::version(TransactionVersion::Legacy),
        ],
        &Config::default(),
    );
}

#[test]
fn test_does_not_mutate_input() {
    let payer = Pubkey::new_unique();
    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::default()),
    )
    .append_instruction(Instruction::new(
        Pubkey::new_unique(),
        vec![AccountReference::new(
            Pubkey::new_unique(),
            AccountRole::WritableSigner,
        )],
        vec![1, 2, 3],
    ));
    let snapshot = transaction.clone();

    compile_message(&transaction).unwrap();
    assert_eq!(transaction, snapshot);
}

#[test]
fn test_failed_check_reports_without_panicking() {
    let payer = Pubkey::new_unique();
    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        blockhash_lifetime(Hash::default()),
    );
    let message = compile_message(&transaction).unwrap();

    let config = Config {
        panic: false,
        verbose: false,
    };
    assert!(!message.run_checks(&[Check::fee_payer(&Pubkey::new_unique())], &config));
    assert!(!message.run_checks(&[Check::instruction(0).build()], &config));
    assert!(message.run_checks(&[Check::fee_payer(&payer)], &config));
}
