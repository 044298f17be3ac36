use {
    keel::{
        compile_message,
        nonce::{is_advance_nonce_account_instruction, resolve_durable_nonce},
        result::{Check, CompiledHeader, Config, TransactionVersion},
        transaction::{AccountReference, AccountRole, Instruction, LifetimeConstraint, Transaction},
        CompileError,
    },
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::collections::HashMap,
};

#[test]
fn test_durable_nonce_transaction() {
    let payer = Pubkey::new_unique();
    let nonce_account = Pubkey::new_unique();
    let nonce_authority = Pubkey::new_unique();
    let recipient = Pubkey::new_unique();
    let current_nonce = Hash::new_from_array([0x4e; 32]);

    let system_program = trezoa_sdk_ids::system_program::id();
    let recent_blockhashes = trezoa_sdk_ids::sysvar::recent_blockhashes::id();

    let transaction = Transaction::new(
        TransactionVersion::V0,
        payer,
        LifetimeConstraint::Blockhash {
            blockhash: Hash::default(),
            last_valid_block_height: 0,
        },
    )
    .append_instruction(Instruction::new(
        system_program,
        vec![
            AccountReference::new(payer, AccountRole::WritableSigner),
            AccountReference::new(recipient, AccountRole::Writable),
        ],
        vec![2, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0],
    ))
    .with_durable_nonce_lifetime(nonce_account, nonce_authority, Hash::default());

    assert_eq!(transaction.instructions.len(), 2);
    assert!(is_advance_nonce_account_instruction(
        &transaction.instructions[0]
    ));

    let nonces = HashMap::from([(nonce_account, current_nonce)]);
    let transaction = resolve_durable_nonce(&transaction, &nonces).unwrap();
    let message = compile_message(&transaction).unwrap();

    message.run_checks(
        &[
            Check::ordered_accounts(&[
                payer,
                nonce_authority,
                nonce_account,
                recipient,
                recent_blockhashes,
                system_program,
            ]),
            Check::header(CompiledHeader {
                num_signer_accounts: 2,
                num_readonly_signer_accounts: 1,
                num_readonly_non_signer_accounts: 2,
            }),
            Check::instruction(0)
                .program_address_index(5)
                .account_indices(&[2, 4, 1])
                .data(&[4, 0, 0, 0])
                .build(),
            Check::instruction(1)
                .program_address_index(5)
                .account_indices(&[0, 3])
                .build(),
            Check::lifetime_token(&current_nonce),
            Check::well_formed(),
        ],
        &Config::default(),
    );
}

#[test]
fn test_unresolved_nonce() {
    let nonce_account = Pubkey::new_unique();
    let transaction = Transaction::new(
        TransactionVersion::V0,
        Pubkey::new_unique(),
        LifetimeConstraint::Blockhash {
            blockhash: Hash::default(),
            last_valid_block_height: 0,
        },
    )
    .with_durable_nonce_lifetime(nonce_account, Pubkey::new_unique(), Hash::default());

    assert_eq!(
        resolve_durable_nonce(&transaction, &HashMap::<Pubkey, Hash>::new()),
        Err(CompileError::NonceUnresolved(nonce_account))
    );
}
