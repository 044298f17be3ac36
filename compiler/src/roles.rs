//! Account role resolution.
//!
//! Every address a transaction touches (the fee payer, each instruction's
//! accounts, and each invoked program) is collected once, with the
//! strictest role any reference asks of it. Resolution also records the
//! order in which addresses first appear, which is the tie-break used when
//! ordering accounts within a role bucket.

use {
    crate::transaction::{AccountRole, Transaction},
    trezoa_pubkey::Pubkey,
    std::collections::HashMap,
};

/// An address with its merged role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub address: Pubkey,
    pub role: AccountRole,
    /// Position in first-appearance order. `None` for the fee payer, which
    /// is placed ahead of everything else.
    pub first_appearance: Option<usize>,
}

impl ResolvedAccount {
    pub const fn is_fee_payer(&self) -> bool {
        self.first_appearance.is_none()
    }
}

/// The merged role of every address referenced by a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAccounts {
    accounts: Vec<ResolvedAccount>,
    positions: HashMap<Pubkey, usize>,
    next_appearance: usize,
}

impl ResolvedAccounts {
    /// Start a resolution containing only the fee payer, which is always a
    /// writable signer.
    pub fn new(fee_payer: Pubkey) -> Self {
        Self {
            accounts: vec![ResolvedAccount {
                address: fee_payer,
                role: AccountRole::WritableSigner,
                first_appearance: None,
            }],
            positions: HashMap::from([(fee_payer, 0)]),
            next_appearance: 0,
        }
    }

    /// Record a reference to an address. A new address is ranked after every
    /// address recorded so far; a known address keeps its rank and has its
    /// role merged.
    pub fn record(&mut self, address: Pubkey, role: AccountRole) {
        match self.positions.get(&address) {
            Some(&position) => {
                let account = &mut self.accounts[position];
                account.role = account.role.merge(role);
            }
            None => {
                self.positions.insert(address, self.accounts.len());
                self.accounts.push(ResolvedAccount {
                    address,
                    role,
                    first_appearance: Some(self.next_appearance),
                });
                self.next_appearance += 1;
            }
        }
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.accounts[0].address
    }

    pub fn role(&self, address: &Pubkey) -> Option<AccountRole> {
        self.positions
            .get(address)
            .map(|&position| self.accounts[position].role)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts in the order they were first recorded, fee payer first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAccount> {
        self.accounts.iter()
    }

    pub fn into_accounts(self) -> Vec<ResolvedAccount> {
        self.accounts
    }
}

/// Resolves the merged role of every address a transaction references.
pub trait AccountRoleResolver: Send + Sync {
    fn resolve(&self, transaction: &Transaction) -> ResolvedAccounts;
}

/// Account references are scanned first, instruction by instruction, then
/// program addresses. A program address nobody else references is therefore
/// a readonly non-signer ranked after every account reference.
pub struct DefaultAccountRoleResolver;

impl AccountRoleResolver for DefaultAccountRoleResolver {
    fn resolve(&self, transaction: &Transaction) -> ResolvedAccounts {
        resolve_account_roles(transaction)
    }
}

pub fn resolve_account_roles(transaction: &Transaction) -> ResolvedAccounts {
    let mut resolved = ResolvedAccounts::new(transaction.fee_payer);

    for instruction in &transaction.instructions {
        for account in &instruction.accounts {
            resolved.record(account.address, account.role);
        }
    }
    for instruction in &transaction.instructions {
        resolved.record(instruction.program_address, AccountRole::Readonly);
    }

    resolved
}
