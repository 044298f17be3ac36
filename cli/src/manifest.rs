//! Transaction manifests: the YAML or JSON files the CLI compiles.
//!
//! ```yaml
//! version: 0
//! feePayer: <base58>
//! lifetime:
//!   kind: blockhash
//!   blockhash: <base58>
//!   lastValidBlockHeight: 1000
//! instructions:
//!   - program: <base58>
//!     accounts:
//!       - address: <base58>
//!         role: writableSigner
//!     data:
//!       hex: "02000000"
//! expected: # optional, used by `keel verify`
//!   ...
//! ```

use {
    crate::output::RenderedMessage,
    keel::{
        result::TransactionVersion,
        transaction::{AccountReference, AccountRole, Instruction, LifetimeConstraint, Transaction},
    },
    serde::{Deserialize, Serialize},
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::{error::Error, fs, path::Path, str::FromStr},
};

pub(crate) fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, Box<dyn Error>> {
    Pubkey::from_str(value)
        .map_err(|err| format!("invalid address in `{field}`: {value} ({err})").into())
}

pub(crate) fn parse_hash(field: &str, value: &str) -> Result<Hash, Box<dyn Error>> {
    Hash::from_str(value)
        .map_err(|err| format!("invalid hash in `{field}`: {value} ({err})").into())
}

/// Wire form of a version: the string `legacy` or the number `0`.
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawVersion {
    Number(u8),
    Text(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawVersion", into = "RawVersion")]
pub enum ManifestVersion {
    Legacy,
    #[default]
    V0,
}

impl TryFrom<RawVersion> for ManifestVersion {
    type Error = String;

    fn try_from(raw: RawVersion) -> Result<Self, Self::Error> {
        match raw {
            RawVersion::Number(0) => Ok(Self::V0),
            RawVersion::Text(text) if text == "0" => Ok(Self::V0),
            RawVersion::Text(text) if text == "legacy" => Ok(Self::Legacy),
            RawVersion::Number(n) => Err(format!("unsupported version: {n}")),
            RawVersion::Text(text) => Err(format!("unsupported version: {text}")),
        }
    }
}

impl From<ManifestVersion> for RawVersion {
    fn from(version: ManifestVersion) -> Self {
        match version {
            ManifestVersion::Legacy => Self::Text("legacy".to_string()),
            ManifestVersion::V0 => Self::Number(0),
        }
    }
}

impl From<ManifestVersion> for TransactionVersion {
    fn from(version: ManifestVersion) -> Self {
        match version {
            ManifestVersion::Legacy => Self::Legacy,
            ManifestVersion::V0 => Self::V0,
        }
    }
}

impl From<TransactionVersion> for ManifestVersion {
    fn from(version: TransactionVersion) -> Self {
        match version {
            TransactionVersion::Legacy => Self::Legacy,
            TransactionVersion::V0 => Self::V0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ManifestRole {
    WritableSigner,
    ReadonlySigner,
    Writable,
    Readonly,
}

impl From<ManifestRole> for AccountRole {
    fn from(role: ManifestRole) -> Self {
        match role {
            ManifestRole::WritableSigner => Self::WritableSigner,
            ManifestRole::ReadonlySigner => Self::ReadonlySigner,
            ManifestRole::Writable => Self::Writable,
            ManifestRole::Readonly => Self::Readonly,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ManifestData {
    Hex(String),
    Base58(String),
}

impl ManifestData {
    pub fn decode(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        match self {
            Self::Hex(text) => Ok(hex::decode(text)?),
            Self::Base58(text) => Ok(bs58::decode(text).into_vec()?),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestAccount {
    pub address: String,
    pub role: ManifestRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestInstruction {
    pub program: String,
    #[serde(default)]
    pub accounts: Vec<ManifestAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ManifestData>,
}

impl ManifestInstruction {
    fn to_instruction(&self) -> Result<Instruction, Box<dyn Error>> {
        let accounts = self
            .accounts
            .iter()
            .map(|account| {
                Ok(AccountReference::new(
                    parse_pubkey("accounts.address", &account.address)?,
                    account.role.into(),
                ))
            })
            .collect::<Result<Vec<_>, Box<dyn Error>>>()?;
        let data = match &self.data {
            Some(data) => data.decode()?,
            None => Vec::new(),
        };
        Ok(Instruction::new(
            parse_pubkey("program", &self.program)?,
            accounts,
            data,
        ))
    }
}

/// A lifetime constraint as written in a manifest. Which fields are required
/// depends on `kind`; unknown kinds are kept so compilation can reject them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestLifetime {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_valid_block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, Box<dyn Error>> {
    value
        .as_deref()
        .ok_or_else(|| format!("missing lifetime field `{field}`").into())
}

impl ManifestLifetime {
    /// Decode the constraint. A durable nonce without a pinned `nonce` value
    /// carries the default hash until it is resolved.
    pub fn to_lifetime_constraint(&self) -> Result<LifetimeConstraint, Box<dyn Error>> {
        match self.kind.as_str() {
            "blockhash" => Ok(LifetimeConstraint::Blockhash {
                blockhash: parse_hash("blockhash", required("blockhash", &self.blockhash)?)?,
                last_valid_block_height: self.last_valid_block_height.unwrap_or_default(),
            }),
            "durableNonce" => Ok(LifetimeConstraint::DurableNonce {
                nonce_account_address: parse_pubkey(
                    "nonceAccount",
                    required("nonceAccount", &self.nonce_account)?,
                )?,
                nonce_authority_address: parse_pubkey(
                    "nonceAuthority",
                    required("nonceAuthority", &self.nonce_authority)?,
                )?,
                nonce: match &self.nonce {
                    Some(nonce) => parse_hash("nonce", nonce)?,
                    None => Hash::default(),
                },
            }),
            other => Ok(LifetimeConstraint::Unrecognized {
                kind: other.to_string(),
            }),
        }
    }

    /// The nonce account and value, when the manifest pins a durable nonce.
    pub fn pinned_nonce(&self) -> Result<Option<(Pubkey, Hash)>, Box<dyn Error>> {
        if self.kind != "durableNonce" {
            return Ok(None);
        }
        match &self.nonce {
            Some(nonce) => Ok(Some((
                parse_pubkey("nonceAccount", required("nonceAccount", &self.nonce_account)?)?,
                parse_hash("nonce", nonce)?,
            ))),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub version: ManifestVersion,
    pub fee_payer: String,
    pub lifetime: ManifestLifetime,
    #[serde(default)]
    pub instructions: Vec<ManifestInstruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<RenderedMessage>,
}

impl Manifest {
    /// Load a manifest, choosing JSON or YAML by file extension.
    pub fn try_load(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|ext| ext == "json");
        let manifest = if is_json {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(manifest)
    }

    pub fn to_transaction(&self) -> Result<Transaction, Box<dyn Error>> {
        let instructions = self
            .instructions
            .iter()
            .map(ManifestInstruction::to_instruction)
            .collect::<Result<Vec<_>, _>>()?;
        let transaction = Transaction::new(
            self.version.into(),
            parse_pubkey("feePayer", &self.fee_payer)?,
            self.lifetime.to_lifetime_constraint()?,
        )
        .append_instructions(instructions);

        // Durable nonce transactions must open with the advance-nonce
        // instruction, whether or not the manifest lists it.
        Ok(match transaction.lifetime_constraint.clone() {
            LifetimeConstraint::DurableNonce {
                nonce_account_address,
                nonce_authority_address,
                nonce,
            } => transaction.with_durable_nonce_lifetime(
                nonce_account_address,
                nonce_authority_address,
                nonce,
            ),
            _ => transaction,
        })
    }
}
