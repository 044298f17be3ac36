//! CLI configuration file.

use {
    crate::{
        manifest::{parse_hash, parse_pubkey},
        output::OutputFormat,
    },
    keel::result::Compare,
    serde::Deserialize,
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::{collections::HashMap, error::Error, fs::File},
};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    /// Comparisons `keel verify` runs against each manifest's expectation.
    #[serde(default = "Compare::everything")]
    pub checks: Vec<Compare>,
    /// Current nonce values, keyed by nonce account. Both base58.
    #[serde(default)]
    pub nonces: HashMap<String, String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl ConfigFile {
    pub fn try_load(path: &str) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let config: ConfigFile = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Decode `nonces` into a map usable as a nonce resolver.
    pub fn nonce_values(&self) -> Result<HashMap<Pubkey, Hash>, Box<dyn Error>> {
        self.nonces
            .iter()
            .map(|(account, nonce)| {
                Ok((
                    parse_pubkey("nonces", account)?,
                    parse_hash("nonces", nonce)?,
                ))
            })
            .collect()
    }
}
