//! Human-readable rendering of compiled messages.

use {
    crate::manifest::{parse_hash, parse_pubkey, ManifestVersion},
    clap::ValueEnum,
    keel::result::{CompiledHeader, CompiledInstruction, CompiledMessage},
    serde::{Deserialize, Serialize},
    std::error::Error,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn render(&self, message: &RenderedMessage) -> Result<String, Box<dyn Error>> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(message)?,
            Self::Yaml => serde_yaml::to_string(message)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedInstruction {
    pub program_address_index: u8,
    #[serde(default)]
    pub account_indices: Vec<u8>,
    /// Hex-encoded.
    #[serde(default)]
    pub data: String,
}

/// A compiled message with base58 addresses and token, and hex instruction
/// data.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub version: ManifestVersion,
    pub header: CompiledHeader,
    pub ordered_accounts: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<RenderedInstruction>,
    pub lifetime_token: String,
}

impl From<&CompiledMessage> for RenderedMessage {
    fn from(message: &CompiledMessage) -> Self {
        Self {
            version: message.version.into(),
            header: message.header,
            ordered_accounts: message
                .ordered_accounts
                .iter()
                .map(ToString::to_string)
                .collect(),
            instructions: message
                .instructions
                .iter()
                .map(|instruction| RenderedInstruction {
                    program_address_index: instruction.program_address_index,
                    account_indices: instruction.account_indices.clone(),
                    data: hex::encode(&instruction.data),
                })
                .collect(),
            lifetime_token: message.lifetime_token.to_string(),
        }
    }
}

impl TryFrom<&RenderedMessage> for CompiledMessage {
    type Error = Box<dyn Error>;

    fn try_from(rendered: &RenderedMessage) -> Result<Self, Self::Error> {
        let ordered_accounts = rendered
            .ordered_accounts
            .iter()
            .map(|address| parse_pubkey("orderedAccounts", address))
            .collect::<Result<Vec<_>, _>>()?;
        let instructions = rendered
            .instructions
            .iter()
            .map(|instruction| {
                Ok(CompiledInstruction {
                    program_address_index: instruction.program_address_index,
                    account_indices: instruction.account_indices.clone(),
                    data: hex::decode(&instruction.data)?,
                })
            })
            .collect::<Result<Vec<_>, Box<dyn Error>>>()?;
        Ok(Self {
            header: rendered.header,
            ordered_accounts,
            instructions,
            lifetime_token: parse_hash("lifetimeToken", &rendered.lifetime_token)?,
            version: rendered.version.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        keel::result::TransactionVersion,
        trezoa_hash::Hash,
        trezoa_pubkey::Pubkey,
    };

    fn message() -> CompiledMessage {
        CompiledMessage {
            header: CompiledHeader {
                num_signer_accounts: 1,
                num_readonly_signer_accounts: 0,
                num_readonly_non_signer_accounts: 1,
            },
            ordered_accounts: vec![Pubkey::new_unique(), Pubkey::new_unique()],
            instructions: vec![CompiledInstruction {
                program_address_index: 1,
                account_indices: vec![0],
                data: vec![0xca, 0xfe],
            }],
            lifetime_token: Hash::new_from_array([5; 32]),
            version: TransactionVersion::Legacy,
        }
    }

    #[test]
    fn test_render() {
        let message = message();
        let rendered = RenderedMessage::from(&message);

        assert_eq!(rendered.version, ManifestVersion::Legacy);
        assert_eq!(rendered.ordered_accounts[0], message.ordered_accounts[0].to_string());
        assert_eq!(rendered.instructions[0].data, "cafe");
        assert_eq!(rendered.lifetime_token, message.lifetime_token.to_string());

        assert_eq!(CompiledMessage::try_from(&rendered).unwrap(), message);
    }

    #[test]
    fn test_render_formats() {
        let rendered = RenderedMessage::from(&message());

        let json = OutputFormat::Json.render(&rendered).unwrap();
        assert!(json.contains("\"numSignerAccounts\": 1"));
        assert!(json.contains("\"version\": \"legacy\""));
        assert_eq!(
            serde_json::from_str::<RenderedMessage>(&json).unwrap(),
            rendered
        );

        let yaml = OutputFormat::Yaml.render(&rendered).unwrap();
        assert!(yaml.contains("orderedAccounts:"));
        assert_eq!(
            serde_yaml::from_str::<RenderedMessage>(&yaml).unwrap(),
            rendered
        );
    }

    #[test]
    fn test_invalid_rendered_data() {
        let mut rendered = RenderedMessage::from(&message());
        rendered.instructions[0].data = "zz".to_string();
        assert!(CompiledMessage::try_from(&rendered).is_err());
    }
}
