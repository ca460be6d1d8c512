use alloy::primitives::Address;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub chain: ChainConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub claim: ClaimConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub indexer_url: String,
    pub distributor_address: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WalletConfig {
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClaimConfig {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_confirm")]
    pub confirm: bool,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            confirm: true,
        }
    }
}

fn default_confirm() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CLAIM").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn distributor_address(&self) -> anyhow::Result<Address> {
        Address::from_str(&self.chain.distributor_address)
            .map_err(|e| anyhow::anyhow!("Invalid distributor address: {}", e))
    }

    pub fn require_private_key(&self) -> anyhow::Result<&str> {
        self.wallet
            .private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("No private key configured (wallet.private_key)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[chain]
rpc_url = "https://rpc.example.com"
chain_id = 137
indexer_url = "https://indexer.example.com/graphql"
distributor_address = "0x00000000000000000000000000000000000000dd"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.chain.chain_id, 137);
        assert!(!config.claim.dry_run);
        assert!(config.claim.confirm);
        assert!(config.wallet.private_key.is_none());
        assert!(config.distributor_address().is_ok());
        assert!(config.require_private_key().is_err());
    }
}
