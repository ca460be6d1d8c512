use std::str::FromStr;

use alloy::primitives::Address;
use alloy::providers::ProviderBuilder;
use alloy::sol;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::{
    chain::TokenMetadataSource,
    error::{ClaimError, Result},
};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Token metadata source backed by direct ERC-20 reads.
pub struct Erc20MetadataSource {
    rpc_url: String,
}

impl Erc20MetadataSource {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
        }
    }
}

#[async_trait]
impl TokenMetadataSource for Erc20MetadataSource {
    async fn token_metadata(&self, token_address: &str) -> Result<TokenMetadata> {
        let token = Address::from_str(token_address).map_err(|e| {
            ClaimError::Config(format!("invalid token address '{}': {}", token_address, e))
        })?;
        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| ClaimError::Config(format!("invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new().connect_http(rpc_url);
        let contract = IERC20Metadata::new(token, provider);

        // The two reads have no ordering dependency, so issue them together.
        let (symbol, decimals) = futures::try_join!(
            async {
                contract
                    .symbol()
                    .call()
                    .await
                    .map_err(|e| anyhow::anyhow!("symbol() read failed for {}: {}", token, e))
            },
            async {
                contract
                    .decimals()
                    .call()
                    .await
                    .map_err(|e| anyhow::anyhow!("decimals() read failed for {}: {}", token, e))
            },
        )?;

        debug!("Token {} resolved as {} ({} decimals)", token, symbol, decimals);
        Ok(TokenMetadata { symbol, decimals })
    }
}
