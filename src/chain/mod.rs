pub mod submitter;
pub mod token;

pub use submitter::{wallet_address, EvmSubmitter};
pub use token::{Erc20MetadataSource, TokenMetadata};

use async_trait::async_trait;

use crate::{campaign::types::ClaimArguments, error::Result};

/// Boundary to the state-mutating claim submission call.
///
/// Implementations send one transaction and block until one confirmation;
/// a revert is terminal and resubmission is the caller's responsibility.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimSubmitter: Send + Sync {
    /// Submit the four parallel claim sequences, returning the transaction
    /// hash on success.
    async fn submit_claim(&self, arguments: &ClaimArguments) -> Result<String>;
}

/// Boundary to the read-only token metadata call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    async fn token_metadata(&self, token_address: &str) -> Result<TokenMetadata>;
}
