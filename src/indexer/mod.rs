pub mod client;

pub use client::IndexerClient;

use async_trait::async_trait;

use crate::{
    campaign::types::{CampaignInfo, EligibilityRecord, HistoricalClaim, Page},
    error::Result,
};

/// Boundary to the external paginated query layer.
///
/// Each call returns one page; the caller follows `end_cursor` to fetch
/// the next. Two pages of the same stream are never requested
/// concurrently because each cursor depends on the prior response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardsIndexer: Send + Sync {
    /// One page of the campaign directory for a chain.
    async fn campaigns_page(
        &self,
        chain_id: u64,
        cursor: Option<String>,
    ) -> Result<Page<CampaignInfo>>;

    /// One page of eligibility records for a user in a campaign.
    async fn eligibility_page(
        &self,
        user: &str,
        chain_id: u64,
        campaign_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<EligibilityRecord>>;

    /// One page of historical claims for a user against a pool.
    async fn claims_page(
        &self,
        pool_address: &str,
        chain_id: u64,
        user: &str,
        cursor: Option<String>,
    ) -> Result<Page<HistoricalClaim>>;
}
