use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    campaign::types::{CampaignInfo, EligibilityRecord, HistoricalClaim, Page},
    error::{ClaimError, Result},
    indexer::RewardsIndexer,
};

const CAMPAIGNS_QUERY: &str = r#"
query Campaigns($chainId: Int!, $cursor: String) {
  campaigns(chainId: $chainId, after: $cursor) {
    records {
      campaignId
      poolAddress
      rewardToken
      tokenSymbol
      tokenDecimals
      startTimestamp
      endTimestamp
      paused
      closed
    }
    pageInfo { endCursor hasNextPage }
  }
}"#;

const ELIGIBILITY_QUERY: &str = r#"
query Eligibility($user: String!, $chainId: Int!, $campaignId: String!, $cursor: String) {
  eligibility(user: $user, chainId: $chainId, campaignId: $campaignId, after: $cursor) {
    records {
      chainId
      lastIndexedBlock
      user
      campaignId
      amount
      proof
    }
    pageInfo { endCursor hasNextPage }
  }
}"#;

const CLAIMS_QUERY: &str = r#"
query Claims($poolAddress: String!, $chainId: Int!, $user: String!, $cursor: String) {
  claims(poolAddress: $poolAddress, chainId: $chainId, user: $user, after: $cursor) {
    records {
      id
      user
      amount
      campaignId
      chainId
      timestamp
    }
    pageInfo { endCursor hasNextPage }
  }
}"#;

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct CampaignsData {
    campaigns: Page<CampaignInfo>,
}

#[derive(Deserialize)]
struct EligibilityData {
    eligibility: Page<EligibilityRecord>,
}

#[derive(Deserialize)]
struct ClaimsData {
    claims: Page<HistoricalClaim>,
}

/// GraphQL-over-HTTP implementation of the rewards indexer boundary.
#[derive(Clone)]
pub struct IndexerClient {
    http: Client,
    endpoint: String,
}

impl IndexerClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent("reward-claim-bot/0.1")
            .build()
            .map_err(ClaimError::Http)?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!("Querying indexer at {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: GraphQlResponse<T> = response.json().await?;

        if let Some(errors) = envelope.errors {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow::anyhow!("indexer query failed: {}", joined).into());
        }

        envelope
            .data
            .ok_or_else(|| anyhow::anyhow!("indexer returned an empty response").into())
    }
}

#[async_trait]
impl RewardsIndexer for IndexerClient {
    async fn campaigns_page(
        &self,
        chain_id: u64,
        cursor: Option<String>,
    ) -> Result<Page<CampaignInfo>> {
        let data: CampaignsData = self
            .execute(
                CAMPAIGNS_QUERY,
                json!({ "chainId": chain_id, "cursor": cursor }),
            )
            .await?;
        Ok(data.campaigns)
    }

    async fn eligibility_page(
        &self,
        user: &str,
        chain_id: u64,
        campaign_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<EligibilityRecord>> {
        let data: EligibilityData = self
            .execute(
                ELIGIBILITY_QUERY,
                json!({
                    "user": user,
                    "chainId": chain_id,
                    "campaignId": campaign_id,
                    "cursor": cursor,
                }),
            )
            .await?;
        Ok(data.eligibility)
    }

    async fn claims_page(
        &self,
        pool_address: &str,
        chain_id: u64,
        user: &str,
        cursor: Option<String>,
    ) -> Result<Page<HistoricalClaim>> {
        let data: ClaimsData = self
            .execute(
                CLAIMS_QUERY,
                json!({
                    "poolAddress": pool_address,
                    "chainId": chain_id,
                    "user": user,
                    "cursor": cursor,
                }),
            )
            .await?;
        Ok(data.claims)
    }
}
