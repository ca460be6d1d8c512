use serde::{Deserialize, Serialize};

/// A user's cumulative-to-date reward allotment in one campaign, attested
/// by a merkle membership proof. `amount` is cumulative as of
/// `last_indexed_block`, not incremental.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRecord {
    pub chain_id: u64,
    pub last_indexed_block: u64,
    pub user: String,
    pub campaign_id: String,
    /// Decimal string in the reward token's human denomination.
    pub amount: String,
    /// Opaque 0x-prefixed hash values, leaf-to-root.
    pub proof: Vec<String>,
}

/// One already-executed on-chain withdrawal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalClaim {
    pub id: String,
    pub user: String,
    pub amount: String,
    pub campaign_id: String,
    pub chain_id: u64,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Campaign metadata from the campaign directory query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfo {
    pub campaign_id: String,
    pub pool_address: String,
    pub reward_token: String,
    #[serde(default)]
    pub token_symbol: String,
    pub token_decimals: u8,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub paused: bool,
    pub closed: bool,
}

/// Derived per-campaign totals, all in integer base units. Recomputed on
/// every query, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    pub total_eligible: String,
    pub total_claimed: String,
    pub remaining: String,
    pub can_claim: bool,
}

/// Decimal-string rendering of a [`ReconciliationResult`] for display. The
/// underlying base-unit computation is never altered by formatting.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationDisplay {
    pub total_eligible: String,
    pub total_claimed: String,
    pub remaining: String,
    pub can_claim: bool,
}

/// The four parallel sequences consumed atomically by one batched claim
/// submission. Always equal-length and order-preserving; amounts are
/// base-unit strings within the unsigned 256-bit range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClaimArguments {
    pub accounts: Vec<String>,
    pub campaign_ids: Vec<String>,
    pub amounts: Vec<String>,
    pub proofs: Vec<Vec<String>>,
}

impl ClaimArguments {
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Cursor-based page info shared by every indexer stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of records from the indexer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub records: Vec<T>,
    pub page_info: PageInfo,
}
