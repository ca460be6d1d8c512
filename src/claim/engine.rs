use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    campaign::reconcile,
    campaign::types::{
        CampaignInfo, ClaimArguments, EligibilityRecord, HistoricalClaim, Page,
        ReconciliationDisplay, ReconciliationResult,
    },
    campaign::validate,
    chain::ClaimSubmitter,
    claim::args::build_claim_arguments,
    error::{ClaimError, Result},
    events::ClaimEvents,
    indexer::RewardsIndexer,
    units,
};

/// Upper bound on pages followed per stream. A healthy indexer terminates
/// long before this; a cursor that never advances must not loop forever.
const MAX_PAGES: usize = 1_000;

/// Reconciled view of one campaign for one user.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStatus {
    pub campaign: CampaignInfo,
    pub reconciliation: ReconciliationResult,
    pub display: ReconciliationDisplay,
    /// Rollup across every fetched claim against the pool, regardless of
    /// campaign; independent of the per-campaign reconciliation.
    pub lifetime_claim_count: usize,
    pub lifetime_claimed: String,
}

/// Result of a claim invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimOutcome {
    pub tx_hash: Option<String>,
    pub arguments: ClaimArguments,
    /// Remaining claimable balance in base units at submission time.
    pub remaining: String,
    pub dry_run: bool,
}

/// End-to-end driver: resolve campaign metadata, page the record streams,
/// validate, reconcile, and optionally assemble and submit the claim.
///
/// Per invocation: ResolveCampaign -> FetchHistoricalClaims ->
/// FetchEligibility -> Reconcile -> [BuildArgs -> Submit].
pub struct ClaimEngine {
    indexer: Arc<dyn RewardsIndexer>,
    submitter: Option<Arc<dyn ClaimSubmitter>>,
    events: Arc<dyn ClaimEvents>,
    chain_id: u64,
    dry_run: bool,
}

impl ClaimEngine {
    pub fn new(
        indexer: Arc<dyn RewardsIndexer>,
        events: Arc<dyn ClaimEvents>,
        chain_id: u64,
        dry_run: bool,
    ) -> Self {
        Self {
            indexer,
            submitter: None,
            events,
            chain_id,
            dry_run,
        }
    }

    /// Attach the submission seam. Without one, status queries still work
    /// and `claim` fails with a wallet error.
    pub fn with_submitter(mut self, submitter: Arc<dyn ClaimSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Look up a campaign in the directory; absence is terminal.
    pub async fn resolve_campaign(&self, campaign_id: &str) -> Result<CampaignInfo> {
        let campaigns = self.fetch_all_campaigns().await?;
        campaigns
            .into_iter()
            .find(|campaign| campaign.campaign_id == campaign_id)
            .ok_or_else(|| ClaimError::CampaignNotFound(campaign_id.to_string()))
    }

    /// Reconcile one campaign for a user.
    pub async fn check_status(&self, user: &str, campaign_id: &str) -> Result<CampaignStatus> {
        let campaign = self.resolve_campaign(campaign_id).await?;
        self.status_for_campaign(user, &campaign).await
    }

    /// Full claim pipeline for one campaign. Stops after argument assembly
    /// when the engine is in dry-run mode.
    pub async fn claim(&self, user: &str, campaign_id: &str) -> Result<ClaimOutcome> {
        let campaign = self.resolve_campaign(campaign_id).await?;
        let claims = self
            .fetch_all_claims(&campaign.pool_address, user)
            .await?;
        let eligibility = self.fetch_all_eligibility(user, &campaign.campaign_id).await?;

        validate::validate_historical_claims(&claims, user)?;
        self.require_records(&eligibility, user, &campaign.campaign_id)?;
        validate::validate_eligibility_records(&eligibility, user, &campaign.campaign_id)?;

        let reconciliation = reconcile::reconcile(
            &eligibility,
            &claims,
            &campaign.campaign_id,
            campaign.token_decimals,
        )?;
        if !reconciliation.can_claim {
            return Err(ClaimError::Validation {
                user: user.to_string(),
                campaign_id: campaign.campaign_id.clone(),
                chain_id: self.chain_id,
                reason: "nothing left to claim".to_string(),
            });
        }

        // Claim from the deduplicated snapshot set, amounts converted to
        // base units before assembly.
        let precision = campaign.token_decimals as u32;
        let mut records = reconcile::latest_snapshots(&eligibility);
        for record in &mut records {
            record.amount = units::to_base_units(&record.amount, precision)?;
        }

        if records.len() == 1 {
            debug!("Single-record claim path");
        } else {
            debug!("Batch claim path for {} records", records.len());
        }
        let arguments = build_claim_arguments(&records)?;

        if self.dry_run {
            info!(
                "DRY RUN: would claim {} base units from campaign {}",
                reconciliation.remaining, campaign.campaign_id
            );
            return Ok(ClaimOutcome {
                tx_hash: None,
                arguments,
                remaining: reconciliation.remaining,
                dry_run: true,
            });
        }

        let submitter = self.submitter.as_ref().ok_or_else(|| {
            ClaimError::Wallet("no signing wallet configured".to_string())
        })?;
        let tx_hash = submitter.submit_claim(&arguments).await?;

        info!(
            "✓ Claimed {} base units from campaign {} | Tx: {}",
            reconciliation.remaining, campaign.campaign_id, tx_hash
        );

        Ok(ClaimOutcome {
            tx_hash: Some(tx_hash),
            arguments,
            remaining: reconciliation.remaining,
            dry_run: false,
        })
    }

    /// Reconcile every campaign in the directory for a user, sequentially.
    ///
    /// A campaign that fails is skipped, not fatal; the rest of the batch
    /// proceeds. Results are sorted claimable-first, then by descending
    /// remaining amount.
    pub async fn user_claimable_campaigns(&self, user: &str) -> Result<Vec<CampaignStatus>> {
        let campaigns = self.fetch_all_campaigns().await?;
        info!(
            "Reconciling {} campaigns for user {}",
            campaigns.len(),
            user
        );

        let mut results = Vec::new();
        for campaign in &campaigns {
            match self.status_for_campaign(user, campaign).await {
                Ok(status) => results.push(status),
                Err(e) => {
                    self.events
                        .campaign_skipped(&campaign.campaign_id, &e.to_string());
                }
            }
        }

        results.sort_by(|a, b| {
            b.reconciliation
                .can_claim
                .cmp(&a.reconciliation.can_claim)
                .then_with(|| {
                    units::compare_base_units(
                        &b.reconciliation.remaining,
                        &a.reconciliation.remaining,
                    )
                    .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        Ok(results)
    }

    async fn status_for_campaign(
        &self,
        user: &str,
        campaign: &CampaignInfo,
    ) -> Result<CampaignStatus> {
        let claims = self
            .fetch_all_claims(&campaign.pool_address, user)
            .await?;
        let eligibility = self.fetch_all_eligibility(user, &campaign.campaign_id).await?;

        validate::validate_historical_claims(&claims, user)?;
        self.require_records(&eligibility, user, &campaign.campaign_id)?;
        validate::validate_eligibility_records(&eligibility, user, &campaign.campaign_id)?;

        let reconciliation = reconcile::reconcile(
            &eligibility,
            &claims,
            &campaign.campaign_id,
            campaign.token_decimals,
        )?;
        let display = reconcile::format_reconciliation(&reconciliation, campaign.token_decimals)?;

        // Pool-wide rollup, unfiltered by campaign; the claims stream is
        // pool-scoped so every amount is in the pool's reward token.
        let precision = campaign.token_decimals as u32;
        let mut lifetime_claimed = "0".to_string();
        for claim in &claims {
            let amount = units::to_base_units(&claim.amount, precision)?;
            lifetime_claimed = units::add_base_units(&lifetime_claimed, &amount)?;
        }

        Ok(CampaignStatus {
            campaign: campaign.clone(),
            reconciliation,
            display,
            lifetime_claim_count: claims.len(),
            lifetime_claimed: units::from_base_units(&lifetime_claimed, precision)?,
        })
    }

    /// Fetch every page of the campaign directory for this chain.
    pub async fn fetch_all_campaigns(&self) -> Result<Vec<CampaignInfo>> {
        let chain = self.chain_id.to_string();
        self.drain_pages("campaigns", &chain, |cursor| {
            self.indexer.campaigns_page(self.chain_id, cursor)
        })
        .await
    }

    /// Fetch every page of eligibility records for a user in a campaign.
    pub async fn fetch_all_eligibility(
        &self,
        user: &str,
        campaign_id: &str,
    ) -> Result<Vec<EligibilityRecord>> {
        self.drain_pages("eligibility", user, |cursor| {
            self.indexer
                .eligibility_page(user, self.chain_id, campaign_id, cursor)
        })
        .await
    }

    /// Fetch every page of a user's historical claims against a pool.
    pub async fn fetch_all_claims(
        &self,
        pool_address: &str,
        user: &str,
    ) -> Result<Vec<HistoricalClaim>> {
        self.drain_pages("claims", user, |cursor| {
            self.indexer.claims_page(pool_address, self.chain_id, user, cursor)
        })
        .await
    }

    /// Sequential cursor-following pagination. A page that reports more
    /// results without supplying a cursor is an inconsistent-but-non-fatal
    /// end of stream: recorded and stopped, never an error, never a loop.
    async fn drain_pages<T, F, Fut>(&self, stream: &str, context: &str, fetch: F) -> Result<Vec<T>>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if pages == MAX_PAGES {
                warn!(
                    "Stopping {} stream for {} after {} pages",
                    stream, context, MAX_PAGES
                );
                break;
            }

            let page = fetch(cursor.clone()).await?;
            pages += 1;
            records.extend(page.records);

            if !page.page_info.has_next_page {
                break;
            }
            match page.page_info.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    self.events.pagination_halted(stream, context);
                    break;
                }
            }
        }

        debug!("Fetched {} {} records for {}", records.len(), stream, context);
        Ok(records)
    }

    fn require_records(
        &self,
        eligibility: &[EligibilityRecord],
        user: &str,
        campaign_id: &str,
    ) -> Result<()> {
        if eligibility.is_empty() {
            return Err(ClaimError::Validation {
                user: user.to_string(),
                campaign_id: campaign_id.to_string(),
                chain_id: self.chain_id,
                reason: "no eligibility records found".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::types::PageInfo;
    use crate::chain::MockClaimSubmitter;
    use crate::indexer::MockRewardsIndexer;
    use std::sync::Mutex;

    const USER: &str = "0x00000000000000000000000000000000000000aa";
    const CHAIN: u64 = 137;

    #[derive(Default)]
    struct RecordingEvents {
        halted: Mutex<Vec<(String, String)>>,
        skipped: Mutex<Vec<(String, String)>>,
    }

    impl ClaimEvents for RecordingEvents {
        fn pagination_halted(&self, stream: &str, context: &str) {
            self.halted
                .lock()
                .unwrap()
                .push((stream.to_string(), context.to_string()));
        }

        fn campaign_skipped(&self, campaign_id: &str, reason: &str) {
            self.skipped
                .lock()
                .unwrap()
                .push((campaign_id.to_string(), reason.to_string()));
        }
    }

    fn campaign(campaign_id: &str) -> CampaignInfo {
        CampaignInfo {
            campaign_id: campaign_id.to_string(),
            pool_address: "0x00000000000000000000000000000000000000bb".to_string(),
            reward_token: "0x00000000000000000000000000000000000000cc".to_string(),
            token_symbol: "RWD".to_string(),
            token_decimals: 0,
            start_timestamp: 1_700_000_000,
            end_timestamp: 1_800_000_000,
            paused: false,
            closed: false,
        }
    }

    fn eligibility(campaign_id: &str, amount: &str, block: u64) -> EligibilityRecord {
        EligibilityRecord {
            chain_id: CHAIN,
            last_indexed_block: block,
            user: USER.to_string(),
            campaign_id: campaign_id.to_string(),
            amount: amount.to_string(),
            proof: vec![
                "0x00000000000000000000000000000000000000000000000000000000000000aa".to_string(),
            ],
        }
    }

    fn historical(campaign_id: &str, amount: &str) -> HistoricalClaim {
        HistoricalClaim {
            id: "1".to_string(),
            user: USER.to_string(),
            amount: amount.to_string(),
            campaign_id: campaign_id.to_string(),
            chain_id: CHAIN,
            timestamp: 1_750_000_000,
        }
    }

    fn page<T>(records: Vec<T>, end_cursor: Option<&str>, has_next_page: bool) -> Page<T> {
        Page {
            records,
            page_info: PageInfo {
                end_cursor: end_cursor.map(str::to_string),
                has_next_page,
            },
        }
    }

    fn engine(indexer: MockRewardsIndexer, events: Arc<RecordingEvents>, dry_run: bool) -> ClaimEngine {
        ClaimEngine::new(Arc::new(indexer), events, CHAIN, dry_run)
    }

    #[tokio::test]
    async fn test_missing_cursor_halts_without_looping() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_eligibility_page()
            .times(2)
            .returning(|_, _, campaign_id, cursor| {
                let campaign_id = campaign_id.to_string();
                match cursor {
                    None => Ok(page(vec![eligibility(&campaign_id, "1", 100)], Some("c1"), true)),
                    // Second page claims more results but supplies no cursor.
                    Some(_) => Ok(page(vec![eligibility(&campaign_id, "2", 200)], None, true)),
                }
            });

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events.clone(), false);

        let records = engine.fetch_all_eligibility(USER, "1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(events.halted.lock().unwrap().len(), 1);
        assert_eq!(events.halted.lock().unwrap()[0].0, "eligibility");
    }

    #[tokio::test]
    async fn test_check_status_reconciles() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1")], None, false)));
        indexer
            .expect_claims_page()
            .returning(|_, _, _, _| Ok(page(vec![historical("1", "3"), historical("9", "4")], None, false)));
        indexer.expect_eligibility_page().returning(|_, _, _, _| {
            Ok(page(
                vec![eligibility("1", "10", 100), eligibility("1", "15", 200)],
                None,
                false,
            ))
        });

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events, false);

        let status = engine.check_status(USER, "1").await.unwrap();
        // Latest snapshot (15) minus the matching claim (3).
        assert_eq!(status.reconciliation.total_eligible, "15");
        assert_eq!(status.reconciliation.total_claimed, "3");
        assert_eq!(status.reconciliation.remaining, "12");
        assert!(status.reconciliation.can_claim);
        // Rollup counts every claim against the pool.
        assert_eq!(status.lifetime_claim_count, 2);
        assert_eq!(status.lifetime_claimed, "7");
    }

    #[tokio::test]
    async fn test_unknown_campaign_is_terminal() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1")], None, false)));

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events, false);

        let err = engine.check_status(USER, "404").await.unwrap_err();
        assert!(matches!(err, ClaimError::CampaignNotFound(_)));
    }

    #[tokio::test]
    async fn test_one_failing_campaign_does_not_abort_the_batch() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1"), campaign("2")], None, false)));
        indexer
            .expect_claims_page()
            .returning(|_, _, _, _| Ok(page(vec![], None, false)));
        indexer
            .expect_eligibility_page()
            .returning(|_, _, campaign_id, _| {
                if campaign_id == "1" {
                    Ok(page(vec![eligibility("1", "10", 100)], None, false))
                } else {
                    // No records: this campaign's reconciliation fails.
                    Ok(page(vec![], None, false))
                }
            });

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events.clone(), false);

        let results = engine.user_claimable_campaigns(USER).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].campaign.campaign_id, "1");
        assert_eq!(results[0].reconciliation.remaining, "10");

        let skipped = events.skipped.lock().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "2");
    }

    #[tokio::test]
    async fn test_results_sorted_claimable_first_then_remaining() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1"), campaign("2"), campaign("3")], None, false)));
        indexer.expect_claims_page().returning(|_, _, _, _| {
            // Campaign 2 is fully claimed already.
            Ok(page(vec![historical("2", "5")], None, false))
        });
        indexer
            .expect_eligibility_page()
            .returning(|_, _, campaign_id, _| {
                let amount = match campaign_id {
                    "1" => "7",
                    "2" => "5",
                    _ => "20",
                };
                let campaign_id = campaign_id.to_string();
                Ok(page(vec![eligibility(&campaign_id, amount, 100)], None, false))
            });

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events, false);

        let results = engine.user_claimable_campaigns(USER).await.unwrap();
        let order: Vec<&str> = results
            .iter()
            .map(|s| s.campaign.campaign_id.as_str())
            .collect();
        assert_eq!(order, vec!["3", "1", "2"]);
        assert!(!results[2].reconciliation.can_claim);
    }

    #[tokio::test]
    async fn test_dry_run_claim_builds_but_does_not_submit() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1")], None, false)));
        indexer
            .expect_claims_page()
            .returning(|_, _, _, _| Ok(page(vec![], None, false)));
        indexer
            .expect_eligibility_page()
            .returning(|_, _, _, _| Ok(page(vec![eligibility("1", "10", 100)], None, false)));

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events, true);

        let outcome = engine.claim(USER, "1").await.unwrap();
        assert!(outcome.dry_run);
        assert!(outcome.tx_hash.is_none());
        assert_eq!(outcome.arguments.len(), 1);
        assert_eq!(outcome.arguments.amounts, vec!["10"]);
        assert_eq!(outcome.remaining, "10");
    }

    #[tokio::test]
    async fn test_claim_submits_converted_arguments() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| {
                let mut c = campaign("1");
                c.token_decimals = 6;
                Ok(page(vec![c], None, false))
            });
        indexer
            .expect_claims_page()
            .returning(|_, _, _, _| Ok(page(vec![], None, false)));
        indexer
            .expect_eligibility_page()
            .returning(|_, _, _, _| Ok(page(vec![eligibility("1", "1.5", 100)], None, false)));

        let mut submitter = MockClaimSubmitter::new();
        submitter
            .expect_submit_claim()
            .times(1)
            .withf(|arguments| arguments.amounts == vec!["1500000"] && arguments.len() == 1)
            .returning(|_| Ok("0xhash".to_string()));

        let events = Arc::new(RecordingEvents::default());
        let engine = ClaimEngine::new(Arc::new(indexer), events, CHAIN, false)
            .with_submitter(Arc::new(submitter));

        let outcome = engine.claim(USER, "1").await.unwrap();
        assert_eq!(outcome.tx_hash.as_deref(), Some("0xhash"));
        assert!(!outcome.dry_run);
    }

    #[tokio::test]
    async fn test_nothing_left_to_claim_is_an_error() {
        let mut indexer = MockRewardsIndexer::new();
        indexer
            .expect_campaigns_page()
            .returning(|_, _| Ok(page(vec![campaign("1")], None, false)));
        indexer
            .expect_claims_page()
            .returning(|_, _, _, _| Ok(page(vec![historical("1", "10")], None, false)));
        indexer
            .expect_eligibility_page()
            .returning(|_, _, _, _| Ok(page(vec![eligibility("1", "10", 100)], None, false)));

        let events = Arc::new(RecordingEvents::default());
        let engine = engine(indexer, events, false);

        let err = engine.claim(USER, "1").await.unwrap_err();
        assert!(matches!(err, ClaimError::Validation { .. }));
    }
}
