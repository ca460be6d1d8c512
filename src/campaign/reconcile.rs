use std::collections::HashMap;

use tracing::debug;

use crate::{
    campaign::types::{EligibilityRecord, HistoricalClaim, ReconciliationDisplay, ReconciliationResult},
    campaign::validate::parse_campaign_id,
    error::{ClaimError, Result},
    units,
};

/// Keep only the highest-indexed-block record per (user, campaign) pair.
///
/// Eligibility amounts are cumulative snapshots, so summing two snapshots
/// of the same pair would double-count. Input order is preserved for the
/// surviving records.
pub fn latest_snapshots(records: &[EligibilityRecord]) -> Vec<EligibilityRecord> {
    let mut best: HashMap<(String, String), &EligibilityRecord> = HashMap::new();
    for record in records {
        let key = (record.user.to_lowercase(), record.campaign_id.clone());
        match best.get(&key) {
            Some(existing) if existing.last_indexed_block >= record.last_indexed_block => {}
            _ => {
                best.insert(key, record);
            }
        }
    }

    let survivors: Vec<EligibilityRecord> = records
        .iter()
        .filter(|record| {
            let key = (record.user.to_lowercase(), record.campaign_id.clone());
            best.get(&key)
                .map(|kept| std::ptr::eq(*kept, *record))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    if survivors.len() < records.len() {
        debug!(
            "Deduplicated {} eligibility snapshots down to {}",
            records.len(),
            survivors.len()
        );
    }
    survivors
}

/// Combine eligibility records and historical claims into the remaining
/// claimable balance for one campaign.
///
/// All totals are integer base units at `decimals` precision. Claims are
/// filtered by numeric equality of their campaign id against the target;
/// `remaining` floors at "0".
pub fn reconcile(
    eligibility: &[EligibilityRecord],
    claims: &[HistoricalClaim],
    campaign_id: &str,
    decimals: u8,
) -> Result<ReconciliationResult> {
    let target = parse_campaign_id(campaign_id).ok_or_else(|| {
        ClaimError::Conversion(format!("campaign id '{}' is not numeric", campaign_id))
    })?;
    let precision = decimals as u32;

    let mut total_eligible = "0".to_string();
    for record in latest_snapshots(eligibility) {
        let amount = units::to_base_units(&record.amount, precision)?;
        total_eligible = units::add_base_units(&total_eligible, &amount)?;
    }

    let mut total_claimed = "0".to_string();
    for claim in claims {
        let id = parse_campaign_id(&claim.campaign_id).ok_or_else(|| {
            ClaimError::Conversion(format!("claim campaign id '{}' is not numeric", claim.campaign_id))
        })?;
        if id != target {
            continue;
        }
        let amount = units::to_base_units(&claim.amount, precision)?;
        total_claimed = units::add_base_units(&total_claimed, &amount)?;
    }

    let remaining = units::subtract_base_units(&total_eligible, &total_claimed)?;
    let can_claim = units::compare_base_units(&remaining, "0")? == std::cmp::Ordering::Greater;

    Ok(ReconciliationResult {
        total_eligible,
        total_claimed,
        remaining,
        can_claim,
    })
}

/// Decimal-string rendering of the three totals for display.
pub fn format_reconciliation(
    result: &ReconciliationResult,
    decimals: u8,
) -> Result<ReconciliationDisplay> {
    let precision = decimals as u32;
    Ok(ReconciliationDisplay {
        total_eligible: units::from_base_units(&result.total_eligible, precision)?,
        total_claimed: units::from_base_units(&result.total_claimed, precision)?,
        remaining: units::from_base_units(&result.remaining, precision)?,
        can_claim: result.can_claim,
    })
}
