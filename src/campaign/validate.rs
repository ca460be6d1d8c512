use alloy::primitives::U256;
use tracing::debug;

use crate::{
    campaign::types::{EligibilityRecord, HistoricalClaim},
    error::{ClaimError, Result},
};

/// Integrity gate over an eligibility batch before its amounts enter any
/// financial computation or transaction payload.
///
/// Every record must belong to the expected user (case-insensitive) and
/// campaign, carry a non-empty proof, and hold a strictly positive amount.
/// A single violation fails the whole batch; bad entries are never
/// silently filtered out.
pub fn validate_eligibility_records(
    records: &[EligibilityRecord],
    expected_user: &str,
    expected_campaign_id: &str,
) -> Result<()> {
    for record in records {
        if !record.user.eq_ignore_ascii_case(expected_user) {
            return Err(validation_error(
                record,
                format!("record user {} does not match {}", record.user, expected_user),
            ));
        }
        if record.campaign_id != expected_campaign_id {
            return Err(validation_error(
                record,
                format!(
                    "record campaign {} does not match {}",
                    record.campaign_id, expected_campaign_id
                ),
            ));
        }
        if record.proof.is_empty() {
            return Err(validation_error(record, "record carries no proof".to_string()));
        }
        if !is_positive_decimal(&record.amount) {
            return Err(validation_error(
                record,
                format!("record amount '{}' is not strictly positive", record.amount),
            ));
        }
    }

    debug!(
        "Validated {} eligibility records for user {} in campaign {}",
        records.len(),
        expected_user,
        expected_campaign_id
    );
    Ok(())
}

/// Integrity gate over a historical-claim batch: user match
/// (case-insensitive), strictly positive amount, numeric campaign id.
pub fn validate_historical_claims(
    records: &[HistoricalClaim],
    expected_user: &str,
) -> Result<()> {
    for record in records {
        if !record.user.eq_ignore_ascii_case(expected_user) {
            return Err(ClaimError::Validation {
                user: record.user.clone(),
                campaign_id: record.campaign_id.clone(),
                chain_id: record.chain_id,
                reason: format!("claim user {} does not match {}", record.user, expected_user),
            });
        }
        if !is_positive_decimal(&record.amount) {
            return Err(ClaimError::Validation {
                user: record.user.clone(),
                campaign_id: record.campaign_id.clone(),
                chain_id: record.chain_id,
                reason: format!("claim amount '{}' is not strictly positive", record.amount),
            });
        }
        if parse_campaign_id(&record.campaign_id).is_none() {
            return Err(ClaimError::Validation {
                user: record.user.clone(),
                campaign_id: record.campaign_id.clone(),
                chain_id: record.chain_id,
                reason: format!("claim campaign id '{}' is not numeric", record.campaign_id),
            });
        }
    }

    debug!(
        "Validated {} historical claims for user {}",
        records.len(),
        expected_user
    );
    Ok(())
}

/// Numeric form of a campaign identifier, if it has one.
pub fn parse_campaign_id(campaign_id: &str) -> Option<U256> {
    let trimmed = campaign_id.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(trimmed, 10).ok()
}

/// A well-formed decimal string with at least one non-zero digit.
fn is_positive_decimal(s: &str) -> bool {
    let trimmed = s.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return false;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    trimmed.chars().any(|c| ('1'..='9').contains(&c))
}

fn validation_error(record: &EligibilityRecord, reason: String) -> ClaimError {
    ClaimError::Validation {
        user: record.user.clone(),
        campaign_id: record.campaign_id.clone(),
        chain_id: record.chain_id,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, campaign_id: &str, amount: &str) -> EligibilityRecord {
        EligibilityRecord {
            chain_id: 137,
            last_indexed_block: 1000,
            user: user.to_string(),
            campaign_id: campaign_id.to_string(),
            amount: amount.to_string(),
            proof: vec!["0xabc".to_string()],
        }
    }

    fn claim(user: &str, campaign_id: &str, amount: &str) -> HistoricalClaim {
        HistoricalClaim {
            id: "1".to_string(),
            user: user.to_string(),
            amount: amount.to_string(),
            campaign_id: campaign_id.to_string(),
            chain_id: 137,
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_accepts_matching_batch() {
        let records = vec![record("0xAbC1", "7", "10"), record("0xabc1", "7", "0.5")];
        assert!(validate_eligibility_records(&records, "0xABC1", "7").is_ok());
    }

    #[test]
    fn test_one_mismatched_user_fails_the_whole_batch() {
        let records = vec![record("0xabc1", "7", "10"), record("0xother", "7", "5")];
        let err = validate_eligibility_records(&records, "0xabc1", "7").unwrap_err();
        assert!(matches!(err, ClaimError::Validation { .. }));
    }

    #[test]
    fn test_campaign_mismatch_and_empty_proof_fail() {
        let records = vec![record("0xabc1", "8", "10")];
        assert!(validate_eligibility_records(&records, "0xabc1", "7").is_err());

        let mut bare = record("0xabc1", "7", "10");
        bare.proof.clear();
        assert!(validate_eligibility_records(&[bare], "0xabc1", "7").is_err());
    }

    #[test]
    fn test_zero_or_malformed_amount_fails() {
        assert!(validate_eligibility_records(&[record("0xa", "7", "0")], "0xa", "7").is_err());
        assert!(validate_eligibility_records(&[record("0xa", "7", "0.000")], "0xa", "7").is_err());
        assert!(validate_eligibility_records(&[record("0xa", "7", "-1")], "0xa", "7").is_err());
        assert!(validate_eligibility_records(&[record("0xa", "7", "abc")], "0xa", "7").is_err());
    }

    #[test]
    fn test_historical_claims() {
        let claims = vec![claim("0xAbC1", "7", "3"), claim("0xabc1", "12", "1.25")];
        assert!(validate_historical_claims(&claims, "0xABC1").is_ok());

        assert!(validate_historical_claims(&[claim("0xother", "7", "3")], "0xabc1").is_err());
        assert!(validate_historical_claims(&[claim("0xabc1", "seven", "3")], "0xabc1").is_err());
        assert!(validate_historical_claims(&[claim("0xabc1", "7", "0")], "0xabc1").is_err());
    }

    #[test]
    fn test_parse_campaign_id() {
        assert_eq!(parse_campaign_id("7"), Some(U256::from(7)));
        assert_eq!(parse_campaign_id(" 42 "), Some(U256::from(42)));
        assert!(parse_campaign_id("0x7").is_none());
        assert!(parse_campaign_id("").is_none());
    }
}
