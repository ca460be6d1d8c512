use tracing::debug;

use crate::{
    campaign::types::{ClaimArguments, EligibilityRecord},
    error::{ClaimError, Result},
    units,
};

/// Assemble the four parallel sequences consumed by one batched claim
/// submission.
///
/// Amounts are copied through as supplied; converting them to base units is
/// the caller's responsibility before invocation, and any amount that is
/// not a valid unsigned 256-bit integer fails assembly here, before any
/// submission is attempted. Structural checks (user present, proof
/// non-empty) run per record independently of the semantic validator so
/// lower-level callers that already trust their records can invoke the
/// builder directly.
pub fn build_claim_arguments(records: &[EligibilityRecord]) -> Result<ClaimArguments> {
    let mut arguments = ClaimArguments::default();

    for record in records {
        if record.user.is_empty() {
            return Err(ClaimError::ArgumentAssembly(format!(
                "record for campaign {} has no user account",
                record.campaign_id
            )));
        }
        if record.proof.is_empty() {
            return Err(ClaimError::ArgumentAssembly(format!(
                "record for user {} in campaign {} has no proof",
                record.user, record.campaign_id
            )));
        }

        arguments.accounts.push(record.user.clone());
        arguments.campaign_ids.push(record.campaign_id.clone());
        arguments.amounts.push(record.amount.clone());
        arguments.proofs.push(record.proof.clone());
    }

    let n = records.len();
    if arguments.accounts.len() != n
        || arguments.campaign_ids.len() != n
        || arguments.amounts.len() != n
        || arguments.proofs.len() != n
    {
        return Err(ClaimError::ArgumentAssembly(format!(
            "argument sequences diverged from input length {}",
            n
        )));
    }

    if !units::validate_amounts_for_onchain(&arguments.amounts) {
        return Err(ClaimError::ArgumentAssembly(
            "an amount is outside the unsigned 256-bit range".to_string(),
        ));
    }

    debug!("Assembled claim arguments for {} records", n);
    Ok(arguments)
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
            proof: vec!["0xaa".to_string(), "0xbb".to_string()],
        }
    }

    #[test]
    fn test_sequences_are_parallel_and_ordered() {
        let records = vec![
            record("0xalice", "1", "100"),
            record("0xbob", "2", "200"),
            record("0xcarol", "3", "300"),
        ];

        let args = build_claim_arguments(&records).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args.accounts, vec!["0xalice", "0xbob", "0xcarol"]);
        assert_eq!(args.campaign_ids, vec!["1", "2", "3"]);
        assert_eq!(args.amounts, vec!["100", "200", "300"]);
        assert_eq!(args.proofs.len(), 3);
        assert_eq!(args.proofs[1], vec!["0xaa", "0xbb"]);
    }

    #[test]
    fn test_missing_user_or_proof_fails_fast() {
        let mut no_user = record("", "1", "100");
        no_user.user.clear();
        assert!(build_claim_arguments(&[no_user]).is_err());

        let mut no_proof = record("0xalice", "1", "100");
        no_proof.proof.clear();
        assert!(build_claim_arguments(&[no_proof]).is_err());
    }

    #[test]
    fn test_unconverted_or_oversized_amount_fails() {
        // Decimal amounts must be converted to base units before assembly.
        assert!(build_claim_arguments(&[record("0xalice", "1", "1.5")]).is_err());
        let over_u256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(build_claim_arguments(&[record("0xalice", "1", over_u256)]).is_err());
    }

    #[test]
    fn test_empty_input_yields_empty_arguments() {
        let args = build_claim_arguments(&[]).unwrap();
        assert!(args.is_empty());
    }
}
