use std::str::FromStr;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    campaign::types::ClaimArguments,
    chain::ClaimSubmitter,
    error::{ClaimError, Result, SubmissionErrorKind},
};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ICampaignDistributor {
        /// Withdraw rewards for one or more (account, campaign) pairs in a
        /// single transaction. Reverts on an invalid membership proof, a
        /// double claim, or a closed campaign.
        function claim(
            address[] calldata accounts,
            uint256[] calldata campaignIds,
            uint256[] calldata amounts,
            bytes32[][] calldata proofs
        ) external;
    }
}

/// Claim submitter backed by an EVM distributor contract.
pub struct EvmSubmitter {
    rpc_url: String,
    distributor: Address,
    signer: PrivateKeySigner,
}

impl EvmSubmitter {
    pub fn new(rpc_url: &str, distributor: &str, private_key: &str) -> Result<Self> {
        let distributor = Address::from_str(distributor).map_err(|e| {
            ClaimError::Config(format!("invalid distributor address '{}': {}", distributor, e))
        })?;
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ClaimError::Wallet(format!("invalid private key: {}", e)))?;

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            distributor,
            signer,
        })
    }

    /// Address of the configured signing wallet.
    pub fn signer_address(&self) -> String {
        format!("{:?}", self.signer.address())
    }
}

#[async_trait]
impl ClaimSubmitter for EvmSubmitter {
    async fn submit_claim(&self, arguments: &ClaimArguments) -> Result<String> {
        let accounts = parse_accounts(&arguments.accounts)?;
        let campaign_ids = parse_uints(&arguments.campaign_ids, "campaign id")?;
        let amounts = parse_uints(&arguments.amounts, "amount")?;
        let proofs = parse_proofs(&arguments.proofs)?;

        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| ClaimError::Config(format!("invalid RPC URL: {}", e)))?;
        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);
        let contract = ICampaignDistributor::new(self.distributor, provider);

        info!(
            "Submitting claim for {} record(s) to distributor {}",
            arguments.len(),
            self.distributor
        );

        let pending = contract
            .claim(accounts, campaign_ids, amounts, proofs)
            .send()
            .await
            .map_err(|e| submission_error(&e.to_string()))?;

        // Blocking wait for one confirmation; a revert is terminal, no retry.
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| submission_error(&e.to_string()))?;

        if !receipt.status() {
            return Err(submission_error(&format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        info!("Claim confirmed: {}", tx_hash);
        Ok(tx_hash)
    }
}

/// Derive the wallet address for a raw private key without building a
/// submitter.
pub fn wallet_address(private_key: &str) -> Result<String> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClaimError::Wallet(format!("invalid private key: {}", e)))?;
    Ok(format!("{:?}", signer.address()))
}

fn parse_accounts(accounts: &[String]) -> Result<Vec<Address>> {
    accounts
        .iter()
        .map(|account| {
            Address::from_str(account).map_err(|e| {
                ClaimError::ArgumentAssembly(format!("invalid account '{}': {}", account, e))
            })
        })
        .collect()
}

fn parse_uints(values: &[String], what: &str) -> Result<Vec<U256>> {
    values
        .iter()
        .map(|value| {
            U256::from_str_radix(value, 10).map_err(|e| {
                ClaimError::ArgumentAssembly(format!("invalid {} '{}': {}", what, value, e))
            })
        })
        .collect()
}

fn parse_proofs(proofs: &[Vec<String>]) -> Result<Vec<Vec<B256>>> {
    proofs
        .iter()
        .map(|proof| {
            proof
                .iter()
                .map(|element| {
                    B256::from_str(element).map_err(|e| {
                        ClaimError::ArgumentAssembly(format!(
                            "invalid proof element '{}': {}",
                            element, e
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn submission_error(message: &str) -> ClaimError {
    let kind = classify_revert(message);
    debug!("Classified submission failure as {}: {}", kind, message);
    ClaimError::Submission {
        kind,
        message: message.to_string(),
    }
}

/// Map a revert message onto the known failure categories. Classification
/// never replaces the original message.
pub fn classify_revert(message: &str) -> SubmissionErrorKind {
    let lowered = message.to_lowercase();
    if lowered.contains("invalid proof") || lowered.contains("proof") {
        SubmissionErrorKind::InvalidProof
    } else if lowered.contains("already claimed") || lowered.contains("claimed") {
        SubmissionErrorKind::AlreadyClaimed
    } else if lowered.contains("closed") || lowered.contains("ended") || lowered.contains("paused")
    {
        SubmissionErrorKind::CampaignClosed
    } else if lowered.contains("unauthorized") || lowered.contains("not authorized") {
        SubmissionErrorKind::Unauthorized
    } else {
        SubmissionErrorKind::Unknown
    }
}
