mod campaign;
mod chain;
mod claim;
mod cli;
mod config;
mod error;
mod events;
mod indexer;
mod units;
mod utils;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use config::Config;
use tracing::{error, info};

use crate::chain::TokenMetadataSource;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("reward_claim=debug,info")
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Status {
            user,
            campaign,
            format,
        } => {
            info!("Checking status of campaign {} for {}", campaign, user);
            show_status(&config, &user, &campaign, &format).await
        }

        Commands::Claim {
            campaign,
            user,
            yes,
            dry_run,
        } => {
            info!("Claiming campaign {}", campaign);
            run_claim(&config, &campaign, user.as_deref(), yes, dry_run).await
        }

        Commands::Campaigns { user, format } => {
            info!("Listing claimable campaigns for {}", user);
            list_campaigns(&config, &user, &format).await
        }

        Commands::Init => initialize(&config),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn build_engine(config: &Config, dry_run: bool) -> error::Result<claim::ClaimEngine> {
    let indexer = indexer::IndexerClient::new(&config.chain.indexer_url)?;
    Ok(claim::ClaimEngine::new(
        Arc::new(indexer),
        Arc::new(events::TracingEvents),
        config.chain.chain_id,
        dry_run,
    ))
}

async fn show_status(config: &Config, user: &str, campaign: &str, format: &str) -> error::Result<()> {
    let engine = build_engine(config, false)?;
    let mut status = engine.check_status(user, campaign).await?;

    // The directory may omit the symbol; fall back to the token itself.
    if status.campaign.token_symbol.is_empty() {
        let metadata_source = chain::Erc20MetadataSource::new(&config.chain.rpc_url);
        if let Ok(metadata) = metadata_source.token_metadata(&status.campaign.reward_token).await {
            status.campaign.token_symbol = metadata.symbol;
        }
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let decimals = status.campaign.token_decimals;
    let symbol = status.campaign.token_symbol.clone();

    println!("\n{}", "=== Campaign Status ===".cyan().bold());
    println!("Campaign:        {}", status.campaign.campaign_id);
    println!("Pool:            {}", utils::format_address(&status.campaign.pool_address));
    println!(
        "Reward Token:    {} ({})",
        symbol,
        utils::format_address(&status.campaign.reward_token)
    );
    println!(
        "Period:          {} - {}",
        utils::format_timestamp(status.campaign.start_timestamp),
        utils::format_timestamp(status.campaign.end_timestamp)
    );
    println!(
        "Total Eligible:  {}",
        utils::format_token_amount(&status.reconciliation.total_eligible, decimals, &symbol)
    );
    println!(
        "Total Claimed:   {}",
        utils::format_token_amount(&status.reconciliation.total_claimed, decimals, &symbol)
    );
    println!(
        "Remaining:       {}",
        utils::format_token_amount(&status.reconciliation.remaining, decimals, &symbol)
    );
    println!(
        "Claimable:       {}",
        if status.reconciliation.can_claim {
            "yes ✓".green().to_string()
        } else {
            "no".yellow().to_string()
        }
    );
    println!(
        "\nLifetime claims on pool: {} ({} {})",
        status.lifetime_claim_count, status.lifetime_claimed, symbol
    );

    Ok(())
}

async fn run_claim(
    config: &Config,
    campaign: &str,
    user: Option<&str>,
    yes: bool,
    dry_run: bool,
) -> error::Result<()> {
    let actual_dry_run = dry_run || config.claim.dry_run;

    let user = match user {
        Some(user) => user.to_string(),
        None => chain::wallet_address(config.require_private_key()?)?,
    };

    println!(
        "{}",
        format!("Claiming campaign {} for {}", campaign, user).cyan()
    );

    let mut engine = build_engine(config, actual_dry_run)?;
    if !actual_dry_run {
        let key = config.require_private_key()?;
        let submitter = chain::EvmSubmitter::new(
            &config.chain.rpc_url,
            &config.chain.distributor_address,
            key,
        )?;
        engine = engine.with_submitter(Arc::new(submitter));
    }

    let status = engine.check_status(&user, campaign).await?;
    let decimals = status.campaign.token_decimals;
    let symbol = status.campaign.token_symbol.as_str();

    println!(
        "Remaining claimable: {}",
        utils::format_token_amount(&status.reconciliation.remaining, decimals, symbol)
    );

    if !yes && !actual_dry_run && config.claim.confirm {
        let prompt = format!(
            "Claim {} from campaign {}?",
            utils::format_token_amount(&status.reconciliation.remaining, decimals, symbol),
            campaign
        );
        if !utils::confirm_action(&prompt) {
            println!("Cancelled");
            return Ok(());
        }
    }

    let outcome = engine.claim(&user, campaign).await?;

    if let Some(tx_hash) = &outcome.tx_hash {
        println!("{}", "✓ Claim successful!".green());
        println!("Tx:      {}", tx_hash);
        println!(
            "Claimed: {}",
            utils::format_token_amount(&outcome.remaining, decimals, symbol)
        );
    } else if outcome.dry_run {
        println!(
            "{}",
            format!(
                "DRY RUN: assembled payload for {} record(s), no transaction sent",
                outcome.arguments.len()
            )
            .yellow()
        );
        println!("{}", serde_json::to_string_pretty(&outcome.arguments)?);
    }

    Ok(())
}

async fn list_campaigns(config: &Config, user: &str, format: &str) -> error::Result<()> {
    let engine = build_engine(config, false)?;
    let results = engine.user_claimable_campaigns(user).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let claimable = results
        .iter()
        .filter(|status| status.reconciliation.can_claim)
        .count();

    println!("\n{}", "=== Claimable Campaigns ===".cyan().bold());
    println!("Campaigns:  {}", results.len());
    println!("Claimable:  {}", claimable.to_string().green());

    if !results.is_empty() {
        println!();
        utils::print_table_border(92);
        utils::print_table_row(
            &["Campaign", "Pool", "Token", "Remaining", "Claimable"],
            &[10, 16, 8, 36, 10],
        );
        utils::print_table_border(92);

        for status in &results {
            utils::print_table_row(
                &[
                    &status.campaign.campaign_id,
                    &utils::format_address(&status.campaign.pool_address),
                    &status.campaign.token_symbol,
                    &status.display.remaining,
                    if status.reconciliation.can_claim { "yes" } else { "no" },
                ],
                &[10, 16, 8, 36, 10],
            );
        }
        utils::print_table_border(92);
    }

    Ok(())
}

fn initialize(config: &Config) -> error::Result<()> {
    println!("{}", "Validating configuration...".green());
    config
        .distributor_address()
        .map_err(|e| error::ClaimError::Config(e.to_string()))?;

    println!("{}", "✓ Configuration loaded".green());
    println!("\n{}", "Configuration:".cyan());
    println!("  RPC URL:       {}", config.chain.rpc_url);
    println!("  Chain ID:      {}", config.chain.chain_id);
    println!("  Indexer:       {}", config.chain.indexer_url);
    println!("  Distributor:   {}", config.chain.distributor_address);
    println!("  Wallet:        {}", if config.wallet.private_key.is_some() { "configured" } else { "not configured" });
    println!("  Dry Run:       {}", config.claim.dry_run);
    println!("  Confirm:       {}", config.claim.confirm);

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!(
        "  {} to check a campaign balance",
        "reward-claim status --user <address> --campaign <id>".yellow()
    );
    println!(
        "  {} to list claimable campaigns",
        "reward-claim campaigns --user <address>".yellow()
    );
    Ok(())
}
