use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reward-claim")]
#[command(about = "Reward reconciliation and claim bot for campaign distributor contracts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show remaining claimable balance for a user in one campaign
    Status {
        /// User wallet address
        #[arg(short, long)]
        user: String,

        /// Campaign identifier
        #[arg(long)]
        campaign: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Claim the remaining balance of a campaign
    Claim {
        /// Campaign identifier
        #[arg(long)]
        campaign: String,

        /// User wallet address (defaults to the configured wallet)
        #[arg(short, long)]
        user: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Dry run mode (assemble the payload without sending a transaction)
        #[arg(long)]
        dry_run: bool,
    },

    /// List every campaign with a claimable balance for a user
    Campaigns {
        /// User wallet address
        #[arg(short, long)]
        user: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate configuration and show it
    Init,
}
