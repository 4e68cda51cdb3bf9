use std::path::PathBuf;

use clap::Parser;

use crate::data::contract::{DEFAULT_GAS, DeploySettings};

#[derive(Parser, Debug)]
#[command(
    name = "choreography-tui",
    about = "Review a Choreography change proposal from the terminal"
)]
pub struct Config {
    /// RPC endpoint URL of a node with unlocked accounts
    #[arg(short, long, env = "CHOREO_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Truffle build artifact of the Choreography contract
    #[arg(short, long, default_value = "build/contracts/Choreography.json")]
    pub artifact: PathBuf,

    /// Gas limit for deployment and contract transactions
    #[arg(long, default_value_t = DEFAULT_GAS)]
    pub gas: u64,

    /// Display name passed to the contract constructor
    #[arg(long, default_value = "friedow")]
    pub proposer_name: String,

    /// Contact address passed to the contract constructor
    #[arg(long, default_value = "friedow@example.org")]
    pub proposer_contact: String,

    /// JSON file with the message history (placeholder history if omitted)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Resolve display names through the GitHub users API
    #[arg(long)]
    pub github_identities: bool,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn deploy_settings(&self) -> DeploySettings {
        DeploySettings {
            gas: self.gas,
            display_name: self.proposer_name.clone(),
            contact: self.proposer_contact.clone(),
        }
    }
}
