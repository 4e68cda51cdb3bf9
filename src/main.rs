mod app;
mod components;
mod config;
mod data;
mod events;
mod logging;
mod theme;
mod utils;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::data::DataService;
use crate::data::artifact::ContractArtifact;
use crate::data::change::CardLoader;
use crate::data::history::{HistorySource, JsonHistory, PlaceholderHistory};
use crate::data::identity::{GithubIdentities, IdentityResolver, LocalIdentities};
use crate::data::provider::AlloyBackend;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    logging::init(config.log_file.as_deref())?;

    let artifact = ContractArtifact::load(&config.artifact)?;
    tracing::info!(contract = %artifact.contract_name, path = %config.artifact.display(), "artifact loaded");

    // Connect to the node
    eprintln!("Connecting to {}...", config.rpc_url);
    let backend = AlloyBackend::connect(&config.rpc_url, &artifact).await?;

    let identities: Arc<dyn IdentityResolver> = if config.github_identities {
        Arc::new(GithubIdentities::new())
    } else {
        Arc::new(LocalIdentities)
    };
    let history: Arc<dyn HistorySource> = match config.history {
        Some(ref path) => Arc::new(JsonHistory::new(path)),
        None => Arc::new(PlaceholderHistory),
    };
    let loader = CardLoader::new(
        Arc::new(backend),
        config.deploy_settings(),
        identities,
        history,
    );

    // Create event channel and data service
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let data_service = Arc::new(DataService::new(loader, event_tx));

    let mut app = App::with_service(data_service, event_rx, &config.rpc_url, config.tick_rate_ms);

    // Initialize terminal
    let terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e.into());
    }
    let result = app.run(terminal).await;

    // Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}
