pub mod artifact;
pub mod change;
pub mod contract;
pub mod history;
pub mod identity;
pub mod provider;
pub mod types;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::change::{CardLoader, MountOutcome};
use crate::data::contract::ChoreographyInstance;
use crate::data::types::{ChangeState, ContractAction};
use crate::events::AppEvent;

/// Runs contract work off the UI loop and reports back through events.
pub struct DataService {
    loader: Arc<CardLoader>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl DataService {
    pub fn new(loader: CardLoader, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            loader: Arc::new(loader),
            event_tx,
        }
    }

    /// Start the card's initialization sequence.
    pub fn mount_card(&self) -> JoinHandle<()> {
        let loader = Arc::clone(&self.loader);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match loader.initialize().await {
                Ok(MountOutcome::NoAccount) => AppEvent::AccountUnavailable,
                Ok(MountOutcome::Loaded(state)) => AppEvent::CardLoaded(state),
                Err(e) => {
                    tracing::error!("card initialization failed: {e:#}");
                    AppEvent::Error(format!("Failed to load change: {e}"))
                }
            };
            // The receiver is gone once the card has been torn down.
            let _ = tx.send(event);
        })
    }

    /// Send `action` to the contract, then re-read its state.
    pub fn send_action(&self, contract: Arc<dyn ChoreographyInstance>, action: ContractAction) {
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let hash = match contract.send(action).await {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!(%action, "transaction failed: {e:#}");
                    let _ = tx.send(AppEvent::TransactionFailed(format!(
                        "Failed to {action}: {e}"
                    )));
                    return;
                }
            };
            // The controls stay locked until this event carries the new state.
            let event = match contract.state().await {
                Ok(value) => AppEvent::TransactionConfirmed {
                    action,
                    hash,
                    state: ChangeState::from_u8(value),
                },
                Err(e) => AppEvent::TransactionFailed(format!(
                    "{action} mined in {hash}, but reading the new state failed: {e}"
                )),
            };
            let _ = tx.send(event);
        });
    }
}
