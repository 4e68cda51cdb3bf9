use alloy::primitives::B256;

use crate::data::change::ChangeCardState;
use crate::data::types::{ChangeState, ContractAction};

/// Events sent from background data tasks and components to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Initialization
    CardLoaded(Box<ChangeCardState>),
    AccountUnavailable,

    // Contract interaction
    Interact(ContractAction),
    /// Mined, with the contract state read back afterwards.
    TransactionConfirmed {
        action: ContractAction,
        hash: B256,
        state: ChangeState,
    },
    TransactionFailed(String),

    // Status
    Error(String),
}
