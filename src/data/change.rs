use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, eyre};

use crate::data::contract::{ChoreographyBackend, ChoreographyInstance, DeployConfig, DeploySettings};
use crate::data::history::HistorySource;
use crate::data::identity::IdentityResolver;
use crate::data::types::{ChangeState, MessageHistoryEntry, User};

/// Everything the change card displays.
#[derive(Debug, Clone)]
pub struct ChangeCardState {
    pub account: String,
    /// Set only when the node offered no account; nothing else is populated then.
    pub account_error: bool,
    pub timestamp: DateTime<Utc>,
    pub diff: String,
    pub state: ChangeState,
    pub proposer: User,
    pub messages: Vec<MessageHistoryEntry>,
    pub contract: Option<Arc<dyn ChoreographyInstance>>,
}

impl Default for ChangeCardState {
    fn default() -> Self {
        Self {
            account: String::new(),
            account_error: false,
            timestamp: Utc::now(),
            diff: String::new(),
            state: ChangeState::Ready,
            proposer: User::empty(),
            messages: Vec::new(),
            contract: None,
        }
    }
}

/// Result of a completed initialization.
#[derive(Debug)]
pub enum MountOutcome {
    NoAccount,
    Loaded(Box<ChangeCardState>),
}

impl ChangeCardState {
    /// Apply the outcome of initialization as a single update.
    pub fn commit(&mut self, outcome: MountOutcome) {
        match outcome {
            MountOutcome::NoAccount => {
                self.account = String::new();
                self.account_error = true;
            }
            MountOutcome::Loaded(state) => *self = *state,
        }
    }
}

/// Deploys a fresh Choreography contract and gathers the card's data from it.
pub struct CardLoader {
    backend: Arc<dyn ChoreographyBackend>,
    settings: DeploySettings,
    identities: Arc<dyn IdentityResolver>,
    history: Arc<dyn HistorySource>,
}

impl CardLoader {
    pub fn new(
        backend: Arc<dyn ChoreographyBackend>,
        settings: DeploySettings,
        identities: Arc<dyn IdentityResolver>,
        history: Arc<dyn HistorySource>,
    ) -> Self {
        Self {
            backend,
            settings,
            identities,
            history,
        }
    }

    /// Run the initialization sequence once. Every call is awaited in order.
    pub async fn initialize(&self) -> Result<MountOutcome> {
        let accounts = self.backend.accounts().await?;
        let Some(&from) = accounts.first() else {
            tracing::warn!("no account available, skipping deployment");
            return Ok(MountOutcome::NoAccount);
        };

        let config = DeployConfig::new(from, &self.settings);
        let contract = self.backend.deploy(&config).await?;

        let seconds = contract.timestamp().await?;
        let timestamp = i64::try_from(seconds)
            .ok()
            .and_then(|s| DateTime::from_timestamp(s, 0))
            .ok_or_else(|| eyre!("Change timestamp {seconds} cannot be represented"))?;
        let public_key = contract.proposer().await?;
        let diff = contract.diff().await?;
        let state = ChangeState::from_u8(contract.state().await?);
        tracing::info!(
            contract = %contract.address(),
            state = %state.label(),
            "change state read"
        );

        let proposer = self
            .identities
            .build(&public_key, &self.settings.display_name)
            .await?;
        let messages = self
            .history
            .entries(&proposer, self.identities.as_ref())
            .await?;

        Ok(MountOutcome::Loaded(Box::new(ChangeCardState {
            account: from.to_string(),
            account_error: false,
            timestamp,
            diff,
            state,
            proposer,
            messages,
            contract: Some(contract),
        })))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy::primitives::{Address, B256};
    use async_trait::async_trait;

    use super::*;
    use crate::data::history::PlaceholderHistory;
    use crate::data::identity::LocalIdentities;
    use crate::data::types::ContractAction;

    pub const PROPOSER: &str = "0x00000000000000000000000000000000000000AA";

    /// Names of backend and contract calls, in the order they were made.
    pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

    fn record(calls: &CallLog, name: &'static str) {
        calls.lock().unwrap().push(name);
    }

    #[derive(Debug)]
    pub struct FakeChoreography {
        pub state: AtomicUsize,
        pub sent: AtomicUsize,
        pub calls: CallLog,
    }

    impl FakeChoreography {
        pub fn new(state: u8) -> Self {
            Self::with_log(state, CallLog::default())
        }

        pub fn with_log(state: u8, calls: CallLog) -> Self {
            Self {
                state: AtomicUsize::new(state as usize),
                sent: AtomicUsize::new(0),
                calls,
            }
        }
    }

    #[async_trait]
    impl ChoreographyInstance for FakeChoreography {
        fn address(&self) -> Address {
            Address::from_slice(&[0xcc; 20])
        }

        async fn timestamp(&self) -> Result<u64> {
            record(&self.calls, "timestamp");
            Ok(1_543_568_400)
        }

        async fn proposer(&self) -> Result<String> {
            record(&self.calls, "proposer");
            Ok(PROPOSER.to_string())
        }

        async fn diff(&self) -> Result<String> {
            record(&self.calls, "diff");
            Ok("<bpmn:task id=\"Task_1\"/>".to_string())
        }

        async fn state(&self) -> Result<u8> {
            record(&self.calls, "state");
            Ok(self.state.load(Ordering::SeqCst) as u8)
        }

        async fn send(&self, action: ContractAction) -> Result<B256> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            let next = match action {
                ContractAction::Approve => 1,
                ContractAction::Reject => 2,
            };
            self.state.store(next, Ordering::SeqCst);
            Ok(B256::repeat_byte(0x42))
        }
    }

    pub struct FakeBackend {
        pub accounts: Vec<Address>,
        pub fail_deploy: bool,
        pub deploys: AtomicUsize,
        pub state: u8,
        pub calls: CallLog,
    }

    impl FakeBackend {
        pub fn with_accounts(accounts: Vec<Address>) -> Self {
            Self {
                accounts,
                fail_deploy: false,
                deploys: AtomicUsize::new(0),
                state: 0,
                calls: CallLog::default(),
            }
        }
    }

    #[async_trait]
    impl ChoreographyBackend for FakeBackend {
        async fn accounts(&self) -> Result<Vec<Address>> {
            record(&self.calls, "accounts");
            Ok(self.accounts.clone())
        }

        async fn deploy(&self, config: &DeployConfig) -> Result<Arc<dyn ChoreographyInstance>> {
            self.deploys.fetch_add(1, Ordering::SeqCst);
            record(&self.calls, "deploy");
            assert_eq!(config.from, self.accounts[0]);
            assert_eq!(config.gas, 5_000_000);
            if self.fail_deploy {
                return Err(eyre!("connection refused"));
            }
            Ok(Arc::new(FakeChoreography::with_log(
                self.state,
                Arc::clone(&self.calls),
            )))
        }
    }

    pub fn loader(backend: Arc<FakeBackend>) -> CardLoader {
        CardLoader::new(
            backend,
            DeploySettings::default(),
            Arc::new(LocalIdentities),
            Arc::new(PlaceholderHistory),
        )
    }

    fn account(byte: u8) -> Address {
        Address::from_slice(&[byte; 20])
    }

    #[tokio::test]
    async fn test_no_account_sets_error_without_deploying() {
        let backend = Arc::new(FakeBackend::with_accounts(Vec::new()));
        let outcome = loader(Arc::clone(&backend)).initialize().await.unwrap();

        let mut state = ChangeCardState::default();
        state.commit(outcome);

        assert!(state.account_error);
        assert!(state.account.is_empty());
        assert!(state.contract.is_none());
        assert!(state.messages.is_empty());
        assert_eq!(backend.deploys.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_load_populates_state() {
        let mut backend = FakeBackend::with_accounts(vec![account(0x11), account(0x22)]);
        backend.state = 1;
        let backend = Arc::new(backend);
        let outcome = loader(Arc::clone(&backend)).initialize().await.unwrap();

        let mut state = ChangeCardState::default();
        state.commit(outcome);

        assert_eq!(state.account, account(0x11).to_string());
        assert!(!state.account_error);
        assert_eq!(state.timestamp.timestamp(), 1_543_568_400);
        assert_eq!(state.diff, "<bpmn:task id=\"Task_1\"/>");
        assert_eq!(state.proposer, User::new(PROPOSER, "friedow"));
        assert_eq!(state.state.as_u8(), 1);
        assert!(state.contract.is_some());
        assert_eq!(backend.deploys.load(Ordering::SeqCst), 1);

        let names: Vec<&str> = state
            .messages
            .iter()
            .map(|m| m.user.display_name.as_str())
            .collect();
        assert_eq!(names, ["friedow", "MaximilianV", "bptlab"]);

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            ["accounts", "deploy", "timestamp", "proposer", "diff", "state"]
        );
    }

    #[tokio::test]
    async fn test_failed_deploy_stops_before_reads() {
        let mut backend = FakeBackend::with_accounts(vec![account(0x11)]);
        backend.fail_deploy = true;
        let backend = Arc::new(backend);

        let result = loader(Arc::clone(&backend)).initialize().await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(backend.deploys.load(Ordering::SeqCst), 1);
        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(calls, ["accounts", "deploy"]);
    }

    #[test]
    fn test_default_state() {
        let state = ChangeCardState::default();
        assert_eq!(state.state, ChangeState::Ready);
        assert!(state.account.is_empty());
        assert!(state.diff.is_empty());
    }
}
