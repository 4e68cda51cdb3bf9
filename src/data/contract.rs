use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use alloy::sol;
use async_trait::async_trait;
use color_eyre::eyre::Result;

use crate::data::types::ContractAction;

// ABI of the Choreography change-review contract
sol! {
    #[allow(missing_docs)]
    interface IChoreography {
        function timestamp() external view returns (uint256);
        function proposer() external view returns (address);
        function diff() external view returns (string);
        function state() external view returns (uint8);
        function approve() external;
        function reject() external;
    }
}

/// Gas limit applied to deployments and writes unless overridden.
pub const DEFAULT_GAS: u64 = 5_000_000;

/// Deployment parameters that are known before any account is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    pub gas: u64,
    pub display_name: String,
    pub contact: String,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            gas: DEFAULT_GAS,
            display_name: "friedow".to_string(),
            contact: "friedow@example.org".to_string(),
        }
    }
}

/// Everything a backend needs to deploy one contract instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub from: Address,
    pub gas: u64,
    pub display_name: String,
    pub contact: String,
}

impl DeployConfig {
    pub fn new(from: Address, settings: &DeploySettings) -> Self {
        Self {
            from,
            gas: settings.gas,
            display_name: settings.display_name.clone(),
            contact: settings.contact.clone(),
        }
    }
}

/// A deployed Choreography contract.
#[async_trait]
pub trait ChoreographyInstance: fmt::Debug + Send + Sync {
    fn address(&self) -> Address;

    /// Creation time of the change in seconds since the Unix epoch.
    async fn timestamp(&self) -> Result<u64>;

    async fn proposer(&self) -> Result<String>;

    async fn diff(&self) -> Result<String>;

    /// Raw numeric value of the contract's `state` enum.
    async fn state(&self) -> Result<u8>;

    /// Submit a write and wait for it to be mined. Returns the transaction hash.
    async fn send(&self, action: ContractAction) -> Result<B256>;
}

/// Connectivity to a node that manages accounts and can deploy Choreography contracts.
#[async_trait]
pub trait ChoreographyBackend: Send + Sync {
    async fn accounts(&self) -> Result<Vec<Address>>;

    async fn deploy(&self, config: &DeployConfig) -> Result<Arc<dyn ChoreographyInstance>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_deploy_config_from_settings() {
        let from = Address::from_slice(&[0x11; 20]);
        let config = DeployConfig::new(from, &DeploySettings::default());
        assert_eq!(config.from, from);
        assert_eq!(config.gas, 5_000_000);
        assert_eq!(config.display_name, "friedow");
        assert_eq!(config.contact, "friedow@example.org");
    }

    #[test]
    fn test_read_selectors_are_distinct() {
        let selectors = [
            IChoreography::timestampCall::SELECTOR,
            IChoreography::proposerCall::SELECTOR,
            IChoreography::diffCall::SELECTOR,
            IChoreography::stateCall::SELECTOR,
            IChoreography::approveCall::SELECTOR,
            IChoreography::rejectCall::SELECTOR,
        ];
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_calls_encode_to_bare_selector() {
        let data = IChoreography::diffCall {}.abi_encode();
        assert_eq!(data.len(), 4);
        assert_eq!(&data[..], &IChoreography::diffCall::SELECTOR[..]);
    }
}
