use std::fmt;
use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::data::artifact::ContractArtifact;
use crate::data::contract::{ChoreographyBackend, ChoreographyInstance, DeployConfig, IChoreography};
use crate::data::types::ContractAction;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Talks to a node over JSON-RPC and relies on its unlocked accounts for signing.
pub struct AlloyBackend {
    provider: DynProvider,
    creation_code: Bytes,
}

impl AlloyBackend {
    /// Connect to an Ethereum node via HTTP RPC.
    pub async fn connect(rpc_url: &str, artifact: &ContractArtifact) -> Result<Self> {
        let url = rpc_url
            .parse()
            .wrap_err_with(|| format!("Invalid RPC URL {rpc_url}"))?;
        let provider = ProviderBuilder::new().on_http(url);
        let chain_id = provider
            .get_chain_id()
            .await
            .wrap_err("Node did not answer eth_chainId")?;
        tracing::info!(chain_id, rpc_url, "connected to node");
        Ok(Self {
            provider: Arc::new(provider),
            creation_code: artifact.creation_code()?,
        })
    }
}

#[async_trait]
impl ChoreographyBackend for AlloyBackend {
    async fn accounts(&self) -> Result<Vec<Address>> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .wrap_err("Failed to list accounts")?;
        tracing::debug!(count = accounts.len(), "accounts available");
        Ok(accounts)
    }

    async fn deploy(&self, config: &DeployConfig) -> Result<Arc<dyn ChoreographyInstance>> {
        let args = (config.display_name.clone(), config.contact.clone()).abi_encode_params();
        let mut code = self.creation_code.to_vec();
        code.extend_from_slice(&args);

        let tx = TransactionRequest::default()
            .with_from(config.from)
            .with_gas_limit(config.gas)
            .with_deploy_code(code);

        tracing::info!(from = %config.from, gas = config.gas, "deploying Choreography");
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .wrap_err("Deployment transaction was rejected")?
            .get_receipt()
            .await
            .wrap_err("Deployment was not mined")?;

        if !receipt.status() {
            return Err(eyre!(
                "Deployment transaction {} reverted",
                receipt.transaction_hash
            ));
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| eyre!("Deployment receipt has no contract address"))?;
        tracing::info!(%address, "Choreography deployed");

        Ok(Arc::new(AlloyChoreography {
            provider: Arc::clone(&self.provider),
            address,
            from: config.from,
            gas: config.gas,
        }))
    }
}

/// A deployed contract reached through the shared provider.
pub struct AlloyChoreography {
    provider: DynProvider,
    address: Address,
    from: Address,
    gas: u64,
}

impl AlloyChoreography {
    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode());
        let data = self
            .provider
            .call(tx)
            .await
            .wrap_err_with(|| format!("eth_call {} failed", C::SIGNATURE))?;
        let ret = C::abi_decode_returns(&data, true)
            .wrap_err_with(|| format!("Could not decode {} result", C::SIGNATURE))?;
        Ok(ret)
    }
}

impl fmt::Debug for AlloyChoreography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyChoreography")
            .field("address", &self.address)
            .field("from", &self.from)
            .field("gas", &self.gas)
            .finish()
    }
}

#[async_trait]
impl ChoreographyInstance for AlloyChoreography {
    fn address(&self) -> Address {
        self.address
    }

    async fn timestamp(&self) -> Result<u64> {
        let ret = self.call(IChoreography::timestampCall {}).await?;
        u64::try_from(ret._0).map_err(|_| eyre!("Contract timestamp {} is out of range", ret._0))
    }

    async fn proposer(&self) -> Result<String> {
        let ret = self.call(IChoreography::proposerCall {}).await?;
        Ok(ret._0.to_string())
    }

    async fn diff(&self) -> Result<String> {
        let ret = self.call(IChoreography::diffCall {}).await?;
        Ok(ret._0)
    }

    async fn state(&self) -> Result<u8> {
        let ret = self.call(IChoreography::stateCall {}).await?;
        Ok(ret._0)
    }

    async fn send(&self, action: ContractAction) -> Result<B256> {
        let input = match action {
            ContractAction::Approve => IChoreography::approveCall {}.abi_encode(),
            ContractAction::Reject => IChoreography::rejectCall {}.abi_encode(),
        };
        let tx = TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.address)
            .with_gas_limit(self.gas)
            .with_input(input);

        tracing::info!(%action, contract = %self.address, "sending transaction");
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .wrap_err_with(|| format!("{action} transaction was rejected"))?
            .get_receipt()
            .await
            .wrap_err_with(|| format!("{action} transaction was not mined"))?;

        if !receipt.status() {
            return Err(eyre!(
                "{action} transaction {} reverted",
                receipt.transaction_hash
            ));
        }
        Ok(receipt.transaction_hash)
    }
}
