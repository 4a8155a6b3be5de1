//! The deployer handle through which migrations create contracts

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{constants::NUM_DEPLOY_CONFIRMATIONS, errors::DeployError, utils::setup_client};

/// A contract deployed by a migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The contract name
    pub name: String,
    /// The address the contract was deployed at
    pub address: Address,
}

/// The capability to submit a contract creation and await its confirmation
#[async_trait]
pub trait Deployer: Send {
    /// The name of the network being deployed to
    fn network(&self) -> &str;

    /// The accounts available for signing, in order
    fn accounts(&self) -> &[String];

    /// Submit the given creation code (bytecode followed by encoded constructor
    /// arguments) and wait for it to be confirmed, returning the new address
    async fn deploy(&mut self, name: &str, creation_code: Bytes) -> Result<Address, DeployError>;
}

/// A [`Deployer`] that sends creation transactions to an RPC node
pub struct ChainDeployer {
    /// The signing provider
    provider: DynProvider,
    /// The name of the network
    network: String,
    /// The accounts available on the network, the signer first
    accounts: Vec<String>,
    /// The number of confirmations to wait for each deployment
    confirmations: u64,
}

impl ChainDeployer {
    /// Connect to the given RPC url with the given private key
    pub async fn connect(
        priv_key: &str,
        rpc_url: &str,
        network: &str,
    ) -> Result<Self, DeployError> {
        let (provider, signer_address) = setup_client(priv_key, rpc_url).await?;

        let mut accounts = vec![signer_address];
        match provider.get_accounts().await {
            Ok(node_accounts) => {
                accounts.extend(node_accounts.into_iter().filter(|a| *a != signer_address))
            }
            Err(e) => warn!("Could not list node accounts, using the signer only: {}", e),
        }

        Ok(Self {
            provider,
            network: network.to_string(),
            accounts: accounts.iter().map(|a| a.to_checksum(None)).collect(),
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
        })
    }
}

#[async_trait]
impl Deployer for ChainDeployer {
    fn network(&self) -> &str {
        &self.network
    }

    fn accounts(&self) -> &[String] {
        &self.accounts
    }

    async fn deploy(&mut self, name: &str, creation_code: Bytes) -> Result<Address, DeployError> {
        let tx = TransactionRequest::default().with_deploy_code(creation_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::ContractDeployment(format!("{}: {}", name, e)))?;
        debug!("Sent deployment of {} in tx {}", name, pending_tx.tx_hash());

        let receipt = pending_tx
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| DeployError::ContractDeployment(format!("{}: {}", name, e)))?;

        if !receipt.status() {
            return Err(DeployError::ContractDeployment(format!(
                "{}: transaction {} reverted",
                name, receipt.transaction_hash
            )));
        }

        receipt.contract_address.ok_or_else(|| {
            DeployError::ContractDeployment(format!("{}: receipt has no contract address", name))
        })
    }
}
