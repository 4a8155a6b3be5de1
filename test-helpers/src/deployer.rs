//! An in-memory deployer

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use hedge_migrations::{deployer::Deployer, errors::DeployError};

/// A [`Deployer`] that records every request and hands out sequential
/// addresses, optionally failing when asked to deploy a given contract
pub struct MockDeployer {
    /// The network name reported to migrations
    pub network: String,
    /// The accounts reported to migrations
    pub accounts: Vec<String>,
    /// The deployment requests received, in order
    pub deployed: Vec<(String, Bytes)>,
    /// A contract whose deployment fails, simulating an unreachable network
    pub fail_on: Option<String>,
}

impl MockDeployer {
    pub fn new(network: &str, accounts: &[&str]) -> Self {
        Self {
            network: network.to_string(),
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            deployed: Vec::new(),
            fail_on: None,
        }
    }

    /// A deployer on the development network with two accounts
    pub fn development() -> Self {
        Self::new("development", &["0xA", "0xB"])
    }

    /// Fail any deployment of the named contract
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    /// The names of the contracts deployed so far
    pub fn deployed_names(&self) -> Vec<&str> {
        self.deployed.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[async_trait]
impl Deployer for MockDeployer {
    fn network(&self) -> &str {
        &self.network
    }

    fn accounts(&self) -> &[String] {
        &self.accounts
    }

    async fn deploy(&mut self, name: &str, creation_code: Bytes) -> Result<Address, DeployError> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(DeployError::ContractDeployment(format!(
                "{}: network unreachable",
                name
            )));
        }

        self.deployed.push((name.to_string(), creation_code));
        Ok(Address::with_last_byte(self.deployed.len() as u8))
    }
}
