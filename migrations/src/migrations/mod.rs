//! The migration steps and the context they run in

mod deploy_contracts;
mod initial;

pub use deploy_contracts::DeployContracts;
pub use initial::InitialMigration;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::info;

use crate::{
    artifacts::{ArtifactRegistry, ContractArtifact},
    deployer::{DeployedContract, Deployer},
    deployments::NetworkDeployments,
    errors::DeployError,
    utils::creation_code,
};

/// A single, ordered unit of deployment work
#[async_trait]
pub trait Migration: Send + Sync {
    /// The position of the migration in the run, unique across migrations
    fn id(&self) -> u64;

    /// A human-readable name
    fn name(&self) -> &str;

    /// Run the migration. Errors are not recovered from; they halt the run.
    async fn run(&self, ctx: &mut MigrationContext<'_>) -> Result<(), DeployError>;
}

/// Build the project's migrations, resolving the contracts each one declares
pub fn all(artifacts: &ArtifactRegistry) -> Result<Vec<Box<dyn Migration>>, DeployError> {
    Ok(vec![
        Box::new(InitialMigration::new(artifacts)?),
        Box::new(DeployContracts::new(artifacts)?),
    ])
}

/// The id and name of each of the project's migrations, in run order. Does
/// not resolve any artifacts.
pub fn manifest() -> [(u64, &'static str); 2] {
    [
        (InitialMigration::ID, InitialMigration::NAME),
        (DeployContracts::ID, DeployContracts::NAME),
    ]
}

/// What a migration sees of the run: the deployer, the network and accounts,
/// and the addresses deployed so far on the network
pub struct MigrationContext<'a> {
    /// The deployer handle
    deployer: &'a mut dyn Deployer,
    /// The deployments of the active network
    deployments: &'a mut NetworkDeployments,
}

impl<'a> MigrationContext<'a> {
    /// Construct a context over a deployer and the active network's record
    pub fn new(deployer: &'a mut dyn Deployer, deployments: &'a mut NetworkDeployments) -> Self {
        Self {
            deployer,
            deployments,
        }
    }

    /// The name of the active network
    pub fn network(&self) -> &str {
        self.deployer.network()
    }

    /// The accounts available on the active network
    pub fn accounts(&self) -> &[String] {
        self.deployer.accounts()
    }

    /// Deploy a contract and record its address
    pub async fn deploy(
        &mut self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<DeployedContract, DeployError> {
        if artifact.is_abstract() {
            return Err(DeployError::AbstractContract(artifact.name.clone()));
        }

        info!("Deploying {}", artifact.name);
        let code = creation_code(&artifact.bytecode, &constructor_args);
        let address = self.deployer.deploy(&artifact.name, code).await?;

        self.deployments.record(&artifact.name, address);
        info!("{} deployed at {}", artifact.name, address);

        Ok(DeployedContract {
            name: artifact.name.clone(),
            address,
        })
    }

    /// The address a contract was deployed at on the active network
    pub fn address_of(&self, artifact: &ContractArtifact) -> Result<Address, DeployError> {
        self.deployments
            .address(&artifact.name)
            .ok_or_else(|| DeployError::NotDeployed(artifact.name.clone()))
    }
}
