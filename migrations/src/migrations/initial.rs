//! Deploys the bookkeeping contract

use alloy_primitives::Bytes;
use async_trait::async_trait;
use tracing::info;

use super::{Migration, MigrationContext};
use crate::{
    artifacts::{ArtifactRegistry, ContractScope},
    constants::MIGRATIONS_CONTRACT,
    errors::DeployError,
};

/// The first migration, deploying the `Migrations` contract
pub struct InitialMigration {
    /// The contracts this migration uses
    scope: ContractScope,
}

impl InitialMigration {
    /// The migration id
    pub const ID: u64 = 1;

    /// The migration name
    pub const NAME: &'static str = "initial_migration";

    /// Resolve the migration's contracts
    pub fn new(artifacts: &ArtifactRegistry) -> Result<Self, DeployError> {
        let scope = artifacts.scope(&[MIGRATIONS_CONTRACT])?;
        Ok(Self { scope })
    }
}

#[async_trait]
impl Migration for InitialMigration {
    fn id(&self) -> u64 {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, ctx: &mut MigrationContext<'_>) -> Result<(), DeployError> {
        info!("Using network: {}", ctx.network());
        info!("Using accounts: {:?}", ctx.accounts());

        let migrations = self.scope.get(MIGRATIONS_CONTRACT)?;
        ctx.deploy(migrations, Bytes::new()).await?;

        Ok(())
    }
}
