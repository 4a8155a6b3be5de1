//! Deploys the application contracts

use alloy_primitives::Bytes;
use async_trait::async_trait;

use super::{Migration, MigrationContext};
use crate::{
    artifacts::{ArtifactRegistry, ContractScope},
    constants::{HEDGE_MANAGER_CONTRACT, LOOT_BLOCKS_CONTRACT, LOOT_CONTROLS_CONTRACT},
    errors::DeployError,
    utils::address_constructor_args,
};

/// The second migration, deploying `HedgeManager` followed by `LootBlocks`
///
/// Only `HedgeManager` is declared, so the `LootBlocks` deployment fails with
/// an unresolved reference once `HedgeManager` is deployed.
pub struct DeployContracts {
    /// The contracts this migration uses
    scope: ContractScope,
}

impl DeployContracts {
    /// The migration id
    pub const ID: u64 = 2;

    /// The migration name
    pub const NAME: &'static str = "deploy_contracts";

    /// Resolve the migration's contracts
    pub fn new(artifacts: &ArtifactRegistry) -> Result<Self, DeployError> {
        let scope = artifacts.scope(&[HEDGE_MANAGER_CONTRACT])?;
        Ok(Self { scope })
    }
}

#[async_trait]
impl Migration for DeployContracts {
    fn id(&self) -> u64 {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, ctx: &mut MigrationContext<'_>) -> Result<(), DeployError> {
        let hedge_manager = self.scope.get(HEDGE_MANAGER_CONTRACT)?;
        ctx.deploy(hedge_manager, Bytes::new()).await?;

        let loot_blocks = self.scope.get(LOOT_BLOCKS_CONTRACT)?;
        let loot_controls = self.scope.get(LOOT_CONTROLS_CONTRACT)?;
        let constructor_args = address_constructor_args(ctx.address_of(loot_controls)?);
        ctx.deploy(loot_blocks, constructor_args).await?;

        Ok(())
    }
}
