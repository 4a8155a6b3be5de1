//! Constants used in the migrations

/// The name of the bookkeeping contract deployed by the initial migration
pub const MIGRATIONS_CONTRACT: &str = "Migrations";

/// The name of the hedge manager contract
pub const HEDGE_MANAGER_CONTRACT: &str = "HedgeManager";

/// The name of the loot blocks contract
pub const LOOT_BLOCKS_CONTRACT: &str = "LootBlocks";

/// The name of the loot controls contract, whose address
/// parameterizes the loot blocks constructor
pub const LOOT_CONTROLS_CONTRACT: &str = "LootControls";

/// The number of confirmations to wait for a contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The default network name
pub const DEFAULT_NETWORK: &str = "development";

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_PATH: &str = "build/contracts";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The extension of compiled contract artifact files
pub const ARTIFACT_EXTENSION: &str = "json";
