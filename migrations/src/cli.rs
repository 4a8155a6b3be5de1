//! Definitions of CLI arguments and commands for the migrations

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    artifacts::ArtifactRegistry,
    constants::{
        DEFAULT_ARTIFACTS_PATH, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NETWORK, DEFAULT_RPC_URL,
    },
    deployer::ChainDeployer,
    deployments::Deployments,
    errors::DeployError,
    migrations,
    runner::{MigrateOptions, Migrator},
};

/// Deploy the HedgeManager contracts to an EVM chain
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private key of the deployer
    #[arg(long = "pkey", env = "PKEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// The name of the network, used to key the deployments file
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Directory containing the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_PATH", default_value = DEFAULT_ARTIFACTS_PATH)]
    pub artifacts_path: PathBuf,

    /// Path of the deployments file
    #[arg(long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the pending migrations
    Migrate(MigrateArgs),
    /// Show which migrations have completed on the network
    Status,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Run all migrations from the beginning, ignoring recorded completion
    #[arg(long)]
    pub reset: bool,

    /// Only run migrations with this id or higher
    #[arg(short, long)]
    pub from: Option<u64>,

    /// Only run migrations with this id or lower
    #[arg(short, long)]
    pub to: Option<u64>,
}

impl From<&MigrateArgs> for MigrateOptions {
    fn from(args: &MigrateArgs) -> Self {
        MigrateOptions {
            reset: args.reset,
            from: args.from,
            to: args.to,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<(), DeployError> {
        match &self.command {
            Command::Migrate(args) => self.migrate(args).await,
            Command::Status => self.status(&mut io::stdout().lock()),
        }
    }

    /// Run the pending migrations against the configured RPC node
    pub async fn migrate(&self, args: &MigrateArgs) -> Result<(), DeployError> {
        let priv_key = self.priv_key.as_deref().ok_or_else(|| {
            DeployError::ClientInitialization("no private key given".to_string())
        })?;

        let artifacts = ArtifactRegistry::load(&self.artifacts_path)?;
        info!(
            "Loaded {} artifacts from {}",
            artifacts.len(),
            self.artifacts_path.display()
        );
        let migrator = Migrator::new(migrations::all(&artifacts)?)?;
        let mut deployments = Deployments::load(&self.deployments_path)?;

        let mut deployer = ChainDeployer::connect(priv_key, &self.rpc_url, &self.network).await?;
        let report = migrator
            .run(&mut deployer, &mut deployments, &MigrateOptions::from(args))
            .await?;
        info!(
            "Executed migrations {:?}, skipped {:?}",
            report.executed, report.skipped
        );

        Ok(())
    }

    /// Write each migration's completion and the recorded addresses for the
    /// network. Reads only the deployments file.
    pub fn status(&self, out: &mut impl Write) -> Result<(), DeployError> {
        let deployments = Deployments::load(&self.deployments_path)?;
        write_status(out, &deployments, &self.network)
            .map_err(|e| DeployError::Output(e.to_string()))
    }
}

fn write_status(out: &mut impl Write, deployments: &Deployments, network: &str) -> io::Result<()> {
    let record = deployments.network(network).cloned().unwrap_or_default();

    writeln!(out, "Network: {}", network)?;
    for (id, name) in migrations::manifest() {
        let state = if record.is_completed(id) {
            "completed"
        } else {
            "pending"
        };
        writeln!(out, "\t{}_{}: {}", id, name, state)?;
    }

    for (name, address) in &record.contracts {
        writeln!(out, "\t{}: {}", name, address)?;
    }

    Ok(())
}
