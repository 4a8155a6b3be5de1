//! Definitions of errors that can occur while running the migrations

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur while loading artifacts or running migrations
#[derive(Debug)]
pub enum DeployError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
    /// No artifact with the given name exists in the artifacts directory
    ArtifactNotFound(String),
    /// The artifact has no creation bytecode (an interface or abstract contract)
    AbstractContract(String),
    /// A migration referenced a contract that is not in its scope
    UnresolvedReference(String),
    /// A contract in scope has not been deployed on the active network
    NotDeployed(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error writing command output
    Output(String),
    /// Two migrations were registered under the same id
    DuplicateMigration(u64),
    /// A migration step failed, halting the run
    MigrationFailed {
        /// The id of the failed migration
        id: u64,
        /// The name of the failed migration
        name: String,
        /// The error the migration failed with
        source: Box<DeployError>,
    },
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            DeployError::ArtifactNotFound(s) => write!(f, "could not find artifact for {}", s),
            DeployError::AbstractContract(s) => {
                write!(f, "{} has no bytecode and cannot be deployed", s)
            }
            DeployError::UnresolvedReference(s) => write!(f, "{} is not defined", s),
            DeployError::NotDeployed(s) => {
                write!(f, "{} has not been deployed to the active network", s)
            }
            DeployError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            DeployError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            DeployError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            DeployError::Output(s) => write!(f, "error writing output: {}", s),
            DeployError::DuplicateMigration(id) => {
                write!(f, "migration id {} is registered more than once", id)
            }
            DeployError::MigrationFailed { id, name, .. } => {
                write!(f, "migration {}_{} failed", id, name)
            }
        }
    }
}

impl Error for DeployError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DeployError::MigrationFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl DeployError {
    /// The innermost error, unwrapping any migration failure context
    pub fn root_cause(&self) -> &DeployError {
        match self {
            DeployError::MigrationFailed { source, .. } => source.root_cause(),
            err => err,
        }
    }
}
