//! The record of deployed contracts and completed migrations, persisted
//! to a `deployments.json` file

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DeployError;

/// The deployments of a single network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeployments {
    /// The id of the last migration that ran to completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_migration: Option<u64>,
    /// Deployed contract addresses by contract name
    #[serde(default)]
    pub contracts: BTreeMap<String, Address>,
}

impl NetworkDeployments {
    /// The recorded address of a contract
    pub fn address(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).copied()
    }

    /// Record the address of a contract, replacing any earlier deployment
    pub fn record(&mut self, name: &str, address: Address) {
        self.contracts.insert(name.to_string(), address);
    }

    /// Whether the migration with the given id has already completed
    pub fn is_completed(&self, id: u64) -> bool {
        self.last_completed_migration.is_some_and(|last| id <= last)
    }
}

/// The serialized form of the deployments file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DeploymentsFile {
    /// Deployments keyed by network name
    #[serde(default)]
    networks: BTreeMap<String, NetworkDeployments>,
}

/// Deployments across all networks, optionally backed by a file
#[derive(Debug, Clone, Default)]
pub struct Deployments {
    /// The file the deployments are persisted to, if any
    path: Option<PathBuf>,
    /// The deployment records
    inner: DeploymentsFile,
}

impl Deployments {
    /// An empty record that is never persisted
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the deployments file at the given path. A missing file is an
    /// empty record, which will be created on the first save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DeployError> {
        let path = path.into();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", path.display(), e)))?
        } else {
            debug!("No deployments file at {}, starting empty", path.display());
            DeploymentsFile::default()
        };

        Ok(Self {
            path: Some(path),
            inner,
        })
    }

    /// The path backing this record, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The deployments of a network, if any have been recorded
    pub fn network(&self, network: &str) -> Option<&NetworkDeployments> {
        self.inner.networks.get(network)
    }

    /// The deployments of a network, creating an empty entry if needed
    pub fn network_mut(&mut self, network: &str) -> &mut NetworkDeployments {
        self.inner
            .networks
            .entry(network.to_string())
            .or_default()
    }

    /// Write the record to its backing file. A no-op for in-memory records.
    pub fn save(&self) -> Result<(), DeployError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.inner)
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| DeployError::WriteDeployments(format!("{}: {}", path.display(), e)))?;

        debug!("Wrote deployments to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy_primitives::Address;

    use super::Deployments;
    use crate::errors::DeployError;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let deployments = Deployments::load(dir.path().join("deployments.json")).unwrap();
        assert!(deployments.network("development").is_none());
    }

    #[test]
    fn test_saved_record_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        let mut deployments = Deployments::load(&path).unwrap();
        let development = deployments.network_mut("development");
        development.record("Migrations", Address::with_last_byte(1));
        development.last_completed_migration = Some(1);
        deployments.save().unwrap();

        let reloaded = Deployments::load(&path).unwrap();
        let development = reloaded.network("development").unwrap();
        assert_eq!(development.address("Migrations"), Some(Address::with_last_byte(1)));
        assert!(development.is_completed(1));
        assert!(!development.is_completed(2));
        assert!(reloaded.network("mainnet").is_none());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Deployments::load(&path).unwrap_err();
        assert!(matches!(err, DeployError::ReadDeployments(_)));
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut deployments = Deployments::in_memory();
        deployments
            .network_mut("development")
            .record("Migrations", Address::ZERO);
        deployments.save().unwrap();
        assert!(deployments.path().is_none());
    }
}
