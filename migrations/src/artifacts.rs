//! Compiled contract artifacts and the explicit name -> artifact mapping
//! handed to each migration

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use alloy_primitives::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::{constants::ARTIFACT_EXTENSION, errors::DeployError};

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Construct an artifact from a name and creation bytecode
    pub fn new(name: impl Into<String>, bytecode: Bytes) -> Self {
        Self {
            name: name.into(),
            bytecode,
        }
    }

    /// Whether the artifact carries no creation bytecode, as is the case for
    /// interfaces and abstract contracts
    pub fn is_abstract(&self) -> bool {
        self.bytecode.is_empty()
    }
}

/// The on-disk layout of an artifact. Truffle writes the bytecode as a hex
/// string next to `contractName`, Foundry nests it under `bytecode.object`.
#[derive(Deserialize)]
struct RawArtifact {
    /// The contract name, absent in Foundry artifacts
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// See [`RawArtifact`]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// A bare hex string
    Hex(Bytes),
    /// A hex string nested in an object
    Object {
        /// The hex string
        object: Bytes,
    },
}

impl From<RawBytecode> for Bytes {
    fn from(raw: RawBytecode) -> Self {
        match raw {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        }
    }
}

/// Parse a single artifact file, falling back to the file stem for the name
pub fn parse_artifact_file(path: &Path) -> Result<ContractArtifact, DeployError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DeployError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
    let raw: RawArtifact = serde_json::from_str(&contents)
        .map_err(|e| DeployError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    let name = match raw.contract_name {
        Some(name) => name,
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                DeployError::ArtifactParsing(format!("{}: no contract name", path.display()))
            })?,
    };

    Ok(ContractArtifact::new(name, raw.bytecode.into()))
}

/// Every artifact available to the migrations, keyed by contract name
#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    /// The artifacts by name
    artifacts: BTreeMap<String, Arc<ContractArtifact>>,
}

impl ArtifactRegistry {
    /// Build a registry from a set of artifacts
    pub fn from_artifacts(
        artifacts: impl IntoIterator<Item = ContractArtifact>,
    ) -> Result<Self, DeployError> {
        let mut registry = Self::default();
        for artifact in artifacts {
            registry.insert(artifact)?;
        }

        Ok(registry)
    }

    /// Load every `.json` artifact in the given directory
    pub fn load(dir: &Path) -> Result<Self, DeployError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| DeployError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION))
            .collect();
        paths.sort();

        let mut registry = Self::default();
        for path in paths {
            let artifact = parse_artifact_file(&path)?;
            debug!("Loaded artifact {} from {}", artifact.name, path.display());
            registry.insert(artifact)?;
        }

        Ok(registry)
    }

    /// Add an artifact, refusing to shadow an existing name
    fn insert(&mut self, artifact: ContractArtifact) -> Result<(), DeployError> {
        if self.artifacts.contains_key(&artifact.name) {
            return Err(DeployError::ArtifactParsing(format!(
                "duplicate artifact for {}",
                artifact.name
            )));
        }

        self.artifacts
            .insert(artifact.name.clone(), Arc::new(artifact));
        Ok(())
    }

    /// The artifact with the given name
    pub fn get(&self, name: &str) -> Result<Arc<ContractArtifact>, DeployError> {
        self.artifacts
            .get(name)
            .cloned()
            .ok_or_else(|| DeployError::ArtifactNotFound(name.to_string()))
    }

    /// The number of artifacts in the registry
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Resolve the named contracts into a scope. Fails if any of them has no
    /// artifact.
    pub fn scope(&self, names: &[&str]) -> Result<ContractScope, DeployError> {
        let contracts = names
            .iter()
            .map(|name| self.get(name).map(|artifact| (name.to_string(), artifact)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(ContractScope { contracts })
    }
}

/// The contracts a single migration declared. Lookups of anything else are
/// unresolved references.
#[derive(Debug, Clone, Default)]
pub struct ContractScope {
    /// The declared contracts
    contracts: BTreeMap<String, Arc<ContractArtifact>>,
}

impl ContractScope {
    /// The declared contract with the given name
    pub fn get(&self, name: &str) -> Result<&ContractArtifact, DeployError> {
        self.contracts
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| DeployError::UnresolvedReference(name.to_string()))
    }
}
