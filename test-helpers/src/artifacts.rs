//! Artifact fixtures

use std::{fs, path::Path};

use alloy_primitives::Bytes;
use eyre::Result;
use hedge_migrations::{
    artifacts::{ArtifactRegistry, ContractArtifact},
    constants::{
        HEDGE_MANAGER_CONTRACT, LOOT_BLOCKS_CONTRACT, LOOT_CONTROLS_CONTRACT, MIGRATIONS_CONTRACT,
    },
};

/// A stand-in creation bytecode, distinct per contract
pub fn dummy_bytecode(seed: u8) -> Bytes {
    Bytes::from(vec![0x60, 0x80, 0x60, 0x40, seed])
}

/// Artifacts for every contract the migrations mention, including the ones
/// the second migration never declares
pub fn fixture_artifacts() -> Vec<ContractArtifact> {
    [
        MIGRATIONS_CONTRACT,
        HEDGE_MANAGER_CONTRACT,
        LOOT_BLOCKS_CONTRACT,
        LOOT_CONTROLS_CONTRACT,
    ]
    .into_iter()
    .zip(1u8..)
    .map(|(name, seed)| ContractArtifact::new(name, dummy_bytecode(seed)))
    .collect()
}

/// A registry over [`fixture_artifacts`]
pub fn fixture_registry() -> ArtifactRegistry {
    ArtifactRegistry::from_artifacts(fixture_artifacts())
        .expect("fixture artifacts have distinct names")
}

/// Write the given artifacts to a directory in the Truffle layout
pub fn write_artifacts(dir: &Path, artifacts: &[ContractArtifact]) -> Result<()> {
    for artifact in artifacts {
        let json = serde_json::json!({
            "contractName": artifact.name,
            "abi": [],
            "bytecode": artifact.bytecode,
        });
        fs::write(
            dir.join(format!("{}.json", artifact.name)),
            serde_json::to_string_pretty(&json)?,
        )?;
    }

    Ok(())
}
