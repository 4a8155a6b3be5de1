//! Runs migrations in order against a deployer, recording their completion

use std::collections::BTreeSet;

use tracing::{debug, error, info};

use crate::{
    deployer::Deployer,
    deployments::Deployments,
    errors::DeployError,
    migrations::{Migration, MigrationContext},
};

/// Options controlling which migrations run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Run every migration in range, including those already completed
    pub reset: bool,
    /// Skip migrations with a lower id
    pub from: Option<u64>,
    /// Skip migrations with a higher id
    pub to: Option<u64>,
}

impl MigrateOptions {
    /// Whether the given id falls within the `from`/`to` bounds
    fn in_range(&self, id: u64) -> bool {
        self.from.map_or(true, |from| id >= from) && self.to.map_or(true, |to| id <= to)
    }
}

/// The outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// The ids of the migrations that ran, in order
    pub executed: Vec<u64>,
    /// The ids of the migrations that were skipped, in order
    pub skipped: Vec<u64>,
}

/// An ordered set of migrations
pub struct Migrator {
    /// The migrations, sorted by id
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Order the given migrations by id, rejecting duplicate ids
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> Result<Self, DeployError> {
        let mut seen = BTreeSet::new();
        for migration in &migrations {
            if !seen.insert(migration.id()) {
                return Err(DeployError::DuplicateMigration(migration.id()));
            }
        }

        migrations.sort_by_key(|m| m.id());
        Ok(Self { migrations })
    }

    /// The migrations in the order they run
    pub fn migrations(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| m.as_ref())
    }

    /// Run every pending migration in order, stopping at the first failure.
    ///
    /// Completion is recorded and persisted after each migration. Addresses of
    /// contracts deployed by a failing migration are persisted as well, on a
    /// best-effort basis: the migration's own error is always the one returned.
    ///
    /// Completion is a high-water mark, so every migration at or below the last
    /// completed id counts as done. Running with `reset` moves the mark to the
    /// last migration that ran, which may lower it.
    pub async fn run(
        &self,
        deployer: &mut dyn Deployer,
        deployments: &mut Deployments,
        options: &MigrateOptions,
    ) -> Result<MigrationReport, DeployError> {
        let network = deployer.network().to_string();
        let mut report = MigrationReport::default();

        for migration in &self.migrations {
            let id = migration.id();
            let completed = !options.reset
                && deployments
                    .network(&network)
                    .is_some_and(|record| record.is_completed(id));
            if completed || !options.in_range(id) {
                debug!("Skipping migration {}_{}", id, migration.name());
                report.skipped.push(id);
                continue;
            }

            info!("Running migration {}_{} on {}", id, migration.name(), network);
            let res = {
                let mut ctx = MigrationContext::new(deployer, deployments.network_mut(&network));
                migration.run(&mut ctx).await
            };

            if let Err(e) = res {
                error!("Migration {}_{} failed: {}", id, migration.name(), e);
                if let Err(save_err) = deployments.save() {
                    error!("Could not record partial deployments: {}", save_err);
                }
                return Err(DeployError::MigrationFailed {
                    id,
                    name: migration.name().to_string(),
                    source: Box::new(e),
                });
            }

            deployments.network_mut(&network).last_completed_migration = Some(id);
            deployments.save()?;
            report.executed.push(id);
        }

        info!(
            "Finished migrating {}: {} executed, {} skipped",
            network,
            report.executed.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
