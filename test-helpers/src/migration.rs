//! A migration that records when it runs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hedge_migrations::{
    errors::DeployError,
    migrations::{Migration, MigrationContext},
};

/// The ids of the migrations that have run, in order
pub type RunLog = Arc<Mutex<Vec<u64>>>;

/// A migration that appends its id to a shared log, then optionally fails
pub struct RecordingMigration {
    /// The migration id
    id: u64,
    /// The migration name
    name: String,
    /// The shared log of runs
    log: RunLog,
    /// Whether the migration fails after logging
    fail: bool,
}

impl RecordingMigration {
    pub fn new(id: u64, log: &RunLog) -> Self {
        Self {
            id,
            name: format!("step_{}", id),
            log: log.clone(),
            fail: false,
        }
    }

    /// Make the migration fail after it records its run
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Box the migration for a migrator
    pub fn boxed(self) -> Box<dyn Migration> {
        Box::new(self)
    }
}

/// The ids recorded in a run log
pub fn recorded(log: &RunLog) -> Vec<u64> {
    log.lock().map(|ids| ids.clone()).unwrap_or_default()
}

#[async_trait]
impl Migration for RecordingMigration {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _ctx: &mut MigrationContext<'_>) -> Result<(), DeployError> {
        if let Ok(mut ids) = self.log.lock() {
            ids.push(self.id);
        }

        if self.fail {
            return Err(DeployError::ContractDeployment(format!(
                "{} failed",
                self.name
            )));
        }

        Ok(())
    }
}
