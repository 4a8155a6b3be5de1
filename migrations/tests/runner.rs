use std::{
    fs,
    sync::{Arc, Mutex},
};

use eyre::Result;
use hedge_migrations::{
    artifacts::ArtifactRegistry,
    deployments::Deployments,
    errors::DeployError,
    migrations,
    runner::{MigrateOptions, Migrator},
};
use test_helpers::{
    artifacts::{fixture_artifacts, fixture_registry, write_artifacts},
    deployer::MockDeployer,
    migration::{recorded, RecordingMigration, RunLog},
};

fn run_log() -> RunLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test]
async fn test_runs_in_ascending_id_order() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(10, &log).boxed(),
        RecordingMigration::new(2, &log).boxed(),
        RecordingMigration::new(7, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::in_memory();

    let report = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await?;

    assert_eq!(recorded(&log), vec![2, 7, 10]);
    assert_eq!(report.executed, vec![2, 7, 10]);
    assert!(report.skipped.is_empty());
    assert_eq!(
        deployments.network("development").unwrap().last_completed_migration,
        Some(10)
    );

    Ok(())
}

#[tokio::test]
async fn test_failure_halts_remaining_migrations() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(1, &log).boxed(),
        RecordingMigration::new(2, &log).failing().boxed(),
        RecordingMigration::new(3, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::in_memory();

    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::MigrationFailed { id: 2, ref name, .. } if name == "step_2"));
    assert_eq!(recorded(&log), vec![1, 2]);
    assert_eq!(
        deployments.network("development").unwrap().last_completed_migration,
        Some(1)
    );

    Ok(())
}

#[tokio::test]
async fn test_rerun_skips_completed_migrations() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(1, &log).boxed(),
        RecordingMigration::new(2, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::in_memory();
    deployments.network_mut("development").last_completed_migration = Some(1);

    let report = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await?;

    assert_eq!(recorded(&log), vec![2]);
    assert_eq!(report.skipped, vec![1]);
    assert_eq!(report.executed, vec![2]);

    Ok(())
}

#[tokio::test]
async fn test_completion_is_per_network() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![RecordingMigration::new(1, &log).boxed()])?;
    let mut deployments = Deployments::in_memory();
    deployments.network_mut("development").last_completed_migration = Some(1);

    let mut deployer = MockDeployer::new("mainnet", &["0xA"]);
    migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await?;

    assert_eq!(recorded(&log), vec![1]);
    Ok(())
}

#[tokio::test]
async fn test_reset_and_bounds() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(1, &log).boxed(),
        RecordingMigration::new(2, &log).boxed(),
        RecordingMigration::new(3, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::in_memory();
    deployments.network_mut("development").last_completed_migration = Some(3);

    let options = MigrateOptions {
        reset: true,
        from: Some(2),
        to: Some(2),
    };
    let report = migrator
        .run(&mut deployer, &mut deployments, &options)
        .await?;

    assert_eq!(recorded(&log), vec![2]);
    assert_eq!(report.skipped, vec![1, 3]);

    Ok(())
}

#[tokio::test]
async fn test_project_migrations_persist_progress() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifacts_dir = dir.path().join("contracts");
    fs::create_dir(&artifacts_dir)?;
    write_artifacts(&artifacts_dir, &fixture_artifacts())?;
    let deployments_path = dir.path().join("deployments.json");

    let artifacts = ArtifactRegistry::load(&artifacts_dir)?;
    let migrator = Migrator::new(migrations::all(&artifacts)?)?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::load(&deployments_path)?;

    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), DeployError::UnresolvedReference(name) if name == "LootBlocks"));
    assert_eq!(deployer.deployed_names(), vec!["Migrations", "HedgeManager"]);

    // The first migration is recorded as complete and the partial deployment kept
    let reloaded = Deployments::load(&deployments_path)?;
    let development = reloaded.network("development").unwrap();
    assert_eq!(development.last_completed_migration, Some(1));
    assert!(development.address("Migrations").is_some());
    assert!(development.address("HedgeManager").is_some());

    // A rerun skips the initial migration and fails the same way
    let mut deployer = MockDeployer::development();
    let mut deployments = reloaded;
    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::MigrationFailed { id: 2, .. }));
    assert_eq!(deployer.deployed_names(), vec!["HedgeManager"]);

    Ok(())
}

#[tokio::test]
async fn test_deploy_failure_halts_project_migrations() -> Result<()> {
    let migrator = Migrator::new(migrations::all(&fixture_registry())?)?;
    let mut deployer = MockDeployer::development().failing_on("Migrations");
    let mut deployments = Deployments::in_memory();

    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::MigrationFailed { id: 1, .. }));
    assert!(matches!(err.root_cause(), DeployError::ContractDeployment(_)));
    assert!(deployer.deployed.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_failure_error_survives_unwritable_deployments() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let deployments_path = dir.path().join("missing").join("deployments.json");

    let log = run_log();
    let migrator = Migrator::new(vec![RecordingMigration::new(1, &log).failing().boxed()])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::load(&deployments_path)?;

    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();

    // The write failure is logged, the migration's own error is returned
    assert!(matches!(err, DeployError::MigrationFailed { id: 1, .. }));
    assert!(matches!(err.root_cause(), DeployError::ContractDeployment(_)));
    assert!(!deployments_path.exists());

    Ok(())
}

#[tokio::test]
async fn test_write_failure_after_success_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let deployments_path = dir.path().join("missing").join("deployments.json");

    let log = run_log();
    let migrator = Migrator::new(vec![RecordingMigration::new(1, &log).boxed()])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::load(&deployments_path)?;

    let err = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::WriteDeployments(_)));

    Ok(())
}

#[tokio::test]
async fn test_completion_is_a_high_water_mark() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(1, &log).boxed(),
        RecordingMigration::new(2, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::development();
    let mut deployments = Deployments::in_memory();

    // Starting past the first migration still moves the mark beyond it
    let options = MigrateOptions {
        from: Some(2),
        ..Default::default()
    };
    migrator.run(&mut deployer, &mut deployments, &options).await?;
    assert_eq!(recorded(&log), vec![2]);
    let development = deployments.network("development").unwrap();
    assert_eq!(development.last_completed_migration, Some(2));
    assert!(development.is_completed(1));

    // A reset bounded below the mark lowers it
    let options = MigrateOptions {
        reset: true,
        to: Some(1),
        ..Default::default()
    };
    migrator.run(&mut deployer, &mut deployments, &options).await?;
    assert_eq!(recorded(&log), vec![2, 1]);
    assert_eq!(
        deployments.network("development").unwrap().last_completed_migration,
        Some(1)
    );

    // So a plain rerun executes the second migration again
    let report = migrator
        .run(&mut deployer, &mut deployments, &MigrateOptions::default())
        .await?;
    assert_eq!(report.executed, vec![2]);
    assert_eq!(report.skipped, vec![1]);

    Ok(())
}

#[tokio::test]
async fn test_skipped_run_leaves_no_network_entry() -> Result<()> {
    let log = run_log();
    let migrator = Migrator::new(vec![
        RecordingMigration::new(1, &log).boxed(),
        RecordingMigration::new(2, &log).boxed(),
    ])?;
    let mut deployer = MockDeployer::new("mainnet", &["0xA"]);
    let mut deployments = Deployments::in_memory();

    let options = MigrateOptions {
        from: Some(3),
        ..Default::default()
    };
    let report = migrator
        .run(&mut deployer, &mut deployments, &options)
        .await?;

    assert!(recorded(&log).is_empty());
    assert_eq!(report.skipped, vec![1, 2]);
    assert!(deployments.network("mainnet").is_none());

    Ok(())
}
