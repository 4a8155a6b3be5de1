//! Common helpers used in the migrations' integration tests

pub mod artifacts;
pub mod deployer;
pub mod logs;
pub mod migration;
