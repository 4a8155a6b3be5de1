//! Migrations deploying the HedgeManager contracts.
//!
//! Migrations run in ascending id order against a [`deployer::Deployer`], and
//! their completion is recorded per network in a deployments file so that
//! reruns skip finished work.

pub mod artifacts;
pub mod cli;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod migrations;
pub mod runner;
pub mod utils;
