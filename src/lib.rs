pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod reconcile;
pub mod ui;
pub mod version;
pub mod workflow;

pub use error::{GitReleaseError, Result};
