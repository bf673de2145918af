//! Test support utilities for bucketcred integration tests.
//!
//! Provides recording mock clients and an isolated CLI environment.

#![allow(dead_code)]

pub mod assertions;
pub mod mocks;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use mocks::*;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated CLI environment.
///
/// Child processes run with `.current_dir()` set to a temporary directory,
/// so tests can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A bucketcred command running in the test directory.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("bucketcred").expect("failed to find bucketcred binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("BUCKETCRED_FILE");
        cmd.env_remove("BUCKETCRED_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Write a raw store file.
    pub fn write_store(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".bucketcred.toml"), contents)
            .expect("failed to write store");
    }

    /// Read the raw store file.
    pub fn read_store(&self) -> String {
        std::fs::read_to_string(self.dir.path().join(".bucketcred.toml"))
            .expect("failed to read store")
    }
}
