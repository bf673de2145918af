//! Run command.
//!
//! Executes a command with the credential bound as environment variables.

use std::path::Path;
use std::sync::Arc;

use crate::core::binding::Binding;
use crate::core::client::ClientFactory;
use crate::core::config::Store;
use crate::core::domain::BucketCredential;
use crate::error::{Error, Result};

/// Run a command with the credential injected, exiting with its status.
pub fn execute(
    file: &Path,
    id: &str,
    username_variable: Option<&str>,
    password_variable: Option<&str>,
    command: &[String],
    clients: Arc<dyn ClientFactory>,
) -> Result<()> {
    let store = Store::load(file)?;
    let credential = BucketCredential::new(store.get(id)?, clients);
    let binding = Binding::new(username_variable, password_variable);

    let exit_code = run_with_binding(&credential, &binding, command)?;
    std::process::exit(exit_code);
}

/// Run `command` with the bound variables set.
fn run_with_binding(
    credential: &BucketCredential,
    binding: &Binding,
    command: &[String],
) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;

    let env = binding.bind(credential)?;

    let mut cmd = std::process::Command::new(program);
    cmd.args(args);
    for (key, value) in &env {
        cmd.env(key, value.as_str());
    }

    let status = cmd.status()?;
    Ok(status.code().unwrap_or(1))
}
