//! Password command.
//!
//! Resolve a password and print it. This is the one command that puts a
//! secret on stdout.

use std::path::Path;
use std::sync::Arc;

use crate::cli::output;
use crate::core::client::ClientFactory;
use crate::core::config::Store;
use crate::core::domain::{BucketCredential, Credential};
use crate::error::Result;

/// Print the resolved password for `id`.
pub fn execute(file: &Path, id: &str, clients: Arc<dyn ClientFactory>) -> Result<()> {
    let store = Store::load(file)?;
    let credential = BucketCredential::new(store.get(id)?, clients);

    let password = credential.password()?;
    output::data(password.expose_secret());
    Ok(())
}
