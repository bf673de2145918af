//! Remove command.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Store;
use crate::error::Result;

/// Remove a credential definition.
pub fn execute(file: &Path, id: &str) -> Result<()> {
    let mut store = Store::load(file)?;
    store.remove(id)?;
    store.save()?;

    output::success(&format!("removed {}", output::id(id)));
    Ok(())
}
