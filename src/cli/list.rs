//! List command.
//!
//! List credential definitions by their friendly names.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Store;
use crate::core::domain::friendly_name;
use crate::error::Result;

/// List credential definitions.
pub fn execute(file: &Path, json: bool) -> Result<()> {
    let store = Store::load(file)?;
    let specs = store.specs()?;

    if json {
        let credentials: Vec<_> = specs
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "id": spec.id(),
                    "name": friendly_name(&spec.display_name(), spec.description()),
                    "username": spec.username(),
                    "kms": spec.kms().is_some(),
                })
            })
            .collect();

        let result = serde_json::json!({
            "credentials": credentials,
            "count": specs.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if specs.is_empty() {
        output::dimmed("no credentials");
    } else {
        output::header(&format!("{} credentials", specs.len()));
        output::rule();
        for spec in &specs {
            output::kv(
                &output::id(spec.id()),
                friendly_name(&spec.display_name(), spec.description()),
            );
        }
    }

    Ok(())
}
