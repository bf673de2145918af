//! Show command.
//!
//! Print the non-secret fields of one credential definition.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Store;
use crate::core::record::CredentialRecord;
use crate::error::Result;

/// Show one credential definition.
pub fn execute(file: &Path, id: &str, json: bool) -> Result<()> {
    let store = Store::load(file)?;
    let spec = store.get(id)?;

    if json {
        let record = CredentialRecord::from_spec(&spec);
        output::data(&serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    output::header(&spec.display_name());
    output::rule();
    output::kv("id:         ", spec.id());
    output::kv("username:   ", spec.username());
    if let Some(description) = spec.description() {
        output::kv("description:", description);
    }
    output::kv("region:     ", spec.region().unwrap_or("<default>"));
    if spec.s3_proxy() {
        output::kv(
            "s3 proxy:   ",
            format!(
                "{}:{}",
                spec.proxy_host().unwrap_or(""),
                spec.proxy_port().unwrap_or("")
            ),
        );
    }
    match spec.kms() {
        None => output::kv("kms:        ", "none (server-side encrypted)"),
        Some(kms) => {
            let context = match kms.encryption_context() {
                Some((key, value)) => format!("{}={}", key, value),
                None => "no context".to_string(),
            };
            output::kv("kms:        ", format!("decrypt, {}", context));
            output::kv("kms proxy:  ", kms.proxy());
        }
    }

    Ok(())
}
