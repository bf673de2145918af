//! Add command.
//!
//! Store a new credential definition.

use std::path::Path;

use crate::cli::{output, AddArgs};
use crate::core::config::Store;
use crate::core::domain::{CredentialSpec, KmsSpec};
use crate::error::Result;

/// Add a credential definition to the store, creating the file if needed.
pub fn execute(file: &Path, args: AddArgs) -> Result<()> {
    let kms = args
        .kms
        .then(|| KmsSpec::new(args.context_key, args.context_value, args.kms_proxy));

    let spec = CredentialSpec::builder(args.id, args.bucket, args.path, args.username)
        .description(args.description)
        .region(args.region)
        .s3_proxy(args.s3_proxy, args.proxy_host, args.proxy_port)
        .kms(kms)
        .build()?;

    // Reject settings that could never build a client.
    spec.object_store_config()?;
    if spec.kms().is_some() {
        spec.kms_config()?;
    }

    let mut store = Store::load_or_new(file)?;
    store.insert(&spec, args.force)?;
    store.save()?;

    output::success(&format!("added {}", output::id(spec.id())));
    Ok(())
}
