//! Bucket credential.
//!
//! Pairs a [`CredentialSpec`] with the factory that builds its service
//! clients. Every `password()` call fetches and decrypts afresh:
//!
//! ```text
//! Idle → Fetching → Fetched → Decrypting → Decrypted
//!            └→ FetchFailed      └→ DecryptFailed
//! ```
//!
//! Nothing is cached between calls, so rotated passwords are picked up on
//! the next use.

use std::sync::Arc;

use tracing::debug;

use crate::core::client::ClientFactory;
use crate::core::decrypt::{self, Decryption};
use crate::core::domain::{CredentialSpec, SecretValue};
use crate::core::fetch;
use crate::error::Result;

/// What a host needs from a username/password credential.
pub trait Credential {
    fn id(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn username(&self) -> &str;
    fn display_name(&self) -> String;

    /// Resolve the password. May hit the network.
    fn password(&self) -> Result<SecretValue>;
}

/// `<displayName> (<description>)`, or just the display name when the
/// description is missing or blank.
pub fn friendly_name(display_name: &str, description: Option<&str>) -> String {
    match description.filter(|d| !d.trim().is_empty()) {
        Some(description) => format!("{} ({})", display_name, description),
        None => display_name.to_string(),
    }
}

/// Name a credential the way listings show it.
pub fn credential_name(credential: &dyn Credential) -> String {
    friendly_name(&credential.display_name(), credential.description())
}

/// A credential whose password lives in a bucket.
#[derive(Clone)]
pub struct BucketCredential {
    spec: CredentialSpec,
    clients: Arc<dyn ClientFactory>,
}

impl BucketCredential {
    pub fn new(spec: CredentialSpec, clients: Arc<dyn ClientFactory>) -> Self {
        Self { spec, clients }
    }

    pub fn spec(&self) -> &CredentialSpec {
        &self.spec
    }
}

impl std::fmt::Debug for BucketCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketCredential")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl Credential for BucketCredential {
    fn id(&self) -> &str {
        self.spec.id()
    }

    fn description(&self) -> Option<&str> {
        self.spec.description()
    }

    fn username(&self) -> &str {
        self.spec.username()
    }

    fn display_name(&self) -> String {
        self.spec.display_name()
    }

    fn password(&self) -> Result<SecretValue> {
        debug!(id = %self.spec.id(), "resolving password");

        // Both clients are configured up front so configuration errors
        // surface before any network call.
        let store_config = self.spec.object_store_config()?;
        let kms = match self.spec.kms() {
            Some(spec) => Some((spec, self.spec.kms_config()?)),
            None => None,
        };

        let store = self.clients.object_store(&store_config)?;
        let bytes = fetch::fetch(
            store.as_ref(),
            self.spec.bucket_name(),
            self.spec.bucket_path(),
        )?;

        match kms {
            Some((spec, config)) => {
                let client = self.clients.kms(&config)?;
                decrypt::decrypt(
                    Decryption::Kms {
                        client: client.as_ref(),
                        spec,
                    },
                    bytes,
                )
            }
            None => decrypt::decrypt(Decryption::Plaintext, bytes),
        }
    }
}
