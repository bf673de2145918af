//! Domain types.

mod credential;
mod secret;
mod spec;

pub use credential::{credential_name, friendly_name, BucketCredential, Credential};
pub use secret::SecretValue;
pub use spec::{CredentialSpec, CredentialSpecBuilder, KmsSpec};
