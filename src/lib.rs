//! Bucketcred - username/password credentials whose password lives in a bucket.
//!
//! The password is never stored in configuration. Each time it is needed it
//! is fetched from an object-store bucket and, when the definition says so,
//! decrypted through KMS with an optional encryption context.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── add / rm      # Manage credential definitions
//! │   ├── list / show   # Inspect definitions
//! │   ├── password      # Resolve and print a password
//! │   └── run           # Run a command with the credential bound
//! └── core/             # Core library components
//!     ├── client/       # Region/proxy resolution, service client traits
//!     │   └── aws       # S3 + KMS implementation (feature `aws`)
//!     ├── fetch         # Whole-object reads
//!     ├── decrypt       # Plaintext vs KMS decryption
//!     ├── domain/       # CredentialSpec, BucketCredential, SecretValue
//!     ├── record        # Persisted records and legacy shapes
//!     ├── config        # .bucketcred.toml management
//!     └── binding       # Environment variable binding
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::binding::Binding;
pub use crate::core::client::{ClientConfig, ClientFactory, DecryptRequest, KmsClient, ObjectStore};
pub use crate::core::config::Store;
pub use crate::core::domain::{
    credential_name, friendly_name, BucketCredential, Credential, CredentialSpec, KmsSpec,
    SecretValue,
};
pub use crate::core::record::{CredentialRecord, KmsRecord};
pub use crate::error::{Error, Result};
