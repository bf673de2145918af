//! Credential store file management.
//!
//! Handles reading, writing, and validating `.bucketcred.toml`:
//!
//! ```toml
//! [bucketcred]
//! version = "0.1.0"
//!
//! [[credentials]]
//! schema = 2
//! id = "deploy"
//! bucket_name = "secrets"
//! bucket_path = "/ci/deploy"
//! username = "deployer"
//! region = "eu-west-1"
//!
//! [credentials.kms]
//! mode = "decrypt"
//! context_key = "app"
//! context_value = "deploy"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::domain::CredentialSpec;
use crate::core::record::CredentialRecord;
use crate::error::{ConfigError, Result};

/// Contents of a credential store file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Store {
    /// Metadata about the file
    #[serde(default)]
    pub bucketcred: Meta,
    /// Credential definitions, in file order
    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,
    #[serde(skip)]
    path: PathBuf,
}

/// Metadata section of the store
#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    /// Version of bucketcred that last wrote the file
    #[serde(default)]
    pub version: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Store {
    /// Create an empty store that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            bucketcred: Meta::default(),
            credentials: Vec::new(),
            path: path.into(),
        }
    }

    /// Load a store from `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or any error from
    /// [`Store::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading credential store");

        if !path.exists() {
            return Err(ConfigError::NotInitialized(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut store: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        store.path = path.to_path_buf();

        debug!(credentials = store.credentials.len(), "credential store loaded");

        store.validate()?;
        Ok(store)
    }

    /// Load `path` if it exists, otherwise start an empty store there
    pub fn load_or_new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new(path))
        }
    }

    /// Save the store to its path
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&mut self) -> Result<()> {
        debug!(path = %self.path.display(), "saving credential store");

        self.bucketcred.version = env!("CARGO_PKG_VERSION").to_string();
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// File this store reads from and saves to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check every record normalizes and ids are unique
    ///
    /// # Errors
    ///
    /// Returns the first normalization error, or `ConfigError::Duplicate`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for spec in self.specs()? {
            if !seen.insert(spec.id().to_string()) {
                return Err(ConfigError::Duplicate(spec.id().to_string()).into());
            }
        }
        Ok(())
    }

    /// All credentials, normalized
    pub fn specs(&self) -> Result<Vec<CredentialSpec>> {
        self.credentials.iter().map(CredentialRecord::normalize).collect()
    }

    /// One credential by id
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no record has that id.
    pub fn get(&self, id: &str) -> Result<CredentialSpec> {
        self.credentials
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| ConfigError::NotFound(id.to_string()))?
            .normalize()
    }

    /// Add a credential, replacing one with the same id when `force` is set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Duplicate` if the id exists and `force` is false.
    pub fn insert(&mut self, spec: &CredentialSpec, force: bool) -> Result<()> {
        let record = CredentialRecord::from_spec(spec);
        match self.position(spec.id()) {
            Some(_) if !force => Err(ConfigError::Duplicate(spec.id().to_string()).into()),
            Some(index) => {
                self.credentials[index] = record;
                Ok(())
            }
            None => {
                self.credentials.push(record);
                Ok(())
            }
        }
    }

    /// Remove a credential by id
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no record has that id.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| ConfigError::NotFound(id.to_string()))?;
        self.credentials.remove(index);
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.credentials
            .iter()
            .position(|r| r.id.as_deref() == Some(id))
    }
}
