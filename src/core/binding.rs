//! Environment binding.
//!
//! Maps a credential's username and password onto two environment
//! variables for a child process.

use std::collections::BTreeMap;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::{DEFAULT_PASSWORD_VARIABLE, DEFAULT_USERNAME_VARIABLE};
use crate::core::domain::Credential;
use crate::error::Result;

/// Variable names a credential is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    username_variable: String,
    password_variable: String,
}

impl Binding {
    /// Blank or missing names fall back to `BUCKET_USER_NAME` and
    /// `BUCKET_PASSWORD`.
    pub fn new(username_variable: Option<&str>, password_variable: Option<&str>) -> Self {
        Self {
            username_variable: or_default(username_variable, DEFAULT_USERNAME_VARIABLE),
            password_variable: or_default(password_variable, DEFAULT_PASSWORD_VARIABLE),
        }
    }

    pub fn username_variable(&self) -> &str {
        &self.username_variable
    }

    pub fn password_variable(&self) -> &str {
        &self.password_variable
    }

    /// Both variable names.
    pub fn variables(&self) -> [&str; 2] {
        [self.username_variable.as_str(), self.password_variable.as_str()]
    }

    /// Resolve the credential once and map it onto the variables.
    ///
    /// # Errors
    ///
    /// Propagates any failure of `password()`; no partial map is returned.
    pub fn bind(&self, credential: &dyn Credential) -> Result<BTreeMap<String, Zeroizing<String>>> {
        let password = credential.password()?;

        debug!(
            id = %credential.id(),
            username_variable = %self.username_variable,
            password_variable = %self.password_variable,
            "binding credential"
        );

        let mut env = BTreeMap::new();
        env.insert(
            self.username_variable.clone(),
            Zeroizing::new(credential.username().to_string()),
        );
        env.insert(
            self.password_variable.clone(),
            Zeroizing::new(password.expose_secret().to_string()),
        );
        Ok(env)
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn or_default(name: Option<&str>, default: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => default.to_string(),
    }
}
