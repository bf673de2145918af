//! Secret value type.
//!
//! Holds decrypted plaintext. The text is wiped on drop and never appears in
//! `Debug` output; it is only reachable through [`SecretValue::expose_secret`].

use zeroize::Zeroizing;

/// Decrypted secret text.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Zeroizing<String>);

impl SecretValue {
    /// Wrap plaintext.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(Zeroizing::new(plaintext.into()))
    }

    /// The plaintext. Callers take responsibility for where it goes next.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Plaintext length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the plaintext is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl From<String> for SecretValue {
    fn from(plaintext: String) -> Self {
        Self::new(plaintext)
    }
}
