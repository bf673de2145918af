//! Credential definition.
//!
//! [`CredentialSpec`] is the canonical, immutable configuration of one
//! bucket credential. Every persisted shape is normalized into it by
//! `core::record`; nothing downstream looks at the historical fields.

use crate::core::client::ClientConfig;
use crate::error::{ConfigError, Result};

/// How fetched bytes are decrypted through KMS.
///
/// Presence of a `KmsSpec` on a credential means KMS is always called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KmsSpec {
    context_key: Option<String>,
    context_value: Option<String>,
    proxy: bool,
}

impl KmsSpec {
    pub fn new(context_key: Option<String>, context_value: Option<String>, proxy: bool) -> Self {
        Self {
            context_key,
            context_value,
            proxy,
        }
    }

    pub fn context_key(&self) -> Option<&str> {
        self.context_key.as_deref()
    }

    pub fn context_value(&self) -> Option<&str> {
        self.context_value.as_deref()
    }

    /// Whether the KMS client goes through the configured proxy.
    pub fn proxy(&self) -> bool {
        self.proxy
    }

    /// The encryption context entry, only when key and value are both
    /// present and non-blank.
    pub fn encryption_context(&self) -> Option<(&str, &str)> {
        let key = non_blank(self.context_key.as_deref())?;
        let value = non_blank(self.context_value.as_deref())?;
        Some((key, value))
    }
}

/// Canonical credential definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSpec {
    id: String,
    description: Option<String>,
    bucket_name: String,
    bucket_path: String,
    region: Option<String>,
    username: String,
    s3_proxy: bool,
    proxy_host: Option<String>,
    proxy_port: Option<String>,
    kms: Option<KmsSpec>,
}

impl CredentialSpec {
    /// Start building a spec from its required fields.
    pub fn builder(
        id: impl Into<String>,
        bucket_name: impl Into<String>,
        bucket_path: impl Into<String>,
        username: impl Into<String>,
    ) -> CredentialSpecBuilder {
        CredentialSpecBuilder {
            spec: Self {
                id: id.into(),
                description: None,
                bucket_name: bucket_name.into(),
                bucket_path: bucket_path.into(),
                region: None,
                username: username.into(),
                s3_proxy: false,
                proxy_host: None,
                proxy_port: None,
                kms: None,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn bucket_path(&self) -> &str {
        &self.bucket_path
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn s3_proxy(&self) -> bool {
        self.s3_proxy
    }

    pub fn proxy_host(&self) -> Option<&str> {
        self.proxy_host.as_deref()
    }

    pub fn proxy_port(&self) -> Option<&str> {
        self.proxy_port.as_deref()
    }

    /// KMS settings; `None` means the object is already plaintext.
    pub fn kms(&self) -> Option<&KmsSpec> {
        self.kms.as_ref()
    }

    /// `bucketName:bucketPath`
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.bucket_name, self.bucket_path)
    }

    /// Settings for the object store client. Proxy fields are ignored
    /// unless `s3_proxy` is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown region or a bad proxy port.
    pub fn object_store_config(&self) -> Result<ClientConfig> {
        self.client_config(self.s3_proxy)
    }

    /// Settings for the KMS client. Proxy fields apply only when the KMS
    /// settings ask for the proxy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown region or a bad proxy port.
    pub fn kms_config(&self) -> Result<ClientConfig> {
        self.client_config(self.kms.as_ref().is_some_and(KmsSpec::proxy))
    }

    fn client_config(&self, use_proxy: bool) -> Result<ClientConfig> {
        if use_proxy {
            ClientConfig::resolve(
                self.region.as_deref(),
                self.proxy_host.as_deref(),
                self.proxy_port.as_deref(),
            )
        } else {
            ClientConfig::resolve(self.region.as_deref(), None, None)
        }
    }
}

/// Builder for [`CredentialSpec`].
#[derive(Debug, Clone)]
pub struct CredentialSpecBuilder {
    spec: CredentialSpec,
}

impl CredentialSpecBuilder {
    pub fn description(mut self, description: Option<String>) -> Self {
        self.spec.description = description;
        self
    }

    pub fn region(mut self, region: Option<String>) -> Self {
        self.spec.region = region;
        self
    }

    /// Proxy for the object store client. Host and port are kept even when
    /// `enabled` is false so a definition round-trips unchanged.
    pub fn s3_proxy(mut self, enabled: bool, host: Option<String>, port: Option<String>) -> Self {
        self.spec.s3_proxy = enabled;
        self.spec.proxy_host = host;
        self.spec.proxy_port = port;
        self
    }

    pub fn kms(mut self, kms: Option<KmsSpec>) -> Self {
        self.spec.kms = kms;
        self
    }

    /// Finish the spec.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if id, bucket name or bucket path
    /// is blank.
    pub fn build(self) -> Result<CredentialSpec> {
        let spec = self.spec;
        for (field, value) in [
            ("id", &spec.id),
            ("bucket_name", &spec.bucket_name),
            ("bucket_path", &spec.bucket_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }
        Ok(spec)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
