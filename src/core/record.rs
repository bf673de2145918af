//! Persisted credential records.
//!
//! A [`CredentialRecord`] is the on-disk form of a credential. Every field is
//! optional so that definitions written by older versions still parse, and
//! [`CredentialRecord::normalize`] is the one place their shapes are turned
//! into a [`CredentialSpec`].
//!
//! ## KMS compatibility table
//!
//! | record contents                                  | resolved KMS                       |
//! |--------------------------------------------------|------------------------------------|
//! | `[kms] mode = "none"`                            | none, bytes are plaintext          |
//! | `[kms] mode = "decrypt"`                         | decrypt with the table's fields    |
//! | no `[kms]`, `use_kms = false`                    | none                               |
//! | no `[kms]`, `use_kms = true`                     | decrypt with the legacy fields     |
//! | no `[kms]`, no `use_kms`, any legacy KMS field   | decrypt with the legacy fields     |
//! | nothing KMS related                              | none                               |
//!
//! Legacy fields are `kms_encryption_context_key`, `kms_secret_name` (the
//! context value) and `kms_proxy`. Records are always written back in the
//! current shape with an explicit `[kms] mode`.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::core::constants::RECORD_SCHEMA;
use crate::core::domain::{CredentialSpec, KmsSpec};
use crate::error::{ConfigError, Result};

/// On-disk credential definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Record schema; absent on records written before versioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_proxy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_host: Option<String>,
    #[serde(
        default,
        deserialize_with = "port_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms: Option<KmsRecord>,

    // Legacy flat KMS fields, read but never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_kms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_encryption_context_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_secret_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_proxy: Option<bool>,
}

/// The `[kms]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum KmsRecord {
    /// Server-side encrypted; no decrypt call.
    None,
    /// Decrypt through KMS.
    Decrypt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context_value: Option<String>,
        #[serde(default)]
        proxy: bool,
    },
}

impl CredentialRecord {
    /// Current-shape record for a spec.
    pub fn from_spec(spec: &CredentialSpec) -> Self {
        let kms = match spec.kms() {
            None => KmsRecord::None,
            Some(kms) => KmsRecord::Decrypt {
                context_key: kms.context_key().map(str::to_string),
                context_value: kms.context_value().map(str::to_string),
                proxy: kms.proxy(),
            },
        };

        Self {
            schema: Some(RECORD_SCHEMA),
            id: Some(spec.id().to_string()),
            description: spec.description().map(str::to_string),
            bucket_name: Some(spec.bucket_name().to_string()),
            bucket_path: Some(spec.bucket_path().to_string()),
            region: spec.region().map(str::to_string),
            username: Some(spec.username().to_string()),
            s3_proxy: Some(spec.s3_proxy()),
            proxy_host: spec.proxy_host().map(str::to_string),
            proxy_port: spec.proxy_port().map(str::to_string),
            kms: Some(kms),
            ..Self::default()
        }
    }

    /// Normalize into the canonical spec.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedVersion` for records from a newer
    /// schema and `ConfigError::MissingField` if a required field is absent.
    pub fn normalize(&self) -> Result<CredentialSpec> {
        if let Some(found) = self.schema {
            if found > RECORD_SCHEMA {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: RECORD_SCHEMA,
                }
                .into());
            }
        }

        let s3_proxy = self.s3_proxy.unwrap_or(false);
        if s3_proxy && is_blank(self.proxy_host.as_deref()) {
            warn!(
                id = ?self.id,
                "s3_proxy is set without a proxy_host, connecting directly"
            );
        }

        let kms = self.resolve_kms();
        if kms.as_ref().is_some_and(KmsSpec::proxy) && is_blank(self.proxy_host.as_deref()) {
            warn!(
                id = ?self.id,
                "kms proxy is set without a proxy_host, connecting directly"
            );
        }
        debug!(id = ?self.id, kms = kms.is_some(), "normalized credential record");

        CredentialSpec::builder(
            required(&self.id, "id")?,
            required(&self.bucket_name, "bucket_name")?,
            required(&self.bucket_path, "bucket_path")?,
            required(&self.username, "username")?,
        )
        .description(self.description.clone())
        .region(self.region.clone())
        .s3_proxy(s3_proxy, self.proxy_host.clone(), self.proxy_port.clone())
        .kms(kms)
        .build()
    }

    fn resolve_kms(&self) -> Option<KmsSpec> {
        if let Some(kms) = &self.kms {
            return match kms {
                KmsRecord::None => None,
                KmsRecord::Decrypt {
                    context_key,
                    context_value,
                    proxy,
                } => Some(KmsSpec::new(
                    context_key.clone(),
                    context_value.clone(),
                    *proxy,
                )),
            };
        }

        let legacy = || {
            KmsSpec::new(
                self.kms_encryption_context_key.clone(),
                self.kms_secret_name.clone(),
                self.kms_proxy.unwrap_or(false),
            )
        };

        match self.use_kms {
            Some(false) => None,
            Some(true) => Some(legacy()),
            None if self.has_legacy_kms_fields() => Some(legacy()),
            None => None,
        }
    }

    fn has_legacy_kms_fields(&self) -> bool {
        self.kms_encryption_context_key.is_some()
            || self.kms_secret_name.is_some()
            || self.kms_proxy.is_some()
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| ConfigError::MissingField { field }.into())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Ports were once saved as integers; accept either form.
fn port_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Port>::deserialize(deserializer)?.map(|port| match port {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    }))
}
