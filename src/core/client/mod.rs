//! Service clients.
//!
//! Resolves the region/proxy settings a client is built with and defines the
//! seams the credential talks through: an object store, a KMS client, and a
//! factory producing fresh handles of both.
//!
//! ## Backends
//!
//! - **AWS**: Feature-gated (`aws`). S3 and KMS via the AWS SDK, with
//!   authentication from the SDK default provider chain.
//!
//! Authentication material never comes from the credential definition. The
//! clients always act as the host running bucketcred.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::debug;

use crate::core::constants::KNOWN_REGIONS;
use crate::error::{BoxError, ConfigError, Result};

#[cfg(feature = "aws")]
pub mod aws;

/// A validated region name such as `eu-west-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    /// Parse a region name.
    ///
    /// Accepts the canonical form (`eu-west-1`) and the constant form
    /// (`EU_WEST_1`) older definitions were saved with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRegion` if the name is not a known region.
    pub fn parse(name: &str) -> Result<Self> {
        let canonical = name.trim().to_ascii_lowercase().replace('_', "-");
        if KNOWN_REGIONS.contains(&canonical.as_str()) {
            Ok(Self(canonical))
        } else {
            Err(ConfigError::UnknownRegion(name.to_string()).into())
        }
    }

    /// Canonical region name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proxy endpoint for outbound client traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    host: String,
    port: u16,
}

impl Proxy {
    /// Proxy host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Proxy port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `http://host:port`, the form HTTP connectors expect.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Settings a service client is built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    region: Option<Region>,
    proxy: Option<Proxy>,
}

impl ClientConfig {
    /// Resolve client settings from raw configuration strings.
    ///
    /// - blank region: no pinned region, the default resolution chain applies
    /// - blank proxy host: no proxy, whatever the port says
    /// - otherwise the port must be a base-10 integer in `1..=65535`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRegion` or `ConfigError::InvalidProxyPort`.
    pub fn resolve(
        region: Option<&str>,
        proxy_host: Option<&str>,
        proxy_port: Option<&str>,
    ) -> Result<Self> {
        let region = match region.map(str::trim).filter(|r| !r.is_empty()) {
            Some(name) => Some(Region::parse(name)?),
            None => None,
        };

        let proxy = match proxy_host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => Some(Proxy {
                host: host.to_string(),
                port: parse_port(proxy_port.unwrap_or(""))?,
            }),
            None => None,
        };

        debug!(
            region = region.as_ref().map(Region::as_str).unwrap_or("<default>"),
            proxy = proxy.is_some(),
            "resolved client config"
        );

        Ok(Self { region, proxy })
    }

    /// Pinned region, if any.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Proxy, if any.
    pub fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }
}

fn parse_port(value: &str) -> Result<u16> {
    let invalid = |reason: &str| ConfigError::InvalidProxyPort {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let port: u16 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(&e.to_string()))?;
    if port == 0 {
        return Err(invalid("port must be positive").into());
    }
    Ok(port)
}

/// Readable object body. Dropping it releases the underlying stream.
pub type ObjectBody = Box<dyn Read + Send>;

/// Object storage client.
pub trait ObjectStore {
    /// Open the object at `bucket`/`key` for reading.
    fn get_object(&self, bucket: &str, key: &str) -> std::result::Result<ObjectBody, BoxError>;
}

/// A single KMS decrypt request.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptRequest {
    /// Ciphertext blob exactly as fetched.
    pub ciphertext: Vec<u8>,
    /// Authenticated encryption context; empty when none is attached.
    pub encryption_context: BTreeMap<String, String>,
}

impl std::fmt::Debug for DecryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptRequest")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("encryption_context", &self.encryption_context)
            .finish()
    }
}

/// Key management client.
pub trait KmsClient {
    /// Decrypt a ciphertext blob. `Ok(None)` means the service returned no
    /// plaintext.
    fn decrypt(&self, request: &DecryptRequest) -> std::result::Result<Option<Vec<u8>>, BoxError>;
}

/// Produces fresh client handles. Implementations hold no per-call state.
pub trait ClientFactory: Send + Sync {
    /// Build an object storage client.
    fn object_store(&self, config: &ClientConfig) -> Result<Box<dyn ObjectStore>>;

    /// Build a KMS client.
    fn kms(&self, config: &ClientConfig) -> Result<Box<dyn KmsClient>>;
}

/// Factory used when no cloud backend is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl ClientFactory for Unavailable {
    fn object_store(&self, _config: &ClientConfig) -> Result<Box<dyn ObjectStore>> {
        Err(unavailable())
    }

    fn kms(&self, _config: &ClientConfig) -> Result<Box<dyn KmsClient>> {
        Err(unavailable())
    }
}

fn unavailable() -> crate::error::Error {
    ConfigError::BackendUnavailable(
        "AWS support not compiled. Rebuild with: cargo install bucketcred --features aws"
            .to_string(),
    )
    .into()
}

/// Factory for the backend compiled into this build.
pub fn default_factory() -> std::sync::Arc<dyn ClientFactory> {
    #[cfg(feature = "aws")]
    {
        std::sync::Arc::new(aws::AwsClientFactory)
    }
    #[cfg(not(feature = "aws"))]
    {
        std::sync::Arc::new(Unavailable)
    }
}
