//! AWS backend.
//!
//! S3 for objects, KMS for decryption. Enable with `--features aws`.
//!
//! Credentials come from the SDK default provider chain (environment,
//! profile, instance/task role), never from the credential definition.
//! The async SDK is driven from a current-thread runtime owned by each
//! client handle, so callers stay synchronous.

use std::io::{self, Read};
use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_smithy_http_client::proxy::ProxyConfig;
use aws_smithy_http_client::tls::{self, rustls_provider::CryptoMode};
use aws_smithy_http_client::Connector;
use tokio::runtime::Runtime;
use tracing::{debug, trace};

use super::{ClientConfig, ClientFactory, DecryptRequest, KmsClient, ObjectBody, ObjectStore};
use crate::error::{BoxError, ConfigError, Result};

/// Builds S3 and KMS clients from the ambient AWS environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsClientFactory;

impl ClientFactory for AwsClientFactory {
    fn object_store(&self, config: &ClientConfig) -> Result<Box<dyn ObjectStore>> {
        let rt = runtime()?;
        let sdk_config = rt.block_on(load_sdk_config(config))?;
        debug!(region = ?sdk_config.region(), "built S3 client");
        Ok(Box::new(S3Store {
            client: aws_sdk_s3::Client::new(&sdk_config),
            rt,
        }))
    }

    fn kms(&self, config: &ClientConfig) -> Result<Box<dyn KmsClient>> {
        let rt = runtime()?;
        let sdk_config = rt.block_on(load_sdk_config(config))?;
        debug!(region = ?sdk_config.region(), "built KMS client");
        Ok(Box::new(Kms {
            client: aws_sdk_kms::Client::new(&sdk_config),
            rt,
        }))
    }
}

fn runtime() -> Result<Arc<Runtime>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(Arc::new(rt))
}

async fn load_sdk_config(config: &ClientConfig) -> Result<aws_config::SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = config.region() {
        loader = loader.region(aws_config::Region::new(region.as_str().to_string()));
    }

    if let Some(proxy) = config.proxy() {
        let proxy_config = ProxyConfig::all(proxy.url())
            .map_err(|e| ConfigError::InvalidProxy(format!("{}: {}", proxy.url(), e)))?;
        debug!(proxy = %proxy.url(), "routing through proxy");
        let http_client =
            aws_smithy_http_client::Builder::new().build_with_connector_fn(move |settings, _| {
                let mut builder = Connector::builder().proxy_config(proxy_config.clone());
                if let Some(settings) = settings {
                    builder = builder.connector_settings(settings.clone());
                }
                builder
                    .tls_provider(tls::Provider::Rustls(CryptoMode::AwsLc))
                    .build()
            });
        loader = loader.http_client(http_client);
    }

    Ok(loader.load().await)
}

struct S3Store {
    client: aws_sdk_s3::Client,
    rt: Arc<Runtime>,
}

impl ObjectStore for S3Store {
    fn get_object(&self, bucket: &str, key: &str) -> std::result::Result<ObjectBody, BoxError> {
        trace!(bucket, key, "get object");
        let output = self
            .rt
            .block_on(self.client.get_object().bucket(bucket).key(key).send())?;
        Ok(Box::new(S3Body {
            stream: output.body,
            rt: Arc::clone(&self.rt),
            pending: Vec::new(),
            offset: 0,
        }))
    }
}

/// Blocking reader over an S3 byte stream.
struct S3Body {
    stream: aws_sdk_s3::primitives::ByteStream,
    rt: Arc<Runtime>,
    pending: Vec<u8>,
    offset: usize,
}

impl Read for S3Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.offset >= self.pending.len() {
            match self.rt.block_on(self.stream.try_next()) {
                Ok(Some(chunk)) => {
                    self.pending = chunk.to_vec();
                    self.offset = 0;
                }
                Ok(None) => return Ok(0),
                Err(e) => return Err(io::Error::other(e)),
            }
        }

        let n = buf.len().min(self.pending.len() - self.offset);
        buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

struct Kms {
    client: aws_sdk_kms::Client,
    rt: Arc<Runtime>,
}

impl KmsClient for Kms {
    fn decrypt(&self, request: &DecryptRequest) -> std::result::Result<Option<Vec<u8>>, BoxError> {
        trace!(
            ciphertext_len = request.ciphertext.len(),
            context_entries = request.encryption_context.len(),
            "decrypting with AWS KMS"
        );

        let mut call = self
            .client
            .decrypt()
            .ciphertext_blob(aws_sdk_kms::primitives::Blob::new(
                request.ciphertext.clone(),
            ));
        for (key, value) in &request.encryption_context {
            call = call.encryption_context(key, value);
        }

        let output = self.rt.block_on(call.send())?;
        Ok(output.plaintext().map(|blob| blob.as_ref().to_vec()))
    }
}
