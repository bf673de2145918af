//! Recording mock clients.
//!
//! `MockClients` is a `ClientFactory` whose object store serves one scripted
//! object and whose KMS client returns one scripted plaintext. Every request
//! and every client config is recorded for inspection.

use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bucketcred::core::client::ObjectBody;
use bucketcred::error::BoxError;
use bucketcred::{ClientConfig, ClientFactory, DecryptRequest, KmsClient, ObjectStore, Result};

/// Shared state behind a [`MockClients`].
#[derive(Default)]
pub struct State {
    /// Reads the object body yields, in order.
    pub reads: Vec<std::result::Result<Vec<u8>, String>>,
    /// Error returned by get-object instead of a body.
    pub get_error: Option<String>,
    /// KMS reply; `None` means no plaintext.
    pub plaintext: Option<Vec<u8>>,
    /// Error returned by KMS instead of a reply.
    pub kms_error: Option<String>,

    pub gets: Mutex<Vec<(String, String)>>,
    pub decrypts: Mutex<Vec<DecryptRequest>>,
    pub store_configs: Mutex<Vec<ClientConfig>>,
    pub kms_configs: Mutex<Vec<ClientConfig>>,
    pub closes: AtomicUsize,
}

/// Recording `ClientFactory`.
#[derive(Clone)]
pub struct MockClients(pub Arc<State>);

impl MockClients {
    /// Serve `object` in one read and decrypt anything to `plaintext`.
    pub fn new(object: &[u8], plaintext: &[u8]) -> Self {
        Self::from_state(State {
            reads: vec![Ok(object.to_vec())],
            plaintext: Some(plaintext.to_vec()),
            ..State::default()
        })
    }

    pub fn from_state(state: State) -> Self {
        Self(Arc::new(state))
    }

    /// Handle to pass where a factory is expected.
    pub fn factory(&self) -> Arc<dyn ClientFactory> {
        Arc::new(self.clone())
    }

    pub fn gets(&self) -> Vec<(String, String)> {
        self.0.gets.lock().unwrap().clone()
    }

    pub fn decrypts(&self) -> Vec<DecryptRequest> {
        self.0.decrypts.lock().unwrap().clone()
    }

    pub fn store_configs(&self) -> Vec<ClientConfig> {
        self.0.store_configs.lock().unwrap().clone()
    }

    pub fn kms_configs(&self) -> Vec<ClientConfig> {
        self.0.kms_configs.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.0.closes.load(Ordering::SeqCst)
    }
}

impl ClientFactory for MockClients {
    fn object_store(&self, config: &ClientConfig) -> Result<Box<dyn ObjectStore>> {
        self.0.store_configs.lock().unwrap().push(config.clone());
        Ok(Box::new(MockStore(Arc::clone(&self.0))))
    }

    fn kms(&self, config: &ClientConfig) -> Result<Box<dyn KmsClient>> {
        self.0.kms_configs.lock().unwrap().push(config.clone());
        Ok(Box::new(MockKms(Arc::clone(&self.0))))
    }
}

struct MockStore(Arc<State>);

impl ObjectStore for MockStore {
    fn get_object(&self, bucket: &str, key: &str) -> std::result::Result<ObjectBody, BoxError> {
        self.0
            .gets
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        if let Some(e) = &self.0.get_error {
            return Err(e.clone().into());
        }
        Ok(Box::new(MockBody {
            reads: self.0.reads.clone(),
            state: Arc::clone(&self.0),
        }))
    }
}

/// Body yielding scripted reads; counts its own drop as a close.
struct MockBody {
    reads: Vec<std::result::Result<Vec<u8>, String>>,
    state: Arc<State>,
}

impl Read for MockBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reads.is_empty() {
            return Ok(0);
        }
        let bytes = self.reads.remove(0).map_err(io::Error::other)?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        if n < bytes.len() {
            self.reads.insert(0, Ok(bytes[n..].to_vec()));
        }
        Ok(n)
    }
}

impl Drop for MockBody {
    fn drop(&mut self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockKms(Arc<State>);

impl KmsClient for MockKms {
    fn decrypt(&self, request: &DecryptRequest) -> std::result::Result<Option<Vec<u8>>, BoxError> {
        self.0.decrypts.lock().unwrap().push(request.clone());
        if let Some(e) = &self.0.kms_error {
            return Err(e.clone().into());
        }
        Ok(self.0.plaintext.clone())
    }
}
