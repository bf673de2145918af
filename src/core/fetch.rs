//! Object fetching.
//!
//! Reads a whole object from the bucket into memory.

use std::io::{ErrorKind, Read};

use tracing::{debug, trace};

use crate::core::client::ObjectStore;
use crate::core::constants::READ_CHUNK_SIZE;
use crate::error::{ReadError, Result};

/// Fetch the full contents of `bucket`/`key`.
///
/// The body is read in fixed-size chunks into a growable buffer. The body
/// handle is owned by this function and dropped on every exit path, so the
/// underlying stream is released exactly once whether the read completes or
/// fails part way.
///
/// # Errors
///
/// Returns `ReadError::Request` if the object cannot be opened and
/// `ReadError::Body` if reading it fails. Neither is retried.
pub fn fetch(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Vec<u8>> {
    debug!(bucket, key, "fetching object");

    let mut body = store
        .get_object(bucket, key)
        .map_err(|source| ReadError::Request {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })?;

    let mut contents = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match body.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => contents.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ReadError::Body {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    source,
                }
                .into())
            }
        }
    }

    trace!(len = contents.len(), "object read");
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::ObjectBody;
    use crate::error::{BoxError, Error};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Body yielding scripted reads and counting drops.
    struct ScriptedBody {
        reads: Vec<io::Result<Vec<u8>>>,
        drops: Arc<AtomicUsize>,
    }

    impl Read for ScriptedBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.reads.is_empty() {
                return Ok(0);
            }
            let bytes = self.reads.remove(0)?;
            buf[..bytes.len()].copy_from_slice(&bytes);
            Ok(bytes.len())
        }
    }

    impl Drop for ScriptedBody {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ScriptedStore {
        reads: std::sync::Mutex<Option<Vec<io::Result<Vec<u8>>>>>,
        drops: Arc<AtomicUsize>,
    }

    impl ScriptedStore {
        fn new(reads: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                reads: std::sync::Mutex::new(Some(reads)),
                drops: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ObjectStore for ScriptedStore {
        fn get_object(&self, _bucket: &str, _key: &str) -> std::result::Result<ObjectBody, BoxError> {
            let reads = self.reads.lock().unwrap().take().unwrap_or_default();
            Ok(Box::new(ScriptedBody {
                reads,
                drops: Arc::clone(&self.drops),
            }))
        }
    }

    struct MissingStore;

    impl ObjectStore for MissingStore {
        fn get_object(&self, _bucket: &str, _key: &str) -> std::result::Result<ObjectBody, BoxError> {
            Err("NoSuchKey".into())
        }
    }

    #[test]
    fn test_fetch_concatenates_chunks() {
        let store = ScriptedStore::new(vec![Ok(b"encrypted".to_vec()), Ok(b"Password".to_vec())]);
        let bytes = fetch(&store, "bucketUri", "/bucketPath").unwrap();
        assert_eq!(bytes, b"encryptedPassword");
        assert_eq!(store.drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_larger_than_chunk() {
        let big = vec![b'x'; READ_CHUNK_SIZE];
        let store = ScriptedStore::new(vec![Ok(big.clone()), Ok(big.clone()), Ok(b"tail".to_vec())]);
        let bytes = fetch(&store, "b", "k").unwrap();
        assert_eq!(bytes.len(), READ_CHUNK_SIZE * 2 + 4);
    }

    #[test]
    fn test_fetch_empty_object() {
        let store = ScriptedStore::new(vec![]);
        assert!(fetch(&store, "b", "k").unwrap().is_empty());
        assert_eq!(store.drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_retries_interrupted_reads() {
        let store = ScriptedStore::new(vec![
            Ok(b"ab".to_vec()),
            Err(io::Error::new(ErrorKind::Interrupted, "signal")),
            Ok(b"cd".to_vec()),
        ]);
        assert_eq!(fetch(&store, "b", "k").unwrap(), b"abcd");
    }

    #[test]
    fn test_fetch_closes_body_on_read_error() {
        let store = ScriptedStore::new(vec![
            Ok(b"encryptedPassword".to_vec()),
            Err(io::Error::other("something went wrong")),
            Ok(b"never read".to_vec()),
        ]);

        let err = fetch(&store, "bucketUri", "/bucketPath").unwrap_err();
        match err {
            Error::Read(ReadError::Body { bucket, key, source }) => {
                assert_eq!(bucket, "bucketUri");
                assert_eq!(key, "/bucketPath");
                assert_eq!(source.to_string(), "something went wrong");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_open_failure_is_read_error() {
        let err = fetch(&MissingStore, "bucketUri", "/bucketPath").unwrap_err();
        assert!(matches!(err, Error::Read(ReadError::Request { .. })));
        assert!(err.to_string().contains("NoSuchKey"));
    }
}
