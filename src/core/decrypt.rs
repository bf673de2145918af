//! Decryption of fetched objects.
//!
//! Two modes, chosen entirely by whether the credential carries KMS
//! settings:
//! - **Plaintext**: the object store decrypted server-side; bytes are the
//!   secret
//! - **Kms**: bytes are a ciphertext blob sent to KMS for decryption
//!
//! ## Text decoding
//!
//! Bytes are decoded as UTF-8. Invalid sequences are replaced with
//! U+FFFD (`String::from_utf8_lossy`) rather than rejected, in both modes.

use std::collections::BTreeMap;

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::client::{DecryptRequest, KmsClient};
use crate::core::domain::{KmsSpec, SecretValue};
use crate::error::{DecryptError, Result};

/// How a fetched object becomes the secret.
pub enum Decryption<'a> {
    /// Bytes are already plaintext.
    Plaintext,
    /// Bytes go to KMS.
    Kms {
        client: &'a dyn KmsClient,
        spec: &'a KmsSpec,
    },
}

/// Build the KMS request for `ciphertext`.
///
/// The encryption context holds exactly one entry when both context fields
/// are non-blank, and is empty otherwise.
pub fn decrypt_request(spec: &KmsSpec, ciphertext: Vec<u8>) -> DecryptRequest {
    let mut encryption_context = BTreeMap::new();
    if let Some((key, value)) = spec.encryption_context() {
        encryption_context.insert(key.to_string(), value.to_string());
    }
    DecryptRequest {
        ciphertext,
        encryption_context,
    }
}

/// Turn fetched bytes into the secret.
///
/// # Errors
///
/// Returns `DecryptError::Request` if KMS rejects the call and
/// `DecryptError::MissingPlaintext` if it answers without plaintext. Not
/// retried.
pub fn decrypt(mode: Decryption<'_>, bytes: Vec<u8>) -> Result<SecretValue> {
    let bytes = Zeroizing::new(bytes);
    match mode {
        Decryption::Plaintext => {
            debug!("object is server-side encrypted, using contents as-is");
            Ok(decode(&bytes))
        }
        Decryption::Kms { client, spec } => {
            let request = decrypt_request(spec, bytes.to_vec());
            if request.encryption_context.is_empty() {
                debug!("decrypting with kms");
            } else {
                debug!("decrypting with kms and encryption context");
            }

            let plaintext = client
                .decrypt(&request)
                .map_err(DecryptError::Request)?
                .ok_or(DecryptError::MissingPlaintext)?;
            let plaintext = Zeroizing::new(plaintext);

            trace!(plaintext_len = plaintext.len(), "decrypted with kms");
            Ok(decode(&plaintext))
        }
    }
}

fn decode(bytes: &[u8]) -> SecretValue {
    SecretValue::new(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, Error};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingKms {
        requests: RefCell<Vec<DecryptRequest>>,
        reply: Option<Vec<u8>>,
        fail: bool,
    }

    impl KmsClient for RecordingKms {
        fn decrypt(&self, request: &DecryptRequest) -> std::result::Result<Option<Vec<u8>>, BoxError> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                return Err("InvalidCiphertextException".into());
            }
            Ok(self.reply.clone())
        }
    }

    fn kms_replying(reply: &[u8]) -> RecordingKms {
        RecordingKms {
            reply: Some(reply.to_vec()),
            ..Default::default()
        }
    }

    #[test]
    fn test_plaintext_passthrough() {
        let secret = decrypt(Decryption::Plaintext, b"already-plain".to_vec()).unwrap();
        assert_eq!(secret.expose_secret(), "already-plain");
    }

    #[test]
    fn test_plaintext_invalid_utf8_replaced() {
        let secret = decrypt(Decryption::Plaintext, vec![b'a', 0xff, b'b']).unwrap();
        assert_eq!(secret.expose_secret(), "a\u{FFFD}b");
    }

    #[test]
    fn test_kms_with_context() {
        let kms = kms_replying(b"password");
        let spec = KmsSpec::new(
            Some("someEncryptContextKey".into()),
            Some("kmsEncryptContextValue".into()),
            true,
        );

        let secret = decrypt(
            Decryption::Kms {
                client: &kms,
                spec: &spec,
            },
            b"encryptedPassword".to_vec(),
        )
        .unwrap();

        assert_eq!(secret.expose_secret(), "password");
        let requests = kms.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ciphertext, b"encryptedPassword");
        assert_eq!(requests[0].encryption_context.len(), 1);
        assert_eq!(
            requests[0].encryption_context.get("someEncryptContextKey").map(String::as_str),
            Some("kmsEncryptContextValue")
        );
    }

    #[test]
    fn test_kms_without_key_has_empty_context() {
        let kms = kms_replying(b"password");
        let spec = KmsSpec::new(None, Some("kmsEncryptContextValue".into()), true);

        decrypt(
            Decryption::Kms {
                client: &kms,
                spec: &spec,
            },
            b"encryptedPassword".to_vec(),
        )
        .unwrap();

        assert!(kms.requests.borrow()[0].encryption_context.is_empty());
    }

    #[test]
    fn test_kms_invalid_utf8_replaced() {
        let kms = kms_replying(&[0xe2, 0x82]);
        let spec = KmsSpec::default();
        let secret = decrypt(
            Decryption::Kms {
                client: &kms,
                spec: &spec,
            },
            b"blob".to_vec(),
        )
        .unwrap();
        assert_eq!(secret.expose_secret(), "\u{FFFD}");
    }

    #[test]
    fn test_kms_failure_is_decrypt_error() {
        let kms = RecordingKms {
            fail: true,
            ..Default::default()
        };
        let spec = KmsSpec::default();
        let err = decrypt(
            Decryption::Kms {
                client: &kms,
                spec: &spec,
            },
            b"blob".to_vec(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decrypt(DecryptError::Request(_))));
        assert!(err.to_string().contains("InvalidCiphertextException"));
    }

    #[test]
    fn test_kms_missing_plaintext() {
        let kms = RecordingKms::default();
        let spec = KmsSpec::default();
        let err = decrypt(
            Decryption::Kms {
                client: &kms,
                spec: &spec,
            },
            b"blob".to_vec(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decrypt(DecryptError::MissingPlaintext)));
    }
}
