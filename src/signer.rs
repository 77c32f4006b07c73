//! Signing backends for PODs.
//!
//! The conversion pipeline is written against the [`PodSigner`] trait
//! so tests can substitute a failing or canned implementation for the
//! real Ed25519 backend.

use std::convert::TryInto;

use base64::Engine;
use ed25519_dalek::{Signer as _, SigningKey};

use crate::error::PodError;
use crate::pod::{Pod, PodEntries};

/// A backend that can turn a set of typed entries into a signed POD.
pub trait PodSigner {
    fn sign(&self, entries: PodEntries) -> Result<Pod, PodError>;
}

/// Ed25519 signer over the canonical JSON encoding of the entries.
pub struct Ed25519Signer {
    key: SigningKey,
}

impl Ed25519Signer {
    /// Build a signer from a 32-byte private key given as 64 hex
    /// characters or standard base64. Hex is tried first; both
    /// spellings appear in upstream usage.
    pub fn from_key_str(key: &str) -> Result<Self, PodError> {
        let bytes = decode_private_key(key)?;
        Ok(Ed25519Signer {
            key: SigningKey::from_bytes(&bytes),
        })
    }

    /// Base64 encoding of the signer's public key, as embedded in every
    /// POD this signer produces.
    pub fn public_key_b64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.key.verifying_key().to_bytes())
    }
}

impl PodSigner for Ed25519Signer {
    fn sign(&self, entries: PodEntries) -> Result<Pod, PodError> {
        let msg = Pod::canonical_bytes(&entries)?;
        let signature = self.key.sign(&msg);
        Ok(Pod {
            entries,
            signature: base64::engine::general_purpose::STANDARD.encode(signature.to_bytes()),
            signer_public_key: self.public_key_b64(),
        })
    }
}

/// Decode a 32-byte private key from hex (tried first) or base64.
pub fn decode_private_key(key: &str) -> Result<[u8; 32], PodError> {
    let bytes = hex::decode(key)
        .ok()
        .or_else(|| {
            base64::engine::general_purpose::STANDARD
                .decode(key)
                .ok()
        })
        .ok_or_else(|| PodError::InvalidKey("not hex or base64".to_owned()))?;
    let len = bytes.len();
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| PodError::InvalidKey(format!("expected 32 bytes, got {}", len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::PodValue;

    const TEST_KEY_HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn test_entries() -> PodEntries {
        let mut entries = PodEntries::new();
        entries.insert("name".to_owned(), PodValue::String("Test User".to_owned()));
        entries.insert(
            "email".to_owned(),
            PodValue::String("test@example.com".to_owned()),
        );
        entries.insert("timestamp".to_owned(), PodValue::Int(1_731_226_670_791));
        entries
    }

    #[test]
    fn sign_produces_verifiable_pod() {
        let signer = Ed25519Signer::from_key_str(TEST_KEY_HEX).unwrap();
        let pod = signer.sign(test_entries()).unwrap();
        assert!(pod.verify_signature());
        assert_eq!(pod.signer_public_key, signer.public_key_b64());
    }

    #[test]
    fn tampered_entry_fails_verification() {
        let signer = Ed25519Signer::from_key_str(TEST_KEY_HEX).unwrap();
        let mut pod = signer.sign(test_entries()).unwrap();
        pod.entries.insert(
            "email".to_owned(),
            PodValue::String("mallory@example.com".to_owned()),
        );
        assert!(!pod.verify_signature());
    }

    #[test]
    fn hex_and_base64_keys_agree() {
        let raw = hex::decode(TEST_KEY_HEX).unwrap();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&raw);

        let from_hex = Ed25519Signer::from_key_str(TEST_KEY_HEX).unwrap();
        let from_b64 = Ed25519Signer::from_key_str(&b64).unwrap();
        assert_eq!(from_hex.public_key_b64(), from_b64.public_key_b64());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(matches!(
            Ed25519Signer::from_key_str("not a key"),
            Err(PodError::InvalidKey(_))
        ));
        // Valid hex, wrong length.
        assert!(matches!(
            Ed25519Signer::from_key_str("abcd"),
            Err(PodError::InvalidKey(_))
        ));
    }
}
