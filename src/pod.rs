//! The POD object model.
//!
//! A POD is a map of typed entries plus an Ed25519 signature over the
//! canonical JSON encoding of those entries and the base64 public key
//! of the signer. Past construction and verification the object is
//! treated as opaque: it is carried around as a JSON string in CSV
//! cells.

use std::collections::BTreeMap;
use std::convert::TryInto;

use base64::Engine;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PodError;

/// A single typed entry value: string, 64-bit integer, or boolean.
///
/// Serialized as `{"type": "string", "value": "..."}` and so on, the
/// shape the downstream consumers of the output CSV expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PodValue {
    String(String),
    Int(i64),
    Boolean(bool),
}

/// The typed key/value attribute set of a POD.
///
/// A `BTreeMap` so the canonical encoding is independent of insertion
/// order.
pub type PodEntries = BTreeMap<String, PodValue>;

/// A signed POD: entries, base64 signature, base64 signer public key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub entries: PodEntries,
    pub signature: String,
    pub signer_public_key: String,
}

impl Pod {
    /// Canonical byte encoding of an entry set: JSON with sorted keys.
    /// This is what gets signed and what the content id hashes.
    pub fn canonical_bytes(entries: &PodEntries) -> Result<Vec<u8>, PodError> {
        Ok(serde_json::to_vec(entries)?)
    }

    /// SHA-256 of the canonical entry bytes, hex encoded.
    pub fn content_id(&self) -> Result<String, PodError> {
        let bytes = Self::canonical_bytes(&self.entries)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Parse a POD from its JSON string form.
    pub fn from_json_str(json: &str) -> Result<Pod, PodError> {
        serde_json::from_str(json).map_err(|e| PodError::MalformedPod(e.to_string()))
    }

    /// Serialize to the JSON string stored in output CSV cells.
    pub fn to_json_string(&self) -> Result<String, PodError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the embedded Ed25519 signature against the canonical entry
    /// bytes. Any decoding failure counts as an invalid signature.
    pub fn verify_signature(&self) -> bool {
        let msg = match Self::canonical_bytes(&self.entries) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let public_key: [u8; 32] = match decode_b64(&self.signer_public_key) {
            Some(bytes) => bytes,
            None => return false,
        };
        let verifying_key = match VerifyingKey::from_bytes(&public_key) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let sig_bytes: [u8; 64] = match decode_b64(&self.signature) {
            Some(bytes) => bytes,
            None => return false,
        };
        let signature = Signature::from_bytes(&sig_bytes);
        verifying_key.verify_strict(&msg, &signature).is_ok()
    }
}

fn decode_b64<const N: usize>(input: &str) -> Option<[u8; N]> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(input)
        .ok()?;
    bytes.as_slice().try_into().ok()
}
