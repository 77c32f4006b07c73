//! Error types for the POD glue library.

/// Errors from POD construction, signing, parsing, and side-table loads.
#[derive(Debug, thiserror::Error)]
pub enum PodError {
    /// The supplied private key was not 32 bytes of hex or base64.
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// Failed to serialize a POD or its entries.
    #[error("POD serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The signing operation itself failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// A POD JSON document did not have the expected structure.
    #[error("malformed POD: {0}")]
    MalformedPod(String),

    /// I/O error while reading a side file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
