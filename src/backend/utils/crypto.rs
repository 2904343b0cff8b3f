// src/backend/utils/crypto.rs
use sha2::{Digest, Sha256};

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn calculate_sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Opaque payload reference stored on a record for the uploaded file.
pub fn payload_ref(data: &[u8]) -> String {
    format!("sha256:{}", calculate_sha256_hex(data))
}
