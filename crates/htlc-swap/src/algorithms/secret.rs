//! # Secret Generation and Verification
//!
//! SHA-256 hash locks over claim secrets.

use crate::domain::{Hash, Image, Secret};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a random secret: 32 bytes from the thread RNG, hex encoded.
///
/// Convenience for off-ledger tooling. The engine never generates secrets.
pub fn generate_secret() -> Secret {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Secret::new(hex::encode(bytes))
}

/// SHA-256 of arbitrary bytes.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Image of a secret: SHA-256 over its UTF-8 bytes.
pub fn create_image(secret: &Secret) -> Image {
    Image::new(sha256(secret.as_bytes()))
}

/// Verify that a secret hashes to an image.
pub fn verify_secret(secret: &Secret, image: &Image) -> bool {
    create_image(secret) == *image
}
