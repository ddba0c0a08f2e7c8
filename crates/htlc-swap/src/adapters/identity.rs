use crate::algorithms::sha256;
use crate::domain::{Address, Credential, SwapError};
use crate::ports::IdentityResolver;

/// Resolves a public key to the hex SHA-256 of its bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256IdentityResolver;

impl IdentityResolver for Sha256IdentityResolver {
    fn resolve(&self, credential: &Credential) -> Result<Address, SwapError> {
        if credential.public_key.is_empty() {
            return Err(SwapError::InvalidCredential(
                "public key is empty".to_string(),
            ));
        }
        Ok(Address::from_digest(&sha256(&credential.public_key)))
    }
}
