//! The crypto seam used by the login handshake.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::rsa_key::ServerPublicKey;
use crate::CryptoError;

/// The 16-byte AES key (and IV) agreed during login.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret([u8; 16]);

impl SharedSecret {
    pub const LEN: usize = 16;

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 16] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSecretLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// Operations the handshake needs. Swappable so the state machine can be
/// driven with fixed secrets in tests.
pub trait CryptoPrimitives: Send + Sync {
    type PublicKey: Send + Sync;

    fn generate_secret(&self) -> SharedSecret;

    fn decode_public_key(&self, der: &[u8]) -> Result<Self::PublicKey, CryptoError>;

    fn compute_server_hash(&self, server_id: &str, secret: &SharedSecret, key: &Self::PublicKey) -> String;

    fn encrypt_with_public_key(&self, key: &Self::PublicKey, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// OS randomness, RSA PKCS#1 v1.5, SHA-1.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCrypto;

impl CryptoPrimitives for DefaultCrypto {
    type PublicKey = ServerPublicKey;

    fn generate_secret(&self) -> SharedSecret {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        SharedSecret(bytes)
    }

    fn decode_public_key(&self, der: &[u8]) -> Result<ServerPublicKey, CryptoError> {
        ServerPublicKey::from_der(der)
    }

    fn compute_server_hash(&self, server_id: &str, secret: &SharedSecret, key: &ServerPublicKey) -> String {
        crate::server_hash(server_id, secret.as_bytes(), key.der())
    }

    fn encrypt_with_public_key(&self, key: &ServerPublicKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        key.encrypt(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa_key::tests::test_key;

    #[test]
    fn secrets_are_random() {
        let crypto = DefaultCrypto;
        assert_ne!(crypto.generate_secret(), crypto.generate_secret());
    }

    #[test]
    fn secret_from_slice() {
        assert!(SharedSecret::from_slice(&[1; 16]).is_ok());
        assert!(matches!(
            SharedSecret::from_slice(&[1; 15]),
            Err(CryptoError::InvalidSecretLength(15))
        ));
        assert_eq!(format!("{:?}", SharedSecret::from_bytes([9; 16])), "SharedSecret(..)");
    }

    #[test]
    fn hash_covers_key_der() {
        let (_, der) = test_key();
        let crypto = DefaultCrypto;
        let key = crypto.decode_public_key(der).unwrap();
        let secret = SharedSecret::from_bytes([3; 16]);
        let expected = crate::server_hash("", &[3; 16], der);
        assert_eq!(crypto.compute_server_hash("", &secret, &key), expected);
    }
}
