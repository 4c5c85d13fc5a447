//! Server RSA public key handling.

use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::CryptoError;

/// A decoded server key. The original DER bytes are kept because the
/// server hash is computed over them.
#[derive(Debug, Clone)]
pub struct ServerPublicKey {
    key: RsaPublicKey,
    der: Vec<u8>,
}

impl ServerPublicKey {
    /// Decode an X.509 SubjectPublicKeyInfo DER blob.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self {
            key,
            der: der.to_vec(),
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Modulus size in bytes; every ciphertext has exactly this length.
    pub fn size(&self) -> usize {
        self.key.size()
    }

    /// RSA PKCS#1 v1.5 encryption.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, data)
            .map_err(|e| CryptoError::Encrypt(e.to_string()))
    }
}
