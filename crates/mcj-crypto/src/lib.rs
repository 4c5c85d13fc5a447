//! Cryptography for the login key exchange: RSA PKCS#1 v1.5, SHA-1 server
//! hash, AES-128-CFB8 stream cipher.

pub mod aes;
pub mod primitives;
pub mod rsa_key;
pub mod server_hash;

pub use aes::{PacketDecryptor, PacketEncryption, PacketEncryptor};
pub use primitives::{CryptoPrimitives, DefaultCrypto, SharedSecret};
pub use rsa_key::ServerPublicKey;
pub use server_hash::server_hash;

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("RSA encryption failed: {0}")]
    Encrypt(String),

    #[error("shared secret must be 16 bytes, got {0}")]
    InvalidSecretLength(usize),
}
