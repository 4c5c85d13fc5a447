//! AES-128-CFB8 stream encryption.
//!
//! Key and IV are both the 16-byte shared secret. The cipher state is
//! continuous across frames: each frame continues the stream where the
//! previous one left off. Each direction has its own instance.

use aes::Aes128;
use cfb8::cipher::generic_array::GenericArray;
use cfb8::cipher::KeyIvInit;
use cfb8::cipher::{BlockDecryptMut, BlockEncryptMut};
use cfb8::{Decryptor, Encryptor};

use crate::primitives::SharedSecret;

/// Outbound half.
pub struct PacketEncryptor {
    cipher: Encryptor<Aes128>,
}

impl PacketEncryptor {
    pub fn new(secret: &SharedSecret) -> Self {
        let key = secret.as_bytes();
        Self {
            cipher: Encryptor::<Aes128>::new(GenericArray::from_slice(key), GenericArray::from_slice(key)),
        }
    }

    /// Encrypt in place, advancing the stream.
    pub fn encrypt(&mut self, data: &mut [u8]) {
        // Byte-by-byte keeps the CFB8 shift register across calls.
        for byte in data.iter_mut() {
            let mut block = GenericArray::clone_from_slice(std::slice::from_ref(byte));
            self.cipher.encrypt_block_mut(&mut block);
            *byte = block[0];
        }
    }
}

/// Inbound half.
pub struct PacketDecryptor {
    cipher: Decryptor<Aes128>,
}

impl PacketDecryptor {
    pub fn new(secret: &SharedSecret) -> Self {
        let key = secret.as_bytes();
        Self {
            cipher: Decryptor::<Aes128>::new(GenericArray::from_slice(key), GenericArray::from_slice(key)),
        }
    }

    /// Decrypt in place, advancing the stream.
    pub fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            let mut block = GenericArray::clone_from_slice(std::slice::from_ref(byte));
            self.cipher.decrypt_block_mut(&mut block);
            *byte = block[0];
        }
    }
}

/// Both directions of one connection's cipher.
pub struct PacketEncryption {
    pub encryptor: PacketEncryptor,
    pub decryptor: PacketDecryptor,
}

impl PacketEncryption {
    pub fn new(secret: &SharedSecret) -> Self {
        Self {
            encryptor: PacketEncryptor::new(secret),
            decryptor: PacketDecryptor::new(secret),
        }
    }

    pub fn split(self) -> (PacketEncryptor, PacketDecryptor) {
        (self.encryptor, self.decryptor)
    }
}
