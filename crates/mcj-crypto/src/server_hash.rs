//! The session server hash.
//!
//! SHA-1 over `server_id || shared_secret || public_key_der`, rendered the
//! way `BigInteger(digest).toString(16)` does: the digest is read as a
//! signed two's-complement number, negatives get a leading `-`, and
//! leading zeros are dropped.

use sha1::{Digest, Sha1};

pub fn server_hash(server_id: &str, shared_secret: &[u8], public_key_der: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(server_id.as_bytes());
    hasher.update(shared_secret);
    hasher.update(public_key_der);
    let mut digest = [0u8; 20];
    digest.copy_from_slice(&hasher.finalize());
    signed_hex(digest)
}

fn signed_hex(mut digest: [u8; 20]) -> String {
    let negative = digest[0] & 0x80 != 0;
    if negative {
        let mut carry = true;
        for byte in digest.iter_mut().rev() {
            *byte = !*byte;
            if carry {
                let (sum, overflow) = byte.overflowing_add(1);
                *byte = sum;
                carry = overflow;
            }
        }
    }

    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    let trimmed = hex.trim_start_matches('0');
    let magnitude = if trimmed.is_empty() { "0" } else { trimmed };
    if negative {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            server_hash("Notch", &[], &[]),
            "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48"
        );
        assert_eq!(
            server_hash("jeb_", &[], &[]),
            "-7c9d5b0044c130109a5d7b5fb5c317c02b4e28c1"
        );
        assert_eq!(
            server_hash("simon", &[], &[]),
            "88e16a1019277b15d58faf0541e11910eb756f6"
        );
    }

    #[test]
    fn inputs_are_concatenated() {
        assert_eq!(server_hash("No", b"tc", b"h"), server_hash("Notch", &[], &[]));
    }

    #[test]
    fn signed_hex_edges() {
        assert_eq!(signed_hex([0; 20]), "0");
        let mut one = [0u8; 20];
        one[19] = 1;
        assert_eq!(signed_hex(one), "1");
        assert_eq!(signed_hex([0xFF; 20]), "-1");
        let mut min = [0u8; 20];
        min[0] = 0x80;
        assert_eq!(signed_hex(min), format!("-8{}", "0".repeat(39)));
    }
}
