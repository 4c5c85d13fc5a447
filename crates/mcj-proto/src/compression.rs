//! Compression/decompression for frames and item-stack NBT.

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::error::ProtoError;

/// Compression algorithms used by the Java protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    /// Compressed frame payloads.
    Zlib,
    /// Pre-14w28b item-stack NBT.
    Gzip,
}

/// Compress data using the specified algorithm.
pub fn compress(
    data: &[u8],
    algorithm: CompressionAlgorithm,
    level: u32,
) -> Result<Vec<u8>, ProtoError> {
    let map_err = |e: std::io::Error| ProtoError::CompressError(e.to_string());
    match algorithm {
        CompressionAlgorithm::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
            encoder.write_all(data).map_err(map_err)?;
            encoder.finish().map_err(map_err)
        }
        CompressionAlgorithm::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
            encoder.write_all(data).map_err(map_err)?;
            encoder.finish().map_err(map_err)
        }
    }
}

/// Decompress data, refusing to inflate past `max_len` bytes.
pub fn decompress_with(
    data: &[u8],
    algorithm: CompressionAlgorithm,
    max_len: usize,
) -> Result<Vec<u8>, ProtoError> {
    match algorithm {
        CompressionAlgorithm::Zlib => read_bounded(ZlibDecoder::new(data), max_len),
        CompressionAlgorithm::Gzip => read_bounded(GzDecoder::new(data), max_len),
    }
}

fn read_bounded(reader: impl Read, max_len: usize) -> Result<Vec<u8>, ProtoError> {
    let mut output = Vec::new();
    // One extra byte tells "exactly max_len" apart from "more than max_len".
    reader
        .take(max_len as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|e| ProtoError::DecompressError(e.to_string()))?;
    if output.len() > max_len {
        return Err(ProtoError::LengthTooLarge {
            declared: output.len(),
            max: max_len,
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1 << 20;

    #[test]
    fn zlib_roundtrip() {
        let data = b"Hello, server! This is a test of zlib compression.";
        let compressed = compress(data, CompressionAlgorithm::Zlib, 6).unwrap();
        assert_eq!(compressed[0], 0x78);
        let decompressed = decompress_with(&compressed, CompressionAlgorithm::Zlib, MAX).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn gzip_roundtrip() {
        let data = b"item stack tag";
        let compressed = compress(data, CompressionAlgorithm::Gzip, 6).unwrap();
        assert_eq!(&compressed[..2], &[0x1F, 0x8B]);
        let decompressed = decompress_with(&compressed, CompressionAlgorithm::Gzip, MAX).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn zlib_empty() {
        let compressed = compress(b"", CompressionAlgorithm::Zlib, 6).unwrap();
        let decompressed = decompress_with(&compressed, CompressionAlgorithm::Zlib, MAX).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn inflation_bomb_is_capped() {
        let data = vec![0u8; 64 * 1024];
        let compressed = compress(&data, CompressionAlgorithm::Zlib, 9).unwrap();
        assert!(matches!(
            decompress_with(&compressed, CompressionAlgorithm::Zlib, 1024),
            Err(ProtoError::LengthTooLarge { max: 1024, .. })
        ));
    }

    #[test]
    fn garbage_fails() {
        assert!(decompress_with(b"\x00\x01\x02\x03", CompressionAlgorithm::Zlib, MAX).is_err());
        assert!(decompress_with(b"\x00\x01\x02\x03", CompressionAlgorithm::Gzip, MAX).is_err());
    }
}
