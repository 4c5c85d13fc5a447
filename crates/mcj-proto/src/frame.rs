//! Length-prefixed frames with optional zlib compression.
//!
//! ```text
//! uncompressed:  VarInt length | VarInt packet id | body
//! compressed:    VarInt length | VarInt data length | zlib(packet id | body)
//! ```
//!
//! A data length of `0` means the rest of the frame is stored uncompressed
//! because it was smaller than the negotiated threshold.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::compression::{compress, decompress_with, CompressionAlgorithm};
use crate::cursor::{ByteCursor, DecodeLimits};
use crate::error::ProtoError;
use crate::types::VarInt;
use crate::version::ProtocolVersion;

/// Largest frame length the protocol allows (three VarInt bytes).
pub const MAX_FRAME_LEN: usize = 2_097_151;

/// Largest inflated payload accepted from a compressed frame.
pub const MAX_DECOMPRESSED_LEN: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    compression_threshold: Option<usize>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compression_threshold(&self) -> Option<usize> {
        self.compression_threshold
    }

    /// Enable compression; a negative threshold disables it, as the
    /// set-compression packet specifies.
    pub fn set_compression_threshold(&mut self, threshold: i32) {
        self.compression_threshold = usize::try_from(threshold).ok();
    }

    /// Split one complete frame off the front of `src` and return its
    /// (inflated) payload, or `None` if more bytes are needed.
    pub fn decode(&self, src: &mut BytesMut) -> Result<Option<Bytes>, ProtoError> {
        let Some((len, header)) = VarInt::peek(&src[..])? else {
            return Ok(None);
        };
        let len = usize::try_from(len).map_err(|_| ProtoError::NegativeLength(len))?;
        if len > MAX_FRAME_LEN {
            return Err(ProtoError::FrameTooLarge {
                len,
                max: MAX_FRAME_LEN,
            });
        }
        if src.len() < header + len {
            return Ok(None);
        }
        src.advance(header);
        let frame = src.split_to(len).freeze();

        match self.compression_threshold {
            None => Ok(Some(frame)),
            Some(_) => inflate(frame).map(Some),
        }
    }

    /// Append `payload` (packet id + body) to `dst` as one frame.
    pub fn encode(&self, payload: &[u8], dst: &mut BytesMut) -> Result<(), ProtoError> {
        let Some(threshold) = self.compression_threshold else {
            return put_frame(dst, &[], payload);
        };

        let mut header = BytesMut::with_capacity(VarInt::MAX_BYTES);
        if payload.len() >= threshold {
            let compressed = compress(payload, CompressionAlgorithm::Zlib, 6)?;
            VarInt::write(&mut header, payload.len() as i32);
            trace!(raw = payload.len(), compressed = compressed.len(), "compressed frame");
            put_frame(dst, &header, &compressed)
        } else {
            VarInt::write(&mut header, 0);
            put_frame(dst, &header, payload)
        }
    }
}

fn put_frame(dst: &mut BytesMut, header: &[u8], body: &[u8]) -> Result<(), ProtoError> {
    let len = header.len() + body.len();
    if len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }
    dst.reserve(VarInt::encoded_len(len as i32) + len);
    VarInt::write(dst, len as i32);
    dst.put_slice(header);
    dst.put_slice(body);
    Ok(())
}

fn inflate(frame: Bytes) -> Result<Bytes, ProtoError> {
    let mut cursor = ByteCursor::new(frame, ProtocolVersion::default());
    let declared = cursor.read_count()?;
    let data = cursor.read_remaining();
    if declared == 0 {
        return Ok(data);
    }
    if declared > MAX_DECOMPRESSED_LEN {
        return Err(ProtoError::LengthTooLarge {
            declared,
            max: MAX_DECOMPRESSED_LEN,
        });
    }
    let inflated = decompress_with(&data, CompressionAlgorithm::Zlib, declared)?;
    if inflated.len() != declared {
        return Err(ProtoError::DecompressedSizeMismatch {
            declared,
            actual: inflated.len(),
        });
    }
    Ok(Bytes::from(inflated))
}

// ---------------------------------------------------------------------------
// RawPacket
// ---------------------------------------------------------------------------

/// A frame payload split into its packet id and undecoded body.
#[derive(Debug, Clone)]
pub struct RawPacket {
    pub id: i32,
    pub body: Bytes,
}

impl RawPacket {
    pub fn parse(payload: Bytes) -> Result<Self, ProtoError> {
        let mut cursor = ByteCursor::new(payload, ProtocolVersion::default());
        let id = cursor.read_var_int()?;
        Ok(Self {
            id,
            body: cursor.read_remaining(),
        })
    }

    /// A cursor over the body for the connection's version.
    pub fn cursor(&self, version: ProtocolVersion, limits: DecodeLimits) -> ByteCursor {
        ByteCursor::with_limits(self.body.clone(), version, limits)
    }
}

/// Serialize a packet id followed by its encoded body.
pub fn packet_payload(
    id: i32,
    body: impl FnOnce(&mut BytesMut) -> Result<(), ProtoError>,
) -> Result<BytesMut, ProtoError> {
    let mut buf = BytesMut::new();
    VarInt::write(&mut buf, id);
    body(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_roundtrip() {
        let codec = FrameCodec::new();
        let mut wire = BytesMut::new();
        codec.encode(&[0x00, 0x01, 0x02], &mut wire).unwrap();
        assert_eq!(&wire[..], &[0x03, 0x00, 0x01, 0x02]);

        let payload = codec.decode(&mut wire).unwrap().unwrap();
        assert_eq!(&payload[..], &[0x00, 0x01, 0x02]);
        assert!(wire.is_empty());
    }

    #[test]
    fn partial_frame_waits() {
        let codec = FrameCodec::new();
        let mut wire = BytesMut::from(&[0x05, 0x00, 0x01][..]);
        assert!(codec.decode(&mut wire).unwrap().is_none());
        assert_eq!(wire.len(), 3);

        wire.extend_from_slice(&[0x02, 0x03, 0x04]);
        let payload = codec.decode(&mut wire).unwrap().unwrap();
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn two_frames_in_one_read() {
        let codec = FrameCodec::new();
        let mut wire = BytesMut::from(&[0x01, 0xAA, 0x02, 0xBB, 0xCC][..]);
        assert_eq!(&codec.decode(&mut wire).unwrap().unwrap()[..], &[0xAA]);
        assert_eq!(&codec.decode(&mut wire).unwrap().unwrap()[..], &[0xBB, 0xCC]);
        assert!(codec.decode(&mut wire).unwrap().is_none());
    }

    #[test]
    fn oversized_frame_rejected() {
        let codec = FrameCodec::new();
        let mut wire = BytesMut::new();
        VarInt::write(&mut wire, MAX_FRAME_LEN as i32 + 1);
        assert!(matches!(
            codec.decode(&mut wire),
            Err(ProtoError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn below_threshold_is_stored() {
        let mut codec = FrameCodec::new();
        codec.set_compression_threshold(256);
        let mut wire = BytesMut::new();
        codec.encode(&[0x10, 0x20], &mut wire).unwrap();
        assert_eq!(&wire[..], &[0x03, 0x00, 0x10, 0x20]);
        assert_eq!(&codec.decode(&mut wire).unwrap().unwrap()[..], &[0x10, 0x20]);
    }

    #[test]
    fn above_threshold_is_compressed() {
        let mut codec = FrameCodec::new();
        codec.set_compression_threshold(64);
        let payload = vec![0x42u8; 1000];
        let mut wire = BytesMut::new();
        codec.encode(&payload, &mut wire).unwrap();
        assert!(wire.len() < payload.len());

        let decoded = codec.decode(&mut wire).unwrap().unwrap();
        assert_eq!(&decoded[..], &payload[..]);
    }

    #[test]
    fn declared_size_mismatch() {
        let compressed = compress(&[1, 2, 3], CompressionAlgorithm::Zlib, 6).unwrap();
        let mut body = BytesMut::new();
        VarInt::write(&mut body, 2);
        body.extend_from_slice(&compressed);
        let mut wire = BytesMut::new();
        VarInt::write(&mut wire, body.len() as i32);
        wire.extend_from_slice(&body);

        let mut codec = FrameCodec::new();
        codec.set_compression_threshold(0);
        assert!(codec.decode(&mut wire).is_err());
    }

    #[test]
    fn negative_threshold_disables() {
        let mut codec = FrameCodec::new();
        codec.set_compression_threshold(256);
        codec.set_compression_threshold(-1);
        assert_eq!(codec.compression_threshold(), None);
    }

    #[test]
    fn raw_packet_split() {
        let payload = packet_payload(0x26, |buf| {
            buf.put_slice(&[7, 8]);
            Ok(())
        })
        .unwrap();
        let packet = RawPacket::parse(payload.freeze()).unwrap();
        assert_eq!(packet.id, 0x26);
        assert_eq!(&packet.body[..], &[7, 8]);
    }
}
