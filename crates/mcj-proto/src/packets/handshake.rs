//! Handshake (0x00) — Client → Server.

use bytes::BufMut;

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::ProtocolVersion;

/// State the connection moves to after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status = 1,
    Login = 2,
}

/// First packet on every connection; announces the client's protocol id.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub protocol_version: ProtocolVersion,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: NextState,
}

impl ProtoEncode for Handshake {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_var_int(buf, self.protocol_version.id());
        codec::put_string(buf, &self.server_address)?;
        buf.put_u16(self.server_port);
        codec::put_var_int(buf, self.next_state as i32);
        Ok(())
    }
}

impl ProtoDecode for Handshake {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let protocol_version = ProtocolVersion(cursor.read_var_int()?);
        let server_address = cursor.read_string()?;
        let server_port = cursor.read_u16()?;
        let next_state = match cursor.read_var_int()? {
            1 => NextState::Status,
            2 => NextState::Login,
            other => {
                return Err(ProtoError::UnknownTypeId {
                    kind: "next state",
                    id: other,
                })
            }
        };
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}
