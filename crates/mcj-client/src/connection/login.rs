use mcj_crypto::DefaultCrypto;
use mcj_proto::codec::ProtoDecode;
use mcj_proto::packets::{
    id, EncryptionRequest, Handshake, LoginDisconnect, LoginPluginRequest, LoginPluginResponse,
    LoginStart, LoginSuccess, NextState, SetCompression,
};
use mcj_proto::version::V_1_20_2;
use mcj_proto::ProtoError;
use tracing::{debug, info, warn};

use super::*;
use crate::error::HandshakeError;
use crate::handshake::{HandshakeSequence, HandshakeState};

impl<S, W, V> Connection<S, W, V>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: WorldSink,
    V: SessionVerifier,
{
    pub(super) async fn start_login(&mut self) -> Result<(), ClientError> {
        let handshake = Handshake {
            protocol_version: self.options.version,
            server_address: self.options.server_address.clone(),
            server_port: self.options.server_port,
            next_state: NextState::Login,
        };
        self.send(id::HANDSHAKE, &handshake).await?;

        let login_start = LoginStart {
            username: self.options.username.clone(),
            uuid: None,
        };
        self.send(id::LOGIN_START, &login_start).await?;
        info!(
            "Sent LoginStart for {} (protocol {})",
            self.options.username,
            self.options.version.id()
        );
        Ok(())
    }

    pub(super) async fn handle_login_packet(&mut self, packet: RawPacket) -> Result<(), ClientError> {
        let mut cursor = packet.cursor(self.options.version, self.options.limits);
        match packet.id {
            id::LOGIN_DISCONNECT => {
                let disconnect = LoginDisconnect::proto_decode(&mut cursor)?;
                return Err(ClientError::Disconnected(disconnect.reason));
            }
            id::ENCRYPTION_REQUEST => {
                let request = EncryptionRequest::proto_decode(&mut cursor)?;
                self.handle_encryption_request(request).await?;
            }
            id::SET_COMPRESSION => {
                let SetCompression { threshold } = SetCompression::proto_decode(&mut cursor)?;
                self.frames.set_compression_threshold(threshold);
                info!("Compression threshold set to {threshold}");
            }
            id::LOGIN_SUCCESS => {
                let login = LoginSuccess::proto_decode(&mut cursor)?;
                self.sink.login_success(login);
                if self.options.version.is_at_least(V_1_20_2) {
                    warn!(
                        "Protocol {} continues with a configuration phase, which this client does not drive; closing",
                        self.options.version.id()
                    );
                    self.state = ConnectionState::Closed;
                } else {
                    info!("Login complete, entering play state");
                    self.state = ConnectionState::Play;
                }
            }
            id::LOGIN_PLUGIN_REQUEST => {
                let request = LoginPluginRequest::proto_decode(&mut cursor)?;
                debug!("Declining login plugin channel {}", request.channel);
                self.send(
                    id::LOGIN_PLUGIN_RESPONSE,
                    &LoginPluginResponse::not_understood(request.message_id),
                )
                .await?;
            }
            other => {
                return Err(ProtoError::UnexpectedPacket {
                    state: "login",
                    id: other,
                }
                .into())
            }
        }
        Ok(())
    }

    async fn handle_encryption_request(&mut self, request: EncryptionRequest) -> Result<(), ClientError> {
        if self.encryptor.is_some() {
            return Err(HandshakeError::UnexpectedState(HandshakeState::SteadyState).into());
        }
        info!("Server requested encryption");
        let verifier = Arc::clone(&self.verifier);
        let crypto = DefaultCrypto;
        let mut handshake = HandshakeSequence::new(&crypto, verifier.as_ref(), self.options.version);
        let encryption = handshake.on_encryption_request(request, self).await?;

        let (encryptor, mut decryptor) = encryption.split();
        // Anything already buffered arrived after the server switched.
        if !self.read_buf.is_empty() {
            decryptor.decrypt(&mut self.read_buf[..]);
        }
        self.encryptor = Some(encryptor);
        self.decryptor = Some(decryptor);
        Ok(())
    }
}
