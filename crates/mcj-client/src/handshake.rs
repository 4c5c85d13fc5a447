//! Client side of the login key exchange.
//!
//! ```text
//! AwaitingEncryptionRequest -> SecretGenerated -> JoinVerified
//!     -> ResponseSent -> SteadyState
//! ```
//! Any failure moves to `Closed`. A failed session join sends nothing.

use bytes::{Bytes, BytesMut};
use mcj_crypto::{CryptoPrimitives, PacketEncryption};
use mcj_proto::codec::ProtoEncode;
use mcj_proto::frame::packet_payload;
use mcj_proto::packets::{id, EncryptionRequest, EncryptionResponse};
use mcj_proto::ProtocolVersion;
use tracing::{debug, info, warn};

use crate::error::{ClientError, HandshakeError};
use crate::session::SessionVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitingEncryptionRequest,
    SecretGenerated,
    JoinVerified,
    ResponseSent,
    /// The cipher has been handed to the transport.
    SteadyState,
    Closed,
}

/// Where the encryption response goes. Payloads are packet id + body.
pub trait PacketSink {
    async fn send_payload(&mut self, payload: BytesMut) -> Result<(), ClientError>;
}

pub struct HandshakeSequence<'a, C: CryptoPrimitives, V: SessionVerifier> {
    crypto: &'a C,
    verifier: &'a V,
    version: ProtocolVersion,
    state: HandshakeState,
}

impl<'a, C: CryptoPrimitives, V: SessionVerifier> HandshakeSequence<'a, C, V> {
    pub fn new(crypto: &'a C, verifier: &'a V, version: ProtocolVersion) -> Self {
        Self {
            crypto,
            verifier,
            version,
            state: HandshakeState::AwaitingEncryptionRequest,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Run the exchange for one encryption request. The returned cipher
    /// must be installed before the next read from the server.
    pub async fn on_encryption_request<S: PacketSink>(
        &mut self,
        request: EncryptionRequest,
        sink: &mut S,
    ) -> Result<PacketEncryption, ClientError> {
        if self.state != HandshakeState::AwaitingEncryptionRequest {
            let state = self.state;
            self.state = HandshakeState::Closed;
            return Err(HandshakeError::UnexpectedState(state).into());
        }
        match self.exchange(request, sink).await {
            Ok(encryption) => {
                self.state = HandshakeState::SteadyState;
                info!("Encryption enabled");
                Ok(encryption)
            }
            Err(e) => {
                warn!("Key exchange failed in state {:?}: {e}", self.state);
                self.state = HandshakeState::Closed;
                Err(e)
            }
        }
    }

    async fn exchange<S: PacketSink>(
        &mut self,
        request: EncryptionRequest,
        sink: &mut S,
    ) -> Result<PacketEncryption, ClientError> {
        let secret = self.crypto.generate_secret();
        self.state = HandshakeState::SecretGenerated;

        let key = self
            .crypto
            .decode_public_key(&request.public_key)
            .map_err(HandshakeError::PublicKey)?;
        let hash = self.crypto.compute_server_hash(&request.server_id, &secret, &key);

        if request.should_authenticate {
            self.verifier
                .join_server(&hash)
                .await
                .map_err(|e| HandshakeError::JoinRejected(e.to_string()))?;
        } else {
            debug!("Server does not require authentication, skipping session join");
        }
        self.state = HandshakeState::JoinVerified;

        let shared_secret = self
            .crypto
            .encrypt_with_public_key(&key, secret.as_bytes())
            .map_err(HandshakeError::Encrypt)?;
        let verify_token = self
            .crypto
            .encrypt_with_public_key(&key, &request.verify_token)
            .map_err(HandshakeError::Encrypt)?;
        let response = EncryptionResponse {
            shared_secret: Bytes::from(shared_secret),
            verify_token: Bytes::from(verify_token),
        };
        let version = self.version;
        let payload =
            packet_payload(id::ENCRYPTION_RESPONSE, |buf| response.proto_encode(buf, version))?;
        sink.send_payload(payload).await?;
        self.state = HandshakeState::ResponseSent;

        Ok(PacketEncryption::new(&secret))
    }
}
