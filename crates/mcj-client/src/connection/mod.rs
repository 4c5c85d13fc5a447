//! One connection to a server. The task that owns the stream also owns the
//! read buffer, frame codec and cipher state, so a mode switch always takes
//! effect before the next read.

mod login;
mod play;

use std::collections::HashMap;
use std::sync::Arc;

use bytes::BytesMut;
use mcj_command::ParserRegistry;
use mcj_crypto::{PacketDecryptor, PacketEncryptor};
use mcj_data::RegistrySet;
use mcj_proto::codec::ProtoEncode;
use mcj_proto::frame::{packet_payload, FrameCodec, RawPacket};
use mcj_proto::version::V_1_7_2;
use mcj_proto::{DecodeLimits, ProtocolVersion};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handshake::PacketSink;
use crate::session::SessionVerifier;
use crate::sink::WorldSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Login,
    Play,
    Closed,
}

/// Everything the connection needs from the config file.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub server_address: String,
    pub server_port: u16,
    pub username: String,
    pub version: ProtocolVersion,
    pub limits: DecodeLimits,
}

impl ConnectionOptions {
    /// Anything before 1.7.2 predates the framed protocol.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let id = config.server.protocol_version;
        if id < V_1_7_2 {
            return Err(ClientError::UnsupportedVersion(id));
        }
        Ok(Self {
            server_address: config.server.address.clone(),
            server_port: config.server.port,
            username: config.account.username.clone(),
            version: ProtocolVersion(id),
            limits: config.limits.decode_limits(),
        })
    }
}

pub struct Connection<S, W, V> {
    stream: S,
    read_buf: BytesMut,
    frames: FrameCodec,
    encryptor: Option<PacketEncryptor>,
    decryptor: Option<PacketDecryptor>,
    state: ConnectionState,
    options: ConnectionOptions,
    registries: Arc<RegistrySet>,
    parsers: Arc<ParserRegistry>,
    /// Play packet id -> registry name, for the packets this client handles.
    play_ids: HashMap<i32, &'static str>,
    verifier: Arc<V>,
    sink: W,
}

impl<W: WorldSink, V: SessionVerifier> Connection<TcpStream, W, V> {
    pub async fn connect(
        options: ConnectionOptions,
        registries: Arc<RegistrySet>,
        parsers: Arc<ParserRegistry>,
        verifier: Arc<V>,
        sink: W,
    ) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((options.server_address.as_str(), options.server_port)).await?;
        stream.set_nodelay(true)?;
        info!("Connected to {}:{}", options.server_address, options.server_port);
        Ok(Self::new(stream, options, registries, parsers, verifier, sink))
    }
}

impl<S, W, V> Connection<S, W, V>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: WorldSink,
    V: SessionVerifier,
{
    pub fn new(
        stream: S,
        options: ConnectionOptions,
        registries: Arc<RegistrySet>,
        parsers: Arc<ParserRegistry>,
        verifier: Arc<V>,
        sink: W,
    ) -> Self {
        let play_ids = play::play_packet_ids(registries.as_ref());
        Self {
            stream,
            read_buf: BytesMut::with_capacity(8192),
            frames: FrameCodec::new(),
            encryptor: None,
            decryptor: None,
            state: ConnectionState::Login,
            options,
            registries,
            parsers,
            play_ids,
            verifier,
            sink,
        }
    }

    /// Log in and process packets until the server disconnects, a frame
    /// fails to decode, or `shutdown` fires.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), ClientError> {
        let result = self.drive(&mut shutdown).await;
        if let Err(e) = &result {
            error!("Disconnecting: {e}");
        }
        self.state = ConnectionState::Closed;
        let _ = self.stream.shutdown().await;
        result
    }

    async fn drive(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<(), ClientError> {
        self.start_login().await?;
        loop {
            let packet = tokio::select! {
                packet = self.read_packet() => packet?,
                _ = shutdown.changed() => {
                    info!("Shutdown requested, closing connection");
                    return Ok(());
                }
            };
            match self.state {
                ConnectionState::Login => self.handle_login_packet(packet).await?,
                ConnectionState::Play => self.handle_play_packet(packet).await?,
                ConnectionState::Closed => {}
            }
            if self.state == ConnectionState::Closed {
                return Ok(());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    async fn read_packet(&mut self) -> Result<RawPacket, ClientError> {
        loop {
            if let Some(payload) = self.frames.decode(&mut self.read_buf)? {
                return Ok(RawPacket::parse(payload)?);
            }
            let start = self.read_buf.len();
            if self.stream.read_buf(&mut self.read_buf).await? == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            if let Some(decryptor) = self.decryptor.as_mut() {
                decryptor.decrypt(&mut self.read_buf[start..]);
            }
        }
    }

    async fn write_payload(&mut self, payload: &[u8]) -> Result<(), ClientError> {
        let mut frame = BytesMut::with_capacity(payload.len() + 5);
        self.frames.encode(payload, &mut frame)?;
        if let Some(encryptor) = self.encryptor.as_mut() {
            encryptor.encrypt(&mut frame[..]);
        }
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    async fn send<P: ProtoEncode>(&mut self, id: i32, packet: &P) -> Result<(), ClientError> {
        let version = self.options.version;
        let payload = packet_payload(id, |buf| packet.proto_encode(buf, version))?;
        self.write_payload(&payload).await
    }
}

impl<S, W, V> PacketSink for Connection<S, W, V>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: WorldSink,
    V: SessionVerifier,
{
    async fn send_payload(&mut self, payload: BytesMut) -> Result<(), ClientError> {
        self.write_payload(&payload).await
    }
}
