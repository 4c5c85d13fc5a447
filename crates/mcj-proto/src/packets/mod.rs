//! Handshake and login-state packet definitions.
//!
//! Play-state packets depend on NBT and registries and live in `mcj-data`.

pub mod encryption_request;
pub mod encryption_response;
pub mod handshake;
pub mod login_disconnect;
pub mod login_plugin;
pub mod login_start;
pub mod login_success;
pub mod set_compression;

pub use encryption_request::EncryptionRequest;
pub use encryption_response::EncryptionResponse;
pub use handshake::{Handshake, NextState};
pub use login_disconnect::LoginDisconnect;
pub use login_plugin::{LoginPluginRequest, LoginPluginResponse};
pub use login_start::LoginStart;
pub use login_success::{LoginSuccess, ProfileProperty};
pub use set_compression::SetCompression;

/// Packet ids of the handshake and login states. These never moved across
/// protocol versions.
pub mod id {
    pub const HANDSHAKE: i32 = 0x00;

    pub const LOGIN_DISCONNECT: i32 = 0x00;
    pub const ENCRYPTION_REQUEST: i32 = 0x01;
    pub const LOGIN_SUCCESS: i32 = 0x02;
    pub const SET_COMPRESSION: i32 = 0x03;
    pub const LOGIN_PLUGIN_REQUEST: i32 = 0x04;

    pub const LOGIN_START: i32 = 0x00;
    pub const ENCRYPTION_RESPONSE: i32 = 0x01;
    pub const LOGIN_PLUGIN_RESPONSE: i32 = 0x02;
}
