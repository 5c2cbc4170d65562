//! Wire protocol shared by the grid world server and its clients.

pub mod assets;
pub mod channels;
pub mod codec;
pub mod constants;
pub mod error;
pub mod messages;

pub use codec::{decode_server_message, encode_client_message};
pub use error::DecodeError;

#[cfg(feature = "quinnet")]
pub mod quinnet_adapter;
