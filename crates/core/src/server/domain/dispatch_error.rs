use thiserror::Error;

use crate::filtering::domain::filter::FilterError;
use crate::imaging::infrastructure::image_codec::ImageCodecError;
use crate::parallel::domain::band_executor::EngineError;
use crate::protocol::domain::protocol_error::ProtocolError;

/// Everything that can go wrong while serving one connection.
///
/// The display text doubles as the message of the Error frame sent back to
/// the client.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed request: {0}")]
    Request(#[source] ProtocolError),
    #[error(transparent)]
    Image(#[from] ImageCodecError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("filter failed: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to send response: {0}")]
    Reply(#[source] ProtocolError),
}

impl DispatchError {
    /// True when the connection itself is gone and no reply can be written.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Request(e) | Self::Reply(e) => e.is_transport(),
            _ => false,
        }
    }
}
