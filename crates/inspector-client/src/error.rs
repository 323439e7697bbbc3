use crate::codec::DecodeMessageError;
use crate::raw::message::ProtocolError;
use std::io;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// An error talking to the runtime
#[derive(Debug, Error)]
pub enum InspectorError {
    /// An io error
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The websocket failed
    #[error(transparent)]
    WebSocket(Box<tungstenite::Error>),
    /// The runtime answered a command with an error
    #[error("{method} failed: {error}")]
    Protocol {
        /// The method of the failed command
        method: &'static str,
        /// The error sent by the runtime
        #[source]
        error: ProtocolError,
    },
    /// A message could not be encoded or decoded
    #[error(transparent)]
    Decode(#[from] DecodeMessageError),
    /// The connection closed before a reply arrived
    #[error("the connection to the runtime is closed")]
    Disconnected,
}

impl From<tungstenite::Error> for InspectorError {
    fn from(value: tungstenite::Error) -> Self {
        match value {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                InspectorError::Disconnected
            }
            tungstenite::Error::Io(io) => InspectorError::Io(io),
            other => InspectorError::WebSocket(Box::new(other)),
        }
    }
}
