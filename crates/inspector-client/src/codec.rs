//! Conversion between typed commands, replies and the JSON they travel as

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Encodes the parameters of a command
pub fn encode<T: Serialize>(params: &T) -> Result<Value, DecodeMessageError> {
    Ok(serde_json::to_value(params)?)
}

/// Decodes the result of a command or the parameters of an event
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, DecodeMessageError> {
    Ok(serde_json::from_value(value)?)
}

/// A message could not be encoded or decoded
#[derive(Debug, Error)]
pub enum DecodeMessageError {
    /// Malformed JSON, or JSON of the wrong shape
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A message that is neither a reply nor an event
    #[error("message is neither a reply nor an event: {0}")]
    Unrecognized(String),
    /// The protocol only uses text frames
    #[error("received a binary frame")]
    BinaryFrame,
}
