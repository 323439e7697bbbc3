use crate::codec::DecodeMessageError;
use crate::raw::message::{AnyRawMessage, ProtocolError, RawCommand, RawEvent, RawReply};
use serde::Deserialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tracing::{instrument, trace};

/// Codec for encoding and decoding inspector messages to and from websocket frames
#[derive(Debug, Default, Copy, Clone)]
pub struct RawCodec;

/// Every field any inbound message may carry
#[derive(Debug, Deserialize)]
struct Envelope {
    id: Option<u64>,
    method: Option<String>,
    #[serde(default)]
    params: Value,
    result: Option<Value>,
    error: Option<Value>,
}

impl RawCodec {
    /// Encodes a command into a text frame
    pub fn encode(&self, item: &RawCommand) -> Result<Message, DecodeMessageError> {
        let text = serde_json::to_string(item)?;
        trace!("encoded {text}");
        Ok(Message::text(text))
    }

    /// Decodes a frame. Frames that carry no message, like pings, decode to `None`.
    #[instrument(skip_all)]
    pub fn decode(&self, frame: Message) -> Result<Option<AnyRawMessage>, DecodeMessageError> {
        let text = match frame {
            Message::Text(text) => text,
            Message::Binary(_) => return Err(DecodeMessageError::BinaryFrame),
            other => {
                trace!("ignoring frame {other:?}");
                return Ok(None);
            }
        };
        let envelope: Envelope = serde_json::from_str(text.as_str())?;
        let message = match envelope {
            Envelope {
                id: Some(id),
                error: Some(error),
                ..
            } => {
                AnyRawMessage::Reply(RawReply::new_error(id, ProtocolError::from_value(error)))
            }
            Envelope {
                id: Some(id),
                result,
                ..
            } => AnyRawMessage::Reply(RawReply::new_reply(id, result.unwrap_or(Value::Null))),
            Envelope {
                method: Some(method),
                params,
                ..
            } => AnyRawMessage::Event(RawEvent::new_event(method, params)),
            _ => {
                return Err(DecodeMessageError::Unrecognized(
                    text.as_str().to_string(),
                ))
            }
        };
        Ok(Some(message))
    }
}
