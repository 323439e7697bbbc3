use crate::codec::{decode, DecodeMessageError};
use crate::raw::message::RawEvent;
use inspector_types::{BreakpointId, CallFrame, ScriptId, BREAK_ON_START};
use serde::Deserialize;
use thiserror::Error;

/// Events, as received from the runtime
#[derive(Debug, Clone)]
pub enum Event {
    /// `Debugger.paused`
    Paused(PausedEvent),
    /// `Debugger.resumed`
    Resumed,
    /// `Debugger.scriptParsed`
    ScriptParsed(ScriptParsedEvent),
    /// `Runtime.executionContextDestroyed`
    ExecutionContextDestroyed(ExecutionContextDestroyedEvent),
    /// `Runtime.executionContextsCleared`
    ExecutionContextsCleared,
}

impl Event {
    /// Gets the protocol method of this event
    pub fn method(&self) -> &'static str {
        match self {
            Event::Paused(_) => "Debugger.paused",
            Event::Resumed => "Debugger.resumed",
            Event::ScriptParsed(_) => "Debugger.scriptParsed",
            Event::ExecutionContextDestroyed(_) => "Runtime.executionContextDestroyed",
            Event::ExecutionContextsCleared => "Runtime.executionContextsCleared",
        }
    }
}

/// The debuggee stopped
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedEvent {
    /// The call stack, top frame first
    pub call_frames: Vec<CallFrame>,
    /// Why the debuggee stopped
    pub reason: String,
    /// The breakpoints that were hit, if any
    #[serde(default)]
    pub hit_breakpoints: Vec<BreakpointId>,
}

impl PausedEvent {
    /// Whether this is the forced break issued before the first statement of the debuggee
    pub fn is_break_on_start(&self) -> bool {
        self.reason == BREAK_ON_START
    }

    /// Gets the frame execution stopped in
    pub fn top_frame(&self) -> Option<&CallFrame> {
        self.call_frames.first()
    }
}

/// A script was compiled
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptParsedEvent {
    /// The id of the new script
    pub script_id: ScriptId,
    /// The url of the script, empty for evaluated code
    #[serde(default)]
    pub url: String,
}

/// An execution context went away
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDestroyedEvent {
    /// The id of the destroyed context
    pub execution_context_id: i64,
}

impl TryFrom<RawEvent> for Event {
    type Error = NotAnEventError;

    fn try_from(value: RawEvent) -> Result<Self, Self::Error> {
        let (method, params) = value.into_parts();
        let malformed = |source| NotAnEventError::Malformed {
            method: method.clone(),
            source,
        };
        let event = match method.as_str() {
            "Debugger.paused" => Event::Paused(decode(params).map_err(malformed)?),
            "Debugger.resumed" => Event::Resumed,
            "Debugger.scriptParsed" => Event::ScriptParsed(decode(params).map_err(malformed)?),
            "Runtime.executionContextDestroyed" => {
                Event::ExecutionContextDestroyed(decode(params).map_err(malformed)?)
            }
            "Runtime.executionContextsCleared" => Event::ExecutionContextsCleared,
            _ => return Err(NotAnEventError::Unknown(method)),
        };
        Ok(event)
    }
}

/// The given raw event is not an event this client understands
#[derive(Debug, Error)]
pub enum NotAnEventError {
    /// No event with this method is known
    #[error("{0} is not a known event")]
    Unknown(String),
    /// The parameters of the event could not be decoded
    #[error("malformed {method} event")]
    Malformed {
        /// The method of the event
        method: String,
        /// Why decoding failed
        #[source]
        source: DecodeMessageError,
    },
}
