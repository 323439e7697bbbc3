use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A command sent to the runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCommand {
    id: u64,
    method: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    params: Value,
}

impl RawCommand {
    /// Creates a new command with the given id
    pub fn new_command(id: u64, method: &'static str, params: Value) -> Self {
        Self { id, method, params }
    }

    /// Gets the id the reply will carry
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the method, e.g. `Runtime.evaluate`
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Gets the parameters
    pub fn params(&self) -> &Value {
        &self.params
    }
}

/// The code given to errors whose shape could not be read
pub const UNKNOWN_ERROR_CODE: i64 = -32603;

/// An error reported by the runtime in place of a result
#[derive(Debug, Clone, PartialEq, Deserialize, Error)]
#[error("{message} (code {code})")]
pub struct ProtocolError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl ProtocolError {
    /// Creates a new protocol error
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Gets the error code
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Gets the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets additional error data, if the runtime sent any
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Reads an `error` object. One of an unexpected shape keeps its raw text as the message.
    pub fn from_value(error: Value) -> Self {
        match serde_json::from_value(error.clone()) {
            Ok(error) => error,
            Err(_) => Self {
                code: UNKNOWN_ERROR_CODE,
                message: error.to_string(),
                data: Some(error),
            },
        }
    }
}

/// A reply to a previously sent [RawCommand]
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    id: u64,
    outcome: Result<Value, ProtocolError>,
}

impl RawReply {
    /// A successful reply
    pub fn new_reply(id: u64, result: Value) -> Self {
        Self {
            id,
            outcome: Ok(result),
        }
    }

    /// A failed reply
    pub fn new_error(id: u64, error: ProtocolError) -> Self {
        Self {
            id,
            outcome: Err(error),
        }
    }

    /// Gets the id of the command this answers
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the result or the error of the command
    pub fn into_result(self) -> Result<Value, ProtocolError> {
        self.outcome
    }
}

/// A notification pushed by the runtime
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    method: String,
    params: Value,
}

impl RawEvent {
    /// Creates a new event
    pub fn new_event(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Gets the method, e.g. `Debugger.paused`
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Gets the parameters
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Splits into method and parameters
    pub fn into_parts(self) -> (String, Value) {
        (self.method, self.params)
    }
}

/// Any message the runtime sends
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRawMessage {
    /// Reply message
    Reply(RawReply),
    /// Event message
    Event(RawEvent),
}
