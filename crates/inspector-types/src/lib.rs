//! # `inspector-types`
//! Provides the types of the [V8 inspector protocol] that are needed to pause a script and look at
//! its objects.
//!
//! [V8 inspector protocol]: https://chromedevtools.github.io/devtools-protocol/v8/

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use constants::*;
pub use ids::*;
pub use objects::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod constants;
mod ids;
mod macros;
mod objects;

/// A location in a script. Lines and columns are 0-based.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// The script this location is in
    pub script_id: ScriptId,
    /// Line number in the script
    pub line_number: u32,
    /// Column number in the script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
}

/// One lexical scope of a paused call frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// The kind of scope
    #[serde(rename = "type")]
    pub kind: ScopeType,
    /// Holds the bindings of the scope. Either a handle whose properties are the bindings, or
    /// (rarely) an inline JSON object mapping binding names to values.
    pub object: RemoteObject,
    /// Name of the function owning the scope, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A paused execution context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Id of the frame, valid while paused
    pub call_frame_id: CallFrameId,
    /// Name of the function being executed
    #[serde(default)]
    pub function_name: String,
    /// Where execution is paused
    pub location: Location,
    /// The url of the script being executed
    #[serde(default)]
    pub url: String,
    /// The scopes surrounding the paused location, innermost first
    pub scope_chain: Vec<Scope>,
    /// The `this` value of the frame
    #[serde(rename = "this", default, skip_serializing_if = "Option::is_none")]
    pub this: Option<RemoteObject>,
}

/// Unknown tag constant
#[derive(Debug, Error)]
#[error("Unknown tag constant: {0:?}")]
pub struct UnknownTagError(String);

mod private {
    pub trait Identifiable {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_type_conversion() {
        let tag = RemoteObjectType::try_from("function").expect("function is a known type");
        assert_eq!(tag, RemoteObjectType::Function);
        assert_eq!(<&'static str>::from(tag), "function");
        RemoteObjectType::try_from("frobnicate").expect_err("frobnicate is not a known type");
    }

    #[test]
    fn test_decode_remote_object() {
        let json = r#"{"type":"object","className":"Point","description":"Point","objectId":"1.2.3"}"#;
        let object: RemoteObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.kind, RemoteObjectType::Object);
        assert_eq!(object.class_name.as_deref(), Some("Point"));
        assert_eq!(object.object_id, Some(RemoteObjectId::new("1.2.3")));
        assert!(!object.is_null());
    }

    #[test]
    fn test_decode_null() {
        let json = r#"{"type":"object","subtype":"null","value":null}"#;
        let object: RemoteObject = serde_json::from_str(json).unwrap();
        assert!(object.is_null());
        assert_eq!(object, RemoteObject::null());
    }

    #[test]
    fn test_decode_call_frame() {
        let json = r#"{
            "callFrameId": "frame-0",
            "functionName": "",
            "location": {"scriptId": "42", "lineNumber": 8, "columnNumber": 0},
            "url": "file:///tmp/point.js",
            "scopeChain": [
                {"type": "local", "object": {"type": "object", "className": "Object", "objectId": "scope-0"}},
                {"type": "global", "object": {"type": "object", "className": "global", "objectId": "scope-1"}}
            ],
            "this": {"type": "undefined"}
        }"#;
        let frame: CallFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.location.line_number, 8);
        assert_eq!(frame.scope_chain.len(), 2);
        assert_eq!(frame.scope_chain[0].kind, ScopeType::Local);
        assert_eq!(frame.scope_chain[1].kind, ScopeType::Global);
    }

    #[test]
    fn test_accessor_without_getter() {
        let descriptor = PropertyDescriptor::accessor("total", RemoteObject::undefined());
        assert!(descriptor.getter().is_none());
        let descriptor =
            PropertyDescriptor::accessor("total", RemoteObject::function(RemoteObjectId::new("7")));
        assert!(descriptor.getter().is_some());
    }

    #[test]
    fn test_unserializable_numbers() {
        assert_eq!(
            RemoteObject::number(f64::NAN).unserializable_value.as_deref(),
            Some("NaN")
        );
        assert_eq!(
            RemoteObject::number(f64::NEG_INFINITY)
                .unserializable_value
                .as_deref(),
            Some("-Infinity")
        );
        assert_eq!(RemoteObject::number(2.0).value, Some(serde_json::json!(2.0)));
    }

    #[test]
    fn test_exception_message() {
        let json = r#"{"exceptionId":1,"text":"Uncaught","lineNumber":0,"columnNumber":6,
            "exception":{"type":"object","subtype":"error","className":"Error","description":"Error: boom\n    at <anonymous>:1:7"}}"#;
        let details: ExceptionDetails = serde_json::from_str(json).unwrap();
        assert!(details.message().starts_with("Uncaught Error: boom"));
    }
}
