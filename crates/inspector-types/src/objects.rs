//! Mirrors of values living inside the debuggee

use crate::constants::{RemoteObjectType, NULL_SUBTYPE};
use crate::ids::{RemoteObjectId, ScriptId};
use serde::{Deserialize, Serialize};

/// A mirror of a value in the debuggee.
///
/// Primitives usually carry their value inline. Everything else is only reachable through its
/// [`RemoteObjectId`], which the runtime owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// The `typeof` of the value
    #[serde(rename = "type")]
    pub kind: RemoteObjectType,
    /// A finer classification for objects, e.g. `array` or `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// The constructor name, for objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// The value itself, for values that can be represented as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// String form of numbers that have no JSON representation (`NaN`, `-0`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    /// A human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The handle, for non-primitive values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

impl RemoteObject {
    fn primitive(kind: RemoteObjectType, value: Option<serde_json::Value>) -> Self {
        Self {
            kind,
            subtype: None,
            class_name: None,
            value,
            unserializable_value: None,
            description: None,
            object_id: None,
        }
    }

    /// The `undefined` value
    pub fn undefined() -> Self {
        Self::primitive(RemoteObjectType::Undefined, None)
    }

    /// The `null` value
    pub fn null() -> Self {
        Self {
            subtype: Some(NULL_SUBTYPE.to_string()),
            ..Self::primitive(RemoteObjectType::Object, None)
        }
    }

    /// A boolean primitive
    pub fn boolean(value: bool) -> Self {
        Self::primitive(RemoteObjectType::Boolean, Some(value.into()))
    }

    /// A number primitive
    pub fn number(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::primitive(RemoteObjectType::Number, Some(number.into())),
            None => {
                let unserializable = if value.is_nan() {
                    "NaN"
                } else if value > 0.0 {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                Self {
                    unserializable_value: Some(unserializable.to_string()),
                    ..Self::primitive(RemoteObjectType::Number, None)
                }
            }
        }
    }

    /// A string primitive
    pub fn string(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::primitive(RemoteObjectType::String, Some(value.into()))
    }

    /// A handle to an object of the given class
    pub fn object(id: RemoteObjectId, class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            object_id: Some(id),
            ..Self::primitive(RemoteObjectType::Object, None)
        }
    }

    /// A handle to a callable
    pub fn function(id: RemoteObjectId) -> Self {
        Self {
            class_name: Some("Function".to_string()),
            object_id: Some(id),
            ..Self::primitive(RemoteObjectType::Function, None)
        }
    }

    /// Mirrors a value the runtime already sent as plain JSON
    pub fn from_inline(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::null(),
            serde_json::Value::Bool(b) => Self::boolean(*b),
            serde_json::Value::Number(_) => {
                Self::primitive(RemoteObjectType::Number, Some(value.clone()))
            }
            serde_json::Value::String(s) => Self::string(s.as_str()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                let class_name = if value.is_array() { "Array" } else { "Object" };
                Self {
                    class_name: Some(class_name.to_string()),
                    ..Self::primitive(RemoteObjectType::Object, Some(value.clone()))
                }
            }
        }
    }

    /// Whether this mirrors the `null` value
    pub fn is_null(&self) -> bool {
        self.kind == RemoteObjectType::Object && self.subtype.as_deref() == Some(NULL_SUBTYPE)
    }
}

/// One property of a remote object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// The property name. Symbol keyed properties carry the symbol's description here.
    pub name: String,
    /// The value, for data properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RemoteObject>,
    /// Whether the value can be changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    /// The getter, for accessor properties. `undefined` when the accessor has no getter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<RemoteObject>,
    /// The setter, for accessor properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<RemoteObject>,
    /// Whether the property may be deleted or redefined
    #[serde(default)]
    pub configurable: bool,
    /// Whether the property shows up during enumeration
    #[serde(default)]
    pub enumerable: bool,
    /// Whether reading the property threw
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_thrown: Option<bool>,
    /// Whether the property is an own property of the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_own: Option<bool>,
    /// The key, for symbol keyed properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<RemoteObject>,
}

impl PropertyDescriptor {
    /// A data property
    pub fn data(name: impl Into<String>, value: RemoteObject) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            writable: Some(true),
            get: None,
            set: None,
            configurable: true,
            enumerable: true,
            was_thrown: None,
            is_own: Some(true),
            symbol: None,
        }
    }

    /// An accessor property with the given getter
    pub fn accessor(name: impl Into<String>, get: RemoteObject) -> Self {
        Self {
            value: None,
            writable: None,
            get: Some(get),
            ..Self::data(name, RemoteObject::undefined())
        }
    }

    /// Gets the getter, if this property has one that can be called
    pub fn getter(&self) -> Option<&RemoteObject> {
        self.get.as_ref().filter(|get| get.object_id.is_some())
    }
}

/// Details about an exception thrown inside the debuggee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception id
    pub exception_id: i64,
    /// Exception text, usually `Uncaught`
    pub text: String,
    /// 0-based line of the exception location
    pub line_number: i64,
    /// 0-based column of the exception location
    pub column_number: i64,
    /// The script the exception was thrown in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<ScriptId>,
    /// The url of the script, if there is no script id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The thrown value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// The exception text followed by the thrown value's description, if there is one
    pub fn message(&self) -> String {
        match self
            .exception
            .as_ref()
            .and_then(|exception| exception.description.as_deref())
        {
            Some(description) => format!("{} {}", self.text, description),
            None => self.text.clone(),
        }
    }
}
