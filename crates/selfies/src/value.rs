//! The portable form of a snapshot

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A serialized value.
///
/// A value tree is always finite, even when the object graph it was taken from is cyclic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A primitive
    Primitive(Primitive),
    /// An object, with its own data properties
    Instance(ClassInstance),
    /// An object that was not walked because it was nested too deep
    #[serde(rename_all = "camelCase")]
    Truncated {
        /// The class of the object that was cut off
        class_name: String,
        /// Always `true`, marks the object as cut off in JSON output
        truncated: bool,
    },
}

impl Value {
    /// Creates a truncated value for an object of the given class
    pub fn truncated(class_name: impl Into<String>) -> Self {
        Value::Truncated {
            class_name: class_name.into(),
            truncated: true,
        }
    }

    /// Gets the instance, if this is one
    pub fn as_instance(&self) -> Option<&ClassInstance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Gets the primitive, if this is one
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Value::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }
}

impl From<Primitive> for Value {
    fn from(value: Primitive) -> Self {
        Value::Primitive(value)
    }
}

impl From<ClassInstance> for Value {
    fn from(value: ClassInstance) -> Self {
        Value::Instance(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Primitive(primitive) => write!(f, "{primitive}"),
            Value::Instance(instance) => write!(f, "{instance}"),
            Value::Truncated { class_name, .. } => write!(f, "[{class_name}]"),
        }
    }
}

/// A primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Primitive::Undefined | Primitive::Null => serializer.serialize_unit(),
            Primitive::Boolean(b) => serializer.serialize_bool(*b),
            Primitive::Number(n) => serializer.serialize_f64(*n),
            Primitive::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Undefined => f.write_str("undefined"),
            Primitive::Null => f.write_str("null"),
            Primitive::Boolean(b) => write!(f, "{b}"),
            Primitive::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Primitive::Number(n) => write!(f, "{n}"),
            Primitive::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

/// An object, named after its class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInstance {
    class_name: String,
    fields: IndexMap<String, Value>,
}

impl ClassInstance {
    /// Creates a new instance without any fields
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Adds a field, keeping insertion order
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The fields, in the order the runtime enumerated them
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Display for ClassInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "{} {{}}", self.class_name);
        }
        write!(f, "{} {{ ", self.class_name)?;
        for (index, (name, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(" }")
    }
}
