//! Turns remote objects into [Value] trees

use crate::error::SnapshotError;
use crate::object_group::ObjectGroup;
use crate::property::access_property;
use crate::runtime::RemoteRuntime;
use crate::value::{ClassInstance, Primitive, Value};
use futures::future::{FutureExt, LocalBoxFuture};
use inspector_client::inspector_types::{RemoteObject, RemoteObjectType};
use tracing::{instrument, trace};

/// How deep the serializer walks by default
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for [serialize_object]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Objects nested deeper than this are not walked and become [Value::Truncated]
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Serializes a remote object.
///
/// Objects keep their own data properties, in the order the runtime lists them. Accessors,
/// symbol keyed properties, `__proto__` and functions are left out, and no getter is ever
/// called. Every handle bound during the walk is released before returning.
#[instrument(skip_all, fields(object_id = ?object.object_id))]
pub async fn serialize_object<R: RemoteRuntime>(
    runtime: &R,
    object: &RemoteObject,
    options: &SerializeOptions,
) -> Result<Value, SnapshotError> {
    match &object.object_id {
        Some(object_id) => {
            let group = ObjectGroup::for_object(object_id);
            group
                .scoped(
                    runtime,
                    visit(runtime, object, group.name(), 0, options.max_depth),
                )
                .await
        }
        None => visit(runtime, object, "", 0, options.max_depth).await,
    }
}

fn visit<'a, R: RemoteRuntime>(
    runtime: &'a R,
    object: &'a RemoteObject,
    group: &'a str,
    depth: usize,
    max_depth: usize,
) -> LocalBoxFuture<'a, Result<Value, SnapshotError>> {
    async move {
        if let Some(primitive) = primitive(object) {
            return Ok(Value::Primitive(primitive));
        }
        if object.kind != RemoteObjectType::Object {
            return Err(SnapshotError::UnsupportedType(object.kind));
        }

        let class_name = object
            .class_name
            .clone()
            .unwrap_or_else(|| "Object".to_string());
        if depth >= max_depth {
            trace!("not walking {class_name} at depth {depth}");
            return Ok(Value::truncated(class_name));
        }
        let object_id = object
            .object_id
            .as_ref()
            .ok_or(SnapshotError::MissingObjectId(object.kind))?;

        let properties = runtime
            .get_properties(object_id, true, Some(group))
            .await?;
        let mut instance = ClassInstance::new(class_name);
        for descriptor in properties {
            if descriptor.symbol.is_some()
                || descriptor.value.is_none()
                || descriptor.name == "__proto__"
            {
                continue;
            }
            let value = access_property(runtime, &descriptor, Some(group)).await?;
            if value.kind == RemoteObjectType::Function {
                continue;
            }
            let value = visit(runtime, &value, group, depth + 1, max_depth).await?;
            instance.insert(descriptor.name, value);
        }
        Ok(Value::Instance(instance))
    }
    .boxed_local()
}

/// Decodes values that are not reached through a handle
fn primitive(object: &RemoteObject) -> Option<Primitive> {
    match object.kind {
        RemoteObjectType::Undefined => Some(Primitive::Undefined),
        RemoteObjectType::Object if object.is_null() => Some(Primitive::Null),
        RemoteObjectType::Boolean => object
            .value
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .map(Primitive::Boolean),
        RemoteObjectType::Number => match &object.unserializable_value {
            Some(unserializable) => unserializable_number(unserializable).map(Primitive::Number),
            None => object
                .value
                .as_ref()
                .and_then(serde_json::Value::as_f64)
                .map(Primitive::Number),
        },
        RemoteObjectType::String => object
            .value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(|s| Primitive::String(s.to_string())),
        _ => None,
    }
}

fn unserializable_number(value: &str) -> Option<f64> {
    match value {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "-0" => Some(-0.0),
        _ => None,
    }
}
