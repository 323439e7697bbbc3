//! Property lookup on remote objects.
//!
//! The protocol has no way to read a single property of a remote object, so lookups list every
//! property of the object, inherited ones included, and pick the first one whose key matches.

use crate::error::SnapshotError;
use crate::runtime::RemoteRuntime;
use inspector_client::inspector_types::{PropertyDescriptor, RemoteObject};
use std::fmt::{Display, Formatter};
use tracing::{instrument, trace};

/// Calls a getter with the getter itself as the call target
const CALL_GETTER: &str = "function () { return this(); }";

/// The key of a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Name(String),
    Index(u64),
    /// A symbol key, matched against the symbol the runtime reports for the property
    Symbol(RemoteObject),
}

impl PropertyKey {
    fn matches(&self, descriptor: &PropertyDescriptor) -> bool {
        match self {
            PropertyKey::Name(name) => descriptor.symbol.is_none() && descriptor.name == *name,
            PropertyKey::Index(index) => {
                descriptor.symbol.is_none() && descriptor.name.parse::<u64>() == Ok(*index)
            }
            PropertyKey::Symbol(symbol) => descriptor.symbol.as_ref() == Some(symbol),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        PropertyKey::Name(value.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(value: String) -> Self {
        PropertyKey::Name(value)
    }
}

impl From<u64> for PropertyKey {
    fn from(value: u64) -> Self {
        PropertyKey::Index(value)
    }
}

impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::Name(name) => f.write_str(name),
            PropertyKey::Index(index) => write!(f, "{index}"),
            PropertyKey::Symbol(symbol) => match &symbol.description {
                Some(description) => f.write_str(description),
                None => f.write_str("Symbol()"),
            },
        }
    }
}

/// The properties of one object, in the order the runtime listed them
#[derive(Debug, Clone, Default)]
pub struct PropertyList(Vec<PropertyDescriptor>);

impl PropertyList {
    /// Fetches every property of `object`, including the ones inherited through its prototype
    /// chain. Objects without a handle have no properties.
    pub async fn fetch<R: RemoteRuntime>(
        runtime: &R,
        object: &RemoteObject,
        object_group: Option<&str>,
    ) -> Result<Self, SnapshotError> {
        match &object.object_id {
            Some(object_id) => Ok(Self(
                runtime
                    .get_properties(object_id, false, object_group)
                    .await?,
            )),
            None => {
                trace!("{} value has no properties to list", object.kind);
                Ok(Self::default())
            }
        }
    }

    /// Finds the first property with the given key
    pub fn find(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.0.iter().find(|descriptor| key.matches(descriptor))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.0.iter()
    }
}

impl From<Vec<PropertyDescriptor>> for PropertyList {
    fn from(value: Vec<PropertyDescriptor>) -> Self {
        Self(value)
    }
}

/// Reads the value of a property the way the language would.
///
/// A plain value is returned as is. Otherwise the getter is called, and an exception it throws
/// is an [`SnapshotError::Eval`]. A property with neither reads as `undefined`.
pub async fn access_property<R: RemoteRuntime>(
    runtime: &R,
    descriptor: &PropertyDescriptor,
    object_group: Option<&str>,
) -> Result<RemoteObject, SnapshotError> {
    if let Some(value) = &descriptor.value {
        return Ok(value.clone());
    }
    if let Some(getter) = descriptor.getter() {
        if let Some(getter_id) = &getter.object_id {
            trace!("calling getter of {}", descriptor.name);
            return runtime
                .call_function_on(CALL_GETTER, getter_id, object_group)
                .await;
        }
    }
    runtime.evaluate("undefined", object_group).await
}

/// Resolves a property of `object`, or `None` if it has no such property
#[instrument(skip(runtime, object), fields(key = %key), level = "debug")]
pub async fn resolve_property<R: RemoteRuntime>(
    runtime: &R,
    object: &RemoteObject,
    key: &PropertyKey,
    object_group: Option<&str>,
) -> Result<Option<RemoteObject>, SnapshotError> {
    let properties = PropertyList::fetch(runtime, object, object_group).await?;
    match properties.find(key) {
        Some(descriptor) => Ok(Some(
            access_property(runtime, descriptor, object_group).await?,
        )),
        None => Ok(None),
    }
}

/// Resolves `path` one key at a time, starting at `object`. Stops at the first key that
/// cannot be resolved.
pub async fn resolve_property_path<R: RemoteRuntime>(
    runtime: &R,
    object: &RemoteObject,
    path: &[PropertyKey],
    object_group: Option<&str>,
) -> Result<Option<RemoteObject>, SnapshotError> {
    let mut current = object.clone();
    for key in path {
        match resolve_property(runtime, &current, key, object_group).await? {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
