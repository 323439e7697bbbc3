//! Variable lookup in the scope chain of a paused frame

use crate::error::SnapshotError;
use crate::runtime::RemoteRuntime;
use inspector_client::inspector_types::{RemoteObject, Scope};
use tracing::trace;

/// Finds the binding of `name` in the innermost scope that has one.
///
/// Scopes whose bindings were sent inline are looked up directly, all others by listing the
/// properties of the scope object. Bindings are returned as is, without calling getters.
pub async fn find_variable_in_scope_chain<R: RemoteRuntime>(
    runtime: &R,
    scope_chain: &[Scope],
    name: &str,
    object_group: Option<&str>,
) -> Result<Option<RemoteObject>, SnapshotError> {
    for scope in scope_chain {
        if let Some(serde_json::Value::Object(bindings)) = &scope.object.value {
            if let Some(binding) = bindings.get(name) {
                trace!("found {name} inline in {} scope", scope.kind);
                return Ok(Some(RemoteObject::from_inline(binding)));
            }
        }
        let Some(object_id) = &scope.object.object_id else {
            continue;
        };
        let properties = runtime
            .get_properties(object_id, false, object_group)
            .await?;
        if let Some(descriptor) = properties.into_iter().find(|p| p.name == name) {
            trace!("found {name} in {} scope", scope.kind);
            return Ok(Some(descriptor.value.unwrap_or_else(RemoteObject::undefined)));
        }
    }
    Ok(None)
}

/// Lists the name of every binding visible from the scope chain, innermost scope first
pub async fn variables_in_scope_chain<R: RemoteRuntime>(
    runtime: &R,
    scope_chain: &[Scope],
    object_group: Option<&str>,
) -> Result<Vec<String>, SnapshotError> {
    let mut names = vec![];
    for scope in scope_chain {
        if let Some(serde_json::Value::Object(bindings)) = &scope.object.value {
            names.extend(bindings.keys().cloned());
        }
        if let Some(object_id) = &scope.object.object_id {
            let properties = runtime
                .get_properties(object_id, false, object_group)
                .await?;
            names.extend(properties.into_iter().map(|p| p.name));
        }
    }
    Ok(names)
}
