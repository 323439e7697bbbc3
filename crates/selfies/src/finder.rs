//! Finds the live instances of classes named relative to a paused frame

use crate::error::SnapshotError;
use crate::object_group::ObjectGroup;
use crate::property::{resolve_property, resolve_property_path, PropertyKey};
use crate::runtime::RemoteRuntime;
use crate::scope::{find_variable_in_scope_chain, variables_in_scope_chain};
use inspector_client::inspector_types::{CallFrame, RemoteObject};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn, Level};

type ObjectFilter = dyn Fn(&RemoteObject) -> bool + Send + Sync;

/// Which objects to look for
#[derive(Clone, Default)]
pub struct QueryOptions {
    include: Vec<String>,
    filter: Option<Arc<ObjectFilter>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks for every instance of the class at `class_path`, a dot separated path starting at
    /// a variable in scope, e.g. `geometry.Point`
    pub fn include(mut self, class_path: impl Into<String>) -> Self {
        self.include.push(class_path.into());
        self
    }

    /// Only keeps the found objects for which `filter` returns `true`
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&RemoteObject) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn class_paths(&self) -> &[String] {
        &self.include
    }
}

impl Debug for QueryOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOptions")
            .field("include", &self.include)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Why an entry of [QueryOptions::include] matched nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("A variable named {name} was not found in the scope surrounding the breakpoint")]
    VariableNotFound { name: String },
    #[error("The property {path} was not found on {root}")]
    PropertyNotFound { root: String, path: String },
    #[error("{class_path} did not have a prototype that could be extracted")]
    NoPrototype { class_path: String },
}

/// The objects found by [find_all_objects_matching]
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Every instance found, grouped by class in include order
    pub objects: Vec<RemoteObject>,
    /// The entries that were skipped
    pub skipped: Vec<SkipReason>,
}

/// Finds every live instance of the included classes.
///
/// An entry that cannot be resolved is skipped with a warning and does not affect the others.
/// Every handle is bound to the [snapshot](ObjectGroup::SNAPSHOT) object group.
#[instrument(skip_all, fields(url = %call_frame.url, line = call_frame.location.line_number))]
pub async fn find_all_objects_matching<R: RemoteRuntime>(
    runtime: &R,
    call_frame: &CallFrame,
    options: &QueryOptions,
) -> Result<QueryResult, SnapshotError> {
    let mut result = QueryResult::default();
    for class_path in &options.include {
        match find_instances(runtime, call_frame, class_path).await? {
            Ok(instances) => {
                debug!("found {} instances of {class_path}", instances.len());
                result.objects.extend(
                    instances
                        .into_iter()
                        .filter(|object| options.filter.as_ref().map_or(true, |f| f(object))),
                );
            }
            Err(reason) => {
                warn!("{reason}");
                if let SkipReason::VariableNotFound { .. } = &reason {
                    if tracing::enabled!(Level::DEBUG) {
                        log_variables_in_scope(runtime, call_frame).await;
                    }
                }
                result.skipped.push(reason);
            }
        }
    }
    Ok(result)
}

async fn log_variables_in_scope<R: RemoteRuntime>(runtime: &R, call_frame: &CallFrame) {
    let group = Some(ObjectGroup::SNAPSHOT);
    match variables_in_scope_chain(runtime, &call_frame.scope_chain, group).await {
        Ok(in_scope) => debug!("variables in scope: {}", in_scope.join(", ")),
        Err(e) => debug!("could not list the variables in scope: {e}"),
    }
}

async fn find_instances<R: RemoteRuntime>(
    runtime: &R,
    call_frame: &CallFrame,
    class_path: &str,
) -> Result<Result<Vec<RemoteObject>, SkipReason>, SnapshotError> {
    let group = Some(ObjectGroup::SNAPSHOT);
    let mut segments = class_path.split('.');
    let root = segments.next().unwrap_or_default();
    let rest: Vec<PropertyKey> = segments.map(PropertyKey::from).collect();

    let Some(root_object) =
        find_variable_in_scope_chain(runtime, &call_frame.scope_chain, root, group).await?
    else {
        return Ok(Err(SkipReason::VariableNotFound {
            name: root.to_string(),
        }));
    };

    let Some(class) = resolve_property_path(runtime, &root_object, &rest, group).await? else {
        let path = rest.iter().map(ToString::to_string).collect::<Vec<_>>();
        return Ok(Err(SkipReason::PropertyNotFound {
            root: root.to_string(),
            path: path.join("."),
        }));
    };

    let prototype = resolve_property(runtime, &class, &"prototype".into(), group).await?;
    let Some(prototype_id) = prototype.and_then(|prototype| prototype.object_id) else {
        return Ok(Err(SkipReason::NoPrototype {
            class_path: class_path.to_string(),
        }));
    };

    let instances = runtime
        .query_objects(&prototype_id, ObjectGroup::SNAPSHOT)
        .await?;
    Ok(Ok(elements(runtime, &instances).await?))
}

/// Gets the elements of a remote array, its integer keyed own properties
async fn elements<R: RemoteRuntime>(
    runtime: &R,
    array: &RemoteObject,
) -> Result<Vec<RemoteObject>, SnapshotError> {
    let array_id = array
        .object_id
        .as_ref()
        .ok_or(SnapshotError::MissingObjectId(array.kind))?;
    let properties = runtime
        .get_properties(array_id, true, Some(ObjectGroup::SNAPSHOT))
        .await?;
    Ok(properties
        .into_iter()
        .filter(|descriptor| descriptor.name.parse::<u64>().is_ok())
        .filter_map(|descriptor| descriptor.value)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{call_frame, points, FakeRuntime, Request};
    use inspector_client::inspector_types::RemoteObjectId;

    #[test_log::test(tokio::test)]
    async fn test_find_instances() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let result = find_all_objects_matching(&runtime, &frame, &QueryOptions::new().include("Point"))
            .await
            .unwrap();
        let ids: Vec<_> = result
            .objects
            .iter()
            .filter_map(|object| object.object_id.as_ref().map(RemoteObjectId::as_str))
            .collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert!(result.skipped.is_empty());
        assert!(runtime.requests().contains(&Request::QueryObjects {
            prototype: "Point.prototype".to_string(),
            object_group: "snapshot".to_string(),
        }));
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_variable_is_skipped() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let options = QueryOptions::new().include("DoesNotExist").include("Point");
        let result = find_all_objects_matching(&runtime, &frame, &options)
            .await
            .unwrap();
        assert_eq!(
            result.skipped,
            [SkipReason::VariableNotFound {
                name: "DoesNotExist".to_string()
            }]
        );
        assert_eq!(result.objects.len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_nested_class_path() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let result = find_all_objects_matching(
            &runtime,
            &frame,
            &QueryOptions::new()
                .include("geometry.Point")
                .include("geometry.Circle"),
        )
        .await
        .unwrap();
        assert_eq!(result.objects.len(), 2);
        assert_eq!(
            result.skipped,
            [SkipReason::PropertyNotFound {
                root: "geometry".to_string(),
                path: "Circle".to_string(),
            }]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_no_prototype() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let result = find_all_objects_matching(&runtime, &frame, &QueryOptions::new().include("p"))
            .await
            .unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(
            result.skipped,
            [SkipReason::NoPrototype {
                class_path: "p".to_string()
            }]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_filter() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let options = QueryOptions::new()
            .include("Point")
            .filter(|object| object.object_id.as_ref().map(RemoteObjectId::as_str) == Some("p2"));
        let result = find_all_objects_matching(&runtime, &frame, &options)
            .await
            .unwrap();
        assert_eq!(result.objects.len(), 1);
    }

    #[tokio::test]
    async fn test_scope_listing_only_when_debugging() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        let options = QueryOptions::new().include("DoesNotExist");
        let listings = |runtime: &FakeRuntime| {
            runtime
                .requests()
                .iter()
                .filter(|r| matches!(r, Request::GetProperties { .. }))
                .count()
        };

        {
            let _quiet =
                tracing::subscriber::set_default(tracing::subscriber::NoSubscriber::default());
            find_all_objects_matching(&runtime, &frame, &options)
                .await
                .unwrap();
        }
        // local and global scope, searched once
        assert_eq!(listings(&runtime), 2);

        runtime.clear_requests();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let _debug = tracing::subscriber::set_default(subscriber);
        find_all_objects_matching(&runtime, &frame, &options)
            .await
            .unwrap();
        assert_eq!(listings(&runtime), 4);
    }

    #[tokio::test]
    async fn test_failed_scope_listing_is_not_fatal() {
        let runtime = FakeRuntime::new();
        let frame = points(&runtime);
        // enough to search both scopes, not to list them again
        runtime.fail_property_listings_after(2);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let _debug = tracing::subscriber::set_default(subscriber);
        let result = find_all_objects_matching(
            &runtime,
            &frame,
            &QueryOptions::new().include("DoesNotExist"),
        )
        .await
        .unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(
            result.skipped,
            [SkipReason::VariableNotFound {
                name: "DoesNotExist".to_string()
            }]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_frame() {
        let runtime = FakeRuntime::new();
        let frame = call_frame("file:///empty.js", 0, vec![]);
        let result = find_all_objects_matching(&runtime, &frame, &QueryOptions::new().include("Point"))
            .await
            .unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }
}
