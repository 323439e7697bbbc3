use crate::error::SnapshotError;
use crate::runtime::RemoteRuntime;
use inspector_client::inspector_types::RemoteObjectId;
use std::fmt::{Display, Formatter};
use std::future::Future;
use tracing::{trace, warn};

/// A named bucket of remote objects, released all at once.
///
/// Handles bound to a group stay valid until the group is released.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectGroup(String);

impl ObjectGroup {
    /// The group holding everything resolved while handling one pause
    pub const SNAPSHOT: &'static str = "snapshot";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn snapshot() -> Self {
        Self::new(Self::SNAPSHOT)
    }

    /// The group used while serializing the given object
    pub fn for_object(object_id: &RemoteObjectId) -> Self {
        Self(format!("serialize-{object_id}"))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub async fn release<R: RemoteRuntime>(&self, runtime: &R) -> Result<(), SnapshotError> {
        trace!("releasing object group {self}");
        runtime.release_object_group(&self.0).await
    }

    /// Runs `body`, then releases this group whether `body` succeeded or not.
    ///
    /// When both fail, the error of `body` is returned.
    pub async fn scoped<R, T, F>(&self, runtime: &R, body: F) -> Result<T, SnapshotError>
    where
        R: RemoteRuntime,
        F: Future<Output = Result<T, SnapshotError>>,
    {
        let result = body.await;
        let released = self.release(runtime).await;
        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_error)) => {
                warn!("could not release object group {self}: {release_error}");
                Err(e)
            }
        }
    }
}

impl Display for ObjectGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
