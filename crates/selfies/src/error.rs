use inspector_client::inspector_types::RemoteObjectType;
use inspector_client::InspectorError;
use std::io;
use thiserror::Error;

/// An error that aborts taking snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The debuggee threw while evaluating something on our behalf
    #[error("evaluation failed in the debuggee: {0}")]
    Eval(String),
    /// The serializer reached a value it has no representation for
    #[error("cannot serialize a remote object of type {0}")]
    UnsupportedType(RemoteObjectType),
    /// Talking to the debuggee failed
    #[error(transparent)]
    Inspector(#[from] InspectorError),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A breakpoint could not be understood
    #[error("invalid breakpoint {spec:?}: {reason}")]
    InvalidBreakpoint {
        /// The breakpoint as given
        spec: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// The debuggee went away before it advertised its inspector
    #[error("the debuggee exited before its inspector was listening")]
    DebuggeeExited,
    /// The debuggee advertised an inspector url that could not be parsed
    #[error("invalid inspector url: {0}")]
    Url(#[from] url::ParseError),
    /// A remote object that should be reachable by handle came without one
    #[error("remote {0} has no object id")]
    MissingObjectId(RemoteObjectType),
}
