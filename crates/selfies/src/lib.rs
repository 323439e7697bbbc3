//! # `selfies`
//!
//! Runs a script under node's inspector and captures, every time a breakpoint is hit, the live
//! instances of chosen classes as portable [values](Value).
//!
//! ```no_run
//! # async fn run() -> Result<(), selfies::SnapshotError> {
//! use selfies::{run_and_take_snapshots, SessionOptions};
//!
//! let options = SessionOptions::new("node")
//!     .arg("app.js")
//!     .breakpoint("app.js:12".parse()?)
//!     .include("Point");
//! for snapshot in run_and_take_snapshots(options).await? {
//!     for value in snapshot.values() {
//!         println!("{value}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connect;
mod error;
pub mod finder;
pub mod object_group;
pub mod property;
pub mod runtime;
pub mod scope;
pub mod serializer;
pub mod session;
mod snapshot;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{BreakpointSpec, SessionOptions};
pub use error::SnapshotError;
pub use finder::{QueryOptions, QueryResult, SkipReason};
pub use serializer::{serialize_object, SerializeOptions};
pub use session::{run_and_take_snapshots, SessionState, SnapshotSession};
pub use snapshot::Snapshot;
pub use value::{ClassInstance, Primitive, Value};
