//! Events pushed by the runtime

pub use event::*;
pub use event_handler::*;

mod event;
mod event_handler;
