//! A basic client for the V8 inspector protocol, as spoken by `node --inspect`

mod client;
pub mod codec;
pub mod command;
pub mod commands;
pub mod connect;
mod error;
pub mod events;
pub mod raw;

pub use client::InspectorClient;
pub use error::InspectorError;

pub use inspector_types;
