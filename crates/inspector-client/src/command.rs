use serde::de::DeserializeOwned;
use serde::Serialize;

/// used for representing an inspector command
pub trait InspectorCommand: Serialize {
    type Reply: DeserializeOwned;

    /// The protocol method, e.g. `Runtime.evaluate`
    fn method() -> &'static str;
}
