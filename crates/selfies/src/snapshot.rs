use crate::value::Value;
use inspector_client::inspector_types::Location;
use serde::Serialize;

/// The objects captured during one pause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    id: String,
    values: Vec<Value>,
}

impl Snapshot {
    pub fn new(id: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// Names the snapshot after where it was taken, as `<url>:<line>` with a 1-based line
    pub fn id_for(script_url: &str, location: &Location) -> String {
        format!("{}:{}", script_url, location.line_number + 1)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The captured values, in the order the objects were found
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
