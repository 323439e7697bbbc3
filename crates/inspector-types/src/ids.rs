use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::type_name;
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;

/// Uniquely identifies a remote object in the debuggee.
///
/// The id is bound to an object group on the runtime side and stays valid until that group is
/// released. Binding the same object twice produces two distinct ids, so ids say nothing about
/// object identity.
pub type RemoteObjectId = Id<Object>;
/// Uniquely identifies a parsed script
pub type ScriptId = Id<Script>;
/// Uniquely identifies a call frame. Only valid while the debuggee is paused.
pub type CallFrameId = Id<Frame>;
/// Identifies a breakpoint, as returned by the runtime when it was set
pub type BreakpointId = Id<Breakpoint>;

/// Uniquely identifies some *thing* in the debuggee
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Id<T: Identifiable>(String, PhantomData<T>);

impl<T: Identifiable> Id<T> {
    /// Creates a new [Id]. There's no guarantee that this [Id] is valid within the
    /// debuggee's context.
    pub fn new(id: impl Into<String>) -> Self {
        Id(id.into(), PhantomData)
    }

    /// Gets the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Identifiable> From<Id<T>> for String {
    fn from(value: Id<T>) -> Self {
        value.0
    }
}

impl<T: Identifiable> Debug for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(format!("Id<{}>", type_name::<T>()).as_str())
            .field(&self.0)
            .finish()
    }
}

impl<T: Identifiable> Display for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T: Identifiable> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, T: Identifiable> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Id::new)
    }
}

use crate::private::Identifiable;
pub use identifiable_types::*;

mod identifiable_types {
    use crate::private::Identifiable;

    macro_rules! identifiables {
        ($($ty:ident)*) => {
            $(
                /// An identifiable type
                #[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
                pub enum $ty {}
                impl Identifiable for $ty {}
            )*
        };
    }

    identifiables!(
         Object Script Frame Breakpoint
    );
}
