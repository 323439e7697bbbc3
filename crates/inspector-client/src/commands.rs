//! All inspector commands used by selfies

use crate::command::InspectorCommand;
use inspector_types::{
    BreakpointId, ExceptionDetails, Location, PropertyDescriptor, RemoteObject, RemoteObjectId,
};
use serde::{Deserialize, Serialize};

macro_rules! command {
    (
        method: $method:literal;
        $(#[$meta:meta])*
        $vis:vis struct $command_id:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident: $field_ty:ty
            ),*
            $(,)?
        } -> {
            $(
                $(#[$reply_field_meta:meta])*
                $reply_field_vis:vis $reply_field:ident: $reply_field_ty:ty
            ),*
            $(,)?
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            $vis struct $command_id {
                $(
                    $(#[$field_meta])*
                    $field_vis $field: $field_ty,
                )*
            }

            impl InspectorCommand for $command_id {
                type Reply = [<$command_id Reply>];

                fn method() -> &'static str {
                    $method
                }
            }

            #[doc = concat!("The reply to [`", stringify!($command_id), "`]")]
            #[derive(Debug, Clone, Deserialize)]
            #[serde(rename_all = "camelCase")]
            $vis struct [<$command_id Reply>] {
            $(
                $(#[$reply_field_meta])*
                $reply_field_vis $reply_field: $reply_field_ty,
            )*
            }
        }
    };
    (
        method: $method:literal;
        $(#[$meta:meta])*
        $vis:vis struct $command_id:ident;
    ) => {
        command! {
            method: $method;
            $(#[$meta])*
            $vis struct $command_id {} -> {}
        }
    };
}

/// Commands of the `Runtime` domain
pub mod runtime {
    use super::*;

    command! {
        method: "Runtime.enable";
        /// Enables reporting of execution contexts
        #[derive(Debug, Clone, Default)]
        pub struct Enable;
    }

    command! {
        method: "Runtime.runIfWaitingForDebugger";
        /// Tells a debuggee started with `--inspect-brk` to start running
        #[derive(Debug, Clone, Default)]
        pub struct RunIfWaitingForDebugger;
    }

    command! {
        method: "Runtime.evaluate";
        /// Evaluates an expression on the global object
        #[derive(Debug, Clone, Default)]
        pub struct Evaluate {
            pub expression: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub object_group: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub silent: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub return_by_value: Option<bool>,
        } -> {
            pub result: RemoteObject,
            pub exception_details: Option<ExceptionDetails>,
        }
    }

    command! {
        method: "Runtime.getProperties";
        /// Gets the properties of an object, optionally including the ones inherited through its
        /// prototype chain
        #[derive(Debug, Clone)]
        pub struct GetProperties {
            pub object_id: RemoteObjectId,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub own_properties: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub object_group: Option<String>,
        } -> {
            #[serde(default)]
            pub result: Vec<PropertyDescriptor>,
            pub exception_details: Option<ExceptionDetails>,
        }
    }

    command! {
        method: "Runtime.callFunctionOn";
        /// Calls a function declaration with the given object as `this`
        #[derive(Debug, Clone, Default)]
        pub struct CallFunctionOn {
            pub function_declaration: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub object_id: Option<RemoteObjectId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub object_group: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub silent: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub return_by_value: Option<bool>,
        } -> {
            pub result: RemoteObject,
            pub exception_details: Option<ExceptionDetails>,
        }
    }

    command! {
        method: "Runtime.releaseObjectGroup";
        /// Releases every remote object bound to the group
        #[derive(Debug, Clone, Default)]
        pub struct ReleaseObjectGroup {
            pub object_group: String,
        } -> {}
    }

    command! {
        method: "Runtime.queryObjects";
        /// Finds every live object whose prototype chain contains the given prototype
        #[derive(Debug, Clone)]
        pub struct QueryObjects {
            pub prototype_object_id: RemoteObjectId,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub object_group: Option<String>,
        } -> {
            pub objects: RemoteObject,
        }
    }
}

/// Commands of the `Debugger` domain
pub mod debugger {
    use super::*;

    command! {
        method: "Debugger.enable";
        /// Enables debugger events
        #[derive(Debug, Clone, Default)]
        pub struct Enable {} -> {
            pub debugger_id: Option<String>,
        }
    }

    command! {
        method: "Debugger.setBreakpointByUrl";
        /// Sets a breakpoint in every script, current and future, with the given url
        #[derive(Debug, Clone, Default)]
        pub struct SetBreakpointByUrl {
            pub line_number: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub url: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub column_number: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub condition: Option<String>,
        } -> {
            pub breakpoint_id: BreakpointId,
            #[serde(default)]
            pub locations: Vec<Location>,
        }
    }

    command! {
        method: "Debugger.resume";
        /// Resumes a paused debuggee
        #[derive(Debug, Clone, Default)]
        pub struct Resume;
    }
}
