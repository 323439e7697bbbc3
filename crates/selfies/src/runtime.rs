//! The operations the engine needs from the debuggee

use crate::error::SnapshotError;
use inspector_client::commands::{debugger, runtime};
use inspector_client::inspector_types::{
    BreakpointId, ExceptionDetails, PropertyDescriptor, RemoteObject, RemoteObjectId,
};
use inspector_client::InspectorClient;
use tracing::instrument;

/// A runtime that owns remote objects and can be asked about them
#[allow(async_fn_in_trait)]
pub trait RemoteRuntime {
    /// Lists the properties of an object, own ones only or including the prototype chain
    async fn get_properties(
        &self,
        object_id: &RemoteObjectId,
        own_properties: bool,
        object_group: Option<&str>,
    ) -> Result<Vec<PropertyDescriptor>, SnapshotError>;

    /// Evaluates an expression on the global object
    async fn evaluate(
        &self,
        expression: &str,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError>;

    /// Calls a function declaration with the given object as `this`
    async fn call_function_on(
        &self,
        function_declaration: &str,
        object_id: &RemoteObjectId,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError>;

    async fn release_object_group(&self, object_group: &str) -> Result<(), SnapshotError>;

    /// Gets an array of every live object with the given prototype in its chain
    async fn query_objects(
        &self,
        prototype_object_id: &RemoteObjectId,
        object_group: &str,
    ) -> Result<RemoteObject, SnapshotError>;

    async fn enable_runtime(&self) -> Result<(), SnapshotError>;

    async fn run_if_waiting_for_debugger(&self) -> Result<(), SnapshotError>;

    async fn enable_debugger(&self) -> Result<(), SnapshotError>;

    /// Sets a breakpoint on a 0-based line of every script loaded from `url`
    async fn set_breakpoint_by_url(
        &self,
        url: &str,
        line_number: u32,
        column_number: u32,
    ) -> Result<BreakpointId, SnapshotError>;

    async fn resume(&self) -> Result<(), SnapshotError>;
}

fn check_exception(details: Option<ExceptionDetails>) -> Result<(), SnapshotError> {
    match details {
        Some(details) => Err(SnapshotError::Eval(details.message())),
        None => Ok(()),
    }
}

impl RemoteRuntime for InspectorClient {
    #[instrument(skip(self), level = "trace")]
    async fn get_properties(
        &self,
        object_id: &RemoteObjectId,
        own_properties: bool,
        object_group: Option<&str>,
    ) -> Result<Vec<PropertyDescriptor>, SnapshotError> {
        let reply = self
            .send(runtime::GetProperties {
                object_id: object_id.clone(),
                own_properties: Some(own_properties),
                object_group: object_group.map(str::to_string),
            })
            .await?;
        check_exception(reply.exception_details)?;
        Ok(reply.result)
    }

    #[instrument(skip(self), level = "trace")]
    async fn evaluate(
        &self,
        expression: &str,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError> {
        let reply = self
            .send(runtime::Evaluate {
                expression: expression.to_string(),
                object_group: object_group.map(str::to_string),
                silent: Some(true),
                ..Default::default()
            })
            .await?;
        check_exception(reply.exception_details)?;
        Ok(reply.result)
    }

    #[instrument(skip(self, function_declaration), level = "trace")]
    async fn call_function_on(
        &self,
        function_declaration: &str,
        object_id: &RemoteObjectId,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError> {
        let reply = self
            .send(runtime::CallFunctionOn {
                function_declaration: function_declaration.to_string(),
                object_id: Some(object_id.clone()),
                object_group: object_group.map(str::to_string),
                silent: Some(true),
                ..Default::default()
            })
            .await?;
        check_exception(reply.exception_details)?;
        Ok(reply.result)
    }

    #[instrument(skip(self), level = "trace")]
    async fn release_object_group(&self, object_group: &str) -> Result<(), SnapshotError> {
        self.send(runtime::ReleaseObjectGroup {
            object_group: object_group.to_string(),
        })
        .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "trace")]
    async fn query_objects(
        &self,
        prototype_object_id: &RemoteObjectId,
        object_group: &str,
    ) -> Result<RemoteObject, SnapshotError> {
        let reply = self
            .send(runtime::QueryObjects {
                prototype_object_id: prototype_object_id.clone(),
                object_group: Some(object_group.to_string()),
            })
            .await?;
        Ok(reply.objects)
    }

    async fn enable_runtime(&self) -> Result<(), SnapshotError> {
        self.send(runtime::Enable {}).await?;
        Ok(())
    }

    async fn run_if_waiting_for_debugger(&self) -> Result<(), SnapshotError> {
        self.send(runtime::RunIfWaitingForDebugger {}).await?;
        Ok(())
    }

    async fn enable_debugger(&self) -> Result<(), SnapshotError> {
        self.send(debugger::Enable {}).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_breakpoint_by_url(
        &self,
        url: &str,
        line_number: u32,
        column_number: u32,
    ) -> Result<BreakpointId, SnapshotError> {
        let reply = self
            .send(debugger::SetBreakpointByUrl {
                line_number,
                url: Some(url.to_string()),
                column_number: Some(column_number),
                condition: None,
            })
            .await?;
        Ok(reply.breakpoint_id)
    }

    async fn resume(&self) -> Result<(), SnapshotError> {
        self.send(debugger::Resume {}).await?;
        Ok(())
    }
}
