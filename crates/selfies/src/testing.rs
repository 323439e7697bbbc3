//! An in-memory runtime for tests

use crate::error::SnapshotError;
use crate::runtime::RemoteRuntime;
use indexmap::IndexMap;
use inspector_client::events::{Event, PausedEvent};
use inspector_client::inspector_types::{
    BreakpointId, CallFrame, CallFrameId, Location, PropertyDescriptor, RemoteObject,
    RemoteObjectId, Scope, ScopeType, ScriptId,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A request the fake runtime received
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    GetProperties {
        object_id: String,
        own_properties: bool,
        object_group: Option<String>,
    },
    Evaluate {
        expression: String,
    },
    CallFunctionOn {
        object_id: String,
        object_group: Option<String>,
    },
    ReleaseObjectGroup(String),
    QueryObjects {
        prototype: String,
        object_group: String,
    },
    EnableRuntime,
    RunIfWaitingForDebugger,
    EnableDebugger,
    SetBreakpointByUrl {
        url: String,
        line_number: u32,
    },
    Resume,
}

struct FakeObject {
    remote: RemoteObject,
    properties: Vec<PropertyDescriptor>,
    prototype: Option<String>,
}

/// An object graph living in memory, answering requests like a paused debuggee would
#[derive(Default)]
pub(crate) struct FakeRuntime {
    objects: RefCell<IndexMap<String, FakeObject>>,
    getters: RefCell<HashMap<String, Result<RemoteObject, String>>>,
    requests: RefCell<Vec<Request>>,
    queries: Cell<usize>,
    listings_left: Cell<Option<usize>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, remote: RemoteObject, properties: Vec<(&str, RemoteObject)>) -> RemoteObject {
        let id = remote
            .object_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        let properties = properties
            .into_iter()
            .map(|(name, value)| PropertyDescriptor::data(name, value))
            .collect();
        self.objects.borrow_mut().insert(
            id,
            FakeObject {
                remote: remote.clone(),
                properties,
                prototype: None,
            },
        );
        remote
    }

    pub fn add_object(
        &self,
        id: &str,
        class_name: &str,
        properties: Vec<(&str, RemoteObject)>,
    ) -> RemoteObject {
        self.insert(
            RemoteObject::object(RemoteObjectId::new(id), class_name),
            properties,
        )
    }

    pub fn add_function(&self, id: &str, properties: Vec<(&str, RemoteObject)>) -> RemoteObject {
        self.insert(RemoteObject::function(RemoteObjectId::new(id)), properties)
    }

    /// Creates a getter function that returns `result`, or throws when it is an error
    pub fn add_getter(&self, name: &str, result: Result<RemoteObject, String>) -> RemoteObject {
        let id = format!("get:{name}");
        self.getters.borrow_mut().insert(id.clone(), result);
        RemoteObject::function(RemoteObjectId::new(id))
    }

    pub fn add_property(&self, id: &str, descriptor: PropertyDescriptor) {
        if let Some(object) = self.objects.borrow_mut().get_mut(id) {
            object.properties.push(descriptor);
        }
    }

    pub fn add_symbol_property(&self, id: &str, symbol: RemoteObject, value: RemoteObject) {
        let name = symbol
            .description
            .clone()
            .unwrap_or_else(|| "Symbol()".to_string());
        self.add_property(
            id,
            PropertyDescriptor {
                symbol: Some(symbol),
                ..PropertyDescriptor::data(name, value)
            },
        );
    }

    /// Overwrites a plain property with a number
    pub fn set_number(&self, id: &str, name: &str, value: f64) {
        if let Some(object) = self.objects.borrow_mut().get_mut(id) {
            for descriptor in &mut object.properties {
                if descriptor.name == name {
                    descriptor.value = Some(RemoteObject::number(value));
                }
            }
        }
    }

    pub fn set_prototype(&self, id: &str, prototype: &str) {
        if let Some(object) = self.objects.borrow_mut().get_mut(id) {
            object.prototype = Some(prototype.to_string());
        }
    }

    /// Makes every property listing after the next `count` fail
    pub fn fail_property_listings_after(&self, count: usize) {
        self.listings_left.set(Some(count));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn record(&self, request: Request) {
        self.requests.borrow_mut().push(request);
    }

    fn has_in_chain(&self, id: &str, prototype: &str) -> bool {
        let objects = self.objects.borrow();
        let mut current = objects.get(id).and_then(|o| o.prototype.clone());
        let mut steps = 0;
        while let Some(next) = current {
            if next == prototype {
                return true;
            }
            steps += 1;
            if steps > objects.len() {
                return false;
            }
            current = objects.get(&next).and_then(|o| o.prototype.clone());
        }
        false
    }
}

fn not_found() -> SnapshotError {
    SnapshotError::Eval("Could not find object with given id".to_string())
}

impl RemoteRuntime for FakeRuntime {
    async fn get_properties(
        &self,
        object_id: &RemoteObjectId,
        own_properties: bool,
        object_group: Option<&str>,
    ) -> Result<Vec<PropertyDescriptor>, SnapshotError> {
        self.record(Request::GetProperties {
            object_id: object_id.as_str().to_string(),
            own_properties,
            object_group: object_group.map(str::to_string),
        });
        if let Some(left) = self.listings_left.get() {
            if left == 0 {
                return Err(SnapshotError::Eval("listing failed".to_string()));
            }
            self.listings_left.set(Some(left - 1));
        }
        let objects = self.objects.borrow();
        let object = objects.get(object_id.as_str()).ok_or_else(not_found)?;
        let mut properties = object.properties.clone();
        if let Some(prototype) = object.prototype.as_ref().and_then(|p| objects.get(p)) {
            properties.push(PropertyDescriptor::data("__proto__", prototype.remote.clone()));
        }
        if !own_properties {
            let mut next = object.prototype.clone();
            while let Some(prototype) = next.as_ref().and_then(|p| objects.get(p)) {
                properties.extend(prototype.properties.iter().map(|descriptor| {
                    PropertyDescriptor {
                        is_own: Some(false),
                        ..descriptor.clone()
                    }
                }));
                next = prototype.prototype.clone();
                if properties.len() > 10_000 {
                    break;
                }
            }
        }
        Ok(properties)
    }

    async fn evaluate(
        &self,
        expression: &str,
        _object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError> {
        self.record(Request::Evaluate {
            expression: expression.to_string(),
        });
        match expression {
            "undefined" => Ok(RemoteObject::undefined()),
            _ => Err(SnapshotError::Eval(format!(
                "Uncaught ReferenceError: {expression} is not defined"
            ))),
        }
    }

    async fn call_function_on(
        &self,
        _function_declaration: &str,
        object_id: &RemoteObjectId,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, SnapshotError> {
        self.record(Request::CallFunctionOn {
            object_id: object_id.as_str().to_string(),
            object_group: object_group.map(str::to_string),
        });
        match self.getters.borrow().get(object_id.as_str()) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(SnapshotError::Eval(message.clone())),
            None => Err(not_found()),
        }
    }

    async fn release_object_group(&self, object_group: &str) -> Result<(), SnapshotError> {
        self.record(Request::ReleaseObjectGroup(object_group.to_string()));
        Ok(())
    }

    async fn query_objects(
        &self,
        prototype_object_id: &RemoteObjectId,
        object_group: &str,
    ) -> Result<RemoteObject, SnapshotError> {
        self.record(Request::QueryObjects {
            prototype: prototype_object_id.as_str().to_string(),
            object_group: object_group.to_string(),
        });
        let ids: Vec<String> = self.objects.borrow().keys().cloned().collect();
        let instances: Vec<RemoteObject> = ids
            .iter()
            .filter(|id| self.has_in_chain(id, prototype_object_id.as_str()))
            .filter_map(|id| self.objects.borrow().get(id).map(|o| o.remote.clone()))
            .collect();

        let query = self.queries.get();
        self.queries.set(query + 1);
        let length = instances.len();
        let names: Vec<String> = (0..length).map(|index| index.to_string()).collect();
        let mut properties: Vec<(&str, RemoteObject)> = names
            .iter()
            .map(String::as_str)
            .zip(instances)
            .collect();
        properties.push(("length", RemoteObject::number(length as f64)));
        Ok(self.add_object(&format!("query-{query}"), "Array", properties))
    }

    async fn enable_runtime(&self) -> Result<(), SnapshotError> {
        self.record(Request::EnableRuntime);
        Ok(())
    }

    async fn run_if_waiting_for_debugger(&self) -> Result<(), SnapshotError> {
        self.record(Request::RunIfWaitingForDebugger);
        Ok(())
    }

    async fn enable_debugger(&self) -> Result<(), SnapshotError> {
        self.record(Request::EnableDebugger);
        Ok(())
    }

    async fn set_breakpoint_by_url(
        &self,
        url: &str,
        line_number: u32,
        column_number: u32,
    ) -> Result<BreakpointId, SnapshotError> {
        self.record(Request::SetBreakpointByUrl {
            url: url.to_string(),
            line_number,
        });
        Ok(BreakpointId::new(format!(
            "1:{line_number}:{column_number}:{url}"
        )))
    }

    async fn resume(&self) -> Result<(), SnapshotError> {
        self.record(Request::Resume);
        Ok(())
    }
}

pub(crate) fn scope(kind: ScopeType, object: RemoteObject) -> Scope {
    Scope {
        kind,
        object,
        name: None,
    }
}

pub(crate) fn call_frame(url: &str, line_number: u32, scope_chain: Vec<Scope>) -> CallFrame {
    CallFrame {
        call_frame_id: CallFrameId::new("frame-0"),
        function_name: String::new(),
        location: Location {
            script_id: ScriptId::new("42"),
            line_number,
            column_number: Some(0),
        },
        url: url.to_string(),
        scope_chain,
        this: None,
    }
}

pub(crate) fn paused(reason: &str, frame: Option<CallFrame>) -> Event {
    Event::Paused(PausedEvent {
        call_frames: frame.into_iter().collect(),
        reason: reason.to_string(),
        hit_breakpoints: vec![],
    })
}

/// Builds the graph of
///
/// ```js
/// class Point { constructor(x, y) { this.x = x; this.y = y } norm() {} }
/// const geometry = { Point };
/// let p = new Point(1, 2);
/// let q = new Point(3, 4);
/// ```
///
/// and returns a frame paused on line 5 of `/app/point.js`
pub(crate) fn points(runtime: &FakeRuntime) -> CallFrame {
    let norm = runtime.add_function("norm", vec![]);
    let object_prototype = runtime.add_object("Object.prototype", "Object", vec![]);
    let prototype = runtime.add_object("Point.prototype", "Object", vec![("norm", norm)]);
    runtime.set_prototype("Point.prototype", "Object.prototype");
    let point = runtime.add_function(
        "Point",
        vec![
            ("prototype", prototype),
            ("name", RemoteObject::string("Point")),
        ],
    );
    let geometry = runtime.add_object("geometry", "Object", vec![("Point", point.clone())]);
    runtime.set_prototype("geometry", "Object.prototype");
    let p = runtime.add_object(
        "p1",
        "Point",
        vec![("x", RemoteObject::number(1.0)), ("y", RemoteObject::number(2.0))],
    );
    runtime.set_prototype("p1", "Point.prototype");
    let q = runtime.add_object(
        "p2",
        "Point",
        vec![("x", RemoteObject::number(3.0)), ("y", RemoteObject::number(4.0))],
    );
    runtime.set_prototype("p2", "Point.prototype");

    let local = runtime.add_object(
        "local",
        "Object",
        vec![("Point", point), ("geometry", geometry), ("p", p), ("q", q)],
    );
    let global = runtime.add_object("global", "global", vec![("Object", object_prototype)]);
    call_frame(
        "file:///app/point.js",
        4,
        vec![scope(ScopeType::Local, local), scope(ScopeType::Global, global)],
    )
}
