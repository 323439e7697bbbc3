//! Drives a debuggee from start to exit, taking a snapshot at every breakpoint hit

use crate::config::{BreakpointSpec, SessionOptions};
use crate::connect::Debuggee;
use crate::error::SnapshotError;
use crate::finder::{find_all_objects_matching, QueryOptions};
use crate::object_group::ObjectGroup;
use crate::runtime::RemoteRuntime;
use crate::serializer::{serialize_object, SerializeOptions};
use crate::snapshot::Snapshot;
use futures::future::{join_all, try_join_all};
use inspector_client::events::{Event, PausedEvent};
use inspector_client::inspector_types::{CallFrame, ScriptId};
use inspector_client::{InspectorClient, InspectorError};
use std::collections::HashMap;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, info, instrument, trace, warn};

/// The lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The debuggee is starting, breakpoints are not set yet
    Starting,
    /// Breakpoints are set, events are handled
    Running,
    /// No more events are handled, the debuggee is on its way out
    Draining,
    /// The debuggee exited
    Terminated,
}

/// What should happen to the debuggee after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The debuggee is finished but will not exit by itself
    Kill,
}

/// Takes snapshots of a paused debuggee
#[derive(Debug)]
pub struct SnapshotSession<'a, R> {
    runtime: &'a R,
    query: QueryOptions,
    serialize: SerializeOptions,
    state: SessionState,
    snapshots: Vec<Snapshot>,
    scripts: HashMap<ScriptId, String>,
}

impl<'a, R: RemoteRuntime> SnapshotSession<'a, R> {
    pub fn new(runtime: &'a R, query: QueryOptions, serialize: SerializeOptions) -> Self {
        Self {
            runtime,
            query,
            serialize,
            state: SessionState::Starting,
            snapshots: vec![],
            scripts: HashMap::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The snapshots taken so far, in the order of the pauses
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    fn transition(&mut self, state: SessionState) {
        if self.state != state {
            debug!("session {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Enables the inspector domains, lets the debuggee run to its first break, and sets every
    /// breakpoint.
    #[instrument(skip_all)]
    pub async fn start(&mut self, breakpoints: &[BreakpointSpec]) -> Result<(), SnapshotError> {
        self.runtime.enable_runtime().await?;
        self.runtime.enable_debugger().await?;
        self.runtime.run_if_waiting_for_debugger().await?;

        let runtime = self.runtime;
        let breakpoint_ids = try_join_all(breakpoints.iter().map(|breakpoint| async move {
            let url = breakpoint.url()?;
            runtime
                .set_breakpoint_by_url(url.as_str(), breakpoint.line_number(), 0)
                .await
        }))
        .await?;
        for (breakpoint, id) in breakpoints.iter().zip(breakpoint_ids) {
            debug!("set breakpoint {breakpoint} as {id}");
        }

        self.transition(SessionState::Running);
        Ok(())
    }

    /// Handles one event. Errors while handling a pause abort the session.
    pub async fn handle_event(&mut self, event: Event) -> Result<Flow, SnapshotError> {
        if let Event::ScriptParsed(script) = &event {
            trace!("loaded {} as script {}", script.url, script.script_id);
            if !script.url.is_empty() {
                self.scripts
                    .insert(script.script_id.clone(), script.url.clone());
            }
            return Ok(Flow::Continue);
        }
        if self.state != SessionState::Running {
            trace!("ignoring {} event while {:?}", event.method(), self.state);
            return Ok(Flow::Continue);
        }
        match event {
            Event::Paused(paused) => {
                self.on_paused(paused).await?;
                Ok(Flow::Continue)
            }
            Event::ExecutionContextDestroyed(_) => {
                debug!("execution context destroyed");
                self.transition(SessionState::Draining);
                Ok(Flow::Kill)
            }
            Event::ScriptParsed(_) | Event::Resumed | Event::ExecutionContextsCleared => {
                Ok(Flow::Continue)
            }
        }
    }

    async fn on_paused(&mut self, paused: PausedEvent) -> Result<(), SnapshotError> {
        if paused.is_break_on_start() {
            trace!("resuming from the break on start");
            return self.runtime.resume().await;
        }
        match paused.top_frame() {
            Some(frame) => {
                let snapshot = self.take_snapshot(frame).await?;
                info!(
                    "took snapshot {} with {} values",
                    snapshot.id(),
                    snapshot.values().len()
                );
                self.snapshots.push(snapshot);
            }
            None => warn!("paused ({}) without a call frame", paused.reason),
        }
        self.runtime.resume().await
    }

    /// Captures every included object visible from `frame`
    #[instrument(skip_all, fields(url = %frame.url, line = frame.location.line_number + 1))]
    pub async fn take_snapshot(&self, frame: &CallFrame) -> Result<Snapshot, SnapshotError> {
        let group = ObjectGroup::snapshot();
        group
            .scoped(self.runtime, async {
                let found = find_all_objects_matching(self.runtime, frame, &self.query).await?;
                // every walk runs to the end so each releases its own group
                let values = join_all(
                    found
                        .objects
                        .iter()
                        .map(|object| serialize_object(self.runtime, object, &self.serialize)),
                )
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?;
                Ok(Snapshot::new(
                    Snapshot::id_for(self.script_url(frame), &frame.location),
                    values,
                ))
            })
            .await
    }

    /// The url of the script `frame` runs in. Newer runtimes leave the url of call frames
    /// empty, so it is looked up from the scripts parsed so far.
    fn script_url<'f>(&'f self, frame: &'f CallFrame) -> &'f str {
        if !frame.url.is_empty() {
            return &frame.url;
        }
        self.scripts
            .get(&frame.location.script_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Stops handling events
    pub fn drain(&mut self) {
        self.transition(SessionState::Draining);
    }

    pub fn finish(mut self) -> Vec<Snapshot> {
        self.transition(SessionState::Terminated);
        self.snapshots
    }
}

/// Runs a script under the inspector and takes a snapshot every time it hits a breakpoint.
///
/// Returns the snapshots in the order they were taken once the script exits.
#[instrument(skip_all, fields(executable = ?options.executable))]
pub async fn run_and_take_snapshots(options: SessionOptions) -> Result<Vec<Snapshot>, SnapshotError> {
    for breakpoint in &options.breakpoints {
        breakpoint.url()?;
    }

    let mut debuggee = Debuggee::launch(&options.executable, &options.args).await?;
    let client = InspectorClient::connect(debuggee.url()).await?;

    let (tx, mut events) = unbounded_channel::<Event>();
    client
        .on_event(move |event: Event| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(event);
                Ok::<_, InspectorError>(())
            }
        })
        .await;

    let mut session = SnapshotSession::new(&client, options.query, options.serialize);
    session.start(&options.breakpoints).await?;

    loop {
        let event = tokio::select! {
            event = events.recv(), if session.state() == SessionState::Running => event,
            status = debuggee.wait() => {
                debug!("debuggee exited with {}", status?);
                break;
            }
        };
        match event {
            Some(event) => {
                if session.handle_event(event).await? == Flow::Kill {
                    if let Err(e) = debuggee.kill() {
                        debug!("could not kill debuggee: {e}");
                    }
                }
            }
            None => {
                debug!("connection to the debuggee closed");
                session.drain();
            }
        }
    }

    Ok(session.finish())
}
