use crate::codec::{decode, encode};
use crate::command::InspectorCommand;
use crate::connect::InspectorTransport;
use crate::error::InspectorError;
use crate::events::{Event, EventHandler, NotAnEventError, OwnedEventHandler};
use crate::raw::message::{AnyRawMessage, RawCommand, RawReply};
use crate::raw::{RawInspectorClient, RawMessageSink, RawMessageStream};
use futures_util::future::join_all;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, error, error_span, instrument, trace, warn, Instrument};
use url::Url;

type OneShots = Arc<RwLock<HashMap<u64, OneshotSender<RawReply>>>>;

/// Registered handlers, and the events received while there were none
#[derive(Default)]
struct EventDispatch {
    handlers: Vec<OwnedEventHandler<InspectorError>>,
    buffered: VecDeque<Event>,
}

/// A non-blocking inspector client
pub struct InspectorClient {
    tasks: JoinSet<()>,
    dispatch: Arc<RwLock<EventDispatch>>,
    raw_message_sink: Mutex<RawMessageSink>,
    next_id: AtomicU64,
    one_shots: OneShots,
    closed: Arc<AtomicBool>,
}

impl InspectorClient {
    /// Connects to the websocket endpoint of a runtime, as printed by `node --inspect`
    #[instrument(skip_all, fields(url = %url), err)]
    pub async fn connect(url: &Url) -> Result<Self, InspectorError> {
        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        debug!("connected");
        Ok(Self::create(stream))
    }

    /// Creates a new inspector client over an already established transport
    pub fn create<T: InspectorTransport>(transport: T) -> Self {
        let (input, output) = transport.split_transport();
        create_client(RawInspectorClient::new(input, output))
    }

    /// Registers an event handler. Events that arrived before any handler was registered are
    /// handed to this handler first, in the order they arrived.
    pub async fn on_event<E: EventHandler<Err = InspectorError> + Sync>(&self, event_handler: E) {
        let handler = OwnedEventHandler::new(event_handler);
        let mut dispatch = self.dispatch.write().await;
        while let Some(event) = dispatch.buffered.pop_front() {
            trace!("replaying buffered {} event", event.method());
            if let Err(e) = handler.clone().handle_event(event).await {
                error!("error handling buffered event: {e}");
            }
        }
        dispatch.handlers.push(handler);
    }

    /// Whether the connection to the runtime is gone
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sends a command and waits for its reply
    #[instrument(skip_all, fields(method = T::method()))]
    pub async fn send<T: InspectorCommand>(&self, command: T) -> Result<T::Reply, InspectorError> {
        if self.is_closed() {
            return Err(InspectorError::Disconnected);
        }
        let params = encode(&command)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let raw = RawCommand::new_command(id, T::method(), params);
        let (tx, rx) = tokio::sync::oneshot::channel::<RawReply>();
        self.one_shots.write().await.insert(id, tx);
        // the receive loop may have drained the pending replies between the check and the insert
        if self.is_closed() {
            self.one_shots.write().await.remove(&id);
            return Err(InspectorError::Disconnected);
        }
        trace!("sending command {id}");
        if let Err(e) = self.raw_message_sink.lock().await.send(raw).await {
            self.one_shots.write().await.remove(&id);
            return Err(e);
        }

        let reply = rx.await.map_err(|_| InspectorError::Disconnected)?;
        let result = reply
            .into_result()
            .map_err(|error| InspectorError::Protocol {
                method: T::method(),
                error,
            })?;
        let result = match result {
            Value::Null => Value::Object(Default::default()),
            result => result,
        };
        Ok(decode(result)?)
    }
}

fn create_client(raw_client: RawInspectorClient) -> InspectorClient {
    let dispatch = Arc::new(RwLock::new(EventDispatch::default()));
    let one_shots: OneShots = Arc::default();
    let closed = Arc::new(AtomicBool::new(false));

    let mut join_set = JoinSet::<()>::new();
    let (event_tx, event_rx) = unbounded_channel::<Event>();
    join_set.spawn(
        event_handling_loop(event_rx, dispatch.clone()).instrument(error_span!("event-loop")),
    );

    let (raw_sink, raw_stream) = raw_client.into_split();
    join_set.spawn(
        message_recv_loop(raw_stream, event_tx, one_shots.clone(), closed.clone())
            .instrument(error_span!("message-recv-loop")),
    );

    InspectorClient {
        tasks: join_set,
        dispatch,
        raw_message_sink: Mutex::new(raw_sink),
        next_id: AtomicU64::new(1),
        one_shots,
        closed,
    }
}

async fn message_recv_loop(
    mut raw_stream: RawMessageStream,
    event_tx: UnboundedSender<Event>,
    one_shots: OneShots,
    closed: Arc<AtomicBool>,
) {
    while let Some(message) = raw_stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                error!("connection to runtime failed: {e}");
                break;
            }
        };
        match message {
            AnyRawMessage::Event(raw_event) => {
                trace!("got event {} from runtime", raw_event.method());
                match Event::try_from(raw_event) {
                    Ok(event) => {
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(NotAnEventError::Unknown(method)) => {
                        trace!("ignoring event {method}")
                    }
                    Err(e) => warn!("Received unexpected event from runtime: {e}"),
                }
            }
            AnyRawMessage::Reply(reply) => {
                trace!("got reply {} from runtime", reply.id());
                match one_shots.write().await.remove(&reply.id()) {
                    Some(sender) => {
                        let _ = sender.send(reply);
                    }
                    None => warn!("reply {} does not answer any pending command", reply.id()),
                }
            }
        }
    }
    debug!("connection to runtime closed");
    closed.store(true, Ordering::SeqCst);
    one_shots.write().await.clear();
}

async fn event_handling_loop(
    mut event_rx: UnboundedReceiver<Event>,
    dispatch: Arc<RwLock<EventDispatch>>,
) {
    while let Some(event) = event_rx.recv().await {
        let handlers = {
            let mut dispatch = dispatch.write().await;
            if dispatch.handlers.is_empty() {
                trace!("buffering {} event", event.method());
                dispatch.buffered.push_back(event);
                continue;
            }
            dispatch.handlers.clone()
        };
        let results = join_all(
            handlers
                .into_iter()
                .map(|handler| handler.handle_event(event.clone())),
        )
        .await;
        for result in results {
            if let Err(e) = result {
                error!("error handling {} event: {e}", event.method());
            }
        }
    }
    // dropping the handlers closes any channel they forward into
    dispatch.write().await.handlers.clear();
}

impl Drop for InspectorClient {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}
