//! Raw messages straight from the websocket

use crate::error::InspectorError;
use crate::raw::codec::RawCodec;
use crate::raw::message::{AnyRawMessage, RawCommand};
use futures_core::Stream;
use futures_sink::Sink;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{error_span, trace, warn, Instrument};

pub mod codec;
pub mod message;

type BoxedFrameSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

/// A raw command sink
#[pin_project]
pub struct RawMessageSink(#[pin] BoxedFrameSink);

impl Sink<RawCommand> for RawMessageSink {
    type Error = InspectorError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Sink::<Message>::poll_ready(self.project().0, cx).map_err(InspectorError::from)
    }

    fn start_send(self: Pin<&mut Self>, item: RawCommand) -> Result<(), Self::Error> {
        let frame = RawCodec.encode(&item)?;
        Sink::<Message>::start_send(self.project().0, frame)?;
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Sink::<Message>::poll_flush(self.project().0, cx).map_err(InspectorError::from)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Sink::<Message>::poll_close(self.project().0, cx).map_err(InspectorError::from)
    }
}

/// A raw message stream
#[derive(Debug)]
#[pin_project(PinnedDrop)]
pub struct RawMessageStream {
    receiver: UnboundedReceiver<Result<AnyRawMessage, InspectorError>>,
    task: JoinHandle<()>,
}

impl Stream for RawMessageStream {
    type Item = Result<AnyRawMessage, InspectorError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().receiver.poll_recv(cx)
    }
}

#[pin_project::pinned_drop]
impl PinnedDrop for RawMessageStream {
    fn drop(self: Pin<&mut Self>) {
        self.task.abort();
    }
}

/// The raw client
pub struct RawInspectorClient {
    sink: BoxedFrameSink,
    receiver: UnboundedReceiver<Result<AnyRawMessage, InspectorError>>,
    task: JoinHandle<()>,
}

impl RawInspectorClient {
    /// Creates a new RawInspectorClient from the two halves of a websocket
    pub fn new<I, O>(input: I, output: O) -> Self
    where
        I: Stream<Item = Result<Message, WsError>> + Unpin + Send + 'static,
        O: Sink<Message, Error = WsError> + Send + 'static,
    {
        let (tx, rx) = unbounded_channel::<Result<AnyRawMessage, InspectorError>>();

        let task = tokio::spawn(
            async move {
                let mut input = input;
                while let Some(frame) = input.next().await {
                    let frame = match frame {
                        Ok(frame) => frame,
                        Err(e) => {
                            let _ = tx.send(Err(e.into()));
                            break;
                        }
                    };
                    match RawCodec.decode(frame) {
                        Ok(Some(message)) => {
                            if tx.send(Ok(message)).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!("dropping undecodable frame: {e}"),
                    }
                }
                trace!("websocket input ended");
            }
            .instrument(error_span!("frame-recv-loop")),
        );

        RawInspectorClient {
            sink: Box::pin(output),
            receiver: rx,
            task,
        }
    }

    /// Splits into the sink and the stream
    pub fn into_split(self) -> (RawMessageSink, RawMessageStream) {
        let Self {
            sink,
            receiver,
            task,
        } = self;
        (RawMessageSink(sink), RawMessageStream { receiver, task })
    }
}
