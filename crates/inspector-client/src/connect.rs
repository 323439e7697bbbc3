//! defines how a client can connect to a runtime

use futures_core::Stream;
use futures_sink::Sink;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

/// A type that can be used as a transport
pub trait InspectorTransport {
    type Input: Stream<Item = Result<Message, WsError>> + Unpin + Send + 'static;
    type Output: Sink<Message, Error = WsError> + Send + 'static;

    fn split_transport(self) -> (Self::Input, Self::Output)
    where
        Self: Sized;
}

impl<S> InspectorTransport for WebSocketStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Input = SplitStream<WebSocketStream<S>>;
    type Output = SplitSink<WebSocketStream<S>, Message>;

    fn split_transport(self) -> (Self::Input, Self::Output)
    where
        Self: Sized,
    {
        let (output, input) = self.split();
        (input, output)
    }
}
