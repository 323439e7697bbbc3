//! Helpers for driving a live node inspector from tests

use inspector_client::events::{Event, PausedEvent};
use inspector_client::{InspectorClient, InspectorError};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

pub use selfies_test_fixtures::{node_available, NodeInstance};

/// How long a test waits for node before giving up
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// A client connected to a node instance, with every event it receives queued up
pub struct Connected {
    pub client: InspectorClient,
    pub events: UnboundedReceiver<Event>,
}

impl Connected {
    /// Connects to the inspector of a node instance
    pub async fn new(instance: &NodeInstance) -> Result<Self, InspectorError> {
        let client = InspectorClient::connect(instance.url()).await?;
        let (tx, events) = unbounded_channel();
        client
            .on_event(move |event: Event| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(event);
                    Ok::<_, InspectorError>(())
                }
            })
            .await;
        Ok(Self { client, events })
    }

    /// Waits for the next `Debugger.paused`, skipping every other event
    pub async fn next_pause(&mut self) -> Option<PausedEvent> {
        tokio::time::timeout(TIMEOUT, async {
            while let Some(event) = self.events.recv().await {
                tracing::debug!("event: {}", event.method());
                if let Event::Paused(paused) = event {
                    return Some(paused);
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
    }
}
