//! Feeds transport events to the dispatcher.

use std::sync::Arc;

use scenelink_core::Outbound;
use scenelink_host::{DeferredQueue, HostContext};
use scenelink_transport::TransportEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dispatcher::Dispatcher;
use crate::lifecycle::send_project_info;

/// Drain `events` until the transport or the host loop goes away.
///
/// Runs on the transport side. Nothing here touches the scene: inbound
/// frames and the connect-time `project.info` snapshot are deferred onto
/// the host thread.
pub async fn run_pump(
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    dispatcher: Arc<Dispatcher>,
    queue: Arc<DeferredQueue<HostContext>>,
    out: Arc<dyn Outbound>,
) {
    while let Some(event) = events.recv().await {
        let accepted = match event {
            TransportEvent::Connected => {
                let out = Arc::clone(&out);
                queue.defer(move |host| send_project_info(host, out.as_ref()))
            }
            TransportEvent::Message(text) => dispatcher.enqueue(&queue, Arc::clone(&out), text),
            TransportEvent::Disconnected { reason } => {
                debug!(%reason, "peer disconnected");
                true
            }
        };
        if !accepted {
            info!("host loop closed, pump exiting");
            return;
        }
    }
    debug!("transport event stream ended");
}
