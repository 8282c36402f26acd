//! Envelope routing on the host thread.

use std::sync::Arc;

use metrics::counter;
use scenelink_core::{BridgeError, Envelope, Outbound, Request, Response, send_envelope};
use scenelink_host::{DeferredQueue, HostContext};
use scenelink_settings::HandlerSettings;
use tracing::{debug, info, trace, warn};

use crate::context::HandlerContext;
use crate::handlers::register_all;
use crate::observer::ResponseObserver;
use crate::registry::MethodRegistry;

/// Decodes inbound frames, routes requests and sends correlated responses.
#[derive(Debug)]
pub struct Dispatcher {
    registry: MethodRegistry,
    observer: ResponseObserver,
    settings: HandlerSettings,
}

impl Dispatcher {
    /// Dispatcher over an explicit registry.
    pub fn new(registry: MethodRegistry, settings: HandlerSettings) -> Self {
        Self {
            registry,
            observer: ResponseObserver,
            settings,
        }
    }

    /// Dispatcher with every built-in handler registered.
    pub fn with_builtin_handlers(settings: HandlerSettings) -> Self {
        let mut registry = MethodRegistry::new();
        register_all(&mut registry);
        Self::new(registry, settings)
    }

    /// The routing table.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Hop a raw frame onto the host thread and return immediately.
    ///
    /// The frame is processed by a single-shot task on the host loop's next
    /// pass. Returns `false` when the host loop has already shut down.
    pub fn enqueue(
        self: &Arc<Self>,
        queue: &DeferredQueue<HostContext>,
        out: Arc<dyn Outbound>,
        raw: String,
    ) -> bool {
        let dispatcher = Arc::clone(self);
        queue.defer(move |host| dispatcher.process_message(host, out.as_ref(), &raw))
    }

    /// Handle one inbound frame. Host thread only.
    ///
    /// Malformed frames are dropped, responses go to the observer and any
    /// other kind is ignored. Requests always get a correlated response
    /// unless their id is empty.
    pub fn process_message(&self, host: &mut HostContext, out: &dyn Outbound, raw: &str) {
        let envelope = match Envelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(%error, "dropping malformed message");
                return;
            }
        };

        match envelope {
            Envelope::Request(request) => {
                info!(method = %request.method, id = %request.id, "request received");
                let response = self.dispatch(&request, host, out);
                if request.id.is_empty() {
                    debug!(method = %request.method, "no id, response suppressed");
                } else {
                    send_envelope(out, &response);
                }
            }
            Envelope::Response(response) => {
                debug!(id = %response.id, code = response.code, "response received");
                let _ = self.observer.observe(&response);
            }
            Envelope::Event(event) => {
                trace!(method = %event.method, "ignoring inbound event");
            }
            Envelope::Unknown { kind, method } => {
                trace!(%kind, %method, "ignoring non-request message");
            }
        }
    }

    /// Route a request to its handler and build the response.
    pub fn dispatch(&self, request: &Request, host: &mut HostContext, out: &dyn Outbound) -> Response {
        let method = request.method.clone();
        counter!("bridge_requests_total", "method" => method.clone()).increment(1);

        let response = match self.registry.get(&method) {
            None => Response::error(&request.id, &BridgeError::UnknownMethod { method: method.clone() }),
            Some(handler) => {
                let mut ctx = HandlerContext::new(host, out, &self.settings);
                match handler.handle(&request.payload, &mut ctx) {
                    Ok(reply) => Response::new(&request.id, reply.code, Some(reply.data)),
                    Err(error) => {
                        debug!(method = %method, %error, "handler failed");
                        Response::error(&request.id, &error)
                    }
                }
            }
        };

        if response.code >= 400 {
            counter!(
                "bridge_errors_total",
                "method" => method,
                "code" => response.code.to_string()
            )
            .increment(1);
        }
        response
    }
}
