//! Project lifecycle events.

use scenelink_core::{Event, Outbound, send_envelope};
use scenelink_host::HostContext;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

/// Sent after every successful connect.
pub const PROJECT_INFO_EVENT: &str = "project.info";

/// Sent on shutdown while connected.
pub const PROJECT_CLOSED_EVENT: &str = "project.closed";

/// The `project.info` payload for the current host state.
pub fn project_info_payload(host: &HostContext) -> Map<String, Value> {
    match serde_json::to_value(host.project_info()) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(error) => {
            warn!(%error, "failed to encode project info");
            Map::new()
        }
    }
}

/// Send `project.info`. Call on the host thread.
pub fn send_project_info(host: &HostContext, out: &dyn Outbound) {
    debug!(project = %host.project.name, "sending project info");
    send_envelope(out, &Event::new(PROJECT_INFO_EVENT, project_info_payload(host)));
}

/// Send `project.closed` if a peer is connected. Returns whether it was sent.
pub fn send_project_closed(host: &HostContext, out: &dyn Outbound) -> bool {
    if !out.is_connected() {
        return false;
    }
    let mut payload = Map::new();
    let _ = payload.insert("projectName".into(), json!(host.project.name));
    let _ = payload.insert(
        "projectPath".into(),
        json!(host.project.project_file().to_string_lossy()),
    );
    send_envelope(out, &Event::new(PROJECT_CLOSED_EVENT, payload));
    true
}
