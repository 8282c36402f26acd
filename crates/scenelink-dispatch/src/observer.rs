//! Operator notifications for responses the peer sends back.
//!
//! The peer answers some host-initiated requests (asset imports) with a
//! `res` envelope. Those are surfaced to the operator as a log line; every
//! other response is ignored.

use scenelink_core::Response;
use serde_json::Value;
use tracing::{info, warn};

/// A notification shown to the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Headline.
    pub title: &'static str,
    /// Detail line.
    pub body: String,
    /// Whether the operation succeeded.
    pub success: bool,
}

/// Turns modeled responses into notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseObserver;

fn title_for(method: &str) -> Option<&'static str> {
    match method {
        "content.import_folder" => Some("Import Folder to Asset Library"),
        "content.import_assets" => Some("Import Assets to Asset Library"),
        _ => None,
    }
}

impl ResponseObserver {
    /// Inspect a response and log a notification when it is modeled.
    pub fn observe(&self, response: &Response) -> Option<Notification> {
        let data = response.data.as_ref()?.as_object()?;
        let title = title_for(response.method.as_deref()?)?;

        let success = data.get("ok").and_then(Value::as_bool).unwrap_or(true);
        let body = if success {
            match data.get("importedPath").and_then(Value::as_str) {
                Some(path) if !path.is_empty() => format!("Succeeded: {path}"),
                _ => {
                    let count = data.get("count").and_then(Value::as_i64).unwrap_or(0);
                    format!("Succeeded: {count}")
                }
            }
        } else {
            let error = data
                .get("error")
                .and_then(Value::as_str)
                .filter(|e| !e.is_empty())
                .unwrap_or("Import failed");
            format!("Failed ({error})")
        };

        if success {
            info!(title, %body, "peer notification");
        } else {
            warn!(title, %body, "peer notification");
        }
        Some(Notification {
            title,
            body,
            success,
        })
    }
}
