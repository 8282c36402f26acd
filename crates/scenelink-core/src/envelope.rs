//! Wire envelope for requests, responses and events.
//!
//! ```json
//! { "ver": "1.0", "type": "req", "id": "r1", "method": "entity.inspect", "payload": {} }
//! { "ver": "1.0", "type": "res", "id": "r1", "code": 200, "data": {} }
//! { "ver": "1.0", "type": "evt", "method": "system.heartbeat", "payload": {} }
//! ```
//!
//! Decoding is lenient: unknown top-level fields are ignored, a request may
//! carry its payload under `params` or `payload`, and a response may carry
//! its body under `result` or `data` (`result` first).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::BridgeError;

/// Version tag written into every outgoing envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Envelope kind, the `type` field on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeKind {
    /// A request expecting a correlated response.
    #[serde(rename = "req")]
    Request,
    /// A response correlated to a request by `id`.
    #[serde(rename = "res")]
    Response,
    /// An unsolicited event.
    #[serde(rename = "evt")]
    Event,
}

/// A request envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version tag.
    pub ver: String,
    /// Always [`EnvelopeKind::Request`].
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Correlation id.
    pub id: String,
    /// Method name, `<noun>.<verb>`.
    pub method: String,
    /// Request payload object.
    pub payload: Map<String, Value>,
}

/// A response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version tag.
    pub ver: String,
    /// Always [`EnvelopeKind::Response`].
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Id of the originating request.
    pub id: String,
    /// Method of the originating request, when the peer echoes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// HTTP-like status code.
    pub code: u16,
    /// Response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// An event envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Protocol version tag.
    pub ver: String,
    /// Always [`EnvelopeKind::Event`].
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Event name, `<noun>.<verb>`.
    pub method: String,
    /// Event payload object.
    pub payload: Map<String, Value>,
}

/// A decoded inbound envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    /// `type == "req"`.
    Request(Request),
    /// `type == "res"`.
    Response(Response),
    /// `type == "evt"`.
    Event(Event),
    /// Any other `type` value; logged and ignored by the dispatcher.
    Unknown {
        /// The raw `type` value.
        kind: String,
        /// The `method` field, if any.
        method: String,
    },
}

/// Loose shape used for decoding before classification.
#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    ver: Option<String>,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
}

fn into_object(value: Option<Value>) -> Option<Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

impl Envelope {
    /// Decode an inbound text frame.
    ///
    /// Fails with [`BridgeError::Protocol`] only when the frame is not a JSON
    /// object; unknown kinds decode to [`Envelope::Unknown`].
    pub fn decode(raw: &str) -> Result<Self, BridgeError> {
        let wire: WireEnvelope =
            serde_json::from_str(raw).map_err(|e| BridgeError::Protocol {
                message: e.to_string(),
            })?;
        let ver = wire.ver.unwrap_or_else(|| PROTOCOL_VERSION.to_owned());
        let method = wire.method.unwrap_or_default();

        let envelope = match wire.kind.as_str() {
            "req" => {
                let payload = into_object(wire.params)
                    .or_else(|| into_object(wire.payload))
                    .unwrap_or_default();
                Self::Request(Request {
                    ver,
                    kind: EnvelopeKind::Request,
                    id: wire.id.unwrap_or_default(),
                    method,
                    payload,
                })
            }
            "res" => Self::Response(Response {
                ver,
                kind: EnvelopeKind::Response,
                id: wire.id.unwrap_or_default(),
                method: (!method.is_empty()).then_some(method),
                code: wire.code.unwrap_or(crate::codes::OK),
                data: wire.result.or(wire.data),
            }),
            "evt" => Self::Event(Event {
                ver,
                kind: EnvelopeKind::Event,
                method,
                payload: into_object(wire.payload).unwrap_or_default(),
            }),
            _ => Self::Unknown {
                kind: wire.kind,
                method,
            },
        };
        Ok(envelope)
    }
}

impl Request {
    /// Build a request.
    pub fn new(id: impl Into<String>, method: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            ver: PROTOCOL_VERSION.to_owned(),
            kind: EnvelopeKind::Request,
            id: id.into(),
            method: method.into(),
            payload,
        }
    }
}

impl Response {
    /// Build a response with an explicit code.
    pub fn new(id: impl Into<String>, code: u16, data: Option<Value>) -> Self {
        Self {
            ver: PROTOCOL_VERSION.to_owned(),
            kind: EnvelopeKind::Response,
            id: id.into(),
            method: None,
            code,
            data,
        }
    }

    /// Build a 200 response.
    pub fn success(id: impl Into<String>, data: Value) -> Self {
        Self::new(id, crate::codes::OK, Some(data))
    }

    /// Build an error response from a [`BridgeError`].
    pub fn error(id: impl Into<String>, err: &BridgeError) -> Self {
        Self::new(id, err.code(), Some(err.to_error_data()))
    }
}

impl Event {
    /// Build an event.
    pub fn new(method: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            ver: PROTOCOL_VERSION.to_owned(),
            kind: EnvelopeKind::Event,
            method: method.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // ── decode ──────────────────────────────────────────────────────

    #[test]
    fn decode_request_with_payload() {
        let raw = r#"{"ver":"1.0","type":"req","id":"r1","method":"entity.inspect","payload":{"targets":{"names":["Cube"]}}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Request(req) => {
            assert_eq!(req.id, "r1");
            assert_eq!(req.method, "entity.inspect");
            assert_eq!(req.payload["targets"]["names"][0], "Cube");
        });
    }

    #[test]
    fn decode_request_prefers_params() {
        let raw = r#"{"type":"req","id":"r2","method":"m","params":{"a":1},"payload":{"a":2}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Request(req) => assert_eq!(req.payload["a"], 1));
    }

    #[test]
    fn decode_request_without_payload_is_empty_object() {
        let raw = r#"{"type":"req","id":"r3","method":"project.get_info"}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Request(req) => {
            assert!(req.payload.is_empty());
            assert_eq!(req.ver, PROTOCOL_VERSION);
        });
    }

    #[test]
    fn decode_request_with_non_object_payload_is_empty_object() {
        let raw = r#"{"type":"req","id":"r4","method":"m","payload":[1,2]}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Request(req) => assert!(req.payload.is_empty()));
    }

    #[test]
    fn decode_response_reads_result() {
        let raw = r#"{"type":"res","id":"x","method":"content.import_folder","code":200,"result":{"ok":true}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Response(res) => {
            assert_eq!(res.method.as_deref(), Some("content.import_folder"));
            assert_eq!(res.data.unwrap()["ok"], true);
        });
    }

    #[test]
    fn decode_response_prefers_result_over_data() {
        let raw = r#"{"type":"res","id":"x","code":200,"result":{"from":"result"},"data":{"from":"data"}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Response(res) => {
            assert_eq!(res.data, Some(json!({"from": "result"})));
        });
    }

    #[test]
    fn decode_response_reads_data_without_result() {
        let raw = r#"{"type":"res","id":"x","code":200,"data":{"from":"data"}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Response(res) => {
            assert_eq!(res.data.unwrap()["from"], "data");
        });
    }

    #[test]
    fn decode_event() {
        let raw = r#"{"ver":"1.0","type":"evt","method":"system.heartbeat","payload":{}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_matches!(env, Envelope::Event(evt) => assert_eq!(evt.method, "system.heartbeat"));
    }

    #[test]
    fn decode_unknown_kind() {
        let raw = r#"{"type":"ping","method":"x"}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_eq!(
            env,
            Envelope::Unknown {
                kind: "ping".into(),
                method: "x".into()
            }
        );
    }

    #[test]
    fn decode_garbage_is_protocol_error() {
        assert_matches!(
            Envelope::decode("not json"),
            Err(BridgeError::Protocol { .. })
        );
        assert_matches!(Envelope::decode("[1,2]"), Err(BridgeError::Protocol { .. }));
    }

    // ── encode ──────────────────────────────────────────────────────

    #[test]
    fn response_wire_shape() {
        let res = Response::success("r1", json!({"count": 2}));
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(
            v,
            json!({"ver": "1.0", "type": "res", "id": "r1", "code": 200, "data": {"count": 2}})
        );
    }

    #[test]
    fn error_response_wire_shape() {
        let res = Response::error("r9", &BridgeError::NoFilterMatch);
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["code"], 404);
        assert_eq!(v["data"]["message"], "No entity matched targets");
    }

    #[test]
    fn response_survives_decode_with_unknown_fields() {
        let res = Response::new("abc-123", 409, None);
        let mut v = serde_json::to_value(&res).unwrap();
        v["extra"] = json!({"ignored": true});
        let env = Envelope::decode(&v.to_string()).unwrap();
        assert_matches!(env, Envelope::Response(back) => {
            assert_eq!(back.id, "abc-123");
            assert_eq!(back.code, 409);
        });
    }

    #[test]
    fn event_wire_shape() {
        let evt = Event::new("system.heartbeat", Map::new());
        let v = serde_json::to_value(&evt).unwrap();
        assert_eq!(
            v,
            json!({"ver": "1.0", "type": "evt", "method": "system.heartbeat", "payload": {}})
        );
    }

    #[test]
    fn request_wire_shape() {
        let mut payload = Map::new();
        let _ = payload.insert("limit".into(), json!(5));
        let req = Request::new("q", "entity.get_info", payload);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["type"], "req");
        assert_eq!(v["payload"]["limit"], 5);
    }
}
