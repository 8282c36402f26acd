//! `project.get_info` and its aliases.

use serde_json::{Map, Value};

use crate::context::HandlerContext;
use crate::lifecycle::project_info_payload;
use crate::registry::{CommandHandler, HandlerResult, Reply};

/// Same payload as the `project.info` event.
pub struct GetProjectInfoHandler;

impl CommandHandler for GetProjectInfoHandler {
    fn handle(&self, _payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        Ok(Reply::ok(Value::Object(project_info_payload(ctx.host))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::{demo_host, run};
    use serde_json::json;

    #[test]
    fn reports_project_and_entity_count() {
        let mut host = demo_host();
        let reply = run(&GetProjectInfoHandler, &mut host, json!({})).unwrap();
        assert_eq!(reply.code, 200);
        assert_eq!(reply.data["projectName"], "Demo");
        assert_eq!(reply.data["entityCount"], 7);
    }
}
