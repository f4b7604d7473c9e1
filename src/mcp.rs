//! The Model Context Protocol methods the server answers.
//!
//! Only the tools capability is offered. [`dispatch`] maps a request to its
//! handler; [`notify`] absorbs notifications, which never get a reply.

use crate::jrpc::{Error, Notification, Request, Response};
use serde::Serialize;
use serde_json::{Value, json};
use tools::ToolRegistry;

pub mod actions;
pub mod tools;

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// The name reported in `serverInfo`.
pub const SERVER_NAME: &str = "twodo_mcp";

const INSTRUCTIONS: &str = "Tools for the 2Do task manager on macOS. Every tool sends a \
twodo3:// URL to the app; 2Do has no read API, so results only confirm the URL was handed \
over. Use twodo_get_task_id to have 2Do copy a task UID to the clipboard.";

/// Routes one request to its handler.
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use twodo_mcp::dispatch::OpenCommand;
/// use twodo_mcp::jrpc::Request;
/// use twodo_mcp::mcp::{dispatch, tools::ToolRegistry};
///
/// let registry = ToolRegistry::twodo(Arc::new(OpenCommand::system()));
/// let response = dispatch(Request::new("tools/list".to_string(), None, json!(1)), &registry);
/// let result = response.result.unwrap();
/// assert_eq!(result["tools"].as_array().unwrap().len(), 10);
/// ```
pub fn dispatch(request: Request, registry: &ToolRegistry) -> Response<Value> {
    match request.method.as_str() {
        "initialize" => initialize(request).erase(),
        "ping" => Response::new(json!({}), request.id),
        "tools/list" => tools::list(request, registry).erase(),
        "tools/call" => tools::call(request, registry).erase(),
        other => {
            logwise::warn_sync!(
                "unsupported method {method}",
                method = logwise::privacy::LogIt(&other)
            );
            Response::err(Error::method_not_found(), request.id)
        }
    }
}

/// Handles a notification. Nothing is sent back.
pub fn notify(notification: &Notification) {
    logwise::info_sync!(
        "notification {method}",
        method = logwise::privacy::LogIt(&notification.method)
    );
}

fn initialize(request: Request) -> Response<InitializeResult> {
    let requested = request
        .params
        .as_ref()
        .and_then(|params| params.get("protocolVersion"))
        .and_then(Value::as_str);
    let version = negotiate(requested);
    logwise::info_sync!(
        "initialize: client asked for {requested}, using {version}",
        requested = logwise::privacy::LogIt(&requested),
        version = logwise::privacy::LogIt(&version)
    );
    Response::new(InitializeResult::new(version), request.id)
}

/// Echoes a supported version back, otherwise offers the newest one.
fn negotiate(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS
                .into_iter()
                .find(|supported| *supported == requested)
        })
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: &'static str,
    capabilities: Value,
    #[serde(rename = "serverInfo")]
    server_info: Value,
    instructions: &'static str,
}

impl InitializeResult {
    fn new(protocol_version: &'static str) -> Self {
        InitializeResult {
            protocol_version,
            capabilities: json!({ "tools": { "listChanged": false } }),
            server_info: json!({
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }),
            instructions: INSTRUCTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::url::EncodedUrl;
    use std::sync::Arc;

    struct Nowhere;

    impl Dispatcher for Nowhere {
        fn open(&self, _url: &EncodedUrl) -> Result<(), crate::Error> {
            Ok(())
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::twodo(Arc::new(Nowhere))
    }

    fn request(method: &str, params: Option<Value>) -> Request {
        Request::new(method.to_string(), params, json!(1))
    }

    #[test]
    fn initialize_negotiates_versions() {
        let response = dispatch(
            request("initialize", Some(json!({"protocolVersion": "2025-03-26"}))),
            &registry(),
        );
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "twodo_mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);

        let response = dispatch(
            request("initialize", Some(json!({"protocolVersion": "1999-01-01"}))),
            &registry(),
        );
        assert_eq!(response.result.unwrap()["protocolVersion"], "2025-06-18");
    }

    #[test]
    fn ping_answers_with_an_empty_object() {
        let response = dispatch(request("ping", None), &registry());
        assert_eq!(response.result, Some(json!({})));
    }

    #[test]
    fn unknown_methods_are_rejected() {
        let response = dispatch(request("resources/list", None), &registry());
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn tools_call_without_params_is_invalid() {
        let response = dispatch(request("tools/call", None), &registry());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn unknown_tool_is_a_protocol_error() {
        let response = dispatch(
            request("tools/call", Some(json!({"name": "twodo_delete", "arguments": {}}))),
            &registry(),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Unknown tool: twodo_delete");
    }

    #[test]
    fn tool_failure_is_a_result() {
        let response = dispatch(
            request("tools/call", Some(json!({"name": "twodo_add_task", "arguments": {"task": ""}}))),
            &registry(),
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["kind"], "MissingParameter");
    }
}
