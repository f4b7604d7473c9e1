//! JSON-RPC 2.0 message types.
//!
//! MCP frames every exchange as JSON-RPC 2.0. A client sends [`Request`]s
//! (which carry an `id` and get exactly one [`Response`]) and
//! [`Notification`]s (which have no `id` and are never answered). [`Message`]
//! tells the two apart when reading from the wire.
//!
//! # Examples
//!
//! ```
//! use twodo_mcp::jrpc::{Error, Message, Response};
//! use serde_json::json;
//!
//! let line = r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#;
//! let Message::Request(request) = serde_json::from_str::<Message>(line).unwrap() else {
//!     panic!("expected a request");
//! };
//! assert_eq!(request.method, "tools/list");
//!
//! let response: Response<serde_json::Value> =
//!     Response::err(Error::method_not_found(), request.id);
//! let wire = serde_json::to_value(&response).unwrap();
//! assert_eq!(wire["id"], json!(7));
//! assert_eq!(wire["error"]["code"], json!(-32601));
//! assert!(wire.get("result").is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// The only `jsonrpc` value this crate speaks.
pub const VERSION: &str = "2.0";

/// A method call that expects a [`Response`] with the same `id`.
///
/// ```
/// use twodo_mcp::jrpc::Request;
/// use serde_json::json;
///
/// let request: Request =
///     serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping","id":"a"}"#).unwrap();
/// assert_eq!(request.method, "ping");
/// assert_eq!(request.params, None);
/// assert_eq!(request.id, json!("a"));
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub id: Value,
}

impl Request {
    pub fn new(method: String, params: Option<Value>, id: Value) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            method,
            params,
            id,
        }
    }
}

/// A one-way message. The receiver never answers it.
///
/// ```
/// use twodo_mcp::jrpc::Notification;
///
/// let n = Notification::new("notifications/initialized".to_string(), None);
/// let wire = serde_json::to_string(&n).unwrap();
/// assert!(!wire.contains("\"id\""));
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    pub fn new(method: String, params: Option<Value>) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            method,
            params,
        }
    }
}

/// Anything a client may send that carries a `method`.
///
/// A message with an `id` is a request; one without is a notification.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Message {
    Request(Request),
    Notification(Notification),
}

/// The answer to a [`Request`]. Exactly one of `result` and `error` is set.
///
/// ```
/// use twodo_mcp::jrpc::Response;
/// use serde_json::json;
///
/// let response = Response::new(json!({}), json!(1));
/// let wire = serde_json::to_string(&response).unwrap();
/// assert_eq!(wire, r#"{"jsonrpc":"2.0","result":{},"id":1}"#);
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct Response<R> {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<R>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
    pub id: Value,
}

impl<R> Response<R> {
    pub fn new(result: R, id: Value) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn err(e: Error, id: Value) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            result: None,
            error: Some(e),
            id,
        }
    }

    /// Converts the typed result to a `serde_json::Value`.
    ///
    /// Lets handlers with different result types share one return type. A
    /// result that fails to serialize becomes an internal error.
    ///
    /// ```
    /// use twodo_mcp::jrpc::Response;
    /// use serde_json::json;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Pong {
    ///     ok: bool,
    /// }
    ///
    /// let erased = Response::new(Pong { ok: true }, json!(3)).erase();
    /// assert_eq!(erased.result, Some(json!({"ok": true})));
    /// ```
    pub fn erase(self) -> Response<Value>
    where
        R: Serialize,
    {
        let Some(result) = self.result else {
            return Response {
                jsonrpc: self.jsonrpc,
                result: None,
                error: self.error,
                id: self.id,
            };
        };
        match serde_json::to_value(result) {
            Ok(value) => Response {
                jsonrpc: self.jsonrpc,
                result: Some(value),
                error: self.error,
                id: self.id,
            },
            Err(e) => Response::err(Error::from_error(e), self.id),
        }
    }
}

/// A JSON-RPC 2.0 error object.
///
/// | Code | Meaning |
/// |---|---|
/// | `-32700` | Parse error |
/// | `-32600` | Invalid Request |
/// | `-32601` | Method not found |
/// | `-32602` | Invalid params, including an unknown tool name |
/// | `-32603` | Internal error |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }

    /// -32700, for a line that is not JSON at all.
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error".to_string(), None)
    }

    /// -32600, for JSON that is not a request object.
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request".to_string(), None)
    }

    pub fn method_not_found() -> Self {
        Self::new(-32601, "Method not found".to_string(), None)
    }

    /// -32602 with `detail` as `data`.
    ///
    /// ```
    /// use twodo_mcp::jrpc::Error;
    ///
    /// let error = Error::invalid_params("missing field `name`".to_string());
    /// assert_eq!(error.code, -32602);
    /// assert_eq!(error.data, Some("missing field `name`".into()));
    /// ```
    pub fn invalid_params(detail: String) -> Self {
        Self::new(-32602, "Invalid params".to_string(), Some(detail.into()))
    }

    /// -32602 naming a tool that is not registered.
    pub fn unknown_tool(name: String) -> Self {
        Self::new(-32602, format!("Unknown tool: {name}"), None)
    }

    /// -32603 carrying `error`'s message.
    pub fn from_error<E: std::error::Error>(error: E) -> Self {
        Self::new(-32603, error.to_string(), None)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(-32603, message, None)
    }
}
