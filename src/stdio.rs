//! Line-delimited JSON-RPC over stdin and stdout.
//!
//! Each input line holds one message and each response is written as one line
//! and flushed immediately. Stdout carries nothing but protocol traffic.

use crate::jrpc::{self, Message, Response};
use crate::mcp::{self, tools::ToolRegistry};
use serde_json::Value;
use std::io::{BufRead, Write};

/// Errors that end the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a line or writing a response failed.
    #[error("stdio transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A response could not be turned into JSON.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Answers MCP messages from a [`ToolRegistry`].
pub struct Server {
    registry: ToolRegistry,
}

impl Server {
    pub fn new(registry: ToolRegistry) -> Self {
        Server { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one input line, returning the line to write back, if any.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use twodo_mcp::dispatch::OpenCommand;
    /// use twodo_mcp::mcp::tools::ToolRegistry;
    /// use twodo_mcp::stdio::Server;
    ///
    /// let server = Server::new(ToolRegistry::twodo(Arc::new(OpenCommand::system())));
    /// let reply = server.handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
    /// assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":{},"id":1}"#));
    /// assert_eq!(server.handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#), None);
    /// ```
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = self.handle(line)?;
        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                logwise::error_sync!(
                    "could not serialize response: {e}",
                    e = logwise::privacy::LogIt(&e)
                );
                let fallback: Response<Value> =
                    Response::err(jrpc::Error::from_error(e), response.id);
                serde_json::to_string(&fallback).ok()
            }
        }
    }

    fn handle(&self, line: &str) -> Option<Response<Value>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                logwise::warn_sync!("unparseable input: {e}", e = logwise::privacy::LogIt(&e));
                return Some(Response::err(jrpc::Error::parse_error(), Value::Null));
            }
        };
        // Replies from the client to server-initiated requests; we never send any.
        if value.is_object() && value.get("method").is_none() && value.get("id").is_some() {
            logwise::info_sync!("ignoring message without a method");
            return None;
        }
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Message>(value) {
            Ok(Message::Request(request)) if request.jsonrpc != jrpc::VERSION => {
                logwise::warn_sync!(
                    "unsupported jsonrpc version {version}",
                    version = logwise::privacy::LogIt(&request.jsonrpc)
                );
                Some(Response::err(jrpc::Error::invalid_request(), request.id))
            }
            Ok(Message::Request(request)) => Some(mcp::dispatch(request, &self.registry)),
            Ok(Message::Notification(notification)) if notification.jsonrpc != jrpc::VERSION => {
                logwise::warn_sync!(
                    "dropping notification with jsonrpc version {version}",
                    version = logwise::privacy::LogIt(&notification.jsonrpc)
                );
                None
            }
            Ok(Message::Notification(notification)) => {
                mcp::notify(&notification);
                None
            }
            Err(e) => {
                logwise::warn_sync!("invalid request: {e}", e = logwise::privacy::LogIt(&e));
                Some(Response::err(jrpc::Error::invalid_request(), id))
            }
        }
    }

    /// Serves until `input` reaches end of file.
    ///
    /// A line that is not valid UTF-8 is answered with a parse error like any
    /// other malformed line.
    pub fn serve<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<(), Error> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let reply = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line),
                Err(e) => {
                    logwise::warn_sync!("input is not UTF-8: {e}", e = logwise::privacy::LogIt(&e));
                    let response: Response<Value> =
                        Response::err(jrpc::Error::parse_error(), Value::Null);
                    Some(serde_json::to_string(&response)?)
                }
            };
            if let Some(reply) = reply {
                output.write_all(reply.as_bytes())?;
                output.write_all(b"\n")?;
                output.flush()?;
            }
        }
        logwise::info_sync!("input closed, shutting down");
        Ok(())
    }

    /// Serves on the process's stdin and stdout.
    pub fn run(&self) -> Result<(), Error> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::url::EncodedUrl;
    use serde_json::json;
    use std::sync::Arc;

    struct Nowhere;

    impl Dispatcher for Nowhere {
        fn open(&self, _url: &EncodedUrl) -> Result<(), crate::Error> {
            Ok(())
        }
    }

    fn server() -> Server {
        Server::new(ToolRegistry::twodo(Arc::new(Nowhere)))
    }

    fn reply(line: &str) -> Value {
        serde_json::from_str(&server().handle_line(line).unwrap()).unwrap()
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(server().handle_line(""), None);
        assert_eq!(server().handle_line("   \r"), None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let response = reply("{not json");
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);
    }

    #[test]
    fn non_request_json_is_invalid() {
        let response = reply(r#"{"jsonrpc":"2.0","id":4,"method":17}"#);
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], json!(4));
        assert_eq!(reply("[1,2]")["error"]["code"], -32600);
    }

    #[test]
    fn client_responses_are_ignored() {
        assert_eq!(
            server().handle_line(r#"{"jsonrpc":"2.0","id":9,"result":{}}"#),
            None
        );
    }

    #[test]
    fn wrong_jsonrpc_version_is_invalid() {
        let response = reply(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#);
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], json!(1));
        assert_eq!(
            server().handle_line(r#"{"jsonrpc":"1.0","method":"notifications/initialized"}"#),
            None
        );
    }

    #[test]
    fn undecodable_line_does_not_end_the_session() {
        let ping = br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let mut input = Vec::new();
        input.extend_from_slice(ping);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(ping);
        input.push(b'\n');
        let mut output = Vec::new();
        server().serve(input.as_slice(), &mut output).unwrap();
        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["result"], json!({}));
        assert_eq!(replies[1]["error"]["code"], -32700);
        assert_eq!(replies[1]["id"], Value::Null);
        assert_eq!(replies[2]["result"], json!({}));
    }

    #[test]
    fn serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["id"], json!(2));
        assert_eq!(second["result"]["tools"].as_array().unwrap().len(), 10);
    }
}
