/*!
A Model Context Protocol (MCP) server for the 2Do task manager.

twodo_mcp lets an AI agent create and navigate tasks in [2Do](https://www.2doapp.com/)
on macOS. 2Do has no API; what it does have is an x-callback-url scheme. Every tool
call therefore becomes exactly one `twodo3://x-callback-url/...` URL, handed to the OS
with `open`.

# Overview

Ten tools are exposed, one per 2Do action:

| Tool | URL action |
|---|---|
| `twodo_add_task` | `add` |
| `twodo_add_multiple_tasks` | `add-multiple-tasks` |
| `twodo_paste_tasks` | `paste-tasks` |
| `twodo_get_task_id` | `get-task-id` |
| `twodo_show_list` | `show-list` |
| `twodo_show_today`, `twodo_show_starred`, `twodo_show_scheduled`, `twodo_show_all` | `show-today`, ... |
| `twodo_search` | `search` |

2Do never answers. A successful result means the OS accepted the URL, not that
the task exists.

# Key Features

- **No async runtime**: one synchronous process spawn per call
- **Typed actions**: each URL comes from an [`action::Action`] variant, so malformed
  combinations cannot be built
- **Strict encoding**: every value is percent-encoded; only RFC 3986 unreserved
  characters appear literally
- **Swappable dispatch**: the [`dispatch::Dispatcher`] trait lets tests record URLs
  instead of opening them

# Quick Start

## Building a URL

```
use twodo_mcp::action::{Action, ShowList};

let action = Action::ShowList(ShowList { list_name: "Work".to_string() });
assert_eq!(action.to_url().as_str(), "twodo3://x-callback-url/show-list?list=Work");
```

## Serving MCP

```no_run
use std::sync::Arc;
use twodo_mcp::dispatch::OpenCommand;
use twodo_mcp::mcp::tools::ToolRegistry;
use twodo_mcp::stdio::Server;

let server = Server::new(ToolRegistry::twodo(Arc::new(OpenCommand::system())));
server.run().expect("stdio transport failed");
```

## Calling a tool directly

```
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use serde_json::json;
use twodo_mcp::dispatch::Dispatcher;
use twodo_mcp::mcp::tools::{ToolCallParams, ToolRegistry};
use twodo_mcp::url::EncodedUrl;

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Dispatcher for Recorder {
    fn open(&self, url: &EncodedUrl) -> Result<(), twodo_mcp::Error> {
        self.0.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

let recorder = Arc::new(Recorder::default());
let registry = ToolRegistry::twodo(recorder.clone());
let arguments: HashMap<_, _> = [("text".to_string(), json!("tags:work"))].into();
let response = registry
    .call(ToolCallParams::new("twodo_search".to_string(), arguments))
    .unwrap();
assert!(!response.is_error());
assert_eq!(
    *recorder.0.lock().unwrap(),
    ["twodo3://x-callback-url/search?text=tags%3Awork"]
);
```

# Errors

Tool failures are reported inside a successful JSON-RPC response with `isError: true`,
so the agent sees them. The text reads `<Kind>: <message>` and `structuredContent`
carries `{"kind", "message"}`, where kind is one of `MissingParameter`,
`InvalidParameterValue` or `DispatchFailed` (see [`Error`]). Nothing is retried:
resending an `add` URL would create a second task.

# Logging

Diagnostics go through logwise and end up on stderr. Stdout is reserved for
protocol messages.

# Module Organization

- [`action`] - the ten 2Do actions and their URLs
- [`url`] - percent-encoding URL builder
- [`params`] - typed access to tool-call arguments
- [`dispatch`] - handing URLs to the OS
- [`jrpc`] - JSON-RPC 2.0 types
- [`mcp`] - MCP methods and the tool registry
- [`stdio`] - line-delimited stdio transport
- [`config`] - command-line and environment settings for the binary

*/
pub mod action;
pub mod config;
pub mod dispatch;
mod error;
pub mod jrpc;
pub mod mcp;
pub mod params;
pub mod stdio;
pub mod url;

pub use error::Error;
