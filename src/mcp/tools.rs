//! Tool registration and invocation for the Model Context Protocol.
//!
//! A [`ToolRegistry`] is built once at startup and never changes afterwards, so
//! `tools/list` always reports the same set and the server advertises
//! `listChanged: false`.
//!
//! # Implementing a tool
//!
//! ```
//! use twodo_mcp::mcp::tools::{
//!     Argument, InputSchema, Tool, ToolCallError, ToolCallResponse, ToolRegistry,
//! };
//! use std::collections::HashMap;
//!
//! struct Echo;
//!
//! impl Tool for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Echoes back the input message"
//!     }
//!
//!     fn input_schema(&self) -> InputSchema {
//!         InputSchema::new(vec![Argument::new(
//!             "message".to_string(),
//!             "string".to_string(),
//!             "Message to echo".to_string(),
//!             true,
//!         )])
//!     }
//!
//!     fn call(
//!         &self,
//!         params: HashMap<String, serde_json::Value>,
//!     ) -> Result<ToolCallResponse, ToolCallError> {
//!         let message = params
//!             .get("message")
//!             .and_then(|v| v.as_str())
//!             .ok_or_else(|| ToolCallError::new(vec!["Missing message".into()]))?;
//!         Ok(ToolCallResponse::new(vec![format!("Echo: {message}").into()]))
//!     }
//! }
//!
//! let registry = ToolRegistry::new(vec![Box::new(Echo)]);
//! assert_eq!(registry.list().len(), 1);
//! ```

use crate::dispatch::Dispatcher;
use crate::jrpc::{Error, Request, Response};
use crate::mcp::actions::ActionTool;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A function that can be invoked through `tools/call`.
///
/// Tools must be `Send + Sync` so the registry can be shared.
pub trait Tool: Send + Sync {
    /// The unique name used in `tools/call`.
    fn name(&self) -> &str;

    /// A short display name. Defaults to [`name`](Self::name).
    fn title(&self) -> &str {
        self.name()
    }

    /// What the tool does, shown to agents choosing a tool.
    fn description(&self) -> &str;

    /// The parameters the tool accepts.
    fn input_schema(&self) -> InputSchema;

    /// Behavioural hints for clients. None by default.
    fn annotations(&self) -> Option<ToolAnnotations> {
        None
    }

    /// Executes the tool.
    ///
    /// `Err` is still a successful JSON-RPC exchange; it becomes a result with
    /// `isError: true`.
    fn call(&self, params: HashMap<String, Value>) -> Result<ToolCallResponse, ToolCallError>;
}

/// An immutable, ordered set of tools.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        ToolRegistry { tools }
    }

    /// The ten 2Do tools, all dispatching through `dispatcher`.
    pub fn twodo(dispatcher: Arc<dyn Dispatcher>) -> Self {
        ToolRegistry::new(
            crate::action::ActionKind::ALL
                .into_iter()
                .map(|kind| Box::new(ActionTool::new(kind, dispatcher.clone())) as Box<dyn Tool>)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// Metadata for every tool, in registration order.
    pub fn list(&self) -> ToolList {
        ToolList {
            tools: self
                .tools
                .iter()
                .map(|tool| ToolInfo::from_tool(tool.as_ref()))
                .collect(),
        }
    }

    /// Looks the tool up by name and runs it.
    ///
    /// An unknown name is a protocol error; a failing tool is not.
    pub fn call(&self, params: ToolCallParams) -> Result<ToolCallResponse, Error> {
        let tool = self
            .get(&params.name)
            .ok_or_else(|| Error::unknown_tool(params.name.clone()))?;
        match tool.call(params.arguments) {
            Ok(response) => Ok(response),
            Err(err) => Ok(err.into_response()),
        }
    }
}

/// The result of `tools/list`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolList {
    pub(crate) tools: Vec<ToolInfo>,
}

impl ToolList {
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|info| info.name.as_str())
    }
}

/// Metadata describing one tool.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ToolInfo {
    name: String,
    title: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: InputSchema,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    annotations: Option<ToolAnnotations>,
}

impl ToolInfo {
    pub(crate) fn from_tool(tool: &dyn Tool) -> Self {
        ToolInfo {
            name: tool.name().to_string(),
            title: tool.title().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
            annotations: tool.annotations(),
        }
    }
}

/// MCP tool annotations.
///
/// These are hints only; clients must not rely on them for safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    pub open_world_hint: bool,
}

/// JSON Schema for a tool's parameters.
///
/// Always an object schema that forbids additional properties.
///
/// ```
/// use twodo_mcp::mcp::tools::{Argument, InputSchema};
///
/// let schema = InputSchema::new(vec![
///     Argument::new("text".to_string(), "string".to_string(), "Input text".to_string(), true),
///     Argument::new("count".to_string(), "integer".to_string(), "Optional count".to_string(), false),
/// ]);
/// assert_eq!(schema.required(), ["text"]);
/// let json = serde_json::to_value(&schema).unwrap();
/// assert_eq!(json["additionalProperties"], false);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    r#type: String,
    properties: Map<String, Value>,
    required: Vec<String>,
    #[serde(rename = "additionalProperties")]
    additional_properties: bool,
}

impl InputSchema {
    /// Builds the schema. Properties are keyed by name and serialize sorted by
    /// name; `required` keeps the order given.
    pub fn new<A: IntoIterator<Item = Argument>>(arguments: A) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for argument in arguments {
            let mut inner = Map::new();
            if let Some(r#type) = argument.r#type {
                inner.insert("type".to_string(), r#type.into());
            }
            inner.insert("description".to_string(), argument.description.into());
            if !argument.allowed.is_empty() {
                inner.insert("enum".to_string(), argument.allowed.into());
            }
            if let Some(items) = argument.items {
                inner.insert("items".to_string(), serde_json::json!({ "type": items }));
            }
            if argument.required {
                required.push(argument.name.clone());
            }
            properties.insert(argument.name, Value::Object(inner));
        }
        InputSchema {
            r#type: "object".to_string(),
            properties,
            required,
            additional_properties: false,
        }
    }

    /// Names of the declared parameters.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

/// One parameter of a tool.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    r#type: Option<Value>,
    description: String,
    required: bool,
    allowed: Vec<Value>,
    items: Option<String>,
}

impl Argument {
    /// A parameter with a single JSON type such as `"string"` or `"boolean"`.
    pub fn new(name: String, r#type: String, description: String, required: bool) -> Self {
        Argument {
            name,
            r#type: Some(Value::String(r#type)),
            description,
            required,
            allowed: Vec::new(),
            items: None,
        }
    }

    /// Accepts any of several JSON types, e.g. `["string", "array"]`.
    pub fn one_of_types(mut self, types: &[&str]) -> Self {
        self.r#type = Some(Value::from(types.to_vec()));
        self
    }

    /// Restricts the value to a closed set.
    pub fn allowed<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the element type of an array parameter.
    pub fn items(mut self, r#type: &str) -> Self {
        self.items = Some(r#type.to_string());
        self
    }
}

/// The `params` of a `tools/call` request.
#[derive(Debug, Deserialize, Clone)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: HashMap<String, Value>,
}

impl ToolCallParams {
    pub fn new(name: String, arguments: HashMap<String, Value>) -> Self {
        ToolCallParams { name, arguments }
    }
}

/// The result of `tools/call`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub(crate) content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none", default)]
    pub(crate) structured_content: Option<Value>,
    #[serde(rename = "isError", default)]
    pub(crate) is_error: bool,
}

impl ToolCallResponse {
    /// A successful response.
    ///
    /// ```
    /// use twodo_mcp::mcp::tools::ToolCallResponse;
    ///
    /// let response = ToolCallResponse::new(vec!["Task sent".into()]);
    /// let json = serde_json::to_value(&response).unwrap();
    /// assert_eq!(json["content"][0]["text"], "Task sent");
    /// assert_eq!(json["isError"], false);
    /// ```
    pub fn new(content: Vec<ToolContent>) -> Self {
        ToolCallResponse {
            content,
            structured_content: None,
            is_error: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn content(&self) -> &[ToolContent] {
        &self.content
    }

    pub fn structured_content(&self) -> Option<&Value> {
        self.structured_content.as_ref()
    }
}

/// A failed tool invocation, reported as `isError: true`.
#[derive(Debug, Serialize)]
pub struct ToolCallError {
    content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    structured_content: Option<Value>,
    #[serde(rename = "isError")]
    is_error: bool,
}

impl ToolCallError {
    pub fn new(content: Vec<ToolContent>) -> Self {
        ToolCallError {
            content,
            structured_content: None,
            is_error: true,
        }
    }

    /// Attaches machine-readable details alongside the text.
    pub fn with_structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    pub(crate) fn into_response(self) -> ToolCallResponse {
        ToolCallResponse {
            content: self.content,
            structured_content: self.structured_content,
            is_error: true,
        }
    }
}

/// Content returned by a tool. Only text is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ToolContent {
    Text(String),
}

impl ToolContent {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolContent::Text(text) => Some(text),
        }
    }
}

impl Serialize for ToolContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        match self {
            ToolContent::Text(text) => {
                let mut s = serializer.serialize_struct("ToolContent", 2)?;
                s.serialize_field("type", "text")?;
                s.serialize_field("text", text)?;
                s.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ToolContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de;
        struct ToolContentVisitor;

        impl<'de> Visitor<'de> for ToolContentVisitor {
            type Value = ToolContent;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a content object with type and text")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut content_type: Option<String> = None;
                let mut text: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "type" => {
                            if content_type.is_some() {
                                return Err(de::Error::duplicate_field("type"));
                            }
                            content_type = Some(map.next_value()?);
                        }
                        "text" => {
                            if text.is_some() {
                                return Err(de::Error::duplicate_field("text"));
                            }
                            text = Some(map.next_value()?);
                        }
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                match content_type.as_deref() {
                    Some("text") => {
                        let text = text.ok_or_else(|| de::Error::missing_field("text"))?;
                        Ok(ToolContent::Text(text))
                    }
                    Some(other) => Err(de::Error::unknown_variant(other, &["text"])),
                    None => Err(de::Error::missing_field("type")),
                }
            }
        }

        deserializer.deserialize_map(ToolContentVisitor)
    }
}

impl From<String> for ToolContent {
    fn from(value: String) -> Self {
        ToolContent::Text(value)
    }
}

impl From<&str> for ToolContent {
    fn from(value: &str) -> Self {
        ToolContent::Text(value.to_string())
    }
}

/// Handles `tools/list`.
pub(crate) fn list(request: Request, registry: &ToolRegistry) -> Response<ToolList> {
    Response::new(registry.list(), request.id)
}

/// Handles `tools/call`.
pub(crate) fn call(request: Request, registry: &ToolRegistry) -> Response<ToolCallResponse> {
    let params = match request.params {
        Some(params) => match serde_json::from_value::<ToolCallParams>(params) {
            Ok(params) => params,
            Err(err) => return Response::err(Error::invalid_params(err.to_string()), request.id),
        },
        None => {
            return Response::err(
                Error::invalid_params("No parameters provided".to_string()),
                request.id,
            );
        }
    };
    logwise::info_sync!("tools/call {name}", name = logwise::privacy::LogIt(&params.name));
    match registry.call(params) {
        Ok(r) => Response::new(r, request.id),
        Err(e) => Response::err(e, request.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn input_schema(&self) -> InputSchema {
            InputSchema::new(vec![])
        }
        fn call(&self, _: HashMap<String, Value>) -> Result<ToolCallResponse, ToolCallError> {
            Err(ToolCallError::new(vec!["nope".into()]).with_structured(json!({"kind": "Test"})))
        }
    }

    #[test]
    fn failing_tool_is_a_result_not_a_protocol_error() {
        let registry = ToolRegistry::new(vec![Box::new(Failing)]);
        let response = registry
            .call(ToolCallParams::new("failing".to_string(), HashMap::new()))
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isError"], true);
        assert_eq!(json["content"][0], json!({"type": "text", "text": "nope"}));
        assert_eq!(json["structuredContent"]["kind"], "Test");
    }

    #[test]
    fn unknown_tool_is_invalid_params() {
        let registry = ToolRegistry::new(vec![Box::new(Failing)]);
        let err = registry
            .call(ToolCallParams::new("missing".to_string(), HashMap::new()))
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn schema_keeps_enums_and_items() {
        let schema = InputSchema::new(vec![
            Argument::new("p".to_string(), "integer".to_string(), "Priority".to_string(), false)
                .allowed([0, 1, 2, 3]),
            Argument::new("tags".to_string(), "array".to_string(), "Tags".to_string(), false)
                .one_of_types(&["string", "array"])
                .items("string"),
        ]);
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["p"]["enum"], json!([0, 1, 2, 3]));
        assert_eq!(json["properties"]["tags"]["type"], json!(["string", "array"]));
        assert_eq!(json["properties"]["tags"]["items"], json!({"type": "string"}));
        assert!(json["required"].as_array().unwrap().is_empty());
    }

    #[test]
    fn properties_sort_by_name() {
        let schema = InputSchema::new(vec![
            Argument::new("task".to_string(), "string".to_string(), "Title".to_string(), true),
            Argument::new("due".to_string(), "string".to_string(), "Due".to_string(), false),
            Argument::new("action".to_string(), "string".to_string(), "Action".to_string(), true),
        ]);
        let names: Vec<&str> = schema.property_names().collect();
        assert_eq!(names, ["action", "due", "task"]);
        assert_eq!(schema.required(), ["task", "action"]);
    }

    #[test]
    fn tool_content_round_trips() {
        let content: ToolContent = serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
        assert_eq!(content.as_str(), Some("hi"));
        assert!(serde_json::from_value::<ToolContent>(json!({"type": "image"})).is_err());
    }
}
