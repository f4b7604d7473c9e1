//! The ten 2Do tools.
//!
//! Every tool is an [`ActionTool`]: it checks the argument names against its
//! parameter table, builds the [`Action`](crate::action::Action) for its kind
//! and hands it to the shared [`Dispatcher`].

use crate::action::ActionKind;
use crate::dispatch::{Dispatcher, perform};
use crate::error::Error;
use crate::mcp::tools::{
    Argument, InputSchema, Tool, ToolAnnotations, ToolCallError, ToolCallResponse,
};
use crate::params::Arguments;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum ParamType {
    Text,
    Flag,
    /// A string split on a separator, or an array of strings.
    TextOrList,
    List,
    Code(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct Param {
    name: &'static str,
    ty: ParamType,
    description: &'static str,
    required: bool,
}

const fn required(name: &'static str, ty: ParamType, description: &'static str) -> Param {
    Param {
        name,
        ty,
        description,
        required: true,
    }
}

const fn optional(name: &'static str, ty: ParamType, description: &'static str) -> Param {
    Param {
        name,
        ty,
        description,
        required: false,
    }
}

const PRIORITY_CODES: &[&str] = &["0", "1", "2", "3"];

const ADD_TASK: &[Param] = &[
    required("task", ParamType::Text, "Title of the task (at most 500 characters)"),
    optional(
        "task_type",
        ParamType::Code(&["0", "1", "2"]),
        "Type: '0'=Task (default), '1'=Project, '2'=Checklist",
    ),
    optional(
        "for_list",
        ParamType::Text,
        "Name of the 2Do list to add to (case-insensitive). Omit for the default list.",
    ),
    optional("note", ParamType::Text, "Notes for the task"),
    optional(
        "subtasks",
        ParamType::TextOrList,
        "Subtask titles, as an array or newline-separated text. Makes the task a checklist.",
    ),
    optional(
        "priority",
        ParamType::Code(PRIORITY_CODES),
        "Priority: '0'=None (default), '1'=Low, '2'=Medium, '3'=High",
    ),
    optional("starred", ParamType::Flag, "Star the task"),
    optional(
        "tags",
        ParamType::TextOrList,
        "Tag names, as an array or comma-separated text (e.g. 'work,urgent')",
    ),
    optional(
        "due",
        ParamType::Text,
        "Due date as 'YYYY-MM-DD' or days from today (0=today, 1=tomorrow)",
    ),
    optional(
        "due_time",
        ParamType::Text,
        "Due time in 24-hour 'HH:MM' format (e.g. '14:30'). Needs 'due'.",
    ),
    optional(
        "start",
        ParamType::Text,
        "Start date/time as 'YYYY-MM-DD HH:MM' or days from today",
    ),
    optional(
        "repeat",
        ParamType::Code(&["1", "2", "3", "4"]),
        "Repeat: '1'=Daily, '2'=Weekly, '3'=Bi-weekly, '4'=Monthly",
    ),
    optional(
        "action",
        ParamType::Text,
        "Action for the task (e.g. 'url:https://...', 'call:+1234', 'mail:user@example.com')",
    ),
    optional(
        "for_parent_name",
        ParamType::Text,
        "Title of the parent project to nest under. Needs 'for_list'.",
    ),
    optional(
        "for_parent_task",
        ParamType::Text,
        "UID (32 characters) of the parent task to nest under",
    ),
    optional(
        "ignore_defaults",
        ParamType::Flag,
        "Ignore 2Do's default due date and time for new tasks",
    ),
    optional(
        "save_in_clipboard",
        ParamType::Flag,
        "Have 2Do copy the new task's UID to the clipboard (default true)",
    ),
];

const ADD_MULTIPLE_TASKS: &[Param] = &[
    required("tasks", ParamType::List, "Task titles to create (1 to 50)"),
    optional("for_list", ParamType::Text, "List to add all tasks to"),
    optional(
        "priority",
        ParamType::Code(PRIORITY_CODES),
        "Priority for all tasks: '0'=None, '1'=Low, '2'=Medium, '3'=High",
    ),
    optional(
        "tags",
        ParamType::TextOrList,
        "Tags for all tasks, as an array or comma-separated text",
    ),
    optional(
        "due",
        ParamType::Text,
        "Due date for all tasks ('YYYY-MM-DD' or days from today)",
    ),
];

const PASTE_TASKS: &[Param] = &[
    required(
        "text",
        ParamType::TextOrList,
        "Multiline text, or an array of lines; each non-empty line becomes a subtask",
    ),
    required("in_project", ParamType::Text, "Title of the project to paste into"),
    required("for_list", ParamType::Text, "Name of the list containing the project"),
];

const GET_TASK_ID: &[Param] = &[
    required("task", ParamType::Text, "Exact task title (case-sensitive)"),
    required("for_list", ParamType::Text, "Name of the list containing the task"),
];

// `name` is accepted by the parser as an alias but not advertised.
const SHOW_LIST: &[Param] = &[required("list_name", ParamType::Text, "Name of the list to show")];

const SEARCH: &[Param] = &[required(
    "text",
    ParamType::Text,
    "Search query. Supports 2Do syntax such as 'type:overdue', 'tags:work' and '(clipboard)'",
)];

fn params(kind: ActionKind) -> &'static [Param] {
    match kind {
        ActionKind::AddTask => ADD_TASK,
        ActionKind::AddMultipleTasks => ADD_MULTIPLE_TASKS,
        ActionKind::PasteTasks => PASTE_TASKS,
        ActionKind::GetTaskId => GET_TASK_ID,
        ActionKind::ShowList => SHOW_LIST,
        ActionKind::Search => SEARCH,
        ActionKind::ShowToday
        | ActionKind::ShowStarred
        | ActionKind::ShowScheduled
        | ActionKind::ShowAll => &[],
    }
}

/// Names accepted by [`Arguments::new`] for `kind`.
fn accepted_names(kind: ActionKind) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = params(kind).iter().map(|p| p.name).collect();
    if kind == ActionKind::ShowList {
        names.push("name");
    }
    names
}

fn title(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::AddTask => "Add Task to 2Do",
        ActionKind::AddMultipleTasks => "Add Multiple Tasks to 2Do",
        ActionKind::PasteTasks => "Paste Text as Subtasks",
        ActionKind::GetTaskId => "Get Task UID",
        ActionKind::ShowList => "Show List",
        ActionKind::ShowToday => "Show Today View",
        ActionKind::ShowStarred => "Show Starred View",
        ActionKind::ShowScheduled => "Show Scheduled View",
        ActionKind::ShowAll => "Show All View",
        ActionKind::Search => "Search 2Do",
    }
}

fn description(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::AddTask => {
            "Create a task, project or checklist in the 2Do app. By default 2Do copies the \
             new task's UID to the clipboard. 2Do sends nothing back, so success means the \
             URL was handed to the app."
        }
        ActionKind::AddMultipleTasks => {
            "Create up to 50 tasks in 2Do in one call, sharing list, priority, tags and due date."
        }
        ActionKind::PasteTasks => {
            "Paste multiline text into an existing 2Do project. Each non-empty line becomes a subtask."
        }
        ActionKind::GetTaskId => {
            "Ask 2Do to copy the 32-character UID of a task (found by exact title and list) \
             to the clipboard. Use it as 'for_parent_task' when adding subtasks."
        }
        ActionKind::ShowList => "Switch the 2Do app to the named list.",
        ActionKind::ShowToday => "Switch the 2Do app to the Today view.",
        ActionKind::ShowStarred => "Switch the 2Do app to the Starred view.",
        ActionKind::ShowScheduled => "Switch the 2Do app to the Scheduled view.",
        ActionKind::ShowAll => "Switch the 2Do app to the All view.",
        ActionKind::Search => {
            "Run a search in the 2Do app. Results are displayed in the app, not returned."
        }
    }
}

fn annotations(kind: ActionKind) -> ToolAnnotations {
    let creates = matches!(
        kind,
        ActionKind::AddTask | ActionKind::AddMultipleTasks | ActionKind::PasteTasks
    );
    ToolAnnotations {
        read_only_hint: !creates,
        destructive_hint: false,
        idempotent_hint: !creates,
        open_world_hint: false,
    }
}

fn argument(param: &Param) -> Argument {
    let description = param.description.to_string();
    let name = param.name.to_string();
    match param.ty {
        ParamType::Text => Argument::new(name, "string".to_string(), description, param.required),
        ParamType::Flag => Argument::new(name, "boolean".to_string(), description, param.required),
        ParamType::TextOrList => {
            Argument::new(name, "string".to_string(), description, param.required)
                .one_of_types(&["string", "array"])
                .items("string")
        }
        ParamType::List => Argument::new(name, "array".to_string(), description, param.required)
            .items("string"),
        ParamType::Code(codes) => {
            Argument::new(name, "string".to_string(), description, param.required)
                .allowed(codes.iter().copied())
        }
    }
}

/// Exposes one [`ActionKind`] as an MCP tool.
pub struct ActionTool {
    kind: ActionKind,
    dispatcher: Arc<dyn Dispatcher>,
}

impl ActionTool {
    pub fn new(kind: ActionKind, dispatcher: Arc<dyn Dispatcher>) -> Self {
        ActionTool { kind, dispatcher }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    fn run(&self, values: HashMap<String, Value>) -> Result<String, Error> {
        let args = Arguments::new(values, &accepted_names(self.kind))?;
        let action = self.kind.parse(&args)?;
        perform(&action, self.dispatcher.as_ref())
    }
}

impl Tool for ActionTool {
    fn name(&self) -> &str {
        self.kind.tool_name()
    }

    fn title(&self) -> &str {
        title(self.kind)
    }

    fn description(&self) -> &str {
        description(self.kind)
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(params(self.kind).iter().map(argument))
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(annotations(self.kind))
    }

    fn call(&self, params: HashMap<String, Value>) -> Result<ToolCallResponse, ToolCallError> {
        match self.run(params) {
            Ok(confirmation) => Ok(ToolCallResponse::new(vec![confirmation.into()])),
            Err(e) => {
                logwise::warn_sync!(
                    "{tool} failed: {e}",
                    tool = logwise::privacy::LogIt(&self.kind.tool_name()),
                    e = logwise::privacy::LogIt(&e)
                );
                Err(into_tool_error(&e))
            }
        }
    }
}

fn into_tool_error(e: &Error) -> ToolCallError {
    let message = e.to_string();
    ToolCallError::new(vec![format!("{}: {message}", e.kind()).into()])
        .with_structured(json!({"kind": e.kind(), "message": message}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::EncodedUrl;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Spy {
        urls: Mutex<Vec<String>>,
    }

    impl Dispatcher for Spy {
        fn open(&self, url: &EncodedUrl) -> Result<(), Error> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn call(kind: ActionKind, spy: &Arc<Spy>, args: Value) -> Result<ToolCallResponse, ToolCallError> {
        let tool = ActionTool::new(kind, spy.clone());
        tool.call(serde_json::from_value(args).unwrap())
    }

    #[test]
    fn schemas_declare_every_parsed_parameter() {
        for kind in ActionKind::ALL {
            let tool = ActionTool::new(kind, Arc::new(Spy::default()));
            let schema = tool.input_schema();
            let mut declared: Vec<&str> = schema.property_names().collect();
            declared.sort();
            let mut expected: Vec<&str> = params(kind).iter().map(|p| p.name).collect();
            expected.sort();
            assert_eq!(declared, expected, "{}", kind.tool_name());
        }
    }

    #[test]
    fn required_lists_match_the_wire_table() {
        let spy = Arc::new(Spy::default());
        let required = |kind| {
            let schema = ActionTool::new(kind, spy.clone()).input_schema();
            schema.required().to_vec()
        };
        assert_eq!(required(ActionKind::AddTask), ["task"]);
        assert_eq!(required(ActionKind::AddMultipleTasks), ["tasks"]);
        assert_eq!(required(ActionKind::PasteTasks), ["text", "in_project", "for_list"]);
        assert_eq!(required(ActionKind::GetTaskId), ["task", "for_list"]);
        assert_eq!(required(ActionKind::ShowList), ["list_name"]);
        assert_eq!(required(ActionKind::Search), ["text"]);
        assert!(required(ActionKind::ShowToday).is_empty());
    }

    #[test]
    fn successful_call_dispatches_once() {
        let spy = Arc::new(Spy::default());
        let response = call(
            ActionKind::AddTask,
            &spy,
            json!({"task": "Buy milk", "for_list": "Shopping", "due": "1"}),
        )
        .unwrap();
        assert!(!response.is_error());
        assert_eq!(
            response.content()[0].as_str(),
            Some("Sent task \"Buy milk\" to 2Do (list: Shopping). 2Do copies the new UID to the clipboard.")
        );
        let urls = spy.urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("text=Buy%20milk&list=Shopping&due=1"));
    }

    #[test]
    fn failures_carry_kind_and_message() {
        let spy = Arc::new(Spy::default());
        let err = call(ActionKind::AddTask, &spy, json!({"task": "x", "priority": "9"}))
            .unwrap_err()
            .into_response();
        assert!(err.is_error());
        let structured = err.structured_content().unwrap();
        assert_eq!(structured["kind"], "InvalidParameterValue");
        assert!(
            err.content()[0]
                .as_str()
                .unwrap()
                .starts_with("InvalidParameterValue: invalid value for parameter 'priority'")
        );
        assert!(spy.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn unknown_parameters_are_rejected() {
        let spy = Arc::new(Spy::default());
        let err = call(ActionKind::ShowToday, &spy, json!({"list": "Work"}))
            .unwrap_err()
            .into_response();
        assert_eq!(err.structured_content().unwrap()["kind"], "InvalidParameterValue");
        assert!(spy.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn show_list_alias_is_accepted() {
        let spy = Arc::new(Spy::default());
        call(ActionKind::ShowList, &spy, json!({"name": "Work"})).unwrap();
        assert_eq!(
            *spy.urls.lock().unwrap(),
            ["twodo3://x-callback-url/show-list?list=Work"]
        );
    }

    #[test]
    fn annotations_follow_side_effects() {
        assert!(!annotations(ActionKind::AddTask).read_only_hint);
        assert!(!annotations(ActionKind::AddMultipleTasks).idempotent_hint);
        assert!(annotations(ActionKind::GetTaskId).read_only_hint);
        assert!(annotations(ActionKind::Search).idempotent_hint);
        assert!(ActionKind::ALL.iter().all(|k| !annotations(*k).destructive_hint));
    }
}
