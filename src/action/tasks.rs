//! Actions that create tasks or look them up.

use super::{MAX_BATCH_TASKS, check_entries, check_title, require};
use crate::error::Error;
use crate::params::{Arguments, Choice, Priority, RepeatInterval, TaskType};
use crate::url::{LINE_SEPARATOR, TAG_SEPARATOR, TASK_SEPARATOR, UrlBuilder};

/// Creates one task, project or checklist.
///
/// Only `task` is required. Defaults (`TaskType::Task`, `Priority::None`,
/// flags off) are left out of the URL so 2Do applies its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTask {
    pub task: String,
    pub task_type: TaskType,
    pub for_list: Option<String>,
    pub note: Option<String>,
    /// Subtask titles; a task with subtasks becomes a checklist.
    pub subtasks: Vec<String>,
    pub priority: Priority,
    pub starred: bool,
    pub tags: Vec<String>,
    /// `YYYY-MM-DD` or a day offset (`0` today, `1` tomorrow). Passed through.
    pub due: Option<String>,
    /// `HH:MM`, 24-hour.
    pub due_time: Option<String>,
    pub start: Option<String>,
    pub repeat: Option<RepeatInterval>,
    /// A 2Do action such as `url:https://…`, `call:+1234` or `mail:a@b.c`.
    pub action: Option<String>,
    pub for_parent_name: Option<String>,
    /// The 32-character UID of the parent task.
    pub for_parent_task: Option<String>,
    pub ignore_defaults: bool,
    /// Ask 2Do to copy the new task's UID to the clipboard.
    pub save_in_clipboard: bool,
}

impl AddTask {
    /// A plain task in the default list, with 2Do's defaults for everything else.
    pub fn new(task: impl Into<String>) -> Self {
        AddTask {
            task: task.into(),
            task_type: TaskType::Task,
            for_list: None,
            note: None,
            subtasks: Vec::new(),
            priority: Priority::None,
            starred: false,
            tags: Vec::new(),
            due: None,
            due_time: None,
            start: None,
            repeat: None,
            action: None,
            for_parent_name: None,
            for_parent_task: None,
            ignore_defaults: false,
            save_in_clipboard: true,
        }
    }

    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        Ok(AddTask {
            task: args.required_text("task")?,
            task_type: args.choice("task_type")?.unwrap_or_default(),
            for_list: args.text("for_list")?,
            note: args.text("note")?,
            subtasks: args.list("subtasks", LINE_SEPARATOR)?,
            priority: args.choice("priority")?.unwrap_or_default(),
            starred: args.flag("starred", false)?,
            tags: args.list("tags", TAG_SEPARATOR)?,
            due: args.text("due")?,
            due_time: args.text("due_time")?,
            start: args.text("start")?,
            repeat: args.choice("repeat")?,
            action: args.text("action")?,
            for_parent_name: args.text("for_parent_name")?,
            for_parent_task: args.text("for_parent_task")?,
            ignore_defaults: args.flag("ignore_defaults", false)?,
            save_in_clipboard: args.flag("save_in_clipboard", true)?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        require("task", &self.task)?;
        check_title("task", &self.task)?;
        check_entries("subtasks", &self.subtasks, LINE_SEPARATOR)?;
        check_entries("tags", &self.tags, TAG_SEPARATOR)
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder
            .param("text", &self.task)
            .param_opt("list", self.for_list.as_deref())
            .param_opt(
                "type",
                (self.task_type != TaskType::Task).then(|| self.task_type.code()),
            )
            .param_opt("note", self.note.as_deref())
            .joined("subtasks", &self.subtasks, LINE_SEPARATOR)
            .param_opt(
                "priority",
                (self.priority != Priority::None).then(|| self.priority.code()),
            )
            .flag("starred", self.starred)
            .joined("tags", &self.tags, TAG_SEPARATOR)
            .param_opt("due", self.due.as_deref())
            .param_opt("dueTime", self.due_time.as_deref())
            .param_opt("start", self.start.as_deref())
            .param_opt("repeat", self.repeat.map(RepeatInterval::code))
            .param_opt("action", self.action.as_deref())
            .param_opt("forParentName", self.for_parent_name.as_deref())
            .param_opt("forParentTask", self.for_parent_task.as_deref())
            .flag("ignoreDefaults", self.ignore_defaults)
            .flag("saveInClipboard", self.save_in_clipboard)
    }

    pub(crate) fn confirmation(&self) -> String {
        let noun = match self.task_type {
            TaskType::Task => "task",
            TaskType::Project => "project",
            TaskType::Checklist => "checklist",
        };
        let list = self.for_list.as_deref().unwrap_or("default");
        let mut line = format!("Sent {noun} \"{}\" to 2Do (list: {list}).", self.task);
        if self.save_in_clipboard {
            line.push_str(" 2Do copies the new UID to the clipboard.");
        }
        line
    }
}

/// Creates several tasks that share one list, priority, tag set and due date.
///
/// All titles travel in a single URL, joined with [`TASK_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMultipleTasks {
    pub tasks: Vec<String>,
    pub for_list: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub due: Option<String>,
}

impl AddMultipleTasks {
    pub fn new(tasks: Vec<String>) -> Self {
        AddMultipleTasks {
            tasks,
            for_list: None,
            priority: Priority::None,
            tags: Vec::new(),
            due: None,
        }
    }

    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        Ok(AddMultipleTasks {
            tasks: args.list("tasks", TASK_SEPARATOR)?,
            for_list: args.text("for_list")?,
            priority: args.choice("priority")?.unwrap_or_default(),
            tags: args.list("tags", TAG_SEPARATOR)?,
            due: args.text("due")?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.tasks.is_empty() {
            return Err(Error::missing("tasks"));
        }
        if self.tasks.len() > MAX_BATCH_TASKS {
            return Err(Error::invalid(
                "tasks",
                format!(
                    "{} titles exceeds the limit of {MAX_BATCH_TASKS}",
                    self.tasks.len()
                ),
            ));
        }
        check_entries("tasks", &self.tasks, TASK_SEPARATOR)?;
        for title in &self.tasks {
            check_title("tasks", title)?;
        }
        check_entries("tags", &self.tags, TAG_SEPARATOR)
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder
            .joined("text", &self.tasks, TASK_SEPARATOR)
            .param_opt("list", self.for_list.as_deref())
            .param_opt(
                "priority",
                (self.priority != Priority::None).then(|| self.priority.code()),
            )
            .joined("tags", &self.tags, TAG_SEPARATOR)
            .param_opt("due", self.due.as_deref())
    }

    pub(crate) fn confirmation(&self) -> String {
        let list = self.for_list.as_deref().unwrap_or("default");
        match self.tasks.len() {
            1 => format!("Sent 1 task to 2Do (list: {list})."),
            n => format!("Sent {n} tasks to 2Do (list: {list})."),
        }
    }
}

/// Pastes lines of text into an existing project, one subtask per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteTasks {
    pub lines: Vec<String>,
    pub in_project: String,
    pub for_list: String,
}

impl PasteTasks {
    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        let lines = args.list("text", LINE_SEPARATOR)?;
        if lines.is_empty() {
            return Err(Error::missing("text"));
        }
        Ok(PasteTasks {
            lines,
            in_project: args.required_text("in_project")?,
            for_list: args.required_text("for_list")?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.subtask_count() == 0 {
            return Err(Error::missing("text"));
        }
        require("in_project", &self.in_project)?;
        require("for_list", &self.for_list)
    }

    /// Non-blank lines, which is what 2Do turns into subtasks.
    pub fn subtask_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|entry| entry.lines())
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder
            .joined("text", &self.lines, LINE_SEPARATOR)
            .param("project", &self.in_project)
            .param("list", &self.for_list)
    }

    pub(crate) fn confirmation(&self) -> String {
        format!(
            "Pasted {} subtask(s) into project \"{}\" (list: {}).",
            self.subtask_count(),
            self.in_project,
            self.for_list
        )
    }
}

/// Asks 2Do to copy a task's UID to the clipboard.
///
/// The title must match exactly, including case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTaskId {
    pub task: String,
    pub for_list: String,
}

impl GetTaskId {
    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        Ok(GetTaskId {
            task: args.required_text("task")?,
            for_list: args.required_text("for_list")?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        require("task", &self.task)?;
        require("for_list", &self.for_list)
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder
            .param("text", &self.task)
            .param("list", &self.for_list)
            .flag("saveInClipboard", true)
    }

    pub(crate) fn confirmation(&self) -> String {
        format!(
            "Asked 2Do for the UID of \"{}\" in list \"{}\". 2Do copies it to the clipboard if the task exists.",
            self.task, self.for_list
        )
    }
}
