//! The ten operations 2Do accepts, modelled as a sum type.
//!
//! Each [`Action`] variant carries a statically typed record of its own
//! parameters, so combinations the app cannot express are unrepresentable. An
//! action derives exactly one [`EncodedUrl`]; nothing else about it is
//! observable, because 2Do sends nothing back.
//!
//! # Examples
//!
//! ```
//! use twodo_mcp::action::{Action, AddTask};
//!
//! let mut task = AddTask::new("Buy milk");
//! task.for_list = Some("Shopping".to_string());
//! task.due = Some("1".to_string());
//! let action = Action::AddTask(task);
//!
//! let url = action.to_url();
//! assert_eq!(url.action(), "add");
//! assert!(url.as_str().contains("text=Buy%20milk&list=Shopping&due=1"));
//! ```

mod navigation;
mod tasks;

pub use navigation::{Search, ShowList};
pub use tasks::{AddMultipleTasks, AddTask, GetTaskId, PasteTasks};

use crate::error::Error;
use crate::params::Arguments;
use crate::url::{EncodedUrl, UrlBuilder};

/// Longest task title 2Do is asked to store, in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// Most titles accepted by one add-multiple-tasks call.
pub const MAX_BATCH_TASKS: usize = 50;

/// One requested 2Do operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTask(AddTask),
    AddMultipleTasks(AddMultipleTasks),
    PasteTasks(PasteTasks),
    GetTaskId(GetTaskId),
    ShowList(ShowList),
    ShowToday,
    ShowStarred,
    ShowScheduled,
    ShowAll,
    Search(Search),
}

/// The discriminant of an [`Action`], used to name tools and URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddTask,
    AddMultipleTasks,
    PasteTasks,
    GetTaskId,
    ShowList,
    ShowToday,
    ShowStarred,
    ShowScheduled,
    ShowAll,
    Search,
}

impl ActionKind {
    /// Every kind, in the order tools are listed.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::AddTask,
        ActionKind::AddMultipleTasks,
        ActionKind::PasteTasks,
        ActionKind::GetTaskId,
        ActionKind::ShowList,
        ActionKind::ShowToday,
        ActionKind::ShowStarred,
        ActionKind::ShowScheduled,
        ActionKind::ShowAll,
        ActionKind::Search,
    ];

    /// The URL path segment after `x-callback-url/`.
    pub fn path(self) -> &'static str {
        match self {
            ActionKind::AddTask => "add",
            ActionKind::AddMultipleTasks => "add-multiple-tasks",
            ActionKind::PasteTasks => "paste-tasks",
            ActionKind::GetTaskId => "get-task-id",
            ActionKind::ShowList => "show-list",
            ActionKind::ShowToday => "show-today",
            ActionKind::ShowStarred => "show-starred",
            ActionKind::ShowScheduled => "show-scheduled",
            ActionKind::ShowAll => "show-all",
            ActionKind::Search => "search",
        }
    }

    /// The MCP tool name exposing this action.
    pub fn tool_name(self) -> &'static str {
        match self {
            ActionKind::AddTask => "twodo_add_task",
            ActionKind::AddMultipleTasks => "twodo_add_multiple_tasks",
            ActionKind::PasteTasks => "twodo_paste_tasks",
            ActionKind::GetTaskId => "twodo_get_task_id",
            ActionKind::ShowList => "twodo_show_list",
            ActionKind::ShowToday => "twodo_show_today",
            ActionKind::ShowStarred => "twodo_show_starred",
            ActionKind::ShowScheduled => "twodo_show_scheduled",
            ActionKind::ShowAll => "twodo_show_all",
            ActionKind::Search => "twodo_search",
        }
    }

    /// Looks a kind up by its tool name.
    pub fn from_tool_name(name: &str) -> Option<ActionKind> {
        ActionKind::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }

    /// Reads this kind's parameters out of a tool call and validates them.
    pub fn parse(self, args: &Arguments) -> Result<Action, Error> {
        let action = match self {
            ActionKind::AddTask => Action::AddTask(AddTask::from_arguments(args)?),
            ActionKind::AddMultipleTasks => {
                Action::AddMultipleTasks(AddMultipleTasks::from_arguments(args)?)
            }
            ActionKind::PasteTasks => Action::PasteTasks(PasteTasks::from_arguments(args)?),
            ActionKind::GetTaskId => Action::GetTaskId(GetTaskId::from_arguments(args)?),
            ActionKind::ShowList => Action::ShowList(ShowList::from_arguments(args)?),
            ActionKind::ShowToday => Action::ShowToday,
            ActionKind::ShowStarred => Action::ShowStarred,
            ActionKind::ShowScheduled => Action::ShowScheduled,
            ActionKind::ShowAll => Action::ShowAll,
            ActionKind::Search => Action::Search(Search::from_arguments(args)?),
        };
        action.validate()?;
        Ok(action)
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddTask(_) => ActionKind::AddTask,
            Action::AddMultipleTasks(_) => ActionKind::AddMultipleTasks,
            Action::PasteTasks(_) => ActionKind::PasteTasks,
            Action::GetTaskId(_) => ActionKind::GetTaskId,
            Action::ShowList(_) => ActionKind::ShowList,
            Action::ShowToday => ActionKind::ShowToday,
            Action::ShowStarred => ActionKind::ShowStarred,
            Action::ShowScheduled => ActionKind::ShowScheduled,
            Action::ShowAll => ActionKind::ShowAll,
            Action::Search(_) => ActionKind::Search,
        }
    }

    /// Checks the invariants the type system does not: required strings are
    /// non-empty, titles fit, lists hold no blank entries.
    ///
    /// Records built through [`ActionKind::parse`] already pass; records built
    /// by hand are checked again before dispatch.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Action::AddTask(a) => a.validate(),
            Action::AddMultipleTasks(a) => a.validate(),
            Action::PasteTasks(a) => a.validate(),
            Action::GetTaskId(a) => a.validate(),
            Action::ShowList(a) => a.validate(),
            Action::Search(a) => a.validate(),
            Action::ShowToday | Action::ShowStarred | Action::ShowScheduled | Action::ShowAll => {
                Ok(())
            }
        }
    }

    /// Derives the action URL. Pure: equal actions give byte-identical URLs.
    pub fn to_url(&self) -> EncodedUrl {
        let builder = UrlBuilder::new(self.kind().path());
        let builder = match self {
            Action::AddTask(a) => a.url(builder),
            Action::AddMultipleTasks(a) => a.url(builder),
            Action::PasteTasks(a) => a.url(builder),
            Action::GetTaskId(a) => a.url(builder),
            Action::ShowList(a) => a.url(builder),
            Action::Search(a) => a.url(builder),
            Action::ShowToday | Action::ShowStarred | Action::ShowScheduled | Action::ShowAll => {
                builder
            }
        };
        builder.build()
    }

    /// The line reported back to the caller once the OS accepted the URL.
    ///
    /// It describes what was *sent*; 2Do never reports what it did.
    pub fn confirmation(&self) -> String {
        match self {
            Action::AddTask(a) => a.confirmation(),
            Action::AddMultipleTasks(a) => a.confirmation(),
            Action::PasteTasks(a) => a.confirmation(),
            Action::GetTaskId(a) => a.confirmation(),
            Action::ShowList(a) => a.confirmation(),
            Action::Search(a) => a.confirmation(),
            Action::ShowToday => "Showing the Today view in 2Do.".to_string(),
            Action::ShowStarred => "Showing the Starred view in 2Do.".to_string(),
            Action::ShowScheduled => "Showing the Scheduled view in 2Do.".to_string(),
            Action::ShowAll => "Showing the All view in 2Do.".to_string(),
        }
    }
}

/// Fails with `MissingParameter` when `value` is blank.
pub(crate) fn require(name: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::missing(name))
    } else {
        Ok(())
    }
}

/// Fails with `InvalidParameterValue` when a title is too long.
pub(crate) fn check_title(name: &str, title: &str) -> Result<(), Error> {
    let chars = title.chars().count();
    if chars > MAX_TITLE_CHARS {
        Err(Error::invalid(
            name,
            format!("{chars} characters exceeds the limit of {MAX_TITLE_CHARS}"),
        ))
    } else {
        Ok(())
    }
}

/// Fails with `InvalidParameterValue` when a list holds a blank entry, or an
/// entry containing `separator`, which 2Do would read as several entries.
pub(crate) fn check_entries(name: &str, entries: &[String], separator: &str) -> Result<(), Error> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(Error::invalid(name, format!("entry {index} is empty")));
        }
        if entry.contains(separator) {
            return Err(Error::invalid(
                name,
                format!("entry {index} contains the separator {separator:?}"),
            ));
        }
    }
    Ok(())
}
