//! Hands action URLs to the operating system.
//!
//! On macOS, `open <url>` passes a `twodo3://` URL to whichever app registered
//! the scheme. The exit status only says whether the OS accepted the URL; 2Do
//! itself never answers. [`Dispatcher`] is the seam tests replace with a spy.

use crate::action::Action;
use crate::error::Error;
use crate::url::EncodedUrl;
use std::io::ErrorKind;
use std::process::{Command, Stdio};

/// The program used when nothing else is configured.
pub const DEFAULT_OPEN_COMMAND: &str = "open";

/// Something that can deliver an [`EncodedUrl`] to 2Do.
///
/// Implementations perform exactly one delivery attempt per call and never
/// retry.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use twodo_mcp::dispatch::{Dispatcher, perform};
/// use twodo_mcp::action::Action;
/// use twodo_mcp::url::EncodedUrl;
///
/// #[derive(Default)]
/// struct Spy(Mutex<Vec<String>>);
///
/// impl Dispatcher for Spy {
///     fn open(&self, url: &EncodedUrl) -> Result<(), twodo_mcp::Error> {
///         self.0.lock().unwrap().push(url.to_string());
///         Ok(())
///     }
/// }
///
/// let spy = Spy::default();
/// let confirmation = perform(&Action::ShowToday, &spy).unwrap();
/// assert_eq!(confirmation, "Showing the Today view in 2Do.");
/// assert_eq!(*spy.0.lock().unwrap(), ["twodo3://x-callback-url/show-today"]);
/// ```
pub trait Dispatcher: Send + Sync {
    fn open(&self, url: &EncodedUrl) -> Result<(), Error>;
}

/// Runs an external program with the URL as its only argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCommand {
    program: String,
}

impl OpenCommand {
    pub fn new(program: impl Into<String>) -> Self {
        OpenCommand {
            program: program.into(),
        }
    }

    /// The platform's default URL handler, `open`.
    pub fn system() -> Self {
        OpenCommand::new(DEFAULT_OPEN_COMMAND)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for OpenCommand {
    fn default() -> Self {
        OpenCommand::system()
    }
}

impl Dispatcher for OpenCommand {
    fn open(&self, url: &EncodedUrl) -> Result<(), Error> {
        let output = Command::new(&self.program)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::DispatchFailed(format!(
                    "'{}' command not found; 2Do URLs can only be opened on macOS",
                    self.program
                )),
                _ => Error::DispatchFailed(format!("failed to run '{}': {e}", self.program)),
            })?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("'{}' exited with {}", self.program, output.status)
        } else {
            format!("'{}' exited with {}: {stderr}", self.program, output.status)
        };
        Err(Error::DispatchFailed(message))
    }
}

/// Validates `action`, dispatches its URL once, and returns the confirmation.
///
/// Nothing is dispatched when validation fails.
pub fn perform(action: &Action, dispatcher: &dyn Dispatcher) -> Result<String, Error> {
    action.validate()?;
    let url = action.to_url();
    logwise::info_sync!(
        "dispatching {action} url",
        action = logwise::privacy::LogIt(&url.action())
    );
    match dispatcher.open(&url) {
        Ok(()) => Ok(action.confirmation()),
        Err(e) => {
            logwise::warn_sync!("dispatch failed: {e}", e = logwise::privacy::LogIt(&e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AddTask;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDispatcher {
        urls: Mutex<Vec<EncodedUrl>>,
    }

    impl Dispatcher for RecordingDispatcher {
        fn open(&self, url: &EncodedUrl) -> Result<(), Error> {
            self.urls.lock().unwrap().push(url.clone());
            Ok(())
        }
    }

    struct Refusing;

    impl Dispatcher for Refusing {
        fn open(&self, _url: &EncodedUrl) -> Result<(), Error> {
            Err(Error::DispatchFailed("no handler for twodo3".to_string()))
        }
    }

    #[test]
    fn invalid_actions_are_never_dispatched() {
        let spy = RecordingDispatcher::default();
        let err = perform(&Action::AddTask(AddTask::new("")), &spy).unwrap_err();
        assert_eq!(err, Error::missing("task"));
        assert!(spy.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn valid_actions_are_dispatched_once() {
        let spy = RecordingDispatcher::default();
        let mut task = AddTask::new("Buy milk");
        task.for_list = Some("Shopping".to_string());
        let confirmation = perform(&Action::AddTask(task), &spy).unwrap();
        assert!(confirmation.contains("Buy milk"));
        let urls = spy.urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].action(), "add");
    }

    #[test]
    fn dispatch_errors_pass_through() {
        let err = perform(&Action::ShowAll, &Refusing).unwrap_err();
        assert_eq!(err.kind(), "DispatchFailed");
        assert!(err.to_string().contains("no handler for twodo3"));
    }

    #[cfg(unix)]
    #[test]
    fn open_command_reports_exit_status() {
        let url = Action::ShowToday.to_url();
        assert!(OpenCommand::new("true").open(&url).is_ok());
        let err = OpenCommand::new("false").open(&url).unwrap_err();
        assert_eq!(err.kind(), "DispatchFailed");
        assert!(err.to_string().contains("'false' exited with"));
    }

    #[test]
    fn missing_program_is_a_dispatch_failure() {
        let url = Action::ShowToday.to_url();
        let err = OpenCommand::new("twodo-mcp-no-such-program")
            .open(&url)
            .unwrap_err();
        assert_eq!(err.kind(), "DispatchFailed");
        assert!(err.to_string().contains("not found"), "{err}");
    }

    #[test]
    fn default_is_open() {
        assert_eq!(OpenCommand::default().program(), "open");
    }
}
