//! Actions that only move 2Do's window to a list or a search.

use super::require;
use crate::error::Error;
use crate::params::Arguments;
use crate::url::UrlBuilder;

/// Opens a named list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowList {
    pub list_name: String,
}

impl ShowList {
    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        // `name` is an older spelling some clients still send.
        let list_name = match args.text("list_name")? {
            Some(name) => name,
            None => args.text("name")?.ok_or_else(|| Error::missing("list_name"))?,
        };
        Ok(ShowList { list_name })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        require("list_name", &self.list_name)
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder.param("list", &self.list_name)
    }

    pub(crate) fn confirmation(&self) -> String {
        format!("Showing list \"{}\" in 2Do.", self.list_name)
    }
}

/// Runs a search in the app.
///
/// The query supports 2Do's filter syntax (`tags:work`, `type:overdue`, ...).
/// Results are only shown on screen; nothing comes back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub text: String,
}

impl Search {
    pub(crate) fn from_arguments(args: &Arguments) -> Result<Self, Error> {
        Ok(Search {
            text: args.required_text("text")?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        require("text", &self.text)
    }

    pub(crate) fn url(&self, builder: UrlBuilder) -> UrlBuilder {
        builder.param("text", &self.text)
    }

    pub(crate) fn confirmation(&self) -> String {
        format!(
            "Searching 2Do for \"{}\". Results are displayed in the 2Do app.",
            self.text
        )
    }
}
