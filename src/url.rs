//! Construction of 2Do action URLs.
//!
//! 2Do registers the `twodo3` scheme with the OS and follows the x-callback-url
//! convention: every operation is a URL of the form
//!
//! ```text
//! twodo3://x-callback-url/<action>?<key>=<value>&...
//! ```
//!
//! [`UrlBuilder`] assembles the query in the order parameters are added and
//! percent-encodes every key and value, leaving only the RFC 3986 unreserved
//! characters (`A-Z a-z 0-9 - . _ ~`) literal. Multi-valued parameters are joined
//! with one of the separator constants below *before* encoding, so a tag list
//! `["work", "urgent"]` travels as `tags=work%2Curgent`.
//!
//! # Examples
//!
//! ```
//! use twodo_mcp::url::UrlBuilder;
//!
//! let url = UrlBuilder::new("search").param("text", "tags:work & home").build();
//! assert_eq!(
//!     url.as_str(),
//!     "twodo3://x-callback-url/search?text=tags%3Awork%20%26%20home"
//! );
//! assert_eq!(url.action(), "search");
//! assert_eq!(url.query_value("text").as_deref(), Some("tags:work & home"));
//! ```

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// The URL scheme 2Do registers with the OS.
pub const SCHEME: &str = "twodo3";

/// The authority component shared by every x-callback-url.
pub const HOST: &str = "x-callback-url";

/// Joins the entries of a tag list.
pub const TAG_SEPARATOR: &str = ",";

/// Joins pasted lines and subtask titles; 2Do makes one task per line.
pub const LINE_SEPARATOR: &str = "\n";

/// Joins the titles sent in a single add-multiple-tasks URL.
pub const TASK_SEPARATOR: &str = "\n";

/// A fully encoded 2Do action URL.
///
/// Only [`UrlBuilder::build`] creates these, so every value is well formed and
/// immutable. It is produced once per tool call and dropped after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedUrl(String);

impl EncodedUrl {
    /// The URL as a string slice, ready to hand to the OS.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The action path segment, e.g. `show-list`.
    pub fn action(&self) -> &str {
        self.0
            .split_once("://")
            .and_then(|(_, rest)| rest.split_once('/'))
            .map(|(_, path)| path.split_once('?').map_or(path, |(action, _)| action))
            .unwrap_or("")
    }

    /// The raw (still encoded) query string, if the URL has one.
    pub fn query(&self) -> Option<&str> {
        self.0.split_once('?').map(|(_, query)| query)
    }

    /// Decodes the query into key/value pairs, in emission order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query() else {
            return Vec::new();
        };
        query
            .split('&')
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect()
    }

    /// The decoded value of the first pair named `key`.
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| component.to_string())
}

impl Display for EncodedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<EncodedUrl> for String {
    fn from(url: EncodedUrl) -> Self {
        url.0
    }
}

/// Ordered builder for an [`EncodedUrl`].
///
/// Values are stored decoded and encoded only in [`build`](Self::build), so the
/// same sequence of calls always yields byte-identical output.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    action: &'static str,
    query: Vec<(&'static str, String)>,
}

impl UrlBuilder {
    /// Starts a URL for the given action path.
    pub fn new(action: &'static str) -> Self {
        UrlBuilder {
            action,
            query: Vec::new(),
        }
    }

    /// Appends `key=value`.
    pub fn param(mut self, key: &'static str, value: &str) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Appends `key=value` when a value is present.
    pub fn param_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Appends `key=1` when `set` is true; 2Do treats a missing flag as off.
    pub fn flag(self, key: &'static str, set: bool) -> Self {
        if set { self.param(key, "1") } else { self }
    }

    /// Appends the values joined with `separator`, or nothing for an empty slice.
    ///
    /// ```
    /// use twodo_mcp::url::{UrlBuilder, TAG_SEPARATOR};
    ///
    /// let tags = vec!["work".to_string(), "urgent".to_string()];
    /// let url = UrlBuilder::new("add").joined("tags", &tags, TAG_SEPARATOR).build();
    /// assert_eq!(url.query_value("tags").as_deref(), Some("work,urgent"));
    /// ```
    pub fn joined(self, key: &'static str, values: &[String], separator: &str) -> Self {
        if values.is_empty() {
            self
        } else {
            self.param(key, &values.join(separator))
        }
    }

    /// Percent-encodes every pair and assembles the final URL.
    pub fn build(self) -> EncodedUrl {
        let mut url = format!("{SCHEME}://{HOST}/{}", self.action);
        for (index, (key, value)) in self.query.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        EncodedUrl(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every byte after the authority must be unreserved, a delimiter we emit,
    /// or part of a `%XX` escape.
    fn assert_rfc3986(url: &EncodedUrl) {
        let tail = url.as_str().strip_prefix("twodo3://x-callback-url/").unwrap();
        let bytes = tail.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'%' {
                assert!(bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit(), "{url}");
                i += 3;
                continue;
            }
            assert!(
                b.is_ascii_alphanumeric() || b"-._~?=&".contains(&b),
                "unexpected byte {:?} in {url}",
                b as char
            );
            i += 1;
        }
    }

    #[test]
    fn url_without_parameters_has_no_query() {
        let url = UrlBuilder::new("show-today").build();
        assert_eq!(url.as_str(), "twodo3://x-callback-url/show-today");
        assert_eq!(url.action(), "show-today");
        assert_eq!(url.query(), None);
        assert!(url.query_pairs().is_empty());
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let nasty = "a b&c?d#e/f=g+h%i:j";
        let url = UrlBuilder::new("search").param("text", nasty).build();
        assert_rfc3986(&url);
        let query = url.query().unwrap();
        for c in [' ', '#', '/', '+', ':'] {
            assert!(!query.contains(c), "literal {c:?} in {query}");
        }
        assert_eq!(query.matches('&').count(), 0);
        assert_eq!(query.matches('?').count(), 0);
        assert_eq!(url.query_value("text").as_deref(), Some(nasty));
    }

    #[test]
    fn non_ascii_is_escaped_as_utf8() {
        let url = UrlBuilder::new("add").param("text", "Café ☕").build();
        assert!(url.as_str().is_ascii());
        assert!(url.as_str().ends_with("text=Caf%C3%A9%20%E2%98%95"));
        assert_rfc3986(&url);
    }

    #[test]
    fn newline_separator_is_escaped() {
        let lines = vec!["Milk".to_string(), "Bread".to_string()];
        let url = UrlBuilder::new("paste-tasks")
            .joined("text", &lines, LINE_SEPARATOR)
            .build();
        assert_eq!(url.query(), Some("text=Milk%0ABread"));
        assert_eq!(url.query_value("text").as_deref(), Some("Milk\nBread"));
    }

    #[test]
    fn pairs_keep_insertion_order() {
        let url = UrlBuilder::new("add")
            .param("text", "Buy milk")
            .param_opt("list", Some("Shopping"))
            .param_opt("note", None)
            .flag("starred", false)
            .param("due", "1")
            .flag("saveInClipboard", true)
            .build();
        assert_eq!(
            url.query(),
            Some("text=Buy%20milk&list=Shopping&due=1&saveInClipboard=1")
        );
    }

    #[test]
    fn empty_join_is_omitted() {
        let url = UrlBuilder::new("add").joined("tags", &[], TAG_SEPARATOR).build();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn building_is_deterministic() {
        let builder = UrlBuilder::new("add").param("text", "Zahnarzt über Mittag");
        assert_eq!(builder.clone().build(), builder.build());
    }
}
