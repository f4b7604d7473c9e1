//! Command-line and environment configuration for the server binary.
//!
//! The only setting is the program that opens URLs.

use crate::dispatch::DEFAULT_OPEN_COMMAND;

/// Environment variable naming the program that opens URLs.
pub const OPEN_COMMAND_ENV: &str = "TWODO_MCP_OPEN_COMMAND";

/// Settings for a serving process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program run as `<open_command> <url>` for every dispatch.
    pub open_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            open_command: DEFAULT_OPEN_COMMAND.to_string(),
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Serve(Config),
    Help,
    Version,
}

/// A command line that cannot be acted on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error("'{0}' needs a value")]
    MissingValue(&'static str),
    #[error("'{0}' must not be empty")]
    EmptyValue(&'static str),
}

impl Invocation {
    /// Parses arguments (without the program name) and consults `env` for
    /// variables. A flag wins over the environment.
    ///
    /// ```
    /// use twodo_mcp::config::{Invocation, Config};
    ///
    /// let args = ["--open-command", "/usr/bin/open"].map(String::from);
    /// let invocation = Invocation::parse(args, |_| None).unwrap();
    /// assert_eq!(
    ///     invocation,
    ///     Invocation::Serve(Config { open_command: "/usr/bin/open".to_string() })
    /// );
    /// ```
    pub fn parse<I, F>(args: I, env: F) -> Result<Invocation, Error>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut open_command = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "-V" | "--version" => return Ok(Invocation::Version),
                "--open-command" => {
                    let value = args.next().ok_or(Error::MissingValue("--open-command"))?;
                    open_command = Some(non_empty(value, "--open-command")?);
                }
                other => match other.strip_prefix("--open-command=") {
                    Some(value) => {
                        open_command = Some(non_empty(value.to_string(), "--open-command")?);
                    }
                    None => return Err(Error::UnknownArgument(other.to_string())),
                },
            }
        }
        let open_command = match open_command {
            Some(program) => program,
            None => env(OPEN_COMMAND_ENV)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OPEN_COMMAND.to_string()),
        };
        Ok(Invocation::Serve(Config { open_command }))
    }

    /// Parses the real process arguments and environment.
    pub fn from_env() -> Result<Invocation, Error> {
        Invocation::parse(std::env::args().skip(1), |name| std::env::var(name).ok())
    }
}

fn non_empty(value: String, flag: &'static str) -> Result<String, Error> {
    if value.trim().is_empty() {
        Err(Error::EmptyValue(flag))
    } else {
        Ok(value)
    }
}

/// Usage text for `--help`.
pub fn usage() -> String {
    format!(
        "twodo_mcp {version}
MCP server for the 2Do task manager, speaking JSON-RPC on stdin/stdout.

USAGE:
    twodo_mcp [OPTIONS]

OPTIONS:
    --open-command <PROGRAM>  Program that opens twodo3:// URLs [env: {OPEN_COMMAND_ENV}] [default: {DEFAULT_OPEN_COMMAND}]
    -h, --help                Print this help
    -V, --version             Print the version
",
        version = env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: Option<&str>) -> Result<Invocation, Error> {
        let env = env.map(str::to_string);
        Invocation::parse(args.iter().map(|a| a.to_string()), move |name| {
            assert_eq!(name, OPEN_COMMAND_ENV);
            env.clone()
        })
    }

    #[test]
    fn defaults_to_open() {
        assert_eq!(parse(&[], None), Ok(Invocation::Serve(Config::default())));
        assert_eq!(Config::default().open_command, "open");
    }

    #[test]
    fn flag_wins_over_environment() {
        let serve = |program: &str| -> Result<Invocation, Error> {
            Ok(Invocation::Serve(Config {
                open_command: program.to_string(),
            }))
        };
        assert_eq!(parse(&[], Some("xdg-open")), serve("xdg-open"));
        assert_eq!(parse(&["--open-command", "echo"], Some("xdg-open")), serve("echo"));
        assert_eq!(parse(&["--open-command=echo"], None), serve("echo"));
        assert_eq!(parse(&[], Some("  ")), serve("open"));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["-h"], None), Ok(Invocation::Help));
        assert_eq!(parse(&["--version"], None), Ok(Invocation::Version));
        assert!(usage().contains("--open-command"));
    }

    #[test]
    fn bad_arguments() {
        assert_eq!(
            parse(&["--verbose"], None),
            Err(Error::UnknownArgument("--verbose".to_string()))
        );
        assert_eq!(
            parse(&["--open-command"], None),
            Err(Error::MissingValue("--open-command"))
        );
        assert_eq!(
            parse(&["--open-command", ""], None),
            Err(Error::EmptyValue("--open-command"))
        );
    }
}
