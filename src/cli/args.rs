//! Command-line argument parsing for chatstream.

use thiserror::Error;

use crate::config::{parse_timeout, ConfigError};

/// Usage text printed by `--help`
pub const USAGE: &str = "\
Usage: chatstream [OPTIONS] <MESSAGE>...

Send a message to the chat backend and print the streamed answer.

Options:
      --api-base <URL>   Backend base URL (env: CHATSTREAM_API_BASE)
      --timeout <SECS>   Connect and idle timeout in seconds (env: CHATSTREAM_TIMEOUT_SECS)
  -h, --help             Print help
  -V, --version          Print version";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Send a message and stream the answer
    Chat {
        message: String,
        api_base: Option<String>,
        timeout_secs: Option<u64>,
    },
}

/// Invalid command-line arguments.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("no message given")]
    MissingMessage,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win wherever they appear. Everything that is not
/// an option is joined with spaces into the message; `--` ends option
/// parsing.
///
/// # Examples
///
/// ```
/// use chatstream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatstream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, CliError>
where
    I: Iterator<Item = String>,
{
    let mut words: Vec<String> = Vec::new();
    let mut api_base = None;
    let mut timeout_secs = None;
    let mut options_done = false;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        if options_done {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--" => options_done = true,
            "--api-base" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                api_base = Some(value);
            }
            "--timeout" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                timeout_secs = Some(parse_timeout(&arg, &value)?);
            }
            other if other.starts_with("--api-base=") => {
                api_base = Some(other["--api-base=".len()..].to_string());
            }
            other if other.starts_with("--timeout=") => {
                let value = &other["--timeout=".len()..];
                timeout_secs = Some(parse_timeout("--timeout", value)?);
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            other => words.push(other.to_string()),
        }
    }

    let message = words.join(" ");
    if message.trim().is_empty() {
        return Err(CliError::MissingMessage);
    }

    Ok(CliCommand::Chat {
        message,
        api_base,
        timeout_secs,
    })
}
