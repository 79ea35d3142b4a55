//! CLI module for chatstream.
//!
//! Argument parsing, version display, and a stdout renderer for streamed
//! answers.
//!
//! ```ignore
//! use chatstream::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => println!("{}", version_line()),
//!     CliCommand::Help => println!("{}", USAGE),
//!     CliCommand::Chat { message, .. } => { /* stream it */ }
//! }
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, CliCommand, CliError, USAGE};
pub use output::TerminalCallbacks;
pub use version::{version_line, VERSION};
