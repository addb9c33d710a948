//! Configuration lookup, parsing and validation.
//!
//! Settings are populated from a layered property store:
//!  * a properties file (`-c`), if any;
//!  * the process environment;
//!  * trailing `key=value` command-line tokens.
//!
//! Later layers override earlier ones.

mod cli;
mod consumer;
mod settings;

pub use self::cli::CliOptions;
pub use self::settings::AppSettings;
