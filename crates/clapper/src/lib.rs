//! getopt(3)-style argument resolution against a declared schema.
//!
//! Declare commands, positional arguments and flags on a [`Registry`], then
//! hand it the raw argument vector (program name excluded). The result is a
//! [`CommandParsed`] in which every declared flag and argument has a value,
//! or exactly one [`Error`]. Rendering errors is left to the caller.
//!
//! ```
//! use clapper::Registry;
//!
//! let mut registry = Registry::new();
//! let (info, _) = registry.register("info");
//! info.add_arg_with_valid("category", "manager", ["manager", "student"]);
//! info.add_arg("subjects...", "");
//! info.add_flag("verbose", "v", true, "");
//! info.add_flag("output", "o", false, "./");
//! info.add_flag("no-clean", "", true, "");
//!
//! let parsed = registry
//!     .parse(&["info", "student", "math", "physics", "-v", "--no-clean"])
//!     .unwrap();
//! assert_eq!(parsed.name(), "info");
//! assert_eq!(parsed.arg_value("subjects"), Some("math,physics"));
//! assert_eq!(parsed.flag_value("verbose"), Some("true"));
//! assert_eq!(parsed.flag_value("output"), Some("./"));
//! assert_eq!(parsed.flag_value("clean"), Some("false"));
//! ```

mod error;
mod parsed;
mod registry;
mod resolver;
mod schema;
pub mod token;

pub use error::{Error, Result};
pub use parsed::{CommandParsed, ParsedArg, ParsedFlag};
pub use registry::{ROOT, Registry};
pub use schema::{
    ArgDef, CommandConfig, FlagDef, INVERTED_FLAG_PREFIX, VARIADIC_SUFFIX, ValidValues,
};
