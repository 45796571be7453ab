//! Typed option and argument declarations plus the switch parser behind
//! tack tasks.
//!
//! # Example
//!
//! ```rust
//! use tack_options::{ArgumentDef, OptionDef, Options, Shorthand, Value};
//!
//! let table = Options::new(
//!     vec![
//!         OptionDef::parse(["force", "-f"], false).unwrap(),
//!         OptionDef::parse("count", Shorthand::tag("numeric")).unwrap(),
//!     ],
//!     vec![ArgumentDef::builder("name").build().unwrap()],
//! );
//!
//! let matches = table.parse(["app", "-f", "--count", "3"]).unwrap();
//! assert_eq!(matches.argument("name"), Some(&Value::from("app")));
//! assert_eq!(matches.get("force"), Some(&Value::Bool(true)));
//! assert_eq!(matches.get("count"), Some(&Value::Integer(3)));
//! ```

mod argument;
mod error;
mod option;
mod parser;
mod switches;
pub mod token;
mod value;

pub use argument::{ArgumentBuilder, ArgumentDef};
pub use error::{ConfigurationError, ErrorKind, ParseError};
pub use option::{OptionBuilder, OptionDef, OptionKey, OptionType, Shorthand, dasherize};
pub use parser::{Matches, Options};
pub use switches::{SplitError, split_switches, to_switches};
pub use value::Value;
