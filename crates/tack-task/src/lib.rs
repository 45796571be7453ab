//! Task declarations, help rendering and dispatch for tack.
//!
//! # Example
//!
//! ```rust
//! use tack_options::OptionDef;
//! use tack_task::{Invocation, Outcome, Task, TaskMeta, TaskSet, meta};
//!
//! struct Hello;
//!
//! impl Task for Hello {
//!     fn meta(&self) -> TaskMeta {
//!         meta("hello")
//!             .summary("Say hello")
//!             .option(OptionDef::parse("loud", false).unwrap())
//!             .build()
//!     }
//!
//!     fn run(&self, invocation: &Invocation) -> anyhow::Result<()> {
//!         let greeting = if invocation.matches.is_present("loud") { "HELLO!" } else { "Hello!" };
//!         println!("{greeting}");
//!         Ok(())
//!     }
//! }
//!
//! let mut tasks = TaskSet::new();
//! tasks.register(Hello).unwrap();
//! assert_eq!(tasks.dispatch(["hello", "--loud"]).unwrap(), Outcome::Ran("hello".into()));
//! ```

pub mod help;
mod meta;
mod set;

pub use meta::{MetaBuilder, TaskMeta, meta};
pub use set::{DispatchError, Invocation, Outcome, Task, TaskSet};
