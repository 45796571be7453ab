use thiserror::Error;

/// A malformed option or argument declaration.
///
/// Raised while building declarations, never while parsing input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{kind} name can't be empty")]
    EmptyName { kind: &'static str },

    #[error("{kind} '{name}' cannot be required and have a default value")]
    RequiredWithDefault { kind: &'static str, name: String },

    #[error("type '{ty}' is not valid for {kind}s (declared on '{name}')")]
    InvalidType {
        kind: &'static str,
        name: String,
        ty: String,
    },

    #[error("default for '{name}' must be a {expected} value; got {found}")]
    DefaultTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequiredArgumentMissing,
    MalformattedArgument,
    UnknownArgument,
}

/// Failure of a single `parse` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Required switches or arguments never supplied.
    #[error("missing required {}: {}", noun(.names, "argument"), quoted(.names))]
    Missing { names: Vec<String> },

    /// A value-taking switch at the very end of the input.
    #[error("no value provided for option '{switch}'")]
    NoValue { switch: String },

    /// A value-taking switch followed by another switch.
    #[error("no value provided for option '{switch}'; got switch '{found}'")]
    SwitchInsteadOfValue { switch: String, found: String },

    #[error("expected numeric value for '{name}'; got {value:?}")]
    NotNumeric { name: String, value: String },

    #[error("expected '{name}' to be one of {}; got {value}", .possible.join(", "))]
    NotPossibleValue {
        name: String,
        value: String,
        possible: Vec<String>,
    },

    /// Undeclared switches, reported only when unknown checking is on.
    #[error("unknown {}: {}", noun(.switches, "switch"), quoted(.switches))]
    Unknown { switches: Vec<String> },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Missing { .. } | Self::NoValue { .. } => ErrorKind::RequiredArgumentMissing,
            Self::SwitchInsteadOfValue { .. }
            | Self::NotNumeric { .. }
            | Self::NotPossibleValue { .. } => ErrorKind::MalformattedArgument,
            Self::Unknown { .. } => ErrorKind::UnknownArgument,
        }
    }
}

fn noun(items: &[String], singular: &str) -> String {
    match (items.len(), singular) {
        (1, _) => singular.to_string(),
        (_, "switch") => "switches".to_string(),
        _ => format!("{singular}s"),
    }
}

fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
