use std::fmt;

use msgfmt::ConstructKind;

/// Errors raised while formatting a message.
///
/// Malformed templates never fail; only an argument that a `plural` or
/// `selectordinal` construct cannot read as an integer does.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The argument's value has no integer reading.
    NotAnInteger {
        argument: String,
        value: String,
        kind: ConstructKind,
    },
    /// No value was supplied for a numeric construct's argument.
    MissingArgument {
        argument: String,
        kind: ConstructKind,
    },
}

impl FormatError {
    pub fn argument(&self) -> &str {
        match self {
            FormatError::NotAnInteger { argument, .. } => argument,
            FormatError::MissingArgument { argument, .. } => argument,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::NotAnInteger {
                argument,
                value,
                kind,
            } => write!(
                f,
                "cannot convert argument '{}' value {:?} to an integer for {} construct",
                argument, value, kind
            ),
            FormatError::MissingArgument { argument, kind } => {
                write!(f, "missing argument '{}' for {} construct", argument, kind)
            }
        }
    }
}

impl std::error::Error for FormatError {}
