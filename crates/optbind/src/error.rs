//! Error taxonomy for declaration, expansion and mapping.
//!
//! Definition errors are raised while a table is being built and mean the
//! declaration itself is wrong. Everything else is raised while mapping a
//! concrete argument list and means the user typed something we can't use.

use std::path::PathBuf;
use thiserror::Error;

/// A declaration could not be turned into an option table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Caller misuse: a required piece of a declaration was empty.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("invalid option flag '{flag}': {reason}")]
    InvalidFlag { flag: String, reason: &'static str },

    #[error("{descriptor} cannot be applied to field '{field}' of type {field_type}")]
    FieldTypeMismatch {
        field: String,
        descriptor: &'static str,
        field_type: String,
    },

    #[error("option '{flag}' is declared on both '{first}' and '{second}'")]
    DuplicateFlag {
        flag: String,
        first: String,
        second: String,
    },

    #[error("catch-all arguments declared on both '{first}' and '{second}'")]
    DuplicateCatchAll { first: String, second: String },

    #[error("field '{field}' carries more than one positional argument declaration")]
    DuplicateArgument { field: String },

    #[error("positional order {order} is used by both '{first}' and '{second}'")]
    DuplicateOrder {
        order: i32,
        first: String,
        second: String,
    },

    #[error("field '{0}' is declared twice")]
    DuplicateField(String),
}

/// A raw value could not be converted into the field's type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("value is out of range for {ty}")]
    Overflow { ty: &'static str },

    #[error("value is not a valid {ty}")]
    InvalidFormat { ty: &'static str },

    #[error("value is not a recognized boolean")]
    InvalidBooleanValue,
}

/// Response-file expansion failed. The expanded sequence is unusable.
#[derive(Debug, Error)]
pub enum ResponseFileError {
    #[error("response file '{}' has been processed more than once", .path.display())]
    Repeated { path: PathBuf },

    #[error("failed to read response file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mapping an argument list onto a container failed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in option '{token}'")]
    Syntax { token: String },

    #[error("unknown option: {token}")]
    UnknownOption { token: String },

    #[error("missing value for option: {option}")]
    MissingArgument { option: String },

    #[error("missing required argument: {name}")]
    MissingPositional { name: String },

    #[error("invalid value '{value}' for {option}: {source}")]
    Conversion {
        option: String,
        value: String,
        #[source]
        source: ConversionError,
    },

    #[error(transparent)]
    ResponseFile(#[from] ResponseFileError),
}

impl ParseError {
    /// True for the structural option family (bad spelling, unknown flag,
    /// missing value).
    pub fn is_option_error(&self) -> bool {
        matches!(
            self,
            ParseError::Syntax { .. }
                | ParseError::UnknownOption { .. }
                | ParseError::MissingArgument { .. }
        )
    }

    /// True when the user supplied a value the field could not hold.
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, ParseError::Conversion { .. })
    }

    pub fn conversion(&self) -> Option<&ConversionError> {
        match self {
            ParseError::Conversion { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Anything the one-shot [`crate::parse`] entry points can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<ResponseFileError> for Error {
    fn from(err: ResponseFileError) -> Self {
        Error::Parse(ParseError::ResponseFile(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_family_is_distinguishable() {
        let err = ParseError::UnknownOption { token: "-x".into() };
        assert!(err.is_option_error());
        assert!(!err.is_conversion_error());

        let err = ParseError::Conversion {
            option: "-i".into(),
            value: "x".into(),
            source: ConversionError::InvalidFormat { ty: "i32" },
        };
        assert!(err.is_conversion_error());
        assert_eq!(
            err.conversion(),
            Some(&ConversionError::InvalidFormat { ty: "i32" })
        );
    }

    #[test]
    fn messages_cite_the_token() {
        let err = ParseError::Syntax { token: "---x".into() };
        assert_eq!(err.to_string(), "syntax error in option '---x'");
        let err = ParseError::MissingArgument { option: "--name".into() };
        assert_eq!(err.to_string(), "missing value for option: --name");
    }
}
