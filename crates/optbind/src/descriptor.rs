//! Descriptors: how one field is reached from the command line.
//!
//! An [`OptionDescriptor`] names a flag and says how its value is converted.
//! An [`ArgumentDescriptor`] marks a field as a positional slot. Both are
//! immutable once built; constructors reject invalid spellings immediately.

use crate::convert;
use crate::error::{ConversionError, DefinitionError};
use crate::field::{Category, FieldType, FieldValue, Value};
use regex::Regex;
use std::sync::LazyLock;

static RE_SHORT_FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-[^-]$").unwrap());
static RE_LONG_FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^--[^-].+$").unwrap());

/// Value conversion rule of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Sets `presence` when given bare, otherwise reads a boolean word.
    Boolean { presence: bool },
    Integer,
    FloatingPoint,
    String,
}

impl OptionKind {
    pub fn name(&self) -> &'static str {
        match self {
            OptionKind::Boolean { .. } => "boolean option",
            OptionKind::Integer => "integer option",
            OptionKind::FloatingPoint => "floating-point option",
            OptionKind::String => "string option",
        }
    }

    pub fn requires_argument(&self) -> bool {
        !matches!(self, OptionKind::Boolean { .. })
    }

    fn accepts(&self, field: FieldType) -> bool {
        match self {
            OptionKind::Boolean { .. } => field.category == Category::Boolean,
            OptionKind::Integer => field.category == Category::Integer,
            OptionKind::FloatingPoint => field.category == Category::FloatingPoint,
            OptionKind::String => field.category == Category::Text,
        }
    }
}

/// A single flag spelling bound to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    flag: String,
    parameter_name: String,
    description: Option<String>,
    kind: OptionKind,
}

impl OptionDescriptor {
    /// Construct a descriptor, validating the flag spelling.
    ///
    /// Short flags are `-` plus one character, long flags are `--` plus at
    /// least two characters, the first of which is not a dash.
    pub fn new(flag: &str, kind: OptionKind) -> Result<Self, DefinitionError> {
        validate_flag(flag)?;
        let parameter_name = if kind.requires_argument() { "VALUE" } else { "" };
        Ok(Self {
            flag: flag.to_string(),
            parameter_name: parameter_name.to_string(),
            description: None,
            kind,
        })
    }

    /// A boolean option that sets `true` when given bare.
    pub fn boolean(flag: &str) -> Result<Self, DefinitionError> {
        Self::new(flag, OptionKind::Boolean { presence: true })
    }

    /// A boolean option that sets `presence` when given bare.
    pub fn boolean_value(flag: &str, presence: bool) -> Result<Self, DefinitionError> {
        Self::new(flag, OptionKind::Boolean { presence })
    }

    pub fn integer(flag: &str) -> Result<Self, DefinitionError> {
        Self::new(flag, OptionKind::Integer)
    }

    pub fn floating_point(flag: &str) -> Result<Self, DefinitionError> {
        Self::new(flag, OptionKind::FloatingPoint)
    }

    pub fn string(flag: &str) -> Result<Self, DefinitionError> {
        Self::new(flag, OptionKind::String)
    }

    /// Display name of the value in help text, e.g. `FILE`.
    pub fn with_parameter_name(mut self, name: &str) -> Self {
        self.parameter_name = name.trim().to_string();
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn requires_argument(&self) -> bool {
        self.kind.requires_argument()
    }

    /// Check this descriptor may be bound to a field of type `field_type`.
    pub fn validate_field(&self, field: &str, field_type: FieldType) -> Result<(), DefinitionError> {
        if self.kind.accepts(field_type) {
            return Ok(());
        }
        Err(DefinitionError::FieldTypeMismatch {
            field: field.to_string(),
            descriptor: self.kind.name(),
            field_type: field_type.to_string(),
        })
    }

    /// Convert `raw` and store it into `target`.
    ///
    /// An empty `raw` on a boolean option applies the declared presence value.
    pub fn assign(&self, target: &mut dyn FieldValue, raw: &str) -> Result<(), ConversionError> {
        match self.kind {
            OptionKind::Boolean { presence } => {
                target.assign(Value::Flag(convert::boolean(raw, presence)?))
            }
            OptionKind::Integer | OptionKind::FloatingPoint | OptionKind::String => {
                target.assign(Value::Text(raw))
            }
        }
    }
}

fn validate_flag(flag: &str) -> Result<(), DefinitionError> {
    if flag.trim().is_empty() {
        return Err(DefinitionError::Precondition(
            "option flag must not be empty".to_string(),
        ));
    }
    let invalid = |reason| DefinitionError::InvalidFlag {
        flag: flag.to_string(),
        reason,
    };
    if !flag.starts_with('-') {
        return Err(invalid("an option must start with a minus sign"));
    }
    if flag.starts_with("---") {
        return Err(invalid("three or more leading dashes can never be matched"));
    }
    if flag.starts_with("--") {
        if !RE_LONG_FLAG.is_match(flag) {
            return Err(invalid("long options must be at least 2 characters long"));
        }
    } else if !RE_SHORT_FLAG.is_match(flag) {
        return Err(invalid("short options must be exactly 1 character long"));
    }
    Ok(())
}

/// Marks a field as a positional argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentDescriptor {
    name: String,
    optional: bool,
    order: i32,
    description: Option<String>,
}

impl ArgumentDescriptor {
    /// A required positional argument filled in ascending `order`.
    pub fn new(order: i32) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.trim().to_string();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Display name; empty means "use the field name".
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn validate_field(&self, field: &str, field_type: FieldType) -> Result<(), DefinitionError> {
        if field_type.category == Category::Text {
            return Ok(());
        }
        Err(DefinitionError::FieldTypeMismatch {
            field: field.to_string(),
            descriptor: "positional argument",
            field_type: field_type.to_string(),
        })
    }
}

/// The catch-all field must be a list of strings.
pub(crate) fn validate_catch_all(field: &str, field_type: FieldType) -> Result<(), DefinitionError> {
    if field_type.category == Category::List {
        return Ok(());
    }
    Err(DefinitionError::FieldTypeMismatch {
        field: field.to_string(),
        descriptor: "catch-all arguments",
        field_type: field_type.to_string(),
    })
}
