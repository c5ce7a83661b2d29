//! Read-only description of a built table, for help text and tooling.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    /// Positional arguments, in the order they are filled.
    pub arguments: Vec<ArgumentInfo>,
    /// Field receiving leftover tokens, if any.
    pub catch_all: Option<String>,
    /// One entry per field that has at least one flag.
    pub options: Vec<OptionGroupInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentInfo {
    pub name: String,
    pub field: String,
    pub optional: bool,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroupInfo {
    pub field: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub flags: Vec<FlagInfo>,
}

impl OptionGroupInfo {
    /// Description of the group, falling back to the first flag that has one.
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or_else(|| self.flags.iter().find_map(|f| f.description.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagInfo {
    pub flag: String,
    pub parameter_name: String,
    pub requires_argument: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TableInfo {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
