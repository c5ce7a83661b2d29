//! Plain-text help built from a [`TableInfo`].
//!
//! Layout follows the usual `Usage:` / `Arguments:` / `Options:` sections
//! with descriptions aligned in a second column.

use crate::info::{OptionGroupInfo, TableInfo};

const INDENT: &str = "   ";
const GAP: usize = 2;

/// Render help for `program`. `title` may span several lines; leading
/// whitespace is trimmed from each.
pub fn render(title: &str, program: &str, info: &TableInfo) -> Vec<String> {
    let mut out: Vec<String> = title.lines().map(|l| l.trim_start().to_string()).collect();
    if !out.is_empty() {
        out.push(String::new());
    }

    out.push("Usage:".to_string());
    out.push(format!("  {}", usage_line(program, info)));

    let arguments: Vec<(String, String)> = info
        .arguments
        .iter()
        .map(|a| {
            let left = if a.optional {
                format!("[{}]", a.name)
            } else {
                a.name.clone()
            };
            (left, a.description.clone().unwrap_or_default())
        })
        .collect();

    let options: Vec<(String, String)> = info
        .options
        .iter()
        .map(|group| {
            (
                flag_column(group),
                group.summary().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let width = arguments
        .iter()
        .chain(options.iter())
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0)
        + GAP;

    if !arguments.is_empty() {
        out.push(String::new());
        out.push("Arguments:".to_string());
        out.extend(arguments.iter().map(|(l, r)| row(l, r, width)));
    }

    if !options.is_empty() {
        out.push(String::new());
        out.push("Options:".to_string());
        out.extend(options.iter().map(|(l, r)| row(l, r, width)));
    }

    out
}

fn usage_line(program: &str, info: &TableInfo) -> String {
    let mut parts = vec![program.to_string()];
    if !info.options.is_empty() {
        parts.push("[options]".to_string());
    }
    for a in &info.arguments {
        if a.optional {
            parts.push(format!("[{}]", a.name));
        } else {
            parts.push(format!("<{}>", a.name));
        }
    }
    if let Some(rest) = &info.catch_all {
        parts.push(format!("...{}", rest));
    }
    parts.join(" ")
}

/// `-v, --verbose` or `-n, --count VALUE`; short spellings first.
fn flag_column(group: &OptionGroupInfo) -> String {
    let mut flags: Vec<&str> = group.flags.iter().map(|f| f.flag.as_str()).collect();
    flags.sort_by_key(|f| f.starts_with("--"));
    let mut column = flags.join(", ");

    let parameter = group
        .flags
        .iter()
        .find(|f| f.requires_argument && !f.parameter_name.is_empty())
        .map(|f| f.parameter_name.as_str());
    if let Some(parameter) = parameter {
        column.push(' ');
        column.push_str(parameter);
    }
    column
}

fn row(left: &str, right: &str, width: usize) -> String {
    if right.is_empty() {
        return format!("{INDENT}{left}");
    }
    format!("{INDENT}{left:width$}{right}")
}
