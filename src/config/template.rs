//! Value substitution for step templates.
//!
//! Command arguments, `CreateVar` values and `WriteFile` contents may
//! reference entries of the [`ValueTable`] with `{{ .Key }}` placeholders.
//!
//! # Syntax
//!
//! - `{{ .Key }}` / `{{.Key}}` - replaced with the value stored at `Key`
//! - `{{- .Key }}` / `{{ .Key -}}` - also trims whitespace before / after the action
//! - `{{/* note */}}` - comment, produces nothing
//!
//! Rendering is strict: a key missing from the table is an error.
//!
//! # Example
//!
//! ```
//! use seqrun::config::{render, ValueTable};
//!
//! let mut vals = ValueTable::new();
//! vals.insert("Region", "westus2");
//! assert_eq!(render("kube_{{ .Region }}", &vals).unwrap(), "kube_westus2");
//! ```

use crate::config::values::ValueTable;
use crate::error::TemplateError;
use std::collections::BTreeSet;

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Value reference: {{ .Key }}
    Field(String),
}

/// Parse a template into literal and field segments.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] for an unclosed `{{` or an action that
/// is not a field reference or comment.
pub fn parse_template(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;
    let mut trim_next = false;

    while let Some(open) = rest.find("{{") {
        let text = &rest[..open];
        literal.push_str(if trim_next { text.trim_start() } else { text });

        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| syntax(input, "unclosed action"))?;
        let mut action = &after[..close];
        rest = &after[close + 2..];

        if let Some(stripped) = trim_marker_left(action) {
            let keep = literal.trim_end().len();
            literal.truncate(keep);
            action = stripped;
        }
        trim_next = false;
        if let Some(stripped) = trim_marker_right(action) {
            trim_next = true;
            action = stripped;
        }

        let action = action.trim();
        if action.starts_with("/*") && action.ends_with("*/") && action.len() >= 4 {
            continue;
        }
        match action.strip_prefix('.') {
            Some(key) if is_identifier(key) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(key.to_string()));
            }
            _ if action.is_empty() => return Err(syntax(input, "missing value for command")),
            _ => {
                return Err(syntax(
                    input,
                    &format!("unsupported action {{{{{}}}}}", action),
                ))
            }
        }
    }

    literal.push_str(if trim_next { rest.trim_start() } else { rest });
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// `{{- ` strips whitespace before the action; the dash must be followed by a space.
fn trim_marker_left(action: &str) -> Option<&str> {
    let stripped = action.strip_prefix('-')?;
    stripped
        .starts_with(|c: char| c.is_ascii_whitespace())
        .then_some(stripped)
}

fn trim_marker_right(action: &str) -> Option<&str> {
    let stripped = action.strip_suffix('-')?;
    stripped
        .ends_with(|c: char| c.is_ascii_whitespace())
        .then_some(stripped)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn syntax(template: &str, message: &str) -> TemplateError {
    TemplateError::Syntax {
        template: template.to_string(),
        message: message.to_string(),
    }
}

/// Render a template against the value table.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] if the template does not parse and
/// [`TemplateError::Execution`] if it references a key the table lacks.
pub fn render(input: &str, vals: &ValueTable) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(input.len());

    for segment in parse_template(input)? {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Field(key) => {
                let value = vals.get(&key).ok_or_else(|| TemplateError::Execution {
                    template: input.to_string(),
                    message: format!("map has no entry for key \"{}\"", key),
                })?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}

/// Keys a template reads. Templates that fail to parse reference nothing.
pub fn referenced_keys(input: &str) -> BTreeSet<String> {
    parse_template(input)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Field(key) => Some(key),
            Segment::Literal(_) => None,
        })
        .collect()
}
