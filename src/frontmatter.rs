//! The editor exchange format: a markdown document whose YAML frontmatter
//! carries the task's structured fields and whose body is the description.
//!
//! Only the subset the template itself produces is parsed — scalar strings
//! with optional single/double quoting, and label lists in either inline
//! (`[a, b]`) or block (`- a`) form. This is deliberately not a YAML parser.

use crate::error::TaskError;
use crate::models::Task;

/// Fields found in an edited document. `None` means the key was absent, which
/// leaves the corresponding task field untouched.
#[derive(Debug, Default, PartialEq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub labels: Option<Vec<String>>,
}

/// Render a task as an editable document.
pub fn render(task: &Task) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("title: ");
    out.push_str(&yaml_scalar(&task.title));
    out.push('\n');
    out.push_str("type: ");
    out.push_str(task.kind.as_str());
    out.push('\n');
    out.push_str("status: ");
    out.push_str(task.status.as_str());
    out.push('\n');
    if task.labels.is_empty() {
        out.push_str("labels: []\n");
    } else {
        out.push_str("labels:\n");
        for label in &task.labels {
            out.push_str("  - ");
            out.push_str(&yaml_scalar(label));
            out.push('\n');
        }
    }
    out.push_str("---\n");
    if let Some(description) = task.description.as_deref() {
        if !description.is_empty() {
            out.push_str(description);
            if !description.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// Split an edited document into its frontmatter and body.
pub fn parse(content: &str) -> Result<(Frontmatter, String), TaskError> {
    let lines: Vec<&str> = content.split('\n').collect();

    let mut start = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed == "---" {
            start = Some(i);
            break;
        }
        if !trimmed.is_empty() {
            return Err(TaskError::validation("frontmatter must start with ---"));
        }
    }
    let start = start.ok_or_else(|| TaskError::validation("frontmatter must start with ---"))?;

    let end = lines[start + 1..]
        .iter()
        .position(|line| line.trim() == "---")
        .map(|offset| start + 1 + offset)
        .ok_or_else(|| TaskError::validation("frontmatter must end with ---"))?;

    let frontmatter = parse_fields(&lines[start + 1..end])?;
    let body = lines[end + 1..].join("\n");
    Ok((frontmatter, body))
}

fn parse_fields(lines: &[&str]) -> Result<Frontmatter, TaskError> {
    let mut fm = Frontmatter::default();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() || line.starts_with('#') {
            i += 1;
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| TaskError::validation(format!("invalid frontmatter line: {line}")))?;
        let key = key.trim();
        let value = value.trim();

        match key {
            "title" => {
                fm.title = Some(unquote(value));
                i += 1;
            }
            "type" => {
                fm.kind = Some(unquote(value));
                i += 1;
            }
            "status" => {
                fm.status = Some(unquote(value));
                i += 1;
            }
            "labels" => {
                let (labels, next) = parse_labels(value, lines, i + 1);
                fm.labels = Some(labels);
                i = next;
            }
            // unknown keys are tolerated so stray edits don't hard-fail
            _ => i += 1,
        }
    }
    Ok(fm)
}

fn parse_labels(value: &str, lines: &[&str], start: usize) -> (Vec<String>, usize) {
    // block form: the value is empty and labels follow as `- item` lines
    if value.is_empty() {
        let mut labels = Vec::new();
        let mut i = start;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            if trimmed.is_empty() {
                i += 1;
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix('-') {
                let label = unquote(rest.trim());
                if !label.is_empty() {
                    labels.push(label);
                }
                i += 1;
                continue;
            }
            break;
        }
        return (labels, i);
    }

    if value == "[]" {
        return (Vec::new(), start);
    }

    // inline form: [a, b, c]
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let labels = inner
            .split(',')
            .map(|part| unquote(part.trim()))
            .filter(|label| !label.is_empty())
            .collect();
        return (labels, start);
    }

    // single bare scalar
    (vec![unquote(value)], start)
}

/// Trim surrounding labels to their meaningful content and drop duplicates,
/// preserving first-seen order.
pub fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() || result.iter().any(|seen| seen == trimmed) {
            continue;
        }
        result.push(trimmed.to_string());
    }
    result
}

/// An all-whitespace body clears the description; otherwise trailing newlines
/// are stripped but inner formatting is kept.
pub fn normalize_description(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    Some(body.trim_end_matches('\n').to_string())
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        if bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
            let inner = &value[1..value.len() - 1];
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
        if bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'' {
            let inner = &value[1..value.len() - 1];
            return inner.replace("''", "'");
        }
    }
    value.to_string()
}

fn yaml_scalar(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if value.contains(':')
        || value.contains('\n')
        || value.contains('#')
        || value.starts_with(' ')
        || value.ends_with(' ')
    {
        return format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""));
    }
    value.to_string()
}
