use crate::transcript::report::{Include, Status};
use once_cell::sync::Lazy;
use regex::Regex;

static INCLUDE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"included: (.+?) for (.+)").expect("include pattern is a valid regex")
});

const STATUS_PREFIXES: &[(&str, Status)] = &[
    ("ok:", Status::Ok),
    ("included:", Status::Included),
    ("skipping:", Status::Skipping),
    ("changed:", Status::Changed),
    ("failed:", Status::Failed),
];

/// Printed by the runner for a failing task. Only counted as failed on request.
const FATAL_PREFIX: &str = "fatal:";

pub fn classify_status(line: &str, fatal_as_failed: bool) -> Option<Status> {
    if fatal_as_failed && line.starts_with(FATAL_PREFIX) {
        return Some(Status::Failed);
    }
    STATUS_PREFIXES
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|(_, status)| *status)
}

/// Host named by a status line: its second whitespace-delimited field,
/// without the surrounding brackets or a trailing colon.
pub fn host_token(line: &str) -> Option<String> {
    let field = line.split_whitespace().nth(1)?;
    let field = field.trim_end_matches(':');
    let field = field.strip_prefix('[').unwrap_or(field);
    let field = field.strip_suffix(']').unwrap_or(field);
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

pub fn parse_include(line: &str) -> Option<Include> {
    let captures = INCLUDE_PATTERN.captures(line)?;
    let file = captures.get(1)?.as_str().trim().to_string();
    let hosts = captures
        .get(2)?
        .as_str()
        .split(',')
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
        .collect::<Vec<String>>();

    if file.is_empty() || hosts.is_empty() {
        return None;
    }

    Some(Include { file, hosts })
}

/// Name inside a `PREFIX name] ***` marker line.
pub fn marker_name(line: &str, prefix: &str) -> String {
    let rest = &line[prefix.len()..];
    let name = match rest.rfind(']') {
        Some(end) => &rest[..end],
        None => rest,
    };
    name.trim().to_string()
}
