use serde_yaml::Value;

/// Best-effort reading of the text after the inline value separator.
#[derive(Debug, Clone, PartialEq)]
pub enum InlinePayload {
    Structured(Value),
    /// A plain scalar such as `(item=foo)`.
    RawText(String),
    ParseFailure { text: String, reason: String },
}

impl InlinePayload {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match serde_yaml::from_str::<Value>(text) {
            Ok(Value::String(s)) => InlinePayload::RawText(s),
            Ok(value) => InlinePayload::Structured(value),
            Err(e) => InlinePayload::ParseFailure {
                text: text.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// The value to record for the host, if the payload was readable.
    pub fn into_value(self) -> Result<Value, (String, String)> {
        match self {
            InlinePayload::Structured(value) => Ok(value),
            InlinePayload::RawText(text) => Ok(Value::String(text)),
            InlinePayload::ParseFailure { text, reason } => Err((text, reason)),
        }
    }
}

/// Net count of `{`/`[` left open in `text`, ignoring brackets inside
/// double-quoted strings. Negative when more are closed than opened.
pub fn open_brackets(text: &str) -> i64 {
    let mut depth = 0i64;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
    }

    depth
}
