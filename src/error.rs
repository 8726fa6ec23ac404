use crate::transcript::report::ParseResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The recap marker never appeared. `partial` holds every play and task
    /// seen before the input ran out, with an empty recap.
    #[error("recap marker '{marker}' not found in transcript")]
    MissingRecap {
        marker: String,
        partial: Box<ParseResult>,
    },
    #[error("malformed recap line {line_number} for host '{host}': {reason}: {line}")]
    MalformedRecapLine {
        line_number: usize,
        host: String,
        line: String,
        reason: String,
    },
    #[error("malformed include on line {line_number}, expected '<file> for <hosts>': {line}")]
    MalformedInclude { line_number: usize, line: String },
    #[error("malformed inline value on line {line_number}: {reason}: {line}")]
    MalformedInlineValue {
        line_number: usize,
        line: String,
        reason: String,
    },
    #[error("unrecognized line {line_number}: {line}")]
    UnrecognizedLine { line_number: usize, line: String },
    #[error("outcome on line {line_number} has no open task: {line}")]
    OrphanOutcome { line_number: usize, line: String },
}

impl ParseError {
    /// Line the error points at, if it refers to a single line.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ParseError::MissingRecap { .. } => None,
            ParseError::MalformedRecapLine { line_number, .. }
            | ParseError::MalformedInclude { line_number, .. }
            | ParseError::MalformedInlineValue { line_number, .. }
            | ParseError::UnrecognizedLine { line_number, .. }
            | ParseError::OrphanOutcome { line_number, .. } => Some(*line_number),
        }
    }
}
