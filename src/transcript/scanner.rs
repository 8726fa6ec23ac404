use crate::config::{ScanOptions, Tolerance};
use crate::error::ParseError;
use crate::transcript::outcome::{classify_status, host_token, marker_name, parse_include};
use crate::transcript::payload::{open_brackets, InlinePayload};
use crate::transcript::recap::parse_recap;
use crate::transcript::report::{Outcome, ParseResult, Play, Status, Task};
use log::{debug, trace, warn};
use serde_yaml::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first play marker; lines go to the header.
    Header,
    InPlay,
    /// Recap marker seen; the scanner accepts no more lines.
    Done,
}

/// Inline payload that opened brackets it has not closed yet.
#[derive(Debug)]
struct PendingPayload {
    status: Status,
    host: String,
    text: String,
    line_number: usize,
    line: String,
}

/// Line-at-a-time state machine behind [`parse_transcript`].
#[derive(Debug)]
pub struct Scanner<'o> {
    options: &'o ScanOptions,
    phase: Phase,
    header: Vec<String>,
    plays: Vec<Play>,
    play: Option<Play>,
    task: Option<Task>,
    pending: Option<PendingPayload>,
    recap_line: Option<usize>,
}

impl<'o> Scanner<'o> {
    pub fn new(options: &'o ScanOptions) -> Self {
        Scanner {
            options,
            phase: Phase::Header,
            header: Vec::new(),
            plays: Vec::new(),
            play: None,
            task: None,
            pending: None,
            recap_line: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 1-based line number of the recap marker, once the scan reached it.
    pub fn recap_line(&self) -> Option<usize> {
        self.recap_line
    }

    pub fn current_play(&self) -> Option<&Play> {
        self.play.as_ref()
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Feeds one line; `line_number` is 1-based and only used for diagnostics.
    pub fn feed(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        if self.phase == Phase::Done {
            return Ok(());
        }

        if self.pending.is_some() {
            if !self.is_boundary(line) {
                self.continue_payload(line)?;
                return Ok(());
            }
            self.flush_pending()?;
        }

        if self.phase == Phase::Header {
            if line.starts_with(&self.options.play_marker_prefix) {
                self.open_play(line);
            } else {
                self.header.push(line.to_string());
            }
            return Ok(());
        }

        if line.starts_with(&self.options.play_marker_prefix) {
            self.close_task();
            self.close_play();
            self.open_play(line);
        } else if line.starts_with(&self.options.task_marker_prefix) {
            self.close_task();
            let name = marker_name(line, &self.options.task_marker_prefix);
            debug!("Starting task: {}", name);
            self.task = Some(Task::new(&name));
        } else if line.starts_with(&self.options.recap_marker) {
            self.close_task();
            self.close_play();
            debug!("Recap marker found on line {}", line_number);
            self.recap_line = Some(line_number);
            self.phase = Phase::Done;
        } else if let Some(status) = classify_status(line, self.options.fatal_as_failed) {
            if self.task.is_some() {
                self.record_outcome(status, line_number, line)?;
            } else {
                self.orphan_outcome(line_number, line)?;
            }
        } else if !line.trim().is_empty() {
            self.unrecognized(line_number, line)?;
        }

        Ok(())
    }

    /// Flushes anything still open and returns the result without a recap.
    pub fn finish(mut self) -> Result<ParseResult, ParseError> {
        self.flush_pending()?;
        self.close_task();
        self.close_play();

        Ok(ParseResult {
            header: self.header.join("\n"),
            plays: self.plays,
            recap: Default::default(),
        })
    }

    fn open_play(&mut self, line: &str) {
        let name = marker_name(line, &self.options.play_marker_prefix);
        debug!("Starting play: {}", name);
        self.play = Some(Play::new(&name));
        self.phase = Phase::InPlay;
    }

    fn close_task(&mut self) {
        if let Some(task) = self.task.take() {
            match self.play.as_mut() {
                Some(play) => play.tasks.push(task),
                None => warn!("Dropping task '{}' with no open play", task.name),
            }
        }
    }

    fn close_play(&mut self) {
        if let Some(play) = self.play.take() {
            debug!("Closing play '{}' with {} tasks", play.name, play.tasks.len());
            self.plays.push(play);
        }
    }

    fn is_boundary(&self, line: &str) -> bool {
        line.starts_with(&self.options.play_marker_prefix)
            || line.starts_with(&self.options.task_marker_prefix)
            || line.starts_with(&self.options.recap_marker)
            || classify_status(line, self.options.fatal_as_failed).is_some()
    }

    fn record_outcome(
        &mut self,
        status: Status,
        line_number: usize,
        line: &str,
    ) -> Result<(), ParseError> {
        if status == Status::Included {
            let include = parse_include(line).ok_or_else(|| ParseError::MalformedInclude {
                line_number,
                line: line.to_string(),
            })?;
            if let Some(task) = self.task.as_mut() {
                if let Some(previous) = task.included.replace(include) {
                    warn!(
                        "Task '{}' includes more than one file, keeping line {} over '{}'",
                        task.name, line_number, previous.file
                    );
                }
            }
            return Ok(());
        }

        let Some(host) = host_token(line) else {
            return self.unrecognized(line_number, line);
        };

        if status == Status::Skipping {
            if let Some(task) = self.task.as_mut() {
                task.skipping.push(host);
            }
            return Ok(());
        }

        match line.split_once(self.options.inline_value_separator.as_str()) {
            Some((_, rest)) => {
                let text = rest.trim().to_string();
                let pending = PendingPayload {
                    status,
                    host,
                    text,
                    line_number,
                    line: line.to_string(),
                };
                if open_brackets(&pending.text) > 0 {
                    trace!("Payload on line {} continues", line_number);
                    self.pending = Some(pending);
                    Ok(())
                } else {
                    self.store_payload(pending)
                }
            }
            None => {
                self.push_outcome(status, Outcome::Host(host));
                Ok(())
            }
        }
    }

    fn continue_payload(&mut self, line: &str) -> Result<(), ParseError> {
        let balanced = match self.pending.as_mut() {
            Some(pending) => {
                pending.text.push('\n');
                pending.text.push_str(line);
                open_brackets(&pending.text) <= 0
            }
            None => false,
        };

        if balanced {
            self.flush_pending()?;
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), ParseError> {
        match self.pending.take() {
            Some(pending) => self.store_payload(pending),
            None => Ok(()),
        }
    }

    fn store_payload(&mut self, pending: PendingPayload) -> Result<(), ParseError> {
        let payload = match InlinePayload::parse(&pending.text).into_value() {
            Ok(value) => value,
            Err((text, _)) if self.options.lenient_inline_values => {
                debug!("Keeping unparseable payload on line {} as text", pending.line_number);
                Value::String(text)
            }
            Err((_, reason)) => {
                return Err(ParseError::MalformedInlineValue {
                    line_number: pending.line_number,
                    line: pending.line,
                    reason,
                })
            }
        };

        self.push_outcome(
            pending.status,
            Outcome::WithPayload {
                host: pending.host,
                payload,
            },
        );
        Ok(())
    }

    fn push_outcome(&mut self, status: Status, outcome: Outcome) {
        if let Some(bucket) = self.task.as_mut().and_then(|task| task.bucket_mut(status)) {
            bucket.push(outcome);
        }
    }

    fn orphan_outcome(&self, line_number: usize, line: &str) -> Result<(), ParseError> {
        match self.options.orphan_outcomes {
            Tolerance::Ignore => {
                warn!("Dropping outcome on line {} outside of any task", line_number);
                Ok(())
            }
            Tolerance::Reject => Err(ParseError::OrphanOutcome {
                line_number,
                line: line.to_string(),
            }),
        }
    }

    fn unrecognized(&self, line_number: usize, line: &str) -> Result<(), ParseError> {
        match self.options.unrecognized_lines {
            Tolerance::Ignore => {
                trace!("Ignoring line {}: {}", line_number, line);
                Ok(())
            }
            Tolerance::Reject => Err(ParseError::UnrecognizedLine {
                line_number,
                line: line.to_string(),
            }),
        }
    }
}

/// Scans a complete transcript into plays, tasks, host outcomes and the recap.
pub fn parse_transcript(text: &str, options: &ScanOptions) -> Result<ParseResult, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut scanner = Scanner::new(options);

    for (index, line) in lines.iter().enumerate() {
        scanner.feed(index + 1, line)?;
        if scanner.phase() == Phase::Done {
            break;
        }
    }

    // With no play ever started, a marker in the header still opens the recap.
    let recap_line = match scanner.phase() {
        Phase::Header => lines
            .iter()
            .position(|line| line.starts_with(&options.recap_marker))
            .map(|index| index + 1),
        _ => scanner.recap_line(),
    };

    let mut result = scanner.finish()?;

    match recap_line {
        Some(marker_line) => {
            result.recap = parse_recap(&lines[marker_line..], marker_line + 1)?;
            debug!(
                "Parsed {} plays, {} tasks, {} recap hosts",
                result.plays.len(),
                result.task_count(),
                result.recap.len()
            );
            Ok(result)
        }
        None => Err(ParseError::MissingRecap {
            marker: options.recap_marker.clone(),
            partial: Box::new(result),
        }),
    }
}
