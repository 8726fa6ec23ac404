use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::Value;

/// Counter name to value for one host, in the order the recap printed them.
pub type RecapStats = IndexMap<String, u64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    #[serde(rename = "playbook_header")]
    pub header: String,
    pub plays: Vec<Play>,
    #[serde(rename = "play_recap")]
    pub recap: IndexMap<String, RecapStats>,
}

impl ParseResult {
    pub fn task_count(&self) -> usize {
        self.plays.iter().map(|p| p.tasks.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Play {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Play {
    pub fn new(name: &str) -> Self {
        Play {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub name: String,
    pub ok: Vec<Outcome>,
    #[serde(serialize_with = "serialize_include")]
    pub included: Option<Include>,
    pub skipping: Vec<String>,
    pub changed: Vec<Outcome>,
    pub failed: Vec<Outcome>,
}

impl Task {
    pub fn new(name: &str) -> Self {
        Task {
            name: name.to_string(),
            ok: Vec::new(),
            included: None,
            skipping: Vec::new(),
            changed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn bucket_mut(&mut self, status: Status) -> Option<&mut Vec<Outcome>> {
        match status {
            Status::Ok => Some(&mut self.ok),
            Status::Changed => Some(&mut self.changed),
            Status::Failed => Some(&mut self.failed),
            Status::Skipping | Status::Included => None,
        }
    }
}

/// Status prefixes an outcome line can start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Included,
    Skipping,
    Changed,
    Failed,
}

/// One host's entry in the ok, changed or failed bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Host(String),
    WithPayload { host: String, payload: Value },
}

impl Outcome {
    pub fn host(&self) -> &str {
        match self {
            Outcome::Host(host) => host,
            Outcome::WithPayload { host, .. } => host,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Outcome::Host(_) => None,
            Outcome::WithPayload { payload, .. } => Some(payload),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Host(host) => serializer.serialize_str(host),
            Outcome::WithPayload { host, payload } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(host, payload)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Include {
    pub file: String,
    pub hosts: Vec<String>,
}

// An absent include is written as an empty mapping so every task has the same keys.
fn serialize_include<S: Serializer>(
    include: &Option<Include>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match include {
        Some(include) => include.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
