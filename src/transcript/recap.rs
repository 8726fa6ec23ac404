use crate::error::ParseError;
use crate::transcript::report::RecapStats;
use indexmap::IndexMap;
use log::debug;

/// Parses the lines that follow the recap marker. `first_line_number` is the
/// 1-based number of `lines[0]` in the transcript.
pub fn parse_recap(
    lines: &[&str],
    first_line_number: usize,
) -> Result<IndexMap<String, RecapStats>, ParseError> {
    let mut recap = IndexMap::new();

    for (offset, line) in lines.iter().enumerate() {
        let line_number = first_line_number + offset;
        let Some((host, counters)) = line.split_once(':') else {
            continue;
        };

        let host = host.trim();
        let stats = parse_counters(counters).map_err(|reason| ParseError::MalformedRecapLine {
            line_number,
            host: host.to_string(),
            line: line.to_string(),
            reason,
        })?;

        debug!("Recap for {}: {} counters", host, stats.len());
        recap.insert(host.to_string(), stats);
    }

    Ok(recap)
}

fn parse_counters(counters: &str) -> Result<RecapStats, String> {
    let mut stats = RecapStats::new();

    for token in counters.split_whitespace() {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", token))?;
        if key.is_empty() {
            return Err(format!("missing counter name in '{}'", token));
        }
        let value = value
            .parse::<u64>()
            .map_err(|e| format!("counter '{}' has invalid value '{}': {}", key, value, e))?;
        stats.insert(key.to_string(), value);
    }

    if stats.is_empty() {
        return Err("no counters".to_string());
    }

    Ok(stats)
}
