use crate::config::ScanOptions;
use crate::transcript::report::{Outcome, ParseResult, Task};

const BANNER: &str = "*********************************************************";

/// Writes `result` back out as a transcript the scanner reads into an equal
/// result. Payloads are written as single-line JSON.
pub fn render_transcript(
    result: &ParseResult,
    options: &ScanOptions,
) -> Result<String, serde_json::Error> {
    let mut out = String::new();

    if !result.header.is_empty() {
        push_line(&mut out, &result.header);
    }

    for play in &result.plays {
        push_line(&mut out, &format!("{}{}] {}", options.play_marker_prefix, play.name, BANNER));
        for task in &play.tasks {
            out.push('\n');
            render_task(&mut out, task, options)?;
        }
        out.push('\n');
    }

    push_line(&mut out, &format!("{} {}", options.recap_marker, BANNER));
    for (host, stats) in &result.recap {
        let counters = stats
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<String>>()
            .join("    ");
        push_line(&mut out, &format!("{:<26} : {}", host, counters));
    }

    Ok(out)
}

fn render_task(out: &mut String, task: &Task, options: &ScanOptions) -> Result<(), serde_json::Error> {
    push_line(out, &format!("{}{}] {}", options.task_marker_prefix, task.name, BANNER));

    render_outcomes(out, "ok", &task.ok, options)?;
    if let Some(include) = &task.included {
        push_line(
            out,
            &format!("included: {} for {}", include.file, include.hosts.join(", ")),
        );
    }
    for host in &task.skipping {
        push_line(out, &format!("skipping: [{}]", host));
    }
    render_outcomes(out, "changed", &task.changed, options)?;
    render_outcomes(out, "failed", &task.failed, options)?;

    Ok(())
}

fn render_outcomes(
    out: &mut String,
    status: &str,
    outcomes: &[Outcome],
    options: &ScanOptions,
) -> Result<(), serde_json::Error> {
    for outcome in outcomes {
        match outcome {
            Outcome::Host(host) => push_line(out, &format!("{}: [{}]", status, host)),
            Outcome::WithPayload { host, payload } => {
                let json = serde_json::to_string(payload)?;
                push_line(
                    out,
                    &format!("{}: [{}] {} {}", status, host, options.inline_value_separator, json),
                );
            }
        }
    }
    Ok(())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
