use chrono::Utc;

use warden_core::Observation;

use crate::executor::CommandOutcome;

const HEAD_LINES: usize = 20;
const TAIL_LINES: usize = 10;

/// Fold the ordered per-command results of one block into an observation.
///
/// The aggregate exit code is the numeric maximum, so any failure
/// dominates success. The key-lines extract is a bounded head+tail
/// preview of the combined stdout — enough for a human or the proposer to
/// react without rereading megabytes of output.
pub fn build_observation(block_id: &str, results: &[CommandOutcome]) -> Observation {
    let exit_code = results.iter().map(|r| r.exit_code).max().unwrap_or(0);

    let combined: String = results.iter().map(|r| r.stdout.as_str()).collect();
    let key_lines = preview(&combined);

    let bytes_out: u64 = results.iter().map(|r| r.stdout.len() as u64).sum();

    let log_paths = results
        .iter()
        .flat_map(|r| [r.stdout_log.clone(), r.stderr_log.clone()])
        .flatten()
        .collect();

    let summary = format!(
        "{} command(s), exit={exit_code}, bytes={bytes_out}",
        results.len()
    );

    Observation {
        ts: Utc::now(),
        block_id: block_id.to_string(),
        exit_code,
        key_lines,
        bytes_out,
        summary,
        log_paths,
    }
}

/// First `HEAD_LINES`, an ellipsis marker, then the last `TAIL_LINES` of
/// the combined output. Short outputs are passed through whole rather
/// than duplicated around the marker.
fn preview(combined: &str) -> Vec<String> {
    if combined.is_empty() {
        return Vec::new();
    }
    let lines: Vec<&str> = combined.lines().collect();
    if lines.len() <= HEAD_LINES + TAIL_LINES {
        return lines.into_iter().map(str::to_string).collect();
    }
    let mut out: Vec<String> = lines[..HEAD_LINES].iter().map(|s| s.to_string()).collect();
    out.push("...".to_string());
    out.extend(lines[lines.len() - TAIL_LINES..].iter().map(|s| s.to_string()));
    out
}
