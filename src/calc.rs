//! Mark arithmetic: percentage derivation, pass/fail remarks, and the
//! filter-and-coerce step that turns the marks-entry grid into a save
//! payload.

use serde_json::json;

use crate::model::MarkDraft;
use crate::table::is_synthetic;

pub const SUBJECTS: [&str; 5] = ["marathi", "hindi", "english", "math", "science"];

/// Pass cutoff on the derived percentage.
pub const PASS_THRESHOLD: f64 = 40.0;

/// 1-decimal rounding matching the legacy report cards:
/// `Int(10*x + 0.5) / 10`
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// A supplied percentage wins; otherwise recompute from raw totals. Missing
/// or zero maximum yields 0 rather than a division blowup.
pub fn derive_percentage(total: Option<f64>, max: Option<f64>, supplied: Option<f64>) -> f64 {
    if let Some(p) = supplied {
        return p;
    }
    match (total, max) {
        (Some(t), Some(m)) if m > 0.0 => round_off_1_decimal(100.0 * t / m),
        _ => 0.0,
    }
}

pub fn remark_for(percentage: f64) -> &'static str {
    if percentage >= PASS_THRESHOLD {
        "Pass"
    } else {
        "Fail"
    }
}

/// Grid cells hold raw text; non-numeric or empty input saves as 0.
pub fn coerce_mark(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

fn has_any_mark(row: &MarkDraft) -> bool {
    SUBJECTS
        .iter()
        .any(|s| row.subject(s).is_some_and(|v| !v.trim().is_empty()))
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("no valid marks to save")]
    NoValidMarks,
}

/// Build the marks-save payload: rows without a server-issued id are
/// dropped (only pre-existing students can receive marks through this
/// flow), as are rows with every subject cell empty. Surviving cells are
/// coerced to integers. An empty result is refused before any network
/// traffic happens.
pub fn build_marks_payload(rows: &[MarkDraft]) -> Result<Vec<serde_json::Value>, ValidationError> {
    let entries: Vec<serde_json::Value> = rows
        .iter()
        .filter(|r| !is_synthetic(&r.id) && has_any_mark(r))
        .map(|r| {
            json!({
                "studentId": r.id,
                "marathi": coerce_mark(&r.marathi),
                "hindi": coerce_mark(&r.hindi),
                "english": coerce_mark(&r.english),
                "math": coerce_mark(&r.math),
                "science": coerce_mark(&r.science),
            })
        })
        .collect();

    if entries.is_empty() {
        return Err(ValidationError::NoValidMarks);
    }
    Ok(entries)
}
