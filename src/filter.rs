//! Pure client-side filtering for the attendance report. Never mutates or
//! refetches the source collection; the summary is derived from whatever
//! subset the active filter selects.

use serde::Serialize;

use crate::model::{AttendanceRecord, AttendanceStatus};

/// Two optional dimensions, combined with AND when both are set: an exact
/// calendar-day match and a substring match on the composed class label.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub date: Option<String>,
    pub class_label: Option<String>,
}

impl ReportFilter {
    pub fn is_clear(&self) -> bool {
        self.date.is_none() && self.class_label.is_none()
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let date_ok = self
            .date
            .as_deref()
            .map_or(true, |d| record.calendar_day() == d);
        let class_ok = self
            .class_label
            .as_deref()
            .map_or(true, |c| record.class_label().contains(c));
        date_ok && class_ok
    }
}

pub fn apply(records: &[AttendanceRecord], filter: &ReportFilter) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub total: usize,
}

pub fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
    let present = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();
    AttendanceSummary {
        present,
        absent: records.len() - present,
        total: records.len(),
    }
}
