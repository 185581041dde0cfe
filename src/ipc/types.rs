use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::api::Api;
use crate::filter::ReportFilter;
use crate::model::{AttendanceRecord, AttendanceStatus, ClassInfo, MarkDraft, MarkView, Student};
use crate::page::Fetcher;
use crate::session::SessionStore;
use crate::table::Grid;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Attendance-marking page: roster, the statuses selected this session
/// (keyed by student id), and the recent-history list refreshed after a
/// successful save.
pub struct AttendancePage {
    pub roster: Fetcher<Student>,
    pub selections: BTreeMap<String, AttendanceStatus>,
    pub history: Fetcher<AttendanceRecord>,
}

impl AttendancePage {
    pub fn new() -> Self {
        Self {
            roster: Fetcher::new(),
            selections: BTreeMap::new(),
            history: Fetcher::new(),
        }
    }
}

/// Attendance report page: the all-teachers history plus the active filter.
pub struct ReportPage {
    pub history: Fetcher<AttendanceRecord>,
    pub filter: ReportFilter,
}

impl ReportPage {
    pub fn new() -> Self {
        Self {
            history: Fetcher::new(),
            filter: ReportFilter::default(),
        }
    }
}

/// Marks-entry page: the fetched roster is the source collection, the grid
/// is the edit buffer built from it.
pub struct MarksPage {
    pub roster: Fetcher<Student>,
    pub grid: Grid<MarkDraft>,
}

impl MarksPage {
    pub fn new() -> Self {
        Self {
            roster: Fetcher::new(),
            grid: Grid::new(),
        }
    }
}

/// Per-page view state. Each page owns its collections exclusively; nothing
/// is shared or cached across pages.
pub struct Pages {
    pub classes: Fetcher<ClassInfo>,
    pub students: Fetcher<Student>,
    pub attendance: AttendancePage,
    pub report: ReportPage,
    pub marks: MarksPage,
    pub marks_view: Fetcher<MarkView>,
}

pub struct AppState {
    pub session: SessionStore,
    pub api: Arc<dyn Api>,
    pub pages: Pages,
}

impl AppState {
    pub fn new(session: SessionStore, api: Arc<dyn Api>) -> Self {
        Self {
            session,
            api,
            pages: Pages {
                classes: Fetcher::new(),
                students: Fetcher::new(),
                attendance: AttendancePage::new(),
                report: ReportPage::new(),
                marks: MarksPage::new(),
                marks_view: Fetcher::new(),
            },
        }
    }
}
