//! Canonical record shapes plus the normalization mapping that reconciles
//! the API's inconsistent field names (`name` vs `studentName`, string vs
//! numeric ids, `percentage` vs raw totals) once at the boundary. Everything
//! downstream sees exactly one shape per entity.

use serde::{Deserialize, Deserializer, Serialize};

use crate::calc;
use crate::table::{is_synthetic, synthetic_id, GridError, GridRow};

/// Accept a string or a bare number for an identifier-ish field.
fn de_flex_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Str(String),
        Int(i64),
        Num(f64),
    }
    Ok(match Flex::deserialize(d)? {
        Flex::Str(s) => s,
        Flex::Int(n) => n.to_string(),
        Flex::Num(x) => x.to_string(),
    })
}

/// Like `de_flex_string`, but tolerates an explicit null.
fn de_opt_flex_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Str(String),
        Int(i64),
        Num(f64),
    }
    Ok(match Option::<Flex>::deserialize(d)? {
        Some(Flex::Str(s)) => Some(s),
        Some(Flex::Int(n)) => Some(n.to_string()),
        Some(Flex::Num(x)) => Some(x.to_string()),
        None => None,
    })
}

/// Accept a number or a numeric string.
fn de_opt_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Num(f64),
        Str(String),
    }
    Ok(match Option::<Flex>::deserialize(d)? {
        Some(Flex::Num(x)) => Some(x),
        Some(Flex::Str(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

fn de_flex_i64<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_number(d)?.map(|x| x as i64).unwrap_or(0))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "_id", alias = "studentId", deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, alias = "studentName")]
    pub name: String,
    #[serde(default, alias = "className")]
    pub class: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, alias = "phone", deserialize_with = "de_flex_string")]
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    #[serde(alias = "_id", alias = "classId", deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, alias = "class")]
    pub class_name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, alias = "totalStudents", deserialize_with = "de_flex_i64")]
    pub student_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Present" => Some(Self::Present),
            "Absent" => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, alias = "student", deserialize_with = "de_flex_string")]
    pub student_id: String,
    #[serde(default, alias = "name")]
    pub student_name: String,
    #[serde(default, alias = "className")]
    pub class: String,
    #[serde(default)]
    pub section: String,
    pub status: AttendanceStatus,
    /// Calendar day, possibly with a trailing timestamp from the server.
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub teacher_id: String,
}

impl AttendanceRecord {
    /// `"2024-05-01T00:00:00.000Z"` and `"2024-05-01"` both mean the same day.
    pub fn calendar_day(&self) -> &str {
        calendar_day(&self.date)
    }

    /// Composed label used for report filtering, e.g. class "10" + section
    /// "A" -> "10A".
    pub fn class_label(&self) -> String {
        if self.section.is_empty() {
            self.class.clone()
        } else {
            format!("{}{}", self.class, self.section)
        }
    }
}

pub fn calendar_day(date: &str) -> &str {
    match date.split_once('T') {
        Some((day, _)) => day,
        None => date,
    }
}

/// Raw marks-list entry as the API sends it; field names vary per deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntryRaw {
    #[serde(default, alias = "userName", alias = "name", deserialize_with = "de_opt_flex_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub total_marks: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub max_marks: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub percentage: Option<f64>,
}

/// Canonical marks-view row: one name, one percentage, one remark.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkView {
    pub student_name: String,
    pub percentage: f64,
    pub remark: String,
}

impl MarkView {
    pub fn from_raw(raw: MarkEntryRaw) -> Self {
        let percentage =
            calc::derive_percentage(raw.total_marks, raw.max_marks, raw.percentage);
        Self {
            student_name: raw.student_name.unwrap_or_else(|| "Unknown".to_string()),
            percentage,
            remark: calc::remark_for(percentage).to_string(),
        }
    }
}

/// One row of the marks-entry grid. Subject cells hold the raw input text;
/// coercion to integers happens only when a save payload is built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDraft {
    pub id: String,
    pub seq: usize,
    pub name: String,
    pub marathi: String,
    pub hindi: String,
    pub english: String,
    pub math: String,
    pub science: String,
}

impl MarkDraft {
    pub fn from_student(s: &Student) -> Self {
        Self {
            id: s.id.clone(),
            seq: 0,
            name: s.name.clone(),
            marathi: String::new(),
            hindi: String::new(),
            english: String::new(),
            math: String::new(),
            science: String::new(),
        }
    }

    pub fn subject(&self, name: &str) -> Option<&str> {
        match name {
            "marathi" => Some(&self.marathi),
            "hindi" => Some(&self.hindi),
            "english" => Some(&self.english),
            "math" => Some(&self.math),
            "science" => Some(&self.science),
            _ => None,
        }
    }
}

impl GridRow for MarkDraft {
    fn blank() -> Self {
        Self {
            id: synthetic_id(),
            seq: 0,
            name: String::new(),
            marathi: String::new(),
            hindi: String::new(),
            english: String::new(),
            math: String::new(),
            science: String::new(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_seq(&mut self, seq: usize) {
        self.seq = seq;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), GridError> {
        match field {
            // Names are server truth once a row has a real id; only rows the
            // teacher just added accept name entry.
            "name" => {
                if !is_synthetic(&self.id) {
                    return Err(GridError::NameLocked);
                }
                self.name = value.to_string();
            }
            "marathi" => self.marathi = value.to_string(),
            "hindi" => self.hindi = value.to_string(),
            "english" => self.english = value.to_string(),
            "math" => self.math = value.to_string(),
            "science" => self.science = value.to_string(),
            other => return Err(GridError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}
