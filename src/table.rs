//! In-memory editable row grid shared by the entry pages: per-cell edit,
//! append-blank-row, delete-row, and contiguous 1-based renumbering after
//! every structural change.

use uuid::Uuid;

/// Reserved prefix marking client-minted row keys for rows that have never
/// been persisted. Server-issued ids never start with it.
pub const SYNTHETIC_PREFIX: &str = "new-";

pub fn synthetic_id() -> String {
    format!("{SYNTHETIC_PREFIX}{}", Uuid::new_v4())
}

pub fn is_synthetic(id: &str) -> bool {
    id.starts_with(SYNTHETIC_PREFIX)
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GridError {
    #[error("row {0} out of range")]
    RowOutOfRange(usize),
    #[error("name can only be edited on new rows")]
    NameLocked,
    #[error("unknown field: {0}")]
    UnknownField(String),
}

pub trait GridRow {
    /// Fresh row with a synthetic id and blank fields.
    fn blank() -> Self;
    fn id(&self) -> &str;
    fn set_seq(&mut self, seq: usize);
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), GridError>;
}

#[derive(Debug, Clone)]
pub struct Grid<R> {
    rows: Vec<R>,
}

impl<R: GridRow> Grid<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Replace the whole edit buffer, e.g. after a roster fetch.
    pub fn reset(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.renumber();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// No value validation here; numeric bounds are enforced at the input
    /// control, coercion at save time.
    pub fn edit_cell(&mut self, row: usize, field: &str, value: &str) -> Result<(), GridError> {
        let r = self
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange(row))?;
        r.set_field(field, value)
    }

    /// Append a blank synthetic row; returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(R::blank());
        self.renumber();
        self.rows.len() - 1
    }

    pub fn delete_row(&mut self, row: usize) -> Result<R, GridError> {
        if row >= self.rows.len() {
            return Err(GridError::RowOutOfRange(row));
        }
        let removed = self.rows.remove(row);
        self.renumber();
        Ok(removed)
    }

    fn renumber(&mut self) {
        for (i, r) in self.rows.iter_mut().enumerate() {
            r.set_seq(i + 1);
        }
    }
}

impl<R: GridRow> Default for Grid<R> {
    fn default() -> Self {
        Self::new()
    }
}
