//! The tabular result every analyzer returns.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial TabularResult (named/default index, typed cells)

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::collections::HashMap;

/// One typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Zone-aware timestamp.
    Timestamp(DateTime<FixedOffset>),
    /// Naive (zone-stripped) timestamp.
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Drop the zone from a zone-aware timestamp, keeping its wall-clock
    /// time. Other cells are unchanged.
    pub fn strip_timezone(&self) -> Self {
        match self {
            Self::Timestamp(dt) => Self::DateTime(dt.naive_local()),
            other => other.clone(),
        }
    }

    /// Plain string form, without locale grouping.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Timestamp(dt) => dt.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => json!(b),
            Self::Int(n) => json!(n),
            Self::Float(f) => json!(f),
            Self::Text(s) => json!(s),
            Self::Timestamp(dt) => json!(dt.to_rfc3339()),
            other => json!(other.to_plain_string()),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<FixedOffset>> for Cell {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Row labels of a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// Positional, carries no meaning; shown 1-based by the text renderers.
    Default,
    /// A meaningful key column, shown untouched.
    Named { name: String, values: Vec<Cell> },
}

/// Ordered columns of typed rows plus an index.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    index: Index,
}

impl TabularResult {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            index: Index::Default,
        }
    }

    /// Append a row; short rows are padded with `Null`, long rows truncated.
    ///
    /// Rows for a named index go through
    /// [`push_labeled_row`](Self::push_labeled_row) instead.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        debug_assert!(
            self.index == Index::Default,
            "push_row on a named index; use push_labeled_row"
        );
        row.resize(self.columns.len(), Cell::Null);
        if let Index::Named { values, .. } = &mut self.index {
            values.push(Cell::Null);
        }
        self.rows.push(row);
    }

    /// Append a row with its index label.
    ///
    /// The label is dropped when the index is the default one.
    pub fn push_labeled_row(&mut self, label: impl Into<Cell>, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        if let Index::Named { values, .. } = &mut self.index {
            values.push(label.into());
        }
        self.rows.push(row);
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    /// Move the column `name` out of the data and into a named index.
    ///
    /// Unknown column names leave the result unchanged.
    pub fn set_index(mut self, name: &str) -> Self {
        let Some(position) = self.columns.iter().position(|c| c == name) else {
            return self;
        };
        let name = self.columns.remove(position);
        let values = self.rows.iter_mut().map(|row| row.remove(position)).collect();
        self.index = Index::Named { name, values };
        self
    }

    /// Stable sort rows by a column, largest first.
    pub fn sort_descending_by(mut self, column: &str) -> Self {
        let Some(position) = self.columns.iter().position(|c| c == column) else {
            return self;
        };
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| compare_cells(&self.rows[b][position], &self.rows[a][position]));

        let mut rows: Vec<Option<Vec<Cell>>> = self.rows.into_iter().map(Some).collect();
        self.rows = order.iter().filter_map(|&i| rows[i].take()).collect();
        if let Index::Named { values, .. } = &mut self.index {
            let mut old: Vec<Option<Cell>> = values.drain(..).map(Some).collect();
            *values = order.iter().filter_map(|&i| old[i].take()).collect();
        }
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row` in `column`, if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(position)
    }

    /// Data columns preceded by the named index column, if any.
    ///
    /// This is the layout of the csv, json, and Excel renderers, which omit
    /// a default index.
    pub fn labeled_rows(&self) -> (Vec<String>, Vec<Vec<Cell>>) {
        match &self.index {
            Index::Default => (self.columns.clone(), self.rows.clone()),
            Index::Named { name, values } => {
                let mut columns = vec![name.clone()];
                columns.extend(self.columns.iter().cloned());
                let rows = values
                    .iter()
                    .zip(&self.rows)
                    .map(|(label, row)| {
                        let mut full = vec![label.clone()];
                        full.extend(row.iter().cloned());
                        full
                    })
                    .collect();
                (columns, rows)
            }
        }
    }

    /// Same data with every timestamp made zone-naive.
    pub fn without_timezones(&self) -> Self {
        let strip = |cells: &[Cell]| cells.iter().map(Cell::strip_timezone).collect::<Vec<_>>();
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().map(|row| strip(row.as_slice())).collect(),
            index: match &self.index {
                Index::Default => Index::Default,
                Index::Named { name, values } => Index::Named {
                    name: name.clone(),
                    values: strip(values.as_slice()),
                },
            },
        }
    }
}

fn compare_cells(a: &Cell, b: &Cell) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Cell::Int(x), Cell::Int(y)) => x.cmp(y),
        (Cell::Int(x), Cell::Float(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Cell::Float(x), Cell::Int(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Cell::Float(x), Cell::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Cell::Null, Cell::Null) => Ordering::Equal,
        (Cell::Null, _) => Ordering::Less,
        (_, Cell::Null) => Ordering::Greater,
        _ => a.to_plain_string().cmp(&b.to_plain_string()),
    }
}

// ============================================================================
// HEADERS
// ============================================================================

/// `foo_bar` -> `Foo Bar`; an entry in `overrides` wins for its key.
pub fn prettify_header(name: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(label) = overrides.get(name) {
        return label.clone();
    }

    let mut pretty = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for ch in name.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                pretty.extend(ch.to_lowercase());
            } else {
                pretty.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            pretty.push(ch);
            previous_is_letter = false;
        }
    }
    pretty
}
