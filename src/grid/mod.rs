//! Row/cell grid consumed by the extractor
//!
//! A [`Grid`] hands out rows by 0-based index. A row that was never written
//! is `None`, and so is a cell that was never written; a cell that exists but
//! holds nothing is [`CellValue::Blank`]. The extractor treats these two
//! cases differently, so grid implementations must keep them apart.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Foreground colour of a cell's pattern fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillColor {
    /// ARGB hex, e.g. `FF7030A0`
    Rgb(String),
    Theme(u32),
    Indexed(u32),
    Auto,
}

/// Cached result of a formula cell
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaResult {
    Number(f64),
    Text(String),
    Bool(bool),
    Error(String),
    /// No cached value was stored with the formula
    Missing,
}

/// Typed value of a cell that exists
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    /// Numeric cell carrying a date number format
    Date(NaiveDateTime),
    Bool(bool),
    Formula(FormulaResult),
    Error(String),
    /// Anything the reader could not classify (durations, rich data, ...)
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    value: CellValue,
    fill: Option<FillColor>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self { value, fill: None }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(CellValue::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::new(CellValue::Number(n))
    }

    pub fn blank() -> Self {
        Self::new(CellValue::Blank)
    }

    pub fn with_fill(mut self, fill: FillColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn fill(&self) -> Option<&FillColor> {
        self.fill.as_ref()
    }
}

/// Sparse row keyed by 0-based column index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<u32, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, cell)` pairs
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (u32, Cell)>,
    {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn set_cell(&mut self, column: u32, cell: Cell) {
        self.cells.insert(column, cell);
    }

    pub fn cell(&self, column: u32) -> Option<&Cell> {
        self.cells.get(&column)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Read access to a single sheet
pub trait Grid {
    /// Index of the last populated row, `None` for a sheet with no rows
    fn last_row(&self) -> Option<u32>;

    fn row(&self, index: u32) -> Option<&Row>;

    /// Whether `row` opens a new benefit group.
    ///
    /// The default reads presentation metadata: the cell at `column` has a
    /// fill foreground colour, whatever the colour is.
    fn is_group_marker(&self, row: &Row, column: u32) -> bool {
        row.cell(column).is_some_and(|cell| cell.fill().is_some())
    }
}

/// In-memory sheet, used both for loaded workbooks and test fixtures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: BTreeMap<u32, Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_row(&mut self, index: u32, row: Row) {
        self.rows.insert(index, row);
    }

    /// Row at `index`, created empty if it does not exist yet
    pub fn row_mut(&mut self, index: u32) -> &mut Row {
        self.rows.entry(index).or_default()
    }

    pub fn set_cell(&mut self, row: u32, column: u32, cell: Cell) {
        self.row_mut(row).set_cell(column, cell);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Grid for Sheet {
    fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_blank_cells_differ() {
        let row = Row::from_cells([(0, Cell::blank())]);
        assert_eq!(row.cell(0).map(Cell::value), Some(&CellValue::Blank));
        assert!(row.cell(1).is_none());
    }

    #[test]
    fn test_last_row_tracks_highest_index() {
        let mut sheet = Sheet::new("Plans");
        assert_eq!(sheet.last_row(), None);

        sheet.set_cell(4, 0, Cell::text("x"));
        sheet.set_cell(2, 0, Cell::text("y"));
        assert_eq!(sheet.last_row(), Some(4));
        assert!(sheet.row(3).is_none());
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_default_marker_reads_fill() {
        let sheet = Sheet::new("Plans");
        let filled = Row::from_cells([(0, Cell::text("Dental").with_fill(FillColor::Theme(4)))]);
        let plain = Row::from_cells([(0, Cell::text("Dental"))]);

        assert!(sheet.is_group_marker(&filled, 0));
        assert!(!sheet.is_group_marker(&plain, 0));
        assert!(!sheet.is_group_marker(&filled, 1));
    }
}
