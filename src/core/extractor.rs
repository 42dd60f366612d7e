//! Row flattening for benefit comparison sheets
//!
//! Layout assumptions, all configurable through [`SheetLayout`]:
//!
//! ```text
//!            primary        secondary                    first plan column
//!               │               │                               │
//! row 0    │ header        │ ...      │   │   │   │ Plan A   │ Plan B   │ ...
//! row 1    │ Hospital ▓▓▓▓ │          │   │   │   │          │          │      <- marker row
//! row 2    │ Room & Board  │ Daily    │   │   │   │ 500      │ 1000     │
//! row 3    │               │ Max      │   │   │   │ 10000    │          │
//! ```
//!
//! A marker row sets the benefit for every row below it until the next
//! marker. A non-null primary cell sets the coverage; a null one keeps the
//! coverage of the row above. Plan cells are read left to right and the scan
//! ends at the first null cell.

use crate::core::normalizer::{is_empty, normalize};
use crate::grid::{Grid, Row};
use crate::types::{BenefitSummary, FlatRecord};
use tracing::{debug, trace};

/// Rows above this index are headers
pub const HEADER_ROWS: u32 = 1;
/// Column holding benefit (marker rows) and coverage labels
pub const PRIMARY_COLUMN: u32 = 0;
/// Column holding the category of a coverage line
pub const SECONDARY_COLUMN: u32 = 1;
/// First plan value column (column F)
pub const FIRST_PLAN_COLUMN: u32 = 5;

/// Column positions of the template, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub header_rows: u32,
    pub primary_column: u32,
    pub secondary_column: u32,
    pub first_plan_column: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: HEADER_ROWS,
            primary_column: PRIMARY_COLUMN,
            secondary_column: SECONDARY_COLUMN,
            first_plan_column: FIRST_PLAN_COLUMN,
        }
    }
}

/// Labels carried from row to row during one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupContext {
    pub benefit: String,
    pub coverage: String,
}

/// What a single row contributed during extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Row without cells, context untouched
    Skipped,
    /// Benefit marker row
    Marker,
    /// Coverage row; `new_coverage` when its primary cell was present
    Line { new_coverage: bool, records: usize },
}

/// Flattens a grid into [`FlatRecord`]s
#[derive(Debug, Clone, Default)]
pub struct EntryExtractor {
    layout: SheetLayout,
}

impl EntryExtractor {
    pub fn new(layout: SheetLayout) -> Self {
        Self { layout }
    }

    /// Extract all records, in row order then plan order
    pub fn extract<G: Grid + ?Sized>(&self, grid: &G) -> Vec<FlatRecord> {
        let mut records = Vec::new();
        let mut context = GroupContext::default();

        let Some(last_row) = grid.last_row() else {
            return records;
        };

        for index in self.layout.header_rows..=last_row {
            let Some(row) = grid.row(index) else {
                continue;
            };
            self.process_row(grid, index, row, &mut context, &mut records);
        }

        debug!(records = records.len(), last_row, "extraction finished");
        records
    }

    /// Per-group coverage line and record counts, one entry per marker row
    ///
    /// Rows above the first marker form a leading group with an empty
    /// benefit, listed only when it has a coverage line or a record.
    pub fn summarize<G: Grid + ?Sized>(&self, grid: &G) -> Vec<BenefitSummary> {
        let mut summaries: Vec<BenefitSummary> = Vec::new();
        let mut context = GroupContext::default();
        let mut records = Vec::new();

        let Some(last_row) = grid.last_row() else {
            return summaries;
        };

        for index in self.layout.header_rows..=last_row {
            let Some(row) = grid.row(index) else {
                continue;
            };
            match self.process_row(grid, index, row, &mut context, &mut records) {
                RowOutcome::Skipped => {}
                RowOutcome::Marker => {
                    summaries.push(BenefitSummary::new(context.benefit.clone()));
                }
                RowOutcome::Line {
                    new_coverage,
                    records: emitted,
                } => {
                    if !new_coverage && emitted == 0 {
                        continue;
                    }
                    if summaries.is_empty() {
                        summaries.push(BenefitSummary::new(String::new()));
                    }
                    if let Some(summary) = summaries.last_mut() {
                        if new_coverage {
                            summary.coverage_lines += 1;
                        }
                        summary.records += emitted;
                    }
                }
            }
        }

        debug!(groups = summaries.len(), records = records.len(), "summary finished");
        summaries
    }

    /// Apply one row to `context` and append its records to `out`
    pub fn process_row<G: Grid + ?Sized>(
        &self,
        grid: &G,
        index: u32,
        row: &Row,
        context: &mut GroupContext,
        out: &mut Vec<FlatRecord>,
    ) -> RowOutcome {
        if row.is_empty() {
            return RowOutcome::Skipped;
        }

        let primary = row.cell(self.layout.primary_column);

        if grid.is_group_marker(row, self.layout.primary_column) {
            context.benefit = normalize(primary);
            debug!(row = index, benefit = %context.benefit, "benefit marker");
            return RowOutcome::Marker;
        }

        let new_coverage = primary.is_some();
        if new_coverage {
            context.coverage = normalize(primary);
        }

        let category = normalize(row.cell(self.layout.secondary_column));

        let before = out.len();
        let mut column = self.layout.first_plan_column;
        let mut ordinal = 1;
        while let Some(cell) = row.cell(column) {
            if !is_empty(Some(cell)) {
                let record = FlatRecord::new(
                    context.benefit.clone(),
                    context.coverage.clone(),
                    category.clone(),
                    FlatRecord::plan_label(ordinal),
                    normalize(Some(cell)),
                );
                trace!(row = index, column, "{}", record);
                out.push(record);
            }
            column += 1;
            ordinal += 1;
        }

        RowOutcome::Line {
            new_coverage,
            records: out.len() - before,
        }
    }
}

/// Extract with the default template layout
pub fn extract_entries<G: Grid + ?Sized>(grid: &G) -> Vec<FlatRecord> {
    EntryExtractor::default().extract(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, FillColor, Sheet};

    fn marker(label: &str) -> Row {
        Row::from_cells([(0, Cell::text(label).with_fill(FillColor::Rgb("FF7030A0".into())))])
    }

    #[test]
    fn test_header_row_is_skipped() {
        let mut sheet = Sheet::new("Plans");
        sheet.set_row(
            0,
            Row::from_cells([(0, Cell::text("Benefit")), (5, Cell::text("Plan A"))]),
        );
        assert!(extract_entries(&sheet).is_empty());
    }

    #[test]
    fn test_empty_sheet_yields_nothing() {
        assert!(extract_entries(&Sheet::new("Plans")).is_empty());
    }

    #[test]
    fn test_marker_row_plan_cells_are_ignored() {
        let mut sheet = Sheet::new("Plans");
        let mut row = marker("Vision");
        row.set_cell(5, Cell::number(1.0));
        sheet.set_row(1, row);

        assert!(extract_entries(&sheet).is_empty());
    }

    #[test]
    fn test_row_without_cells_keeps_context() {
        let mut sheet = Sheet::new("Plans");
        sheet.set_row(1, marker("Vision"));
        sheet.set_row(
            2,
            Row::from_cells([(0, Cell::text("Exam")), (5, Cell::number(1.0))]),
        );
        sheet.set_row(3, Row::new());
        sheet.set_row(4, Row::from_cells([(5, Cell::number(2.0))]));

        let records = extract_entries(&sheet);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].benefit, "Vision");
        assert_eq!(records[1].coverage, "Exam");
    }

    #[test]
    fn test_process_row_updates_context() {
        let sheet = Sheet::new("Plans");
        let extractor = EntryExtractor::default();
        let mut context = GroupContext::default();
        let mut out = Vec::new();

        let outcome = extractor.process_row(&sheet, 1, &marker("Dental"), &mut context, &mut out);
        assert_eq!(outcome, RowOutcome::Marker);
        assert_eq!(context.benefit, "Dental");
        assert!(out.is_empty());

        let row = Row::from_cells([(0, Cell::text("Cleaning")), (5, Cell::number(80.0))]);
        let outcome = extractor.process_row(&sheet, 2, &row, &mut context, &mut out);
        assert_eq!(
            outcome,
            RowOutcome::Line {
                new_coverage: true,
                records: 1
            }
        );
        assert_eq!(context.coverage, "Cleaning");
        assert_eq!(
            out,
            vec![FlatRecord::new("Dental", "Cleaning", "", "Plan 1", "80")]
        );
    }

    #[test]
    fn test_process_row_outcome_for_continuation_and_empty_rows() {
        let sheet = Sheet::new("Plans");
        let extractor = EntryExtractor::default();
        let mut context = GroupContext::default();
        let mut out = Vec::new();

        let row = Row::from_cells([(1, Cell::text("Max")), (5, Cell::blank())]);
        assert_eq!(
            extractor.process_row(&sheet, 1, &row, &mut context, &mut out),
            RowOutcome::Line {
                new_coverage: false,
                records: 0
            }
        );
        assert_eq!(
            extractor.process_row(&sheet, 2, &Row::new(), &mut context, &mut out),
            RowOutcome::Skipped
        );
    }

    #[test]
    fn test_custom_layout() {
        let layout = SheetLayout {
            header_rows: 2,
            primary_column: 1,
            secondary_column: 2,
            first_plan_column: 3,
        };
        let mut sheet = Sheet::new("Plans");
        sheet.set_row(1, Row::from_cells([(1, Cell::text("ignored")), (3, Cell::number(9.0))]));
        sheet.set_row(
            2,
            Row::from_cells([
                (1, Cell::text("Maternity")),
                (2, Cell::text("Normal")),
                (3, Cell::number(2000.0)),
            ]),
        );

        let records = EntryExtractor::new(layout).extract(&sheet);
        assert_eq!(
            records,
            vec![FlatRecord::new("", "Maternity", "Normal", "Plan 1", "2000")]
        );
    }
}
