//! Excel importer implementation - first worksheet (.xlsx) → [`Sheet`]

use crate::error::{SheetError, SheetResult};
use crate::excel::package::{sheet_entries, SheetEntry, STYLES_PART};
use crate::excel::sheet_xml::{CellMap, CellMeta};
use crate::excel::styles::StyleTable;
use crate::grid::{Cell, CellValue, FormulaResult, Sheet};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Loads the first worksheet of an .xlsx file into an in-memory grid
pub struct SheetImporter {
    path: PathBuf,
}

impl SheetImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn import(&self) -> SheetResult<Sheet> {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let entry = sheet_entries(&mut archive)?
            .into_iter()
            .next()
            .ok_or(SheetError::NoSheets)?;
        debug!(sheet = %entry.name, part = %entry.path, "reading first worksheet");

        let styles = read_styles(&mut archive)?;
        let cells = read_cell_map(&mut archive, &entry)?;

        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let values = workbook.worksheet_range(&entry.name)?;

        let sheet = build_sheet(&entry.name, &cells, &values, &styles);
        debug!(rows = sheet.row_count(), "worksheet loaded");
        Ok(sheet)
    }
}

/// Shorthand for `SheetImporter::new(path).import()`
pub fn load_first_sheet<P: AsRef<Path>>(path: P) -> SheetResult<Sheet> {
    SheetImporter::new(path).import()
}

fn read_styles(archive: &mut ZipArchive<BufReader<File>>) -> SheetResult<StyleTable> {
    match archive.by_name(STYLES_PART) {
        Ok(file) => StyleTable::parse(BufReader::new(file)),
        // No styles part is valid: nothing is filled
        Err(_) => Ok(StyleTable::default()),
    }
}

fn read_cell_map(
    archive: &mut ZipArchive<BufReader<File>>,
    entry: &SheetEntry,
) -> SheetResult<CellMap> {
    let file = archive
        .by_name(&entry.path)
        .map_err(|_| SheetError::MissingPart(entry.path.clone()))?;
    CellMap::parse(BufReader::new(file))
}

/// Keep exactly the cells present in `cells`, valued from `values`
pub fn build_sheet(name: &str, cells: &CellMap, values: &Range<Data>, styles: &StyleTable) -> Sheet {
    let mut sheet = Sheet::new(name);

    for (row_index, row_cells) in cells.rows() {
        let row = sheet.row_mut(row_index);
        for (&column, meta) in row_cells {
            let data = values.get_value((row_index, column));
            let mut cell = Cell::new(convert_value(data, meta));
            if let Some(fill) = styles.fill_for_style(meta.style) {
                cell = cell.with_fill(fill.clone());
            }
            row.set_cell(column, cell);
        }
    }

    sheet
}

fn convert_value(data: Option<&Data>, meta: &CellMeta) -> CellValue {
    let Some(data) = data else {
        return if meta.formula {
            CellValue::Formula(FormulaResult::Missing)
        } else {
            CellValue::Blank
        };
    };

    if meta.formula {
        return CellValue::Formula(convert_formula_result(data));
    }

    match data {
        Data::Empty => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Date(datetime),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(datetime) => CellValue::Date(datetime),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(_) => CellValue::Other,
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// Formula cells expose their cached result; date formatting is not applied
fn convert_formula_result(data: &Data) -> FormulaResult {
    match data {
        Data::Float(f) => FormulaResult::Number(*f),
        Data::Int(i) => FormulaResult::Number(*i as f64),
        Data::DateTime(dt) => FormulaResult::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            FormulaResult::Text(s.clone())
        }
        Data::Bool(b) => FormulaResult::Bool(*b),
        Data::Error(e) => FormulaResult::Error(e.to_string()),
        Data::Empty => FormulaResult::Missing,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
