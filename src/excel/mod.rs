//! Excel (.xlsx) grid loader
//!
//! Values are read with calamine; cell presence, style indices and fills
//! are read from the package parts directly:
//! - `package`: workbook/relationship lookup of worksheet parts
//! - `sheet_xml`: which rows and cells physically exist
//! - `styles`: `cellXfs` → pattern fill foreground colour

mod importer;
mod package;
mod sheet_xml;
mod styles;

pub use importer::{build_sheet, load_first_sheet, SheetImporter};
pub use package::{sheet_entries, SheetEntry};
pub use sheet_xml::{parse_cell_ref, CellMap, CellMeta};
pub use styles::StyleTable;
