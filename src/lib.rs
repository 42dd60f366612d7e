//! Plansheet - flatten benefit comparison sheets
//!
//! A comparison sheet groups coverage lines under benefits by colouring the
//! benefit rows, and lists one plan per column to the right. This library
//! turns the first worksheet of such a workbook into flat records, one per
//! (benefit, coverage, category, plan) with a value.
//!
//! # Example
//!
//! ```no_run
//! use plansheet::core::extract_entries;
//! use plansheet::excel::load_first_sheet;
//!
//! let sheet = load_first_sheet("Q1.xlsx")?;
//! for record in extract_entries(&sheet) {
//!     println!("{}", record);
//! }
//! # Ok::<(), plansheet::error::SheetError>(())
//! ```
//!
//! Grids do not have to come from a file; anything implementing
//! [`grid::Grid`] can be flattened, and [`grid::Sheet`] builds one in memory.

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use crate::core::{EntryExtractor, SheetLayout};
pub use error::{SheetError, SheetResult};
pub use grid::{Cell, CellValue, FillColor, FormulaResult, Grid, Row, Sheet};
pub use types::FlatRecord;
