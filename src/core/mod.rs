pub mod extractor;
pub mod normalizer;

pub use extractor::{extract_entries, EntryExtractor, GroupContext, RowOutcome, SheetLayout};
pub use normalizer::{is_empty, normalize, normalize_value};
