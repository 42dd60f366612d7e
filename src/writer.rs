use crate::error::SheetResult;
use crate::types::FlatRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write one reference line per record
pub fn write_records<W: Write>(out: &mut W, records: &[FlatRecord]) -> SheetResult<()> {
    for record in records {
        writeln!(out, "{}", record)?;
    }
    out.flush()?;
    Ok(())
}

/// Write records to `path`, replacing any existing file
pub fn write_records_to_file(path: &Path, records: &[FlatRecord]) -> SheetResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_records(&mut out, records)
}
