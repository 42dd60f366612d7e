//! Cell presence scan of a worksheet part
//!
//! calamine hands back a dense value range, which cannot tell a cell that
//! was never written from a written-but-blank one. This pass reads the
//! `<row>`/`<c>` elements themselves to recover that, along with each
//! cell's style index and whether it holds a formula.

use crate::error::SheetResult;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMeta {
    /// Index into `cellXfs`; 0 when the cell has no `s` attribute
    pub style: u32,
    pub formula: bool,
}

/// Rows and cells physically present in the worksheet, 0-based
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMap {
    rows: BTreeMap<u32, BTreeMap<u32, CellMeta>>,
}

impl CellMap {
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u32, CellMeta>)> {
        self.rows.iter().map(|(index, cells)| (*index, cells))
    }

    pub fn cell(&self, row: u32, column: u32) -> Option<&CellMeta> {
        self.rows.get(&row)?.get(&column)
    }

    pub fn parse<R: BufRead>(reader: R) -> SheetResult<Self> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut map = CellMap::default();
        let mut buf = Vec::new();
        let mut row: Option<u32> = None;
        let mut last_column: Option<u32> = None;
        // Cell being read between <c> and </c>
        let mut open_cell: Option<(u32, u32, CellMeta)> = None;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => {
                        let index = start_row(&e, row);
                        map.rows.entry(index).or_default();
                        row = Some(index);
                        last_column = None;
                    }
                    b"c" => {
                        let (r, c, meta) = read_cell(&e, row, last_column);
                        open_cell = Some((r, c, meta));
                    }
                    b"f" => {
                        if let Some((_, _, meta)) = open_cell.as_mut() {
                            meta.formula = true;
                        }
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => {
                        let index = start_row(&e, row);
                        map.rows.entry(index).or_default();
                        row = Some(index);
                        last_column = None;
                    }
                    b"c" => {
                        let (r, c, meta) = read_cell(&e, row, last_column);
                        map.insert(r, c, meta);
                        row = Some(r);
                        last_column = Some(c);
                    }
                    b"f" => {
                        if let Some((_, _, meta)) = open_cell.as_mut() {
                            meta.formula = true;
                        }
                    }
                    _ => {}
                },
                Event::End(e) if e.local_name().as_ref() == b"c" => {
                    if let Some((r, c, meta)) = open_cell.take() {
                        map.insert(r, c, meta);
                        row = Some(r);
                        last_column = Some(c);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    fn insert(&mut self, row: u32, column: u32, meta: CellMeta) {
        self.rows.entry(row).or_default().insert(column, meta);
    }
}

/// Row index from `r` (1-based), or the row after `previous`
fn start_row(e: &BytesStart, previous: Option<u32>) -> u32 {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"r")
        .and_then(|attr| attr.unescape_value().ok()?.parse::<u32>().ok())
        .and_then(|r| r.checked_sub(1))
        .unwrap_or_else(|| previous.map_or(0, |p| p + 1))
}

fn read_cell(e: &BytesStart, row: Option<u32>, last_column: Option<u32>) -> (u32, u32, CellMeta) {
    let mut position = None;
    let mut meta = CellMeta::default();

    for attr in e.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"r" => position = parse_cell_ref(&value),
            b"s" => meta.style = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    let (r, c) = position.unwrap_or_else(|| {
        (
            row.unwrap_or(0),
            last_column.map_or(0, |column| column + 1),
        )
    });
    (r, c, meta)
}

/// `"B3"` → `(2, 1)`, 0-based (row, column)
pub fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|ch: char| ch.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut column: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }

    let row: u32 = digits.parse().ok()?;
    Some((row.checked_sub(1)?, column - 1))
}
