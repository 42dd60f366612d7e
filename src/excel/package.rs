//! Part lookup inside the xlsx zip package

use crate::error::{SheetError, SheetResult};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Seek};
use zip::ZipArchive;

pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const STYLES_PART: &str = "xl/styles.xml";

/// A worksheet entry of `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    /// Part path inside the package, e.g. `xl/worksheets/sheet1.xml`
    pub path: String,
}

/// Worksheets in workbook order
pub fn sheet_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> SheetResult<Vec<SheetEntry>> {
    let sheets = {
        let file = archive
            .by_name(WORKBOOK_PART)
            .map_err(|_| SheetError::MissingPart(WORKBOOK_PART.into()))?;
        read_sheet_ids(BufReader::new(file))?
    };

    let rels = {
        let file = archive
            .by_name(WORKBOOK_RELS_PART)
            .map_err(|_| SheetError::MissingPart(WORKBOOK_RELS_PART.into()))?;
        read_worksheet_rels(BufReader::new(file))?
    };

    Ok(sheets
        .into_iter()
        .filter_map(|(name, r_id)| {
            rels.get(&r_id).map(|path| SheetEntry {
                name,
                path: path.clone(),
            })
        })
        .collect())
}

/// `(name, r:id)` of each `<sheet>`
fn read_sheet_ids<R: BufRead>(reader: R) -> SheetResult<Vec<(String, String)>> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut r_id = None;

                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => name = attr.unescape_value().ok().map(|s| s.to_string()),
                        b"id" => r_id = attr.unescape_value().ok().map(|s| s.to_string()),
                        _ => {}
                    }
                }

                if let (Some(name), Some(r_id)) = (name, r_id) {
                    sheets.push((name, r_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Relationship id → worksheet part path
fn read_worksheet_rels<R: BufRead>(reader: R) -> SheetResult<HashMap<String, String>> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;

                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().ok().map(|s| s.to_string());
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Target" => target = value,
                        b"Type" => rel_type = value,
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        rels.insert(id, resolve_target(&target));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Targets are relative to `xl/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_ids_in_workbook_order() {
        let xml = r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Comparison" sheetId="3" r:id="rId2"/>
    <sheet name="Notes" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#;

        let sheets = read_sheet_ids(xml.as_bytes()).unwrap();
        assert_eq!(
            sheets,
            vec![
                ("Comparison".to_string(), "rId2".to_string()),
                ("Notes".to_string(), "rId1".to_string()),
            ]
        );
    }

    #[test]
    fn test_worksheet_rels_only() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

        let rels = read_worksheet_rels(xml.as_bytes()).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId1"], "xl/worksheets/sheet1.xml");
        assert_eq!(rels["rId2"], "xl/worksheets/sheet2.xml");
    }
}
