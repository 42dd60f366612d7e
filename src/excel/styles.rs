//! Fill lookup from `xl/styles.xml`
//!
//! A cell's `s` attribute indexes `cellXfs`; the `xf` there points at a
//! `fills` entry by `fillId`. Only `patternFill/fgColor` counts as a fill
//! colour.

use crate::error::SheetResult;
use crate::grid::FillColor;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::BufRead;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    /// `fillId` per `cellXfs` entry, `None` when the xf disables fills
    xf_fills: Vec<Option<u32>>,
    /// Foreground colour per `fills` entry
    fills: Vec<Option<FillColor>>,
}

impl StyleTable {
    /// Fill foreground colour of cell style `style`, if any
    pub fn fill_for_style(&self, style: u32) -> Option<&FillColor> {
        let fill_id = (*self.xf_fills.get(style as usize)?)?;
        self.fills.get(fill_id as usize)?.as_ref()
    }

    pub fn parse<R: BufRead>(reader: R) -> SheetResult<Self> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut table = StyleTable::default();
        let mut buf = Vec::new();
        let mut in_fills = false;
        let mut in_pattern_fill = false;
        let mut in_cell_xfs = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"fills" => in_fills = true,
                    b"fill" if in_fills => table.fills.push(None),
                    b"patternFill" if in_fills => in_pattern_fill = true,
                    b"fgColor" if in_pattern_fill => table.set_last_fill(&e),
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => table.xf_fills.push(xf_fill_id(&e)),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"fill" if in_fills => table.fills.push(None),
                    b"fgColor" if in_pattern_fill => table.set_last_fill(&e),
                    b"xf" if in_cell_xfs => table.xf_fills.push(xf_fill_id(&e)),
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"fills" => in_fills = false,
                    b"patternFill" => in_pattern_fill = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    fn set_last_fill(&mut self, fg_color: &BytesStart) {
        if let Some(slot) = self.fills.last_mut() {
            *slot = Some(parse_color(fg_color));
        }
    }
}

fn xf_fill_id(e: &BytesStart) -> Option<u32> {
    let mut fill_id = 0;
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value().ok();
        match attr.key.as_ref() {
            b"fillId" => {
                fill_id = value.and_then(|v| v.parse().ok()).unwrap_or(0);
            }
            b"applyFill" => {
                if matches!(value.as_deref(), Some("0") | Some("false")) {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(fill_id)
}

/// `rgb` wins over `theme`, `theme` over `indexed`; a bare element is `Auto`
fn parse_color(e: &BytesStart) -> FillColor {
    let mut rgb = None;
    let mut theme = None;
    let mut indexed = None;

    for attr in e.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"rgb" => rgb = Some(value.to_string()),
            b"theme" => theme = value.parse().ok(),
            b"indexed" => indexed = value.parse().ok(),
            _ => {}
        }
    }

    if let Some(rgb) = rgb {
        FillColor::Rgb(rgb)
    } else if let Some(theme) = theme {
        FillColor::Theme(theme)
    } else if let Some(indexed) = indexed {
        FillColor::Indexed(indexed)
    } else {
        FillColor::Auto
    }
}
