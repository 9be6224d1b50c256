//! PBN XML: the `puzzleset` document format used by webpbn exports.

use crate::domain::model::{ClueLine, Puzzle};
use crate::utils::error::{NonogramError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const PBN_HEADER: &str =
    "<?xml version=\"1.0\"?>\n<!DOCTYPE pbn SYSTEM \"https://webpbn.com/pbn-0.3.dtd\">\n";

/// (name, char, hex) of the two colors every scraped puzzle uses.
const COLORS: [(&str, &str, &str); 2] = [("white", ".", "FFFFFF"), ("black", "X", "000000")];

/// Well formed, has a `puzzle` element and at least a row and a column clue group.
pub fn has_puzzle_structure(content: &str) -> bool {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = match roxmltree::Document::parse_with_options(content, options) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("XML content does not parse: {}", e);
            return false;
        }
    };

    let root = doc.root_element();
    let has_puzzle = root
        .descendants()
        .skip(1)
        .any(|node| node.has_tag_name("puzzle"));
    let clue_groups = root
        .descendants()
        .skip(1)
        .filter(|node| node.has_tag_name("clues"))
        .count();

    has_puzzle && clue_groups >= 2
}

fn serialization_error(e: impl std::fmt::Display) -> NonogramError {
    NonogramError::SerializationError {
        message: e.to_string(),
    }
}

struct PbnWriter {
    inner: Writer<Vec<u8>>,
}

impl PbnWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(serialization_error)
    }

    fn open(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>text</name>`, or `<name/>` when the text is empty.
    fn text_element(&mut self, start: BytesStart<'_>, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.event(Event::Empty(start));
        }
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        self.open(start)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(&name)
    }

    fn clue_group(&mut self, kind: &str, lines: &[ClueLine]) -> Result<()> {
        self.open(BytesStart::new("clues").with_attributes([("type", kind)]))?;
        for line in lines {
            if line.is_empty() {
                self.event(Event::Empty(BytesStart::new("line")))?;
                continue;
            }
            self.open(BytesStart::new("line"))?;
            for clue in line {
                self.text_element(BytesStart::new("count"), &clue.to_string())?;
            }
            self.close("line")?;
        }
        self.close("clues")
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(serialization_error)
    }
}

pub fn render(puzzle: &Puzzle) -> Result<String> {
    let mut w = PbnWriter::new();

    w.open(BytesStart::new("puzzleset"))?;
    w.open(BytesStart::new("puzzle").with_attributes([("type", "grid"), ("defaultcolor", "black")]))?;

    w.text_element(BytesStart::new("title"), &puzzle.title)?;
    w.text_element(BytesStart::new("author"), &puzzle.author)?;
    w.text_element(BytesStart::new("authorid"), &puzzle.authorid)?;
    w.text_element(BytesStart::new("copyright"), &puzzle.copyright)?;
    w.text_element(BytesStart::new("id"), &format!("#{} (v.1)", puzzle.id))?;
    w.text_element(BytesStart::new("description"), &puzzle.description)?;
    w.text_element(BytesStart::new("note"), &puzzle.note)?;

    for (name, ch, hex) in COLORS {
        w.text_element(
            BytesStart::new("color").with_attributes([("name", name), ("char", ch)]),
            hex,
        )?;
    }

    w.clue_group("columns", &puzzle.column_clues)?;
    w.clue_group("rows", &puzzle.row_clues)?;

    w.close("puzzle")?;
    w.close("puzzleset")?;

    let body = w.finish()?;
    Ok(format!("{}{}\n", PBN_HEADER, body))
}
