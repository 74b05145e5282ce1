use crate::error::ScopexError;
use crate::extraction::{BBox, PageLayout, PdfExtractor, TextContainer, TextLine};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports every word with its box,
/// grouped into lines and blocks. Blocks become text containers.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageLayout>, ScopexError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| ScopexError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| ScopexError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ScopexError::PdftotextNotFound
                } else {
                    ScopexError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ScopexError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_layout(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse the XHTML written by `pdftotext -bbox-layout`.
///
/// Pages are numbered from 1 in document order. Empty words, lines and
/// blocks are dropped; empty pages are kept so numbering stays aligned.
pub fn parse_bbox_layout(xml: &str) -> Result<Vec<PageLayout>, ScopexError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages = Vec::new();
    let mut page: Option<PageLayout> = None;
    let mut block: Option<Vec<TextLine>> = None;
    let mut line: Option<Vec<(String, BBox)>> = None;
    let mut word: Option<(String, BBox)> = None;

    loop {
        match reader.read_event().map_err(layout_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    page = Some(PageLayout {
                        page_number: pages.len() + 1,
                        containers: Vec::new(),
                    })
                }
                b"block" => block = Some(Vec::new()),
                b"line" => line = Some(Vec::new()),
                b"word" => word = Some((String::new(), parse_bbox(&e)?)),
                _ => {}
            },
            Event::Text(t) => {
                if let Some((text, _)) = word.as_mut() {
                    text.push_str(&t.unescape().map_err(layout_error)?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let (Some((text, bbox)), Some(words)) = (word.take(), line.as_mut()) {
                        let text = text.trim();
                        if !text.is_empty() {
                            words.push((text.to_string(), bbox));
                        }
                    }
                }
                b"line" => {
                    if let (Some(words), Some(lines)) = (line.take(), block.as_mut()) {
                        if !words.is_empty() {
                            lines.push(TextLine::from_words(&words));
                        }
                    }
                }
                b"block" => {
                    if let (Some(lines), Some(p)) = (block.take(), page.as_mut()) {
                        if !lines.is_empty() {
                            p.containers.push(TextContainer::from_lines(lines));
                        }
                    }
                }
                b"page" => pages.extend(page.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_bbox(tag: &BytesStart<'_>) -> Result<BBox, ScopexError> {
    let mut coords: [Option<f64>; 4] = [None; 4];
    for attr in tag.attributes() {
        let attr = attr.map_err(layout_error)?;
        let slot = match attr.key.as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        let value = attr.unescape_value().map_err(layout_error)?;
        let parsed = value.trim().parse::<f64>().map_err(|e| {
            ScopexError::Layout(format!("bad coordinate '{}': {}", value, e))
        })?;
        coords[slot] = Some(parsed);
    }

    match coords {
        [Some(x0), Some(y0), Some(x1), Some(y1)] => Ok(BBox::new(x0, y0, x1, y1)),
        _ => Err(ScopexError::Layout(
            "word without a complete bounding box".into(),
        )),
    }
}

fn layout_error(e: impl std::fmt::Display) -> ScopexError {
    ScopexError::Layout(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title>Acme Sustainability Report</title>
<meta name="Producer" content="Acme Publisher"/>
</head>
<body>
<doc>
  <page width="595.276000" height="841.890000">
    <flow>
      <block xMin="10.0" yMin="100.0" xMax="100.0" yMax="110.0">
        <line xMin="10.0" yMin="100.0" xMax="100.0" yMax="110.0">
          <word xMin="10.0" yMin="100.0" xMax="40.0" yMax="110.0">Scope</word>
          <word xMin="42.0" yMin="100.0" xMax="46.0" yMax="110.0">1</word>
          <word xMin="50.0" yMin="100.0" xMax="80.0" yMax="110.0">12,345</word>
        </line>
        <line xMin="10.0" yMin="112.0" xMax="60.0" yMax="122.0">
          <word xMin="10.0" yMin="112.0" xMax="30.0" yMax="122.0">R&amp;D</word>
          <word xMin="32.0" yMin="112.0" xMax="60.0" yMax="122.0">CO2</word>
        </line>
      </block>
      <block xMin="10.0" yMin="200.0" xMax="50.0" yMax="210.0">
        <line xMin="10.0" yMin="200.0" xMax="50.0" yMax="210.0">
          <word xMin="10.0" yMin="200.0" xMax="50.0" yMax="210.0">FY21</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="595.276000" height="841.890000">
  </page>
  <page width="595.276000" height="841.890000">
    <flow>
      <block xMin="1.0" yMin="1.0" xMax="9.0" yMax="9.0">
        <line xMin="1.0" yMin="1.0" xMax="9.0" yMax="9.0">
          <word xMin="1.0" yMin="1.0" xMax="9.0" yMax="9.0">end</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_pages_blocks_lines() {
        let pages = parse_bbox_layout(SAMPLE).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].containers.len(), 2);
        assert_eq!(pages[0].containers[0].lines.len(), 2);
        assert_eq!(pages[0].containers[0].lines[0].text(), "Scope 1 12,345");
        assert_eq!(pages[0].containers[1].text(), "FY21");
        assert!(pages[1].containers.is_empty());
        assert_eq!(pages[2].page_number, 3);
    }

    #[test]
    fn test_word_boxes_and_entities() {
        let pages = parse_bbox_layout(SAMPLE).unwrap();
        let line = &pages[0].containers[0].lines[1];
        assert_eq!(line.text(), "R&D CO2");
        let first = line.elements[0].bbox().unwrap();
        assert_eq!(*first, BBox::new(10.0, 112.0, 30.0, 122.0));
        assert_eq!(line.bbox, BBox::new(10.0, 112.0, 60.0, 122.0));
    }

    #[test]
    fn test_missing_coordinate_is_error() {
        let xml = r#"<doc><page><flow><block><line>
            <word xMin="1.0" yMin="1.0" xMax="2.0">x</word>
        </line></block></flow></page></doc>"#;
        assert!(matches!(parse_bbox_layout(xml), Err(ScopexError::Layout(_))));
    }

    #[test]
    fn test_bad_coordinate_is_error() {
        let xml = r#"<doc><page><flow><block><line>
            <word xMin="a" yMin="1.0" xMax="2.0" yMax="3.0">x</word>
        </line></block></flow></page></doc>"#;
        assert!(parse_bbox_layout(xml).is_err());
    }

    #[test]
    fn test_is_available_does_not_panic() {
        let _ = PdftotextExtractor::is_available();
    }
}
