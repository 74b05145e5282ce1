use crate::extraction::{BBox, LineElement, TextLine};
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Range;

/// A whitespace-delimited token of a line with its box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// Concatenated line text plus the byte range each element occupies in it.
struct LineText<'a> {
    line: &'a TextLine,
    text: String,
    ranges: Vec<Range<usize>>,
}

impl<'a> LineText<'a> {
    fn new(line: &'a TextLine) -> Self {
        let mut text = String::new();
        let mut ranges = Vec::with_capacity(line.elements.len());
        for element in &line.elements {
            let start = text.len();
            text.push_str(element.text());
            ranges.push(start..text.len());
        }
        LineText { line, text, ranges }
    }

    /// Union box of the glyphs covering bytes `start..end`.
    ///
    /// Returns `None` when the range holds no glyph, or when a glyph in
    /// range has unusable geometry.
    fn span_bbox(&self, start: usize, end: usize) -> Option<BBox> {
        let mut bbox: Option<BBox> = None;
        for (element, range) in self.line.elements.iter().zip(&self.ranges) {
            if range.start >= end || range.end <= start {
                continue;
            }
            if let LineElement::Glyph { bbox: glyph, .. } = element {
                if !glyph.is_well_formed() {
                    return None;
                }
                bbox = Some(match bbox {
                    Some(b) => b.union(glyph),
                    None => *glyph,
                });
            }
        }
        bbox
    }
}

/// Find every occurrence of any keyword in `line` and return one box per
/// distinct occurrence, in line order.
///
/// Matching is a case-sensitive substring search. Occurrences whose glyphs
/// carry no usable geometry are skipped.
pub fn locate_keywords<S: AsRef<str>>(line: &TextLine, keywords: &[S]) -> Vec<BBox> {
    let line_text = LineText::new(line);

    let mut spans = BTreeSet::new();
    for keyword in keywords {
        let keyword = keyword.as_ref();
        if keyword.is_empty() {
            continue;
        }
        for (start, matched) in line_text.text.match_indices(keyword) {
            spans.insert((start, start + matched.len()));
        }
    }

    let mut boxes: Vec<BBox> = Vec::new();
    for (start, end) in spans {
        match line_text.span_bbox(start, end) {
            Some(bbox) => {
                if !boxes.contains(&bbox) {
                    boxes.push(bbox);
                }
            }
            None => {
                tracing::debug!(
                    text = &line_text.text[start..end],
                    "skipping keyword occurrence without usable glyph geometry"
                );
            }
        }
    }
    boxes
}

/// Split a line into whitespace-delimited words with their boxes.
pub fn line_words(line: &TextLine) -> Vec<Word> {
    let line_text = LineText::new(line);
    let text = line_text.text.as_str();

    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                push_word(&line_text, s, i, &mut words);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push_word(&line_text, s, text.len(), &mut words);
    }
    words
}

fn push_word(line_text: &LineText<'_>, start: usize, end: usize, words: &mut Vec<Word>) {
    if let Some(bbox) = line_text.span_bbox(start, end) {
        words.push(Word {
            text: line_text.text[start..end].to_string(),
            bbox,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One glyph per character, 10 units wide, on a single baseline.
    fn char_line(text: &str, x: f64, y: f64) -> TextLine {
        let elements: Vec<LineElement> = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + i as f64 * 10.0;
                if c == ' ' {
                    LineElement::space()
                } else {
                    LineElement::glyph(c.to_string(), BBox::new(x0, y, x0 + 10.0, y + 10.0))
                }
            })
            .collect();
        TextLine {
            bbox: BBox::new(x, y, x + text.chars().count() as f64 * 10.0, y + 10.0),
            elements,
        }
    }

    #[test]
    fn test_locate_single_occurrence() {
        let line = char_line("Scope 1 12,345", 0.0, 100.0);
        let boxes = locate_keywords(&line, &["Scope 1"]);
        assert_eq!(boxes, vec![BBox::new(0.0, 100.0, 70.0, 110.0)]);
    }

    #[test]
    fn test_locate_multiple_occurrences() {
        let line = char_line("ab xx ab", 0.0, 0.0);
        let boxes = locate_keywords(&line, &["ab"]);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].x0, 0.0);
        assert_eq!(boxes[1].x0, 60.0);
    }

    #[test]
    fn test_duplicate_spans_collapse() {
        let line = char_line("Scope 1", 0.0, 0.0);
        let boxes = locate_keywords(&line, &["Scope 1", "Scope 1"]);
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn test_no_occurrence() {
        let line = char_line("Scope 2", 0.0, 0.0);
        assert!(locate_keywords(&line, &["Scope 1"]).is_empty());
    }

    #[test]
    fn test_word_level_glyph_runs() {
        let line = TextLine::from_words(&[
            ("Total", BBox::new(0.0, 0.0, 30.0, 10.0)),
            ("Scope", BBox::new(35.0, 0.0, 65.0, 10.0)),
            ("1", BBox::new(70.0, 0.0, 75.0, 10.0)),
        ]);
        let boxes = locate_keywords(&line, &["Scope 1"]);
        assert_eq!(boxes, vec![BBox::new(35.0, 0.0, 75.0, 10.0)]);
    }

    #[test]
    fn test_virtual_only_span_skipped() {
        let line = TextLine {
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            elements: vec![
                LineElement::glyph("a", BBox::new(0.0, 0.0, 5.0, 10.0)),
                LineElement::Virtual { text: "--".into() },
                LineElement::glyph("b", BBox::new(6.0, 0.0, 10.0, 10.0)),
            ],
        };
        assert!(locate_keywords(&line, &["--"]).is_empty());
        assert_eq!(locate_keywords(&line, &["a--b"]).len(), 1);
    }

    #[test]
    fn test_broken_glyph_geometry_skipped() {
        let line = TextLine {
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            elements: vec![
                LineElement::glyph("Scope", BBox::new(f64::NAN, 0.0, 5.0, 10.0)),
                LineElement::space(),
                LineElement::glyph("Scope", BBox::new(20.0, 0.0, 30.0, 10.0)),
            ],
        };
        let boxes = locate_keywords(&line, &["Scope"]);
        assert_eq!(boxes, vec![BBox::new(20.0, 0.0, 30.0, 10.0)]);
    }

    #[test]
    fn test_line_words_char_glyphs() {
        let line = char_line("Scope 1 12,345", 0.0, 0.0);
        let words = line_words(&line);
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Scope", "1", "12,345"]);
        assert_eq!(words[2].bbox, BBox::new(80.0, 0.0, 140.0, 10.0));
    }

    #[test]
    fn test_line_words_word_glyphs() {
        let line = TextLine::from_words(&[
            ("12,345", BBox::new(0.0, 0.0, 30.0, 10.0)),
            ("t", BBox::new(35.0, 0.0, 40.0, 10.0)),
        ]);
        let words = line_words(&line);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].bbox, BBox::new(35.0, 0.0, 40.0, 10.0));
    }
}
