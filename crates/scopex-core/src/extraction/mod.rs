pub mod pdftotext;

use crate::error::ScopexError;
use crate::geometry::Interval;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in page coordinates, `x1 >= x0` and `y1 >= y0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    pub fn x_interval(&self) -> Interval {
        Interval::new(self.x0, self.x1)
    }

    pub fn y_interval(&self) -> Interval {
        Interval::new(self.y0, self.y1)
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// True if every coordinate is finite and the box is not inverted.
    pub fn is_well_formed(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.x1 >= self.x0
            && self.y1 >= self.y0
    }

    /// Every coordinate rounded half away from zero to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> BBox {
        let scale = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * scale).round() / scale;
        BBox {
            x0: round(self.x0),
            y0: round(self.y0),
            x1: round(self.x1),
            y1: round(self.y1),
        }
    }
}

/// One element of a text line.
///
/// Layout engines emit glyph runs with geometry, plus synthetic spacing
/// between them that carries text but no box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineElement {
    Glyph { text: String, bbox: BBox },
    Virtual { text: String },
}

impl LineElement {
    pub fn glyph(text: impl Into<String>, bbox: BBox) -> Self {
        LineElement::Glyph {
            text: text.into(),
            bbox,
        }
    }

    pub fn space() -> Self {
        LineElement::Virtual { text: " ".into() }
    }

    pub fn text(&self) -> &str {
        match self {
            LineElement::Glyph { text, .. } => text,
            LineElement::Virtual { text } => text,
        }
    }

    pub fn bbox(&self) -> Option<&BBox> {
        match self {
            LineElement::Glyph { bbox, .. } => Some(bbox),
            LineElement::Virtual { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub bbox: BBox,
    pub elements: Vec<LineElement>,
}

impl TextLine {
    /// Build a line from word-level glyph runs, separated by virtual spaces.
    pub fn from_words<S: AsRef<str>>(words: &[(S, BBox)]) -> TextLine {
        let mut elements = Vec::with_capacity(words.len() * 2);
        let mut bbox: Option<BBox> = None;

        for (i, (text, word_bbox)) in words.iter().enumerate() {
            if i > 0 {
                elements.push(LineElement::space());
            }
            elements.push(LineElement::glyph(text.as_ref(), *word_bbox));
            bbox = Some(match bbox {
                Some(b) => b.union(word_bbox),
                None => *word_bbox,
            });
        }

        TextLine {
            bbox: bbox.unwrap_or_default(),
            elements,
        }
    }

    /// Concatenated text of all elements.
    pub fn text(&self) -> String {
        self.elements.iter().map(LineElement::text).collect()
    }
}

/// Paragraph-like group of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContainer {
    pub bbox: BBox,
    pub lines: Vec<TextLine>,
}

impl TextContainer {
    pub fn from_lines(lines: Vec<TextLine>) -> TextContainer {
        let bbox = lines
            .iter()
            .map(|l| l.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        TextContainer { bbox, lines }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Layout of a single page, as produced by an extraction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_number: usize,
    pub containers: Vec<TextContainer>,
}

impl PageLayout {
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.containers.iter().flat_map(|c| c.lines.iter())
    }

    pub fn text(&self) -> String {
        self.containers
            .iter()
            .map(TextContainer::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for PDF layout extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned text from PDF bytes, returning one PageLayout per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageLayout>, ScopexError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
