//! Data structures describing the logical content of a sample review report.
//!
//! The composer produces a [`Report`]: a list of localized [`Block`]s plus the
//! page furniture printed on every page.  Nothing here references `genpdf`, so
//! a composed report can be inspected and tested without fonts or a renderer;
//! [`crate::render`] maps the blocks onto `genpdf` elements.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};

use crate::locale::{City, Language};
use crate::measurement::{MeasurementGrid, SockFoamRow};
use crate::richtext::Span;

/// Horizontal alignment of text and images, mapped to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A paragraph made of styled spans.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl RichParagraph {
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Photo of the sample, loaded from disk at render time.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoBlock {
    pub path: PathBuf,
    pub caption: RichParagraph,
    pub width_mm: f64,
}

/// A label/value pair of the basic information table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoPair {
    pub label: String,
    pub value: String,
}

impl InfoPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Basic information laid out as two label/value pairs per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoTable {
    rows: Vec<[InfoPair; 2]>,
}

impl InfoTable {
    pub fn new(rows: Vec<[InfoPair; 2]>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[InfoPair; 2]] {
        &self.rows
    }

    /// Pairs in reading order: left to right, top to bottom.
    pub fn pairs(&self) -> impl Iterator<Item = &InfoPair> {
        self.rows.iter().flatten()
    }

    /// Value printed next to `label`, if the table has that label.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.pairs()
            .find(|pair| pair.label == label)
            .map(|pair| pair.value.as_str())
    }
}

/// Reviewer, approver and date columns with their signature lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureBlock {
    pub headers: [String; 3],
    pub values: [String; 3],
}

/// Content blocks in document order.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Title { title: String, subtitle: String },
    SectionHeading(String),
    Info(InfoTable),
    Measurements(MeasurementGrid),
    SockFoam(SockFoamRow),
    Photo(PhotoBlock),
    Conclusion { label: String, text: String },
    Disclaimer(String),
    Signatures(SignatureBlock),
    Status(String),
}

/// Text printed in the header band and the footer of every page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageFurniture {
    pub header_title: String,
    /// `Sample ID: <style no.>` line under the header title.
    pub header_subtitle: String,
    pub footer_location: String,
    pub footer_timestamp: String,
    /// Page label with a `{page}` placeholder.
    pub page_template: String,
}

/// Placeholder replaced by the page number in [`PageFurniture::page_template`].
pub const PAGE_PLACEHOLDER: &str = "{page}";

impl PageFurniture {
    /// Page label for the 1-based `page`.
    pub fn page_label(&self, page: usize) -> String {
        self.page_template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// A fully composed, localized report.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub language: Language,
    pub style_no: String,
    pub location: City,
    pub generated_at: DateTime<FixedOffset>,
    pub furniture: PageFurniture,
    pub blocks: Vec<Block>,
}

impl Report {
    /// The basic information table, if present.
    pub fn info_table(&self) -> Option<&InfoTable> {
        self.blocks.iter().find_map(|block| match block {
            Block::Info(table) => Some(table),
            _ => None,
        })
    }

    /// The measurement grid, if present.
    pub fn measurement_grid(&self) -> Option<&MeasurementGrid> {
        self.blocks.iter().find_map(|block| match block {
            Block::Measurements(grid) => Some(grid),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_table_lookup_by_label() {
        let table = InfoTable::new(vec![[
            InfoPair::new("Style No.", "ST-1"),
            InfoPair::new("Factory", "ABC Co."),
        ]]);
        assert_eq!(table.value_of("Factory"), Some("ABC Co."));
        assert_eq!(table.value_of("Brand"), None);
        assert_eq!(table.pairs().count(), 2);
    }

    #[test]
    fn page_label_fills_placeholder() {
        let furniture = PageFurniture {
            header_title: String::new(),
            header_subtitle: String::new(),
            footer_location: String::new(),
            footer_timestamp: String::new(),
            page_template: "第 {page} 页".to_owned(),
        };
        assert_eq!(furniture.page_label(3), "第 3 页");
    }

    #[test]
    fn paragraph_plain_text_joins_spans() {
        let paragraph = RichParagraph::new(vec![Span::new("Sample "), Span::new("Photo").bold()]);
        assert_eq!(paragraph.plain_text(), "Sample Photo");
    }
}
