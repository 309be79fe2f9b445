//! Maps a composed [`Report`] onto `genpdf` elements and renders it to bytes.

use genpdf::elements::{Break, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, Margins};
use log::{info, warn};

use crate::builder::DocumentBuilder;
use crate::elements::{mm_from_f64, Callout, CaptionedImage, GridCell, RuledHeading, StyledGrid};
use crate::error::ReviewError;
use crate::fonts::{self, FontSettings};
use crate::measurement::{MeasurementGrid, SockFoamRow};
use crate::model::{Block, InfoTable, PhotoBlock, Report, RichParagraph, SignatureBlock};
use crate::theme;

/// MIME type of the generated artifact.
pub const PDF_MIME: &str = "application/pdf";

const SIGNATURE_LINE: &str = "____________________";

/// File name of the artifact: `Sample_Review_<style>_<city>_<YYYYmmdd_HHMMSS>.pdf`.
///
/// Path separators in the style number are replaced with `-`.
pub fn artifact_file_name(report: &Report) -> String {
    let style_no: String = report
        .style_no
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '-' } else { ch })
        .collect();
    format!(
        "Sample_Review_{}_{}_{}.pdf",
        style_no,
        report.location.name(),
        report.generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// A rendered PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
    /// Problems that did not stop rendering, such as an unreadable photo.
    pub warnings: Vec<String>,
}

/// Renders reports with the configured fonts.
#[derive(Clone, Debug, Default)]
pub struct ReportRenderer {
    fonts: FontSettings,
}

impl ReportRenderer {
    pub fn new(fonts: FontSettings) -> Self {
        Self { fonts }
    }

    pub fn font_settings(&self) -> &FontSettings {
        &self.fonts
    }

    /// Renders `report`; no bytes are returned when any step fails.
    pub fn render(&self, report: &Report) -> Result<RenderedReport, ReviewError> {
        let family = fonts::font_family_for(report.language, &self.fonts)
            .map_err(ReviewError::FontLoad)?;

        let builder = DocumentBuilder::new(family)
            .with_title(report.furniture.header_title.clone())
            .with_margins(Margins::trbl(10, 15, 10, 15))
            .with_font_size(theme::BODY_SIZE)
            .with_furniture(report.furniture.clone());
        let pages = builder.page_counter();
        let mut document = builder.build();

        let mut warnings = Vec::new();
        for block in &report.blocks {
            push_block(&mut document, block, &mut warnings);
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        let file_name = artifact_file_name(report);
        info!(
            "Rendered {} ({} bytes, {} page(s))",
            file_name,
            bytes.len(),
            pages.get()
        );

        Ok(RenderedReport {
            bytes,
            file_name,
            page_count: pages.get(),
            warnings,
        })
    }
}

fn styled(text: &str, size: u8, color: genpdf::style::Color, bold: bool) -> StyledString {
    let mut style = Style::new();
    style.set_font_size(size);
    style.set_color(color);
    if bold {
        style.set_bold();
    }
    StyledString::new(text.to_owned(), style)
}

fn push_block(document: &mut Document, block: &Block, warnings: &mut Vec<String>) {
    match block {
        Block::Title { title, subtitle } => {
            let mut title = Paragraph::new(styled(title, theme::TITLE_SIZE, theme::PRIMARY, true));
            title.set_alignment(Alignment::Center);
            document.push(title);
            let mut subtitle =
                Paragraph::new(styled(subtitle, theme::SUBTITLE_SIZE, theme::SECONDARY, false));
            subtitle.set_alignment(Alignment::Center);
            document.push(subtitle);
        }
        Block::SectionHeading(text) => {
            document.push(Break::new(1));
            document.push(RuledHeading::new(text.clone()));
            document.push(Break::new(0.5));
        }
        Block::Info(table) => document.push(info_grid(table)),
        Block::Measurements(grid) => document.push(measurement_grid(grid)),
        Block::SockFoam(row) => {
            document.push(Break::new(0.5));
            document.push(sock_foam_grid(row));
        }
        Block::Photo(photo) => match photo_element(photo) {
            Ok(element) => {
                document.push(Break::new(1));
                document.push(element);
            }
            Err(err) => {
                let message = format!(
                    "Could not embed photo {}: {}",
                    photo.path.display(),
                    err
                );
                warn!("{}", message);
                warnings.push(message);
            }
        },
        Block::Conclusion { label, text } => {
            document.push(Paragraph::new(styled(
                label,
                theme::BODY_SIZE,
                theme::DARK,
                true,
            )));
            document.push(Break::new(0.3));
            document.push(
                Callout::new(text.clone(), theme::LIGHT)
                    .with_edge(theme::PRIMARY)
                    .with_style(body_style(theme::DARK)),
            );
        }
        Block::Disclaimer(text) => {
            document.push(Break::new(1));
            let mut style = body_style(theme::DARK);
            style.set_italic();
            style.set_font_size(theme::TABLE_SIZE);
            document.push(
                Callout::new(text.clone(), theme::DISCLAIMER_BACKGROUND)
                    .with_edge(theme::WARNING)
                    .with_style(style),
            );
        }
        Block::Signatures(signatures) => document.push(signature_grid(signatures)),
        Block::Status(text) => {
            document.push(Break::new(1.5));
            let mut style = body_style(theme::WHITE);
            style.set_bold();
            document.push(
                Callout::new(text.clone(), theme::SUCCESS)
                    .with_alignment(Alignment::Center)
                    .with_style(style),
            );
        }
    }
}

fn body_style(color: genpdf::style::Color) -> Style {
    let mut style = Style::new();
    style.set_font_size(theme::BODY_SIZE);
    style.set_color(color);
    style
}

fn header_cell(text: &str) -> GridCell {
    GridCell::new(text)
        .bold()
        .sized(theme::TABLE_SIZE)
        .colored(theme::WHITE)
        .with_background(theme::TABLE_HEADER)
        .aligned(Alignment::Center)
}

fn label_cell(text: &str) -> GridCell {
    GridCell::new(text)
        .bold()
        .sized(theme::TABLE_SIZE)
        .colored(theme::DARK)
}

fn value_cell(text: &str) -> GridCell {
    GridCell::new(text)
        .sized(theme::TABLE_SIZE)
        .colored(theme::DARK)
}

fn push_row(grid: &mut StyledGrid, cells: Vec<GridCell>) {
    if let Err(err) = grid.push_row(cells) {
        warn!("Dropping malformed table row: {}", err);
    }
}

fn info_grid(table: &InfoTable) -> StyledGrid {
    let mut grid = StyledGrid::new(vec![3, 4, 3, 4]);
    for [left, right] in table.rows() {
        push_row(
            &mut grid,
            vec![
                label_cell(&left.label).with_background(theme::LIGHT),
                value_cell(&left.value),
                label_cell(&right.label).with_background(theme::LIGHT),
                value_cell(&right.value),
            ],
        );
    }
    grid
}

fn measurement_grid(table: &MeasurementGrid) -> StyledGrid {
    let mut grid = StyledGrid::new(vec![5, 2, 2, 2, 2, 5, 2, 2, 2, 2])
        .with_stripes(theme::ROW_EVEN, theme::ROW_ODD);

    let header = table
        .header
        .iter()
        .chain(table.header.iter())
        .map(|text| header_cell(text))
        .collect();
    if let Err(err) = grid.push_header_row(header) {
        warn!("Dropping malformed table header: {}", err);
    }

    for row in &table.rows {
        let cells = row
            .cells()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if index % 5 == 0 {
                    label_cell(text)
                } else {
                    value_cell(text).aligned(Alignment::Center)
                }
            })
            .collect();
        push_row(&mut grid, cells);
    }
    grid
}

fn sock_foam_grid(row: &SockFoamRow) -> StyledGrid {
    let mut grid = StyledGrid::new(vec![5, 3, 3, 3, 3]);
    let cells = row
        .cells()
        .iter()
        .enumerate()
        .map(|(index, text)| match index {
            0 => label_cell(text).with_background(theme::HIGHLIGHT),
            1 | 3 => label_cell(text)
                .with_background(theme::LIGHT)
                .aligned(Alignment::Center),
            _ => value_cell(text).aligned(Alignment::Center),
        })
        .collect();
    push_row(&mut grid, cells);
    grid
}

fn signature_grid(signatures: &SignatureBlock) -> StyledGrid {
    let mut grid = StyledGrid::new(vec![1, 1, 1]);
    let header = signatures.headers.iter().map(|text| header_cell(text)).collect();
    push_row(&mut grid, header);

    let values = signatures
        .values
        .iter()
        .map(|text| value_cell(text).aligned(Alignment::Center))
        .collect();
    push_row(&mut grid, values);

    let lines = (0..3)
        .map(|_| value_cell(SIGNATURE_LINE).aligned(Alignment::Center))
        .collect();
    push_row(&mut grid, lines);
    grid.with_border(None)
}

fn caption_paragraph(caption: &RichParagraph) -> Paragraph {
    let mut paragraph = Paragraph::default();
    for span in caption.spans() {
        paragraph.push(span.to_styled_string());
    }
    paragraph.set_alignment(caption.alignment().into());
    paragraph
}

fn photo_element(photo: &PhotoBlock) -> Result<CaptionedImage, genpdf::error::Error> {
    Ok(
        CaptionedImage::from_path(&photo.path, caption_paragraph(&photo.caption))?
            .with_alignment(Alignment::Center)
            .with_width(mm_from_f64(photo.width_mm)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{china_standard_time, compose_report, ComposeOptions};
    use crate::locale::{City, Language};
    use crate::measurement::MeasurementSheet;
    use crate::record::SampleRecord;
    use crate::translate::Localizer;
    use chrono::TimeZone;

    fn report(style_no: &str) -> Report {
        let generated_at = china_standard_time()
            .with_ymd_and_hms(2025, 3, 14, 9, 5, 7)
            .single()
            .unwrap();
        let options = ComposeOptions::new(Language::English, generated_at)
            .with_location(City::find("Dongguan").unwrap());
        compose_report(
            &mut Localizer::passthrough(),
            &SampleRecord::new(style_no, "ABC Co.").validate().unwrap(),
            &MeasurementSheet::new(),
            &options,
        )
    }

    #[test]
    fn artifact_name_embeds_style_city_and_timestamp() {
        assert_eq!(
            artifact_file_name(&report("ST-1")),
            "Sample_Review_ST-1_Dongguan_20250314_090507.pdf"
        );
    }

    #[test]
    fn artifact_name_replaces_path_separators() {
        assert_eq!(
            artifact_file_name(&report("A/B\\C")),
            "Sample_Review_A-B-C_Dongguan_20250314_090507.pdf"
        );
    }

    #[test]
    fn measurement_grid_has_header_and_eleven_rows() {
        let report = report("ST-1");
        let grid = measurement_grid(report.measurement_grid().unwrap());
        assert_eq!(grid.column_count(), 10);
        assert_eq!(grid.row_count(), 11);
    }

    #[test]
    fn signature_grid_has_header_values_and_lines() {
        let grid = signature_grid(&SignatureBlock {
            headers: ["Reviewed By", "Approved By", "Date"].map(String::from),
            values: ["Li Wei", "", "2025-03-14"].map(String::from),
        });
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn missing_photo_is_an_error() {
        let photo = PhotoBlock {
            path: "/__no_such_photo__.png".into(),
            caption: RichParagraph::default(),
            width_mm: 80.0,
        };
        assert!(photo_element(&photo).is_err());
    }
}
