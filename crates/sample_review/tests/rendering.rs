use std::io::Cursor;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeZone};
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use sample_review::builder::DocumentBuilder;
use sample_review::elements::{GridCell, StyledGrid};
use sample_review::fonts::{self, FontSettings};
use sample_review::model::PageFurniture;
use sample_review::{
    china_standard_time, AppConfig, FormState, Language, Localizer, MeasurementPoint, Readings,
    ReportRenderer, ReviewError, ReviewSession, SampleRecord, PDF_MIME,
};
use sha2::{Digest, Sha256};

fn font_settings() -> FontSettings {
    AppConfig::default().with_env().fonts
}

fn fonts_available() -> bool {
    let available = fonts::default_fonts_available(&font_settings());
    if !available {
        eprintln!("Skipping rendering assertions: bundled fonts are not available");
    }
    available
}

fn generated_at() -> DateTime<FixedOffset> {
    china_standard_time()
        .with_ymd_and_hms(2025, 3, 14, 16, 45, 12)
        .single()
        .expect("valid timestamp")
}

fn sample_form() -> FormState {
    let mut sample = SampleRecord::new("ST-1", "ABC Co.");
    sample.brand = "Northwind".to_owned();
    sample.size = "38".to_owned();
    sample.conclusion = "Toe spring within tolerance; heel seat slightly narrow.".to_owned();
    sample.technical_representative = "Li Wei".to_owned();

    let mut form = FormState::new(sample);
    form.measurements.set(
        MeasurementPoint::LastLength,
        Readings::new("245", "245.5", "", ""),
    );
    form.measurements
        .set(MeasurementPoint::ToeSpring, Readings::new("12", "", "", ""));
    form
}

fn session(language: Language) -> ReviewSession {
    ReviewSession::new(
        Localizer::with_glossary(),
        ReportRenderer::new(font_settings()),
    )
    .with_language(language)
}

fn render(language: Language, form: &FormState) -> Vec<u8> {
    session(language)
        .submit_at(form, generated_at())
        .expect("render sample report")
        .bytes
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    for tag in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let start = format!("<{}>", tag);
        let end = format!("</{}>", tag);
        scrub_xml(&mut normalized, start.as_bytes(), end.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

fn write_sample_photo(dir: &tempfile::TempDir) -> PathBuf {
    let buffer = ImageBuffer::from_fn(120, 80, |x, y| {
        Rgb([(x * 2) as u8, (y * 3) as u8, 0x7e])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode sample photo");
    let path = dir.path().join("sample.png");
    std::fs::write(&path, bytes).expect("write sample photo");
    path
}

#[test]
fn renders_english_report() {
    if !fonts_available() {
        return;
    }

    let generated = session(Language::English)
        .submit_at(&sample_form(), generated_at())
        .expect("render sample report");

    assert!(generated.bytes.starts_with(b"%PDF"));
    assert_eq!(generated.mime, PDF_MIME);
    assert_eq!(
        generated.file_name,
        "Sample_Review_ST-1_Shanghai_20250314_164512.pdf"
    );
    assert!(generated.page_count >= 1);
    assert!(generated.warnings.is_empty());
}

#[test]
fn rendering_is_deterministic() {
    if !fonts_available() {
        return;
    }

    let form = sample_form();
    let bytes_a = render(Language::English, &form);
    let bytes_b = render(Language::English, &form);

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn renders_mandarin_report() {
    if !fonts_available() {
        return;
    }

    let generated = session(Language::Mandarin)
        .submit_at(&sample_form(), generated_at())
        .expect("render Mandarin report");
    assert!(generated.bytes.starts_with(b"%PDF"));
    assert_eq!(generated.language, Language::Mandarin);
    // The free-text conclusion has no glossary entry.
    assert!(generated
        .warnings
        .iter()
        .any(|warning| warning.contains("heel seat")));
}

#[test]
fn long_conclusion_flows_onto_more_pages() {
    if !fonts_available() {
        return;
    }

    let mut form = sample_form();
    form.sample.conclusion = "Stitching density on the quarter is uneven. ".repeat(300);
    let generated = session(Language::English)
        .submit_at(&form, generated_at())
        .expect("render long report");
    assert!(generated.page_count > 1);
}

#[test]
fn embeds_sample_photo() {
    if !fonts_available() {
        return;
    }

    let dir = tempfile::tempdir().expect("temp dir");
    let mut form = sample_form();
    let without_photo = render(Language::English, &form);

    form.photo = Some(write_sample_photo(&dir));
    let generated = session(Language::English)
        .submit_at(&form, generated_at())
        .expect("render report with photo");

    assert!(generated.warnings.is_empty());
    assert!(generated.bytes.len() > without_photo.len());
}

#[test]
fn unreadable_photo_is_reported_as_warning() {
    if !fonts_available() {
        return;
    }

    let mut form = sample_form();
    form.photo = Some(PathBuf::from("/__sample_review_missing_photo__.png"));
    let generated = session(Language::English)
        .submit_at(&form, generated_at())
        .expect("render without photo");
    assert!(generated
        .warnings
        .iter()
        .any(|warning| warning.contains("Could not embed photo")));
}

#[cfg(not(windows))]
#[test]
fn missing_fonts_abort_generation() {
    let settings = FontSettings {
        fonts_dir: Some(PathBuf::from("/__sample_review_missing_fonts__")),
        ..FontSettings::default()
    };
    if fonts::default_fonts_available(&settings) {
        // The crate's own assets/fonts directory is searched as well.
        return;
    }

    let result = ReviewSession::new(Localizer::passthrough(), ReportRenderer::new(settings))
        .submit_at(&sample_form(), generated_at());
    assert!(matches!(result, Err(ReviewError::FontLoad(_))));
}

fn furniture() -> PageFurniture {
    PageFurniture {
        header_title: "Sample Review Report".to_owned(),
        header_subtitle: "Sample ID: ST-1".to_owned(),
        footer_location: "Location: Shanghai".to_owned(),
        footer_timestamp: "Generated: 2025-03-14 16:45".to_owned(),
        page_template: "Page {page}".to_owned(),
    }
}

fn render_grid(furniture: Option<PageFurniture>, striped: bool) -> (Vec<u8>, usize) {
    let family = fonts::latin_font_family(&font_settings()).expect("load fonts");
    let mut builder = DocumentBuilder::new(family);
    if let Some(furniture) = furniture {
        builder = builder.with_furniture(furniture);
    }
    let pages = builder.page_counter();
    let mut document = builder.build();

    let mut grid = StyledGrid::new(vec![3, 1, 1]);
    if striped {
        grid = grid.with_stripes(
            genpdf::style::Color::Rgb(0xff, 0xff, 0xff),
            genpdf::style::Color::Rgb(0xf7, 0xfa, 0xfc),
        );
    }
    for row in 0..20 {
        grid.push_row(vec![
            GridCell::new(format!("Point {row}")),
            GridCell::new("245"),
            GridCell::new("245.5"),
        ])
        .expect("three cells");
    }
    document.push(grid);

    let mut bytes = Vec::new();
    document.render(&mut bytes).expect("render grid");
    (bytes, pages.get())
}

#[test]
fn striped_rows_and_banner_are_painted() {
    if !fonts_available() {
        return;
    }

    let (plain, plain_pages) = render_grid(None, false);
    let (striped, _) = render_grid(None, true);
    let (decorated, decorated_pages) = render_grid(Some(furniture()), true);

    assert_eq!(plain_pages, 1);
    assert_eq!(decorated_pages, 1);
    assert!(
        striped.len() > plain.len(),
        "stripe fills should add drawing operations"
    );
    assert!(
        decorated.len() > striped.len(),
        "the banner and footer should add drawing operations"
    );
}
