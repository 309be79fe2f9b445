//! Turns a validated record and its measurements into a localized [`Report`].
//!
//! The composer performs no validation of its own; it only accepts a
//! [`ValidatedRecord`].  Every label goes through the [`Localizer`]; values
//! are used verbatim, with two exceptions: the sample type is shown by its
//! localized display name, and the conclusion is translated when
//! [`ComposeOptions::translate_conclusion`] is set.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::locale::{City, Label, Language};
use crate::measurement::{
    MeasurementGrid, MeasurementPoint, MeasurementSheet, SockFoamRow, SOCK_FOAM_ENGLISH,
};
use crate::model::{
    Block, InfoPair, InfoTable, PageFurniture, PhotoBlock, Report, RichParagraph,
    SignatureBlock, PAGE_PLACEHOLDER,
};
use crate::record::ValidatedRecord;
use crate::richtext::Span;
use crate::theme;
use crate::translate::Localizer;

const CHINA_UTC_OFFSET_SECS: i32 = 8 * 3600;
const PHOTO_WIDTH_MM: f64 = 90.0;

/// China Standard Time, used for every printed timestamp.
pub fn china_standard_time() -> FixedOffset {
    FixedOffset::east_opt(CHINA_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// The current time in China Standard Time.
pub fn now_in_china() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&china_standard_time())
}

/// Per-report settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeOptions {
    pub language: Language,
    pub location: City,
    pub generated_at: DateTime<FixedOffset>,
    pub translate_conclusion: bool,
    pub photo: Option<PathBuf>,
}

impl ComposeOptions {
    pub fn new(language: Language, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            language,
            location: City::default(),
            generated_at,
            translate_conclusion: true,
            photo: None,
        }
    }

    pub fn with_location(mut self, location: City) -> Self {
        self.location = location;
        self
    }

    pub fn with_photo(mut self, photo: Option<PathBuf>) -> Self {
        self.photo = photo;
        self
    }

    pub fn with_translate_conclusion(mut self, translate: bool) -> Self {
        self.translate_conclusion = translate;
        self
    }
}

/// Builds the ordered block list of one report.
pub struct ReportComposer<'a> {
    localizer: &'a mut Localizer,
    options: &'a ComposeOptions,
}

impl<'a> ReportComposer<'a> {
    pub fn new(localizer: &'a mut Localizer, options: &'a ComposeOptions) -> Self {
        Self { localizer, options }
    }

    fn language(&self) -> Language {
        self.options.language
    }

    fn label(&mut self, label: Label) -> String {
        let language = self.language();
        self.localizer.label(label, language)
    }

    fn text(&mut self, text: &str) -> String {
        let language = self.language();
        self.localizer.translate(text, language)
    }

    /// Composes the full report.
    pub fn compose(mut self, record: &ValidatedRecord, sheet: &MeasurementSheet) -> Report {
        let review_date = record
            .review_date
            .unwrap_or_else(|| self.options.generated_at.date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let mut blocks = vec![
            Block::Title {
                title: self.label(Label::Title),
                subtitle: self.label(Label::TechnicalReview),
            },
            Block::SectionHeading(self.label(Label::SampleId)),
            Block::Info(self.info_table(record, &review_date)),
            Block::SectionHeading(self.label(Label::MeasurementData)),
            Block::Measurements(self.measurement_grid(sheet)),
            Block::SockFoam(self.sock_foam_row(sheet)),
        ];

        if let Some(photo) = self.options.photo.clone() {
            blocks.push(Block::Photo(PhotoBlock {
                path: photo,
                caption: RichParagraph::new(vec![Span::new(self.label(Label::SamplePhoto))
                    .italic()
                    .colored(theme::DARK)]),
                width_mm: PHOTO_WIDTH_MM,
            }));
        }

        blocks.push(Block::SectionHeading(self.label(Label::QualityAssessment)));
        let conclusion = self.conclusion_text(&record.conclusion);
        blocks.push(Block::Conclusion {
            label: format!("{}:", self.label(Label::Conclusion)),
            text: conclusion,
        });
        blocks.push(Block::Disclaimer(self.label(Label::Disclaimer)));
        blocks.push(Block::SectionHeading(self.label(Label::SignatureSection)));
        blocks.push(Block::Signatures(SignatureBlock {
            headers: [
                self.label(Label::ReviewedBy),
                self.label(Label::ApprovedBy),
                self.label(Label::Date),
            ],
            values: [
                record.technical_representative.clone(),
                record.factory_representative.clone(),
                review_date.clone(),
            ],
        }));
        blocks.push(Block::Status(self.status_line()));

        let furniture = self.furniture(record.style_no());

        Report {
            language: self.language(),
            style_no: record.style_no().to_owned(),
            location: self.options.location,
            generated_at: self.options.generated_at,
            furniture,
            blocks,
        }
    }

    fn pair(&mut self, label: Label, value: &str) -> InfoPair {
        InfoPair::new(self.label(label), value)
    }

    fn info_table(&mut self, record: &ValidatedRecord, review_date: &str) -> InfoTable {
        let purpose = self.text(record.purpose.english());
        InfoTable::new(vec![
            [
                self.pair(Label::StyleNo, record.style_no()),
                self.pair(Label::Factory, record.factory()),
            ],
            [
                self.pair(Label::Brand, &record.brand),
                self.pair(Label::Size, &record.size),
            ],
            [
                self.pair(Label::Purpose, &purpose),
                self.pair(Label::LastNo, &record.last_no),
            ],
            [
                self.pair(Label::Sales, &record.sales),
                self.pair(Label::OutsoleNo, &record.outsole_no),
            ],
            [
                self.pair(Label::NewOld, record.new_old.as_str()),
                self.pair(Label::ReviewDate, review_date),
            ],
        ])
    }

    fn measurement_grid(&mut self, sheet: &MeasurementSheet) -> MeasurementGrid {
        let header = [
            self.label(Label::CheckItems),
            self.label(Label::First),
            self.label(Label::Second),
            self.label(Label::Third),
            self.label(Label::Fourth),
        ];
        MeasurementGrid::build(
            &MeasurementPoint::LEFT,
            &MeasurementPoint::RIGHT,
            sheet,
            header,
            |point| self.text(point.english()),
        )
    }

    fn sock_foam_row(&mut self, sheet: &MeasurementSheet) -> SockFoamRow {
        let reading = sheet.sock_foam();
        SockFoamRow {
            label: self.text(SOCK_FOAM_ENGLISH),
            after_label: self.label(Label::After),
            after: reading.after.clone(),
            before_label: self.label(Label::Before),
            before: reading.before.clone(),
        }
    }

    fn conclusion_text(&mut self, conclusion: &str) -> String {
        let conclusion = conclusion.trim();
        if conclusion.is_empty() || !self.options.translate_conclusion {
            conclusion.to_owned()
        } else {
            self.text(conclusion)
        }
    }

    /// Both languages from the static table, report language first.
    fn status_line(&self) -> String {
        let english = Label::ReviewCompleted.english();
        let mandarin = Label::ReviewCompleted.mandarin();
        match self.language() {
            Language::English => format!("{} | {}", english, mandarin),
            Language::Mandarin => format!("{} | {}", mandarin, english),
        }
    }

    /// Translated page label, unless the translation lost the placeholder.
    fn page_template(&mut self) -> String {
        let translated = self.label(Label::PageNumber);
        if translated.contains(PAGE_PLACEHOLDER) {
            translated
        } else {
            Label::PageNumber.text(self.language()).to_owned()
        }
    }

    fn furniture(&mut self, style_no: &str) -> PageFurniture {
        let location = self.options.location;
        let location_label = self.label(Label::Location);
        let footer_location = match self.language() {
            Language::English => format!("{}: {}", location_label, location.name()),
            Language::Mandarin => format!("{}: {}", location_label, location),
        };

        PageFurniture {
            header_title: self.label(Label::Header),
            header_subtitle: format!("{}: {}", self.label(Label::SampleId), style_no),
            footer_location,
            footer_timestamp: format!(
                "{}: {}",
                self.label(Label::Generated),
                self.options.generated_at.format("%Y-%m-%d %H:%M")
            ),
            page_template: self.page_template(),
        }
    }
}

/// Convenience wrapper around [`ReportComposer`].
pub fn compose_report(
    localizer: &mut Localizer,
    record: &ValidatedRecord,
    sheet: &MeasurementSheet,
    options: &ComposeOptions,
) -> Report {
    ReportComposer::new(localizer, options).compose(record, sheet)
}
