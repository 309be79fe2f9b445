//! A review session: one translation cache, one renderer, many reports.

use chrono::{DateTime, FixedOffset};
use log::info;

use crate::compose::{compose_report, now_in_china, ComposeOptions};
use crate::config::AppConfig;
use crate::error::ReviewError;
use crate::locale::{City, Label, Language};
use crate::model::Report;
use crate::record::FormState;
use crate::render::{ReportRenderer, PDF_MIME};
use crate::translate::Localizer;

/// The PDF produced by [`ReviewSession::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedReport {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub language: Language,
    /// Soft failures, such as labels that fell back to English.
    pub warnings: Vec<String>,
}

/// Owns the state shared by every report generated in one sitting.
///
/// Translations cached while composing one report are reused by the next; a
/// new session starts with an empty cache.
#[derive(Debug)]
pub struct ReviewSession {
    localizer: Localizer,
    renderer: ReportRenderer,
    language: Language,
    ui_language: Language,
    location: City,
    translate_conclusion: bool,
}

impl ReviewSession {
    pub fn new(localizer: Localizer, renderer: ReportRenderer) -> Self {
        Self {
            localizer,
            renderer,
            language: Language::default(),
            ui_language: Language::default(),
            location: City::default(),
            translate_conclusion: true,
        }
    }

    /// Session configured from `config`, including its translation backend.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReviewError> {
        let localizer = config.translation.localizer()?;
        Ok(Self::new(localizer, ReportRenderer::new(config.fonts.clone()))
            .with_language(config.report.language)
            .with_ui_language(config.report.ui_language)
            .with_location(config.report.location)
            .with_translate_conclusion(config.translation.translate_conclusion))
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_ui_language(mut self, language: Language) -> Self {
        self.ui_language = language;
        self
    }

    pub fn with_location(mut self, location: City) -> Self {
        self.location = location;
        self
    }

    pub fn with_translate_conclusion(mut self, translate: bool) -> Self {
        self.translate_conclusion = translate;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_location(&mut self, location: City) {
        self.location = location;
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// A user-facing message in the interface language.
    pub fn message(&mut self, label: Label) -> String {
        let language = self.ui_language;
        self.localizer.label(label, language)
    }

    fn options(&self, form: &FormState, generated_at: DateTime<FixedOffset>) -> ComposeOptions {
        ComposeOptions::new(self.language, generated_at)
            .with_location(self.location)
            .with_translate_conclusion(self.translate_conclusion)
            .with_photo(form.photo.clone())
    }

    /// Validates the form and composes the report without rendering it.
    pub fn compose(
        &mut self,
        form: &FormState,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<Report, ReviewError> {
        let record = form.sample.clone().validate()?;
        let options = self.options(form, generated_at);
        Ok(compose_report(
            &mut self.localizer,
            &record,
            &form.measurements,
            &options,
        ))
    }

    /// Validates, composes and renders the form as of `generated_at`.
    ///
    /// Nothing is composed or rendered when validation fails.
    pub fn submit_at(
        &mut self,
        form: &FormState,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<GeneratedReport, ReviewError> {
        let report = self.compose(form, generated_at)?;
        let mut warnings = self.localizer.take_warnings();

        let rendered = self.renderer.render(&report)?;
        warnings.extend(rendered.warnings);

        info!(
            "Generated {} in {} with {} warning(s)",
            rendered.file_name,
            report.language,
            warnings.len()
        );

        Ok(GeneratedReport {
            file_name: rendered.file_name,
            mime: PDF_MIME,
            bytes: rendered.bytes,
            page_count: rendered.page_count,
            language: report.language,
            warnings,
        })
    }

    /// [`ReviewSession::submit_at`] with the current China Standard Time.
    pub fn submit(&mut self, form: &FormState) -> Result<GeneratedReport, ReviewError> {
        self.submit_at(form, now_in_china())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::china_standard_time;
    use crate::fonts::FontSettings;
    use crate::model::Block;
    use crate::record::SampleRecord;
    use crate::translate::testing::{Recording, Unavailable};
    use chrono::TimeZone;

    fn at() -> DateTime<FixedOffset> {
        china_standard_time()
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .unwrap()
    }

    fn session(localizer: Localizer) -> ReviewSession {
        let fonts = FontSettings {
            fonts_dir: Some("/__sample_review_missing_fonts__".into()),
            ..FontSettings::default()
        };
        ReviewSession::new(localizer, ReportRenderer::new(fonts))
    }

    #[test]
    fn invalid_form_is_rejected_before_rendering() {
        let recording = Recording::default();
        let mut session =
            session(Localizer::new(Box::new(recording.clone()))).with_language(Language::Mandarin);
        let form = FormState::new(SampleRecord::new("", "ABC Co."));

        let err = session.submit_at(&form, at()).unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
        assert!(recording.calls.borrow().is_empty());
    }

    #[test]
    fn cache_is_shared_across_reports_of_one_session() {
        let recording = Recording::default();
        let mut session =
            session(Localizer::new(Box::new(recording.clone()))).with_language(Language::Mandarin);
        let form = FormState::new(SampleRecord::new("ST-1", "ABC Co."));

        session.compose(&form, at()).unwrap();
        let calls = recording.calls.borrow().len();
        assert!(calls > 0);

        session.compose(&form, at()).unwrap();
        assert_eq!(recording.calls.borrow().len(), calls);
    }

    #[test]
    fn sessions_do_not_share_translations() {
        let first = Recording::default();
        let second = Recording::default();
        let form = FormState::new(SampleRecord::new("ST-1", "ABC Co."));

        session(Localizer::new(Box::new(first.clone())))
            .with_language(Language::Mandarin)
            .compose(&form, at())
            .unwrap();
        session(Localizer::new(Box::new(second.clone())))
            .with_language(Language::Mandarin)
            .compose(&form, at())
            .unwrap();

        assert_eq!(*first.calls.borrow(), *second.calls.borrow());
    }

    #[test]
    fn failing_backend_still_composes_english_labels() {
        let mut session =
            session(Localizer::new(Box::new(Unavailable::default()))).with_language(Language::Mandarin);
        let form = FormState::new(SampleRecord::new("ST-1", "ABC Co."));

        let report = session.compose(&form, at()).unwrap();
        assert_eq!(report.language, Language::Mandarin);
        assert!(report
            .blocks
            .contains(&Block::SectionHeading("Measurement Data".to_owned())));
    }

    #[test]
    fn missing_fonts_surface_as_font_errors() {
        let mut session = session(Localizer::passthrough());
        let form = FormState::new(SampleRecord::new("ST-1", "ABC Co."));

        match session.submit_at(&form, at()) {
            Err(err) => assert!(err.is_font_error() || matches!(err, ReviewError::Render(_))),
            // A Windows fallback family may still be available.
            Ok(report) => assert!(!report.bytes.is_empty()),
        }
    }

    #[test]
    fn messages_follow_the_interface_language() {
        let mut session = session(Localizer::with_glossary())
            .with_ui_language(Language::Mandarin)
            .with_language(Language::English);
        assert_eq!(session.message(Label::FillRequired), "请至少填写型体和工厂!");

        let mut session = session.with_ui_language(Language::English);
        assert_eq!(
            session.message(Label::GenerateSuccess),
            "PDF Generated Successfully!"
        );
    }
}
