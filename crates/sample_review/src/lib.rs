//! Bilingual factory sample review reports.
//!
//! A [`ReviewSession`] takes a [`FormState`], validates it, composes a
//! localized [`Report`] through its [`Localizer`] and renders the report to a
//! PDF with `genpdf`.

pub mod builder;
pub mod compose;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod locale;
pub mod measurement;
pub mod model;
pub mod record;
pub mod render;
pub mod richtext;
pub mod session;
pub mod theme;
pub mod translate;

pub use compose::{china_standard_time, compose_report, ComposeOptions};
pub use config::AppConfig;
pub use error::ReviewError;
pub use locale::{City, Label, Language, SampleType, CITIES};
pub use measurement::{MeasurementPoint, MeasurementSheet, Readings, SockFoamReading};
pub use model::Report;
pub use record::{FormState, SampleRecord, ValidatedRecord, ValidationError};
pub use render::{artifact_file_name, RenderedReport, ReportRenderer, PDF_MIME};
pub use session::{GeneratedReport, ReviewSession};
pub use translate::{Localizer, Translator};
