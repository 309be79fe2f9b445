//! Form state: the values entered for one sample review.
//!
//! A [`FormState`] is what the data-entry front end edits.  Before a report
//! can be composed the record must pass [`SampleRecord::validate`], which is
//! the only way to obtain a [`ValidatedRecord`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::locale::{NewOld, SampleType};
use crate::measurement::{MeasurementPoint, MeasurementSheet};

/// Basic information and sign-off of a reviewed sample.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SampleRecord {
    pub style_no: String,
    pub size: String,
    pub factory: String,
    pub purpose: SampleType,
    pub brand: String,
    pub last_no: String,
    pub sales: String,
    pub new_old: NewOld,
    pub outsole_no: String,
    /// Defaults to the generation date when left empty.
    pub review_date: Option<NaiveDate>,
    pub conclusion: String,
    /// Name of the reviewing technician.
    pub technical_representative: String,
    pub factory_representative: String,
}

/// Fields that must be filled in before a report can be generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
    StyleNo,
    Factory,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::StyleNo => f.write_str("Style No."),
            RequiredField::Factory => f.write_str("Factory"),
        }
    }
}

/// A record rejected at submission.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("missing required field(s): {}", join_fields(.missing))]
pub struct ValidationError {
    missing: Vec<RequiredField>,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn missing(&self) -> &[RequiredField] {
        &self.missing
    }
}

impl SampleRecord {
    /// Minimal record carrying only the required fields.
    pub fn new(style_no: impl Into<String>, factory: impl Into<String>) -> Self {
        Self {
            style_no: style_no.into(),
            factory: factory.into(),
            ..Self::default()
        }
    }

    /// Checks the required fields and trims them.
    pub fn validate(mut self) -> Result<ValidatedRecord, ValidationError> {
        let mut missing = Vec::new();
        if self.style_no.trim().is_empty() {
            missing.push(RequiredField::StyleNo);
        }
        if self.factory.trim().is_empty() {
            missing.push(RequiredField::Factory);
        }
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        self.style_no = self.style_no.trim().to_owned();
        self.factory = self.factory.trim().to_owned();
        Ok(ValidatedRecord(self))
    }
}

/// A record whose style number and factory are present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRecord(SampleRecord);

impl ValidatedRecord {
    pub fn style_no(&self) -> &str {
        &self.0.style_no
    }

    pub fn factory(&self) -> &str {
        &self.0.factory
    }

    pub fn into_inner(self) -> SampleRecord {
        self.0
    }
}

impl std::ops::Deref for ValidatedRecord {
    type Target = SampleRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Errors raised while reading a form file.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("failed to read form file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML form: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON form: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything entered on the form for one sample.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormState {
    /// Optional photo of the sample, embedded below the measurements.
    pub photo: Option<PathBuf>,
    pub sample: SampleRecord,
    #[serde(flatten)]
    pub measurements: MeasurementSheet,
}

impl FormState {
    pub fn new(sample: SampleRecord) -> Self {
        Self {
            sample,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, FormError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads a form file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| FormError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    /// A blank TOML form listing every field and measurement point.
    pub fn template() -> String {
        let mut out = String::from(
            "# Factory sample review form. Style No. and Factory are required.\n\
             # photo = \"sample.png\"\n\
             \n\
             [sample]\n\
             style_no = \"\"\n\
             factory = \"\"\n\
             size = \"\"\n\
             # One of: Dev.sample, Cfm sample, Fit sample, Size set, TOP sample, Shipment sample\n\
             purpose = \"Dev.sample\"\n\
             brand = \"\"\n\
             last_no = \"\"\n\
             sales = \"\"\n\
             # One of: New, Old, Revised\n\
             new_old = \"New\"\n\
             outsole_no = \"\"\n\
             # review_date = \"2025-01-31\"\n\
             conclusion = \"\"\n\
             technical_representative = \"\"\n\
             factory_representative = \"\"\n",
        );

        for point in MeasurementPoint::all() {
            out.push_str(&format!(
                "\n# {}\n[measurements.{}]\nfirst = \"\"\nsecond = \"\"\nthird = \"\"\nfourth = \"\"\n",
                point.english(),
                point.key()
            ));
        }
        out.push_str("\n# Sock Foam\n[sock_foam]\nafter = \"\"\nbefore = \"\"\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Readings;

    #[test]
    fn requires_style_and_factory() {
        let err = SampleRecord::default().validate().unwrap_err();
        assert_eq!(
            err.missing(),
            &[RequiredField::StyleNo, RequiredField::Factory]
        );
        assert_eq!(
            err.to_string(),
            "missing required field(s): Style No., Factory"
        );

        let err = SampleRecord::new("   ", "ABC Co.").validate().unwrap_err();
        assert_eq!(err.missing(), &[RequiredField::StyleNo]);
    }

    #[test]
    fn validation_trims_required_fields() {
        let record = SampleRecord::new(" ST-1 ", "ABC Co.\n").validate().unwrap();
        assert_eq!(record.style_no(), "ST-1");
        assert_eq!(record.factory(), "ABC Co.");
        assert_eq!(record.brand, "");
    }

    #[test]
    fn parses_toml_form() {
        let form = FormState::from_toml_str(
            r#"
            photo = "shoe.png"

            [sample]
            style_no = "ST-9"
            factory = "Evergreen Footwear"
            purpose = "Fit sample"
            new_old = "Revised"
            review_date = "2025-03-14"

            [measurements.ball_girth]
            first = "231"
            third = "232"

            [sock_foam]
            after = "3.5"
            "#,
        )
        .unwrap();

        assert_eq!(form.photo.as_deref(), Some(Path::new("shoe.png")));
        assert_eq!(form.sample.purpose, SampleType::Fitting);
        assert_eq!(form.sample.new_old, NewOld::Revised);
        assert_eq!(
            form.sample.review_date,
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert_eq!(
            form.measurements.get(MeasurementPoint::BallGirth),
            Some(&Readings::new("231", "", "232", ""))
        );
        assert_eq!(form.measurements.sock_foam().after, "3.5");
    }

    #[test]
    fn parses_json_form() {
        let form = FormState::from_json_str(
            r#"{
                "sample": { "style_no": "ST-2", "factory": "ABC Co.", "purpose": "TOP sample" },
                "measurements": { "toe_spring": { "first": "12" } }
            }"#,
        )
        .unwrap();

        assert_eq!(form.sample.purpose, SampleType::Production);
        assert_eq!(
            form.measurements
                .get(MeasurementPoint::ToeSpring)
                .map(|r| r.first.as_str()),
            Some("12")
        );
    }

    #[test]
    fn rejects_unknown_points() {
        let err = FormState::from_toml_str("[measurements.heel_colour]\nfirst = \"1\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn template_parses_as_blank_form() {
        let form = FormState::from_toml_str(&FormState::template()).unwrap();
        assert_eq!(form.measurements.recorded_points(), 0);
        assert!(form.sample.clone().validate().is_err());
        for point in MeasurementPoint::all() {
            assert!(form.measurements.get(point).is_some());
        }
    }

    #[test]
    fn loads_form_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("form.toml");
        fs::write(&toml_path, "[sample]\nstyle_no = \"A\"\nfactory = \"B\"\n").unwrap();
        let json_path = dir.path().join("form.json");
        fs::write(&json_path, r#"{"sample":{"style_no":"C","factory":"D"}}"#).unwrap();

        assert_eq!(FormState::load(&toml_path).unwrap().sample.style_no, "A");
        assert_eq!(FormState::load(&json_path).unwrap().sample.factory, "D");
        assert!(matches!(
            FormState::load(dir.path().join("missing.toml")),
            Err(FormError::Read { .. })
        ));
    }
}
