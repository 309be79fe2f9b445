//! Application configuration.
//!
//! Settings come from an optional TOML file (`sample-review.toml`), are then
//! overlaid by environment variables, and finally by command line flags in the
//! front end.  Every field has a default, so an empty file is a valid
//! configuration.
//!
//! ```toml
//! [translation]
//! model = "gpt-4o-mini"
//! timeout_secs = 20
//!
//! [fonts]
//! cjk_font_file = "NotoSansSC-Regular.ttf"
//!
//! [report]
//! language = "zh"
//! location = "Dongguan"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

use crate::fonts::FontSettings;
use crate::locale::{City, Language};
use crate::translate::{
    Chain, Glossary, Localizer, OpenAiSettings, OpenAiTranslator, TranslateError, Translator,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "sample-review.toml";

/// API key of the remote translation service.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Overrides `[translation] base_url`.
pub const TRANSLATION_URL_ENV: &str = "SAMPLE_REVIEW_TRANSLATION_URL";
/// Overrides `[fonts] fonts_dir`.
pub const FONTS_DIR_ENV: &str = "SAMPLE_REVIEW_FONTS_DIR";
/// Overrides `[fonts] cjk_fonts_dir`.
pub const CJK_FONTS_DIR_ENV: &str = "SAMPLE_REVIEW_CJK_FONTS_DIR";

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to set up translation backend: {0}")]
    Translator(#[from] TranslateError),
}

/// `[translation]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    /// Never read from the file; only from [`API_KEY_ENV`] or the command line.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Consult the built-in glossary before the remote service.
    pub glossary: bool,
    /// Use the remote service when an API key is available.
    pub remote: bool,
    /// Translate the free-text conclusion of Mandarin reports.
    pub translate_conclusion: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout_secs: 30,
            glossary: true,
            remote: true,
            translate_conclusion: true,
        }
    }
}

impl TranslationConfig {
    fn remote_settings(&self) -> Option<OpenAiSettings> {
        if !self.remote {
            return None;
        }
        let api_key = self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())?;
        Some(OpenAiSettings {
            api_key: api_key.to_owned(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// The translation backend described by this section, if any.
    pub fn build_translator(&self) -> Result<Option<Box<dyn Translator>>, ConfigError> {
        let remote = self.remote_settings().map(OpenAiTranslator::new).transpose()?;

        let translator: Option<Box<dyn Translator>> = match (self.glossary, remote) {
            (true, Some(remote)) => Some(Box::new(Chain::new(Glossary::builtin(), remote))),
            (true, None) => Some(Box::new(Glossary::builtin())),
            (false, Some(remote)) => Some(Box::new(remote)),
            (false, None) => None,
        };

        match &translator {
            Some(translator) => info!("Translation backend: {}", translator.name()),
            None => info!("No translation backend configured"),
        }
        Ok(translator)
    }

    /// A fresh [`Localizer`] with its own empty cache.
    pub fn localizer(&self) -> Result<Localizer, ConfigError> {
        Ok(match self.build_translator()? {
            Some(translator) => Localizer::new(translator),
            None => Localizer::passthrough(),
        })
    }
}

/// `[report]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Language of the generated document.
    pub language: Language,
    /// Language of command line messages.
    pub ui_language: Language,
    pub location: City,
    /// Directory the PDF is written to; the working directory when unset.
    pub output_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub translation: TranslationConfig,
    pub fonts: FontSettings,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Loads `path` when given, otherwise [`CONFIG_FILE_NAME`] if it exists in
    /// the working directory, otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Overlays the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| env::var(key).ok())
    }

    /// Overlays variables provided by `lookup`; blank values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = var(API_KEY_ENV) {
            self.translation.api_key = Some(key);
        }
        if let Some(url) = var(TRANSLATION_URL_ENV) {
            self.translation.base_url = url;
        }
        if let Some(dir) = var(FONTS_DIR_ENV) {
            self.fonts.fonts_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = var(CJK_FONTS_DIR_ENV) {
            self.fonts.cjk_fonts_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.translation.model, DEFAULT_MODEL);
        assert_eq!(config.translation.timeout_secs, 30);
        assert!(config.translation.glossary);
        assert_eq!(config.report.location.name(), "Shanghai");
    }

    #[test]
    fn parses_all_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [translation]
            base_url = "http://localhost:8080/v1"
            timeout_secs = 5
            glossary = false
            translate_conclusion = false

            [fonts]
            fonts_dir = "/opt/fonts"
            cjk_font_file = "SourceHanSans.ttf"

            [report]
            language = "zh"
            ui_language = "mandarin"
            location = "深圳"
            "#,
        )
        .unwrap();

        assert_eq!(config.translation.base_url, "http://localhost:8080/v1");
        assert!(!config.translation.glossary);
        assert!(!config.translation.translate_conclusion);
        assert_eq!(config.fonts.fonts_dir, Some(PathBuf::from("/opt/fonts")));
        assert_eq!(config.fonts.cjk_font_file, "SourceHanSans.ttf");
        assert_eq!(config.report.language, Language::Mandarin);
        assert_eq!(config.report.ui_language, Language::Mandarin);
        assert_eq!(config.report.location.name(), "Shenzhen");
    }

    #[test]
    fn rejects_unknown_keys_and_cities() {
        assert!(AppConfig::from_toml_str("[translation]\napi_key = \"sk-1\"\n").is_err());
        assert!(AppConfig::from_toml_str("[report]\nlocation = \"Atlantis\"\n").is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (API_KEY_ENV, "sk-test"),
            (TRANSLATION_URL_ENV, "http://proxy/v1"),
            (CJK_FONTS_DIR_ENV, "/usr/share/fonts/noto"),
            (FONTS_DIR_ENV, "  "),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_toml_str("[fonts]\nfonts_dir = \"/opt/fonts\"\n")
            .unwrap()
            .with_env_from(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.translation.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.translation.base_url, "http://proxy/v1");
        assert_eq!(config.fonts.fonts_dir, Some(PathBuf::from("/opt/fonts")));
        assert_eq!(
            config.fonts.cjk_fonts_dir,
            Some(PathBuf::from("/usr/share/fonts/noto"))
        );
    }

    #[test]
    fn translator_selection() {
        let mut translation = TranslationConfig::default();
        let glossary_only = translation.build_translator().unwrap().unwrap();
        assert_eq!(glossary_only.name(), "glossary");

        translation.api_key = Some("sk-test".to_owned());
        let chained = translation.build_translator().unwrap().unwrap();
        assert_eq!(chained.name(), format!("glossary + {}", DEFAULT_MODEL));

        translation.glossary = false;
        translation.remote = false;
        assert!(translation.build_translator().unwrap().is_none());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[report]\nlanguage = \"en\"\nlocation = \"Foshan\"\n").unwrap();

        let config = AppConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.report.location.name(), "Foshan");

        assert!(matches!(
            AppConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
