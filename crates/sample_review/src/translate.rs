//! Translation backends, the per-session translation cache and the resolver
//! that turns labels and free text into display strings.
//!
//! All source strings are English.  Resolving for [`Language::English`] never
//! touches a backend; resolving for [`Language::Mandarin`] goes through the
//! [`TranslationCache`] first and calls the configured [`Translator`] at most
//! once per distinct text.  Backend failures are never propagated: the source
//! text is used instead, cached, and reported as a soft warning.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::locale::{Label, Language, SampleType};
use crate::measurement::{MeasurementPoint, SOCK_FOAM_ENGLISH, SOCK_FOAM_MANDARIN};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model used for label translation.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f64 = 0.1;
const MAX_TOKENS: u32 = 500;

/// Errors reported by translation backends.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The HTTP request could not be completed.
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("translation service error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The service answered without any translated text.
    #[error("translation service returned an empty response")]
    EmptyResponse,

    /// A dictionary backend has no entry for the text.
    #[error("no glossary entry for `{0}`")]
    NoEntry(String),

    /// The backend cannot translate into the requested language.
    #[error("translation into {0} is not supported by this backend")]
    Unsupported(Language),
}

/// A collaborator that translates English text into a target language.
pub trait Translator {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Translates `text`, returning only the translation.
    fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        (**self).translate(text, target)
    }
}

/// Connection settings for [`OpenAiTranslator`].
#[derive(Clone, Debug, PartialEq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn system_prompt(target: Language) -> String {
    format!(
        "You are a professional translator. Translate the following text to {}. \
         Only return the translation, no explanations. \
         Preserve any numbers, dates, and special formatting.",
        target.code()
    )
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiTranslator {
    pub fn new(settings: OpenAiSettings) -> Result<Self, TranslateError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

impl Translator for OpenAiTranslator {
    fn name(&self) -> &str {
        &self.settings.model
    }

    fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_owned(),
                    content: system_prompt(target),
                },
                ChatMessage {
                    role: "user".to_owned(),
                    content: text.to_owned(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(TranslateError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(TranslateError::EmptyResponse)
    }
}

/// Offline English → Mandarin dictionary covering every fixed report string.
#[derive(Debug, Clone)]
pub struct Glossary {
    entries: HashMap<&'static str, &'static str>,
}

impl Glossary {
    /// Glossary built from the curated label, sample-type and measurement tables.
    pub fn builtin() -> Self {
        let labels = Label::ALL
            .into_iter()
            .map(|label| (label.english(), label.mandarin()));
        let sample_types = SampleType::ALL
            .into_iter()
            .map(|kind| (kind.english(), kind.mandarin()));
        let points = MeasurementPoint::all().map(|point| (point.english(), point.mandarin()));

        let entries = labels
            .chain(sample_types)
            .chain(points)
            .chain([(SOCK_FOAM_ENGLISH, SOCK_FOAM_MANDARIN)])
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Glossary {
    fn name(&self) -> &str {
        "glossary"
    }

    fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        if target != Language::Mandarin {
            return Err(TranslateError::Unsupported(target));
        }
        self.entries
            .get(text)
            .map(|&translated| translated.to_owned())
            .ok_or_else(|| TranslateError::NoEntry(text.to_owned()))
    }
}

/// Tries `primary` and falls back to `secondary` when it fails.
pub struct Chain<A, B> {
    primary: A,
    secondary: B,
    name: String,
}

impl<A: Translator, B: Translator> Chain<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        let name = format!("{} + {}", primary.name(), secondary.name());
        Self {
            primary,
            secondary,
            name,
        }
    }
}

impl<A: Translator, B: Translator> Translator for Chain<A, B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        match self.primary.translate(text, target) {
            Ok(translated) => Ok(translated),
            Err(err) => {
                debug!(
                    "{} could not translate {:?} ({}); trying {}",
                    self.primary.name(),
                    text,
                    err,
                    self.secondary.name()
                );
                self.secondary.translate(text, target)
            }
        }
    }
}

/// Whether `text` is a plain number such as `123`, `4.5`, `-10` or `1,000`.
///
/// Such strings are never sent to a backend.
pub fn is_numeric_like(text: &str) -> bool {
    let mut digits = 0;
    for ch in text.trim().chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' | ',' | '-' => {}
            _ => return false,
        }
    }
    digits > 0
}

/// Memoized translations keyed by `(source text, target language)`.
///
/// The cache belongs to one session and is never shared between sessions.  It
/// grows without eviction.
#[derive(Debug, Default, Clone)]
pub struct TranslationCache {
    entries: HashMap<Language, HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str, language: Language) -> Option<&str> {
        self.entries
            .get(&language)
            .and_then(|entries| entries.get(text))
            .map(String::as_str)
    }

    pub fn insert(&mut self, text: impl Into<String>, language: Language, value: impl Into<String>) {
        self.entries
            .entry(language)
            .or_default()
            .insert(text.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves labels and free text into display strings for a language.
pub struct Localizer {
    translator: Option<Box<dyn Translator>>,
    cache: TranslationCache,
    warnings: Vec<String>,
    reported_missing_backend: bool,
}

impl Localizer {
    /// Resolver backed by `translator`.
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self {
            translator: Some(translator),
            cache: TranslationCache::new(),
            warnings: Vec::new(),
            reported_missing_backend: false,
        }
    }

    /// Resolver without any backend; every text passes through unchanged.
    pub fn passthrough() -> Self {
        Self {
            translator: None,
            cache: TranslationCache::new(),
            warnings: Vec::new(),
            reported_missing_backend: false,
        }
    }

    /// Resolver that only consults the built-in glossary.
    pub fn with_glossary() -> Self {
        Self::new(Box::new(Glossary::builtin()))
    }

    pub fn translator_name(&self) -> Option<&str> {
        self.translator.as_ref().map(|translator| translator.name())
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Display text of `label`.
    pub fn label(&mut self, label: Label, language: Language) -> String {
        self.translate(label.english(), language)
    }

    /// Display text of a raw key; unknown keys resolve to the key itself.
    pub fn resolve_key(&mut self, key: &str, language: Language) -> String {
        match Label::from_key(key) {
            Some(label) => self.label(label, language),
            None => self.translate(key, language),
        }
    }

    /// Translates English `text` into `language`.
    pub fn translate(&mut self, text: &str, language: Language) -> String {
        if language == Language::English || text.trim().is_empty() {
            return text.to_owned();
        }

        if let Some(cached) = self.cache.get(text, language) {
            debug!("translation cache hit for {:?} ({})", text, language.code());
            return cached.to_owned();
        }

        if is_numeric_like(text) {
            self.cache.insert(text, language, text);
            return text.to_owned();
        }

        let resolved = match &self.translator {
            Some(translator) => match translator.translate(text, language) {
                Ok(translated) => {
                    debug!(
                        "translated {:?} into {} via {}",
                        text,
                        language.code(),
                        translator.name()
                    );
                    translated
                }
                Err(err) => {
                    let message = format!(
                        "Translation failed for {:?}: {}. Using original text.",
                        text, err
                    );
                    warn!("{}", message);
                    self.warnings.push(message);
                    text.to_owned()
                }
            },
            None => {
                if !self.reported_missing_backend {
                    self.reported_missing_backend = true;
                    let message =
                        "No translation backend configured; labels stay in English.".to_owned();
                    warn!("{}", message);
                    self.warnings.push(message);
                }
                text.to_owned()
            }
        };

        self.cache.insert(text, language, resolved.clone());
        resolved
    }

    /// Soft warnings recorded since the last call, oldest first.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("translator", &self.translator_name())
            .field("cached", &self.cache.len())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    /// Backend that answers with a fixed prefix and records every call.
    #[derive(Clone, Default)]
    pub struct Recording {
        pub calls: Rc<RefCell<Vec<String>>>,
    }

    impl Translator for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn translate(&self, text: &str, _target: Language) -> Result<String, TranslateError> {
            self.calls.borrow_mut().push(text.to_owned());
            Ok(format!("zh:{text}"))
        }
    }

    /// Backend that always fails, counting attempts.
    #[derive(Clone, Default)]
    pub struct Unavailable {
        pub attempts: Rc<Cell<usize>>,
    }

    impl Translator for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn translate(&self, _text: &str, _target: Language) -> Result<String, TranslateError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(TranslateError::Server {
                status: 503,
                message: "service unavailable".to_owned(),
            })
        }
    }
}
