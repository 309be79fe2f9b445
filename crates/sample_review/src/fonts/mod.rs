//! Font loading for the report renderer.
//!
//! English reports use the bundled Roboto family.  Mandarin reports need a font
//! with CJK glyphs; a single TTF (Noto Sans SC by default) is used for all four
//! styles.  When no CJK font can be found the Latin family is used instead and
//! a warning is logged, since most Chinese glyphs will then be missing.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{info, warn};
use serde::Deserialize;

use crate::locale::Language;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// CJK font file looked up when none is configured.
pub const DEFAULT_CJK_FONT_FILE: &str = "NotoSansSC-Regular.ttf";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Arial";
const WINDOWS_CJK_FALLBACK_FILE: &str = "simhei.ttf";

struct WindowsFontFiles {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const WINDOWS_FONT_FILES: WindowsFontFiles = WindowsFontFiles {
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

/// `[fonts]` configuration section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSettings {
    /// Directory holding the four Roboto files.
    pub fonts_dir: Option<PathBuf>,
    /// Directory holding [`FontSettings::cjk_font_file`].
    pub cjk_fonts_dir: Option<PathBuf>,
    pub cjk_font_file: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            cjk_fonts_dir: None,
            cjk_font_file: DEFAULT_CJK_FONT_FILE.to_owned(),
        }
    }
}

/// The `assets/fonts` directory of this crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn bundled_directory_candidates(candidates: &mut Vec<PathBuf>) {
    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(candidates, bin_dir.join("assets/fonts"));
        }
    }
    push_unique(candidates, bundled_fonts_source_dir());
}

fn font_directory_candidates(settings: &FontSettings) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = &settings.fonts_dir {
        candidates.push(dir.clone());
    }
    bundled_directory_candidates(&mut candidates);
    candidates
}

fn cjk_directory_candidates(settings: &FontSettings) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = &settings.cjk_fonts_dir {
        candidates.push(dir.clone());
    }
    if let Some(dir) = &settings.fonts_dir {
        push_unique(&mut candidates, dir.clone());
    }
    bundled_directory_candidates(&mut candidates);
    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn not_found(message: String, detail: &str) -> Error {
    Error::new(message, io::Error::new(io::ErrorKind::NotFound, detail.to_owned()))
}

fn resolve_font_directory(settings: &FontSettings) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(settings) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(not_found(
        format!(
            "Unable to locate bundled font directory. Checked: {}. See assets/fonts/README.md or set SAMPLE_REVIEW_FONTS_DIR.",
            summary
        ),
        "bundled fonts directory not found",
    ))
}

fn resolve_cjk_font_file(settings: &FontSettings) -> Result<PathBuf, Error> {
    let candidates = cjk_directory_candidates(settings);
    if let Some(path) = candidates
        .iter()
        .map(|dir| dir.join(&settings.cjk_font_file))
        .find(|path| path.is_file())
    {
        return Ok(path);
    }

    if let Some(path) = windows_font_directory()
        .map(|dir| dir.join(WINDOWS_CJK_FALLBACK_FILE))
        .filter(|path| path.is_file())
    {
        return Ok(path);
    }

    let checked = candidates
        .iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(not_found(
        format!(
            "Unable to locate CJK font '{}'. Checked: {}. Set SAMPLE_REVIEW_CJK_FONTS_DIR.",
            settings.cjk_font_file, checked
        ),
        "CJK font not found",
    ))
}

fn load_bundled_font_family(settings: &FontSettings) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(settings)?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load default font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env::var_os(var).filter(|value| !value.is_empty()) {
                let candidate = PathBuf::from(root).join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn load_font_file(path: &Path, description: &str) -> Result<FontData, Error> {
    FontData::load(path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load {} font at {}: {}",
                description,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn windows_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_font_directory().ok_or_else(|| {
        not_found(
            "Windows font directory not found for fallback".to_owned(),
            "windows fonts directory not found",
        )
    })?;
    let load = |file: &str, style: &str| {
        load_font_file(&directory.join(file), &format!("Windows fallback {}", style))
    };

    Ok(FontFamily {
        regular: load(WINDOWS_FONT_FILES.regular, "regular")?,
        bold: load(WINDOWS_FONT_FILES.bold, "bold")?,
        italic: load(WINDOWS_FONT_FILES.italic, "italic")?,
        bold_italic: load(WINDOWS_FONT_FILES.bold_italic, "bold italic")?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the bundled Roboto family, falling back to the Windows Arial family
/// when the bundled fonts are missing.
pub fn latin_font_family(settings: &FontSettings) -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family(settings) {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match windows_fallback_font_family() {
            Ok(fallback) => {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to Windows '{}' family.",
                    err, WINDOWS_FALLBACK_FAMILY_NAME
                );
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); Windows fallback failed: {}",
                    err, fallback_err
                );
                Err(not_found(
                    format!(
                        "Bundled fonts unavailable and Windows fallback failed: {}",
                        fallback_err
                    ),
                    "default fonts are not available",
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Loads the configured CJK font and uses it for every style of the family.
pub fn cjk_font_family(settings: &FontSettings) -> Result<FontFamily<FontData>, Error> {
    let path = resolve_cjk_font_file(settings)?;
    let data = load_font_file(&path, "CJK")?;
    info!("Using CJK font {}", path.display());

    Ok(FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    })
}

/// The font family able to display text in `language`.
///
/// A Mandarin report without a usable CJK font is rendered with the Latin
/// family and `Ok` is still returned.
pub fn font_family_for(
    language: Language,
    settings: &FontSettings,
) -> Result<FontFamily<FontData>, Error> {
    match language {
        Language::English => latin_font_family(settings),
        Language::Mandarin => cjk_font_family(settings).or_else(|err| {
            warn!(
                "{}; Mandarin text will be rendered with the '{}' family and may show missing glyphs.",
                err, DEFAULT_FONT_FAMILY_NAME
            );
            latin_font_family(settings)
        }),
    }
}

/// Whether the four bundled Roboto files can be found.
pub fn default_fonts_available(settings: &FontSettings) -> bool {
    resolve_font_directory(settings).is_ok()
}

/// Whether the configured CJK font file can be found.
pub fn cjk_font_available(settings: &FontSettings) -> bool {
    resolve_cjk_font_file(settings).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_is_searched_first() {
        let settings = FontSettings {
            fonts_dir: Some(PathBuf::from("/opt/review-fonts")),
            ..FontSettings::default()
        };
        let candidates = font_directory_candidates(&settings);
        assert_eq!(candidates[0], PathBuf::from("/opt/review-fonts"));
        assert!(candidates.contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn cjk_search_falls_back_to_latin_directories() {
        let settings = FontSettings {
            fonts_dir: Some(PathBuf::from("/opt/latin")),
            cjk_fonts_dir: Some(PathBuf::from("/opt/cjk")),
            ..FontSettings::default()
        };
        let candidates = cjk_directory_candidates(&settings);
        assert_eq!(candidates[0], PathBuf::from("/opt/cjk"));
        assert_eq!(candidates[1], PathBuf::from("/opt/latin"));
    }

    #[test]
    fn missing_directory_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FontSettings {
            fonts_dir: Some(dir.path().join("nope")),
            cjk_fonts_dir: Some(dir.path().to_path_buf()),
            cjk_font_file: "__missing_cjk__.ttf".to_owned(),
        };
        let err = resolve_cjk_font_file(&settings).unwrap_err();
        assert!(fonts_missing(&err));
        assert!(!cjk_font_available(&settings));
    }

    #[test]
    fn invalid_font_file_is_not_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = load_font_file(&path, "CJK").unwrap_err();
        assert!(!fonts_missing(&err));
    }
}
