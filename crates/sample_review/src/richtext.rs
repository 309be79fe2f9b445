//! Styled text fragments.
//!
//! A [`Span`] carries the inline attributes the report uses (bold, italic,
//! color, size) without depending on a font being loaded, and converts into a
//! `genpdf` [`StyledString`] once the document is rendered.

use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
    size: Option<u8>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn size(&self) -> Option<u8> {
        self.size
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn sized(mut self, size: u8) -> Self {
        self.size = Some(size);
        self
    }

    /// The [`Style`] described by the span's attributes.
    pub fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if let Some(size) = self.size {
            style.set_font_size(size);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_reflects_attributes() {
        let styled = Span::new("Sock Foam")
            .bold()
            .italic()
            .sized(14)
            .colored(Color::Rgb(10, 20, 30))
            .to_styled_string();
        assert_eq!(styled.s, "Sock Foam");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.font_size(), 14);
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn plain_span_has_no_attributes() {
        let span = Span::new("ST-1");
        assert!(!span.is_bold());
        assert_eq!(span.color(), None);
        assert_eq!(span.size(), None);
    }
}
