//! Custom `genpdf` elements used by the report layout.
//!
//! `genpdf` only strokes hairlines (1pt wide) and has no filled shapes, so
//! backgrounds are painted as horizontal hairlines packed closer than their
//! width.  Text inside boxes is wrapped by [`wrap_text`], which also breaks
//! between CJK characters.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Scale, Size};

use crate::model::HorizontalAlignment;
use crate::theme;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const DEFAULT_CAPTION_SPACING_MM: f64 = 2.0;
/// Width of a stroked line; genpdf draws every line 1pt wide.
const HAIRLINE_MM: f64 = 0.35;
/// Distance between the hairlines of a fill.
const FILL_STEP_MM: f64 = 0.25;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

/// Vertical offsets of the hairlines that cover a band `height` tall.
fn fill_offsets(height: f64) -> Vec<f64> {
    if height <= 0.0 {
        return Vec::new();
    }
    let half = HAIRLINE_MM / 2.0;
    let last = (height - half).max(half.min(height / 2.0));
    let mut offsets = Vec::new();
    let mut offset = half.min(height / 2.0);
    while offset < last {
        offsets.push(offset);
        offset += FILL_STEP_MM;
    }
    offsets.push(last);
    offsets
}

/// Paints the rectangle at (`x`, `y`) with the given size in `color`.
fn fill_rect(area: &render::Area<'_>, x: f64, y: f64, width: f64, height: f64, color: Color) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let style = Style::new().with_color(color);
    for offset in fill_offsets(height) {
        area.draw_line(
            vec![position(x, y + offset), position(x + width, y + offset)],
            style,
        );
    }
}

fn stroke(area: &render::Area<'_>, from: (f64, f64), to: (f64, f64), color: Color) {
    area.draw_line(
        vec![position(from.0, from.1), position(to.0, to.1)],
        Style::new().with_color(color),
    );
}

fn text_width(context: &genpdf::Context, text: &str, style: Style) -> f64 {
    mm_to_f64(StyledString::new(text.to_owned(), style).width(&context.font_cache))
}

fn line_height(context: &genpdf::Context, style: Style) -> f64 {
    mm_to_f64(style.line_height(&context.font_cache))
}

fn breaks_after(ch: char) -> bool {
    ch.is_whitespace() || !ch.is_ascii()
}

/// Splits `text` into lines no wider than `max_width` millimetres.
///
/// Lines break at whitespace and between non-ASCII characters; a word wider
/// than `max_width` is split by character.  Explicit newlines are kept.
pub fn wrap_text(
    context: &genpdf::Context,
    text: &str,
    style: Style,
    max_width: f64,
) -> Vec<String> {
    wrap_lines(text, max_width, |part| text_width(context, part, style))
}

/// Line breaking over an additive width `measure`.
///
/// Every token and every character of an over-long token is measured once.
fn wrap_lines(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        // Width of `line` without its trailing whitespace.
        let mut line_width = 0.0;
        // Width of the whitespace that ends `line`.
        let mut gap = 0.0;
        let mut wrapped = false;

        for token in tokens(paragraph) {
            let word = token.trim_end();
            let space = &token[word.len()..];
            if line.is_empty() && word.is_empty() && wrapped {
                continue;
            }
            let word_width = measure(word);
            let space_width = if space.is_empty() { 0.0 } else { measure(space) };

            if !line.is_empty() && line_width + gap + word_width > max_width {
                lines.push(line.trim_end().to_owned());
                line.clear();
                line_width = 0.0;
                gap = 0.0;
                wrapped = true;
            }

            if line.is_empty() && word_width > max_width {
                let mut buffer = [0u8; 4];
                for ch in word.chars() {
                    let ch_width = measure(ch.encode_utf8(&mut buffer));
                    if !line.is_empty() && line_width + ch_width > max_width {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                        wrapped = true;
                    }
                    line.push(ch);
                    line_width += ch_width;
                }
            } else {
                line.push_str(word);
                line_width += gap + word_width;
            }
            line.push_str(space);
            gap = space_width;
        }
        lines.push(line.trim_end().to_owned());
    }

    lines
}

/// Splits a paragraph after every break opportunity.
fn tokens(paragraph: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (index, ch) in paragraph.char_indices() {
        if breaks_after(ch) {
            let end = index + ch.len_utf8();
            tokens.push(&paragraph[start..end]);
            start = end;
        }
    }
    if start < paragraph.len() {
        tokens.push(&paragraph[start..]);
    }
    tokens
}

fn aligned_x(alignment: Alignment, left: f64, width: f64, text_width: f64) -> f64 {
    match alignment {
        Alignment::Left => left,
        Alignment::Center => left + (width - text_width) / 2.0,
        Alignment::Right => left + width - text_width,
    }
}

/// Prints one line of text with its top-left corner at (`x`, `y`).
fn print_line(
    context: &genpdf::Context,
    area: &render::Area<'_>,
    x: f64,
    y: f64,
    text: &str,
    style: Style,
) -> Result<bool, Error> {
    match area.text_section(&context.font_cache, position(x, y), style) {
        Some(mut section) => {
            section.print_str(text, style)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Coloured band at the top of each page with a title and a sub-line.
pub struct Banner {
    title: String,
    subtitle: String,
    height: f64,
}

impl Banner {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            height: 18.0,
        }
    }

    pub fn with_height(mut self, height_mm: f64) -> Self {
        self.height = height_mm;
        self
    }
}

impl Element for Banner {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        fill_rect(&area, 0.0, 0.0, width, self.height, theme::PRIMARY);
        fill_rect(&area, 0.0, self.height - 1.2, width, 1.2, theme::SECONDARY);

        let mut title_style = style;
        title_style.set_bold();
        title_style.set_font_size(theme::SECTION_SIZE);
        title_style.set_color(theme::WHITE);

        let mut subtitle_style = style;
        subtitle_style.set_font_size(theme::FOOTER_SIZE + 1);
        subtitle_style.set_color(theme::HEADER_SUBTITLE);

        let title_height = line_height(context, title_style);
        let subtitle_height = line_height(context, subtitle_style);
        let top = ((self.height - title_height - subtitle_height) / 2.0).max(0.0);

        let title_x = aligned_x(
            Alignment::Center,
            0.0,
            width,
            text_width(context, &self.title, title_style),
        );
        print_line(context, &area, title_x, top, &self.title, title_style)?;

        let subtitle_x = aligned_x(
            Alignment::Center,
            0.0,
            width,
            text_width(context, &self.subtitle, subtitle_style),
        );
        print_line(
            context,
            &area,
            subtitle_x,
            top + title_height,
            &self.subtitle,
            subtitle_style,
        )?;

        let mut result = RenderResult::default();
        result.size = Size::new(area.size().width, mm_from_f64(self.height + 4.0));
        Ok(result)
    }
}

/// Footer line with left, centered and right aligned texts under a rule.
pub struct FooterBar {
    left: String,
    center: String,
    right: String,
}

impl FooterBar {
    pub fn new(
        left: impl Into<String>,
        center: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            left: left.into(),
            center: center.into(),
            right: right.into(),
        }
    }
}

impl Element for FooterBar {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        stroke(&area, (0.0, 0.0), (width, 0.0), theme::PRIMARY);

        let mut text_style = style;
        text_style.set_font_size(theme::FOOTER_SIZE);
        text_style.set_color(theme::DARK);

        let top = 2.0;
        for (text, alignment) in [
            (&self.left, Alignment::Left),
            (&self.center, Alignment::Center),
            (&self.right, Alignment::Right),
        ] {
            let x = aligned_x(alignment, 0.0, width, text_width(context, text, text_style));
            print_line(context, &area, x, top, text, text_style)?;
        }

        let mut result = RenderResult::default();
        result.size = Size::new(
            area.size().width,
            mm_from_f64(top + line_height(context, text_style)),
        );
        Ok(result)
    }
}

/// Section heading: bold colored text with a rule underneath.
pub struct RuledHeading {
    text: String,
    color: Color,
    rule_offset: f64,
}

impl RuledHeading {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: theme::PRIMARY,
            rule_offset: 1.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Element for RuledHeading {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut heading_style = style;
        heading_style.set_bold();
        heading_style.set_font_size(theme::SECTION_SIZE);
        heading_style.set_color(self.color);

        let height = line_height(context, heading_style) + self.rule_offset + HAIRLINE_MM;
        let mut result = RenderResult::default();
        if height > mm_to_f64(area.size().height) {
            result.has_more = true;
            return Ok(result);
        }

        if !print_line(context, &area, 0.0, 0.0, &self.text, heading_style)? {
            result.has_more = true;
            return Ok(result);
        }

        let width = mm_to_f64(area.size().width);
        let rule_y = line_height(context, heading_style) + self.rule_offset;
        stroke(&area, (0.0, rule_y), (width, rule_y), self.color);

        result.size = Size::new(area.size().width, mm_from_f64(height));
        Ok(result)
    }
}

/// Wrapped text on a filled background, optionally with a colored left edge.
///
/// Long texts continue on the next page line by line.
pub struct Callout {
    text: String,
    text_style: Style,
    background: Color,
    edge: Option<Color>,
    alignment: Alignment,
    padding: f64,
    next_line: usize,
}

impl Callout {
    pub fn new(text: impl Into<String>, background: Color) -> Self {
        Self {
            text: text.into(),
            text_style: Style::new(),
            background,
            edge: None,
            alignment: Alignment::Left,
            padding: 2.5,
            next_line: 0,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.text_style = style;
        self
    }

    pub fn with_edge(mut self, color: Color) -> Self {
        self.edge = Some(color);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Element for Callout {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let text_style = style.and(self.text_style);
        let width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);
        let inner_width = width - 2.0 * self.padding;
        let line = line_height(context, text_style);

        let lines = wrap_text(context, &self.text, text_style, inner_width);
        let remaining = &lines[self.next_line.min(lines.len())..];

        let fitting = (((available - 2.0 * self.padding) / line).floor().max(0.0) as usize)
            .min(remaining.len());
        let mut result = RenderResult::default();
        if fitting == 0 && !remaining.is_empty() {
            result.has_more = true;
            return Ok(result);
        }

        let height = fitting as f64 * line + 2.0 * self.padding;
        fill_rect(&area, 0.0, 0.0, width, height, self.background);
        if let Some(edge) = self.edge {
            fill_rect(&area, 0.0, 0.0, 1.2, height, edge);
        }

        for (index, text) in remaining[..fitting].iter().enumerate() {
            let x = aligned_x(
                self.alignment,
                self.padding,
                inner_width,
                text_width(context, text, text_style),
            );
            print_line(
                context,
                &area,
                x,
                self.padding + index as f64 * line,
                text,
                text_style,
            )?;
        }

        self.next_line += fitting;
        result.has_more = self.next_line < lines.len();
        result.size = Size::new(area.size().width, mm_from_f64(height));
        Ok(result)
    }
}

/// A single cell of a [`StyledGrid`].
#[derive(Clone, Debug)]
pub struct GridCell {
    text: String,
    style: Style,
    background: Option<Color>,
    alignment: Alignment,
}

impl GridCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
            background: None,
            alignment: Alignment::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.style.set_bold();
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.style.set_color(color);
        self
    }

    pub fn sized(mut self, size: u8) -> Self {
        self.style.set_font_size(size);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Table with weighted columns, per-cell styling and striped rows.
///
/// Header rows are repeated at the top of every page the grid spans.  Rows
/// never split across pages.
pub struct StyledGrid {
    weights: Vec<usize>,
    header_rows: Vec<Vec<GridCell>>,
    rows: Vec<Vec<GridCell>>,
    stripes: Option<(Color, Color)>,
    border: Option<Color>,
    padding: f64,
    next_row: usize,
}

impl StyledGrid {
    pub fn new(weights: Vec<usize>) -> Self {
        Self {
            weights,
            header_rows: Vec::new(),
            rows: Vec::new(),
            stripes: None,
            border: Some(theme::BORDER),
            padding: 1.5,
            next_row: 0,
        }
    }

    pub fn column_count(&self) -> usize {
        self.weights.len()
    }

    pub fn push_header_row(&mut self, cells: Vec<GridCell>) -> Result<(), Error> {
        self.check_width(&cells)?;
        self.header_rows.push(cells);
        Ok(())
    }

    pub fn push_row(&mut self, cells: Vec<GridCell>) -> Result<(), Error> {
        self.check_width(&cells)?;
        self.rows.push(cells);
        Ok(())
    }

    /// Alternating backgrounds for even and odd data rows.
    pub fn with_stripes(mut self, even: Color, odd: Color) -> Self {
        self.stripes = Some((even, odd));
        self
    }

    pub fn with_border(mut self, border: Option<Color>) -> Self {
        self.border = border;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn check_width(&self, cells: &[GridCell]) -> Result<(), Error> {
        if cells.len() == self.weights.len() {
            Ok(())
        } else {
            Err(Error::new(
                format!(
                    "Grid row has {} cells but the grid has {} columns",
                    cells.len(),
                    self.weights.len()
                ),
                genpdf::error::ErrorKind::InvalidData,
            ))
        }
    }

    fn column_widths(&self, total: f64) -> Vec<f64> {
        let sum: usize = self.weights.iter().sum();
        if sum == 0 {
            return vec![0.0; self.weights.len()];
        }
        self.weights
            .iter()
            .map(|&weight| total * weight as f64 / sum as f64)
            .collect()
    }

    fn layout_row(
        &self,
        context: &genpdf::Context,
        row: &[GridCell],
        widths: &[f64],
        style: Style,
    ) -> (Vec<Vec<String>>, f64) {
        let mut height: f64 = 0.0;
        let lines = row
            .iter()
            .zip(widths)
            .map(|(cell, &width)| {
                let cell_style = style.and(cell.style);
                let lines = wrap_text(
                    context,
                    &cell.text,
                    cell_style,
                    width - 2.0 * self.padding,
                );
                height = height.max(lines.len().max(1) as f64 * line_height(context, cell_style));
                lines
            })
            .collect();
        (lines, height + 2.0 * self.padding)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        top: f64,
        row: &[GridCell],
        lines: &[Vec<String>],
        height: f64,
        widths: &[f64],
        stripe: Option<Color>,
        style: Style,
    ) -> Result<(), Error> {
        let total: f64 = widths.iter().sum();
        if let Some(color) = stripe {
            fill_rect(area, 0.0, top, total, height, color);
        }

        let mut x = 0.0;
        for ((cell, cell_lines), &width) in row.iter().zip(lines).zip(widths) {
            if let Some(color) = cell.background {
                fill_rect(area, x, top, width, height, color);
            }

            let cell_style = style.and(cell.style);
            let line = line_height(context, cell_style);
            for (index, text) in cell_lines.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let text_x = aligned_x(
                    cell.alignment,
                    x + self.padding,
                    width - 2.0 * self.padding,
                    text_width(context, text, cell_style),
                );
                print_line(
                    context,
                    area,
                    text_x,
                    top + self.padding + index as f64 * line,
                    text,
                    cell_style,
                )?;
            }
            x += width;
        }

        if let Some(border) = self.border {
            let bottom = top + height;
            stroke(area, (0.0, top), (total, top), border);
            stroke(area, (0.0, bottom), (total, bottom), border);
            let mut x = 0.0;
            stroke(area, (x, top), (x, bottom), border);
            for width in widths {
                x += width;
                stroke(area, (x, top), (x, bottom), border);
            }
        }
        Ok(())
    }
}

impl Element for StyledGrid {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let total_width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);
        let widths = self.column_widths(total_width);

        let headers: Vec<_> = self
            .header_rows
            .iter()
            .map(|row| {
                let (lines, height) = self.layout_row(context, row, &widths, style);
                (row, lines, height)
            })
            .collect();
        let header_height: f64 = headers.iter().map(|(_, _, height)| height).sum();

        let mut result = RenderResult::default();
        let mut top = 0.0;
        let mut rendered = 0;

        while self.next_row < self.rows.len() {
            let row = &self.rows[self.next_row];
            let (lines, height) = self.layout_row(context, row, &widths, style);
            let needed = if rendered == 0 { header_height + height } else { height };
            if top + needed > available {
                if rendered == 0 {
                    result.has_more = true;
                    return Ok(result);
                }
                break;
            }

            if rendered == 0 {
                for (header, header_lines, height) in &headers {
                    self.draw_row(
                        context, &area, top, header, header_lines, *height, &widths, None, style,
                    )?;
                    top += height;
                }
            }

            let stripe = self.stripes.map(|(even, odd)| {
                if self.next_row % 2 == 0 {
                    even
                } else {
                    odd
                }
            });
            self.draw_row(
                context, &area, top, row, &lines, height, &widths, stripe, style,
            )?;
            top += height;
            rendered += 1;
            self.next_row += 1;
        }

        result.has_more = self.next_row < self.rows.len();
        result.size = Size::new(area.size().width, mm_from_f64(top));
        Ok(result)
    }
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// An image with a caption stacked underneath, scaled to a fixed width.
pub struct CaptionedImage {
    image: Image,
    caption: Paragraph,
    alignment: Alignment,
    natural_size: Size,
    requested_width: Option<Mm>,
    spacing: Mm,
}

impl CaptionedImage {
    /// Creates a captioned image from the file located at `path`.
    pub fn from_path(path: impl AsRef<Path>, caption: Paragraph) -> Result<Self, Error> {
        let dynamic = decode_image_from_path(path)?;
        let natural_size = estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI);
        let image = Image::from_dynamic_image(dynamic)?;
        let mut element = Self {
            image,
            caption,
            alignment: Alignment::Left,
            natural_size,
            requested_width: None,
            spacing: mm_from_f64(DEFAULT_CAPTION_SPACING_MM),
        };
        element.apply_alignment();
        Ok(element)
    }

    /// Sets the alignment shared by the image and the caption.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self.apply_alignment();
        self
    }

    /// Constrains the rendered width of the image while preserving the aspect ratio.
    pub fn with_width(mut self, width: impl Into<Option<Mm>>) -> Self {
        self.requested_width = width.into();
        self.apply_width();
        self
    }

    fn apply_alignment(&mut self) {
        self.image.set_alignment(self.alignment);
        self.caption.set_alignment(self.alignment);
    }

    fn apply_width(&mut self) {
        if let Some(width) = self.requested_width {
            let natural = mm_to_f64(self.natural_size.width);
            if natural > f64::EPSILON {
                let scale = mm_to_f64(width) / natural;
                self.image.set_scale(Scale::new(scale, scale));
            }
        } else {
            self.image.set_scale(Scale::new(1.0, 1.0));
        }
    }
}

impl Element for CaptionedImage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let image_result = self.image.render(context, area.clone(), style)?;
        result.size = result.size.stack_vertical(image_result.size);
        result.has_more |= image_result.has_more;
        if image_result.has_more {
            return Ok(result);
        }

        let spacing = self.spacing;
        area.add_offset(Position::new(0, image_result.size.height + spacing));
        result.size = result.size.stack_vertical(Size::new(0, spacing));

        let caption_result = self.caption.render(context, area, style)?;
        result.size = result.size.stack_vertical(caption_result.size);
        result.has_more |= caption_result.has_more;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_conversion() {
        assert!(matches!(
            Alignment::from(HorizontalAlignment::Center),
            Alignment::Center
        ));
        assert_eq!(aligned_x(Alignment::Right, 2.0, 10.0, 4.0), 8.0);
        assert_eq!(aligned_x(Alignment::Center, 0.0, 10.0, 4.0), 3.0);
        assert_eq!(aligned_x(Alignment::Left, 1.5, 10.0, 4.0), 1.5);
    }

    #[test]
    fn cjk_characters_allow_breaks() {
        assert!(breaks_after('审'));
        assert!(breaks_after(' '));
        assert!(!breaks_after('a'));
    }

    #[test]
    fn grid_rejects_rows_of_wrong_width() {
        let mut grid = StyledGrid::new(vec![2, 1, 1]);
        assert!(grid.push_row(vec![GridCell::new("a")]).is_err());
        assert!(grid
            .push_row(vec![GridCell::new("a"), GridCell::new("b"), GridCell::new("c")])
            .is_ok());
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn column_widths_follow_weights() {
        let grid = StyledGrid::new(vec![2, 1, 1]);
        assert_eq!(grid.column_widths(100.0), vec![50.0, 25.0, 25.0]);
        assert_eq!(StyledGrid::new(vec![0, 0]).column_widths(10.0), vec![0.0, 0.0]);
    }

    fn char_width(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn wraps_at_spaces_and_between_cjk_characters() {
        assert_eq!(
            wrap_lines("toe spring ok", 10.0, char_width),
            vec!["toe spring", "ok"]
        );
        assert_eq!(wrap_lines("鞋头翘度合格", 4.0, char_width), vec!["鞋头翘度", "合格"]);
        assert_eq!(wrap_lines("a\n\nb", 10.0, char_width), vec!["a", "", "b"]);
        assert_eq!(wrap_lines("", 10.0, char_width), vec![""]);
    }

    #[test]
    fn long_words_are_split_by_character() {
        assert_eq!(
            wrap_lines("ab abcdefgh", 3.0, char_width),
            vec!["ab", "abc", "def", "gh"]
        );
    }

    #[test]
    fn each_token_is_measured_once() {
        let text = "Stitching density on the quarter is uneven. ".repeat(200);
        let token_count = tokens(&text).len();
        let mut calls = 0;
        let lines = wrap_lines(&text, 80.0, |part| {
            calls += 1;
            char_width(part)
        });
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| char_width(line) <= 80.0));
        assert!(calls <= 2 * token_count, "{calls} measurements for {token_count} tokens");
    }

    #[test]
    fn fill_hairlines_cover_the_band() {
        for height in [0.2, 1.2, 6.0, 18.0] {
            let offsets = fill_offsets(height);
            assert!(!offsets.is_empty());
            assert!(offsets[0] - HAIRLINE_MM / 2.0 <= 0.0);
            assert!(offsets[offsets.len() - 1] + HAIRLINE_MM / 2.0 >= height);
            for pair in offsets.windows(2) {
                assert!(pair[1] - pair[0] <= HAIRLINE_MM);
            }
        }
        assert!(fill_offsets(0.0).is_empty());
    }
}
