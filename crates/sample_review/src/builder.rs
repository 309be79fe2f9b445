//! Document construction with the report's page furniture.
//!
//! Every page gets the coloured [`Banner`] at the top and a [`FooterBar`]
//! pinned to the bottom margin, both drawn by the page decorator.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{self, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};

use crate::elements::{mm_from_f64, Banner, FooterBar};
use crate::model::PageFurniture;

/// Height reserved for the footer bar at the bottom of every page.
pub const FOOTER_HEIGHT_MM: f64 = 10.0;

/// Shared count of the pages decorated so far.
pub type PageCounter = Rc<Cell<usize>>;

/// Builder for `genpdf::Document` instances laid out as review reports.
pub struct DocumentBuilder {
    font_family: FontFamily<FontData>,
    title: Option<String>,
    paper_size: Size,
    margins: Option<Margins>,
    font_size: Option<u8>,
    furniture: Option<PageFurniture>,
    footer_height: Mm,
    pages: PageCounter,
}

impl DocumentBuilder {
    /// Creates a builder for an A4 document using `font_family`.
    pub fn new(font_family: FontFamily<FontData>) -> Self {
        Self {
            font_family,
            title: None,
            paper_size: PaperSize::A4.into(),
            margins: None,
            font_size: None,
            furniture: None,
            footer_height: mm_from_f64(FOOTER_HEIGHT_MM),
            pages: Rc::new(Cell::new(0)),
        }
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Header band and footer texts drawn on every page.
    pub fn with_furniture(mut self, furniture: PageFurniture) -> Self {
        self.furniture = Some(furniture);
        self
    }

    pub fn with_footer_height(mut self, height: impl Into<Mm>) -> Self {
        self.footer_height = height.into();
        self
    }

    /// Counter updated while the document renders; read it after rendering
    /// to learn the page count.
    pub fn page_counter(&self) -> PageCounter {
        Rc::clone(&self.pages)
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> genpdf::Document {
        let mut document = genpdf::Document::new(self.font_family);
        document.set_paper_size(self.paper_size);

        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }

        document.set_page_decorator(ReportPageDecorator {
            page: 0,
            margins: self.margins,
            furniture: self.furniture,
            footer_height: self.footer_height,
            pages: self.pages,
        });
        document
    }
}

/// Applies the margins and draws the banner and footer of each page.
struct ReportPageDecorator {
    page: usize,
    margins: Option<Margins>,
    furniture: Option<PageFurniture>,
    footer_height: Mm,
    pages: PageCounter,
}

impl ReportPageDecorator {
    fn draw_footer(
        &self,
        furniture: &PageFurniture,
        context: &genpdf::Context,
        area: &mut genpdf::render::Area<'_>,
        style: Style,
    ) -> Result<(), Error> {
        let available = area.size().height;
        if self.footer_height > available {
            return Err(Error::new(
                "Footer height exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, available - self.footer_height));
        let mut footer = FooterBar::new(
            furniture.footer_location.clone(),
            furniture.footer_timestamp.clone(),
            furniture.page_label(self.page),
        );
        if footer.render(context, footer_area, style)?.has_more {
            return Err(Error::new(
                "Footer does not fit into the reserved space",
                ErrorKind::PageSizeExceeded,
            ));
        }

        area.set_height(available - self.footer_height);
        Ok(())
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        self.pages.set(self.page);

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(furniture) = &self.furniture {
            let mut banner = Banner::new(
                furniture.header_title.clone(),
                furniture.header_subtitle.clone(),
            );
            let result = banner.render(context, area.clone(), style)?;
            area.add_offset(Position::new(0, result.size.height));

            self.draw_footer(furniture, context, &mut area, style)?;
        }

        Ok(area)
    }
}

