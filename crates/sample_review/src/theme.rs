//! Colors and font sizes shared by the report elements.

use genpdf::style::Color;

pub const PRIMARY: Color = Color::Rgb(0x66, 0x7e, 0xea);
pub const SECONDARY: Color = Color::Rgb(0x76, 0x4b, 0xa2);
pub const SUCCESS: Color = Color::Rgb(0x4c, 0xaf, 0x50);
pub const WARNING: Color = Color::Rgb(0xff, 0x98, 0x00);
pub const LIGHT: Color = Color::Rgb(0xf8, 0xf9, 0xfa);
pub const DARK: Color = Color::Rgb(0x34, 0x3a, 0x40);
pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const HEADER_SUBTITLE: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
pub const TABLE_HEADER: Color = Color::Rgb(0x4a, 0x55, 0x68);
pub const ROW_EVEN: Color = WHITE;
pub const ROW_ODD: Color = Color::Rgb(0xf7, 0xfa, 0xfc);
pub const BORDER: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0xfa, 0xcd);
pub const DISCLAIMER_BACKGROUND: Color = Color::Rgb(0xff, 0xf3, 0xcd);

pub const TITLE_SIZE: u8 = 20;
pub const SUBTITLE_SIZE: u8 = 12;
pub const SECTION_SIZE: u8 = 14;
pub const BODY_SIZE: u8 = 10;
pub const TABLE_SIZE: u8 = 9;
pub const FOOTER_SIZE: u8 = 8;
