//! Table rendering: layout, display list, rasterization and encoding.
//!
//! [`TableRenderer::render`] is deterministic: the same rows, flag and font
//! always produce the same pixels.

pub mod encode;
pub mod font;
pub mod layout;
pub mod paint;
pub mod raster;

use crate::roster::Row;
use crate::Result;
use base64::Engine as _;
use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::sync::Arc;

pub use encode::OutputFormat;
pub use font::{BuiltinFont, OutlineFont, TableFont};
pub use layout::TableLayout;
pub use paint::{Rgba, TableStyle};

/// A rendered, not yet encoded table.
#[derive(Debug, Clone)]
pub struct TableRaster {
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub pixels: RgbaImage,
}

impl TableRaster {
    /// Hex SHA-256 of the raw RGBA bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.pixels.as_raw()))
    }
}

/// An encoded table image ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

impl TableImage {
    /// Wrap bytes produced elsewhere (e.g. a pre-rendered file). Dimensions
    /// are read from the image header and left at zero if it cannot be parsed.
    pub fn from_bytes(format: OutputFormat, data: Vec<u8>) -> Self {
        let (width, height) = image::ImageReader::new(std::io::Cursor::new(&data))
            .with_guessed_format()
            .ok()
            .and_then(|r| r.into_dimensions().ok())
            .unwrap_or((0, 0));
        Self { width, height, format, data }
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:` URL with the image inlined.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// Draws roster rows into table images.
#[derive(Clone)]
pub struct TableRenderer {
    layout: TableLayout,
    style: TableStyle,
    font: Arc<dyn TableFont>,
    format: OutputFormat,
}

impl std::fmt::Debug for TableRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRenderer")
            .field("layout", &self.layout)
            .field("style", &self.style)
            .field("format", &self.format)
            .finish()
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinFont::default()), OutputFormat::default())
    }
}

impl TableRenderer {
    pub fn new(font: Arc<dyn TableFont>, format: OutputFormat) -> Self {
        Self {
            layout: TableLayout::STANDARD,
            style: TableStyle::default(),
            font,
            format,
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Lay out and draw `rows` without encoding.
    pub fn rasterize(&self, rows: &[Row], include_class: bool) -> TableRaster {
        let (width, height) = self.layout.canvas_size(rows.len(), include_class);
        let commands = paint::build_display_list(&self.layout, &self.style, rows, include_class);
        let pixels = raster::rasterize(&commands, width, height, self.font.as_ref());
        log::debug!(
            "rasterized {} rows into {}x{} (class column: {})",
            rows.len(),
            width,
            height,
            include_class
        );
        TableRaster {
            width,
            height,
            rows: rows.len(),
            pixels,
        }
    }

    /// Draw `rows` and encode the result in the configured format.
    pub fn render(&self, rows: &[Row], include_class: bool) -> Result<TableImage> {
        let raster = self.rasterize(rows, include_class);
        let data = encode::encode_image(&raster.pixels, self.format)?;
        Ok(TableImage {
            width: raster.width,
            height: raster.height,
            format: self.format,
            data,
        })
    }
}
