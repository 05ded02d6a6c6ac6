//! Rasterizer: executes a display list onto an RGBA pixel buffer

use crate::rendering::font::TableFont;
use crate::rendering::paint::{PaintCommand, Rgba};
use image::RgbaImage;

/// An RGBA canvas with the few primitives the table needs.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn fill(&mut self, c: Rgba) {
        for p in self.img.pixels_mut() {
            *p = image::Rgba([c.0, c.1, c.2, c.3]);
        }
    }

    /// Overwrite one pixel; out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, c: Rgba) {
        if let Some(p) = self.pixel_mut(x, y) {
            *p = image::Rgba([c.0, c.1, c.2, c.3]);
        }
    }

    /// Blend `c` over one pixel with the given coverage.
    pub fn blend(&mut self, x: i32, y: i32, c: Rgba, coverage: f32) {
        let a = (coverage.clamp(0.0, 1.0) * c.3 as f32 / 255.0).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        if let Some(p) = self.pixel_mut(x, y) {
            let mix = |dst: u8, src: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
            let [r, g, b, da] = p.0;
            p.0 = [
                mix(r, c.0),
                mix(g, c.1),
                mix(b, c.2),
                (a * 255.0 + da as f32 * (1.0 - a)).round() as u8,
            ];
        }
    }

    /// Bresenham line between two inclusive endpoints.
    pub fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, c: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x0, y0, c);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut image::Rgba<u8>> {
        if x < 0 || y < 0 || x as u32 >= self.img.width() || y as u32 >= self.img.height() {
            return None;
        }
        Some(self.img.get_pixel_mut(x as u32, y as u32))
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }
}

/// Edge rules land on the last pixel inside the canvas.
fn clamp_edge(v: u32, extent: u32) -> i32 {
    v.min(extent.saturating_sub(1)) as i32
}

/// Run `commands` on a fresh `width` x `height` canvas.
pub fn rasterize(commands: &[PaintCommand], width: u32, height: u32, font: &dyn TableFont) -> RgbaImage {
    let mut canvas = Canvas::new(width, height);
    if width == 0 || height == 0 {
        return canvas.into_image();
    }
    let (right, bottom) = (width as i32 - 1, height as i32 - 1);

    for cmd in commands {
        match cmd {
            PaintCommand::Fill { rgba } => canvas.fill(*rgba),
            PaintCommand::HorizontalRule { y, rgba } => {
                let y = clamp_edge(*y, height);
                canvas.line(0, y, right, y, *rgba);
            }
            PaintCommand::VerticalRule { x, rgba } => {
                let x = clamp_edge(*x, width);
                canvas.line(x, 0, x, bottom, *rgba);
            }
            PaintCommand::Text {
                center_x,
                baseline,
                text,
                rgba,
            } => {
                let origin = center_x - font.measure(text) / 2.0;
                font.rasterize(text, origin, *baseline, &mut |x, y, cov| canvas.blend(x, y, *rgba, cov));
            }
        }
    }

    canvas.into_image()
}
