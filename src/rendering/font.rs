//! Glyph sources used to measure and draw table text.
//!
//! [`BuiltinFont`] is an 8x8 bitmap face scaled by an integer factor. It needs
//! no files and produces identical pixels everywhere, which is what the
//! golden tests rely on. [`OutlineFont`] loads a TrueType/OpenType file for
//! production output and scripts the bitmap face does not cover.

use crate::{Error, Result};
use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont as _};
use font8x8::UnicodeFonts;
use std::path::Path;

/// Something that can measure a string and rasterize it as coverage values.
pub trait TableFont: Send + Sync {
    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> f32;

    /// Emit coverage in `0.0..=1.0` for every touched pixel of `text` drawn
    /// with its baseline-left origin at (`x`, `baseline`).
    fn rasterize(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// 8x8 bitmap glyphs scaled by `scale`.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFont {
    pub scale: u32,
}

impl BuiltinFont {
    const CELL: u32 = 8;

    pub fn new(scale: u32) -> Self {
        Self { scale: scale.max(1) }
    }

    fn glyph(c: char) -> Option<[u8; 8]> {
        font8x8::BASIC_FONTS
            .get(c)
            .or_else(|| font8x8::LATIN_FONTS.get(c))
            .or_else(|| font8x8::GREEK_FONTS.get(c))
            .or_else(|| font8x8::HIRAGANA_FONTS.get(c))
            .or_else(|| font8x8::BOX_FONTS.get(c))
            .or_else(|| font8x8::BLOCK_FONTS.get(c))
            .or_else(|| font8x8::MISC_FONTS.get(c))
    }

    /// Hollow box drawn for characters without a bitmap.
    const MISSING: [u8; 8] = [0x00, 0x7e, 0x42, 0x42, 0x42, 0x42, 0x7e, 0x00];
}

impl Default for BuiltinFont {
    /// 8 px per character, so a 10-digit id or a 7-character class name fits
    /// its column.
    fn default() -> Self {
        Self::new(1)
    }
}

impl TableFont for BuiltinFont {
    fn measure(&self, text: &str) -> f32 {
        (text.chars().count() as u32 * Self::CELL * self.scale) as f32
    }

    fn rasterize(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let s = self.scale as i32;
        let cell = (Self::CELL * self.scale) as i32;
        // The bitmap's last row is the descender row; rows 0..=6 sit above the baseline.
        let top = baseline.round() as i32 - 7 * s;
        let mut pen = x.round() as i32;
        for c in text.chars() {
            let bits = Self::glyph(c).unwrap_or(Self::MISSING);
            if c != ' ' {
                for (row, byte) in bits.iter().enumerate() {
                    for col in 0..8 {
                        if byte & (1 << col) == 0 {
                            continue;
                        }
                        let px = pen + col * s;
                        let py = top + row as i32 * s;
                        for dy in 0..s {
                            for dx in 0..s {
                                plot(px + dx, py + dy, 1.0);
                            }
                        }
                    }
                }
            }
            pen += cell;
        }
    }
}

/// A scalable TrueType/OpenType face at a fixed pixel size.
pub struct OutlineFont {
    font: FontVec,
    scale: PxScale,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont").field("size", &self.scale.y).finish()
    }
}

impl OutlineFont {
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    pub fn from_file(path: impl AsRef<Path>, size: f32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(data, size)
    }

    /// Load the first file that exists from `candidates`.
    pub fn from_first<P: AsRef<Path>>(candidates: &[P], size: f32) -> Result<Self> {
        for candidate in candidates {
            let path: &Path = candidate.as_ref();
            if path.exists() {
                log::debug!("loading table font from {}", path.display());
                return Self::from_file(path, size);
            }
        }
        let names: Vec<String> = candidates
            .iter()
            .map(|p| AsRef::<Path>::as_ref(p).display().to_string())
            .collect();
        Err(Error::Font(format!("No font found in {:?}", names)))
    }
}

impl TableFont for OutlineFont {
    fn measure(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn rasterize(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scaled = self.font.as_scaled(self.scale);
        let mut pen = x;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                pen += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(self.scale, ab_glyph::point(pen, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|gx, gy, coverage| plot(ox + gx as i32, oy + gy as i32, coverage));
            }
            pen += scaled.h_advance(id);
            prev = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_measures_per_char() {
        let f = BuiltinFont::new(2);
        assert_eq!(f.measure(""), 0.0);
        assert_eq!(f.measure("1001"), 64.0);
        assert_eq!(f.measure("Zoë"), 48.0);
    }

    #[test]
    fn default_face_fits_the_fixed_columns() {
        use crate::rendering::TableLayout;
        let f = BuiltinFont::default();
        let l = TableLayout::STANDARD;
        assert!(f.measure("1806010101") < l.id_width as f32);
        assert!(f.measure("物联网18_1") < l.class_width as f32);
        assert!(f.measure("欧阳娜娜") < l.name_width as f32);
    }

    #[test]
    fn builtin_draws_inside_band() {
        let f = BuiltinFont::new(2);
        let mut ys = Vec::new();
        f.rasterize("Ag", 10.0, 20.0, &mut |_, y, _| ys.push(y));
        assert!(!ys.is_empty());
        assert!(*ys.iter().min().unwrap() >= 20 - 14);
        assert!(*ys.iter().max().unwrap() < 20 + 2);
    }

    #[test]
    fn builtin_space_is_blank() {
        let mut hits = 0;
        BuiltinFont::new(1).rasterize("  ", 0.0, 8.0, &mut |_, _, _| hits += 1);
        assert_eq!(hits, 0);
    }

    #[test]
    fn unknown_glyph_gets_a_box() {
        let mut hits = 0;
        BuiltinFont::new(1).rasterize("学", 0.0, 8.0, &mut |_, _, _| hits += 1);
        assert!(hits > 0);
    }

    #[test]
    fn outline_rejects_garbage() {
        assert!(matches!(OutlineFont::from_bytes(vec![0, 1, 2, 3], 18.0), Err(Error::Font(_))));
    }

    #[test]
    fn missing_font_files_error() {
        let r = OutlineFont::from_first(&[Path::new("/nonexistent/font.otf")], 18.0);
        assert!(r.is_err());
    }
}
