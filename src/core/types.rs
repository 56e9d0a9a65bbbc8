// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A dense identifier for a glyph, assigned in first-seen order.
pub type Code = usize;

/// A grayscale glyph bitmap, `height` rows of `width` bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGlyphImage")]
pub struct GlyphImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

/// Wire form of [`GlyphImage`], checked through [`GlyphImage::new`] on load.
#[derive(Deserialize)]
struct RawGlyphImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl TryFrom<RawGlyphImage> for GlyphImage {
    type Error = String;

    fn try_from(raw: RawGlyphImage) -> Result<Self, Self::Error> {
        let pixel_count = raw.pixels.len();
        GlyphImage::new(raw.width, raw.height, raw.pixels).ok_or_else(|| {
            format!(
                "{}x{} image with {} pixel bytes",
                raw.width, raw.height, pixel_count
            )
        })
    }
}

impl GlyphImage {
    /// Returns `None` when `pixels` does not hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(rows, columns)`, i.e. `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels.get(row * self.width + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.pixels.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.height).filter_map(move |r| self.row(r))
    }

    /// Copies the bitmap into nested rows.
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        self.rows().map(|r| r.to_vec()).collect()
    }
}

/// One `(image, code)` pair as handed out by the dataset.
pub type Sample = (GlyphImage, Code);

/// A per-sample image transform applied at read time.
pub type Transform = Box<dyn Fn(GlyphImage) -> GlyphImage + Send + Sync>;

/// The default transform.
pub fn identity() -> Transform {
    Box::new(|img: GlyphImage| img)
}
