// --- File: src/core/corpus.rs
use std::collections::HashMap;
use std::io::Read;
use log::{debug, info};
use crate::core::record::RecordReader;
use crate::core::types::{Code, GlyphImage};
use crate::error::Result;

/// The parsed samples plus the glyph/code indices built alongside them.
/// Grows by appending only; nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    images: Vec<GlyphImage>,
    codes: Vec<Code>,
    glyph_to_code: HashMap<String, Code>,
    /// Sample positions per glyph, in sample order.
    glyph_to_samples: HashMap<String, Vec<usize>>,
    code_to_glyph: Vec<String>,
    max_width: usize,
    max_height: usize,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a corpus from its persisted parts. The running maxima are
    /// recomputed from the images since they are not part of the blob.
    pub fn from_parts(
        images: Vec<GlyphImage>,
        codes: Vec<Code>,
        glyph_to_code: HashMap<String, Code>,
        glyph_to_samples: HashMap<String, Vec<usize>>,
        code_to_glyph: Vec<String>,
    ) -> Self {
        let max_width = images.iter().map(GlyphImage::width).max().unwrap_or(0);
        let max_height = images.iter().map(GlyphImage::height).max().unwrap_or(0);
        Self {
            images,
            codes,
            glyph_to_code,
            glyph_to_samples,
            code_to_glyph,
            max_width,
            max_height,
        }
    }

    /// Appends every record in `source` until a clean end of stream.
    /// Returns the number of samples added. On error the samples read
    /// before the bad record stay in the corpus.
    pub fn parse<R: Read>(&mut self, source: R) -> Result<usize> {
        let before = self.images.len();
        let classes_before = self.code_to_glyph.len();
        for record in RecordReader::new(source) {
            let record = record?;
            self.add_pair(record.image, &record.glyph);
        }
        let added = self.images.len() - before;
        info!(
            "Parsed {} samples ({} new glyphs, {} total)",
            added,
            self.code_to_glyph.len() - classes_before,
            self.code_to_glyph.len()
        );
        Ok(added)
    }

    /// Gets the code for a glyph, assigning the next one if it is unseen.
    pub fn get_or_assign_code(&mut self, glyph: &str) -> Code {
        if let Some(&code) = self.glyph_to_code.get(glyph) {
            return code;
        }
        let code = self.code_to_glyph.len();
        self.code_to_glyph.push(glyph.to_string());
        self.glyph_to_code.insert(glyph.to_string(), code);
        debug!("New glyph '{}' -> code {}", glyph, code);
        code
    }

    /// Appends one sample labelled with `glyph` and returns its code.
    pub fn add_pair(&mut self, image: GlyphImage, glyph: &str) -> Code {
        let code = self.get_or_assign_code(glyph);
        self.max_width = self.max_width.max(image.width());
        self.max_height = self.max_height.max(image.height());

        self.glyph_to_samples
            .entry(glyph.to_string())
            .or_default()
            .push(self.images.len());
        self.images.push(image);
        self.codes.push(code);
        code
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(&GlyphImage, Code)> {
        Some((self.images.get(index)?, *self.codes.get(index)?))
    }

    pub fn images(&self) -> &[GlyphImage] {
        &self.images
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    /// Glyphs indexed by code.
    pub fn code_to_glyph(&self) -> &[String] {
        &self.code_to_glyph
    }

    pub fn glyph_to_code(&self) -> &HashMap<String, Code> {
        &self.glyph_to_code
    }

    pub fn glyph_to_samples(&self) -> &HashMap<String, Vec<usize>> {
        &self.glyph_to_samples
    }

    pub fn code(&self, glyph: &str) -> Option<Code> {
        self.glyph_to_code.get(glyph).copied()
    }

    pub fn glyph(&self, code: Code) -> Option<&str> {
        self.code_to_glyph.get(code).map(String::as_str)
    }

    /// Sample positions labelled with `glyph`, empty if it was never seen.
    pub fn samples_of(&self, glyph: &str) -> &[usize] {
        self.glyph_to_samples.get(glyph).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_classes(&self) -> usize {
        self.code_to_glyph.len()
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(width: usize, height: usize) -> GlyphImage {
        GlyphImage::new(width, height, vec![0; width * height]).unwrap()
    }

    #[test]
    fn codes_follow_first_seen_order() {
        let mut corpus = Corpus::new();
        let assigned: Vec<Code> = ["A", "B", "A", "C"]
            .iter()
            .map(|g| corpus.add_pair(img(1, 1), g))
            .collect();
        assert_eq!(assigned, vec![0, 1, 0, 2]);
        assert_eq!(corpus.code_to_glyph(), &["A", "B", "C"]);
        assert_eq!(corpus.code("C"), Some(2));
        assert_eq!(corpus.glyph(1), Some("B"));
        assert_eq!(corpus.codes(), &[0, 1, 0, 2]);
    }

    #[test]
    fn secondary_index_tracks_sample_positions() {
        let mut corpus = Corpus::new();
        for g in ["A", "B", "A", "C", "A"] {
            corpus.add_pair(img(1, 1), g);
        }
        assert_eq!(corpus.samples_of("A"), &[0, 2, 4]);
        assert_eq!(corpus.samples_of("B"), &[1]);
        assert!(corpus.samples_of("Z").is_empty());
    }

    #[test]
    fn maxima_never_decrease() {
        let mut corpus = Corpus::new();
        corpus.add_pair(img(5, 2), "A");
        corpus.add_pair(img(3, 7), "B");
        corpus.add_pair(img(1, 1), "C");
        assert_eq!(corpus.max_width(), 5);
        assert_eq!(corpus.max_height(), 7);
    }

    #[test]
    fn from_parts_recomputes_maxima() {
        let mut corpus = Corpus::new();
        corpus.add_pair(img(4, 2), "A");
        corpus.add_pair(img(2, 6), "B");
        let rebuilt = Corpus::from_parts(
            corpus.images().to_vec(),
            corpus.codes().to_vec(),
            corpus.glyph_to_code().clone(),
            corpus.glyph_to_samples().clone(),
            corpus.code_to_glyph().to_vec(),
        );
        assert_eq!(rebuilt, corpus);
    }
}
