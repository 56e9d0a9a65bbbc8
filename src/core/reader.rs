use crate::core::corpus::Corpus;
use crate::core::types::{identity, Code, GlyphImage, Sample, Transform};
use crate::error::{GntError, Result};
use crate::persistence::{load_from_disk, save_to_disk};
use crate::sampling::{split, SubsetRandomSampler};
use log::info;
use rand::Rng;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The dataset facade: a corpus plus the transform applied on every read.
pub struct GntReader {
    corpus: Corpus,
    transform: Transform,
}

impl Default for GntReader {
    fn default() -> Self {
        Self::new()
    }
}

impl GntReader {
    pub fn new() -> Self {
        Self::with_transform(identity())
    }

    pub fn with_transform(transform: Transform) -> Self {
        Self { corpus: Corpus::new(), transform }
    }

    pub fn from_corpus(corpus: Corpus) -> Self {
        Self { corpus, transform: identity() }
    }

    /// Parses a single GNT file into a fresh reader.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = Self::new();
        reader.add_file(path)?;
        Ok(reader)
    }

    /// Restores a reader saved with [`GntReader::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_from_disk(path.as_ref())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_to_disk(self, path.as_ref())
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub(crate) fn corpus_mut(&mut self) -> &mut Corpus {
        &mut self.corpus
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Appends all records of another GNT file after the current samples.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        info!("Reading GNT file {}", path.display());
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }

    /// Appends all records from `source`. See [`Corpus::parse`].
    pub fn parse<R: Read>(&mut self, source: R) -> Result<usize> {
        self.corpus.parse(source)
    }

    pub fn count(&self) -> usize {
        self.corpus.len()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// The transformed image at `index` and its code.
    pub fn sample(&self, index: usize) -> Result<Sample> {
        self.get(index).ok_or(GntError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        let (image, code) = self.corpus.get(index)?;
        Some(((self.transform)(image.clone()), code))
    }

    /// The untransformed image at `index`.
    pub fn raw_image(&self, index: usize) -> Option<&GlyphImage> {
        self.corpus.images().get(index)
    }

    pub fn code(&self, glyph: &str) -> Option<Code> {
        self.corpus.code(glyph)
    }

    pub fn glyph(&self, code: Code) -> Option<&str> {
        self.corpus.glyph(code)
    }

    pub fn samples_of(&self, glyph: &str) -> &[usize] {
        self.corpus.samples_of(glyph)
    }

    pub fn num_classes(&self) -> usize {
        self.corpus.num_classes()
    }

    pub fn max_width(&self) -> usize {
        self.corpus.max_width()
    }

    pub fn max_height(&self) -> usize {
        self.corpus.max_height()
    }

    /// Sample positions whose code is below `class_limit`, or all of them.
    /// A limit of 0 means no limit.
    pub fn eligible_indices(&self, class_limit: Option<Code>) -> Vec<usize> {
        let codes = self.corpus.codes();
        match class_limit {
            Some(limit) if limit > 0 => (0..codes.len()).filter(|&i| codes[i] < limit).collect(),
            _ => (0..codes.len()).collect(),
        }
    }

    /// Shuffles the eligible samples and splits them into two disjoint
    /// samplers. `fraction` sizes the *second* one.
    pub fn partition(
        &self,
        fraction: f64,
        class_limit: Option<Code>,
    ) -> (SubsetRandomSampler, SubsetRandomSampler) {
        self.partition_with_rng(&mut rand::thread_rng(), fraction, class_limit)
    }

    pub fn partition_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        fraction: f64,
        class_limit: Option<Code>,
    ) -> (SubsetRandomSampler, SubsetRandomSampler) {
        split(self.eligible_indices(class_limit), fraction, rng)
    }
}
