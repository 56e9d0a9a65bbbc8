// File: src/persistence.rs
use crate::core::corpus::Corpus;
use crate::core::reader::GntReader;
use crate::core::types::{Code, GlyphImage};
use crate::error::Result;
use log::info;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The persisted state, in blob order: images, codes, glyph -> code,
/// glyph -> sample positions, code -> glyph.
type SerializableState = (
    Vec<GlyphImage>,
    Vec<Code>,
    HashMap<String, Code>,
    HashMap<String, Vec<usize>>,
    Vec<String>,
);

#[derive(serde::Serialize)]
struct BorrowedState<'a>(
    &'a [GlyphImage],
    &'a [Code],
    &'a HashMap<String, Code>,
    &'a HashMap<String, Vec<usize>>,
    &'a [String],
);

/// Writes the whole corpus as one blob.
pub fn serialize_into<W: Write>(corpus: &Corpus, writer: W) -> Result<()> {
    let state = BorrowedState(
        corpus.images(),
        corpus.codes(),
        corpus.glyph_to_code(),
        corpus.glyph_to_samples(),
        corpus.code_to_glyph(),
    );
    bincode::serialize_into(writer, &state)?;
    Ok(())
}

/// Reads a blob written by [`serialize_into`]. Anything else is rejected only
/// as far as bincode notices.
pub fn deserialize_from<R: Read>(reader: R) -> Result<Corpus> {
    let (images, codes, glyph_to_code, glyph_to_samples, code_to_glyph): SerializableState =
        bincode::deserialize_from(reader)?;
    Ok(Corpus::from_parts(images, codes, glyph_to_code, glyph_to_samples, code_to_glyph))
}

pub fn save_to_disk(reader: &GntReader, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serialize_into(reader.corpus(), &mut writer)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    info!("Saved {} samples to {}", reader.len(), path.display());
    Ok(())
}

/// Loads a saved corpus. The returned reader uses the identity transform.
pub fn load_from_disk(path: &Path) -> Result<GntReader> {
    let file = File::open(path)?;
    let corpus = deserialize_from(BufReader::new(file))?;
    info!("Loaded {} samples from {}", corpus.len(), path.display());
    Ok(GntReader::from_corpus(corpus))
}

/// Writes the code -> glyph table as a JSON array.
pub fn export_labels_json(reader: &GntReader, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, reader.corpus().code_to_glyph())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_round_trips_in_memory() {
        let mut corpus = Corpus::new();
        corpus.add_pair(GlyphImage::new(2, 1, vec![3, 4]).unwrap(), "一");
        corpus.add_pair(GlyphImage::new(1, 3, vec![5, 6, 7]).unwrap(), "二");
        corpus.add_pair(GlyphImage::new(1, 1, vec![8]).unwrap(), "一");

        let mut blob = Vec::new();
        serialize_into(&corpus, &mut blob).unwrap();
        let restored = deserialize_from(&blob[..]).unwrap();
        assert_eq!(restored, corpus);
        assert_eq!(restored.max_height(), 3);
    }

    #[test]
    fn garbage_blob_is_an_error() {
        assert!(deserialize_from(&[0xffu8; 3][..]).is_err());
    }
}
