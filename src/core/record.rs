//! GNT record codec.
//!
//! # Record Structure
//! ```text
//! [4 bytes] Sample size (little-endian u32, ignored)
//! [2 bytes] Tag code, raw GB2312 bytes
//! [2 bytes] Width  (little-endian u16)
//! [2 bytes] Height (little-endian u16)
//! [W*H bytes] Grayscale pixels, row-major
//! ```

use std::io::{ErrorKind, Read};
use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::GBK;
use log::trace;
use crate::core::types::GlyphImage;
use crate::error::{GntError, Result};

pub const HEADER_LEN: usize = 10;

/// The fixed-size part of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub size: u32,
    pub tag: [u8; 2],
    pub width: u16,
    pub height: u16,
}

impl RecordHeader {
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            size: LittleEndian::read_u32(&bytes[0..4]),
            tag: [bytes[4], bytes[5]],
            width: LittleEndian::read_u16(&bytes[6..8]),
            height: LittleEndian::read_u16(&bytes[8..10]),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub glyph: String,
    pub image: GlyphImage,
}

/// Lead and trail byte range of a GB2312 double-byte character.
const GB2312_BYTES: std::ops::RangeInclusive<u8> = 0xa1..=0xfe;

/// Decodes a raw tag as GB2312: either two ASCII bytes or one double-byte
/// character. The GBK decoder is only reached once the bytes are known to
/// lie inside the GB2312 range, so GBK-only pairs are rejected.
pub fn decode_tag(tag: [u8; 2]) -> Option<String> {
    let [lead, trail] = tag;
    let valid = if lead.is_ascii() {
        trail.is_ascii()
    } else {
        GB2312_BYTES.contains(&lead) && GB2312_BYTES.contains(&trail)
    };
    if !valid {
        return None;
    }
    GBK.decode_without_bom_handling_and_without_replacement(&tag)
        .map(|s| s.into_owned())
}

/// Reads as many bytes as the stream will give, up to `buf.len()`.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Streams records out of a byte source, tracking the byte offset for errors.
pub struct RecordReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads the next header. `Ok(None)` means a clean end of stream.
    pub fn next_header(&mut self) -> Result<Option<RecordHeader>> {
        let mut buf = [0u8; HEADER_LEN];
        let found = read_full(&mut self.inner, &mut buf)?;
        if found == 0 {
            return Ok(None);
        }
        if found < HEADER_LEN {
            return Err(GntError::TruncatedRecord {
                offset: self.offset,
                context: "header",
                expected: HEADER_LEN,
                found,
            });
        }
        let header = RecordHeader::from_bytes(&buf);
        trace!(
            "Record at {}: size={}, tag={:02x?}, {}x{}",
            self.offset, header.size, header.tag, header.width, header.height
        );
        Ok(Some(header))
    }

    /// Reads the next full record. `Ok(None)` means a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let start = self.offset;
        let header = match self.next_header()? {
            Some(h) => h,
            None => return Ok(None),
        };
        self.offset += HEADER_LEN as u64;

        let expected = header.pixel_count();
        // Grows with the bytes actually present, not the declared size.
        let mut pixels = Vec::new();
        let found = (&mut self.inner).take(expected as u64).read_to_end(&mut pixels)?;
        self.offset += found as u64;
        if found < expected {
            return Err(GntError::TruncatedRecord {
                offset: start,
                context: "image",
                expected,
                found,
            });
        }

        let glyph = decode_tag(header.tag).ok_or(GntError::UndecodableTag {
            offset: start,
            tag: header.tag,
        })?;
        let image = GlyphImage::new(header.width as usize, header.height as usize, pixels)
            .ok_or(GntError::TruncatedRecord {
                offset: start,
                context: "image",
                expected,
                found,
            })?;
        Ok(Some(Record { glyph, image }))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
