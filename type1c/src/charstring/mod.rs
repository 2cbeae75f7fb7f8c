//! Conversion of Type 1 charstrings into Type 2 charstrings.
//!
//! A charstring is first interpreted to recover its stems and path, then the
//! path is compacted and finally encoded with Type 2 operators.

use core::ops::Range;

use crate::Rect;
use crate::error::CharStringError;
use crate::charstring::interpret::{ConversionContext, GlyphDesc};

pub(crate) mod encode;
mod interpret;
pub mod operator;
mod othersubr;
pub(crate) mod path;
pub(crate) mod stem;

/// A table of decrypted charstrings, indexed by number.
///
/// All entries share one buffer. Slots that were never filled are empty.
#[derive(Debug, Default, Clone)]
pub struct CharStringTable {
    data: Vec<u8>,
    ranges: Vec<Option<Range<usize>>>,
}

impl CharStringTable {
    /// Creates a table with `len` empty slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            data: Vec::new(),
            ranges: vec![None; len],
        }
    }

    /// Stores a copy of `bytes` at `index`, growing the table if needed.
    pub fn insert(&mut self, index: usize, bytes: &[u8]) {
        self.insert_with(index, |data| {
            data.extend_from_slice(bytes);
            Some(())
        });
    }

    /// Stores whatever `fill` appends to the shared buffer at `index`.
    ///
    /// If `fill` fails, the buffer is restored and the slot left untouched.
    pub(crate) fn insert_with(
        &mut self,
        index: usize,
        fill: impl FnOnce(&mut Vec<u8>) -> Option<()>,
    ) -> Option<()> {
        let start = self.data.len();

        if fill(&mut self.data).is_none() {
            self.data.truncate(start);
            return None;
        }

        let end = self.data.len();

        if index >= self.ranges.len() {
            self.ranges.resize(index + 1, None);
        }

        self.ranges[index] = Some(start..end);

        Some(())
    }

    /// Appends an entry and returns its index.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let index = self.ranges.len();
        self.insert(index, bytes);
        index
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let range = self.ranges.get(index)?.clone()?;
        self.data.get(range)
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// An accented character built with `seac`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seac {
    /// Horizontal offset of the accent relative to the glyph origin.
    pub adx: f64,
    /// Vertical offset of the accent relative to the glyph origin.
    pub ady: f64,
    /// Standard encoding code of the base glyph.
    pub bchar: u8,
    /// Standard encoding code of the accent glyph.
    pub achar: u8,
}

/// The metrics of a converted glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// The horizontal advance.
    pub width: f64,
    /// The vertical advance.
    pub height: f64,
    /// The bounding box of the outline. For a glyph without outline, this is
    /// the side bearing point.
    pub bbox: Rect,
    /// The components, if the glyph is an accented character.
    pub seac: Option<Seac>,
}

impl GlyphMetrics {
    fn new(glyph: &GlyphDesc) -> Self {
        Self {
            width: glyph.wx,
            height: glyph.wy,
            bbox: glyph.bbox,
            seac: glyph.seac,
        }
    }
}

fn interpret(data: &[u8], subrs: &CharStringTable) -> Result<GlyphDesc, CharStringError> {
    let mut glyph = ConversionContext::new(subrs).run(data)?;

    glyph.bbox = glyph
        .path
        .post_process((glyph.sbx, glyph.sby), (glyph.wx, glyph.wy))?;

    Ok(glyph)
}

/// Interprets a charstring and returns the metrics of its glyph.
pub fn get_metrics(data: &[u8], subrs: &CharStringTable) -> Result<GlyphMetrics, CharStringError> {
    interpret(data, subrs).map(|glyph| GlyphMetrics::new(&glyph))
}

/// Converts a Type 1 charstring into a Type 2 charstring.
///
/// The advance width is omitted from the result if it equals
/// `default_width` and encoded relative to `nominal_width` otherwise.
pub fn convert_charstring(
    data: &[u8],
    subrs: &CharStringTable,
    default_width: f64,
    nominal_width: f64,
) -> Result<(Vec<u8>, GlyphMetrics), CharStringError> {
    let mut glyph = interpret(data, subrs)?;
    glyph.stems.sort();

    let encoded = encode::encode(&glyph, default_width, nominal_width)?;

    Ok((encoded, GlyphMetrics::new(&glyph)))
}
