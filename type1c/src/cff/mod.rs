//! Writing bare CFF font programs as embedded in PDF files.
//!
//! Only what a converted Type 1 font needs is supported: one font, a format 1
//! encoding with supplements, a format 0 charset and no global subroutines.

mod dict;
mod index;
mod std_strings;

use rustc_hash::FxHashMap;

use crate::cff::dict::OFFSET_OPERAND_SIZE;
use crate::cff::index::{index_size, items_size, write_index};
use crate::cff::std_strings::{STANDARD_STRINGS_LEN, standard_sid};
use crate::error::{Error, Result};

pub(crate) use dict::{DictWriter, private_dict_operator, top_dict_operator};

/// Largest SID a string may get.
const MAX_SID: u16 = 64999;

/// Major version, minor version, header size, absolute offset size.
const HEADER: [u8; 4] = [1, 0, 4, 4];

/// Size of the offset entries appended to the Top DICT.
const TOP_DICT_OFFSETS_SIZE: usize = 5 * (OFFSET_OPERAND_SIZE + 1) - 1;

/// The String INDEX. Predefined strings are never stored.
#[derive(Debug, Default, Clone)]
pub(crate) struct StringTable {
    strings: Vec<String>,
    ids: FxHashMap<String, u16>,
}

impl StringTable {
    /// Returns the SID of `string`, adding it if needed.
    pub(crate) fn sid(&mut self, string: &str) -> Result<u16> {
        if let Some(sid) = self.lookup(string) {
            return Ok(sid);
        }

        let sid = u16::try_from(self.strings.len())
            .ok()
            .and_then(|n| n.checked_add(STANDARD_STRINGS_LEN))
            .filter(|sid| *sid <= MAX_SID)
            .ok_or(Error::TooManyGlyphs)?;

        self.strings.push(string.to_string());
        self.ids.insert(string.to_string(), sid);

        Ok(sid)
    }

    /// Returns the SID of `string` if it is predefined or was added before.
    pub(crate) fn lookup(&self, string: &str) -> Option<u16> {
        standard_sid(string).or_else(|| self.ids.get(string).copied())
    }
}

/// A format 1 encoding.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Encoding {
    /// First code and number of following codes of each range.
    ranges: Vec<(u8, u8)>,
    /// Additional codes of already encoded glyphs, by SID.
    supplements: Vec<(u8, u16)>,
}

impl Encoding {
    /// Assigns `code` to the next glyph.
    pub(crate) fn push_code(&mut self, code: u8) {
        match self.ranges.last_mut() {
            Some((first, left))
                if usize::from(*first) + usize::from(*left) + 1 == usize::from(code) =>
            {
                *left += 1;
            }
            _ => self.ranges.push((code, 0)),
        }
    }

    /// Assigns `code` to the already encoded glyph `sid`.
    pub(crate) fn push_supplement(&mut self, code: u8, sid: u16) {
        self.supplements.push((code, sid));
    }

    fn len(&self) -> usize {
        let mut len = 2 + self.ranges.len() * 2;

        if !self.supplements.is_empty() {
            len += 1 + self.supplements.len() * 3;
        }

        len
    }

    fn write(&self, out: &mut Vec<u8>) {
        let has_supplements = !self.supplements.is_empty();

        out.push(if has_supplements { 0x81 } else { 1 });
        // There are at most 128 ranges of codes.
        out.push(self.ranges.len() as u8);

        for (first, left) in &self.ranges {
            out.extend([*first, *left]);
        }

        if has_supplements {
            out.push(self.supplements.len() as u8);

            for (code, sid) in &self.supplements {
                out.push(*code);
                out.extend_from_slice(&sid.to_be_bytes());
            }
        }
    }
}

/// A single-font CFF program under construction.
#[derive(Debug, Clone)]
pub(crate) struct CffFont {
    pub(crate) name: String,
    /// The Top DICT without the offset entries.
    pub(crate) top_dict: DictWriter,
    pub(crate) private_dict: DictWriter,
    pub(crate) strings: StringTable,
    pub(crate) encoding: Encoding,
    /// The SIDs of all glyphs but `.notdef`.
    pub(crate) charset: Vec<u16>,
    pub(crate) charstrings: Vec<Vec<u8>>,
}

impl CffFont {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            top_dict: DictWriter::new(),
            private_dict: DictWriter::new(),
            strings: StringTable::default(),
            encoding: Encoding::default(),
            charset: Vec::new(),
            charstrings: Vec::new(),
        }
    }

    /// Serializes the font.
    ///
    /// The data is laid out in the order header, Name INDEX, Top DICT INDEX,
    /// String INDEX, Global Subr INDEX, encoding, charset, CharStrings INDEX
    /// and Private DICT.
    pub(crate) fn write(self) -> Result<Vec<u8>> {
        let names = [self.name.as_bytes()];
        let strings: Vec<&[u8]> = self.strings.strings.iter().map(|s| s.as_bytes()).collect();
        let private_dict = self.private_dict.finish();

        let top_dict_len = self.top_dict.len() + TOP_DICT_OFFSETS_SIZE;

        let encoding_offset = HEADER.len()
            + items_size(&names)
            + index_size(1, top_dict_len)
            + items_size(&strings)
            + index_size(0, 0);
        let charset_offset = encoding_offset + self.encoding.len();
        let charstrings_offset = charset_offset + 1 + self.charset.len() * 2;
        let private_offset = charstrings_offset + items_size(&self.charstrings);

        let mut top_dict = self.top_dict;
        top_dict.offsets(top_dict_operator::CHARSET_OFFSET, &[charset_offset]);
        top_dict.offsets(top_dict_operator::ENCODING_OFFSET, &[encoding_offset]);
        top_dict.offsets(top_dict_operator::CHAR_STRINGS_OFFSET, &[charstrings_offset]);
        top_dict.offsets(
            top_dict_operator::PRIVATE_DICT_SIZE_AND_OFFSET,
            &[private_dict.len(), private_offset],
        );
        debug_assert_eq!(top_dict.len(), top_dict_len);

        let mut out = Vec::with_capacity(private_offset + private_dict.len());
        out.extend_from_slice(&HEADER);
        write_index(&names, &mut out)?;
        write_index(&[top_dict.finish()], &mut out)?;
        write_index(&strings, &mut out)?;
        write_index::<&[u8]>(&[], &mut out)?;

        debug_assert_eq!(out.len(), encoding_offset);
        self.encoding.write(&mut out);

        out.push(0);
        for sid in &self.charset {
            out.extend_from_slice(&sid.to_be_bytes());
        }

        write_index(&self.charstrings, &mut out)?;

        debug_assert_eq!(out.len(), private_offset);
        out.extend_from_slice(&private_dict);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_strings_are_not_stored() {
        let mut strings = StringTable::default();

        assert_eq!(strings.sid("space").unwrap(), 1);
        assert_eq!(strings.sid("uni20AC").unwrap(), 391);
        assert_eq!(strings.sid("Test").unwrap(), 392);
        assert_eq!(strings.sid("uni20AC").unwrap(), 391);
        assert_eq!(strings.lookup("Test"), Some(392));
        assert_eq!(strings.lookup("Other"), None);
        assert_eq!(strings.strings.len(), 2);
    }

    #[test]
    fn encoding_ranges() {
        let mut encoding = Encoding::default();
        encoding.push_code(65);
        encoding.push_code(66);
        encoding.push_code(67);
        encoding.push_code(97);
        encoding.push_supplement(200, 34);

        let mut out = vec![];
        encoding.write(&mut out);

        assert_eq!(out, vec![0x81, 2, 65, 2, 97, 0, 1, 200, 0, 34]);
        assert_eq!(encoding.len(), out.len());
    }

    #[test]
    fn layout() {
        let mut font = CffFont::new("Test".to_string());
        font.top_dict.number(top_dict_operator::ITALIC_ANGLE, -12.0);
        font.private_dict.number(private_dict_operator::STD_VW, 85.0);
        font.encoding.push_code(32);
        font.charset.push(1);
        font.charstrings = vec![vec![14], vec![14]];

        let out = font.write().unwrap();

        // Header and Name INDEX.
        assert_eq!(&out[..13], &[1, 0, 4, 4, 0, 1, 1, 1, 5, b'T', b'e', b's', b't']);
        // The Top DICT INDEX holds the offsets in their five-byte form.
        assert_eq!(&out[13..18], &[0, 1, 1, 1, 33]);
        assert_eq!(&out[18..21], &[127, 12, 2]);
        assert_eq!(&out[21..27], &[29, 0, 0, 0, 58, 15]);
        assert_eq!(&out[27..33], &[29, 0, 0, 0, 54, 16]);
        assert_eq!(&out[33..39], &[29, 0, 0, 0, 61, 17]);
        assert_eq!(&out[39..50], &[29, 0, 0, 0, 2, 29, 0, 0, 0, 69, 18]);
        // Empty String and Global Subr INDEXes.
        assert_eq!(&out[50..54], &[0, 0, 0, 0]);
        assert_eq!(&out[54..58], &[1, 1, 32, 0]);
        assert_eq!(&out[58..61], &[0, 0, 1]);
        assert_eq!(&out[61..69], &[0, 2, 1, 1, 2, 3, 14, 14]);
        assert_eq!(&out[69..], &[224, 11]);
    }
}
