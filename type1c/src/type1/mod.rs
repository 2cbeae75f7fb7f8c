//! Reading Type 1 font programs.
//!
//! Both the binary PFB container and the plain PFA form are supported. The
//! cleartext part provides the font name, the encoding and the `FontInfo`
//! entries, the decrypted part the private dictionary, the subroutines and
//! the charstrings.

mod decrypt;
pub mod encoding;
mod scanner;

use std::borrow::Cow;

use log::warn;
use rustc_hash::FxHashMap;

use crate::charstring::{self, CharStringTable, GlyphMetrics};
use crate::charstring::encode::CS_STR_LEN_MAX;
use crate::error::{CharStringError, Error, Result};
use crate::stream::Stream;
use crate::type1::decrypt::{decrypt_binary, decrypt_charstring_into, decrypt_eexec};
use crate::type1::scanner::{Scanner, Token};

pub use encoding::Encoding;

/// Maximum length of a font name.
const FONT_NAME_LEN_MAX: usize = 127;

const PFB_MARKER: u8 = 0x80;

mod segment_type {
    pub(super) const ASCII: u8 = 1;
    pub(super) const BINARY: u8 = 2;
    pub(super) const EOF: u8 = 3;
}

/// The `FontInfo` and other Top DICT entries of a font.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FontInfo {
    pub(crate) version: Option<String>,
    pub(crate) notice: Option<String>,
    pub(crate) copyright: Option<String>,
    pub(crate) full_name: Option<String>,
    pub(crate) family_name: Option<String>,
    pub(crate) weight: Option<String>,
    pub(crate) is_fixed_pitch: bool,
    pub(crate) italic_angle: f64,
    pub(crate) underline_position: Option<f64>,
    pub(crate) underline_thickness: Option<f64>,
    pub(crate) paint_type: f64,
    pub(crate) stroke_width: f64,
    pub(crate) unique_id: Option<f64>,
    pub(crate) font_bbox: Option<[f64; 4]>,
    pub(crate) font_matrix: Option<[f64; 6]>,
}

/// The hinting entries of the private dictionary.
///
/// Blue zones and stem snap widths are stored as absolute values.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PrivateDict {
    pub(crate) blue_values: Vec<f64>,
    pub(crate) other_blues: Vec<f64>,
    pub(crate) family_blues: Vec<f64>,
    pub(crate) family_other_blues: Vec<f64>,
    pub(crate) stem_snap_h: Vec<f64>,
    pub(crate) stem_snap_v: Vec<f64>,
    pub(crate) std_hw: Option<f64>,
    pub(crate) std_vw: Option<f64>,
    pub(crate) blue_scale: Option<f64>,
    pub(crate) blue_shift: Option<f64>,
    pub(crate) blue_fuzz: Option<f64>,
    pub(crate) language_group: Option<f64>,
    pub(crate) expansion_factor: Option<f64>,
    pub(crate) force_bold: bool,
}

/// A parsed Type 1 font program.
#[derive(Debug, Clone)]
pub struct Type1Font {
    pub(crate) font_name: String,
    pub(crate) encoding: Encoding,
    pub(crate) info: FontInfo,
    pub(crate) private: PrivateDict,
    pub(crate) subrs: CharStringTable,
    pub(crate) charstrings: CharStringTable,
    glyph_names: Vec<String>,
    glyph_ids: FxHashMap<String, usize>,
}

impl Type1Font {
    /// Parses a font program in PFB or PFA form.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (cleartext, private) = split_segments(data)?;

        if !cleartext.starts_with(b"%!") {
            return Err(Error::InvalidFontFile("missing %! header"));
        }

        let mut font = Self::empty();
        font.parse_cleartext(&cleartext)?;
        font.parse_private(&private)?;

        if font.charstrings.is_empty() {
            return Err(Error::InvalidFontFile("font has no CharStrings"));
        }

        Ok(font)
    }

    fn empty() -> Self {
        Self {
            font_name: String::new(),
            encoding: Encoding::standard(),
            info: FontInfo::default(),
            private: PrivateDict::default(),
            subrs: CharStringTable::default(),
            charstrings: CharStringTable::default(),
            glyph_names: Vec::new(),
            glyph_ids: FxHashMap::default(),
        }
    }

    /// Returns the `FontName` of the font.
    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Returns the built-in encoding of the font.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Returns the `FontBBox` of the font.
    pub fn font_bbox(&self) -> Option<[f64; 4]> {
        self.info.font_bbox
    }

    /// Returns the number of glyphs in the font.
    pub fn glyph_count(&self) -> usize {
        self.glyph_names.len()
    }

    /// Returns the names of all glyphs in the order they are defined.
    pub fn glyph_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.glyph_names.iter().map(String::as_str)
    }

    /// Returns the decrypted charstring of a glyph.
    pub fn charstring(&self, name: &str) -> Option<&[u8]> {
        self.charstrings.get(self.glyph_id(name)?)
    }

    /// Returns the decrypted subroutines.
    pub fn subroutines(&self) -> &CharStringTable {
        &self.subrs
    }

    /// Interprets the charstring of a glyph and returns its metrics.
    pub fn glyph_metrics(
        &self,
        name: &str,
    ) -> Option<core::result::Result<GlyphMetrics, CharStringError>> {
        let data = self.charstring(name)?;

        Some(charstring::get_metrics(data, &self.subrs))
    }

    pub(crate) fn glyph_id(&self, name: &str) -> Option<usize> {
        self.glyph_ids.get(name).copied()
    }

    fn parse_cleartext(&mut self, data: &[u8]) -> Result<()> {
        let mut s = Scanner::new(data);

        // Skip PostScript code preceding the font dictionary.
        if !s.skip_past_operator(b"begin") {
            return Err(Error::InvalidFontFile("font dictionary not found"));
        }

        while let Some(token) = s.next_token() {
            let key = match token {
                Token::Name(key) => key,
                Token::Operator(b"eexec") => break,
                _ => continue,
            };

            let info = &mut self.info;

            match key {
                b"Encoding" => self.encoding = read_encoding(&mut s)?,
                b"FontName" => self.font_name = read_font_name(&mut s)?,
                b"FontType" => {
                    let font_type = read_number(&mut s)?;

                    if font_type != 1.0 {
                        warn!("FontType {font_type} not supported");

                        return Err(Error::UnsupportedFontType);
                    }
                }
                b"UniqueID" => info.unique_id = Some(read_number(&mut s)?),
                b"ItalicAngle" => info.italic_angle = read_number(&mut s)?,
                b"StrokeWidth" => info.stroke_width = read_number(&mut s)?,
                b"PaintType" => info.paint_type = read_number(&mut s)?,
                b"UnderlinePosition" => info.underline_position = Some(read_number(&mut s)?),
                b"UnderlineThickness" => info.underline_thickness = Some(read_number(&mut s)?),
                b"FontBBox" => info.font_bbox = Some(read_fixed_array(&mut s)?),
                b"FontMatrix" => {
                    let matrix = read_fixed_array(&mut s)?;

                    if matrix != [0.001, 0.0, 0.0, 0.001, 0.0, 0.0] {
                        info.font_matrix = Some(matrix);
                    }
                }
                b"version" => info.version = Some(read_string(&mut s)?),
                b"Notice" => info.notice = Some(read_string(&mut s)?),
                b"Copyright" => info.copyright = Some(read_string(&mut s)?),
                b"FullName" => info.full_name = Some(read_string(&mut s)?),
                b"FamilyName" => info.family_name = Some(read_string(&mut s)?),
                b"Weight" => info.weight = Some(read_string(&mut s)?),
                b"isFixedPitch" | b"IsFixedPitch" => info.is_fixed_pitch = read_bool(&mut s)?,
                _ => {}
            }
        }

        Ok(())
    }

    fn parse_private(&mut self, data: &[u8]) -> Result<()> {
        let mut s = Scanner::new(data);
        let mut len_iv = 4;

        while let Some(token) = s.next_token() {
            let key = match token {
                Token::Name(key) => key,
                Token::Operator(b"closefile") => break,
                _ => continue,
            };

            let private = &mut self.private;

            match key {
                b"lenIV" => len_iv = read_number(&mut s)? as i32,
                b"Subrs" => self.subrs = read_subrs(&mut s, len_iv)?,
                b"CharStrings" => self.read_charstrings(&mut s, len_iv)?,
                b"BlueValues" => private.blue_values = read_array(&mut s)?,
                b"OtherBlues" => private.other_blues = read_array(&mut s)?,
                b"FamilyBlues" => private.family_blues = read_array(&mut s)?,
                b"FamilyOtherBlues" => private.family_other_blues = read_array(&mut s)?,
                b"StemSnapH" => private.stem_snap_h = read_array(&mut s)?,
                b"StemSnapV" => private.stem_snap_v = read_array(&mut s)?,
                // An array in Type 1 fonts, a number in CFF.
                b"StdHW" => private.std_hw = read_array(&mut s)?.first().copied(),
                b"StdVW" => private.std_vw = read_array(&mut s)?.first().copied(),
                b"BlueScale" => private.blue_scale = Some(read_number(&mut s)?),
                b"BlueShift" => private.blue_shift = Some(read_number(&mut s)?),
                b"BlueFuzz" => private.blue_fuzz = Some(read_number(&mut s)?),
                b"LanguageGroup" => private.language_group = Some(read_number(&mut s)?),
                b"ExpansionFactor" => private.expansion_factor = Some(read_number(&mut s)?),
                b"ForceBold" => private.force_bold = read_bool(&mut s)?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Reads `n dict dup begin` followed by `/name len RD <binary> ND`
    /// entries up to `end`.
    fn read_charstrings(&mut self, s: &mut Scanner<'_>, len_iv: i32) -> Result<()> {
        if !s.skip_past_operator(b"begin") {
            return Err(Error::InvalidFontFile("invalid CharStrings dictionary"));
        }

        loop {
            let name = match s.next_token() {
                Some(Token::Name(name)) => String::from_utf8_lossy(name).into_owned(),
                Some(Token::Operator(b"end")) => break,
                _ => return Err(Error::InvalidFontFile("invalid CharStrings entry")),
            };

            let len = read_number(s)?;
            let data = read_binary(s, len)?;

            let index = match self.glyph_ids.get(&name) {
                Some(index) => *index,
                None => {
                    let index = self.glyph_names.len();
                    self.glyph_names.push(name.clone());
                    self.glyph_ids.insert(name, index);
                    index
                }
            };

            self.charstrings
                .insert_with(index, |out| decrypt_charstring_into(data, len_iv, out))
                .ok_or(Error::InvalidFontFile("charstring shorter than lenIV"))?;

            match s.next_token() {
                Some(Token::Operator(b"ND" | b"|-")) => {}
                Some(Token::Operator(b"noaccess")) => expect_operator(s, b"def")?,
                _ => return Err(Error::InvalidFontFile("invalid CharStrings entry")),
            }
        }

        Ok(())
    }
}

/// Splits a font program into its cleartext and its decrypted private part.
fn split_segments(data: &[u8]) -> Result<(Cow<'_, [u8]>, Vec<u8>)> {
    if data.first() == Some(&PFB_MARKER) {
        let (cleartext, encrypted) = read_pfb(data)?;

        return Ok((Cow::Owned(cleartext), decrypt_binary(&encrypted)));
    }

    let end = data
        .windows(5)
        .position(|w| w == b"eexec")
        .map(|pos| pos + 5)
        .ok_or(Error::InvalidFontFile("missing eexec section"))?;

    let private = decrypt_eexec(&data[end..])
        .ok_or(Error::InvalidFontFile("empty eexec section"))?;

    Ok((Cow::Borrowed(&data[..end]), private))
}

/// Reads the segments of a PFB file, concatenating the ASCII and the
/// binary ones.
fn read_pfb(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut s = Stream::new(data);
    let mut ascii = Vec::new();
    let mut binary = Vec::new();

    while !s.at_end() {
        if s.read_byte() != Some(PFB_MARKER) {
            return Err(Error::InvalidFontFile("invalid PFB segment marker"));
        }

        let kind = s
            .read_byte()
            .ok_or(Error::InvalidFontFile("truncated PFB segment"))?;

        if kind == segment_type::EOF {
            break;
        }

        let segment = s
            .read_u32_le()
            .and_then(|len| s.read_bytes(len as usize))
            .ok_or(Error::InvalidFontFile("truncated PFB segment"))?;

        match kind {
            segment_type::ASCII => ascii.extend_from_slice(segment),
            segment_type::BINARY => binary.extend_from_slice(segment),
            _ => return Err(Error::InvalidFontFile("unknown PFB segment type")),
        }
    }

    if ascii.is_empty() || binary.is_empty() {
        return Err(Error::InvalidFontFile("empty PFB segment"));
    }

    Ok((ascii, binary))
}

fn read_encoding(s: &mut Scanner<'_>) -> Result<Encoding> {
    match s.next_token() {
        Some(Token::Operator(b"StandardEncoding")) => Ok(Encoding::standard()),
        Some(Token::Operator(b"ISOLatin1Encoding")) => Ok(Encoding::iso_latin1()),
        Some(Token::Operator(b"ExpertEncoding")) => {
            warn!("ExpertEncoding is not supported");

            Err(Error::UnsupportedEncoding)
        }
        // `256 array`, usually initialized with `.notdef` and followed
        // by `dup code /name put` entries.
        Some(Token::Integer(_)) => {
            let mut encoding = Encoding::empty();

            while let Some(token) = s.next_token() {
                match token {
                    Token::Operator(b"def" | b"readonly") => break,
                    Token::Operator(b"dup") => {
                        let code = s.next_token().and_then(|t| t.as_i32());
                        let name = s.next_token();

                        let (Some(code), Some(Token::Name(name))) = (code, name) else {
                            return Err(Error::InvalidFontFile("invalid Encoding entry"));
                        };

                        let code = u8::try_from(code)
                            .map_err(|_| Error::InvalidFontFile("invalid Encoding entry"))?;

                        expect_operator(s, b"put")?;
                        encoding.set(code, String::from_utf8_lossy(name));
                    }
                    _ => {}
                }
            }

            Ok(encoding)
        }
        _ => Err(Error::InvalidFontFile("invalid Encoding")),
    }
}

fn read_font_name(s: &mut Scanner<'_>) -> Result<String> {
    let name = match s.next_token() {
        Some(Token::Name(name)) => name.to_vec(),
        Some(Token::String(name)) => name,
        _ => return Err(Error::InvalidFontFile("invalid FontName")),
    };

    let name = if name.len() > FONT_NAME_LEN_MAX {
        warn!("FontName too long: {} bytes", name.len());
        &name[..FONT_NAME_LEN_MAX]
    } else {
        &name[..]
    };

    Ok(String::from_utf8_lossy(name).into_owned())
}

/// Reads `/Subrs n array` followed by `dup i len RD <binary> NP` entries.
fn read_subrs(s: &mut Scanner<'_>, len_iv: i32) -> Result<CharStringTable> {
    let count = s
        .next_token()
        .and_then(|t| t.as_i32())
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(Error::InvalidFontFile("invalid Subrs count"))?;
    expect_operator(s, b"array")?;

    let mut subrs = CharStringTable::with_len(count);

    while s.peek_token().is_some_and(|t| t.is_operator(b"dup")) {
        s.next_token();

        let index = read_number(s)?;
        let len = read_number(s)?;

        let index = Some(index as i64)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < count)
            .ok_or(Error::InvalidFontFile("subroutine index out of range"))?;

        let data = read_binary(s, len)?;
        subrs
            .insert_with(index, |out| decrypt_charstring_into(data, len_iv, out))
            .ok_or(Error::InvalidFontFile("subroutine shorter than lenIV"))?;

        match s.next_token() {
            Some(Token::Operator(b"NP" | b"|")) => {}
            Some(Token::Operator(b"noaccess")) => expect_operator(s, b"put")?,
            _ => return Err(Error::InvalidFontFile("invalid Subrs entry")),
        }
    }

    Ok(subrs)
}

/// Reads `RD` (or `-|`) and the binary data following it.
fn read_binary<'a>(s: &mut Scanner<'a>, len: f64) -> Result<&'a [u8]> {
    let len = Some(len as i64)
        .and_then(|l| usize::try_from(l).ok())
        .ok_or(Error::InvalidFontFile("invalid charstring length"))?;

    if len > CS_STR_LEN_MAX {
        return Err(Error::InvalidFontFile("charstring too long"));
    }

    match s.next_token() {
        Some(Token::Operator(b"RD" | b"-|")) => {}
        _ => return Err(Error::InvalidFontFile("expected RD")),
    }

    s.read_binary(len)
        .ok_or(Error::InvalidFontFile("truncated charstring"))
}

fn expect_operator(s: &mut Scanner<'_>, name: &[u8]) -> Result<()> {
    match s.next_token() {
        Some(token) if token.is_operator(name) => Ok(()),
        _ => Err(Error::InvalidFontFile("unexpected token")),
    }
}

fn read_number(s: &mut Scanner<'_>) -> Result<f64> {
    s.next_token()
        .and_then(|t| t.as_f64())
        .ok_or(Error::InvalidFontFile("expected a number"))
}

fn read_bool(s: &mut Scanner<'_>) -> Result<bool> {
    match s.next_token() {
        Some(Token::Boolean(b)) => Ok(b),
        _ => Err(Error::InvalidFontFile("expected a boolean")),
    }
}

fn read_string(s: &mut Scanner<'_>) -> Result<String> {
    match s.next_token() {
        Some(Token::String(str)) => Ok(String::from_utf8_lossy(&str).into_owned()),
        _ => Err(Error::InvalidFontFile("expected a string")),
    }
}

/// Reads an array or procedure of numbers.
fn read_array(s: &mut Scanner<'_>) -> Result<Vec<f64>> {
    match s.next_token() {
        Some(Token::ArrayStart | Token::ProcStart) => {}
        _ => return Err(Error::InvalidFontFile("expected an array")),
    }

    let mut values = Vec::new();

    loop {
        match s.next_token() {
            Some(Token::ArrayEnd | Token::ProcEnd) => break,
            Some(token) => values.push(
                token
                    .as_f64()
                    .ok_or(Error::InvalidFontFile("expected a number"))?,
            ),
            None => return Err(Error::InvalidFontFile("unterminated array")),
        }
    }

    Ok(values)
}

fn read_fixed_array<const N: usize>(s: &mut Scanner<'_>) -> Result<[f64; N]> {
    read_array(s)?
        .try_into()
        .map_err(|_| Error::InvalidFontFile("unexpected number of array elements"))
}
