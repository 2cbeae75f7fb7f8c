//! Converting a Type 1 font into a subsetted CFF font.

use bitflags::bitflags;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::Rect;
use crate::cff::{CffFont, DictWriter, private_dict_operator, top_dict_operator};
use crate::charstring::{self, GlyphMetrics};
use crate::charstring::operator::t2_operator;
use crate::error::{Error, Result};
use crate::settings::{ConvertSettings, ConvertWarning, DefaultWidth};
use crate::type1::encoding::standard_glyph_name;
use crate::type1::{Encoding, Type1Font};

const FALLBACK_DEFAULT_WIDTH: f64 = 500.0;
const FALLBACK_CAP_HEIGHT: f64 = 680.0;
const FALLBACK_ASCENT: f64 = 690.0;
const FALLBACK_DESCENT: f64 = -190.0;
/// The stem width of a regular weight.
const FALLBACK_STEM_V: f64 = 88.0;

bitflags! {
    /// The flags of a PDF font descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontFlags: u32 {
        /// All glyphs have the same width.
        const FIXED_PITCH = 1 << 0;
        /// Glyphs have serifs.
        const SERIF = 1 << 1;
        /// The font contains glyphs outside the standard Latin character set.
        const SYMBOLIC = 1 << 2;
        /// Glyphs are slanted.
        const ITALIC = 1 << 6;
        /// Bold glyphs are painted with extra pixels at small sizes.
        const FORCE_BOLD = 1 << 18;
    }
}

/// The metrics of a font descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontDescriptor {
    /// The top of lowercase letters with ascenders, like `b`.
    pub ascent: f64,
    /// The bottom of letters with descenders, like `p`.
    pub descent: f64,
    /// The top of flat capital letters, like `H`.
    pub cap_height: f64,
    /// The `ItalicAngle` of the font.
    pub italic_angle: f64,
    /// The thickness of vertical stems.
    pub stem_v: f64,
    /// The font flags.
    pub flags: FontFlags,
}

/// The result of converting a font.
#[derive(Debug, Clone)]
pub struct ConvertedFont {
    /// The CFF font program.
    pub data: Vec<u8>,
    /// The name written to the font.
    pub font_name: String,
    /// The number of glyphs in the font, including `.notdef`.
    pub num_glyphs: usize,
    /// The first used code.
    pub first_char: u8,
    /// The last used code.
    pub last_char: u8,
    /// The rounded advance widths of the codes from `first_char` to
    /// `last_char`. Unused codes have a width of 0.
    pub widths: Vec<f64>,
    /// The bounding box of the font.
    pub font_bbox: [f64; 4],
    /// The codes that are actually embedded. Codes without a glyph are
    /// removed from the requested set.
    pub used: [bool; 256],
    /// The glyph ID of each embedded code.
    pub code_to_gid: [Option<u16>; 256],
    /// The metrics for the font descriptor.
    pub descriptor: FontDescriptor,
}

/// A glyph of the converted font.
#[derive(Clone, Copy)]
struct Glyph<'a> {
    name: &'a str,
    id: usize,
}

impl Type1Font {
    /// Converts the font into a CFF font containing the glyphs of the codes
    /// marked in `used`.
    ///
    /// Codes are mapped to glyphs through `encoding`, or the built-in
    /// encoding of the font if it is `None`. Components of accented glyphs
    /// are added as needed.
    pub fn convert(
        &self,
        used: &[bool; 256],
        encoding: Option<&Encoding>,
        settings: &ConvertSettings,
    ) -> Result<ConvertedFont> {
        let encoding = encoding.unwrap_or(&self.encoding);
        let warning_sink = &settings.warning_sink;

        let notdef = self.glyph_id(".notdef").ok_or(Error::MissingNotdef)?;

        let font_name = settings
            .font_name
            .clone()
            .unwrap_or_else(|| self.font_name.clone());

        let mut cff = CffFont::new(font_name.clone());
        self.write_top_dict(&mut cff)?;

        let mut glyphs = vec![Glyph {
            name: ".notdef",
            id: notdef,
        }];
        let mut gids: FxHashMap<&str, u16> = FxHashMap::default();
        let mut used = *used;
        let mut code_to_gid = [None; 256];

        for code in 0..=255u8 {
            let slot = usize::from(code);

            if !used[slot] {
                continue;
            }

            let Some(name) = encoding.get(code) else {
                used[slot] = false;
                continue;
            };

            let Some(id) = self.glyph_id(name) else {
                warn!("glyph /{name} missing in font");
                warning_sink(ConvertWarning::MissingGlyph {
                    code,
                    name: name.to_string(),
                });
                used[slot] = false;
                continue;
            };

            let sid = cff.strings.sid(name)?;

            if let Some(gid) = gids.get(name) {
                cff.encoding.push_supplement(code, sid);
                code_to_gid[slot] = Some(*gid);
            } else {
                let gid = u16::try_from(glyphs.len()).map_err(|_| Error::TooManyGlyphs)?;
                glyphs.push(Glyph { name, id });
                gids.insert(name, gid);
                cff.charset.push(sid);
                cff.encoding.push_code(code);
                code_to_gid[slot] = Some(gid);
            }
        }

        let default_width = self.default_width(&glyphs, settings.default_width);
        let nominal_width = 0.0;

        let descriptor = self.descriptor(&font_name);
        self.write_private_dict(&mut cff.private_dict, default_width, nominal_width);

        let mut widths = Vec::with_capacity(glyphs.len());
        let mut bbox = Rect {
            x_min: 1000.0,
            y_min: 1000.0,
            x_max: -1000.0,
            y_max: -1000.0,
        };
        let mut have_seac = false;

        // Accent components are appended while converting.
        let mut gid = 0;
        while gid < glyphs.len() {
            let Glyph { name, id } = glyphs[gid];
            gid += 1;

            let data = self
                .charstrings
                .get(id)
                .ok_or(Error::InvalidFontFile("missing charstring"))?;

            let (encoded, metrics) = match charstring::convert_charstring(
                data,
                &self.subrs,
                default_width,
                nominal_width,
            ) {
                Ok(converted) => converted,
                Err(error) if settings.skip_invalid_glyphs => {
                    warn!("replacing invalid glyph /{name}: {error}");
                    warning_sink(ConvertWarning::InvalidGlyph {
                        name: name.to_string(),
                        error,
                    });

                    cff.charstrings.push(vec![t2_operator::ENDCHAR]);
                    widths.push(default_width);
                    continue;
                }
                Err(source) => {
                    return Err(Error::Glyph {
                        name: name.to_string(),
                        source,
                    });
                }
            };

            debug!("converted /{name}: {} bytes", encoded.len());
            cff.charstrings.push(encoded);
            widths.push(metrics.width);
            bbox.union(&metrics.bbox);

            if let Some(seac) = metrics.seac {
                have_seac = true;
                warning_sink(ConvertWarning::Seac(name.to_string()));

                for (code, kind) in [(seac.achar, "accent"), (seac.bchar, "base")] {
                    let Some(component) = standard_glyph_name(code) else {
                        warn!("{kind} char with code {code} has no standard name");
                        continue;
                    };

                    if gids.contains_key(component) {
                        continue;
                    }

                    let Some(id) = self.glyph_id(component) else {
                        warn!("{kind} char /{component} not found");
                        warning_sink(ConvertWarning::MissingComponent(component.to_string()));
                        continue;
                    };

                    let gid = u16::try_from(glyphs.len()).map_err(|_| Error::TooManyGlyphs)?;
                    glyphs.push(Glyph {
                        name: component,
                        id,
                    });
                    gids.insert(component, gid);
                    cff.charset.push(cff.strings.sid(component)?);
                }
            }
        }

        // Without rendering the components, the true bounding box of an
        // accented glyph is not known.
        let font_bbox = if have_seac {
            self.info.font_bbox.ok_or(Error::MissingFontBBox)?
        } else {
            [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
        };
        cff.top_dict.numbers(top_dict_operator::FONT_BBOX, &font_bbox);

        let (first_char, last_char, code_widths) = code_widths(&used, &code_to_gid, &widths);

        let num_glyphs = glyphs.len();
        let data = cff.write()?;

        debug!("converted {font_name}: {num_glyphs} glyphs, {} bytes", data.len());

        Ok(ConvertedFont {
            data,
            font_name,
            num_glyphs,
            first_char,
            last_char,
            widths: code_widths,
            font_bbox: font_bbox.map(f64::round),
            used,
            code_to_gid,
            descriptor,
        })
    }

    fn write_top_dict(&self, cff: &mut CffFont) -> Result<()> {
        let info = &self.info;
        let strings = [
            (top_dict_operator::VERSION, &info.version),
            (top_dict_operator::NOTICE, &info.notice),
            (top_dict_operator::FULL_NAME, &info.full_name),
            (top_dict_operator::FAMILY_NAME, &info.family_name),
            (top_dict_operator::WEIGHT, &info.weight),
            (top_dict_operator::COPYRIGHT, &info.copyright),
        ];

        for (op, value) in strings {
            if let Some(value) = value {
                let sid = cff.strings.sid(value)?;
                cff.top_dict.number(op, f64::from(sid));
            }
        }

        let dict = &mut cff.top_dict;

        if info.is_fixed_pitch {
            dict.number(top_dict_operator::IS_FIXED_PITCH, 1.0);
        }

        if info.italic_angle != 0.0 {
            dict.number(top_dict_operator::ITALIC_ANGLE, info.italic_angle);
        }

        if let Some(position) = info.underline_position {
            dict.number(top_dict_operator::UNDERLINE_POSITION, position);
        }

        if let Some(thickness) = info.underline_thickness {
            dict.number(top_dict_operator::UNDERLINE_THICKNESS, thickness);
        }

        if info.paint_type != 0.0 {
            dict.number(top_dict_operator::PAINT_TYPE, info.paint_type);
        }

        if let Some(unique_id) = info.unique_id {
            dict.number(top_dict_operator::UNIQUE_ID, unique_id);
        }

        if info.stroke_width != 0.0 {
            dict.number(top_dict_operator::STROKE_WIDTH, info.stroke_width);
        }

        if let Some(matrix) = &info.font_matrix {
            dict.numbers(top_dict_operator::FONT_MATRIX, matrix);
        }

        Ok(())
    }

    fn write_private_dict(&self, dict: &mut DictWriter, default_width: f64, nominal_width: f64) {
        let private = &self.private;

        let blues = [
            (private_dict_operator::BLUE_VALUES, &private.blue_values),
            (private_dict_operator::OTHER_BLUES, &private.other_blues),
            (private_dict_operator::FAMILY_BLUES, &private.family_blues),
            (private_dict_operator::FAMILY_OTHER_BLUES, &private.family_other_blues),
            (private_dict_operator::STEM_SNAP_H, &private.stem_snap_h),
            (private_dict_operator::STEM_SNAP_V, &private.stem_snap_v),
        ];

        for (op, values) in blues {
            if !values.is_empty() {
                dict.delta(op, values);
            }
        }

        let numbers = [
            (private_dict_operator::STD_HW, private.std_hw),
            (private_dict_operator::STD_VW, private.std_vw),
            (private_dict_operator::BLUE_SCALE, private.blue_scale),
            (private_dict_operator::BLUE_SHIFT, private.blue_shift),
            (private_dict_operator::BLUE_FUZZ, private.blue_fuzz),
            (private_dict_operator::LANGUAGE_GROUP, private.language_group),
            (private_dict_operator::EXPANSION_FACTOR, private.expansion_factor),
        ];

        for (op, value) in numbers {
            if let Some(value) = value {
                dict.number(op, value);
            }
        }

        if private.force_bold {
            dict.number(private_dict_operator::FORCE_BOLD, 1.0);
        }

        if default_width != 0.0 {
            dict.number(private_dict_operator::DEFAULT_WIDTH_X, default_width);
        }

        if nominal_width != 0.0 {
            dict.number(private_dict_operator::NOMINAL_WIDTH_X, nominal_width);
        }
    }

    fn metrics_of(&self, name: &str) -> Option<GlyphMetrics> {
        self.glyph_metrics(name)?.ok()
    }

    fn default_width(&self, glyphs: &[Glyph<'_>], mode: DefaultWidth) -> f64 {
        match mode {
            DefaultWidth::SpaceGlyph => self
                .metrics_of("space")
                .map_or(FALLBACK_DEFAULT_WIDTH, |m| m.width),
            DefaultWidth::MostCommon => {
                let mut widths: Vec<f64> = glyphs
                    .iter()
                    .filter_map(|g| self.metrics_of(g.name))
                    .map(|m| m.width)
                    .collect();
                widths.sort_by(f64::total_cmp);

                most_common(&widths).unwrap_or(FALLBACK_DEFAULT_WIDTH)
            }
        }
    }

    fn descriptor(&self, font_name: &str) -> FontDescriptor {
        let (mut cap_height, mut ascent, mut descent) = match self.info.font_bbox {
            Some(bbox) => (bbox[3], bbox[3], bbox[1]),
            None => (FALLBACK_CAP_HEIGHT, FALLBACK_ASCENT, FALLBACK_DESCENT),
        };

        if let Some(m) = self.metrics_of("H") {
            cap_height = m.bbox.y_max;
        }

        if let Some(m) = self.metrics_of("p") {
            descent = m.bbox.y_min;
        }

        if let Some(m) = self.metrics_of("b") {
            ascent = m.bbox.y_max;
        }

        let mut flags = FontFlags::SYMBOLIC;
        flags.set(FontFlags::ITALIC, self.info.italic_angle != 0.0);
        flags.set(FontFlags::FORCE_BOLD, self.private.force_bold);
        flags.set(FontFlags::FIXED_PITCH, self.info.is_fixed_pitch);
        flags.set(FontFlags::SERIF, !font_name.contains("Sans"));

        FontDescriptor {
            ascent,
            descent,
            cap_height,
            italic_angle: self.info.italic_angle,
            stem_v: self.private.std_vw.unwrap_or(FALLBACK_STEM_V),
            flags,
        }
    }
}

/// Returns the most frequent value of a sorted slice, preferring the
/// smaller one on ties.
fn most_common(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;

    for run in sorted.chunk_by(|a, b| a == b) {
        if best.is_none_or(|(_, count)| run.len() > count) {
            best = Some((run[0], run.len()));
        }
    }

    best.map(|(width, _)| width)
}

/// Returns the code range in use and the rounded widths of its codes.
fn code_widths(
    used: &[bool; 256],
    code_to_gid: &[Option<u16>; 256],
    widths: &[f64],
) -> (u8, u8, Vec<f64>) {
    let first = used.iter().position(|u| *u);
    let last = used.iter().rposition(|u| *u);

    let (Some(first), Some(last)) = (first, last) else {
        return (0, 0, vec![0.0]);
    };

    let widths = (first..=last)
        .map(|code| {
            code_to_gid[code]
                .and_then(|gid| widths.get(usize::from(gid)))
                .map_or(0.0, |w| w.round())
        })
        .collect();

    (first as u8, last as u8, widths)
}
