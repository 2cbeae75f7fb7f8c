//! Serialization of an interpreted glyph as a Type 2 charstring.

use crate::argstack::CS_STACK_MAX;
use crate::charstring::interpret::{GlyphDesc, GlyphFlags};
use crate::charstring::operator::t2_operator;
use crate::charstring::path::PathElement;
use crate::charstring::stem::{Stem, StemDirection};
use crate::error::ErrorKind;
use crate::number::encode_numbers;

/// Maximum length of an encoded charstring.
pub(crate) const CS_STR_LEN_MAX: usize = 65536;

/// Encodes a glyph whose path has been post-processed and whose stems are
/// sorted.
pub(crate) fn encode(
    glyph: &GlyphDesc,
    default_width: f64,
    nominal_width: f64,
) -> Result<Vec<u8>, ErrorKind> {
    let mut out = Vec::new();

    if glyph.wx != default_width {
        encode_numbers(&[glyph.wx - nominal_width], &mut out)?;
    }

    write_stems(glyph, &mut out)?;

    let hint_masked = glyph.flags.contains(GlyphFlags::USE_HINTMASK);
    let elements = &glyph.path.elements;
    let mut i = 0;

    while i < elements.len() {
        match &elements[i] {
            PathElement::HintDecl(_) => {
                let start = i;
                while let Some(PathElement::HintDecl(_)) = elements.get(i) {
                    i += 1;
                }

                if hint_masked {
                    let ids = elements[start..i].iter().filter_map(|e| match e {
                        PathElement::HintDecl(id) => Some(*id),
                        _ => None,
                    });

                    out.push(t2_operator::HINTMASK);
                    out.extend(glyph.stems.mask(ids));
                }

                continue;
            }
            PathElement::CounterMask(ids) => {
                out.push(t2_operator::CNTRMASK);
                out.extend(glyph.stems.mask(ids.iter().copied()));
            }
            PathElement::Segment { op, args } => {
                encode_numbers(args, &mut out)?;
                op.write(&mut out);
            }
            PathElement::FlexCtrl { .. } => return Err(ErrorKind::Parse),
        }

        i += 1;
    }

    if let Some(seac) = &glyph.seac {
        log::warn!("encoding seac as the four-argument form of endchar");
        encode_numbers(
            &[
                seac.adx,
                seac.ady,
                f64::from(seac.bchar),
                f64::from(seac.achar),
            ],
            &mut out,
        )?;
    }

    out.push(t2_operator::ENDCHAR);

    if out.len() > CS_STR_LEN_MAX {
        return Err(ErrorKind::Buffer);
    }

    Ok(out)
}

/// Writes the stem hint declarations.
///
/// Within a run of stems, the first position is absolute and every other
/// is relative to the end of the previous stem. A run is flushed whenever
/// its operands would fill the operand stack.
fn write_stems(glyph: &GlyphDesc, out: &mut Vec<u8>) -> Result<(), ErrorKind> {
    let hint_masked = glyph.flags.contains(GlyphFlags::USE_HINTMASK);
    let masked = hint_masked || glyph.flags.contains(GlyphFlags::USE_CNTRMASK);

    let (hstems, vstems): (Vec<&Stem>, Vec<&Stem>) = glyph
        .stems
        .iter()
        .partition(|s| s.dir == StemDirection::Horizontal);

    let hop = if hint_masked {
        t2_operator::HSTEMHM
    } else {
        t2_operator::HSTEM
    };

    for run in hstems.chunks(CS_STACK_MAX / 2) {
        write_stem_run(run, out)?;
        out.push(hop);
    }

    let runs = vstems.chunks(CS_STACK_MAX / 2);
    let last = runs.len().saturating_sub(1);

    for (i, run) in runs.enumerate() {
        write_stem_run(run, out)?;

        if i < last {
            out.push(if hint_masked {
                t2_operator::VSTEMHM
            } else {
                t2_operator::VSTEM
            });
        } else if masked {
            // A mask right at the start implies the preceding stem operator.
            let implied = matches!(
                glyph.path.first(),
                Some(PathElement::HintDecl(_) | PathElement::CounterMask(_))
            );

            if !implied {
                out.push(t2_operator::VSTEMHM);
            }
        } else {
            out.push(t2_operator::VSTEM);
        }
    }

    Ok(())
}

fn write_stem_run(run: &[&Stem], out: &mut Vec<u8>) -> Result<(), ErrorKind> {
    let mut prev: Option<&Stem> = None;

    for &stem in run {
        let pos = match prev {
            Some(p) => stem.pos - (p.pos + p.width),
            None => stem.pos,
        };

        encode_numbers(&[pos, stem.width], out)?;
        prev = Some(stem);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charstring::Seac;
    use crate::charstring::path::SegmentOp;

    fn n(v: i32) -> u8 {
        (v + 139) as u8
    }

    #[test]
    fn empty_glyph() {
        let glyph = GlyphDesc {
            wx: 500.0,
            ..GlyphDesc::default()
        };

        assert_eq!(encode(&glyph, 500.0, 0.0).unwrap(), vec![14]);
        assert_eq!(encode(&glyph, 0.0, 450.0).unwrap(), vec![n(50), 14]);
    }

    #[test]
    fn stems_are_delta_encoded() {
        let mut glyph = GlyphDesc::default();
        glyph.stems.add(10.0, 20.0, StemDirection::Horizontal).unwrap();
        glyph.stems.add(50.0, 20.0, StemDirection::Horizontal).unwrap();
        glyph.stems.add(5.0, 10.0, StemDirection::Vertical).unwrap();
        glyph.stems.sort();

        assert_eq!(
            encode(&glyph, 0.0, 0.0).unwrap(),
            vec![n(10), n(20), n(20), n(20), 1, n(5), n(10), 3, 14]
        );
    }

    #[test]
    fn long_stem_runs_are_split() {
        let mut glyph = GlyphDesc::default();
        for i in 0..30 {
            glyph
                .stems
                .add(f64::from(i) * 2.0, 1.0, StemDirection::Horizontal)
                .unwrap();
        }
        glyph.stems.sort();

        let out = encode(&glyph, 0.0, 0.0).unwrap();
        let hstem_ops = out.iter().filter(|b| **b == 1).count();

        assert_eq!(hstem_ops, 2);
        // The first stem of the second run is absolute.
        assert_eq!(&out[24 * 2 + 1..24 * 2 + 3], &[n(48), n(1)]);
    }

    #[test]
    fn hintmask_follows_sorted_order() {
        let mut glyph = GlyphDesc {
            flags: GlyphFlags::USE_HINTMASK,
            ..GlyphDesc::default()
        };
        let a = glyph.stems.add(100.0, 10.0, StemDirection::Horizontal).unwrap();
        let b = glyph.stems.add(0.0, 10.0, StemDirection::Vertical).unwrap();
        let c = glyph.stems.add(0.0, 10.0, StemDirection::Horizontal).unwrap();
        glyph.path.push(PathElement::HintDecl(a));
        glyph.path.push(PathElement::HintDecl(b));
        glyph.path.push(PathElement::segment(SegmentOp::RMoveTo, &[0.0, 0.0]));
        glyph.path.push(PathElement::HintDecl(c));
        glyph.path.push(PathElement::segment(SegmentOp::HLineTo, &[10.0]));
        glyph.stems.sort();

        // Sorted: c, a, b.
        assert_eq!(
            encode(&glyph, 0.0, 0.0).unwrap(),
            vec![
                n(0),
                n(10),
                n(90),
                n(10),
                18,
                n(0),
                n(10),
                19,
                0b0110_0000,
                n(0),
                n(0),
                21,
                19,
                0b1000_0000,
                n(10),
                6,
                14
            ]
        );
    }

    #[test]
    fn vstem_kept_before_path() {
        let mut glyph = GlyphDesc {
            flags: GlyphFlags::USE_HINTMASK,
            ..GlyphDesc::default()
        };
        glyph.stems.add(0.0, 10.0, StemDirection::Vertical).unwrap();

        assert_eq!(encode(&glyph, 0.0, 0.0).unwrap(), vec![n(0), n(10), 23, 14]);
    }

    #[test]
    fn counter_mask() {
        let mut glyph = GlyphDesc {
            flags: GlyphFlags::USE_CNTRMASK,
            ..GlyphDesc::default()
        };
        let a = glyph.stems.add(0.0, 10.0, StemDirection::Horizontal).unwrap();
        glyph.path.push(PathElement::CounterMask(vec![a]));
        glyph.stems.sort();

        assert_eq!(
            encode(&glyph, 0.0, 0.0).unwrap(),
            vec![n(0), n(10), 1, 20, 0b1000_0000, 14]
        );
    }

    #[test]
    fn seac_uses_endchar_arguments() {
        let glyph = GlyphDesc {
            seac: Some(Seac {
                adx: 10.0,
                ady: 20.0,
                bchar: 65,
                achar: 66,
            }),
            ..GlyphDesc::default()
        };

        assert_eq!(
            encode(&glyph, 0.0, 0.0).unwrap(),
            vec![n(10), n(20), n(65), n(66), 14]
        );
    }

    #[test]
    fn flex_uses_escape() {
        let mut glyph = GlyphDesc::default();
        glyph.path.push(PathElement::segment(SegmentOp::HFlex, &[1.0; 7]));

        let mut expected = vec![n(1); 7];
        expected.extend([12, 34, 14]);

        assert_eq!(encode(&glyph, 0.0, 0.0).unwrap(), expected);
    }

    #[test]
    fn too_long() {
        let mut glyph = GlyphDesc::default();
        for _ in 0..14000 {
            glyph
                .path
                .push(PathElement::segment(SegmentOp::RLineTo, &[1000.0, 1000.0]));
        }

        assert_eq!(encode(&glyph, 0.0, 0.0), Err(ErrorKind::Buffer));
    }
}
