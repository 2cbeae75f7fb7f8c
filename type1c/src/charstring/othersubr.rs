//! The OtherSubrs invoked through `callothersubr`.
//!
//! OtherSubrs are PostScript procedures shipped with the font. Only the
//! standard ones with a known meaning are supported: flex (0 to 2), hint
//! replacement (3) and counter control (12 and 13).

use crate::argstack::PS_STACK_MAX;
use crate::charstring::interpret::{ConversionContext, GlyphFlags, Phase};
use crate::charstring::path::{PathElement, SegmentOp};
use crate::charstring::stem::{MAX_STEMS, StemDirection, StemId};
use crate::error::ErrorKind;

const MAX_STEM_GROUPS: usize = MAX_STEMS;

impl ConversionContext<'_> {
    /// Executes `callothersubr`, moving its arguments to the PostScript
    /// stack first.
    pub(super) fn call_other_subr(&mut self) -> Result<(), ErrorKind> {
        self.cs.require(2)?;
        let subr = self.cs.pop()? as i32;
        let argn = self.cs.pop()? as i32;

        let argn = usize::try_from(argn).map_err(|_| ErrorKind::Stack)?;
        self.cs.require(argn)?;

        if self.ps.len() + argn > PS_STACK_MAX {
            return Err(ErrorKind::Stack);
        }

        for _ in 0..argn {
            let v = self.cs.pop()?;
            self.ps.push(v)?;
        }

        match subr {
            0 => self.flex_end(),
            1 => {
                self.phase = Phase::Flex;
                Ok(())
            }
            2 => self.flex_point(),
            3 => {
                self.glyph.flags |= GlyphFlags::USE_HINTMASK;
                Ok(())
            }
            12 => self.expect_initial_phase(),
            13 => self.counter_control(),
            _ => {
                log::warn!("unknown othersubr #{subr}");
                Err(ErrorKind::Parse)
            }
        }
    }

    fn flex_end(&mut self) -> Result<(), ErrorKind> {
        let depth = self.ps.top(1).map_err(|_| ErrorKind::Parse)?[0];
        self.glyph.path.close_flex(depth)?;
        self.ps.pop()?;
        self.phase = Phase::Path;

        Ok(())
    }

    /// Turns the last move into a flex point.
    fn flex_point(&mut self) -> Result<(), ErrorKind> {
        if self.phase != Phase::Flex {
            return Err(ErrorKind::Parse);
        }

        let last = self.glyph.path.last_mut().ok_or(ErrorKind::Parse)?;

        let (dx, dy) = match last {
            PathElement::Segment { op, args } => match op {
                SegmentOp::RMoveTo => (args[0], args[1]),
                SegmentOp::HMoveTo => (args[0], 0.0),
                SegmentOp::VMoveTo => (0.0, args[0]),
                _ => return Err(ErrorKind::Parse),
            },
            _ => return Err(ErrorKind::Parse),
        };

        *last = PathElement::FlexCtrl { dx, dy };

        Ok(())
    }

    fn expect_initial_phase(&self) -> Result<(), ErrorKind> {
        match self.phase {
            Phase::Init | Phase::Hint => Ok(()),
            _ => Err(ErrorKind::Parse),
        }
    }

    /// Builds the stem groups of a counter control request.
    ///
    /// Each group is a run of `(position, width)` pairs with positions
    /// relative to the end of the previous stem. A negative width closes
    /// the group.
    fn counter_control(&mut self) -> Result<(), ErrorKind> {
        self.expect_initial_phase()?;

        let mut groups: Vec<Vec<StemId>> = vec![Vec::new(); MAX_STEM_GROUPS];

        let num_hgroups = self.read_stem_groups(&mut groups, StemDirection::Horizontal)?;
        let num_vgroups = self.read_stem_groups(&mut groups, StemDirection::Vertical)?;

        for group in groups.into_iter().take(num_hgroups.max(num_vgroups)) {
            self.glyph.path.push(PathElement::CounterMask(group));
        }

        self.glyph.flags |= GlyphFlags::USE_CNTRMASK;

        Ok(())
    }

    fn read_stem_groups(
        &mut self,
        groups: &mut [Vec<StemId>],
        dir: StemDirection,
    ) -> Result<usize, ErrorKind> {
        let count = self.ps.pop()? as i32;
        let count = usize::try_from(count)
            .ok()
            .filter(|c| *c <= MAX_STEM_GROUPS)
            .ok_or(ErrorKind::Parse)?;

        let mut n = 0;
        let mut pos = 0.0;

        while self.ps.len() >= 2 && n < count {
            pos += self.ps.pop()?;
            let del = self.ps.pop()?;

            let id = if del < 0.0 {
                self.add_stem(pos + del, -del, dir)?
            } else {
                self.add_stem(pos, del, dir)?
            };
            groups[n].push(id);

            pos += del;
            if del < 0.0 {
                pos = 0.0;
                n += 1;
            }
        }

        if n != count {
            log::warn!("counter control declares {count} groups but has {n}");
            return Err(ErrorKind::Stack);
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::charstring::CharStringTable;
    use crate::charstring::interpret::{ConversionContext, GlyphFlags};
    use crate::charstring::path::{PathElement, SegmentOp};
    use crate::error::ErrorKind;

    fn n(v: i32) -> u8 {
        (v + 139) as u8
    }

    fn callothersubr(data: &mut Vec<u8>, args: &[i32], subr: i32) {
        data.extend(args.iter().map(|a| n(*a)));
        data.extend([n(args.len() as i32), n(subr), 12, 16]);
    }

    fn rmoveto(data: &mut Vec<u8>, dx: i32, dy: i32) {
        data.extend([n(dx), n(dy), 21]);
    }

    fn run(data: &[u8]) -> Result<crate::charstring::interpret::GlyphDesc, ErrorKind> {
        ConversionContext::new(&CharStringTable::default())
            .run(data)
            .map_err(|e| e.kind)
    }

    fn flex_charstring(depth: i32) -> Vec<u8> {
        let mut data = vec![n(0), n(0), 13];
        rmoveto(&mut data, 0, 0);
        callothersubr(&mut data, &[], 1);

        for (dx, dy) in [
            (50, 5),
            (10, -5),
            (20, 10),
            (20, 0),
            (20, 0),
            (20, -10),
            (10, 0),
        ] {
            rmoveto(&mut data, dx, dy);
            callothersubr(&mut data, &[], 2);
        }

        // depth x y 3 0 callothersubr pop pop setcurrentpoint
        callothersubr(&mut data, &[depth, 10, 0], 0);
        data.extend([12, 17, 12, 17, 12, 33, 14]);
        data
    }

    #[test]
    fn flex() {
        let glyph = run(&flex_charstring(30)).unwrap();

        assert_eq!(
            glyph.path.elements,
            vec![
                PathElement::segment(SegmentOp::RMoveTo, &[0.0, 0.0]),
                PathElement::segment(
                    SegmentOp::Flex,
                    &[
                        60.0, 0.0, 20.0, 10.0, 20.0, 0.0, 20.0, 0.0, 20.0, -10.0, 10.0, 0.0, 30.0
                    ]
                ),
            ]
        );
    }

    #[test]
    fn flex_point_needs_a_move() {
        let mut data = vec![n(0), n(0), 13];
        callothersubr(&mut data, &[], 1);
        data.extend([n(5), n(0), 5]);
        callothersubr(&mut data, &[], 2);
        data.push(14);

        assert_eq!(run(&data).unwrap_err(), ErrorKind::Parse);
    }

    #[test]
    fn flex_point_outside_flex() {
        let mut data = vec![n(0), n(0), 13];
        rmoveto(&mut data, 0, 0);
        callothersubr(&mut data, &[], 2);
        data.push(14);

        assert_eq!(run(&data).unwrap_err(), ErrorKind::Parse);
    }

    #[test]
    fn hint_replacement() {
        let mut data = vec![n(0), n(0), 13];
        // 7 1 3 callothersubr pop
        callothersubr(&mut data, &[7], 3);
        data.extend([12, 17, 14]);

        let glyph = run(&data).unwrap();
        assert!(glyph.flags.contains(GlyphFlags::USE_HINTMASK));
    }

    #[test]
    fn counter_control() {
        let mut data = vec![n(0), n(0), 13];
        // One horizontal group of two stems, one vertical group of one stem.
        callothersubr(&mut data, &[1, 10, 20, 20, -10, 1, 80, -20], 13);
        data.push(14);

        let glyph = run(&data).unwrap();

        assert!(glyph.flags.contains(GlyphFlags::USE_CNTRMASK));
        assert_eq!(glyph.stems.len(), 3);
        assert_eq!(glyph.path.elements, vec![PathElement::CounterMask(vec![0, 1, 2])]);

        let stems: Vec<_> = glyph.stems.iter().map(|s| (s.pos, s.width)).collect();
        assert_eq!(stems, vec![(10.0, 20.0), (40.0, 10.0), (60.0, 20.0)]);
    }

    #[test]
    fn counter_control_group_mismatch() {
        let mut data = vec![n(0), n(0), 13];
        // Declares two horizontal groups but only closes one.
        callothersubr(&mut data, &[2, 10, 20, 0, -10], 13);
        data.push(14);

        assert_eq!(run(&data).unwrap_err(), ErrorKind::Stack);
    }

    #[test]
    fn counter_control_after_path() {
        let mut data = vec![n(0), n(0), 13];
        rmoveto(&mut data, 0, 0);
        callothersubr(&mut data, &[0, 0], 13);
        data.push(14);

        assert_eq!(run(&data).unwrap_err(), ErrorKind::Parse);
    }

    #[test]
    fn unknown_othersubr() {
        let mut data = vec![n(0), n(0), 13];
        callothersubr(&mut data, &[], 7);
        data.push(14);

        assert_eq!(run(&data).unwrap_err(), ErrorKind::Parse);
    }
}
