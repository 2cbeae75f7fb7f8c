//! Execution of Type 1 charstrings.
//!
//! The interpreter does not draw anything. It replays the charstring of a
//! glyph to recover its metrics, stem hints and path in a form that can be
//! re-encoded as a Type 2 charstring.

use bitflags::bitflags;

use crate::Rect;
use crate::argstack::{ArgumentsStack, CS_STACK_MAX, PS_STACK_MAX};
use crate::charstring::CharStringTable;
use crate::charstring::Seac;
use crate::charstring::operator::{Op, sb_operator, tb_operator};
use crate::charstring::path::{Path, PathElement, SegmentOp};
use crate::charstring::stem::{StemDirection, Stems};
use crate::error::{CharStringError, ErrorKind};
use crate::number;
use crate::stream::Stream;

/// Maximum depth of nested subroutine calls.
const MAX_NESTING: usize = 10;

macro_rules! trace_op {
    ($ctx:expr, $op:expr) => {
        log::trace!("{} ({})", $op, $ctx.cs.dump());
    };
}

bitflags! {
    /// Features of a glyph that influence its Type 2 encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct GlyphFlags: u8 {
        /// The glyph uses hint replacement.
        const USE_HINTMASK = 1 << 0;
        /// The glyph uses counter control.
        const USE_CNTRMASK = 1 << 1;
    }
}

/// Where the interpreter is within a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Phase {
    /// Before any stem or path operator.
    Init,
    /// Stems have been declared but nothing has been drawn yet.
    Hint,
    /// At least one path operator has executed.
    Path,
    /// Between the start and the end of a flex sequence.
    Flex,
}

/// Everything the interpreter learns about a glyph.
#[derive(Debug, Default)]
pub(crate) struct GlyphDesc {
    pub(crate) flags: GlyphFlags,
    pub(crate) sbx: f64,
    pub(crate) sby: f64,
    pub(crate) wx: f64,
    pub(crate) wy: f64,
    pub(crate) stems: Stems,
    pub(crate) path: Path,
    pub(crate) seac: Option<Seac>,
    pub(crate) bbox: Rect,
}

/// What the caller of `execute` should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// The charstring or subroutine ran to its end, or hit `return`.
    Return,
    /// `endchar` was executed.
    EndChar,
}

/// The state of one glyph conversion.
pub(crate) struct ConversionContext<'a> {
    subrs: &'a CharStringTable,
    pub(super) cs: ArgumentsStack<CS_STACK_MAX>,
    pub(super) ps: ArgumentsStack<PS_STACK_MAX>,
    pub(super) phase: Phase,
    pub(super) glyph: GlyphDesc,
}

impl<'a> ConversionContext<'a> {
    pub(crate) fn new(subrs: &'a CharStringTable) -> Self {
        Self {
            subrs,
            cs: ArgumentsStack::new(),
            ps: ArgumentsStack::new(),
            phase: Phase::Init,
            glyph: GlyphDesc::default(),
        }
    }

    /// Interprets the charstring of a glyph and returns what was learned
    /// about it. The path is not post-processed yet.
    pub(crate) fn run(mut self, data: &[u8]) -> Result<GlyphDesc, CharStringError> {
        if self.execute(data, 0)? != Flow::EndChar {
            log::warn!("charstring has no endchar");
        }

        if !self.cs.is_empty() || !self.ps.is_empty() {
            log::warn!(
                "stack not empty after glyph ({}, {})",
                self.cs.len(),
                self.ps.len()
            );
        }

        Ok(self.glyph)
    }

    fn error(&self, kind: ErrorKind, op: Option<Op>) -> CharStringError {
        CharStringError {
            kind,
            op,
            cs_depth: self.cs.len(),
            ps_depth: self.ps.len(),
        }
    }

    fn execute(&mut self, data: &[u8], depth: usize) -> Result<Flow, CharStringError> {
        if depth > MAX_NESTING {
            log::warn!("subroutines nested too deeply");
            return Err(self.error(ErrorKind::Parse, Some(Op::OneByte(sb_operator::CALL_SUBR))));
        }

        let mut s = Stream::new(data);

        while let Some(b0) = s.read_byte() {
            match b0 {
                sb_operator::LONG_INT => {
                    let v = number::read_longint(&mut s).map_err(|e| self.error(e, None))?;
                    self.cs.push(v).map_err(|e| self.error(e, None))?;
                }
                sb_operator::RETURN => {
                    trace_op!(self, Op::OneByte(b0));
                    return Ok(Flow::Return);
                }
                sb_operator::CALL_SUBR => {
                    let op = Op::OneByte(b0);
                    trace_op!(self, op);

                    let index = self.cs.pop().map_err(|e| self.error(e, Some(op)))?;
                    let subrs = self.subrs;
                    let subr = usize::try_from(index as i64)
                        .ok()
                        .and_then(|idx| subrs.get(idx))
                        .ok_or_else(|| {
                            log::warn!("invalid subroutine index {index}");
                            self.error(ErrorKind::Parse, Some(op))
                        })?;

                    if self.execute(subr, depth + 1)? == Flow::EndChar {
                        self.check_trailing(&s);
                        return Ok(Flow::EndChar);
                    }
                }
                sb_operator::ESCAPE => {
                    let b1 = s
                        .read_byte()
                        .ok_or_else(|| self.error(ErrorKind::Parse, Some(Op::OneByte(b0))))?;
                    let op = Op::Escape(b1);
                    trace_op!(self, op);

                    self.escape_operator(b1)
                        .map_err(|e| self.error(e, Some(op)))?;
                }
                sb_operator::ENDCHAR => {
                    trace_op!(self, Op::OneByte(b0));
                    self.cs.clear();
                    self.check_trailing(&s);

                    return Ok(Flow::EndChar);
                }
                0..32 if b0 != sb_operator::SHORT_INT => {
                    let op = Op::OneByte(b0);
                    trace_op!(self, op);

                    self.operator(b0).map_err(|e| self.error(e, Some(op)))?;
                }
                _ => {
                    let v = number::read_integer(b0, &mut s).map_err(|e| self.error(e, None))?;
                    self.cs.push(v).map_err(|e| self.error(e, None))?;
                }
            }
        }

        Ok(Flow::Return)
    }

    /// Warns about bytes following `endchar`, unless it is a lone `return`.
    fn check_trailing(&self, s: &Stream<'_>) {
        if let Some(rest) = s.tail()
            && !rest.is_empty()
            && rest != [sb_operator::RETURN]
        {
            log::warn!("garbage after endchar ({} bytes)", rest.len());
        }
    }

    /// Appends a path segment built from the topmost `n` operands.
    fn add_segment(&mut self, op: SegmentOp, n: usize) -> Result<(), ErrorKind> {
        let args = self.cs.top(n)?;
        self.glyph.path.push(PathElement::segment(op, args));

        if self.phase != Phase::Flex {
            self.phase = Phase::Path;
        }

        Ok(())
    }

    /// Registers a stem relative to the side bearing point and returns its id.
    pub(super) fn add_stem(
        &mut self,
        pos: f64,
        width: f64,
        dir: StemDirection,
    ) -> Result<u8, ErrorKind> {
        let pos = match dir {
            StemDirection::Horizontal => pos + self.glyph.sby,
            StemDirection::Vertical => pos + self.glyph.sbx,
        };

        self.glyph.stems.add(pos, width, dir)
    }

    fn declare_stem(&mut self, pos: f64, width: f64, dir: StemDirection) -> Result<(), ErrorKind> {
        let id = self.add_stem(pos, width, dir)?;
        self.glyph.path.push(PathElement::HintDecl(id));

        if self.phase == Phase::Init {
            self.phase = Phase::Hint;
        }

        Ok(())
    }

    fn operator(&mut self, op: u8) -> Result<(), ErrorKind> {
        use sb_operator as sb;

        match op {
            sb::CLOSE_PATH => {}
            sb::HSBW => {
                self.cs.require(2)?;
                self.glyph.wx = self.cs.pop()?;
                self.glyph.wy = 0.0;
                self.glyph.sbx = self.cs.pop()?;
                self.glyph.sby = 0.0;
            }
            sb::HORIZONTAL_STEM | sb::VERTICAL_STEM => {
                let args = self.cs.top(2)?;
                let (pos, width) = (args[0], args[1]);
                let dir = if op == sb::HORIZONTAL_STEM {
                    StemDirection::Horizontal
                } else {
                    StemDirection::Vertical
                };

                self.declare_stem(pos, width, dir)?;
            }
            sb::MOVE_TO => {
                let args = self.cs.top(2)?;
                let (mut dx, mut dy) = (args[0], args[1]);

                // Type 2 moves are relative to the origin instead of the
                // side bearing point.
                if self.phase < Phase::Path {
                    dx += self.glyph.sbx;
                    dy += self.glyph.sby;
                }

                self.cs.clear();
                self.cs.push(dx)?;
                self.cs.push(dy)?;
                self.add_segment(SegmentOp::RMoveTo, 2)?;
            }
            sb::HORIZONTAL_MOVE_TO | sb::VERTICAL_MOVE_TO => {
                let d = self.cs.top(1)?[0];
                let (sbx, sby) = (self.glyph.sbx, self.glyph.sby);

                self.cs.clear();

                if self.phase < Phase::Path {
                    if op == sb::HORIZONTAL_MOVE_TO {
                        if sby != 0.0 {
                            self.cs.push(d + sbx)?;
                            self.cs.push(sby)?;
                            self.add_segment(SegmentOp::RMoveTo, 2)?;
                        } else {
                            self.cs.push(d + sbx)?;
                            self.add_segment(SegmentOp::HMoveTo, 1)?;
                        }
                    } else if sbx != 0.0 {
                        self.cs.push(sbx)?;
                        self.cs.push(d + sby)?;
                        self.add_segment(SegmentOp::RMoveTo, 2)?;
                    } else {
                        self.cs.push(d + sby)?;
                        self.add_segment(SegmentOp::VMoveTo, 1)?;
                    }
                } else {
                    self.cs.push(d)?;
                    let op = if op == sb::HORIZONTAL_MOVE_TO {
                        SegmentOp::HMoveTo
                    } else {
                        SegmentOp::VMoveTo
                    };
                    self.add_segment(op, 1)?;
                }
            }
            sb::LINE_TO => self.add_segment(SegmentOp::RLineTo, 2)?,
            sb::HORIZONTAL_LINE_TO => self.add_segment(SegmentOp::HLineTo, 1)?,
            sb::VERTICAL_LINE_TO => self.add_segment(SegmentOp::VLineTo, 1)?,
            sb::CURVE_TO => self.add_segment(SegmentOp::RRCurveTo, 6)?,
            sb::VH_CURVE_TO => self.add_segment(SegmentOp::VHCurveTo, 4)?,
            sb::HV_CURVE_TO => self.add_segment(SegmentOp::HVCurveTo, 4)?,
            _ => {
                log::warn!("unknown charstring operator {op}");
                return Err(ErrorKind::Parse);
            }
        }

        self.cs.clear();

        Ok(())
    }

    fn escape_operator(&mut self, op: u8) -> Result<(), ErrorKind> {
        use tb_operator as tb;

        match op {
            tb::SBW => {
                self.cs.require(4)?;
                self.glyph.wy = self.cs.pop()?;
                self.glyph.wx = self.cs.pop()?;
                self.glyph.sby = self.cs.pop()?;
                self.glyph.sbx = self.cs.pop()?;
                self.cs.clear();
            }
            tb::HSTEM3 | tb::VSTEM3 => {
                let args = self.cs.top(6)?;
                let pairs = [(args[0], args[1]), (args[2], args[3]), (args[4], args[5])];
                let dir = if op == tb::HSTEM3 {
                    StemDirection::Horizontal
                } else {
                    StemDirection::Vertical
                };

                for (pos, width) in pairs {
                    self.declare_stem(pos, width, dir)?;
                }

                self.cs.clear();
            }
            tb::SET_CURRENT_POINT => {
                self.cs.require(2)?;
                self.cs.clear();
            }
            tb::POP => {
                let v = self.ps.pop().map_err(|_| ErrorKind::Parse)?;
                self.cs.push(v)?;
            }
            tb::DOTSECTION => {
                if !self.glyph.flags.contains(GlyphFlags::USE_HINTMASK) {
                    log::debug!("ignoring obsolete dotsection operator");
                }
            }
            tb::DIV => {
                let num2 = self.cs.pop()?;
                let num1 = self.cs.pop()?;
                self.cs.push(num1 / num2)?;
            }
            tb::CALL_OTHER_SUBR => self.call_other_subr()?,
            tb::SEAC => {
                self.cs.require(5)?;
                let achar = self.cs.pop()? as u8;
                let bchar = self.cs.pop()? as u8;
                let ady = self.cs.pop()?;
                let adx = self.cs.pop()?;
                let asb = self.cs.pop()?;

                // The accent is positioned relative to the origin of the
                // base glyph, not to its side bearing point.
                self.glyph.seac = Some(Seac {
                    adx: adx + self.glyph.sbx - asb,
                    ady: ady + self.glyph.sby,
                    bchar,
                    achar,
                });
                self.cs.clear();
            }
            _ => {
                log::warn!("unknown charstring operator 12 {op}");
                return Err(ErrorKind::Parse);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(data: &[u8]) -> Result<GlyphDesc, CharStringError> {
        ConversionContext::new(&CharStringTable::default()).run(data)
    }

    fn n(v: i32) -> u8 {
        (v + 139) as u8
    }

    #[test]
    fn first_move_is_offset_by_side_bearing() {
        // hsbw 100 0, rmoveto 50 50, endchar
        let glyph = run(&[n(100), n(0), 13, n(50), n(50), 21, 14]).unwrap();

        assert_eq!(glyph.sbx, 100.0);
        assert_eq!(
            glyph.path.elements,
            vec![PathElement::segment(SegmentOp::RMoveTo, &[150.0, 50.0])]
        );
    }

    #[test]
    fn later_moves_are_not_offset() {
        // hsbw 100 0, rmoveto 0 0, rmoveto 10 10, endchar
        let glyph = run(&[n(100), n(0), 13, n(0), n(0), 21, n(10), n(10), 21, 14]).unwrap();

        assert_eq!(
            glyph.path.elements[1],
            PathElement::segment(SegmentOp::RMoveTo, &[10.0, 10.0])
        );
    }

    #[test]
    fn hmoveto_with_vertical_side_bearing() {
        // sbw 10 20 500 0, hmoveto 5, endchar
        let glyph = run(&[n(10), n(20), 248, 136, n(0), 12, 7, n(5), 22, 14]).unwrap();

        assert_eq!(glyph.wx, 500.0);
        assert_eq!(
            glyph.path.elements,
            vec![PathElement::segment(SegmentOp::RMoveTo, &[15.0, 20.0])]
        );
    }

    #[test]
    fn vmoveto_without_horizontal_side_bearing() {
        // hsbw 0 500, vmoveto 5, endchar
        let glyph = run(&[n(0), 248, 136, 13, n(5), 4, 14]).unwrap();

        assert_eq!(
            glyph.path.elements,
            vec![PathElement::segment(SegmentOp::VMoveTo, &[5.0])]
        );
    }

    #[test]
    fn stems_are_deduplicated() {
        // hsbw 10 500, hstem 0 20, vstem 5 10, hstem 0 20, endchar
        let glyph = run(&[
            n(10),
            248,
            136,
            13,
            n(0),
            n(20),
            1,
            n(5),
            n(10),
            3,
            n(0),
            n(20),
            1,
            14,
        ])
        .unwrap();

        assert_eq!(glyph.stems.len(), 2);
        assert_eq!(
            glyph.path.elements,
            vec![
                PathElement::HintDecl(0),
                PathElement::HintDecl(1),
                PathElement::HintDecl(0),
            ]
        );

        let vstem = glyph.stems.iter().nth(1).unwrap();
        assert_eq!(vstem.pos, 15.0);
    }

    #[test]
    fn hstem3_declares_three_stems() {
        let glyph = run(&[
            n(0),
            n(0),
            13,
            n(0),
            n(10),
            n(20),
            n(10),
            n(40),
            n(10),
            12,
            2,
            14,
        ])
        .unwrap();

        let positions: Vec<_> = glyph.stems.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn subroutine_calls() {
        let mut subrs = CharStringTable::default();
        // rlineto 10 0, return
        subrs.insert(0, &[n(10), n(0), 5, 11]);

        let glyph = ConversionContext::new(&subrs)
            .run(&[n(0), n(0), 13, n(0), 10, n(0), 10, 14])
            .unwrap();

        assert_eq!(glyph.path.elements.len(), 2);
    }

    #[test]
    fn invalid_subroutine_index() {
        let err = run(&[n(0), n(0), 13, n(3), 10, 14]).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.op, Some(Op::OneByte(10)));
    }

    #[test]
    fn recursion_is_bounded() {
        let mut subrs = CharStringTable::default();
        // Calls itself forever.
        subrs.insert(0, &[n(0), 10, 11]);

        let err = ConversionContext::new(&subrs)
            .run(&[n(0), 10, 14])
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn stack_underflow() {
        let err = run(&[n(1), 5, 14]).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Stack);
        assert_eq!(err.op, Some(Op::OneByte(5)));
        assert_eq!(err.cs_depth, 1);
    }

    #[test]
    fn stack_overflow() {
        let mut data = vec![n(1); 49];
        data.push(14);

        assert_eq!(run(&data).unwrap_err().kind, ErrorKind::Stack);
    }

    #[test]
    fn unknown_operator() {
        let err = run(&[n(0), n(0), 13, 2, 14]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);

        let err = run(&[n(0), n(0), 13, 12, 5, 14]).unwrap_err();
        assert_eq!(err.op, Some(Op::Escape(5)));
    }

    #[test]
    fn div() {
        // hsbw 0 (1000 4 div), endchar
        let glyph = run(&[n(0), 250, 124, n(4), 12, 12, 13, 14]).unwrap();
        assert_eq!(glyph.wx, 250.0);
    }

    #[test]
    fn seac_compensates_side_bearings() {
        // hsbw 20 500, seac 5 100 200 65 194
        let glyph = run(&[
            n(20),
            248,
            136,
            13,
            n(5),
            n(100),
            247,
            92,
            n(65),
            247,
            86,
            12,
            6,
        ])
        .unwrap();

        assert_eq!(
            glyph.seac,
            Some(Seac {
                adx: 115.0,
                ady: 200.0,
                bchar: 65,
                achar: 194,
            })
        );
    }

    #[test]
    fn closepath_keeps_current_point() {
        let glyph = run(&[n(0), n(0), 13, n(1), n(1), 21, 9, n(2), n(0), 5, 14]).unwrap();

        assert_eq!(glyph.path.elements.len(), 2);
    }

    #[test]
    fn longint_operand() {
        // hsbw 0 65536, endchar
        let glyph = run(&[n(0), 255, 0, 1, 0, 0, 13, 14]).unwrap();
        assert_eq!(glyph.wx, 65536.0);
    }
}
