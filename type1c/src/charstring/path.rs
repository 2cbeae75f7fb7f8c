//! The path representation built by the interpreter and its post-processing.

use smallvec::SmallVec;

use crate::Rect;
use crate::argstack::CS_STACK_MAX;
use crate::charstring::operator::t2_operator;
use crate::charstring::stem::StemId;
use crate::error::ErrorKind;

/// The flex depth Adobe's fonts use, in hundredths of a pixel.
const STANDARD_FLEX_DEPTH: f64 = 50.0;

pub(crate) type Args = SmallVec<[f64; 13]>;

/// A Type 2 path construction operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentOp {
    RMoveTo,
    HMoveTo,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RRCurveTo,
    VHCurveTo,
    HVCurveTo,
    RCurveLine,
    RLineCurve,
    Flex,
    HFlex,
    HFlex1,
}

impl SegmentOp {
    /// Appends the Type 2 encoding of the operator.
    pub(crate) fn write(self, out: &mut Vec<u8>) {
        use t2_operator as t2;

        let code = match self {
            Self::RMoveTo => t2::RMOVETO,
            Self::HMoveTo => t2::HMOVETO,
            Self::VMoveTo => t2::VMOVETO,
            Self::RLineTo => t2::RLINETO,
            Self::HLineTo => t2::HLINETO,
            Self::VLineTo => t2::VLINETO,
            Self::RRCurveTo => t2::RRCURVETO,
            Self::VHCurveTo => t2::VHCURVETO,
            Self::HVCurveTo => t2::HVCURVETO,
            Self::RCurveLine => t2::RCURVELINE,
            Self::RLineCurve => t2::RLINECURVE,
            Self::Flex | Self::HFlex | Self::HFlex1 => {
                let code = match self {
                    Self::Flex => t2::FLEX,
                    Self::HFlex => t2::HFLEX,
                    _ => t2::HFLEX1,
                };
                out.extend_from_slice(&[t2::ESCAPE, code]);
                return;
            }
        };

        out.push(code);
    }
}

/// One element of a glyph's path.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathElement {
    /// A drawing operator with its operands.
    Segment { op: SegmentOp, args: Args },
    /// The declaration of a stem hint.
    HintDecl(StemId),
    /// A group of stems subject to counter control.
    CounterMask(Vec<StemId>),
    /// A point of a flex sequence that has not been assembled yet.
    FlexCtrl { dx: f64, dy: f64 },
}

impl PathElement {
    pub(crate) fn segment(op: SegmentOp, args: &[f64]) -> Self {
        Self::Segment {
            op,
            args: SmallVec::from_slice(args),
        }
    }
}

/// A glyph's path.
#[derive(Debug, Default, Clone)]
pub(crate) struct Path {
    pub(crate) elements: Vec<PathElement>,
}

impl Path {
    pub(crate) fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut PathElement> {
        self.elements.last_mut()
    }

    pub(crate) fn first(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Replaces the seven flex markers of the path by a single `flex`
    /// segment whose last operand is `depth`.
    pub(crate) fn close_flex(&mut self, depth: f64) -> Result<(), ErrorKind> {
        let start = self
            .elements
            .iter()
            .position(|e| matches!(e, PathElement::FlexCtrl { .. }))
            .ok_or(ErrorKind::Parse)?;

        if self.elements.len() != start + 7 {
            return Err(ErrorKind::Parse);
        }

        let mut points = [(0.0, 0.0); 7];
        for (point, element) in points.iter_mut().zip(&self.elements[start..]) {
            match element {
                PathElement::FlexCtrl { dx, dy } => *point = (*dx, *dy),
                _ => return Err(ErrorKind::Parse),
            }
        }

        // The first marker is the reference point, which is folded into
        // the first control point.
        let mut args = Args::new();
        args.push(points[0].0 + points[1].0);
        args.push(points[0].1 + points[1].1);
        for (dx, dy) in &points[2..] {
            args.push(*dx);
            args.push(*dy);
        }
        args.push(depth);

        self.elements.truncate(start);
        self.elements.push(PathElement::Segment {
            op: SegmentOp::Flex,
            args,
        });

        Ok(())
    }

    /// Computes the bounding box of the path and merges adjacent segments
    /// into longer operand runs where Type 2 allows it.
    ///
    /// `origin` is the side bearing point and `advance` the advance vector.
    pub(crate) fn post_process(
        &mut self,
        origin: (f64, f64),
        advance: (f64, f64),
    ) -> Result<Rect, ErrorKind> {
        let (sbx, sby) = origin;

        if self.elements.is_empty() {
            return Ok(Rect {
                x_min: sbx,
                y_min: sby,
                x_max: sbx,
                y_max: sby,
            });
        }

        let mut bbox = Rect {
            x_min: sbx + advance.0,
            y_min: sby + advance.1,
            x_max: sbx,
            y_max: sby,
        };

        let mut x = 0.0;
        let mut y = 0.0;
        let mut out: Vec<PathElement> = Vec::with_capacity(self.elements.len());

        for mut element in self.elements.drain(..) {
            match &mut element {
                PathElement::Segment { op, args } => {
                    walk_segment(*op, args, &mut x, &mut y, &mut bbox);

                    if *op == SegmentOp::Flex {
                        compact_flex(op, args);
                    }

                    if let Some(PathElement::Segment {
                        op: prev_op,
                        args: prev_args,
                    }) = out.last_mut()
                        && prev_args.len() + args.len() <= CS_STACK_MAX
                        && let Some(merged) = merge(*prev_op, prev_args.len(), *op)
                    {
                        prev_args.extend_from_slice(args);
                        *prev_op = merged;
                        continue;
                    }
                }
                PathElement::HintDecl(_) | PathElement::CounterMask(_) => {}
                PathElement::FlexCtrl { .. } => {
                    log::warn!("unterminated flex sequence in glyph");
                    return Err(ErrorKind::Parse);
                }
            }

            out.push(element);
        }

        self.elements = out;

        if bbox.x_min > bbox.x_max {
            bbox.x_min = bbox.x_max;
        }

        if bbox.y_min > bbox.y_max {
            bbox.y_min = bbox.y_max;
        }

        Ok(bbox)
    }
}

/// Returns the operator a segment `op` may be merged into when it follows
/// a segment `prev` carrying `prev_len` operands.
fn merge(prev: SegmentOp, prev_len: usize, op: SegmentOp) -> Option<SegmentOp> {
    use SegmentOp::*;

    match (prev, op) {
        (RLineTo, RLineTo) => Some(RLineTo),
        (RRCurveTo, RLineTo) => Some(RCurveLine),
        (RRCurveTo, RRCurveTo) => Some(RRCurveTo),
        (RLineTo, RRCurveTo) => Some(RLineCurve),
        // Alternating lines continue as long as the next expected direction
        // matches.
        (VLineTo, HLineTo) if prev_len % 2 == 1 => Some(VLineTo),
        (HLineTo, HLineTo) if prev_len % 2 == 0 => Some(HLineTo),
        (HLineTo, VLineTo) if prev_len % 2 == 1 => Some(HLineTo),
        (VLineTo, VLineTo) if prev_len % 2 == 0 => Some(VLineTo),
        (HVCurveTo, VHCurveTo) if (prev_len / 4) % 2 == 1 => Some(HVCurveTo),
        (VHCurveTo, VHCurveTo) if (prev_len / 4) % 2 == 0 => Some(VHCurveTo),
        (VHCurveTo, HVCurveTo) if (prev_len / 4) % 2 == 1 => Some(VHCurveTo),
        (HVCurveTo, HVCurveTo) if (prev_len / 4) % 2 == 0 => Some(HVCurveTo),
        _ => None,
    }
}

/// Advances the current point over the segment, extending `bbox` by every
/// point the segment visits.
fn walk_segment(op: SegmentOp, args: &[f64], x: &mut f64, y: &mut f64, bbox: &mut Rect) {
    use SegmentOp::*;

    let mut visit = |dx: f64, dy: f64, bbox: &mut Rect| {
        *x += dx;
        *y += dy;
        bbox.extend_by(*x, *y);
    };

    match op {
        RMoveTo | RLineTo | RRCurveTo | RCurveLine | RLineCurve => {
            for pair in args.chunks_exact(2) {
                visit(pair[0], pair[1], bbox);
            }
        }
        HMoveTo => visit(args[0], 0.0, bbox),
        VMoveTo => visit(0.0, args[0], bbox),
        HLineTo | VLineTo => {
            let mut horizontal = op == HLineTo;
            for &d in args {
                if horizontal {
                    visit(d, 0.0, bbox);
                } else {
                    visit(0.0, d, bbox);
                }
                horizontal = !horizontal;
            }
        }
        VHCurveTo | HVCurveTo => {
            let mut horizontal = op == HVCurveTo;
            for c in args.chunks_exact(4) {
                if horizontal {
                    visit(c[0], 0.0, bbox);
                    visit(c[1], c[2], bbox);
                    visit(0.0, c[3], bbox);
                } else {
                    visit(0.0, c[0], bbox);
                    visit(c[1], c[2], bbox);
                    visit(c[3], 0.0, bbox);
                }
                horizontal = !horizontal;
            }
        }
        Flex => {
            for pair in args[..12].chunks_exact(2) {
                visit(pair[0], pair[1], bbox);
            }
        }
        // Only produced by `compact_flex`, after the walk.
        HFlex | HFlex1 => {}
    }
}

/// Rewrites a `flex` segment into `hflex` or `hflex1` when the depth is
/// the standard one and the curve is horizontal.
fn compact_flex(op: &mut SegmentOp, args: &mut Args) {
    let a = args.clone();

    if a[12] != STANDARD_FLEX_DEPTH {
        return;
    }

    if a[1] == 0.0 && a[11] == 0.0 && a[5] == 0.0 && a[7] == 0.0 && a[3] + a[9] == 0.0 {
        // dx1 dx2 dy2 dx3 dx4 dx5 dx6
        *args = Args::from_slice(&[a[0], a[2], a[3], a[4], a[6], a[8], a[10]]);
        *op = SegmentOp::HFlex;
    } else if a[5] == 0.0 && a[7] == 0.0 && a[1] + a[3] + a[9] + a[11] == 0.0 {
        // dx1 dy1 dx2 dy2 dx3 dx4 dx5 dy5 dx6
        *args = Args::from_slice(&[a[0], a[1], a[2], a[3], a[4], a[6], a[8], a[9], a[10]]);
        *op = SegmentOp::HFlex1;
    }
}
