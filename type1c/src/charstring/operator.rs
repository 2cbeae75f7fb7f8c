//! Charstring operator codes.

use core::fmt;

/// One-byte Type 1 operators.
pub(crate) mod sb_operator {
    pub(crate) const HORIZONTAL_STEM: u8 = 1;
    pub(crate) const VERTICAL_STEM: u8 = 3;
    pub(crate) const VERTICAL_MOVE_TO: u8 = 4;
    pub(crate) const LINE_TO: u8 = 5;
    pub(crate) const HORIZONTAL_LINE_TO: u8 = 6;
    pub(crate) const VERTICAL_LINE_TO: u8 = 7;
    pub(crate) const CURVE_TO: u8 = 8;
    pub(crate) const CLOSE_PATH: u8 = 9;
    pub(crate) const CALL_SUBR: u8 = 10;
    pub(crate) const RETURN: u8 = 11;
    pub(crate) const ESCAPE: u8 = 12;
    pub(crate) const HSBW: u8 = 13;
    pub(crate) const ENDCHAR: u8 = 14;
    pub(crate) const MOVE_TO: u8 = 21;
    pub(crate) const HORIZONTAL_MOVE_TO: u8 = 22;
    pub(crate) const SHORT_INT: u8 = 28;
    pub(crate) const VH_CURVE_TO: u8 = 30;
    pub(crate) const HV_CURVE_TO: u8 = 31;
    pub(crate) const LONG_INT: u8 = 255;
}

/// Two-byte (escaped) Type 1 operators.
pub(crate) mod tb_operator {
    pub(crate) const DOTSECTION: u8 = 0;
    pub(crate) const VSTEM3: u8 = 1;
    pub(crate) const HSTEM3: u8 = 2;
    pub(crate) const SEAC: u8 = 6;
    pub(crate) const SBW: u8 = 7;
    pub(crate) const DIV: u8 = 12;
    pub(crate) const CALL_OTHER_SUBR: u8 = 16;
    pub(crate) const POP: u8 = 17;
    pub(crate) const SET_CURRENT_POINT: u8 = 33;
}

/// Type 2 operators, as emitted by the encoder.
pub(crate) mod t2_operator {
    pub(crate) const HSTEM: u8 = 1;
    pub(crate) const VSTEM: u8 = 3;
    pub(crate) const VMOVETO: u8 = 4;
    pub(crate) const RLINETO: u8 = 5;
    pub(crate) const HLINETO: u8 = 6;
    pub(crate) const VLINETO: u8 = 7;
    pub(crate) const RRCURVETO: u8 = 8;
    pub(crate) const ESCAPE: u8 = 12;
    pub(crate) const ENDCHAR: u8 = 14;
    pub(crate) const HSTEMHM: u8 = 18;
    pub(crate) const HINTMASK: u8 = 19;
    pub(crate) const CNTRMASK: u8 = 20;
    pub(crate) const RMOVETO: u8 = 21;
    pub(crate) const HMOVETO: u8 = 22;
    pub(crate) const VSTEMHM: u8 = 23;
    pub(crate) const RCURVELINE: u8 = 24;
    pub(crate) const RLINECURVE: u8 = 25;
    pub(crate) const SHORTINT: u8 = 28;
    pub(crate) const VHCURVETO: u8 = 30;
    pub(crate) const HVCURVETO: u8 = 31;
    pub(crate) const FIXED: u8 = 255;

    // Escaped.
    pub(crate) const HFLEX: u8 = 34;
    pub(crate) const FLEX: u8 = 35;
    pub(crate) const HFLEX1: u8 = 36;
}

/// A Type 1 charstring operator, as reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// A one-byte operator.
    OneByte(u8),
    /// A two-byte operator, identified by the byte following the escape.
    Escape(u8),
}

impl Op {
    /// The name of the operator, if it is a known Type 1 operator.
    pub fn name(self) -> Option<&'static str> {
        use sb_operator as sb;
        use tb_operator as tb;

        let name = match self {
            Self::OneByte(op) => match op {
                sb::HORIZONTAL_STEM => "hstem",
                sb::VERTICAL_STEM => "vstem",
                sb::VERTICAL_MOVE_TO => "vmoveto",
                sb::LINE_TO => "rlineto",
                sb::HORIZONTAL_LINE_TO => "hlineto",
                sb::VERTICAL_LINE_TO => "vlineto",
                sb::CURVE_TO => "rrcurveto",
                sb::CLOSE_PATH => "closepath",
                sb::CALL_SUBR => "callsubr",
                sb::RETURN => "return",
                sb::HSBW => "hsbw",
                sb::ENDCHAR => "endchar",
                sb::MOVE_TO => "rmoveto",
                sb::HORIZONTAL_MOVE_TO => "hmoveto",
                sb::VH_CURVE_TO => "vhcurveto",
                sb::HV_CURVE_TO => "hvcurveto",
                _ => return None,
            },
            Self::Escape(op) => match op {
                tb::DOTSECTION => "dotsection",
                tb::VSTEM3 => "vstem3",
                tb::HSTEM3 => "hstem3",
                tb::SEAC => "seac",
                tb::SBW => "sbw",
                tb::DIV => "div",
                tb::CALL_OTHER_SUBR => "callothersubr",
                tb::POP => "pop",
                tb::SET_CURRENT_POINT => "setcurrentpoint",
                _ => return None,
            },
        };

        Some(name)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, Self::OneByte(op)) => write!(f, "operator {op}"),
            (None, Self::Escape(op)) => write!(f, "operator 12 {op}"),
        }
    }
}
