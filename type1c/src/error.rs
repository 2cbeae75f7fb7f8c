//! Error types for the converter.

use core::fmt;

use crate::charstring::operator::Op;

/// A specialized [`Result`] type for font conversion.
pub type Result<T> = core::result::Result<T, Error>;

/// The kind of failure encountered while converting a single charstring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unsupported bytecode.
    Parse,
    /// An operand stack overflowed or underflowed, or an operator received
    /// a different number of operands than it requires.
    Stack,
    /// The encoded charstring exceeded the output capacity.
    Buffer,
    /// An operator or operand cannot be represented in a Type 2 charstring.
    OpNotSupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => f.write_str("parse error"),
            Self::Stack => f.write_str("stack error"),
            Self::Buffer => f.write_str("buffer error"),
            Self::OpNotSupported => f.write_str("operator not supported"),
        }
    }
}

/// An error encountered while interpreting or encoding one charstring.
///
/// Besides the kind of the failure, it records the operator that was being
/// executed (if any) and the depth of both operand stacks at that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharStringError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The operator that was executing.
    pub op: Option<Op>,
    /// Depth of the charstring operand stack.
    pub cs_depth: usize,
    /// Depth of the PostScript operand stack.
    pub ps_depth: usize,
}

impl CharStringError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            op: None,
            cs_depth: 0,
            ps_depth: 0,
        }
    }
}

impl From<ErrorKind> for CharStringError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for CharStringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(op) = self.op {
            write!(f, " at {op}")?;
        }

        write!(
            f,
            " (cs stack: {}, ps stack: {})",
            self.cs_depth, self.ps_depth
        )
    }
}

impl core::error::Error for CharStringError {}

/// An error encountered while converting a whole font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The font file is not a valid PFB or PFA file, or one of its
    /// dictionaries could not be read.
    InvalidFontFile(&'static str),
    /// The font declares a `FontType` other than 1.
    UnsupportedFontType,
    /// The font uses an encoding that cannot be resolved, like `ExpertEncoding`.
    UnsupportedEncoding,
    /// The font has no `.notdef` glyph.
    MissingNotdef,
    /// A glyph uses `seac` but the font has no `FontBBox`.
    MissingFontBBox,
    /// The font needs more glyphs or strings than a CFF font can address.
    TooManyGlyphs,
    /// Converting a glyph failed.
    Glyph {
        /// The name of the glyph.
        name: String,
        /// The underlying charstring error.
        source: CharStringError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFontFile(reason) => write!(f, "invalid font file: {reason}"),
            Self::UnsupportedFontType => f.write_str("unsupported font type"),
            Self::UnsupportedEncoding => f.write_str("unsupported encoding"),
            Self::MissingNotdef => f.write_str("font has no .notdef glyph"),
            Self::MissingFontBBox => f.write_str("font has no FontBBox"),
            Self::TooManyGlyphs => f.write_str("too many glyphs"),
            Self::Glyph { name, source } => {
                write!(f, "failed to convert glyph /{name}: {source}")
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Glyph { source, .. } => Some(source),
            _ => None,
        }
    }
}
