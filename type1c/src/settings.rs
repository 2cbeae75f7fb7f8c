use std::sync::Arc;

use crate::error::CharStringError;

/// A callback function for resolving warnings during conversion.
pub type WarningSinkFn = Arc<dyn Fn(ConvertWarning) + Send + Sync>;

/// How the default width of the Private DICT is chosen.
///
/// Glyphs whose advance equals the default width don't need to encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultWidth {
    /// The width of the `space` glyph, or 500 if the font has none.
    #[default]
    SpaceGlyph,
    /// The most common width among the embedded glyphs.
    MostCommon,
}

#[derive(Clone)]
/// Settings that should be applied during the conversion process.
pub struct ConvertSettings {
    /// The converter emits a warning whenever a glyph can't be embedded
    /// as requested. Providing a callback allows you to catch those
    /// warnings and handle them, if desired. They are logged in any case.
    pub warning_sink: WarningSinkFn,

    /// How to choose the default width.
    pub default_width: DefaultWidth,

    /// By default, a glyph that fails to convert aborts the conversion of
    /// the whole font. If set, the glyph is replaced by an empty one and
    /// [`ConvertWarning::InvalidGlyph`] is emitted instead.
    pub skip_invalid_glyphs: bool,

    /// The name written to the font, for example one with a subset tag.
    /// Defaults to the `FontName` of the font.
    pub font_name: Option<String>,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            warning_sink: Arc::new(|_| {}),
            default_width: DefaultWidth::default(),
            skip_invalid_glyphs: false,
            font_name: None,
        }
    }
}

impl core::fmt::Debug for ConvertSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConvertSettings")
            .field("default_width", &self.default_width)
            .field("skip_invalid_glyphs", &self.skip_invalid_glyphs)
            .field("font_name", &self.font_name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Warnings that can occur while converting a font.
pub enum ConvertWarning {
    /// A used code maps to a glyph the font doesn't have. The code is
    /// dropped.
    MissingGlyph {
        /// The code.
        code: u8,
        /// The name of the glyph.
        name: String,
    },
    /// A component of an accented glyph is missing from the font.
    MissingComponent(String),
    /// An accented glyph was written with the `seac`-like form of `endchar`,
    /// which not every consumer supports.
    Seac(String),
    /// A glyph failed to convert and was replaced by an empty glyph.
    InvalidGlyph {
        /// The name of the glyph.
        name: String,
        /// What went wrong.
        error: CharStringError,
    },
}
