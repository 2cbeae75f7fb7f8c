/*!
A converter from Type 1 fonts to Type 1C (bare CFF) fonts.

PDF writers that embed a subset of a Type 1 font can save a lot of space by
embedding it as CFF instead: the charstrings are reencoded in the more compact
Type 2 format and the font dictionaries become binary DICTs. This crate parses
PFA and PFB fonts, interprets their charstrings (including the flex, hint
replacement and counter control mechanisms of the standard `OtherSubrs`) and
writes a CFF font holding just the glyphs that are needed.

```ignore
use type1c::{ConvertSettings, Type1Font};

let font = Type1Font::parse(&data)?;
let mut used = [false; 256];
used[usize::from(b'A')] = true;

let converted = font.convert(&used, None, &ConvertSettings::default())?;
std::fs::write("font.cff", &converted.data)?;
```
*/

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod charstring;
pub mod number;
pub mod type1;

mod argstack;
mod cff;
mod convert;
mod error;
mod settings;
mod stream;

pub use charstring::{CharStringTable, GlyphMetrics, Seac, convert_charstring, get_metrics};
pub use convert::{ConvertedFont, FontDescriptor, FontFlags};
pub use error::{CharStringError, Error, ErrorKind, Result};
pub use settings::{ConvertSettings, ConvertWarning, DefaultWidth, WarningSinkFn};
pub use type1::{Encoding, Type1Font};

/// A rectangle described by the left-lower and upper-right points.
///
/// Doesn't guarantee that `x_min` <= `x_max` and/or `y_min` <= `y_max`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// The horizontal minimum of the rect.
    pub x_min: f64,
    /// The vertical minimum of the rect.
    pub y_min: f64,
    /// The horizontal maximum of the rect.
    pub x_max: f64,
    /// The vertical maximum of the rect.
    pub y_max: f64,
}

impl Rect {
    #[inline]
    pub(crate) fn extend_by(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.y_min = self.y_min.min(y);
        self.x_max = self.x_max.max(x);
        self.y_max = self.y_max.max(y);
    }

    #[inline]
    pub(crate) fn union(&mut self, other: &Self) {
        self.extend_by(other.x_min, other.y_min);
        self.extend_by(other.x_max, other.y_max);
    }

    /// Returns rect's width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Returns rect's height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_union() {
        let mut rect = Rect {
            x_min: 1000.0,
            y_min: 1000.0,
            x_max: -1000.0,
            y_max: -1000.0,
        };
        rect.union(&Rect {
            x_min: 10.0,
            y_min: -20.0,
            x_max: 500.0,
            y_max: 700.0,
        });
        rect.union(&Rect {
            x_min: 50.0,
            y_min: 0.0,
            x_max: 600.0,
            y_max: 650.0,
        });

        assert_eq!(
            rect,
            Rect {
                x_min: 10.0,
                y_min: -20.0,
                x_max: 600.0,
                y_max: 700.0,
            }
        );
        assert_eq!(rect.width(), 590.0);
    }
}
