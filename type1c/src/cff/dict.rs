//! Writing DICT data.

/// Top DICT operators. Two-byte operators are stored as `1200 + x`.
pub(crate) mod top_dict_operator {
    pub(crate) const VERSION: u16 = 0;
    pub(crate) const NOTICE: u16 = 1;
    pub(crate) const FULL_NAME: u16 = 2;
    pub(crate) const FAMILY_NAME: u16 = 3;
    pub(crate) const WEIGHT: u16 = 4;
    pub(crate) const FONT_BBOX: u16 = 5;
    pub(crate) const UNIQUE_ID: u16 = 13;
    pub(crate) const CHARSET_OFFSET: u16 = 15;
    pub(crate) const ENCODING_OFFSET: u16 = 16;
    pub(crate) const CHAR_STRINGS_OFFSET: u16 = 17;
    pub(crate) const PRIVATE_DICT_SIZE_AND_OFFSET: u16 = 18;
    pub(crate) const COPYRIGHT: u16 = 1200;
    pub(crate) const IS_FIXED_PITCH: u16 = 1201;
    pub(crate) const ITALIC_ANGLE: u16 = 1202;
    pub(crate) const UNDERLINE_POSITION: u16 = 1203;
    pub(crate) const UNDERLINE_THICKNESS: u16 = 1204;
    pub(crate) const PAINT_TYPE: u16 = 1205;
    pub(crate) const FONT_MATRIX: u16 = 1207;
    pub(crate) const STROKE_WIDTH: u16 = 1208;
}

/// Private DICT operators.
pub(crate) mod private_dict_operator {
    pub(crate) const BLUE_VALUES: u16 = 6;
    pub(crate) const OTHER_BLUES: u16 = 7;
    pub(crate) const FAMILY_BLUES: u16 = 8;
    pub(crate) const FAMILY_OTHER_BLUES: u16 = 9;
    pub(crate) const STD_HW: u16 = 10;
    pub(crate) const STD_VW: u16 = 11;
    pub(crate) const DEFAULT_WIDTH_X: u16 = 20;
    pub(crate) const NOMINAL_WIDTH_X: u16 = 21;
    pub(crate) const BLUE_SCALE: u16 = 1209;
    pub(crate) const BLUE_SHIFT: u16 = 1210;
    pub(crate) const BLUE_FUZZ: u16 = 1211;
    pub(crate) const STEM_SNAP_H: u16 = 1212;
    pub(crate) const STEM_SNAP_V: u16 = 1213;
    pub(crate) const FORCE_BOLD: u16 = 1214;
    pub(crate) const LANGUAGE_GROUP: u16 = 1217;
    pub(crate) const EXPANSION_FACTOR: u16 = 1218;
}

const TWO_BYTE_OPERATOR_MARK: u8 = 12;
const LONG_INT: u8 = 29;
const REAL: u8 = 30;

const END_OF_FLOAT_FLAG: u8 = 0xf;

/// Size of an operand written with [`DictWriter::push_offset`].
pub(crate) const OFFSET_OPERAND_SIZE: usize = 5;

/// Serializes DICT entries.
#[derive(Debug, Default, Clone)]
pub(crate) struct DictWriter {
    data: Vec<u8>,
}

impl DictWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.data
    }

    /// Writes an entry with a single number operand.
    pub(crate) fn number(&mut self, op: u16, value: f64) {
        self.push_number(value);
        self.push_op(op);
    }

    /// Writes an entry with a list of number operands.
    pub(crate) fn numbers(&mut self, op: u16, values: &[f64]) {
        for value in values {
            self.push_number(*value);
        }
        self.push_op(op);
    }

    /// Writes an array as the differences between consecutive elements.
    pub(crate) fn delta(&mut self, op: u16, values: &[f64]) {
        let mut prev = 0.0;

        for value in values {
            self.push_number(*value - prev);
            prev = *value;
        }
        self.push_op(op);
    }

    /// Writes an entry whose operands are offsets. Offsets always use the
    /// five-byte form, so the size of the entry is known in advance.
    pub(crate) fn offsets(&mut self, op: u16, values: &[usize]) {
        for value in values {
            self.push_offset(*value);
        }
        self.push_op(op);
    }

    fn push_op(&mut self, op: u16) {
        if op >= 1200 {
            self.data.push(TWO_BYTE_OPERATOR_MARK);
            self.data.push((op - 1200) as u8);
        } else {
            self.data.push(op as u8);
        }
    }

    fn push_offset(&mut self, value: usize) {
        self.data.push(LONG_INT);
        self.data
            .extend_from_slice(&(value.min(i32::MAX as usize) as i32).to_be_bytes());
    }

    fn push_number(&mut self, value: f64) {
        if value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
            self.push_integer(value as i32);
        } else {
            self.push_real(value);
        }
    }

    fn push_integer(&mut self, value: i32) {
        match value {
            -107..=107 => self.data.push((value + 139) as u8),
            108..=1131 => {
                let value = value - 108;
                self.data.push(((value >> 8) + 247) as u8);
                self.data.push(value as u8);
            }
            -1131..=-108 => {
                let value = -value - 108;
                self.data.push(((value >> 8) + 251) as u8);
                self.data.push(value as u8);
            }
            -32768..=32767 => {
                self.data.push(28);
                self.data.extend_from_slice(&(value as i16).to_be_bytes());
            }
            _ => {
                self.data.push(LONG_INT);
                self.data.extend_from_slice(&value.to_be_bytes());
            }
        }
    }

    /// Writes a real number as packed BCD nibbles.
    fn push_real(&mut self, value: f64) {
        let mut text = format!("{value}");

        // The leading zero is implied.
        if let Some(rest) = text.strip_prefix("0.") {
            text = format!(".{rest}");
        } else if let Some(rest) = text.strip_prefix("-0.") {
            text = format!("-.{rest}");
        }

        let mut nibbles: Vec<u8> = text
            .bytes()
            .filter_map(|b| match b {
                b'0'..=b'9' => Some(b - b'0'),
                b'.' => Some(0xa),
                b'-' => Some(0xe),
                _ => None,
            })
            .collect();
        nibbles.push(END_OF_FLOAT_FLAG);

        if nibbles.len() % 2 == 1 {
            nibbles.push(END_OF_FLOAT_FLAG);
        }

        self.data.push(REAL);
        self.data
            .extend(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]));
    }
}
