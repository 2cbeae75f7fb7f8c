//! Encoding and decoding of charstring numbers.
//!
//! Type 1 and Type 2 charstrings share the one-, two- and three-byte integer
//! forms. They differ in the five-byte form introduced by `255`: Type 1
//! charstrings store a 32-bit integer, Type 2 charstrings a 16.16 fixed
//! point value.

use crate::charstring::operator::t2_operator;
use crate::error::ErrorKind;
use crate::stream::Stream;

/// Differences smaller than this are treated as integers by the encoder.
const FIXED_TOLERANCE: f64 = 3.0e-5;

/// Decodes the charstring integer at the start of `data`.
///
/// Returns the value together with the number of bytes it occupied. The
/// five-byte form is interpreted the Type 1 way, as a 32-bit integer.
pub fn decode_integer(data: &[u8]) -> Result<(f64, usize), ErrorKind> {
    let mut s = Stream::new(data);
    let b0 = s.read_byte().ok_or(ErrorKind::Parse)?;

    let value = if b0 == t2_operator::FIXED {
        read_longint(&mut s)?
    } else {
        read_integer(b0, &mut s)?
    };

    Ok((value, s.offset()))
}

/// Reads the remaining bytes of an integer whose first byte is `b0`.
pub(crate) fn read_integer(b0: u8, s: &mut Stream<'_>) -> Result<f64, ErrorKind> {
    let value = match b0 {
        t2_operator::SHORTINT => {
            let v = s.read_u16_be().ok_or(ErrorKind::Parse)?;
            i32::from(v as i16)
        }
        32..=246 => i32::from(b0) - 139,
        247..=250 => {
            let b1 = s.read_byte().ok_or(ErrorKind::Parse)?;
            (i32::from(b0) - 247) * 256 + i32::from(b1) + 108
        }
        251..=254 => {
            let b1 = s.read_byte().ok_or(ErrorKind::Parse)?;
            -(i32::from(b0) - 251) * 256 - i32::from(b1) - 108
        }
        _ => return Err(ErrorKind::Parse),
    };

    Ok(f64::from(value))
}

/// Reads the four bytes of a Type 1 `longint` following the `255` prefix.
pub(crate) fn read_longint(s: &mut Stream<'_>) -> Result<f64, ErrorKind> {
    s.read_i32_be().map(f64::from).ok_or(ErrorKind::Parse)
}

/// Appends each value in its smallest Type 2 representation.
///
/// Values that are integral within a tolerance of 3e-5 use the integer
/// forms, everything else the 16.16 fixed form. Values that cannot be
/// represented as a single operand are rejected.
pub fn encode_numbers(values: &[f64], out: &mut Vec<u8>) -> Result<(), ErrorKind> {
    for &value in values {
        encode_number(value, out)?;
    }

    Ok(())
}

fn encode_number(value: f64, out: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if !value.is_finite() || value >= 32768.0 || value <= -32769.0 {
        return Err(ErrorKind::OpNotSupported);
    }

    let rounded = (value + 0.5).floor();

    if (value - rounded).abs() > FIXED_TOLERANCE {
        let int = value.floor();
        let int = i16::try_from(int as i32).map_err(|_| ErrorKind::OpNotSupported)?;
        let fraction = ((value - value.floor()) * 65536.0) as u16;

        out.push(t2_operator::FIXED);
        out.extend_from_slice(&int.to_be_bytes());
        out.extend_from_slice(&fraction.to_be_bytes());

        return Ok(());
    }

    let v = rounded as i32;

    match v {
        -107..=107 => out.push((v + 139) as u8),
        108..=1131 => {
            let v = (0xf700 + v - 108) as u16;
            out.extend_from_slice(&v.to_be_bytes());
        }
        -1131..=-108 => {
            let v = (0xfb00 - v - 108) as u16;
            out.extend_from_slice(&v.to_be_bytes());
        }
        -32768..=32767 => {
            out.push(t2_operator::SHORTINT);
            out.extend_from_slice(&(v as i16).to_be_bytes());
        }
        _ => return Err(ErrorKind::OpNotSupported),
    }

    Ok(())
}
