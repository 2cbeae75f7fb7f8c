//! The eexec and charstring encryption of Type 1 fonts.

use log::warn;

/// Key of the encrypted portion of a font program.
pub(crate) const EEXEC_KEY: u16 = 55665;
/// Key of charstrings and subroutines.
pub(crate) const CHARSTRING_KEY: u16 = 4330;

/// Number of random bytes at the start of the eexec portion.
const EEXEC_PREFIX_LEN: usize = 4;

const C1: u32 = 52845;
const C2: u32 = 22719;

pub(crate) fn decrypt_byte(cipher: u8, r: &mut u32) -> u8 {
    let cipher = u32::from(cipher);
    let plain = cipher ^ (*r >> 8);
    *r = ((cipher + *r).wrapping_mul(C1) + C2) & 0xFFFF;
    (plain & 0xFF) as u8
}

/// Decrypts the binary eexec portion of a PFB file.
pub(crate) fn decrypt_binary(data: &[u8]) -> Vec<u8> {
    let mut r = u32::from(EEXEC_KEY);

    data.iter()
        .map(|b| decrypt_byte(*b, &mut r))
        .skip(EEXEC_PREFIX_LEN)
        .collect()
}

/// Decrypts the eexec portion of a PFA file, which may be stored in binary
/// or hexadecimal form.
pub(crate) fn decrypt_eexec(data: &[u8]) -> Option<Vec<u8>> {
    let start = data.iter().position(|b| !is_whitespace(*b))?;
    let data = &data[start..];

    let head = data.get(..EEXEC_PREFIX_LEN)?;

    if !head.iter().all(u8::is_ascii_hexdigit) {
        return Some(decrypt_binary(data));
    }

    let mut r = u32::from(EEXEC_KEY);
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high = None;

    for b in data {
        let nibble = match *b {
            b'0'..=b'9' => b - b'0',
            b'A'..=b'F' => b - b'A' + 10,
            b'a'..=b'f' => b - b'a' + 10,
            b if is_whitespace(b) => continue,
            _ => break,
        };

        match high.take() {
            None => high = Some(nibble),
            Some(h) => out.push(decrypt_byte((h << 4) | nibble, &mut r)),
        }
    }

    if let Some(h) = high {
        out.push(decrypt_byte(h << 4, &mut r));
    }

    Some(out.split_off(EEXEC_PREFIX_LEN.min(out.len())))
}

/// Decrypts a charstring or subroutine, appending the plain bytes to `out`.
///
/// The first `len_iv` plain bytes are dropped. A negative `len_iv` means
/// that the data is not encrypted at all.
pub(crate) fn decrypt_charstring_into(data: &[u8], len_iv: i32, out: &mut Vec<u8>) -> Option<()> {
    let Ok(skip) = usize::try_from(len_iv) else {
        out.extend_from_slice(data);
        return Some(());
    };

    if data.len() < skip {
        warn!("charstring shorter than lenIV");

        return None;
    }

    let mut r = u32::from(CHARSTRING_KEY);
    out.extend(data.iter().map(|b| decrypt_byte(*b, &mut r)).skip(skip));

    Some(())
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | b'\x0C')
}
