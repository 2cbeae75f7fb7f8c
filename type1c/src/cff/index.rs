//! Writing INDEX structures.

use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum OffsetSize {
    Size1 = 1,
    Size2 = 2,
    Size3 = 3,
    Size4 = 4,
}

impl OffsetSize {
    /// Returns the smallest offset size that can address `max_offset`.
    pub(crate) fn for_offset(max_offset: usize) -> Option<Self> {
        match max_offset {
            0..=0xFF => Some(Self::Size1),
            0x100..=0xFFFF => Some(Self::Size2),
            0x1_0000..=0xFF_FFFF => Some(Self::Size3),
            0x100_0000..=0xFFFF_FFFF => Some(Self::Size4),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn to_usize(self) -> usize {
        self as usize
    }

    fn write(self, offset: usize, out: &mut Vec<u8>) {
        let bytes = (offset as u32).to_be_bytes();
        out.extend_from_slice(&bytes[4 - self.to_usize()..]);
    }
}

/// Returns the size of an INDEX with `count` items of `data_len` bytes
/// in total.
pub(crate) fn index_size(count: usize, data_len: usize) -> usize {
    if count == 0 {
        return 2;
    }

    let offset_size = OffsetSize::for_offset(data_len + 1).map_or(4, OffsetSize::to_usize);

    2 + 1 + (count + 1) * offset_size + data_len
}

/// Returns the number of bytes [`write_index`] produces for `items`.
pub(crate) fn items_size<T: AsRef<[u8]>>(items: &[T]) -> usize {
    index_size(items.len(), items.iter().map(|i| i.as_ref().len()).sum())
}

/// Appends an INDEX holding `items` to `out`.
///
/// Offsets are one-based and use the smallest possible size.
pub(crate) fn write_index<T: AsRef<[u8]>>(items: &[T], out: &mut Vec<u8>) -> Result<()> {
    let count = u16::try_from(items.len()).map_err(|_| Error::TooManyGlyphs)?;
    out.extend_from_slice(&count.to_be_bytes());

    if count == 0 {
        return Ok(());
    }

    let data_len: usize = items.iter().map(|i| i.as_ref().len()).sum();
    let offset_size = OffsetSize::for_offset(data_len + 1)
        .ok_or(Error::InvalidFontFile("INDEX data too large"))?;

    out.push(offset_size as u8);

    let mut offset = 1;
    offset_size.write(offset, out);

    for item in items {
        offset += item.as_ref().len();
        offset_size.write(offset, out);
    }

    for item in items {
        out.extend_from_slice(item.as_ref());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_size() {
        assert_eq!(OffsetSize::for_offset(0), Some(OffsetSize::Size1));
        assert_eq!(OffsetSize::for_offset(255), Some(OffsetSize::Size1));
        assert_eq!(OffsetSize::for_offset(256), Some(OffsetSize::Size2));
        assert_eq!(OffsetSize::for_offset(0x1_0000), Some(OffsetSize::Size3));
        assert_eq!(OffsetSize::for_offset(0x100_0000), Some(OffsetSize::Size4));
    }

    #[test]
    fn empty_index() {
        let mut out = vec![];
        write_index::<&[u8]>(&[], &mut out).unwrap();

        assert_eq!(out, vec![0, 0]);
        assert_eq!(items_size::<&[u8]>(&[]), 2);
    }

    #[test]
    fn small_index() {
        let items: [&[u8]; 2] = [b"ab", b"c"];
        let mut out = vec![];
        write_index(&items, &mut out).unwrap();

        assert_eq!(out, vec![0, 2, 1, 1, 3, 4, b'a', b'b', b'c']);
        assert_eq!(items_size(&items), out.len());
    }

    #[test]
    fn two_byte_offsets() {
        let items = [vec![0u8; 300]];
        let mut out = vec![];
        write_index(&items, &mut out).unwrap();

        assert_eq!(&out[..7], &[0, 1, 2, 0, 1, 0x01, 0x2d]);
        assert_eq!(items_size(&items), out.len());
    }
}
