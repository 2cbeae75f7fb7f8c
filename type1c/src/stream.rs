//! A cursor over font program bytes.

/// Reads bytes and fixed-size integers from a slice, front to back.
///
/// Reads past the end return `None` without moving the cursor.
#[derive(Clone, Default, Debug)]
pub(crate) struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// The number of bytes consumed so far.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    #[inline]
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    pub(crate) fn peek_bytes(&self, len: usize) -> Option<&'a [u8]> {
        self.data.get(self.offset..self.offset.checked_add(len)?)
    }

    /// The bytes that have not been consumed yet.
    pub(crate) fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// A slice of the underlying data, independent of the cursor.
    pub(crate) fn range(&self, start: usize, end: usize) -> Option<&'a [u8]> {
        self.data.get(start..end)
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.offset += 1;
        Some(b)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let bytes = self.peek_bytes(len)?;
        self.offset += len;
        Some(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_bytes(N)?.try_into().ok()
    }

    pub(crate) fn read_u16_be(&mut self) -> Option<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub(crate) fn read_i32_be(&mut self) -> Option<i32> {
        self.read_array().map(i32::from_be_bytes)
    }

    /// Reads the little-endian segment lengths of PFB files.
    pub(crate) fn read_u32_le(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Skips `len` bytes. The cursor may end up past the end of the data.
    pub(crate) fn advance(&mut self, len: usize) {
        self.offset = self.offset.saturating_add(len);
    }

    /// Skips bytes as long as `f` accepts them.
    pub(crate) fn forward_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.peek_byte().is_some_and(&f) {
            self.offset += 1;
        }
    }
}
