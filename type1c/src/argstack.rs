use crate::error::ErrorKind;

/// Capacity of the charstring operand stack.
pub(crate) const CS_STACK_MAX: usize = 48;
/// Capacity of the PostScript operand stack. Large enough for the operands
/// of a counter control request covering every stem of a glyph.
pub(crate) const PS_STACK_MAX: usize = 2 * crate::charstring::stem::MAX_STEMS + 2;

/// A bounded operand stack.
pub(crate) struct ArgumentsStack<const N: usize> {
    data: [f64; N],
    len: usize,
}

impl<const N: usize> ArgumentsStack<N> {
    pub(crate) fn new() -> Self {
        Self {
            data: [0.0; N],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn push(&mut self, n: f64) -> Result<(), ErrorKind> {
        if self.len == N {
            Err(ErrorKind::Stack)
        } else {
            self.data[self.len] = n;
            self.len += 1;
            Ok(())
        }
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Result<f64, ErrorKind> {
        if self.is_empty() {
            return Err(ErrorKind::Stack);
        }

        self.len -= 1;
        Ok(self.data[self.len])
    }

    /// Returns the operand at `index`, counted from the bottom of the stack.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> f64 {
        self.data[index]
    }

    /// Returns the topmost `n` operands, bottom first.
    pub(crate) fn top(&self, n: usize) -> Result<&[f64], ErrorKind> {
        if n > self.len {
            return Err(ErrorKind::Stack);
        }

        Ok(&self.data[self.len - n..self.len])
    }

    /// Checks that at least `n` operands are available.
    #[inline]
    pub(crate) fn require(&self, n: usize) -> Result<(), ErrorKind> {
        if self.len < n {
            Err(ErrorKind::Stack)
        } else {
            Ok(())
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn dump(&self) -> String {
        format!("{:?}", &self.data[0..self.len])
    }
}

impl<const N: usize> core::fmt::Debug for ArgumentsStack<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(&self.data[..self.len]).finish()
    }
}
