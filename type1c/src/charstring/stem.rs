use core::cmp::Ordering;

use crate::error::ErrorKind;

/// Maximum number of stem hints per glyph.
pub(crate) const MAX_STEMS: usize = 96;

/// The identity of a stem, assigned in order of first declaration.
pub(crate) type StemId = u8;

/// The direction of a stem hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum StemDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Stem {
    pub(crate) id: StemId,
    pub(crate) dir: StemDirection,
    /// Absolute position of the left or bottom edge.
    pub(crate) pos: f64,
    pub(crate) width: f64,
}

impl Stem {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.dir
            .cmp(&other.dir)
            .then_with(|| self.pos.total_cmp(&other.pos))
            .then_with(|| self.width.total_cmp(&other.width))
    }
}

/// The stem hints of one glyph.
#[derive(Debug, Default, Clone)]
pub(crate) struct Stems {
    stems: Vec<Stem>,
}

impl Stems {
    /// Registers a stem and returns its id. Declaring the same stem twice
    /// yields the same id.
    pub(crate) fn add(
        &mut self,
        pos: f64,
        width: f64,
        dir: StemDirection,
    ) -> Result<StemId, ErrorKind> {
        if let Some(stem) = self
            .stems
            .iter()
            .find(|s| s.dir == dir && s.pos == pos && s.width == width)
        {
            return Ok(stem.id);
        }

        if self.stems.len() == MAX_STEMS {
            log::warn!("too many hints in glyph");
            return Err(ErrorKind::Parse);
        }

        let id = self.stems.len() as StemId;
        self.stems.push(Stem {
            id,
            dir,
            pos,
            width,
        });

        Ok(id)
    }

    /// Sorts the stems horizontal first, then by position and width.
    pub(crate) fn sort(&mut self) {
        self.stems.sort_by(Stem::cmp_key);
    }

    /// Returns the position of the stem with the given id.
    pub(crate) fn index_of(&self, id: StemId) -> Option<usize> {
        self.stems.iter().position(|s| s.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.stems.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Stem> + '_ {
        self.stems.iter()
    }

    /// Builds a hint or counter mask with one bit per stem, most significant
    /// bit first, in sorted order.
    pub(crate) fn mask(&self, ids: impl IntoIterator<Item = StemId>) -> Vec<u8> {
        let mut mask = vec![0; self.len().div_ceil(8)];

        for id in ids {
            if let Some(idx) = self.index_of(id) {
                mask[idx / 8] |= 1 << (7 - (idx % 8));
            }
        }

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StemDirection::*;

    #[test]
    fn dedupes_by_value() {
        let mut stems = Stems::default();
        assert_eq!(stems.add(10.0, 20.0, Horizontal).unwrap(), 0);
        assert_eq!(stems.add(10.0, 20.0, Vertical).unwrap(), 1);
        assert_eq!(stems.add(10.0, 20.0, Horizontal).unwrap(), 0);
        assert_eq!(stems.len(), 2);
    }

    #[test]
    fn limit() {
        let mut stems = Stems::default();

        for i in 0..MAX_STEMS {
            stems.add(i as f64, 10.0, Horizontal).unwrap();
        }

        assert_eq!(stems.add(-1.0, 10.0, Horizontal), Err(ErrorKind::Parse));
        // Existing stems can still be referenced.
        assert_eq!(stems.add(5.0, 10.0, Horizontal).unwrap(), 5);
    }

    #[test]
    fn sort_order() {
        let mut stems = Stems::default();
        stems.add(50.0, 10.0, Vertical).unwrap();
        stems.add(30.0, 20.0, Horizontal).unwrap();
        stems.add(30.0, 10.0, Horizontal).unwrap();
        stems.add(-5.0, 10.0, Vertical).unwrap();
        stems.sort();

        let order: Vec<_> = stems.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut stems = Stems::default();

        for i in 0..MAX_STEMS {
            let dir = if i % 3 == 0 { Vertical } else { Horizontal };
            let pos = ((i * 37) % 23) as f64;
            let width = ((i * 11) % 7) as f64;
            stems.add(pos, width, dir).unwrap();
        }

        stems.sort();
        let once: Vec<_> = stems.iter().map(|s| s.id).collect();
        stems.sort();
        let twice: Vec<_> = stems.iter().map(|s| s.id).collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn mask_bits_follow_sorted_order() {
        let mut stems = Stems::default();
        let a = stems.add(100.0, 10.0, Horizontal).unwrap();
        let b = stems.add(0.0, 10.0, Horizontal).unwrap();
        stems.sort();

        assert_eq!(stems.mask([a]), vec![0b0100_0000]);
        assert_eq!(stems.mask([b]), vec![0b1000_0000]);
    }
}
