use std::iter::FusedIterator;

use crate::GapBuffer;

/// Iterates over the elements of a [`GapBuffer`] by logical index, never
/// seeing the gap.
pub struct Iter<'a, T> {
    buf: &'a GapBuffer<T>,
    index: usize,
}

impl<'a, T> Iter<'a, T> {
    #[inline]
    pub(crate) fn new(buf: &'a GapBuffer<T>) -> Self {
        Self { buf, index: 0 }
    }
}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            buf: self.buf,
            index: self.index,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buf.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the elements of a [`GapBuffer`].
///
/// Elements that aren't consumed are dropped along with the iterator.
pub struct IntoIter<T> {
    buf: GapBuffer<T>,
}

impl<T> IntoIter<T> {
    #[inline]
    pub(crate) fn new(mut buf: GapBuffer<T>) -> Self {
        // Everything after the cursor, so `remove` walks forwards.
        buf.set_position(0);
        Self { buf }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.buf.remove()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.buf.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
