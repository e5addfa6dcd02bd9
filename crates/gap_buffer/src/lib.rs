mod iter;
mod raw;
mod text;

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::{ptr, slice};

pub use self::iter::{IntoIter, Iter};
use self::raw::RawVec;

const MIN_CAPACITY: usize = 4;

/// A growable sequence with a movable cursor, backed by a single allocation
/// with a gap of uninitialized slots at the cursor.
///
/// Inserting and removing at the cursor is amortized O(1). Moving the cursor
/// costs O(distance moved).
///
/// ```
/// use gap_buffer::GapBuffer;
///
/// let mut buf = GapBuffer::new();
/// buf.insert_iter("Lord of the Rings".chars());
/// buf.set_position(12);
/// buf.insert_iter("Onion ".chars());
///
/// assert_eq!(buf.iter().collect::<String>(), "Lord of the Onion Rings");
/// ```
pub struct GapBuffer<T> {
    storage: RawVec<T>,

    // Slots in `gap_start..gap_end` are uninitialized, everything else is live.
    gap_start: usize,
    gap_end: usize,
}

impl<T> GapBuffer<T> {
    /// Create a new, empty gap buffer (without allocating).
    ///
    /// # Panics
    /// Panics if `T` is zero-sized.
    #[inline]
    pub const fn new() -> Self {
        Self {
            storage: RawVec::new(),
            gap_start: 0,
            gap_end: 0,
        }
    }

    /// Create a new gap buffer with room for `capacity` elements, all of it gap.
    ///
    /// # Panics
    /// Panics if the capacity in bytes overflows `isize::MAX` or if `T` is
    /// zero-sized.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RawVec::with_capacity(capacity),
            gap_start: 0,
            gap_end: capacity,
        }
    }

    /// The total number of slots, including the gap.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The number of elements (not including the gap).
    #[inline]
    pub fn len(&self) -> usize {
        self.capacity() - self.gap_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of free slots at the cursor.
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// The cursor: the logical index the next insertion will land at.
    #[inline]
    pub fn position(&self) -> usize {
        self.gap_start
    }

    /// Get a reference to the element at `index`.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        let p = self.index_to_ptr(index)?;

        // Safety: `index_to_ptr` only returns pointers to live slots.
        Some(unsafe { &*p })
    }

    /// Get a mutable reference to the element at `index`.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let p = self.index_to_ptr(index)?;

        // Safety: as above, and we hold `&mut self`.
        Some(unsafe { &mut *p })
    }

    /// Insert an element at the cursor, leaving the cursor after it.
    ///
    /// # Panics
    /// Panics if the new capacity overflows `isize::MAX` bytes.
    #[inline]
    pub fn insert(&mut self, value: T) {
        if self.gap_start == self.gap_end {
            self.enlarge_gap();
        }

        unsafe { ptr::write(self.slot_ptr(self.gap_start), value) };

        self.gap_start += 1;
    }

    /// Insert every element of `iter` at the cursor, in order.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }

    /// Remove the element after the cursor.
    #[inline]
    pub fn remove(&mut self) -> Option<T> {
        if self.gap_end == self.capacity() {
            return None;
        }

        let value = unsafe { ptr::read(self.slot_ptr(self.gap_end)) };
        self.gap_end += 1;

        Some(value)
    }

    /// Remove the element before the cursor, moving the cursor back by one.
    #[inline]
    pub fn remove_before(&mut self) -> Option<T> {
        if self.gap_start == 0 {
            return None;
        }

        self.gap_start -= 1;

        Some(unsafe { ptr::read(self.slot_ptr(self.gap_start)) })
    }

    /// Move the cursor to `pos`.
    ///
    /// This may be an expensive operation if the position is moved far.
    ///
    /// # Panics
    /// Panics if `pos > len()`.
    pub fn set_position(&mut self, pos: usize) {
        assert!(pos <= self.len(), "position out of bounds");

        // With no capacity `pos` must equal `gap_start`, so nothing below
        // touches the dangling pointer.
        match pos.cmp(&self.gap_start) {
            Ordering::Less => {
                let distance = self.gap_start - pos;
                let src = self.slot_ptr(pos);
                let dest = self.slot_ptr(self.gap_end - distance);

                unsafe { ptr::copy(src, dest, distance) };

                self.gap_start = pos;
                self.gap_end -= distance;
            }

            Ordering::Equal => {}

            Ordering::Greater => {
                let distance = pos - self.gap_start;
                let src = self.slot_ptr(self.gap_end);
                let dest = self.slot_ptr(self.gap_start);

                unsafe { ptr::copy(src, dest, distance) };

                self.gap_start = pos;
                self.gap_end += distance;
            }
        }
    }

    /// Drop every element, keeping the allocation. The cursor returns to 0.
    pub fn clear(&mut self) {
        let (front, back) = self.raw_slices();

        // Reset first, so a panicking destructor leaks instead of leaving
        // dropped values in live slots.
        self.gap_start = 0;
        self.gap_end = self.capacity();

        unsafe { drop_both(front, back) };
    }

    /// The elements before the cursor.
    #[inline]
    pub fn front(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.gap_start) }
    }

    /// The elements after the cursor.
    #[inline]
    pub fn back(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.slot_ptr(self.gap_end), self.back_len()) }
    }

    /// The elements before the cursor, mutably.
    #[inline]
    pub fn front_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.gap_start) }
    }

    /// The elements after the cursor, mutably.
    #[inline]
    pub fn back_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.slot_ptr(self.gap_end), self.back_len()) }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Grow the allocation so the gap has room again.
    ///
    /// The front keeps its offsets, the back is moved to the end of the new
    /// allocation. The old allocation is freed without dropping anything, as
    /// all of its values have been moved out.
    fn enlarge_gap(&mut self) {
        // Can't overflow as capacity in bytes is at most `isize::MAX`.
        let new_cap = (self.capacity() * 2).max(MIN_CAPACITY);
        let back_len = self.back_len();

        log::trace!(
            "growing gap buffer from {} to {} slots",
            self.capacity(),
            new_cap
        );

        let new_storage = RawVec::with_capacity(new_cap);
        let new_gap_end = new_cap - back_len;

        // Safety: the allocations are distinct and both regions are in bounds.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), new_storage.as_ptr(), self.gap_start);
            ptr::copy_nonoverlapping(
                self.slot_ptr(self.gap_end),
                new_storage.as_ptr().add(new_gap_end),
                back_len,
            );
        }

        self.storage = new_storage;
        self.gap_end = new_gap_end;
    }

    #[inline]
    fn back_len(&self) -> usize {
        self.capacity() - self.gap_end
    }

    /// Pointer to physical slot `index`, which must be `<= capacity`.
    #[inline]
    fn slot_ptr(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity());

        // Safety: resulting pointer is within (or one past) the allocation.
        unsafe { self.storage.as_ptr().add(index) }
    }

    #[inline]
    fn index_to_ptr(&self, index: usize) -> Option<*mut T> {
        if index >= self.len() {
            return None;
        }

        let index = if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        };

        Some(self.slot_ptr(index))
    }

    #[inline]
    fn raw_slices(&mut self) -> (*mut [T], *mut [T]) {
        let front = ptr::slice_from_raw_parts_mut(self.storage.as_ptr(), self.gap_start);
        let back = ptr::slice_from_raw_parts_mut(self.slot_ptr(self.gap_end), self.back_len());
        (front, back)
    }
}

/// Drop both slices in place. If a destructor in `front` panics, `back` is
/// still dropped before the panic continues.
unsafe fn drop_both<T>(front: *mut [T], back: *mut [T]) {
    struct Dropper<T>(*mut [T]);

    impl<T> Drop for Dropper<T> {
        fn drop(&mut self) {
            unsafe { ptr::drop_in_place(self.0) }
        }
    }

    let _back = Dropper(back);
    ptr::drop_in_place(front);
}

impl<T> Drop for GapBuffer<T> {
    fn drop(&mut self) {
        let (front, back) = self.raw_slices();

        // The gap is never touched. `storage` frees the memory afterwards.
        unsafe { drop_both(front, back) };
    }
}

impl<T> Default for GapBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GapBuffer<T> {
    fn clone(&self) -> Self {
        let mut buf = Self::with_capacity(self.len());
        buf.insert_iter(self.iter().cloned());
        buf.set_position(self.position());
        buf
    }
}

impl<T: fmt::Debug> fmt::Debug for GapBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GapBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for GapBuffer<T> {}

impl<T> Index<usize> for GapBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of bounds")
    }
}

impl<T> IndexMut<usize> for GapBuffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index).expect("index out of bounds")
    }
}

impl<T> Extend<T> for GapBuffer<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<T> FromIterator<T> for GapBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.insert_iter(iter);
        buf
    }
}

impl<T> From<Vec<T>> for GapBuffer<T> {
    fn from(v: Vec<T>) -> Self {
        let mut buf = Self::with_capacity(v.len());
        buf.insert_iter(v);
        buf
    }
}

impl<T: Clone> From<&[T]> for GapBuffer<T> {
    fn from(slice: &[T]) -> Self {
        let mut buf = Self::with_capacity(slice.len());
        buf.insert_iter(slice.iter().cloned());
        buf
    }
}

impl<'a, T> IntoIterator for &'a GapBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for GapBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
