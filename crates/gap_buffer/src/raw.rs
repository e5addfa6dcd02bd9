use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An owned, uninitialized allocation of `cap` slots of `T`.
///
/// It has no idea which slots hold live values, so dropping it only frees the
/// memory. The owner is responsible for dropping any values first.
pub struct RawVec<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawVec<T> {
    /// # Panics
    /// Panics if `T` is zero-sized.
    #[inline]
    pub const fn new() -> Self {
        check_not_zero_sized::<T>();

        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// # Panics
    /// Panics if the required capacity in bytes > `isize::MAX` or if `T` is
    /// zero-sized.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        if capacity == 0 {
            return buf;
        }

        let layout = Layout::array::<T>(capacity).expect("capacity too large");

        // Safety: layout has a non-zero size as `T` isn't zero-sized.
        let ptr = unsafe { alloc::alloc(layout) };

        buf.ptr = NonNull::new(ptr)
            .unwrap_or_else(|| alloc::handle_alloc_error(layout))
            .cast();
        buf.cap = capacity;
        buf
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for RawVec<T> {
    fn drop(&mut self) {
        if self.cap == 0 {
            return;
        }

        // Can't fail, the same layout was used to allocate.
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

// Safety: `RawVec` is just memory, the owner decides what lives in it.
unsafe impl<T: Send> Send for RawVec<T> {}
unsafe impl<T: Sync> Sync for RawVec<T> {}

const fn check_not_zero_sized<T>() {
    assert!(
        std::mem::size_of::<T>() > 0,
        "zero-sized types not supported"
    );
}

#[cfg(test)]
mod tests {
    use super::RawVec;

    #[test]
    fn empty_does_not_allocate() {
        let buf = RawVec::<u64>::new();
        assert_eq!(buf.capacity(), 0);

        let buf = RawVec::<u64>::with_capacity(0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn allocates_capacity() {
        let buf = RawVec::<u32>::with_capacity(10);
        assert_eq!(buf.capacity(), 10);

        // Slots are writable and readable through the pointer.
        unsafe {
            for i in 0..10 {
                buf.as_ptr().add(i).write(i as u32);
            }
            assert_eq!(buf.as_ptr().add(9).read(), 9);
        }
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn dropping_does_not_drop_contents() {
        use std::rc::Rc;

        let value = Rc::new(());
        let buf = RawVec::<Rc<()>>::with_capacity(1);
        unsafe { buf.as_ptr().write(Rc::clone(&value)) };

        drop(buf);

        // The clone leaked rather than being dropped.
        assert_eq!(Rc::strong_count(&value), 2);
    }

    #[test]
    #[should_panic = "zero-sized types not supported"]
    fn zero_sized() {
        let _ = RawVec::<()>::new();
    }

    #[test]
    #[should_panic = "capacity too large"]
    fn capacity_overflow() {
        let _ = RawVec::<u64>::with_capacity(usize::MAX);
    }
}
