//! Row windows for the generation driver.
//!
//! A row is advanced from three slices: the row above and the row below
//! (read-only) and the row itself (written). Sequential sweeps split the
//! buffer safely; parallel passes hand out windows from a shared raw pointer
//! and rely on the pass structure to keep written and read rows disjoint.

pub(crate) struct SendPtr<T> {
    inner: *mut T,
}
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}
impl<T> Copy for SendPtr<T> {}
impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> SendPtr<T> {
    #[inline(always)]
    pub(crate) fn new(ptr: *mut T) -> Self {
        Self { inner: ptr }
    }
    #[inline(always)]
    pub(crate) fn get(&self) -> *mut T {
        self.inner
    }
}

/// Borrow `(above, row, below)` for buffer row `row` (1-based interior row).
#[inline]
pub(crate) fn row_window(
    words: &mut [u64],
    groups_per_row: usize,
    row: usize,
) -> (&[u64], &mut [u64], &[u64]) {
    debug_assert!(row >= 1);
    debug_assert!((row + 2) * groups_per_row <= words.len());

    let (head, tail) = words.split_at_mut(row * groups_per_row);
    let (current, rest) = tail.split_at_mut(groups_per_row);
    let above = &head[(row - 1) * groups_per_row..];
    (above, current, &rest[..groups_per_row])
}

/// Raw-pointer variant of [`row_window`] for parallel passes.
///
/// # Safety
/// `base` must point to a live buffer of at least `(row + 2) * groups_per_row`
/// words. For the lifetime `'a`, no other window may write buffer rows
/// `row - 1` or `row + 1`, and no other window may touch row `row` at all.
#[inline(always)]
pub(crate) unsafe fn row_window_raw<'a>(
    base: *mut u64,
    groups_per_row: usize,
    row: usize,
) -> (&'a [u64], &'a mut [u64], &'a [u64]) {
    debug_assert!(!base.is_null());
    debug_assert!(row >= 1);

    unsafe {
        let above = std::slice::from_raw_parts(base.add((row - 1) * groups_per_row), groups_per_row);
        let current =
            std::slice::from_raw_parts_mut(base.add(row * groups_per_row), groups_per_row);
        let below = std::slice::from_raw_parts(base.add((row + 1) * groups_per_row), groups_per_row);
        (above, current, below)
    }
}
