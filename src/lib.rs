#![no_std]

//! DynArr is a growable contiguous array with an explicit, predictable resize policy.
//!
//! [`DynArr`] reallocates only when a new length exceeds its capacity, or falls below a third of
//! it. Every reallocation sets the capacity to twice the new length. Repeated
//! [`push_back`] is amortized, and alternating growth and shrinkage near a boundary does not
//! reallocate on every call.
//!
//! Every operation that can fail returns a [`DynArrError`] instead of panicking, and a failed
//! operation leaves the array exactly as it was.
//!
//! ## Examples
//! ### Basic Usage
//!
//! ```
//! use dynarr::DynArr;
//!
//! let mut a = DynArr::new();
//! a.push_back(5)?;
//! a.push_back(7)?;
//! a.insert(1, 6)?;
//! assert_eq!(a, [5, 6, 7]);
//!
//! assert_eq!(a.erase(0)?, 5);
//! assert_eq!(a, [6, 7]);
//! # Ok::<(), dynarr::DynArrError>(())
//! ```
//!
//! ### Concatenation and Sub-arrays
//!
//! ```
//! use dynarr::dynarr;
//!
//! let a = dynarr![6, 7];
//! let b = &a + &dynarr![9];
//! assert_eq!(b, [6, 7, 9]);
//! assert_eq!(a, [6, 7]);
//!
//! assert_eq!(b.subarray(1, None)?, [7, 9]);
//! # Ok::<(), dynarr::DynArrError>(())
//! ```
//!
//! ### Checked Access
//!
//! ```
//! use dynarr::{DynArrError, dynarr};
//!
//! let mut a = dynarr![1, 2, 3];
//! *a.get_mut(0)? += 10;
//! assert_eq!(a.get(0), Ok(&11));
//! assert_eq!(a.get(3), Err(DynArrError::IndexOutOfRange { index: 3, len: 3 }));
//! # Ok::<(), DynArrError>(())
//! ```
//!
//! [`push_back`]: DynArr::push_back

extern crate alloc;
use alloc::alloc::{alloc, dealloc, handle_alloc_error};
use core::alloc::Layout;
use core::borrow::{Borrow, BorrowMut};
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{DoubleEndedIterator, ExactSizeIterator, FromIterator, IntoIterator, Iterator};
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop, size_of};
use core::ops::{Add, AddAssign, Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;

mod error;
mod read;

pub use error::DynArrError;

/// Creates a [`DynArr`] from a list of elements, like `vec!`.
///
/// ```
/// use dynarr::dynarr;
///
/// let a = dynarr![1, 2, 3];
/// assert_eq!(a.len(), 3);
/// assert_eq!(a.capacity(), 6);
/// ```
///
/// # Panics
/// Panics if storage for the elements cannot be allocated.
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::DynArr::new()
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynArr::from([$($x),+])
    };
}

/// A growable contiguous array with an amortized resize policy.
///
/// Storage is a single exclusively owned block of [`capacity`] slots, of which the first [`len`]
/// are initialized. Clones never alias storage.
///
/// [`capacity`]: DynArr::capacity
/// [`len`]: DynArr::len
pub struct DynArr<T> {
    /// Start of the block, dangling when `cap` is zero or `T` is zero-sized.
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> DynArr<T> {
    /// An empty array with no storage.
    pub const EMPTY: Self = Self {
        ptr: NonNull::dangling(),
        len: 0,
        cap: 0,
        _marker: PhantomData,
    };

    /// On reallocation, the new capacity is the new length times this.
    pub const GROWTH_FACTOR: usize = 2;

    /// Storage shrinks once the length falls below `capacity / SHRINK_DIVISOR`.
    pub const SHRINK_DIVISOR: usize = 3;

    /// The largest capacity whose layout fits in `isize::MAX` bytes.
    ///
    /// Zero-sized types are never stored, so their capacity is only bookkeeping.
    pub const MAX_CAP: usize = if size_of::<T>() == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / size_of::<T>()
    };

    /// Create an empty array. Does not allocate.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Return the number of elements in the array.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Return the number of slots in the backing store.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Return `true` if the array contains no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for DynArr<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> DynArr<T> {
    /// Computes the capacity the resize policy assigns to a length of `len`.
    fn capacity_for(len: usize) -> Result<usize, DynArrError> {
        match len.checked_mul(Self::GROWTH_FACTOR) {
            Some(cap) if cap <= Self::MAX_CAP => Ok(cap),
            Some(cap) => Err(DynArrError::AllocationFailure { capacity: cap }),
            None => Err(DynArrError::AllocationFailure {
                capacity: usize::MAX,
            }),
        }
    }

    /// Returns `true` when a length of `new_len` requires a different block.
    #[inline(always)]
    const fn needs_realloc(&self, new_len: usize) -> bool {
        new_len > self.cap || new_len < self.cap / Self::SHRINK_DIVISOR
    }

    /// Capacity left behind by erasing one element at a time from `self.len` down to `new_len`.
    fn capacity_after_erasing_to(&self, new_len: usize) -> usize {
        let mut cap = self.cap;
        for len in (new_len..self.len).rev() {
            if len < cap / Self::SHRINK_DIVISOR {
                cap = len * Self::GROWTH_FACTOR;
            }
        }
        cap
    }

    /// Allocate an empty array with exactly `cap` uninitialized slots.
    fn with_exact_capacity(cap: usize) -> Result<Self, DynArrError> {
        let failure = DynArrError::AllocationFailure { capacity: cap };
        if cap > Self::MAX_CAP {
            return Err(failure);
        }
        let layout = Layout::array::<T>(cap).map_err(|_| failure.clone())?;

        // Zero-sized layouts are not allocated.
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: The layout has a non-zero size.
            NonNull::new(unsafe { alloc(layout) }.cast::<T>()).ok_or(failure)?
        };

        Ok(Self {
            ptr,
            len: 0,
            cap,
            _marker: PhantomData,
        })
    }

    /// Release a block of `cap` slots without dropping anything in it.
    ///
    /// # Safety
    /// `ptr` must have been allocated by [`with_exact_capacity`] with the same `cap`, and must not
    /// be used afterwards.
    ///
    /// [`with_exact_capacity`]: DynArr::with_exact_capacity
    unsafe fn release(ptr: NonNull<T>, cap: usize) {
        if let Ok(layout) = Layout::array::<T>(cap) {
            if layout.size() != 0 {
                // SAFETY: Allocated with this same layout.
                unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) };
            }
        }
    }

    /// Returns an empty array with fresh storage when the resize policy calls for reallocation at
    /// `new_len`, or [`None`] when the current block can hold it.
    ///
    /// Nothing is moved, so failing here leaves `self` untouched.
    fn replacement_for(&self, new_len: usize) -> Result<Option<Self>, DynArrError> {
        if self.needs_realloc(new_len) {
            Self::with_exact_capacity(Self::capacity_for(new_len)?).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Move the first `keep` elements into `fresh` and adopt its storage, releasing the old block.
    ///
    /// # Safety
    /// `fresh` must be empty with `keep <= fresh.cap`, `keep <= self.len`, and anything in the old
    /// block past `keep` must already be dropped or moved out.
    unsafe fn move_into(&mut self, mut fresh: Self, keep: usize) {
        // SAFETY: Distinct blocks, both with room for `keep` elements.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.ptr.as_ptr(), keep) };
        fresh.len = keep;
        self.len = 0;
        mem::swap(self, &mut fresh);
        // `fresh` now holds the old block with no live elements.
    }

    /// Apply the resize policy for a length of `new_len >= self.len`, without changing the length.
    fn relocate(&mut self, new_len: usize) -> Result<(), DynArrError> {
        if let Some(fresh) = self.replacement_for(new_len)? {
            let keep = self.len;
            // SAFETY: `new_len >= self.len`, so the fresh block holds every live element.
            unsafe { self.move_into(fresh, keep) };
        }
        Ok(())
    }

    /// Write `value` into the first uninitialized slot.
    ///
    /// # Safety
    /// `self.len < self.cap`.
    #[inline(always)]
    pub(crate) unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: The slot at `len` is in bounds and uninitialized.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Shorten to `new_len`, dropping the excess elements in place. Storage is untouched.
    ///
    /// # Safety
    /// `new_len <= self.len`.
    unsafe fn drop_tail(&mut self, new_len: usize) {
        let old_len = self.len;
        // Set first so that a panicking drop cannot lead to a double drop.
        self.len = new_len;
        // SAFETY: Slots `[new_len, old_len)` are initialized and no longer reachable.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(new_len),
                old_len - new_len,
            ));
        }
    }

    /// Replace the contents with the elements of `staged`, keeping the current block unless the
    /// resize policy calls for a new one.
    ///
    /// `staged` must have been allocated with the policy capacity for its length.
    pub(crate) fn adopt(&mut self, mut staged: Self) {
        let len = staged.len;
        if self.needs_realloc(len) {
            *self = staged;
            return;
        }

        // SAFETY: The current block holds at least `len` slots, since no reallocation is needed.
        unsafe {
            self.drop_tail(0);
            ptr::copy_nonoverlapping(staged.ptr.as_ptr(), self.ptr.as_ptr(), len);
        }
        staged.len = 0;
        self.len = len;
    }

    /// Unwraps the result of an operation behind an infallible trait.
    ///
    /// # Panics
    /// Panics when the requested capacity exceeds [`Self::MAX_CAP`], defers to
    /// [`handle_alloc_error`] when the allocator fails, and panics with the error otherwise.
    #[track_caller]
    fn escalate<R>(result: Result<R, DynArrError>) -> R {
        match result {
            Ok(r) => r,
            Err(DynArrError::AllocationFailure { capacity }) => {
                match Layout::array::<T>(capacity) {
                    Ok(layout) if size_of::<T>() != 0 && capacity <= Self::MAX_CAP => {
                        handle_alloc_error(layout)
                    }
                    _ => panic!(
                        "{capacity} elements > MAX_CAP = {}.\nRequested DynArr larger than isize::MAX bytes.",
                        Self::MAX_CAP
                    ),
                }
            }
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> Drop for DynArr<T> {
    fn drop(&mut self) {
        // SAFETY: The first `len` slots are initialized.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            // SAFETY: The block came from `with_exact_capacity(self.cap)`.
            Self::release(self.ptr, self.cap);
        }
    }
}

// SAFETY: DynArr owns [T], so is Send/Sync as long as T is.
unsafe impl<T: Send> Send for DynArr<T> {}
unsafe impl<T: Sync> Sync for DynArr<T> {}

impl<T: Default> DynArr<T> {
    /// Create an array of `len` default elements, with a capacity of `2 * len`.
    pub fn with_len(len: usize) -> Result<Self, DynArrError> {
        let mut arr = Self::with_exact_capacity(Self::capacity_for(len)?)?;
        for _ in 0..len {
            // SAFETY: The capacity is at least `len`.
            unsafe { arr.push_unchecked(T::default()) };
        }
        Ok(arr)
    }

    /// Resize to `new_len`, filling new slots with `T::default()`.
    ///
    /// See [`resize_with`](DynArr::resize_with).
    pub fn resize(&mut self, new_len: usize) -> Result<(), DynArrError> {
        self.resize_with(new_len, T::default)
    }
}

impl<T: Clone> DynArr<T> {
    /// Create an array holding clones of the first `len` elements of `source`, with a capacity of
    /// `2 * len`.
    ///
    /// Fails with [`DynArrError::InvalidArgument`] when `source` has fewer than `len` elements.
    pub fn from_buffer(len: usize, source: &[T]) -> Result<Self, DynArrError> {
        let source = source.get(..len).ok_or(DynArrError::InvalidArgument {
            reason: "source buffer is shorter than the requested length",
        })?;

        let mut arr = Self::with_exact_capacity(Self::capacity_for(len)?)?;
        for item in source {
            // SAFETY: The capacity is `2 * len`.
            unsafe { arr.push_unchecked(item.clone()) };
        }
        Ok(arr)
    }

    /// Deep copy into a fresh block of the same capacity.
    pub fn try_clone(&self) -> Result<Self, DynArrError> {
        let mut copy = Self::with_exact_capacity(self.cap)?;
        for item in self.iter() {
            // SAFETY: Same capacity as `self`, which holds `self.len` elements.
            unsafe { copy.push_unchecked(item.clone()) };
        }
        Ok(copy)
    }

    /// Replace the contents with clones of `values`.
    pub fn assign(&mut self, values: &[T]) -> Result<(), DynArrError> {
        let staged = Self::from_buffer(values.len(), values)?;
        self.adopt(staged);
        Ok(())
    }

    /// Return a new array of `self` followed by `other`. Neither operand is modified.
    pub fn try_concat(&self, other: &Self) -> Result<Self, DynArrError> {
        let len = self
            .len
            .checked_add(other.len)
            .ok_or(DynArrError::AllocationFailure {
                capacity: usize::MAX,
            })?;

        let mut joined = Self::with_exact_capacity(Self::capacity_for(len)?)?;
        for item in self.iter().chain(other.iter()) {
            // SAFETY: The capacity is `2 * len`.
            unsafe { joined.push_unchecked(item.clone()) };
        }
        Ok(joined)
    }

    /// Append clones of every element of `other`, resizing once for the combined length.
    pub fn append(&mut self, other: &Self) -> Result<(), DynArrError> {
        let new_len = self
            .len
            .checked_add(other.len)
            .ok_or(DynArrError::AllocationFailure {
                capacity: usize::MAX,
            })?;

        self.relocate(new_len)?;
        for item in other.iter() {
            // SAFETY: `relocate` left room for `new_len` elements.
            unsafe { self.push_unchecked(item.clone()) };
        }
        Ok(())
    }

    /// Copy `len` elements starting at `index` into a new array, or everything from `index` on
    /// when `len` is [`None`] or runs past the end.
    ///
    /// `index` must be less than [`len`](DynArr::len); unlike [`insert`](DynArr::insert), the end
    /// position itself is out of range.
    pub fn subarray(&self, index: usize, len: Option<usize>) -> Result<Self, DynArrError> {
        if index >= self.len {
            return Err(DynArrError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        let rest = self.len - index;
        let count = len.filter(|&n| n <= rest).unwrap_or(rest);
        Self::from_buffer(count, &self.as_slice()[index..])
    }
}

impl<T> DynArr<T> {
    /// Resize to `new_len`, dropping excess elements or filling new slots with `f()`.
    ///
    /// Storage is reallocated to `2 * new_len` slots only when `new_len` exceeds the capacity or
    /// falls below a third of it.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), DynArrError>
    where
        F: FnMut() -> T,
    {
        let fresh = self.replacement_for(new_len)?;

        if new_len < self.len {
            // SAFETY: `new_len < self.len`.
            unsafe { self.drop_tail(new_len) };
        }
        if let Some(fresh) = fresh {
            let keep = self.len;
            // SAFETY: `keep <= new_len`, and the fresh block holds `2 * new_len` slots.
            unsafe { self.move_into(fresh, keep) };
        }
        while self.len < new_len {
            let value = f();
            // SAFETY: The block holds at least `new_len` slots.
            unsafe { self.push_unchecked(value) };
        }
        Ok(())
    }

    /// Drop every element. Storage is released once the capacity is 3 or more.
    pub fn clear(&mut self) {
        // SAFETY: `0 <= self.len`.
        unsafe { self.drop_tail(0) };
        if self.needs_realloc(0) {
            *self = Self::EMPTY;
        }
    }

    /// Insert `value` at `index`, shifting everything after it one slot to the right.
    ///
    /// `index` may equal [`len`](DynArr::len), which appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), DynArrError> {
        let len = self.len;
        if index > len {
            return Err(DynArrError::IndexOutOfRange { index, len });
        }
        let new_len = len.checked_add(1).ok_or(DynArrError::AllocationFailure {
            capacity: usize::MAX,
        })?;

        if let Some(fresh) = self.replacement_for(new_len)? {
            // SAFETY: The fresh block holds `2 * new_len` slots.
            unsafe { self.move_into(fresh, len) };
        }

        // SAFETY: `index <= len < cap`, so the shifted tail and the written slot are in bounds.
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            // Overlapping move, so the tail is shifted back to front.
            ptr::copy(p, p.add(1), len - index);
            p.write(value);
        }
        self.len = new_len;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting everything after it one slot left.
    pub fn erase(&mut self, index: usize) -> Result<T, DynArrError> {
        let len = self.len;
        if index >= len {
            return Err(DynArrError::IndexOutOfRange { index, len });
        }
        let fresh = self.replacement_for(len - 1)?;

        // SAFETY: `index < len`; the read slot is overwritten by the shift or left past the end.
        let removed = unsafe {
            let p = self.ptr.as_ptr().add(index);
            let removed = p.read();
            ptr::copy(p.add(1), p, len - index - 1);
            removed
        };
        self.len = len - 1;

        if let Some(fresh) = fresh {
            // SAFETY: The fresh block holds `2 * (len - 1)` slots.
            unsafe { self.move_into(fresh, len - 1) };
        }
        Ok(removed)
    }

    /// Append `value`. Same as `insert(len, value)`.
    #[inline(always)]
    pub fn push_back(&mut self, value: T) -> Result<(), DynArrError> {
        self.insert(self.len, value)
    }

    /// Prepend `value`. Same as `insert(0, value)`.
    #[inline(always)]
    pub fn push_front(&mut self, value: T) -> Result<(), DynArrError> {
        self.insert(0, value)
    }

    /// Remove and return the last element. Same as `erase(len - 1)`.
    pub fn pop_back(&mut self) -> Result<T, DynArrError> {
        match self.len.checked_sub(1) {
            Some(last) => self.erase(last),
            None => Err(DynArrError::IndexOutOfRange { index: 0, len: 0 }),
        }
    }

    /// Remove and return the first element. Same as `erase(0)`.
    #[inline(always)]
    pub fn pop_front(&mut self) -> Result<T, DynArrError> {
        self.erase(0)
    }
}

impl<T> DynArr<T> {
    /// Borrow the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T, DynArrError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(DynArrError::IndexOutOfRange { index, len })
    }

    /// Mutably borrow the element at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, DynArrError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(DynArrError::IndexOutOfRange { index, len })
    }

    /// Overwrite the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, DynArrError> {
        self.get_mut(index).map(|slot| mem::replace(slot, value))
    }

    /// Borrow the last element.
    pub fn back(&self) -> Result<&T, DynArrError> {
        match self.len.checked_sub(1) {
            Some(last) => self.get(last),
            None => Err(DynArrError::IndexOutOfRange { index: 0, len: 0 }),
        }
    }

    /// Mutably borrow the last element.
    pub fn back_mut(&mut self) -> Result<&mut T, DynArrError> {
        match self.len.checked_sub(1) {
            Some(last) => self.get_mut(last),
            None => Err(DynArrError::IndexOutOfRange { index: 0, len: 0 }),
        }
    }

    /// Extract a slice over the initialized elements.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots are initialized.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Extract a mutable slice over the initialized elements.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The first `len` slots are initialized, and `self` is borrowed mutably.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: PartialEq> DynArr<T> {
    /// Erase the first element equal to `value`. Returns whether one was found.
    pub fn remove(&mut self, value: &T) -> Result<bool, DynArrError> {
        match self.iter().position(|item| item == value) {
            Some(index) => self.erase(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Erase every element equal to `value`, keeping the rest in order. Returns how many were
    /// erased.
    ///
    /// The final capacity is the one erasing the matches one at a time would leave, but storage
    /// is reallocated at most once.
    pub fn remove_all(&mut self, value: &T) -> Result<usize, DynArrError> {
        let matches = self.iter().filter(|&item| item == value).count();
        if matches == 0 {
            return Ok(0);
        }
        let cap = self.capacity_after_erasing_to(self.len - matches);
        let fresh = if cap == self.cap {
            None
        } else {
            Some(Self::with_exact_capacity(cap)?)
        };

        let old_len = self.len;
        // Elements are leaked rather than double dropped if a comparison or drop panics.
        self.len = 0;
        let base = self.ptr.as_ptr();
        let mut kept = 0;
        for src in 0..old_len {
            // SAFETY: `kept <= src < old_len`; each slot is read once and either dropped or moved.
            unsafe {
                let p = base.add(src);
                if *p == *value {
                    ptr::drop_in_place(p);
                } else {
                    if src != kept {
                        ptr::copy_nonoverlapping(p, base.add(kept), 1);
                    }
                    kept += 1;
                }
            }
        }
        self.len = kept;

        match fresh {
            // SAFETY: Slots past `kept` were dropped or moved during compaction.
            Some(fresh) if kept <= fresh.cap => unsafe { self.move_into(fresh, kept) },
            // An inconsistent `PartialEq` kept more than were counted; stay in the old block.
            _ => {}
        }
        Ok(old_len - kept)
    }
}

impl<T> Deref for DynArr<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArr<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArr<T> {
    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArr<T> {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Borrow<[T]> for DynArr<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> BorrowMut<[T]> for DynArr<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: PartialEq> PartialEq for DynArr<T> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other) || self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArr<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynArr<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynArr<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynArr<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for DynArr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T: Clone> Clone for DynArr<T> {
    fn clone(&self) -> Self {
        Self::escalate(self.try_clone())
    }
}

impl<T> DynArr<T> {
    /// Build from an array literal, with a capacity of `2 * M`.
    pub fn try_from_array<const M: usize>(array: [T; M]) -> Result<Self, DynArrError> {
        let mut arr = Self::with_exact_capacity(Self::capacity_for(M)?)?;
        for item in array {
            // SAFETY: The capacity is `2 * M`.
            unsafe { arr.push_unchecked(item) };
        }
        Ok(arr)
    }
}

impl<T, const M: usize> From<[T; M]> for DynArr<T> {
    #[inline]
    fn from(array: [T; M]) -> Self {
        Self::escalate(Self::try_from_array(array))
    }
}

impl<T: Clone> From<&[T]> for DynArr<T> {
    #[inline(always)]
    fn from(slice: &[T]) -> Self {
        Self::escalate(Self::from_buffer(slice.len(), slice))
    }
}

impl<T> Extend<T> for DynArr<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            Self::escalate(self.push_back(item));
        }
    }
}

impl<T> FromIterator<T> for DynArr<T> {
    #[inline(always)]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::EMPTY;
        arr.extend(iter);
        arr
    }
}

impl<T: Clone> Add<&DynArr<T>> for &DynArr<T> {
    type Output = DynArr<T>;

    fn add(self, other: &DynArr<T>) -> DynArr<T> {
        DynArr::<T>::escalate(self.try_concat(other))
    }
}

impl<T: Clone> AddAssign<&DynArr<T>> for DynArr<T> {
    fn add_assign(&mut self, other: &DynArr<T>) {
        Self::escalate(self.append(other))
    }
}

impl<T: Debug> Debug for DynArr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.as_slice(), f)
    }
}

/// Prints `[e0, e1, ...]`. The alternate form `{:#}` also prints the size and capacity.
impl<T: Display> Display for DynArr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            Display::fmt(item, f)?;
        }
        f.write_str("]")?;

        if f.alternate() {
            write!(f, ", size:{}, capacity:{}", self.len, self.cap)?;
        }
        Ok(())
    }
}

/// A double-ended iterator over [`DynArr<T>`] that consumes and drops the collection.
pub struct DynArrIntoIter<T> {
    ptr: NonNull<T>,
    cap: usize,
    start: usize,
    end: usize,
    _marker: PhantomData<T>,
}

impl<T> ExactSizeIterator for DynArrIntoIter<T> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T> Iterator for DynArrIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }

        // SAFETY:
        // - self.start < self.end <= len, so index in bounds.
        // - Data initialized, read transfers ownership.
        let item = unsafe { self.ptr.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for DynArrIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        self.end -= 1;

        // SAFETY: Similar to next, but from end.
        Some(unsafe { self.ptr.as_ptr().add(self.end).read() })
    }
}

impl<T> Drop for DynArrIntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: Slots `[start, end)` are initialized and not yet yielded.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(self.start),
                self.end - self.start,
            ));
            // SAFETY: The block was taken over from a `DynArr` of the same capacity.
            DynArr::<T>::release(self.ptr, self.cap);
        }
    }
}

// SAFETY: The iterator owns the remaining [T], same as DynArr.
unsafe impl<T: Send> Send for DynArrIntoIter<T> {}
unsafe impl<T: Sync> Sync for DynArrIntoIter<T> {}

impl<T> IntoIterator for DynArr<T> {
    type Item = T;
    type IntoIter = DynArrIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let arr = ManuallyDrop::new(self);
        DynArrIntoIter {
            ptr: arr.ptr,
            cap: arr.cap,
            start: 0,
            end: arr.len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArr<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArr<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
