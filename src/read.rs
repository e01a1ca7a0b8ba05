//! Counted reads: populate a [`DynArr`] with exactly `count` externally supplied values.

use core::str::FromStr;

use crate::{DynArr, DynArrError};

impl<T> DynArr<T> {
    /// Replace the contents with exactly `count` values taken in order from `values`.
    ///
    /// Values past `count` are not consumed. If `values` runs out first, this fails with
    /// [`DynArrError::InvalidArgument`] and the array is left unchanged.
    pub fn fill_from<I>(&mut self, count: usize, values: I) -> Result<(), DynArrError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter();
        let mut staged = Self::with_exact_capacity(Self::capacity_for(count)?)?;
        while staged.len() < count {
            let value = values.next().ok_or(DynArrError::InvalidArgument {
                reason: "fewer values than the element count",
            })?;
            // SAFETY: The capacity is at least `count`.
            unsafe { staged.push_unchecked(value) };
        }

        self.adopt(staged);
        Ok(())
    }
}

/// Parses whitespace separated text: an element count, followed by that many values.
///
/// Exactly `count` values are read; any text after them is ignored.
///
/// ```
/// use dynarr::DynArr;
///
/// let a: DynArr<i32> = "3  10 20 30".parse()?;
/// assert_eq!(a, [10, 20, 30]);
/// let b: DynArr<i32> = "1 7 rest".parse()?;
/// assert_eq!(b, [7]);
/// assert!("-1".parse::<DynArr<i32>>().is_err());
/// # Ok::<(), dynarr::DynArrError>(())
/// ```
impl<T: FromStr> FromStr for DynArr<T> {
    type Err = DynArrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let count: isize = tokens
            .next()
            .ok_or(DynArrError::InvalidArgument {
                reason: "missing element count",
            })?
            .parse()
            .map_err(|_| DynArrError::InvalidArgument {
                reason: "element count is not an integer",
            })?;
        let count = usize::try_from(count).map_err(|_| DynArrError::InvalidArgument {
            reason: "cannot allocate a negative number of elements",
        })?;

        let short = DynArrError::InvalidArgument {
            reason: "fewer values than the element count",
        };
        if tokens.clone().take(count).count() < count {
            return Err(short);
        }

        let mut arr = Self::with_exact_capacity(Self::capacity_for(count)?)?;
        while arr.len() < count {
            let value = tokens
                .next()
                .ok_or_else(|| short.clone())?
                .parse()
                .map_err(|_| DynArrError::InvalidArgument {
                    reason: "value could not be parsed",
                })?;
            // SAFETY: The capacity is at least `count`.
            unsafe { arr.push_unchecked(value) };
        }
        Ok(arr)
    }
}
