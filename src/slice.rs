// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::StepBy;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use num_integer::Integer;

use crate::error::{from_kind, invalid_slice, overflow, rank_mismatch, ErrorKind, SliceError};
use crate::Ix;

/// A partially specified slice, as produced by a constraint parser.
///
/// Any field may be left undefined (`None`); [`.finish()`](SliceSpec::finish)
/// fills the gaps with the default rules and validates the result, producing
/// a [`Slice`]. Fields are signed so that a negative value coming out of a
/// request is representable and can be rejected.
///
/// ## Examples
///
/// `SliceSpec::from(..).with_maxsize(10)?` is the whole of a dimension of
/// size 10. The constraint equivalent is `[0:9]`.
///
/// `SliceSpec::from(a..b).step_by(2)` is every second element from `a`
/// until `b`. The constraint equivalent is `[a:2:b-1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceSpec {
    pub first: Option<isize>,
    pub stop: Option<isize>,
    pub stride: Option<isize>,
    pub maxsize: Option<isize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constrained: bool,
}

impl SliceSpec {
    /// Create a new `SliceSpec` with the given (possibly undefined) fields.
    pub fn new(
        first: Option<isize>,
        stop: Option<isize>,
        stride: Option<isize>,
        maxsize: Option<isize>,
    ) -> SliceSpec {
        SliceSpec {
            first,
            stop,
            stride,
            maxsize,
            constrained: false,
        }
    }

    /// Set the stride.
    #[inline]
    pub fn step_by(self, stride: isize) -> Self {
        SliceSpec {
            stride: Some(stride),
            ..self
        }
    }

    /// Bind the slice to a dimension of extent `maxsize`.
    ///
    /// **Errors** with `Overflow` if `maxsize` does not fit in `isize`.
    #[inline]
    pub fn with_maxsize(self, maxsize: Ix) -> Result<Self, SliceError> {
        Ok(SliceSpec {
            maxsize: Some(signed("dimension size", maxsize)?),
            ..self
        })
    }

    /// Mark the slice as coming from an explicit constraint.
    #[inline]
    pub fn constrained(self) -> Self {
        SliceSpec {
            constrained: true,
            ..self
        }
    }

    /// Fill undefined fields and validate.
    ///
    /// Defaults are applied in order: `first` becomes 0, `stride` becomes 1,
    /// `stop` becomes `maxsize` when that is known and `first + 1` otherwise,
    /// and `maxsize` becomes `stop`.
    ///
    /// **Errors** with `InvalidSlice` if any bound is negative, the stride is
    /// not positive, `first > stop`, `first > maxsize` or
    /// `stop > maxsize + 1`.
    pub fn finish(self) -> Result<Slice, SliceError> {
        let first = self.first.unwrap_or(0);
        let stride = self.stride.unwrap_or(1);
        let stop = match (self.stop, self.maxsize) {
            (Some(stop), _) => stop,
            (None, Some(maxsize)) => maxsize,
            (None, None) => first.checked_add(1).ok_or_else(|| overflow("slice stop"))?,
        };
        let maxsize = self.maxsize.unwrap_or(stop);
        if first < 0 || stop < 0 || maxsize < 0 {
            return Err(invalid_slice(format!(
                "negative bound in {}:{}:{} of {}",
                first, stride, stop, maxsize
            )));
        }
        if stride < 1 {
            return Err(invalid_slice(format!("stride {} must be positive", stride)));
        }
        let mut slice = Slice::new(first as Ix, stop as Ix, stride as Ix, maxsize as Ix)?;
        slice.constrained = self.constrained;
        Ok(slice)
    }
}

macro_rules! impl_slicespec_from_index_type {
    ($index:ty) => {
        impl From<Range<$index>> for SliceSpec {
            #[inline]
            fn from(r: Range<$index>) -> SliceSpec {
                SliceSpec::new(Some(r.start as isize), Some(r.end as isize), None, None)
            }
        }

        impl From<RangeFrom<$index>> for SliceSpec {
            #[inline]
            fn from(r: RangeFrom<$index>) -> SliceSpec {
                SliceSpec::new(Some(r.start as isize), None, None, None)
            }
        }

        impl From<RangeTo<$index>> for SliceSpec {
            #[inline]
            fn from(r: RangeTo<$index>) -> SliceSpec {
                SliceSpec::new(Some(0), Some(r.end as isize), None, None)
            }
        }
    };
}

impl_slicespec_from_index_type!(isize);
impl_slicespec_from_index_type!(i32);

fn signed(what: &str, value: Ix) -> Result<isize, SliceError> {
    isize::try_from(value).map_err(|_| {
        from_kind(
            ErrorKind::Overflow,
            format!("{} {} does not fit in isize", what, value),
        )
    })
}

// unsigned bounds above isize::MAX have no signed form
impl TryFrom<Range<usize>> for SliceSpec {
    type Error = SliceError;

    fn try_from(r: Range<usize>) -> Result<SliceSpec, SliceError> {
        let first = signed("slice start", r.start)?;
        let stop = signed("slice end", r.end)?;
        Ok(SliceSpec::new(Some(first), Some(stop), None, None))
    }
}

impl TryFrom<RangeFrom<usize>> for SliceSpec {
    type Error = SliceError;

    fn try_from(r: RangeFrom<usize>) -> Result<SliceSpec, SliceError> {
        let first = signed("slice start", r.start)?;
        Ok(SliceSpec::new(Some(first), None, None, None))
    }
}

impl TryFrom<RangeTo<usize>> for SliceSpec {
    type Error = SliceError;

    fn try_from(r: RangeTo<usize>) -> Result<SliceSpec, SliceError> {
        let stop = signed("slice end", r.end)?;
        Ok(SliceSpec::new(Some(0), Some(stop), None, None))
    }
}

impl From<RangeFull> for SliceSpec {
    #[inline]
    fn from(_: RangeFull) -> SliceSpec {
        SliceSpec::default()
    }
}

/// One dimension's selection: `first`, exclusive `stop`, `stride`, and the
/// extent `maxsize` of the dimension it is bound against.
///
/// A `Slice` is always finished: it can only be built through validation, so
/// `first <= stop`, `first <= maxsize`, `stop <= maxsize + 1` and
/// `stride >= 1` hold for every value of this type.
///
/// Equality and hashing consider only the realized index set, that is
/// `(first, stop - 1, stride)`; `maxsize` and the flags are ignored.
///
/// ```
/// use d4slice::Slice;
///
/// let s = Slice::new(1, 10, 2, 10).unwrap();
/// assert_eq!(s.count(), 5);
/// assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
/// assert_eq!(s.to_constraint_string(), "[1:2:9]");
/// ```
#[derive(Copy, Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SliceSpec", into = "SliceSpec")
)]
pub struct Slice {
    first: Ix,
    stop: Ix,
    stride: Ix,
    maxsize: Ix,
    constrained: bool,
    whole: bool,
}

impl Slice {
    /// Create a finished slice from fully defined fields.
    ///
    /// **Errors** with `InvalidSlice` when the invariants do not hold.
    pub fn new(first: Ix, stop: Ix, stride: Ix, maxsize: Ix) -> Result<Slice, SliceError> {
        if stride < 1 {
            return Err(invalid_slice(format!("stride {} must be positive", stride)));
        }
        if first > stop {
            return Err(invalid_slice(format!("first {} exceeds stop {}", first, stop)));
        }
        if first > maxsize {
            return Err(invalid_slice(format!(
                "first {} exceeds dimension size {}",
                first, maxsize
            )));
        }
        if stop > maxsize.saturating_add(1) {
            return Err(invalid_slice(format!(
                "stop {} exceeds dimension size {}",
                stop, maxsize
            )));
        }
        Ok(Slice {
            first,
            stop,
            stride,
            maxsize,
            constrained: false,
            whole: first == 0 && stride == 1 && stop == maxsize,
        })
    }

    /// The whole of a dimension of extent `maxsize`.
    pub fn whole(maxsize: Ix) -> Slice {
        Slice {
            first: 0,
            stop: maxsize,
            stride: 1,
            maxsize,
            constrained: false,
            whole: true,
        }
    }

    /// The single index `i` of a dimension of extent `maxsize`.
    pub fn singleton(i: Ix, maxsize: Ix) -> Result<Slice, SliceError> {
        let stop = i.checked_add(1).ok_or_else(|| overflow("slice stop"))?;
        Slice::new(i, stop, 1, maxsize)
    }

    /// Re-validate an already finished slice.
    ///
    /// Finishing is idempotent: the result is identical to `self`.
    pub fn finish(&self) -> Result<Slice, SliceError> {
        let mut again = Slice::new(self.first, self.stop, self.stride, self.maxsize)?;
        again.constrained = self.constrained;
        Ok(again)
    }

    #[inline]
    pub fn first(&self) -> Ix {
        self.first
    }

    /// Exclusive upper bound.
    #[inline]
    pub fn stop(&self) -> Ix {
        self.stop
    }

    #[inline]
    pub fn stride(&self) -> Ix {
        self.stride
    }

    #[inline]
    pub fn maxsize(&self) -> Ix {
        self.maxsize
    }

    /// `stop - 1`, or `None` for an empty slice.
    ///
    /// This is the inclusive bound, not necessarily a selected index when the
    /// stride does not divide the extent.
    #[inline]
    pub fn last(&self) -> Option<Ix> {
        if self.is_empty() {
            None
        } else {
            Some(self.stop - 1)
        }
    }

    /// Number of selected indices, `ceil((stop - first) / stride)`.
    #[inline]
    pub fn count(&self) -> Ix {
        Integer::div_ceil(&(self.stop - self.first), &self.stride)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stop == self.first
    }

    /// Whether the slice spans its entire dimension with stride 1.
    #[inline]
    pub fn is_whole(&self) -> bool {
        self.whole
    }

    /// Whether the slice came from an explicit constraint rather than a
    /// default.
    #[inline]
    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    pub fn with_constrained(self, constrained: bool) -> Slice {
        Slice {
            constrained,
            ..self
        }
    }

    /// Whether index `i` is one of the selected coordinates.
    pub fn contains(&self, i: Ix) -> bool {
        i >= self.first && i < self.stop && (i - self.first) % self.stride == 0
    }

    /// The absolute coordinate of the `i`-th selected element.
    ///
    /// **Errors** with `IndexOutOfRange` if that coordinate would reach
    /// `stop`.
    pub fn map_index(&self, i: Ix) -> Result<Ix, SliceError> {
        let index = i
            .checked_mul(self.stride)
            .and_then(|off| off.checked_add(self.first))
            .ok_or_else(|| overflow("mapped index"))?;
        if index >= self.stop {
            return Err(from_kind(
                ErrorKind::IndexOutOfRange,
                format!("index {} maps to {} beyond {}", i, index, self.to_constraint_string()),
            ));
        }
        Ok(index)
    }

    /// Map the coordinates of `inner`, expressed relative to the elements
    /// `outer` selects, back into `outer`'s dimension.
    ///
    /// The result selects exactly the elements of `outer` at the positions
    /// `inner` selects, without materializing either selection.
    ///
    /// ```
    /// use d4slice::Slice;
    ///
    /// let outer = Slice::new(2, 10, 2, 10).unwrap(); // 2, 4, 6, 8
    /// let inner = Slice::new(1, 3, 1, 4).unwrap(); // positions 1, 2
    /// let composed = Slice::compose(&outer, &inner).unwrap();
    /// assert_eq!(composed.iter().collect::<Vec<_>>(), vec![4, 6]);
    /// ```
    pub fn compose(outer: &Slice, inner: &Slice) -> Result<Slice, SliceError> {
        let stride = outer
            .stride
            .checked_mul(inner.stride)
            .ok_or_else(|| overflow("composed stride"))?;
        let inner_last = match inner.last() {
            Some(last) => last,
            None => {
                // outer.stop may sit one past maxsize
                let bound = cmp::min(outer.stop, outer.maxsize);
                let first = inner
                    .first
                    .checked_mul(outer.stride)
                    .and_then(|off| off.checked_add(outer.first))
                    .map_or(bound, |f| cmp::min(f, bound));
                return Slice::new(first, first, stride, outer.maxsize);
            }
        };
        let first = outer.map_index(inner.first)?;
        let reach = inner_last
            .checked_mul(outer.stride)
            .and_then(|off| off.checked_add(outer.first))
            .ok_or_else(|| overflow("composed last"))?;
        // outer cannot be empty here, map_index succeeded
        let last = cmp::min(outer.stop - 1, reach);
        let mut slice = Slice::new(first, last + 1, stride, outer.maxsize)?;
        slice.constrained = outer.constrained || inner.constrained;
        Ok(slice)
    }

    /// Compose two rank-matched lists of slices dimension by dimension.
    pub fn compose_all(outer: &[Slice], inner: &[Slice]) -> Result<Vec<Slice>, SliceError> {
        if outer.len() != inner.len() {
            return Err(rank_mismatch(outer.len(), inner.len()));
        }
        outer
            .iter()
            .zip(inner)
            .map(|(o, i)| Slice::compose(o, i))
            .collect()
    }

    /// Canonical constraint form: `[0]` when empty, `[a]` for a single
    /// element at stride 1, `[a:b]` at stride 1 and `[a:s:b]` otherwise,
    /// where `b` is `stop - 1`.
    pub fn to_constraint_string(&self) -> String {
        if self.is_empty() {
            "[0]".to_string()
        } else if self.stride == 1 {
            if self.stop - self.first == 1 {
                format!("[{}]", self.first)
            } else {
                format!("[{}:{}]", self.first, self.stop - 1)
            }
        } else {
            format!("[{}:{}:{}]", self.first, self.stride, self.stop - 1)
        }
    }

    /// Iterate over the selected coordinates.
    pub fn iter(&self) -> SliceIterator<'_> {
        SliceIterator::new(std::slice::from_ref(self))
    }

    fn key(&self) -> (Ix, Ix, Ix) {
        // same information as (first, stop - 1, stride) without underflow
        (self.first, self.stop, self.stride)
    }
}

impl PartialEq for Slice {
    fn eq(&self, rhs: &Self) -> bool {
        self.key() == rhs.key()
    }
}

impl Eq for Slice {}

impl Hash for Slice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_constraint_string())
    }
}

impl From<Slice> for SliceSpec {
    fn from(s: Slice) -> SliceSpec {
        SliceSpec {
            first: Some(s.first as isize),
            stop: Some(s.stop as isize),
            stride: Some(s.stride as isize),
            maxsize: Some(s.maxsize as isize),
            constrained: s.constrained,
        }
    }
}

impl TryFrom<SliceSpec> for Slice {
    type Error = SliceError;

    fn try_from(spec: SliceSpec) -> Result<Slice, SliceError> {
        spec.finish()
    }
}

impl<'a> IntoIterator for &'a Slice {
    type Item = Ix;
    type IntoIter = SliceIterator<'a>;

    fn into_iter(self) -> SliceIterator<'a> {
        self.iter()
    }
}

/// An iterator over the coordinates selected by one or more slices, in
/// list order.
///
/// Iterator element type is `Ix`.
#[derive(Clone, Debug)]
pub struct SliceIterator<'a> {
    rest: std::slice::Iter<'a, Slice>,
    current: Option<StepBy<Range<Ix>>>,
    remaining: usize,
}

impl<'a> SliceIterator<'a> {
    pub(crate) fn new(slices: &'a [Slice]) -> SliceIterator<'a> {
        SliceIterator {
            rest: slices.iter(),
            current: None,
            remaining: slices.iter().map(Slice::count).sum(),
        }
    }
}

impl<'a> Iterator for SliceIterator<'a> {
    type Item = Ix;

    fn next(&mut self) -> Option<Ix> {
        loop {
            if let Some(ix) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(ix);
            }
            let s = self.rest.next()?;
            self.current = Some((s.first..s.stop).step_by(s.stride));
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for SliceIterator<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_defaults() {
        let s = SliceSpec::default().with_maxsize(7).unwrap().finish().unwrap();
        assert_eq!((s.first(), s.stop(), s.stride(), s.maxsize()), (0, 7, 1, 7));
        assert!(s.is_whole());

        // no extent known: singleton
        let s = SliceSpec::new(Some(3), None, None, None).finish().unwrap();
        assert_eq!((s.first(), s.stop(), s.stride(), s.maxsize()), (3, 4, 1, 4));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn finish_rejects() {
        let bad = [
            SliceSpec::new(Some(-1), Some(3), None, Some(5)),
            SliceSpec::new(Some(4), Some(3), None, Some(5)),
            SliceSpec::new(Some(0), Some(3), Some(0), Some(5)),
            SliceSpec::new(Some(0), Some(7), None, Some(5)),
            SliceSpec::new(Some(6), None, None, Some(5)),
        ];
        for spec in &bad {
            assert_eq!(spec.finish().unwrap_err().kind(), ErrorKind::InvalidSlice, "{:?}", spec);
        }
    }

    #[test]
    fn empty_slice_strings() {
        let s = Slice::new(3, 3, 1, 5).unwrap();
        assert_eq!(s.count(), 0);
        assert_eq!(s.last(), None);
        assert_eq!(s.to_constraint_string(), "[0]");
        assert_eq!(Slice::singleton(4, 5).unwrap().to_string(), "[4]");
        assert_eq!(Slice::whole(5).to_string(), "[0:4]");
    }

    #[test]
    fn equality_ignores_extent() {
        let a = Slice::new(0, 4, 2, 4).unwrap();
        let b = Slice::new(0, 4, 2, 100).unwrap().with_constrained(true);
        assert_eq!(a, b);
        assert_ne!(a, Slice::new(0, 3, 2, 4).unwrap());
    }

    #[test]
    fn map_index_bounds() {
        let s = Slice::new(2, 10, 2, 10).unwrap();
        assert_eq!(s.map_index(3).unwrap(), 8);
        assert_eq!(s.map_index(4).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn compose_empty_inner() {
        let outer = Slice::new(2, 10, 2, 10).unwrap();
        let inner = Slice::new(4, 4, 1, 4).unwrap();
        let c = Slice::compose(&outer, &inner).unwrap();
        assert_eq!(c.count(), 0);

        // outer stop one past the extent
        let outer = Slice::new(0, 11, 1, 10).unwrap();
        let inner = Slice::new(20, 20, 1, 20).unwrap();
        let c = Slice::compose(&outer, &inner).unwrap();
        assert_eq!(c.count(), 0);
        assert_eq!((c.first(), c.stop(), c.maxsize()), (10, 10, 10));
    }
}
