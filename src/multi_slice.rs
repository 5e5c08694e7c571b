// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use itertools::Itertools;

use crate::error::{invalid_slice, SliceError};
use crate::slice::{Slice, SliceIterator};
use crate::Ix;

/// A list-valued selection in one dimension: the union of several finished
/// slices, e.g. `[[1],[3],[5:7]]`.
///
/// The order of the sub-slices is significant, it is the enumeration order.
/// The aggregate bounds (`first` is the minimum, `stop`, `stride` and
/// `maxsize` the maxima over the sub-slices) are for reporting only;
/// iteration always goes through [`.sub_slices()`](MultiSlice::sub_slices).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Slice>", into = "Vec<Slice>")
)]
pub struct MultiSlice {
    slices: Vec<Slice>,
    first: Ix,
    stop: Ix,
    stride: Ix,
    maxsize: Ix,
}

impl MultiSlice {
    /// Create a `MultiSlice` from its sub-slices.
    ///
    /// **Errors** with `InvalidSlice` if `slices` is empty.
    pub fn new(slices: Vec<Slice>) -> Result<MultiSlice, SliceError> {
        let (first, stop, stride, maxsize) = slices
            .iter()
            .map(|s| (s.first(), s.stop(), s.stride(), s.maxsize()))
            .reduce(|a, b| {
                (
                    a.0.min(b.0),
                    a.1.max(b.1),
                    a.2.max(b.2),
                    a.3.max(b.3),
                )
            })
            .ok_or_else(|| invalid_slice("multislice needs at least one slice"))?;
        Ok(MultiSlice {
            slices,
            first,
            stop,
            stride,
            maxsize,
        })
    }

    /// The sub-slices in enumeration order.
    pub fn sub_slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Re-validate every sub-slice.
    pub fn finish(&self) -> Result<MultiSlice, SliceError> {
        let slices = self
            .slices
            .iter()
            .map(Slice::finish)
            .collect::<Result<Vec<_>, _>>()?;
        MultiSlice::new(slices)
    }

    #[inline]
    pub fn first(&self) -> Ix {
        self.first
    }

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

    /// Sum of the sub-slice counts.
    pub fn count(&self) -> Ix {
        self.slices.iter().map(Slice::count).sum()
    }

    pub fn iter(&self) -> SliceIterator<'_> {
        SliceIterator::new(&self.slices)
    }

    /// `[` + the sub-slices' constraint strings joined by `,` + `]`.
    pub fn to_constraint_string(&self) -> String {
        format!(
            "[{}]",
            self.slices.iter().map(Slice::to_constraint_string).join(",")
        )
    }
}

impl fmt::Display for MultiSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_constraint_string())
    }
}

impl TryFrom<Vec<Slice>> for MultiSlice {
    type Error = SliceError;

    fn try_from(slices: Vec<Slice>) -> Result<MultiSlice, SliceError> {
        MultiSlice::new(slices)
    }
}

impl From<MultiSlice> for Vec<Slice> {
    fn from(m: MultiSlice) -> Vec<Slice> {
        m.slices
    }
}

/// The selection for one dimension: a plain slice or a list-valued one.
///
/// Odometer construction matches on this tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisSlice {
    Single(Slice),
    Multi(MultiSlice),
}

impl AxisSlice {
    /// Returns `true` if `self` is a `Multi` value.
    pub fn is_multi(&self) -> bool {
        matches!(self, AxisSlice::Multi(_))
    }

    /// The choices an odometer picks from: the slice itself, or the
    /// sub-slices of a `Multi`.
    pub fn sub_slices(&self) -> &[Slice] {
        match self {
            AxisSlice::Single(s) => std::slice::from_ref(s),
            AxisSlice::Multi(m) => m.sub_slices(),
        }
    }

    pub fn count(&self) -> Ix {
        match self {
            AxisSlice::Single(s) => s.count(),
            AxisSlice::Multi(m) => m.count(),
        }
    }

    pub fn first(&self) -> Ix {
        match self {
            AxisSlice::Single(s) => s.first(),
            AxisSlice::Multi(m) => m.first(),
        }
    }

    pub fn stop(&self) -> Ix {
        match self {
            AxisSlice::Single(s) => s.stop(),
            AxisSlice::Multi(m) => m.stop(),
        }
    }

    pub fn stride(&self) -> Ix {
        match self {
            AxisSlice::Single(s) => s.stride(),
            AxisSlice::Multi(m) => m.stride(),
        }
    }

    pub fn maxsize(&self) -> Ix {
        match self {
            AxisSlice::Single(s) => s.maxsize(),
            AxisSlice::Multi(m) => m.maxsize(),
        }
    }

    pub fn finish(&self) -> Result<AxisSlice, SliceError> {
        Ok(match self {
            AxisSlice::Single(s) => AxisSlice::Single(s.finish()?),
            AxisSlice::Multi(m) => AxisSlice::Multi(m.finish()?),
        })
    }

    pub fn iter(&self) -> SliceIterator<'_> {
        SliceIterator::new(self.sub_slices())
    }

    pub fn to_constraint_string(&self) -> String {
        match self {
            AxisSlice::Single(s) => s.to_constraint_string(),
            AxisSlice::Multi(m) => m.to_constraint_string(),
        }
    }
}

impl fmt::Display for AxisSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_constraint_string())
    }
}

impl From<Slice> for AxisSlice {
    #[inline]
    fn from(s: Slice) -> AxisSlice {
        AxisSlice::Single(s)
    }
}

impl From<MultiSlice> for AxisSlice {
    #[inline]
    fn from(m: MultiSlice) -> AxisSlice {
        AxisSlice::Multi(m)
    }
}

/// Render a whole selection, one bracketed group per dimension.
pub fn constraint_string(slices: &[AxisSlice]) -> String {
    slices.iter().map(AxisSlice::to_constraint_string).join("")
}
