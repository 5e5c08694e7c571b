// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Odometers: row-major iteration over the coordinates of a selection.

mod multi;
mod plain;

use tracing::debug;

pub use self::multi::MultiOdometer;
pub use self::plain::{PlainOdometer, ScalarOdometer};

use crate::error::{rank_mismatch, SliceError};
use crate::index::Index;
use crate::multi_slice::AxisSlice;
use crate::slice::Slice;
use crate::Ix;

/// Construction options threaded through [`Odometer::factory_with`].
///
/// ```
/// use d4slice::OdometerOptions;
///
/// let opts = OdometerOptions::new().trace_powerset(true);
/// assert!(opts.is_tracing_powerset());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OdometerOptions {
    trace_powerset: bool,
}

impl OdometerOptions {
    pub fn new() -> OdometerOptions {
        OdometerOptions::default()
    }

    /// Emit every sub-slice combination a multi odometer builds as a
    /// `trace` level event.
    pub fn trace_powerset(mut self, enabled: bool) -> Self {
        self.trace_powerset = enabled;
        self
    }

    pub fn is_tracing_powerset(&self) -> bool {
        self.trace_powerset
    }
}

/// An iterator of the [`Index`] values a selection addresses, in canonical
/// order.
///
/// Use [`Odometer::factory`] to pick the right implementation: a scalar
/// odometer for an empty slice list, a plain row-major odometer when every
/// dimension is a single [`Slice`](crate::Slice), and a [`MultiOdometer`]
/// as soon as one dimension is a [`MultiSlice`](crate::MultiSlice).
///
/// ```
/// use d4slice::{AxisSlice, Odometer, Slice};
///
/// let slices: Vec<AxisSlice> = vec![
///     Slice::new(0, 2, 1, 2).unwrap().into(),
///     Slice::new(0, 3, 1, 3).unwrap().into(),
/// ];
/// let coords: Vec<Vec<usize>> = Odometer::factory(&slices)
///     .unwrap()
///     .map(|ix| ix.indices().to_vec())
///     .collect();
/// assert_eq!(coords[..4], [[0, 0], [0, 1], [0, 2], [1, 0]]);
/// ```
#[derive(Clone, Debug)]
pub enum Odometer {
    Scalar(ScalarOdometer),
    Plain(PlainOdometer),
    Multi(MultiOdometer),
}

impl Odometer {
    /// Build an odometer whose indices are relative to each slice's
    /// `maxsize`.
    pub fn factory(slices: &[AxisSlice]) -> Result<Odometer, SliceError> {
        Odometer::factory_with(slices, &OdometerOptions::default())
    }

    pub fn factory_with(
        slices: &[AxisSlice],
        options: &OdometerOptions,
    ) -> Result<Odometer, SliceError> {
        let dimsizes: Vec<Ix> = slices.iter().map(AxisSlice::maxsize).collect();
        Odometer::with_dimensions(slices, &dimsizes, options)
    }

    /// Build an odometer over `slices` for a variable with extents
    /// `dimsizes`.
    ///
    /// **Errors** with `RankMismatch` if the two lists differ in length,
    /// and with `Overflow` if the selection size cannot be represented.
    pub fn with_dimensions(
        slices: &[AxisSlice],
        dimsizes: &[Ix],
        options: &OdometerOptions,
    ) -> Result<Odometer, SliceError> {
        if slices.len() != dimsizes.len() {
            return Err(rank_mismatch(dimsizes.len(), slices.len()));
        }
        if slices.is_empty() {
            return Ok(Odometer::Scalar(ScalarOdometer::new()));
        }
        let plain: Option<Vec<Slice>> = slices
            .iter()
            .map(|axis| match axis {
                AxisSlice::Single(s) => Some(*s),
                AxisSlice::Multi(_) => None,
            })
            .collect();
        let plain = match plain {
            Some(plain) => plain,
            None => return MultiOdometer::new(slices, dimsizes, options).map(Odometer::Multi),
        };
        let odometer = PlainOdometer::new(plain, dimsizes.to_vec())?;
        debug!(
            rank = odometer.rank(),
            total = odometer.total_size(),
            "building odometer"
        );
        Ok(Odometer::Plain(odometer))
    }

    pub fn rank(&self) -> usize {
        match self {
            Odometer::Scalar(_) => 0,
            Odometer::Plain(o) => o.rank(),
            Odometer::Multi(o) => o.rank(),
        }
    }

    /// Number of indices the full iteration yields, independent of
    /// progress.
    pub fn total_size(&self) -> Ix {
        match self {
            Odometer::Scalar(_) => 1,
            Odometer::Plain(o) => o.total_size(),
            Odometer::Multi(o) => o.total_size(),
        }
    }

    /// Whether successive indices address adjacent elements along every
    /// dimension, i.e. all strides are 1 and no list-valued dimension is
    /// involved.
    pub fn is_contiguous(&self) -> bool {
        match self {
            Odometer::Scalar(_) => true,
            Odometer::Plain(o) => o.is_contiguous(),
            Odometer::Multi(_) => false,
        }
    }

    pub fn has_next(&mut self) -> bool {
        match self {
            Odometer::Scalar(o) => o.has_next(),
            Odometer::Plain(o) => o.has_next(),
            Odometer::Multi(o) => o.has_next(),
        }
    }

    /// Emit the next index.
    ///
    /// **Errors** with `NoSuchElement` once the odometer is exhausted.
    pub fn try_next(&mut self) -> Result<Index, SliceError> {
        match self {
            Odometer::Scalar(o) => o.try_next(),
            Odometer::Plain(o) => o.try_next(),
            Odometer::Multi(o) => o.try_next(),
        }
    }

    /// Map the remaining indices to their row-major offsets.
    pub fn offsets(self) -> impl Iterator<Item = Result<Ix, SliceError>> {
        self.map(|ix| ix.offset())
    }

    pub(crate) fn remaining(&self) -> Ix {
        match self {
            Odometer::Scalar(o) => o.remaining(),
            Odometer::Plain(o) => o.remaining(),
            Odometer::Multi(o) => o.remaining(),
        }
    }
}

impl Iterator for Odometer {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        if self.has_next() {
            self.try_next().ok()
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Odometer {}
