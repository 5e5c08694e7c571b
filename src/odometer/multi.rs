// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tracing::{debug, trace};

use super::plain::exhausted;
use super::{Odometer, OdometerOptions};
use crate::error::{overflow, SliceError};
use crate::index::Index;
use crate::multi_slice::AxisSlice;
use crate::powerset::PowerSet;
use crate::Ix;

/// Odometer over a selection where at least one dimension is a
/// [`MultiSlice`](crate::MultiSlice).
///
/// Every combination of sub-slice picks (one per dimension, in
/// [`PowerSet`] row order) gets its own plain child odometer; the emitted
/// sequence is the concatenation of the children's sequences.
#[derive(Clone, Debug)]
pub struct MultiOdometer {
    slices: Vec<AxisSlice>,
    odometers: Vec<Odometer>,
    current: usize,
    total: Ix,
}

impl MultiOdometer {
    pub fn new(
        slices: &[AxisSlice],
        dimsizes: &[Ix],
        options: &OdometerOptions,
    ) -> Result<MultiOdometer, SliceError> {
        let alphabet: Vec<Ix> = slices.iter().map(|s| s.sub_slices().len()).collect();
        let powerset = PowerSet::new(&alphabet)?;
        debug!(
            rank = slices.len(),
            combinations = powerset.total(),
            "building multi odometer"
        );
        let mut odometers = Vec::with_capacity(powerset.total());
        let mut total: Ix = 0;
        for row in &powerset {
            if options.is_tracing_powerset() {
                trace!(row = ?row, "powerset row");
            }
            let picked: Vec<AxisSlice> = row
                .iter()
                .zip(slices)
                .map(|(&pick, axis)| AxisSlice::Single(axis.sub_slices()[pick]))
                .collect();
            let child = Odometer::with_dimensions(&picked, dimsizes, options)?;
            total = total
                .checked_add(child.total_size())
                .ok_or_else(|| overflow("selection size"))?;
            odometers.push(child);
        }
        Ok(MultiOdometer {
            slices: slices.to_vec(),
            odometers,
            current: 0,
            total,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.slices.len()
    }

    pub fn slices(&self) -> &[AxisSlice] {
        &self.slices
    }

    /// The child odometers in enumeration order.
    pub fn odometers(&self) -> &[Odometer] {
        &self.odometers
    }

    /// Sum of the children's sizes.
    #[inline]
    pub fn total_size(&self) -> Ix {
        self.total
    }

    /// Advances past exhausted children.
    pub fn has_next(&mut self) -> bool {
        while let Some(child) = self.odometers.get_mut(self.current) {
            if child.has_next() {
                return true;
            }
            self.current += 1;
        }
        false
    }

    pub fn try_next(&mut self) -> Result<Index, SliceError> {
        if !self.has_next() {
            return Err(exhausted());
        }
        self.odometers[self.current].try_next()
    }

    pub(crate) fn remaining(&self) -> Ix {
        self.odometers
            .iter()
            .skip(self.current)
            .map(Odometer::remaining)
            .sum()
    }
}
