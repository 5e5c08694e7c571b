// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use itertools::izip;

use crate::error::{from_kind, overflow, rank_mismatch, ErrorKind, SliceError};
use crate::index::Index;
use crate::slice::Slice;
use crate::Ix;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Initial,
    Started,
    Done,
}

pub(crate) fn exhausted() -> SliceError {
    from_kind(ErrorKind::NoSuchElement, "odometer is exhausted")
}

/// Odometer for a rank 0 selection: emits the scalar index once.
#[derive(Clone, Debug)]
pub struct ScalarOdometer {
    state: State,
}

impl ScalarOdometer {
    pub fn new() -> ScalarOdometer {
        ScalarOdometer {
            state: State::Initial,
        }
    }

    pub fn has_next(&mut self) -> bool {
        self.state == State::Initial
    }

    pub fn try_next(&mut self) -> Result<Index, SliceError> {
        match self.state {
            State::Initial => {
                self.state = State::Done;
                Ok(Index::scalar())
            }
            _ => Err(exhausted()),
        }
    }

    pub(crate) fn remaining(&self) -> Ix {
        if self.state == State::Initial {
            1
        } else {
            0
        }
    }
}

impl Default for ScalarOdometer {
    fn default() -> Self {
        Self::new()
    }
}

/// Row-major odometer over one plain slice per dimension.
///
/// The last dimension varies fastest. The first emitted index is the tuple
/// of every slice's `first`; each further step increments the fastest
/// dimension that can still move by its stride, resetting the faster ones
/// to their `first`, like a mechanical counter with carry.
#[derive(Clone, Debug)]
pub struct PlainOdometer {
    slices: Vec<Slice>,
    // last - stride: the largest value that can still take a step
    endpoints: Vec<Option<Ix>>,
    index: Index,
    state: State,
    total: Ix,
    emitted: Ix,
}

impl PlainOdometer {
    /// Create an odometer whose indices are relative to `dimsizes`.
    ///
    /// **Errors** with `RankMismatch` if `dimsizes` and `slices` differ in
    /// length and with `Overflow` if the selection size cannot be
    /// represented.
    pub fn new(slices: Vec<Slice>, dimsizes: Vec<Ix>) -> Result<PlainOdometer, SliceError> {
        if slices.len() != dimsizes.len() {
            return Err(rank_mismatch(dimsizes.len(), slices.len()));
        }
        let total = slices.iter().try_fold(1 as Ix, |acc, s| {
            acc.checked_mul(s.count())
                .ok_or_else(|| overflow("selection size"))
        })?;
        let endpoints = slices
            .iter()
            .map(|s| s.last().and_then(|last| last.checked_sub(s.stride())))
            .collect();
        let firsts = slices.iter().map(Slice::first).collect();
        let index = Index::new(firsts, dimsizes)?;
        // zero-count dimensions produce no iteration work at all
        let state = if total == 0 { State::Done } else { State::Initial };
        Ok(PlainOdometer {
            slices,
            endpoints,
            index,
            state,
            total,
            emitted: 0,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.slices.len()
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Number of indices the full iteration yields, `Π count`.
    #[inline]
    pub fn total_size(&self) -> Ix {
        self.total
    }

    /// The most recently emitted index (the start position before the
    /// first call to `try_next`).
    pub fn current(&self) -> &Index {
        &self.index
    }

    /// Whether every dimension is read with stride 1.
    pub fn is_contiguous(&self) -> bool {
        self.slices.iter().all(|s| s.stride() == 1)
    }

    pub fn has_next(&mut self) -> bool {
        match self.state {
            State::Initial => true,
            State::Done => false,
            State::Started => {
                let movable = izip!(self.index.indices(), &self.endpoints)
                    .rev()
                    .any(|(&ix, endpoint)| can_step(ix, *endpoint));
                if !movable {
                    self.state = State::Done;
                }
                movable
            }
        }
    }

    /// Emit the next index.
    ///
    /// **Errors** with `NoSuchElement` once the odometer is exhausted.
    pub fn try_next(&mut self) -> Result<Index, SliceError> {
        match self.state {
            State::Initial => {
                self.state = State::Started;
            }
            State::Started => {
                if !self.step() {
                    self.state = State::Done;
                    return Err(exhausted());
                }
            }
            State::Done => return Err(exhausted()),
        }
        self.emitted += 1;
        Ok(self.index.clone())
    }

    pub(crate) fn remaining(&self) -> Ix {
        match self.state {
            State::Done => 0,
            _ => self.total - self.emitted,
        }
    }

    /// One carry step; returns `false` if no dimension could move.
    fn step(&mut self) -> bool {
        let indices = self.index.indices_mut();
        for (ix, slice, &endpoint) in izip!(indices.iter_mut(), &self.slices, &self.endpoints).rev() {
            if can_step(*ix, endpoint) {
                *ix += slice.stride();
                return true;
            }
            *ix = slice.first();
        }
        false
    }
}

#[inline]
fn can_step(ix: Ix, endpoint: Option<Ix>) -> bool {
    endpoint.map_or(false, |e| ix <= e)
}
