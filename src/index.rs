// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops;

use itertools::{izip, Itertools};

use crate::error::{from_kind, overflow, rank_mismatch, ErrorKind, SliceError};
use crate::Ix;

/// A coordinate tuple together with the dimension extents it is relative to.
///
/// The extents are only used to flatten the coordinates into a row-major
/// offset, `Σ indices[i] * Π_{j>i} dimsizes[j]`, and back. A rank 0 index
/// denotes a scalar whose offset is always 0.
///
/// ```
/// use d4slice::Index;
///
/// let ix = Index::new(vec![1, 2], vec![3, 4]).unwrap();
/// assert_eq!(ix.offset().unwrap(), 6);
/// assert_eq!(Index::from_offset(6, vec![3, 4]).unwrap(), ix);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    indices: Vec<Ix>,
    dimsizes: Vec<Ix>,
}

impl Index {
    /// Create an index from coordinates and the matching extents.
    ///
    /// Fails with `RankMismatch` if the two lists differ in length.
    pub fn new(indices: Vec<Ix>, dimsizes: Vec<Ix>) -> Result<Index, SliceError> {
        if indices.len() != dimsizes.len() {
            return Err(rank_mismatch(dimsizes.len(), indices.len()));
        }
        Ok(Index { indices, dimsizes })
    }

    /// The all-zero index for the given extents.
    pub fn zeros(dimsizes: Vec<Ix>) -> Index {
        Index {
            indices: vec![0; dimsizes.len()],
            dimsizes,
        }
    }

    /// The rank 0 index.
    pub fn scalar() -> Index {
        Index {
            indices: Vec::new(),
            dimsizes: Vec::new(),
        }
    }

    /// Recover the coordinates of the row-major `offset` within `dimsizes`.
    ///
    /// Fails with `IndexOutOfRange` if `offset` is not smaller than the
    /// product of the extents.
    pub fn from_offset(offset: Ix, dimsizes: Vec<Ix>) -> Result<Index, SliceError> {
        let size = product(&dimsizes)?;
        if offset >= size {
            return Err(from_kind(
                ErrorKind::IndexOutOfRange,
                format!("offset {} out of range for extents {:?}", offset, dimsizes),
            ));
        }
        let mut indices = vec![0; dimsizes.len()];
        let mut rest = offset;
        for (ix, &dim) in indices.iter_mut().zip(&dimsizes).rev() {
            *ix = rest % dim;
            rest /= dim;
        }
        Ok(Index { indices, dimsizes })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.indices.is_empty()
    }

    /// The coordinates.
    pub fn indices(&self) -> &[Ix] {
        &self.indices
    }

    /// The extents the coordinates are relative to.
    pub fn dimsizes(&self) -> &[Ix] {
        &self.dimsizes
    }

    /// Number of elements addressable through the extents.
    pub fn size(&self) -> Result<Ix, SliceError> {
        product(&self.dimsizes)
    }

    pub fn get(&self, dim: usize) -> Option<Ix> {
        self.indices.get(dim).copied()
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [Ix] {
        &mut self.indices
    }

    /// Row-major offset of this index.
    ///
    /// Fails with `Overflow` if the offset cannot be represented.
    pub fn offset(&self) -> Result<Ix, SliceError> {
        let mut offset: Ix = 0;
        // None once the weight itself no longer fits; only an error if a
        // nonzero coordinate needs it
        let mut weight = Some(1 as Ix);
        for (&ix, &dim) in izip!(&self.indices, &self.dimsizes).rev() {
            if ix != 0 {
                let term = weight
                    .and_then(|w| ix.checked_mul(w))
                    .ok_or_else(|| overflow("index offset"))?;
                offset = offset
                    .checked_add(term)
                    .ok_or_else(|| overflow("index offset"))?;
            }
            weight = weight.and_then(|w| w.checked_mul(dim));
        }
        Ok(offset)
    }
}

impl ops::Index<usize> for Index {
    type Output = Ix;

    fn index(&self, dim: usize) -> &Ix {
        &self.indices[dim]
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.indices.iter().join(","))
    }
}

/// Checked product of extents; the empty product is 1.
pub(crate) fn product(dims: &[Ix]) -> Result<Ix, SliceError> {
    dims.iter().try_fold(1 as Ix, |acc, &d| {
        acc.checked_mul(d)
            .ok_or_else(|| overflow("dimension product"))
    })
}
