// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::error::{overflow, SliceError};
use crate::Ix;

/// Enumerates every combination of per-dimension choices.
///
/// `sizes[i]` is the number of choices ("alphabet size") in dimension `i`.
/// Rows come out in mixed-radix counting order with the last dimension
/// incrementing fastest, the same carry order the odometers use.
///
/// ```
/// use d4slice::PowerSet;
///
/// let ps = PowerSet::new(&[2, 3]).unwrap();
/// assert_eq!(ps.total(), 6);
/// assert_eq!(ps.generate()[..4], [[0, 0], [0, 1], [0, 2], [1, 0]]);
/// ```
///
/// The table is materialized by [`.generate()`](PowerSet::generate); callers
/// must bound [`.total()`](PowerSet::total) first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerSet {
    sizes: Vec<Ix>,
    total: Ix,
}

impl PowerSet {
    /// **Errors** with `Overflow` if the product of `sizes` cannot be
    /// represented.
    pub fn new(sizes: &[Ix]) -> Result<PowerSet, SliceError> {
        let total = sizes.iter().try_fold(1 as Ix, |acc, &n| {
            acc.checked_mul(n).ok_or_else(|| overflow("powerset total"))
        })?;
        Ok(PowerSet {
            sizes: sizes.to_vec(),
            total,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    /// The alphabet sizes.
    pub fn sizes(&self) -> &[Ix] {
        &self.sizes
    }

    /// Number of rows, the product of the alphabet sizes.
    #[inline]
    pub fn total(&self) -> Ix {
        self.total
    }

    /// Produce all `total` rows.
    pub fn generate(&self) -> Vec<Vec<Ix>> {
        self.iter().collect()
    }

    /// Lazily iterate the rows.
    pub fn iter(&self) -> PowerSetIter<'_> {
        PowerSetIter {
            sizes: &self.sizes,
            row: if self.total == 0 {
                None
            } else {
                Some(vec![0; self.sizes.len()])
            },
            remaining: self.total,
        }
    }
}

impl<'a> IntoIterator for &'a PowerSet {
    type Item = Vec<Ix>;
    type IntoIter = PowerSetIter<'a>;

    fn into_iter(self) -> PowerSetIter<'a> {
        self.iter()
    }
}

/// An iterator over the rows of a [`PowerSet`].
///
/// Iterator element type is `Vec<Ix>`.
#[derive(Clone, Debug)]
pub struct PowerSetIter<'a> {
    sizes: &'a [Ix],
    row: Option<Vec<Ix>>,
    remaining: Ix,
}

impl<'a> Iterator for PowerSetIter<'a> {
    type Item = Vec<Ix>;

    fn next(&mut self) -> Option<Vec<Ix>> {
        let row = self.row.take()?;
        self.remaining -= 1;
        let mut next = row.clone();
        let mut carried = true;
        for (counter, &size) in next.iter_mut().zip(self.sizes).rev() {
            *counter += 1;
            if *counter == size {
                *counter = 0;
            } else {
                carried = false;
                break;
            }
        }
        if !carried {
            self.row = Some(next);
        }
        Some(row)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for PowerSetIter<'a> {}
