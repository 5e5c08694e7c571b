// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::types::AtomicType;

/// An error related to slice validation, composition or odometer iteration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{repr}: {detail}")]
pub struct SliceError {
    // we want to be able to change this representation later
    repr: ErrorKind,
    detail: String,
}

impl SliceError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.repr
    }

    /// Human readable context attached when the error was raised.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Error code for an error related to slices and odometers.
///
/// This enumeration is not exhaustive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// slice fields violate the finished-slice invariants
    InvalidSlice,
    /// an index maps outside of the slice or vector it addresses
    IndexOutOfRange,
    /// number of slices disagrees with the number of dimensions
    RankMismatch,
    /// iteration requested past exhaustion
    NoSuchElement,
    /// a size or offset product cannot be represented
    Overflow,
}

impl ErrorKind {
    fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidSlice => "invalid slice",
            ErrorKind::IndexOutOfRange => "index out of range",
            ErrorKind::RankMismatch => "rank mismatch",
            ErrorKind::NoSuchElement => "no such element",
            ErrorKind::Overflow => "arithmetic overflow",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[inline(always)]
pub(crate) fn from_kind(k: ErrorKind, detail: impl Into<String>) -> SliceError {
    SliceError {
        repr: k,
        detail: detail.into(),
    }
}

pub(crate) fn invalid_slice(detail: impl Into<String>) -> SliceError {
    from_kind(ErrorKind::InvalidSlice, detail)
}

pub(crate) fn overflow(what: &str) -> SliceError {
    from_kind(ErrorKind::Overflow, format!("{} does not fit in usize", what))
}

pub(crate) fn rank_mismatch(expected: usize, got: usize) -> SliceError {
    from_kind(
        ErrorKind::RankMismatch,
        format!("expected {} dimensions, got {}", expected, got),
    )
}

/// Errors raised by the atomic type conversion layer.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("vector holds {found} values but the type is {expected}")]
    TypeMismatch {
        expected: AtomicType,
        found: AtomicType,
    },

    #[error("enumeration type has no declaration")]
    UndeclaredEnum,

    #[error("cannot convert: {src} -> {dst}")]
    Unsupported { src: AtomicType, dst: AtomicType },

    #[error("expected {expected} value: {value:?}")]
    Conversion {
        expected: AtomicType,
        value: String,
    },

    #[error("illegal enum constant {constant:?} for enumeration {enumeration}")]
    IllegalEnumConstant {
        enumeration: String,
        constant: String,
    },

    #[error("index {index} out of range for vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Any error produced by this crate.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Slice(#[from] SliceError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}
