// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![crate_name = "d4slice"]
#![doc(html_root_url = "https://docs.rs/d4slice/0.1/")]
#![warn(missing_debug_implementations)]
#![allow(clippy::len_without_is_empty, clippy::new_without_default)]

//! The `d4slice` crate is the array subsetting and type coercion engine of
//! a DAP4 style data access server.
//!
//! - [`Slice`] and [`MultiSlice`] describe what a request selects along one
//!   dimension; [`SliceSpec::finish`] repairs and validates a partially
//!   specified selection.
//! - [`Odometer`] enumerates the coordinates ([`Index`]) a list of
//!   per-dimension selections addresses, in row-major order. List valued
//!   dimensions go through [`MultiOdometer`] and [`PowerSet`].
//! - [`Slice::compose`] maps a selection made on an already subset view back
//!   to the coordinates of the underlying variable.
//! - [`convert()`] moves [`TypedVector`] values between the protocol's atomic
//!   types, forcing ranges and preserving unsigned bit patterns.
//!
//! ## Crate feature flags
//!
//! - `serde`
//!   - Optional, compatible with Rust stable
//!   - Enables serialization support for selections and the type model
//!
//! ## Logging
//!
//! Odometer construction emits `tracing` events at `debug` level. With
//! [`OdometerOptions::trace_powerset`] every sub-slice combination is also
//! logged at `trace` level. The crate never installs a subscriber.

mod convert;
mod error;
mod index;
mod multi_slice;
mod odometer;
mod powerset;
mod slice;
mod types;
pub mod vector;

pub use crate::convert::{convert, force_range, force_range_f64};
pub use crate::error::{ConvertError, Error, ErrorKind, SliceError};
pub use crate::index::Index;
pub use crate::multi_slice::{constraint_string, AxisSlice, MultiSlice};
pub use crate::odometer::{MultiOdometer, Odometer, OdometerOptions, PlainOdometer, ScalarOdometer};
pub use crate::powerset::{PowerSet, PowerSetIter};
pub use crate::slice::{Slice, SliceIterator, SliceSpec};
pub use crate::types::{AtomicType, DapType, EnumConst, EnumType};
pub use crate::vector::{TypedVector, Value};

/// Array index type
pub type Ix = usize;
