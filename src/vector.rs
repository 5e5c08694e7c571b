// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Homogeneous typed vectors and the type-tag-dispatched primitives over
//! them.

use crate::convert::convert;
use crate::error::{ConvertError, Error};
use crate::odometer::Odometer;
use crate::types::{AtomicType, DapType};
use crate::Ix;

/// A homogeneous vector of values of one atomic type.
///
/// Unsigned types use Rust's unsigned storage; `Char` is one byte per
/// value. Enumeration values live in the variant of their base type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedVector {
    Char(Vec<u8>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Opaque(Vec<Vec<u8>>),
}

/// A single value, as read from or written to a [`TypedVector`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Char(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Opaque(Vec<u8>),
}

macro_rules! impl_vector_access {
    ($($kind:ident),* $(,)?) => {
        impl TypedVector {
            /// The atomic type of the storage variant.
            pub fn storage(&self) -> AtomicType {
                match self {
                    $(TypedVector::$kind(_) => AtomicType::$kind,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(TypedVector::$kind(v) => v.len(),)*
                }
            }

            fn zeros(ty: AtomicType, count: usize) -> Option<TypedVector> {
                match ty {
                    $(AtomicType::$kind => Some(TypedVector::$kind(vec![Default::default(); count])),)*
                    _ => None,
                }
            }

            fn value_at(&self, i: usize) -> Option<Value> {
                match self {
                    $(TypedVector::$kind(v) => v.get(i).cloned().map(Value::$kind),)*
                }
            }

            /// Returns the rejected value if the variants disagree.
            fn store(&mut self, i: usize, value: Value) -> Result<(), Value> {
                match (self, value) {
                    $((TypedVector::$kind(v), Value::$kind(x)) => {
                        v[i] = x;
                        Ok(())
                    })*
                    (_, value) => Err(value),
                }
            }

            /// Overwrite `dst` with `self[offset..offset + dst.len()]`.
            fn copy_into(&self, offset: usize, dst: &mut TypedVector) -> bool {
                match (self, dst) {
                    $((TypedVector::$kind(s), TypedVector::$kind(d)) => {
                        let n = d.len();
                        d.clone_from_slice(&s[offset..offset + n]);
                        true
                    })*
                    _ => false,
                }
            }

            fn select(&self, offsets: &[Ix]) -> Result<TypedVector, ConvertError> {
                let len = self.len();
                let missing = |&index: &Ix| ConvertError::IndexOutOfRange { index, len };
                match self {
                    $(TypedVector::$kind(v) => offsets
                        .iter()
                        .map(|off| v.get(*off).cloned().ok_or_else(|| missing(off)))
                        .collect::<Result<Vec<_>, _>>()
                        .map(TypedVector::$kind),)*
                }
            }
        }

        impl Value {
            pub fn atomic_type(&self) -> AtomicType {
                match self {
                    $(Value::$kind(_) => AtomicType::$kind,)*
                }
            }
        }
    };
}

impl_vector_access!(
    Char, Int8, UInt8, Int16, UInt16, Int32, UInt32, Int64, UInt64, Float32, Float64, String,
    Opaque,
);

impl TypedVector {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check that `vector`'s storage is the one `ty` calls for.
pub fn check(ty: &DapType, vector: &TypedVector) -> Result<(), ConvertError> {
    let expected = ty.storage_type();
    if expected == AtomicType::Enum {
        return Err(ConvertError::UndeclaredEnum);
    }
    if vector.storage() != expected {
        return Err(ConvertError::TypeMismatch {
            expected,
            found: vector.storage(),
        });
    }
    Ok(())
}

/// A vector of `count` default values (zero, empty string, empty blob).
pub fn create_vector(ty: &DapType, count: usize) -> Result<TypedVector, ConvertError> {
    TypedVector::zeros(ty.storage_type(), count).ok_or(ConvertError::UndeclaredEnum)
}

/// Read element `i`.
pub fn get(ty: &DapType, vector: &TypedVector, i: usize) -> Result<Value, ConvertError> {
    check(ty, vector)?;
    vector
        .value_at(i)
        .ok_or(ConvertError::IndexOutOfRange {
            index: i,
            len: vector.len(),
        })
}

/// Overwrite element `i` with `value`.
pub fn put(ty: &DapType, vector: &mut TypedVector, i: usize, value: Value) -> Result<(), ConvertError> {
    check(ty, vector)?;
    if i >= vector.len() {
        return Err(ConvertError::IndexOutOfRange {
            index: i,
            len: vector.len(),
        });
    }
    let expected = vector.storage();
    vector.store(i, value).map_err(|v| ConvertError::TypeMismatch {
        expected,
        found: v.atomic_type(),
    })
}

/// Fill `dst` with the elements of `src` starting at `offset`.
pub fn copy_subrange(
    ty: &DapType,
    src: &TypedVector,
    offset: usize,
    dst: &mut TypedVector,
) -> Result<(), ConvertError> {
    check(ty, src)?;
    check(ty, dst)?;
    let end = offset.checked_add(dst.len());
    match end {
        Some(end) if end <= src.len() => {}
        _ => {
            return Err(ConvertError::IndexOutOfRange {
                index: end.unwrap_or(usize::MAX),
                len: src.len(),
            })
        }
    }
    // storages were checked equal above
    let copied = src.copy_into(offset, dst);
    debug_assert!(copied);
    Ok(())
}

/// Convert an unsigned vector to the next wider signed type, see
/// [`AtomicType::upcast`].
pub fn upcast_vector(ty: &DapType, vector: TypedVector) -> Result<(DapType, TypedVector), ConvertError> {
    let wide = ty.upcast();
    let vector = convert(&wide, ty, vector)?;
    Ok((wide, vector))
}

/// Collect the elements of `src` addressed by every index `odometer`
/// yields, in iteration order.
///
/// The odometer's indices are flattened with their own extents, which must
/// describe `src`'s layout.
pub fn gather(ty: &DapType, src: &TypedVector, odometer: Odometer) -> Result<TypedVector, Error> {
    check(ty, src)?;
    let offsets = odometer.offsets().collect::<Result<Vec<_>, _>>()?;
    Ok(src.select(&offsets)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_put() {
        let mut v = create_vector(&DapType::INT16, 3).unwrap();
        assert_eq!(v, TypedVector::Int16(vec![0, 0, 0]));
        put(&DapType::INT16, &mut v, 1, Value::Int16(-7)).unwrap();
        assert_eq!(get(&DapType::INT16, &v, 1).unwrap(), Value::Int16(-7));

        let err = put(&DapType::INT16, &mut v, 0, Value::Int32(1)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::TypeMismatch {
                expected: AtomicType::Int16,
                found: AtomicType::Int32
            }
        );
        let err = get(&DapType::INT16, &v, 3).unwrap_err();
        assert_eq!(err, ConvertError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn representation_must_match_tag() {
        let v = TypedVector::UInt8(vec![1, 2]);
        assert!(get(&DapType::UINT8, &v, 0).is_ok());
        assert!(matches!(
            get(&DapType::CHAR, &v, 0),
            Err(ConvertError::TypeMismatch { .. })
        ));
        assert_eq!(
            create_vector(&DapType::Atomic(AtomicType::Enum), 1),
            Err(ConvertError::UndeclaredEnum)
        );
    }

    #[test]
    fn subrange() {
        let src = TypedVector::String(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let mut dst = create_vector(&DapType::STRING, 2).unwrap();
        copy_subrange(&DapType::STRING, &src, 1, &mut dst).unwrap();
        assert_eq!(dst, TypedVector::String(vec!["b".into(), "c".into()]));
        let err = copy_subrange(&DapType::STRING, &src, 3, &mut dst).unwrap_err();
        assert!(matches!(err, ConvertError::IndexOutOfRange { .. }));
    }
}
