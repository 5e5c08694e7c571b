// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of typed vectors between atomic types.
//!
//! Every conversion goes through one of three intermediate forms: 64-bit
//! signed integers, 64-bit floats or strings (opaque blobs pass through
//! untouched). Unsigned sources are zero extended into the integer form and
//! unsigned destinations are masked out of it, so bit patterns survive a
//! round trip.

use num_traits::AsPrimitive;
use tracing::trace;

use crate::error::ConvertError;
use crate::types::{AtomicType, DapType, EnumType};
use crate::vector::{check, TypedVector};

/// Force `value` into the range of the integer or char type `ty`.
///
/// Signed types clamp to their bounds, unsigned types keep the low bits of
/// their width and `Char` clamps to `0..=255`. `Int64`, `UInt64` and the
/// non-integer types return `value` unchanged.
///
/// ```
/// use d4slice::{force_range, AtomicType};
///
/// assert_eq!(force_range(AtomicType::Int16, 100000), 32767);
/// assert_eq!(force_range(AtomicType::UInt16, 0x1FFFF), 0xFFFF);
/// ```
pub fn force_range(ty: AtomicType, value: i64) -> i64 {
    match ty {
        AtomicType::Char => value.clamp(0, 255),
        AtomicType::Int8 => value.clamp(i8::MIN.into(), i8::MAX.into()),
        AtomicType::Int16 => value.clamp(i16::MIN.into(), i16::MAX.into()),
        AtomicType::Int32 => value.clamp(i32::MIN.into(), i32::MAX.into()),
        AtomicType::UInt8 => value & 0xFF,
        AtomicType::UInt16 => value & 0xFFFF,
        AtomicType::UInt32 => value & 0xFFFF_FFFF,
        _ => value,
    }
}

/// Floating point counterpart of [`force_range`]: `Float32` rounds through
/// `f32`, integer types truncate toward zero and then force their range.
pub fn force_range_f64(ty: AtomicType, value: f64) -> f64 {
    match ty {
        AtomicType::Float32 => value as f32 as f64,
        // the masked bit pattern, read back as unsigned
        AtomicType::UInt64 => value as i64 as u64 as f64,
        t if t.is_integer() || t.is_char() => force_range(t, value as i64) as f64,
        _ => value,
    }
}

/// Intermediate form of a vector under conversion.
enum Normalized {
    Long(Vec<i64>),
    Double(Vec<f64>),
    Text(Vec<String>),
    Opaque(Vec<Vec<u8>>),
}

fn widen<T: AsPrimitive<i64>>(values: Vec<T>) -> Vec<i64> {
    values.into_iter().map(AsPrimitive::<i64>::as_).collect()
}

fn narrow<T>(ty: AtomicType, values: Vec<i64>) -> Vec<T>
where
    T: Copy + 'static,
    i64: AsPrimitive<T>,
{
    values
        .into_iter()
        .map(|v| AsPrimitive::<T>::as_(force_range(ty, v)))
        .collect()
}

fn normalize(vector: TypedVector) -> Normalized {
    match vector {
        TypedVector::Char(v) => Normalized::Long(widen(v)),
        TypedVector::Int8(v) => Normalized::Long(widen(v)),
        TypedVector::UInt8(v) => Normalized::Long(widen(v)),
        TypedVector::Int16(v) => Normalized::Long(widen(v)),
        TypedVector::UInt16(v) => Normalized::Long(widen(v)),
        TypedVector::Int32(v) => Normalized::Long(widen(v)),
        TypedVector::UInt32(v) => Normalized::Long(widen(v)),
        TypedVector::Int64(v) => Normalized::Long(v),
        // bit pattern kept; the source tag says how to read it back
        TypedVector::UInt64(v) => Normalized::Long(widen(v)),
        TypedVector::Float32(v) => Normalized::Double(v.into_iter().map(f64::from).collect()),
        TypedVector::Float64(v) => Normalized::Double(v),
        TypedVector::String(v) => Normalized::Text(v),
        TypedVector::Opaque(v) => Normalized::Opaque(v),
    }
}

/// Store already range-forced integers in the variant of `ty`.
fn integers(ty: AtomicType, values: Vec<i64>) -> Option<TypedVector> {
    let vector = match ty {
        AtomicType::Char => TypedVector::Char(narrow(ty, values)),
        AtomicType::Int8 => TypedVector::Int8(narrow(ty, values)),
        AtomicType::UInt8 => TypedVector::UInt8(narrow(ty, values)),
        AtomicType::Int16 => TypedVector::Int16(narrow(ty, values)),
        AtomicType::UInt16 => TypedVector::UInt16(narrow(ty, values)),
        AtomicType::Int32 => TypedVector::Int32(narrow(ty, values)),
        AtomicType::UInt32 => TypedVector::UInt32(narrow(ty, values)),
        AtomicType::Int64 => TypedVector::Int64(values),
        AtomicType::UInt64 => TypedVector::UInt64(narrow(ty, values)),
        _ => return None,
    };
    Some(vector)
}

/// Parse an integer literal, keeping the low 64 bits of values that do not
/// fit `i64`.
fn parse_long(expected: AtomicType, text: &str) -> Result<i64, ConvertError> {
    text.trim()
        .parse::<i128>()
        .map(|v| v as i64)
        .map_err(|_| ConvertError::Conversion {
            expected,
            value: text.to_string(),
        })
}

fn parse_double(expected: AtomicType, text: &str) -> Result<f64, ConvertError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ConvertError::Conversion {
            expected,
            value: text.to_string(),
        })
}

/// A character literal is its code; anything else must be an integer.
fn parse_char(text: &str) -> Result<i64, ConvertError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(u32::from(c).into()),
        _ => parse_long(AtomicType::Char, text),
    }
}

fn unsupported(src: AtomicType, dst: AtomicType) -> ConvertError {
    ConvertError::Unsupported { src, dst }
}

/// Convert `vector`, whose values are of type `src`, to type `dst`.
///
/// **Errors** with `TypeMismatch` if `vector` is not stored as `src`
/// requires, with `Unsupported` for type pairs that cannot be converted,
/// with `Conversion` for text that does not parse, and with
/// `IllegalEnumConstant` for values an enumeration does not declare.
///
/// ```
/// use d4slice::{convert, DapType, TypedVector};
///
/// let wide = convert(&DapType::INT64, &DapType::UINT8, TypedVector::UInt8(vec![0, 128, 255])).unwrap();
/// assert_eq!(wide, TypedVector::Int64(vec![0, 128, 255]));
/// ```
pub fn convert(dst: &DapType, src: &DapType, vector: TypedVector) -> Result<TypedVector, ConvertError> {
    check(src, &vector)?;
    if dst == src {
        return Ok(vector);
    }
    trace!(%src, %dst, len = vector.len(), "converting vector");
    let src_kind = src.storage_type();
    let dst_kind = dst.storage_type();
    let values = normalize(vector);

    if let DapType::Enum(e) = src {
        if dst_kind == AtomicType::String {
            if let Normalized::Long(values) = values {
                return enum_names(e, values).map(TypedVector::String);
            }
        }
    }
    if let DapType::Enum(e) = dst {
        return to_enum(e, src_kind, values);
    }

    match values {
        Normalized::Opaque(v) => match dst_kind {
            AtomicType::Opaque => Ok(TypedVector::Opaque(v)),
            _ => Err(unsupported(src_kind, dst_kind)),
        },
        Normalized::Long(v) => from_long(dst_kind, src_kind, v),
        Normalized::Double(v) => from_double(dst_kind, src_kind, v),
        Normalized::Text(v) => from_text(dst_kind, v),
    }
}

fn floats<T>(src: AtomicType, values: Vec<i64>) -> Vec<T>
where
    T: Copy + 'static,
    i64: AsPrimitive<T>,
    u64: AsPrimitive<T>,
{
    if src == AtomicType::UInt64 {
        values.into_iter().map(|v| AsPrimitive::<T>::as_(v as u64)).collect()
    } else {
        values.into_iter().map(AsPrimitive::<T>::as_).collect()
    }
}

fn from_long(dst: AtomicType, src: AtomicType, values: Vec<i64>) -> Result<TypedVector, ConvertError> {
    match dst {
        t if t.is_integer() || t.is_char() => integers(dst, values).ok_or_else(|| unsupported(src, dst)),
        AtomicType::Float32 | AtomicType::Float64 if src.is_char() => Err(unsupported(src, dst)),
        AtomicType::Float32 => Ok(TypedVector::Float32(floats(src, values))),
        AtomicType::Float64 => Ok(TypedVector::Float64(floats(src, values))),
        AtomicType::String => Ok(TypedVector::String(
            values
                .into_iter()
                .map(|v| match src {
                    AtomicType::Char => char::from(v as u8).to_string(),
                    AtomicType::UInt64 => (v as u64).to_string(),
                    _ => v.to_string(),
                })
                .collect(),
        )),
        _ => Err(unsupported(src, dst)),
    }
}

fn from_double(dst: AtomicType, src: AtomicType, values: Vec<f64>) -> Result<TypedVector, ConvertError> {
    match dst {
        AtomicType::Char | AtomicType::Opaque | AtomicType::Enum => Err(unsupported(src, dst)),
        AtomicType::Float32 => Ok(TypedVector::Float32(values.into_iter().map(|v| v as f32).collect())),
        AtomicType::Float64 => Ok(TypedVector::Float64(values)),
        AtomicType::String => Ok(TypedVector::String(
            values
                .into_iter()
                .map(|v| match src {
                    AtomicType::Float32 => (v as f32).to_string(),
                    _ => v.to_string(),
                })
                .collect(),
        )),
        _ => {
            // saturating truncation toward zero
            let longs = values.into_iter().map(|v| v as i64).collect();
            integers(dst, longs).ok_or_else(|| unsupported(src, dst))
        }
    }
}

fn from_text(dst: AtomicType, values: Vec<String>) -> Result<TypedVector, ConvertError> {
    let src = AtomicType::String;
    match dst {
        AtomicType::String => Ok(TypedVector::String(values)),
        AtomicType::Char => {
            let codes = values
                .iter()
                .map(|s| parse_char(s))
                .collect::<Result<Vec<_>, _>>()?;
            integers(dst, codes).ok_or_else(|| unsupported(src, dst))
        }
        AtomicType::Float32 => values
            .iter()
            .map(|s| parse_double(dst, s).map(|v| v as f32))
            .collect::<Result<Vec<_>, _>>()
            .map(TypedVector::Float32),
        AtomicType::Float64 => values
            .iter()
            .map(|s| parse_double(dst, s))
            .collect::<Result<Vec<_>, _>>()
            .map(TypedVector::Float64),
        t if t.is_integer() => {
            let longs = values
                .iter()
                .map(|s| parse_long(dst, s))
                .collect::<Result<Vec<_>, _>>()?;
            integers(dst, longs).ok_or_else(|| unsupported(src, dst))
        }
        _ => Err(unsupported(src, dst)),
    }
}

fn enum_names(e: &EnumType, values: Vec<i64>) -> Result<Vec<String>, ConvertError> {
    values
        .into_iter()
        .map(|v| {
            e.lookup_name(v)
                .map(str::to_string)
                .ok_or_else(|| e.illegal(v))
        })
        .collect()
}

fn to_enum(e: &EnumType, src: AtomicType, values: Normalized) -> Result<TypedVector, ConvertError> {
    let declared = |v: i64| match e.lookup_name(v) {
        Some(_) => Ok(v),
        None => Err(e.illegal(v)),
    };
    let longs = match values {
        Normalized::Long(values) => values
            .into_iter()
            .map(declared)
            .collect::<Result<Vec<_>, _>>()?,
        Normalized::Text(values) => values
            .iter()
            .map(|s| {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(v) => declared(v),
                    Err(_) => e.lookup_value(s).ok_or_else(|| e.illegal(s)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?,
        Normalized::Double(_) | Normalized::Opaque(_) => {
            return Err(unsupported(src, AtomicType::Enum))
        }
    };
    integers(e.base(), longs).ok_or_else(|| unsupported(src, e.base()))
}
