// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The protocol's atomic type system.

use std::fmt;
use std::sync::Arc;

use crate::convert::force_range;
use crate::error::ConvertError;

/// Tag for one of the protocol's primitive value kinds.
///
/// `Char` is an 8-bit character. `Enum` only names the sort; a usable
/// enumeration type is a [`DapType::Enum`] carrying its declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicType {
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    Opaque,
    Enum,
}

impl AtomicType {
    pub fn name(self) -> &'static str {
        match self {
            AtomicType::Char => "Char",
            AtomicType::Int8 => "Int8",
            AtomicType::UInt8 => "UInt8",
            AtomicType::Int16 => "Int16",
            AtomicType::UInt16 => "UInt16",
            AtomicType::Int32 => "Int32",
            AtomicType::UInt32 => "UInt32",
            AtomicType::Int64 => "Int64",
            AtomicType::UInt64 => "UInt64",
            AtomicType::Float32 => "Float32",
            AtomicType::Float64 => "Float64",
            AtomicType::String => "String",
            AtomicType::Opaque => "Opaque",
            AtomicType::Enum => "Enum",
        }
    }

    /// Signed and unsigned fixed-width integers; `Char` is not included.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            AtomicType::Int8
                | AtomicType::UInt8
                | AtomicType::Int16
                | AtomicType::UInt16
                | AtomicType::Int32
                | AtomicType::UInt32
                | AtomicType::Int64
                | AtomicType::UInt64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            AtomicType::UInt8 | AtomicType::UInt16 | AtomicType::UInt32 | AtomicType::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, AtomicType::Float32 | AtomicType::Float64)
    }

    /// Integers and floats.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_char(self) -> bool {
        self == AtomicType::Char
    }

    pub fn is_string(self) -> bool {
        self == AtomicType::String
    }

    pub fn is_opaque(self) -> bool {
        self == AtomicType::Opaque
    }

    pub fn is_enum(self) -> bool {
        self == AtomicType::Enum
    }

    /// Width in bytes of one value, for fixed-size types.
    pub fn size(self) -> Option<usize> {
        match self {
            AtomicType::Char | AtomicType::Int8 | AtomicType::UInt8 => Some(1),
            AtomicType::Int16 | AtomicType::UInt16 => Some(2),
            AtomicType::Int32 | AtomicType::UInt32 | AtomicType::Float32 => Some(4),
            AtomicType::Int64 | AtomicType::UInt64 | AtomicType::Float64 => Some(8),
            AtomicType::String | AtomicType::Opaque | AtomicType::Enum => None,
        }
    }

    /// Inclusive bounds of the values an integer or char type can hold.
    pub fn value_range(self) -> Option<(i128, i128)> {
        let range = match self {
            AtomicType::Char => (0, 255),
            AtomicType::Int8 => (i8::MIN.into(), i8::MAX.into()),
            AtomicType::UInt8 => (0, u8::MAX.into()),
            AtomicType::Int16 => (i16::MIN.into(), i16::MAX.into()),
            AtomicType::UInt16 => (0, u16::MAX.into()),
            AtomicType::Int32 => (i32::MIN.into(), i32::MAX.into()),
            AtomicType::UInt32 => (0, u32::MAX.into()),
            AtomicType::Int64 => (i64::MIN.into(), i64::MAX.into()),
            AtomicType::UInt64 => (0, u64::MAX.into()),
            _ => return None,
        };
        Some(range)
    }

    /// The signed integer type of the same width; other types map to
    /// themselves.
    pub fn signed_version(self) -> AtomicType {
        match self {
            AtomicType::UInt8 => AtomicType::Int8,
            AtomicType::UInt16 => AtomicType::Int16,
            AtomicType::UInt32 => AtomicType::Int32,
            AtomicType::UInt64 => AtomicType::Int64,
            other => other,
        }
    }

    /// The next wider signed type that holds every value of an unsigned
    /// type without reinterpretation. `UInt64` has none and is returned
    /// unchanged, as is every other type.
    pub fn upcast(self) -> AtomicType {
        match self {
            AtomicType::UInt8 => AtomicType::Int16,
            AtomicType::UInt16 => AtomicType::Int32,
            AtomicType::UInt32 => AtomicType::Int64,
            other => other,
        }
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named enumeration constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumConst {
    pub name: String,
    pub value: i64,
}

/// An enumeration declaration: integer base type plus named constants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "EnumDecl", into = "EnumDecl")
)]
pub struct EnumType {
    name: String,
    base: AtomicType,
    constants: Vec<EnumConst>,
}

/// Serialized form of [`EnumType`], validated by `EnumType::new` on the way
/// in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct EnumDecl {
    name: String,
    base: AtomicType,
    constants: Vec<EnumConst>,
}

#[cfg(feature = "serde")]
impl TryFrom<EnumDecl> for EnumType {
    type Error = ConvertError;

    fn try_from(decl: EnumDecl) -> Result<EnumType, ConvertError> {
        let constants = decl.constants.into_iter().map(|c| (c.name, c.value));
        EnumType::new(decl.name, decl.base, constants)
    }
}

#[cfg(feature = "serde")]
impl From<EnumType> for EnumDecl {
    fn from(e: EnumType) -> EnumDecl {
        EnumDecl {
            name: e.name,
            base: e.base,
            constants: e.constants,
        }
    }
}

impl EnumType {
    /// **Errors** with `Unsupported` if `base` is not an integer type and
    /// with `IllegalEnumConstant` if a constant does not fit `base`.
    pub fn new<S, I>(name: S, base: AtomicType, constants: I) -> Result<EnumType, ConvertError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (String, i64)>,
    {
        let name = name.into();
        if !base.is_integer() {
            return Err(ConvertError::Unsupported {
                src: base,
                dst: AtomicType::Enum,
            });
        }
        let mut consts = Vec::new();
        for (cname, value) in constants {
            if force_range(base, value) != value {
                return Err(ConvertError::IllegalEnumConstant {
                    enumeration: name,
                    constant: cname,
                });
            }
            consts.push(EnumConst { name: cname, value });
        }
        Ok(EnumType {
            name,
            base,
            constants: consts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> AtomicType {
        self.base
    }

    pub fn constants(&self) -> &[EnumConst] {
        &self.constants
    }

    /// Value of the constant called `name`.
    pub fn lookup_value(&self, name: &str) -> Option<i64> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// Name of the first constant with `value`.
    pub fn lookup_name(&self, value: i64) -> Option<&str> {
        self.constants
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.name.as_str())
    }

    pub(crate) fn illegal(&self, constant: impl ToString) -> ConvertError {
        ConvertError::IllegalEnumConstant {
            enumeration: self.name.clone(),
            constant: constant.to_string(),
        }
    }
}

/// A fully described value type: an atomic type, or an enumeration with
/// its declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DapType {
    Atomic(AtomicType),
    Enum(Arc<EnumType>),
}

impl DapType {
    pub const CHAR: DapType = DapType::Atomic(AtomicType::Char);
    pub const INT8: DapType = DapType::Atomic(AtomicType::Int8);
    pub const UINT8: DapType = DapType::Atomic(AtomicType::UInt8);
    pub const INT16: DapType = DapType::Atomic(AtomicType::Int16);
    pub const UINT16: DapType = DapType::Atomic(AtomicType::UInt16);
    pub const INT32: DapType = DapType::Atomic(AtomicType::Int32);
    pub const UINT32: DapType = DapType::Atomic(AtomicType::UInt32);
    pub const INT64: DapType = DapType::Atomic(AtomicType::Int64);
    pub const UINT64: DapType = DapType::Atomic(AtomicType::UInt64);
    pub const FLOAT32: DapType = DapType::Atomic(AtomicType::Float32);
    pub const FLOAT64: DapType = DapType::Atomic(AtomicType::Float64);
    pub const STRING: DapType = DapType::Atomic(AtomicType::String);
    pub const OPAQUE: DapType = DapType::Atomic(AtomicType::Opaque);

    /// The type tag; `Enum` for enumerations.
    pub fn atomic_type(&self) -> AtomicType {
        match self {
            DapType::Atomic(t) => *t,
            DapType::Enum(_) => AtomicType::Enum,
        }
    }

    /// The type whose vectors hold this type's values: the base type for
    /// enumerations.
    pub fn storage_type(&self) -> AtomicType {
        match self {
            DapType::Atomic(t) => *t,
            DapType::Enum(e) => e.base(),
        }
    }

    pub fn size(&self) -> Option<usize> {
        self.storage_type().size()
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            DapType::Enum(e) => Some(e),
            DapType::Atomic(_) => None,
        }
    }

    /// See [`AtomicType::upcast`]; enumerations are unchanged.
    pub fn upcast(&self) -> DapType {
        match self {
            DapType::Atomic(t) => DapType::Atomic(t.upcast()),
            DapType::Enum(_) => self.clone(),
        }
    }
}

impl From<AtomicType> for DapType {
    fn from(t: AtomicType) -> DapType {
        DapType::Atomic(t)
    }
}

impl From<EnumType> for DapType {
    fn from(e: EnumType) -> DapType {
        DapType::Enum(Arc::new(e))
    }
}

impl fmt::Display for DapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DapType::Atomic(t) => t.fmt(f),
            DapType::Enum(e) => write!(f, "Enum {}", e.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_and_ranges() {
        assert_eq!(AtomicType::Char.size(), Some(1));
        assert_eq!(AtomicType::UInt32.size(), Some(4));
        assert_eq!(AtomicType::Float64.size(), Some(8));
        assert_eq!(AtomicType::String.size(), None);
        assert_eq!(AtomicType::UInt64.value_range(), Some((0, u64::MAX as i128)));
        assert_eq!(AtomicType::Float32.value_range(), None);
    }

    #[test]
    fn upcast_unsigned() {
        assert_eq!(AtomicType::UInt8.upcast(), AtomicType::Int16);
        assert_eq!(AtomicType::UInt32.upcast(), AtomicType::Int64);
        assert_eq!(AtomicType::UInt64.upcast(), AtomicType::UInt64);
        assert_eq!(AtomicType::UInt16.signed_version(), AtomicType::Int16);
    }

    #[test]
    fn enum_declaration() {
        let colors = EnumType::new(
            "colors",
            AtomicType::Int8,
            vec![("red".to_string(), 1), ("green".to_string(), 2)],
        )
        .unwrap();
        assert_eq!(colors.lookup_value("green"), Some(2));
        assert_eq!(colors.lookup_name(1), Some("red"));
        assert_eq!(colors.lookup_name(3), None);

        let ty = DapType::from(colors);
        assert_eq!(ty.atomic_type(), AtomicType::Enum);
        assert_eq!(ty.storage_type(), AtomicType::Int8);
    }

    #[test]
    fn enum_rejects_bad_declarations() {
        assert!(EnumType::new("e", AtomicType::Float32, vec![]).is_err());
        let err = EnumType::new("e", AtomicType::UInt8, vec![("big".to_string(), 300)]).unwrap_err();
        assert!(matches!(err, ConvertError::IllegalEnumConstant { .. }));
    }
}
