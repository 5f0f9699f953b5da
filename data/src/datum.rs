//! Element types of tensor slots.
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum DatumType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
    String,
}

impl DatumType {
    pub const ALL: [DatumType; 13] = [
        DatumType::Bool,
        DatumType::U8,
        DatumType::U16,
        DatumType::U32,
        DatumType::U64,
        DatumType::I8,
        DatumType::I16,
        DatumType::I32,
        DatumType::I64,
        DatumType::F16,
        DatumType::F32,
        DatumType::F64,
        DatumType::String,
    ];

    /// Stable lower-case name, used as the persisted representation.
    pub fn name(&self) -> &'static str {
        match self {
            DatumType::Bool => "bool",
            DatumType::U8 => "u8",
            DatumType::U16 => "u16",
            DatumType::U32 => "u32",
            DatumType::U64 => "u64",
            DatumType::I8 => "i8",
            DatumType::I16 => "i16",
            DatumType::I32 => "i32",
            DatumType::I64 => "i64",
            DatumType::F16 => "f16",
            DatumType::F32 => "f32",
            DatumType::F64 => "f64",
            DatumType::String => "string",
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, DatumType::U8 | DatumType::U16 | DatumType::U32 | DatumType::U64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, DatumType::I8 | DatumType::I16 | DatumType::I32 | DatumType::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DatumType::F16 | DatumType::F32 | DatumType::F64)
    }

    pub fn is_number(&self) -> bool {
        self.is_signed() || self.is_unsigned() || self.is_float()
    }

    /// Size of one element in bytes, if it has a fixed one.
    pub fn size_of(&self) -> Option<usize> {
        match self {
            DatumType::Bool | DatumType::U8 | DatumType::I8 => Some(1),
            DatumType::U16 | DatumType::I16 | DatumType::F16 => Some(2),
            DatumType::U32 | DatumType::I32 | DatumType::F32 => Some(4),
            DatumType::U64 | DatumType::I64 | DatumType::F64 => Some(8),
            DatumType::String => None,
        }
    }
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DatumType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(DatumType::Bool),
            "u8" | "uint8" => Ok(DatumType::U8),
            "u16" | "uint16" => Ok(DatumType::U16),
            "u32" | "uint32" => Ok(DatumType::U32),
            "u64" | "uint64" => Ok(DatumType::U64),
            "i8" | "int8" => Ok(DatumType::I8),
            "i16" | "int16" => Ok(DatumType::I16),
            "i32" | "int32" => Ok(DatumType::I32),
            "i64" | "int64" => Ok(DatumType::I64),
            "f16" | "float16" => Ok(DatumType::F16),
            "f32" | "float32" | "float" => Ok(DatumType::F32),
            "f64" | "float64" | "double" => Ok(DatumType::F64),
            "string" => Ok(DatumType::String),
            _ => Err(ValidationError::invalid_argument(format!("Unknown datum type {s:?}"))),
        }
    }
}
