//! Value kinds and the coercion table.
//!
//! Every flag and argument declares exactly one [`Kind`]. During validation
//! the raw text bound to it is passed through that kind's [`Coercer`], which
//! produces a typed [`Value`] or a [`FormatError`].
//!
//! # Examples
//!
//! ```
//! use argbind_core::{Kind, Value, coerce};
//!
//! assert_eq!(coerce(Kind::INT32, "10").unwrap(), Value::Int32(10));
//! assert!(coerce(Kind::INT32, "10.5").is_err());
//! assert_eq!(coerce(Kind::BOOL, "").unwrap(), Value::Bool(true));
//! ```

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, UnknownKind};

/// Bit width of an integer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Bit width of a floating point kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// Declared value type of a flag or argument.
///
/// Serialized by name (`int8` .. `int64`, `float32`, `float64`, `string`,
/// `bool`). Parsing also accepts `int`/`integer` for `int64` and `float` for
/// `float64`.
///
/// # Examples
///
/// ```
/// use argbind_core::Kind;
///
/// let kind: Kind = "int16".parse().unwrap();
/// assert_eq!(kind, Kind::INT16);
/// assert_eq!(Kind::FLOAT64.to_string(), "float64");
/// assert_eq!("integer".parse::<Kind>().unwrap(), Kind::INT64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Kind {
    Integer(IntWidth),
    Float(FloatWidth),
    String,
    Bool,
}

/// Coercion function from raw argument text to a typed value.
pub type Coercer = fn(&str) -> Result<Value, FormatError>;

impl Kind {
    pub const INT8: Kind = Kind::Integer(IntWidth::W8);
    pub const INT16: Kind = Kind::Integer(IntWidth::W16);
    pub const INT32: Kind = Kind::Integer(IntWidth::W32);
    pub const INT64: Kind = Kind::Integer(IntWidth::W64);
    pub const FLOAT32: Kind = Kind::Float(FloatWidth::W32);
    pub const FLOAT64: Kind = Kind::Float(FloatWidth::W64);
    pub const STRING: Kind = Kind::String;
    pub const BOOL: Kind = Kind::Bool;

    /// Canonical name used in help output and documents.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Integer(IntWidth::W8) => "int8",
            Kind::Integer(IntWidth::W16) => "int16",
            Kind::Integer(IntWidth::W32) => "int32",
            Kind::Integer(IntWidth::W64) => "int64",
            Kind::Float(FloatWidth::W32) => "float32",
            Kind::Float(FloatWidth::W64) => "float64",
            Kind::String => "string",
            Kind::Bool => "bool",
        }
    }

    /// Returns the registry entry for this kind.
    pub fn coercer(self) -> Coercer {
        match self {
            Kind::Integer(IntWidth::W8) => coerce_int8,
            Kind::Integer(IntWidth::W16) => coerce_int16,
            Kind::Integer(IntWidth::W32) => coerce_int32,
            Kind::Integer(IntWidth::W64) => coerce_int64,
            Kind::Float(FloatWidth::W32) => coerce_float32,
            Kind::Float(FloatWidth::W64) => coerce_float64,
            Kind::String => coerce_string,
            Kind::Bool => coerce_bool,
        }
    }

    /// Coerces `raw` into a value of this kind.
    pub fn coerce(self, raw: &str) -> Result<Value, FormatError> {
        (self.coercer())(raw)
    }
}

/// Coerces `raw` into a value of `kind`.
pub fn coerce(kind: Kind, raw: &str) -> Result<Value, FormatError> {
    kind.coerce(raw)
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int8" => Ok(Kind::INT8),
            "int16" => Ok(Kind::INT16),
            "int32" => Ok(Kind::INT32),
            "int64" | "int" | "integer" => Ok(Kind::INT64),
            "float32" => Ok(Kind::FLOAT32),
            "float64" | "float" => Ok(Kind::FLOAT64),
            "string" => Ok(Kind::String),
            "bool" => Ok(Kind::Bool),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for Kind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.name().to_string()
    }
}

/// A coerced flag or argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bool(bool),
}

impl Value {
    /// Kind this value was coerced to.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int8(_) => Kind::INT8,
            Value::Int16(_) => Kind::INT16,
            Value::Int32(_) => Kind::INT32,
            Value::Int64(_) => Kind::INT64,
            Value::Float32(_) => Kind::FLOAT32,
            Value::Float64(_) => Kind::FLOAT64,
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
        }
    }

    /// Extracts the value as `T` if the kinds line up.
    pub fn get<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Rust types a [`Value`] can be read back as.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
);

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

fn parse_integer<T>(raw: &str, kind: Kind) -> Result<T, FormatError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FormatError::IntegerOutOfRange {
            raw: raw.to_string(),
            kind,
        },
        _ => FormatError::InvalidInteger {
            raw: raw.to_string(),
            kind,
        },
    })
}

fn coerce_int8(raw: &str) -> Result<Value, FormatError> {
    parse_integer(raw, Kind::INT8).map(Value::Int8)
}

fn coerce_int16(raw: &str) -> Result<Value, FormatError> {
    parse_integer(raw, Kind::INT16).map(Value::Int16)
}

fn coerce_int32(raw: &str) -> Result<Value, FormatError> {
    parse_integer(raw, Kind::INT32).map(Value::Int32)
}

fn coerce_int64(raw: &str) -> Result<Value, FormatError> {
    parse_integer(raw, Kind::INT64).map(Value::Int64)
}

// Overflowing text parses to infinity. Only an explicit `inf` spelling may.
fn check_float_range(raw: &str, infinite: bool, kind: Kind) -> Result<(), FormatError> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let spelled_infinity =
        unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity");
    if infinite && !spelled_infinity {
        return Err(FormatError::FloatOutOfRange {
            raw: raw.to_string(),
            kind,
        });
    }
    Ok(())
}

fn coerce_float32(raw: &str) -> Result<Value, FormatError> {
    let value: f32 = raw.parse().map_err(|_| FormatError::InvalidFloat {
        raw: raw.to_string(),
        kind: Kind::FLOAT32,
    })?;
    check_float_range(raw, value.is_infinite(), Kind::FLOAT32)?;
    Ok(Value::Float32(value))
}

fn coerce_float64(raw: &str) -> Result<Value, FormatError> {
    let value: f64 = raw.parse().map_err(|_| FormatError::InvalidFloat {
        raw: raw.to_string(),
        kind: Kind::FLOAT64,
    })?;
    check_float_range(raw, value.is_infinite(), Kind::FLOAT64)?;
    Ok(Value::Float64(value))
}

fn coerce_string(raw: &str) -> Result<Value, FormatError> {
    Ok(Value::String(raw.to_string()))
}

/// Empty text means the flag was given bare (`-u`), which reads as `true`.
fn coerce_bool(raw: &str) -> Result<Value, FormatError> {
    match raw {
        "" | "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Value::Bool(true)),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Value::Bool(false)),
        _ => Err(FormatError::InvalidBool {
            raw: raw.to_string(),
        }),
    }
}
