//! Abstract datatypes and their categories.
//!
//! A [`Datatype`] is dialect independent. Each dialect maps it to a physical
//! type token; its [`Category`] drives both DDL defaults (signedness, default
//! quoting) and the legal query operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Datatype category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Integers, fixed and floating point numbers.
    Numeric,
    /// Character data.
    String,
    /// Byte data.
    Binary,
    /// Dates and times.
    Temporal,
}

/// Abstract column datatype.
///
/// `Invalid` is the zero value: a column whose datatype was never set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Datatype {
    /// Unset datatype.
    #[default]
    Invalid,
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 24-bit integer.
    MediumInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// Fixed-point decimal.
    Decimal,
    /// Single precision floating point.
    Float,
    /// Double precision floating point.
    Double,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Text up to 255 bytes.
    TinyText,
    /// Text up to 64 KiB.
    Text,
    /// Text up to 16 MiB.
    MediumText,
    /// Text up to 4 GiB.
    LongText,
    /// Fixed-length byte string.
    Binary,
    /// Variable-length byte string.
    VarBinary,
    /// Blob up to 255 bytes.
    TinyBlob,
    /// Blob up to 64 KiB.
    Blob,
    /// Blob up to 16 MiB.
    MediumBlob,
    /// Blob up to 4 GiB.
    LongBlob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Year.
    Year,
    /// Boolean.
    Boolean,
    /// JSON document.
    Json,
}

impl Datatype {
    /// Every concrete datatype, in declaration order.
    pub const ALL: [Datatype; 27] = [
        Self::TinyInt,
        Self::SmallInt,
        Self::MediumInt,
        Self::Integer,
        Self::BigInt,
        Self::Decimal,
        Self::Float,
        Self::Double,
        Self::Char,
        Self::Varchar,
        Self::TinyText,
        Self::Text,
        Self::MediumText,
        Self::LongText,
        Self::Binary,
        Self::VarBinary,
        Self::TinyBlob,
        Self::Blob,
        Self::MediumBlob,
        Self::LongBlob,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::Year,
        Self::Boolean,
        Self::Json,
    ];

    /// Returns the category, or `None` for unclassified datatypes.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::TinyInt
            | Self::SmallInt
            | Self::MediumInt
            | Self::Integer
            | Self::BigInt
            | Self::Decimal
            | Self::Float
            | Self::Double => Some(Category::Numeric),
            Self::Char
            | Self::Varchar
            | Self::TinyText
            | Self::Text
            | Self::MediumText
            | Self::LongText => Some(Category::String),
            Self::Binary
            | Self::VarBinary
            | Self::TinyBlob
            | Self::Blob
            | Self::MediumBlob
            | Self::LongBlob => Some(Category::Binary),
            Self::Date | Self::Time | Self::DateTime | Self::Timestamp | Self::Year => {
                Some(Category::Temporal)
            }
            Self::Invalid | Self::Boolean | Self::Json => None,
        }
    }

    /// Returns true for the zero value.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Returns true for integer, fixed and floating point types.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.category() == Some(Category::Numeric)
    }

    /// Returns true for character types.
    #[must_use]
    pub fn is_string(self) -> bool {
        self.category() == Some(Category::String)
    }

    /// Returns true for byte types.
    #[must_use]
    pub fn is_binary(self) -> bool {
        self.category() == Some(Category::Binary)
    }

    /// Returns true for date and time types.
    #[must_use]
    pub fn is_time(self) -> bool {
        self.category() == Some(Category::Temporal)
    }

    /// Returns the Rust type generated code uses for a non-null value.
    ///
    /// Empty for the zero value.
    #[must_use]
    pub const fn rust_type(self, unsigned: bool) -> &'static str {
        match (self, unsigned) {
            (Self::TinyInt, false) => "i8",
            (Self::TinyInt, true) => "u8",
            (Self::SmallInt, false) => "i16",
            (Self::SmallInt, true) => "u16",
            (Self::MediumInt | Self::Integer, false) => "i32",
            (Self::MediumInt | Self::Integer, true) => "u32",
            (Self::BigInt, false) => "i64",
            (Self::BigInt, true) => "u64",
            (Self::Float, _) => "f32",
            (Self::Decimal | Self::Double, _) => "f64",
            (
                Self::Char
                | Self::Varchar
                | Self::TinyText
                | Self::Text
                | Self::MediumText
                | Self::LongText,
                _,
            ) => "String",
            (
                Self::Binary
                | Self::VarBinary
                | Self::TinyBlob
                | Self::Blob
                | Self::MediumBlob
                | Self::LongBlob,
                _,
            ) => "Vec<u8>",
            (Self::Date, _) => "chrono::NaiveDate",
            (Self::Time, _) => "chrono::NaiveTime",
            (Self::DateTime | Self::Timestamp, _) => "chrono::NaiveDateTime",
            (Self::Year, _) => "i16",
            (Self::Boolean, _) => "bool",
            (Self::Json, _) => "serde_json::Value",
            (Self::Invalid, _) => "",
        }
    }

    /// Returns the datatype name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::TinyInt => "TinyInt",
            Self::SmallInt => "SmallInt",
            Self::MediumInt => "MediumInt",
            Self::Integer => "Integer",
            Self::BigInt => "BigInt",
            Self::Decimal => "Decimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Char => "Char",
            Self::Varchar => "Varchar",
            Self::TinyText => "TinyText",
            Self::Text => "Text",
            Self::MediumText => "MediumText",
            Self::LongText => "LongText",
            Self::Binary => "Binary",
            Self::VarBinary => "VarBinary",
            Self::TinyBlob => "TinyBlob",
            Self::Blob => "Blob",
            Self::MediumBlob => "MediumBlob",
            Self::LongBlob => "LongBlob",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "DateTime",
            Self::Timestamp => "Timestamp",
            Self::Year => "Year",
            Self::Boolean => "Boolean",
            Self::Json => "Json",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Datatype {
    type Err = String;

    /// Parses a datatype name, ignoring case.
    ///
    /// `Invalid` parses back to the zero value so an unset datatype survives
    /// a serialization round trip.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(Self::Invalid)
            .chain(Self::ALL)
            .find(|dt| dt.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown datatype '{s}'"))
    }
}

impl TryFrom<String> for Datatype {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Datatype> for String {
    fn from(value: Datatype) -> Self {
        value.as_str().to_string()
    }
}
