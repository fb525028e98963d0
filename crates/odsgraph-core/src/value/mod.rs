mod numeric;

#[cfg(test)]
mod tests;

use crate::types::{Blob, Complex, DComplex, ExternalReference};
use odsgraph_primitives::DataType;
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Typed attribute payload. There is one variant per [`DataType`]; `Unknown`
/// carries nothing and stands for "no value".
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Unknown,
    String(String),
    Short(i16),
    Float(f32),
    Boolean(bool),
    Byte(u8),
    Long(i32),
    Double(f64),
    LongLong(i64),
    Id(i64),
    /// ODS date text, `YYYYMMDDhhmmss` with optional fraction.
    Date(String),
    ByteStr(Vec<u8>),
    Blob(Blob),
    Complex(Complex),
    DComplex(DComplex),
    ExternalReference(ExternalReference),
    Enum(i32),
    StringSeq(Vec<String>),
    ShortSeq(Vec<i16>),
    FloatSeq(Vec<f32>),
    BooleanSeq(Vec<bool>),
    ByteSeq(Vec<u8>),
    LongSeq(Vec<i32>),
    DoubleSeq(Vec<f64>),
    LongLongSeq(Vec<i64>),
    DateSeq(Vec<String>),
    ByteStrSeq(Vec<Vec<u8>>),
    ComplexSeq(Vec<Complex>),
    DComplexSeq(Vec<DComplex>),
    ExternalReferenceSeq(Vec<ExternalReference>),
    EnumSeq(Vec<i32>),
}

impl Value {
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Unknown => DataType::Unknown,
            Self::String(_) => DataType::String,
            Self::Short(_) => DataType::Short,
            Self::Float(_) => DataType::Float,
            Self::Boolean(_) => DataType::Boolean,
            Self::Byte(_) => DataType::Byte,
            Self::Long(_) => DataType::Long,
            Self::Double(_) => DataType::Double,
            Self::LongLong(_) => DataType::LongLong,
            Self::Id(_) => DataType::Id,
            Self::Date(_) => DataType::Date,
            Self::ByteStr(_) => DataType::ByteStr,
            Self::Blob(_) => DataType::Blob,
            Self::Complex(_) => DataType::Complex,
            Self::DComplex(_) => DataType::DComplex,
            Self::ExternalReference(_) => DataType::ExternalReference,
            Self::Enum(_) => DataType::Enum,
            Self::StringSeq(_) => DataType::StringSeq,
            Self::ShortSeq(_) => DataType::ShortSeq,
            Self::FloatSeq(_) => DataType::FloatSeq,
            Self::BooleanSeq(_) => DataType::BooleanSeq,
            Self::ByteSeq(_) => DataType::ByteSeq,
            Self::LongSeq(_) => DataType::LongSeq,
            Self::DoubleSeq(_) => DataType::DoubleSeq,
            Self::LongLongSeq(_) => DataType::LongLongSeq,
            Self::DateSeq(_) => DataType::DateSeq,
            Self::ByteStrSeq(_) => DataType::ByteStrSeq,
            Self::ComplexSeq(_) => DataType::ComplexSeq,
            Self::DComplexSeq(_) => DataType::DComplexSeq,
            Self::ExternalReferenceSeq(_) => DataType::ExternalReferenceSeq,
            Self::EnumSeq(_) => DataType::EnumSeq,
        }
    }

    /// Empty payload of the given kind: zero, empty text or empty sequence.
    #[must_use]
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Unknown => Self::Unknown,
            DataType::String => Self::String(String::new()),
            DataType::Short => Self::Short(0),
            DataType::Float => Self::Float(0.0),
            DataType::Boolean => Self::Boolean(false),
            DataType::Byte => Self::Byte(0),
            DataType::Long => Self::Long(0),
            DataType::Double => Self::Double(0.0),
            DataType::LongLong => Self::LongLong(0),
            DataType::Id => Self::Id(0),
            DataType::Date => Self::Date(String::new()),
            DataType::ByteStr => Self::ByteStr(Vec::new()),
            DataType::Blob => Self::Blob(Blob::default()),
            DataType::Complex => Self::Complex(Complex::default()),
            DataType::DComplex => Self::DComplex(DComplex::default()),
            DataType::ExternalReference => Self::ExternalReference(ExternalReference::default()),
            DataType::Enum => Self::Enum(0),
            DataType::StringSeq => Self::StringSeq(Vec::new()),
            DataType::ShortSeq => Self::ShortSeq(Vec::new()),
            DataType::FloatSeq => Self::FloatSeq(Vec::new()),
            DataType::BooleanSeq => Self::BooleanSeq(Vec::new()),
            DataType::ByteSeq => Self::ByteSeq(Vec::new()),
            DataType::LongSeq => Self::LongSeq(Vec::new()),
            DataType::DoubleSeq => Self::DoubleSeq(Vec::new()),
            DataType::LongLongSeq => Self::LongLongSeq(Vec::new()),
            DataType::DateSeq => Self::DateSeq(Vec::new()),
            DataType::ByteStrSeq => Self::ByteStrSeq(Vec::new()),
            DataType::ComplexSeq => Self::ComplexSeq(Vec::new()),
            DataType::DComplexSeq => Self::DComplexSeq(Vec::new()),
            DataType::ExternalReferenceSeq => Self::ExternalReferenceSeq(Vec::new()),
            DataType::EnumSeq => Self::EnumSeq(Vec::new()),
        }
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        self.data_type().is_sequence()
    }

    /// Number of elements: sequence length, 1 for a scalar, 0 for `Unknown`.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unknown => 0,
            Self::StringSeq(v) | Self::DateSeq(v) => v.len(),
            Self::ShortSeq(v) => v.len(),
            Self::FloatSeq(v) => v.len(),
            Self::BooleanSeq(v) => v.len(),
            Self::ByteSeq(v) => v.len(),
            Self::LongSeq(v) | Self::EnumSeq(v) => v.len(),
            Self::DoubleSeq(v) => v.len(),
            Self::LongLongSeq(v) => v.len(),
            Self::ByteStrSeq(v) => v.len(),
            Self::ComplexSeq(v) => v.len(),
            Self::DComplexSeq(v) => v.len(),
            Self::ExternalReferenceSeq(v) => v.len(),
            _ => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Date(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value may be stored in an attribute of `data_type`.
    /// `DT_UNKNOWN` attributes take any kind and `Unknown` fits every
    /// attribute.
    #[must_use]
    pub fn fits(&self, data_type: DataType) -> bool {
        matches!(data_type, DataType::Unknown)
            || self.is_unknown()
            || self.data_type() == data_type
    }
}

///
/// NameValueUnit
///
/// One named value with an optional unit and a validity flag. An invalid
/// entry still carries its kind so writers can emit a typed null.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NameValueUnit {
    pub name: String,
    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    pub valid: bool,
}

impl NameValueUnit {
    /// Valid entry unless `value` is `Unknown`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let valid = !value.is_unknown();

        Self {
            name: name.into(),
            value,
            unit: None,
            valid,
        }
    }

    /// Invalid placeholder of the given kind.
    #[must_use]
    pub fn empty(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            value: Value::empty(data_type),
            unit: None,
            valid: false,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Valid flag set and a payload present.
    #[must_use]
    pub const fn has_valid_value(&self) -> bool {
        self.valid && !self.value.is_unknown()
    }
}
