//! Integer unwrapping with a fixed two-branch precedence: the wide
//! interpretation is tried first, and only when the payload is not of a wide
//! kind is it read as a narrower integer and widened. Which branch produced
//! the result is visible through [`Value::data_type`], so the two are kept
//! apart rather than folded into one numeric type.

use super::Value;
use crate::error::{ErrorOrigin, InternalError};

impl Value {
    /// `DT_LONGLONG`/`DT_ID` as-is, else `DT_LONG`/`DT_SHORT` widened.
    pub fn as_long_long(&self) -> Result<i64, InternalError> {
        match self {
            Self::LongLong(v) | Self::Id(v) => Ok(*v),
            Self::Long(v) => Ok(i64::from(*v)),
            Self::Short(v) => Ok(i64::from(*v)),
            other => Err(unwrap_mismatch("DT_LONGLONG", other)),
        }
    }

    /// `DT_LONG`/`DT_ENUM` as-is, else `DT_SHORT`/`DT_BYTE` widened.
    pub fn as_long(&self) -> Result<i32, InternalError> {
        match self {
            Self::Long(v) | Self::Enum(v) => Ok(*v),
            Self::Short(v) => Ok(i32::from(*v)),
            Self::Byte(v) => Ok(i32::from(*v)),
            other => Err(unwrap_mismatch("DT_LONG", other)),
        }
    }

    /// `DS_LONGLONG` as-is, else `DS_LONG` widened element-wise.
    pub fn as_long_long_seq(&self) -> Result<Vec<i64>, InternalError> {
        match self {
            Self::LongLongSeq(v) => Ok(v.clone()),
            Self::LongSeq(v) => Ok(v.iter().copied().map(i64::from).collect()),
            other => Err(unwrap_mismatch("DS_LONGLONG", other)),
        }
    }

    /// `DT_DOUBLE` as-is, else `DT_FLOAT` widened.
    pub fn as_double(&self) -> Result<f64, InternalError> {
        match self {
            Self::Double(v) => Ok(*v),
            Self::Float(v) => Ok(f64::from(*v)),
            other => Err(unwrap_mismatch("DT_DOUBLE", other)),
        }
    }
}

fn unwrap_mismatch(wanted: &str, value: &Value) -> InternalError {
    InternalError::unsupported_type(
        ErrorOrigin::Value,
        format!(
            "cannot read {} value as {wanted}",
            value.data_type().name()
        ),
    )
}
