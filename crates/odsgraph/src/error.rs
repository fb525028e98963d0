use derive_more::Display;
use odsgraph_core::error::{ErrorClass, InternalError};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// OdsException
///
/// Public error shape handed across the system boundary. Carries the
/// standardized code of the failure class, a severity, and the original
/// message; the originating core error stays reachable as its source.
///

#[derive(Debug, Serialize, ThisError)]
#[error("{code}: {message}")]
pub struct OdsException {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,

    #[source]
    #[serde(skip_serializing)]
    pub source: InternalError,
}

impl OdsException {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        self.source.class
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.source.is_not_found()
    }
}

impl From<InternalError> for OdsException {
    fn from(err: InternalError) -> Self {
        Self {
            code: err.code(),
            severity: Severity::Error,
            message: err.message.clone(),
            source: err,
        }
    }
}

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum Severity {
    #[display("ERROR")]
    #[serde(rename = "ERROR")]
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use odsgraph_core::error::ErrorOrigin;
    use std::error::Error as _;

    #[test]
    fn conversion_keeps_code_message_and_cause() {
        let internal = InternalError::not_found(ErrorOrigin::Model, "element 'X' not found");
        let ex = OdsException::from(internal.clone());

        assert_eq!(ex.code, "AO_NOT_FOUND");
        assert_eq!(ex.severity, Severity::Error);
        assert_eq!(ex.message, "element 'X' not found");
        assert_eq!(ex.class(), ErrorClass::NotFound);
        assert_eq!(ex.to_string(), "AO_NOT_FOUND: element 'X' not found");

        let cause = ex.source().unwrap();
        assert_eq!(cause.to_string(), internal.to_string());
    }

    #[test]
    fn serializes_without_the_cause() {
        let ex = OdsException::from(InternalError::duplicate(ErrorOrigin::Model, "dup"));
        let json = serde_json::to_value(&ex).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "code": "AO_DUPLICATE_NAME",
                "severity": "ERROR",
                "message": "dup",
            })
        );
    }
}
