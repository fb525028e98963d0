use odsgraph_primitives::ParseDataTypeError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured engine error with a stable classification. Every failure raised
/// by the core is one of these; the boundary layer translates it into the
/// external exception shape without losing class or message.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a lookup miss.
    pub fn not_found(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, origin, message)
    }

    /// Construct an implementation-constraint violation caused by caller input.
    pub fn constraint(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::ImplementationConstraint, origin, message)
    }

    /// Construct an unsupported-type error.
    pub fn unsupported_type(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::UnsupportedType, origin, message)
    }

    /// Construct a malformed-argument error.
    pub fn bad_parameter(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::BadParameter, origin, message)
    }

    /// Construct a name/index collision error.
    pub fn duplicate(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Duplicate, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    /// Standardized external code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.class.code()
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///
/// Error taxonomy by condition. Each class owns exactly one external code.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    NotFound,
    ImplementationConstraint,
    UnsupportedType,
    BadParameter,
    Duplicate,
}

impl ErrorClass {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "AO_NOT_FOUND",
            Self::ImplementationConstraint => "AO_IMPLEMENTATION_PROBLEM",
            Self::UnsupportedType => "AO_INVALID_DATATYPE",
            Self::BadParameter => "AO_BAD_PARAMETER",
            Self::Duplicate => "AO_DUPLICATE_NAME",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::ImplementationConstraint => "implementation_constraint",
            Self::UnsupportedType => "unsupported_type",
            Self::BadParameter => "bad_parameter",
            Self::Duplicate => "duplicate",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Types,
    Value,
    Enumeration,
    BaseModel,
    Model,
    Instance,
    Cache,
    Context,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Types => "types",
            Self::Value => "value",
            Self::Enumeration => "enumeration",
            Self::BaseModel => "base_model",
            Self::Model => "model",
            Self::Instance => "instance",
            Self::Cache => "cache",
            Self::Context => "context",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorTree
///
/// Accumulates independent validation findings so a single pass can report
/// all of them.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl ToString) {
        self.messages.push(message.to_string());
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl From<ParseDataTypeError> for InternalError {
    fn from(err: ParseDataTypeError) -> Self {
        Self::not_found(ErrorOrigin::Types, err.to_string())
    }
}

impl From<ErrorTree> for InternalError {
    fn from(tree: ErrorTree) -> Self {
        Self::constraint(
            ErrorOrigin::Model,
            format!("model validation failed: {tree}"),
        )
    }
}

/// Push a formatted message onto an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_per_class() {
        let err = InternalError::not_found(ErrorOrigin::Model, "element 'X' not found");

        assert!(err.is_not_found());
        assert_eq!(err.code(), "AO_NOT_FOUND");
        assert_eq!(err.display_with_class(), "model:not_found: element 'X' not found");
    }

    #[test]
    fn error_tree_collects_and_reports() {
        let mut errs = ErrorTree::new();
        assert!(errs.clone().result().is_ok());

        err!(errs, "first {}", 1);
        errs.add("second");

        let tree = errs.result().expect_err("two findings");
        assert_eq!(tree.messages().len(), 2);
        assert_eq!(tree.to_string(), "first 1; second");

        let err = InternalError::from(tree);
        assert_eq!(err.class, ErrorClass::ImplementationConstraint);
    }
}
