use crate::error::{ErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// Blob
///
/// Variable-length binary payload with a free-text header. Raw byte access is
/// explicit via accessors; Display prints a size summary, not content.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blob {
    header: String,
    bytes: Vec<u8>,
}

impl Blob {
    #[must_use]
    pub fn new(header: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    /// Append bytes to the end of the content.
    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Replace the whole content; the header is kept.
    pub fn set(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }

    /// Copy `length` bytes starting at `offset`.
    pub fn get(&self, offset: usize, length: usize) -> Result<Vec<u8>, InternalError> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                InternalError::constraint(
                    ErrorOrigin::Types,
                    format!(
                        "blob range {offset}+{length} exceeds blob length {}",
                        self.bytes.len()
                    ),
                )
            })?;

        Ok(self.bytes[offset..end].to_vec())
    }

    /// Byte-exact content comparison; headers are ignored.
    #[must_use]
    pub fn compare(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[blob '{}' ({} bytes)]", self.header, self.bytes.len())
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::new(String::new(), bytes)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(String::new(), bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn set_then_get_returns_content() {
        let mut blob = Blob::new("header", b"old".to_vec());
        blob.set(&[1, 2, 3, 4]);

        assert_eq!(blob.get(0, 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(blob.get(1, 2).unwrap(), vec![2, 3]);
        assert_eq!(blob.get(4, 0).unwrap(), Vec::<u8>::new());
        assert_eq!(blob.header(), "header");
    }

    #[test]
    fn append_extends_content() {
        let mut blob = Blob::from(&[1u8, 2][..]);
        blob.append(&[3]);

        assert_eq!(blob.as_bytes(), &[1, 2, 3]);
        assert_eq!(blob.len(), 3);
    }

    #[test]
    fn out_of_range_get_is_a_constraint_violation() {
        let blob = Blob::from(vec![0u8; 8]);

        for (offset, length) in [(0, 9), (8, 1), (usize::MAX, 2)] {
            let err = blob.get(offset, length).expect_err("range past end");
            assert_eq!(err.class, ErrorClass::ImplementationConstraint);
        }
    }

    #[test]
    fn compare_ignores_header() {
        let a = Blob::new("a", vec![9u8, 8]);
        let b = Blob::new("b", vec![9u8, 8]);
        let c = Blob::new("a", vec![9u8]);

        assert!(a.compare(&b));
        assert!(!a.compare(&c));
        assert_ne!(a, b, "structural equality still sees the header");
    }
}
