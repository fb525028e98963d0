use serde::{Deserialize, Serialize};

///
/// ExternalReference
///
/// Pointer to content stored outside the model (a file, a URL). The core only
/// carries it; resolving `location` belongs to the I/O layer.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ExternalReference {
    pub description: String,
    pub mime_type: String,
    pub location: String,
}

impl ExternalReference {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        mime_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            mime_type: mime_type.into(),
            location: location.into(),
        }
    }
}
