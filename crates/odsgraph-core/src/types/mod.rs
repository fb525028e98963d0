mod blob;
mod complex;
mod ext_ref;

use crate::error::InternalError;
use odsgraph_primitives::DataType;

pub use blob::Blob;
pub use complex::{Complex, DComplex, decode_complex_seq, decode_dcomplex_seq};
pub use ext_ref::ExternalReference;

/// Parse a standard kind name such as `DS_LONG`; unknown text is NotFound.
pub fn parse_data_type(name: &str) -> Result<DataType, InternalError> {
    Ok(name.parse::<DataType>()?)
}
