//! Shared vocabulary for the ODS graph crates: value kinds and relation
//! roles. Kept light on dependencies so every layer can use it.

#[macro_use]
mod macros;

mod data_type;
mod relation;

pub use data_type::{ALL_DATA_TYPES, DATA_TYPE_COUNT, DataType, ParseDataTypeError, SEQUENCE_PAIRS};
pub use relation::{ALL_RELATIONSHIPS, RelationRange, RelationType, Relationship};
