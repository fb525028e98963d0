//! Core engine for odsgraph: base models, application models, instances,
//! typed values, and the derived lookup cache, with the ergonomics exported
//! via the `prelude`.

// public exports are one module level down
pub mod base;
pub mod cache;
pub mod enumeration;
pub mod error;
pub mod instance;
pub mod model;
pub mod pattern;
pub mod types;
pub mod value;

pub use odsgraph_primitives::{DataType, RelationRange, RelationType, Relationship};

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, caches, or builders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        base::BaseModel,
        instance::{Iid, Instance},
        model::{Aid, ApplicationModel, AttrNo, RelNo},
        value::{NameValueUnit, Value},
    };
    pub use odsgraph_primitives::{DataType, Relationship};
}
