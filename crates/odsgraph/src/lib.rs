//! ## Crate layout
//! - `core`: base models, application models, instances, values, and the
//!   derived model cache.
//! - `primitives`: value kinds and relation roles shared by every layer.
//! - `context`: session configuration options.
//! - `error`: the public exception shape every core failure converts into.
//! - `session`: one open document tying the pieces together.
//!
//! The `prelude` module mirrors the surface a format reader or writer needs.

pub use odsgraph_core as core;
pub use odsgraph_primitives as primitives;

pub mod context;
pub mod error;
pub mod session;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{OdsException, Severity};
pub use session::Session;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        context::{Context, ContextValue},
        core::{
            base::BaseModel,
            instance::{Iid, Instance},
            model::{Aid, ApplicationModel, AttrNo, AttributeDef, RelNo, RelationDef, TempRelation},
            value::{NameValueUnit, Value},
        },
        error::OdsException,
        primitives::{DataType, RelationRange, Relationship},
        session::Session,
    };
}
