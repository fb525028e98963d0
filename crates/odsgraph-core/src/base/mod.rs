//! Immutable standard catalogue: base element types, their attributes and
//! their relations, plus the standard enumerations.
//!
//! A catalogue is built once per version and shared behind an `Arc`; there is
//! no mutation API after [`BaseModelBuilder::build`].

mod builder;
mod catalogue;
mod element;
mod registry;
mod relation;


pub use builder::BaseModelBuilder;
pub use catalogue::{
    BaseAttributeDef, BaseElementDef, BaseEnumDef, BaseModelDef, BaseRelationDef, SUPPORTED_VERSIONS,
};
pub use element::{BaseAttribute, BaseElement};
pub use relation::{BaseRelation, BaseRelationTarget};

use crate::{
    enumeration::{EnumerationDefinition, EnumerationRegistry},
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};
use odsgraph_primitives::Relationship;
use std::{collections::BTreeMap, sync::Arc};

///
/// BaseModel
///

#[derive(Debug)]
pub struct BaseModel {
    version: String,
    elements: Vec<BaseElement>,
    by_type: BTreeMap<String, usize>,
    enumerations: EnumerationRegistry,
}

impl BaseModel {
    /// Shared catalogue for a bundled standard version, built on first use.
    pub fn load(version: &str) -> Result<Arc<Self>, InternalError> {
        registry::load(version)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Base element by exact type name (case-insensitive).
    pub fn element_by_type(&self, type_name: &str) -> Result<&BaseElement, InternalError> {
        self.by_type
            .get(&type_name.to_ascii_lowercase())
            .map(|i| &self.elements[*i])
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::BaseModel,
                    format!(
                        "base element '{type_name}' not found in base model '{}'",
                        self.version
                    ),
                )
            })
    }

    /// Base elements whose type names match a glob pattern.
    pub fn elements(&self, pattern: &str) -> Result<Vec<&BaseElement>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Insensitive, ErrorOrigin::BaseModel)?;

        Ok(self
            .elements
            .iter()
            .filter(|e| pattern.is_match(e.type_name()))
            .collect())
    }

    #[must_use]
    pub fn all_elements(&self) -> &[BaseElement] {
        &self.elements
    }

    pub fn top_level_elements(&self) -> impl Iterator<Item = &BaseElement> {
        self.elements.iter().filter(|e| e.is_top_level())
    }

    /// Base elements reachable from `element` through relations with the
    /// given role.
    #[must_use]
    pub fn related_elements(
        &self,
        element: &BaseElement,
        relationship: Relationship,
    ) -> Vec<&BaseElement> {
        element
            .related_type_names(relationship)
            .into_iter()
            .filter_map(|name| self.element_by_type(name).ok())
            .collect()
    }

    #[must_use]
    pub const fn enumerations(&self) -> &EnumerationRegistry {
        &self.enumerations
    }

    pub fn enumeration(&self, name: &str) -> Result<&EnumerationDefinition, InternalError> {
        self.enumerations.get(name)
    }
}
