//! Application model: the per-document element graph layered over a shared
//! [`BaseModel`].
//!
//! Elements are allocated by [`Aid`] and never reuse an id. Relations are
//! kept in an arena keyed by [`RelNo`] and always exist in pairs, each side
//! pointing at the other through `inverse`. Every structural mutation bumps
//! [`ApplicationModel::revision`], which is what derived indices compare
//! against.

mod attribute;
mod builder;
mod element;
mod relation;
mod validate;
mod view;

#[cfg(test)]
mod tests;

pub use attribute::{Attribute, AttributeDef};
pub use builder::{ModelBuilder, TempRelation};
pub use element::Element;
pub use relation::{Relation, RelationDef};
pub use view::{ElementView, RelationView};

use crate::{
    base::BaseModel,
    enumeration::{EnumerationDefinition, EnumerationRegistry},
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};
use derive_more::{Display, FromStr};
use odsgraph_primitives::DataType;
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// Aid
///
/// Application element id, unique within one model.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct Aid(pub u64);

///
/// RelNo
///
/// Relation number, unique within one model.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct RelNo(pub u32);

///
/// AttrNo
///
/// Attribute number, unique and stable within one element. Numbering starts
/// at 1.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct AttrNo(pub u32);

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

fn next_model_id() -> u64 {
    NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed)
}

///
/// ApplicationModel
///
/// Every model, clones included, carries its own process-unique id, so
/// `(id, revision)` identifies one structural state of one model.
///

#[derive(Debug)]
pub struct ApplicationModel {
    id: u64,
    base: Arc<BaseModel>,
    elements: BTreeMap<Aid, Element>,
    relations: BTreeMap<RelNo, Relation>,
    enumerations: EnumerationRegistry,
    next_aid: u64,
    next_rel_no: u32,
    revision: u64,
}

impl Clone for ApplicationModel {
    fn clone(&self) -> Self {
        Self {
            id: next_model_id(),
            base: Arc::clone(&self.base),
            elements: self.elements.clone(),
            relations: self.relations.clone(),
            enumerations: self.enumerations.clone(),
            next_aid: self.next_aid,
            next_rel_no: self.next_rel_no,
            revision: self.revision,
        }
    }
}

impl ApplicationModel {
    #[must_use]
    pub fn new(base: Arc<BaseModel>) -> Self {
        Self {
            id: next_model_id(),
            base,
            elements: BTreeMap::new(),
            relations: BTreeMap::new(),
            enumerations: EnumerationRegistry::new(),
            next_aid: 1,
            next_rel_no: 1,
            revision: 0,
        }
    }

    #[must_use]
    pub fn base(&self) -> &BaseModel {
        &self.base
    }

    #[must_use]
    pub fn base_arc(&self) -> Arc<BaseModel> {
        Arc::clone(&self.base)
    }

    /// Process-unique model id; a clone gets a fresh one.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Structural revision; advances on every element, attribute or relation
    /// change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    //
    // Elements
    //

    /// Create an element bound to `base_type`, or an unbound top-level
    /// element when `base_type` is `None`.
    pub fn create_element(&mut self, name: &str, base_type: Option<&str>) -> Result<Aid, InternalError> {
        if name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                "element name must not be empty",
            ));
        }
        self.check_element_name_free(name)?;

        let (base_type, top_level) = match base_type {
            Some(base_type) => {
                let base = self.base.element_by_type(base_type)?;
                (Some(base.type_name().to_string()), base.is_top_level())
            }
            None => (None, true),
        };

        let aid = Aid(self.next_aid);
        self.next_aid += 1;
        self.elements.insert(
            aid,
            Element::new(aid, name.to_string(), base_type.clone(), top_level),
        );
        self.touch();

        tracing::debug!(%aid, name, base_type = base_type.as_deref().unwrap_or("-"), "element created");

        Ok(aid)
    }

    /// Remove an element together with every relation pair touching it.
    pub fn remove_element(&mut self, aid: Aid) -> Result<(), InternalError> {
        let element = self.element_ref(aid)?;
        let name = element.name.clone();

        let touching: Vec<RelNo> = self
            .relations
            .values()
            .filter(|r| r.elem1 == aid || r.elem2 == aid)
            .map(|r| r.number)
            .collect();
        for number in touching {
            self.drop_relation_pair(number);
        }

        self.elements.remove(&aid);
        self.touch();

        tracing::debug!(%aid, name, "element removed");

        Ok(())
    }

    pub fn rename_element(&mut self, aid: Aid, new_name: &str) -> Result<(), InternalError> {
        if new_name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                "element name must not be empty",
            ));
        }
        if self.element_ref(aid)?.name == new_name {
            return Ok(());
        }
        self.check_element_name_free(new_name)?;

        let element = self.element_mut(aid)?;
        let old = std::mem::replace(&mut element.name, new_name.to_string());
        self.touch();

        tracing::debug!(%aid, %old, new = new_name, "element renamed");

        Ok(())
    }

    pub fn element(&self, aid: Aid) -> Result<ElementView<'_>, InternalError> {
        self.element_ref(aid).map(|e| ElementView::new(self, e))
    }

    /// Element by exact, case-sensitive name.
    pub fn element_by_name(&self, name: &str) -> Result<ElementView<'_>, InternalError> {
        self.elements
            .values()
            .find(|e| e.name == name)
            .map(|e| ElementView::new(self, e))
            .ok_or_else(|| {
                InternalError::not_found(ErrorOrigin::Model, format!("element '{name}' not found"))
            })
    }

    pub fn elements(&self, pattern: &str) -> Result<Vec<ElementView<'_>>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Sensitive, ErrorOrigin::Model)?;

        Ok(self
            .elements
            .values()
            .filter(|e| pattern.is_match(&e.name))
            .map(|e| ElementView::new(self, e))
            .collect())
    }

    #[must_use]
    pub fn elements_by_base_type(&self, base_type: &str) -> Vec<ElementView<'_>> {
        self.elements
            .values()
            .filter(|e| e.is_base_type(base_type))
            .map(|e| ElementView::new(self, e))
            .collect()
    }

    #[must_use]
    pub fn top_level_elements(&self) -> Vec<ElementView<'_>> {
        self.elements
            .values()
            .filter(|e| e.top_level)
            .map(|e| ElementView::new(self, e))
            .collect()
    }

    /// All elements in aid order.
    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    //
    // Attributes
    //

    /// Add an attribute and return its newly assigned number.
    pub fn add_attribute(&mut self, aid: Aid, def: AttributeDef) -> Result<AttrNo, InternalError> {
        let element = self.element_ref(aid)?;

        if def.name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                format!("attribute name on element '{}' must not be empty", element.name),
            ));
        }
        if element.has_attribute(&def.name) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Model,
                format!(
                    "attribute '{}' already exists on element '{}'",
                    def.name, element.name
                ),
            ));
        }

        let base_attr = match def.base_name.as_deref() {
            Some(base_name) => {
                let base_type = element.base_type.as_deref().ok_or_else(|| {
                    InternalError::bad_parameter(
                        ErrorOrigin::Model,
                        format!(
                            "element '{}' has no base element, cannot map base attribute '{base_name}'",
                            element.name
                        ),
                    )
                })?;
                let base_attr = self.base.element_by_type(base_type)?.attribute(base_name)?;
                if element.find_attribute_by_base_name(base_name).is_some() {
                    return Err(InternalError::duplicate(
                        ErrorOrigin::Model,
                        format!(
                            "base attribute '{base_name}' is already mapped on element '{}'",
                            element.name
                        ),
                    ));
                }

                Some(base_attr.clone())
            }
            None => None,
        };

        let data_type = def
            .data_type
            .or_else(|| base_attr.as_ref().map(|b| b.data_type))
            .unwrap_or(DataType::Unknown);
        let enumeration = def
            .enumeration
            .or_else(|| base_attr.as_ref().and_then(|b| b.enumeration.clone()));

        if matches!(data_type, DataType::Enum | DataType::EnumSeq) {
            let Some(enum_name) = enumeration.as_deref() else {
                return Err(InternalError::bad_parameter(
                    ErrorOrigin::Model,
                    format!(
                        "attribute '{}' on element '{}' is {data_type} but names no enumeration",
                        def.name, element.name
                    ),
                ));
            };
            self.resolve_enumeration(enum_name)?;
        }

        let obligatory = def
            .obligatory
            .or_else(|| base_attr.as_ref().map(|b| b.obligatory))
            .unwrap_or(false);
        let unique = def
            .unique
            .or_else(|| base_attr.as_ref().map(|b| b.unique))
            .unwrap_or(false);

        let element = self.element_mut(aid)?;
        let number = element.take_attr_no();
        tracing::debug!(%aid, attr_no = %number, name = %def.name, "attribute added");

        element.attributes.push(Attribute {
            number,
            name: def.name,
            base_name: base_attr.map(|b| b.name),
            data_type,
            obligatory,
            unique,
            enumeration,
            unit: def.unit,
        });
        self.touch();

        Ok(number)
    }

    /// Remove an attribute by name. An absent name is not an error; the
    /// return value tells whether anything was removed.
    pub fn remove_attribute(&mut self, aid: Aid, name: &str) -> Result<bool, InternalError> {
        let element = self.element_mut(aid)?;
        let before = element.attributes.len();
        element.attributes.retain(|a| a.name != name);
        let removed = element.attributes.len() != before;

        if removed {
            self.touch();
            tracing::debug!(%aid, name, "attribute removed");
        }

        Ok(removed)
    }

    pub fn rename_attribute(&mut self, aid: Aid, old: &str, new: &str) -> Result<(), InternalError> {
        let element = self.element_mut(aid)?;
        if old == new {
            element.attribute(old)?;
            return Ok(());
        }
        if new.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                "attribute name must not be empty",
            ));
        }
        if element.has_attribute(new) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Model,
                format!("attribute '{new}' already exists on element '{}'", element.name),
            ));
        }

        let element_name = element.name.clone();
        let attribute = element.find_attribute_mut(old).ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Model,
                format!("attribute '{old}' not found on element '{element_name}'"),
            )
        })?;
        new.clone_into(&mut attribute.name);
        self.touch();

        tracing::debug!(%aid, old, new, "attribute renamed");

        Ok(())
    }

    //
    // Enumerations
    //

    /// Enumerations defined by this document.
    #[must_use]
    pub const fn enumerations(&self) -> &EnumerationRegistry {
        &self.enumerations
    }

    pub const fn enumerations_mut(&mut self) -> &mut EnumerationRegistry {
        &mut self.enumerations
    }

    /// Resolve an enumeration by name: document enumerations first, then
    /// base enumerations.
    pub fn resolve_enumeration(&self, name: &str) -> Result<&EnumerationDefinition, InternalError> {
        self.enumerations
            .get(name)
            .or_else(|_| self.base.enumeration(name))
    }

    //
    // Internals
    //

    pub(crate) fn element_ref(&self, aid: Aid) -> Result<&Element, InternalError> {
        self.elements.get(&aid).ok_or_else(|| missing_aid(aid))
    }

    pub(crate) fn element_mut(&mut self, aid: Aid) -> Result<&mut Element, InternalError> {
        self.elements.get_mut(&aid).ok_or_else(|| missing_aid(aid))
    }

    pub(crate) fn find_element_by_name(&self, name: &str) -> Option<&Element> {
        self.elements.values().find(|e| e.name == name)
    }

    pub(crate) const fn touch(&mut self) {
        self.revision += 1;
    }

    fn check_element_name_free(&self, name: &str) -> Result<(), InternalError> {
        if let Some(existing) = self.find_element_by_name(name) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Model,
                format!("element '{name}' already exists (aid {})", existing.aid),
            ));
        }

        Ok(())
    }
}

fn missing_aid(aid: Aid) -> InternalError {
    InternalError::not_found(ErrorOrigin::Model, format!("element with aid {aid} not found"))
}
