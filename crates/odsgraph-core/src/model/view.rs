use super::{ApplicationModel, Element, RelNo, Relation};
use crate::{
    base::{BaseAttribute, BaseElement},
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};
use odsgraph_primitives::{RelationType, Relationship};
use std::ops::Deref;

///
/// ElementView
///
/// Borrowed element with access to the owning model, so relations can be
/// followed to their targets and inverses.
///

#[derive(Clone, Copy, Debug)]
pub struct ElementView<'a> {
    model: &'a ApplicationModel,
    element: &'a Element,
}

impl<'a> ElementView<'a> {
    pub(crate) const fn new(model: &'a ApplicationModel, element: &'a Element) -> Self {
        Self { model, element }
    }

    #[must_use]
    pub const fn element(&self) -> &'a Element {
        self.element
    }

    #[must_use]
    pub const fn model(&self) -> &'a ApplicationModel {
        self.model
    }

    /// Base element this element specializes.
    pub fn base_element(&self) -> Result<&'a BaseElement, InternalError> {
        let base_type = self.element.base_type().ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Model,
                format!("element '{}' has no base element", self.element.name),
            )
        })?;

        self.model.base().element_by_type(base_type)
    }

    /// Base attribute mapped by an application attribute.
    pub fn base_attribute(&self, name: &str) -> Result<&'a BaseAttribute, InternalError> {
        let attribute = self.element.attribute(name)?;
        let base_name = attribute.base_name().ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Model,
                format!(
                    "attribute '{name}' on element '{}' maps no base attribute",
                    self.element.name
                ),
            )
        })?;

        self.base_element()?.attribute(base_name)
    }

    /// Relations owned by this element, in creation order.
    #[must_use]
    pub fn relations(&self) -> Vec<RelationView<'a>> {
        self.element
            .relations
            .iter()
            .filter_map(|n| self.model.relations.get(n))
            .map(|r| RelationView::new(self.model, r))
            .collect()
    }

    pub fn relations_matching(&self, pattern: &str) -> Result<Vec<RelationView<'a>>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Sensitive, ErrorOrigin::Model)?;

        Ok(self
            .relations()
            .into_iter()
            .filter(|r| pattern.is_match(r.name()))
            .collect())
    }

    /// Relations with the given role (`AllRel` for every role).
    #[must_use]
    pub fn relations_by_relationship(&self, relationship: Relationship) -> Vec<RelationView<'a>> {
        self.relations()
            .into_iter()
            .filter(|r| r.relationship().matches(relationship))
            .collect()
    }

    #[must_use]
    pub fn relations_by_type(&self, relation_type: RelationType) -> Vec<RelationView<'a>> {
        self.relations()
            .into_iter()
            .filter(|r| r.relation_type() == Some(relation_type))
            .collect()
    }

    pub fn relation_by_name(&self, name: &str) -> Result<RelationView<'a>, InternalError> {
        self.model
            .find_relation(self.element, name)
            .and_then(|n| self.model.relations.get(&n))
            .map(|r| RelationView::new(self.model, r))
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::Model,
                    format!(
                        "relation '{name}' not found on element '{}'",
                        self.element.name
                    ),
                )
            })
    }

    /// Relation mapped to a base relation (case-insensitive).
    pub fn relation_by_base_name(&self, base_name: &str) -> Result<RelationView<'a>, InternalError> {
        self.relations()
            .into_iter()
            .find(|r| r.base_name().is_some_and(|b| b.eq_ignore_ascii_case(base_name)))
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::Model,
                    format!(
                        "no relation mapping base relation '{base_name}' on element '{}'",
                        self.element.name
                    ),
                )
            })
    }

    pub fn relation_by_no(&self, number: RelNo) -> Result<RelationView<'a>, InternalError> {
        self.relations()
            .into_iter()
            .find(|r| r.number() == number)
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::Model,
                    format!(
                        "relation number {number} not found on element '{}'",
                        self.element.name
                    ),
                )
            })
    }

    /// Elements reachable through relations with the given role, without
    /// duplicates.
    #[must_use]
    pub fn related_elements(&self, relationship: Relationship) -> Vec<ElementView<'a>> {
        let mut out: Vec<ElementView<'a>> = Vec::new();
        for relation in self.relations_by_relationship(relationship) {
            if let Ok(target) = relation.elem2_view()
                && !out.iter().any(|e| e.aid() == target.aid())
            {
                out.push(target);
            }
        }

        out
    }
}

impl Deref for ElementView<'_> {
    type Target = Element;

    fn deref(&self) -> &Self::Target {
        self.element
    }
}

///
/// RelationView
///

#[derive(Clone, Copy, Debug)]
pub struct RelationView<'a> {
    model: &'a ApplicationModel,
    relation: &'a Relation,
}

impl<'a> RelationView<'a> {
    pub(crate) const fn new(model: &'a ApplicationModel, relation: &'a Relation) -> Self {
        Self { model, relation }
    }

    #[must_use]
    pub const fn relation(&self) -> &'a Relation {
        self.relation
    }

    pub fn inverse_relation(&self) -> Result<Self, InternalError> {
        self.model
            .relation(self.relation.inverse)
            .map(|r| Self::new(self.model, r))
    }

    /// Name of the inverse side; empty if the pair is broken.
    #[must_use]
    pub fn inverse_relation_name(&self) -> &'a str {
        self.model
            .relations
            .get(&self.relation.inverse)
            .map_or("", |r| r.name.as_str())
    }

    pub fn elem1_view(&self) -> Result<ElementView<'a>, InternalError> {
        self.model.element(self.relation.elem1)
    }

    pub fn elem2_view(&self) -> Result<ElementView<'a>, InternalError> {
        self.model.element(self.relation.elem2)
    }
}

impl Deref for RelationView<'_> {
    type Target = Relation;

    fn deref(&self) -> &Self::Target {
        self.relation
    }
}
