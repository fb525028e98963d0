use super::{Aid, ApplicationModel, AttrNo, AttributeDef, RelationDef};
use crate::{
    base::BaseRelation,
    error::{ErrorOrigin, InternalError},
};
use odsgraph_primitives::RelationRange;
use std::collections::BTreeMap;

///
/// TempRelation
///
/// One relation declaration as read from a model source, before both of its
/// elements exist. Element names are application names; cardinality is kept
/// as text until the relation is linked.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TempRelation {
    pub source: String,
    pub target: String,
    pub name: String,
    pub inverse_name: String,
    pub base_name: Option<String>,
    pub min: String,
    pub max: String,
}

impl TempRelation {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
        inverse_name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            name: name.into(),
            inverse_name: inverse_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    #[must_use]
    pub fn cardinality(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min = min.into();
        self.max = max.into();
        self
    }

    /// Parsed cardinality; `None` when neither bound was given.
    pub fn range(&self) -> Result<Option<RelationRange>, InternalError> {
        if self.min.trim().is_empty() && self.max.trim().is_empty() {
            return Ok(None);
        }

        let bound = |text: &str, default: i16| {
            if text.trim().is_empty() {
                return Ok(default);
            }
            RelationRange::parse_bound(text).ok_or_else(|| {
                InternalError::bad_parameter(
                    ErrorOrigin::Model,
                    format!(
                        "relation '{}.{}': invalid cardinality bound '{text}'",
                        self.source, self.name
                    ),
                )
            })
        };
        let range = RelationRange::new(bound(&self.min, 0)?, bound(&self.max, RelationRange::MANY)?);
        if !range.is_well_formed() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                format!(
                    "relation '{}.{}': invalid cardinality {}..{}",
                    self.source, self.name, self.min, self.max
                ),
            ));
        }

        Ok(Some(range))
    }

    fn key(&self) -> (String, String) {
        (self.source.clone(), self.name.clone())
    }

    // Fill fields the first declaration left empty.
    fn merge(&mut self, other: Self) {
        fill(&mut self.target, other.target);
        fill(&mut self.inverse_name, other.inverse_name);
        fill(&mut self.min, other.min);
        fill(&mut self.max, other.max);
        if self.base_name.is_none() {
            self.base_name = other.base_name;
        }
    }
}

fn fill(slot: &mut String, value: String) {
    if slot.is_empty() {
        *slot = value;
    }
}

///
/// ModelBuilder
///
/// Incremental construction front end used by model readers. Elements and
/// attributes go straight into the model; relations are parked as
/// [`TempRelation`] records keyed by (source element, relation name) until
/// both elements exist and the inverse side has been declared, then linked
/// as a pair. [`ModelBuilder::finish`] links whatever is left using base
/// model defaults for the undeclared inverse side.
///

#[derive(Debug)]
pub struct ModelBuilder<'m> {
    model: &'m mut ApplicationModel,
    pending: BTreeMap<(String, String), TempRelation>,
}

impl<'m> ModelBuilder<'m> {
    pub const fn new(model: &'m mut ApplicationModel) -> Self {
        Self {
            model,
            pending: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &ApplicationModel {
        self.model
    }

    /// Number of relation declarations not yet linked.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &TempRelation> {
        self.pending.values()
    }

    pub fn element(&mut self, name: &str, base_type: Option<&str>) -> Result<Aid, InternalError> {
        let aid = self.model.create_element(name, base_type)?;
        self.resolve_ready()?;

        Ok(aid)
    }

    pub fn attribute(&mut self, element: &str, def: AttributeDef) -> Result<AttrNo, InternalError> {
        let aid = self.aid(element)?;

        self.model.add_attribute(aid, def)
    }

    /// Add an item to a document enumeration, creating the enumeration on
    /// first use. `index` of `None` appends.
    pub fn enumeration_item(
        &mut self,
        enumeration: &str,
        index: Option<i32>,
        item: &str,
    ) -> Result<i32, InternalError> {
        let registry = self.model.enumerations_mut();
        let def = if registry.contains(enumeration) {
            registry.get_mut(enumeration)?
        } else {
            registry.create(enumeration)?
        };

        match index {
            Some(index) => def.add_item(index, item).map(|()| index),
            None => def.add_next_item(item),
        }
    }

    /// Record a relation declaration. Repeated declarations of the same
    /// (source, name) collapse into one record.
    pub fn relation(&mut self, temp: TempRelation) -> Result<(), InternalError> {
        if temp.source.is_empty() || temp.name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                "relation declaration needs a source element and a name",
            ));
        }
        temp.range()?;

        match self.pending.get_mut(&temp.key()) {
            Some(existing) => existing.merge(temp),
            None => {
                self.pending.insert(temp.key(), temp);
            }
        }

        self.resolve_ready()
    }

    /// Link remaining declarations whose inverse side was never declared,
    /// taking the inverse cardinality from the base relation (or 0..Many).
    /// Declarations whose elements never appeared are reported as not found.
    pub fn finish(mut self) -> Result<(), InternalError> {
        self.resolve_ready()?;

        let mut unresolved = Vec::new();
        let keys: Vec<_> = self.pending.keys().cloned().collect();
        for key in keys {
            let Some(temp) = self.pending.remove(&key) else {
                continue;
            };
            if self.model.find_element_by_name(&temp.source).is_none()
                || self.model.find_element_by_name(&temp.target).is_none()
            {
                tracing::warn!(
                    source = %temp.source,
                    target = %temp.target,
                    relation = %temp.name,
                    "relation declaration left unresolved"
                );
                unresolved.push(format!("{}.{} -> {}", temp.source, temp.name, temp.target));
                continue;
            }

            // the inverse may have been linked earlier in this loop
            if self.is_linked(&temp) {
                continue;
            }
            self.link(&temp, None)?;
        }

        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(InternalError::not_found(
                ErrorOrigin::Model,
                format!(
                    "relation declarations reference missing elements: {}",
                    unresolved.join(", ")
                ),
            ))
        }
    }

    // Link every record whose two elements exist and whose inverse record
    // is also present.
    fn resolve_ready(&mut self) -> Result<(), InternalError> {
        let ready: Vec<(String, String)> = self
            .pending
            .iter()
            .filter(|(_, t)| {
                self.model.find_element_by_name(&t.source).is_some()
                    && self.model.find_element_by_name(&t.target).is_some()
                    && self.pending.contains_key(&(t.target.clone(), t.inverse_name.clone()))
            })
            .map(|(k, _)| k.clone())
            .collect();

        for key in ready {
            let Some(temp) = self.pending.remove(&key) else {
                continue;
            };
            let inverse = self
                .pending
                .remove(&(temp.target.clone(), temp.inverse_name.clone()));
            self.link(&temp, inverse.as_ref())?;
        }

        Ok(())
    }

    // Ranges and role left open here are filled from the base relation by
    // `create_relation`.
    fn link(&mut self, temp: &TempRelation, inverse: Option<&TempRelation>) -> Result<(), InternalError> {
        if let Some(inverse) = inverse
            && temp.base_name.is_none()
            && inverse.base_name.is_some()
        {
            return self.link(inverse, Some(temp));
        }

        let elem1 = self.aid(&temp.source)?;
        let elem2 = self.aid(&temp.target)?;

        let mut def = RelationDef::new(elem1, elem2, &temp.name, &temp.inverse_name);
        def.base_name.clone_from(&temp.base_name);
        def.range = temp.range()?;
        if let Some(inverse) = inverse {
            def.inverse_range = inverse.range()?;
        }

        if def.inverse_name.is_empty()
            && let Some(base) = self.base_relation_for(temp)?
            && let Some(name) = self.base_inverse_name(temp, base)
        {
            def.inverse_name = name;
        }

        self.model.create_relation(def).map(|_| ())
    }

    fn base_relation_for(&self, temp: &TempRelation) -> Result<Option<&BaseRelation>, InternalError> {
        let Some(base_name) = temp.base_name.as_deref() else {
            return Ok(None);
        };
        let source = self.model.element_ref(self.aid(&temp.source)?)?;
        let target = self.model.element_ref(self.aid(&temp.target)?)?;
        let Some(base_type) = source.base_type() else {
            return Ok(None);
        };

        self.model
            .base()
            .element_by_type(base_type)?
            .relation(base_name, target.base_type())
            .map(Some)
    }

    fn base_inverse_name(&self, temp: &TempRelation, base: &BaseRelation) -> Option<String> {
        let target = self.model.find_element_by_name(&temp.target)?;

        base.inverse_name(target.base_type()?).map(str::to_string)
    }

    fn is_linked(&self, temp: &TempRelation) -> bool {
        self.model
            .find_element_by_name(&temp.source)
            .is_some_and(|e| self.model.find_relation(e, &temp.name).is_some())
    }

    fn aid(&self, name: &str) -> Result<Aid, InternalError> {
        self.model
            .find_element_by_name(name)
            .map(|e| e.aid)
            .ok_or_else(|| {
                InternalError::not_found(ErrorOrigin::Model, format!("element '{name}' not found"))
            })
    }
}
