//! Derived lookup indices over an [`ApplicationModel`].
//!
//! The cache is never authoritative. It records the id and revision of the
//! model it was built from and is rebuilt in full once either differs.

use crate::{
    error::{ErrorOrigin, InternalError},
    model::{Aid, ApplicationModel, AttrNo, RelNo},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ModelCache
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModelCache {
    source: Option<(u64, u64)>,
    aids_by_base_type: BTreeMap<String, BTreeSet<Aid>>,
    names: BTreeMap<Aid, String>,
    base_types: BTreeMap<Aid, String>,
    aids_by_name: BTreeMap<String, Aid>,
    attrs_by_name: BTreeMap<Aid, BTreeMap<String, AttrNo>>,
    attrs_by_base_name: BTreeMap<Aid, BTreeMap<String, AttrNo>>,
    relations_by_name: BTreeMap<Aid, BTreeMap<String, RelNo>>,
}

impl ModelCache {
    /// Build every index from the current state of `model`.
    #[must_use]
    pub fn build(model: &ApplicationModel) -> Self {
        let mut cache = Self {
            source: Some((model.id(), model.revision())),
            ..Self::default()
        };

        for element in model.all_elements() {
            let aid = element.aid();

            cache.names.insert(aid, element.name().to_string());
            cache.aids_by_name.insert(element.name().to_string(), aid);

            if let Some(base_type) = element.base_type() {
                cache.base_types.insert(aid, base_type.to_string());
                cache
                    .aids_by_base_type
                    .entry(base_type.to_ascii_lowercase())
                    .or_default()
                    .insert(aid);
            }

            let by_name = cache.attrs_by_name.entry(aid).or_default();
            let by_base = cache.attrs_by_base_name.entry(aid).or_default();
            for attribute in element.attributes() {
                by_name.insert(attribute.name().to_string(), attribute.number());
                if let Some(base_name) = attribute.base_name() {
                    by_base.insert(base_name.to_ascii_lowercase(), attribute.number());
                }
            }

            let relations = cache.relations_by_name.entry(aid).or_default();
            for number in element.relation_numbers() {
                if let Ok(relation) = model.relation(*number) {
                    relations.insert(relation.name().to_string(), *number);
                }
            }
        }

        tracing::trace!(
            revision = model.revision(),
            elements = cache.names.len(),
            "model cache rebuilt"
        );

        cache
    }

    /// Whether `model` changed since this cache was built.
    #[must_use]
    pub fn is_stale(&self, model: &ApplicationModel) -> bool {
        self.source != Some((model.id(), model.revision()))
    }

    /// Rebuild if stale; returns whether a rebuild happened.
    pub fn refresh(&mut self, model: &ApplicationModel) -> bool {
        if !self.is_stale(model) {
            return false;
        }
        *self = Self::build(model);

        true
    }

    /// Model revision the indices reflect; `None` before the first build.
    #[must_use]
    pub const fn revision(&self) -> Option<u64> {
        match self.source {
            Some((_, revision)) => Some(revision),
            None => None,
        }
    }

    /// Aids of elements specializing `base_type` (case-insensitive).
    #[must_use]
    pub fn aids_by_base_type(&self, base_type: &str) -> Option<&BTreeSet<Aid>> {
        self.aids_by_base_type.get(&base_type.to_ascii_lowercase())
    }

    pub fn element_name(&self, aid: Aid) -> Result<&str, InternalError> {
        self.names
            .get(&aid)
            .map(String::as_str)
            .ok_or_else(|| missing(format!("aid {aid}")))
    }

    pub fn base_type(&self, aid: Aid) -> Result<&str, InternalError> {
        self.base_types
            .get(&aid)
            .map(String::as_str)
            .ok_or_else(|| missing(format!("base type of aid {aid}")))
    }

    pub fn aid(&self, name: &str) -> Result<Aid, InternalError> {
        self.aids_by_name
            .get(name)
            .copied()
            .ok_or_else(|| missing(format!("element '{name}'")))
    }

    pub fn attr_no(&self, aid: Aid, name: &str) -> Result<AttrNo, InternalError> {
        self.attrs_by_name
            .get(&aid)
            .and_then(|m| m.get(name))
            .copied()
            .ok_or_else(|| missing(format!("attribute '{name}' of aid {aid}")))
    }

    pub fn attr_no_by_base_name(&self, aid: Aid, base_name: &str) -> Result<AttrNo, InternalError> {
        self.attrs_by_base_name
            .get(&aid)
            .and_then(|m| m.get(&base_name.to_ascii_lowercase()))
            .copied()
            .ok_or_else(|| missing(format!("base attribute '{base_name}' of aid {aid}")))
    }

    pub fn relation_no(&self, aid: Aid, name: &str) -> Result<RelNo, InternalError> {
        self.relations_by_name
            .get(&aid)
            .and_then(|m| m.get(name))
            .copied()
            .ok_or_else(|| missing(format!("relation '{name}' of aid {aid}")))
    }

    /// Application attribute name → number map of one element.
    #[must_use]
    pub fn attributes(&self, aid: Aid) -> Option<&BTreeMap<String, AttrNo>> {
        self.attrs_by_name.get(&aid)
    }

    #[must_use]
    pub fn relations(&self, aid: Aid) -> Option<&BTreeMap<String, RelNo>> {
        self.relations_by_name.get(&aid)
    }
}

fn missing(what: String) -> InternalError {
    InternalError::not_found(ErrorOrigin::Cache, format!("{what} not in model cache"))
}
