use super::{BaseElement, BaseModel, BaseRelation};
use crate::{
    enumeration::{EnumerationDefinition, EnumerationRegistry},
    err,
    error::{ErrorOrigin, ErrorTree, InternalError},
};
use odsgraph_primitives::DataType;
use std::collections::{BTreeMap, BTreeSet};

///
/// BaseModelBuilder
///
/// Collects base elements and enumerations, then checks the catalogue as a
/// whole: unique names, resolvable relation targets, and inverse relations
/// that mirror each other.
///

#[derive(Debug)]
pub struct BaseModelBuilder {
    version: String,
    elements: Vec<BaseElement>,
    enumerations: Vec<EnumerationDefinition>,
}

impl BaseModelBuilder {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            elements: Vec::new(),
            enumerations: Vec::new(),
        }
    }

    #[must_use]
    pub fn element(mut self, element: BaseElement) -> Self {
        self.elements.push(element);
        self
    }

    #[must_use]
    pub fn enumeration(mut self, enumeration: EnumerationDefinition) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    pub fn build(self) -> Result<BaseModel, InternalError> {
        let mut errs = ErrorTree::new();

        let mut by_type = BTreeMap::new();
        for (i, element) in self.elements.iter().enumerate() {
            let key = element.type_name().to_ascii_lowercase();
            if key.is_empty() {
                err!(errs, "base element at position {i} has an empty type name");
            } else if by_type.insert(key, i).is_some() {
                err!(errs, "duplicate base element '{}'", element.type_name());
            }
        }

        let mut enumerations = EnumerationRegistry::new();
        for mut def in self.enumerations {
            def.freeze();
            if let Err(e) = enumerations.insert(def) {
                errs.add(e);
            }
        }

        for element in &self.elements {
            check_attributes(element, &enumerations, &mut errs);
            for relation in element.relations() {
                check_relation(element, relation, &self.elements, &by_type, &mut errs);
            }
        }

        errs.result().map_err(|tree| {
            InternalError::constraint(
                ErrorOrigin::BaseModel,
                format!("base model '{}' is inconsistent: {tree}", self.version),
            )
        })?;

        Ok(BaseModel {
            version: self.version,
            elements: self.elements,
            by_type,
            enumerations,
        })
    }
}

fn check_attributes(element: &BaseElement, enumerations: &EnumerationRegistry, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for attr in element.attributes() {
        if !seen.insert(attr.name.to_ascii_lowercase()) {
            err!(
                errs,
                "base element '{}' declares attribute '{}' twice",
                element.type_name(),
                attr.name
            );
        }

        let is_enum = matches!(attr.data_type, DataType::Enum | DataType::EnumSeq);
        match (&attr.enumeration, is_enum) {
            (Some(name), true) if !enumerations.contains(name) => err!(
                errs,
                "base attribute '{}.{}' references unknown enumeration '{name}'",
                element.type_name(),
                attr.name
            ),
            (None, true) => err!(
                errs,
                "base attribute '{}.{}' is {} but names no enumeration",
                element.type_name(),
                attr.name,
                attr.data_type
            ),
            (Some(_), false) => err!(
                errs,
                "base attribute '{}.{}' names an enumeration but is {}",
                element.type_name(),
                attr.name,
                attr.data_type
            ),
            _ => {}
        }
    }
}

fn check_relation(
    element: &BaseElement,
    relation: &BaseRelation,
    elements: &[BaseElement],
    by_type: &BTreeMap<String, usize>,
    errs: &mut ErrorTree,
) {
    let source = element.type_name();

    if relation.targets().is_empty() {
        err!(errs, "base relation '{source}.{}' has no target", relation.name());
    }
    if !relation.range().is_well_formed() || !relation.inverse_range().is_well_formed() {
        err!(
            errs,
            "base relation '{source}.{}' has malformed cardinality {} / {}",
            relation.name(),
            relation.range(),
            relation.inverse_range()
        );
    }

    for target in relation.targets() {
        let Some(index) = by_type.get(&target.elem2.to_ascii_lowercase()) else {
            err!(
                errs,
                "base relation '{source}.{}' targets unknown base element '{}'",
                relation.name(),
                target.elem2
            );
            continue;
        };

        let Ok(inverse) = elements[*index].relation(&target.inverse_name, Some(source)) else {
            err!(
                errs,
                "base relation '{source}.{}' has no inverse '{}' on '{}'",
                relation.name(),
                target.inverse_name,
                target.elem2
            );
            continue;
        };

        if inverse.relationship() != relation.inverse_relationship()
            || inverse.range() != relation.inverse_range()
            || inverse.inverse_range() != relation.range()
        {
            err!(
                errs,
                "base relation '{source}.{}' and its inverse '{}.{}' disagree on role or cardinality",
                relation.name(),
                target.elem2,
                target.inverse_name
            );
        }
    }
}
