use super::{ApplicationModel, Element, relation::check_pair};
use crate::{
    err,
    error::{ErrorTree, InternalError},
};
use std::collections::BTreeSet;

impl ApplicationModel {
    /// Check the whole model and report every problem found: base coverage of
    /// each element, attribute numbering, and consistency of relation pairs.
    pub fn validate(&self) -> Result<(), InternalError> {
        let mut errs = ErrorTree::new();

        for element in self.elements.values() {
            self.validate_base_coverage(element, &mut errs);
            validate_attribute_numbers(element, &mut errs);
        }
        self.validate_relation_pairs(&mut errs);

        errs.result()?;

        Ok(())
    }

    fn validate_base_coverage(&self, element: &Element, errs: &mut ErrorTree) {
        let Some(base_type) = element.base_type() else {
            return;
        };
        let base = match self.base().element_by_type(base_type) {
            Ok(base) => base,
            Err(e) => {
                err!(errs, "element '{}': {e}", element.name);
                return;
            }
        };

        for base_attr in base.obligatory_attributes() {
            if element.find_attribute_by_base_name(&base_attr.name).is_none() {
                err!(
                    errs,
                    "element '{}' does not map obligatory base attribute '{}'",
                    element.name,
                    base_attr.name
                );
            }
        }

        for base_rel in base.mandatory_relations() {
            let mapped = element.relations.iter().any(|n| {
                self.relations
                    .get(n)
                    .and_then(|r| r.base_name())
                    .is_some_and(|b| b.eq_ignore_ascii_case(base_rel.name()))
            });
            if !mapped {
                err!(
                    errs,
                    "element '{}' has no relation for mandatory base relation '{}'",
                    element.name,
                    base_rel.name()
                );
            }
        }
    }

    fn validate_relation_pairs(&self, errs: &mut ErrorTree) {
        for relation in self.relations.values() {
            let Some(inverse) = self.relations.get(&relation.inverse) else {
                err!(
                    errs,
                    "relation '{}' ({}) has no inverse",
                    relation.name,
                    relation.number
                );
                continue;
            };

            if inverse.inverse != relation.number {
                err!(
                    errs,
                    "relation '{}' ({}) is not the inverse of its own inverse",
                    relation.name,
                    relation.number
                );
            }
            if inverse.elem1 != relation.elem2 || inverse.elem2 != relation.elem1 {
                err!(
                    errs,
                    "relation '{}' ({}) and its inverse do not connect the same elements",
                    relation.name,
                    relation.number
                );
            }
            if inverse.relationship != relation.relationship.inverse() {
                err!(
                    errs,
                    "relation '{}' ({}) is {} but its inverse is {}",
                    relation.name,
                    relation.number,
                    relation.relationship,
                    inverse.relationship
                );
            }
            if let Err(e) = check_pair(
                &relation.name,
                relation.relationship,
                relation.range,
                inverse.range,
            ) {
                errs.add(e);
            }
            if !self.elements.contains_key(&relation.elem1)
                || !self.elements.contains_key(&relation.elem2)
            {
                err!(
                    errs,
                    "relation '{}' ({}) references a removed element",
                    relation.name,
                    relation.number
                );
            }
        }
    }
}

fn validate_attribute_numbers(element: &Element, errs: &mut ErrorTree) {
    let mut numbers = BTreeSet::new();

    for attribute in &element.attributes {
        if !numbers.insert(attribute.number) {
            err!(
                errs,
                "element '{}' assigns attribute number {} twice",
                element.name,
                attribute.number
            );
        }
        if attribute.number.0 >= element.next_attr_no {
            err!(
                errs,
                "element '{}' attribute '{}' has number {} beyond the allocator",
                element.name,
                attribute.name,
                attribute.number
            );
        }
    }
}
