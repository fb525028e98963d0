use super::{Aid, ApplicationModel, Element, RelNo};
use crate::{
    base::BaseRelation,
    error::{ErrorOrigin, InternalError},
};
use odsgraph_primitives::{RelationRange, RelationType, Relationship};

///
/// Relation
///
/// One side of an application relation pair. `relationship` is the role of
/// `elem2` as seen from `elem1`; the inverse side carries the inverse role.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Relation {
    pub(crate) number: RelNo,
    pub(crate) name: String,
    pub(crate) elem1: Aid,
    pub(crate) elem2: Aid,
    pub(crate) inverse: RelNo,
    pub(crate) range: RelationRange,
    pub(crate) relationship: Relationship,
    pub(crate) base_relation: Option<BaseRelation>,
}

impl Relation {
    #[must_use]
    pub const fn number(&self) -> RelNo {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning element.
    #[must_use]
    pub const fn elem1(&self) -> Aid {
        self.elem1
    }

    /// Target element.
    #[must_use]
    pub const fn elem2(&self) -> Aid {
        self.elem2
    }

    #[must_use]
    pub const fn inverse_number(&self) -> RelNo {
        self.inverse
    }

    #[must_use]
    pub const fn range(&self) -> RelationRange {
        self.range
    }

    #[must_use]
    pub const fn min(&self) -> i16 {
        self.range.min
    }

    /// Upper bound; [`RelationRange::MANY`] when unbounded.
    #[must_use]
    pub const fn max(&self) -> i16 {
        self.range.max
    }

    #[must_use]
    pub const fn relationship(&self) -> Relationship {
        self.relationship
    }

    #[must_use]
    pub const fn relation_type(&self) -> Option<RelationType> {
        self.relationship.relation_type()
    }

    #[must_use]
    pub const fn base_relation(&self) -> Option<&BaseRelation> {
        self.base_relation.as_ref()
    }

    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        self.base_relation.as_ref().map(BaseRelation::name)
    }
}

///
/// RelationDef
///
/// Declaration of a relation pair. Unset ranges and role are taken from the
/// mapped base relation, or default to an unconstrained info relation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationDef {
    pub elem1: Aid,
    pub elem2: Aid,
    pub name: String,
    pub inverse_name: String,
    pub base_name: Option<String>,
    pub range: Option<RelationRange>,
    pub inverse_range: Option<RelationRange>,
    pub relationship: Option<Relationship>,
}

impl RelationDef {
    #[must_use]
    pub fn new(
        elem1: Aid,
        elem2: Aid,
        name: impl Into<String>,
        inverse_name: impl Into<String>,
    ) -> Self {
        Self {
            elem1,
            elem2,
            name: name.into(),
            inverse_name: inverse_name.into(),
            base_name: None,
            range: None,
            inverse_range: None,
            relationship: None,
        }
    }

    #[must_use]
    pub fn base(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    #[must_use]
    pub const fn range(mut self, range: RelationRange) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub const fn inverse_range(mut self, range: RelationRange) -> Self {
        self.inverse_range = Some(range);
        self
    }

    #[must_use]
    pub const fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = Some(relationship);
        self
    }
}

/// Role for a relation declared without a base relation or explicit role.
#[must_use]
pub const fn infer_relationship(range: RelationRange, inverse_range: RelationRange) -> Relationship {
    if range.max == 1 {
        Relationship::InfoTo
    } else if inverse_range.max == 1 {
        Relationship::InfoFrom
    } else {
        Relationship::InfoRel
    }
}

/// Check that a role and the cardinality of both sides fit together: ranges
/// are well formed and the side pointing at a father or an info target holds
/// at most one link.
pub fn check_pair(
    name: &str,
    relationship: Relationship,
    range: RelationRange,
    inverse_range: RelationRange,
) -> Result<(), InternalError> {
    let bad = |msg: String| Err(InternalError::bad_parameter(ErrorOrigin::Model, msg));

    if matches!(relationship, Relationship::AllRel) {
        return bad(format!("relation '{name}' cannot use the ALL_REL filter as its role"));
    }
    if !range.is_well_formed() || !inverse_range.is_well_formed() {
        return bad(format!(
            "relation '{name}' has malformed cardinality {range} / {inverse_range}"
        ));
    }
    for (role, side) in [(relationship, range), (relationship.inverse(), inverse_range)] {
        if matches!(role, Relationship::Father | Relationship::InfoTo) && side.max != 1 {
            return bad(format!(
                "relation '{name}': a {role} side must have max 1, found {side}"
            ));
        }
    }

    Ok(())
}

impl ApplicationModel {
    /// Create a relation pair and return the number of the `elem1` side.
    pub fn create_relation(&mut self, def: RelationDef) -> Result<RelNo, InternalError> {
        let e1 = self.element_ref(def.elem1)?;
        let e2 = self.element_ref(def.elem2)?;

        if def.name.is_empty() || def.inverse_name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Model,
                format!(
                    "relation between '{}' and '{}' needs both a name and an inverse name",
                    e1.name, e2.name
                ),
            ));
        }
        self.check_relation_name_free(e1, &def.name)?;
        self.check_relation_name_free(e2, &def.inverse_name)?;
        if def.elem1 == def.elem2 && def.name == def.inverse_name {
            return Err(InternalError::duplicate(
                ErrorOrigin::Model,
                format!(
                    "self relation '{}' on '{}' needs distinct inverse name",
                    def.name, e1.name
                ),
            ));
        }

        let (base, inverse_base) = match def.base_name.as_deref() {
            Some(base_name) => {
                let (base, inverse_base) = self.resolve_base_relation(e1, e2, base_name)?;
                (Some(base), inverse_base)
            }
            None => (None, None),
        };

        let range = def
            .range
            .or_else(|| base.as_ref().map(BaseRelation::range))
            .unwrap_or_default();
        let inverse_range = def
            .inverse_range
            .or_else(|| base.as_ref().map(BaseRelation::inverse_range))
            .unwrap_or_default();
        let relationship = match (def.relationship, base.as_ref()) {
            (Some(explicit), Some(b)) if explicit != b.relationship() => {
                return Err(InternalError::bad_parameter(
                    ErrorOrigin::Model,
                    format!(
                        "relation '{}' declares role {explicit} but base relation '{}' is {}",
                        def.name,
                        b.name(),
                        b.relationship()
                    ),
                ));
            }
            (Some(explicit), _) => explicit,
            (None, Some(b)) => b.relationship(),
            (None, None) => infer_relationship(range, inverse_range),
        };
        check_pair(&def.name, relationship, range, inverse_range)?;

        let forward = RelNo(self.next_rel_no);
        let backward = RelNo(self.next_rel_no + 1);
        self.next_rel_no += 2;

        self.relations.insert(
            forward,
            Relation {
                number: forward,
                name: def.name,
                elem1: def.elem1,
                elem2: def.elem2,
                inverse: backward,
                range,
                relationship,
                base_relation: base,
            },
        );
        self.relations.insert(
            backward,
            Relation {
                number: backward,
                name: def.inverse_name,
                elem1: def.elem2,
                elem2: def.elem1,
                inverse: forward,
                range: inverse_range,
                relationship: relationship.inverse(),
                base_relation: inverse_base,
            },
        );
        self.element_mut(def.elem1)?.relations.push(forward);
        self.element_mut(def.elem2)?.relations.push(backward);
        self.touch();

        tracing::debug!(
            rel_no = %forward,
            elem1 = %def.elem1,
            elem2 = %def.elem2,
            %relationship,
            "relation linked"
        );

        Ok(forward)
    }

    /// Remove a relation and its inverse by name. An absent name is not an
    /// error; the return value tells whether anything was removed.
    pub fn remove_relation(&mut self, aid: Aid, name: &str) -> Result<bool, InternalError> {
        let element = self.element_ref(aid)?;
        let Some(number) = self.find_relation(element, name) else {
            return Ok(false);
        };

        self.drop_relation_pair(number);
        self.touch();
        tracing::debug!(%aid, name, "relation removed");

        Ok(true)
    }

    /// Rebind a relation (and its inverse) to another base relation, or
    /// unbind it with `None`. Relation numbers, names and ranges stay as they
    /// are; the role follows the new base relation.
    pub fn update_base_relation(
        &mut self,
        aid: Aid,
        name: &str,
        base_name: Option<&str>,
    ) -> Result<(), InternalError> {
        let element = self.element_ref(aid)?;
        let number = self.find_relation(element, name).ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Model,
                format!("relation '{name}' not found on element '{}'", element.name),
            )
        })?;
        let relation = self.relation(number)?;
        let inverse_no = relation.inverse;
        let inverse_range = self.relation(inverse_no)?.range;

        let (base, inverse_base, relationship) = match base_name {
            Some(base_name) => {
                let target = self.element_ref(relation.elem2)?;
                let (base, inverse_base) = self.resolve_base_relation(element, target, base_name)?;
                let relationship = base.relationship();
                check_pair(name, relationship, relation.range, inverse_range)?;

                (Some(base), inverse_base, relationship)
            }
            None => (None, None, relation.relationship),
        };

        if let Some(forward) = self.relations.get_mut(&number) {
            forward.base_relation = base;
            forward.relationship = relationship;
        }
        if let Some(backward) = self.relations.get_mut(&inverse_no) {
            backward.base_relation = inverse_base;
            backward.relationship = relationship.inverse();
        }
        self.touch();

        tracing::debug!(%aid, name, base = base_name.unwrap_or("-"), "base relation rebound");

        Ok(())
    }

    pub fn relation(&self, number: RelNo) -> Result<&Relation, InternalError> {
        self.relations.get(&number).ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Model,
                format!("relation number {number} not found"),
            )
        })
    }

    pub fn inverse_relation(&self, number: RelNo) -> Result<&Relation, InternalError> {
        let relation = self.relation(number)?;

        self.relation(relation.inverse)
    }

    /// All relations in number order.
    pub fn all_relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub(crate) fn find_relation(&self, element: &Element, name: &str) -> Option<RelNo> {
        element
            .relations
            .iter()
            .copied()
            .find(|n| self.relations.get(n).is_some_and(|r| r.name == name))
    }

    pub(crate) fn drop_relation_pair(&mut self, number: RelNo) {
        let Some(relation) = self.relations.remove(&number) else {
            return;
        };
        let inverse = self.relations.remove(&relation.inverse);

        if let Some(e) = self.elements.get_mut(&relation.elem1) {
            e.relations.retain(|n| *n != number);
        }
        if let Some(inverse) = inverse
            && let Some(e) = self.elements.get_mut(&inverse.elem1)
        {
            e.relations.retain(|n| *n != inverse.number);
        }
    }

    fn check_relation_name_free(&self, element: &Element, name: &str) -> Result<(), InternalError> {
        if self.find_relation(element, name).is_some() {
            return Err(InternalError::duplicate(
                ErrorOrigin::Model,
                format!("relation '{name}' already exists on element '{}'", element.name),
            ));
        }

        Ok(())
    }

    // Base relation named `base_name` from `e1`'s base type towards `e2`'s,
    // plus its inverse seen from `e2` when `e2` is bound.
    fn resolve_base_relation(
        &self,
        e1: &Element,
        e2: &Element,
        base_name: &str,
    ) -> Result<(BaseRelation, Option<BaseRelation>), InternalError> {
        let base_type = e1.base_type.as_deref().ok_or_else(|| {
            InternalError::bad_parameter(
                ErrorOrigin::Model,
                format!(
                    "element '{}' has no base element, cannot map base relation '{base_name}'",
                    e1.name
                ),
            )
        })?;
        let target_type = e2.base_type.as_deref();

        let base = self
            .base()
            .element_by_type(base_type)?
            .relation(base_name, target_type)?;

        let inverse = target_type.and_then(|target_type| {
            let inverse_name = base.inverse_name(target_type)?;
            self.base()
                .element_by_type(target_type)
                .ok()?
                .relation(inverse_name, Some(base_type))
                .ok()
                .cloned()
        });

        Ok((base.clone(), inverse))
    }
}
