use odsgraph_primitives::{RelationRange, RelationType, Relationship};

///
/// BaseRelationTarget
///
/// One legal target of a base relation, with the name the relation carries
/// when read back from that target.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseRelationTarget {
    pub elem2: String,
    pub inverse_name: String,
}

///
/// BaseRelation
///
/// Typed edge from one base element to one of several legal target base
/// elements. Both directions are described here: `range`/`relationship` for
/// the source side, `inverse_range`/`inverse_relationship` for the target side.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseRelation {
    name: String,
    elem1: String,
    targets: Vec<BaseRelationTarget>,
    range: RelationRange,
    inverse_range: RelationRange,
    relationship: Relationship,
}

impl BaseRelation {
    /// New relation without targets; the owning element is filled in when the
    /// relation is attached to a [`super::BaseElement`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relationship: Relationship,
        range: RelationRange,
        inverse_range: RelationRange,
    ) -> Self {
        Self {
            name: name.into(),
            elem1: String::new(),
            targets: Vec::new(),
            range,
            inverse_range,
            relationship,
        }
    }

    #[must_use]
    pub fn with_target(mut self, elem2: impl Into<String>, inverse_name: impl Into<String>) -> Self {
        self.targets.push(BaseRelationTarget {
            elem2: elem2.into(),
            inverse_name: inverse_name.into(),
        });
        self
    }

    pub(crate) fn set_elem1(&mut self, elem1: &str) {
        elem1.clone_into(&mut self.elem1);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base type owning this relation.
    #[must_use]
    pub fn elem1(&self) -> &str {
        &self.elem1
    }

    #[must_use]
    pub fn targets(&self) -> &[BaseRelationTarget] {
        &self.targets
    }

    /// Legal target base types.
    pub fn elem2_types(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.elem2.as_str())
    }

    #[must_use]
    pub fn accepts_target(&self, base_type: &str) -> bool {
        self.target(base_type).is_some()
    }

    /// Inverse name as seen from `base_type`; `None` if it is not a target.
    #[must_use]
    pub fn inverse_name(&self, base_type: &str) -> Option<&str> {
        self.target(base_type).map(|t| t.inverse_name.as_str())
    }

    /// Inverse name for the first target, for relations with a single target.
    #[must_use]
    pub fn default_inverse_name(&self) -> Option<&str> {
        self.targets.first().map(|t| t.inverse_name.as_str())
    }

    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.range.is_mandatory()
    }

    #[must_use]
    pub const fn range(&self) -> RelationRange {
        self.range
    }

    #[must_use]
    pub const fn inverse_range(&self) -> RelationRange {
        self.inverse_range
    }

    #[must_use]
    pub const fn relationship(&self) -> Relationship {
        self.relationship
    }

    #[must_use]
    pub const fn inverse_relationship(&self) -> Relationship {
        self.relationship.inverse()
    }

    #[must_use]
    pub const fn relation_type(&self) -> Option<RelationType> {
        self.relationship.relation_type()
    }

    fn target(&self, base_type: &str) -> Option<&BaseRelationTarget> {
        self.targets
            .iter()
            .find(|t| t.elem2.eq_ignore_ascii_case(base_type))
    }
}
