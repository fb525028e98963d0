use super::BaseRelation;
use crate::{
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};
use odsgraph_primitives::{DataType, RelationType, Relationship};

///
/// BaseAttribute
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseAttribute {
    pub name: String,
    pub data_type: DataType,
    pub obligatory: bool,
    pub unique: bool,
    pub enumeration: Option<String>,
}

impl BaseAttribute {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            obligatory: false,
            unique: false,
            enumeration: None,
        }
    }

    #[must_use]
    pub const fn obligatory(mut self) -> Self {
        self.obligatory = true;
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn enumeration(mut self, name: impl Into<String>) -> Self {
        self.enumeration = Some(name.into());
        self
    }
}

///
/// BaseElement
///
/// One standard type. Names are matched case-insensitively, as the standard
/// prescribes for base identifiers.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseElement {
    type_name: String,
    top_level: bool,
    attributes: Vec<BaseAttribute>,
    relations: Vec<BaseRelation>,
}

impl BaseElement {
    #[must_use]
    pub fn new(type_name: impl Into<String>, top_level: bool) -> Self {
        Self {
            type_name: type_name.into(),
            top_level,
            attributes: Vec::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: BaseAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn with_relation(mut self, mut relation: BaseRelation) -> Self {
        relation.set_elem1(&self.type_name);
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.top_level
    }

    #[must_use]
    pub fn attributes(&self) -> &[BaseAttribute] {
        &self.attributes
    }

    /// Attributes whose names match a glob pattern.
    pub fn attributes_matching(&self, pattern: &str) -> Result<Vec<&BaseAttribute>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Insensitive, ErrorOrigin::BaseModel)?;

        Ok(self
            .attributes
            .iter()
            .filter(|a| pattern.is_match(&a.name))
            .collect())
    }

    pub fn attribute(&self, name: &str) -> Result<&BaseAttribute, InternalError> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::BaseModel,
                    format!(
                        "base attribute '{name}' not found on base element '{}'",
                        self.type_name
                    ),
                )
            })
    }

    pub fn obligatory_attributes(&self) -> impl Iterator<Item = &BaseAttribute> {
        self.attributes.iter().filter(|a| a.obligatory)
    }

    #[must_use]
    pub fn relations(&self) -> &[BaseRelation] {
        &self.relations
    }

    pub fn relations_by_relationship(
        &self,
        relationship: Relationship,
    ) -> impl Iterator<Item = &BaseRelation> {
        self.relations
            .iter()
            .filter(move |r| r.relationship().matches(relationship))
    }

    pub fn relations_by_type(&self, relation_type: RelationType) -> impl Iterator<Item = &BaseRelation> {
        self.relations
            .iter()
            .filter(move |r| r.relation_type() == Some(relation_type))
    }

    pub fn mandatory_relations(&self) -> impl Iterator<Item = &BaseRelation> {
        self.relations.iter().filter(|r| r.is_mandatory())
    }

    /// Relation by name. When several relations share the name, `target`
    /// picks the one accepting that base type.
    pub fn relation(&self, name: &str, target: Option<&str>) -> Result<&BaseRelation, InternalError> {
        self.relations
            .iter()
            .filter(|r| r.name().eq_ignore_ascii_case(name))
            .find(|r| target.is_none_or(|t| r.accepts_target(t)))
            .ok_or_else(|| {
                let target = target.map_or_else(String::new, |t| format!(" towards '{t}'"));
                InternalError::not_found(
                    ErrorOrigin::BaseModel,
                    format!(
                        "base relation '{name}'{target} not found on base element '{}'",
                        self.type_name
                    ),
                )
            })
    }

    /// Base type names reachable through relations with the given role.
    #[must_use]
    pub fn related_type_names(&self, relationship: Relationship) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self
            .relations_by_relationship(relationship)
            .flat_map(BaseRelation::elem2_types)
        {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name);
            }
        }

        names
    }
}
