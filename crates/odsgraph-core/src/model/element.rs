use super::{Aid, AttrNo, Attribute, RelNo};
use crate::{
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};

///
/// Element
///
/// Application element: a document-defined type specializing one base
/// element. Attributes live here; relations live in the model's relation
/// arena and are referenced by number.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub(crate) aid: Aid,
    pub(crate) name: String,
    pub(crate) base_type: Option<String>,
    pub(crate) top_level: bool,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) relations: Vec<RelNo>,
    pub(crate) next_attr_no: u32,
}

impl Element {
    pub(crate) fn new(aid: Aid, name: String, base_type: Option<String>, top_level: bool) -> Self {
        Self {
            aid,
            name,
            base_type,
            top_level,
            attributes: Vec::new(),
            relations: Vec::new(),
            next_attr_no: 1,
        }
    }

    #[must_use]
    pub const fn aid(&self) -> Aid {
        self.aid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical base type name; `None` for an unbound element.
    #[must_use]
    pub fn base_type(&self) -> Option<&str> {
        self.base_type.as_deref()
    }

    #[must_use]
    pub fn is_base_type(&self, base_type: &str) -> bool {
        self.base_type
            .as_deref()
            .is_some_and(|b| b.eq_ignore_ascii_case(base_type))
    }

    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.top_level
    }

    /// Attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_matching(&self, pattern: &str) -> Result<Vec<&Attribute>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Sensitive, ErrorOrigin::Model)?;

        Ok(self
            .attributes
            .iter()
            .filter(|a| pattern.is_match(&a.name))
            .collect())
    }

    pub fn attribute(&self, name: &str) -> Result<&Attribute, InternalError> {
        self.find_attribute(name)
            .ok_or_else(|| self.missing("attribute", name))
    }

    pub fn attribute_by_no(&self, number: AttrNo) -> Result<&Attribute, InternalError> {
        self.attributes
            .iter()
            .find(|a| a.number == number)
            .ok_or_else(|| self.missing("attribute number", &number.to_string()))
    }

    /// Attribute mapped to a base attribute (case-insensitive).
    pub fn attribute_by_base_name(&self, base_name: &str) -> Result<&Attribute, InternalError> {
        self.find_attribute_by_base_name(base_name)
            .ok_or_else(|| self.missing("base attribute", base_name))
    }

    pub fn attr_no(&self, name: &str) -> Result<AttrNo, InternalError> {
        self.attribute(name).map(Attribute::number)
    }

    pub fn attr_no_by_base_name(&self, base_name: &str) -> Result<AttrNo, InternalError> {
        self.attribute_by_base_name(base_name).map(Attribute::number)
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attribute(name).is_some()
    }

    /// Relation numbers owned by this element, in creation order.
    #[must_use]
    pub fn relation_numbers(&self) -> &[RelNo] {
        &self.relations
    }

    pub(crate) fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub(crate) fn find_attribute_by_base_name(&self, base_name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.maps_base(base_name))
    }

    pub(crate) fn find_attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    pub(crate) const fn take_attr_no(&mut self) -> AttrNo {
        let number = AttrNo(self.next_attr_no);
        self.next_attr_no += 1;

        number
    }

    fn missing(&self, what: &str, name: &str) -> InternalError {
        InternalError::not_found(
            ErrorOrigin::Model,
            format!("{what} '{name}' not found on element '{}'", self.name),
        )
    }
}
