//! Instance store: data rows of application elements, their attribute
//! values and the links between them.

mod store;


pub use store::InstanceStore;

use crate::{
    error::{ErrorOrigin, InternalError},
    model::{Aid, AttrNo, Attribute, Element},
    value::{NameValueUnit, Value},
};
use derive_more::{Display, FromStr};
use std::collections::BTreeMap;

///
/// Iid
///
/// Instance id, unique within one element.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct Iid(pub u64);

///
/// Instance
///
/// One row of an element. Values of declared attributes are keyed by
/// attribute number so they survive attribute renames; free-form instance
/// attributes are keyed by name.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    aid: Aid,
    iid: Iid,
    name: Option<String>,
    values: BTreeMap<AttrNo, NameValueUnit>,
    instance_attributes: Vec<NameValueUnit>,
}

impl Instance {
    pub(crate) const fn new(aid: Aid, iid: Iid, name: Option<String>) -> Self {
        Self {
            aid,
            iid,
            name,
            values: BTreeMap::new(),
            instance_attributes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn aid(&self) -> Aid {
        self.aid
    }

    #[must_use]
    pub const fn iid(&self) -> Iid {
        self.iid
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    //
    // Declared attributes
    //

    /// Store a value under a declared attribute. The value kind must match
    /// the attribute's data type; `DT_UNKNOWN` attributes take any kind.
    pub fn set_attribute_value(
        &mut self,
        element: &Element,
        name: &str,
        value: Value,
    ) -> Result<(), InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute(name)?;
        self.store(attribute, value)
    }

    pub fn set_value_by_no(
        &mut self,
        element: &Element,
        number: AttrNo,
        value: Value,
    ) -> Result<(), InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute_by_no(number)?;
        self.store(attribute, value)
    }

    /// Value of a declared attribute; an unset attribute yields an invalid
    /// placeholder of the attribute's type.
    pub fn value(&self, element: &Element, name: &str) -> Result<NameValueUnit, InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute(name)?;

        Ok(self.value_of(attribute))
    }

    pub fn value_by_no(&self, element: &Element, number: AttrNo) -> Result<NameValueUnit, InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute_by_no(number)?;

        Ok(self.value_of(attribute))
    }

    /// Value of the attribute mapped to a base attribute.
    pub fn value_by_base_name(
        &self,
        element: &Element,
        base_name: &str,
    ) -> Result<NameValueUnit, InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute_by_base_name(base_name)?;

        Ok(self.value_of(attribute))
    }

    /// Stored values in attribute order. With `include_all_ods_values`, also
    /// yields invalid placeholders for obligatory base-mapped attributes that
    /// have no value, so writers see every value the standard requires.
    #[must_use]
    pub fn values(&self, element: &Element, include_all_ods_values: bool) -> Vec<NameValueUnit> {
        element
            .attributes()
            .iter()
            .filter_map(|attribute| match self.values.get(&attribute.number()) {
                Some(stored) => Some(named(attribute, stored)),
                None if include_all_ods_values
                    && attribute.base_name().is_some()
                    && attribute.is_obligatory() =>
                {
                    Some(self.value_of(attribute))
                }
                None => None,
            })
            .collect()
    }

    /// Whether the element declares an attribute under either name. With
    /// `is_required`, the instance must also hold a valid value for it.
    /// Always false for an element the instance does not belong to.
    #[must_use]
    pub fn does_attribute_exist(
        &self,
        element: &Element,
        name: Option<&str>,
        base_name: Option<&str>,
        is_required: bool,
    ) -> bool {
        if self.check_element(element).is_err() {
            return false;
        }
        let attribute = name
            .and_then(|n| element.find_attribute(n))
            .or_else(|| base_name.and_then(|b| element.find_attribute_by_base_name(b)));

        attribute.is_some_and(|a| !is_required || self.has_valid_value_at(a.number()))
    }

    /// Whether a declared attribute holds a valid, non-empty value.
    #[must_use]
    pub fn has_valid_value(&self, element: &Element, name: &str) -> bool {
        self.check_element(element).is_ok()
            && element
                .find_attribute(name)
                .is_some_and(|a| self.has_valid_value_at(a.number()))
    }

    /// Drop a stored value; returns whether one was present.
    pub fn clear_value(&mut self, element: &Element, name: &str) -> Result<bool, InternalError> {
        self.check_element(element)?;
        let attribute = element.attribute(name)?;

        Ok(self.values.remove(&attribute.number()).is_some())
    }

    //
    // Instance attributes
    //

    /// Add a free-form value not backed by a declared attribute.
    pub fn add_instance_attribute(&mut self, value: NameValueUnit) -> Result<(), InternalError> {
        if value.name.is_empty() {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Instance,
                "instance attribute name must not be empty",
            ));
        }
        if self.find_instance_attribute(&value.name).is_some() {
            return Err(InternalError::duplicate(
                ErrorOrigin::Instance,
                format!(
                    "instance attribute '{}' already exists on instance {} of aid {}",
                    value.name, self.iid, self.aid
                ),
            ));
        }
        self.instance_attributes.push(value);

        Ok(())
    }

    #[must_use]
    pub fn list_instance_attributes(&self) -> Vec<&str> {
        self.instance_attributes
            .iter()
            .map(|v| v.name.as_str())
            .collect()
    }

    pub fn instance_attribute(&self, name: &str) -> Result<&NameValueUnit, InternalError> {
        self.find_instance_attribute(name)
            .ok_or_else(|| self.missing_instance_attribute(name))
    }

    pub fn rename_instance_attribute(&mut self, old: &str, new: &str) -> Result<(), InternalError> {
        if old != new && self.find_instance_attribute(new).is_some() {
            return Err(InternalError::duplicate(
                ErrorOrigin::Instance,
                format!("instance attribute '{new}' already exists"),
            ));
        }
        let missing = self.missing_instance_attribute(old);
        let value = self
            .instance_attributes
            .iter_mut()
            .find(|v| v.name == old)
            .ok_or(missing)?;
        new.clone_into(&mut value.name);

        Ok(())
    }

    /// Remove a free-form value; returns whether it was present.
    pub fn remove_instance_attribute(&mut self, name: &str) -> bool {
        let before = self.instance_attributes.len();
        self.instance_attributes.retain(|v| v.name != name);

        self.instance_attributes.len() != before
    }

    //
    // Internals
    //

    fn store(&mut self, attribute: &Attribute, value: Value) -> Result<(), InternalError> {
        if !value.fits(attribute.data_type()) {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Instance,
                format!(
                    "attribute '{}' is {} but the value is {}",
                    attribute.name(),
                    attribute.data_type(),
                    value.data_type()
                ),
            ));
        }

        let mut entry = NameValueUnit::new(attribute.name(), value);
        entry.unit = attribute.unit().map(str::to_string);
        self.values.insert(attribute.number(), entry);

        Ok(())
    }

    fn value_of(&self, attribute: &Attribute) -> NameValueUnit {
        self.values.get(&attribute.number()).map_or_else(
            || {
                let mut empty = NameValueUnit::empty(attribute.name(), attribute.data_type());
                empty.unit = attribute.unit().map(str::to_string);
                empty
            },
            |stored| named(attribute, stored),
        )
    }

    fn has_valid_value_at(&self, number: AttrNo) -> bool {
        self.values
            .get(&number)
            .is_some_and(NameValueUnit::has_valid_value)
    }

    fn find_instance_attribute(&self, name: &str) -> Option<&NameValueUnit> {
        self.instance_attributes.iter().find(|v| v.name == name)
    }

    fn missing_instance_attribute(&self, name: &str) -> InternalError {
        InternalError::not_found(
            ErrorOrigin::Instance,
            format!(
                "instance attribute '{name}' not found on instance {} of aid {}",
                self.iid, self.aid
            ),
        )
    }

    fn check_element(&self, element: &Element) -> Result<(), InternalError> {
        if element.aid() != self.aid {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Instance,
                format!(
                    "instance {} belongs to aid {}, not to element '{}' (aid {})",
                    self.iid,
                    self.aid,
                    element.name(),
                    element.aid()
                ),
            ));
        }

        Ok(())
    }
}

// Stored entries carry the attribute name current at write time.
fn named(attribute: &Attribute, stored: &NameValueUnit) -> NameValueUnit {
    let mut out = stored.clone();
    attribute.name().clone_into(&mut out.name);

    out
}
