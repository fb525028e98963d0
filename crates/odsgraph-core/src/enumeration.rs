use crate::{
    error::{ErrorOrigin, InternalError},
    pattern::CaseMode,
};
use std::collections::BTreeMap;

///
/// EnumerationDefinition
///
/// Bidirectional table between non-negative item indices and item names.
/// Indices are unique, names are unique (case-sensitively), and renaming an
/// item never moves it to another index.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumerationDefinition {
    name: String,
    items: BTreeMap<i32, String>,
    frozen: bool,
}

impl EnumerationDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: BTreeMap::new(),
            frozen: false,
        }
    }

    /// Build a frozen definition from static `(index, name)` pairs.
    pub fn from_items(name: &str, items: &[(i32, &str)]) -> Result<Self, InternalError> {
        let mut def = Self::new(name);
        for (index, item) in items {
            def.add_item(*index, item)?;
        }
        def.freeze();

        Ok(def)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Make the definition read-only.
    pub const fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item at an explicit index.
    pub fn add_item(&mut self, index: i32, item: &str) -> Result<(), InternalError> {
        self.check_mutable()?;

        if index < 0 {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Enumeration,
                format!("enumeration '{}': item index {index} is negative", self.name),
            ));
        }
        if let Some(existing) = self.items.get(&index) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Enumeration,
                format!(
                    "enumeration '{}': index {index} already holds '{existing}'",
                    self.name
                ),
            ));
        }
        self.check_name_free(item)?;

        self.items.insert(index, item.to_string());

        Ok(())
    }

    /// Append an item at the next free index (one past the highest) and return
    /// that index.
    pub fn add_next_item(&mut self, item: &str) -> Result<i32, InternalError> {
        let index = match self.items.last_key_value() {
            None => 0,
            Some((last, _)) => last.checked_add(1).ok_or_else(|| {
                InternalError::constraint(
                    ErrorOrigin::Enumeration,
                    format!("enumeration '{}': no index left after {last}", self.name),
                )
            })?,
        };
        self.add_item(index, item)?;

        Ok(index)
    }

    /// Resolve an item name to its index, case-sensitively.
    pub fn get_item(&self, item: &str) -> Result<i32, InternalError> {
        self.get_item_with_case(item, CaseMode::Sensitive)
    }

    pub fn get_item_with_case(&self, item: &str, case: CaseMode) -> Result<i32, InternalError> {
        self.items
            .iter()
            .find(|(_, name)| match case {
                CaseMode::Sensitive => name.as_str() == item,
                CaseMode::Insensitive => name.eq_ignore_ascii_case(item),
            })
            .map(|(index, _)| *index)
            .ok_or_else(|| {
                InternalError::not_found(
                    ErrorOrigin::Enumeration,
                    format!("enumeration '{}': item '{item}' not found", self.name),
                )
            })
    }

    pub fn get_item_name(&self, index: i32) -> Result<&str, InternalError> {
        self.items.get(&index).map(String::as_str).ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Enumeration,
                format!("enumeration '{}': index {index} not assigned", self.name),
            )
        })
    }

    /// Change an item's name, keeping its index.
    pub fn rename_item(&mut self, old: &str, new: &str) -> Result<(), InternalError> {
        self.check_mutable()?;

        let index = self.get_item(old)?;
        if old != new {
            self.check_name_free(new)?;
        }
        self.items.insert(index, new.to_string());

        Ok(())
    }

    /// Item names in ascending index order.
    #[must_use]
    pub fn list_item_names(&self) -> Vec<&str> {
        self.items.values().map(String::as_str).collect()
    }

    /// `(index, name)` pairs in ascending index order.
    pub fn items(&self) -> impl Iterator<Item = (i32, &str)> {
        self.items.iter().map(|(i, n)| (*i, n.as_str()))
    }

    fn check_mutable(&self) -> Result<(), InternalError> {
        if self.frozen {
            return Err(InternalError::constraint(
                ErrorOrigin::Enumeration,
                format!("enumeration '{}' is read-only", self.name),
            ));
        }

        Ok(())
    }

    fn check_name_free(&self, item: &str) -> Result<(), InternalError> {
        if let Some((index, _)) = self.items.iter().find(|(_, n)| n.as_str() == item) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Enumeration,
                format!(
                    "enumeration '{}': item '{item}' already exists at index {index}",
                    self.name
                ),
            ));
        }

        Ok(())
    }
}

///
/// EnumerationRegistry
///
/// Named collection of enumeration definitions owned by one model layer.
///

#[derive(Clone, Debug, Default)]
pub struct EnumerationRegistry {
    defs: BTreeMap<String, EnumerationDefinition>,
}

impl EnumerationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, mutable definition.
    pub fn create(&mut self, name: &str) -> Result<&mut EnumerationDefinition, InternalError> {
        self.insert(EnumerationDefinition::new(name))?;

        self.get_mut(name)
    }

    pub fn insert(&mut self, def: EnumerationDefinition) -> Result<(), InternalError> {
        if self.defs.contains_key(def.name()) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Enumeration,
                format!("enumeration '{}' already exists", def.name()),
            ));
        }
        self.defs.insert(def.name().to_string(), def);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&EnumerationDefinition, InternalError> {
        self.defs.get(name).ok_or_else(|| not_found(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut EnumerationDefinition, InternalError> {
        self.defs.get_mut(name).ok_or_else(|| not_found(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<EnumerationDefinition> {
        self.defs.remove(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.defs.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumerationDefinition> {
        self.defs.values()
    }
}

fn not_found(name: &str) -> InternalError {
    InternalError::not_found(
        ErrorOrigin::Enumeration,
        format!("enumeration '{name}' not found"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    fn colors() -> EnumerationDefinition {
        let mut def = EnumerationDefinition::new("colors");
        def.add_item(0, "red").unwrap();
        def.add_item(5, "green").unwrap();
        def
    }

    #[test]
    fn append_uses_next_index_after_highest() {
        let mut def = colors();
        let index = def.add_next_item("X").unwrap();

        assert_eq!(index, 6);
        assert_eq!(def.get_item("X").unwrap(), 6);
        assert_eq!(EnumerationDefinition::new("e").add_next_item("a").unwrap(), 0);
    }

    #[test]
    fn append_after_highest_possible_index_is_a_constraint_error() {
        let mut def = EnumerationDefinition::new("edge");
        def.add_item(i32::MAX, "top").unwrap();

        let err = def.add_next_item("next").unwrap_err();
        assert_eq!(err.class, ErrorClass::ImplementationConstraint);
        assert_eq!(def.list_item_names(), vec!["top"]);
    }

    #[test]
    fn rename_keeps_index_and_drops_old_name() {
        let mut def = colors();
        let index = def.add_next_item("X").unwrap();
        def.rename_item("X", "Y").unwrap();

        assert_eq!(def.get_item("Y").unwrap(), index);
        assert_eq!(def.get_item("X").unwrap_err().class, ErrorClass::NotFound);
        assert_eq!(def.get_item_name(index).unwrap(), "Y");
    }

    #[test]
    fn lookups_fail_with_not_found() {
        let def = colors();

        assert!(def.get_item("blue").unwrap_err().is_not_found());
        assert!(def.get_item_name(3).unwrap_err().is_not_found());
    }

    #[test]
    fn case_insensitive_lookup() {
        let def = colors();

        assert!(def.get_item("RED").is_err());
        assert_eq!(
            def.get_item_with_case("RED", CaseMode::Insensitive).unwrap(),
            0
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut def = colors();

        assert_eq!(def.add_item(0, "blue").unwrap_err().class, ErrorClass::Duplicate);
        assert_eq!(def.add_item(1, "red").unwrap_err().class, ErrorClass::Duplicate);
        assert_eq!(def.rename_item("red", "green").unwrap_err().class, ErrorClass::Duplicate);
        assert_eq!(def.add_item(-1, "neg").unwrap_err().class, ErrorClass::BadParameter);
    }

    #[test]
    fn names_list_in_index_order() {
        let mut def = EnumerationDefinition::new("order");
        def.add_item(3, "c").unwrap();
        def.add_item(1, "a").unwrap();
        def.add_item(2, "b").unwrap();

        assert_eq!(def.list_item_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn frozen_definition_rejects_mutation() {
        let mut def = EnumerationDefinition::from_items("fixed", &[(0, "a")]).unwrap();

        assert!(def.is_frozen());
        assert_eq!(
            def.add_next_item("b").unwrap_err().class,
            ErrorClass::ImplementationConstraint
        );
        assert!(def.rename_item("a", "z").is_err());
    }

    #[test]
    fn registry_create_get_remove() {
        let mut reg = EnumerationRegistry::new();
        reg.create("units").unwrap().add_next_item("m").unwrap();

        assert_eq!(reg.create("units").unwrap_err().class, ErrorClass::Duplicate);
        assert_eq!(reg.get("units").unwrap().get_item("m").unwrap(), 0);
        assert_eq!(reg.names(), vec!["units"]);
        assert!(reg.remove("units").is_some());
        assert!(reg.get("units").unwrap_err().is_not_found());
    }
}
