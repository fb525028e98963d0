use super::AttrNo;
use odsgraph_primitives::DataType;

///
/// Attribute
///
/// One column of an application element. `number` is assigned when the
/// attribute is added and never changes or gets reused.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub(crate) number: AttrNo,
    pub(crate) name: String,
    pub(crate) base_name: Option<String>,
    pub(crate) data_type: DataType,
    pub(crate) obligatory: bool,
    pub(crate) unique: bool,
    pub(crate) enumeration: Option<String>,
    pub(crate) unit: Option<String>,
}

impl Attribute {
    #[must_use]
    pub const fn number(&self) -> AttrNo {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapped base attribute, if any.
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub const fn is_obligatory(&self) -> bool {
        self.obligatory
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub fn enumeration(&self) -> Option<&str> {
        self.enumeration.as_deref()
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Whether this attribute maps the given base attribute.
    #[must_use]
    pub fn maps_base(&self, base_name: &str) -> bool {
        self.base_name
            .as_deref()
            .is_some_and(|b| b.eq_ignore_ascii_case(base_name))
    }
}

///
/// AttributeDef
///
/// Declaration passed to [`super::ApplicationModel::add_attribute`]. Fields
/// left unset on a base-mapped attribute are taken from the base attribute.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeDef {
    pub name: String,
    pub base_name: Option<String>,
    pub data_type: Option<DataType>,
    pub obligatory: Option<bool>,
    pub unique: Option<bool>,
    pub enumeration: Option<String>,
    pub unit: Option<String>,
}

impl AttributeDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    #[must_use]
    pub const fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub const fn obligatory(mut self, obligatory: bool) -> Self {
        self.obligatory = Some(obligatory);
        self
    }

    #[must_use]
    pub const fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    #[must_use]
    pub fn enumeration(mut self, name: impl Into<String>) -> Self {
        self.enumeration = Some(name.into());
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
