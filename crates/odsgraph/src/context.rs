//! Session configuration: a flat, string-keyed option map with typed
//! accessors for the options the session understands.

use derive_more::Display;
use odsgraph_core::{
    error::{ErrorOrigin, InternalError},
    pattern::{CaseMode, NamePattern},
};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};

//
// Option names
//

pub const FILE_ROOT: &str = "FILE_ROOT";
pub const FILE_MODE: &str = "FILE_MODE";
pub const VALUEMATRIX_MODE: &str = "VALUEMATRIX_MODE";
pub const WRITE_MODE: &str = "WRITE_MODE";
pub const EXT_COMP_SEGSIZE: &str = "EXT_COMP_SEGSIZE";
pub const TRIM_STRING_VALUES: &str = "TRIM_STRING_VALUES";
pub const INDENT_XML: &str = "INDENT_XML";

pub const KNOWN_OPTIONS: [&str; 7] = [
    FILE_ROOT,
    FILE_MODE,
    VALUEMATRIX_MODE,
    WRITE_MODE,
    EXT_COMP_SEGSIZE,
    TRIM_STRING_VALUES,
    INDENT_XML,
];

/// Default segment size for external component files, in bytes.
pub const DEFAULT_EXT_COMP_SEGSIZE: i64 = 524_288_000;

///
/// ContextValue
///

#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Long(i32),
    LongLong(i64),
    Boolean(bool),
}

impl ContextValue {
    const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Long(_) => "long",
            Self::LongLong(_) => "longlong",
            Self::Boolean(_) => "boolean",
        }
    }

    // Integers that fit 32 bits are stored as Long.
    fn integer(value: i64) -> Self {
        i32::try_from(value).map_or(Self::LongLong(value), Self::Long)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        Self::Long(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::LongLong(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

///
/// FileMode
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum FileMode {
    #[default]
    #[display("SINGLE_VOLUME")]
    SingleVolume,
    #[display("MULTIPLE_VOLUMES")]
    MultipleVolumes,
}

///
/// ValueMatrixMode
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum ValueMatrixMode {
    #[default]
    #[display("CALCULATED")]
    Calculated,
    #[display("STORAGE")]
    Storage,
}

///
/// WriteMode
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum WriteMode {
    #[default]
    #[display("database")]
    Database,
    #[display("file")]
    File,
}

///
/// Context
///
/// Option names are case-insensitive and stored upper-cased. Setting an
/// option the session does not know is allowed but logged.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Context {
    options: BTreeMap<String, ContextValue>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat TOML table of options.
    pub fn from_toml_str(text: &str) -> Result<Self, InternalError> {
        let table: toml::Table = toml::from_str(text).map_err(|e| {
            InternalError::bad_parameter(ErrorOrigin::Context, format!("invalid context toml: {e}"))
        })?;

        let mut context = Self::new();
        for (name, value) in table {
            let value = match value {
                toml::Value::String(s) => ContextValue::String(s),
                toml::Value::Integer(i) => ContextValue::integer(i),
                toml::Value::Boolean(b) => ContextValue::Boolean(b),
                other => return Err(unsupported(&name, other.type_str())),
            };
            context.insert(&name, value);
        }

        Ok(context)
    }

    /// Store a typed option, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<ContextValue>) {
        let key = name.to_ascii_uppercase();
        if !KNOWN_OPTIONS.contains(&key.as_str()) {
            tracing::warn!(option = %key, "unrecognized context option");
        }

        self.options.insert(key, value.into());
    }

    /// Store an option from a loosely typed value. Strings, integers and
    /// booleans are accepted; anything else fails with an unsupported type.
    pub fn set(&mut self, name: &str, value: serde_json::Value) -> Result<(), InternalError> {
        let value = match value {
            serde_json::Value::String(s) => ContextValue::String(s),
            serde_json::Value::Bool(b) => ContextValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ContextValue::integer(i),
                None => return Err(unsupported(name, "float")),
            },
            serde_json::Value::Null => return Err(unsupported(name, "null")),
            serde_json::Value::Array(_) => return Err(unsupported(name, "array")),
            serde_json::Value::Object(_) => return Err(unsupported(name, "object")),
        };
        self.insert(name, value);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ContextValue, InternalError> {
        self.options.get(&name.to_ascii_uppercase()).ok_or_else(|| {
            InternalError::not_found(
                ErrorOrigin::Context,
                format!("context option '{name}' not found"),
            )
        })
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.options.remove(&name.to_ascii_uppercase()).is_some()
    }

    /// Option names matching a glob pattern, in name order.
    pub fn list(&self, pattern: &str) -> Result<Vec<&str>, InternalError> {
        let pattern = NamePattern::new(pattern, CaseMode::Insensitive, ErrorOrigin::Context)?;

        Ok(self
            .options
            .keys()
            .map(String::as_str)
            .filter(|name| pattern.is_match(name))
            .collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    //
    // Typed accessors
    //

    pub fn file_root(&self) -> Result<Option<PathBuf>, InternalError> {
        Ok(self.string(FILE_ROOT)?.map(PathBuf::from))
    }

    pub fn file_mode(&self) -> Result<FileMode, InternalError> {
        self.literal(FILE_MODE, |s| match s.to_ascii_uppercase().as_str() {
            "SINGLE_VOLUME" => Some(FileMode::SingleVolume),
            "MULTIPLE_VOLUMES" => Some(FileMode::MultipleVolumes),
            _ => None,
        })
    }

    pub fn valuematrix_mode(&self) -> Result<ValueMatrixMode, InternalError> {
        self.literal(VALUEMATRIX_MODE, |s| match s.to_ascii_uppercase().as_str() {
            "CALCULATED" => Some(ValueMatrixMode::Calculated),
            "STORAGE" => Some(ValueMatrixMode::Storage),
            _ => None,
        })
    }

    pub fn write_mode(&self) -> Result<WriteMode, InternalError> {
        self.literal(WRITE_MODE, |s| match s.to_ascii_lowercase().as_str() {
            "database" => Some(WriteMode::Database),
            "file" => Some(WriteMode::File),
            _ => None,
        })
    }

    pub fn ext_comp_segsize(&self) -> Result<i64, InternalError> {
        match self.options.get(EXT_COMP_SEGSIZE) {
            None => Ok(DEFAULT_EXT_COMP_SEGSIZE),
            Some(ContextValue::Long(v)) => Ok(i64::from(*v)),
            Some(ContextValue::LongLong(v)) => Ok(*v),
            Some(other) => Err(unsupported(EXT_COMP_SEGSIZE, other.kind())),
        }
    }

    pub fn trim_string_values(&self) -> Result<bool, InternalError> {
        self.boolean(TRIM_STRING_VALUES, true)
    }

    pub fn indent_xml(&self) -> Result<bool, InternalError> {
        self.boolean(INDENT_XML, true)
    }

    fn string(&self, name: &str) -> Result<Option<&str>, InternalError> {
        match self.options.get(name) {
            None => Ok(None),
            Some(ContextValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(unsupported(name, other.kind())),
        }
    }

    fn boolean(&self, name: &str, default: bool) -> Result<bool, InternalError> {
        match self.options.get(name) {
            None => Ok(default),
            Some(ContextValue::Boolean(b)) => Ok(*b),
            Some(other) => Err(unsupported(name, other.kind())),
        }
    }

    fn literal<T: Default>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, InternalError> {
        let Some(text) = self.string(name)? else {
            return Ok(T::default());
        };

        parse(text).ok_or_else(|| {
            InternalError::bad_parameter(
                ErrorOrigin::Context,
                format!("context option '{name}' has unknown value '{text}'"),
            )
        })
    }
}

fn unsupported(name: &str, kind: &str) -> InternalError {
    InternalError::unsupported_type(
        ErrorOrigin::Context,
        format!("context option '{name}' cannot hold a {kind} value"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use odsgraph_core::error::ErrorClass;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_unset() {
        let context = Context::new();

        assert_eq!(context.file_root().unwrap(), None);
        assert_eq!(context.file_mode().unwrap(), FileMode::SingleVolume);
        assert_eq!(context.valuematrix_mode().unwrap(), ValueMatrixMode::Calculated);
        assert_eq!(context.write_mode().unwrap(), WriteMode::Database);
        assert_eq!(context.ext_comp_segsize().unwrap(), DEFAULT_EXT_COMP_SEGSIZE);
        assert!(context.trim_string_values().unwrap());
        assert!(context.indent_xml().unwrap());
    }

    #[test]
    fn set_accepts_strings_integers_and_booleans() {
        let mut context = Context::new();
        context.set("file_root", json!("/data/ods")).unwrap();
        context.set("EXT_COMP_SEGSIZE", json!(1024)).unwrap();
        context.set("big", json!(10_000_000_000_i64)).unwrap();
        context.set("INDENT_XML", json!(false)).unwrap();

        assert_eq!(context.get("FILE_ROOT").unwrap(), &ContextValue::from("/data/ods"));
        assert_eq!(context.get("ext_comp_segsize").unwrap(), &ContextValue::Long(1024));
        assert_eq!(context.get("BIG").unwrap(), &ContextValue::LongLong(10_000_000_000));
        assert_eq!(context.file_root().unwrap(), Some(PathBuf::from("/data/ods")));
        assert_eq!(context.ext_comp_segsize().unwrap(), 1024);
        assert!(!context.indent_xml().unwrap());
    }

    #[test]
    fn set_rejects_other_value_kinds() {
        let mut context = Context::new();

        for value in [json!(1.5), json!(null), json!([1]), json!({"a": 1})] {
            let err = context.set("FILE_MODE", value).unwrap_err();
            assert_eq!(err.class, ErrorClass::UnsupportedType);
        }
        assert!(context.is_empty());
    }

    #[test]
    fn accessors_check_value_kind_and_literal() {
        let mut context = Context::new();
        context.insert(INDENT_XML, "yes");
        context.insert(FILE_MODE, "tape");
        context.insert(WRITE_MODE, "FILE");

        assert_eq!(
            context.indent_xml().unwrap_err().class,
            ErrorClass::UnsupportedType
        );
        assert_eq!(context.file_mode().unwrap_err().class, ErrorClass::BadParameter);
        assert_eq!(context.write_mode().unwrap(), WriteMode::File);
    }

    #[test]
    fn get_list_and_remove() {
        let mut context = Context::new();
        context.insert(FILE_MODE, "MULTIPLE_VOLUMES");
        context.insert(FILE_ROOT, "/tmp");
        context.insert(INDENT_XML, true);

        assert_eq!(context.list("file_*").unwrap(), [FILE_MODE, FILE_ROOT]);
        assert_eq!(context.list("*").unwrap().len(), 3);
        assert_eq!(context.file_mode().unwrap(), FileMode::MultipleVolumes);

        assert!(context.remove("file_root"));
        assert!(!context.remove("file_root"));
        assert!(context.get(FILE_ROOT).unwrap_err().is_not_found());
    }

    #[test]
    fn toml_table_loads_flat_options() {
        let context = Context::from_toml_str(
            r#"
            FILE_ROOT = "/srv/ods"
            VALUEMATRIX_MODE = "STORAGE"
            EXT_COMP_SEGSIZE = 4096
            TRIM_STRING_VALUES = false
            "#,
        )
        .unwrap();

        assert_eq!(context.len(), 4);
        assert_eq!(context.valuematrix_mode().unwrap(), ValueMatrixMode::Storage);
        assert_eq!(context.ext_comp_segsize().unwrap(), 4096);
        assert!(!context.trim_string_values().unwrap());
    }

    #[test]
    fn toml_rejects_nested_and_malformed_input() {
        let err = Context::from_toml_str("INDENT_XML = 1.5").unwrap_err();
        assert_eq!(err.class, ErrorClass::UnsupportedType);

        let err = Context::from_toml_str("[section]\nkey = 1").unwrap_err();
        assert_eq!(err.class, ErrorClass::UnsupportedType);

        let err = Context::from_toml_str("FILE_ROOT = ").unwrap_err();
        assert_eq!(err.class, ErrorClass::BadParameter);
    }

    #[test]
    fn value_display() {
        assert_eq!(ContextValue::Long(3).to_string(), "3");
        assert_eq!(ContextValue::from("x").to_string(), "x");
        assert_eq!(FileMode::MultipleVolumes.to_string(), "MULTIPLE_VOLUMES");
        assert_eq!(WriteMode::File.to_string(), "file");
    }
}
