//! Metadata types shared by every source and by the renderer
//!
//! - `Field`: the closed set of version-file fields
//! - `RawValue`: a source-neutral value read from TOML, YAML or package metadata
//! - `PartialMetadata`: whatever subset of fields one source provides
//! - `MetadataRecord`: the resolved, typed record handed to the renderer

use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// FIELD
// =============================================================================

/// A logical version-file field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Version,
    CompanyName,
    FileDescription,
    InternalName,
    LegalCopyright,
    OriginalFilename,
    ProductName,
    Translations,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Version,
        Field::CompanyName,
        Field::FileDescription,
        Field::InternalName,
        Field::LegalCopyright,
        Field::OriginalFilename,
        Field::ProductName,
        Field::Translations,
    ];

    /// Canonical snake-case key
    pub fn key(self) -> &'static str {
        match self {
            Field::Version => "version",
            Field::CompanyName => "company_name",
            Field::FileDescription => "file_description",
            Field::InternalName => "internal_name",
            Field::LegalCopyright => "legal_copyright",
            Field::OriginalFilename => "original_filename",
            Field::ProductName => "product_name",
            Field::Translations => "translations",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// RAW VALUE
// =============================================================================

/// A value as it appeared in its source document, without coercion
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<RawValue>),
    Table,
    /// A null inside an array; a null field value is simply absent
    Null,
}

impl RawValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::String(_) => "string",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Boolean(_) => "boolean",
            RawValue::Array(_) => "array",
            RawValue::Table => "table",
            RawValue::Null => "null",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<&[u32]> for RawValue {
    fn from(values: &[u32]) -> Self {
        RawValue::Array(
            values
                .iter()
                .map(|v| RawValue::Integer(i64::from(*v)))
                .collect(),
        )
    }
}

impl From<&toml::Value> for RawValue {
    fn from(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => RawValue::String(s.clone()),
            toml::Value::Integer(i) => RawValue::Integer(*i),
            toml::Value::Float(f) => RawValue::Float(*f),
            toml::Value::Boolean(b) => RawValue::Boolean(*b),
            toml::Value::Datetime(dt) => RawValue::String(dt.to_string()),
            toml::Value::Array(items) => RawValue::Array(items.iter().map(RawValue::from).collect()),
            toml::Value::Table(_) => RawValue::Table,
        }
    }
}

impl RawValue {
    /// Convert a YAML field value; a top-level `null` maps to `None`
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match Self::from_yaml_item(value) {
            RawValue::Null => None,
            other => Some(other),
        }
    }

    fn from_yaml_item(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => RawValue::Null,
            serde_yaml::Value::Bool(b) => RawValue::Boolean(*b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => RawValue::String(s.clone()),
            serde_yaml::Value::Sequence(items) => {
                RawValue::Array(items.iter().map(RawValue::from_yaml_item).collect())
            }
            serde_yaml::Value::Mapping(_) => RawValue::Table,
            serde_yaml::Value::Tagged(tagged) => RawValue::from_yaml_item(&tagged.value),
        }
    }
}

// =============================================================================
// PARTIAL METADATA
// =============================================================================

/// The fields one source provides; absent fields are simply missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialMetadata {
    values: BTreeMap<Field, RawValue>,
}

impl PartialMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        self.values.get(&field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<RawValue>) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    /// Builder-style `set`
    pub fn with(mut self, field: Field, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Set the field only when a value is given
    pub fn set_opt<V: Into<RawValue>>(&mut self, field: Field, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &RawValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Lay `other` on top of `self`: present values in `other` win, absent
    /// values leave `self` untouched.
    pub fn overlay(&mut self, other: &PartialMetadata) {
        for (field, value) in &other.values {
            self.values.insert(*field, value.clone());
        }
    }
}

// =============================================================================
// METADATA RECORD
// =============================================================================

/// Resolved version-file metadata
///
/// `None` means no source provided the field; the renderer applies its own
/// default in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub version: Option<String>,
    pub company_name: Option<String>,
    pub file_description: Option<String>,
    pub internal_name: Option<String>,
    pub legal_copyright: Option<String>,
    pub original_filename: Option<String>,
    pub product_name: Option<String>,
    pub translations: Option<Vec<u32>>,
}

impl MetadataRecord {
    /// Mutable access to a text field; `None` for `Field::Translations`
    pub(crate) fn text_field_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::Version => Some(&mut self.version),
            Field::CompanyName => Some(&mut self.company_name),
            Field::FileDescription => Some(&mut self.file_description),
            Field::InternalName => Some(&mut self.internal_name),
            Field::LegalCopyright => Some(&mut self.legal_copyright),
            Field::OriginalFilename => Some(&mut self.original_filename),
            Field::ProductName => Some(&mut self.product_name),
            Field::Translations => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == MetadataRecord::default()
    }
}
