/*!

A [`PropertyDescriptor`] is the immutable metadata for one declared property of an entity type:
the [`ValueType`] it wraps, whether it is writable, and the names it goes by. Every name falls
back to a convention computed from the value type's name unless [`PropertyOptions`] overrides it.

| Field            | Convention for value type `InternalId` |
|------------------|----------------------------------------|
| `name`           | `InternalId`                           |
| `camelized_name` | `internalId`                           |
| `storage_key`    | `internal_id`                          |
| `reader_name`    | `internal_id` (the storage key)        |
| `writer_name`    | `internal_id=` (storage key + `=`)     |
| `writable`       | `true`                                 |

*/

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

use crate::value::{PropertyValue, ValueType};

/// Suffix that turns a storage key into the conventional writer name.
pub const WRITER_SUFFIX: &str = "=";

/// The recognized per-declaration overrides. A `None` field means "use the convention".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camelized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader_name: Option<String>,
}

impl PropertyOptions {
    /// Options for a property that may not be reassigned after load.
    #[must_use]
    pub fn read_only() -> Self {
        PropertyOptions {
            writable: Some(false),
            ..Default::default()
        }
    }

    /// Returns `self` with every field that is set in `other` replaced by `other`'s value.
    #[must_use]
    pub fn overlay(self, other: &PropertyOptions) -> Self {
        PropertyOptions {
            writable: other.writable.or(self.writable),
            name: other.name.clone().or(self.name),
            camelized_name: other.camelized_name.clone().or(self.camelized_name),
            storage_key: other.storage_key.clone().or(self.storage_key),
            writer_name: other.writer_name.clone().or(self.writer_name),
            reader_name: other.reader_name.clone().or(self.reader_name),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == PropertyOptions::default()
    }
}

/// One argument to a property declaration: a bare value type, or a value type with options.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub value_type: ValueType,
    pub options: PropertyOptions,
}

impl PropertySpec {
    #[must_use]
    pub fn new(value_type: ValueType, options: PropertyOptions) -> Self {
        PropertySpec {
            value_type,
            options,
        }
    }

    #[must_use]
    pub fn of<V: PropertyValue>() -> Self {
        ValueType::of::<V>().into()
    }

    #[must_use]
    pub fn with_options(mut self, options: PropertyOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<ValueType> for PropertySpec {
    fn from(value_type: ValueType) -> Self {
        PropertySpec::new(value_type, PropertyOptions::default())
    }
}

impl From<(ValueType, PropertyOptions)> for PropertySpec {
    fn from((value_type, options): (ValueType, PropertyOptions)) -> Self {
        PropertySpec::new(value_type, options)
    }
}

/// Immutable metadata for one declared property. All derived names are resolved at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    value_type: ValueType,
    options: PropertyOptions,
    writable: bool,
    name: String,
    camelized_name: String,
    storage_key: String,
    writer_name: String,
    reader_name: String,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn new(value_type: ValueType, options: PropertyOptions) -> Self {
        let type_name = value_type.name();
        let storage_key = options
            .storage_key
            .clone()
            .unwrap_or_else(|| type_name.to_snake_case());
        let writer_name = options
            .writer_name
            .clone()
            .unwrap_or_else(|| format!("{storage_key}{WRITER_SUFFIX}"));
        let reader_name = options
            .reader_name
            .clone()
            .unwrap_or_else(|| storage_key.clone());

        PropertyDescriptor {
            value_type,
            writable: options.writable.unwrap_or(true),
            name: options.name.clone().unwrap_or_else(|| type_name.to_string()),
            camelized_name: options
                .camelized_name
                .clone()
                .unwrap_or_else(|| type_name.to_lower_camel_case()),
            storage_key,
            writer_name,
            reader_name,
            options,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The options this descriptor was constructed from, exactly as given.
    #[must_use]
    pub fn options(&self) -> &PropertyOptions {
        &self.options
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        !self.writable
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn camelized_name(&self) -> &str {
        &self.camelized_name
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn writer_name(&self) -> &str {
        &self.writer_name
    }

    #[must_use]
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// The key used for this property in dirty-tracking output.
    #[must_use]
    pub fn output_key(&self, use_camelized_keys: bool) -> &str {
        if use_camelized_keys {
            &self.camelized_name
        } else {
            &self.reader_name
        }
    }

    /// Every name a raw attribute key may use to address this property.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_str(),
            self.camelized_name.as_str(),
            self.storage_key.as_str(),
            self.reader_name.as_str(),
            self.writer_name.as_str(),
            self.value_type.name(),
        ]
        .into_iter()
    }
}
