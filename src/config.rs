/*!

Property options can be supplied from a JSON document instead of (or in addition to) the entity
declarations. The document maps entity type names to value type names to options:

```json
{
    "Widget": {
        "Sku": { "name": "SKU", "camelizedName": "sku" },
        "InternalId": { "writable": false }
    }
}
```

Each entry is stored in the process-wide [`registry`](crate::property::registry), replacing any
options already stored for that `(entity, value type)` pair. Load configuration before an entity
type's schema is first used, which in practice means at the top of `main`. Options for types
whose schema is already installed only affect declarations made after loading.

Entity names that are not in the [catalog](crate::entity::catalog) are still stored, since the
entity type may be declared in code that has not been linked in, but each one is logged with
`warn!` because it is far more often a typo.

*/

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::entity::catalog::is_registered;
use crate::error::EntityError;
use crate::property::{set_property_options, PropertyOptions};

/// The deserialized form of a property options document, in document order.
pub type PropertyOptionsDocument = IndexMap<String, IndexMap<String, PropertyOptions>>;

/// Parses a property options document without touching the registry.
///
/// # Errors
///
/// Returns [`EntityError::JsonError`] if `json` is not a valid document. Unknown option keys are
/// rejected.
pub fn parse_property_options(json: &str) -> Result<PropertyOptionsDocument, EntityError> {
    let document: PropertyOptionsDocument = serde_json::from_str(json)?;
    Ok(document)
}

/// Stores every entry of `document` in the process-wide registry and returns the number of
/// entries stored.
pub fn apply_property_options(document: PropertyOptionsDocument) -> usize {
    let mut count = 0;
    for (entity, properties) in document {
        if !is_registered(&entity) {
            warn!("property options for unregistered entity type {entity}");
        }
        for (key, options) in properties {
            debug!("{entity}: loaded options for {key}");
            set_property_options(&entity, &key, options);
            count += 1;
        }
    }
    count
}

/// Loads a property options document from a string into the process-wide registry.
///
/// # Errors
///
/// Returns [`EntityError::JsonError`] if `json` is not a valid document. Nothing is stored in
/// that case.
pub fn load_property_options_str(json: &str) -> Result<usize, EntityError> {
    let document = parse_property_options(json)?;
    Ok(apply_property_options(document))
}

/// Loads a property options document from a file into the process-wide registry.
///
/// # Errors
///
/// Returns [`EntityError::IoError`] if the file cannot be read and [`EntityError::JsonError`] if
/// it is not a valid document.
pub fn load_property_options(path: &Path) -> Result<usize, EntityError> {
    let json = fs::read_to_string(path)?;
    load_property_options_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::property::get_property_options;
    use std::io::Write;
    use tempfile::NamedTempFile;

    define_value_type!(struct Color(Option<String>));
    define_value_type!(struct Serial(Option<String>));

    define_entity!(struct ConfiguredLamp { Color, Serial });

    #[test]
    fn parse_keeps_document_order() {
        let document = parse_property_options(
            r#"{"B": {"Y": {}, "X": {"writable": false}}, "A": {"Z": {"storageKey": "z"}}}"#,
        )
        .unwrap();
        let entities: Vec<&String> = document.keys().collect();
        assert_eq!(entities, vec!["B", "A"]);
        let keys: Vec<&String> = document["B"].keys().collect();
        assert_eq!(keys, vec!["Y", "X"]);
        assert_eq!(document["A"]["Z"].storage_key.as_deref(), Some("z"));
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(matches!(
            parse_property_options("[1, 2]"),
            Err(EntityError::JsonError(_))
        ));
        assert!(matches!(
            parse_property_options(r#"{"Lamp": {"Color": {"colour": "red"}}}"#),
            Err(EntityError::JsonError(_))
        ));
    }

    #[test]
    fn loads_into_registry() {
        let count = load_property_options_str(
            r#"{"ConfigStrEntity": {"Color": {"name": "Colour", "writable": false}}}"#,
        )
        .unwrap();
        assert_eq!(count, 1);
        let options = get_property_options("ConfigStrEntity", "Color");
        assert_eq!(options.name.as_deref(), Some("Colour"));
        assert_eq!(options.writable, Some(false));
    }

    #[test]
    fn loads_from_file_before_first_use() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ConfiguredLamp": {{"Serial": {{"writable": false, "storageKey": "serial_no"}}}}}}"#
        )
        .unwrap();

        assert_eq!(load_property_options(file.path()).unwrap(), 1);

        let serial = ConfiguredLamp::property("serial_no").unwrap();
        assert!(serial.is_read_only());
        assert_eq!(ConfiguredLamp::read_only_names(), vec!["Serial"]);
        assert_eq!(ConfiguredLamp::read_write_names(), vec!["Color"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("absent.json");
        assert!(matches!(
            load_property_options(&missing),
            Err(EntityError::IoError(_))
        ));
    }
}
