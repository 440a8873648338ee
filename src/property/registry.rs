/*!

The `PropertyRegistry` maps `(entity type name, property key) -> PropertyOptions`, where the
property key is the name of the property's value type. It is process-wide state, populated by
property declarations and by [`config`](crate::config) loading, and it lives for the life of the
process. There is no removal.

Reads auto-vivify: asking for options of an entity type or property key that has never been seen
creates and returns an empty [`PropertyOptions`] entry instead of failing. This is deliberate, so
that configuration can be written before or after the declaration it applies to, but it also means
a misspelled key silently yields defaults. [`config`](crate::config) warns about entity names
that are not in the catalog to soften this.

*/

use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::property::PropertyOptions;
use crate::HashMap;

/// The process-wide registry instance.
static PROPERTY_REGISTRY: LazyLock<Mutex<PropertyRegistry>> = LazyLock::new(Mutex::default);

/// A two-level map from entity type name to property key to options.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    entries: HashMap<String, HashMap<String, PropertyOptions>>,
}

impl PropertyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the options stored for `(entity, key)`, inserting an empty entry first if absent.
    pub fn get_or_insert_default(&mut self, entity: &str, key: &str) -> &mut PropertyOptions {
        self.entries
            .entry(entity.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
    }

    /// Stores `options` for `(entity, key)`, replacing any previous entry.
    pub fn set(&mut self, entity: &str, key: &str, options: PropertyOptions) {
        self.entries
            .entry(entity.to_string())
            .or_default()
            .insert(key.to_string(), options);
    }

    /// Whether an entry exists, without creating one.
    #[must_use]
    pub fn contains(&self, entity: &str, key: &str) -> bool {
        self.entries
            .get(entity)
            .is_some_and(|properties| properties.contains_key(key))
    }

    /// The number of property entries across all entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(|properties| properties.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn get_property_registry() -> MutexGuard<'static, PropertyRegistry> {
    PROPERTY_REGISTRY.lock().expect("Mutex poisoned")
}

/// Fetches (a copy of) the options registered for `(entity, key)` in the process-wide registry.
/// Missing entries are created empty.
#[must_use]
pub fn get_property_options(entity: &str, key: &str) -> PropertyOptions {
    get_property_registry()
        .get_or_insert_default(entity, key)
        .clone()
}

/// Stores options for `(entity, key)` in the process-wide registry.
pub fn set_property_options(entity: &str, key: &str, options: PropertyOptions) {
    get_property_registry().set(entity, key, options);
}

/// Whether the process-wide registry has an entry for `(entity, key)`.
#[must_use]
pub fn has_property_options(entity: &str, key: &str) -> bool {
    get_property_registry().contains(entity, key)
}
