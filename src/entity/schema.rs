/*!

An [`EntitySchema`] is the per-type half of the declaration API: the ordered list of
[`PropertyDescriptor`]s an entity type has declared, plus a small dispatch table from every name a
property answers to (name, camelized name, storage key, reader name, writer name, value type name)
to its position in that list. Generated readers and writers are nothing more than a position
looked up here and handed to the generic slot accessors of [`EntityRecord`](super::EntityRecord).

Schemas live in a process-wide map keyed by the entity's `TypeId`. A type's macro-declared
properties are installed on first access, so options loaded through [`config`](crate::config)
before then are honored. Further declarations append copy-on-write: each instance holds the
`Arc<EntitySchema>` current at its allocation and never observes later declarations.

*/

use std::any::TypeId;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use log::{debug, trace};

use crate::entity::Entity;
use crate::property::{
    get_property_options, set_property_options, PropertyDescriptor, PropertySpec,
};
use crate::HashMap;

/// Maps `entity_type_id` to the current schema of that entity type.
static ENTITY_SCHEMAS: LazyLock<Mutex<HashMap<TypeId, Arc<EntitySchema>>>> =
    LazyLock::new(|| Mutex::new(HashMap::default()));

/// The declared properties of one entity type, in declaration order.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity_name: &'static str,
    descriptors: Vec<Arc<PropertyDescriptor>>,
    dispatch: HashMap<String, usize>,
}

impl EntitySchema {
    #[must_use]
    pub fn new(entity_name: &'static str) -> Self {
        EntitySchema {
            entity_name,
            descriptors: Vec::new(),
            dispatch: HashMap::default(),
        }
    }

    /// Constructs a descriptor for `spec` and appends it. The effective options are the
    /// registry's preset for this property overlaid with the spec's explicit options, and they
    /// are written back to the registry.
    pub fn declare(&mut self, spec: PropertySpec) -> &Arc<PropertyDescriptor> {
        let key = spec.value_type.name();
        let options = get_property_options(self.entity_name, key).overlay(&spec.options);
        set_property_options(self.entity_name, key, options.clone());

        let descriptor = Arc::new(PropertyDescriptor::new(spec.value_type, options));
        let position = self.descriptors.len();
        for alias in descriptor.aliases() {
            // The first declaration to claim a name keeps it.
            self.dispatch.entry(alias.to_string()).or_insert(position);
        }
        trace!(
            "{}: declared property {} (writable: {})",
            self.entity_name,
            descriptor.name(),
            descriptor.is_writable()
        );
        self.descriptors.push(descriptor);
        &self.descriptors[position]
    }

    #[must_use]
    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    #[must_use]
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.descriptors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Resolves any of a property's names to its position.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.dispatch.get(key).copied()
    }

    /// The position of the first property wrapping the value type with the given `TypeId`.
    #[must_use]
    pub fn position_of(&self, value_type_id: TypeId) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.value_type().type_id() == value_type_id)
    }

    pub fn read_only(&self) -> impl Iterator<Item = (usize, &Arc<PropertyDescriptor>)> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.is_read_only())
    }

    pub fn read_write(&self) -> impl Iterator<Item = (usize, &Arc<PropertyDescriptor>)> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.is_writable())
    }

    /// Either every property or only the read-write ones, in declaration order.
    pub fn selected(
        &self,
        include_read_only: bool,
    ) -> impl Iterator<Item = (usize, &Arc<PropertyDescriptor>)> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(move |(_, descriptor)| include_read_only || descriptor.is_writable())
    }
}

fn get_entity_schemas() -> MutexGuard<'static, HashMap<TypeId, Arc<EntitySchema>>> {
    ENTITY_SCHEMAS.lock().expect("Mutex poisoned")
}

/// Returns the current schema of `E`, installing its macro-declared properties on first access.
fn current_schema<E: Entity>(
    schemas: &mut HashMap<TypeId, Arc<EntitySchema>>,
) -> Arc<EntitySchema> {
    let schema = schemas.entry(TypeId::of::<E>()).or_insert_with(|| {
        let mut schema = EntitySchema::new(E::entity_name());
        for spec in E::declared_properties() {
            schema.declare(spec);
        }
        debug!(
            "{}: installed schema with {} properties",
            E::entity_name(),
            schema.len()
        );
        Arc::new(schema)
    });
    Arc::clone(schema)
}

/// The schema new instances of `E` are allocated with.
#[must_use]
pub fn schema_of<E: Entity>() -> Arc<EntitySchema> {
    let mut schemas = get_entity_schemas();
    current_schema::<E>(&mut schemas)
}

/// Appends a descriptor per spec to `E`'s schema and returns the updated schema. Instances
/// allocated before this call keep the schema they were allocated with.
pub fn declare_properties<E, I>(specs: I) -> Arc<EntitySchema>
where
    E: Entity,
    I: IntoIterator<Item = PropertySpec>,
{
    let mut schemas = get_entity_schemas();
    let mut schema = EntitySchema::clone(&current_schema::<E>(&mut schemas));
    for spec in specs {
        schema.declare(spec);
    }
    let schema = Arc::new(schema);
    schemas.insert(TypeId::of::<E>(), Arc::clone(&schema));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyOptions;
    use crate::value::ValueType;

    crate::define_value_type!(struct Label(Option<String>));
    crate::define_value_type!(struct Serial(Option<String>));
    crate::define_value_type!(struct Weight(f64));

    fn schema() -> EntitySchema {
        let mut schema = EntitySchema::new("SchemaTestEntity");
        schema.declare(PropertySpec::of::<Label>());
        schema.declare(PropertySpec::of::<Serial>().with_options(PropertyOptions::read_only()));
        schema.declare(PropertySpec::of::<Weight>());
        schema
    }

    #[test]
    fn declaration_order_is_preserved() {
        let schema = schema();
        let names: Vec<&str> = schema.properties().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Label", "Serial", "Weight"]);
        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
        assert!(EntitySchema::new("Empty").is_empty());
    }

    #[test]
    fn partitions_preserve_order() {
        let schema = schema();
        let read_only: Vec<usize> = schema.read_only().map(|(i, _)| i).collect();
        let read_write: Vec<usize> = schema.read_write().map(|(i, _)| i).collect();
        assert_eq!(read_only, vec![1]);
        assert_eq!(read_write, vec![0, 2]);
        assert_eq!(schema.selected(true).count(), 3);
        assert_eq!(schema.selected(false).count(), 2);
    }

    #[test]
    fn dispatch_resolves_every_alias() {
        let schema = schema();
        for key in ["Serial", "serial", "serial="] {
            assert_eq!(schema.resolve(key), Some(1), "key {key}");
        }
        assert_eq!(schema.resolve("weight="), Some(2));
        assert_eq!(schema.resolve("Volume"), None);
        assert_eq!(
            schema.position_of(ValueType::of::<Weight>().type_id()),
            Some(2)
        );
    }

    #[test]
    fn first_declaration_keeps_shared_names() {
        let mut schema = schema();
        schema.declare(PropertySpec::of::<Label>());
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.resolve("label"), Some(0));
    }

    #[test]
    fn declaration_consults_registry() {
        set_property_options(
            "SchemaRegistryEntity",
            "Label",
            PropertyOptions {
                writable: Some(false),
                name: Some("Preset".to_string()),
                ..Default::default()
            },
        );
        let mut schema = EntitySchema::new("SchemaRegistryEntity");
        let descriptor = schema.declare(PropertySpec::of::<Label>().with_options(PropertyOptions {
            name: Some("Explicit".to_string()),
            ..Default::default()
        }));
        assert!(descriptor.is_read_only());
        assert_eq!(descriptor.name(), "Explicit");

        let stored = get_property_options("SchemaRegistryEntity", "Label");
        assert_eq!(stored.writable, Some(false));
        assert_eq!(stored.name.as_deref(), Some("Explicit"));
    }
}
