/*!

An implementor of [`Entity`] is a type whose fields are declared as an ordered list of properties
rather than as struct fields. Concrete entity types are declared with the
[`define_entity!`](crate::define_entity) and
[`define_embedded_entity!`](crate::define_embedded_entity) macros:

```rust
use propmodel::prelude::*;

define_value_type!(pub struct Name(Option<String>));
define_value_type!(pub struct InternalId(Option<String>));

define_entity!(pub struct Widget {
    Name,
    InternalId { writable: false },
});
```

The [`Entity`] trait carries the type-level half of the API: the declaration API
(`declare_properties`, `properties`, and the read-only/read-write partitions) and the
constructors (`allocate`, `new`, `with_attributes`, `instantiate`, `instantiate_into`). The
instance-level half lives on [`EntityBehavior`].

There are two kinds of entities, [`EntityKind::Entity`] for top-level resources and
[`EntityKind::EmbeddedEntity`] for values nested in another entity's properties. Both have the
same capabilities; the kind is only a tag.

*/

use std::any::TypeId;
use std::sync::Arc;

use log::warn;

use crate::entity::schema::{declare_properties, schema_of, EntitySchema};
use crate::entity::{EntityBehavior, EntityRecord};
use crate::property::{PropertyDescriptor, PropertySpec};
use crate::value::{Attributes, PropertyValue, Raw};

/// The closed set of entity variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Entity,
    EmbeddedEntity,
}

/// The right-hand side of [`Entity::case_eq`].
#[derive(Clone, Copy)]
pub enum Comparand<'a> {
    /// A plain key/value mapping, promoted to an instance before comparing.
    Attributes(&'a Attributes),
    Entity(&'a dyn EntityBehavior),
}

impl<'a> From<&'a Attributes> for Comparand<'a> {
    fn from(attributes: &'a Attributes) -> Self {
        Comparand::Attributes(attributes)
    }
}

impl<'a> From<&'a dyn EntityBehavior> for Comparand<'a> {
    fn from(entity: &'a dyn EntityBehavior) -> Self {
        Comparand::Entity(entity)
    }
}

impl<'a, E: Entity> From<&'a E> for Comparand<'a> {
    fn from(entity: &'a E) -> Self {
        Comparand::Entity(entity)
    }
}

fn unset_from_raw<E: Entity>(raw: &Raw) -> E {
    if !raw.is_null() {
        warn!(
            "{}: expected an object of attributes, got {raw}",
            E::entity_name()
        );
    }
    E::allocate()
}

/// All entities must implement this trait using the `define_entity!` or
/// `define_embedded_entity!` macro.
pub trait Entity: EntityBehavior + PropertyValue {
    const KIND: EntityKind;

    fn entity_name() -> &'static str;

    /// The properties listed in the entity's macro declaration. These are installed into the
    /// schema the first time it is accessed.
    fn declared_properties() -> Vec<PropertySpec>;

    fn from_record(record: EntityRecord) -> Self;

    fn schema() -> Arc<EntitySchema> {
        schema_of::<Self>()
    }

    /// Declares additional properties and returns the full ordered list.
    fn declare_properties<I: IntoIterator<Item = PropertySpec>>(
        specs: I,
    ) -> Vec<Arc<PropertyDescriptor>> {
        declare_properties::<Self, I>(specs).properties().to_vec()
    }

    /// The declared properties in declaration order. Empty, not an error, if none were declared.
    fn properties() -> Vec<Arc<PropertyDescriptor>> {
        Self::schema().properties().to_vec()
    }

    fn read_only() -> Vec<Arc<PropertyDescriptor>> {
        Self::schema()
            .read_only()
            .map(|(_, descriptor)| Arc::clone(descriptor))
            .collect()
    }

    fn read_only_names() -> Vec<String> {
        Self::schema()
            .read_only()
            .map(|(_, descriptor)| descriptor.name().to_string())
            .collect()
    }

    fn read_write() -> Vec<Arc<PropertyDescriptor>> {
        Self::schema()
            .read_write()
            .map(|(_, descriptor)| Arc::clone(descriptor))
            .collect()
    }

    fn read_write_names() -> Vec<String> {
        Self::schema()
            .read_write()
            .map(|(_, descriptor)| descriptor.name().to_string())
            .collect()
    }

    /// Looks up a property by any of its names.
    fn property(key: &str) -> Option<Arc<PropertyDescriptor>> {
        let schema = Self::schema();
        schema
            .resolve(key)
            .map(|position| Arc::clone(&schema.properties()[position]))
    }

    /// A fresh, uninitialized instance: no values set, nothing snapshotted, not a new record.
    fn allocate() -> Self {
        Self::from_record(EntityRecord::allocate(
            TypeId::of::<Self>(),
            Self::KIND,
            Self::schema(),
        ))
    }

    /// The constructor path: an empty instance flagged as a new record.
    fn new() -> Self {
        let mut entity = Self::allocate();
        entity.set_new_record(true);
        entity
    }

    /// The constructor path with attributes applied through the writers. Nothing is
    /// snapshotted, so the result is dirty.
    fn with_attributes(attributes: &Attributes) -> Self {
        let mut entity = Self::new();
        entity.record_mut().assign_attributes(attributes);
        entity
    }

    /// Allocates a new instance and loads `attributes` into it, snapshotting each applied value.
    fn instantiate(attributes: &Attributes) -> Self {
        let mut entity = Self::allocate();
        Self::instantiate_into(&mut entity, attributes);
        entity
    }

    /// Loads `attributes` into an existing instance, snapshotting each applied value.
    fn instantiate_into<'a>(entity: &'a mut Self, attributes: &Attributes) -> &'a mut Self {
        entity.record_mut().load(attributes);
        entity
    }

    /// Builds an entity from a raw value through the load path. Objects are instantiated;
    /// anything else yields an allocated, empty instance.
    fn from_raw_attributes(raw: &Raw) -> Self {
        match raw.as_object() {
            Some(attributes) => Self::instantiate(attributes),
            None => unset_from_raw(raw),
        }
    }

    /// Builds an entity from a raw value through the constructor path, which is how a writer
    /// builds an entity-valued property. Objects become new records with nothing snapshotted, so
    /// every property they set appears in their own write payload. Anything else yields an
    /// allocated, empty instance.
    fn construct_from_raw(raw: &Raw) -> Self {
        match raw.as_object() {
            Some(attributes) => Self::with_attributes(attributes),
            None => unset_from_raw(raw),
        }
    }

    /// Case equality: a plain mapping is promoted to an instance of `Self` through the
    /// constructor path and then compared with `same_attributes`.
    fn case_eq<'a>(&self, other: impl Into<Comparand<'a>>) -> bool {
        match other.into() {
            Comparand::Attributes(attributes) => {
                let promoted = Self::with_attributes(attributes);
                self.same_attributes(&promoted)
            }
            Comparand::Entity(entity) => self.same_attributes(entity),
        }
    }
}
