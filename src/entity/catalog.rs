/*!

The catalog of every entity type defined with `define_entity!` or `define_embedded_entity!`. Each
generated type has a `ctor` that calls [`add_to_entity_catalog()`] at startup, so the catalog is
complete before `main` runs. [`config`](crate::config) consults it to flag configuration that
names an entity type nobody declared.

*/

use std::any::TypeId;
use std::sync::{LazyLock, Mutex, MutexGuard};

use log::trace;

use crate::entity::{Entity, EntityKind};

/// Static facts about one registered entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTypeInfo {
    pub name: &'static str,
    pub kind: EntityKind,
    pub type_id: TypeId,
}

/// Registered entity types in registration order.
static ENTITY_CATALOG: LazyLock<Mutex<Vec<EntityTypeInfo>>> = LazyLock::new(Mutex::default);

fn get_entity_catalog() -> MutexGuard<'static, Vec<EntityTypeInfo>> {
    ENTITY_CATALOG.lock().expect("Mutex poisoned")
}

/// Adds `E` to the catalog. Registering the same type twice is a no-op.
///
/// This is called from the `ctor` generated for every entity type. It must not touch `E`'s
/// schema, which is installed lazily so that configuration loaded in `main` is honored.
pub fn add_to_entity_catalog<E: Entity>() {
    let mut catalog = get_entity_catalog();
    let type_id = TypeId::of::<E>();
    if catalog.iter().any(|info| info.type_id == type_id) {
        return;
    }
    trace!("registering entity type {}", E::entity_name());
    catalog.push(EntityTypeInfo {
        name: E::entity_name(),
        kind: E::KIND,
        type_id,
    });
}

/// Every registered entity type, in registration order.
#[must_use]
pub fn registered_entity_types() -> Vec<EntityTypeInfo> {
    get_entity_catalog().clone()
}

#[must_use]
pub fn entity_type_info(name: &str) -> Option<EntityTypeInfo> {
    get_entity_catalog()
        .iter()
        .find(|info| info.name == name)
        .copied()
}

#[must_use]
pub fn entity_kind(name: &str) -> Option<EntityKind> {
    entity_type_info(name).map(|info| info.kind)
}

#[must_use]
pub fn is_registered(name: &str) -> bool {
    entity_type_info(name).is_some()
}
