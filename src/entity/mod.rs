/*!

An entity is a local stand-in for a resource that lives in some upstream system. Its fields are
declared as an ordered list of properties, each wrapping a value type, and the entity keeps enough
state to answer "what changed since this was loaded?" so that only the changes are written back.

The pieces:

- [`Entity`]: the type-level API (declaration and construction), implemented by the
  `define_entity!` and `define_embedded_entity!` macros.
- [`EntityBehavior`]: the object-safe, instance-level API (attributes, dirty tracking,
  serialization and equality).
- [`EntitySchema`](schema::EntitySchema): the per-type ordered property list and the dispatch
  table that resolves any of a property's names to its storage slot.
- [`EntityRecord`]: per-instance storage slots, original values and the `new_record` flag.
- [`catalog`]: the startup registry of every entity type.

Like properties in the registry, entity types are registered through `ctor` functions the macros
emit, while their schemas are installed lazily on first use.

*/

mod behavior;
pub mod catalog;
mod entity;
pub mod record;
pub mod schema;

// Flatten the module hierarchy.
pub use behavior::EntityBehavior;
pub use entity::*;
pub use record::{EntityRecord, OriginalValue};
pub use schema::EntitySchema;
