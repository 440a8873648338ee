use indexmap::IndexMap;

use crate::entity::{EntityKind, EntityRecord, OriginalValue};
use crate::error::EntityError;
use crate::value::{AnyValue, Attributes, Raw};

/// The instance-level capability set shared by every entity kind: attribute access, dirty
/// tracking and serialization. Implementors only supply access to their [`EntityRecord`].
///
/// This trait is object safe. A property value that is itself an entity exposes it through
/// [`PropertyValue::as_entity`](crate::value::PropertyValue::as_entity), which is how
/// serialization recurses into nested entities.
pub trait EntityBehavior {
    fn record(&self) -> &EntityRecord;

    fn record_mut(&mut self) -> &mut EntityRecord;

    fn kind(&self) -> EntityKind {
        self.record().kind()
    }

    fn entity_type_name(&self) -> &'static str {
        self.record().entity_name()
    }

    /// Reads a property by any of its names, initializing it from `null` if it was never set.
    fn read(&self, name: &str) -> Option<&dyn AnyValue> {
        self.record().read(name)
    }

    /// Mutable access to a property by any of its names. In-place edits count as changes.
    fn read_mut(&mut self, name: &str) -> Option<&mut dyn AnyValue> {
        self.record_mut().read_mut(name)
    }

    /// Writes a property by any of its names. Returns `false` if no such property is declared.
    fn write(&mut self, name: &str, raw: Raw) -> bool {
        self.record_mut().write(name, &raw)
    }

    /// Storage key to current value, for every property or only the read-write ones.
    fn attributes(&self, include_read_only: bool) -> IndexMap<String, &dyn AnyValue> {
        self.record().attributes(include_read_only)
    }

    /// Bulk assignment through the writers. Keys that resolve to no property are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidArgument`] if `attributes` is not an object.
    fn set_attributes(&mut self, attributes: &Raw) -> Result<(), EntityError> {
        self.record_mut().set_attributes(attributes)
    }

    fn is_new_record(&self) -> bool {
        self.record().is_new_record()
    }

    /// Clearing the flag is the business of whatever persists the entity.
    fn set_new_record(&mut self, new_record: bool) {
        self.record_mut().set_new_record(new_record);
    }

    /// Reader name to the value snapshotted when that property was last loaded.
    fn original_values(&self) -> &IndexMap<String, OriginalValue> {
        self.record().original_values()
    }

    fn is_dirty(&self) -> bool {
        self.record().is_dirty()
    }

    /// The read-write properties whose current value differs from `compare_to`, or from the
    /// original values if `compare_to` is empty.
    fn dirty_attributes(
        &self,
        compare_to: &Attributes,
        use_camelized_keys: bool,
    ) -> IndexMap<String, &dyn AnyValue> {
        self.record()
            .dirty_attributes(compare_to, use_camelized_keys)
    }

    fn to_dirty_hash(&self, use_camelized_keys: bool) -> Attributes {
        self.record().to_dirty_hash(use_camelized_keys)
    }

    fn to_hash(&self, include_read_only: bool) -> Attributes {
        self.record().to_hash(include_read_only)
    }

    /// Equality of entities: same runtime type and equal read-write values. Read-only
    /// properties are not compared.
    fn same_attributes(&self, other: &dyn EntityBehavior) -> bool {
        self.record().same_attributes(other.record())
    }
}
