/*!

An [`EntityRecord`] is the state behind every entity instance:

- one storage slot per declared property, each holding a value of the property's value type,
- the original values snapshotted when properties were loaded through `instantiate`, and
- the `new_record` flag.

Slots are `OnceCell`s so that a reader can lazily initialize a never-written slot to the value
constructed from `null` through a shared reference. Writers replace the cell wholesale.

Dirty tracking compares each read-write slot against a baseline. The baseline is the snapshot in
`original_values`, or a caller-supplied mapping for `dirty_attributes`. A property with no
baseline differs unless its current value is null-equivalent (including never set). A property
whose value could not be duplicated at load time is [`OriginalValue::Untracked`] and always
counts as dirty, so that a change to it can never be dropped from a write payload.

*/

use std::any::TypeId;
use std::cell::OnceCell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use log::{trace, warn};

use crate::entity::schema::EntitySchema;
use crate::entity::EntityKind;
use crate::error::EntityError;
use crate::property::PropertyDescriptor;
use crate::value::{AnyValue, Attributes, PropertyValue, Raw};

/// The snapshot of one property taken when it was loaded.
#[derive(Debug)]
pub enum OriginalValue {
    /// A duplicate of the value as it was applied.
    Captured(Box<dyn AnyValue>),
    /// The value type could not duplicate the value. The property always counts as dirty.
    Untracked,
}

impl OriginalValue {
    #[must_use]
    pub fn value(&self) -> Option<&dyn AnyValue> {
        match self {
            OriginalValue::Captured(value) => Some(value.as_ref()),
            OriginalValue::Untracked => None,
        }
    }

    fn duplicate(&self) -> Result<Self, EntityError> {
        match self {
            OriginalValue::Captured(value) => Ok(OriginalValue::Captured(value.dyn_duplicate()?)),
            OriginalValue::Untracked => Ok(OriginalValue::Untracked),
        }
    }
}

/// What a slot's current value is compared against when checking for changes.
enum Baseline<'a> {
    Value(&'a dyn AnyValue),
    Untracked,
    Missing,
}

/// Renders a value for serialized output, recursing into nested entities with `nested`.
fn render(value: &dyn AnyValue, nested: impl Fn(&dyn crate::entity::EntityBehavior) -> Attributes) -> Raw {
    match value.dyn_as_entity() {
        Some(entity) => Raw::Object(nested(entity)),
        None => value.dyn_to_raw(),
    }
}

/// Finds the raw baseline for `descriptor` in a caller-supplied mapping.
fn lookup_raw<'a>(compare_to: &'a Attributes, descriptor: &PropertyDescriptor) -> Option<&'a Raw> {
    [
        descriptor.reader_name(),
        descriptor.camelized_name(),
        descriptor.name(),
        descriptor.storage_key(),
    ]
    .into_iter()
    .find_map(|key| compare_to.get(key))
}

pub struct EntityRecord {
    type_id: TypeId,
    kind: EntityKind,
    schema: Arc<EntitySchema>,
    slots: Vec<OnceCell<Box<dyn AnyValue>>>,
    original_values: IndexMap<String, OriginalValue>,
    new_record: bool,
}

impl EntityRecord {
    /// An uninitialized record with one empty slot per property of `schema`.
    pub(crate) fn allocate(type_id: TypeId, kind: EntityKind, schema: Arc<EntitySchema>) -> Self {
        let slots = (0..schema.len()).map(|_| OnceCell::new()).collect();
        EntityRecord {
            type_id,
            kind,
            schema,
            slots,
            original_values: IndexMap::new(),
            new_record: false,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub fn entity_name(&self) -> &'static str {
        self.schema.entity_name()
    }

    /// The schema this record was allocated with.
    #[must_use]
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    #[must_use]
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn set_new_record(&mut self, new_record: bool) {
        self.new_record = new_record;
    }

    #[must_use]
    pub fn original_values(&self) -> &IndexMap<String, OriginalValue> {
        &self.original_values
    }

    // Generic slot accessors. Every generated reader and writer ends up here.

    /// The current value of the property at `position`, lazily initialized from `null`.
    fn slot_value(&self, position: usize) -> &dyn AnyValue {
        let descriptor = &self.schema.properties()[position];
        self.slots[position]
            .get_or_init(|| descriptor.value_type().construct_null())
            .as_ref()
    }

    /// Replaces the value of the property at `position` with one constructed from `raw`.
    fn write_slot(&mut self, position: usize, raw: &Raw) {
        let value = self.schema.properties()[position]
            .value_type()
            .construct(raw);
        self.slots[position] = OnceCell::from(value);
    }

    /// Mutable access to the value at `position`, lazily initialized from `null`.
    fn slot_value_mut(&mut self, position: usize) -> &mut dyn AnyValue {
        let slot = &mut self.slots[position];
        if slot.get().is_none() {
            let value = self.schema.properties()[position]
                .value_type()
                .construct_null();
            *slot = OnceCell::from(value);
        }
        match slot.get_mut() {
            Some(value) => value.as_mut(),
            None => unreachable!("slot was initialized above"),
        }
    }

    fn is_unset(&self, position: usize) -> bool {
        self.slots[position].get().is_none()
    }

    /// Reads a property by any of its names.
    #[must_use]
    pub fn read(&self, name: &str) -> Option<&dyn AnyValue> {
        self.schema
            .resolve(name)
            .map(|position| self.slot_value(position))
    }

    /// Mutable access to a property by any of its names, for editing a value in place. The
    /// snapshot is untouched, so an edit shows up as a change like a write does.
    pub fn read_mut(&mut self, name: &str) -> Option<&mut dyn AnyValue> {
        let position = self.schema.resolve(name)?;
        Some(self.slot_value_mut(position))
    }

    /// Writes a property by any of its names. Returns `false` if no such property is declared.
    pub fn write(&mut self, name: &str, raw: &Raw) -> bool {
        match self.schema.resolve(name) {
            Some(position) => {
                self.write_slot(position, raw);
                true
            }
            None => false,
        }
    }

    fn typed_position<V: PropertyValue>(&self) -> usize {
        self.schema
            .position_of(TypeId::of::<V>())
            .unwrap_or_else(|| {
                panic!(
                    "{} has no property of type {}. Declare it before allocating instances.",
                    self.entity_name(),
                    V::type_name()
                )
            })
    }

    /// The typed reader behind generated accessors. It addresses the first property wrapping
    /// `V`. Macro-declared properties come first and each wraps a distinct value type, so that is
    /// always the property the accessor was generated for. A later runtime declaration of the
    /// same value type is only reachable by name.
    ///
    /// # Panics
    ///
    /// Panics if `V` is not the value type of a property declared on this record's entity type.
    #[must_use]
    pub fn value_of<V: PropertyValue>(&self) -> &V {
        self.slot_value(self.typed_position::<V>())
            .downcast_ref::<V>()
            .expect("Slot value does not match the declared value type.")
    }

    /// The typed in-place editor behind generated `*_mut` accessors. Resolves like
    /// [`value_of`](Self::value_of).
    ///
    /// # Panics
    ///
    /// Panics if `V` is not the value type of a property declared on this record's entity type.
    pub fn value_mut<V: PropertyValue>(&mut self) -> &mut V {
        let position = self.typed_position::<V>();
        self.slot_value_mut(position)
            .downcast_mut::<V>()
            .expect("Slot value does not match the declared value type.")
    }

    /// The typed writer behind generated accessors. Resolves like [`value_of`](Self::value_of).
    pub fn assign<V: PropertyValue>(&mut self, raw: &Raw) {
        match self.schema.position_of(TypeId::of::<V>()) {
            Some(position) => self.write_slot(position, raw),
            None => warn!(
                "{}: ignoring write to undeclared property {}",
                self.entity_name(),
                V::type_name()
            ),
        }
    }

    /// Applies each attribute and snapshots the applied value. Nested entities are loaded the
    /// same way, so they snapshot their own attributes. Keys that do not resolve to a declared
    /// property are skipped.
    pub fn load(&mut self, attributes: &Attributes) {
        for (key, raw) in attributes {
            let Some(position) = self.schema.resolve(key) else {
                trace!("{}: skipping unknown attribute {key}", self.entity_name());
                continue;
            };
            let descriptor = &self.schema.properties()[position];
            self.slots[position] = OnceCell::from(descriptor.value_type().load(raw));

            let snapshot = match self.slot_value(position).dyn_duplicate() {
                Ok(duplicate) => OriginalValue::Captured(duplicate),
                Err(error) => {
                    warn!(
                        "{}: cannot snapshot {} ({error}); it will always be reported dirty",
                        self.entity_name(),
                        descriptor.name()
                    );
                    OriginalValue::Untracked
                }
            };
            let reader_name = descriptor.reader_name().to_string();
            self.original_values.insert(reader_name, snapshot);
        }
    }

    /// Applies each attribute through its writer without snapshotting. Keys that do not resolve
    /// to a declared property are ignored.
    pub fn assign_attributes(&mut self, attributes: &Attributes) {
        for (key, raw) in attributes {
            if !self.write(key, raw) {
                trace!("{}: ignoring unknown attribute {key}", self.entity_name());
            }
        }
    }

    /// Bulk assignment from a raw value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidArgument`] if `attributes` is not an object.
    pub fn set_attributes(&mut self, attributes: &Raw) -> Result<(), EntityError> {
        let attributes = attributes.as_object().ok_or_else(|| {
            EntityError::InvalidArgument(format!(
                "{}: attributes must be a mapping, got {attributes}",
                self.entity_name()
            ))
        })?;
        self.assign_attributes(attributes);
        Ok(())
    }

    /// Storage key to current value.
    #[must_use]
    pub fn attributes(&self, include_read_only: bool) -> IndexMap<String, &dyn AnyValue> {
        self.schema
            .selected(include_read_only)
            .map(|(position, descriptor)| {
                (
                    descriptor.storage_key().to_string(),
                    self.slot_value(position),
                )
            })
            .collect()
    }

    fn snapshot_baseline(&self, descriptor: &PropertyDescriptor) -> Baseline<'_> {
        match self.original_values.get(descriptor.reader_name()) {
            Some(OriginalValue::Captured(value)) => Baseline::Value(value.as_ref()),
            Some(OriginalValue::Untracked) => Baseline::Untracked,
            None => Baseline::Missing,
        }
    }

    fn differs_from(&self, position: usize, baseline: Baseline<'_>) -> bool {
        match baseline {
            Baseline::Value(original) => !self.slot_value(position).dyn_eq(original),
            Baseline::Untracked => true,
            Baseline::Missing => {
                !self.is_unset(position)
                    && !self.schema.properties()[position]
                        .value_type()
                        .is_null_equivalent(self.slot_value(position))
            }
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.new_record
            || self.schema.read_write().any(|(position, descriptor)| {
                self.differs_from(position, self.snapshot_baseline(descriptor))
            })
    }

    /// The read-write properties whose current value differs from the baseline, keyed by reader
    /// name (or camelized name), in declaration order.
    #[must_use]
    pub fn dirty_attributes(
        &self,
        compare_to: &Attributes,
        use_camelized_keys: bool,
    ) -> IndexMap<String, &dyn AnyValue> {
        let mut dirty = IndexMap::new();
        for (position, descriptor) in self.schema.read_write() {
            let differs = if compare_to.is_empty() {
                self.differs_from(position, self.snapshot_baseline(descriptor))
            } else {
                match lookup_raw(compare_to, descriptor) {
                    Some(raw) => {
                        let baseline = descriptor.value_type().construct(raw);
                        self.differs_from(position, Baseline::Value(baseline.as_ref()))
                    }
                    None => self.differs_from(position, Baseline::Missing),
                }
            };
            if differs {
                dirty.insert(
                    descriptor.output_key(use_camelized_keys).to_string(),
                    self.slot_value(position),
                );
            }
        }
        dirty
    }

    /// The write payload: dirty read-write properties only, rendered recursively, ordered by
    /// declaration regardless of the order in which they became dirty.
    #[must_use]
    pub fn to_dirty_hash(&self, use_camelized_keys: bool) -> Attributes {
        // Seed every read-write key so the output order is the declaration order.
        let mut seeded: IndexMap<String, Option<Raw>> = self
            .schema
            .read_write()
            .map(|(_, descriptor)| {
                (
                    descriptor.output_key(use_camelized_keys).to_string(),
                    None,
                )
            })
            .collect();

        for (key, value) in self.dirty_attributes(&Attributes::new(), use_camelized_keys) {
            let rendered = render(value, |entity| entity.to_dirty_hash(use_camelized_keys));
            seeded.insert(key, Some(rendered));
        }

        seeded
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }

    /// Name to current value for every property (or only read-write ones), rendered recursively.
    #[must_use]
    pub fn to_hash(&self, include_read_only: bool) -> Attributes {
        self.schema
            .selected(include_read_only)
            .map(|(position, descriptor)| {
                let rendered = render(self.slot_value(position), |entity| {
                    entity.to_hash(include_read_only)
                });
                (descriptor.name().to_string(), rendered)
            })
            .collect()
    }

    /// Same runtime type and equal read-write values. Records allocated with different schema
    /// versions are compared over the read-write properties of both; a property only one of them
    /// has must hold its null value there.
    #[must_use]
    pub fn same_attributes(&self, other: &EntityRecord) -> bool {
        if self.type_id != other.type_id {
            return false;
        }
        self.read_write_match(other)
            && (Arc::ptr_eq(&self.schema, &other.schema) || other.read_write_match(self))
    }

    /// Whether every read-write value of `self` equals the value `other` holds for it.
    fn read_write_match(&self, other: &EntityRecord) -> bool {
        self.schema.read_write().all(|(position, descriptor)| {
            let value = self.slot_value(position);
            match other.schema.resolve(descriptor.reader_name()) {
                Some(other_position) => value.dyn_eq(other.slot_value(other_position)),
                None => descriptor.value_type().is_null_equivalent(value),
            }
        })
    }

    /// A deep copy of the slots and the snapshot.
    ///
    /// # Errors
    ///
    /// Fails if any held value cannot be duplicated.
    pub fn try_duplicate(&self) -> Result<Self, EntityError> {
        let mut slots = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let cell = match slot.get() {
                Some(value) => OnceCell::from(value.dyn_duplicate()?),
                None => OnceCell::new(),
            };
            slots.push(cell);
        }

        let mut original_values = IndexMap::with_capacity(self.original_values.len());
        for (reader_name, original) in &self.original_values {
            original_values.insert(reader_name.clone(), original.duplicate()?);
        }

        Ok(EntityRecord {
            type_id: self.type_id,
            kind: self.kind,
            schema: Arc::clone(&self.schema),
            slots,
            original_values,
            new_record: self.new_record,
        })
    }
}

impl Debug for EntityRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct(self.entity_name());
        for (descriptor, slot) in self.schema.properties().iter().zip(&self.slots) {
            match slot.get() {
                Some(value) => debug.field(descriptor.name(), value),
                None => debug.field(descriptor.name(), &format_args!("<unset>")),
            };
        }
        debug.field("new_record", &self.new_record).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::schema::EntitySchema;
    use crate::property::{PropertyOptions, PropertySpec};
    use serde_json::json;

    crate::define_value_type!(struct Title(Option<String>));
    crate::define_value_type!(struct Code(Option<String>));
    crate::define_value_type!(struct Stock(i64));

    #[derive(Debug, PartialEq)]
    struct Cursor(i64);

    impl PropertyValue for Cursor {
        fn type_name() -> &'static str {
            "Cursor"
        }
        fn from_raw(raw: &Raw) -> Self {
            Cursor(raw.as_i64().unwrap_or_default())
        }
        fn to_raw(&self) -> Raw {
            json!(self.0)
        }
        fn duplicate(&self) -> Result<Self, EntityError> {
            Err(EntityError::NotDuplicable("Cursor"))
        }
    }

    struct RecordTestEntity;

    fn record() -> EntityRecord {
        let mut schema = EntitySchema::new("RecordTestEntity");
        schema.declare(PropertySpec::of::<Title>());
        schema.declare(PropertySpec::of::<Code>().with_options(PropertyOptions::read_only()));
        schema.declare(PropertySpec::of::<Stock>());
        schema.declare(PropertySpec::of::<Cursor>());
        EntityRecord::allocate(
            TypeId::of::<RecordTestEntity>(),
            EntityKind::Entity,
            Arc::new(schema),
        )
    }

    fn attributes(value: Raw) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn unset_slots_read_as_null_construction() {
        let record = record();
        assert_eq!(
            record.read("title").unwrap().downcast_ref::<Title>(),
            Some(&Title(None))
        );
        assert_eq!(record.value_of::<Stock>(), &Stock(0));
        assert!(record.read("missing").is_none());
    }

    #[test]
    fn writers_replace_values() {
        let mut record = record();
        assert!(record.write("title=", &json!("Bolt")));
        assert!(record.write("Title", &json!("Nut")));
        assert!(!record.write("bogus", &json!(1)));
        assert_eq!(record.value_of::<Title>(), &Title(Some("Nut".to_string())));

        record.assign::<Stock>(&json!(12));
        assert_eq!(record.value_of::<Stock>(), &Stock(12));
    }

    #[test]
    fn load_snapshots_applied_values() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Code": "X9", "Nope": 3})));

        let originals = record.original_values();
        assert_eq!(originals.len(), 2);
        assert_eq!(
            originals["title"].value().unwrap().downcast_ref::<Title>(),
            Some(&Title(Some("Bolt".to_string())))
        );
        assert!(originals.contains_key("code"));
        assert!(!record.is_dirty());
    }

    #[test]
    fn dirty_after_change() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Stock": 4})));
        assert!(!record.is_dirty());

        record.write("stock=", &json!(5));
        assert!(record.is_dirty());
        let dirty = record.dirty_attributes(&Attributes::new(), false);
        assert_eq!(dirty.keys().collect::<Vec<_>>(), vec!["stock"]);

        // Writing the original value back makes it clean again.
        record.write("stock=", &json!(4));
        assert!(!record.is_dirty());
    }

    #[test]
    fn read_only_changes_are_not_dirty() {
        let mut record = record();
        record.load(&attributes(json!({"Code": "X9"})));
        record.write("code=", &json!("Y1"));
        assert!(!record.is_dirty());
    }

    #[test]
    fn missing_snapshot_differs_unless_null_equivalent() {
        let mut record = record();
        assert!(!record.is_dirty());

        // Reading lazily initializes to the null value, which is still clean.
        let _ = record.read("title");
        assert!(!record.is_dirty());

        record.write("title=", &Raw::Null);
        assert!(!record.is_dirty());

        record.write("title=", &json!("Bolt"));
        assert!(record.is_dirty());
    }

    #[test]
    fn new_record_is_dirty() {
        let mut record = record();
        record.set_new_record(true);
        assert!(record.is_dirty());
        record.set_new_record(false);
        assert!(!record.is_dirty());
    }

    #[test]
    fn undupable_values_are_untracked_and_dirty() {
        let mut record = record();
        record.load(&attributes(json!({"Cursor": 7, "Title": "Bolt"})));
        assert!(matches!(
            record.original_values()["cursor"],
            OriginalValue::Untracked
        ));
        assert!(record.is_dirty());

        let dirty = record.dirty_attributes(&Attributes::new(), false);
        assert_eq!(dirty.keys().collect::<Vec<_>>(), vec!["cursor"]);
        assert_eq!(record.to_dirty_hash(false), attributes(json!({"cursor": 7})));
    }

    #[test]
    fn dirty_attributes_against_supplied_mapping() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Stock": 4})));

        let compare_to = attributes(json!({"title": "Nut", "stock": 4}));
        let dirty = record.dirty_attributes(&compare_to, true);
        assert_eq!(dirty.keys().collect::<Vec<_>>(), vec!["title"]);
        assert_eq!(
            dirty["title"].downcast_ref::<Title>(),
            Some(&Title(Some("Bolt".to_string())))
        );
    }

    #[test]
    fn set_attributes_requires_mapping() {
        let mut record = record();
        assert!(matches!(
            record.set_attributes(&json!(["Title", "Bolt"])),
            Err(EntityError::InvalidArgument(_))
        ));
        record
            .set_attributes(&json!({"title": "Bolt", "unknown": true}))
            .unwrap();
        assert_eq!(record.value_of::<Title>(), &Title(Some("Bolt".to_string())));
        assert!(record.original_values().is_empty());
    }

    #[test]
    fn attributes_keyed_by_storage_key() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Code": "X9"})));
        let all = record.attributes(true);
        assert_eq!(
            all.keys().collect::<Vec<_>>(),
            vec!["title", "code", "stock", "cursor"]
        );
        let writable = record.attributes(false);
        assert_eq!(
            writable.keys().collect::<Vec<_>>(),
            vec!["title", "stock", "cursor"]
        );
    }

    #[test]
    fn to_hash_preserves_declaration_order() {
        let mut record = record();
        record.load(&attributes(json!({"Stock": 2, "Code": "X9", "Title": "Bolt"})));
        let hash = record.to_hash(true);
        assert_eq!(
            hash.keys().collect::<Vec<_>>(),
            vec!["Title", "Code", "Stock", "Cursor"]
        );
        assert_eq!(hash["Code"], json!("X9"));
        assert!(!record.to_hash(false).contains_key("Code"));
    }

    #[test]
    fn dirty_hash_orders_by_declaration() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Stock": 2})));
        record.write("stock=", &json!(3));
        record.write("title=", &json!("Nut"));
        let hash = record.to_dirty_hash(false);
        assert_eq!(hash.keys().collect::<Vec<_>>(), vec!["title", "stock"]);
    }

    #[test]
    fn equality_ignores_read_only() {
        let mut a = record();
        let mut b = record();
        a.load(&attributes(json!({"Title": "Bolt", "Code": "X9"})));
        b.load(&attributes(json!({"Title": "Bolt", "Code": "Y1"})));
        assert!(a.same_attributes(&b));
        assert!(b.same_attributes(&a));

        b.write("title=", &json!("Nut"));
        assert!(!a.same_attributes(&b));
    }

    #[test]
    fn equality_across_schema_versions_is_symmetric() {
        let mut short_schema = EntitySchema::new("RecordTestEntity");
        short_schema.declare(PropertySpec::of::<Title>());
        let mut short = EntityRecord::allocate(
            TypeId::of::<RecordTestEntity>(),
            EntityKind::Entity,
            Arc::new(short_schema),
        );
        short.load(&attributes(json!({"Title": "Bolt"})));

        let mut full = record();
        full.load(&attributes(json!({"Title": "Bolt", "Stock": 3})));
        assert!(!short.same_attributes(&full));
        assert!(!full.same_attributes(&short));

        full.write("stock=", &json!(0));
        assert!(short.same_attributes(&full));
        assert!(full.same_attributes(&short));
    }

    #[test]
    fn in_place_edits_are_changes() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Stock": 4})));

        record.value_mut::<Stock>().0 += 1;
        assert_eq!(record.value_of::<Stock>(), &Stock(5));
        assert_eq!(record.to_dirty_hash(false), attributes(json!({"stock": 5})));

        if let Some(title) = record.read_mut("title").and_then(|value| value.downcast_mut::<Title>()) {
            title.0 = Some("Nut".to_string());
        }
        assert_eq!(
            record.to_dirty_hash(false),
            attributes(json!({"title": "Nut", "stock": 5}))
        );
        assert!(record.read_mut("missing").is_none());
    }

    #[test]
    fn in_place_edit_of_an_unset_slot_starts_from_null() {
        let mut record = record();
        record.value_mut::<Stock>().0 = 2;
        assert_eq!(record.to_dirty_hash(false), attributes(json!({"stock": 2})));
    }

    #[test]
    fn duplicate_copies_slots_and_snapshot() {
        let mut record = record();
        record.load(&attributes(json!({"Title": "Bolt", "Stock": 2})));
        record.write("stock=", &json!(3));

        let copy = record.try_duplicate().unwrap();
        assert!(copy.same_attributes(&record));
        assert!(copy.is_dirty());
        assert_eq!(copy.original_values().len(), 2);

        record.write("cursor=", &json!(1));
        assert!(matches!(
            record.try_duplicate(),
            Err(EntityError::NotDuplicable("Cursor"))
        ));
    }

    #[test]
    fn debug_lists_slots() {
        let mut record = record();
        record.write("title=", &json!("Bolt"));
        let rendered = format!("{record:?}");
        assert!(rendered.starts_with("RecordTestEntity {"));
        assert!(rendered.contains("Title: Title(Some(\"Bolt\"))"));
        assert!(rendered.contains("Code: <unset>"));
    }
}
