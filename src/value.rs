/*!

A value type is the wrapper a property's raw input is coerced into. Each declared property names
exactly one value type (its "klass"), and every storage slot of an entity holds an instance of
it, never a bare primitive. The core needs only three things from a value type:

1. construction from a raw input (which must accept `null`),
2. equality, and
3. a duplication operation used to snapshot values when an entity is loaded.

[`PropertyValue`] is the statically typed contract. [`AnyValue`] is its type-erased, object-safe
counterpart that storage slots and snapshots actually hold. [`ValueType`] is the opaque handle a
[`PropertyDescriptor`](crate::property::PropertyDescriptor) carries around in place of a type
parameter.

Value types are usually declared with [`define_value_type!`](crate::define_value_type) or
[`impl_value_type!`](crate::impl_value_type), which route raw coercion through `serde`.

*/

use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entity::EntityBehavior;
use crate::error::EntityError;

/// A raw, untyped attribute value as it arrives from (or leaves for) an upstream resource.
pub type Raw = serde_json::Value;

/// An ordered mapping of string keys to raw values. Insertion order is preserved, which makes
/// this the shape of both raw attribute input and serialized output.
pub type Attributes = serde_json::Map<String, Raw>;

/// All value types wrapped by properties implement this trait.
pub trait PropertyValue: Any + Debug + PartialEq + Sized {
    /// The name all naming conventions of a property are computed from.
    fn type_name() -> &'static str;

    /// Constructs a value from raw input. Never fails; `Raw::Null` must produce the "unset" value.
    fn from_raw(raw: &Raw) -> Self;

    /// Constructs a value while the entity holding it is being loaded. Entity-valued properties
    /// load their own attributes here so that they snapshot them too.
    fn load_raw(raw: &Raw) -> Self {
        Self::from_raw(raw)
    }

    /// Renders the value as a terminal raw value for serialized output.
    fn to_raw(&self) -> Raw;

    /// Produces an independent copy used as a dirty-tracking baseline.
    fn duplicate(&self) -> Result<Self, EntityError>;

    /// Entity-valued properties return themselves here so serialization can recurse into them.
    fn as_entity(&self) -> Option<&dyn EntityBehavior> {
        None
    }
}

/// The type-erased interface to a value held in a storage slot or snapshot.
pub trait AnyValue: Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn value_type_name(&self) -> &'static str;

    /// Equality under the value type's own `PartialEq`. Values of different types are never equal.
    fn dyn_eq(&self, other: &dyn AnyValue) -> bool;

    fn dyn_duplicate(&self) -> Result<Box<dyn AnyValue>, EntityError>;

    fn dyn_to_raw(&self) -> Raw;

    fn dyn_as_entity(&self) -> Option<&dyn EntityBehavior>;
}

impl<V: PropertyValue> AnyValue for V {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn value_type_name(&self) -> &'static str {
        V::type_name()
    }

    fn dyn_eq(&self, other: &dyn AnyValue) -> bool {
        other
            .as_any()
            .downcast_ref::<V>()
            .is_some_and(|other| self == other)
    }

    fn dyn_duplicate(&self) -> Result<Box<dyn AnyValue>, EntityError> {
        let duplicate = self.duplicate()?;
        Ok(Box::new(duplicate))
    }

    fn dyn_to_raw(&self) -> Raw {
        self.to_raw()
    }

    fn dyn_as_entity(&self) -> Option<&dyn EntityBehavior> {
        self.as_entity()
    }
}

impl dyn AnyValue + '_ {
    /// Standard pattern for downcasting to concrete types.
    #[must_use]
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.as_any().downcast_ref::<V>()
    }

    #[must_use]
    pub fn downcast_mut<V: Any>(&mut self) -> Option<&mut V> {
        self.as_any_mut().downcast_mut::<V>()
    }
}

impl PartialEq for dyn AnyValue + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

/// The opaque handle to a value type. This is what a property "wraps": the core only ever
/// constructs values through it and reads its name.
#[derive(Clone, Copy)]
pub struct ValueType {
    name: &'static str,
    type_id: TypeId,
    constructor: fn(&Raw) -> Box<dyn AnyValue>,
    loader: fn(&Raw) -> Box<dyn AnyValue>,
}

fn construct_boxed<V: PropertyValue>(raw: &Raw) -> Box<dyn AnyValue> {
    Box::new(V::from_raw(raw))
}

fn load_boxed<V: PropertyValue>(raw: &Raw) -> Box<dyn AnyValue> {
    Box::new(V::load_raw(raw))
}

impl ValueType {
    #[must_use]
    pub fn of<V: PropertyValue>() -> Self {
        ValueType {
            name: V::type_name(),
            type_id: TypeId::of::<V>(),
            constructor: construct_boxed::<V>,
            loader: load_boxed::<V>,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn construct(&self, raw: &Raw) -> Box<dyn AnyValue> {
        (self.constructor)(raw)
    }

    /// Constructs a value the way an entity being loaded does.
    #[must_use]
    pub fn load(&self, raw: &Raw) -> Box<dyn AnyValue> {
        (self.loader)(raw)
    }

    /// The value an unset slot reads as.
    #[must_use]
    pub fn construct_null(&self) -> Box<dyn AnyValue> {
        self.construct(&Raw::Null)
    }

    /// Whether `value` is indistinguishable from the value constructed from a `null` input.
    #[must_use]
    pub fn is_null_equivalent(&self, value: &dyn AnyValue) -> bool {
        self.construct_null().dyn_eq(value)
    }
}

impl Debug for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueType").field(&self.name).finish()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}
impl Eq for ValueType {}

/// Coerces a raw value into `T` through `serde`. Input that does not fit falls back to
/// `T::default()`; rejecting bad input is the business of the value type, not of this core.
pub fn coerce_raw<T: DeserializeOwned + Default>(type_name: &str, raw: &Raw) -> T {
    match serde_json::from_value(raw.clone()) {
        Ok(value) => value,
        Err(error) => {
            if !raw.is_null() {
                warn!("{type_name}: cannot coerce {raw} ({error}); using the default value");
            }
            T::default()
        }
    }
}

/// Renders `value` as a raw value through `serde`, yielding `null` if it cannot be represented.
pub fn render_raw<T: Serialize>(type_name: &str, value: &T) -> Raw {
    serde_json::to_value(value).unwrap_or_else(|error| {
        warn!("{type_name}: cannot render value ({error}); using null");
        Raw::Null
    })
}
