pub use crate::entity::{Comparand, Entity, EntityBehavior, EntityKind, OriginalValue};
pub use crate::error::EntityError;
pub use crate::property::{PropertyDescriptor, PropertyOptions, PropertySpec};
pub use crate::value::{AnyValue, Attributes, PropertyValue, Raw, ValueType};
pub use crate::{define_embedded_entity, define_entity, define_value_type, impl_value_type};
