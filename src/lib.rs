//! Declared, dirty-tracked properties for entities that mirror resources in an upstream system.
//!
//! An entity type declares an ordered list of properties instead of struct fields. Each property
//! wraps a value type and gets a family of names derived from it by convention: a display name, a
//! camelized name, a storage key, and reader and writer names. Instances keep the values they were
//! loaded with, so a client can send back only what changed:
//!
//! ```rust
//! use propmodel::prelude::*;
//! use serde_json::json;
//!
//! define_value_type!(pub struct Name(Option<String>));
//! define_value_type!(pub struct Sku(Option<String>));
//! define_value_type!(pub struct InternalId(Option<String>));
//!
//! define_entity!(pub struct Widget {
//!     Name,
//!     Sku { name: "SKU" },
//!     InternalId { writable: false },
//! });
//!
//! let attributes = json!({"Name": "Bolt", "SKU": "A-1", "InternalId": "w-17"});
//! let mut widget = Widget::instantiate(attributes.as_object().unwrap());
//! assert!(!widget.is_dirty());
//!
//! widget.set_sku("B-2");
//! assert!(widget.is_dirty());
//! assert_eq!(widget.to_dirty_hash(false), *json!({"sku": "B-2"}).as_object().unwrap());
//! assert_eq!(Widget::read_only_names(), vec!["InternalId"]);
//! ```
//!
//! The main pieces are:
//! * [`value`]: the contract a value type fulfills and its type-erased form.
//! * [`property`]: property descriptors and the process-wide registry of property options.
//! * [`entity`]: the `Entity` and `EntityBehavior` traits, per-type schemas, per-instance records
//!   and the catalog of entity types.
//! * [`config`]: loading property options from a JSON file.
//! * [`log`]: control over the crate's internal logging.
pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod macros;
pub mod prelude;
pub mod property;
pub mod value;

// Re-exports used by the macros.
pub use ctor;
pub use indexmap;
pub use paste;
pub use serde;
pub use serde_json;

pub use entity::{Entity, EntityBehavior, EntityKind};
pub use error::EntityError;
pub use value::{Attributes, PropertyValue, Raw};

/// The hash map used throughout the crate's registries.
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
