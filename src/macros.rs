//! The declarative macros client code uses to define value types and entity types. All of them
//! are exported at the crate root and from the [`prelude`](crate::prelude).

mod entity_impl;
mod value_impl;
