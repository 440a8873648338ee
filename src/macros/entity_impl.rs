//! Macros to correctly define entity types and implement the `Entity` trait.

/// Defines a top-level entity type with the given ordered list of properties.
///
/// # Forms
///
/// ```rust,ignore
/// define_entity!(pub struct Widget {
///     Name,                                  // conventions derived from the value type's name
///     Sku { name: "SKU" },                   // explicit options override conventions
///     InternalId { writable: false },        // read-only property
/// });
/// ```
///
/// Every listed identifier is a value type (see [`define_value_type!`](crate::define_value_type)).
/// The option keys are the fields of [`PropertyOptions`](crate::property::PropertyOptions):
/// `writable`, `name`, `camelized_name`, `storage_key`, `writer_name` and `reader_name`.
/// A value type can appear only once in the list, since the accessors are named after it.
///
/// The macro generates:
/// - the struct, wrapping an [`EntityRecord`](crate::entity::EntityRecord),
/// - `impl Entity` and `impl EntityBehavior`,
/// - a typed reader `fn sku(&self) -> &Sku`, in-place editor `fn sku_mut(&mut self) -> &mut Sku`
///   and writer `fn set_sku(&mut self, raw)` per property,
/// - `PartialEq` (read-write attribute equality), `Debug`, `Default` (via `Entity::new`),
///   `serde::Serialize` (via `to_hash(true)`) and `PropertyValue`, so the entity can itself be
///   the value of another entity's property,
/// - a `ctor` that adds the type to the [entity catalog](crate::entity::catalog).
#[macro_export]
macro_rules! define_entity {
    ($(#[$attr:meta])* $vis:vis struct $name:ident { $($props:tt)* }) => {
        $crate::__define_entity!(
            [$(#[$attr])*] $vis $name,
            $crate::entity::EntityKind::Entity,
            $($props)*
        );
    };
}

/// Defines an entity type nested inside another entity's properties. Identical to
/// [`define_entity!`](crate::define_entity) except for the kind tag.
#[macro_export]
macro_rules! define_embedded_entity {
    ($(#[$attr:meta])* $vis:vis struct $name:ident { $($props:tt)* }) => {
        $crate::__define_entity!(
            [$(#[$attr])*] $vis $name,
            $crate::entity::EntityKind::EmbeddedEntity,
            $($props)*
        );
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __define_entity {
    (
        [$($attr:tt)*] $vis:vis $name:ident,
        $kind:expr,
        $( $value:ident $({ $($opt:ident : $optval:expr),* $(,)? })? ),* $(,)?
    ) => {
        $($attr)*
        $vis struct $name {
            record: $crate::entity::EntityRecord,
        }

        $crate::paste::paste! {
            impl $name {
                $(
                    #[allow(unused)]
                    pub fn [<$value:snake>](&self) -> &$value {
                        self.record.value_of::<$value>()
                    }

                    #[allow(unused)]
                    pub fn [<$value:snake _mut>](&mut self) -> &mut $value {
                        self.record.value_mut::<$value>()
                    }

                    #[allow(unused)]
                    pub fn [<set_ $value:snake>](&mut self, raw: impl Into<$crate::value::Raw>) {
                        self.record.assign::<$value>(&raw.into());
                    }
                )*
            }
        }

        impl $crate::entity::EntityBehavior for $name {
            fn record(&self) -> &$crate::entity::EntityRecord {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::entity::EntityRecord {
                &mut self.record
            }
        }

        impl $crate::entity::Entity for $name {
            const KIND: $crate::entity::EntityKind = $kind;

            fn entity_name() -> &'static str {
                stringify!($name)
            }

            fn declared_properties() -> Vec<$crate::property::PropertySpec> {
                vec![
                    $(
                        $crate::property::PropertySpec::new(
                            $crate::value::ValueType::of::<$value>(),
                            $crate::property::PropertyOptions {
                                $($( $opt: Some($optval.into()), )*)?
                                ..Default::default()
                            },
                        ),
                    )*
                ]
            }

            fn from_record(record: $crate::entity::EntityRecord) -> Self {
                $name { record }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::entity::EntityBehavior::same_attributes(self, other)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.record, f)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <$name as $crate::entity::Entity>::new()
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                let hash = $crate::entity::EntityBehavior::to_hash(self, true);
                $crate::serde::Serialize::serialize(&hash, serializer)
            }
        }

        impl $crate::value::PropertyValue for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn from_raw(raw: &$crate::value::Raw) -> Self {
                <$name as $crate::entity::Entity>::construct_from_raw(raw)
            }

            fn load_raw(raw: &$crate::value::Raw) -> Self {
                <$name as $crate::entity::Entity>::from_raw_attributes(raw)
            }

            fn to_raw(&self) -> $crate::value::Raw {
                $crate::value::Raw::Object($crate::entity::EntityBehavior::to_hash(self, true))
            }

            fn duplicate(&self) -> Result<Self, $crate::error::EntityError> {
                Ok($name {
                    record: self.record.try_duplicate()?,
                })
            }

            fn as_entity(&self) -> Option<&dyn $crate::entity::EntityBehavior> {
                Some(self)
            }
        }

        // Registration touches only the catalog. The schema is installed on first use, after
        // `main` has had a chance to load property configuration.
        $crate::paste::paste! {
            $crate::ctor::declarative::ctor!{
                #[ctor]
                fn [<_register_entity_ $name:snake>]() {
                    $crate::entity::catalog::add_to_entity_catalog::<$name>();
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #![allow(dead_code)]

    use crate::prelude::*;
    use serde_json::json;

    define_value_type!(struct Headline(Option<String>));
    define_value_type!(struct PageCount(u32));
    define_value_type!(struct Isbn(Option<String>));

    define_entity!(
        /// A test entity.
        struct Book {
            Headline { name: "Title", camelized_name: "title" },
            PageCount,
            Isbn { writable: false, storage_key: "isbn_13" },
        }
    );

    define_embedded_entity!(pub(crate) struct Binding { PageCount });

    define_entity!(struct Pamphlet {});

    #[test]
    fn declared_properties_follow_macro_order() {
        let names: Vec<String> = Book::properties()
            .iter()
            .map(|descriptor| descriptor.name().to_string())
            .collect();
        assert_eq!(names, vec!["Title", "PageCount", "Isbn"]);
        assert_eq!(Book::read_only_names(), vec!["Isbn"]);
        assert_eq!(Book::read_write_names(), vec!["Title", "PageCount"]);
        assert_eq!(Book::KIND, EntityKind::Entity);
        assert_eq!(Binding::KIND, EntityKind::EmbeddedEntity);
    }

    #[test]
    fn options_reach_descriptors() {
        let headline = Book::property("Title").unwrap();
        assert_eq!(headline.camelized_name(), "title");
        assert_eq!(headline.storage_key(), "headline");

        let isbn = Book::property("isbn_13").unwrap();
        assert!(isbn.is_read_only());
        assert_eq!(isbn.reader_name(), "isbn_13");
        assert_eq!(isbn.writer_name(), "isbn_13=");
    }

    #[test]
    fn generated_accessors() {
        let mut book = Book::new();
        assert_eq!(book.headline(), &Headline(None));
        book.set_headline("Dune");
        book.set_page_count(412);
        assert_eq!(book.headline(), &Headline(Some("Dune".to_string())));
        assert_eq!(book.page_count(), &PageCount(412));
        assert!(book.is_new_record());
    }

    #[test]
    fn generated_editor_changes_the_value() {
        let mut book = Book::instantiate(json!({"PageCount": 10}).as_object().unwrap());
        book.page_count_mut().0 += 2;
        assert_eq!(book.page_count(), &PageCount(12));
        assert_eq!(
            book.to_dirty_hash(false),
            *json!({"page_count": 12}).as_object().unwrap()
        );
    }

    #[test]
    fn generated_traits() {
        let mut book = Book::default();
        book.set_headline("Dune");
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"Title": "Dune", "PageCount": 0, "Isbn": null})
        );
        assert!(format!("{book:?}").starts_with("Book {"));

        let copy = book.duplicate().unwrap();
        assert_eq!(copy, book);
        assert!(copy.as_entity().is_some());
    }

    #[test]
    fn entity_without_properties() {
        let pamphlet = Pamphlet::new();
        assert!(Pamphlet::properties().is_empty());
        assert!(pamphlet.to_hash(true).is_empty());
        assert_eq!(pamphlet, Pamphlet::allocate());
    }
}
