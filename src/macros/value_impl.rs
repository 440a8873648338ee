/*!

Macros for implementing value types.

# [`define_value_type!`]

For the common case, a newtype around a serde-compatible inner type:

```rust
use propmodel::prelude::*;

define_value_type!(pub struct Title(Option<String>));
define_value_type!(pub struct Quantity(u32));

let title = Title::from_raw(&serde_json::json!("Bolt"));
assert_eq!(title, Title(Some("Bolt".to_string())));
assert_eq!(Quantity::from_raw(&serde_json::Value::Null), Quantity(0));
```

The macro adds `pub` to the tuple field and derives `Debug, Clone, PartialEq, Default`, which is
everything the contract needs. Raw input that the inner type cannot deserialize falls back to
the inner type's default.

# [`impl_value_type!`]

Implements [`PropertyValue`](crate::value::PropertyValue) for an existing type that is
`Serialize + DeserializeOwned + Default + Clone + Debug + PartialEq`:

```rust
use propmodel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Bare,
    Painted,
}
impl_value_type!(Finish);

assert_eq!(Finish::from_raw(&serde_json::json!("painted")), Finish::Painted);
```

*/

/// Defines a newtype value type whose raw coercion goes through `serde`.
#[macro_export]
macro_rules! define_value_type {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty)) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name(pub $inner);

        impl $crate::value::PropertyValue for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn from_raw(raw: &$crate::value::Raw) -> Self {
                $name($crate::value::coerce_raw(stringify!($name), raw))
            }

            fn to_raw(&self) -> $crate::value::Raw {
                $crate::value::render_raw(stringify!($name), &self.0)
            }

            fn duplicate(&self) -> Result<Self, $crate::error::EntityError> {
                Ok(self.clone())
            }
        }
    };
}

/// Implements `PropertyValue` for an existing serde type.
#[macro_export]
macro_rules! impl_value_type {
    ($name:ident) => {
        impl $crate::value::PropertyValue for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn from_raw(raw: &$crate::value::Raw) -> Self {
                $crate::value::coerce_raw::<$name>(stringify!($name), raw)
            }

            fn to_raw(&self) -> $crate::value::Raw {
                $crate::value::render_raw(stringify!($name), self)
            }

            fn duplicate(&self) -> Result<Self, $crate::error::EntityError> {
                Ok(self.clone())
            }
        }
    };
}
