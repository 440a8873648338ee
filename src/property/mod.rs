/*!

Property metadata: the immutable [`PropertyDescriptor`] for a declared property, the
[`PropertyOptions`] that customize it, and the process-wide [`registry`] of options.

*/

pub mod descriptor;
pub mod registry;

pub use descriptor::{PropertyDescriptor, PropertyOptions, PropertySpec, WRITER_SUFFIX};
pub use registry::{get_property_options, set_property_options, PropertyRegistry};
