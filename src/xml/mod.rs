//! XML wire format: the attribute-based encoding of collections.
//!
//! Document shape:
//!
//! ```text
//! <collection>
//!   <properties>...</properties>        only when non-empty
//!   <samples>
//!     <sample>
//!       <name>...</name>
//!       <properties>...</properties>    only when non-empty
//!     </sample>
//!   </samples>
//! </collection>
//! ```
//!
//! Each `<property>` element carries its key in attributes: `name` for the
//! canonical name plus `tag1`..`tag4` for qualifying tags, and its value as
//! element text. Five segments total is a hard ceiling of the format.

pub mod tree;

mod xinclude;
mod select;
pub(crate) mod reader;
pub(crate) mod writer;

pub use reader::ReadOptions;
pub use writer::WriteOptions;
pub use xinclude::XINCLUDE_NS;

pub(crate) const ELEM_COLLECTION: &str = "collection";
pub(crate) const ELEM_PROPERTIES: &str = "properties";
pub(crate) const ELEM_PROPERTY: &str = "property";
pub(crate) const ELEM_SAMPLES: &str = "samples";
pub(crate) const ELEM_SAMPLE: &str = "sample";
pub(crate) const ELEM_NAME: &str = "name";
pub(crate) const ATTR_NAME: &str = "name";
