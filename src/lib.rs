//! # xmlcoll
//!
//! Collections of named data samples with tagged properties, round-tripped
//! through an attribute-based XML format.
//!
//! A [`Collection`] holds collection-level properties and a name-keyed set
//! of [`Sample`]s, each carrying its own [`PropertyBag`]. Property keys are
//! either plain names or ordered runs of up to five string segments
//! ([`PropertyKey`]); values are strings. The whole model writes to and
//! merges back from XML losslessly, with XInclude resolution and filtered
//! sample selection on the way in.
//!
//! ## Modules
//!
//! - [`error`] - Error and result types
//! - [`core`] - Property keys, bags, samples, collections
//! - [`xml`] - The XML wire format (element tree, reader, writer)
//!
//! ## Example
//!
//! ```ignore
//! use xmlcoll::{Collection, Sample};
//!
//! let mut coll = Collection::new();
//! coll.update_properties([("origin", "survey-7")]);
//!
//! let mut obs = Sample::new("obs1");
//! obs.update_properties([(["abundance", "fe", "56"], 1.2e-3)]);
//! coll.add_sample(obs);
//!
//! coll.write_to_xml("collection.xml")?;
//!
//! let mut copy = Collection::new();
//! copy.update_from_xml("collection.xml")?;
//! assert_eq!(coll, copy);
//! ```

pub mod error;
pub mod core;
pub mod xml;

// Re-export commonly used types
pub use crate::error::{Error, Result};
pub use crate::core::{Collection, PropertyBag, PropertyKey, Sample, MAX_SEGMENTS};
pub use crate::xml::{ReadOptions, WriteOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::core::{Collection, PropertyBag, PropertyKey, Sample};
    pub use crate::xml::{ReadOptions, WriteOptions};
}
