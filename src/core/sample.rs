//! Named data samples.

use super::key::PropertyKey;
use super::properties::PropertyBag;

/// A named bag of properties, the unit stored in a collection.
///
/// The name is fixed at construction; the properties may be mutated freely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sample {
    name: String,
    properties: PropertyBag,
}

impl Sample {
    /// Create a sample with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertyBag::new(),
        }
    }

    /// Create a sample with an initial set of properties.
    pub fn with_properties<I, K, V>(name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PropertyKey>,
        V: ToString,
    {
        let mut sample = Self::new(name);
        sample.properties.update(properties);
        sample
    }

    /// The sample's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sample's properties.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Mutable access to the sample's properties.
    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Merge properties into the sample (overwrite-or-insert).
    pub fn update_properties<I, K, V>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PropertyKey>,
        V: ToString,
    {
        self.properties.update(properties);
    }
}
