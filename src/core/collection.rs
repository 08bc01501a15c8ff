//! Sample collections.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::xml::{reader, writer, ReadOptions, WriteOptions};
use super::key::PropertyKey;
use super::properties::PropertyBag;
use super::sample::Sample;

/// A collection of samples keyed by name, plus collection-level properties.
///
/// Samples are owned by the collection; adding a sample under an existing
/// name replaces the previous one (last write wins).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collection {
    properties: PropertyBag,
    samples: IndexMap<String, Sample>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from an iterator of samples.
    ///
    /// Duplicate names collapse to the last sample given.
    pub fn from_samples<I: IntoIterator<Item = Sample>>(samples: I) -> Self {
        let mut coll = Self::new();
        for sample in samples {
            coll.add_sample(sample);
        }
        coll
    }

    /// Add a sample, replacing any prior sample with the same name.
    ///
    /// Returns the displaced sample, if there was one.
    pub fn add_sample(&mut self, sample: Sample) -> Option<Sample> {
        self.samples.insert(sample.name().to_string(), sample)
    }

    /// Remove a sample by its name, handing ownership back.
    pub fn remove_sample_by_name(&mut self, name: &str) -> Result<Sample> {
        self.samples
            .shift_remove(name)
            .ok_or_else(|| Error::SampleNotFound(name.to_string()))
    }

    /// Remove the collection's entry for this sample's name.
    pub fn remove_sample(&mut self, sample: &Sample) -> Result<Sample> {
        self.remove_sample_by_name(sample.name())
    }

    /// The name-keyed sample table.
    pub fn samples(&self) -> &IndexMap<String, Sample> {
        &self.samples
    }

    /// Look up a sample by name.
    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.get(name)
    }

    /// Look up a sample by name, mutably.
    pub fn sample_mut(&mut self, name: &str) -> Option<&mut Sample> {
        self.samples.get_mut(name)
    }

    /// Check whether a sample with this name exists.
    pub fn contains_sample(&self, name: &str) -> bool {
        self.samples.contains_key(name)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the collection holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over samples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.values()
    }

    /// Collection-level properties.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Mutable access to collection-level properties.
    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Merge properties into the collection (overwrite-or-insert).
    pub fn update_properties<I, K, V>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PropertyKey>,
        V: ToString,
    {
        self.properties.update(properties);
    }

    // ========================================================================
    // XML round-trip
    // ========================================================================

    /// Write the collection to an XML file with default (indented) output.
    pub fn write_to_xml(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to_xml_with(path, &WriteOptions::default())
    }

    /// Write the collection to an XML file.
    ///
    /// The document is serialized in memory first; if any property key
    /// exceeds the wire format's tag ceiling the call fails with
    /// [`Error::TagOverflow`] and no file is created.
    pub fn write_to_xml_with(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        writer::write_file(self, path.as_ref(), options)
    }

    /// Serialize the collection to an XML string.
    pub fn to_xml_string(&self, options: &WriteOptions) -> Result<String> {
        writer::to_string(self, options)
    }

    /// Serialize the collection into an arbitrary sink.
    pub fn write_xml_to(&self, sink: impl std::io::Write, options: &WriteOptions) -> Result<()> {
        writer::write_to(self, sink, options)
    }

    /// Merge samples and properties from an XML file into this collection.
    ///
    /// Every sample in the document is imported; re-imported names replace
    /// existing samples. Collection-level properties merge overwrite-or-insert.
    pub fn update_from_xml(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.update_from_xml_with(path, "", &ReadOptions::default())
    }

    /// Merge from an XML file, importing only samples matched by `filter`.
    ///
    /// `filter` is a predicate fragment appended to the `//sample` query,
    /// e.g. `[name='obs1']`; the empty string matches every sample.
    pub fn update_from_xml_filtered(
        &mut self,
        path: impl AsRef<Path>,
        filter: &str,
    ) -> Result<()> {
        self.update_from_xml_with(path, filter, &ReadOptions::default())
    }

    /// Merge from an XML file with explicit read configuration.
    pub fn update_from_xml_with(
        &mut self,
        path: impl AsRef<Path>,
        filter: &str,
        options: &ReadOptions,
    ) -> Result<()> {
        reader::read_file(self, path.as_ref(), filter, options)
    }

    /// Merge from an in-memory XML document.
    ///
    /// XInclude targets, if enabled, resolve relative to the current
    /// working directory.
    pub fn update_from_xml_str(
        &mut self,
        xml: &str,
        filter: &str,
        options: &ReadOptions,
    ) -> Result<()> {
        reader::read_str(self, xml, filter, options)
    }
}

impl FromIterator<Sample> for Collection {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::from_samples(iter)
    }
}

impl Extend<Sample> for Collection {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, iter: T) {
        for sample in iter {
            self.add_sample(sample);
        }
    }
}
