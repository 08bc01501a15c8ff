//! Encoding: serialize a collection to its XML document form.
//!
//! The document is always built and serialized in memory first, so a
//! failure (a property key past the wire format's tag ceiling) surfaces
//! before any output target is touched.

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::core::{Collection, PropertyBag, MAX_SEGMENTS};
use crate::error::{Error, Result};
use super::tree::XmlElement;
use super::{ATTR_NAME, ELEM_COLLECTION, ELEM_NAME, ELEM_PROPERTIES, ELEM_PROPERTY, ELEM_SAMPLE, ELEM_SAMPLES};

/// Configuration for an encode call.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Per-level indent width; `None` produces compact output.
    pub indent: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: Some(2) }
    }
}

impl WriteOptions {
    /// Compact, single-line output.
    pub fn compact() -> Self {
        Self { indent: None }
    }

    /// Indented output with the given per-level width.
    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
        }
    }
}

/// Serialize `coll` and write it to a file.
///
/// Nothing is written if serialization fails.
pub fn write_file(coll: &Collection, path: &Path, options: &WriteOptions) -> Result<()> {
    let bytes = encode(coll, options)?;
    fs::write(path, bytes)?;
    debug!(path = %path.display(), samples = coll.len(), "collection written");
    Ok(())
}

/// Serialize `coll` into an arbitrary sink.
pub fn write_to<W: Write>(coll: &Collection, mut sink: W, options: &WriteOptions) -> Result<()> {
    let bytes = encode(coll, options)?;
    sink.write_all(&bytes)?;
    Ok(())
}

/// Serialize `coll` to a string.
pub fn to_string(coll: &Collection, options: &WriteOptions) -> Result<String> {
    let bytes = encode(coll, options)?;
    String::from_utf8(bytes).map_err(|err| Error::Utf8(err.utf8_error()))
}

/// Serialize `coll` to document bytes.
pub fn encode(coll: &Collection, options: &WriteOptions) -> Result<Vec<u8>> {
    let root = build_document(coll)?;
    root.to_bytes(options.indent)
}

fn build_document(coll: &Collection) -> Result<XmlElement> {
    let mut root = XmlElement::new(ELEM_COLLECTION);

    if let Some(props) = build_properties(coll.properties())? {
        root.push_element(props);
    }

    let mut samples = XmlElement::new(ELEM_SAMPLES);
    for sample in coll.iter() {
        let mut el = XmlElement::new(ELEM_SAMPLE);

        let mut name = XmlElement::new(ELEM_NAME);
        name.push_text(sample.name());
        el.push_element(name);

        if let Some(props) = build_properties(sample.properties())? {
            el.push_element(props);
        }
        samples.push_element(el);
    }
    root.push_element(samples);

    Ok(root)
}

/// Encode a bag as a `<properties>` element, or `None` when it is empty.
fn build_properties(bag: &PropertyBag) -> Result<Option<XmlElement>> {
    if bag.is_empty() {
        return Ok(None);
    }

    let mut props = XmlElement::new(ELEM_PROPERTIES);
    for (key, value) in bag.iter() {
        let segments = key.segments();
        match segments.len() {
            0 => return Err(Error::EmptyKey),
            n if n > MAX_SEGMENTS => {
                return Err(Error::TagOverflow {
                    name: segments[0].clone(),
                    count: n,
                })
            }
            _ => {}
        }

        let mut prop = XmlElement::new(ELEM_PROPERTY);
        prop.set_attribute(ATTR_NAME, &segments[0]);
        for (i, tag) in segments[1..].iter().enumerate() {
            prop.set_attribute(format!("tag{}", i + 1), tag);
        }
        if !value.is_empty() {
            prop.push_text(value);
        }
        props.push_element(prop);
    }
    Ok(Some(props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PropertyKey, Sample};

    #[test]
    fn test_empty_collection_compact_shape() {
        let coll = Collection::new();
        let xml = to_string(&coll, &WriteOptions::compact()).expect("should encode");
        assert_eq!(xml, "<collection><samples/></collection>");
    }

    #[test]
    fn test_properties_element_omitted_when_empty() {
        let mut coll = Collection::new();
        coll.add_sample(Sample::new("bare"));
        let xml = to_string(&coll, &WriteOptions::compact()).expect("should encode");
        assert_eq!(
            xml,
            "<collection><samples><sample><name>bare</name></sample></samples></collection>"
        );
    }

    #[test]
    fn test_tagged_key_attributes() {
        let mut coll = Collection::new();
        let mut sample = Sample::new("obs1");
        sample.properties_mut().set(["abundance", "fe", "56"], "1.2e-3");
        coll.add_sample(sample);

        let xml = to_string(&coll, &WriteOptions::compact()).expect("should encode");
        assert!(xml.contains(r#"<property name="abundance" tag1="fe" tag2="56">1.2e-3</property>"#));
    }

    #[test]
    fn test_tag_overflow_rejected() {
        let mut coll = Collection::new();
        coll.properties_mut()
            .set(PropertyKey::tagged(["a", "b", "c", "d", "e", "f"]), "v");

        let err = encode(&coll, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::TagOverflow { count: 6, .. }));
    }

    #[test]
    fn test_indented_output() {
        let mut coll = Collection::new();
        coll.add_sample(Sample::new("obs1"));
        let xml = to_string(&coll, &WriteOptions::indented(2)).expect("should encode");
        assert!(xml.contains("\n  <samples>"));
        assert!(xml.contains("<name>obs1</name>"));
    }
}
