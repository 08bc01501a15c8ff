//! Decoding: merge samples and properties from a document into a collection.
//!
//! Property keys are rebuilt from explicitly named attributes (`name`,
//! then `tag1`..`tag4` contiguously); attribute iteration order is never
//! consulted. Anything outside that scheme on a `<property>` element is a
//! decode error, since dropping it could silently truncate a key.

use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::core::{Collection, PropertyKey, Sample, MAX_SEGMENTS};
use crate::error::{Error, Result};
use super::tree::{self, XmlElement};
use super::{select, xinclude};
use super::{ATTR_NAME, ELEM_NAME, ELEM_PROPERTIES, ELEM_PROPERTY, ELEM_SAMPLE};

/// Configuration for a decode call.
#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// Resolve XInclude directives before extraction.
    pub xinclude: bool,
    /// How deep included documents may include further documents.
    pub max_include_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            xinclude: true,
            max_include_depth: 16,
        }
    }
}

/// Merge a file's samples and properties into `coll`.
pub fn read_file(
    coll: &mut Collection,
    path: &Path,
    filter: &str,
    options: &ReadOptions,
) -> Result<()> {
    let xml = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let root = parse_document(&xml, base, options)?;
    update_collection(coll, &root, filter)
}

/// Merge an in-memory document into `coll`.
///
/// Relative include targets resolve against the current working directory.
pub fn read_str(
    coll: &mut Collection,
    xml: &str,
    filter: &str,
    options: &ReadOptions,
) -> Result<()> {
    let root = parse_document(xml, Path::new("."), options)?;
    update_collection(coll, &root, filter)
}

/// Parse a document and resolve includes, per `options`.
fn parse_document(xml: &str, base: &Path, options: &ReadOptions) -> Result<XmlElement> {
    let mut root = tree::parse(xml)?;
    if options.xinclude {
        xinclude::resolve(&mut root, base, options.max_include_depth)?;
    }
    Ok(root)
}

/// Apply a parsed document to the collection.
///
/// Root-level properties merge overwrite-or-insert; each matched sample is
/// imported whole and replaces any existing sample of the same name.
fn update_collection(coll: &mut Collection, root: &XmlElement, filter: &str) -> Result<()> {
    if let Some(props) = root.first_child(ELEM_PROPERTIES) {
        coll.properties_mut().update(read_properties(props)?);
    }

    let matched = select::select_elements(root, ELEM_SAMPLE, filter)?;
    let count = matched.len();

    for el in matched {
        let sample = read_sample(el)?;
        trace!(name = sample.name(), "imported sample");
        coll.add_sample(sample);
    }

    debug!(samples = count, "collection updated from document");
    Ok(())
}

fn read_sample(el: &XmlElement) -> Result<Sample> {
    let name = el
        .first_child(ELEM_NAME)
        .map(XmlElement::text)
        .ok_or(Error::MissingSampleName)?;
    if name.trim().is_empty() {
        return Err(Error::MissingSampleName);
    }

    let mut sample = Sample::new(name);
    if let Some(props) = el.first_child(ELEM_PROPERTIES) {
        sample.properties_mut().update(read_properties(props)?);
    }
    Ok(sample)
}

fn read_properties(parent: &XmlElement) -> Result<Vec<(PropertyKey, String)>> {
    let mut out = Vec::new();
    for prop in parent.get_children(ELEM_PROPERTY) {
        out.push((read_key(prop)?, prop.text()));
    }
    Ok(out)
}

fn read_key(prop: &XmlElement) -> Result<PropertyKey> {
    let mut name: Option<&str> = None;
    let mut tags: [Option<&str>; MAX_SEGMENTS - 1] = [None; MAX_SEGMENTS - 1];

    for (key, value) in &prop.attributes {
        if key == ATTR_NAME {
            name = Some(value.as_str());
            continue;
        }
        let index = key
            .strip_prefix("tag")
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|n| (1..MAX_SEGMENTS).contains(n))
            .ok_or_else(|| Error::malformed(format!("unrecognized property attribute: {key}")))?;
        tags[index - 1] = Some(value.as_str());
    }

    let name = name.ok_or(Error::KeylessProperty)?;
    let mut segments = vec![name.to_string()];
    let mut gap = false;
    for tag in tags {
        match tag {
            Some(_) if gap => {
                return Err(Error::malformed(format!(
                    "non-contiguous tag numbering on property '{name}'"
                )))
            }
            Some(value) => segments.push(value.to_string()),
            None => gap = true,
        }
    }

    Ok(PropertyKey::tagged(segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str, filter: &str) -> Result<Collection> {
        let mut coll = Collection::new();
        read_str(&mut coll, xml, filter, &ReadOptions::default())?;
        Ok(coll)
    }

    #[test]
    fn test_read_samples_and_properties() {
        let coll = read(
            r#"<collection>
                 <properties><property name="origin">survey</property></properties>
                 <samples>
                   <sample>
                     <name>obs1</name>
                     <properties>
                       <property name="mass" tag1="solar">1.4</property>
                     </properties>
                   </sample>
                 </samples>
               </collection>"#,
            "",
        )
        .expect("should decode");

        assert_eq!(coll.properties().get("origin"), Some("survey"));
        let sample = coll.sample("obs1").expect("sample should be imported");
        assert_eq!(sample.properties().get(["mass", "solar"]), Some("1.4"));
    }

    #[test]
    fn test_read_missing_sample_name() {
        let err = read("<collection><samples><sample/></samples></collection>", "")
            .unwrap_err();
        assert!(matches!(err, Error::MissingSampleName));
    }

    #[test]
    fn test_read_keyless_property() {
        let err = read(
            r#"<collection><properties><property>v</property></properties></collection>"#,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::KeylessProperty));

        let err = read(
            r#"<collection><properties><property tag1="t">v</property></properties></collection>"#,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::KeylessProperty));
    }

    #[test]
    fn test_read_rejects_tag_gap() {
        let err = read(
            r#"<collection><properties><property name="k" tag2="b">v</property></properties></collection>"#,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_read_rejects_unknown_attribute() {
        for attr in [r#"tag5="e""#, r#"tag0="z""#, r#"other="x""#] {
            let xml = format!(
                r#"<collection><properties><property name="k" {attr}>v</property></properties></collection>"#
            );
            let err = read(&xml, "").unwrap_err();
            assert!(matches!(err, Error::Malformed(_)), "attr {attr} should be rejected");
        }
    }

    #[test]
    fn test_read_merges_into_existing() {
        let mut coll = Collection::new();
        coll.properties_mut().set("kept", "1");
        coll.add_sample(Sample::with_properties("old", [("x", "1")]));
        coll.add_sample(Sample::with_properties("obs1", [("stale", "1")]));

        read_str(
            &mut coll,
            r#"<collection>
                 <samples><sample><name>obs1</name>
                   <properties><property name="fresh">2</property></properties>
                 </sample></samples>
               </collection>"#,
            "",
            &ReadOptions::default(),
        )
        .expect("should decode");

        // Untouched state survives, re-imported sample is replaced whole.
        assert_eq!(coll.properties().get("kept"), Some("1"));
        assert!(coll.contains_sample("old"));
        let sample = coll.sample("obs1").unwrap();
        assert_eq!(sample.properties().get("fresh"), Some("2"));
        assert_eq!(sample.properties().get("stale"), None);
    }

    #[test]
    fn test_read_filtered() {
        let coll = read(
            r#"<collection><samples>
                 <sample><name>x</name></sample>
                 <sample><name>y</name></sample>
               </samples></collection>"#,
            "[name='x']",
        )
        .expect("should decode");

        assert_eq!(coll.len(), 1);
        assert!(coll.contains_sample("x"));
    }
}
