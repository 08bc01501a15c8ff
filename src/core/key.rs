//! Property keys.
//!
//! A property is addressed either by a plain name or by an ordered run of
//! string segments: the name first, then up to four qualifying tags. The
//! XML attribute scheme caps a key at five segments total.

use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum number of segments (name + tags) a key may carry on the wire.
pub const MAX_SEGMENTS: usize = 5;

/// A property key: a plain name, or a name plus ordered tags.
///
/// Equality and hashing are over the segment sequence, so a single-segment
/// `Tagged` key and the `Plain` key of the same name are the same key (the
/// wire format cannot tell them apart).
#[derive(Clone, Debug)]
pub enum PropertyKey {
    /// Bare property name.
    Plain(String),
    /// Name plus qualifying tags, in order. The wire format carries at most
    /// [`MAX_SEGMENTS`]; longer keys are rejected at encode time.
    Tagged(SmallVec<[String; MAX_SEGMENTS]>),
}

impl PropertyKey {
    /// Create a plain key.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(name.into())
    }

    /// Create a key from an ordered run of segments.
    ///
    /// A single segment collapses to [`PropertyKey::Plain`].
    pub fn tagged<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segs: SmallVec<[String; MAX_SEGMENTS]> =
            segments.into_iter().map(Into::into).collect();
        if segs.len() == 1 {
            if let Some(only) = segs.pop() {
                return Self::Plain(only);
            }
        }
        Self::Tagged(segs)
    }

    /// All segments of the key, name first.
    pub fn segments(&self) -> &[String] {
        match self {
            Self::Plain(name) => std::slice::from_ref(name),
            Self::Tagged(segs) => segs,
        }
    }

    /// The canonical name (first segment), if the key has one.
    pub fn name(&self) -> Option<&str> {
        self.segments().first().map(String::as_str)
    }

    /// The qualifying tags (segments after the name).
    pub fn tags(&self) -> &[String] {
        let segs = self.segments();
        if segs.is_empty() { segs } else { &segs[1..] }
    }

    /// Number of segments.
    pub fn arity(&self) -> usize {
        self.segments().len()
    }

    /// Whether the key fits the wire format's segment ceiling.
    pub fn fits_wire(&self) -> bool {
        let n = self.arity();
        n >= 1 && n <= MAX_SEGMENTS
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for PropertyKey {}

impl Hash for PropertyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments().hash(state);
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segments() {
            [] => write!(f, "<empty>"),
            [name] => write!(f, "{name}"),
            [name, tags @ ..] => {
                write!(f, "{name}[")?;
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{tag}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        Self::Plain(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        Self::Plain(name)
    }
}

impl From<Vec<String>> for PropertyKey {
    fn from(segments: Vec<String>) -> Self {
        Self::tagged(segments)
    }
}

impl<const N: usize> From<[&str; N]> for PropertyKey {
    fn from(segments: [&str; N]) -> Self {
        Self::tagged(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &PropertyKey) -> u64 {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_plain_key() {
        let key = PropertyKey::plain("mass");
        assert_eq!(key.name(), Some("mass"));
        assert!(key.tags().is_empty());
        assert_eq!(key.arity(), 1);
        assert!(key.fits_wire());
    }

    #[test]
    fn test_tagged_key() {
        let key = PropertyKey::tagged(["abundance", "fe", "56"]);
        assert_eq!(key.name(), Some("abundance"));
        assert_eq!(key.tags(), ["fe", "56"]);
        assert_eq!(key.arity(), 3);
        assert!(key.fits_wire());
    }

    #[test]
    fn test_single_segment_collapses_to_plain() {
        let key = PropertyKey::tagged(["mass"]);
        assert!(matches!(key, PropertyKey::Plain(_)));
        assert_eq!(key, PropertyKey::plain("mass"));
        assert_eq!(hash_of(&key), hash_of(&PropertyKey::plain("mass")));
    }

    #[test]
    fn test_equality_by_segments() {
        let a = PropertyKey::tagged(["x", "y"]);
        let b = PropertyKey::from(["x", "y"]);
        assert_eq!(a, b);
        assert_ne!(a, PropertyKey::from(["y", "x"]));
        assert_ne!(a, PropertyKey::plain("x"));
    }

    #[test]
    fn test_wire_ceiling() {
        let key = PropertyKey::tagged(["a", "b", "c", "d", "e"]);
        assert!(key.fits_wire());
        let key = PropertyKey::tagged(["a", "b", "c", "d", "e", "f"]);
        assert!(!key.fits_wire());
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyKey::plain("mass").to_string(), "mass");
        assert_eq!(
            PropertyKey::tagged(["abundance", "fe", "56"]).to_string(),
            "abundance[fe, 56]"
        );
    }
}
