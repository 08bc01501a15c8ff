//! Error types for the xmlcoll library.

use thiserror::Error;

/// Main error type for collection operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Property key not present in a bag
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// Sample not present in a collection
    #[error("Sample not found: {0}")]
    SampleNotFound(String),

    /// Property key exceeds the wire format's tag ceiling
    #[error("Too many tags on property '{name}': {count} segments (limit 5)")]
    TagOverflow { name: String, count: usize },

    /// Property key with no segments at all
    #[error("Property key has no segments")]
    EmptyKey,

    /// A `<property>` element carries no `name` attribute
    #[error("Property element has no name attribute")]
    KeylessProperty,

    /// A `<sample>` element carries no `<name>` child
    #[error("Sample element has no name")]
    MissingSampleName,

    /// Structurally invalid document fragment
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Sample filter fragment could not be parsed
    #[error("Unsupported sample filter: {0}")]
    UnsupportedFilter(String),

    /// XInclude recursion exceeded the configured bound
    #[error("XInclude depth limit exceeded ({0})")]
    IncludeDepthExceeded(usize),

    /// XInclude target could not be resolved and no fallback was given
    #[error("Unresolvable XInclude: {0}")]
    UnresolvedInclude(String),

    /// XML syntax error from the underlying parser
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute reported by the underlying parser
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Document bytes are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed-document error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an unsupported-filter error.
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::UnsupportedFilter(msg.into())
    }
}

/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, Error>;
