//! XInclude resolution.
//!
//! Splices referenced documents into the tree before any extraction runs,
//! so included content is indistinguishable from inline content. Supported
//! surface: `href` (resolved relative to the including document), `parse`
//! of `xml` (default) or `text`, and `<xi:fallback>` for unresolvable
//! targets. Recursion is bounded by the caller-supplied depth limit.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use super::tree::{self, XmlElement, XmlNode};

/// The XInclude namespace.
pub const XINCLUDE_NS: &str = "http://www.w3.org/2001/XInclude";

/// Resolve every include in the tree rooted at `root`.
///
/// `base_dir` anchors relative `href` targets; `max_depth` bounds how deep
/// included documents may include further documents.
pub fn resolve(root: &mut XmlElement, base_dir: &Path, max_depth: usize) -> Result<()> {
    let scope = NsScope::default().extended(root);
    let children = std::mem::take(&mut root.children);
    root.children = resolve_nodes(children, base_dir, &scope, 0, max_depth)?;
    Ok(())
}

/// In-scope namespace bindings; later entries shadow earlier ones.
/// The empty prefix stands for the default namespace.
#[derive(Clone, Default)]
struct NsScope(Vec<(String, String)>);

impl NsScope {
    fn extended(&self, el: &XmlElement) -> Self {
        let mut scope = self.clone();
        for (key, value) in &el.attributes {
            if key == "xmlns" {
                scope.0.push((String::new(), value.clone()));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.0.push((prefix.to_string(), value.clone()));
            }
        }
        scope
    }

    fn uri(&self, prefix: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }
}

fn is_xi(el: &XmlElement, scope: &NsScope, local: &str) -> bool {
    let (prefix, name) = match el.name.split_once(':') {
        Some((p, n)) => (p, n),
        None => ("", el.name.as_str()),
    };
    name == local && scope.uri(prefix) == Some(XINCLUDE_NS)
}

fn resolve_nodes(
    nodes: Vec<XmlNode>,
    base: &Path,
    scope: &NsScope,
    depth: usize,
    max: usize,
) -> Result<Vec<XmlNode>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            XmlNode::Element(mut child) => {
                let child_scope = scope.extended(&child);
                if is_xi(&child, &child_scope, "include") {
                    out.extend(expand_include(&child, &child_scope, base, depth, max)?);
                } else {
                    let children = std::mem::take(&mut child.children);
                    child.children = resolve_nodes(children, base, &child_scope, depth, max)?;
                    out.push(XmlNode::Element(child));
                }
            }
            text => out.push(text),
        }
    }
    Ok(out)
}

fn expand_include(
    include: &XmlElement,
    scope: &NsScope,
    base: &Path,
    depth: usize,
    max: usize,
) -> Result<Vec<XmlNode>> {
    if depth >= max {
        return Err(Error::IncludeDepthExceeded(max));
    }

    let href = include
        .get_attribute("href")
        .ok_or_else(|| Error::malformed("include directive without href"))?;
    let mode = include.get_attribute("parse").unwrap_or("xml");
    let target = base.join(href);
    debug!(href, target = %target.display(), "resolving include");

    let content = match fs::read_to_string(&target) {
        Ok(content) => content,
        Err(err) => {
            for fallback in include.child_elements() {
                let fb_scope = scope.extended(fallback);
                if is_xi(fallback, &fb_scope, "fallback") {
                    debug!(href, "include target missing, using fallback");
                    return resolve_nodes(fallback.children.clone(), base, &fb_scope, depth, max);
                }
            }
            return Err(Error::UnresolvedInclude(format!("{href}: {err}")));
        }
    };

    match mode {
        "text" => Ok(vec![XmlNode::Text(content)]),
        "xml" => {
            let mut included = tree::parse(&content)?;
            let next_base = target
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base.to_path_buf());
            let inc_scope = NsScope::default().extended(&included);
            let children = std::mem::take(&mut included.children);
            included.children =
                resolve_nodes(children, &next_base, &inc_scope, depth + 1, max)?;
            Ok(vec![XmlNode::Element(included)])
        }
        other => Err(Error::malformed(format!(
            "unsupported include parse mode: {other}"
        ))),
    }
}
