//! Element selection with XPath-style predicate fragments.
//!
//! Selection starts from every element of a given name in the document,
//! in document order, then narrows it through the caller's trailing
//! predicate fragment. Supported predicates, chained freely:
//!
//! - `[child='value']` - a direct child element with matching text
//! - `[@attr='value']` - a matching attribute
//! - `[child]` / `[@attr]` - existence
//! - `[n]` - 1-based position within the current match list
//!
//! Positional predicates index the whole match list in document order
//! (the `(//name)[n]` reading). Anything else is rejected with a distinct
//! error rather than silently matching nothing.

use crate::error::{Error, Result};
use super::tree::XmlElement;

/// One parsed `[...]` predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    AttrEquals(String, String),
    AttrExists(String),
    ChildEquals(String, String),
    ChildExists(String),
}

/// Select elements named `element_name` under `root` (inclusive), narrowed
/// by the predicate fragment `filter`. An empty fragment selects all.
pub fn select_elements<'a>(
    root: &'a XmlElement,
    element_name: &str,
    filter: &str,
) -> Result<Vec<&'a XmlElement>> {
    let predicates = parse_filter(filter)?;
    let mut matched = root.descendants_named(element_name);
    for predicate in &predicates {
        matched = apply(matched, predicate);
    }
    Ok(matched)
}

fn apply<'a>(matched: Vec<&'a XmlElement>, predicate: &Predicate) -> Vec<&'a XmlElement> {
    match predicate {
        Predicate::Position(n) => matched
            .get(n - 1)
            .map(|el| vec![*el])
            .unwrap_or_default(),
        Predicate::AttrEquals(name, value) => matched
            .into_iter()
            .filter(|el| el.get_attribute(name) == Some(value.as_str()))
            .collect(),
        Predicate::AttrExists(name) => matched
            .into_iter()
            .filter(|el| el.get_attribute(name).is_some())
            .collect(),
        Predicate::ChildEquals(name, value) => matched
            .into_iter()
            .filter(|el| el.get_children(name).any(|c| c.text() == *value))
            .collect(),
        Predicate::ChildExists(name) => matched
            .into_iter()
            .filter(|el| el.first_child(name).is_some())
            .collect(),
    }
}

fn parse_filter(filter: &str) -> Result<Vec<Predicate>> {
    let mut predicates = Vec::new();
    let mut rest = filter.trim();

    while !rest.is_empty() {
        let Some(stripped) = rest.strip_prefix('[') else {
            return Err(Error::filter(format!("expected '[' at: {rest}")));
        };
        let end = closing_bracket(stripped)
            .ok_or_else(|| Error::filter(format!("unterminated predicate: [{stripped}")))?;
        predicates.push(parse_predicate(&stripped[..end])?);
        rest = stripped[end + 1..].trim_start();
    }

    Ok(predicates)
}

/// Position of the `]` closing the predicate, skipping quoted runs.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ']' => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_predicate(inner: &str) -> Result<Predicate> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Err(Error::filter("empty predicate"));
    }

    if inner.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = inner
            .parse()
            .map_err(|_| Error::filter(format!("bad position: {inner}")))?;
        if n == 0 {
            return Err(Error::filter("positions are 1-based"));
        }
        return Ok(Predicate::Position(n));
    }

    let (lhs, rhs) = match inner.split_once('=') {
        Some((lhs, rhs)) => (lhs.trim_end(), Some(rhs.trim_start())),
        None => (inner, None),
    };

    let (name, is_attr) = match lhs.strip_prefix('@') {
        Some(name) => (name, true),
        None => (lhs, false),
    };
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(Error::filter(format!("bad name: {lhs}")));
    }

    match rhs {
        None => Ok(if is_attr {
            Predicate::AttrExists(name.to_string())
        } else {
            Predicate::ChildExists(name.to_string())
        }),
        Some(rhs) => {
            let value = unquote(rhs)
                .ok_or_else(|| Error::filter(format!("value must be quoted: {rhs}")))?;
            Ok(if is_attr {
                Predicate::AttrEquals(name.to_string(), value)
            } else {
                Predicate::ChildEquals(name.to_string(), value)
            })
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn unquote(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let quote = chars.next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let body: String = chars.collect();
    let stripped = body.strip_suffix(quote)?;
    Some(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree;

    fn doc() -> XmlElement {
        tree::parse(
            r#"<collection><samples>
                 <sample id="1"><name>x</name></sample>
                 <sample id="2"><name>y</name><flag/></sample>
               </samples></collection>"#,
        )
        .expect("should parse")
    }

    fn names(matched: &[&XmlElement]) -> Vec<String> {
        matched
            .iter()
            .map(|el| el.first_child("name").unwrap().text())
            .collect()
    }

    #[test]
    fn test_select_all() {
        let root = doc();
        let matched = select_elements(&root, "sample", "").expect("should select");
        assert_eq!(names(&matched), ["x", "y"]);
    }

    #[test]
    fn test_select_by_child_text() {
        let root = doc();
        let matched = select_elements(&root, "sample", "[name='x']").expect("should select");
        assert_eq!(names(&matched), ["x"]);
    }

    #[test]
    fn test_select_by_attribute() {
        let root = doc();
        let matched = select_elements(&root, "sample", "[@id='2']").expect("should select");
        assert_eq!(names(&matched), ["y"]);
    }

    #[test]
    fn test_select_by_existence_and_position() {
        let root = doc();
        let matched = select_elements(&root, "sample", "[flag]").expect("should select");
        assert_eq!(names(&matched), ["y"]);

        let matched = select_elements(&root, "sample", "[2]").expect("should select");
        assert_eq!(names(&matched), ["y"]);

        let matched = select_elements(&root, "sample", "[9]").expect("should select");
        assert!(matched.is_empty());
    }

    #[test]
    fn test_select_chained() {
        let root = doc();
        let matched =
            select_elements(&root, "sample", "[@id='2'][name='y']").expect("should select");
        assert_eq!(names(&matched), ["y"]);

        let matched =
            select_elements(&root, "sample", "[@id='2'][name='x']").expect("should select");
        assert!(matched.is_empty());
    }

    #[test]
    fn test_select_value_with_bracket() {
        let root = tree::parse("<r><sample><name>a]b</name></sample></r>").unwrap();
        let matched = select_elements(&root, "sample", "[name='a]b']").expect("should select");
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_select_bad_syntax() {
        let root = doc();
        for filter in ["sample", "[name=x]", "[name='x'", "[0]", "[=1]", "[@='v']"] {
            let err = select_elements(&root, "sample", filter).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedFilter(_)),
                "filter {filter:?} should be rejected"
            );
        }
    }
}
