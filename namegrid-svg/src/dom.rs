//! Owned, mutable SVG element tree.
//!
//! Templates are parsed once with `roxmltree` and converted into this tree so
//! every grid instance can own an independent deep copy it is free to edit.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SvgError};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Clone, Debug, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SvgElement {
    /// Qualified name, e.g. `g` or `sodipodi:namedview`.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value in place, or append a new attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn push(&mut self, child: SvgElement) {
        self.children.push(SvgNode::Element(child));
    }

    /// Element children only, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|c| match c {
            SvgNode::Element(e) => Some(e),
            SvgNode::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for c in &self.children {
            match c {
                SvgNode::Element(e) => e.collect_text(out),
                SvgNode::Text(t) => out.push_str(t),
            }
        }
    }

    /// Replace every child with a single text node.
    pub fn set_text_content(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(SvgNode::Text(text.to_string()));
        }
    }

    /// Child indices leading to the first descendant (document order) that
    /// matches `pred`. The element itself is not considered.
    pub fn find_path<F>(&self, pred: F) -> Option<Vec<usize>>
    where
        F: Fn(&SvgElement) -> bool,
    {
        let mut path = Vec::new();
        self.find_path_into(&pred, &mut path).then_some(path)
    }

    fn find_path_into<F>(&self, pred: &F, path: &mut Vec<usize>) -> bool
    where
        F: Fn(&SvgElement) -> bool,
    {
        for (i, child) in self.children.iter().enumerate() {
            if let SvgNode::Element(el) = child {
                path.push(i);
                if pred(el) || el.find_path_into(pred, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&SvgElement> {
        let mut cur = self;
        for &i in path {
            cur = match cur.children.get(i)? {
                SvgNode::Element(e) => e,
                SvgNode::Text(_) => return None,
            };
        }
        Some(cur)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut SvgElement> {
        let mut cur = self;
        for &i in path {
            cur = match cur.children.get_mut(i)? {
                SvgNode::Element(e) => e,
                SvgNode::Text(_) => return None,
            };
        }
        Some(cur)
    }

    /// `self` followed by every element along `path`, outermost first.
    pub fn lineage(&self, path: &[usize]) -> Vec<&SvgElement> {
        let mut out = vec![self];
        let mut cur = self;
        for &i in path {
            match cur.children.get(i) {
                Some(SvgNode::Element(e)) => {
                    out.push(e);
                    cur = e;
                }
                _ => break,
            }
        }
        out
    }

    /// Visit `self` and every descendant element in document order.
    pub fn walk(&self, f: &mut impl FnMut(&SvgElement)) {
        f(self);
        for e in self.elements() {
            e.walk(f);
        }
    }

    /// Namespace declarations carried by this element (`xmlns:*`).
    pub fn prefixed_namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .filter(|(k, _)| k.starts_with("xmlns:"))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (k, v) in &self.attrs {
            write!(f, " {}=\"{}\"", k, escape_attr(v))?;
        }
        if self.children.is_empty() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for c in &self.children {
            match c {
                SvgNode::Element(e) => write!(f, "{e}")?,
                SvgNode::Text(t) => write!(f, "{}", escape_text(t))?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Parse SVG text into an owned tree rooted at the `<svg>` element.
///
/// Comments and processing instructions are dropped. Prefixed namespaces used
/// anywhere in the document are declared on the returned root.
pub fn parse_svg(text: &str) -> Result<SvgElement> {
    let opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, opt)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::NotSvg(root.tag_name().name().to_string()));
    }

    let mut prefixes = BTreeMap::new();
    let mut el = convert(root, &mut prefixes);
    if root.tag_name().namespace() == Some(SVG_NS) {
        el.attrs.insert(0, ("xmlns".to_string(), SVG_NS.to_string()));
    }
    for (prefix, uri) in prefixes {
        let key = format!("xmlns:{prefix}");
        if el.attr(&key).is_none() {
            el.set_attr(key, uri);
        }
    }
    Ok(el)
}

fn convert(node: roxmltree::Node<'_, '_>, prefixes: &mut BTreeMap<String, String>) -> SvgElement {
    let tag = node.tag_name();
    let mut el = SvgElement::new(tag.name());
    match tag.namespace() {
        None | Some(SVG_NS) => {}
        Some(ns) => match qualify(node, ns, prefixes) {
            Some(prefix) => el.name = format!("{prefix}:{}", tag.name()),
            // Foreign default namespace, e.g. XHTML inside foreignObject.
            None => el.set_attr("xmlns", ns),
        },
    }

    for a in node.attributes() {
        let key = match a.namespace() {
            None => a.name().to_string(),
            Some(ns) => match qualify(node, ns, prefixes) {
                Some(prefix) => format!("{prefix}:{}", a.name()),
                None => a.name().to_string(),
            },
        };
        el.attrs.push((key, a.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            el.children.push(SvgNode::Element(convert(child, prefixes)));
        } else if child.is_text()
            && let Some(t) = child.text()
        {
            el.children.push(SvgNode::Text(t.to_string()));
        }
    }
    el
}

fn qualify(
    node: roxmltree::Node<'_, '_>,
    ns: &str,
    prefixes: &mut BTreeMap<String, String>,
) -> Option<String> {
    if ns == XML_NS {
        return Some("xml".to_string());
    }
    let prefix = node.lookup_prefix(ns).filter(|p| !p.is_empty())?;
    prefixes
        .entry(prefix.to_string())
        .or_insert_with(|| ns.to_string());
    Some(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_a_small_template() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><rect x="1" y="2" width="3" height="4"/><text x="5" y="6">Name &amp; Co</text></svg>"#;
        let root = parse_svg(src).unwrap();
        assert_eq!(
            root.to_string(),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><rect x="1" y="2" width="3" height="4"/><text x="5" y="6">Name &amp; Co</text></svg>"#
        );
    }

    #[test]
    fn keeps_prefixed_names_and_declares_them_on_the_root() {
        let src = r##"<svg xmlns="http://www.w3.org/2000/svg"
                         xmlns:xlink="http://www.w3.org/1999/xlink"
                         xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
            <g inkscape:label="Layer 1"><use xlink:href="#a" xml:space="preserve"/></g>
        </svg>"##;
        let root = parse_svg(src).unwrap();
        let g = root.elements().next().unwrap();
        assert_eq!(g.attr("inkscape:label"), Some("Layer 1"));
        let use_el = g.elements().next().unwrap();
        assert_eq!(use_el.attr("xlink:href"), Some("#a"));
        assert_eq!(use_el.attr("xml:space"), Some("preserve"));

        let declared: Vec<_> = root.prefixed_namespaces().collect();
        assert!(declared.contains(&("xmlns:xlink", XLINK_NS)));
        assert!(declared.contains(&("xmlns:inkscape", "http://www.inkscape.org/namespaces/inkscape")));
    }

    #[test]
    fn rejects_non_svg_roots() {
        let err = parse_svg("<html/>").unwrap_err();
        assert!(matches!(err, SvgError::NotSvg(ref n) if n == "html"));
        assert!(matches!(parse_svg("<svg"), Err(SvgError::Xml(_))));
    }

    #[test]
    fn finds_the_first_text_in_document_order() {
        let root = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><rect/><g><text>a</text></g></g><text>b</text></svg>"#,
        )
        .unwrap();
        let path = root.find_path(|e| e.name == "text").unwrap();
        assert_eq!(path, vec![0, 1, 0]);
        assert_eq!(root.at_path(&path).unwrap().text_content(), "a");
        let names: Vec<_> = root
            .lineage(&path)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["svg", "g", "g", "text"]);
    }

    #[test]
    fn text_content_replaces_nested_spans() {
        let mut root = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><text><tspan x="1">Old</tspan> name</text></svg>"#,
        )
        .unwrap();
        let text = root.at_path_mut(&[0]).unwrap();
        assert_eq!(text.text_content(), "Old name");
        text.set_text_content("<Ada>");
        assert_eq!(text.to_string(), "<text>&lt;Ada&gt;</text>");
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = SvgElement::new("g")
            .with_attr("id", "a")
            .with_attr("transform", "x");
        el.set_attr("id", "b");
        assert_eq!(el.attrs[0], ("id".to_string(), "b".to_string()));
        assert_eq!(el.to_string(), r#"<g id="b" transform="x"/>"#);
    }
}
