//! Minimal mutable DOM.
//!
//! Markup is parsed with `scraper` and copied into an owned `ego_tree::Tree`,
//! which the switcher rewrites in place and serializes back to HTML.

use std::path::Path;

use anyhow::{Context, Result};
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use scraper::{Html, Node};

use crate::error::DocumentError;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Root,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(ElementData),
}

impl DomNode {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<DomNode>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            tree: Tree::new(DomNode::Root),
        }
    }
}

impl Document {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self::from_scraper(&Html::parse_document(html))
    }

    /// Parse an HTML fragment; the implicit `<html>` wrapper is dropped.
    pub fn parse_fragment(html: &str) -> Self {
        Self::from_scraper(&Html::parse_fragment(html))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read HTML file '{}'", path.display()))?;
        Ok(Self::parse(&html))
    }

    fn from_scraper(html: &Html) -> Self {
        let mut doc = Self::default();
        let source = html.tree.root();
        let fragment = matches!(source.value(), Node::Fragment);
        let mut root = doc.tree.root_mut();
        for child in source.children() {
            let wrapper = fragment
                && matches!(child.value(), Node::Element(el) if el.name() == "html");
            if wrapper {
                copy_children(child, &mut root);
            } else {
                copy_node(child, &mut root);
            }
        }
        doc
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.tree.get(id).map(|n| n.value())
    }

    pub fn element(&self, id: NodeId) -> Result<&ElementData, DocumentError> {
        match self.node(id) {
            Some(DomNode::Element(el)) => Ok(el),
            Some(_) => Err(DocumentError::NotAnElement(id)),
            None => Err(DocumentError::MissingNode(id)),
        }
    }

    /// Set one attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DocumentError> {
        let mut node = self.tree.get_mut(id).ok_or(DocumentError::MissingNode(id))?;
        match node.value() {
            DomNode::Element(el) => {
                el.set_attr(name, value);
                Ok(())
            }
            _ => Err(DocumentError::NotAnElement(id)),
        }
    }

    /// Overwrite the `class` attribute of an element.
    pub fn set_class(&mut self, id: NodeId, class: &str) -> Result<(), DocumentError> {
        self.set_attr(id, "class", class)
    }

    pub fn class(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.attr("class"))
    }

    /// Elements carrying `class`, in document order, skipping any nested
    /// inside an earlier match.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let is_match = |node: &NodeRef<'_, DomNode>| {
            node.value()
                .as_element()
                .is_some_and(|el| el.has_class(class))
        };
        self.tree
            .root()
            .descendants()
            .filter(|node| is_match(node))
            .filter(|node| !node.ancestors().any(|a| is_match(&a)))
            .map(|node| node.id())
            .collect()
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.tree.get(id)?;
        Some(
            node.descendants()
                .filter_map(|n| match n.value() {
                    DomNode::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DocumentError> {
        for child in self.children_or_err(id)? {
            if let Some(mut node) = self.tree.get_mut(child) {
                node.detach();
            }
        }
        Ok(())
    }

    /// Append an element, optionally holding one text node, under `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        element: ElementData,
        text: Option<&str>,
    ) -> Result<NodeId, DocumentError> {
        let mut parent_node = self
            .tree
            .get_mut(parent)
            .ok_or(DocumentError::MissingNode(parent))?;
        let mut child = parent_node.append(DomNode::Element(element));
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            child.append(DomNode::Text(text.to_string()));
        }
        Ok(child.id())
    }

    fn children_or_err(&self, id: NodeId) -> Result<Vec<NodeId>, DocumentError> {
        let node = self.tree.get(id).ok_or(DocumentError::MissingNode(id))?;
        Ok(node.children().map(|c| c.id()).collect())
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.tree.root().children() {
            write_node(child, false, &mut out);
        }
        out
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> Option<String> {
        let node = self.tree.get(id)?;
        let raw = node
            .value()
            .as_element()
            .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name.as_str()));
        let mut out = String::new();
        for child in node.children() {
            write_node(child, raw, &mut out);
        }
        Some(out)
    }

    /// Serialize `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> Option<String> {
        let node = self.tree.get(id)?;
        let mut out = String::new();
        write_node(node, false, &mut out);
        Some(out)
    }
}

fn copy_children(source: NodeRef<'_, Node>, target: &mut NodeMut<'_, DomNode>) {
    for child in source.children() {
        copy_node(child, target);
    }
}

fn copy_node(source: NodeRef<'_, Node>, target: &mut NodeMut<'_, DomNode>) {
    let value = match source.value() {
        Node::Doctype(doctype) => DomNode::Doctype(doctype.name().to_string()),
        Node::Comment(comment) => DomNode::Comment(String::from(&**comment)),
        Node::Text(text) => DomNode::Text(String::from(&**text)),
        Node::Element(el) => DomNode::Element(ElementData {
            name: el.name().to_string(),
            attrs: el
                .attrs
                .iter()
                .map(|(name, value)| {
                    // Foreign content (SVG, MathML) keeps prefixes such as `xlink:`.
                    let local: &str = &name.local;
                    let name = match &name.prefix {
                        Some(prefix) => format!("{}:{local}", &**prefix),
                        None => local.to_string(),
                    };
                    (name, String::from(&**value))
                })
                .collect(),
        }),
        _ => return,
    };
    let mut child = target.append(value);
    copy_children(source, &mut child);
}

fn write_node(node: NodeRef<'_, DomNode>, raw_text: bool, out: &mut String) {
    match node.value() {
        DomNode::Root => {
            for child in node.children() {
                write_node(child, false, out);
            }
        }
        DomNode::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        DomNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        DomNode::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        DomNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
            for child in node.children() {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
