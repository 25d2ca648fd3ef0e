//! Render tree
//!
//! Components do not draw anything themselves. Each render produces a small
//! tree of [`RenderNode`]s carrying class names and style variables; the host
//! maps the tree onto its display surface and a stylesheet supplies the
//! keyframes behind each class name.
//!
//! ```rust
//! use unveil_core::{RenderNode, StyleValue};
//!
//! let node = RenderNode::div()
//!     .class("slide slide-left")
//!     .style("--slide-distance", StyleValue::text("-50%"))
//!     .child(RenderNode::span().text("hi"));
//!
//! assert!(node.classes().contains("slide-left"));
//! assert_eq!(node.text_content(), "hi");
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

// ============================================================================
// Class lists
// ============================================================================

/// Ordered set of class tokens
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassList {
    tokens: SmallVec<[String; 4]>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace separated class string
    pub fn parse(classes: &str) -> Self {
        let mut list = Self::new();
        list.add(classes);
        list
    }

    /// Add every whitespace separated token of `classes` not already present
    pub fn add(&mut self, classes: &str) {
        for token in classes.split_whitespace() {
            if !self.contains(token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Remove a single token, returning whether it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        before != self.tokens.len()
    }

    /// Add or remove `token` depending on `on`
    pub fn toggle(&mut self, token: &str, on: bool) {
        if on {
            self.add(token);
        } else {
            self.remove(token);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

// ============================================================================
// Style values
// ============================================================================

/// Value of a style property or custom style variable
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Unitless number (`--zoom: 0.5`)
    Number(f64),
    /// Anything else (`--duration: 1000ms`, `--slide-distance: -50%`)
    Text(String),
}

impl StyleValue {
    pub fn number(value: impl Into<f64>) -> Self {
        StyleValue::Number(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        StyleValue::Text(value.into())
    }

    /// Milliseconds (`250ms`)
    pub fn millis(ms: u64) -> Self {
        StyleValue::Text(format!("{ms}ms"))
    }

    /// Pixels (`4px`)
    pub fn px(px: f64) -> Self {
        StyleValue::Text(format!("{px}px"))
    }

    /// Percentage (`-50%`)
    pub fn percent(pct: f64) -> Self {
        StyleValue::Text(format!("{pct}%"))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered style declarations, keyed by property name
pub type StyleMap = IndexMap<String, StyleValue>;

// ============================================================================
// Nodes
// ============================================================================

/// One element of a rendered component
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
    tag: &'static str,
    #[serde(skip_serializing_if = "ClassList::is_empty")]
    classes: ClassList,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    style: StyleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: ClassList::new(),
            style: StyleMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn heading() -> Self {
        Self::new("h1")
    }

    /// Add whitespace separated class tokens
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.add(classes);
        self
    }

    pub fn class_list(mut self, classes: ClassList) -> Self {
        self.classes = classes;
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: StyleValue) -> Self {
        self.style.insert(name.into(), value);
        self
    }

    pub fn styles<I, K>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = (K, StyleValue)>,
        K: Into<String>,
    {
        for (name, value) in styles {
            self.style.insert(name.into(), value);
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn style_map(&self) -> &StyleMap {
        &self.style
    }

    pub fn style_value(&self, name: &str) -> Option<&StyleValue> {
        self.style.get(name)
    }

    pub fn own_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_nodes(&self) -> &[RenderNode] {
        &self.children
    }

    /// Concatenated text of this node and all descendants, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for the first node carrying `class`
    pub fn find_by_class(&self, class: &str) -> Option<&RenderNode> {
        if self.classes.contains(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    /// Serialize to compact HTML-like markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&self.classes.to_string()));
            out.push('"');
        }
        if !self.style.is_empty() {
            let decls: Vec<String> = self
                .style
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect();
            out.push_str(" style=\"");
            out.push_str(&escape(&decls.join("; ")));
            out.push('"');
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_dedup_and_order() {
        let mut list = ClassList::parse("zoom zoom-center zoom");
        assert_eq!(list.to_string(), "zoom zoom-center");

        list.add("hide");
        assert!(list.remove("zoom"));
        assert!(!list.remove("zoom"));
        assert_eq!(list.to_string(), "zoom-center hide");
    }

    #[test]
    fn test_empty_class_string() {
        let list = ClassList::parse("");
        assert!(list.is_empty());
        assert_eq!(list.to_string(), "");
    }

    #[test]
    fn test_toggle() {
        let mut list = ClassList::new();
        list.toggle("hide", true);
        assert!(list.contains("hide"));
        list.toggle("hide", false);
        assert!(!list.contains("hide"));
    }

    #[test]
    fn test_style_value_display() {
        assert_eq!(StyleValue::millis(1000).to_string(), "1000ms");
        assert_eq!(StyleValue::px(4.0).to_string(), "4px");
        assert_eq!(StyleValue::percent(-50.0).to_string(), "-50%");
        assert_eq!(StyleValue::number(1.1).to_string(), "1.1");
        assert_eq!(StyleValue::number(2.0).to_string(), "2");
    }

    #[test]
    fn test_markup() {
        let node = RenderNode::div()
            .class("outer")
            .style("--duration", StyleValue::millis(300))
            .child(RenderNode::span().class("a b").text("<x>"));

        assert_eq!(
            node.to_markup(),
            "<div class=\"outer\" style=\"--duration: 300ms\"><span class=\"a b\">&lt;x&gt;</span></div>"
        );
    }

    #[test]
    fn test_text_content_and_find() {
        let node = RenderNode::heading()
            .child(RenderNode::span().text("H"))
            .child(RenderNode::span().class("last").text("i"));

        assert_eq!(node.text_content(), "Hi");
        assert_eq!(node.find_by_class("last").and_then(|n| n.own_text()), Some("i"));
        assert!(node.find_by_class("missing").is_none());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let node = RenderNode::span().text("a");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"tag":"span","text":"a"}"#);
    }
}
