//! Arena-backed document used by tests and the CLI.

use std::collections::BTreeMap;

use crate::dom::{Dom, Selector};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A download the document would have started: an anchor with a `download`
/// attribute was clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub href: String,
    pub filename: String,
}

#[derive(Clone, Debug)]
pub struct MemDocument {
    nodes: Vec<NodeData>,
    html: NodeId,
    body: NodeId,
    created: usize,
    alerts: Vec<String>,
    downloads: Vec<Download>,
    clicks: Vec<NodeId>,
}

impl Default for MemDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            html: NodeId(0),
            body: NodeId(0),
            created: 0,
            alerts: Vec::new(),
            downloads: Vec::new(),
            clicks: Vec::new(),
        };
        doc.html = doc.alloc("html");
        let body = doc.alloc("body");
        doc.attach(doc.html, body);
        doc.body = body;
        doc
    }

    /// Append a child described as `tag#id.class.class` under `parent`.
    ///
    /// Builder calls do not count towards [`MemDocument::created_elements`].
    pub fn el(&mut self, parent: NodeId, spec: &str) -> NodeId {
        let (head, classes) = match spec.split_once('.') {
            Some((head, rest)) => (head, rest.split('.').collect::<Vec<_>>()),
            None => (spec, Vec::new()),
        };
        let (tag, id) = match head.split_once('#') {
            Some((tag, id)) => (tag, Some(id)),
            None => (head, None),
        };
        let node = self.alloc(tag);
        if let Some(id) = id {
            self.nodes[node.0].attrs.insert("id".into(), id.into());
        }
        for class in classes.into_iter().filter(|c| !c.is_empty()) {
            self.nodes[node.0].classes.push(class.to_string());
        }
        self.attach(parent, node);
        node
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = Some(value.to_string());
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Elements created through [`Dom::create_element`].
    pub fn created_elements(&self) -> usize {
        self.created
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }

    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    fn attach(&mut self, parent: NodeId, node: NodeId) {
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.push(node);
    }

    fn is_connected(&self, mut node: NodeId) -> bool {
        loop {
            if node == self.html {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[scope.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, node: NodeId, selector: Selector<'_>) -> bool {
        let data = &self.nodes[node.0];
        let tag_is = |tag: &str| data.tag.eq_ignore_ascii_case(tag);
        let class_is = |class: &str| data.classes.iter().any(|c| c == class);
        let attr_is = |name: &str, value: &str| self.attr(node, name).as_deref() == Some(value);
        match selector {
            Selector::Tag(tag) => tag_is(tag),
            Selector::Class(class) => class_is(class),
            Selector::TagClass(tag, class) => tag_is(tag) && class_is(class),
            Selector::AttrEquals(name, value) => attr_is(name, value),
            Selector::TagAttrEquals(tag, name, value) => tag_is(tag) && attr_is(name, value),
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let data = &self.nodes[node.0];
        if name == "class" {
            return Some(data.classes.join(" "));
        }
        data.attrs.get(name).cloned()
    }
}

impl Dom for MemDocument {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.html
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query_all(&self, scope: &NodeId, selector: Selector<'_>) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        all.retain(|&node| self.matches(node, selector));
        all
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.html, &mut all);
        all.into_iter()
            .find(|&node| self.nodes[node.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let data = &mut self.nodes[node.0];
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.nodes[node.0].text.clone();
        for &child in &self.nodes[node.0].children {
            text.push_str(&self.text_content(&child));
        }
        text
    }

    fn input_value(&self, node: &NodeId) -> Option<String> {
        let data = &self.nodes[node.0];
        match data.tag.as_str() {
            "input" | "textarea" | "select" => Some(data.value.clone().unwrap_or_default()),
            _ => None,
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        self.created += 1;
        Some(self.alloc(tag))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child);
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.nodes[child.0].parent == Some(*parent) {
            self.detach(*child);
        }
    }

    fn click(&mut self, node: &NodeId) {
        self.clicks.push(*node);
        let data = &self.nodes[node.0];
        if data.tag != "a" || !self.is_connected(*node) {
            return;
        }
        if let (Some(href), Some(filename)) = (data.attrs.get("href"), data.attrs.get("download")) {
            self.downloads.push(Download {
                href: href.clone(),
                filename: filename.clone(),
            });
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
