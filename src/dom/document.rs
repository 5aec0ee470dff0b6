//! XML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and values
//!
//! A `Document` owns all of its data and is never mutated once built, so it
//! can be shared across threads for read-only queries.

use std::collections::BTreeMap;
use std::path::Path;

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode, DOCUMENT_NODE};
use super::strings::StringPool;
use crate::core::encoding::decode_document;
use crate::core::entities::{encode_attribute, encode_text};
use crate::core::tokenizer::{Token, Tokenizer};
use crate::error::{LoadError, ParseError};

/// An XML document stored in arena format
#[derive(Debug, Clone)]
pub struct Document {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl Default for Document {
    /// A document node with no children at all
    fn default() -> Self {
        Document {
            nodes: vec![XmlNode::document()],
            attributes: Vec::new(),
            strings: StringPool::new(),
            root_element: None,
        }
    }
}

impl Document {
    /// Parse raw document bytes (UTF-8, or UTF-16 with BOM)
    ///
    /// Returns Err if the document is not well-formed.
    pub fn parse(input: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        let text = decode_document(input.into())?;
        Self::parse_str(&text)
    }

    /// Parse an XML document held in a string
    pub fn parse_str(text: &str) -> Result<Self, ParseError> {
        let mut doc = Document::default();
        doc.build(text)?;
        Ok(doc)
    }

    /// Read and parse a file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the arena from tokens, enforcing tag nesting and a single root
    fn build(&mut self, text: &str) -> Result<(), ParseError> {
        let mut tokenizer = Tokenizer::new(text);
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];

        while let Some(token) = tokenizer.next_token()? {
            let at = tokenizer.token_start();
            let parent = *stack.last().unwrap_or(&DOCUMENT_NODE);
            let at_document_level = stack.len() == 1;

            match token {
                Token::StartTag { name, attributes, empty } => {
                    if at_document_level && self.root_element.is_some() {
                        return Err(ParseError::new("Document has multiple root elements", at));
                    }

                    let attr_count = u16::try_from(attributes.len())
                        .map_err(|_| ParseError::new(format!("Too many attributes on <{}>", name), at))?;

                    let name_id = self.strings.intern(name);
                    let mut node = XmlNode::element(name_id, parent);
                    node.attr_start = self.attributes.len() as u32;
                    node.attr_count = attr_count;
                    for attr in &attributes {
                        let name_id = self.strings.intern(attr.name);
                        let value_id = self.strings.intern(&attr.value);
                        self.attributes.push(XmlAttribute { name_id, value_id });
                    }

                    let node_id = self.push_node(node);
                    if at_document_level {
                        self.root_element = Some(node_id);
                    }
                    if !empty {
                        stack.push(node_id);
                    }
                }

                Token::EndTag { name } => {
                    if at_document_level {
                        return Err(ParseError::new(
                            format!("Unexpected end tag: </{}> without matching start tag", name),
                            at,
                        ));
                    }
                    let open = self.node_name(parent).unwrap_or_default();
                    if open != name {
                        return Err(ParseError::new(
                            format!("Tag mismatch: <{}> closed with </{}>", open, name),
                            at,
                        ));
                    }
                    stack.pop();
                }

                Token::Text(content) => {
                    if at_document_level {
                        if !content.trim_matches(['\t', '\n', '\r', ' ']).is_empty() {
                            return Err(ParseError::new("Text content not allowed at document level", at));
                        }
                        continue;
                    }
                    let value_id = self.strings.intern(&content);
                    self.push_node(XmlNode::character_data(NodeKind::Text, value_id, parent));
                }

                Token::CData(content) => {
                    if at_document_level {
                        return Err(ParseError::new("CDATA section not allowed at document level", at));
                    }
                    let value_id = self.strings.intern(content);
                    self.push_node(XmlNode::character_data(NodeKind::CData, value_id, parent));
                }

                Token::Comment(content) => {
                    let value_id = self.strings.intern(content);
                    self.push_node(XmlNode::character_data(NodeKind::Comment, value_id, parent));
                }

                Token::ProcessingInstruction { target, data } => {
                    let name_id = self.strings.intern(target);
                    let value_id = self.strings.intern(data);
                    self.push_node(XmlNode::processing_instruction(name_id, value_id, parent));
                }

                Token::DocType => {
                    if self.root_element.is_some() {
                        return Err(ParseError::new("DOCTYPE must come before root element", at));
                    }
                }

                Token::XmlDeclaration => {}
            }
        }

        if let Some(&unclosed) = stack.get(1) {
            let name = self.node_name(unclosed).unwrap_or_default();
            return Err(ParseError::new(format!("Unclosed tag: <{}>", name), text.len()));
        }
        if self.root_element.is_none() {
            return Err(ParseError::new("Missing root element", text.len()));
        }

        Ok(())
    }

    /// Append a node to the arena and link it under its parent
    fn push_node(&mut self, node: XmlNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        let parent_id = node.parent.unwrap_or(DOCUMENT_NODE);
        self.nodes.push(node);
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Get root element ID
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    /// Element name or PI target
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.strings.get(node.name_id),
            _ => None,
        }
    }

    /// Own value of a text, CDATA, comment or PI node
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Document | NodeKind::Element => None,
            _ => self.strings.get(node.value_id),
        }
    }

    /// Get attribute value by name
    pub fn attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.attribute_entries(node_id)
            .find(|(attr_name, _)| *attr_name == name)
            .map(|(_, value)| value)
    }

    /// Attribute at a position, in source order
    pub fn attribute_at(&self, node_id: NodeId, index: u16) -> Option<(&str, &str)> {
        self.attribute_entries(node_id).nth(index as usize)
    }

    /// Number of attributes on an element
    pub fn attribute_count(&self, node_id: NodeId) -> u16 {
        self.get_node(node_id).map_or(0, |n| n.attr_count)
    }

    /// Attributes as (name, value) pairs, in source order
    pub fn attribute_entries(&self, node_id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        let range = match self.get_node(node_id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = (start + node.attr_count as usize).min(self.attributes.len());
                start..end
            }
            None => 0..0,
        };
        self.attributes[range].iter().filter_map(|attr| {
            let name = self.strings.get(attr.name_id)?;
            let value = self.strings.get(attr.value_id)?;
            Some((name, value))
        })
    }

    /// Attributes keyed by name
    pub fn attribute_map(&self, node_id: NodeId) -> BTreeMap<&str, &str> {
        self.attribute_entries(node_id).collect()
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node (depth-first, document order)
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        self.push_children_reversed(id, &mut stack);
        DescendantIter { doc: self, stack }
    }

    fn push_children_reversed(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let mut child_id = self.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child_id {
            stack.push(cid);
            child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }

    /// Concatenated text of a node, like DOM `textContent`
    ///
    /// Elements and the document yield the text and CDATA of all
    /// descendants; other nodes yield their own value.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Document | NodeKind::Element) => self
                .descendants(id)
                .filter(|&d| self.get_node(d).is_some_and(XmlNode::is_text))
                .filter_map(|d| self.node_value(d))
                .collect(),
            Some(_) => self.node_value(id).unwrap_or_default().to_string(),
            None => String::new(),
        }
    }

    /// Serialize a node and its subtree back to XML text
    ///
    /// Walks with an explicit stack, so nesting depth is not limited by the
    /// call stack.
    pub fn node_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![Visit::Open(id)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Open(node_id) => self.write_open(node_id, &mut out, &mut stack),
                Visit::Close(node_id) => {
                    out.push_str("</");
                    out.push_str(self.node_name(node_id).unwrap_or_default());
                    out.push('>');
                }
            }
        }
        out
    }

    /// Write a node's own markup; children and the end tag go on the stack
    fn write_open(&self, id: NodeId, out: &mut String, stack: &mut Vec<Visit>) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let value = || self.strings.get(node.value_id).unwrap_or_default();

        match node.kind {
            NodeKind::Document => self.push_visits_reversed(id, stack),
            NodeKind::Element => {
                out.push('<');
                out.push_str(self.strings.get(node.name_id).unwrap_or_default());
                for (attr_name, attr_value) in self.attribute_entries(id) {
                    out.push(' ');
                    out.push_str(attr_name);
                    out.push_str("=\"");
                    out.push_str(&encode_attribute(attr_value));
                    out.push('"');
                }
                if !node.has_children() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                stack.push(Visit::Close(id));
                self.push_visits_reversed(id, stack);
            }
            NodeKind::Text => out.push_str(&encode_text(value())),
            NodeKind::CData => {
                out.push_str("<![CDATA[");
                out.push_str(value());
                out.push_str("]]>");
            }
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(value());
                out.push_str("-->");
            }
            NodeKind::ProcessingInstruction => {
                out.push_str("<?");
                out.push_str(self.strings.get(node.name_id).unwrap_or_default());
                if !value().is_empty() {
                    out.push(' ');
                    out.push_str(value());
                }
                out.push_str("?>");
            }
        }
    }

    fn push_visits_reversed(&self, id: NodeId, stack: &mut Vec<Visit>) {
        let mut child_id = self.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child_id {
            stack.push(Visit::Open(cid));
            child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get root element name
    pub fn root_name(&self) -> Option<&str> {
        self.node_name(self.root_element?)
    }
}

/// Pending serialization work
enum Visit {
    Open(NodeId),
    Close(NodeId),
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Children go on reversed so the first child is visited next
        self.doc.push_children_reversed(current, &mut self.stack);
        Some(current)
    }
}
