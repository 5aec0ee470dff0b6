//! Path-Query Facade
//!
//! Small path engine over [`Document`]:
//! - Absolute and relative child paths
//! - `*`, `text()`, `node()`, `.`
//! - `[n]` position predicates
//! - Final `@name` / `@*` attribute steps
//! - Compiled expression caching
//!
//! The [`PathQuery`] trait is the seam the report accessor queries through,
//! so tests can stand in a fake tree.

pub mod eval;
pub mod lexer;
pub mod parser;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use lru::LruCache;

use crate::dom::{Document, NodeId, DOCUMENT_NODE};
use crate::error::{LoadError, ParseError, QueryError};
pub use parser::PathExpr;

/// Number of compiled paths kept in the process-wide cache
const PATH_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

static PATH_CACHE: OnceLock<Mutex<LruCache<String, Arc<PathExpr>>>> = OnceLock::new();

/// A query result: a tree node or one attribute of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Node(NodeId),
    /// Owner element and attribute index
    Attribute(NodeId, u16),
}

impl NodeRef {
    /// The node itself, or the element owning the attribute
    pub fn node_id(self) -> NodeId {
        match self {
            NodeRef::Node(id) | NodeRef::Attribute(id, _) => id,
        }
    }

    pub fn is_attribute(self) -> bool {
        matches!(self, NodeRef::Attribute(..))
    }
}

/// Path queries over an immutable tree
///
/// `find_all` returns matches in document order and an empty vector when
/// nothing matches; `QueryError` is reserved for paths that do not parse.
pub trait PathQuery {
    /// Handle for a node in the tree
    type Node: Copy;

    /// The document node, context for absolute paths
    fn document_node(&self) -> Self::Node;

    fn find_all(&self, path: &str, context: Self::Node) -> Result<Vec<Self::Node>, QueryError>;

    /// First match in document order
    fn find_first(&self, path: &str, context: Self::Node) -> Result<Option<Self::Node>, QueryError> {
        Ok(self.find_all(path, context)?.into_iter().next())
    }

    /// String value of the first match
    fn find_first_value(&self, path: &str, context: Self::Node) -> Result<Option<String>, QueryError>;
}

impl PathQuery for Document {
    type Node = NodeRef;

    fn document_node(&self) -> NodeRef {
        NodeRef::Node(DOCUMENT_NODE)
    }

    fn find_all(&self, path: &str, context: NodeRef) -> Result<Vec<NodeRef>, QueryError> {
        let expr = compile(path)?;
        Ok(eval::evaluate(self, &expr, context))
    }

    fn find_first_value(&self, path: &str, context: NodeRef) -> Result<Option<String>, QueryError> {
        Ok(self.find_first(path, context)?.map(|node| self.string_value(node)))
    }
}

impl Document {
    /// String value of a query result
    ///
    /// Attribute value for attributes, concatenated text for elements and
    /// the document node, own value for everything else.
    pub fn string_value(&self, node: NodeRef) -> String {
        match node {
            NodeRef::Node(id) => self.text_content(id),
            NodeRef::Attribute(owner, index) => self
                .attribute_at(owner, index)
                .map(|(_, value)| value.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Parse a path, reusing a cached compilation when available
pub fn compile(path: &str) -> Result<Arc<PathExpr>, QueryError> {
    let cache = PATH_CACHE.get_or_init(|| Mutex::new(LruCache::new(PATH_CACHE_CAPACITY)));

    if let Some(expr) = cache.lock().unwrap_or_else(PoisonError::into_inner).get(path) {
        return Ok(Arc::clone(expr));
    }

    let expr = Arc::new(parser::parse(path).map_err(|message| QueryError::new(path, message))?);
    tracing::trace!(path, "compiled path expression");
    cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .put(path.to_string(), Arc::clone(&expr));
    Ok(expr)
}

/// Parse a standalone XML fragment into a detached tree
pub fn parse_fragment(text: &str) -> Result<Document, ParseError> {
    Document::parse_str(text)
}

/// Read and parse an XML file
pub fn load_document(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    Document::load(path)
}
