//! Arena-backed syntax tree and read-only node handles.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use crate::syntax::NodeKind;

/// Handle to a node inside a [`SyntaxTree`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Arena-stored node payload.
///
/// The generic fields cover every kind; per-kind structure is positional
/// (documented on the [`NodeRef`] accessors) plus the two typed links a
/// position alone cannot disambiguate (type hint and default value).
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) range: TextRange,
    /// Source text of the node, excluding leading trivia.
    pub(crate) text: SmolStr,
    /// Identifier introduced or referenced (class name, member name, `$`-less
    /// variable name, ...).
    pub(crate) name: Option<SmolStr>,
    /// The parser-computed fully qualified form of the name, honoring the
    /// enclosing namespace and `use` clauses.
    pub(crate) resolved_name: Option<SmolStr>,
    /// Operator token, cast target, or `use`-clause kind (`function`/`const`).
    pub(crate) operator: Option<SmolStr>,
    /// Attached doc comment, delimiters included.
    pub(crate) doc: Option<Arc<str>>,
    pub(crate) is_static: bool,
    /// `C::$p` stores `p` in `name` and sets this flag.
    pub(crate) member_is_variable: bool,
    /// Name appears in an extends/implements clause.
    pub(crate) in_base_clause: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) type_hint: Option<NodeId>,
    pub(crate) default_value: Option<NodeId>,
}

/// A parsed document: an immutable arena of nodes plus the source text.
///
/// Built once by a parser adapter (or a test fixture) through
/// [`crate::syntax::SyntaxTreeBuilder`]; afterwards shared read-only.
#[derive(Debug)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) source: Option<Arc<str>>,
}

impl SyntaxTree {
    /// The root node (always present; an empty document is a bare root).
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        debug_assert!(id.index() < self.nodes.len());
        NodeRef { tree: self, id }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The deepest node whose range contains `offset`.
    pub fn node_at_offset(&self, offset: TextSize) -> Option<NodeRef<'_>> {
        let mut current = self.root();
        if !current.range().contains_inclusive(offset) {
            return None;
        }
        loop {
            // Zero-width ranges are unpositioned fixture nodes; skip them.
            let next = current.children().find(|child| {
                !child.range().is_empty() && child.range().contains_inclusive(offset)
            });
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }
}

/// A read-only handle pairing a tree with a node id.
///
/// All navigation the resolver performs goes through this type: parent and
/// ancestor walks, ordered children, previous siblings, and the typed
/// accessors for well-known child positions.
#[derive(Copy, Clone)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    #[inline]
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    pub fn text(&self) -> &'t str {
        &self.data().text
    }

    pub fn name(&self) -> Option<&'t str> {
        self.data().name.as_deref()
    }

    pub fn resolved_name(&self) -> Option<&'t str> {
        self.data().resolved_name.as_deref()
    }

    pub fn operator(&self) -> Option<&'t str> {
        self.data().operator.as_deref()
    }

    pub fn doc_comment(&self) -> Option<&'t str> {
        self.data().doc.as_deref()
    }

    pub fn is_static(&self) -> bool {
        self.data().is_static
    }

    pub fn member_is_variable(&self) -> bool {
        self.data().member_is_variable
    }

    pub fn in_base_clause(&self) -> bool {
        self.data().in_base_clause
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + '_ {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    pub fn child(&self, n: usize) -> Option<NodeRef<'t>> {
        self.data().children.get(n).map(|&id| self.tree.node(id))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Ancestors from the parent outwards, root last.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Nearest ancestor with the given kind.
    pub fn ancestor_of_kind(&self, kind: NodeKind) -> Option<NodeRef<'t>> {
        self.ancestors().find(|a| a.kind() == kind)
    }

    /// Nearest ancestor matching the predicate.
    pub fn ancestor_where(
        &self,
        pred: impl Fn(NodeKind) -> bool,
    ) -> Option<NodeRef<'t>> {
        self.ancestors().find(|a| pred(a.kind()))
    }

    /// Preceding siblings, nearest first.
    pub fn prev_siblings(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        let id = self.id;
        let siblings: &[NodeId] = self
            .parent()
            .map(|p| p.data().children.as_slice())
            .unwrap_or(&[]);
        let position = siblings.iter().position(|&c| c == id).unwrap_or(0);
        siblings[..position]
            .iter()
            .rev()
            .map(move |&sib| tree.node(sib))
    }

    /// The declared type hint of a parameter, or the return-type hint of a
    /// function-like declaration.
    pub fn type_hint(&self) -> Option<NodeRef<'t>> {
        self.data().type_hint.map(|id| self.tree.node(id))
    }

    /// The default-value expression of a parameter.
    pub fn default_value(&self) -> Option<NodeRef<'t>> {
        self.data().default_value.map(|id| self.tree.node(id))
    }

    // ------------------------------------------------------------------
    // Positional accessors for well-known kinds
    // ------------------------------------------------------------------

    /// Callee of a `CallExpression` (child 0).
    pub fn callee(&self) -> Option<NodeRef<'t>> {
        debug_assert_eq!(self.kind(), NodeKind::CallExpression);
        self.child(0)
    }

    /// Dereferenced object of a `MemberAccessExpression` (child 0).
    pub fn object_expression(&self) -> Option<NodeRef<'t>> {
        debug_assert_eq!(self.kind(), NodeKind::MemberAccessExpression);
        self.child(0)
    }

    /// Scope qualifier of a `ScopedPropertyAccessExpression` (child 0).
    pub fn qualifier(&self) -> Option<NodeRef<'t>> {
        debug_assert_eq!(self.kind(), NodeKind::ScopedPropertyAccessExpression);
        self.child(0)
    }

    /// Class-name node of an `ObjectCreationExpression` (child 0). An
    /// anonymous class is a nameless `ClassDeclaration` in this position.
    pub fn class_name_node(&self) -> Option<NodeRef<'t>> {
        debug_assert_eq!(self.kind(), NodeKind::ObjectCreationExpression);
        self.child(0)
    }

    /// Left/right operands of binary and assignment expressions.
    pub fn lhs(&self) -> Option<NodeRef<'t>> {
        self.child(0)
    }

    pub fn rhs(&self) -> Option<NodeRef<'t>> {
        self.child(1)
    }

    /// Whether this node sits in callee position of a call.
    pub fn is_call_target(&self) -> bool {
        match self.parent() {
            Some(p) if p.kind() == NodeKind::CallExpression => {
                p.child(0).map(|c| c.id()) == Some(self.id)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.range())
    }
}
