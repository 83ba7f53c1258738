//! Construction API for [`SyntaxTree`].
//!
//! A parser adapter drives this builder while walking its own output; test
//! fixtures drive it directly. Nodes are opened and closed like a stack,
//! with setters applying to the innermost open node.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use crate::syntax::tree::{NodeData, NodeId, SyntaxTree};
use crate::syntax::NodeKind;

#[derive(Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    last_closed: Option<NodeId>,
    source: Option<Arc<str>>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the full document text; node ranges index into it.
    pub fn with_source(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Open a new node as a child of the innermost open node.
    pub fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            range: TextRange::empty(TextSize::from(0)),
            text: SmolStr::default(),
            name: None,
            resolved_name: None,
            operator: None,
            doc: None,
            is_static: false,
            member_is_variable: false,
            in_base_clause: false,
            parent,
            children: Vec::new(),
            type_hint: None,
            default_value: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.stack.push(id);
        id
    }

    /// Close the innermost open node.
    ///
    /// A node closed without an explicit range inherits the hull of its
    /// children's ranges, so fixtures only position the nodes they care
    /// about.
    pub fn close(&mut self) -> NodeId {
        let id = self.stack.pop().expect("close() without a matching open()");
        if self.nodes[id.index()].range.is_empty() {
            let hull = self.nodes[id.index()]
                .children
                .iter()
                .map(|c| self.nodes[c.index()].range)
                .filter(|r| !r.is_empty())
                .reduce(|a, b| a.cover(b));
            if let Some(hull) = hull {
                self.nodes[id.index()].range = hull;
            }
        }
        self.last_closed = Some(id);
        id
    }

    /// Open and immediately close a leaf.
    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.open(kind);
        self.close()
    }

    fn current(&mut self) -> &mut NodeData {
        let id = *self.stack.last().expect("no open node");
        &mut self.nodes[id.index()]
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.current().name = Some(SmolStr::new(name));
        self
    }

    pub fn resolved_name(&mut self, name: &str) -> &mut Self {
        self.current().resolved_name = Some(SmolStr::new(name));
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.current().text = SmolStr::new(text);
        self
    }

    pub fn operator(&mut self, op: &str) -> &mut Self {
        self.current().operator = Some(SmolStr::new(op));
        self
    }

    pub fn doc(&mut self, doc: &str) -> &mut Self {
        self.current().doc = Some(Arc::from(doc));
        self
    }

    /// Position the current node at `offset` with `len` bytes.
    pub fn at(&mut self, offset: u32, len: u32) -> &mut Self {
        self.current().range =
            TextRange::at(TextSize::from(offset), TextSize::from(len));
        self
    }

    pub fn set_static(&mut self) -> &mut Self {
        self.current().is_static = true;
        self
    }

    pub fn mark_member_variable(&mut self) -> &mut Self {
        self.current().member_is_variable = true;
        self
    }

    pub fn mark_base_clause(&mut self) -> &mut Self {
        self.current().in_base_clause = true;
        self
    }

    /// Record the most recently closed child as the current node's type hint
    /// (parameter hint or function return hint).
    pub fn mark_last_as_type_hint(&mut self) -> &mut Self {
        let child = self.last_closed.expect("no closed child to mark");
        self.current().type_hint = Some(child);
        self
    }

    /// Record the most recently closed child as the current node's default
    /// value expression.
    pub fn mark_last_as_default(&mut self) -> &mut Self {
        let child = self.last_closed.expect("no closed child to mark");
        self.current().default_value = Some(child);
        self
    }

    pub fn finish(mut self) -> SyntaxTree {
        while !self.stack.is_empty() {
            self.close();
        }
        if self.nodes.is_empty() {
            // An empty document still has a root.
            self.open(NodeKind::SourceFile);
            self.close();
        }
        SyntaxTree {
            nodes: self.nodes,
            source: self.source,
        }
    }
}
