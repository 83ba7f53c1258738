//! Name resolution — from syntax positions to fully qualified names.
//!
//! The resolver is total: every entry point returns a value, and anything
//! it cannot make sense of degrades to `None` (or `Mixed` on the type
//! side). No error crosses this boundary.
//!
//! Three questions are answered here:
//!
//! 1. [`SemanticResolver::defined_fqn`] - what FQN does a declaration
//!    introduce?
//! 2. [`SemanticResolver::reference_fqn`] - what FQN does a reference
//!    target?
//! 3. [`SemanticResolver::variable_definition`] - which local node
//!    introduced a variable name?
//!
//! Reference resolution is mutually recursive with type inference (the
//! `infer` module adds the other half of this impl): resolving `$a->m`
//! needs the type of `$a`, and typing `$a->m` needs the FQN of `m`.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{CancelToken, FileId, Location};
use crate::hir::def::{declaration_line, symbol_kind_for, Definition, SymbolInformation};
use crate::hir::docblock::DocBlock;
use crate::hir::fqn::Fqn;
use crate::hir::index::ReadableIndex;
use crate::hir::types::Type;
use crate::syntax::{NodeKind, NodeRef, SyntaxTree};

/// Resolves names and types against one document and the workspace index.
///
/// Borrows everything read-only; cheap to construct per request.
pub struct SemanticResolver<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) index: &'a dyn ReadableIndex,
    pub(crate) cancel: CancelToken,
}

impl<'a> SemanticResolver<'a> {
    pub fn new(tree: &'a SyntaxTree, index: &'a dyn ReadableIndex) -> Self {
        Self {
            tree,
            index,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token checked at the inference boundary.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    // ==================================================================
    // Name builder
    // ==================================================================

    /// The FQN a declaration node introduces, or `None` for anonymous
    /// declarations and non-declaration nodes.
    pub fn defined_fqn(&self, node: NodeRef<'a>) -> Option<Fqn> {
        match node.kind() {
            NodeKind::ClassDeclaration
            | NodeKind::InterfaceDeclaration
            | NodeKind::TraitDeclaration => {
                self.namespaced_name(node).map(Fqn::new)
            }
            NodeKind::NamespaceDefinition => node.name().map(Fqn::new),
            NodeKind::FunctionDeclaration => {
                Some(Fqn::function(&self.namespaced_name(node)?))
            }
            NodeKind::MethodDeclaration => {
                let class = self.enclosing_class_fqn(node)?;
                Some(Fqn::method(class.as_str(), node.name()?, node.is_static()))
            }
            NodeKind::Variable => {
                // Property elements only; free variables have no FQN.
                let decl = node
                    .parent()
                    .filter(|p| p.kind() == NodeKind::PropertyDeclaration)?;
                let class = self.enclosing_class_fqn(node)?;
                Some(Fqn::property(
                    class.as_str(),
                    node.name()?,
                    decl.is_static() || node.is_static(),
                ))
            }
            NodeKind::ConstElement => {
                let decl = node.parent()?;
                match decl.kind() {
                    NodeKind::ClassConstDeclaration => {
                        let class = self.enclosing_class_fqn(node)?;
                        Some(Fqn::class_constant(class.as_str(), node.name()?))
                    }
                    NodeKind::ConstDeclaration => {
                        self.namespaced_name(node).map(Fqn::new)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // ==================================================================
    // Reference resolver
    // ==================================================================

    /// The FQN a reference node targets.
    ///
    /// Dispatch is on the node's syntactic position, first match wins:
    /// `$this`, qualified names (including `use`-clause parts), member
    /// access, constant fetches, scoped access. Plain `$variables` are
    /// local and yield `None`; callers go through
    /// [`Self::variable_definition`] for those.
    pub fn reference_fqn(&self, node: NodeRef<'a>) -> Option<Fqn> {
        let fqn = match node.kind() {
            NodeKind::Variable => {
                if node.name() == Some("this") {
                    self.enclosing_class_fqn(node)
                } else {
                    None
                }
            }
            NodeKind::QualifiedName => self.qualified_name_fqn(node),
            NodeKind::MemberAccessExpression => self.member_access_fqn(node),
            NodeKind::ScopedPropertyAccessExpression => self.scoped_access_fqn(node),
            NodeKind::CallExpression => {
                let callee = node.callee()?;
                match callee.kind() {
                    NodeKind::QualifiedName => self.qualified_name_fqn(callee),
                    NodeKind::MemberAccessExpression => self.member_access_fqn(callee),
                    NodeKind::ScopedPropertyAccessExpression => {
                        self.scoped_access_fqn(callee)
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        trace!(target: "phoxide::resolve", ?fqn, kind = ?node.kind(), "reference_fqn");
        fqn
    }

    /// Case 2: a qualified name, possibly a part inside a `use` clause.
    fn qualified_name_fqn(&self, node: NodeRef<'a>) -> Option<Fqn> {
        // Squash name parts to the outermost qualified name.
        let mut node = node;
        while let Some(parent) = node
            .parent()
            .filter(|p| p.kind() == NodeKind::QualifiedName)
        {
            node = parent;
        }

        let raw = self.raw_name(node)?;

        // Names inside use clauses resolve against the clause itself, not
        // the enclosing namespace.
        if let Some(group) = node.ancestor_of_kind(NodeKind::NamespaceUseGroupClause) {
            let use_decl = node.ancestor_of_kind(NodeKind::NamespaceUseDeclaration)?;
            let prefix = use_decl
                .children()
                .find(|c| c.kind() == NodeKind::QualifiedName)
                .and_then(|c| self.raw_name(c))?;
            let mut name = format!("{prefix}\\{raw}");
            if Self::is_function_use(group) || Self::is_function_use(use_decl) {
                name.push_str("()");
            }
            return Some(Fqn::new(name));
        }
        if let Some(use_decl) = node.ancestor_of_kind(NodeKind::NamespaceUseDeclaration) {
            // The prefix of a group use names a namespace, not the imported
            // symbol; only ungrouped clauses take the call suffix.
            let grouped = use_decl
                .children()
                .any(|c| c.kind() == NodeKind::NamespaceUseGroupClause);
            let mut name = raw.to_string();
            if !grouped && Self::is_function_use(use_decl) {
                name.push_str("()");
            }
            return Some(Fqn::new(name));
        }

        let mut name = node
            .resolved_name()
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string());
        if node.is_call_target() {
            name.push_str("()");
        }
        Some(Fqn::new(name))
    }

    /// Case 3: `$a->m` and `$a->m(...)`.
    fn member_access_fqn(&self, access: NodeRef<'a>) -> Option<Fqn> {
        let object = access.object_expression()?;
        let member = access.name()?;

        let object_type = self.type_of_expression(object);
        let picked = match &object_type {
            Type::Compound(parts) => parts.iter().find(|t| {
                matches!(
                    t,
                    Type::This | Type::Object { .. } | Type::StaticTy | Type::SelfTy
                )
            })?,
            other => other,
        };

        let class = match picked {
            Type::This | Type::StaticTy | Type::SelfTy => self.enclosing_class_fqn(access)?,
            Type::Object { fqsen: Some(fqn) } => fqn.clone(),
            _ => return None,
        };

        let suffix = if access.is_call_target() {
            format!("->{member}()")
        } else {
            format!("->{member}")
        };
        Some(self.walk_inheritance(class, &[suffix]))
    }

    /// Case 5: `C::m`, `C::$p`, `C::CONST` and the call forms.
    fn scoped_access_fqn(&self, scoped: NodeRef<'a>) -> Option<Fqn> {
        let qualifier = scoped.qualifier()?;
        let member = scoped.name()?;

        let class = match qualifier.kind() {
            NodeKind::QualifiedName => {
                let word = self.raw_name(qualifier)?;
                if word.eq_ignore_ascii_case("self") || word.eq_ignore_ascii_case("static") {
                    self.enclosing_class_fqn(scoped)?
                } else if word.eq_ignore_ascii_case("parent") {
                    self.enclosing_class_base(scoped)?
                } else {
                    match qualifier.resolved_name() {
                        Some(resolved) => Fqn::from_fqsen(resolved),
                        None => Fqn::new(
                            self.namespaced_name(qualifier)
                                .unwrap_or_else(|| word.to_string()),
                        ),
                    }
                }
            }
            // Dynamic qualifier, e.g. `$class::method()`: only resolvable
            // when inference pins the object class.
            _ => match self.type_of_expression(qualifier) {
                Type::Object { fqsen: Some(fqn) } => fqn,
                _ => return None,
            },
        };

        let is_call = scoped.is_call_target();
        let suffixes: Vec<String> = if scoped.member_is_variable() {
            vec![format!("::${member}")]
        } else if is_call {
            // Static-call syntax may land on an instance method further up
            // the chain (`B::m()` hitting `A->m()`), so both shapes are
            // candidates.
            vec![format!("::{member}()"), format!("->{member}()")]
        } else {
            vec![format!("::{member}")]
        };
        Some(self.walk_inheritance(class, &suffixes))
    }

    /// Chase `extends` until one candidate shape hits the index. Misses
    /// return the candidate built from the starting class so a later index
    /// update can fill it in.
    fn walk_inheritance(&self, class: Fqn, suffixes: &[String]) -> Fqn {
        let initial = Fqn::new(format!("{}{}", class, suffixes[0]));
        let mut queue: VecDeque<Fqn> = VecDeque::from([class]);
        let mut seen: FxHashSet<Fqn> = FxHashSet::default();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for suffix in suffixes {
                let candidate = Fqn::new(format!("{current}{suffix}"));
                if self.index.definition(candidate.as_str()).is_some() {
                    return candidate;
                }
            }
            if let Some(class_def) = self.index.definition(current.as_str()) {
                queue.extend(class_def.extends.iter().cloned());
            }
        }
        initial
    }

    // ==================================================================
    // Variable scope resolver
    // ==================================================================

    /// The node that introduces a local variable: a parameter, a closure
    /// capture, or the `=`-assignment that first gave it a value. The walk
    /// never leaks past the enclosing function boundary except through
    /// captures.
    pub fn variable_definition(&self, variable: NodeRef<'a>) -> Option<NodeRef<'a>> {
        let name = variable.name()?;
        self.resolve_variable_from(variable, name)
    }

    pub(crate) fn resolve_variable_from(
        &self,
        start: NodeRef<'a>,
        name: &str,
    ) -> Option<NodeRef<'a>> {
        let mut current = start;
        loop {
            for sibling in current.prev_siblings() {
                let expr = if sibling.kind() == NodeKind::ExpressionStatement {
                    match sibling.child(0) {
                        Some(inner) => inner,
                        None => continue,
                    }
                } else {
                    sibling
                };
                if expr.kind() == NodeKind::AssignmentExpression
                    && expr.operator().map_or(false, |op| op == "=")
                    && expr
                        .lhs()
                        .is_some_and(|l| l.kind() == NodeKind::Variable && l.name() == Some(name))
                {
                    return Some(expr);
                }
            }

            let parent = current.parent()?;
            if parent.kind().is_function_like() {
                for child in parent.children() {
                    if child.kind() == NodeKind::Parameter && child.name() == Some(name) {
                        return Some(child);
                    }
                    if parent.kind() == NodeKind::AnonymousFunctionCreationExpression
                        && child.kind() == NodeKind::UseVariableName
                        && child.name() == Some(name)
                    {
                        return Some(child);
                    }
                }
                return None;
            }
            current = parent;
        }
    }

    // ==================================================================
    // Enclosing-scope lookups
    // ==================================================================

    /// FQN of the nearest class-like ancestor, `None` for anonymous
    /// classes and free code.
    pub(crate) fn enclosing_class_fqn(&self, node: NodeRef<'a>) -> Option<Fqn> {
        let class = node.ancestor_where(NodeKind::is_class_like)?;
        class.name()?;
        self.namespaced_name(class).map(Fqn::new)
    }

    /// The base class of the nearest class-like ancestor, resolved.
    pub(crate) fn enclosing_class_base(&self, node: NodeRef<'a>) -> Option<Fqn> {
        let class = node.ancestor_where(NodeKind::is_class_like)?;
        self.base_fqns(class).into_iter().next()
    }

    /// Resolved names in a class-like's extends/implements clause.
    pub(crate) fn base_fqns(&self, class: NodeRef<'a>) -> Vec<Fqn> {
        class
            .children()
            .filter(|c| c.kind() == NodeKind::QualifiedName && c.in_base_clause())
            .filter_map(|c| {
                c.resolved_name()
                    .map(Fqn::new)
                    .or_else(|| self.raw_name(c).map(Fqn::new))
            })
            .collect()
    }

    /// Resolve §4.7: a class-name node in instantiation or scope position.
    pub(crate) fn class_node_type(&self, node: NodeRef<'a>) -> Type {
        match node.kind() {
            NodeKind::QualifiedName => {
                let Some(word) = self.raw_name(node) else {
                    return Type::Mixed;
                };
                if word.eq_ignore_ascii_case("static") {
                    Type::StaticTy
                } else if word.eq_ignore_ascii_case("self") {
                    match self.enclosing_class_fqn(node) {
                        Some(fqn) => Type::object(fqn),
                        None => Type::anonymous_object(),
                    }
                } else if word.eq_ignore_ascii_case("parent") {
                    match self.enclosing_class_base(node) {
                        Some(fqn) => Type::object(fqn),
                        None => Type::anonymous_object(),
                    }
                } else {
                    let name = node
                        .resolved_name()
                        .map(str::to_string)
                        .or_else(|| self.namespaced_name(node))
                        .unwrap_or_else(|| word.to_string());
                    Type::object(Fqn::from_fqsen(&name))
                }
            }
            // `new class { ... }`
            NodeKind::ClassDeclaration => Type::anonymous_object(),
            // Dynamic expression qualifier.
            _ => Type::Mixed,
        }
    }

    /// The namespaced form of a declaration or reference name: the parser's
    /// resolved name when present, otherwise the enclosing namespace joined
    /// with the node's own name.
    pub(crate) fn namespaced_name(&self, node: NodeRef<'a>) -> Option<String> {
        if let Some(resolved) = node.resolved_name() {
            return Some(resolved.to_string());
        }
        let name = self.raw_name(node)?;
        match self.enclosing_namespace(node) {
            Some(ns) if !ns.is_empty() => Some(format!("{ns}\\{name}")),
            _ => Some(name.to_string()),
        }
    }

    /// Name of the enclosing namespace: a `namespace` ancestor (braced
    /// form) or the closest preceding `namespace` statement (script form).
    pub(crate) fn enclosing_namespace(&self, node: NodeRef<'a>) -> Option<SmolStr> {
        if let Some(ns) = node.ancestor_of_kind(NodeKind::NamespaceDefinition) {
            return ns.name().map(SmolStr::new);
        }
        let mut current = node;
        loop {
            for sibling in current.prev_siblings() {
                if sibling.kind() == NodeKind::NamespaceDefinition {
                    return sibling.name().map(SmolStr::new);
                }
            }
            current = current.parent()?;
        }
    }

    fn raw_name(&self, node: NodeRef<'a>) -> Option<&'a str> {
        match node.name() {
            Some(name) if !name.is_empty() => Some(name),
            _ => match node.text() {
                "" => None,
                text => Some(text),
            },
        }
    }

    fn is_function_use(node: NodeRef<'a>) -> bool {
        node.operator() == Some("function")
    }

    // ==================================================================
    // Definition builder
    // ==================================================================

    /// Package a declaration node into a [`Definition`], or `None` when it
    /// introduces no FQN (anonymous declarations, non-declarations).
    pub fn create_definition(&self, node: NodeRef<'a>, file: FileId) -> Option<Definition> {
        let fqn = self.defined_fqn(node)?;

        let doc = self
            .doc_comment_for(node)
            .map(|text| DocBlock::parse(text));
        let documentation = doc.as_ref().and_then(|d| d.summary.clone());

        let ty = match node.kind() {
            NodeKind::ClassDeclaration
            | NodeKind::InterfaceDeclaration
            | NodeKind::TraitDeclaration => Type::object(fqn.clone()),
            _ => self.type_from_node(node).unwrap_or(Type::Mixed),
        };

        let extends = match node.kind() {
            NodeKind::ClassDeclaration => {
                self.base_fqns(node).into_iter().take(1).collect()
            }
            NodeKind::InterfaceDeclaration => self.base_fqns(node),
            _ => Vec::new(),
        };

        let is_static = match node.kind() {
            NodeKind::MethodDeclaration => node.is_static(),
            NodeKind::Variable => {
                node.is_static()
                    || node.parent().is_some_and(|p| p.is_static())
            }
            _ => false,
        };

        let location = Location::new(file, node.range());
        Some(Definition {
            is_class: node.kind() == NodeKind::ClassDeclaration,
            is_global: !fqn.has_member(),
            is_static,
            extends,
            ty,
            declaration_line: declaration_line(node),
            documentation,
            symbol: SymbolInformation {
                name: SmolStr::new(fqn.simple_name()),
                kind: symbol_kind_for(node),
                container_name: fqn.container().map(SmolStr::new),
                location: Some(location),
            },
            fqn,
        })
    }

    /// A node's doc comment, falling back to the enclosing declaration for
    /// property and const elements.
    pub(crate) fn doc_comment_for(&self, node: NodeRef<'a>) -> Option<&'a str> {
        node.doc_comment().or_else(|| {
            matches!(node.kind(), NodeKind::Variable | NodeKind::ConstElement)
                .then(|| node.parent().and_then(|p| p.doc_comment()))
                .flatten()
        })
    }
}

/// Whether a qualified name sits in constant-fetch position: used as an
/// expression but not as a callee, class reference, or `instanceof`
/// operand. Callers use this to decide the global-fallback flag.
pub fn is_constant_fetch(node: NodeRef<'_>) -> bool {
    if node.kind() != NodeKind::QualifiedName {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    if parent.kind() != NodeKind::ExpressionStatement && !parent.kind().is_expression() {
        return false;
    }
    match parent.kind() {
        NodeKind::MemberAccessExpression
        | NodeKind::CallExpression
        | NodeKind::ObjectCreationExpression
        | NodeKind::ScopedPropertyAccessExpression
        | NodeKind::AnonymousFunctionCreationExpression => false,
        NodeKind::BinaryExpression if parent.operator() == Some("instanceof") => false,
        _ => true,
    }
}
