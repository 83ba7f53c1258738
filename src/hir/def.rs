//! Definition records.
//!
//! A [`Definition`] describes one defined symbol. Definitions are owned by
//! the index and reference each other only by FQN string, never by pointer,
//! so the index stays acyclic and snapshots are cheap.

use smol_str::SmolStr;

use crate::base::Location;
use crate::hir::fqn::Fqn;
use crate::hir::types::Type;
use crate::syntax::{NodeKind, NodeRef};

/// What kind of symbol a definition names, for symbol listings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Class,
    Interface,
    Trait,
    Function,
    Method,
    Property,
    Constant,
    Variable,
}

impl SymbolKind {
    pub fn display(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Trait => "trait",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
            SymbolKind::Constant => "constant",
            SymbolKind::Variable => "variable",
        }
    }
}

/// The symbol-information payload feature handlers return to clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInformation {
    /// Simple name, undecorated.
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// Owning class for members, enclosing namespace otherwise.
    pub container_name: Option<SmolStr>,
    pub location: Option<Location>,
}

/// A defined symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    /// Exactly the output of the name builder on the declaration node.
    pub fqn: Fqn,
    /// True for class declarations only; interfaces and traits cannot be
    /// instantiated.
    pub is_class: bool,
    /// Namespace-level symbol (no member part in the FQN).
    pub is_global: bool,
    pub is_static: bool,
    /// Base class (at most one) for classes; extended interfaces for
    /// interfaces. Empty otherwise.
    pub extends: Vec<Fqn>,
    /// Declared or inferred type; the return type for callables.
    pub ty: Type,
    /// The declaration as a single display line.
    pub declaration_line: String,
    /// Doc-comment summary.
    pub documentation: Option<String>,
    pub symbol: SymbolInformation,
}

impl Definition {
    /// Whether `new` on this symbol is meaningful. Derived, not stored.
    pub fn can_be_instantiated(&self) -> bool {
        self.is_class
    }
}

/// Map a declaration node to its symbol kind.
pub(crate) fn symbol_kind_for(node: NodeRef<'_>) -> SymbolKind {
    match node.kind() {
        NodeKind::ClassDeclaration => SymbolKind::Class,
        NodeKind::InterfaceDeclaration => SymbolKind::Interface,
        NodeKind::TraitDeclaration => SymbolKind::Trait,
        NodeKind::NamespaceDefinition => SymbolKind::Namespace,
        NodeKind::FunctionDeclaration => SymbolKind::Function,
        NodeKind::MethodDeclaration => SymbolKind::Method,
        NodeKind::ConstElement => SymbolKind::Constant,
        NodeKind::Variable => SymbolKind::Property,
        _ => SymbolKind::Variable,
    }
}

/// Reconstruct the single-line form of a declaration.
///
/// Multi-element declarations (`public $a, $b, $c;`) are re-spliced so only
/// the requested element shows (`public $b;`); everything else uses the
/// node's own text. The result is cut at the first newline.
pub(crate) fn declaration_line(node: NodeRef<'_>) -> String {
    let spliced = match node.kind() {
        NodeKind::Variable | NodeKind::ConstElement => node
            .parent()
            .filter(|p| {
                matches!(
                    p.kind(),
                    NodeKind::PropertyDeclaration
                        | NodeKind::ConstDeclaration
                        | NodeKind::ClassConstDeclaration
                )
            })
            .and_then(|decl| splice_element(decl, node)),
        _ => None,
    };
    let text = spliced.unwrap_or_else(|| node.text().to_string());
    match text.find('\n') {
        Some(at) => text[..at].trim_end().to_string(),
        None => text,
    }
}

/// Replace a declaration's element list with a single element's text.
fn splice_element(decl: NodeRef<'_>, element: NodeRef<'_>) -> Option<String> {
    let decl_text = decl.text();
    if decl_text.is_empty() || decl.range().is_empty() {
        return None;
    }
    let elements: Vec<NodeRef<'_>> = decl
        .children()
        .filter(|c| c.kind() == element.kind() && !c.range().is_empty())
        .collect();
    let first = elements.first()?;
    let last = elements.last()?;
    let list = first.range().cover(last.range());

    let decl_start = decl.range().start();
    if list.start() < decl_start {
        return None;
    }
    let a = usize::from(list.start() - decl_start);
    let b = usize::from(list.end() - decl_start);
    if a > b || b > decl_text.len() {
        return None;
    }
    Some(format!(
        "{}{}{}",
        &decl_text[..a],
        element.text(),
        &decl_text[b..]
    ))
}
