//! Type inference — symbolic expression and declaration typing.
//!
//! Everything here returns `Mixed` when nothing stronger can be proven.
//! Inference recurses through member lookups and variable definitions, so
//! it is bounded: past [`MAX_DEPTH`] frames the answer is `Mixed`, and an
//! observed cancellation short-circuits the same way.

use crate::hir::docblock::DocBlock;
use crate::hir::fqn::Fqn;
use crate::hir::resolve::{is_constant_fetch, SemanticResolver};
use crate::hir::types::Type;
use crate::syntax::{NodeKind, NodeRef};

/// Recursion bound for expression inference.
pub(crate) const MAX_DEPTH: u32 = 64;

impl<'a> SemanticResolver<'a> {
    /// The symbolic type an expression evaluates to.
    pub fn type_of_expression(&self, node: NodeRef<'a>) -> Type {
        self.infer_expr(node, 0)
    }

    /// Declaration typing: parameters, callables, properties, constants,
    /// and assignments. `None` for nodes that declare nothing.
    pub fn type_from_node(&self, node: NodeRef<'a>) -> Option<Type> {
        self.infer_decl(node, 0)
    }

    pub(crate) fn infer_expr(&self, node: NodeRef<'a>, depth: u32) -> Type {
        if self.cancel.is_cancelled() || depth > MAX_DEPTH {
            return Type::Mixed;
        }
        let depth = depth + 1;

        match node.kind() {
            NodeKind::Variable => self.variable_type(node, depth),

            NodeKind::CallExpression => {
                let Some(callee) = node.callee() else {
                    return Type::Mixed;
                };
                match callee.kind() {
                    NodeKind::QualifiedName => {
                        let Some(fqn) = self.reference_fqn(callee) else {
                            return Type::Mixed;
                        };
                        self.index
                            .definition_or_global(fqn.as_str(), true)
                            .map(|def| def.ty.clone())
                            .unwrap_or(Type::Mixed)
                    }
                    NodeKind::MemberAccessExpression => self.member_type(callee, true, depth),
                    NodeKind::ScopedPropertyAccessExpression => {
                        self.scoped_type(callee, true, depth)
                    }
                    _ => Type::Mixed,
                }
            }

            NodeKind::QualifiedName => {
                if let Some(word) = node.name().or(Some(node.text())) {
                    if word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false") {
                        return Type::Boolean;
                    }
                }
                if is_constant_fetch(node) {
                    if let Some(fqn) = self.reference_fqn(node) {
                        return self
                            .index
                            .definition_or_global(fqn.as_str(), true)
                            .map(|def| def.ty.clone())
                            .unwrap_or(Type::Mixed);
                    }
                }
                Type::Mixed
            }

            NodeKind::MemberAccessExpression => self.member_type(node, false, depth),
            NodeKind::ScopedPropertyAccessExpression => self.scoped_type(node, false, depth),

            NodeKind::ObjectCreationExpression => match node.class_name_node() {
                Some(class) => self.class_node_type(class),
                None => Type::Mixed,
            },

            NodeKind::CloneExpression => match node.child(0) {
                Some(inner) => self.infer_expr(inner, depth),
                None => Type::Mixed,
            },

            NodeKind::AssignmentExpression => self.assignment_type(node, depth),

            NodeKind::TernaryExpression => {
                let parts: Vec<NodeRef<'a>> = node.children().collect();
                match parts.as_slice() {
                    // a ? b : c
                    [_, then, otherwise] => Type::compound(vec![
                        self.infer_expr(*then, depth),
                        self.infer_expr(*otherwise, depth),
                    ]),
                    // a ?: c
                    [cond, otherwise] => Type::compound(vec![
                        self.infer_expr(*cond, depth),
                        self.infer_expr(*otherwise, depth),
                    ]),
                    _ => Type::Mixed,
                }
            }

            NodeKind::BinaryExpression => self.binary_type(node, depth),

            NodeKind::UnaryOpExpression => match node.operator() {
                Some("!") => Type::Boolean,
                _ => Type::Mixed,
            },

            NodeKind::CastExpression => {
                let target = node.operator().unwrap_or_default();
                match target.to_ascii_lowercase().as_str() {
                    "bool" | "boolean" => Type::Boolean,
                    "string" => Type::String,
                    "double" | "float" | "real" => Type::Float,
                    "int" | "integer" => Type::Integer,
                    _ => Type::Mixed,
                }
            }

            NodeKind::IssetIntrinsicExpression | NodeKind::EmptyIntrinsicExpression => {
                Type::Boolean
            }

            NodeKind::StringLiteral => Type::String,

            NodeKind::NumericLiteral => {
                let text = node.text();
                let is_float = !text.starts_with("0x")
                    && !text.starts_with("0X")
                    && text.contains(|c| matches!(c, '.' | 'e' | 'E'));
                if is_float {
                    Type::Float
                } else {
                    Type::Integer
                }
            }

            NodeKind::ArrayCreationExpression => self.array_literal_type(node, depth),

            NodeKind::SubscriptExpression => {
                let Some(base) = node.child(0) else {
                    return Type::Mixed;
                };
                match self.infer_expr(base, depth) {
                    Type::Array {
                        value: Some(value), ..
                    } => *value,
                    _ => Type::Mixed,
                }
            }

            _ => Type::Mixed,
        }
    }

    fn variable_type(&self, node: NodeRef<'a>, depth: u32) -> Type {
        if node.name() == Some("this") {
            return Type::This;
        }
        match self.variable_definition(node) {
            Some(def) => self.infer_decl(def, depth).unwrap_or(Type::Mixed),
            None => Type::Mixed,
        }
    }

    /// Member access typing: widen the object type to a compound and return
    /// the first component whose member FQN is in the index.
    fn member_type(&self, access: NodeRef<'a>, is_call: bool, depth: u32) -> Type {
        let Some(object) = access.object_expression() else {
            return Type::Mixed;
        };
        let Some(member) = access.name() else {
            return Type::Mixed;
        };

        let object_type = self.infer_expr(object, depth);
        for component in object_type.components() {
            let class = match component {
                Type::This | Type::SelfTy | Type::StaticTy => {
                    match self.enclosing_class_fqn(access) {
                        Some(fqn) => fqn,
                        None => continue,
                    }
                }
                Type::Object { fqsen: Some(fqn) } => fqn.clone(),
                _ => continue,
            };
            let fqn = if is_call {
                Fqn::method(class.as_str(), member, false)
            } else {
                Fqn::property(class.as_str(), member, false)
            };
            if let Some(def) = self.index.definition(fqn.as_str()) {
                return def.ty.clone();
            }
        }
        Type::Mixed
    }

    /// Scoped access typing. `Mixed` when the qualifier is dynamic.
    fn scoped_type(&self, scoped: NodeRef<'a>, is_call: bool, depth: u32) -> Type {
        let Some(qualifier) = scoped.qualifier() else {
            return Type::Mixed;
        };
        let Some(member) = scoped.name() else {
            return Type::Mixed;
        };

        let class_type = match qualifier.kind() {
            NodeKind::QualifiedName | NodeKind::ClassDeclaration => {
                self.class_node_type(qualifier)
            }
            _ => self.infer_expr(qualifier, depth),
        };
        let class = match class_type {
            Type::Object { fqsen: Some(fqn) } => fqn,
            Type::StaticTy => match self.enclosing_class_fqn(scoped) {
                Some(fqn) => fqn,
                None => return Type::Mixed,
            },
            _ => return Type::Mixed,
        };

        let fqn = if scoped.member_is_variable() {
            Fqn::property(class.as_str(), member, true)
        } else if is_call {
            Fqn::method(class.as_str(), member, true)
        } else {
            Fqn::class_constant(class.as_str(), member)
        };
        self.index
            .definition(fqn.as_str())
            .map(|def| def.ty.clone())
            .unwrap_or(Type::Mixed)
    }

    fn assignment_type(&self, node: NodeRef<'a>, depth: u32) -> Type {
        match node.operator() {
            Some(".=") => Type::String,
            Some("+=" | "-=" | "*=" | "**=") => {
                let lhs = node.lhs().map(|n| self.infer_expr(n, depth));
                let rhs = node.rhs().map(|n| self.infer_expr(n, depth));
                arithmetic_type(lhs, rhs)
            }
            _ => match node.rhs() {
                Some(rhs) => self.infer_expr(rhs, depth),
                None => Type::Mixed,
            },
        }
    }

    fn binary_type(&self, node: NodeRef<'a>, depth: u32) -> Type {
        let Some(op) = node.operator() else {
            return Type::Mixed;
        };
        match op {
            "??" => {
                let lhs = node.lhs().map(|n| self.infer_expr(n, depth));
                let rhs = node.rhs().map(|n| self.infer_expr(n, depth));
                Type::compound(lhs.into_iter().chain(rhs).collect())
            }
            "&&" | "||" | "and" | "or" | "xor" | "instanceof" | "==" | "===" | "!=" | "!=="
            | "<>" | "<" | ">" | "<=" | ">=" => Type::Boolean,
            "." => Type::String,
            "+" | "-" | "*" | "**" => {
                let lhs = node.lhs().map(|n| self.infer_expr(n, depth));
                let rhs = node.rhs().map(|n| self.infer_expr(n, depth));
                arithmetic_type(lhs, rhs)
            }
            "&" | "|" | "^" | "<=>" => Type::Integer,
            _ => Type::Mixed,
        }
    }

    /// Array literal: value and key types union independently; elements
    /// without a key contribute `Integer` keys.
    fn array_literal_type(&self, node: NodeRef<'a>, depth: u32) -> Type {
        let mut value_types = Vec::new();
        let mut key_types = Vec::new();
        for element in node
            .children()
            .filter(|c| c.kind() == NodeKind::ArrayElement)
        {
            match (element.child(0), element.child(1)) {
                (Some(key), Some(value)) => {
                    key_types.push(self.infer_expr(key, depth));
                    value_types.push(self.infer_expr(value, depth));
                }
                (Some(value), None) => {
                    key_types.push(Type::Integer);
                    value_types.push(self.infer_expr(value, depth));
                }
                _ => {}
            }
        }
        let value = (!value_types.is_empty()).then(|| Type::compound(value_types));
        let key = (!key_types.is_empty()).then(|| Type::compound(key_types));
        Type::array_of(value, key)
    }

    // ==================================================================
    // Declaration typing
    // ==================================================================

    pub(crate) fn infer_decl(&self, node: NodeRef<'a>, depth: u32) -> Option<Type> {
        if self.cancel.is_cancelled() || depth > MAX_DEPTH {
            return Some(Type::Mixed);
        }
        let depth = depth + 1;

        match node.kind() {
            NodeKind::Parameter => Some(self.parameter_type(node, depth)),

            NodeKind::FunctionDeclaration
            | NodeKind::MethodDeclaration
            | NodeKind::AnonymousFunctionCreationExpression => {
                // Doc block wins, then the syntactic return hint. The body
                // is never inspected.
                if let Some(ty) = self.doc_tag_type(node, |doc| doc.return_tag(), node) {
                    return Some(ty);
                }
                match node.type_hint() {
                    Some(hint) => Some(self.hint_type(hint)),
                    None => Some(Type::Mixed),
                }
            }

            NodeKind::Variable | NodeKind::ConstElement => {
                if let Some(ty) = self.doc_tag_type(node, |doc| doc.var_tag(), node) {
                    return Some(ty);
                }
                let initializer = node
                    .default_value()
                    .or_else(|| node.children().find(|c| c.kind().is_expression()));
                match initializer {
                    Some(expr) => Some(self.infer_expr(expr, depth)),
                    None => Some(Type::Mixed),
                }
            }

            NodeKind::AssignmentExpression => {
                if let Some(ty) = self.doc_tag_type(node, |doc| doc.var_tag(), node) {
                    return Some(ty);
                }
                Some(self.assignment_type(node, depth))
            }

            NodeKind::UseVariableName => {
                // A closure capture types as the captured outer variable.
                let name = node.name()?;
                let closure = node.ancestor_of_kind(
                    NodeKind::AnonymousFunctionCreationExpression,
                )?;
                match self.resolve_variable_from(closure, name) {
                    Some(def) => self.infer_decl(def, depth),
                    None => Some(Type::Mixed),
                }
            }

            _ => None,
        }
    }

    fn parameter_type(&self, node: NodeRef<'a>, depth: u32) -> Type {
        if let Some(name) = node.name() {
            if let Some(ty) = self.doc_tag_type(node, |doc| doc.param(name), node) {
                return ty;
            }
        }

        let hint = node.type_hint().map(|h| self.hint_type(h));
        let default = node.default_value().map(|d| self.infer_expr(d, depth));
        match (hint, default) {
            (Some(hint), Some(default))
                if !default.is_mixed() && differs_in_class(&hint, &default) =>
            {
                Type::compound(vec![hint, default])
            }
            (Some(hint), _) => hint,
            (None, Some(default)) => default,
            (None, None) => Type::Mixed,
        }
    }

    /// A syntactic type hint: primitive keyword map first, class names via
    /// the class-name rules.
    fn hint_type(&self, hint: NodeRef<'a>) -> Type {
        let word = hint.name().filter(|n| !n.is_empty()).unwrap_or(hint.text());
        match Type::from_keyword(word) {
            Some(ty) => ty,
            None => self.class_node_type(hint),
        }
    }

    /// Look up a doc tag on the declaration owning `node` and parse its
    /// type string against the enclosing namespace.
    fn doc_tag_type(
        &self,
        doc_owner: NodeRef<'a>,
        pick: impl Fn(&DocBlock) -> Option<&crate::hir::docblock::DocTag>,
        context: NodeRef<'a>,
    ) -> Option<Type> {
        let owner = if doc_owner.kind() == NodeKind::Parameter {
            doc_owner.ancestor_where(NodeKind::is_function_like)?
        } else {
            doc_owner
        };
        let text = self.doc_comment_for(owner).or_else(|| {
            // An annotation on the enclosing statement also counts:
            // `/** @var Foo $x */ $x = make();`
            owner
                .parent()
                .filter(|p| p.kind() == NodeKind::ExpressionStatement)
                .and_then(|p| p.doc_comment())
        })?;
        let doc = DocBlock::parse(text);
        let tag = pick(&doc)?;
        let type_string = tag.type_string.as_deref()?;
        let namespace = self.enclosing_namespace(context);
        Some(Type::from_doc_string(type_string, namespace.as_deref()))
    }
}

fn arithmetic_type(lhs: Option<Type>, rhs: Option<Type>) -> Type {
    match (lhs, rhs) {
        (Some(Type::Integer), Some(Type::Integer)) => Type::Integer,
        _ => Type::Float,
    }
}

/// Whether a parameter default's type names a different class than the
/// declared hint. Two objects differ by their FQNs, everything else by
/// kind.
fn differs_in_class(hint: &Type, default: &Type) -> bool {
    match (hint, default) {
        (Type::Object { fqsen: a }, Type::Object { fqsen: b }) => a != b,
        _ => std::mem::discriminant(hint) != std::mem::discriminant(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{CancelToken, FileId};
    use crate::hir::index::ProjectIndex;
    use crate::hir::source::index_document;
    use crate::syntax::{SyntaxTree, SyntaxTreeBuilder};

    fn resolver_on<'a>(
        tree: &'a SyntaxTree,
        index: &'a ProjectIndex,
    ) -> SemanticResolver<'a> {
        SemanticResolver::new(tree, index)
    }

    fn literal(b: &mut SyntaxTreeBuilder, kind: NodeKind, text: &str) {
        b.open(kind);
        b.text(text);
        b.close();
    }

    /// Build `lhs <op> rhs` with numeric literal operands.
    fn binary_tree(op: &str, lhs: &str, rhs: &str) -> SyntaxTree {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::BinaryExpression);
        b.operator(op);
        literal(&mut b, NodeKind::NumericLiteral, lhs);
        literal(&mut b, NodeKind::NumericLiteral, rhs);
        b.close();
        b.close();
        b.finish()
    }

    fn infer_first(tree: &SyntaxTree) -> Type {
        let index = ProjectIndex::new();
        let resolver = resolver_on(tree, &index);
        let expr = tree.root().child(0).unwrap().child(0).unwrap();
        resolver.type_of_expression(expr)
    }

    #[test]
    fn literal_types() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::NumericLiteral, "42");
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::Integer);

        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::NumericLiteral, "4.2e1");
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::Float);

        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::NumericLiteral, "0xE1");
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::Integer);

        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::StringLiteral, "'s'");
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::String);
    }

    #[test]
    fn boolean_literals_by_text() {
        for word in ["true", "FALSE", "True"] {
            let mut b = SyntaxTreeBuilder::new();
            b.open(NodeKind::SourceFile);
            b.open(NodeKind::ExpressionStatement);
            b.open(NodeKind::QualifiedName);
            b.name(word);
            b.close();
            b.close();
            let tree = b.finish();
            assert_eq!(infer_first(&tree), Type::Boolean, "{word}");
        }
    }

    #[test]
    fn arithmetic_int_unless_float() {
        assert_eq!(infer_first(&binary_tree("+", "1", "2")), Type::Integer);
        assert_eq!(infer_first(&binary_tree("*", "2", "3")), Type::Integer);
        assert_eq!(infer_first(&binary_tree("+", "1", "2.0")), Type::Float);
        assert_eq!(infer_first(&binary_tree("**", "2.5", "2")), Type::Float);
    }

    #[test]
    fn comparison_and_logic_are_boolean() {
        for op in ["==", "===", "<", "&&", "||", "instanceof"] {
            assert_eq!(infer_first(&binary_tree(op, "1", "2")), Type::Boolean, "{op}");
        }
    }

    #[test]
    fn bitwise_and_spaceship_are_integer() {
        for op in ["&", "|", "^", "<=>"] {
            assert_eq!(infer_first(&binary_tree(op, "1", "2")), Type::Integer, "{op}");
        }
    }

    #[test]
    fn concat_is_string_and_division_is_not_special() {
        assert_eq!(infer_first(&binary_tree(".", "1", "2")), Type::String);
        assert_eq!(infer_first(&binary_tree("/", "1", "2")), Type::Mixed);
    }

    #[test]
    fn null_coalesce_unions_both_sides() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::BinaryExpression);
        b.operator("??");
        literal(&mut b, NodeKind::NumericLiteral, "1");
        literal(&mut b, NodeKind::StringLiteral, "'s'");
        b.close();
        b.close();
        let tree = b.finish();
        assert_eq!(
            infer_first(&tree),
            Type::Compound(vec![Type::Integer, Type::String])
        );
    }

    #[test]
    fn short_ternary_unions_condition_and_fallback() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::TernaryExpression);
        literal(&mut b, NodeKind::NumericLiteral, "1");
        literal(&mut b, NodeKind::StringLiteral, "'s'");
        b.close();
        b.close();
        let tree = b.finish();
        assert_eq!(
            infer_first(&tree),
            Type::Compound(vec![Type::Integer, Type::String])
        );
    }

    #[test]
    fn casts() {
        for (target, expected) in [
            ("bool", Type::Boolean),
            ("string", Type::String),
            ("double", Type::Float),
            ("int", Type::Integer),
        ] {
            let mut b = SyntaxTreeBuilder::new();
            b.open(NodeKind::SourceFile);
            b.open(NodeKind::ExpressionStatement);
            b.open(NodeKind::CastExpression);
            b.operator(target);
            literal(&mut b, NodeKind::StringLiteral, "'v'");
            b.close();
            b.close();
            let tree = b.finish();
            assert_eq!(infer_first(&tree), expected, "({target})");
        }
    }

    #[test]
    fn array_literal_unions_keys_and_values() {
        // ['a' => 1, 2.0]
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::ArrayCreationExpression);
        b.open(NodeKind::ArrayElement);
        literal(&mut b, NodeKind::StringLiteral, "'a'");
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.close();
        b.open(NodeKind::ArrayElement);
        literal(&mut b, NodeKind::NumericLiteral, "2.0");
        b.close();
        b.close();
        b.close();
        let tree = b.finish();

        assert_eq!(
            infer_first(&tree),
            Type::array_of(
                Some(Type::Compound(vec![Type::Integer, Type::Float])),
                Some(Type::Compound(vec![Type::String, Type::Integer])),
            )
        );
    }

    #[test]
    fn subscript_reads_the_value_type() {
        // [1, 2][0]
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::SubscriptExpression);
        b.open(NodeKind::ArrayCreationExpression);
        b.open(NodeKind::ArrayElement);
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.close();
        b.close();
        literal(&mut b, NodeKind::NumericLiteral, "0");
        b.close();
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::Integer);
    }

    #[test]
    fn clone_passes_through_and_isset_is_boolean() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::CloneExpression);
        literal(&mut b, NodeKind::StringLiteral, "'s'");
        b.close();
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::String);

        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::IssetIntrinsicExpression);
        b.close();
        b.close();
        let tree = b.finish();
        assert_eq!(infer_first(&tree), Type::Boolean);
    }

    #[test]
    fn parameter_doc_hint_and_default() {
        // /** @param \Acme\Item $doc */ function f($doc, int $hint, $def = 's',
        //                                          bool $both = 1) {}
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::FunctionDeclaration);
        b.name("f").doc("/** @param \\Acme\\Item $doc */");
        b.open(NodeKind::Parameter);
        b.name("doc");
        b.close();
        b.open(NodeKind::Parameter);
        b.name("hint");
        b.open(NodeKind::QualifiedName);
        b.text("int");
        b.close();
        b.mark_last_as_type_hint();
        b.close();
        b.open(NodeKind::Parameter);
        b.name("def");
        literal(&mut b, NodeKind::StringLiteral, "'s'");
        b.mark_last_as_default();
        b.close();
        b.open(NodeKind::Parameter);
        b.name("both");
        b.open(NodeKind::QualifiedName);
        b.text("bool");
        b.close();
        b.mark_last_as_type_hint();
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.mark_last_as_default();
        b.close();
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let resolver = resolver_on(&tree, &index);
        let func = tree.root().child(0).unwrap();
        let param = |i: usize| func.child(i).unwrap();

        assert_eq!(
            resolver.type_from_node(param(0)),
            Some(Type::object("Acme\\Item"))
        );
        assert_eq!(resolver.type_from_node(param(1)), Some(Type::Integer));
        assert_eq!(resolver.type_from_node(param(2)), Some(Type::String));
        // Hint and default disagree in kind: widen to a union.
        assert_eq!(
            resolver.type_from_node(param(3)),
            Some(Type::Compound(vec![Type::Boolean, Type::Integer]))
        );
    }

    #[test]
    fn parameter_default_of_another_class_widens_the_hint() {
        // function f(Foo $x = new Bar(), Foo $y = new Foo()) {}
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::FunctionDeclaration);
        b.name("f");
        for default_class in ["Bar", "Foo"] {
            b.open(NodeKind::Parameter);
            b.name(if default_class == "Bar" { "x" } else { "y" });
            b.open(NodeKind::QualifiedName);
            b.text("Foo");
            b.close();
            b.mark_last_as_type_hint();
            b.open(NodeKind::ObjectCreationExpression);
            b.open(NodeKind::QualifiedName);
            b.name(default_class);
            b.close();
            b.close();
            b.mark_last_as_default();
            b.close();
        }
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let resolver = resolver_on(&tree, &index);
        let func = tree.root().child(0).unwrap();

        // Different class: the default widens the hint to a union.
        assert_eq!(
            resolver.type_from_node(func.child(0).unwrap()),
            Some(Type::Compound(vec![
                Type::object("Foo"),
                Type::object("Bar"),
            ]))
        );
        // Same class: the hint stands alone.
        assert_eq!(
            resolver.type_from_node(func.child(1).unwrap()),
            Some(Type::object("Foo"))
        );
    }

    #[test]
    fn function_return_stops_at_doc_and_hint() {
        // function a(): int {} + /** @return string */ function b() {}
        // + function c() { return 1; } stays mixed: the body is ignored.
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::FunctionDeclaration);
        b.name("a");
        b.open(NodeKind::QualifiedName);
        b.text("int");
        b.close();
        b.mark_last_as_type_hint();
        b.close();
        b.open(NodeKind::FunctionDeclaration);
        b.name("b").doc("/** @return string */");
        b.close();
        b.open(NodeKind::FunctionDeclaration);
        b.name("c");
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.close();
        b.close();
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let resolver = resolver_on(&tree, &index);
        let func = |i: usize| tree.root().child(i).unwrap();
        assert_eq!(resolver.type_from_node(func(0)), Some(Type::Integer));
        assert_eq!(resolver.type_from_node(func(1)), Some(Type::String));
        assert_eq!(resolver.type_from_node(func(2)), Some(Type::Mixed));
    }

    #[test]
    fn property_var_tag_beats_initializer() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ClassDeclaration);
        b.name("C");
        b.open(NodeKind::PropertyDeclaration);
        b.doc("/** @var float */");
        b.open(NodeKind::Variable);
        b.name("x");
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.mark_last_as_default();
        b.close();
        b.close();
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let resolver = resolver_on(&tree, &index);
        let prop = tree
            .root()
            .child(0)
            .unwrap()
            .child(0)
            .unwrap()
            .child(0)
            .unwrap();
        assert_eq!(resolver.type_from_node(prop), Some(Type::Float));
    }

    #[test]
    fn member_access_resolves_through_the_index() {
        // class C { public $x = 1; function m(): self {} }
        // $c = new C; $c->x; $c->m();
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ClassDeclaration);
        b.name("C");
        b.open(NodeKind::PropertyDeclaration);
        b.open(NodeKind::Variable);
        b.name("x");
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.mark_last_as_default();
        b.close();
        b.close();
        b.open(NodeKind::MethodDeclaration);
        b.name("m");
        b.open(NodeKind::QualifiedName);
        b.text("self");
        b.close();
        b.mark_last_as_type_hint();
        b.close();
        b.close();
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::AssignmentExpression);
        b.operator("=");
        b.open(NodeKind::Variable);
        b.name("c");
        b.close();
        b.open(NodeKind::ObjectCreationExpression);
        b.open(NodeKind::QualifiedName);
        b.name("C");
        b.close();
        b.close();
        b.close();
        b.close();
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::MemberAccessExpression);
        b.name("x");
        b.open(NodeKind::Variable);
        b.name("c");
        b.close();
        b.close();
        b.close();
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::CallExpression);
        b.open(NodeKind::MemberAccessExpression);
        b.name("m");
        b.open(NodeKind::Variable);
        b.name("c");
        b.close();
        b.close();
        b.close();
        b.close();
        let tree = b.finish();

        let mut index = ProjectIndex::new();
        index_document(&tree, FileId::new(0), &mut index);
        let resolver = resolver_on(&tree, &index);

        let property_access = tree.root().child(2).unwrap().child(0).unwrap();
        assert_eq!(
            resolver.type_of_expression(property_access),
            Type::Integer
        );

        let method_call = tree.root().child(3).unwrap().child(0).unwrap();
        assert_eq!(resolver.type_of_expression(method_call), Type::SelfTy);
    }

    #[test]
    fn recursion_bound_degrades_to_mixed() {
        // $v0 = 'seed'; $v1 = $v0; ... $v99 = $v98; typing $v99 crosses
        // the depth limit and widens.
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::AssignmentExpression);
        b.operator("=");
        b.open(NodeKind::Variable);
        b.name("v0");
        b.close();
        literal(&mut b, NodeKind::StringLiteral, "'seed'");
        b.close();
        b.close();
        for i in 1..100u32 {
            b.open(NodeKind::ExpressionStatement);
            b.open(NodeKind::AssignmentExpression);
            b.operator("=");
            b.open(NodeKind::Variable);
            b.name(&format!("v{i}"));
            b.close();
            b.open(NodeKind::Variable);
            b.name(&format!("v{}", i - 1));
            b.close();
            b.close();
            b.close();
        }
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::Variable);
        b.name("v99");
        b.close();
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let resolver = resolver_on(&tree, &index);
        let last_use = tree.root().child(100).unwrap().child(0).unwrap();
        assert_eq!(resolver.type_of_expression(last_use), Type::Mixed);

        // A short chain stays precise.
        let early_use = {
            let stmt = tree.root().child(5).unwrap();
            stmt.child(0).unwrap().rhs().unwrap()
        };
        assert_eq!(resolver.type_of_expression(early_use), Type::String);
    }

    #[test]
    fn cancellation_widens_to_mixed() {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        literal(&mut b, NodeKind::NumericLiteral, "1");
        b.close();
        let tree = b.finish();

        let index = ProjectIndex::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let resolver = SemanticResolver::new(&tree, &index).with_cancel(cancel);
        let expr = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(resolver.type_of_expression(expr), Type::Mixed);
    }
}
