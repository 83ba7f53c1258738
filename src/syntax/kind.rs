//! Node kind tags.

/// The closed set of syntax kinds the resolver dispatches on.
///
/// A conforming parser adapter maps its own node classes onto these tags.
/// Kinds the resolver has no rule for simply degrade to the widest answer
/// (`None` / `Mixed`), so an adapter may collapse exotic constructs onto
/// `SourceFile`-level statements without breaking anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Tree root; one per document.
    SourceFile,

    // Declarations
    ClassDeclaration,
    InterfaceDeclaration,
    TraitDeclaration,
    NamespaceDefinition,
    FunctionDeclaration,
    MethodDeclaration,
    PropertyDeclaration,
    ConstDeclaration,
    ClassConstDeclaration,
    ConstElement,
    Parameter,

    // Names and imports
    Variable,
    UseVariableName,
    QualifiedName,
    NamespaceUseDeclaration,
    NamespaceUseGroupClause,

    // Expressions
    AnonymousFunctionCreationExpression,
    CallExpression,
    MemberAccessExpression,
    ScopedPropertyAccessExpression,
    ObjectCreationExpression,
    SubscriptExpression,
    AssignmentExpression,
    BinaryExpression,
    TernaryExpression,
    UnaryOpExpression,
    CastExpression,
    CloneExpression,
    ScriptInclusionExpression,
    IssetIntrinsicExpression,
    EmptyIntrinsicExpression,
    ArrayCreationExpression,
    ArrayElement,
    StringLiteral,
    NumericLiteral,

    // Statements
    ExpressionStatement,
}

impl NodeKind {
    /// Class, interface, or trait: anything that can own members.
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::TraitDeclaration
        )
    }

    /// A scope boundary for local variable resolution.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::MethodDeclaration
                | NodeKind::AnonymousFunctionCreationExpression
        )
    }

    /// Kinds that appear in expression position.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::Variable
                | NodeKind::QualifiedName
                | NodeKind::AnonymousFunctionCreationExpression
                | NodeKind::CallExpression
                | NodeKind::MemberAccessExpression
                | NodeKind::ScopedPropertyAccessExpression
                | NodeKind::ObjectCreationExpression
                | NodeKind::SubscriptExpression
                | NodeKind::AssignmentExpression
                | NodeKind::BinaryExpression
                | NodeKind::TernaryExpression
                | NodeKind::UnaryOpExpression
                | NodeKind::CastExpression
                | NodeKind::CloneExpression
                | NodeKind::ScriptInclusionExpression
                | NodeKind::IssetIntrinsicExpression
                | NodeKind::EmptyIntrinsicExpression
                | NodeKind::ArrayCreationExpression
                | NodeKind::ArrayElement
                | NodeKind::StringLiteral
                | NodeKind::NumericLiteral
        )
    }
}
