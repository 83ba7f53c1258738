//! Property tests for the type algebra and name grammar.

use proptest::prelude::*;

use phoxide::base::FileId;
use phoxide::hir::{index_document, ProjectIndex, SemanticResolver, Type};
use phoxide::{Fqn, NodeKind, SyntaxTreeBuilder};

fn arb_leaf_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Mixed),
        Just(Type::Boolean),
        Just(Type::Integer),
        Just(Type::Float),
        Just(Type::String),
        Just(Type::This),
        Just(Type::SelfTy),
        Just(Type::StaticTy),
        Just(Type::anonymous_object()),
        "[A-Z][a-z]{0,5}".prop_map(|name| Type::object(Fqn::new(name))),
    ]
}

fn arb_type() -> impl Strategy<Value = Type> {
    arb_leaf_type().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|t| Type::array_of(Some(t), Some(Type::Integer))),
            prop::collection::vec(inner, 0..4).prop_map(Type::compound),
        ]
    })
}

fn assert_flat(ty: &Type) {
    if let Type::Compound(parts) = ty {
        assert!(parts.len() >= 2, "compound with fewer than two parts: {ty:?}");
        for part in parts {
            assert!(
                !matches!(part, Type::Compound(_)),
                "nested compound in {ty:?}"
            );
        }
        for (i, a) in parts.iter().enumerate() {
            for b in &parts[i + 1..] {
                assert_ne!(a, b, "duplicate component in {ty:?}");
            }
        }
    }
}

proptest! {
    /// Compound construction always flattens, dedupes, and collapses
    /// singletons, no matter how the inputs nest.
    #[test]
    fn compound_is_always_flat(types in prop::collection::vec(arb_type(), 0..8)) {
        let ty = Type::compound(types);
        assert_flat(&ty);
        if let Type::Compound(parts) = &ty {
            for part in parts {
                assert_flat(part);
            }
        }
    }

    /// Rebuilding a compound from its own components is the identity.
    #[test]
    fn compound_is_idempotent(types in prop::collection::vec(arb_type(), 0..8)) {
        let once = Type::compound(types);
        let twice = Type::compound(vec![once.clone()]);
        prop_assert_eq!(once, twice);
    }

    /// Every constructor shape matches the published FQN grammar.
    #[test]
    fn fqn_constructors_match_grammar(
        ns in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..4),
        member in "[A-Za-z_][A-Za-z0-9_]{0,8}",
        is_static in any::<bool>(),
    ) {
        let path = ns.join("\\");
        for fqn in [
            Fqn::new(&path),
            Fqn::function(&path),
            Fqn::method(&path, &member, is_static),
            Fqn::property(&path, &member, is_static),
            Fqn::class_constant(&path, &member),
        ] {
            prop_assert!(fqn.is_well_formed(), "{}", fqn);
        }
    }

    /// The global-fallback form of a callable keeps its call suffix.
    #[test]
    fn global_form_preserves_callability(
        ns in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 2..4),
    ) {
        let fqn = Fqn::function(&ns.join("\\"));
        let global = fqn.global_form();
        prop_assert!(global.is_callable());
        prop_assert!(!global.has_namespace());
        prop_assert!(global.is_well_formed());
    }
}

// ----------------------------------------------------------------------
// Assignment round-trip: typeof($x = rhs) == typeof(rhs)
// ----------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Rhs {
    Int(u32),
    Float(u32),
    Str,
    Bool(bool),
    Binary(&'static str, u32, u32),
    Ternary(Box<Rhs>, Box<Rhs>),
    Array(Vec<Rhs>),
}

fn arb_rhs() -> impl Strategy<Value = Rhs> {
    let leaf = prop_oneof![
        any::<u32>().prop_map(Rhs::Int),
        any::<u32>().prop_map(Rhs::Float),
        Just(Rhs::Str),
        any::<bool>().prop_map(Rhs::Bool),
        (
            prop::sample::select(vec!["+", "-", "*", "**", ".", "==", "??", "<=>"]),
            any::<u32>(),
            any::<u32>(),
        )
            .prop_map(|(op, a, b)| Rhs::Binary(op, a, b)),
    ];
    leaf.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Rhs::Ternary(Box::new(a), Box::new(b))),
            prop::collection::vec(inner, 0..3).prop_map(Rhs::Array),
        ]
    })
}

fn build_rhs(b: &mut SyntaxTreeBuilder, rhs: &Rhs) {
    match rhs {
        Rhs::Int(n) => {
            b.open(NodeKind::NumericLiteral);
            b.text(&n.to_string());
            b.close();
        }
        Rhs::Float(n) => {
            b.open(NodeKind::NumericLiteral);
            b.text(&format!("{n}.5"));
            b.close();
        }
        Rhs::Str => {
            b.open(NodeKind::StringLiteral);
            b.text("'s'");
            b.close();
        }
        Rhs::Bool(v) => {
            b.open(NodeKind::QualifiedName);
            b.name(if *v { "true" } else { "false" });
            b.close();
        }
        Rhs::Binary(op, a, c) => {
            b.open(NodeKind::BinaryExpression);
            b.operator(op);
            b.open(NodeKind::NumericLiteral);
            b.text(&a.to_string());
            b.close();
            b.open(NodeKind::NumericLiteral);
            b.text(&c.to_string());
            b.close();
            b.close();
        }
        Rhs::Ternary(then, otherwise) => {
            b.open(NodeKind::TernaryExpression);
            b.open(NodeKind::QualifiedName);
            b.name("true");
            b.close();
            build_rhs(b, then);
            build_rhs(b, otherwise);
            b.close();
        }
        Rhs::Array(elements) => {
            b.open(NodeKind::ArrayCreationExpression);
            for element in elements {
                b.open(NodeKind::ArrayElement);
                build_rhs(b, element);
                b.close();
            }
            b.close();
        }
    }
}

proptest! {
    #[test]
    fn assignment_types_as_its_right_hand_side(rhs in arb_rhs()) {
        let mut b = SyntaxTreeBuilder::new();
        b.open(NodeKind::SourceFile);
        b.open(NodeKind::ExpressionStatement);
        b.open(NodeKind::AssignmentExpression);
        b.operator("=");
        b.open(NodeKind::Variable);
        b.name("x");
        b.close();
        build_rhs(&mut b, &rhs);
        b.close();
        b.close();
        let tree = b.finish();

        let mut index = ProjectIndex::new();
        index_document(&tree, FileId::new(0), &mut index);
        let resolver = SemanticResolver::new(&tree, &index);

        let assignment = tree.root().child(0).unwrap().child(0).unwrap();
        let right = assignment.rhs().unwrap();
        prop_assert_eq!(
            resolver.type_of_expression(assignment),
            resolver.type_of_expression(right)
        );
    }
}
