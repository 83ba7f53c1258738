//! Symbolic types.
//!
//! Types are value-semantic and immutable. `Mixed` is the widest answer and
//! doubles as "could not infer"; inference never fails, it degrades here.

use std::fmt;

use crate::hir::fqn::{Fqn, NS_SEP};

/// A symbolic type as carried by definitions and inferred for expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// Unknown; the widest assumption.
    Mixed,
    Boolean,
    Integer,
    Float,
    String,
    /// An array with optional value and key types.
    Array {
        value: Option<Box<Type>>,
        key: Option<Box<Type>>,
    },
    /// An object instance; no FQSEN means an anonymous class.
    Object { fqsen: Option<Fqn> },
    /// The `self` of the enclosing class, as written in a hint.
    SelfTy,
    /// Late static binding (`static`).
    StaticTy,
    /// The `$this` of the enclosing class.
    This,
    /// A union of at least two distinct types. Never nests.
    Compound(Vec<Type>),
}

impl Type {
    pub fn object(fqn: impl Into<Fqn>) -> Type {
        Type::Object {
            fqsen: Some(fqn.into()),
        }
    }

    pub fn anonymous_object() -> Type {
        Type::Object { fqsen: None }
    }

    pub fn array_of(value: Option<Type>, key: Option<Type>) -> Type {
        Type::Array {
            value: value.map(Box::new),
            key: key.map(Box::new),
        }
    }

    /// Build a union. Nested compounds are flattened, duplicates dropped;
    /// a single surviving type is returned directly and an empty input
    /// collapses to `Mixed`.
    pub fn compound(types: Vec<Type>) -> Type {
        let mut flat: Vec<Type> = Vec::with_capacity(types.len());
        for t in types {
            match t {
                Type::Compound(inner) => {
                    for t in inner {
                        if !flat.contains(&t) {
                            flat.push(t);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => Type::Mixed,
            1 => flat.pop().expect("len checked"),
            _ => Type::Compound(flat),
        }
    }

    /// The union members: the compound's parts, or the type itself.
    pub fn components(&self) -> &[Type] {
        match self {
            Type::Compound(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    /// Every object FQN the type mentions, compounds included.
    pub fn class_fqns(&self) -> Vec<&Fqn> {
        match self {
            Type::Object { fqsen: Some(fqn) } => vec![fqn],
            Type::Compound(parts) => parts.iter().flat_map(Type::class_fqns).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Type::Mixed)
    }

    /// Map a primitive hint keyword to its type. Keywords with no place in
    /// the algebra (`callable`, `null`, ...) widen to `Mixed`; anything
    /// that is not a keyword returns `None` and is a class name.
    pub fn from_keyword(word: &str) -> Option<Type> {
        let ty = match word.to_ascii_lowercase().as_str() {
            "bool" | "boolean" | "true" | "false" => Type::Boolean,
            "int" | "integer" => Type::Integer,
            "float" | "double" | "real" => Type::Float,
            "string" => Type::String,
            "array" => Type::array_of(None, None),
            "object" => Type::anonymous_object(),
            "self" => Type::SelfTy,
            "static" => Type::StaticTy,
            "$this" | "this" => Type::This,
            "mixed" | "null" | "void" | "callable" | "iterable" | "resource" => Type::Mixed,
            _ => return None,
        };
        Some(ty)
    }

    /// Parse a doc-comment type string (`int`, `\A\B`, `Foo[]`, `A|B`).
    ///
    /// Bare class names qualify against `namespace`; a leading backslash is
    /// the FQSEN convention and strips to a root-relative name. Unknown
    /// shapes widen to `Mixed`.
    pub fn from_doc_string(raw: &str, namespace: Option<&str>) -> Type {
        let raw = raw.trim();
        if raw.is_empty() {
            return Type::Mixed;
        }
        let parts: Vec<Type> = raw
            .split('|')
            .map(|part| Self::parse_single(part.trim(), namespace))
            .collect();
        Type::compound(parts)
    }

    fn parse_single(part: &str, namespace: Option<&str>) -> Type {
        let part = part.strip_prefix('?').unwrap_or(part);
        if let Some(element) = part.strip_suffix("[]") {
            let inner = Self::parse_single(element, namespace);
            return Type::array_of(Some(inner), None);
        }
        if part.is_empty() {
            return Type::Mixed;
        }
        if let Some(ty) = Type::from_keyword(part) {
            return ty;
        }
        if let Some(rooted) = part.strip_prefix(NS_SEP) {
            return Type::object(Fqn::new(rooted));
        }
        match namespace {
            Some(ns) if !ns.is_empty() => Type::object(Fqn::new(format!("{ns}\\{part}"))),
            _ => Type::object(Fqn::new(part)),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Mixed => f.write_str("mixed"),
            Type::Boolean => f.write_str("bool"),
            Type::Integer => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Array { value: Some(v), .. } => write!(f, "{v}[]"),
            Type::Array { value: None, .. } => f.write_str("array"),
            Type::Object { fqsen: Some(fqn) } => write!(f, "{fqn}"),
            Type::Object { fqsen: None } => f.write_str("object"),
            Type::SelfTy => f.write_str("self"),
            Type::StaticTy => f.write_str("static"),
            Type::This => f.write_str("$this"),
            Type::Compound(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
