//! Fully qualified names.
//!
//! An [`Fqn`] is the canonical string identity of a symbol. The shapes are
//! stable and bit-exact:
//!
//! ```text
//! Ns\Sub\Name          namespace, class, interface, trait, constant
//! Ns\Sub\fn()          function
//! Ns\Class::method()   static method
//! Ns\Class->method()   instance method
//! Ns\Class::$prop      static property
//! Ns\Class->prop       instance property
//! Ns\Class::CONST      class constant
//! ```
//!
//! The separator encodes the dispatch kind, and the trailing `()` keeps
//! callables from colliding with constants of the same base name.

use std::borrow::Borrow;
use std::fmt;

use smol_str::SmolStr;

/// Namespace separator in qualified names.
pub const NS_SEP: char = '\\';

/// A fully qualified name.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Fqn(SmolStr);

impl Fqn {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    /// Convert from the parser's FQSEN convention by stripping a single
    /// leading backslash.
    pub fn from_fqsen(s: &str) -> Self {
        Self::new(s.strip_prefix(NS_SEP).unwrap_or(s))
    }

    pub fn function(namespaced: &str) -> Self {
        Self(SmolStr::new(format!("{namespaced}()")))
    }

    pub fn method(class: &str, name: &str, is_static: bool) -> Self {
        let sep = if is_static { "::" } else { "->" };
        Self(SmolStr::new(format!("{class}{sep}{name}()")))
    }

    pub fn property(class: &str, name: &str, is_static: bool) -> Self {
        if is_static {
            Self(SmolStr::new(format!("{class}::${name}")))
        } else {
            Self(SmolStr::new(format!("{class}->{name}")))
        }
    }

    pub fn class_constant(class: &str, name: &str) -> Self {
        Self(SmolStr::new(format!("{class}::{name}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte position where the member part (`::` or `->`) starts, if any.
    fn member_sep(&self) -> Option<usize> {
        let double_colon = self.0.find("::");
        let arrow = self.0.find("->");
        match (double_colon, arrow) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// The `Ns\Class` part before any member access.
    pub fn name_path(&self) -> &str {
        match self.member_sep() {
            Some(at) => &self.0[..at],
            None => self.0.strip_suffix("()").unwrap_or(&self.0),
        }
    }

    /// The member name with its separator, e.g. `->m()`, if present.
    pub fn member_part(&self) -> Option<&str> {
        self.member_sep().map(|at| &self.0[at..])
    }

    pub fn has_member(&self) -> bool {
        self.member_sep().is_some()
    }

    /// Ends in `()` - a function or method.
    pub fn is_callable(&self) -> bool {
        self.0.ends_with("()")
    }

    /// The name path crosses a namespace boundary.
    pub fn has_namespace(&self) -> bool {
        self.name_path().contains(NS_SEP)
    }

    /// Strip the name path to its last segment, keeping any `()` suffix.
    ///
    /// This is the global-fallback form: `N\g()` becomes `g()`, `N\C`
    /// becomes `C`. Only meaningful for member-free names; names with a
    /// member part are returned unchanged.
    pub fn global_form(&self) -> Fqn {
        if self.has_member() || !self.has_namespace() {
            return self.clone();
        }
        let suffix = if self.0.ends_with("()") { "()" } else { "" };
        let last = self
            .name_path()
            .rsplit(NS_SEP)
            .next()
            .unwrap_or(self.name_path());
        Self(SmolStr::new(format!("{last}{suffix}")))
    }

    /// The simple name of the symbol: last path segment or member name,
    /// without `$` or `()` decoration.
    pub fn simple_name(&self) -> &str {
        let tail = match self.member_part() {
            Some(member) => member.trim_start_matches(['-', '>', ':', '$']),
            None => self
                .name_path()
                .rsplit(NS_SEP)
                .next()
                .unwrap_or(self.name_path()),
        };
        tail.strip_suffix("()").unwrap_or(tail)
    }

    /// The container a symbol-information payload reports: the owning class
    /// for members, the enclosing namespace otherwise.
    pub fn container(&self) -> Option<&str> {
        if self.has_member() {
            return Some(self.name_path());
        }
        let path = self.name_path();
        path.rfind(NS_SEP).map(|at| &path[..at])
    }

    /// Check the name against the published grammar. Used by tests to pin
    /// the output shapes of the name builder and reference resolver.
    pub fn is_well_formed(&self) -> bool {
        fn ident(s: &str) -> bool {
            let mut chars = s.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
                _ => return false,
            }
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }

        let s = self.0.as_str();
        let (path, member) = match self.member_sep() {
            Some(at) => (&s[..at], Some(&s[at..])),
            None => (s.strip_suffix("()").unwrap_or(s), None),
        };
        if !path.split(NS_SEP).all(ident) {
            return false;
        }
        let Some(member) = member else { return true };
        if let Some(rest) = member.strip_prefix("::$") {
            return ident(rest);
        }
        if let Some(rest) = member.strip_prefix("::").or_else(|| member.strip_prefix("->")) {
            let rest = rest.strip_suffix("()").unwrap_or(rest);
            return ident(rest);
        }
        false
    }
}

impl fmt::Display for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fqn({})", self.0)
    }
}

impl Borrow<str> for Fqn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fqn {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
