//! Type system definitions for the AST.
//!
//! This module defines the types of the language:
//!
//! - Primitive types (numbers, booleans, `None`)
//! - Nominal class types, optionally carrying generic arguments
//! - Container types (lists, sets, generators)
//! - The synthetic `Either` type the checker produces for divergent branches
//!
//! Types appear in annotations written by the user (parsed by the AST builder)
//! and in the annotations the type checker attaches to every node.

use std::fmt::Display;

/// A resolved or annotated type.
///
/// Equality is nominal for classes (generic arguments are ignored) and
/// structural for everything else.
#[derive(Debug, Clone)]
pub enum Type {
    Num,
    Bool,
    None,
    Class {
        name: String,
        generic_args: Vec<Type>,
    },
    List(Box<Type>),
    Set(Box<Type>),
    Generator(Box<Type>),
    /// Two unreconciled outcomes of a conditional. Never written by users.
    Either(Box<Type>, Box<Type>),
    TypeVar,
}

impl Type {
    pub fn class<S: Into<String>>(name: S) -> Self {
        Type::Class {
            name: name.into(),
            generic_args: vec![],
        }
    }

    pub fn generic_class<S: Into<String>>(name: S, generic_args: Vec<Type>) -> Self {
        Type::Class {
            name: name.into(),
            generic_args,
        }
    }

    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Self {
        Type::Set(Box::new(element))
    }

    pub fn generator(element: Type) -> Self {
        Type::Generator(Box::new(element))
    }

    pub fn either(left: Type, right: Type) -> Self {
        Type::Either(Box::new(left), Box::new(right))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class { .. })
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// `None`, objects and generators can be compared with `is`.
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::None | Type::Class { .. } | Type::Generator(_))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Num, Type::Num)
            | (Type::Bool, Type::Bool)
            | (Type::None, Type::None)
            | (Type::TypeVar, Type::TypeVar) => true,
            (Type::Class { name: left, .. }, Type::Class { name: right, .. }) => left == right,
            (Type::List(left), Type::List(right))
            | (Type::Set(left), Type::Set(right))
            | (Type::Generator(left), Type::Generator(right)) => left == right,
            (Type::Either(l1, r1), Type::Either(l2, r2)) => l1 == l2 && r1 == r2,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Num => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::None => write!(f, "None"),
            Type::TypeVar => write!(f, "TypeVar"),
            Type::Class { name, generic_args } if generic_args.is_empty() => write!(f, "{}", name),
            Type::Class { name, generic_args } => {
                let args = generic_args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<String>>();
                write!(f, "{}[{}]", name, args.join(", "))
            }
            Type::List(element) => write!(f, "[{}]", element),
            Type::Set(element) => write!(f, "set[{}]", element),
            Type::Generator(element) => write!(f, "generator[{}]", element),
            Type::Either(left, right) => write!(f, "either[{}, {}]", left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn test_class_equality_is_nominal() {
        assert_eq!(Type::class("Box"), Type::generic_class("Box", vec![Type::Num]));
        assert_ne!(Type::class("Box"), Type::class("Crate"));
    }

    #[test]
    fn test_container_equality_is_structural() {
        assert_eq!(Type::list(Type::Num), Type::list(Type::Num));
        assert_ne!(Type::list(Type::Num), Type::list(Type::Bool));
        assert_ne!(Type::list(Type::Num), Type::generator(Type::Num));
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::list(Type::class("C")).to_string(), "[C]");
        assert_eq!(
            Type::generic_class("Box", vec![Type::Num, Type::Bool]).to_string(),
            "Box[int, bool]"
        );
        assert_eq!(Type::either(Type::Num, Type::None).to_string(), "either[int, None]");
    }
}
