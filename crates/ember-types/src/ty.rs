//! Type expression representation.
//!
//! A `TypeExpr` is one node of the source-level type grammar as it leaves
//! name resolution: unions, intersections, tuples, nominal references to
//! definitions, structural (method-set) types, viewpoint arrows and
//! references to type parameters. Expressions are immutable; passes that
//! need a different tree (such as [`crate::reify`]) build a new one.

use std::fmt;

use rowan::TextRange;

use crate::def::{DefId, ParamId};

/// A reference capability, as written on the receiver side of an arrow.
///
/// Capabilities restrict aliasing and mutation at the type level only; they
/// never change how a value is represented in memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Iso,
    Trn,
    Ref,
    Val,
    Box,
    Tag,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Iso => "iso",
            Capability::Trn => "trn",
            Capability::Ref => "ref",
            Capability::Val => "val",
            Capability::Box => "box",
            Capability::Tag => "tag",
        };
        f.write_str(s)
    }
}

/// A nominal type reference: `package.Name[Arg1, Arg2]`.
///
/// `def` is the definition name resolution attached to the reference. The
/// package is `None` for references into the package being compiled.
/// `package` and `name` record how the reference was written; the identity
/// of the type is `def`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Nominal {
    pub package: Option<String>,
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub def: DefId,
}

/// One method signature of a structural type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<TypeExpr>,
    pub ret: Option<TypeExpr>,
}

/// The shape of a type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExprKind {
    /// `(A | B)`
    Union(Box<TypeExpr>, Box<TypeExpr>),
    /// `(A & B)`
    Intersection(Box<TypeExpr>, Box<TypeExpr>),
    /// `(A, B, C)`
    Tuple(Vec<TypeExpr>),
    /// A reference to a named definition, possibly with type arguments.
    Nominal(Nominal),
    /// `{ fun m(A): B }` -- a type described only by the methods it has.
    Structural(Vec<MethodSig>),
    /// `cap->T`: the target type viewed through a receiver capability.
    Arrow {
        receiver: Capability,
        target: Box<TypeExpr>,
    },
    /// A reference to a type parameter of an enclosing definition.
    TypeParamRef(ParamId),
}

/// A type expression together with the source range it was written at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: TextRange,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: TextRange) -> Self {
        TypeExpr { kind, span }
    }

    /// Create a nominal reference without a package qualifier.
    pub fn nominal(name: impl Into<String>, args: Vec<TypeExpr>, def: DefId, span: TextRange) -> Self {
        TypeExpr::new(
            TypeExprKind::Nominal(Nominal {
                package: None,
                name: name.into(),
                args,
                def,
            }),
            span,
        )
    }

    /// Create a nominal reference qualified by `package`.
    pub fn qualified(
        package: impl Into<String>,
        name: impl Into<String>,
        args: Vec<TypeExpr>,
        def: DefId,
        span: TextRange,
    ) -> Self {
        TypeExpr::new(
            TypeExprKind::Nominal(Nominal {
                package: Some(package.into()),
                name: name.into(),
                args,
                def,
            }),
            span,
        )
    }

    pub fn union(left: TypeExpr, right: TypeExpr, span: TextRange) -> Self {
        TypeExpr::new(TypeExprKind::Union(Box::new(left), Box::new(right)), span)
    }

    pub fn intersection(left: TypeExpr, right: TypeExpr, span: TextRange) -> Self {
        TypeExpr::new(
            TypeExprKind::Intersection(Box::new(left), Box::new(right)),
            span,
        )
    }

    pub fn tuple(elems: Vec<TypeExpr>, span: TextRange) -> Self {
        TypeExpr::new(TypeExprKind::Tuple(elems), span)
    }

    pub fn structural(methods: Vec<MethodSig>, span: TextRange) -> Self {
        TypeExpr::new(TypeExprKind::Structural(methods), span)
    }

    pub fn arrow(receiver: Capability, target: TypeExpr, span: TextRange) -> Self {
        TypeExpr::new(
            TypeExprKind::Arrow {
                receiver,
                target: Box::new(target),
            },
            span,
        )
    }

    pub fn param_ref(param: ParamId, span: TextRange) -> Self {
        TypeExpr::new(TypeExprKind::TypeParamRef(param), span)
    }

    /// The nominal payload, if this is a nominal reference.
    pub fn as_nominal(&self) -> Option<&Nominal> {
        match &self.kind {
            TypeExprKind::Nominal(nominal) => Some(nominal),
            _ => None,
        }
    }

    /// Whether any type parameter reference remains anywhere in the tree.
    pub fn has_param_refs(&self) -> bool {
        match &self.kind {
            TypeExprKind::TypeParamRef(_) => true,
            TypeExprKind::Union(l, r) | TypeExprKind::Intersection(l, r) => {
                l.has_param_refs() || r.has_param_refs()
            }
            TypeExprKind::Tuple(elems) => elems.iter().any(TypeExpr::has_param_refs),
            TypeExprKind::Nominal(nominal) => nominal.args.iter().any(TypeExpr::has_param_refs),
            TypeExprKind::Structural(methods) => methods.iter().any(|m| {
                m.params.iter().any(TypeExpr::has_param_refs)
                    || m.ret.as_ref().is_some_and(TypeExpr::has_param_refs)
            }),
            TypeExprKind::Arrow { target, .. } => target.has_param_refs(),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Union(l, r) => write!(f, "({} | {})", l, r),
            TypeExprKind::Intersection(l, r) => write!(f, "({} & {})", l, r),
            TypeExprKind::Tuple(elems) => {
                write!(f, "(")?;
                write_list(f, elems)?;
                write!(f, ")")
            }
            TypeExprKind::Nominal(nominal) => {
                write!(f, "{}", nominal.name)?;
                if !nominal.args.is_empty() {
                    write!(f, "[")?;
                    write_list(f, &nominal.args)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeExprKind::Structural(methods) => {
                write!(f, "{{")?;
                for m in methods {
                    write!(f, " fun {}(", m.name)?;
                    write_list(f, &m.params)?;
                    write!(f, ")")?;
                    if let Some(ret) = &m.ret {
                        write!(f, ": {}", ret)?;
                    }
                }
                write!(f, " }}")
            }
            TypeExprKind::Arrow { receiver, target } => write!(f, "{}->{}", receiver, target),
            TypeExprKind::TypeParamRef(param) => write!(f, "'{}", param.0),
        }
    }
}
