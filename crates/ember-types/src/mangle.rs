//! Canonical names for concrete nominal instantiations.
//!
//! The mangled name is the identity a class or actor instantiation is
//! registered under in the backend, so it must be deterministic and must
//! differ for every distinct list of concrete type arguments:
//!
//! | Type expression                 | Mangled name          |
//! |---------------------------------|-----------------------|
//! | `Point`                         | `Point`               |
//! | `collections.List[I32]`         | `collections.List[I32]` |
//! | `Pair[(I32 \| None), box->Node]` | `Pair[(I32\|None),Node]` |
//! | `Cell[(U8, F64)]`               | `Cell[(U8,F64)]`      |
//!
//! Names come from the definitions references resolve to, not from how a
//! reference is spelled: an unqualified `Point` inside package `geo` and a
//! qualified `geo.Point` elsewhere mangle to the same `geo.Point`. Built-in
//! primitives never carry a package prefix. Identifiers cannot contain the
//! delimiter characters, which keeps distinct instantiations apart.

use std::fmt;
use std::fmt::Write as _;

use rowan::TextRange;

use crate::def::{ParamId, SymbolTable};
use crate::ty::{Nominal, TypeExpr, TypeExprKind};

/// Why a name could not be derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MangleError {
    /// A type parameter reference survived reification.
    UnresolvedParam { param: ParamId, span: TextRange },
    /// Only nominal expressions have a registered name.
    NotNominal { span: TextRange },
}

impl MangleError {
    pub fn span(&self) -> TextRange {
        match self {
            MangleError::UnresolvedParam { span, .. } | MangleError::NotNominal { span } => *span,
        }
    }
}

impl fmt::Display for MangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MangleError::UnresolvedParam { param, .. } => {
                write!(f, "cannot name a type containing type parameter '{}", param.0)
            }
            MangleError::NotNominal { .. } => write!(f, "only nominal types have a mangled name"),
        }
    }
}

impl std::error::Error for MangleError {}

/// Derive the mangled name of a reified nominal type expression.
pub fn mangle(symbols: &SymbolTable, ty: &TypeExpr) -> Result<String, MangleError> {
    match &ty.kind {
        TypeExprKind::Nominal(nominal) => mangle_nominal(symbols, nominal),
        _ => Err(MangleError::NotNominal { span: ty.span }),
    }
}

/// Derive the mangled name of a nominal reference directly.
pub fn mangle_nominal(symbols: &SymbolTable, nominal: &Nominal) -> Result<String, MangleError> {
    let mut out = String::new();
    Mangler { symbols, out: &mut out }.nominal(nominal)?;
    Ok(out)
}

struct Mangler<'a> {
    symbols: &'a SymbolTable,
    out: &'a mut String,
}

impl Mangler<'_> {
    fn nominal(&mut self, nominal: &Nominal) -> Result<(), MangleError> {
        self.out.push_str(&self.symbols.qualified_name(nominal.def));
        if !nominal.args.is_empty() {
            self.out.push('[');
            self.list(&nominal.args, ',')?;
            self.out.push(']');
        }
        Ok(())
    }

    fn list(&mut self, items: &[TypeExpr], sep: char) -> Result<(), MangleError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(sep);
            }
            self.expr(item)?;
        }
        Ok(())
    }

    fn expr(&mut self, ty: &TypeExpr) -> Result<(), MangleError> {
        match &ty.kind {
            TypeExprKind::Nominal(nominal) => self.nominal(nominal),
            TypeExprKind::Union(l, r) => {
                self.out.push('(');
                self.expr(l)?;
                self.out.push('|');
                self.expr(r)?;
                self.out.push(')');
                Ok(())
            }
            TypeExprKind::Intersection(l, r) => {
                self.out.push('(');
                self.expr(l)?;
                self.out.push('&');
                self.expr(r)?;
                self.out.push(')');
                Ok(())
            }
            TypeExprKind::Tuple(elems) => {
                self.out.push('(');
                self.list(elems, ',')?;
                self.out.push(')');
                Ok(())
            }
            TypeExprKind::Structural(methods) => {
                self.out.push('{');
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        self.out.push(';');
                    }
                    let _ = write!(self.out, "{}(", m.name);
                    self.list(&m.params, ',')?;
                    self.out.push(')');
                    if let Some(ret) = &m.ret {
                        self.out.push(':');
                        self.expr(ret)?;
                    }
                }
                self.out.push('}');
                Ok(())
            }
            // Capabilities do not change identity.
            TypeExprKind::Arrow { target, .. } => self.expr(target),
            TypeExprKind::TypeParamRef(param) => Err(MangleError::UnresolvedParam {
                param: *param,
                span: ty.span,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::{DefKind, TypeDef};
    use crate::ty::{Capability, MethodSig};

    fn sp() -> TextRange {
        TextRange::default()
    }

    fn prim(symbols: &SymbolTable, name: &str) -> TypeExpr {
        let def = symbols.lookup(name).unwrap();
        TypeExpr::nominal(name, vec![], def, sp())
    }

    /// A reference to the class `name`, defining it on first use.
    fn user(symbols: &mut SymbolTable, name: &str, args: Vec<TypeExpr>) -> TypeExpr {
        let def = match symbols.lookup(name) {
            Some(def) => def,
            None => symbols.define(TypeDef::new(name, DefKind::Class, sp())),
        };
        TypeExpr::nominal(name, args, def, sp())
    }

    #[test]
    fn plain_and_qualified_names() {
        let mut symbols = SymbolTable::with_builtins();
        let point = user(&mut symbols, "Point", vec![]);
        assert_eq!(mangle(&symbols, &point).unwrap(), "Point");

        let list_def = symbols.define(
            TypeDef::new("List", DefKind::Class, sp()).with_package("collections"),
        );
        let list = TypeExpr::qualified(
            "collections",
            "List",
            vec![prim(&symbols, "I32")],
            list_def,
            sp(),
        );
        assert_eq!(mangle(&symbols, &list).unwrap(), "collections.List[I32]");
    }

    #[test]
    fn spelling_of_the_reference_does_not_matter() {
        let mut symbols = SymbolTable::with_builtins();
        let point = symbols.define(TypeDef::new("Point", DefKind::Class, sp()).with_package("geo"));
        let inside = TypeExpr::nominal("Point", vec![], point, sp());
        let outside = TypeExpr::qualified("geo", "Point", vec![], point, sp());
        assert_eq!(mangle(&symbols, &inside).unwrap(), "geo.Point");
        assert_eq!(mangle(&symbols, &outside).unwrap(), "geo.Point");

        // A built-in written with an explicit package is still unprefixed.
        let i32_id = symbols.lookup("I32").unwrap();
        let qualified = TypeExpr::qualified("builtin", "I32", vec![], i32_id, sp());
        let boxed = user(&mut symbols, "Box", vec![qualified]);
        assert_eq!(mangle(&symbols, &boxed).unwrap(), "Box[I32]");
    }

    #[test]
    fn shadowed_definitions_do_not_share_a_name() {
        let mut symbols = SymbolTable::new();
        let first = symbols.define(TypeDef::new("Node", DefKind::Class, sp()));
        let second = symbols.define(TypeDef::new("Node", DefKind::Class, sp()));
        let a = mangle(&symbols, &TypeExpr::nominal("Node", vec![], first, sp())).unwrap();
        let b = mangle(&symbols, &TypeExpr::nominal("Node", vec![], second, sp())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_arguments_give_distinct_names() {
        let mut symbols = SymbolTable::with_builtins();
        let (i32_ty, f64_ty) = (prim(&symbols, "I32"), prim(&symbols, "F64"));
        let box_i32 = user(&mut symbols, "Box", vec![i32_ty]);
        let box_f64 = user(&mut symbols, "Box", vec![f64_ty]);
        let a = mangle(&symbols, &box_i32).unwrap();
        assert_ne!(a, mangle(&symbols, &box_f64).unwrap());
        // Stable across calls.
        assert_eq!(a, mangle(&symbols, &box_i32).unwrap());
    }

    #[test]
    fn nesting_cannot_collide() {
        let mut symbols = SymbolTable::with_builtins();
        let (i32_ty, u8_ty) = (prim(&symbols, "I32"), prim(&symbols, "U8"));
        // Pair[Box[I32],U8] vs Pair[Box[I32,U8]]
        let inner = user(&mut symbols, "Box", vec![i32_ty.clone()]);
        let left = user(&mut symbols, "Pair", vec![inner, u8_ty.clone()]);
        let inner = user(&mut symbols, "Box", vec![i32_ty, u8_ty]);
        let right = user(&mut symbols, "Pair", vec![inner]);
        assert_eq!(mangle(&symbols, &left).unwrap(), "Pair[Box[I32],U8]");
        assert_eq!(mangle(&symbols, &right).unwrap(), "Pair[Box[I32,U8]]");
    }

    #[test]
    fn algebraic_arguments() {
        let mut symbols = SymbolTable::with_builtins();
        let none = user(&mut symbols, "None", vec![]);
        let node = user(&mut symbols, "Node", vec![]);
        let a = user(&mut symbols, "A", vec![]);
        let b = user(&mut symbols, "B", vec![]);
        let union = TypeExpr::union(prim(&symbols, "I32"), none, sp());
        let arrow = TypeExpr::arrow(Capability::Box, node, sp());
        let tuple = TypeExpr::tuple(vec![prim(&symbols, "U8"), prim(&symbols, "F64")], sp());
        let isect = TypeExpr::intersection(a, b, sp());
        let ty = user(&mut symbols, "Quad", vec![union, arrow, tuple, isect]);
        assert_eq!(
            mangle(&symbols, &ty).unwrap(),
            "Quad[(I32|None),Node,(U8,F64),(A&B)]"
        );
    }

    #[test]
    fn structural_argument() {
        let mut symbols = SymbolTable::with_builtins();
        let shape = TypeExpr::structural(
            vec![
                MethodSig {
                    name: "apply".to_string(),
                    params: vec![prim(&symbols, "I32")],
                    ret: Some(prim(&symbols, "Bool")),
                },
                MethodSig {
                    name: "reset".to_string(),
                    params: vec![],
                    ret: None,
                },
            ],
            sp(),
        );
        let holder = user(&mut symbols, "Holder", vec![shape]);
        assert_eq!(
            mangle(&symbols, &holder).unwrap(),
            "Holder[{apply(I32):Bool;reset()}]"
        );
    }

    #[test]
    fn unresolved_parameter_is_an_error() {
        let mut symbols = SymbolTable::new();
        let span = TextRange::new(3.into(), 4.into());
        let ty = user(&mut symbols, "Box", vec![TypeExpr::param_ref(ParamId(5), span)]);
        assert_eq!(
            mangle(&symbols, &ty),
            Err(MangleError::UnresolvedParam {
                param: ParamId(5),
                span
            })
        );
    }

    #[test]
    fn non_nominal_has_no_name() {
        let symbols = SymbolTable::with_builtins();
        let ty = TypeExpr::tuple(vec![prim(&symbols, "I32")], sp());
        assert!(matches!(mangle(&symbols, &ty), Err(MangleError::NotNominal { .. })));
    }
}
