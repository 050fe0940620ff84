//! Front-end type model consumed by Ember code generation.
//!
//! After name resolution every type annotation in an Ember program is a
//! [`TypeExpr`] tree whose nominal references point at a [`TypeDef`] in the
//! [`SymbolTable`]. Code generation never mutates these trees; it asks the
//! [`reify`] pass for concrete copies and the [`mangle`] pass for the name a
//! concrete instantiation is registered under.
//!
//! # Architecture
//!
//! - [`ty`]: Type expressions (`TypeExpr`, `TypeExprKind`, `Nominal`, ...)
//! - [`def`]: Type definitions and the symbol table that owns them
//! - [`reify`]: Substitution of type arguments for type parameters
//! - [`mangle`]: Canonical names for concrete nominal instantiations

pub mod def;
pub mod mangle;
pub mod reify;
pub mod ty;

pub use rowan::{TextRange, TextSize};

pub use crate::def::{
    DefId, DefKind, FieldDecl, Member, MethodDecl, MethodKind, Mutability, ParamId, SymbolTable,
    TypeDef, TypeParam, BUILTIN_PACKAGE, BUILTIN_PRIMITIVES,
};
pub use crate::mangle::{mangle, mangle_nominal, MangleError};
pub use crate::reify::reify;
pub use crate::ty::{Capability, MethodSig, Nominal, TypeExpr, TypeExprKind};
