//! Type lowering: type expressions to backend machine types.
//!
//! # Type mapping
//!
//! | Type expression            | Machine type                          |
//! |----------------------------|---------------------------------------|
//! | `Bool`, `True`, `False`    | i1                                    |
//! | `I8`..`I128`, `U8`..`U128` | i8..i128                              |
//! | `F16`, `F32`, `F64`        | half, float, double                   |
//! | class / actor `C[Args]`    | pointer to named aggregate `C[Args]`  |
//! | `cap->T`                   | whatever `T` lowers to                |
//! | `True \| False`            | i1                                    |
//! | trait                      | not implemented                       |
//! | other unions               | not implemented                       |
//! | intersection, tuple        | not implemented                       |
//! | structural, type parameter | not implemented                       |
//!
//! - [`nominal`]: built-in primitives, the named-type cache and aggregate bodies
//! - [`union`]: the union decision table

mod nominal;
mod union;

use ember_types::{DefId, Nominal, SymbolTable, TypeExpr, TypeExprKind};
use rowan::TextRange;

use crate::backend::TypeBackend;
use crate::error::{DiagnosticSink, LowerError, Unsupported};

pub use self::nominal::builtin_primitive;

/// Lowers type expressions for one compilation unit.
///
/// Borrows the symbol table read-only, the backend as its single mutable
/// owner, and the sink failures are reported to. Lowering is synchronous
/// and depth-first; recursive type graphs terminate because every named
/// aggregate is registered in the backend before its fields are lowered.
pub struct TypeLowerer<'a, B: TypeBackend> {
    symbols: &'a SymbolTable,
    backend: &'a mut B,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a, B: TypeBackend> TypeLowerer<'a, B> {
    pub fn new(
        symbols: &'a SymbolTable,
        backend: &'a mut B,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        TypeLowerer {
            symbols,
            backend,
            sink,
        }
    }

    /// The backend being lowered into.
    pub fn backend(&self) -> &B {
        self.backend
    }

    /// Lower a type expression to a machine type handle.
    pub fn lower(&mut self, ty: &TypeExpr) -> Result<B::Handle, LowerError> {
        match &ty.kind {
            TypeExprKind::Union(left, right) => self.lower_union(ty, left, right),
            TypeExprKind::Intersection(..) => {
                Err(self.not_implemented(Unsupported::Intersection, ty.span))
            }
            TypeExprKind::Tuple(_) => Err(self.not_implemented(Unsupported::Tuple, ty.span)),
            TypeExprKind::Nominal(nominal) => self.lower_nominal(ty, nominal),
            TypeExprKind::Structural(_) => {
                Err(self.not_implemented(Unsupported::Structural, ty.span))
            }
            // The receiver capability has no machine representation.
            TypeExprKind::Arrow { target, .. } => self.lower(target),
            TypeExprKind::TypeParamRef(_) => {
                Err(self.not_implemented(Unsupported::TypeParamRef, ty.span))
            }
        }
    }

    /// Lower a list of types, stopping at the first failure.
    pub fn lower_all(&mut self, tys: &[TypeExpr]) -> Result<Vec<B::Handle>, LowerError> {
        tys.iter().map(|ty| self.lower(ty)).collect()
    }

    /// Lower the instantiation of definition `def` with `args`.
    pub fn lower_definition(
        &mut self,
        def: DefId,
        args: &[TypeExpr],
    ) -> Result<B::Handle, LowerError> {
        let td = self.symbols.get(def);
        let ty = TypeExpr::new(
            TypeExprKind::Nominal(Nominal {
                package: td.package.clone(),
                name: td.name.clone(),
                args: args.to_vec(),
                def,
            }),
            td.span,
        );
        self.lower(&ty)
    }

    /// Report a not-implemented failure and return it for propagation.
    fn not_implemented(&mut self, what: Unsupported, span: TextRange) -> LowerError {
        let err = LowerError::not_implemented(what, span);
        tracing::debug!(?what, ?span, "type lowering not implemented");
        self.sink.report(&err);
        err
    }
}
