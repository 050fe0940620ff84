//! Union types.
//!
//! | left      | right     | result                         |
//! |-----------|-----------|--------------------------------|
//! | i1        | same i1   | i1 (`True \| False` is a Bool) |
//! | pointer   | same ptr  | not implemented                |
//! | pointer   | other ptr | not implemented (tagged sums)  |
//! | other     | same      | panic: cannot come from the front end |
//! | different | different | not implemented (tagged sums)  |
//!
//! Pointer handles may not carry their pointee (LLVM pointers are opaque),
//! so two pointers are the same type only when their operands name the same
//! aggregate.

use ember_types::{mangle_nominal, TypeExpr, TypeExprKind};

use super::TypeLowerer;
use crate::backend::{HandleKind, TypeBackend};
use crate::error::{LowerError, Unsupported};

impl<B: TypeBackend> TypeLowerer<'_, B> {
    pub(super) fn lower_union(
        &mut self,
        ty: &TypeExpr,
        left: &TypeExpr,
        right: &TypeExpr,
    ) -> Result<B::Handle, LowerError> {
        let l = self.lower(left)?;
        let r = self.lower(right)?;

        if l == r {
            match self.backend.kind_of(l) {
                HandleKind::Integer { bits: 1 } => return Ok(l),
                HandleKind::Pointer => {
                    if self.aggregate_name(left) == self.aggregate_name(right) {
                        return Err(self.not_implemented(Unsupported::PointerUnion, ty.span));
                    }
                }
                kind => panic!(
                    "union `{}` of two identical {} types; only i1 or pointer types \
                     are unioned with themselves",
                    ty, kind
                ),
            }
        }

        Err(self.not_implemented(Unsupported::Union, ty.span))
    }

    /// The registered name of the aggregate a pointer-typed operand points to.
    fn aggregate_name(&self, ty: &TypeExpr) -> Option<String> {
        match &ty.kind {
            TypeExprKind::Arrow { target, .. } => self.aggregate_name(target),
            TypeExprKind::Nominal(nominal) => mangle_nominal(self.symbols, nominal).ok(),
            _ => None,
        }
    }
}
