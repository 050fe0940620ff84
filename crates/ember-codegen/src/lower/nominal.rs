//! Nominal types: built-in primitives, the named-type cache, and aggregate
//! bodies for classes and actors.

use ember_types::{mangle_nominal, reify, DefKind, MangleError, Nominal, TypeDef, TypeExpr};
use tracing::instrument;

use super::TypeLowerer;
use crate::backend::{Named, PrimitiveKind, TypeBackend};
use crate::error::{LowerError, Unsupported};

/// The machine scalar a built-in primitive name lowers to.
///
/// Decided by name alone; the definition is never consulted.
pub fn builtin_primitive(name: &str) -> Option<PrimitiveKind> {
    let kind = match name {
        "Bool" | "True" | "False" => PrimitiveKind::Bool,
        "I8" | "U8" => PrimitiveKind::I8,
        "I16" | "U16" => PrimitiveKind::I16,
        "I32" | "U32" => PrimitiveKind::I32,
        "I64" | "U64" => PrimitiveKind::I64,
        "I128" | "U128" => PrimitiveKind::I128,
        "F16" => PrimitiveKind::F16,
        "F32" => PrimitiveKind::F32,
        "F64" => PrimitiveKind::F64,
        _ => return None,
    };
    Some(kind)
}

impl<B: TypeBackend> TypeLowerer<'_, B> {
    /// Lower a nominal reference.
    ///
    /// User-defined types always lower to a pointer to their named
    /// aggregate; only primitives are passed by value.
    #[instrument(skip_all, fields(ty = %ty), level = "debug")]
    pub(super) fn lower_nominal(
        &mut self,
        ty: &TypeExpr,
        nominal: &Nominal,
    ) -> Result<B::Handle, LowerError> {
        if let Some(kind) = builtin_primitive(&nominal.name) {
            return Ok(self.backend.primitive(kind));
        }

        let name = match mangle_nominal(self.symbols, nominal) {
            Ok(name) => name,
            Err(MangleError::UnresolvedParam { span, .. } | MangleError::NotNominal { span }) => {
                return Err(self.not_implemented(Unsupported::TypeParamRef, span));
            }
        };

        // Registering the placeholder before any field is lowered is what
        // makes self-referential and mutually recursive types terminate.
        let aggregate = match self.backend.get_or_create_named(&name) {
            Named::Existing(existing) => {
                tracing::debug!(%name, "named type cache hit");
                return Ok(self.backend.pointer_to(existing));
            }
            Named::Created(created) => {
                tracing::debug!(%name, "registered opaque aggregate");
                created
            }
            Named::Reclaimed(reclaimed) => {
                tracing::debug!(%name, "rebuilding abandoned aggregate");
                reclaimed
            }
        };

        let symbols = self.symbols;
        let def = symbols.get(nominal.def);
        let built = match def.kind {
            DefKind::Trait => Err(self.not_implemented(Unsupported::Trait, ty.span)),
            // Class and actor descriptors, and actor dispatch, are not
            // generated yet; both get their storage layout only.
            DefKind::Class | DefKind::Actor => self.build_body(aggregate, def, &nominal.args),
            DefKind::Primitive => panic!(
                "primitive `{}` is not a built-in machine type and cannot be lowered",
                def.name
            ),
        };

        // The placeholder stays registered for references already handed
        // out, but the next lookup rebuilds it and fails the same way.
        if let Err(err) = built {
            self.backend.abandon_named(&name);
            tracing::debug!(%name, "abandoned aggregate");
            return Err(err);
        }

        Ok(self.backend.pointer_to(aggregate))
    }

    /// Lower every `var`/`let` field of `def`, in declaration order, and
    /// commit them as the body of `aggregate`.
    ///
    /// Nothing is committed if any field fails.
    fn build_body(
        &mut self,
        aggregate: B::Handle,
        def: &TypeDef,
        args: &[TypeExpr],
    ) -> Result<(), LowerError> {
        let mut fields = Vec::with_capacity(def.fields().count());
        for field in def.fields() {
            let reified = reify(&field.ty, &def.params, args);
            let handle = self.lower(&reified)?;
            tracing::trace!(field = %field.name, index = fields.len(), "lowered field slot");
            fields.push(handle);
        }

        self.backend.set_body(aggregate, &fields);
        tracing::debug!(def = %def.name, fields = fields.len(), "committed aggregate body");
        Ok(())
    }
}
