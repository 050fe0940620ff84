//! Reification: replacing type parameter references with type arguments.

use crate::def::TypeParam;
use crate::ty::{MethodSig, Nominal, TypeExpr, TypeExprKind};

/// Substitute `args[i]` for every reference to `params[i]` inside `ty`.
///
/// Returns a fresh tree; `ty` is left untouched. Substituted arguments keep
/// their own spans. References to parameters that are not in `params` (or
/// have no matching argument) are copied through unchanged.
pub fn reify(ty: &TypeExpr, params: &[TypeParam], args: &[TypeExpr]) -> TypeExpr {
    if params.is_empty() {
        return ty.clone();
    }

    let kind = match &ty.kind {
        TypeExprKind::TypeParamRef(param) => {
            let substituted = params
                .iter()
                .position(|p| p.id == *param)
                .and_then(|i| args.get(i));
            match substituted {
                Some(arg) => return arg.clone(),
                None => TypeExprKind::TypeParamRef(*param),
            }
        }
        TypeExprKind::Union(l, r) => TypeExprKind::Union(
            Box::new(reify(l, params, args)),
            Box::new(reify(r, params, args)),
        ),
        TypeExprKind::Intersection(l, r) => TypeExprKind::Intersection(
            Box::new(reify(l, params, args)),
            Box::new(reify(r, params, args)),
        ),
        TypeExprKind::Tuple(elems) => {
            TypeExprKind::Tuple(elems.iter().map(|e| reify(e, params, args)).collect())
        }
        TypeExprKind::Nominal(nominal) => TypeExprKind::Nominal(Nominal {
            package: nominal.package.clone(),
            name: nominal.name.clone(),
            args: nominal.args.iter().map(|a| reify(a, params, args)).collect(),
            def: nominal.def,
        }),
        TypeExprKind::Structural(methods) => TypeExprKind::Structural(
            methods
                .iter()
                .map(|m| MethodSig {
                    name: m.name.clone(),
                    params: m.params.iter().map(|p| reify(p, params, args)).collect(),
                    ret: m.ret.as_ref().map(|r| reify(r, params, args)),
                })
                .collect(),
        ),
        TypeExprKind::Arrow { receiver, target } => TypeExprKind::Arrow {
            receiver: *receiver,
            target: Box::new(reify(target, params, args)),
        },
    };

    TypeExpr::new(kind, ty.span)
}
