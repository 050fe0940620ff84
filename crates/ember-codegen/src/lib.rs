//! Type lowering for the Ember compiler.
//!
//! Turns the front end's resolved [`TypeExpr`](ember_types::TypeExpr)s into
//! machine types a native backend can lay out: fixed-width scalars for the
//! built-in primitives and pointers to named aggregates for classes and
//! actors. Generic definitions are reified per instantiation, and every
//! instantiation is registered once under its mangled name.
//!
//! ## Architecture
//!
//! - [`backend`]: the backend type facility and its implementations
//! - [`lower`]: the lowering engine ([`TypeLowerer`])
//! - [`error`]: lowering failures and the diagnostic sink
//! - [`diagnostics`]: ariadne / JSON rendering of failures
//!
//! ## Example
//!
//! ```
//! use ember_codegen::backend::table::TypeTable;
//! use ember_codegen::{LowerError, TypeLowerer};
//! use ember_types::{DefKind, Member, SymbolTable, TextRange, TypeDef, TypeExpr};
//!
//! let mut symbols = SymbolTable::with_builtins();
//! let span = TextRange::default();
//! let node = symbols.declare("Node", DefKind::Class, span);
//! let i32_id = symbols.lookup("I32").unwrap();
//! symbols.fill(
//!     node,
//!     TypeDef::new("Node", DefKind::Class, span).with_members(vec![
//!         Member::var("value", TypeExpr::nominal("I32", vec![], i32_id, span)),
//!         Member::var("next", TypeExpr::nominal("Node", vec![], node, span)),
//!     ]),
//! );
//!
//! let mut table = TypeTable::new();
//! let mut errors: Vec<LowerError> = Vec::new();
//! TypeLowerer::new(&symbols, &mut table, &mut errors)
//!     .lower_definition(node, &[])
//!     .unwrap();
//! assert_eq!(table.dump(), "%Node = type { i32, %Node* }");
//! ```

pub mod backend;
pub mod diagnostics;
pub mod error;
pub mod lower;

pub use backend::{HandleKind, Named, PrimitiveKind, TypeBackend};
pub use error::{DiagnosticSink, LowerError, NullSink, Unsupported};
pub use lower::TypeLowerer;

use ember_types::{SymbolTable, TypeExpr};

/// Lower a single type expression, collecting reported failures in `errors`.
pub fn lower_type<B: TypeBackend>(
    symbols: &SymbolTable,
    backend: &mut B,
    ty: &TypeExpr,
    errors: &mut Vec<LowerError>,
) -> Result<B::Handle, LowerError> {
    TypeLowerer::new(symbols, backend, errors).lower(ty)
}
