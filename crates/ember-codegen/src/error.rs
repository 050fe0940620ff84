//! Lowering failures and the sink they are reported to.
//!
//! A `LowerError` is the recoverable tier: a type shape this version of the
//! code generator cannot represent yet. Each one is reported to the
//! [`DiagnosticSink`] once, where it originates, and then propagated to the
//! driver, which abandons code generation for the unit. Contract
//! violations between the front end and lowering are not errors; they
//! panic.

use std::fmt;

use rowan::TextRange;

/// A type shape that has no machine representation yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unsupported {
    Intersection,
    Tuple,
    Structural,
    /// A type parameter reference left after reification.
    TypeParamRef,
    /// Traits carry no storage; they need virtual dispatch.
    Trait,
    /// A union whose two sides are the same class or actor. Decided by the
    /// aggregate named, so it does not depend on whether the backend's
    /// pointers carry their pointee.
    PointerUnion,
    /// A union of two different machine types (a tagged sum).
    Union,
}

impl Unsupported {
    /// The phrase used in messages: "not implemented (lowering for ...)".
    pub fn description(self) -> &'static str {
        match self {
            Unsupported::Intersection => "intersection types",
            Unsupported::Tuple => "tuple types",
            Unsupported::Structural => "structural types",
            Unsupported::TypeParamRef => "type parameter references",
            Unsupported::Trait => "traits",
            Unsupported::PointerUnion => "unions of pointer types",
            Unsupported::Union => "union types",
        }
    }
}

/// A failure to lower a type expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LowerError {
    /// The type shape is recognized but not supported by this version.
    NotImplemented { what: Unsupported, span: TextRange },
}

impl LowerError {
    pub fn not_implemented(what: Unsupported, span: TextRange) -> Self {
        LowerError::NotImplemented { what, span }
    }

    pub fn span(&self) -> TextRange {
        match self {
            LowerError::NotImplemented { span, .. } => *span,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, LowerError::NotImplemented { .. })
    }

    /// The unsupported shape, for not-implemented failures.
    pub fn unsupported(&self) -> Option<Unsupported> {
        match self {
            LowerError::NotImplemented { what, .. } => Some(*what),
        }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::NotImplemented { what, .. } => {
                write!(f, "not implemented (lowering for {})", what.description())
            }
        }
    }
}

impl std::error::Error for LowerError {}

/// Where lowering reports failures. Reporting never changes control flow.
pub trait DiagnosticSink {
    fn report(&mut self, error: &LowerError);
}

impl DiagnosticSink for Vec<LowerError> {
    fn report(&mut self, error: &LowerError) {
        self.push(error.clone());
    }
}

/// A sink that drops every report.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _error: &LowerError) {}
}
