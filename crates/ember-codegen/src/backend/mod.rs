//! The backend type facility.
//!
//! Type lowering never builds machine types itself. It asks a
//! [`TypeBackend`] for primitive and pointer handles, and for named
//! aggregates which the backend keeps in a module-wide registry keyed by
//! mangled name. That registry is the deduplication cache: one named
//! aggregate per name for the lifetime of the module.
//!
//! - [`table`]: in-memory backend, used by tests and tooling
//! - [`shared`]: lock-guarded in-memory backend for multi-threaded drivers
//! - `llvm`: inkwell backend (cargo feature `llvm`)

#[cfg(feature = "llvm")]
pub mod llvm;
pub mod shared;
pub mod table;

use std::fmt;

/// The fixed set of machine scalars built-in primitive names lower to.
///
/// Signedness is a front-end property; `I32` and `U32` share `I32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// 1-bit integer.
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    F16,
    F32,
    F64,
}

impl PrimitiveKind {
    /// The machine shape of this primitive.
    pub fn handle_kind(self) -> HandleKind {
        match self {
            PrimitiveKind::Bool => HandleKind::Integer { bits: 1 },
            PrimitiveKind::I8 => HandleKind::Integer { bits: 8 },
            PrimitiveKind::I16 => HandleKind::Integer { bits: 16 },
            PrimitiveKind::I32 => HandleKind::Integer { bits: 32 },
            PrimitiveKind::I64 => HandleKind::Integer { bits: 64 },
            PrimitiveKind::I128 => HandleKind::Integer { bits: 128 },
            PrimitiveKind::F16 => HandleKind::Float { bits: 16 },
            PrimitiveKind::F32 => HandleKind::Float { bits: 32 },
            PrimitiveKind::F64 => HandleKind::Float { bits: 64 },
        }
    }
}

/// What a handle denotes, as far as lowering decisions need to know.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Integer { bits: u32 },
    Float { bits: u32 },
    Pointer,
    Aggregate,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Integer { bits } => write!(f, "i{}", bits),
            HandleKind::Float { bits } => write!(f, "f{}", bits),
            HandleKind::Pointer => write!(f, "pointer"),
            HandleKind::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// Result of [`TypeBackend::get_or_create_named`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Named<H> {
    /// The name was already registered; its body may still be in progress.
    Existing(H),
    /// A fresh opaque aggregate was registered under the name.
    Created(H),
    /// The name was registered but its body build was abandoned. The
    /// caller builds it again, as if it had just been created.
    Reclaimed(H),
}

/// A store of machine-representable types.
///
/// Handles are owned by the backend. Two handles compare equal iff they
/// denote the same backend type.
pub trait TypeBackend {
    type Handle: Copy + Eq + fmt::Debug;

    /// The handle for a fixed-width scalar.
    fn primitive(&mut self, kind: PrimitiveKind) -> Self::Handle;

    /// The named aggregate registered under `name`, if any.
    fn lookup_named(&self, name: &str) -> Option<Self::Handle>;

    /// Register a bodiless aggregate under `name`.
    ///
    /// `name` must not be registered yet.
    fn create_named_opaque(&mut self, name: &str) -> Self::Handle;

    /// Set the ordered field list of an aggregate created by
    /// [`TypeBackend::create_named_opaque`].
    fn set_body(&mut self, aggregate: Self::Handle, fields: &[Self::Handle]);

    /// A pointer to `pointee`.
    fn pointer_to(&mut self, pointee: Self::Handle) -> Self::Handle;

    /// The machine shape of a handle.
    fn kind_of(&self, handle: Self::Handle) -> HandleKind;

    /// Mark the registered, still opaque aggregate `name` as abandoned:
    /// building its body failed and nothing will fill it.
    fn abandon_named(&mut self, name: &str);

    /// Clear the abandoned mark on `name`, returning whether it was set.
    fn reclaim_abandoned(&mut self, name: &str) -> bool;

    /// Look `name` up and register an opaque aggregate if it is absent.
    ///
    /// An abandoned aggregate is handed back as [`Named::Reclaimed`] with its
    /// mark cleared, so exactly one caller rebuilds it. Backends shared
    /// between threads override this so the check and the registration
    /// happen under one critical section.
    fn get_or_create_named(&mut self, name: &str) -> Named<Self::Handle> {
        match self.lookup_named(name) {
            Some(existing) if self.reclaim_abandoned(name) => Named::Reclaimed(existing),
            Some(existing) => Named::Existing(existing),
            None => Named::Created(self.create_named_opaque(name)),
        }
    }
}
