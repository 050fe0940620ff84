//! A [`TypeTable`] shared between code generation threads.
//!
//! Every clone refers to the same table. Reads take the read lock, writes
//! the write lock, and [`TypeBackend::get_or_create_named`] performs its
//! lookup and registration under a single write lock so two threads racing
//! on the same mangled name register it once. The lock is released before
//! the caller builds the aggregate body; a thread that finds the name
//! already registered gets the (possibly still opaque) aggregate back. An
//! abandoned aggregate is reclaimed under the same lock, so only one thread
//! rebuilds it.

use std::sync::Arc;

use parking_lot::RwLock;

use super::table::{TypeId, TypeTable};
use super::{HandleKind, Named, PrimitiveKind, TypeBackend};

#[derive(Clone, Debug, Default)]
pub struct SharedTypeTable {
    inner: Arc<RwLock<TypeTable>>,
}

impl SharedTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the underlying table under the read lock.
    pub fn with_table<R>(&self, f: impl FnOnce(&TypeTable) -> R) -> R {
        f(&*self.inner.read())
    }
}

impl TypeBackend for SharedTypeTable {
    type Handle = TypeId;

    fn primitive(&mut self, kind: PrimitiveKind) -> TypeId {
        self.inner.write().primitive(kind)
    }

    fn lookup_named(&self, name: &str) -> Option<TypeId> {
        self.inner.read().lookup_named(name)
    }

    fn create_named_opaque(&mut self, name: &str) -> TypeId {
        self.inner.write().create_named_opaque(name)
    }

    fn set_body(&mut self, aggregate: TypeId, fields: &[TypeId]) {
        self.inner.write().set_body(aggregate, fields);
    }

    fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.inner.write().pointer_to(pointee)
    }

    fn kind_of(&self, handle: TypeId) -> HandleKind {
        self.inner.read().kind_of(handle)
    }

    fn abandon_named(&mut self, name: &str) {
        self.inner.write().abandon_named(name);
    }

    fn reclaim_abandoned(&mut self, name: &str) -> bool {
        self.inner.write().reclaim_abandoned(name)
    }

    fn get_or_create_named(&mut self, name: &str) -> Named<TypeId> {
        let mut table = self.inner.write();
        match table.lookup_named(name) {
            Some(existing) if table.reclaim_abandoned(name) => Named::Reclaimed(existing),
            Some(existing) => Named::Existing(existing),
            None => Named::Created(table.create_named_opaque(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_registry() {
        let mut a = SharedTypeTable::new();
        let mut b = a.clone();
        let created = a.get_or_create_named("Point");
        let Named::Created(id) = created else {
            panic!("expected a fresh registration, got {:?}", created);
        };
        assert_eq!(b.get_or_create_named("Point"), Named::Existing(id));
        assert_eq!(a.with_table(TypeTable::create_calls), 1);
    }

    #[test]
    fn racing_first_access_registers_once() {
        let shared = SharedTypeTable::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let mut backend = shared.clone();
                scope.spawn(move || {
                    backend.get_or_create_named("Contended");
                });
            }
        });
        assert_eq!(shared.with_table(TypeTable::create_calls), 1);
    }

    #[test]
    fn racing_reclaim_hands_out_one_rebuild() {
        let mut shared = SharedTypeTable::new();
        shared.get_or_create_named("Broken");
        shared.abandon_named("Broken");
        let reclaimed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let mut backend = shared.clone();
                    scope.spawn(move || {
                        matches!(backend.get_or_create_named("Broken"), Named::Reclaimed(_))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).filter(|won| *won).count()
        });
        assert_eq!(reclaimed, 1);
        assert_eq!(shared.with_table(TypeTable::create_calls), 1);
    }
}
