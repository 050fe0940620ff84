//! In-memory type table.
//!
//! An arena of machine types with the same identity rules an LLVM context
//! has: scalars and pointers are interned, named aggregates are unique per
//! name. The textual dump uses LLVM's typed-pointer syntax so layouts read
//! the way they would in a `.ll` file:
//!
//! ```text
//! %Node = type { i32, %Node* }
//! %"Pair[I32,Bool]" = type { i32, i1 }
//! %Shape = type opaque
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use super::{HandleKind, PrimitiveKind, TypeBackend};

/// A handle into a [`TypeTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

#[derive(Clone, Debug, PartialEq, Eq)]
enum TypeData {
    Scalar(PrimitiveKind),
    Pointer(TypeId),
    Named {
        name: String,
        body: Option<Vec<TypeId>>,
    },
}

/// The in-memory [`TypeBackend`].
#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeData>,
    scalars: FxHashMap<PrimitiveKind, TypeId>,
    pointers: FxHashMap<TypeId, TypeId>,
    named: FxHashMap<String, TypeId>,
    /// Named aggregates in creation order, for deterministic dumps.
    named_order: Vec<TypeId>,
    abandoned: FxHashSet<String>,
    create_calls: usize,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    fn data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    /// The field list of a named aggregate, `None` while it is still opaque
    /// (or when `id` is not an aggregate).
    pub fn body(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.data(id) {
            TypeData::Named { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// The registered name of an aggregate.
    pub fn name_of(&self, id: TypeId) -> Option<&str> {
        match self.data(id) {
            TypeData::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// What a pointer points at.
    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Pointer(pointee) => Some(*pointee),
            _ => None,
        }
    }

    /// Number of named aggregates registered so far.
    pub fn named_count(&self) -> usize {
        self.named_order.len()
    }

    /// How many times [`TypeBackend::create_named_opaque`] has been called.
    pub fn create_calls(&self) -> usize {
        self.create_calls
    }

    /// Whether the aggregate registered under `name` was abandoned.
    pub fn is_abandoned(&self, name: &str) -> bool {
        self.abandoned.contains(name)
    }

    /// Names of all aggregates in creation order.
    pub fn named_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.named_order.iter().filter_map(|id| self.name_of(*id))
    }

    /// Render one type in LLVM syntax (`i32`, `double`, `%Node*`).
    pub fn render(&self, id: TypeId) -> String {
        match self.data(id) {
            TypeData::Scalar(kind) => scalar_name(*kind).to_string(),
            TypeData::Pointer(pointee) => format!("{}*", self.render(*pointee)),
            TypeData::Named { name, .. } => format!("%{}", quote_name(name)),
        }
    }

    /// One line per named aggregate, in creation order.
    pub fn dump(&self) -> String {
        let mut lines = Vec::with_capacity(self.named_order.len());
        for id in &self.named_order {
            let TypeData::Named { name, body } = self.data(*id) else {
                continue;
            };
            let body = match body {
                None => "opaque".to_string(),
                Some(fields) if fields.is_empty() => "{}".to_string(),
                Some(fields) => {
                    let fields: Vec<String> = fields.iter().map(|f| self.render(*f)).collect();
                    format!("{{ {} }}", fields.join(", "))
                }
            };
            lines.push(format!("%{} = type {}", quote_name(name), body));
        }
        lines.join("\n")
    }
}

fn scalar_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => "i1",
        PrimitiveKind::I8 => "i8",
        PrimitiveKind::I16 => "i16",
        PrimitiveKind::I32 => "i32",
        PrimitiveKind::I64 => "i64",
        PrimitiveKind::I128 => "i128",
        PrimitiveKind::F16 => "half",
        PrimitiveKind::F32 => "float",
        PrimitiveKind::F64 => "double",
    }
}

/// LLVM identifiers outside `[A-Za-z0-9._$-]` must be quoted.
fn quote_name(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-'));
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name)
    }
}

impl TypeBackend for TypeTable {
    type Handle = TypeId;

    fn primitive(&mut self, kind: PrimitiveKind) -> TypeId {
        if let Some(id) = self.scalars.get(&kind) {
            return *id;
        }
        let id = self.push(TypeData::Scalar(kind));
        self.scalars.insert(kind, id);
        id
    }

    fn lookup_named(&self, name: &str) -> Option<TypeId> {
        self.named.get(name).copied()
    }

    fn create_named_opaque(&mut self, name: &str) -> TypeId {
        assert!(
            !self.named.contains_key(name),
            "named type `{}` registered twice",
            name
        );
        self.create_calls += 1;
        let id = self.push(TypeData::Named {
            name: name.to_string(),
            body: None,
        });
        self.named.insert(name.to_string(), id);
        self.named_order.push(id);
        id
    }

    fn set_body(&mut self, aggregate: TypeId, fields: &[TypeId]) {
        match &mut self.types[aggregate.0 as usize] {
            TypeData::Named { name, body } => {
                assert!(body.is_none(), "body of `{}` set twice", name);
                *body = Some(fields.to_vec());
            }
            other => panic!("set_body on non-aggregate type {:?}", other),
        }
    }

    fn abandon_named(&mut self, name: &str) {
        let id = self.named.get(name).copied();
        assert!(
            id.is_some_and(|id| self.body(id).is_none()),
            "abandoning `{}`, which is not a registered opaque aggregate",
            name
        );
        self.abandoned.insert(name.to_string());
    }

    fn reclaim_abandoned(&mut self, name: &str) -> bool {
        self.abandoned.remove(name)
    }

    fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        if let Some(id) = self.pointers.get(&pointee) {
            return *id;
        }
        let id = self.push(TypeData::Pointer(pointee));
        self.pointers.insert(pointee, id);
        id
    }

    fn kind_of(&self, handle: TypeId) -> HandleKind {
        match self.data(handle) {
            TypeData::Scalar(kind) => kind.handle_kind(),
            TypeData::Pointer(_) => HandleKind::Pointer,
            TypeData::Named { .. } => HandleKind::Aggregate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Named;

    #[test]
    fn scalars_and_pointers_are_interned() {
        let mut table = TypeTable::new();
        let a = table.primitive(PrimitiveKind::I32);
        let b = table.primitive(PrimitiveKind::I32);
        assert_eq!(a, b);
        assert_ne!(a, table.primitive(PrimitiveKind::I64));
        let ptr = table.pointer_to(a);
        assert_eq!(ptr, table.pointer_to(b));
        assert_eq!(table.kind_of(ptr), HandleKind::Pointer);
    }

    #[test]
    fn named_types_start_opaque() {
        let mut table = TypeTable::new();
        let node = table.create_named_opaque("Node");
        assert_eq!(table.lookup_named("Node"), Some(node));
        assert_eq!(table.body(node), None);
        assert_eq!(table.dump(), "%Node = type opaque");

        let i32_ty = table.primitive(PrimitiveKind::I32);
        let next = table.pointer_to(node);
        table.set_body(node, &[i32_ty, next]);
        assert_eq!(table.body(node), Some(&[i32_ty, next][..]));
        assert_eq!(table.dump(), "%Node = type { i32, %Node* }");
    }

    #[test]
    fn get_or_create_registers_once() {
        let mut table = TypeTable::new();
        let first = table.get_or_create_named("Point");
        let Named::Created(id) = first else {
            panic!("expected a fresh registration, got {:?}", first);
        };
        assert_eq!(table.get_or_create_named("Point"), Named::Existing(id));
        assert_eq!(table.create_calls(), 1);
        assert_eq!(table.named_count(), 1);
    }

    #[test]
    fn abandoned_names_are_reclaimed_once() {
        let mut table = TypeTable::new();
        let Named::Created(id) = table.get_or_create_named("Entry") else {
            panic!("expected a fresh registration");
        };
        table.abandon_named("Entry");
        assert!(table.is_abandoned("Entry"));
        assert_eq!(table.get_or_create_named("Entry"), Named::Reclaimed(id));
        assert!(!table.is_abandoned("Entry"));
        // While it is being rebuilt, references see the placeholder.
        assert_eq!(table.get_or_create_named("Entry"), Named::Existing(id));
        assert_eq!(table.create_calls(), 1);
    }

    #[test]
    #[should_panic(expected = "not a registered opaque aggregate")]
    fn abandoning_a_finished_aggregate_panics() {
        let mut table = TypeTable::new();
        let id = table.create_named_opaque("Done");
        table.set_body(id, &[]);
        table.abandon_named("Done");
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_registration_panics() {
        let mut table = TypeTable::new();
        table.create_named_opaque("Point");
        table.create_named_opaque("Point");
    }

    #[test]
    fn names_with_delimiters_are_quoted() {
        let mut table = TypeTable::new();
        let pair = table.create_named_opaque("Pair[I32,Bool]");
        let empty = table.create_named_opaque("collections.Empty");
        table.set_body(empty, &[]);
        let half = table.primitive(PrimitiveKind::F16);
        let double = table.primitive(PrimitiveKind::F64);
        table.set_body(pair, &[half, double]);
        assert_eq!(
            table.dump(),
            "%\"Pair[I32,Bool]\" = type { half, double }\n%collections.Empty = type {}"
        );
        assert_eq!(table.named_types().collect::<Vec<_>>(), ["Pair[I32,Bool]", "collections.Empty"]);
    }
}
