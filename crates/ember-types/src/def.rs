//! Type definitions and the symbol table that owns them.
//!
//! Definitions are stored in an arena and referred to by [`DefId`], so a
//! class whose field mentions the class itself (or a peer that mentions it
//! back) is just a pair of ids, not an ownership cycle.

use rowan::TextRange;
use rustc_hash::FxHashMap;

use crate::ty::TypeExpr;

/// Index of a definition in the [`SymbolTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

/// A type parameter identity, unique across the whole symbol table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// The category of a type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// An interface-like definition: methods only, no storage.
    Trait,
    /// A reference type with fields and synchronous methods.
    Class,
    /// A concurrent entity with fields, driven by asynchronous messages.
    Actor,
    /// A value-less definition. The built-in machine scalars are primitives.
    Primitive,
}

/// A generic parameter of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub id: ParamId,
    pub name: String,
}

/// `var` or `let`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mutability {
    Var,
    Let,
}

/// A field declaration: `var x: I32` / `let next: Node`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub mutability: Mutability,
    pub name: String,
    pub ty: TypeExpr,
    pub span: TextRange,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// `fun`: a synchronous method.
    Fun,
    /// `be`: an asynchronous behaviour (actors only).
    Be,
    /// `new`: a constructor.
    New,
}

/// A method declaration. Only its presence matters to code generation here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    pub kind: MethodKind,
    pub name: String,
    pub span: TextRange,
}

/// One member of a definition body, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn var(name: impl Into<String>, ty: TypeExpr) -> Self {
        let span = ty.span;
        Member::Field(FieldDecl {
            mutability: Mutability::Var,
            name: name.into(),
            ty,
            span,
        })
    }

    pub fn let_(name: impl Into<String>, ty: TypeExpr) -> Self {
        let span = ty.span;
        Member::Field(FieldDecl {
            mutability: Mutability::Let,
            name: name.into(),
            ty,
            span,
        })
    }

    pub fn method(kind: MethodKind, name: impl Into<String>, span: TextRange) -> Self {
        Member::Method(MethodDecl {
            kind,
            name: name.into(),
            span,
        })
    }

    /// The field declaration, if this member is a `var` or `let`.
    pub fn as_field(&self) -> Option<&FieldDecl> {
        match self {
            Member::Field(field) => Some(field),
            Member::Method(_) => None,
        }
    }
}

/// A trait, class, actor or primitive definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub package: Option<String>,
    pub kind: DefKind,
    pub params: Vec<TypeParam>,
    pub members: Vec<Member>,
    pub span: TextRange,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: DefKind, span: TextRange) -> Self {
        TypeDef {
            name: name.into(),
            package: None,
            kind,
            params: Vec::new(),
            members: Vec::new(),
            span,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_params(mut self, params: Vec<TypeParam>) -> Self {
        self.params = params;
        self
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    /// Field declarations in declaration order, methods skipped.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(Member::as_field)
    }
}

/// Package the built-in primitive definitions live in.
pub const BUILTIN_PACKAGE: &str = "builtin";

/// Names of the built-in primitives registered by [`SymbolTable::with_builtins`].
pub const BUILTIN_PRIMITIVES: &[&str] = &[
    "Bool", "True", "False", "I8", "U8", "I16", "U16", "I32", "U32", "I64", "U64", "I128",
    "U128", "F16", "F32", "F64",
];

/// Arena of every type definition in the program.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    defs: Vec<TypeDef>,
    by_name: FxHashMap<String, DefId>,
    /// First definition of each package-qualified name.
    owners: FxHashMap<String, DefId>,
    next_param: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the built-in primitive definitions.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for name in BUILTIN_PRIMITIVES {
            table.define(
                TypeDef::new(*name, DefKind::Primitive, TextRange::default())
                    .with_package(BUILTIN_PACKAGE),
            );
        }
        table
    }

    /// Add a definition and return its id.
    ///
    /// Later definitions shadow earlier ones of the same name for
    /// [`SymbolTable::lookup`]; ids stay valid either way.
    pub fn define(&mut self, def: TypeDef) -> DefId {
        let id = DefId(self.defs.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.owners.entry(package_path(&def)).or_insert(id);
        self.defs.push(def);
        id
    }

    /// Reserve an id for a definition whose body refers to itself.
    ///
    /// The slot holds a member-less definition until [`SymbolTable::fill`]
    /// replaces it.
    pub fn declare(&mut self, name: impl Into<String>, kind: DefKind, span: TextRange) -> DefId {
        self.define(TypeDef::new(name, kind, span))
    }

    /// Replace the definition behind a previously declared id.
    pub fn fill(&mut self, id: DefId, def: TypeDef) {
        let slot = &mut self.defs[id.0 as usize];
        if slot.name != def.name {
            self.by_name.remove(&slot.name);
            self.by_name.insert(def.name.clone(), id);
        }
        let old_path = package_path(slot);
        let new_path = package_path(&def);
        if old_path != new_path {
            if self.owners.get(&old_path) == Some(&id) {
                self.owners.remove(&old_path);
            }
            self.owners.entry(new_path).or_insert(id);
        }
        *slot = def;
    }

    /// Allocate a fresh type parameter.
    pub fn fresh_param(&mut self, name: impl Into<String>) -> TypeParam {
        let id = ParamId(self.next_param);
        self.next_param += 1;
        TypeParam {
            id,
            name: name.into(),
        }
    }

    pub fn get(&self, id: DefId) -> &TypeDef {
        &self.defs[id.0 as usize]
    }

    /// The name a definition is known by in generated code.
    ///
    /// `package.Name`, with built-in definitions unprefixed. It depends only
    /// on the definition, never on how a reference to it was spelled. A
    /// definition that reuses another's qualified name gets `$<id>`
    /// appended; `$` cannot occur in a source identifier.
    pub fn qualified_name(&self, id: DefId) -> String {
        let path = package_path(self.get(id));
        if self.owners.get(&path) == Some(&id) {
            path
        } else {
            format!("{}${}", path, id.0)
        }
    }

    pub fn lookup(&self, name: &str) -> Option<DefId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn package_path(def: &TypeDef) -> String {
    match def.package.as_deref() {
        Some(package) if package != BUILTIN_PACKAGE => format!("{}.{}", package, def.name),
        _ => def.name.clone(),
    }
}
