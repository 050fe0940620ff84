//! LLVM backend through Inkwell.
//!
//! Named aggregates become named LLVM struct types in the module's context,
//! which already keeps one struct per name. LLVM pointers are opaque, so
//! every pointer handle is the same `ptr` type regardless of pointee; the
union lowering tells pointers apart by the aggregates they name.

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;
use rustc_hash::FxHashSet;

use super::{HandleKind, PrimitiveKind, TypeBackend};

/// Lowers onto the types of one LLVM module.
pub struct LlvmTypeBackend<'a, 'ctx> {
    context: &'ctx Context,
    module: &'a Module<'ctx>,
    abandoned: FxHashSet<String>,
}

impl<'a, 'ctx> LlvmTypeBackend<'a, 'ctx> {
    pub fn new(context: &'ctx Context, module: &'a Module<'ctx>) -> Self {
        LlvmTypeBackend {
            context,
            module,
            abandoned: FxHashSet::default(),
        }
    }
}

impl<'ctx> TypeBackend for LlvmTypeBackend<'_, 'ctx> {
    type Handle = BasicTypeEnum<'ctx>;

    fn primitive(&mut self, kind: PrimitiveKind) -> BasicTypeEnum<'ctx> {
        match kind {
            PrimitiveKind::Bool => self.context.bool_type().into(),
            PrimitiveKind::I8 => self.context.i8_type().into(),
            PrimitiveKind::I16 => self.context.i16_type().into(),
            PrimitiveKind::I32 => self.context.i32_type().into(),
            PrimitiveKind::I64 => self.context.i64_type().into(),
            PrimitiveKind::I128 => self.context.i128_type().into(),
            PrimitiveKind::F16 => self.context.f16_type().into(),
            PrimitiveKind::F32 => self.context.f32_type().into(),
            PrimitiveKind::F64 => self.context.f64_type().into(),
        }
    }

    fn lookup_named(&self, name: &str) -> Option<BasicTypeEnum<'ctx>> {
        self.module.get_struct_type(name).map(Into::into)
    }

    fn create_named_opaque(&mut self, name: &str) -> BasicTypeEnum<'ctx> {
        self.context.opaque_struct_type(name).into()
    }

    fn set_body(&mut self, aggregate: BasicTypeEnum<'ctx>, fields: &[BasicTypeEnum<'ctx>]) {
        let set = aggregate.into_struct_type().set_body(fields, false);
        debug_assert!(set, "LLVM refused to set a struct body");
    }

    fn abandon_named(&mut self, name: &str) {
        self.abandoned.insert(name.to_string());
    }

    fn reclaim_abandoned(&mut self, name: &str) -> bool {
        self.abandoned.remove(name)
    }

    fn pointer_to(&mut self, _pointee: BasicTypeEnum<'ctx>) -> BasicTypeEnum<'ctx> {
        self.context.ptr_type(AddressSpace::default()).into()
    }

    fn kind_of(&self, handle: BasicTypeEnum<'ctx>) -> HandleKind {
        match handle {
            BasicTypeEnum::IntType(int) => HandleKind::Integer {
                bits: int.get_bit_width(),
            },
            BasicTypeEnum::FloatType(float) => {
                let bits = if float == self.context.f16_type() {
                    16
                } else if float == self.context.f32_type() {
                    32
                } else {
                    64
                };
                HandleKind::Float { bits }
            }
            BasicTypeEnum::PointerType(_) => HandleKind::Pointer,
            _ => HandleKind::Aggregate,
        }
    }
}
