//! Lifts the p-code of single machine instructions into Cranelift IR.
//!
//! The external disassembly engine (a [`sable_pcode::PcodeSource`]) pushes
//! micro-ops at the lifter, which emits one helper function per instruction
//! into the caller's module. The helper receives `(state, pc, mem)` and
//! returns the updated memory handle; the architectural state record is
//! mutated in place through the arch facade's register slots.

pub mod arch;
mod translate;

use cranelift::codegen;
use cranelift::prelude::*;
use cranelift_module::{FuncId, Linkage, Module, ModuleResult};

use sable_pcode::PcodeSource;

use crate::arch::{required_slot, Arch, NEXT_PC_REG, PC_REG};
use crate::translate::{resize_int, sized_int, state_flags, Emitter};

pub use crate::translate::mem::{MemIntrinsics, MEM_LOAD_SYMBOLS, MEM_STORE_SYMBOLS};

/// Outcome of lifting one op or one whole instruction.
///
/// The instruction-level status is the floor of all per-op statuses
/// (`Success > Unsupported > Invalid`) and once degraded it is never revised
/// back; see [`LiftStatus::degrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LiftStatus {
    /// The IR builder refused an emission (e.g. a memory store intrinsic was
    /// unavailable).
    Invalid,
    /// An opcode is known but unmodeled, or an operand could not be read at
    /// the requested type.
    Unsupported,
    Success,
}

impl LiftStatus {
    pub fn is_success(self) -> bool {
        self == LiftStatus::Success
    }

    /// Folds a per-op outcome into the running status, monotonically.
    pub fn degrade(&mut self, op_status: LiftStatus) {
        *self = (*self).min(op_status);
    }
}

/// How a decoded instruction transfers control. Only
/// [`Category::ConditionalBranch`] changes lifting behavior (the
/// branch-taken side channel); the rest are carried for downstream
/// consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Normal,
    DirectBranch,
    IndirectBranch,
    ConditionalBranch,
    Call,
    Return,
}

/// A decoded instruction presented for lifting.
pub struct Insn {
    pub address: u64,
    pub bytes: Vec<u8>,
    pub category: Category,
}

/// Inlining guidance recorded on emitted helpers. Cranelift has no
/// per-function inline attributes, so this travels on the helper metadata
/// for consumers that perform inlining themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineHint {
    Never,
    Hint,
    Always,
}

/// Handle to an emitted per-instruction helper function.
pub struct LiftedHelper {
    pub id: FuncId,
    pub name: String,
    pub inline: InlineHint,
}

pub struct Settings {
    /// Prefix used when naming per-instruction helper functions.
    pub helper_prefix: String,

    /// Treat a scratch offset re-requested with a different size as fatal
    /// instead of allocating a distinct cell.
    pub strict_scratch_sizes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { helper_prefix: "pcode_insn".into(), strict_scratch_sizes: false }
    }
}

/// Caller-side values the lifted helper is invoked with: the state pointer,
/// the current pc, and a stack slot holding the caller's memory handle.
pub struct CallerFrame {
    pub state_ptr: Value,
    pub pc: Value,
    pub mem_slot: codegen::ir::StackSlot,
}

pub struct Lifter<A> {
    arch: A,
    intrinsics: MemIntrinsics<FuncId>,
    pub settings: Settings,

    /// Reused across helper functions.
    builder_ctx: FunctionBuilderContext,

    /// Cranelift codegen context for helper definitions.
    code_ctx: codegen::Context,

    /// Disambiguates helpers lifted at the same address.
    helper_index: usize,
}

impl<A: Arch> Lifter<A> {
    pub fn new(arch: A, intrinsics: MemIntrinsics<FuncId>) -> Self {
        Self {
            arch,
            intrinsics,
            settings: Settings::default(),
            builder_ctx: FunctionBuilderContext::new(),
            code_ctx: codegen::Context::new(),
            helper_index: 0,
        }
    }

    pub fn arch(&self) -> &A {
        &self.arch
    }

    /// Emits the helper function for `insn`, driving the dispatcher with the
    /// ops produced by `pcode`.
    ///
    /// The helper frame: load `NEXT_PC`, advance it past the instruction
    /// bytes, mirror it into `PC`, emit the instruction's ops, copy the
    /// final `PC` back into `NEXT_PC`, and return the memory handle.
    pub fn lift_insn_function<M: Module>(
        &mut self,
        module: &mut M,
        insn: &Insn,
        pcode: &mut dyn PcodeSource,
    ) -> ModuleResult<(LiftStatus, LiftedHelper)> {
        module.clear_context(&mut self.code_ctx);
        let sig = helper_signature(module);
        self.code_ctx.func.signature = sig.clone();

        let mut builder = FunctionBuilder::new(&mut self.code_ctx.func, &mut self.builder_ctx);
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        builder.switch_to_block(entry);
        builder.seal_block(entry);

        let (state_ptr, mem) = match builder.block_params(entry) {
            &[state_ptr, _pc, mem] => (state_ptr, mem),
            params => unreachable!("expected 3 helper params (got {})", params.len()),
        };

        let mem_slot = builder.create_sized_stack_slot(StackSlotData::new(
            StackSlotKind::ExplicitSlot,
            8,
            3,
        ));
        builder.ins().stack_store(mem, mem_slot, 0);

        let intrinsics = self.intrinsics.import(module, builder.func);

        let next_pc = required_slot(&self.arch, NEXT_PC_REG);
        let pc = required_slot(&self.arch, PC_REG);

        let old_next = builder.ins().load(
            sized_int(next_pc.size),
            state_flags(),
            state_ptr,
            next_pc.offset as i32,
        );
        let curr = builder.ins().iadd_imm(old_next, insn.bytes.len() as i64);
        builder.ins().store(state_flags(), curr, state_ptr, next_pc.offset as i32);
        let curr_pc = resize_int(&mut builder, curr, next_pc.size, pc.size);
        builder.ins().store(state_flags(), curr_pc, state_ptr, pc.offset as i32);

        let mut emitter = Emitter::new(
            &mut builder,
            &self.arch,
            &self.settings,
            insn,
            state_ptr,
            mem_slot,
            intrinsics,
        );
        let decoded = pcode.pcode_one_insn(insn.address, &insn.bytes, &mut emitter);
        let mut status = emitter.finish();
        if decoded.is_none() {
            tracing::error!("no p-code for the instruction at {:#x}", insn.address);
            status.degrade(LiftStatus::Invalid);
        }

        // Whatever the ops left in PC becomes NEXT_PC, so downstream lifters
        // see the usual convention.
        let final_pc =
            builder.ins().load(sized_int(pc.size), state_flags(), state_ptr, pc.offset as i32);
        let final_pc = resize_int(&mut builder, final_pc, pc.size, next_pc.size);
        builder.ins().store(state_flags(), final_pc, state_ptr, next_pc.offset as i32);

        let ret_mem = builder.ins().stack_load(types::I64, mem_slot, 0);
        builder.ins().return_(&[ret_mem]);
        builder.finalize();

        let name =
            format!("{}_{:#x}_{}", self.settings.helper_prefix, insn.address, self.helper_index);
        self.helper_index += 1;

        let id = module.declare_function(&name, Linkage::Local, &sig)?;
        module.define_function(id, &mut self.code_ctx)?;
        tracing::debug!("emitted {name} with status {status:?}");

        Ok((status, LiftedHelper { id, name, inline: InlineHint::Always }))
    }

    /// The outer lifting entry point: emits the helper for `insn`, then, in
    /// the caller's block, calls it with `(state, pc, mem)`, stores the
    /// returned memory handle back into the caller's memory slot, and copies
    /// `PC` into the state's `NEXT_PC` slot.
    pub fn lift_into_block<M: Module>(
        &mut self,
        module: &mut M,
        caller: &mut FunctionBuilder,
        frame: CallerFrame,
        insn: &Insn,
        pcode: &mut dyn PcodeSource,
    ) -> ModuleResult<LiftStatus> {
        let (status, helper) = self.lift_insn_function(module, insn, pcode)?;

        let helper_ref = module.declare_func_in_func(helper.id, caller.func);
        let mem = caller.ins().stack_load(types::I64, frame.mem_slot, 0);
        let call = caller.ins().call(helper_ref, &[frame.state_ptr, frame.pc, mem]);
        let new_mem = caller.inst_results(call)[0];
        caller.ins().stack_store(new_mem, frame.mem_slot, 0);

        let pc = required_slot(&self.arch, PC_REG);
        let next_pc = required_slot(&self.arch, NEXT_PC_REG);
        let pc_value =
            caller.ins().load(sized_int(pc.size), state_flags(), frame.state_ptr, pc.offset as i32);
        let fitted = resize_int(caller, pc_value, pc.size, next_pc.size);
        caller.ins().store(state_flags(), fitted, frame.state_ptr, next_pc.offset as i32);

        Ok(status)
    }
}

fn helper_signature<M: Module>(module: &M) -> Signature {
    let mut sig = Signature::new(module.isa().default_call_conv());
    sig.params.push(AbiParam::new(types::I64)); // state pointer
    sig.params.push(AbiParam::new(types::I64)); // pc
    sig.params.push(AbiParam::new(types::I64)); // memory handle
    sig.returns.push(AbiParam::new(types::I64)); // updated memory handle
    sig
}
