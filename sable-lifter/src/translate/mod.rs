//! Translates the p-code of one instruction into Cranelift IR.

pub(crate) mod claims;
pub mod mem;
mod ops;
pub(crate) mod param;
pub(crate) mod scratch;

use cranelift::codegen::ir::{AliasRegion, StackSlot};
use cranelift::prelude::*;

use sable_pcode::{AddrSpace, Op, PcodeSink, VarNode};

use crate::arch::{required_slot, Arch, BRANCH_TAKEN_REG, PC_REG};
use crate::translate::claims::ClaimContext;
use crate::translate::mem::MemIntrinsics;
use crate::translate::param::{ConstCell, MemCell, Param, RegCell};
use crate::translate::scratch::ScratchPool;
use crate::{Category, Insn, LiftStatus, Settings};

/// The Cranelift integer type for a varnode of `size` bytes. Non-native
/// widths round up, matching how the rest of the pipeline treats them.
pub(crate) fn sized_int(size: u8) -> Type {
    match size {
        1 => types::I8,
        2 => types::I16,
        3 | 4 => types::I32,
        5..=8 => types::I64,
        _ => {
            tracing::error!("invalid int size: {size}");
            types::INVALID
        }
    }
}

/// The Cranelift float type for a varnode of `size` bytes. Only 32- and
/// 64-bit floats exist; other widths are rejected.
pub(crate) fn sized_float(size: u8) -> Option<Type> {
    match size {
        4 => Some(types::F32),
        8 => Some(types::F64),
        _ => None,
    }
}

/// Resizes an integer value between byte widths, zero-extending or
/// truncating as needed.
pub(crate) fn resize_int(
    builder: &mut FunctionBuilder,
    value: Value,
    in_size: u8,
    out_size: u8,
) -> Value {
    let input_ty = sized_int(in_size);
    let output_ty = sized_int(out_size);
    match input_ty.bits().cmp(&output_ty.bits()) {
        std::cmp::Ordering::Less => builder.ins().uextend(output_ty, value),
        std::cmp::Ordering::Equal => value,
        std::cmp::Ordering::Greater => builder.ins().ireduce(output_ty, value),
    }
}

/// Flags for accesses to the state record.
pub(crate) fn state_flags() -> MemFlags {
    MemFlags::trusted().with_alias_region(Some(AliasRegion::Vmctx))
}

/// Per-instruction emission context: receives ops from the p-code generator
/// and appends their IR to the helper function under construction. All of
/// its state (scratch pools, claims, running status) dies with the
/// instruction.
pub(crate) struct Emitter<'a, 'b, A> {
    builder: &'a mut FunctionBuilder<'b>,
    arch: &'a A,
    settings: &'a Settings,
    insn: &'a Insn,

    /// Pointer to the architectural state record (helper parameter 0).
    state_ptr: Value,

    /// Stack slot holding the current memory handle; rewritten on stores.
    mem_slot: StackSlot,

    intrinsics: MemIntrinsics<cranelift::codegen::ir::FuncRef>,

    /// Scratch cells backing the decoder's `unique` temporaries.
    uniques: ScratchPool,

    /// Scratch cells standing in for registers the arch facade cannot name.
    unknown_regs: ScratchPool,

    claims: ClaimContext,
    status: LiftStatus,
}

impl<'a, 'b, A: Arch> Emitter<'a, 'b, A> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        builder: &'a mut FunctionBuilder<'b>,
        arch: &'a A,
        settings: &'a Settings,
        insn: &'a Insn,
        state_ptr: Value,
        mem_slot: StackSlot,
        intrinsics: MemIntrinsics<cranelift::codegen::ir::FuncRef>,
    ) -> Self {
        Self {
            builder,
            arch,
            settings,
            insn,
            state_ptr,
            mem_slot,
            intrinsics,
            uniques: ScratchPool::new("unique"),
            unknown_regs: ScratchPool::new("unknown-register"),
            claims: ClaimContext::new(),
            status: LiftStatus::Success,
        }
    }

    pub(crate) fn finish(self) -> LiftStatus {
        self.status
    }

    fn update_status(&mut self, status: LiftStatus, op: Op) {
        if status != LiftStatus::Success {
            tracing::error!("failed to lift op {}", op.mnemonic());
        }
        self.status.degrade(status);
    }

    fn word_ty(&self) -> Type {
        sized_int(self.arch.word_bytes())
    }

    /// Classifies a varnode by address space and resolves it to a parameter.
    fn lift_param(&mut self, vnode: VarNode) -> Param {
        match vnode.space {
            AddrSpace::Ram => {
                let ty = self.word_ty();
                let addr = self.lift_offset_or_replace(vnode, ty);
                Param::Memory(MemCell { addr })
            }
            AddrSpace::Register => {
                let name = self
                    .arch
                    .register_name(vnode.offset, vnode.size)
                    .map(|name| name.to_uppercase());
                match name.and_then(|name| self.arch.register_slot(&name)) {
                    Some(slot) => Param::Register(RegCell { offset: slot.offset as i32 }),
                    None => Param::Scratch(self.unknown_regs.get_or_alloc(
                        self.builder,
                        vnode.offset,
                        vnode.size,
                        self.settings.strict_scratch_sizes,
                    )),
                }
            }
            AddrSpace::Const => {
                let ty = sized_int(vnode.size);
                let value = self.lift_offset_or_replace(vnode, ty);
                Param::Constant(ConstCell { value, ty })
            }
            AddrSpace::Unique => Param::Scratch(self.uniques.get_or_alloc(
                self.builder,
                vnode.offset,
                vnode.size,
                self.settings.strict_scratch_sizes,
            )),
        }
    }

    /// Materializes a varnode's offset as a `ty`-typed value, honoring any
    /// pending equality claim for it.
    fn lift_offset_or_replace(&mut self, vnode: VarNode, ty: Type) -> Value {
        match self.claims.consume(vnode.offset) {
            Some(replacement) => match self.read_param(replacement, ty) {
                Some(value) => value,
                None => panic!(
                    "claim_eq replacement for offset {:#x} is unreadable as {ty}",
                    vnode.offset
                ),
            },
            None => self.builder.ins().iconst(ty, vnode.offset as i64),
        }
    }

    /// Reads a parameter at the requested type. `None` when the cell cannot
    /// provide it.
    fn read_param(&mut self, param: Param, ty: Type) -> Option<Value> {
        if ty == types::INVALID {
            return None;
        }
        match param {
            Param::Register(reg) => {
                Some(self.builder.ins().load(ty, state_flags(), self.state_ptr, reg.offset))
            }
            Param::Scratch(cell) => {
                if ty.bytes() > cell.size as u32 {
                    return None;
                }
                Some(self.builder.ins().stack_load(ty, cell.slot, 0))
            }
            Param::Constant(cell) => (cell.ty == ty).then_some(cell.value),
            Param::Memory(cell) => self.read_mem(cell.addr, ty),
        }
    }

    /// Writes a value through a parameter.
    fn write_param(&mut self, param: Param, value: Value) -> LiftStatus {
        match param {
            Param::Register(reg) => {
                self.builder.ins().store(state_flags(), value, self.state_ptr, reg.offset);
                LiftStatus::Success
            }
            Param::Scratch(cell) => {
                self.builder.ins().stack_store(value, cell.slot, 0);
                LiftStatus::Success
            }
            Param::Constant(_) => LiftStatus::Unsupported,
            Param::Memory(cell) => self.write_mem(cell.addr, value),
        }
    }

    fn load_mem_handle(&mut self) -> Value {
        self.builder.ins().stack_load(types::I64, self.mem_slot, 0)
    }

    fn read_mem(&mut self, addr: Value, ty: Type) -> Option<Value> {
        if ty.is_float() {
            let int_ty = Type::int_with_byte_size(ty.bytes() as u16)?;
            let bits = self.read_mem(addr, int_ty)?;
            return Some(self.builder.ins().bitcast(ty, MemFlags::new(), bits));
        }
        let func = self.intrinsics.load(ty.bytes())?;
        let mem = self.load_mem_handle();
        let call = self.builder.ins().call(func, &[mem, addr]);
        Some(self.builder.inst_results(call)[0])
    }

    fn write_mem(&mut self, addr: Value, value: Value) -> LiftStatus {
        let mut value = value;
        let mut ty = self.builder.func.dfg.value_type(value);
        if ty.is_float() {
            let Some(int_ty) = Type::int_with_byte_size(ty.bytes() as u16) else {
                return LiftStatus::Invalid;
            };
            value = self.builder.ins().bitcast(int_ty, MemFlags::new(), value);
            ty = int_ty;
        }
        let Some(func) = self.intrinsics.store(ty.bytes()) else {
            return LiftStatus::Invalid;
        };
        let mem = self.load_mem_handle();
        let call = self.builder.ins().call(func, &[mem, addr, value]);
        let new_mem = self.builder.inst_results(call)[0];
        self.builder.ins().stack_store(new_mem, self.mem_slot, 0);
        LiftStatus::Success
    }

    fn read_int(&mut self, vnode: VarNode) -> Option<Value> {
        let param = self.lift_param(vnode);
        self.read_param(param, sized_int(vnode.size))
    }

    fn read_as(&mut self, vnode: VarNode, ty: Type) -> Option<Value> {
        let param = self.lift_param(vnode);
        self.read_param(param, ty)
    }

    fn read_float(&mut self, vnode: VarNode) -> Option<Value> {
        let ty = sized_float(vnode.size)?;
        self.read_as(vnode, ty)
    }

    fn store_out(&mut self, value: Value, output: Option<VarNode>) -> LiftStatus {
        match output {
            Some(out) => {
                let param = self.lift_param(out);
                self.write_param(param, value)
            }
            None => LiftStatus::Unsupported,
        }
    }

    /// Stores an integer result, fitted to the outvar's width.
    fn store_int_out(&mut self, value: Value, in_size: u8, output: Option<VarNode>) -> LiftStatus {
        match output {
            Some(out) if sized_int(out.size) == types::INVALID => LiftStatus::Unsupported,
            Some(out) => {
                let fitted = resize_int(self.builder, value, in_size, out.size);
                let param = self.lift_param(out);
                self.write_param(param, fitted)
            }
            None => LiftStatus::Unsupported,
        }
    }

    /// Stores a float result as its bit pattern, fitted to the outvar.
    fn store_float_out(&mut self, value: Value, size: u8, output: Option<VarNode>) -> LiftStatus {
        let Some(int_ty) = Type::int_with_byte_size(size as u16) else {
            return LiftStatus::Unsupported;
        };
        let bits = self.builder.ins().bitcast(int_ty, MemFlags::new(), value);
        self.store_int_out(bits, size, output)
    }

    fn write_pc(&mut self, value: Value, in_size: u8) {
        let pc = required_slot(self.arch, PC_REG);
        let fitted = resize_int(self.builder, value, in_size, pc.size);
        self.builder.ins().store(state_flags(), fitted, self.state_ptr, pc.offset as i32);
    }

    fn lift_unary(&mut self, op: Op, output: Option<VarNode>, input: VarNode) -> LiftStatus {
        match op {
            Op::Copy | Op::Cast => match self.read_int(input) {
                Some(x) => self.store_int_out(x, input.size, output),
                None => LiftStatus::Unsupported,
            },
            Op::BoolNegate => match self.read_as(input, types::I8) {
                Some(x) => {
                    let inverted = self.builder.ins().bnot(x);
                    let result = self.builder.ins().band_imm(inverted, 1);
                    self.store_out(result, output)
                }
                None => LiftStatus::Unsupported,
            },
            Op::IntZext | Op::IntSext => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(x) = self.read_int(input) else { return LiftStatus::Unsupported };
                let extended = match op {
                    Op::IntZext => resize_int(self.builder, x, input.size, out.size),
                    _ => ops::sign_extend(self.builder, x, input.size, out.size),
                };
                self.store_out(extended, Some(out))
            }
            Op::Int2Comp => match self.read_int(input) {
                Some(x) => {
                    let negated = self.builder.ins().ineg(x);
                    self.store_int_out(negated, input.size, output)
                }
                None => LiftStatus::Unsupported,
            },
            Op::IntNegate => match self.read_int(input) {
                Some(x) => {
                    let inverted = self.builder.ins().bnot(x);
                    self.store_int_out(inverted, input.size, output)
                }
                None => LiftStatus::Unsupported,
            },
            // Direct branches do not read the operand cell: the offset *is*
            // the target, modulo any pending claim.
            Op::Branch | Op::Call => {
                let ty = sized_int(input.size);
                let target = self.lift_offset_or_replace(input, ty);
                self.write_pc(target, input.size);
                LiftStatus::Success
            }
            Op::Return | Op::BranchInd | Op::CallInd => match self.read_int(input) {
                Some(target) => {
                    self.write_pc(target, input.size);
                    LiftStatus::Success
                }
                None => LiftStatus::Unsupported,
            },
            Op::FloatNegate
            | Op::FloatAbs
            | Op::FloatSqrt
            | Op::FloatCeil
            | Op::FloatFloor
            | Op::FloatRound => {
                let Some(emit) = ops::float_unary_emitter(op) else {
                    return LiftStatus::Unsupported;
                };
                let Some(x) = self.read_float(input) else { return LiftStatus::Unsupported };
                let result = emit(self.builder, x);
                self.store_float_out(result, input.size, output)
            }
            Op::FloatIsNan => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(x) = self.read_float(input) else { return LiftStatus::Unsupported };
                let ordered_eq = self.builder.ins().fcmp(FloatCC::Equal, x, x);
                let is_nan = self.builder.ins().bxor_imm(ordered_eq, 1);
                let fitted = resize_int(self.builder, is_nan, 1, out.size);
                self.store_out(fitted, Some(out))
            }
            Op::IntToFloat => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(float_ty) = sized_float(out.size) else {
                    return LiftStatus::Unsupported;
                };
                let Some(x) = self.read_int(input) else { return LiftStatus::Unsupported };
                let converted = self.builder.ins().fcvt_from_sint(float_ty, x);
                self.store_float_out(converted, out.size, Some(out))
            }
            Op::FloatToFloat => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(out_ty) = sized_float(out.size) else {
                    return LiftStatus::Unsupported;
                };
                let Some(x) = self.read_float(input) else { return LiftStatus::Unsupported };
                let converted = match input.size.cmp(&out.size) {
                    std::cmp::Ordering::Less => self.builder.ins().fpromote(out_ty, x),
                    std::cmp::Ordering::Equal => x,
                    std::cmp::Ordering::Greater => self.builder.ins().fdemote(out_ty, x),
                };
                self.store_float_out(converted, out.size, Some(out))
            }
            Op::FloatToInt => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(x) = self.read_float(input) else { return LiftStatus::Unsupported };
                let result = match out.size {
                    4 | 8 => self.builder.ins().fcvt_to_sint_sat(sized_int(out.size), x),
                    _ => {
                        let tmp = self.builder.ins().fcvt_to_sint_sat(types::I32, x);
                        resize_int(self.builder, tmp, 4, out.size)
                    }
                };
                self.store_out(result, Some(out))
            }
            Op::Popcount => {
                let Some(out) = output else { return LiftStatus::Unsupported };
                let Some(x) = self.read_int(input) else { return LiftStatus::Unsupported };
                let ones = self.builder.ins().popcnt(x);
                let fitted = resize_int(self.builder, ones, input.size, out.size);
                self.store_out(fitted, Some(out))
            }
            _ => LiftStatus::Unsupported,
        }
    }

    fn lift_binary(&mut self, op: Op, output: Option<VarNode>, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        let status = self.lift_int_binary(op, output, lhs, rhs);
        if status == LiftStatus::Success {
            return status;
        }
        let status = self.lift_bool_binary(op, output, lhs, rhs);
        if status == LiftStatus::Success {
            return status;
        }
        let status = self.lift_float_binary(op, output, lhs, rhs);
        if status == LiftStatus::Success {
            return status;
        }

        match (op, output) {
            (Op::Load, Some(out)) => self.lift_load(out, rhs),
            (Op::Piece, Some(out)) => self.lift_piece(out, lhs, rhs),
            (Op::Subpiece, Some(out)) => self.lift_subpiece(out, lhs, rhs),
            // Producers outside this translator's scope.
            (Op::Indirect, _) | (Op::New, _) => LiftStatus::Unsupported,
            _ => LiftStatus::Unsupported,
        }
    }

    fn lift_int_binary(&mut self, op: Op, output: Option<VarNode>, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        if op == Op::CBranch {
            return self.lift_cbranch(lhs, rhs);
        }

        let Some(emit) = ops::int_binary_emitter(op) else { return LiftStatus::Unsupported };
        let Some(a) = self.read_int(lhs) else { return LiftStatus::Unsupported };
        let Some(b) = self.read_int(rhs) else { return LiftStatus::Unsupported };
        let result = emit(self.builder, a, b);

        if ops::is_int_comparison(op) {
            // Comparisons always store an 8-bit boolean.
            return self.store_out(result, output);
        }
        self.store_int_out(result, lhs.size, output)
    }

    /// `PC <- select(cond & 1, target, PC)`, with the full-width condition
    /// mirrored into the branch-taken slot when the instruction is a
    /// conditional branch.
    fn lift_cbranch(&mut self, target: VarNode, cond_var: VarNode) -> LiftStatus {
        let Some(cond) = self.read_int(cond_var) else { return LiftStatus::Unsupported };
        let target_ty = sized_int(target.size);
        let jump = self.lift_offset_or_replace(target, target_ty);

        if self.insn.category == Category::ConditionalBranch {
            let slot = required_slot(self.arch, BRANCH_TAKEN_REG);
            let taken = resize_int(self.builder, cond, cond_var.size, slot.size);
            self.builder.ins().store(state_flags(), taken, self.state_ptr, slot.offset as i32);
        }

        let pc = required_slot(self.arch, PC_REG);
        let pc_before =
            self.builder.ins().load(sized_int(pc.size), state_flags(), self.state_ptr, pc.offset as i32);
        let jump = resize_int(self.builder, jump, target.size, pc.size);
        let take = self.builder.ins().band_imm(cond, 1);
        let next_pc = self.builder.ins().select(take, jump, pc_before);
        self.builder.ins().store(state_flags(), next_pc, self.state_ptr, pc.offset as i32);
        LiftStatus::Success
    }

    fn lift_bool_binary(&mut self, op: Op, output: Option<VarNode>, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        let Some(emit) = ops::bool_binary_emitter(op) else { return LiftStatus::Unsupported };
        let Some(a) = self.read_as(lhs, types::I8) else { return LiftStatus::Unsupported };
        let Some(b) = self.read_as(rhs, types::I8) else { return LiftStatus::Unsupported };
        let result = emit(self.builder, a, b);
        self.store_out(result, output)
    }

    fn lift_float_binary(&mut self, op: Op, output: Option<VarNode>, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        let Some((emit, is_cmp)) = ops::float_binary_emitter(op) else {
            return LiftStatus::Unsupported;
        };
        let Some(a) = self.read_float(lhs) else { return LiftStatus::Unsupported };
        let Some(b) = self.read_float(rhs) else { return LiftStatus::Unsupported };
        let result = emit(self.builder, a, b);
        if is_cmp {
            return self.store_out(result, output);
        }
        self.store_float_out(result, lhs.size, output)
    }

    fn lift_load(&mut self, out: VarNode, addr_vnode: VarNode) -> LiftStatus {
        let word_ty = self.word_ty();
        let Some(addr) = self.read_as(addr_vnode, word_ty) else {
            return LiftStatus::Unsupported;
        };
        let Some(value) = self.read_mem(addr, sized_int(out.size)) else {
            return LiftStatus::Unsupported;
        };
        self.store_out(value, Some(out))
    }

    /// `out <- (zext(lhs) << 8*rhs.size) | zext(rhs)`.
    fn lift_piece(&mut self, out: VarNode, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        if lhs.size as u16 + rhs.size as u16 != out.size as u16 || out.size > 8 {
            tracing::error!(
                "cannot concatenate {}-byte and {}-byte operands into a {}-byte output",
                lhs.size,
                rhs.size,
                out.size
            );
            return LiftStatus::Unsupported;
        }
        let Some(high) = self.read_int(lhs) else { return LiftStatus::Unsupported };
        let Some(low) = self.read_int(rhs) else { return LiftStatus::Unsupported };

        let high = resize_int(self.builder, high, lhs.size, out.size);
        let high = self.builder.ins().ishl_imm(high, rhs.size as i64 * 8);
        let low = resize_int(self.builder, low, rhs.size, out.size);
        let joined = self.builder.ins().bor(high, low);
        self.store_out(joined, Some(out))
    }

    /// Discards the low `rhs.offset` bytes of `lhs`, then fits the rest to
    /// the output width.
    fn lift_subpiece(&mut self, out: VarNode, lhs: VarNode, rhs: VarNode) -> LiftStatus {
        let Some(x) = self.read_int(lhs) else { return LiftStatus::Unsupported };
        let shifted = match rhs.offset {
            0 => x,
            bytes => self.builder.ins().ushr_imm(x, bytes as i64 * 8),
        };
        self.store_int_out(shifted, lhs.size, Some(out))
    }

    fn lift_ternary(
        &mut self,
        op: Op,
        output: Option<VarNode>,
        in0: VarNode,
        in1: VarNode,
        in2: VarNode,
    ) -> LiftStatus {
        match op {
            Op::Store => {
                let word_ty = self.word_ty();
                let Some(addr) = self.read_as(in1, word_ty) else {
                    return LiftStatus::Unsupported;
                };
                let Some(value) = self.read_int(in2) else { return LiftStatus::Unsupported };
                self.write_mem(addr, value)
            }
            // `out <- base + index * elem_size`; the element size is the
            // literal carried in operand 2's offset.
            Op::PtrAdd => {
                let word_ty = self.word_ty();
                let word_bytes = self.arch.word_bytes();
                let Some(base) = self.read_as(in0, word_ty) else {
                    return LiftStatus::Unsupported;
                };
                let Some(index) = self.read_int(in1) else { return LiftStatus::Unsupported };
                let elem_ty = sized_int(in2.size);
                let elem_size = self.builder.ins().iconst(elem_ty, in2.offset as i64);
                let index = resize_int(self.builder, index, in1.size, in2.size);
                let offset = self.builder.ins().imul(index, elem_size);
                let offset = resize_int(self.builder, offset, in2.size, word_bytes);
                let sum = self.builder.ins().iadd(base, offset);
                self.store_int_out(sum, word_bytes, output)
            }
            // Despite the name this is an addition in the source dialect.
            Op::PtrSub => {
                let word_ty = self.word_ty();
                let word_bytes = self.arch.word_bytes();
                let Some(base) = self.read_as(in0, word_ty) else {
                    return LiftStatus::Unsupported;
                };
                let Some(offset) = self.read_int(in1) else { return LiftStatus::Unsupported };
                let offset = resize_int(self.builder, offset, in1.size, word_bytes);
                let sum = self.builder.ins().iadd(base, offset);
                self.store_int_out(sum, word_bytes, output)
            }
            _ => LiftStatus::Unsupported,
        }
    }

    fn lift_variadic(&mut self, op: Op, _output: Option<VarNode>, inputs: &[VarNode]) -> LiftStatus {
        match op {
            // A faithful phi needs per-edge predecessors, which a
            // single-block emission context cannot provide.
            Op::MultiEqual => {
                tracing::debug!("refusing MULTIEQUAL join of {} inputs", inputs.len());
                LiftStatus::Unsupported
            }
            _ => LiftStatus::Unsupported,
        }
    }

    /// Handles CALLOTHER: only the `claim_eq` pseudo-op is modeled, and it
    /// emits no IR.
    fn lift_user_op(&mut self, inputs: &[VarNode]) {
        if let [selector, lhs, rhs] = inputs {
            let is_claim = self
                .arch
                .user_op_name(selector.offset)
                .is_some_and(|name| name == "claim_eq");
            if is_claim {
                assert_eq!(lhs.space, AddrSpace::Const, "claim_eq target must be a constant");
                tracing::debug!("claim_eq recorded for offset {:#x}", lhs.offset);
                let replacement = self.lift_param(*rhs);
                self.claims.apply_eq(lhs.offset, replacement);
                return;
            }
        }
        self.update_status(LiftStatus::Unsupported, Op::CallOther);
    }
}

impl<A: Arch> PcodeSink for Emitter<'_, '_, A> {
    fn emit_op(&mut self, addr: u64, op: Op, output: Option<VarNode>, inputs: &[VarNode]) {
        tracing::trace!("[{addr:#x}] {op} ({} operands)", inputs.len());

        if op == Op::CallOther {
            self.lift_user_op(inputs);
            return;
        }
        if op.is_variadic() {
            let status = self.lift_variadic(op, output, inputs);
            self.update_status(status, op);
            return;
        }

        let status = match inputs {
            [input] => self.lift_unary(op, output, *input),
            [lhs, rhs] => self.lift_binary(op, output, *lhs, *rhs),
            [a, b, c] => self.lift_ternary(op, output, *a, *b, *c),
            _ => {
                self.claims.apply_non_eq();
                LiftStatus::Unsupported
            }
        };
        self.update_status(status, op);
    }
}
