//! JIT harness for the lifter tests: a host-ISA module with the memory
//! intrinsics bound to a flat test memory, an x86-flavored arch facade over a
//! `#[repr(C)]` state record, and a scripted p-code generator standing in for
//! the disassembly engine.

#![allow(dead_code)]

use cranelift::prelude::*;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, FuncId, Module};
use memoffset::offset_of;

use sable_lifter::arch::{Arch, RegSlot};
use sable_lifter::{
    CallerFrame, Category, Insn, LiftStatus, Lifter, MemIntrinsics, MEM_LOAD_SYMBOLS,
    MEM_STORE_SYMBOLS,
};
use sable_pcode::{Op, PcodeSink, PcodeSource, VarNode};

/// Length of the fake instruction fed to every lift.
pub const INSN_LEN: u64 = 2;

pub const RAX: VarNode = VarNode::reg(0, 8);
pub const RCX: VarNode = VarNode::reg(8, 8);
pub const RDX: VarNode = VarNode::reg(16, 8);
pub const RBX: VarNode = VarNode::reg(24, 8);
pub const EAX: VarNode = VarNode::reg(0, 4);
pub const ECX: VarNode = VarNode::reg(8, 4);
pub const EDX: VarNode = VarNode::reg(16, 4);
pub const EBX: VarNode = VarNode::reg(24, 4);

pub const fn c(value: u64, size: u8) -> VarNode {
    VarNode::constant(value, size)
}

pub const fn u(offset: u64, size: u8) -> VarNode {
    VarNode::unique(offset, size)
}

#[repr(C)]
#[derive(Clone, Debug, Default)]
pub struct CpuState {
    pub rax: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rbx: u64,
    pub pc: u64,
    pub next_pc: u64,
    pub branch_taken: u64,
}

pub struct TestMemory {
    pub bytes: Vec<u8>,
}

impl TestMemory {
    pub fn new() -> Self {
        Self { bytes: vec![0; 0x1000] }
    }

    pub fn read_u32(&self, addr: u64) -> u32 {
        let addr = addr as usize;
        u32::from_le_bytes(self.bytes[addr..addr + 4].try_into().unwrap())
    }

    pub fn write_u32(&mut self, addr: u64, value: u32) {
        let addr = addr as usize;
        self.bytes[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }
}

unsafe extern "C" fn mem_load8(mem: *mut TestMemory, addr: u64) -> u8 {
    (&(*mem).bytes)[addr as usize]
}

unsafe extern "C" fn mem_load16(mem: *mut TestMemory, addr: u64) -> u16 {
    let addr = addr as usize;
    u16::from_le_bytes((&(*mem).bytes)[addr..addr + 2].try_into().unwrap())
}

unsafe extern "C" fn mem_load32(mem: *mut TestMemory, addr: u64) -> u32 {
    let addr = addr as usize;
    u32::from_le_bytes((&(*mem).bytes)[addr..addr + 4].try_into().unwrap())
}

unsafe extern "C" fn mem_load64(mem: *mut TestMemory, addr: u64) -> u64 {
    let addr = addr as usize;
    u64::from_le_bytes((&(*mem).bytes)[addr..addr + 8].try_into().unwrap())
}

unsafe extern "C" fn mem_store8(mem: *mut TestMemory, addr: u64, value: u8) -> *mut TestMemory {
    (&mut (*mem).bytes)[addr as usize] = value;
    mem
}

unsafe extern "C" fn mem_store16(mem: *mut TestMemory, addr: u64, value: u16) -> *mut TestMemory {
    let addr = addr as usize;
    (&mut (*mem).bytes)[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
    mem
}

unsafe extern "C" fn mem_store32(mem: *mut TestMemory, addr: u64, value: u32) -> *mut TestMemory {
    let addr = addr as usize;
    (&mut (*mem).bytes)[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    mem
}

unsafe extern "C" fn mem_store64(mem: *mut TestMemory, addr: u64, value: u64) -> *mut TestMemory {
    let addr = addr as usize;
    (&mut (*mem).bytes)[addr..addr + 8].copy_from_slice(&value.to_le_bytes());
    mem
}

pub const USER_OPS: &[&str] = &["claim_eq", "unmodeled_helper"];

pub struct TestArch;

impl Arch for TestArch {
    fn word_bytes(&self) -> u8 {
        8
    }

    fn register_name(&self, offset: u64, size: u8) -> Option<&str> {
        match (offset, size) {
            (0, 8) => Some("RAX"),
            (8, 8) => Some("RCX"),
            (16, 8) => Some("RDX"),
            (24, 8) => Some("RBX"),
            (0, 4) => Some("EAX"),
            (8, 4) => Some("ECX"),
            (16, 4) => Some("EDX"),
            (24, 4) => Some("EBX"),
            _ => None,
        }
    }

    fn register_slot(&self, name: &str) -> Option<RegSlot> {
        let slot = |offset: usize, size: u8| RegSlot { offset: offset as u32, size };
        Some(match name {
            "RAX" => slot(offset_of!(CpuState, rax), 8),
            "EAX" => slot(offset_of!(CpuState, rax), 4),
            "RCX" => slot(offset_of!(CpuState, rcx), 8),
            "ECX" => slot(offset_of!(CpuState, rcx), 4),
            "RDX" => slot(offset_of!(CpuState, rdx), 8),
            "EDX" => slot(offset_of!(CpuState, rdx), 4),
            "RBX" => slot(offset_of!(CpuState, rbx), 8),
            "EBX" => slot(offset_of!(CpuState, rbx), 4),
            "PC" => slot(offset_of!(CpuState, pc), 8),
            "NEXT_PC" => slot(offset_of!(CpuState, next_pc), 8),
            "BRANCH_TAKEN" => slot(offset_of!(CpuState, branch_taken), 8),
            _ => return None,
        })
    }

    fn user_op_name(&self, index: u64) -> Option<&str> {
        USER_OPS.get(index as usize).copied()
    }
}

pub struct ScriptOp {
    pub op: Op,
    pub output: Option<VarNode>,
    pub inputs: Vec<VarNode>,
}

pub fn op(op: Op, output: VarNode, inputs: &[VarNode]) -> ScriptOp {
    ScriptOp { op, output: Some(output), inputs: inputs.to_vec() }
}

pub fn op0(op: Op, inputs: &[VarNode]) -> ScriptOp {
    ScriptOp { op, output: None, inputs: inputs.to_vec() }
}

/// Replays a fixed op list, standing in for the disassembly engine.
pub struct Scripted(pub Vec<ScriptOp>);

impl PcodeSource for Scripted {
    fn pcode_one_insn(
        &mut self,
        addr: u64,
        _bytes: &[u8],
        sink: &mut dyn PcodeSink,
    ) -> Option<usize> {
        for entry in &self.0 {
            sink.emit_op(addr, entry.op, entry.output, &entry.inputs);
        }
        Some(self.0.len())
    }
}

/// A generator that never decodes anything.
pub struct FailingSource;

impl PcodeSource for FailingSource {
    fn pcode_one_insn(
        &mut self,
        _addr: u64,
        _bytes: &[u8],
        _sink: &mut dyn PcodeSink,
    ) -> Option<usize> {
        None
    }
}

pub type LiftedFn = unsafe extern "C" fn(*mut CpuState, u64, *mut TestMemory) -> *mut TestMemory;

pub fn new_module() -> JITModule {
    let mut flag_builder = settings::builder();
    flag_builder.set("is_pic", "false").unwrap();
    flag_builder.set("preserve_frame_pointers", "true").unwrap();
    flag_builder.set("opt_level", "none").unwrap();
    let flags = settings::Flags::new(flag_builder);

    let isa_builder = cranelift_native::builder().expect("host machine is not supported");
    let isa = isa_builder.finish(flags).expect("failed to create isa");

    let mut builder = JITBuilder::with_isa(isa, default_libcall_names());
    builder.symbol(MEM_LOAD_SYMBOLS[0], mem_load8 as *const u8);
    builder.symbol(MEM_LOAD_SYMBOLS[1], mem_load16 as *const u8);
    builder.symbol(MEM_LOAD_SYMBOLS[2], mem_load32 as *const u8);
    builder.symbol(MEM_LOAD_SYMBOLS[3], mem_load64 as *const u8);
    builder.symbol(MEM_STORE_SYMBOLS[0], mem_store8 as *const u8);
    builder.symbol(MEM_STORE_SYMBOLS[1], mem_store16 as *const u8);
    builder.symbol(MEM_STORE_SYMBOLS[2], mem_store32 as *const u8);
    builder.symbol(MEM_STORE_SYMBOLS[3], mem_store64 as *const u8);

    JITModule::new(builder)
}

pub fn insn(category: Category) -> Insn {
    Insn { address: 0x1000, bytes: vec![0x90; INSN_LEN as usize], category }
}

/// Lifts one instruction through the outer entry point and JITs a driver
/// around it with the same `(state, pc, mem) -> mem` shape.
pub fn lift_source(
    source: &mut dyn PcodeSource,
    category: Category,
    tweak: impl FnOnce(&mut MemIntrinsics<FuncId>),
) -> (LiftStatus, LiftedFn) {
    let mut module = new_module();
    let mut intrinsics = MemIntrinsics::declare(&mut module, types::I64).unwrap();
    tweak(&mut intrinsics);
    let mut lifter = Lifter::new(TestArch, intrinsics);

    let mut func_ctx = FunctionBuilderContext::new();
    let mut ctx = module.make_context();
    ctx.func.signature = {
        let mut sig = Signature::new(module.isa().default_call_conv());
        sig.params.push(AbiParam::new(types::I64)); // state
        sig.params.push(AbiParam::new(types::I64)); // pc
        sig.params.push(AbiParam::new(types::I64)); // memory handle
        sig.returns.push(AbiParam::new(types::I64));
        sig
    };

    let mut builder = FunctionBuilder::new(&mut ctx.func, &mut func_ctx);
    let entry = builder.create_block();
    builder.append_block_params_for_function_params(entry);
    builder.switch_to_block(entry);
    builder.seal_block(entry);
    let (state_ptr, pc, mem) = match builder.block_params(entry) {
        &[state_ptr, pc, mem] => (state_ptr, pc, mem),
        params => unreachable!("expected 3 driver params (got {})", params.len()),
    };

    let mem_slot = builder.create_sized_stack_slot(StackSlotData::new(
        StackSlotKind::ExplicitSlot,
        8,
        3,
    ));
    builder.ins().stack_store(mem, mem_slot, 0);

    let status = lifter
        .lift_into_block(
            &mut module,
            &mut builder,
            CallerFrame { state_ptr, pc, mem_slot },
            &insn(category),
            source,
        )
        .unwrap();

    let out_mem = builder.ins().stack_load(types::I64, mem_slot, 0);
    builder.ins().return_(&[out_mem]);
    builder.finalize();

    let id = module.declare_anonymous_function(&ctx.func.signature).unwrap();
    module.define_function(id, &mut ctx).unwrap();
    module.finalize_definitions().unwrap();

    let code = module.get_finalized_function(id);
    // The JIT memory is intentionally leaked so the returned function stays
    // callable after the module is dropped.
    (status, unsafe { std::mem::transmute::<*const u8, LiftedFn>(code) })
}

pub fn lift(ops: Vec<ScriptOp>, category: Category) -> (LiftStatus, LiftedFn) {
    lift_source(&mut Scripted(ops), category, |_| {})
}

pub fn run(f: LiftedFn, state: &mut CpuState, mem: &mut TestMemory) -> *mut TestMemory {
    unsafe { f(state as *mut CpuState, state.pc, mem as *mut TestMemory) }
}
