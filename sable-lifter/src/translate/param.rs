//! The parameter abstraction: every varnode resolves to one of these cell
//! kinds, and the emitter reads/writes them through a single contract
//! (`Emitter::read_param` / `Emitter::write_param`).

use cranelift::codegen::ir::StackSlot;
use cranelift::prelude::*;

/// A resolved varnode. Reads yield `None` when the cell cannot provide the
/// requested type; writes report a [`crate::LiftStatus`].
#[derive(Clone, Copy)]
pub(crate) enum Param {
    /// A named register: a fixed byte range of the state record.
    Register(RegCell),
    /// A per-instruction scratch cell (unique space, or a register the arch
    /// facade does not know).
    Scratch(ScratchCell),
    /// A cell of the machine memory space, addressed by a runtime value.
    /// Reads and writes go through the memory intrinsics; writes replace the
    /// current memory handle.
    Memory(MemCell),
    /// A literal. Readable only at its own type; writes are unsupported.
    Constant(ConstCell),
}

#[derive(Clone, Copy)]
pub(crate) struct RegCell {
    pub offset: i32,
}

#[derive(Clone, Copy)]
pub(crate) struct ScratchCell {
    pub slot: StackSlot,
    pub size: u8,
}

#[derive(Clone, Copy)]
pub(crate) struct MemCell {
    pub addr: Value,
}

#[derive(Clone, Copy)]
pub(crate) struct ConstCell {
    pub value: Value,
    pub ty: Type,
}
