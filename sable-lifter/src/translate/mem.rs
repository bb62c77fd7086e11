//! The memory intrinsic table.
//!
//! Loads take `(mem, addr)` and return the loaded value; stores take
//! `(mem, addr, value)` and return the *replacement* memory handle. Every
//! entry is optional: a missing entry is how the runtime refuses an access
//! width, which degrades the affected op instead of aborting the lift.

use cranelift::codegen::ir::{FuncRef, Function};
use cranelift::prelude::*;
use cranelift_module::{FuncId, Linkage, Module, ModuleResult};

/// Import symbol names for the per-width memory loads.
pub const MEM_LOAD_SYMBOLS: [&str; 4] = [
    "__sable_mem_load8",
    "__sable_mem_load16",
    "__sable_mem_load32",
    "__sable_mem_load64",
];

/// Import symbol names for the per-width memory stores.
pub const MEM_STORE_SYMBOLS: [&str; 4] = [
    "__sable_mem_store8",
    "__sable_mem_store16",
    "__sable_mem_store32",
    "__sable_mem_store64",
];

pub struct MemIntrinsics<T> {
    pub load8: Option<T>,
    pub load16: Option<T>,
    pub load32: Option<T>,
    pub load64: Option<T>,

    pub store8: Option<T>,
    pub store16: Option<T>,
    pub store32: Option<T>,
    pub store64: Option<T>,
}

impl<T: Copy> MemIntrinsics<T> {
    pub fn load(&self, bytes: u32) -> Option<T> {
        match bytes {
            1 => self.load8,
            2 => self.load16,
            4 => self.load32,
            8 => self.load64,
            _ => None,
        }
    }

    pub fn store(&self, bytes: u32) -> Option<T> {
        match bytes {
            1 => self.store8,
            2 => self.store16,
            4 => self.store32,
            8 => self.store64,
            _ => None,
        }
    }
}

impl MemIntrinsics<FuncId> {
    /// Declares the full table as module imports under the standard symbol
    /// names. `word_ty` is the address type of the guest memory space.
    pub fn declare<M: Module>(module: &mut M, word_ty: Type) -> ModuleResult<Self> {
        let call_conv = module.isa().default_call_conv();

        let load_sig = |value_ty: Type| {
            let mut sig = Signature::new(call_conv);
            sig.params.push(AbiParam::new(types::I64)); // memory handle
            sig.params.push(AbiParam::new(word_ty)); // address
            sig.returns.push(AbiParam::new(value_ty));
            sig
        };
        let store_sig = |value_ty: Type| {
            let mut sig = Signature::new(call_conv);
            sig.params.push(AbiParam::new(types::I64)); // memory handle
            sig.params.push(AbiParam::new(word_ty)); // address
            sig.params.push(AbiParam::new(value_ty));
            sig.returns.push(AbiParam::new(types::I64)); // replacement handle
            sig
        };

        let value_types = [types::I8, types::I16, types::I32, types::I64];
        let mut loads = [None; 4];
        let mut stores = [None; 4];
        for (i, ty) in value_types.into_iter().enumerate() {
            loads[i] = Some(module.declare_function(
                MEM_LOAD_SYMBOLS[i],
                Linkage::Import,
                &load_sig(ty),
            )?);
            stores[i] = Some(module.declare_function(
                MEM_STORE_SYMBOLS[i],
                Linkage::Import,
                &store_sig(ty),
            )?);
        }

        Ok(Self {
            load8: loads[0],
            load16: loads[1],
            load32: loads[2],
            load64: loads[3],
            store8: stores[0],
            store16: stores[1],
            store32: stores[2],
            store64: stores[3],
        })
    }

    /// Imports the table into `func` so its entries can be called there.
    pub(crate) fn import<M: Module>(
        &self,
        module: &mut M,
        func: &mut Function,
    ) -> MemIntrinsics<FuncRef> {
        MemIntrinsics {
            load8: self.load8.map(|id| module.declare_func_in_func(id, func)),
            load16: self.load16.map(|id| module.declare_func_in_func(id, func)),
            load32: self.load32.map(|id| module.declare_func_in_func(id, func)),
            load64: self.load64.map(|id| module.declare_func_in_func(id, func)),
            store8: self.store8.map(|id| module.declare_func_in_func(id, func)),
            store16: self.store16.map(|id| module.declare_func_in_func(id, func)),
            store32: self.store32.map(|id| module.declare_func_in_func(id, func)),
            store64: self.store64.map(|id| module.declare_func_in_func(id, func)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemIntrinsics;

    #[test]
    fn unsupported_widths_are_refused() {
        let table = MemIntrinsics::<u32> {
            load8: Some(0),
            load16: Some(1),
            load32: Some(2),
            load64: Some(3),
            store8: Some(4),
            store16: Some(5),
            store32: Some(6),
            store64: Some(7),
        };
        assert_eq!(table.load(4), Some(2));
        assert_eq!(table.store(8), Some(7));
        assert_eq!(table.load(3), None);
        assert_eq!(table.store(16), None);
    }
}
