use cranelift::prelude::*;
use hashbrown::HashMap;

use crate::translate::param::ScratchCell;

/// Lazily-allocated scratch cells for one instruction.
///
/// P-code reuses unique offsets as short-lived temporaries, so lookups are
/// idempotent per `(offset, size)`: later ops reading an offset observe what
/// earlier ops wrote. A re-request at a known offset with a *different* size
/// allocates a distinct cell (the two never alias); see
/// [`crate::Settings::strict_scratch_sizes`].
pub(crate) struct ScratchPool {
    name: &'static str,
    cells: HashMap<(u64, u8), ScratchCell>,
}

impl ScratchPool {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name, cells: HashMap::new() }
    }

    pub(crate) fn get_or_alloc(
        &mut self,
        builder: &mut FunctionBuilder,
        offset: u64,
        size: u8,
        strict: bool,
    ) -> ScratchCell {
        if let Some(cell) = self.cells.get(&(offset, size)) {
            return *cell;
        }
        if self.cells.keys().any(|&(o, s)| o == offset && s != size) {
            if strict {
                panic!("{} scratch offset {offset:#x} requested with conflicting size {size}", self.name);
            }
            tracing::warn!("{} scratch offset {offset:#x} reused with size {size}", self.name);
        }

        let slot = builder.create_sized_stack_slot(StackSlotData::new(
            StackSlotKind::ExplicitSlot,
            size as u32,
            3,
        ));
        let cell = ScratchCell { slot, size };
        self.cells.insert((offset, size), cell);
        cell
    }
}
