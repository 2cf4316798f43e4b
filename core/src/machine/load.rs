use super::Secd;
use crate::error::MachineError;
use crate::heap::CellRef;

impl Secd {
    /// NIL ( -- nil )
    pub(crate) fn op_nil(&mut self) -> Result<(), MachineError> {
        let nil = self.make_nil()?;
        self.push(nil)
    }

    /// LDC imm32 ( -- n ) -- push the full big-endian immediate.
    pub(crate) fn op_ldc(&mut self) -> Result<(), MachineError> {
        let value = self.fetch_u32()? as i32;
        let cell = self.make_int(value)?;
        self.push(cell)
    }

    /// LD f o ( -- v ) -- push the value at environment position (f, o).
    pub(crate) fn op_ld(&mut self) -> Result<(), MachineError> {
        let frame = self.fetch_byte()?;
        let slot = self.fetch_byte()?;
        let v = self.locate(frame, slot)?;
        self.push(v)
    }

    /// LDF entry32 ( -- closure ) -- closure = (entry . E).
    pub(crate) fn op_ldf(&mut self) -> Result<(), MachineError> {
        let entry = self.fetch_u32()?;
        let entry_cell = self.make_int(entry as i32)?;
        let closure = self.make_cons(entry_cell, self.e)?;
        self.push(closure)
    }

    /// Descend to the `frame`-th frame of E, then to its `slot`-th value.
    pub(crate) fn locate(&self, frame: u8, slot: u8) -> Result<CellRef, MachineError> {
        let mut pos = self.e;
        for _ in 0..frame {
            pos = self.heap.cdr(pos)?;
            if pos.is_null() {
                return Err(MachineError::NullDereference {
                    operation: "LD frame index",
                });
            }
        }
        let mut pos = self.heap.car(pos)?;
        for _ in 0..slot {
            pos = self.heap.cdr(pos)?;
            if pos.is_null() {
                return Err(MachineError::NullDereference {
                    operation: "LD slot index",
                });
            }
        }
        self.heap.car(pos)
    }
}
