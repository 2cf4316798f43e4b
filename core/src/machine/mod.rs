//! The SECD execution engine: the four registers, the byte code image,
//! and the fetch-decode-execute loop.
//!
//! The instruction pointer is ordinary heap data: the head of C is a cons
//! whose CAR is an INT cell holding the next byte offset, advanced in
//! place by the fetch routine. Context switches (AP/RAP/SEL) push the old
//! head onto the dump; JOIN and RTN restore it.

mod alu;
mod apply;
mod branch;
mod list;
mod load;
mod opcode;

pub use opcode::Opcode;

use log::trace;

use crate::error::MachineError;
use crate::heap::{CellPool, CellRef};

/// Outcome of a single `step()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Running,
    Halted,
}

/// One SECD machine instance: cell pool, registers S/E/C/D, and the code
/// image. Independent instances own disjoint pools and registers.
pub struct Secd {
    pub(crate) heap: CellPool,
    pub(crate) s: CellRef,
    pub(crate) e: CellRef,
    pub(crate) c: CellRef,
    pub(crate) d: CellRef,
    /// Cells detached from the registers mid-opcode. They are marked as
    /// extra collection roots so an allocation later in the same opcode
    /// cannot sweep them.
    pub(crate) scratch: Vec<CellRef>,
    code: Vec<u8>,
    code_capacity: usize,
}

impl Default for Secd {
    fn default() -> Self {
        Self::new()
    }
}

impl Secd {
    pub const DEFAULT_CELLS: usize = 1000;
    pub const DEFAULT_CODE_BYTES: usize = 1000;

    pub fn new() -> Self {
        Self::with_limits(Self::DEFAULT_CELLS, Self::DEFAULT_CODE_BYTES)
    }

    pub fn with_limits(cells: usize, code_bytes: usize) -> Self {
        Secd {
            heap: CellPool::new(cells),
            s: CellRef::NULL,
            e: CellRef::NULL,
            c: CellRef::NULL,
            d: CellRef::NULL,
            scratch: Vec::new(),
            code: Vec::new(),
            code_capacity: code_bytes,
        }
    }

    // ---- Host surface ----

    /// Install a code image. Execution enters at byte offset 0 of the
    /// image once `boot` has set up C.
    pub fn load_code(&mut self, image: &[u8]) -> Result<(), MachineError> {
        if image.len() > self.code_capacity {
            return Err(MachineError::CodeImageTooLarge {
                size: image.len(),
                capacity: self.code_capacity,
            });
        }
        self.code.clear();
        self.code.extend_from_slice(image);
        Ok(())
    }

    pub fn code_len(&self) -> usize {
        self.code.len()
    }

    /// Reset the registers for a run: S, E, D null and C a one-cell list
    /// holding the entry offset.
    pub fn boot(&mut self, entry: u32) -> Result<(), MachineError> {
        self.s = CellRef::NULL;
        self.e = CellRef::NULL;
        self.c = CellRef::NULL;
        self.d = CellRef::NULL;
        let ip = self.make_int(entry as i32)?;
        self.scratch.push(ip);
        let nil = self.make_nil()?;
        let c = self.make_cons(ip, nil);
        self.scratch.pop();
        self.c = c?;
        Ok(())
    }

    pub fn heap(&self) -> &CellPool {
        &self.heap
    }

    pub fn stack(&self) -> CellRef {
        self.s
    }

    pub fn env(&self) -> CellRef {
        self.e
    }

    pub fn control(&self) -> CellRef {
        self.c
    }

    pub fn dump(&self) -> CellRef {
        self.d
    }

    pub fn set_stack(&mut self, r: CellRef) {
        self.s = r;
    }

    pub fn set_env(&mut self, r: CellRef) {
        self.e = r;
    }

    pub fn set_control(&mut self, r: CellRef) {
        self.c = r;
    }

    pub fn set_dump(&mut self, r: CellRef) {
        self.d = r;
    }

    // ---- Allocation with collect-on-exhaustion ----

    /// Collect over the registers and the scratch roots.
    pub fn gc(&mut self) {
        let mut roots: Vec<CellRef> = Vec::with_capacity(4 + self.scratch.len());
        roots.extend_from_slice(&[self.s, self.e, self.c, self.d]);
        roots.extend_from_slice(&self.scratch);
        self.heap.collect(&roots);
    }

    pub fn make_int(&mut self, value: i32) -> Result<CellRef, MachineError> {
        if let Some(r) = self.heap.alloc_int(value) {
            return Ok(r);
        }
        self.gc();
        self.heap.alloc_int(value).ok_or(MachineError::OutOfMemory)
    }

    pub fn make_nil(&mut self) -> Result<CellRef, MachineError> {
        if let Some(r) = self.heap.alloc_nil() {
            return Ok(r);
        }
        self.gc();
        self.heap.alloc_nil().ok_or(MachineError::OutOfMemory)
    }

    pub fn make_cons(&mut self, car: CellRef, cdr: CellRef) -> Result<CellRef, MachineError> {
        if let Some(r) = self.heap.alloc_cons(car, cdr) {
            return Ok(r);
        }
        self.scratch.push(car);
        self.scratch.push(cdr);
        self.gc();
        let r = self.heap.alloc_cons(car, cdr).ok_or(MachineError::OutOfMemory);
        self.scratch.pop();
        self.scratch.pop();
        r
    }

    // ---- Fetch ----

    /// Read the byte at the instruction pointer and advance the pointer
    /// in place.
    pub(crate) fn fetch_byte(&mut self) -> Result<u8, MachineError> {
        let ip = self.heap.car(self.c)?;
        let pos = self.heap.int_value(ip)? as usize;
        if pos >= self.code.len() {
            return Err(MachineError::CodeAddressOutOfRange {
                pos,
                size: self.code.len(),
            });
        }
        let byte = self.code[pos];
        self.heap.set_int(ip, pos as i32 + 1)?;
        Ok(byte)
    }

    /// Big-endian 32-bit immediate.
    pub(crate) fn fetch_u32(&mut self) -> Result<u32, MachineError> {
        let mut v = 0u32;
        for _ in 0..4 {
            v = (v << 8) | u32::from(self.fetch_byte()?);
        }
        Ok(v)
    }

    // ---- Stack helpers ----

    /// Pop the top of S.
    pub(crate) fn pop(&mut self) -> Result<CellRef, MachineError> {
        let top = self.heap.car(self.s)?;
        self.s = self.heap.cdr(self.s)?;
        Ok(top)
    }

    /// Pop the top of S as an integer.
    pub(crate) fn pop_int(&mut self) -> Result<i32, MachineError> {
        let v = self.heap.car_int(self.s)?;
        self.s = self.heap.cdr(self.s)?;
        Ok(v)
    }

    /// S = (v . S).
    pub(crate) fn push(&mut self, v: CellRef) -> Result<(), MachineError> {
        self.s = self.make_cons(v, self.s)?;
        Ok(())
    }

    // ---- Execution ----

    /// Execute one instruction. Halts on STOP, on RTN with an empty dump,
    /// and when C is null.
    pub fn step(&mut self) -> Result<Status, MachineError> {
        if self.c.is_null() {
            return Ok(Status::Halted);
        }
        let byte = self.fetch_byte()?;
        let op = Opcode::try_from(byte).map_err(|_| MachineError::OpcodeUnknown(byte))?;
        trace!(
            "{} | S {} | E {} | C {} | D {}",
            op.name(),
            self.display(self.s),
            self.display(self.e),
            self.display(self.c),
            self.display(self.d)
        );
        match op {
            Opcode::Nil => self.op_nil()?,
            Opcode::Ldc => self.op_ldc()?,
            Opcode::Ld => self.op_ld()?,
            Opcode::Atom => self.op_atom()?,
            Opcode::Car => self.op_car()?,
            Opcode::Cdr => self.op_cdr()?,
            Opcode::Cons => self.op_cons()?,
            Opcode::Add => self.op_add()?,
            Opcode::Sub => self.op_sub()?,
            Opcode::Mul => self.op_mul()?,
            Opcode::Div => self.op_div()?,
            Opcode::Mod => self.op_mod()?,
            Opcode::Cge => self.op_cge()?,
            Opcode::Cgt => self.op_cgt()?,
            Opcode::Ceq => self.op_ceq()?,
            Opcode::Cne => self.op_cne()?,
            Opcode::Cle => self.op_cle()?,
            Opcode::Clt => self.op_clt()?,
            Opcode::Sel => self.op_sel()?,
            Opcode::Tsel => self.op_tsel()?,
            Opcode::Join => self.op_join()?,
            Opcode::Ldf => self.op_ldf()?,
            Opcode::Ap => self.op_ap()?,
            Opcode::Rtn => return self.op_rtn(),
            Opcode::Dum => self.op_dum()?,
            Opcode::Rap => self.op_rap()?,
            Opcode::Stop => return Ok(Status::Halted),
        }
        Ok(Status::Running)
    }

    /// Run until the machine halts.
    pub fn execute(&mut self) -> Result<(), MachineError> {
        while self.step()? == Status::Running {}
        Ok(())
    }

    /// Run at most `max_steps` instructions. `Status::Running` on return
    /// means the budget ran out before the program halted.
    pub fn run_limited(&mut self, max_steps: u64) -> Result<Status, MachineError> {
        for _ in 0..max_steps {
            if self.step()? == Status::Halted {
                return Ok(Status::Halted);
            }
        }
        Ok(Status::Running)
    }
}
