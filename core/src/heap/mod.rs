//! The cell heap: a fixed pool of tagged cells, a free list threaded
//! through unallocated slots, and a recursive mark-and-sweep collector.
//!
//! The pool hands out cells and reclaims them; the collect-on-exhaustion
//! policy lives with the machine, which owns the register roots.

mod cell;

pub use cell::{Cell, CellKind, CellRef, CellTag};

use log::debug;

use crate::error::MachineError;

pub struct CellPool {
    cells: Vec<Cell>,
    /// Head of the free list, NULL when the pool is exhausted.
    free: CellRef,
}

impl CellPool {
    /// Build a pool of `capacity` slots with every non-sentinel slot on
    /// the free list in ascending index order. Capacity is clamped to the
    /// 16-bit index space.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(2, u16::MAX as usize + 1);
        let mut cells = vec![
            Cell {
                marked: false,
                kind: CellKind::Free { next: CellRef::NULL },
            };
            capacity
        ];
        for i in 1..capacity - 1 {
            cells[i].kind = CellKind::Free {
                next: CellRef(i as u16 + 1),
            };
        }
        CellPool {
            cells,
            free: CellRef(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of slots currently on the free list.
    pub fn free_count(&self) -> usize {
        let mut n = 0;
        let mut r = self.free;
        while !r.is_null() {
            n += 1;
            match self.cells[r.index()].kind {
                CellKind::Free { next } => r = next,
                _ => break,
            }
        }
        n
    }

    pub fn is_free(&self, r: CellRef) -> bool {
        !r.is_null() && matches!(self.cells[r.index()].kind, CellKind::Free { .. })
    }

    // ---- Allocation ----

    fn alloc(&mut self) -> Option<CellRef> {
        let r = self.free;
        if r.is_null() {
            return None;
        }
        let CellKind::Free { next } = self.cells[r.index()].kind else {
            panic!("free-list head names a live cell");
        };
        self.free = next;
        Some(r)
    }

    pub fn alloc_int(&mut self, value: i32) -> Option<CellRef> {
        let r = self.alloc()?;
        self.cells[r.index()].kind = CellKind::Int(value);
        Some(r)
    }

    pub fn alloc_nil(&mut self) -> Option<CellRef> {
        let r = self.alloc()?;
        self.cells[r.index()].kind = CellKind::Nil;
        Some(r)
    }

    /// Allocate a cons cell. A non-null NIL cdr is stored as the null
    /// sentinel: lists are chains of CONS terminated by a null CDR, not by
    /// a NIL cell, and several opcodes end a list with a fresh NIL.
    pub fn alloc_cons(&mut self, car: CellRef, cdr: CellRef) -> Option<CellRef> {
        let cdr = if !cdr.is_null() && matches!(self.cells[cdr.index()].kind, CellKind::Nil) {
            CellRef::NULL
        } else {
            cdr
        };
        let r = self.alloc()?;
        self.cells[r.index()].kind = CellKind::Cons { car, cdr };
        Some(r)
    }

    // ---- Accessors ----

    /// Payload of a slot; None for the null sentinel.
    pub fn kind(&self, r: CellRef) -> Option<CellKind> {
        if r.is_null() {
            None
        } else {
            Some(self.cells[r.index()].kind)
        }
    }

    /// Tag of an allocated cell; None for the null sentinel and for slots
    /// on the free list.
    pub fn tag(&self, r: CellRef) -> Option<CellTag> {
        match self.kind(r)? {
            CellKind::Int(_) => Some(CellTag::Int),
            CellKind::Nil => Some(CellTag::Nil),
            CellKind::Cons { .. } => Some(CellTag::Cons),
            CellKind::Free { .. } => None,
        }
    }

    pub fn is_int(&self, r: CellRef) -> bool {
        self.tag(r) == Some(CellTag::Int)
    }

    fn cons_fields(
        &self,
        r: CellRef,
        operation: &'static str,
    ) -> Result<(CellRef, CellRef), MachineError> {
        if r.is_null() {
            return Err(MachineError::NullDereference { operation });
        }
        match self.cells[r.index()].kind {
            CellKind::Cons { car, cdr } => Ok((car, cdr)),
            _ => Err(MachineError::TypeMismatch {
                operation,
                expected: "CONS",
            }),
        }
    }

    pub fn car(&self, r: CellRef) -> Result<CellRef, MachineError> {
        Ok(self.cons_fields(r, "CAR")?.0)
    }

    pub fn cdr(&self, r: CellRef) -> Result<CellRef, MachineError> {
        Ok(self.cons_fields(r, "CDR")?.1)
    }

    /// Payload of an INT cell.
    pub fn int_value(&self, r: CellRef) -> Result<i32, MachineError> {
        if r.is_null() {
            return Err(MachineError::NullDereference {
                operation: "INT payload",
            });
        }
        match self.cells[r.index()].kind {
            CellKind::Int(v) => Ok(v),
            _ => Err(MachineError::TypeMismatch {
                operation: "INT payload",
                expected: "INT",
            }),
        }
    }

    /// CAR of `r`, required to be a non-null INT cell.
    pub fn car_int(&self, r: CellRef) -> Result<i32, MachineError> {
        let car = self.car(r)?;
        self.int_value(car)
    }

    /// CDR of `r`, required to be a non-null INT cell.
    pub fn cdr_int(&self, r: CellRef) -> Result<i32, MachineError> {
        let cdr = self.cdr(r)?;
        self.int_value(cdr)
    }

    // ---- Mutation ----

    /// Overwrite an INT payload. The engine mutates exactly one INT this
    /// way: the instruction-pointer cell at the head of C.
    pub fn set_int(&mut self, r: CellRef, value: i32) -> Result<(), MachineError> {
        if r.is_null() {
            return Err(MachineError::NullDereference {
                operation: "set INT payload",
            });
        }
        match &mut self.cells[r.index()].kind {
            CellKind::Int(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(MachineError::TypeMismatch {
                operation: "set INT payload",
                expected: "INT",
            }),
        }
    }

    /// Overwrite the CAR of a cons cell. The engine uses this in exactly
    /// one place: RAP ties the letrec knot by patching the dummy frame
    /// installed by DUM.
    pub fn set_car(&mut self, r: CellRef, car: CellRef) -> Result<(), MachineError> {
        if r.is_null() {
            return Err(MachineError::NullDereference {
                operation: "set CAR",
            });
        }
        match &mut self.cells[r.index()].kind {
            CellKind::Cons { car: slot, .. } => {
                *slot = car;
                Ok(())
            }
            _ => Err(MachineError::TypeMismatch {
                operation: "set CAR",
                expected: "CONS",
            }),
        }
    }

    // ---- Collection ----

    /// Mark every cell reachable from `roots`, then sweep every unmarked
    /// live slot onto the free list. Marking checks the mark bit before
    /// recursing, so the cyclic environments created by RAP terminate.
    pub fn collect(&mut self, roots: &[CellRef]) {
        for &r in roots {
            self.mark(r);
        }
        self.sweep();
    }

    fn mark(&mut self, r: CellRef) {
        if r.is_null() {
            return;
        }
        let cell = &mut self.cells[r.index()];
        if cell.marked {
            return;
        }
        cell.marked = true;
        if let CellKind::Cons { car, cdr } = cell.kind {
            self.mark(car);
            self.mark(cdr);
        }
    }

    /// Free slots are skipped, so a collection never links a slot onto the
    /// free list twice.
    fn sweep(&mut self) {
        let mut freed = 0usize;
        for i in 1..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.marked {
                cell.marked = false;
            } else if !matches!(cell.kind, CellKind::Free { .. }) {
                cell.kind = CellKind::Free { next: self.free };
                self.free = CellRef(i as u16);
                freed += 1;
            }
        }
        debug!("collected {freed} cells, {} free", self.free_count());
    }
}
