use super::{Secd, Status};
use crate::error::MachineError;
use crate::heap::CellRef;

impl Secd {
    /// Pop `n` argument values off S into a frame list. Popping prepends,
    /// so the earliest-pushed value lands at slot 0 and LD (0, j) in the
    /// callee sees the j+1-th pushed argument.
    fn pop_frame(&mut self, n: u8) -> Result<CellRef, MachineError> {
        let mut frame = self.make_nil()?;
        let slot = self.scratch.len();
        self.scratch.push(frame);
        for _ in 0..n {
            let v = self.pop()?;
            frame = self.make_cons(v, frame)?;
            self.scratch[slot] = frame;
        }
        self.scratch.truncate(slot);
        Ok(frame)
    }

    /// AP n ( f v_n … v_1 -- ) -- apply closure f to n arguments: save
    /// S, E, C on the dump, then enter the closure body with a fresh
    /// stack and the argument frame prepended to the captured
    /// environment.
    pub(crate) fn op_ap(&mut self) -> Result<(), MachineError> {
        let f = self.pop()?;
        let mark = self.scratch.len();
        self.scratch.push(f);
        let n = self.fetch_byte()?;
        let frame = self.pop_frame(n)?;
        self.scratch.push(frame);

        // Push S, then E, then C, so RTN pops them in reverse order.
        self.d = self.make_cons(self.c, self.d)?;
        self.d = self.make_cons(self.e, self.d)?;
        self.d = self.make_cons(self.s, self.d)?;

        let entry = self.heap.car_int(f)?;
        let env = self.heap.cdr(f)?;
        let nil = self.make_nil()?;
        self.s = nil;
        self.e = self.make_cons(frame, env)?;
        let ip = self.make_int(entry)?;
        self.c = self.make_cons(ip, CellRef::NULL)?;

        self.scratch.truncate(mark);
        Ok(())
    }

    /// RTN ( r -- ) -- restore the caller context, pushing r onto the
    /// caller's stack. With an empty dump, halt and leave S untouched.
    pub(crate) fn op_rtn(&mut self) -> Result<Status, MachineError> {
        if self.d.is_null() {
            return Ok(Status::Halted);
        }
        let r = self.heap.car(self.s)?;
        let saved_s = self.heap.car(self.d)?;
        self.s = self.make_cons(r, saved_s)?;
        self.d = self.heap.cdr(self.d)?;
        self.e = self.heap.car(self.d)?;
        self.d = self.heap.cdr(self.d)?;
        self.c = self.heap.car(self.d)?;
        self.d = self.heap.cdr(self.d)?;
        Ok(Status::Running)
    }

    /// DUM n ( -- ) -- prepend a dummy frame of n zero slots to E, to be
    /// patched by RAP.
    pub(crate) fn op_dum(&mut self) -> Result<(), MachineError> {
        let n = self.fetch_byte()?;
        let mut frame = self.make_nil()?;
        let slot = self.scratch.len();
        self.scratch.push(frame);
        for _ in 0..n {
            let zero = self.make_int(0)?;
            frame = self.make_cons(zero, frame)?;
            self.scratch[slot] = frame;
        }
        self.scratch.truncate(slot);
        self.e = self.make_cons(frame, self.e)?;
        Ok(())
    }

    /// RAP n ( f v_n … v_1 -- ) -- recursive apply. The argument frame is
    /// patched over the dummy frame in place, so the closures it holds
    /// reach the frame through their captured environment (the letrec
    /// back-reference cycle). The dump saves the environment without the
    /// recursive frame; the caller's LD indices are unchanged on return.
    pub(crate) fn op_rap(&mut self) -> Result<(), MachineError> {
        let f = self.pop()?;
        let mark = self.scratch.len();
        self.scratch.push(f);
        let n = self.fetch_byte()?;
        let frame = self.pop_frame(n)?;
        self.scratch.push(frame);

        // env is the (dummy . E0) cell installed by DUM and captured by
        // every closure in the frame; patching its CAR ties the knot.
        let env = self.heap.cdr(f)?;
        self.heap.set_car(env, frame)?;
        let outer = self.heap.cdr(env)?;

        self.d = self.make_cons(self.c, self.d)?;
        self.d = self.make_cons(outer, self.d)?;
        self.d = self.make_cons(self.s, self.d)?;

        let entry = self.heap.car_int(f)?;
        let nil = self.make_nil()?;
        self.s = nil;
        self.e = env;
        let ip = self.make_int(entry)?;
        self.c = self.make_cons(ip, CellRef::NULL)?;

        self.scratch.truncate(mark);
        Ok(())
    }
}
