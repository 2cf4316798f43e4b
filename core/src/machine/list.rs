use super::Secd;
use crate::error::MachineError;

impl Secd {
    /// ATOM ( x -- b ) -- 1 if x is an INT atom, else 0.
    pub(crate) fn op_atom(&mut self) -> Result<(), MachineError> {
        let x = self.pop()?;
        let b = self.heap.is_int(x) as i32;
        let cell = self.make_int(b)?;
        self.push(cell)
    }

    /// CAR ( p -- car(p) ) -- p must be a cons.
    pub(crate) fn op_car(&mut self) -> Result<(), MachineError> {
        let p = self.pop()?;
        let car = self.heap.car(p)?;
        self.push(car)
    }

    /// CDR ( p -- cdr(p) ) -- p must be a cons.
    pub(crate) fn op_cdr(&mut self) -> Result<(), MachineError> {
        let p = self.pop()?;
        let cdr = self.heap.cdr(p)?;
        self.push(cdr)
    }

    /// CONS ( a b -- pair ) -- conses the top of S onto the value below it.
    pub(crate) fn op_cons(&mut self) -> Result<(), MachineError> {
        let a = self.pop()?;
        let b = self.pop()?;
        let pair = self.make_cons(a, b)?;
        self.push(pair)
    }
}
