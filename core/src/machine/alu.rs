use super::Secd;
use crate::error::MachineError;

impl Secd {
    // ---- Binary operator helpers ----
    //
    // The first pop is x (the later-pushed operand), the second is y.
    // SUB/DIV/MOD and the ordered comparisons compute y OP x: the earlier
    // operand on the left. Arithmetic wraps in two's complement.

    fn binary_op(
        &mut self,
        f: impl FnOnce(i32, i32) -> Result<i32, MachineError>,
    ) -> Result<(), MachineError> {
        let x = self.pop_int()?;
        let y = self.pop_int()?;
        let v = f(x, y)?;
        let cell = self.make_int(v)?;
        self.push(cell)
    }

    fn compare_op(&mut self, f: impl FnOnce(i32, i32) -> bool) -> Result<(), MachineError> {
        self.binary_op(|x, y| Ok(f(x, y) as i32))
    }

    // ---- Arithmetic ----

    /// ADD ( x y -- x+y )
    pub(crate) fn op_add(&mut self) -> Result<(), MachineError> {
        self.binary_op(|x, y| Ok(x.wrapping_add(y)))
    }

    /// SUB ( x y -- y-x )
    pub(crate) fn op_sub(&mut self) -> Result<(), MachineError> {
        self.binary_op(|x, y| Ok(y.wrapping_sub(x)))
    }

    /// MUL ( x y -- x*y )
    pub(crate) fn op_mul(&mut self) -> Result<(), MachineError> {
        self.binary_op(|x, y| Ok(x.wrapping_mul(y)))
    }

    /// DIV ( x y -- y/x )
    pub(crate) fn op_div(&mut self) -> Result<(), MachineError> {
        self.binary_op(|x, y| {
            if x == 0 {
                Err(MachineError::DivideByZero)
            } else {
                Ok(y.wrapping_div(x))
            }
        })
    }

    /// MOD ( x y -- y mod x )
    pub(crate) fn op_mod(&mut self) -> Result<(), MachineError> {
        self.binary_op(|x, y| {
            if x == 0 {
                Err(MachineError::DivideByZero)
            } else {
                Ok(y.wrapping_rem(x))
            }
        })
    }

    // ---- Comparisons (0/1 results) ----

    /// CGT ( x y -- y>x )
    pub(crate) fn op_cgt(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| y > x)
    }

    /// CGE ( x y -- y≥x )
    pub(crate) fn op_cge(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| y >= x)
    }

    /// CEQ ( x y -- x=y )
    pub(crate) fn op_ceq(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| x == y)
    }

    /// CNE ( x y -- y≠x )
    pub(crate) fn op_cne(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| y != x)
    }

    /// CLE ( x y -- y≤x )
    pub(crate) fn op_cle(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| y <= x)
    }

    /// CLT ( x y -- y<x )
    pub(crate) fn op_clt(&mut self) -> Result<(), MachineError> {
        self.compare_op(|x, y| y < x)
    }
}
