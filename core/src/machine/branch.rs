use super::Secd;
use crate::error::MachineError;

impl Secd {
    /// Read the two absolute branch targets and jump to one; SEL saves
    /// the current C on the dump for JOIN, TSEL does not.
    fn select(&mut self, save_continuation: bool) -> Result<(), MachineError> {
        let x = self.pop_int()?;
        let t = self.fetch_u32()?;
        let f = self.fetch_u32()?;
        if save_continuation {
            self.d = self.make_cons(self.c, self.d)?;
        }
        let target = if x != 0 { t } else { f };
        let ip = self.make_int(target as i32)?;
        self.c = self.make_cons(ip, self.c)?;
        Ok(())
    }

    /// SEL t f ( x -- ) -- branch on x≠0, saving C on the dump.
    pub(crate) fn op_sel(&mut self) -> Result<(), MachineError> {
        self.select(true)
    }

    /// TSEL t f ( x -- ) -- tail-select: branch without touching the dump.
    pub(crate) fn op_tsel(&mut self) -> Result<(), MachineError> {
        self.select(false)
    }

    /// JOIN ( -- ) -- resume the C saved by SEL.
    pub(crate) fn op_join(&mut self) -> Result<(), MachineError> {
        self.c = self.heap.car(self.d)?;
        self.d = self.heap.cdr(self.d)?;
        Ok(())
    }
}
