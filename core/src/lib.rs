pub mod error;
pub mod heap;
pub mod machine;
pub mod sexpr;

pub mod prelude {
    pub use crate::error::MachineError;
    pub use crate::heap::{CellKind, CellPool, CellRef, CellTag};
    pub use crate::machine::{Opcode, Secd, Status};
    pub use crate::sexpr::{ParseError, SExpr};
}
