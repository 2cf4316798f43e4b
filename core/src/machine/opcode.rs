use num_enum::TryFromPrimitive;

/// The SECD instruction set. The numeric assignments are the wire format
/// of the code image and are stable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, TryFromPrimitive)]
#[repr(u8)]
pub enum Opcode {
    Nil = 0,
    Ldc = 1,
    Ld = 2,
    Atom = 3,
    Car = 4,
    Cdr = 5,
    Cons = 6,
    Add = 7,
    Sub = 8,
    Mul = 9,
    Div = 10,
    Mod = 11,
    Sel = 12,
    Join = 13,
    Ldf = 14,
    Ap = 15,
    Rtn = 16,
    Dum = 17,
    Rap = 18,
    Stop = 19,
    Cge = 20,
    Cgt = 21,
    Ceq = 22,
    Cne = 23,
    Cle = 24,
    Clt = 25,
    Tsel = 26,
}

impl Opcode {
    /// Mnemonic, for trace output.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Nil => "NIL",
            Opcode::Ldc => "LDC",
            Opcode::Ld => "LD",
            Opcode::Atom => "ATOM",
            Opcode::Car => "CAR",
            Opcode::Cdr => "CDR",
            Opcode::Cons => "CONS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Sel => "SEL",
            Opcode::Join => "JOIN",
            Opcode::Ldf => "LDF",
            Opcode::Ap => "AP",
            Opcode::Rtn => "RTN",
            Opcode::Dum => "DUM",
            Opcode::Rap => "RAP",
            Opcode::Stop => "STOP",
            Opcode::Cge => "CGE",
            Opcode::Cgt => "CGT",
            Opcode::Ceq => "CEQ",
            Opcode::Cne => "CNE",
            Opcode::Cle => "CLE",
            Opcode::Clt => "CLT",
            Opcode::Tsel => "TSEL",
        }
    }
}
