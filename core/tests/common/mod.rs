#![allow(dead_code)]

use landin_core::prelude::*;

/// Assembles code images in the machine's wire format: one-byte opcodes,
/// big-endian immediates.
pub struct Asm {
    bytes: Vec<u8>,
}

impl Asm {
    pub fn new() -> Self {
        Asm { bytes: Vec::new() }
    }

    /// Current byte offset; the address of the next emitted instruction.
    pub fn pos(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn op(&mut self, op: Opcode) -> &mut Self {
        self.bytes.push(op as u8);
        self
    }

    pub fn ldc(&mut self, v: i32) -> &mut Self {
        self.op(Opcode::Ldc);
        self.bytes.extend_from_slice(&(v as u32).to_be_bytes());
        self
    }

    pub fn ld(&mut self, frame: u8, slot: u8) -> &mut Self {
        self.op(Opcode::Ld);
        self.bytes.push(frame);
        self.bytes.push(slot);
        self
    }

    pub fn sel(&mut self, t: u32, f: u32) -> &mut Self {
        self.op(Opcode::Sel);
        self.bytes.extend_from_slice(&t.to_be_bytes());
        self.bytes.extend_from_slice(&f.to_be_bytes());
        self
    }

    pub fn tsel(&mut self, t: u32, f: u32) -> &mut Self {
        self.op(Opcode::Tsel);
        self.bytes.extend_from_slice(&t.to_be_bytes());
        self.bytes.extend_from_slice(&f.to_be_bytes());
        self
    }

    pub fn ldf(&mut self, entry: u32) -> &mut Self {
        self.op(Opcode::Ldf);
        self.bytes.extend_from_slice(&entry.to_be_bytes());
        self
    }

    pub fn ap(&mut self, n: u8) -> &mut Self {
        self.op(Opcode::Ap);
        self.bytes.push(n);
        self
    }

    pub fn dum(&mut self, n: u8) -> &mut Self {
        self.op(Opcode::Dum);
        self.bytes.push(n);
        self
    }

    pub fn rap(&mut self, n: u8) -> &mut Self {
        self.op(Opcode::Rap);
        self.bytes.push(n);
        self
    }

    /// Backpatch a 32-bit immediate once its target is known.
    pub fn patch_u32(&mut self, at: u32, v: u32) {
        let at = at as usize;
        self.bytes[at..at + 4].copy_from_slice(&v.to_be_bytes());
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Boot a default machine over `image` and run it to completion.
pub fn run_image(image: &[u8]) -> Secd {
    run_image_on(Secd::new(), image)
}

/// As `run_image`, over a caller-configured machine.
pub fn run_image_on(mut machine: Secd, image: &[u8]) -> Secd {
    machine.load_code(image).expect("code image fits");
    machine.boot(0).expect("boot");
    machine.execute().expect("execution succeeds");
    machine
}

/// Boot and run, expecting a machine error.
pub fn run_image_err(image: &[u8]) -> MachineError {
    let mut machine = Secd::new();
    machine.load_code(image).expect("code image fits");
    machine.boot(0).expect("boot");
    machine.execute().expect_err("execution fails")
}

/// The integer on top of S.
pub fn top_int(machine: &Secd) -> i32 {
    machine
        .heap()
        .car_int(machine.stack())
        .expect("integer on top of S")
}

/// Render a cell owned by `machine` as an s-expression string.
pub fn show(machine: &Secd, cell: CellRef) -> String {
    machine.display(cell).to_string()
}
