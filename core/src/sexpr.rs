//! S-expression externalisation: the printer that shows register
//! contents and the reader the interactive front-end feeds.

use std::fmt;
use std::iter::Peekable;

use crate::error::MachineError;
use crate::heap::{CellKind, CellPool, CellRef};
use crate::machine::Secd;

// ---------------------------------------------------------------------------
// Printer
// ---------------------------------------------------------------------------

/// Display adaptor for a cell. INT prints as a decimal literal, NIL as the
/// literal token, CONS as a parenthesised list walked along the CDR spine
/// with an improper INT tail shown as " . <int>". The null sentinel prints
/// as nothing.
pub struct SExpr<'a> {
    pool: &'a CellPool,
    cell: CellRef,
}

impl<'a> SExpr<'a> {
    pub fn new(pool: &'a CellPool, cell: CellRef) -> Self {
        SExpr { pool, cell }
    }
}

impl fmt::Display for SExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cell(self.pool, self.cell, f)
    }
}

fn write_cell(pool: &CellPool, cell: CellRef, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match pool.kind(cell) {
        None | Some(CellKind::Free { .. }) => Ok(()),
        Some(CellKind::Int(v)) => write!(f, "{v}"),
        Some(CellKind::Nil) => write!(f, "NIL"),
        Some(CellKind::Cons { .. }) => {
            write!(f, "(")?;
            let mut cur = cell;
            let mut first = true;
            while let Some(CellKind::Cons { car, cdr }) = pool.kind(cur) {
                if !first {
                    write!(f, " ")?;
                }
                write_cell(pool, car, f)?;
                first = false;
                if cdr.is_null() {
                    break;
                }
                if let Some(CellKind::Int(v)) = pool.kind(cdr) {
                    write!(f, " . {v}")?;
                    break;
                }
                cur = cdr;
            }
            write!(f, ")")
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Errors from the s-expression reader.
#[derive(Debug)]
pub enum ParseError {
    /// Allocation failed while building the expression.
    Machine(MachineError),

    /// A character that is not a digit, parenthesis, or whitespace.
    UnexpectedChar(char),

    /// Input ended inside an expression.
    UnexpectedEof,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Machine(e) => write!(f, "{e}"),
            Self::UnexpectedChar(ch) => write!(f, "unexpected character '{ch}' in s-expression"),
            Self::UnexpectedEof => write!(f, "unexpected end of input in s-expression"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<MachineError> for ParseError {
    fn from(e: MachineError) -> Self {
        Self::Machine(e)
    }
}

impl Secd {
    /// Display adaptor for a cell owned by this machine.
    pub fn display(&self, cell: CellRef) -> SExpr<'_> {
        SExpr::new(self.heap(), cell)
    }

    /// Parse one parenthesised s-expression of unsigned decimal integers
    /// and nested lists from `input`, building it in the cell pool. An
    /// empty "()" parses to the null list.
    pub fn read_sexpr<I>(&mut self, input: &mut Peekable<I>) -> Result<CellRef, ParseError>
    where
        I: Iterator<Item = char>,
    {
        match input.next() {
            Some('(') => self.read_list(input),
            Some(ch) => Err(ParseError::UnexpectedChar(ch)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn read_list<I>(&mut self, input: &mut Peekable<I>) -> Result<CellRef, ParseError>
    where
        I: Iterator<Item = char>,
    {
        // Elements are prepended as they arrive; the list is reversed on
        // ')'. The partial list is scratch-rooted across allocations.
        let slot = self.scratch.len();
        self.scratch.push(CellRef::NULL);
        let result = self.read_list_inner(input, slot);
        self.scratch.truncate(slot);
        result
    }

    fn read_list_inner<I>(
        &mut self,
        input: &mut Peekable<I>,
        slot: usize,
    ) -> Result<CellRef, ParseError>
    where
        I: Iterator<Item = char>,
    {
        loop {
            match input.peek().copied() {
                None => return Err(ParseError::UnexpectedEof),
                Some(ch) if ch.is_ascii_digit() => {
                    let v = read_number(input);
                    let cell = self.make_int(v)?;
                    let list = self.scratch[slot];
                    self.scratch[slot] = self.make_cons(cell, list)?;
                }
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                    input.next();
                }
                Some(')') => {
                    input.next();
                    let list = self.scratch[slot];
                    return Ok(self.reverse(list)?);
                }
                Some('(') => {
                    input.next();
                    let sub = self.read_list(input)?;
                    let list = self.scratch[slot];
                    self.scratch[slot] = self.make_cons(sub, list)?;
                }
                Some(ch) => return Err(ParseError::UnexpectedChar(ch)),
            }
        }
    }

    /// Reverse a list. The reader builds lists back to front.
    pub fn reverse(&mut self, list: CellRef) -> Result<CellRef, MachineError> {
        let slot = self.scratch.len();
        self.scratch.push(CellRef::NULL);
        self.scratch.push(list);
        let result = self.reverse_inner(slot);
        self.scratch.truncate(slot);
        result
    }

    fn reverse_inner(&mut self, slot: usize) -> Result<CellRef, MachineError> {
        let mut out = CellRef::NULL;
        let mut rest = self.scratch[slot + 1];
        while !rest.is_null() {
            let head = self.heap.car(rest)?;
            out = self.make_cons(head, out)?;
            self.scratch[slot] = out;
            rest = self.heap.cdr(rest)?;
            self.scratch[slot + 1] = rest;
        }
        Ok(out)
    }
}

fn read_number<I>(input: &mut Peekable<I>) -> i32
where
    I: Iterator<Item = char>,
{
    let mut v: i32 = 0;
    while let Some(d) = input.peek().and_then(|ch| ch.to_digit(10)) {
        input.next();
        v = v.wrapping_mul(10).wrapping_add(d as i32);
    }
    v
}
