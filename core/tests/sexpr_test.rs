use landin_core::prelude::*;

mod common;
use common::show;

fn read(machine: &mut Secd, text: &str) -> Result<CellRef, ParseError> {
    let mut chars = text.chars().peekable();
    machine.read_sexpr(&mut chars)
}

#[test]
fn atoms_print_as_literals() {
    let mut machine = Secd::new();
    let i = machine.make_int(42).unwrap();
    let neg = machine.make_int(-7).unwrap();
    let nil = machine.make_nil().unwrap();
    assert_eq!(show(&machine, i), "42");
    assert_eq!(show(&machine, neg), "-7");
    assert_eq!(show(&machine, nil), "NIL");
    assert_eq!(show(&machine, CellRef::NULL), "");
}

#[test]
fn proper_lists_print_space_separated() {
    let mut machine = Secd::new();
    let c = machine.make_int(3).unwrap();
    let list = machine.make_cons(c, CellRef::NULL).unwrap();
    let b = machine.make_int(2).unwrap();
    let list = machine.make_cons(b, list).unwrap();
    let a = machine.make_int(1).unwrap();
    let list = machine.make_cons(a, list).unwrap();
    assert_eq!(show(&machine, list), "(1 2 3)");
}

#[test]
fn improper_int_tail_prints_with_a_dot() {
    let mut machine = Secd::new();
    let two = machine.make_int(2).unwrap();
    let one = machine.make_int(1).unwrap();
    let pair = machine.make_cons(one, two).unwrap();
    assert_eq!(show(&machine, pair), "(1 . 2)");

    let zero = machine.make_int(0).unwrap();
    let longer = machine.make_cons(zero, pair).unwrap();
    assert_eq!(show(&machine, longer), "(0 1 . 2)");
}

#[test]
fn cons_onto_a_nil_cell_prints_as_a_proper_list() {
    let mut machine = Secd::new();
    let nil = machine.make_nil().unwrap();
    let one = machine.make_int(1).unwrap();
    let list = machine.make_cons(one, nil).unwrap();
    assert_eq!(show(&machine, list), "(1)");
}

#[test]
fn reader_round_trips_flat_lists() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "(1 2 3)").unwrap();
    assert_eq!(show(&machine, cell), "(1 2 3)");
}

#[test]
fn reader_round_trips_nested_lists() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "(1 (2 3) 4)").unwrap();
    assert_eq!(show(&machine, cell), "(1 (2 3) 4)");
}

#[test]
fn reader_skips_whitespace_and_newlines() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "( 1\n2\t3 )").unwrap();
    assert_eq!(show(&machine, cell), "(1 2 3)");
}

#[test]
fn empty_list_reads_as_null() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "()").unwrap();
    assert!(cell.is_null());
}

#[test]
fn nested_empty_list_is_a_null_element() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "(())").unwrap();
    // The inner () is the null list, which prints as nothing.
    assert_eq!(show(&machine, cell), "()");
}

#[test]
fn multi_digit_numbers_accumulate() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "(1234567)").unwrap();
    assert_eq!(machine.heap().car_int(cell).unwrap(), 1234567);
}

#[test]
fn input_must_open_with_a_parenthesis() {
    let mut machine = Secd::new();
    assert!(matches!(
        read(&mut machine, "1)"),
        Err(ParseError::UnexpectedChar('1'))
    ));
}

#[test]
fn unterminated_list_is_an_eof_error() {
    let mut machine = Secd::new();
    assert!(matches!(
        read(&mut machine, "(1 2"),
        Err(ParseError::UnexpectedEof)
    ));
}

#[test]
fn stray_characters_are_rejected() {
    let mut machine = Secd::new();
    assert!(matches!(
        read(&mut machine, "(1 x)"),
        Err(ParseError::UnexpectedChar('x'))
    ));
}

#[test]
fn reverse_flips_a_list() {
    let mut machine = Secd::new();
    let cell = read(&mut machine, "(1 2 3)").unwrap();
    let reversed = machine.reverse(cell).unwrap();
    assert_eq!(show(&machine, reversed), "(3 2 1)");
    assert!(machine.reverse(CellRef::NULL).unwrap().is_null());
}
