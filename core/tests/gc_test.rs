use landin_core::prelude::*;

mod common;
use common::{Asm, run_image_on, show, top_int};

#[test]
fn collection_frees_exactly_the_unreachable_cells() {
    let mut pool = CellPool::new(32);
    let keep = pool.alloc_int(1).unwrap();
    let lose_a = pool.alloc_int(2).unwrap();
    let lose_b = pool.alloc_cons(lose_a, CellRef::NULL).unwrap();

    pool.collect(&[keep]);

    assert!(!pool.is_free(keep));
    assert!(pool.is_free(lose_a));
    assert!(pool.is_free(lose_b));
    assert_eq!(pool.int_value(keep).unwrap(), 1);
    // Everything except the sentinel and the one live cell is free.
    assert_eq!(pool.free_count(), 30);
}

#[test]
fn reachable_structure_survives_recursively() {
    let mut pool = CellPool::new(32);
    let a = pool.alloc_int(10).unwrap();
    let b = pool.alloc_int(20).unwrap();
    let tail = pool.alloc_cons(b, CellRef::NULL).unwrap();
    let list = pool.alloc_cons(a, tail).unwrap();

    pool.collect(&[list]);

    assert!(!pool.is_free(list));
    assert!(!pool.is_free(tail));
    assert!(!pool.is_free(a));
    assert!(!pool.is_free(b));
    assert_eq!(pool.car_int(list).unwrap(), 10);
    assert_eq!(pool.car_int(pool.cdr(list).unwrap()).unwrap(), 20);
}

#[test]
fn back_to_back_collections_are_idempotent() {
    // A leaked mark bit would keep garbage alive on the second pass.
    let mut pool = CellPool::new(32);
    let a = pool.alloc_int(1).unwrap();
    let list = pool.alloc_cons(a, CellRef::NULL).unwrap();
    pool.alloc_int(99).unwrap();

    pool.collect(&[list]);
    let free_after_first = pool.free_count();
    pool.collect(&[list]);
    assert_eq!(pool.free_count(), free_after_first);
    assert_eq!(pool.car_int(list).unwrap(), 1);
}

#[test]
fn freed_cells_are_reallocated() {
    let mut pool = CellPool::new(4);
    pool.alloc_int(1).unwrap();
    pool.alloc_int(2).unwrap();
    pool.alloc_int(3).unwrap();
    assert!(pool.alloc_int(4).is_none());

    pool.collect(&[]);
    assert_eq!(pool.free_count(), 3);
    assert!(pool.alloc_int(4).is_some());
}

#[test]
fn cyclic_structure_is_marked_once_and_collected_when_dropped() {
    let mut pool = CellPool::new(32);
    // A cell whose CAR is itself, as RAP's knot-tying produces.
    let knot = pool.alloc_cons(CellRef::NULL, CellRef::NULL).unwrap();
    pool.set_car(knot, knot).unwrap();

    pool.collect(&[knot]);
    assert!(!pool.is_free(knot));

    pool.collect(&[]);
    assert!(pool.is_free(knot));
}

#[test]
fn two_cell_cycle_terminates_and_collects() {
    let mut pool = CellPool::new(32);
    let x = pool.alloc_cons(CellRef::NULL, CellRef::NULL).unwrap();
    let y = pool.alloc_cons(x, CellRef::NULL).unwrap();
    pool.set_car(x, y).unwrap();

    pool.collect(&[x]);
    assert!(!pool.is_free(x));
    assert!(!pool.is_free(y));

    pool.collect(&[]);
    assert!(pool.is_free(x));
    assert!(pool.is_free(y));
}

// Scenario: values reachable from a register survive collections forced by
// an allocation-heavy program and print identically afterwards.
#[test]
fn environment_survives_forced_collections() {
    let mut machine = Secd::with_limits(64, 1000);
    let mut chars = "(1 2 3)".chars().peekable();
    let env_list = machine.read_sexpr(&mut chars).expect("environment parses");
    let before = show(&machine, env_list);

    // Sum 1 + 40 more: each LDC/ADD round allocates well past the pool.
    let mut asm = Asm::new();
    asm.ldc(1);
    for _ in 0..40 {
        asm.ldc(1);
        asm.op(Opcode::Add);
    }
    asm.op(Opcode::Stop);

    machine.load_code(asm.bytes()).unwrap();
    machine.boot(0).unwrap();
    machine.set_env(env_list);
    machine.execute().unwrap();

    assert_eq!(top_int(&machine), 41);
    assert_eq!(show(&machine, machine.env()), before);
    assert_eq!(before, "(1 2 3)");
}

// Collections triggered in the middle of list-building opcodes must not
// sweep operands already popped off S.
#[test]
fn mid_opcode_collections_keep_in_flight_cells() {
    let rounds = 25;
    let mut asm = Asm::new();
    for i in 0..rounds {
        asm.op(Opcode::Nil);
        asm.ldc(i);
        asm.op(Opcode::Cons);
        asm.op(Opcode::Car);
    }
    asm.op(Opcode::Stop);

    let machine = run_image_on(Secd::with_limits(64, 1000), asm.bytes());
    assert_eq!(top_int(&machine), rounds - 1);

    let expected: Vec<String> = (0..rounds).rev().map(|i| i.to_string()).collect();
    let expected = format!("({})", expected.join(" "));
    assert_eq!(show(&machine, machine.stack()), expected);
}
