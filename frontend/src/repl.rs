//! Interactive front-end: letter commands that set registers from
//! s-expressions, load code images, and run the machine.

use std::io::{self, BufRead, Write};

use landin_core::prelude::*;

const HELP: &str = "\
commands:
  s|e|c|d (expr)  set a register from an s-expression, e.g. c (0)
  l <path>        load a binary code image
  b [entry]       boot: S=E=D empty, C=((entry)) (default entry 0)
  x               execute, then print S
  p               print all four registers
  g               force a garbage collection
  h               this help
  q               quit";

pub fn run(cells: usize, code: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = Secd::with_limits(cells, code);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    println!("SECD machine ({cells} cells, {code} code bytes); h for help");
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        let Some(cmd) = line.chars().next() else {
            continue;
        };
        let rest = line[cmd.len_utf8()..].trim();
        match cmd {
            's' | 'e' | 'c' | 'd' => match read_register(&mut machine, rest) {
                Ok(cell) => match cmd {
                    's' => machine.set_stack(cell),
                    'e' => machine.set_env(cell),
                    'c' => machine.set_control(cell),
                    _ => machine.set_dump(cell),
                },
                Err(ParseError::Machine(e)) => return Err(e.into()),
                Err(e) => eprintln!("{e}"),
            },
            'l' => match std::fs::read(rest) {
                Ok(image) => {
                    machine.load_code(&image)?;
                    println!("loaded {} code bytes", machine.code_len());
                }
                Err(e) => eprintln!("{}: {e}", rest),
            },
            'b' => {
                let entry = if rest.is_empty() {
                    0
                } else {
                    match rest.parse() {
                        Ok(entry) => entry,
                        Err(e) => {
                            eprintln!("bad entry offset '{rest}': {e}");
                            continue;
                        }
                    }
                };
                machine.boot(entry)?;
            }
            'x' => {
                machine.execute()?;
                println!("{}", machine.display(machine.stack()));
            }
            'p' => {
                println!("S: {}", machine.display(machine.stack()));
                println!("E: {}", machine.display(machine.env()));
                println!("C: {}", machine.display(machine.control()));
                println!("D: {}", machine.display(machine.dump()));
            }
            'g' => machine.gc(),
            'h' => println!("{HELP}"),
            'q' => return Ok(()),
            _ => eprintln!("unknown command '{cmd}' (h for help)"),
        }
    }
}

fn read_register(machine: &mut Secd, text: &str) -> Result<CellRef, ParseError> {
    let mut chars = text.chars().peekable();
    machine.read_sexpr(&mut chars)
}
