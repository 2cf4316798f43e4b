//! Framed hex upload: the serial protocol of the embedded build, carried
//! over stdin/stdout. The host scans for '>' then ':' to arm an upload,
//! reads ASCII hex pairs into the code image until '<', then boots the
//! machine and prints the final stack, and waits for the next frame.

use std::fmt;
use std::io::{self, Read, Write};

use landin_core::prelude::*;

#[derive(Debug)]
pub enum UploadError {
    /// A byte inside the frame that is not a hex digit.
    InvalidHex(char),

    /// Input ended between the two digits of a pair.
    TruncatedPair,

    Io(io::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex(ch) => write!(f, "invalid hex character '{ch}' in upload"),
            Self::TruncatedPair => write!(f, "upload ended inside a hex pair"),
            Self::Io(e) => write!(f, "upload I/O error: {e}"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<io::Error> for UploadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn run(cells: usize, code: usize) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut bytes = stdin.lock().bytes();
    let mut out = io::stdout();

    while let Some(image) = read_image(&mut bytes, &mut out)? {
        let mut machine = Secd::with_limits(cells, code);
        machine.load_code(&image)?;
        machine.boot(0)?;
        machine.execute()?;
        writeln!(out)?;
        writeln!(out, "Final stack:")?;
        writeln!(out, "{}", machine.display(machine.stack()))?;
        out.flush()?;
    }
    Ok(())
}

/// Read one framed image, echoing accepted hex pairs to `echo`. Returns
/// None on end of input before a frame starts.
fn read_image(
    input: &mut impl Iterator<Item = io::Result<u8>>,
    echo: &mut impl Write,
) -> Result<Option<Vec<u8>>, UploadError> {
    // Scan for the '>' ':' arming sequence; anything else disarms.
    let mut armed = false;
    loop {
        let Some(b) = next_byte(input)? else {
            return Ok(None);
        };
        match b {
            b'>' => armed = true,
            b':' if armed => break,
            b'\n' | b'\r' => {
                armed = false;
                writeln!(echo, "SECD machine")?;
            }
            _ => {
                armed = false;
                writeln!(echo, "unexpected character '{}'", b as char)?;
            }
        }
    }

    let mut image = Vec::new();
    loop {
        let Some(hi) = next_byte(input)? else {
            return Err(UploadError::TruncatedPair);
        };
        if hi == b'<' {
            return Ok(Some(image));
        }
        let Some(lo) = next_byte(input)? else {
            return Err(UploadError::TruncatedPair);
        };
        write!(echo, "{}{}", hi as char, lo as char)?;
        let hi = hex_digit(hi)?;
        let lo = hex_digit(lo)?;
        image.push(hi << 4 | lo);
    }
}

fn next_byte(
    input: &mut impl Iterator<Item = io::Result<u8>>,
) -> Result<Option<u8>, UploadError> {
    input.next().transpose().map_err(UploadError::Io)
}

fn hex_digit(b: u8) -> Result<u8, UploadError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(10 + b - b'A'),
        b'a'..=b'f' => Ok(10 + b - b'a'),
        _ => Err(UploadError::InvalidHex(b as char)),
    }
}
