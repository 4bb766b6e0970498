// Program-facing terminal: output sink and input source

use crate::memory::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read, Write};

/// Where program output goes
#[derive(Debug)]
enum Output {
    Stdout(io::Stdout),
    Captured(Vec<u8>),
}

/// Where program input comes from
enum Input {
    Reader(Box<dyn Read + Send>),
    Buffer(VecDeque<u8>),
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Reader(_) => f.write_str("Reader"),
            Input::Buffer(buf) => f.debug_tuple("Buffer").field(&buf.len()).finish(),
        }
    }
}

/// Program I/O for `.`, `,`, `&`, `~` and terminal fingerprints
///
/// The two halves are independent so that the runtime can lock them
/// separately: an IP waiting for input never holds up another IP's output.
/// Captured terminals record everything written so tests and the debugger can
/// inspect it.
#[derive(Debug)]
pub struct Terminal {
    pub output: ProgramOutput,
    pub input: ProgramInput,
}

impl Terminal {
    /// Terminal bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Terminal {
            output: ProgramOutput(Output::Stdout(io::stdout())),
            input: ProgramInput::new(Input::Reader(Box::new(io::stdin()))),
        }
    }

    /// Terminal that records output and reads from `input`
    pub fn captured(input: &[u8]) -> Self {
        Terminal {
            output: ProgramOutput(Output::Captured(Vec::new())),
            input: ProgramInput::new(Input::Buffer(input.iter().copied().collect())),
        }
    }

    /// Terminal that records output and reads from a stream
    pub fn piped(input: impl Read + Send + 'static) -> Self {
        Terminal {
            output: ProgramOutput(Output::Captured(Vec::new())),
            input: ProgramInput::new(Input::Reader(Box::new(input))),
        }
    }
}

/// Output half of a [`Terminal`]
#[derive(Debug)]
pub struct ProgramOutput(Output);

impl ProgramOutput {
    /// Everything written so far, if output is captured
    pub fn captured_output(&self) -> Option<&[u8]> {
        match &self.0 {
            Output::Captured(buf) => Some(buf),
            Output::Stdout(_) => None,
        }
    }
}

impl Write for ProgramOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Output::Stdout(out) => out.write(buf),
            Output::Captured(captured) => {
                captured.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Output::Stdout(out) => out.flush(),
            Output::Captured(_) => Ok(()),
        }
    }
}

/// Input half of a [`Terminal`], with one byte of push-back
#[derive(Debug)]
pub struct ProgramInput {
    input: Input,
    pushback: Option<u8>,
}

impl ProgramInput {
    fn new(input: Input) -> Self {
        ProgramInput {
            input,
            pushback: None,
        }
    }

    /// Read one byte of input, `None` at end of input or on error
    pub fn read_byte(&mut self) -> Option<u8> {
        if let Some(b) = self.pushback.take() {
            return Some(b);
        }
        match &mut self.input {
            Input::Buffer(buf) => buf.pop_front(),
            Input::Reader(reader) => {
                let mut byte = [0u8; 1];
                loop {
                    match reader.read(&mut byte) {
                        Ok(1) => return Some(byte[0]),
                        Ok(_) => return None,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            log::warn!("failed to read input: {}", e);
                            return None;
                        }
                    }
                }
            }
        }
    }

    /// Read a decimal number, skipping anything before the first digit
    ///
    /// The first character after the digits is left unread. Returns `None` when
    /// input ends before a digit is seen.
    pub fn read_decimal(&mut self) -> Option<Cell> {
        let mut value: Cell = loop {
            let b = self.read_byte()?;
            if b.is_ascii_digit() {
                break Cell::from(b - b'0');
            }
        };

        while let Some(b) = self.read_byte() {
            let next = if b.is_ascii_digit() {
                value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(Cell::from(b - b'0')))
            } else {
                None
            };
            match next {
                Some(v) => value = v,
                None => {
                    self.pushback = Some(b);
                    break;
                }
            }
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_output() {
        let mut term = Terminal::captured(b"");
        write!(term.output, "{} ", 42).unwrap();
        term.output.write_all(b"hi").unwrap();
        assert_eq!(term.output.captured_output(), Some(&b"42 hi"[..]));
    }

    #[test]
    fn test_read_byte_until_eof() {
        let mut term = Terminal::captured(b"ab");
        assert_eq!(term.input.read_byte(), Some(b'a'));
        assert_eq!(term.input.read_byte(), Some(b'b'));
        assert_eq!(term.input.read_byte(), None);
    }

    #[test]
    fn test_read_decimal_leaves_terminator() {
        let mut term = Terminal::captured(b"  x123\nz");
        assert_eq!(term.input.read_decimal(), Some(123));
        assert_eq!(term.input.read_byte(), Some(b'\n'));
        assert_eq!(term.input.read_decimal(), None);
    }

    #[test]
    fn test_read_decimal_stops_before_overflow() {
        let mut term = Terminal::captured(b"9999999999999999999999999");
        let value = term.input.read_decimal().unwrap();
        assert!(value > 0);
        assert_eq!(term.input.read_byte(), Some(b'9'));
    }

    #[test]
    fn test_piped_input() {
        let mut term = Terminal::piped(io::Cursor::new(b"7 x".to_vec()));
        assert_eq!(term.input.read_decimal(), Some(7));
        assert_eq!(term.input.read_byte(), Some(b' '));
        assert_eq!(term.input.read_byte(), Some(b'x'));
        assert_eq!(term.input.read_byte(), None);
        assert_eq!(term.output.captured_output(), Some(&b""[..]));
    }
}
