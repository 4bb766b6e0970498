// TERM: cursor control, written as escape sequences on program output

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;
use crossterm::cursor::{MoveDown, MoveTo, MoveUp};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{Command, QueueableCommand};

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "TERM",
    opcodes: &[
        (b'C', clear_screen),
        (b'D', go_down),
        (b'G', goto_xy),
        (b'H', go_home),
        (b'L', clear_to_eol),
        (b'S', clear_to_eos),
        (b'U', go_up),
    ],
    safe: true,
};

/// Write `command` to program output, reflecting on failure
fn emit(ip: &mut InstructionPointer, rt: &Runtime, command: impl Command) {
    if let Err(e) = rt.output().queue(command) {
        log::warn!("failed to write terminal control sequence: {}", e);
        ip.reverse();
    }
}

/// Move `n` lines down, or up for negative `n`
fn move_lines(ip: &mut InstructionPointer, rt: &Runtime, n: Cell) {
    let lines = u16::try_from(n.unsigned_abs()).unwrap_or(u16::MAX);
    if n > 0 {
        emit(ip, rt, MoveDown(lines));
    } else if n < 0 {
        emit(ip, rt, MoveUp(lines));
    }
}

/// `C`: clear the screen
fn clear_screen(ip: &mut InstructionPointer, rt: &Runtime) {
    emit(ip, rt, Clear(ClearType::All));
}

/// `D`: move down `n` lines
fn go_down(ip: &mut InstructionPointer, rt: &Runtime) {
    let n = ip.stack_mut().pop();
    move_lines(ip, rt, n);
}

/// `U`: move up `n` lines
fn go_up(ip: &mut InstructionPointer, rt: &Runtime) {
    let n = ip.stack_mut().pop();
    move_lines(ip, rt, n.wrapping_neg());
}

/// `G`: pop `x` then `y` and move there (home is 0,0)
fn goto_xy(ip: &mut InstructionPointer, rt: &Runtime) {
    let x = ip.stack_mut().pop();
    let y = ip.stack_mut().pop();
    match (u16::try_from(x), u16::try_from(y)) {
        (Ok(x), Ok(y)) => emit(ip, rt, MoveTo(x, y)),
        _ => ip.reverse(),
    }
}

/// `H`: move to the top left corner
fn go_home(ip: &mut InstructionPointer, rt: &Runtime) {
    emit(ip, rt, MoveTo(0, 0));
}

/// `L`: clear to the end of the line
fn clear_to_eol(ip: &mut InstructionPointer, rt: &Runtime) {
    emit(ip, rt, Clear(ClearType::UntilNewLine));
}

/// `S`: clear to the end of the screen
fn clear_to_eos(ip: &mut InstructionPointer, rt: &Runtime) {
    emit(ip, rt, Clear(ClearType::FromCursorDown));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Vector;

    fn output(rt: &Runtime) -> String {
        String::from_utf8_lossy(rt.output().captured_output().unwrap_or_default()).into_owned()
    }

    #[test]
    fn test_cursor_movement() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        ip.stack_mut().push(3);
        ip.stack_mut().push(2);
        goto_xy(&mut ip, &rt);
        go_home(&mut ip, &rt);
        ip.stack_mut().push(2);
        go_down(&mut ip, &rt);
        ip.stack_mut().push(-1);
        go_down(&mut ip, &rt);
        ip.stack_mut().push(0);
        go_up(&mut ip, &rt);
        assert_eq!(output(&rt), "\x1b[4;3H\x1b[1;1H\x1b[2B\x1b[1A");
    }

    #[test]
    fn test_clearing() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        clear_screen(&mut ip, &rt);
        clear_to_eol(&mut ip, &rt);
        clear_to_eos(&mut ip, &rt);
        assert_eq!(output(&rt), "\x1b[2J\x1b[K\x1b[J");
    }

    #[test]
    fn test_goto_negative_reflects() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        ip.stack_mut().push(1);
        ip.stack_mut().push(-1);
        goto_xy(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::WEST);
        assert_eq!(output(&rt), "");
    }
}
