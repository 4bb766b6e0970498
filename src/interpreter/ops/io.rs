// Program I/O, file region and shell instructions

use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Interpret popped string bytes as a host path
pub(crate) fn host_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Reflect (and say why) when sandboxed; returns whether the op may run
pub(crate) fn sandbox_allows(ip: &mut InstructionPointer, rt: &Runtime, what: &str) -> bool {
    if rt.settings.sandbox {
        log::warn!("sandbox refused {} for ip {} at {}", what, ip.id, ip.position);
        ip.reverse();
        return false;
    }
    true
}

/// `.`: pop and print as a decimal followed by a space
pub fn output_decimal(ip: &mut InstructionPointer, rt: &Runtime) {
    let value = ip.stack_mut().pop();
    if let Err(e) = write!(rt.output(), "{} ", value) {
        log::warn!("failed to write output: {}", e);
        ip.reverse();
    }
}

/// `,`: pop and print as a byte
pub fn output_character(ip: &mut InstructionPointer, rt: &Runtime) {
    let value = ip.stack_mut().pop();
    let mut output = rt.output();
    let result = output.write_all(&[value as u8]).and_then(|()| {
        // Line-at-a-time output for interactive programs
        if value == Cell::from(b'\n') {
            output.flush()
        } else {
            Ok(())
        }
    });
    if let Err(e) = result {
        log::warn!("failed to write output: {}", e);
        ip.reverse();
    }
}

/// Make prompts visible before blocking on input
fn flush_prompt(rt: &Runtime) {
    if let Err(e) = rt.output().flush() {
        log::warn!("failed to flush output before reading: {}", e);
    }
}

/// `&`: read a decimal number, reflecting at end of input
pub fn input_decimal(ip: &mut InstructionPointer, rt: &Runtime) {
    flush_prompt(rt);
    let value = rt.input().read_decimal();
    match value {
        Some(value) => ip.stack_mut().push(value),
        None => ip.reverse(),
    }
}

/// `~`: read one byte, reflecting at end of input
pub fn input_character(ip: &mut InstructionPointer, rt: &Runtime) {
    flush_prompt(rt);
    let byte = rt.input().read_byte();
    match byte {
        Some(b) => ip.stack_mut().push(Cell::from(b)),
        None => ip.reverse(),
    }
}

/// `i`: load a file into funge-space
///
/// Pops a path, flags (bit 0: binary) and a destination relative to the
/// storage offset; pushes the loaded size and the destination.
pub fn file_input(ip: &mut InstructionPointer, rt: &Runtime) {
    if !sandbox_allows(ip, rt, "file input") {
        return;
    }
    let name = ip.stack_mut().pop_string();
    if name.is_empty() {
        ip.reverse();
        return;
    }
    let stack = ip.stack_mut();
    let binary = stack.pop() & 1 != 0;
    let offset = stack.pop_vector();

    let path = host_path(&name);
    match rt
        .space
        .load_at_offset(&path, offset + ip.storage_offset, binary)
    {
        Ok(size) => {
            let stack = ip.stack_mut();
            stack.push_vector(size);
            stack.push_vector(offset);
        }
        Err(e) => {
            log::debug!("failed to load {}: {}", path.display(), e);
            ip.reverse();
        }
    }
}

/// `o`: write a region of funge-space to a file
///
/// Pops a path, flags (bit 0: text mode), the region's origin relative to the
/// storage offset and its size.
pub fn file_output(ip: &mut InstructionPointer, rt: &Runtime) {
    if !sandbox_allows(ip, rt, "file output") {
        return;
    }
    let stack = ip.stack_mut();
    let name = stack.pop_string();
    let textfile = stack.pop() & 1 != 0;
    let offset = stack.pop_vector();
    let size = stack.pop_vector();
    if name.is_empty() || size.x < 1 || size.y < 1 {
        ip.reverse();
        return;
    }

    let path = host_path(&name);
    if let Err(e) = rt
        .space
        .save_to_file(&path, offset + ip.storage_offset, size, textfile)
    {
        log::debug!("failed to save {}: {}", path.display(), e);
        ip.reverse();
    }
}

/// `=`: run a shell command and push its exit status
pub fn system_execute(ip: &mut InstructionPointer, rt: &Runtime) {
    if !sandbox_allows(ip, rt, "shell execution") {
        return;
    }
    let command = String::from_utf8_lossy(&ip.stack_mut().pop_string()).into_owned();
    if let Err(e) = rt.output().flush() {
        log::warn!("failed to flush output before running a command: {}", e);
    }

    log::debug!("ip {} runs command {:?}", ip.id, command);
    match Command::new("sh").arg("-c").arg(&command).status() {
        Ok(status) => ip.stack_mut().push(status.code().map_or(-1, |c| c as Cell)),
        Err(e) => {
            log::warn!("failed to run command {:?}: {}", command, e);
            ip.reverse();
        }
    }
}
