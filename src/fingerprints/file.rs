//! FILE: host file handles
//!
//! Open files live in a [`FileTable`] owned by the [`Runtime`], shared by all
//! IPs. Programs refer to them by small integer handles; every handle coming
//! off the stack is checked against the table before use, so a stale or
//! made-up number simply reflects.
//!
//! Each open file remembers a funge-space vector, its I/O buffer: `R` reads
//! bytes into the row starting there and `W` writes bytes from it.
//!
//! | op | stack (top last) | effect |
//! |----|------------------|--------|
//! | `O` | `Va mode path` | open, push handle |
//! | `C` | `h` | close |
//! | `D` | `path` | delete a file |
//! | `G` | `h` | read a line, push it as a string and its length |
//! | `L` | `h` | push the current position |
//! | `P` | `h string` | write a string |
//! | `R` | `h n` | read `n` bytes into the buffer |
//! | `S` | `h whence n` | seek (0 start, 1 current, 2 end) |
//! | `W` | `h n` | write `n` bytes from the buffer |
//!
//! Everything but `C` and `D` leaves the handle on the stack.

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::ops::io::host_path;
use crate::memory::{Cell, Vector};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "FILE",
    opcodes: &[
        (b'C', close),
        (b'D', delete),
        (b'G', get_line),
        (b'L', tell),
        (b'O', open),
        (b'P', put_string),
        (b'R', read),
        (b'S', seek),
        (b'W', write),
    ],
    safe: false,
};

/// A handle that has been checked against a [`FileTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHandle(usize);

impl FileHandle {
    /// The number programs see
    pub fn as_cell(self) -> Cell {
        self.0 as Cell
    }
}

#[derive(Debug)]
struct OpenFile {
    file: File,
    buffer: Vector,
}

/// Files opened through FILE
#[derive(Debug, Default)]
pub struct FileTable {
    slots: Vec<Option<OpenFile>>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open files
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Check a handle coming from a program
    pub fn validate(&self, raw: Cell) -> Option<FileHandle> {
        let index = usize::try_from(raw).ok()?;
        matches!(self.slots.get(index), Some(Some(_))).then_some(FileHandle(index))
    }

    /// Store an open file in the first free slot
    fn insert(&mut self, file: File, buffer: Vector) -> FileHandle {
        let entry = Some(OpenFile { file, buffer });
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = entry;
                FileHandle(index)
            }
            None => {
                self.slots.push(entry);
                FileHandle(self.slots.len() - 1)
            }
        }
    }

    fn get(&self, handle: FileHandle) -> Option<&OpenFile> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Close a file, freeing its slot
    fn remove(&mut self, handle: FileHandle) -> Option<OpenFile> {
        self.slots.get_mut(handle.0).and_then(Option::take)
    }
}

/// Options for open modes 0-5
fn open_options(mode: Cell) -> Option<OpenOptions> {
    let mut options = OpenOptions::new();
    match mode {
        0 => options.read(true),
        1 => options.write(true).create(true).truncate(true),
        2 => options.append(true).create(true),
        3 => options.read(true).write(true),
        4 => options.read(true).write(true).create(true).truncate(true),
        5 => options.read(true).append(true).create(true),
        _ => return None,
    };
    Some(options)
}

/// Read one line, keeping its terminator (`\n`, `\r\n` or `\r`)
fn read_line(file: &mut File) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if file.read(&mut byte)? == 0 {
            return Ok(line);
        }
        line.push(byte[0]);
        match byte[0] {
            b'\n' => return Ok(line),
            b'\r' => {
                if file.read(&mut byte)? == 0 {
                    return Ok(line);
                }
                if byte[0] == b'\n' {
                    line.push(b'\n');
                } else {
                    file.seek(SeekFrom::Current(-1))?;
                }
                return Ok(line);
            }
            _ => {}
        }
    }
}

/// Clone the file behind the handle on top of the stack, with its buffer
///
/// The clone shares the original's cursor, so I/O through it happens after
/// the table lock is released.
fn checkout(ip: &InstructionPointer, rt: &Runtime) -> Option<(File, Vector)> {
    let files = rt.files();
    let open = files
        .validate(ip.stack().peek())
        .and_then(|handle| files.get(handle))?;
    match open.file.try_clone() {
        Ok(file) => Some((file, open.buffer)),
        Err(e) => {
            log::debug!("FILE handle clone failed: {}", e);
            None
        }
    }
}

/// Run `f` on the file behind the handle on top of the stack
///
/// Reflects if the handle is invalid or `f` fails.
fn with_file<T>(
    ip: &mut InstructionPointer,
    rt: &Runtime,
    what: &str,
    f: impl FnOnce(&mut File, Vector) -> io::Result<T>,
) -> Option<T> {
    let Some((mut file, buffer)) = checkout(ip, rt) else {
        ip.reverse();
        return None;
    };
    match f(&mut file, buffer) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("FILE {} failed: {}", what, e);
            ip.reverse();
            None
        }
    }
}

/// `C`: close
fn close(ip: &mut InstructionPointer, rt: &Runtime) {
    let raw = ip.stack_mut().pop();
    let removed = {
        let mut files = rt.files();
        files.validate(raw).and_then(|handle| files.remove(handle))
    };
    let Some(mut open) = removed else {
        ip.reverse();
        return;
    };
    if let Err(e) = open.file.flush() {
        log::debug!("FILE close failed: {}", e);
        ip.reverse();
    }
}

/// `D`: delete a file by name
fn delete(ip: &mut InstructionPointer, _rt: &Runtime) {
    let path = host_path(&ip.stack_mut().pop_string());
    if let Err(e) = fs::remove_file(&path) {
        log::debug!("FILE delete of {} failed: {}", path.display(), e);
        ip.reverse();
    }
}

/// `G`: read a line
fn get_line(ip: &mut InstructionPointer, rt: &Runtime) {
    if let Some(line) = with_file(ip, rt, "get line", |file, _| read_line(file)) {
        let stack = ip.stack_mut();
        stack.push_string(&line);
        stack.push(line.len() as Cell);
    }
}

/// `L`: current position
fn tell(ip: &mut InstructionPointer, rt: &Runtime) {
    if let Some(pos) = with_file(ip, rt, "tell", |file, _| file.stream_position()) {
        ip.stack_mut().push(pos as Cell);
    }
}

/// `O`: open
fn open(ip: &mut InstructionPointer, rt: &Runtime) {
    let stack = ip.stack_mut();
    let path = host_path(&stack.pop_string());
    let mode = stack.pop();
    let buffer = stack.pop_vector();

    let Some(options) = open_options(mode) else {
        ip.reverse();
        return;
    };
    let opened = options.open(&path).and_then(|mut file| {
        // Append modes still start reading from the beginning
        if mode == 2 || mode == 5 {
            file.rewind()?;
        }
        Ok(file)
    });
    match opened {
        Ok(file) => {
            let handle = rt.files().insert(file, buffer);
            log::debug!("FILE opened {} as handle {}", path.display(), handle.0);
            ip.stack_mut().push(handle.as_cell());
        }
        Err(e) => {
            log::debug!("FILE open of {} failed: {}", path.display(), e);
            ip.reverse();
        }
    }
}

/// `P`: write a string
fn put_string(ip: &mut InstructionPointer, rt: &Runtime) {
    let text = ip.stack_mut().pop_string();
    with_file(ip, rt, "put string", |file, _| file.write_all(&text));
}

/// `R`: read `n` bytes into the buffer row
fn read(ip: &mut InstructionPointer, rt: &Runtime) {
    let n = ip.stack_mut().pop();
    let Some(len) = usize::try_from(n).ok().filter(|&len| len > 0) else {
        ip.reverse();
        return;
    };
    let result = with_file(ip, rt, "read", |file, buffer| {
        let mut bytes = Vec::with_capacity(len.min(1 << 16));
        file.take(len as u64).read_to_end(&mut bytes)?;
        Ok((bytes, buffer))
    });
    if let Some((bytes, buffer)) = result {
        for (i, &b) in bytes.iter().enumerate() {
            rt.space
                .set(Cell::from(b), buffer + Vector::new(i as Cell, 0));
        }
    }
}

/// `S`: seek
fn seek(ip: &mut InstructionPointer, rt: &Runtime) {
    let n = ip.stack_mut().pop();
    let whence = ip.stack_mut().pop();
    let target = match whence {
        0 => u64::try_from(n).ok().map(SeekFrom::Start),
        1 => Some(SeekFrom::Current(i64::from(n))),
        2 => Some(SeekFrom::End(i64::from(n))),
        _ => None,
    };
    let Some(target) = target else {
        ip.reverse();
        return;
    };
    with_file(ip, rt, "seek", |file, _| file.seek(target));
}

/// `W`: write `n` bytes from the buffer row
fn write(ip: &mut InstructionPointer, rt: &Runtime) {
    let n = ip.stack_mut().pop();
    if n <= 0 {
        ip.reverse();
        return;
    }
    with_file(ip, rt, "write", |file, buffer| {
        let bytes: Vec<u8> = (0..n)
            .map(|i| rt.space.get(buffer + Vector::new(i, 0)) as u8)
            .collect();
        file.write_all(&bytes)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rufunge-file-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn open_file(ip: &mut InstructionPointer, rt: &Runtime, path: &Path, mode: Cell) {
        ip.stack_mut().push_vector(Vector::new(0, 5));
        ip.stack_mut().push(mode);
        ip.stack_mut()
            .push_string(path.to_string_lossy().as_bytes());
        open(ip, rt);
    }

    #[test]
    fn test_write_then_read_lines() {
        let path = temp_path("lines.txt");
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);

        open_file(&mut ip, &rt, &path, 4);
        assert_eq!(ip.delta, Vector::EAST);
        assert_eq!(rt.files().open_count(), 1);

        ip.stack_mut().push_string(b"one\r\ntwo\rthree");
        put_string(&mut ip, &rt);
        ip.stack_mut().push(0);
        ip.stack_mut().push(0);
        seek(&mut ip, &rt);

        get_line(&mut ip, &rt);
        assert_eq!(ip.stack_mut().pop(), 5);
        assert_eq!(ip.stack_mut().pop_string(), b"one\r\n");
        get_line(&mut ip, &rt);
        assert_eq!(ip.stack_mut().pop(), 4);
        assert_eq!(ip.stack_mut().pop_string(), b"two\r");
        get_line(&mut ip, &rt);
        assert_eq!(ip.stack_mut().pop(), 5);
        assert_eq!(ip.stack_mut().pop_string(), b"three");

        tell(&mut ip, &rt);
        assert_eq!(ip.stack_mut().pop(), 14);

        close(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
        assert_eq!(rt.files().open_count(), 0);
        assert!(ip.stack().is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_buffer_read_and_write() {
        let path = temp_path("buffer.bin");
        fs::write(&path, b"hello").unwrap();
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);

        open_file(&mut ip, &rt, &path, 3);
        ip.stack_mut().push(10);
        read(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
        assert_eq!(rt.space.get(Vector::new(0, 5)), Cell::from(b'h'));
        assert_eq!(rt.space.get(Vector::new(4, 5)), Cell::from(b'o'));
        // Only the bytes actually read are written
        assert_eq!(rt.space.get(Vector::new(5, 5)), Cell::from(b' '));

        rt.space.set(Cell::from(b'J'), Vector::new(0, 5));
        ip.stack_mut().push(0);
        ip.stack_mut().push(0);
        seek(&mut ip, &rt);
        ip.stack_mut().push(1);
        write(&mut ip, &rt);
        close(&mut ip, &rt);

        assert_eq!(fs::read(&path).unwrap(), b"Jello");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_table_is_free_during_file_io() {
        let path = temp_path("unlocked.txt");
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        open_file(&mut ip, &rt, &path, 1);

        let open_files = with_file(&mut ip, &rt, "count", |file, _| {
            file.write_all(b"x")?;
            Ok(rt.files().open_count())
        });
        assert_eq!(open_files, Some(1));
        assert_eq!(ip.delta, Vector::EAST);

        close(&mut ip, &rt);
        assert_eq!(fs::read(&path).unwrap(), b"x");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_handles_reflect() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        ip.stack_mut().push(3);
        tell(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::WEST);

        ip.stack_mut().push(-1);
        close(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
    }

    #[test]
    fn test_open_failures_reflect() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        open_file(&mut ip, &rt, &PathBuf::from("/nonexistent/rufunge/x"), 0);
        assert_eq!(ip.delta, Vector::WEST);

        open_file(&mut ip, &rt, &temp_path("bad-mode"), 9);
        assert_eq!(ip.delta, Vector::EAST);
        assert_eq!(rt.files().open_count(), 0);
    }

    #[test]
    fn test_slots_are_reused_after_close() {
        let path = temp_path("reuse.txt");
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        open_file(&mut ip, &rt, &path, 1);
        open_file(&mut ip, &rt, &path, 1);
        assert_eq!(ip.stack().entries(), &[0, 1]);

        ip.stack_mut().pop_discard();
        close(&mut ip, &rt);
        open_file(&mut ip, &rt, &path, 1);
        assert_eq!(ip.stack().entries(), &[0]);

        ip.stack_mut().push_string(path.to_string_lossy().as_bytes());
        delete(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
        assert!(!path.exists());
    }
}
