//! Funge-space implementation
//!
//! This module provides the sparse 2D grid that holds both program text and data:
//! - Unbounded addressing with a default of `' '` for unwritten cells
//! - A bounding rectangle that grows on every write and never shrinks
//! - Region loading from files (`i`) and saving to files (`o`)
//!
//! # Concurrency
//!
//! The cell map sits behind an [`RwLock`]. Each [`FungeSpace::get`] or
//! [`FungeSpace::set`] is a single lock acquisition, so parallel IPs never observe
//! a torn cell, while multi-cell sequences are not atomic.

use super::value::{Cell, Rect, Vector, SPACE};
use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
struct SpaceData {
    cells: FxHashMap<Vector, Cell>,
    bounds: Option<Rect>,
}

impl SpaceData {
    fn set(&mut self, value: Cell, pos: Vector) {
        if value == SPACE {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, value);
        }
        match &mut self.bounds {
            Some(rect) => rect.include(pos),
            None => self.bounds = Some(Rect::point(pos)),
        }
    }
}

/// Point-in-time copy of funge-space (used by the debugger history)
#[derive(Debug, Clone)]
pub struct SpaceSnapshot {
    data: SpaceData,
}

impl SpaceSnapshot {
    /// Number of non-space cells captured
    pub fn cell_count(&self) -> usize {
        self.data.cells.len()
    }
}

/// The shared funge-space
#[derive(Debug, Default)]
pub struct FungeSpace {
    data: RwLock<SpaceData>,
}

impl FungeSpace {
    pub fn new() -> Self {
        FungeSpace {
            data: RwLock::new(SpaceData::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SpaceData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SpaceData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a cell, `' '` if it was never written
    pub fn get(&self, pos: Vector) -> Cell {
        self.read().cells.get(&pos).copied().unwrap_or(SPACE)
    }

    /// Write a cell, growing the bounds to cover `pos`
    pub fn set(&self, value: Cell, pos: Vector) {
        self.write().set(value, pos);
    }

    /// Smallest rectangle known to contain every written cell
    ///
    /// A space that was never written reports the single point (0, 0).
    pub fn bounds(&self) -> Rect {
        self.read().bounds.unwrap_or_default()
    }

    /// Number of non-space cells
    pub fn cell_count(&self) -> usize {
        self.read().cells.len()
    }

    pub fn snapshot(&self) -> SpaceSnapshot {
        SpaceSnapshot {
            data: self.read().clone(),
        }
    }

    pub fn restore(&self, snapshot: &SpaceSnapshot) {
        *self.write() = snapshot.data.clone();
    }

    /// Place source text at `offset`
    ///
    /// Lines end at `\n`, `\r\n` or `\r`, form feeds are dropped and spaces do
    /// not overwrite existing cells. With `binary` set every byte goes on a
    /// single row. Returns the size of the loaded area as (longest row, rows).
    pub fn load_bytes(&self, bytes: &[u8], offset: Vector, binary: bool) -> Vector {
        let mut data = self.write();
        let mut x: Cell = 0;
        let mut y: Cell = 0;
        let mut width: Cell = 0;
        let mut last_was_cr = false;

        for &b in bytes {
            if !binary {
                match b {
                    b'\n' if last_was_cr => {
                        last_was_cr = false;
                        continue;
                    }
                    b'\n' | b'\r' => {
                        last_was_cr = b == b'\r';
                        y += 1;
                        x = 0;
                        continue;
                    }
                    0x0c => {
                        last_was_cr = false;
                        continue;
                    }
                    _ => last_was_cr = false,
                }
            }
            if b != b' ' {
                data.set(Cell::from(b), offset + Vector::new(x, y));
            }
            x += 1;
            width = width.max(x);
        }

        // A trailing partial row still counts as a row
        let rows = if x > 0 { y + 1 } else { y };
        Vector::new(width, rows)
    }

    /// Load a file into space at `offset`
    pub fn load_at_offset(&self, path: &Path, offset: Vector, binary: bool) -> io::Result<Vector> {
        let bytes = fs::read(path)?;
        let size = self.load_bytes(&bytes, offset, binary);
        log::debug!(
            "loaded {} ({} bytes) at {} with size {}",
            path.display(),
            bytes.len(),
            offset,
            size
        );
        Ok(size)
    }

    /// Render the region `[offset, offset + size)` as bytes
    ///
    /// In text mode trailing spaces are stripped from every row.
    pub fn region_bytes(&self, offset: Vector, size: Vector, textfile: bool) -> Vec<u8> {
        let data = self.read();
        let mut out = Vec::new();
        for dy in 0..size.y.max(0) {
            let mut line: Vec<u8> = (0..size.x.max(0))
                .map(|dx| {
                    let pos = offset + Vector::new(dx, dy);
                    data.cells.get(&pos).copied().unwrap_or(SPACE) as u8
                })
                .collect();
            if textfile {
                let keep = line.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
                line.truncate(keep);
            }
            out.extend_from_slice(&line);
            out.push(b'\n');
        }
        out
    }

    /// Write the region `[offset, offset + size)` to a file
    pub fn save_to_file(
        &self,
        path: &Path,
        offset: Vector,
        size: Vector,
        textfile: bool,
    ) -> io::Result<()> {
        let bytes = self.region_bytes(offset, size, textfile);
        fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_is_space() {
        let space = FungeSpace::new();
        assert_eq!(space.get(Vector::new(1000, -1000)), SPACE);
        assert_eq!(space.bounds(), Rect::default());
    }

    #[test]
    fn test_set_get_and_bounds() {
        let space = FungeSpace::new();
        space.set(42, Vector::new(-3, 5));
        space.set(7, Vector::new(10, -1));

        assert_eq!(space.get(Vector::new(-3, 5)), 42);
        assert_eq!(space.get(Vector::new(10, -1)), 7);
        let bounds = space.bounds();
        assert_eq!(bounds.least, Vector::new(-3, -1));
        assert_eq!(bounds.greatest, Vector::new(10, 5));
    }

    #[test]
    fn test_bounds_do_not_shrink() {
        let space = FungeSpace::new();
        space.set(1, Vector::new(20, 20));
        space.set(SPACE, Vector::new(20, 20));
        assert_eq!(space.cell_count(), 0);
        assert!(space.bounds().contains(Vector::new(20, 20)));
    }

    #[test]
    fn test_load_text_line_endings() {
        let space = FungeSpace::new();
        let size = space.load_bytes(b"ab\r\ncd\rxyz\n", Vector::ZERO, false);

        assert_eq!(size, Vector::new(3, 3));
        assert_eq!(space.get(Vector::new(1, 0)), b'b' as Cell);
        assert_eq!(space.get(Vector::new(0, 1)), b'c' as Cell);
        assert_eq!(space.get(Vector::new(2, 2)), b'z' as Cell);
    }

    #[test]
    fn test_load_spaces_are_transparent() {
        let space = FungeSpace::new();
        space.set(b'#' as Cell, Vector::new(1, 0));
        space.load_bytes(b"a b", Vector::ZERO, false);
        assert_eq!(space.get(Vector::new(1, 0)), b'#' as Cell);
    }

    #[test]
    fn test_load_binary_single_row() {
        let space = FungeSpace::new();
        let size = space.load_bytes(b"a\nb", Vector::new(5, 5), true);
        assert_eq!(size, Vector::new(3, 1));
        assert_eq!(space.get(Vector::new(6, 5)), b'\n' as Cell);
        assert_eq!(space.get(Vector::new(7, 5)), b'b' as Cell);
    }

    #[test]
    fn test_region_bytes_strips_in_text_mode() {
        let space = FungeSpace::new();
        space.load_bytes(b"ab \nc", Vector::ZERO, false);
        assert_eq!(space.region_bytes(Vector::ZERO, Vector::new(3, 2), true), b"ab\nc\n");
        assert_eq!(space.region_bytes(Vector::ZERO, Vector::new(3, 2), false), b"ab \nc  \n");
    }

    #[test]
    fn test_snapshot_restore() {
        let space = FungeSpace::new();
        space.set(1, Vector::ZERO);
        let snap = space.snapshot();
        space.set(2, Vector::ZERO);
        space.set(3, Vector::new(50, 50));
        space.restore(&snap);

        assert_eq!(space.get(Vector::ZERO), 1);
        assert_eq!(space.get(Vector::new(50, 50)), SPACE);
        assert_eq!(space.bounds(), Rect::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let space = FungeSpace::new();
        let result = space.load_at_offset(Path::new("/nonexistent/rufunge/file.b98"), Vector::ZERO, false);
        assert!(result.is_err());
    }
}
