// Funge-space access instructions

use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;

/// `'`: push the next cell and skip over it
pub fn fetch_character(ip: &mut InstructionPointer, rt: &Runtime) {
    ip.advance(&rt.space);
    let value = rt.space.get(ip.position);
    ip.stack_mut().push(value);
}

/// `s`: pop a value into the next cell and skip over it
pub fn store_character(ip: &mut InstructionPointer, rt: &Runtime) {
    ip.advance(&rt.space);
    let value = ip.stack_mut().pop();
    rt.space.set(value, ip.position);
}

/// `g`: pop a vector and push the cell at it, relative to the storage offset
pub fn get(ip: &mut InstructionPointer, rt: &Runtime) {
    let target = ip.stack_mut().pop_vector() + ip.storage_offset;
    let value = rt.space.get(target);
    ip.stack_mut().push(value);
}

/// `p`: pop a vector and a value and store the value there
pub fn put(ip: &mut InstructionPointer, rt: &Runtime) {
    let target = ip.stack_mut().pop_vector() + ip.storage_offset;
    let value = ip.stack_mut().pop();
    rt.space.set(value, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::settings::Settings;
    use crate::memory::{Vector, SPACE};

    #[test]
    fn test_put_then_get_with_offset() {
        let rt = Runtime::captured(Settings::default(), b"");
        let mut ip = InstructionPointer::new(0);
        ip.storage_offset = Vector::new(10, 10);

        ip.stack_mut().push(42);
        ip.stack_mut().push_vector(Vector::new(1, 2));
        put(&mut ip, &rt);
        assert_eq!(rt.space.get(Vector::new(11, 12)), 42);

        ip.stack_mut().push_vector(Vector::new(1, 2));
        get(&mut ip, &rt);
        assert_eq!(ip.stack().entries(), &[42]);

        ip.stack_mut().push_vector(Vector::new(-50, 3));
        get(&mut ip, &rt);
        assert_eq!(ip.stack().peek(), SPACE);
    }

    #[test]
    fn test_fetch_and_store_skip_the_cell() {
        let rt = Runtime::captured(Settings::default(), b"");
        rt.space.load_bytes(b"'Xs.", Vector::ZERO, false);
        let mut ip = InstructionPointer::new(0);

        fetch_character(&mut ip, &rt);
        assert_eq!(ip.position, Vector::new(1, 0));
        assert_eq!(ip.stack().peek(), crate::memory::Cell::from(b'X'));

        ip.position = Vector::new(2, 0);
        ip.stack_mut().push(crate::memory::Cell::from(b'!'));
        store_character(&mut ip, &rt);
        assert_eq!(ip.position, Vector::new(3, 0));
        assert_eq!(rt.space.get(Vector::new(3, 0)), crate::memory::Cell::from(b'!'));
    }
}
