// Arithmetic instructions
//
// All arithmetic wraps. Division and remainder by zero push 0.

use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;

/// Pop `b` then `a` and push `f(a, b)`
#[inline]
fn binary(ip: &mut InstructionPointer, f: impl FnOnce(Cell, Cell) -> Cell) {
    let stack = ip.stack_mut();
    let b = stack.pop();
    let a = stack.pop();
    stack.push(f(a, b));
}

pub fn add(ip: &mut InstructionPointer) {
    binary(ip, Cell::wrapping_add);
}

pub fn subtract(ip: &mut InstructionPointer) {
    binary(ip, Cell::wrapping_sub);
}

pub fn multiply(ip: &mut InstructionPointer) {
    binary(ip, Cell::wrapping_mul);
}

/// `/`: truncating division
pub fn divide(ip: &mut InstructionPointer) {
    binary(ip, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) });
}

/// `%`: remainder with the sign of the dividend
pub fn remainder(ip: &mut InstructionPointer) {
    binary(ip, |a, b| if b == 0 { 0 } else { a.wrapping_rem(b) });
}

pub fn not(ip: &mut InstructionPointer) {
    let stack = ip.stack_mut();
    let value = stack.pop();
    stack.push(Cell::from(value == 0));
}

/// `` ` ``: 1 if `a > b`
pub fn greater(ip: &mut InstructionPointer) {
    binary(ip, |a, b| Cell::from(a > b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_stack(values: &[Cell]) -> InstructionPointer {
        let mut ip = InstructionPointer::new(0);
        for &v in values {
            ip.stack_mut().push(v);
        }
        ip
    }

    #[test]
    fn test_operand_order() {
        let mut ip = with_stack(&[7, 2]);
        subtract(&mut ip);
        assert_eq!(ip.stack().entries(), &[5]);

        let mut ip = with_stack(&[7, 2]);
        divide(&mut ip);
        assert_eq!(ip.stack().entries(), &[3]);

        let mut ip = with_stack(&[-7, 2]);
        remainder(&mut ip);
        assert_eq!(ip.stack().entries(), &[-1]);
    }

    #[test]
    fn test_division_by_zero_pushes_zero() {
        let mut ip = with_stack(&[5, 0]);
        divide(&mut ip);
        assert_eq!(ip.stack().entries(), &[0]);

        let mut ip = with_stack(&[5, 0]);
        remainder(&mut ip);
        assert_eq!(ip.stack().entries(), &[0]);
    }

    #[test]
    fn test_wrapping() {
        let mut ip = with_stack(&[Cell::MAX, 1]);
        add(&mut ip);
        assert_eq!(ip.stack().entries(), &[Cell::MIN]);

        let mut ip = with_stack(&[Cell::MIN, -1]);
        divide(&mut ip);
        assert_eq!(ip.stack().entries(), &[Cell::MIN]);
    }

    #[test]
    fn test_not_and_greater() {
        let mut ip = with_stack(&[0]);
        not(&mut ip);
        assert_eq!(ip.stack().peek(), 1);
        not(&mut ip);
        assert_eq!(ip.stack().peek(), 0);

        let mut ip = with_stack(&[3, 2]);
        greater(&mut ip);
        assert_eq!(ip.stack().entries(), &[1]);

        // Empty stack compares 0 > 0
        let mut ip = with_stack(&[]);
        greater(&mut ip);
        assert_eq!(ip.stack().entries(), &[0]);
    }
}
