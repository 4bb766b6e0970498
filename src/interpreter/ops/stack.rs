// Stack-stack instructions: `{`, `}` and `u`

use crate::interpreter::ip::InstructionPointer;

/// `{`: pop a count and open a block
pub fn begin_block(ip: &mut InstructionPointer) {
    let count = ip.stack_mut().pop();
    ip.begin_block(count);
}

/// `}`: pop a count and close the current block
pub fn end_block(ip: &mut InstructionPointer) {
    let count = ip.stack_mut().pop();
    ip.end_block(count);
}

/// `u`: move cells between SOSS and TOSS one at a time
pub fn stack_under_stack(ip: &mut InstructionPointer) {
    let count = ip.stack_mut().pop();
    if !ip.stacks_mut().transfer(count) {
        ip.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Vector;

    #[test]
    fn test_block_round_trip() {
        let mut ip = InstructionPointer::new(0);
        for v in [1, 2, 3, 4] {
            ip.stack_mut().push(v);
        }
        ip.stack_mut().push(2);
        begin_block(&mut ip);
        assert_eq!(ip.stack().entries(), &[3, 4]);
        assert_eq!(ip.stacks().soss().map(|s| s.entries().to_vec()), Some(vec![1, 2, 0, 0]));

        ip.stack_mut().push(2);
        end_block(&mut ip);
        assert_eq!(ip.stack().entries(), &[1, 2, 3, 4]);
        assert_eq!(ip.storage_offset, Vector::ZERO);
    }

    #[test]
    fn test_under_without_block_reflects() {
        let mut ip = InstructionPointer::new(0);
        ip.stack_mut().push(1);
        stack_under_stack(&mut ip);
        assert_eq!(ip.delta, Vector::WEST);
    }

    #[test]
    fn test_under_moves_reversed() {
        let mut ip = InstructionPointer::new(0);
        for v in [7, 8] {
            ip.stack_mut().push(v);
        }
        ip.stack_mut().push(0);
        begin_block(&mut ip);
        // SOSS: 7 8 0 0 (offset on top)
        ip.stack_mut().push(3);
        stack_under_stack(&mut ip);
        assert_eq!(ip.stack().entries(), &[0, 0, 8]);
    }
}
