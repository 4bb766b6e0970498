// Property tests for stacks, funge-space and IP motion

use proptest::prelude::*;
use rufunge::interpreter::ip::InstructionPointer;
use rufunge::memory::{Cell, FungeSpace, Stack, Vector, SPACE};

fn small_vector() -> impl Strategy<Value = Vector> {
    (-50 as Cell..50, -50 as Cell..50).prop_map(|(x, y)| Vector::new(x, y))
}

proptest! {
    #[test]
    fn pops_come_back_reversed_then_zero(values in prop::collection::vec(any::<Cell>(), 0..64)) {
        let mut stack = Stack::new();
        for &v in &values {
            stack.push(v);
        }
        for &v in values.iter().rev() {
            prop_assert_eq!(stack.pop(), v);
        }
        prop_assert_eq!(stack.pop(), 0);
        prop_assert!(stack.is_empty());
    }

    #[test]
    fn vectors_survive_the_stack(x in any::<Cell>(), y in any::<Cell>(), below in any::<Cell>()) {
        let mut stack = Stack::new();
        stack.push(below);
        stack.push_vector(Vector::new(x, y));
        prop_assert_eq!(stack.pop_vector(), Vector::new(x, y));
        prop_assert_eq!(stack.pop(), below);
    }

    #[test]
    fn strings_survive_the_stack(bytes in prop::collection::vec(1u8..=255, 0..32)) {
        let mut stack = Stack::new();
        stack.push_string(&bytes);
        prop_assert_eq!(stack.pop_string(), bytes);
        prop_assert!(stack.is_empty());
    }

    #[test]
    fn discarding_never_underflows(values in prop::collection::vec(any::<Cell>(), 0..16), n in 0usize..32) {
        let mut stack = Stack::new();
        for &v in &values {
            stack.push(v);
        }
        stack.pop_n_discard(n);
        prop_assert_eq!(stack.len(), values.len().saturating_sub(n));
    }

    #[test]
    fn space_reads_back_writes(writes in prop::collection::vec((small_vector(), any::<Cell>()), 1..32)) {
        let space = FungeSpace::new();
        for &(pos, value) in &writes {
            space.set(value, pos);
        }
        let bounds = space.bounds();
        for (i, &(pos, _)) in writes.iter().enumerate() {
            prop_assert!(bounds.contains(pos));
            // Later writes to the same cell win
            let expected = writes[i..]
                .iter()
                .rev()
                .find(|(p, _)| *p == pos)
                .map(|&(_, v)| v)
                .unwrap_or(SPACE);
            prop_assert_eq!(space.get(pos), expected);
        }
    }

    #[test]
    fn bounds_never_shrink(pos in small_vector(), value in any::<Cell>()) {
        let space = FungeSpace::new();
        space.set(value, pos);
        let before = space.bounds();
        space.set(SPACE, pos);
        prop_assert_eq!(space.bounds(), before);
        prop_assert_eq!(space.get(pos), SPACE);
    }

    #[test]
    fn advancing_stays_in_bounds(
        corner in small_vector(),
        start in (0 as Cell..10, 0 as Cell..10),
        delta in (-3 as Cell..=3, -3 as Cell..=3),
    ) {
        prop_assume!(delta != (0, 0));
        let space = FungeSpace::new();
        space.set(Cell::from(b'@'), corner);
        space.set(Cell::from(b'@'), corner + Vector::new(9, 9));

        let mut ip = InstructionPointer::new(0);
        ip.position = corner + Vector::new(start.0, start.1);
        ip.delta = Vector::new(delta.0, delta.1);
        for _ in 0..20 {
            ip.advance(&space);
            prop_assert!(space.bounds().contains(ip.position));
        }
    }

    #[test]
    fn blocks_restore_the_stack(
        values in prop::collection::vec(any::<Cell>(), 0..16),
        count in 0 as Cell..16,
        offset in small_vector(),
    ) {
        prop_assume!(count as usize <= values.len());
        let mut ip = InstructionPointer::new(0);
        ip.storage_offset = offset;
        for &v in &values {
            ip.stack_mut().push(v);
        }

        ip.begin_block(count);
        prop_assert_eq!(ip.stacks().len(), 2);
        prop_assert_eq!(ip.stack().len(), count as usize);
        ip.end_block(count);

        prop_assert_eq!(ip.stacks().len(), 1);
        prop_assert_eq!(ip.stack().entries(), values.as_slice());
        prop_assert_eq!(ip.storage_offset, offset);
    }
}
