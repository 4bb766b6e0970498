// Snapshot management for the debugger's execution history

use crate::interpreter::ip::InstructionPointer;
use crate::memory::{Cell, SpaceSnapshot};

/// Rough per-cell cost of a funge-space entry in the hash map
const BYTES_PER_CELL: usize = 2 * std::mem::size_of::<Cell>() * 2 + 8;

/// State of the whole program after some tick
///
/// Host effects (files written, commands run, output already flushed) are not
/// part of a snapshot. Output is tracked by length only: the debugger keeps
/// the full captured output and shows the prefix belonging to the snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub space: SpaceSnapshot,
    pub ips: Vec<InstructionPointer>,
    pub output_len: usize,
    pub exit_code: Option<Cell>,
    pub ticks: u64,
}

impl Snapshot {
    pub fn new(
        space: SpaceSnapshot,
        ips: Vec<InstructionPointer>,
        output_len: usize,
        exit_code: Option<Cell>,
        ticks: u64,
    ) -> Self {
        Snapshot {
            space,
            ips,
            output_len,
            exit_code,
            ticks,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let space_size = self.space.cell_count() * BYTES_PER_CELL;

        // Every stack cell plus a fixed cost per IP for position, delta and
        // the opcode table
        let ip_size: usize = self
            .ips
            .iter()
            .map(|ip| {
                let cells: usize = ip.stacks().stacks().iter().map(|s| s.len()).sum();
                cells * std::mem::size_of::<Cell>() + 256
            })
            .sum();

        space_size + ip_size + std::mem::size_of::<Self>()
    }
}

/// Bounded execution history
///
/// When a new snapshot would exceed the memory limit, the oldest snapshots
/// are dropped to make room.
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history, returning how many old ones were evicted
    pub fn push(&mut self, snapshot: Snapshot) -> Result<usize, String> {
        let snapshot_size = snapshot.estimated_size();

        if snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot of {} bytes exceeds the history limit of {} bytes",
                snapshot_size, self.max_memory
            ));
        }

        let mut evicted = 0;
        while self.current_memory + snapshot_size > self.max_memory {
            let oldest = self.snapshots.remove(0);
            self.current_memory -= oldest.estimated_size();
            evicted += 1;
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(evicted)
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FungeSpace, Vector};

    fn snapshot(ticks: u64) -> Snapshot {
        let space = FungeSpace::new();
        space.load_bytes(b"12+.@", Vector::ZERO, false);
        Snapshot::new(
            space.snapshot(),
            vec![InstructionPointer::new(0)],
            0,
            None,
            ticks,
        )
    }

    #[test]
    fn test_push_and_get() {
        let mut manager = SnapshotManager::new(1 << 20);
        assert!(manager.is_empty());
        assert_eq!(manager.push(snapshot(0)), Ok(0));
        assert_eq!(manager.push(snapshot(1)), Ok(0));
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|s| s.ticks), Some(1));
        assert_eq!(manager.memory_usage(), 2 * snapshot(0).estimated_size());
    }

    #[test]
    fn test_oldest_snapshots_are_evicted() {
        let size = snapshot(0).estimated_size();
        let mut manager = SnapshotManager::new(size * 3);
        for t in 0..3 {
            assert_eq!(manager.push(snapshot(t)), Ok(0));
        }
        assert_eq!(manager.push(snapshot(3)), Ok(1));
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.get(0).map(|s| s.ticks), Some(1));
        assert!(manager.memory_usage() <= manager.memory_limit());
    }

    #[test]
    fn test_oversized_snapshot_is_rejected() {
        let mut manager = SnapshotManager::new(16);
        assert!(manager.push(snapshot(0)).is_err());
        assert!(manager.is_empty());
    }
}
