// Execution engine for the Funge interpreter

use crate::fingerprints;
use crate::fingerprints::file::FileTable;
use crate::interpreter::dispatch::Handler;
use crate::interpreter::errors::{FungeError, FungeResult};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::ops::{arith, flow, io, space, stack};
use crate::interpreter::settings::{ExecutionModel, Settings};
use crate::interpreter::sysinfo;
use crate::interpreter::terminal::{ProgramInput, ProgramOutput, Terminal};
use crate::memory::{Cell, FungeSpace, Vector, SPACE};
use crate::snapshot::{Snapshot, SnapshotManager};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, Scope};

/// What the scheduler should do with an IP after one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep running
    Continue,
    /// This IP is done (`@`)
    Stop,
    /// The whole program is done (`q`)
    Quit(Cell),
}

/// State shared by every IP of a running program
///
/// Only funge-space and the host resources (program output, program input,
/// open files) are shared; everything else belongs to an individual
/// [`InstructionPointer`]. Each host resource has its own lock.
#[derive(Debug)]
pub struct Runtime {
    pub space: FungeSpace,
    pub settings: Settings,
    output: Mutex<ProgramOutput>,
    input: Mutex<ProgramInput>,
    files: Mutex<FileTable>,
    next_id: AtomicUsize,
    exit_code: OnceLock<Cell>,
}

impl Runtime {
    pub fn new(settings: Settings, terminal: Terminal) -> Self {
        Runtime {
            space: FungeSpace::new(),
            settings,
            output: Mutex::new(terminal.output),
            input: Mutex::new(terminal.input),
            files: Mutex::new(FileTable::new()),
            next_id: AtomicUsize::new(0),
            exit_code: OnceLock::new(),
        }
    }

    /// Runtime with captured output reading from `input`
    pub fn captured(settings: Settings, input: &[u8]) -> Self {
        Self::new(settings, Terminal::captured(input))
    }

    pub fn output(&self) -> MutexGuard<'_, ProgramOutput> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Held for as long as a read blocks, so never take `output` while holding it
    pub fn input(&self) -> MutexGuard<'_, ProgramInput> {
        self.input.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn files(&self) -> MutexGuard<'_, FileTable> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a fresh IP id
    pub fn next_id(&self) -> Cell {
        self.next_id.fetch_add(1, Ordering::Relaxed) as Cell
    }

    /// Record the program's exit code; the first caller wins
    pub fn request_exit(&self, code: Cell) {
        if self.exit_code.set(code).is_err() {
            log::debug!("exit code already recorded, ignoring {}", code);
        }
    }

    pub fn exit_code(&self) -> Option<Cell> {
        self.exit_code.get().copied()
    }
}

/// Run one tick of `ip`
///
/// Spaces and `;`-regions are skipped without costing a tick. Children created
/// by `t` are appended to `spawned`.
pub fn step(
    ip: &mut InstructionPointer,
    rt: &Runtime,
    spawned: &mut Vec<InstructionPointer>,
) -> ControlFlow {
    if ip.string_mode {
        string_step(ip, rt);
        return ControlFlow::Continue;
    }

    // A line of travel with nothing but spaces is an infinite no-op loop
    let Some(op) = seek_instruction(ip, &rt.space) else {
        return ControlFlow::Continue;
    };

    log::trace!(
        "ip {} at {} executes {:?}",
        ip.id,
        ip.position,
        char::from_u32(op as u32).unwrap_or('?')
    );

    let flow = execute(op, ip, rt, spawned);
    if flow == ControlFlow::Continue {
        ip.advance(&rt.space);
    }
    flow
}

fn string_step(ip: &mut InstructionPointer, rt: &Runtime) {
    let c = rt.space.get(ip.position);
    if c == Cell::from(b'"') {
        ip.string_mode = false;
        ip.advance(&rt.space);
    } else if c == SPACE {
        // A run of spaces collapses into one
        ip.stack_mut().push(SPACE);
        let start = ip.position;
        ip.advance(&rt.space);
        while rt.space.get(ip.position) == SPACE && ip.position != start {
            ip.advance(&rt.space);
        }
    } else {
        ip.stack_mut().push(c);
        ip.advance(&rt.space);
    }
}

/// Move `ip` onto the next cell that holds an instruction
///
/// Returns `None` (with `ip` back where the search cycle began) if the line of
/// travel holds nothing but spaces and `;`-regions.
pub(crate) fn seek_instruction(ip: &mut InstructionPointer, space: &FungeSpace) -> Option<Cell> {
    let bounds = space.bounds();
    let mut anchor = bounds.contains(ip.position).then_some(ip.position);
    let mut in_jump = false;
    loop {
        let c = space.get(ip.position);
        if c == Cell::from(b';') {
            in_jump = !in_jump;
        } else if !in_jump && c != SPACE {
            return Some(c);
        }
        ip.advance(space);
        match anchor {
            Some(a) if a == ip.position => return None,
            Some(_) => {}
            None if bounds.contains(ip.position) => anchor = Some(ip.position),
            None => return None,
        }
    }
}

/// Execute instruction `op` for `ip` without moving it afterwards
pub(crate) fn execute(
    op: Cell,
    ip: &mut InstructionPointer,
    rt: &Runtime,
    spawned: &mut Vec<InstructionPointer>,
) -> ControlFlow {
    let Ok(byte) = u8::try_from(op) else {
        unknown_instruction(ip, rt, op);
        return ControlFlow::Continue;
    };

    match byte {
        b'@' => return ControlFlow::Stop,
        b'q' => return ControlFlow::Quit(ip.stack_mut().pop()),
        b'k' => return iterate(ip, rt, spawned),
        b't' => {
            let child = ip.fork(rt.next_id(), &rt.space);
            log::debug!("ip {} split into ip {} at {}", ip.id, child.id, child.position);
            spawned.push(child);
        }

        b' ' | b';' | b'z' => {}
        b'0'..=b'9' => ip.stack_mut().push(Cell::from(byte - b'0')),
        b'a'..=b'f' => ip.stack_mut().push(Cell::from(byte - b'a' + 10)),

        b'+' => arith::add(ip),
        b'-' => arith::subtract(ip),
        b'*' => arith::multiply(ip),
        b'/' => arith::divide(ip),
        b'%' => arith::remainder(ip),
        b'!' => arith::not(ip),
        b'`' => arith::greater(ip),

        b'>' => ip.delta = Vector::EAST,
        b'<' => ip.delta = Vector::WEST,
        b'^' => ip.delta = Vector::NORTH,
        b'v' => ip.delta = Vector::SOUTH,
        b'?' => flow::random_direction(ip),
        b'_' => flow::horizontal_if(ip),
        b'|' => flow::vertical_if(ip),
        b'[' => ip.delta = ip.delta.turn_left(),
        b']' => ip.delta = ip.delta.turn_right(),
        b'w' => flow::compare(ip),
        b'r' | b'h' | b'l' | b'm' => ip.reverse(),
        b'x' => flow::absolute_delta(ip),
        b'#' => ip.advance(&rt.space),
        b'j' => flow::jump(ip, &rt.space),
        b'"' => ip.string_mode = true,

        b':' => ip.stack_mut().dup_top(),
        b'\\' => ip.stack_mut().swap_top(),
        b'$' => ip.stack_mut().pop_discard(),
        b'n' => ip.stack_mut().clear(),
        b'{' => stack::begin_block(ip),
        b'}' => stack::end_block(ip),
        b'u' => stack::stack_under_stack(ip),

        b'\'' => space::fetch_character(ip, rt),
        b's' => space::store_character(ip, rt),
        b'g' => space::get(ip, rt),
        b'p' => space::put(ip, rt),

        b'.' => io::output_decimal(ip, rt),
        b',' => io::output_character(ip, rt),
        b'&' => io::input_decimal(ip, rt),
        b'~' => io::input_character(ip, rt),
        b'i' => io::file_input(ip, rt),
        b'o' => io::file_output(ip, rt),
        b'=' => io::system_execute(ip, rt),

        b'y' => sysinfo::execute(ip, rt),
        b'(' => fingerprints::load_instruction(ip, rt),
        b')' => fingerprints::unload_instruction(ip, rt),

        b'A'..=b'Z' => match ip.opcodes().lookup(byte) {
            Some(handler) => handler.execute(ip, rt),
            None => Handler::Reflect.execute(ip, rt),
        },

        _ => unknown_instruction(ip, rt, op),
    }
    ControlFlow::Continue
}

/// `k`: run the next instruction `n` times from here
fn iterate(
    ip: &mut InstructionPointer,
    rt: &Runtime,
    spawned: &mut Vec<InstructionPointer>,
) -> ControlFlow {
    let count = ip.stack_mut().pop();
    if count < 0 {
        ip.reverse();
        return ControlFlow::Continue;
    }

    let origin = ip.position;
    ip.advance(&rt.space);
    let Some(op) = seek_instruction(ip, &rt.space) else {
        ip.position = origin;
        return ControlFlow::Continue;
    };
    let target = ip.position;
    if count == 0 {
        // Left on the target so the regular step moves past it
        return ControlFlow::Continue;
    }

    ip.position = origin;
    let delta = ip.delta;
    for _ in 0..count {
        let flow = execute(op, ip, rt, spawned);
        if flow != ControlFlow::Continue {
            return flow;
        }
    }
    if ip.position == origin && ip.delta == delta {
        ip.position = target;
    }
    ControlFlow::Continue
}

fn unknown_instruction(ip: &mut InstructionPointer, rt: &Runtime, op: Cell) {
    if rt.settings.warnings {
        log::warn!(
            "unknown instruction {} ({:?}) at {}, reflecting",
            op,
            char::from_u32(op as u32).unwrap_or('?'),
            ip.position
        );
    }
    ip.reverse();
}

/// Drives a program's IPs and records history for the debugger
pub struct Interpreter {
    runtime: Arc<Runtime>,

    /// Live IPs in scheduling order
    ips: Vec<InstructionPointer>,

    /// Set once the program has ended
    exit_code: Option<Cell>,

    /// Snapshot manager for reverse execution
    snapshot_manager: SnapshotManager,

    /// Current position in execution history
    history_position: usize,

    /// Ticks executed since load
    ticks: u64,
}

impl Interpreter {
    /// Interpreter with an empty funge-space and a single IP at the origin
    pub fn new(settings: Settings, terminal: Terminal) -> Self {
        let history_limit = settings.history_limit;
        let runtime = Arc::new(Runtime::new(settings, terminal));
        let ips = vec![InstructionPointer::new(runtime.next_id())];
        Interpreter {
            runtime,
            ips,
            exit_code: None,
            snapshot_manager: SnapshotManager::new(history_limit),
            history_position: 0,
            ticks: 0,
        }
    }

    /// Place program text at the origin
    pub fn load_source(&mut self, source: &[u8]) {
        let size = self.runtime.space.load_bytes(source, Vector::ZERO, false);
        log::info!("loaded {} bytes of program text, size {}", source.len(), size);
    }

    /// Interpreter with the program at `path` already loaded
    pub fn from_file(path: &Path, settings: Settings, terminal: Terminal) -> FungeResult<Self> {
        if !path.exists() {
            return Err(FungeError::ProgramNotFound {
                path: path.to_path_buf(),
            });
        }
        let source = std::fs::read(path).map_err(|source| FungeError::ProgramRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut interpreter = Interpreter::new(settings, terminal);
        interpreter.load_source(&source);
        Ok(interpreter)
    }

    /// Run to completion and return the exit code
    pub fn run(&mut self) -> FungeResult<Cell> {
        let code = match self.runtime.settings.execution {
            ExecutionModel::Cooperative => {
                while self.tick() {}
                self.exit_code.unwrap_or(0)
            }
            ExecutionModel::Threaded => self.run_threaded(),
        };
        self.runtime.output().flush()?;
        log::info!("program finished with exit code {} after {} ticks", code, self.ticks);
        Ok(code)
    }

    /// Run one instruction for every live IP
    ///
    /// Returns `false` once the program has ended.
    pub fn tick(&mut self) -> bool {
        if self.exit_code.is_some() {
            return false;
        }

        self.ticks += 1;
        let rt = Arc::clone(&self.runtime);
        let current = std::mem::take(&mut self.ips);
        let mut next = Vec::with_capacity(current.len());
        let mut spawned = Vec::new();
        let mut remaining = current.into_iter();

        while let Some(mut ip) = remaining.next() {
            let flow = step(&mut ip, &rt, &mut spawned);
            // Children run before their parent from the next tick on
            next.append(&mut spawned);
            match flow {
                ControlFlow::Continue => next.push(ip),
                ControlFlow::Stop => log::debug!("ip {} stopped at {}", ip.id, ip.position),
                ControlFlow::Quit(code) => {
                    log::debug!("ip {} quit with code {}", ip.id, code);
                    next.push(ip);
                    next.extend(remaining);
                    self.ips = next;
                    self.finish(code);
                    return false;
                }
            }
        }

        self.ips = next;
        if self.ips.is_empty() {
            self.finish(0);
            return false;
        }
        true
    }

    fn finish(&mut self, code: Cell) {
        self.runtime.request_exit(code);
        self.exit_code = Some(code);
    }

    fn run_threaded(&mut self) -> Cell {
        let rt = Arc::clone(&self.runtime);
        let ips = std::mem::take(&mut self.ips);
        thread::scope(|s| {
            for ip in ips {
                spawn_thread(s, &rt, ip);
            }
        });
        let code = rt.exit_code().unwrap_or(0);
        self.exit_code = Some(code);
        code
    }

    // ========== History (debugger) ==========

    fn take_snapshot(&mut self) -> FungeResult<()> {
        let snapshot = Snapshot::new(
            self.runtime.space.snapshot(),
            self.ips.clone(),
            self.captured_len(),
            self.exit_code,
            self.ticks,
        );
        let evicted = self.snapshot_manager.push(snapshot).map_err(|message| {
            FungeError::HistoryOperationFailed { message }
        })?;
        self.history_position = self.snapshot_manager.len() - 1;
        if evicted > 0 {
            log::debug!("evicted {} snapshots from history", evicted);
        }
        Ok(())
    }

    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.runtime.space.restore(&snapshot.space);
        self.ips = snapshot.ips.clone();
        self.exit_code = snapshot.exit_code;
        self.ticks = snapshot.ticks;
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> FungeResult<()> {
        if self.history_position == 0 {
            return Err(FungeError::HistoryOperationFailed {
                message: "Already at the beginning of history".to_string(),
            });
        }
        self.history_position -= 1;
        self.restore_at(self.history_position)
    }

    /// Step forward: replay history if available, otherwise run a new tick
    pub fn step_forward(&mut self) -> FungeResult<()> {
        if self.snapshot_manager.is_empty() {
            self.take_snapshot()?;
        }
        if self.history_position + 1 < self.snapshot_manager.len() {
            self.history_position += 1;
            return self.restore_at(self.history_position);
        }
        if self.exit_code.is_some() {
            return Err(FungeError::HistoryOperationFailed {
                message: "Program has finished".to_string(),
            });
        }
        self.tick();
        self.take_snapshot()
    }

    /// Rewind to the oldest snapshot still in history
    pub fn rewind_to_start(&mut self) -> FungeResult<()> {
        if self.snapshot_manager.is_empty() {
            return Err(FungeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            });
        }
        self.history_position = 0;
        self.restore_at(0)
    }

    fn restore_at(&mut self, index: usize) -> FungeResult<()> {
        let snapshot = self.snapshot_manager.get(index).cloned().ok_or_else(|| {
            FungeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
            }
        })?;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    // ========== Getter methods ==========

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn space(&self) -> &FungeSpace {
        &self.runtime.space
    }

    /// Live IPs in scheduling order
    pub fn ips(&self) -> &[InstructionPointer] {
        &self.ips
    }

    /// Everything the program has written, if output is captured
    pub fn output(&self) -> Vec<u8> {
        self.runtime
            .output()
            .captured_output()
            .map(<[u8]>::to_vec)
            .unwrap_or_default()
    }

    /// Output length at the current point of history
    pub fn output_len(&self) -> usize {
        match self.snapshot_manager.get(self.history_position) {
            Some(snapshot) => snapshot.output_len,
            None => self.captured_len(),
        }
    }

    fn captured_len(&self) -> usize {
        self.runtime
            .output()
            .captured_output()
            .map_or(0, <[u8]>::len)
    }

    pub fn exit_code(&self) -> Option<Cell> {
        self.exit_code
    }

    pub fn is_finished(&self) -> bool {
        self.exit_code.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    /// Bytes held by history and the budget they are evicted against
    pub fn history_memory(&self) -> (usize, usize) {
        (
            self.snapshot_manager.memory_usage(),
            self.snapshot_manager.memory_limit(),
        )
    }
}

/// Run `ip` on its own scoped thread until it stops or the program quits
fn spawn_thread<'scope, 'env>(
    s: &'scope Scope<'scope, 'env>,
    rt: &'env Runtime,
    ip: InstructionPointer,
) {
    s.spawn(move || {
        let mut ip = ip;
        let mut spawned = Vec::new();
        log::debug!("ip {} started on its own thread", ip.id);
        while rt.exit_code().is_none() {
            let flow = step(&mut ip, rt, &mut spawned);
            for child in spawned.drain(..) {
                spawn_thread(s, rt, child);
            }
            match flow {
                ControlFlow::Continue => {}
                ControlFlow::Stop => {
                    log::debug!("ip {} stopped at {}", ip.id, ip.position);
                    break;
                }
                ControlFlow::Quit(code) => {
                    log::debug!("ip {} quit with code {}", ip.id, code);
                    rt.request_exit(code);
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter(source: &str) -> Interpreter {
        let mut interpreter = Interpreter::new(Settings::default(), Terminal::captured(b""));
        interpreter.load_source(source.as_bytes());
        interpreter
    }

    fn run(source: &str) -> (Cell, String) {
        let mut interpreter = interpreter(source);
        let code = interpreter.run().unwrap();
        (code, String::from_utf8_lossy(&interpreter.output()).into_owned())
    }

    #[test]
    fn test_seek_skips_spaces_and_jump_over() {
        let space = FungeSpace::new();
        space.load_bytes(b"  ;abc; 7", Vector::ZERO, false);
        let mut ip = InstructionPointer::new(0);
        assert_eq!(seek_instruction(&mut ip, &space), Some(Cell::from(b'7')));
        assert_eq!(ip.position, Vector::new(8, 0));
    }

    #[test]
    fn test_seek_on_empty_line_gives_up() {
        let space = FungeSpace::new();
        space.load_bytes(b"@\n   ;  ", Vector::ZERO, false);
        let mut ip = InstructionPointer::new(0);
        ip.position = Vector::new(1, 1);
        assert_eq!(seek_instruction(&mut ip, &space), None);
    }

    #[test]
    fn test_digits_and_output() {
        assert_eq!(run("12..@"), (0, "2 1 ".to_string()));
    }

    #[test]
    fn test_space_is_free_in_string_mode_runs() {
        let (_, out) = run("\"a  b\",,,@");
        assert_eq!(out, "a b");
    }

    #[test]
    fn test_iterate() {
        let (_, out) = run("5k1....@");
        // The 1 runs five times from the k and is then skipped
        assert_eq!(out, "1 1 1 1 ");
    }

    #[test]
    fn test_iterate_zero_skips() {
        let (_, out) = run("0k7.@");
        assert_eq!(out, "0 ");
    }

    #[test]
    fn test_quit_exit_code() {
        assert_eq!(run("7q").0, 7);
    }

    #[test]
    fn test_split_cooperative_order() {
        // The child heads west and wraps straight onto the '@'
        let (_, out) = run("t1.@");
        assert_eq!(out, "1 ");
    }

    #[test]
    fn test_history_round_trip() {
        let mut interpreter = interpreter("1.2.@");
        interpreter.step_forward().unwrap();
        interpreter.step_forward().unwrap();
        assert_eq!(interpreter.ips()[0].position, Vector::new(2, 0));
        assert_eq!(interpreter.output_len(), 2);

        interpreter.step_backward().unwrap();
        assert_eq!(interpreter.ips()[0].position, Vector::new(1, 0));
        assert_eq!(interpreter.output_len(), 0);

        interpreter.step_forward().unwrap();
        assert_eq!(interpreter.output_len(), 2);

        interpreter.rewind_to_start().unwrap();
        assert_eq!(interpreter.ips()[0].position, Vector::ZERO);
        assert!(interpreter.step_backward().is_err());
    }
}
