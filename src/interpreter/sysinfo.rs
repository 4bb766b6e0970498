//! System information (`y`)
//!
//! `y` pops a request number and pushes the answer from a fixed catalog:
//!
//! | request | answer |
//! |---------|--------|
//! | 1  | flags: `t`=1, `i`=2, `o`=4, `=`=8 |
//! | 2  | bytes per cell |
//! | 3  | handprint |
//! | 4  | version |
//! | 5  | operating paradigm |
//! | 6  | path separator |
//! | 7  | scalars per vector |
//! | 8  | IP id |
//! | 9  | team id |
//! | 10 | position |
//! | 11 | delta |
//! | 12 | storage offset |
//! | 13 | least point of funge-space |
//! | 14 | greatest point, relative to the least |
//! | 15 | UTC date |
//! | 16 | UTC time |
//! | 17 | number of stacks |
//! | 18 | size of every stack |
//! | 19 | program arguments |
//! | 20 | environment |
//!
//! Request 0 pushes the whole catalog from 20 down to 1, so that request 1
//! ends up on top. Request 23 is an alias for 18. Anything else reflects.

use super::constants::{HANDPRINT, HIGHEST_REQUEST, VERSION};
use super::engine::Runtime;
use super::ip::InstructionPointer;
use crate::memory::Cell;
use time::OffsetDateTime;

const FLAG_CONCURRENT: Cell = 0x01;
const FLAG_FILE_INPUT: Cell = 0x02;
const FLAG_FILE_OUTPUT: Cell = 0x04;
const FLAG_EXECUTE: Cell = 0x08;

/// Run `y` for `ip`
pub fn execute(ip: &mut InstructionPointer, rt: &Runtime) {
    let request = match ip.stack_mut().pop() {
        23 => 18,
        r => r,
    };

    // Sizes as they were before anything got pushed
    let sizes: Vec<Cell> = ip
        .stacks()
        .stacks()
        .iter()
        .map(|s| s.len() as Cell)
        .collect();

    match request {
        0 => {
            for r in (1..=HIGHEST_REQUEST).rev() {
                push_request(ip, rt, r, &sizes);
            }
        }
        1..=HIGHEST_REQUEST => push_request(ip, rt, request, &sizes),
        _ => {
            log::debug!("unsupported sysinfo request {}", request);
            ip.reverse();
        }
    }
}

fn push_request(ip: &mut InstructionPointer, rt: &Runtime, request: Cell, sizes: &[Cell]) {
    let sandbox = rt.settings.sandbox;
    match request {
        1 => {
            let mut flags = FLAG_CONCURRENT;
            if !sandbox {
                flags |= FLAG_FILE_INPUT | FLAG_FILE_OUTPUT | FLAG_EXECUTE;
            }
            ip.stack_mut().push(flags);
        }
        2 => ip.stack_mut().push(std::mem::size_of::<Cell>() as Cell),
        3 => ip.stack_mut().push(HANDPRINT),
        4 => ip.stack_mut().push(VERSION),
        // `=` hands its string to the system shell
        5 => ip.stack_mut().push(Cell::from(!sandbox)),
        6 => ip.stack_mut().push(std::path::MAIN_SEPARATOR as Cell),
        7 => ip.stack_mut().push(2),
        8 => {
            let id = ip.id;
            ip.stack_mut().push(id);
        }
        9 => ip.stack_mut().push(0),
        10 => {
            let v = ip.position;
            ip.stack_mut().push_vector(v);
        }
        11 => {
            let v = ip.delta;
            ip.stack_mut().push_vector(v);
        }
        12 => {
            let v = ip.storage_offset;
            ip.stack_mut().push_vector(v);
        }
        13 => ip.stack_mut().push_vector(rt.space.bounds().least),
        14 => ip.stack_mut().push_vector(rt.space.bounds().extent()),
        15 => {
            let now = OffsetDateTime::now_utc();
            let date = Cell::from(now.year() - 1900) * 65536
                + Cell::from(u8::from(now.month())) * 256
                + Cell::from(now.day());
            ip.stack_mut().push(date);
        }
        16 => {
            let now = OffsetDateTime::now_utc();
            let clock = Cell::from(now.hour()) * 65536
                + Cell::from(now.minute()) * 256
                + Cell::from(now.second());
            ip.stack_mut().push(clock);
        }
        17 => ip.stack_mut().push(sizes.len() as Cell),
        18 => {
            let stack = ip.stack_mut();
            for &size in sizes {
                stack.push(size);
            }
        }
        19 => push_string_list(ip, rt.settings.program_args.iter().map(String::as_bytes)),
        20 => {
            let env: Vec<String> = std::env::vars_os()
                .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
                .collect();
            push_string_list(ip, env.iter().map(String::as_bytes));
        }
        _ => ip.reverse(),
    }
}

/// Push strings so they pop in order, each NUL-terminated, followed by an
/// extra NUL ending the list
fn push_string_list<'a>(
    ip: &mut InstructionPointer,
    strings: impl DoubleEndedIterator<Item = &'a [u8]>,
) {
    let stack = ip.stack_mut();
    stack.push(0);
    for s in strings.rev() {
        stack.push_string(s);
    }
}
