//! Wall-clock time and resident-memory delta around one computation.
//!
//! Resident set size comes from `/proc/self/status`; where that file does not
//! exist the reading is 0 and the delta degenerates to 0.

use std::fs;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub elapsed_ms: u128,
    /// Resident bytes after minus before; negative when pages were released.
    pub memory_delta: i64,
}

pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Measurement) {
    let before = resident_bytes();
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    let after = resident_bytes();
    let m = Measurement {
        elapsed_ms: elapsed.as_millis(),
        memory_delta: after as i64 - before as i64,
    };
    (out, m)
}

pub fn resident_bytes() -> u64 {
    fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| parse_vm_rss(&s))
        .unwrap_or(0)
}

fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find_map(|l| l.strip_prefix("VmRSS:"))?;
    let kb = line.trim().trim_end_matches("kB").trim().parse::<u64>().ok()?;
    Some(kb * 1024)
}
