//! Transcript scanning for the `RES=` result line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Scans `log` line by line for the first line containing `RES=` and parses
/// the hexadecimal token that follows.
///
/// Only the first matching line counts: a malformed token there is a tool
/// failure, not a cue to keep scanning. Returns `None` for a missing file,
/// a missing line, an empty token, or a token that overflows 32 bits.
pub fn scan_result(log: &Path) -> Option<u32> {
    let file = File::open(log).ok()?;
    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        if let Some(pos) = line.find("RES=") {
            let token: String = line[pos + 4..]
                .chars()
                .take_while(|c| c.is_ascii_hexdigit())
                .collect();
            if token.is_empty() {
                return None;
            }
            return u32::from_str_radix(&token, 16).ok();
        }
    }
    None
}
