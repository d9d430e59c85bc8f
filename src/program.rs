//! Program image loaded from a flat hex listing

use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from byte address to instruction word.
/// Line *i* of the hex file lands at address `4*i`.
pub type ProgramImage = BTreeMap<u32, u32>;

/// Reads a program hex file.
///
/// An absent file yields an empty image (the report carries a note
/// instead). Blank and unparseable lines are skipped but still consume
/// their word address.
pub fn read_hex_program(path: impl AsRef<Path>) -> ProgramImage {
    let mut program = ProgramImage::new();
    let Ok(content) = std::fs::read_to_string(path) else {
        return program;
    };

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(word) = u32::from_str_radix(line, 16) {
            program.insert(index as u32 * 4, word);
        }
    }

    program
}
