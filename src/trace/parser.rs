//! Tolerant trace row parser
//!
//! The trace is header-addressed CSV whose cells may carry simulator
//! don't-care values (`x`/`z`/`?` characters). Numeric cells recover to a
//! default instead of failing; boolean flags parse strictly, so don't-care
//! noise never turns into a hazard signal. The asymmetry is deliberate.

use std::io;
use std::path::Path;

use crate::error::TraceError;
use crate::trace::ForwardSource;
use crate::trace::Forwarding;
use crate::trace::LaneEntry;
use crate::trace::Scoreboard;
use crate::trace::TraceEntry;

/// Parses trace rows from a file
pub fn parse_trace_file(
    path: impl AsRef<Path>,
) -> Result<Vec<TraceEntry>, TraceError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| TraceError::FileReadError(path.to_path_buf(), e))?;
    parse_trace(file)
}

/// Parses trace rows from a reader.
///
/// Rows after one whose `pc_f` cell is absent or unknown are discarded:
/// the testbench logs garbage after the core halts, and a trace without
/// fetch PCs has no usable timeline.
pub fn parse_trace<R: io::Read>(
    reader: R,
) -> Result<Vec<TraceEntry>, TraceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row = Row { headers: &headers, record: &record };

        match row.field("pc_f") {
            None => break,
            Some(pc) if is_unknown(pc) => break,
            Some(_) => {}
        }

        entries.push(parse_row(&row));
    }

    Ok(entries)
}

/// A single trace row, addressed by column name.
/// Columns are a versioned, additive schema; missing ones default.
struct Row<'a> {
    headers: &'a csv::StringRecord,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h == name)?;
        self.record.get(index)
    }

    /// Bare hexadecimal cell
    fn hex(&self, name: &str) -> u32 {
        parse_hex(self.field(name), 0)
    }

    /// Decimal cell
    fn dec(&self, name: &str) -> u32 {
        parse_dec(self.field(name), 0)
    }

    /// Small integer code cell
    fn code(&self, name: &str) -> i64 {
        parse_code(self.field(name), 0)
    }

    /// Boolean flag cell
    fn flag(&self, name: &str) -> bool {
        parse_flag(self.field(name))
    }
}

fn parse_row(row: &Row) -> TraceEntry {
    TraceEntry {
        cycle: row.dec("cycle"),
        pc_f: row.hex("pc_f"),
        lanes: [parse_lane(row, 0), parse_lane(row, 1)],
        forwarding: Forwarding {
            rs1_slot0: row.flag("fwd_rs1_0_en"),
            rs2_slot0: row.flag("fwd_rs2_0_en"),
            rs1_slot1: ForwardSource::from_code(row.code("fwd_rs1_1_src")),
            rs2_slot1: ForwardSource::from_code(row.code("fwd_rs2_1_src")),
        },
        scoreboard: Scoreboard {
            raw1: row.flag("raw1"),
            waw1: row.flag("waw1"),
            stall_if: row.flag("stall_if_id"),
            busy_vec: row.hex("busy_vec"),
            load_pending_vec: row.hex("load_pending_vec"),
        },
    }
}

fn parse_lane(row: &Row, lane: usize) -> LaneEntry {
    LaneEntry {
        fetch: row.hex(&format!("fetch{lane}")),
        decode: row.hex(&format!("decode{lane}")),
        issue: row.flag(&format!("issue{lane}")),
        exec: row.hex(&format!("exec{lane}")),
        result: row.hex(&format!("result{lane}")),
        branch_taken: row.flag(&format!("branch_taken{lane}")),
        branch_target: row.hex(&format!("branch_target{lane}")),
        jump_taken: row.flag(&format!("jump_taken{lane}")),
        jump_target: row.hex(&format!("jump_target{lane}")),
        mem_read: row.flag(&format!("mem{lane}_re")),
        mem_write: row.flag(&format!("mem{lane}_we")),
        mem_addr: row.hex(&format!("mem_addr{lane}")),
        load_use: row.flag(&format!("load_use{lane}")),
    }
}

/// True when a cell carries a simulator don't-care marker
fn is_unknown(s: &str) -> bool {
    s.chars().any(|c| matches!(c.to_ascii_lowercase(), 'x' | 'z' | '?'))
}

/// Converts a Verilog-style hex cell to an integer, tolerating X/Z.
/// Unknown or malformed cells yield the default instead of failing.
fn parse_hex(s: Option<&str>, default: u32) -> u32 {
    let Some(s) = s else { return default };
    let s = s.trim();
    if s.is_empty() || is_unknown(s) {
        return default;
    }
    u32::from_str_radix(s, 16).unwrap_or(default)
}

fn parse_dec(s: Option<&str>, default: u32) -> u32 {
    let Some(s) = s else { return default };
    let s = s.trim();
    if s.is_empty() || is_unknown(s) {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_code(s: Option<&str>, default: i64) -> i64 {
    let Some(s) = s else { return default };
    let s = s.trim();
    if s.is_empty() || is_unknown(s) {
        return default;
    }
    s.parse().unwrap_or(default)
}

/// Strict boolean parser: only explicit true tokens mean true.
/// Everything else, including absent cells, means false.
fn parse_flag(s: Option<&str>) -> bool {
    let Some(s) = s else { return false };
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str = "cycle,pc_f,fetch0,fetch1,decode0,decode1,\
issue0,issue1,exec0,exec1,result0,result1,\
branch_taken0,branch_taken1,jump_taken0,jump_taken1,\
branch_target0,branch_target1,jump_target0,jump_target1,\
mem0_re,mem0_we,mem1_re,mem1_we,mem_addr0,mem_addr1,\
fwd_rs1_0_en,fwd_rs2_0_en,fwd_rs1_1_src,fwd_rs2_1_src,\
stall_if_id,raw1,waw1,load_use0,load_use1,busy_vec,load_pending_vec";

    fn parse(text: &str) -> Vec<TraceEntry> {
        parse_trace(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_full_row() {
        let text = format!(
            "{FULL_HEADER}\n\
             3,00000010,00000013,002081b3,fff30293,0062a423,\
             1,1,00628463,00302083,00000008,00000003,\
             1,0,0,0,00000020,00000000,00000000,00000000,\
             0,1,1,0,00001000,00002000,\
             1,0,1,2,\
             1,1,0,1,0,000000a0,00000004\n"
        );
        let entries = parse(&text);

        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.cycle, 3);
        assert_eq!(e.pc_f, 0x10);
        assert_eq!(e.lanes[0].fetch, 0x13);
        assert_eq!(e.lanes[1].fetch, 0x002081B3);
        assert_eq!(e.lanes[0].decode, 0xFFF30293);
        assert_eq!(e.lanes[0].issue, true);
        assert_eq!(e.lanes[0].exec, 0x00628463);
        assert_eq!(e.lanes[0].result, 8);
        assert_eq!(e.lanes[0].branch_taken, true);
        assert_eq!(e.lanes[0].branch_target, 0x20);
        assert_eq!(e.lanes[1].branch_taken, false);
        assert_eq!(e.lanes[0].mem_read, false);
        assert_eq!(e.lanes[0].mem_write, true);
        assert_eq!(e.lanes[1].mem_read, true);
        assert_eq!(e.lanes[0].mem_addr, 0x1000);
        assert_eq!(e.forwarding.rs1_slot0, true);
        assert_eq!(e.forwarding.rs2_slot0, false);
        assert_eq!(e.forwarding.rs1_slot1, ForwardSource::Execute1);
        assert_eq!(e.forwarding.rs2_slot1, ForwardSource::Execute0);
        assert_eq!(e.scoreboard.stall_if, true);
        assert_eq!(e.scoreboard.raw1, true);
        assert_eq!(e.scoreboard.waw1, false);
        assert_eq!(e.lanes[0].load_use, true);
        assert_eq!(e.lanes[1].load_use, false);
        assert_eq!(e.scoreboard.busy_vec, 0xA0);
        assert_eq!(e.scoreboard.load_pending_vec, 4);
    }

    #[test]
    fn test_unknown_pc_truncates() {
        let text = "cycle,pc_f,exec0\n\
                    0,00000000,00000013\n\
                    1,00000004,00628463\n\
                    2,xxxxxxxx,00000013\n\
                    3,0000000c,00000013\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].pc_f, 4);
    }

    #[test]
    fn test_unknown_numeric_defaults_but_row_kept() {
        let text = "cycle,pc_f,exec0,busy_vec\n\
                    0,00000004,zz,000000f0\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lanes[0].exec, 0);
        assert_eq!(entries[0].scoreboard.busy_vec, 0xF0);
    }

    #[test]
    fn test_malformed_numeric_defaults() {
        let text = "cycle,pc_f,result0\n\
                    notanumber,00000004,5g\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cycle, 0);
        assert_eq!(entries[0].lanes[0].result, 0);
    }

    #[test]
    fn test_strict_booleans() {
        assert_eq!(parse_flag(Some("1")), true);
        assert_eq!(parse_flag(Some("true")), true);
        assert_eq!(parse_flag(Some("YES")), true);
        assert_eq!(parse_flag(Some("y")), true);
        assert_eq!(parse_flag(Some("0")), false);
        assert_eq!(parse_flag(Some("2")), false);
        assert_eq!(parse_flag(Some("on")), false);
        // Don't-care noise must not become a hazard signal
        assert_eq!(parse_flag(Some("x")), false);
        assert_eq!(parse_flag(None), false);
    }

    #[test]
    fn test_missing_columns_default() {
        // An old-schema trace without the forwarding or scoreboard columns
        let text = "cycle,pc_f,exec0,exec1\n\
                    0,00000000,00000093,00000013\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.lanes[0].exec, 0x93);
        assert_eq!(e.forwarding, Forwarding::default());
        assert_eq!(e.scoreboard, Scoreboard::default());
        assert_eq!(e.lanes[0].fetch, 0);
    }

    #[test]
    fn test_short_row_tolerated() {
        // A row with fewer cells than the header still parses; the
        // missing trailing cells default.
        let text = "cycle,pc_f,exec0,busy_vec\n\
                    0,00000000,00000093\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lanes[0].exec, 0x93);
        assert_eq!(entries[0].scoreboard.busy_vec, 0);
    }

    #[test]
    fn test_missing_pc_column_yields_no_entries() {
        let text = "cycle,exec0\n0,00000093\n";
        let entries = parse(text);

        assert!(entries.is_empty());
    }

    #[test]
    fn test_forward_source_codes() {
        assert_eq!(ForwardSource::from_code(0), ForwardSource::RegisterFile);
        assert_eq!(ForwardSource::from_code(1), ForwardSource::Execute1);
        assert_eq!(ForwardSource::from_code(2), ForwardSource::Execute0);
        // Out-of-range codes fall back to the register file
        assert_eq!(ForwardSource::from_code(7), ForwardSource::RegisterFile);
        assert_eq!(ForwardSource::from_code(-1), ForwardSource::RegisterFile);
    }
}
