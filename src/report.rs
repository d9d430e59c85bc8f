//! Report rendering
//!
//! Assembles the single text artifact the analyzer emits: the program
//! listing, the aggregate metrics block, and the cycle-by-cycle timeline.
//! The renderer is a pure function of its inputs; running it twice on the
//! same parsed data produces byte-identical output.

use crate::disasm;
use crate::hazard;
use crate::metrics::Metrics;
use crate::program::ProgramImage;
use crate::trace::TraceEntry;

/// Everything the renderer needs from upstream
pub struct ReportContext<'a> {
    pub trace_label: &'a str,
    pub hex_label: &'a str,
    pub entries: &'a [TraceEntry],
    pub program: &'a ProgramImage,
    pub metrics: Metrics,
}

/// Renders the complete report
pub fn render(ctx: &ReportContext) -> String {
    let mut out = String::new();

    if ctx.entries.is_empty() {
        out.push_str(&format!(
            "No trace entries found in {}\n",
            ctx.trace_label
        ));
        return out;
    }

    render_program_listing(&mut out, ctx.program);
    render_metrics(&mut out, ctx);

    out.push('\n');
    out.push_str("--- Timeline ---\n");
    render_timeline(&mut out, ctx.entries);

    out
}

fn render_program_listing(out: &mut String, program: &ProgramImage) {
    if program.is_empty() {
        out.push_str(
            "No program contents decoded (hex file missing or empty).\n",
        );
        return;
    }

    out.push_str("--- Program (from hex) ---\n");
    out.push_str(&format!("{:>8} | {:>8} | Disassembly\n", "Addr", "Instr"));
    out.push_str(&format!("{}\n", "-".repeat(40)));
    for (addr, word) in program {
        out.push_str(&format!(
            "{:08x} | {:08x} | {}\n",
            addr,
            word,
            disasm::disassemble(*word)
        ));
    }
    out.push('\n');
}

fn render_metrics(out: &mut String, ctx: &ReportContext) {
    let m = &ctx.metrics;

    out.push_str("=== Pipeline Report ===\n");
    out.push_str(&format!("Trace file      : {}\n", ctx.trace_label));
    out.push_str(&format!("Program hex     : {}\n", ctx.hex_label));
    out.push_str(&format!("Total cycles    : {}\n", m.total_cycles));
    out.push_str(&format!("Instructions    : {}\n", m.retired));
    out.push_str(&format!("CPI / IPC       : {:.3} / {:.3}\n", m.cpi, m.ipc));
    out.push_str(&format!("Branches taken  : {}\n", m.branches_taken));
    out.push_str(&format!(
        "Potential RAW hazards (decode vs prev execute): {}\n",
        m.potential_raw
    ));
    out.push_str(&format!(
        "Stall cycles (load-use)   : {}\n",
        m.stall_cycles
    ));
    out.push_str(&format!(
        "Cycles with forwarding    : {}\n",
        m.forwarding_cycles
    ));
    out.push_str(&format!(
        "Average busy registers    : {:.2}\n",
        m.avg_busy_registers
    ));
}

fn render_timeline(out: &mut String, entries: &[TraceEntry]) {
    let header = format!(
        "{:>5} | {:>8} | {:<18} | {:<18} | {:<22} | {:<22} | {:<26} | {:<26} | Notes",
        "Cycle", "PC_F", "F0", "F1", "D0[i0]", "D1[i1]", "E0/R0", "E1/R1"
    );
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');

    let annotations = hazard::annotate(entries);

    // Rows number by display position, not by the raw cycle column
    for (disp_cycle, (entry, tags)) in
        entries.iter().zip(&annotations).enumerate()
    {
        let note = tags
            .iter()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>()
            .join(";");
        out.push_str(&format!(
            "{:5} | {:08x} | {:<18} | {:<18} | {:<18} i0={} | {:<18} i1={} | {:<12} {:08x} | {:<12} {:08x} | {}\n",
            disp_cycle,
            entry.pc_f,
            disasm::disassemble(entry.lanes[0].fetch),
            disasm::disassemble(entry.lanes[1].fetch),
            disasm::disassemble(entry.lanes[0].decode),
            entry.lanes[0].issue as u8,
            disasm::disassemble(entry.lanes[1].decode),
            entry.lanes[1].issue as u8,
            disasm::disassemble(entry.lanes[0].exec),
            entry.lanes[0].result,
            disasm::disassemble(entry.lanes[1].exec),
            entry.lanes[1].result,
            note
        ));
    }
}
