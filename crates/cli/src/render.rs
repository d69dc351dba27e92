//! Terminal rendering of the pipeline state.
//!
//! Consumes only the read-only views the core exposes: the per-stage
//! snapshot, the register file, and the data memory contents.

use rv32_core::Processor;

/// Prints the pipeline table, registers, and nonzero data memory words.
pub fn render(processor: &Processor) {
    let view = processor.view();
    println!("── cycle {} ──", view.cycle);
    println!("  stage  pc          instruction  flags");
    println!(
        "  IF     {:#010x}  {:>11}  {}",
        view.fetch_pc,
        "-",
        flags(view.fetch_frozen, false)
    );
    for (name, stage) in [
        ("ID", view.if_id),
        ("EX", view.id_ex),
        ("MEM", view.ex_mem),
        ("WB", view.mem_wb),
    ] {
        let instruction = if stage.instruction == 0 {
            "bubble".to_string()
        } else {
            format!("{:#010x}", stage.instruction)
        };
        println!(
            "  {:<5}  {:#010x}  {:>11}  {}",
            name,
            stage.pc,
            instruction,
            flags(stage.frozen, stage.flushed)
        );
    }

    println!();
    let regs = processor.registers();
    for row in 0..8 {
        let mut line = String::new();
        for col in 0..4 {
            let i = row * 4 + col;
            line.push_str(&format!(
                "x{:<2}={:#010x}  ",
                i,
                regs.read_register(i).to_u32()
            ));
        }
        println!("  {}", line.trim_end());
    }

    let memory = processor.data_memory();
    let memory = memory.borrow();
    let mut any = false;
    for i in 0..memory.len_words() {
        let addr = (i * 4) as u32;
        let word = memory.peek_word(addr);
        if !word.is_zero() {
            if !any {
                println!();
                println!("  data memory (nonzero words):");
                any = true;
            }
            println!("  [{:#06x}] = {:#010x}", addr, word.to_u32());
        }
    }
    println!();
}

fn flags(frozen: bool, flushed: bool) -> &'static str {
    match (frozen, flushed) {
        (true, true) => "FZ FL",
        (true, false) => "FZ",
        (false, true) => "FL",
        (false, false) => "",
    }
}
