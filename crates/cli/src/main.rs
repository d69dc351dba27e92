//! Interactive terminal front end for the pipeline simulator.
//!
//! This binary assembles a program, constructs the processor, and steps it
//! under keyboard control:
//! 1. **enter** — execute one clock cycle.
//! 2. **r** — reset to the initial state.
//! 3. **q** — quit (end of input quits too). Other input is ignored.
//!
//! Exit code 0 on a clean session, 1 on file or parse errors.

mod render;

use std::io::BufRead;
use std::{fs, io, process};

use clap::Parser;

use rv32_core::{asm, Config, Processor, Word};

#[derive(Parser, Debug)]
#[command(
    name = "simulator",
    version,
    about = "Cycle-accurate five-stage RV32I pipeline simulator",
    long_about = "Step an assembly program through the pipeline one clock cycle at a time.\n\n\
                  Keys: <enter> steps one cycle, 'r' resets, 'q' quits.\n\n\
                  Examples:\n  simulator program.s\n  simulator program.s 0\n  simulator program.s 1 --config machine.json"
)]
struct Cli {
    /// Assembly source file.
    asm_file: String,

    /// Enable forwarding (0 or 1).
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    forwarding: u8,

    /// JSON configuration file (memory latency, cache shape, tracing).
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.asm_file).unwrap_or_else(|e| {
        eprintln!("error reading {}: {}", cli.asm_file, e);
        process::exit(1);
    });

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error reading {}: {}", path, e);
                process::exit(1);
            });
            serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
                eprintln!("error parsing {}: {}", path, e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    config.pipeline.forwarding = cli.forwarding == 1;

    let program = asm::assemble(&source).unwrap_or_else(|e| {
        eprintln!("{}: {}", cli.asm_file, e);
        process::exit(1);
    });

    println!(
        "{}: {} instructions, forwarding {}",
        cli.asm_file,
        program.len(),
        if config.pipeline.forwarding { "on" } else { "off" }
    );
    println!("<enter> steps one cycle, 'r' resets, 'q' quits");
    println!();

    let mut processor = boot(&config, &program);
    render::render(&processor);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        match line.trim() {
            "" => {
                processor.execute_one_cycle();
                render::render(&processor);
            }
            "r" => {
                processor = boot(&config, &program);
                println!("reset");
                render::render(&processor);
            }
            "q" => break,
            _ => {}
        }
    }

    processor.stats().print();
}

/// Builds a fresh processor with the program loaded.
fn boot(config: &Config, program: &[Word]) -> Processor {
    let mut processor = Processor::new(config);
    processor.load_program(program);
    processor
}
