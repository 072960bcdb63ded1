//! FP11 Emulator CLI.
//!
//! The main executable for the emulator. It loads a flat image of FP11
//! instruction words and data, then fetches and executes floating-point
//! opcodes at the PC until a halt word (000000) or a non-FPP opcode is
//! reached. The final accumulator and status state is dumped in octal, the
//! form the KFP diagnostics listings use.

use clap::Parser;
use std::{fs, process};

use fp11_emulator::config::Config;
use fp11_emulator::core::Fpp;
use fp11_emulator::sim::loader;
use fp11_emulator::stats::RunStats;
use fp11_emulator::system::{Cpu, Memory};

/// Command-line arguments for the FP11 emulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "PDP-11 FP11 Floating-Point Processor Emulator")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    #[arg(short, long)]
    file: Option<String>,

    /// Maximum number of instructions to execute (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    limit: u64,
}

fn main() {
    let args = Args::parse();
    let config_content = fs::read_to_string(&args.config).expect("Failed to read config");
    let config: Config = toml::from_str(&config_content).expect("Failed to parse config");

    let start_pc = config.general.start_pc_val();
    let mut cpu = Cpu::new(Memory::new(config.memory.size_words));
    let mut fpp = Fpp::new();
    fpp.write_fps(config.general.initial_fps_val());
    let mut stats = RunStats::default();

    println!("Global Configuration");
    println!("--------------------");
    println!("  Trace Instructions: {}", config.general.trace_instructions);
    println!("  Start PC:           {:06o}", start_pc);
    println!("  Initial FPS:        {:06o}", fpp.fps);
    println!("  Memory:             {} words", cpu.memory.size_words());
    println!("--------------------");

    let Some(path) = args.file else {
        eprintln!("Error: No image specified.");
        eprintln!("Usage: --file <image.bin> [--config <config.toml>] [--limit <n>]");
        process::exit(1);
    };
    let image = loader::load_image(&path);
    println!("[Loader] Writing {} words to {:06o}", image.len(), start_pc);
    loader::load_into(&mut cpu.memory, start_pc, &image);
    cpu.set_pc(start_pc);

    loop {
        if args.limit != 0 && stats.instructions >= args.limit {
            println!("\n[*] Instruction limit reached");
            break;
        }
        let pc = cpu.pc();
        let instr = match cpu.fetch() {
            Ok(word) => word,
            Err(fault) => {
                eprintln!("\n[!] FATAL: instruction fetch failed: {}", fault);
                process::exit(1);
            }
        };
        if instr == 0 {
            println!("\n[*] Halt at {:06o}", pc);
            break;
        }
        if instr >> 12 != 0o17 {
            println!("\n[*] Non-FPP opcode {:06o} at {:06o}, stopping", instr, pc);
            break;
        }
        if config.general.trace_instructions {
            println!("{:06o}: {:06o}  FPS={:06o}", pc, instr, fpp.fps);
        }
        if let Err(fault) = fpp.execute(instr, &mut cpu) {
            eprintln!("\n[!] FATAL: {} at {:06o}", fault, pc);
            dump_state(&fpp, &cpu);
            process::exit(1);
        }
        stats.record(instr);
        if cpu.take_fpp_trap() {
            stats.traps_taken += 1;
            if config.general.trace_instructions {
                println!("        trap FEC={} FEA={:06o}", fpp.fec, fpp.fea);
            }
        }
    }

    dump_state(&fpp, &cpu);
    stats.print();
}

fn dump_state(fpp: &Fpp, cpu: &Cpu) {
    println!();
    for (i, ac) in fpp.ac.iter().enumerate() {
        println!(
            "AC{} = {:06o} {:06o} {:06o} {:06o}",
            i, ac[0], ac[1], ac[2], ac[3]
        );
    }
    println!(
        "FPS = {:06o}  FEC = {}  FEA = {:06o}",
        fpp.fps, fpp.fec, fpp.fea
    );
    println!(
        "R0-R7: {:06o} {:06o} {:06o} {:06o} {:06o} {:06o} {:06o} {:06o}",
        cpu.regs[0],
        cpu.regs[1],
        cpu.regs[2],
        cpu.regs[3],
        cpu.regs[4],
        cpu.regs[5],
        cpu.regs[6],
        cpu.regs[7]
    );
    println!("CC = {:04b}  trap_mask = {:06o}", cpu.flags, cpu.trap_mask);
}
