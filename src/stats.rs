//! Run statistics collection and reporting.
//!
//! Tracks the instruction mix and trap count of a run and prints a summary
//! when the driver finishes.

use std::time::Instant;

/// Counters collected across one run.
pub struct RunStats {
    start_time: Instant,
    pub instructions: u64,

    pub arithmetic: u64,
    pub conversions: u64,
    pub data_moves: u64,
    pub compares: u64,
    pub control: u64,

    pub traps_taken: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions: 0,
            arithmetic: 0,
            conversions: 0,
            data_moves: 0,
            compares: 0,
            control: 0,
            traps_taken: 0,
        }
    }
}

impl RunStats {
    /// Classifies one executed instruction by its opcode family.
    pub fn record(&mut self, instr: u16) {
        self.instructions += 1;
        match (instr >> 8) & 0x0f {
            0x0 => self.control += 1,
            0x1 | 0x5 | 0x8 => self.data_moves += 1,
            0x2 | 0x3 | 0x4 | 0x6 | 0x9 | 0xd => self.arithmetic += 1,
            0x7 => self.compares += 1,
            _ => self.conversions += 1,
        }
    }

    /// Prints a formatted summary of the run.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = if self.instructions == 0 {
            1
        } else {
            self.instructions
        };
        let total = instr as f64;

        println!("\n==========================================");
        println!("FP11 RUN STATISTICS");
        println!("==========================================");
        println!("host_seconds         {:.4} s", seconds);
        println!("fpp_insts            {}", self.instructions);
        println!("------------------------------------------");
        println!("INSTRUCTION MIX");
        println!(
            "  op.arithmetic      {} ({:.2}%)",
            self.arithmetic,
            self.arithmetic as f64 / total * 100.0
        );
        println!(
            "  op.compare         {} ({:.2}%)",
            self.compares,
            self.compares as f64 / total * 100.0
        );
        println!(
            "  op.convert         {} ({:.2}%)",
            self.conversions,
            self.conversions as f64 / total * 100.0
        );
        println!(
            "  op.data_move       {} ({:.2}%)",
            self.data_moves,
            self.data_moves as f64 / total * 100.0
        );
        println!(
            "  op.control         {} ({:.2}%)",
            self.control,
            self.control as f64 / total * 100.0
        );
        println!("------------------------------------------");
        println!("traps_taken          {}", self.traps_taken);
        println!("==========================================");
    }
}
