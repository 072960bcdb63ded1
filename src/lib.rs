//! PDP-11 FP11 Floating-Point Processor Emulator Library.
//!
//! This crate implements a bit-exact emulator for the FP11 floating-point
//! coprocessor of a PDP-11/70-class system, faithful to the behavior
//! exercised by the KFPA/KFPB/KFPC diagnostic suites. The floating format
//! carries an 8-bit excess-128 exponent and up to 55 fraction bits behind a
//! hidden leading bit, so all arithmetic is performed over arrays of 16-bit
//! fraction words rather than host floating types.
//!
//! # Architecture
//!
//! * **Core**: the FP11 state machine (accumulators, FPS/FEC/FEA, opcode
//!   dispatch) and its arithmetic and conversion units.
//! * **System**: a minimal host harness (general registers, condition codes,
//!   flat word memory) implementing the bus contract the core consumes.
//! * **Sim**: image loading for the CLI driver.
//!
//! # Modules
//!
//! * `common`: Shared types, virtual addresses, and bus faults.
//! * `config`: Configuration loading and parsing.
//! * `core`: FP11 processor implementation.
//! * `sim`: Memory-image loader.
//! * `stats`: Run statistics collection.
//! * `system`: Host-side CPU harness and memory.

/// Shared types: 17-bit I/D virtual addresses, memory access kinds,
/// and the bus-fault error type.
pub mod common;

/// Configuration system for memory size, start PC, and initial FPS.
///
/// Loads and parses TOML configuration files to customize emulator
/// behavior for different diagnostic scenarios.
pub mod config;

/// FP11 processor implementation: accumulator and status state, opcode
/// dispatch, operand addressing, and the arithmetic/conversion units.
pub mod core;

/// Memory-image loader used by the CLI driver.
pub mod sim;

/// Run statistics collection and reporting.
pub mod stats;

/// Host-side harness: general registers, condition codes, trap mask, and a
/// flat word-addressed memory behind the bus contract the core consumes.
pub mod system;
