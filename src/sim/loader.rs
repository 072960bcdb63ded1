//! Memory-Image Loader.
//!
//! Reads a flat binary of little-endian 16-bit words, the byte order a
//! PDP-11 writes to its own media, and places it in memory for the driver.

use std::fs;
use std::process;

use crate::system::Memory;

/// Loads a flat binary file from disk as a vector of words.
///
/// An odd trailing byte is zero-padded into a final word.
pub fn load_image(path: &str) -> Vec<u16> {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read file '{}': {}", path, e);
        process::exit(1);
    });
    bytes
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect()
}

/// Places an image in memory starting at a byte address.
pub fn load_into(memory: &mut Memory, base: u16, words: &[u16]) {
    memory.load_at(base, words);
}
