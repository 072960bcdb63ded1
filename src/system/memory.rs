//! Word-Addressed Memory.
//!
//! A flat array of 16-bit words behind the 17-bit virtual address form.
//! The harness maps instruction and data space to the same storage; a real
//! PDP-11/70 MMU would translate them separately, but the FP11 core only
//! cares that operands resolve word by word and may fault.

use crate::common::{BusFault, VirtAddr};

/// Flat word memory.
pub struct Memory {
    words: Vec<u16>,
}

impl Memory {
    /// Creates a zeroed memory of the given size in words.
    pub fn new(size_words: usize) -> Self {
        Self {
            words: vec![0; size_words],
        }
    }

    /// Size of the memory in words.
    pub fn size_words(&self) -> usize {
        self.words.len()
    }

    /// Reads the word at a virtual address.
    ///
    /// Faults on an odd byte offset or an offset beyond the configured
    /// size.
    pub fn read_word(&self, addr: VirtAddr) -> Result<u16, BusFault> {
        let offset = addr.offset();
        if offset & 1 != 0 {
            return Err(BusFault::OddAddress(addr));
        }
        self.words
            .get((offset >> 1) as usize)
            .copied()
            .ok_or(BusFault::NonExistent(addr))
    }

    /// Writes the word at a virtual address.
    pub fn write_word(&mut self, addr: VirtAddr, value: u16) -> Result<(), BusFault> {
        let offset = addr.offset();
        if offset & 1 != 0 {
            return Err(BusFault::OddAddress(addr));
        }
        match self.words.get_mut((offset >> 1) as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(BusFault::NonExistent(addr)),
        }
    }

    /// Copies a run of words starting at a byte address, for loaders and
    /// tests. Words falling outside memory are dropped.
    pub fn load_at(&mut self, base: u16, words: &[u16]) {
        let start = (base >> 1) as usize;
        for (i, &word) in words.iter().enumerate() {
            if let Some(slot) = self.words.get_mut(start + i) {
                *slot = word;
            }
        }
    }
}
