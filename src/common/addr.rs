//! Virtual Addresses.
//!
//! The PDP-11/70 memory management unit distinguishes instruction (I) and
//! data (D) address spaces, so a virtual address carries 17 bits: a 16-bit
//! byte offset plus a space selector in bit 16. Floating-point operands are
//! assembled word by word and may cross 4K page boundaries; the address is
//! therefore stepped in virtual space and translated one word at a time.

/// A 17-bit I/D virtual address.
///
/// Bit 16 selects the data space; bits 15..0 hold the byte offset within
/// the selected 64 KB space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtAddr(u32);

impl VirtAddr {
    /// Space-selector bit for data-space addresses.
    pub const D_BIT: u32 = 0x10000;

    /// Creates an instruction-space address from a byte offset.
    pub fn i_space(offset: u16) -> Self {
        VirtAddr(offset as u32)
    }

    /// Creates a data-space address from a byte offset.
    pub fn d_space(offset: u16) -> Self {
        VirtAddr(offset as u32 | Self::D_BIT)
    }

    /// Returns the full 17-bit address value.
    pub fn val(self) -> u32 {
        self.0
    }

    /// Returns the 16-bit byte offset within the space.
    pub fn offset(self) -> u16 {
        self.0 as u16
    }

    /// Returns `true` if the address selects the data space.
    pub fn is_d_space(self) -> bool {
        self.0 & Self::D_BIT != 0
    }

    /// Returns the address of the next word, wrapping within the 64 KB
    /// space and preserving the space selector.
    pub fn step(self) -> Self {
        VirtAddr((self.0 & Self::D_BIT) | (self.0 as u16).wrapping_add(2) as u32)
    }
}

impl std::fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:06o}",
            if self.is_d_space() { "D" } else { "I" },
            self.offset()
        )
    }
}
