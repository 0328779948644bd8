/*!
memory.rs - CPU-visible memory contract.

Everything the CPU core touches goes through [`Memory`]: the full system
[`Bus`](crate::bus::Bus), internal [`Ram`](crate::bus::ram::Ram), a bare
[`Cartridge`](crate::cartridge::Cartridge), or a flat 64 KiB array used by
tests.

Notes
=====
- Reads take `&mut self`. Several NES registers change state when read
  (PPUSTATUS clears vblank, PPUDATA advances its address).
- `peek` is the observer's read: tracing and run-limit checks use it so
  that looking at the next instruction never disturbs device state.
  Memories whose reads have side effects must override it.
- `take_oam_dma_request` is the only hook the CPU polls after an
  instruction. Memories that have no DMA port keep the default `None`.
*/

/// A 16-bit address space the CPU can read and write.
pub trait Memory {
    /// Read one byte. May have side effects on memory-mapped registers.
    fn read(&mut self, addr: u16) -> u8;

    /// Write one byte.
    fn write(&mut self, addr: u16, value: u8);

    /// Read one byte without side effects.
    fn peek(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    /// Return (and clear) the page latched by a write to the OAM DMA port.
    fn take_oam_dma_request(&mut self) -> Option<u8> {
        None
    }

    /// Little-endian word read with the high byte taken from `addr + 1`.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}
