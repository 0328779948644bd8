/*!
Internal work RAM: 2 KiB behind the CPU, mirrored four times.

- $0000-$07FF: physical RAM
- $0800-$1FFF: mirrors (address & $07FF)

Page 0 is the zero page, page 1 the hardware stack.
*/

use crate::memory::Memory;

/// Size of CPU internal RAM (in bytes).
pub const CPU_RAM_SIZE: usize = 0x0800;

#[derive(Clone)]
pub struct Ram {
    data: [u8; CPU_RAM_SIZE],
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram").field("len", &CPU_RAM_SIZE).finish()
    }
}

impl Default for Ram {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0; CPU_RAM_SIZE],
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Read with 2 KiB mirroring applied.
    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[Self::mirror_index(addr)]
    }

    /// Write with 2 KiB mirroring applied.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.data[Self::mirror_index(addr)] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn mirror_index(addr: u16) -> usize {
        (addr as usize) & (CPU_RAM_SIZE - 1)
    }
}

impl Memory for Ram {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        Ram::read(self, addr)
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        Ram::write(self, addr, value)
    }
}
