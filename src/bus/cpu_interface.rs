/*!
CPU interface dispatcher

Purpose
- Centralize CPU-visible address decoding and delegate to devices.
- The bus façade stays thin: `impl Memory for Bus` calls straight into here.

Address map:
- $0000-$07FF: 2KB internal RAM
- $0800-$1FFF: Mirrors of $0000-$07FF (mask & 0x07FF)
- $2000-$2007: PPU registers
- $2008-$3FFF: Mirrors of $2000-$2007 (mask & 0x0007)
- $4000-$4013, $4015-$4017: APU / IO (stubbed; reads 0, writes ignored)
- $4014: OAM DMA - write latches the source page for the CPU to pick up
- $4018-$401F: Disabled test registers (reads 0)
- $4020-$FFFF: Cartridge (expansion, PRG RAM, PRG ROM) via the mapper
*/

use crate::bus::Bus;
use crate::bus::dma::OAMDMA;

#[inline]
fn ppu_register(addr: u16) -> u8 {
    (addr & 0x0007) as u8
}

/// CPU-visible read from the unified address space.
pub fn cpu_read(bus: &mut Bus, addr: u16) -> u8 {
    match addr {
        0x0000..=0x1FFF => bus.ram.read(addr),
        0x2000..=0x3FFF => bus.video.read_register(ppu_register(addr)),
        0x4000..=0x401F => 0,
        0x4020..=0xFFFF => match bus.cartridge.as_mut() {
            Some(cart) => crate::memory::Memory::read(cart, addr),
            None => {
                log::debug!(target: "bus", "read ${addr:04X} with no cartridge attached");
                0
            }
        },
    }
}

/// Same decode as [`cpu_read`] with every device read replaced by its
/// side-effect-free peek.
pub fn cpu_peek(bus: &mut Bus, addr: u16) -> u8 {
    match addr {
        0x0000..=0x1FFF => bus.ram.read(addr),
        0x2000..=0x3FFF => bus.video.peek_register(ppu_register(addr)),
        0x4000..=0x401F => 0,
        0x4020..=0xFFFF => bus
            .cartridge
            .as_mut()
            .map_or(0, |cart| crate::memory::Memory::peek(cart, addr)),
    }
}

/// CPU-visible write to the unified address space.
pub fn cpu_write(bus: &mut Bus, addr: u16, value: u8) {
    match addr {
        0x0000..=0x1FFF => bus.ram.write(addr, value),
        0x2000..=0x3FFF => bus.video.write_register(ppu_register(addr), value),
        OAMDMA => bus.oam_dma_page = Some(value),
        0x4000..=0x401F => {}
        0x4020..=0xFFFF => match bus.cartridge.as_mut() {
            Some(cart) => crate::memory::Memory::write(cart, addr, value),
            None => {
                log::debug!(target: "bus", "write ${value:02X} to ${addr:04X} with no cartridge attached");
            }
        },
    }
}
