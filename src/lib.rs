#![doc = r#"
arness-cpu library crate: a cycle-counting NES 6502 core and its system bus.

Modules:
- cpu: 6502 core (registers, addressing, timing table, dispatch table, interrupts)
- bus: CPU bus with RAM mirroring, PPU register window, OAM DMA and cartridge slot
- memory: the `Memory` trait every CPU-visible address space implements
- cartridge: iNES v1 loader; constructs a mapper
- mapper / mappers: `Mapper` trait, NROM and MMC1
- ppu: register-level PPU stub with vblank timing and NMI
- bounded: range-checked integer newtype used for hardware latches
- system: CPU + bus driver with a bounded run harness
- trace: per-instruction tracers (null, `log`, in-memory buffer)

In tests, shared builders are available under `crate::test_utils`.
"#]

pub mod bounded;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod mapper;
pub mod mappers;
pub mod memory;
pub mod ppu;
pub mod system;
pub mod trace;

pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeError};
pub use cpu::{Cpu, CpuError, Registers, StatusFlags};
pub use memory::Memory;
pub use system::{RunLimits, RunOutcome, StopReason, System};

#[cfg(test)]
pub mod test_utils;
