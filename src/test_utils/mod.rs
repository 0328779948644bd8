//! Shared test utilities: a flat 64 KiB memory and minimal iNES (v1) builders.
//!
//! `FlatMemory` is the CPU's test double. It maps every address to plain RAM,
//! so addressing and instruction tests can place code, data and vectors
//! anywhere without a cartridge.
//!
//! Notes on iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units (0 => 8 KiB by convention)
//!
//! Vectors sit at the last six bytes of the final PRG bank.

#![allow(dead_code)]

use crate::memory::Memory;

/// 64 KiB of RAM with no mirroring and no side effects.
#[derive(Clone)]
pub struct FlatMemory {
    data: Vec<u8>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlatMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatMemory").finish_non_exhaustive()
    }
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            data: vec![0; 0x10000],
        }
    }

    /// Copy `bytes` starting at `addr` (wrapping at $FFFF).
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.data[addr.wrapping_add(i as u16) as usize] = b;
        }
    }

    /// Write the NMI, RESET and IRQ/BRK vectors.
    pub fn set_vectors(&mut self, reset: u16, nmi: u16, irq: u16) {
        self.load(0xFFFA, &nmi.to_le_bytes());
        self.load(0xFFFC, &reset.to_le_bytes());
        self.load(0xFFFE, &irq.to_le_bytes());
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Memory for FlatMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

/// Build a minimal iNES (v1) image; PRG is filled with $EA and CHR with $CC.
///
/// - `prg_16k`: number of 16 KiB PRG units
/// - `chr_8k`: number of 8 KiB CHR units (0 => CHR RAM)
/// - `flags6` / `flags7`: raw header flag bytes
/// - `prg_ram_8k`: PRG RAM size in 8 KiB units
/// - `trainer`: optional 512-byte trainer inserted after the header
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map_or(0, |_| 512) + prg_16k * 16 * 1024 + chr_8k * 8 * 1024,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.resize(bytes.len() + prg_16k * 16 * 1024, 0xEA);
    bytes.resize(bytes.len() + chr_8k * 8 * 1024, 0xCC);
    bytes
}

/// NROM-128 image with `prg` at $8000 and the given (reset, nmi, irq) vectors.
/// All vectors default to $8000.
pub fn build_nrom_with_prg(prg: &[u8], vectors: Option<(u16, u16, u16)>) -> Vec<u8> {
    assert!(prg.len() <= 16 * 1024, "program must fit one 16 KiB bank");

    let mut rom = build_ines(1, 1, 0, 0, 1, None);
    let prg_start = 16;
    let prg_end = prg_start + 16 * 1024;
    rom[prg_start..prg_start + prg.len()].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(&mut rom[prg_start..prg_end], reset, nmi, irq);
    rom
}

/// Place NMI/RESET/IRQ vectors in the last six bytes of `prg`.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = prg.len() - 6;
    prg[base..base + 2].copy_from_slice(&nmi.to_le_bytes());
    prg[base + 2..base + 4].copy_from_slice(&reset.to_le_bytes());
    prg[base + 4..base + 6].copy_from_slice(&irq.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_at_end_of_bank() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn flat_memory_vectors() {
        let mut mem = FlatMemory::new();
        mem.set_vectors(0x8000, 0x9000, 0xA000);
        assert_eq!(mem.read_word(0xFFFA), 0x9000);
        assert_eq!(mem.read_word(0xFFFC), 0x8000);
        assert_eq!(mem.read_word(0xFFFE), 0xA000);
    }
}
