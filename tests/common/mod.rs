//! Helpers shared by the integration tests.

#![allow(dead_code)]

use arness_cpu::{Cpu, Memory};

pub const RESET: u16 = 0x8000;
pub const NMI: u16 = 0x9000;
pub const IRQ: u16 = 0xA000;

/// 64 KiB of plain RAM.
pub struct FlatRam {
    pub bytes: Vec<u8>,
}

impl FlatRam {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; 0x10000],
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }
}

impl Memory for FlatRam {
    fn read(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }
}

/// Program at $8000, vectors at RESET/NMI/IRQ, CPU already reset.
pub fn cpu_with_program(program: &[u8]) -> (Cpu, FlatRam) {
    let mut mem = FlatRam::new();
    mem.load(RESET, program);
    mem.load(0xFFFA, &NMI.to_le_bytes());
    mem.load(0xFFFC, &RESET.to_le_bytes());
    mem.load(0xFFFE, &IRQ.to_le_bytes());
    let mut cpu = Cpu::new();
    cpu.reset(&mut mem);
    (cpu, mem)
}

/// Execute `n` instructions and return the cycles of the last one.
pub fn run(cpu: &mut Cpu, mem: &mut dyn Memory, n: usize) -> u16 {
    let mut last = 0;
    for _ in 0..n {
        last = cpu
            .execute_next_instruction(mem)
            .expect("instruction should not jam");
    }
    last
}

/// NROM-128 iNES image: `program` at $8000 (mirrored at $C000) and the
/// given vectors in the last six bytes of the bank.
pub fn nrom_image(program: &[u8], reset: u16, nmi: u16, irq: u16) -> Vec<u8> {
    let mut rom = Vec::with_capacity(16 + 16 * 1024 + 8 * 1024);
    rom.extend_from_slice(b"NES\x1A");
    rom.extend_from_slice(&[1, 1, 0, 0, 1]);
    rom.extend_from_slice(&[0u8; 7]);

    let mut prg = vec![0xEAu8; 16 * 1024];
    prg[..program.len()].copy_from_slice(program);
    prg[0x3FFA..0x3FFC].copy_from_slice(&nmi.to_le_bytes());
    prg[0x3FFC..0x3FFE].copy_from_slice(&reset.to_le_bytes());
    prg[0x3FFE..].copy_from_slice(&irq.to_le_bytes());
    rom.extend_from_slice(&prg);
    rom.extend(std::iter::repeat_n(0u8, 8 * 1024));
    rom
}
