//! MMC1 (Mapper 1).
//!
//! Implements:
//! - Serial shift register writes (5 bits, LSB first) to control / CHR0 / CHR1 / PRG
//! - A write with bit 7 set clears the shift register and forces PRG mode 3
//! - PRG banking modes: 32K switch (0, 1), fixed $8000 (2), fixed $C000 (3)
//! - CHR banking: one 8K bank or two 4K banks, ROM or RAM
//! - Runtime mirroring from control bits 0-1
//!
//! Simplified:
//! - PRG RAM disable bit (PRG register bit 4) is ignored
//! - Large board variants (SUROM / SOROM / etc.) are not modeled
use crate::bounded::Bounded;
use crate::mapper::{Mapper, Mirroring};

/// Every MMC1 register is a 5-bit latch.
type Reg5 = Bounded<0, 0x1F>;

const CONTROL_POWER_ON: u16 = 0x0C;

#[derive(Debug, Clone)]
pub struct Mmc1 {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,

    control: Reg5,
    chr_bank0: Reg5,
    chr_bank1: Reg5,
    prg_bank: Reg5,

    shift_reg: u8,
    shift_count: u8,
}

impl Mmc1 {
    /// An empty `chr` allocates 8 KiB of CHR RAM.
    pub fn new(prg_rom: Vec<u8>, prg_ram: Vec<u8>, chr: Vec<u8>) -> Self {
        let chr_is_ram = chr.is_empty();
        let chr = if chr_is_ram { vec![0; 8 * 1024] } else { chr };
        Self {
            prg_rom,
            prg_ram,
            chr,
            chr_is_ram,
            control: Reg5::wrapping_from(CONTROL_POWER_ON),
            chr_bank0: Reg5::default(),
            chr_bank1: Reg5::default(),
            prg_bank: Reg5::default(),
            shift_reg: 0,
            shift_count: 0,
        }
    }

    fn prg_bank_count(&self) -> usize {
        (self.prg_rom.len() / 0x4000).max(1)
    }

    fn chr_bank_count(&self) -> usize {
        (self.chr.len() / 0x1000).max(1)
    }

    #[inline]
    fn prg_mode(&self) -> u16 {
        (self.control.get() >> 2) & 0x03
    }

    #[inline]
    fn chr_4k_mode(&self) -> bool {
        self.control.get() & 0x10 != 0
    }

    /// 16 KiB bank indices mapped at $8000 and $C000.
    pub fn prg_banks(&self) -> (usize, usize) {
        let count = self.prg_bank_count();
        let bank = (self.prg_bank.get() & 0x0F) as usize;
        match self.prg_mode() {
            0 | 1 => {
                let lo = (bank & !1) % count;
                (lo, (lo + 1) % count)
            }
            2 => (0, bank % count),
            _ => (bank % count, count - 1),
        }
    }

    fn chr_index(&self, addr: u16) -> usize {
        let count = self.chr_bank_count();
        let bank = if self.chr_4k_mode() {
            let reg = if addr < 0x1000 { self.chr_bank0 } else { self.chr_bank1 };
            reg.get() as usize % count
        } else {
            // 8K mode ignores the low bit and selects a pair.
            ((self.chr_bank0.get() as usize & !1) % count) + (addr as usize >> 12 & 1)
        };
        (bank * 0x1000 + (addr as usize & 0x0FFF)) % self.chr.len()
    }

    fn commit_register(&mut self, addr: u16, value: Reg5) {
        match addr {
            0x8000..=0x9FFF => self.control = value,
            0xA000..=0xBFFF => self.chr_bank0 = value,
            0xC000..=0xDFFF => self.chr_bank1 = value,
            _ => self.prg_bank = value,
        }
    }

    fn serial_write(&mut self, addr: u16, data: u8) {
        if data & 0x80 != 0 {
            self.shift_reg = 0;
            self.shift_count = 0;
            self.control = Reg5::wrapping_from(self.control.get() | CONTROL_POWER_ON);
            return;
        }
        self.shift_reg |= (data & 1) << self.shift_count;
        self.shift_count += 1;
        if self.shift_count == 5 {
            let value = Reg5::wrapping_from(self.shift_reg as u16);
            self.commit_register(addr, value);
            self.shift_reg = 0;
            self.shift_count = 0;
        }
    }
}

impl Mapper for Mmc1 {
    fn mapper_id(&self) -> u16 {
        1
    }

    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF if !self.prg_ram.is_empty() => {
                self.prg_ram[(addr as usize - 0x6000) % self.prg_ram.len()]
            }
            0x8000..=0xFFFF if !self.prg_rom.is_empty() => {
                let (lo, hi) = self.prg_banks();
                let bank = if addr < 0xC000 { lo } else { hi };
                let idx = bank * 0x4000 + (addr as usize & 0x3FFF);
                self.prg_rom[idx % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF if !self.prg_ram.is_empty() => {
                let idx = (addr as usize - 0x6000) % self.prg_ram.len();
                self.prg_ram[idx] = value;
            }
            0x8000..=0xFFFF => self.serial_write(addr, value),
            _ => {}
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        if addr < 0x2000 {
            self.chr[self.chr_index(addr)]
        } else {
            0
        }
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram && addr < 0x2000 {
            let idx = self.chr_index(addr);
            self.chr[idx] = value;
        }
    }

    fn prg_size(&self) -> usize {
        self.prg_rom.len()
    }

    fn mirroring(&self) -> Mirroring {
        match self.control.get() & 0x03 {
            0 => Mirroring::SingleScreenLower,
            1 => Mirroring::SingleScreenUpper,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        }
    }

    fn reset(&mut self) {
        self.control = Reg5::wrapping_from(CONTROL_POWER_ON);
        self.chr_bank0 = Reg5::default();
        self.chr_bank1 = Reg5::default();
        self.prg_bank = Reg5::default();
        self.shift_reg = 0;
        self.shift_count = 0;
    }
}
