/*!
Cartridge with iNES (v1) loader and mapper integration.

Features:
- Parse the iNES (v1) header from bytes or a file path
- Extract PRG ROM, CHR (ROM, or 8 KiB CHR RAM when the CHR count is 0) and PRG RAM size
- Determine mirroring, battery-backed RAM, trainer and mapper id
- Construct a concrete mapper (0 NROM, 1 MMC1) and route CPU/PPU accesses through it

Notes:
- NES 2.0 headers are detected and rejected.
- PRG RAM: header byte 8 counts 8 KiB units; 0 means 8 KiB by convention.
- A trainer, when present, is skipped (it is not mapped anywhere).
- `Cartridge` implements [`Memory`] so a CPU can run straight off a cartridge
  in tests; addresses below $4020 read 0 there.
*/

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mapper::{Mapper, Mirroring, Nrom};
use crate::mappers::Mmc1;
use crate::memory::Memory;

const INES_MAGIC: &[u8; 4] = b"NES\x1A";
const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;
const PRG_RAM_UNIT: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("image is shorter than the 16-byte iNES header")]
    TooShort,
    #[error("invalid iNES header magic (expected NES<1A>)")]
    BadMagic,
    #[error("NES 2.0 headers are not supported")]
    Nes2Unsupported,
    #[error("image truncated inside the {section} section")]
    Truncated { section: &'static str },
    #[error("unsupported mapper id {0}")]
    UnsupportedMapper(u16),
    #[error("failed to read iNES file: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Cartridge {
    mapper: Box<dyn Mapper>,
    header_mirroring: Mirroring,
    battery: bool,
    has_trainer: bool,
    prg_rom_len: usize,
    chr_len: usize,
    chr_is_ram: bool,
    prg_ram_len: usize,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("mapper_id", &self.mapper_id())
            .field("mirroring", &self.mirroring())
            .field("battery", &self.battery)
            .field("has_trainer", &self.has_trainer)
            .field("prg_rom_len", &self.prg_rom_len)
            .field("chr_len", &self.chr_len)
            .field("chr_is_ram", &self.chr_is_ram)
            .field("prg_ram_len", &self.prg_ram_len)
            .finish()
    }
}

/// Slice `len` bytes at `offset`, naming the section on failure.
fn section<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    name: &'static str,
) -> Result<&'a [u8], CartridgeError> {
    data.get(offset..offset + len)
        .ok_or(CartridgeError::Truncated { section: name })
}

impl Cartridge {
    /// Parse an iNES (v1) image and build its mapper.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = data.get(..HEADER_LEN).ok_or(CartridgeError::TooShort)?;
        if &header[0..4] != INES_MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let prg_units = header[4] as usize;
        let chr_units = header[5] as usize;
        let flags6 = header[6];
        let flags7 = header[7];
        let prg_ram_units = header[8] as usize;

        if flags7 & 0x0C == 0x08 {
            return Err(CartridgeError::Nes2Unsupported);
        }

        let mapper_id = (flags7 & 0xF0) as u16 | (flags6 >> 4) as u16;
        let header_mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery = flags6 & 0b0000_0010 != 0;
        let has_trainer = flags6 & 0b0000_0100 != 0;

        let mut offset = HEADER_LEN;
        if has_trainer {
            section(data, offset, TRAINER_LEN, "trainer")?;
            offset += TRAINER_LEN;
        }

        let prg_rom_len = prg_units * PRG_UNIT;
        let prg_rom = section(data, offset, prg_rom_len, "PRG ROM")?.to_vec();
        offset += prg_rom_len;

        let chr_is_ram = chr_units == 0;
        let chr = if chr_is_ram {
            Vec::new()
        } else {
            section(data, offset, chr_units * CHR_UNIT, "CHR ROM")?.to_vec()
        };
        let chr_len = if chr_is_ram { CHR_UNIT } else { chr.len() };

        let prg_ram_len = prg_ram_units.max(1) * PRG_RAM_UNIT;

        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => {
                let chr = if chr_is_ram { vec![0; CHR_UNIT] } else { chr };
                Box::new(Nrom::new(prg_rom, chr, chr_is_ram, prg_ram_len, header_mirroring))
            }
            1 => Box::new(Mmc1::new(prg_rom, vec![0; prg_ram_len], chr)),
            other => return Err(CartridgeError::UnsupportedMapper(other)),
        };

        log::info!(
            target: "bus",
            "loaded iNES image: mapper {mapper_id}, PRG {} KiB, CHR {} KiB{}",
            prg_rom_len / 1024,
            chr_len / 1024,
            if chr_is_ram { " (RAM)" } else { "" }
        );

        Ok(Self {
            mapper,
            header_mirroring,
            battery,
            has_trainer,
            prg_rom_len,
            chr_len,
            chr_is_ram,
            prg_ram_len,
        })
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    pub fn mapper_id(&self) -> u16 {
        self.mapper.mapper_id()
    }

    /// Current nametable mirroring. A four-screen header wins over mapper control.
    pub fn mirroring(&self) -> Mirroring {
        match self.header_mirroring {
            Mirroring::FourScreen => Mirroring::FourScreen,
            _ => self.mapper.mirroring(),
        }
    }

    pub fn battery_backed(&self) -> bool {
        self.battery
    }

    pub fn has_trainer(&self) -> bool {
        self.has_trainer
    }

    pub fn prg_rom_len(&self) -> usize {
        self.mapper.prg_size()
    }

    pub fn chr_len(&self) -> usize {
        self.chr_len
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    pub fn prg_ram_len(&self) -> usize {
        self.prg_ram_len
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        self.mapper.ppu_write(addr, value)
    }

    /// Return the mapper's bank registers to power-on state.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }
}

impl Memory for Cartridge {
    fn read(&mut self, addr: u16) -> u8 {
        if addr >= 0x4020 {
            self.mapper.cpu_read(addr)
        } else {
            0
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if addr >= 0x4020 {
            self.mapper.cpu_write(addr, value);
        }
    }
}
