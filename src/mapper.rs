/*!
Mapper subsystem: trait definition, nametable mirroring modes and NROM (mapper 0).

- The cartridge parses iNES and instantiates a concrete mapper with its PRG/CHR data.
- The bus forwards CPU $4020..=$FFFF to `cpu_read` / `cpu_write`.
- Pattern table accesses ($0000..=$1FFF in PPU space) go to `ppu_read` / `ppu_write`.
- `mirroring()` reports the current nametable arrangement; header mirroring for
  fixed boards, register-controlled for boards like MMC1.
*/

/// Nametable arrangement selected by the header or by mapper registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
    SingleScreenLower,
    SingleScreenUpper,
}

/// Common interface all cartridge boards implement.
///
/// All read/write methods take full CPU or PPU addresses (unmasked). Accesses
/// outside the ranges a board decodes return open-bus-ish defaults and ignore
/// writes rather than failing.
pub trait Mapper {
    /// iNES mapper number.
    fn mapper_id(&self) -> u16;

    /// CPU read at $4020..=$FFFF.
    fn cpu_read(&mut self, addr: u16) -> u8;

    /// CPU write at $4020..=$FFFF.
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU read at $0000..=$1FFF.
    fn ppu_read(&self, addr: u16) -> u8;

    /// PPU write at $0000..=$1FFF (only CHR RAM boards keep it).
    fn ppu_write(&mut self, addr: u16, value: u8);

    /// PRG ROM size in bytes.
    fn prg_size(&self) -> usize;

    fn mirroring(&self) -> Mirroring;

    /// Return bank registers to their power-on state.
    fn reset(&mut self) {}
}

/// NROM (mapper 0).
///
/// - PRG ROM: 16 KiB (NROM-128, mirrored into $C000) or 32 KiB (NROM-256) at $8000..=$FFFF.
/// - PRG RAM: optional, at $6000..=$7FFF.
/// - CHR: 8 KiB ROM or RAM.
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Nrom {
    pub fn new(
        prg_rom: Vec<u8>,
        chr: Vec<u8>,
        chr_is_ram: bool,
        prg_ram_size: usize,
        mirroring: Mirroring,
    ) -> Self {
        Self {
            prg_rom,
            prg_ram: vec![0; prg_ram_size],
            chr,
            chr_is_ram,
            mirroring,
        }
    }

    fn prg_rom_read(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0xFF;
        }
        let rel = (addr as usize) - 0x8000;
        self.prg_rom[rel % self.prg_rom.len()]
    }
}

impl Mapper for Nrom {
    fn mapper_id(&self) -> u16 {
        0
    }

    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF if !self.prg_ram.is_empty() => {
                self.prg_ram[(addr as usize - 0x6000) % self.prg_ram.len()]
            }
            0x8000..=0xFFFF => self.prg_rom_read(addr),
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        // PRG ROM has no registers on this board.
        if (0x6000..=0x7FFF).contains(&addr) && !self.prg_ram.is_empty() {
            let idx = (addr as usize - 0x6000) % self.prg_ram.len();
            self.prg_ram[idx] = value;
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF if !self.chr.is_empty() => self.chr[addr as usize % self.chr.len()],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram && addr < 0x2000 && !self.chr.is_empty() {
            let idx = addr as usize % self.chr.len();
            self.chr[idx] = value;
        }
    }

    fn prg_size(&self) -> usize {
        self.prg_rom.len()
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
