/*!
PPU stub: CPU-visible register file, OAM and vblank timing.

Scope:
- Implements the register window ($2000..$2007, folded to 0..=7):
  * 0 PPUCTRL: VRAM increment (bit 2) and NMI enable (bit 7)
  * 1 PPUMASK: stored only
  * 2 PPUSTATUS: vblank/sprite flags; read clears vblank and the write toggle
  * 3 OAMADDR: OAM pointer for register 4
  * 4 OAMDATA: read/write OAM at OAMADDR (writes increment OAMADDR)
  * 5 PPUSCROLL: two writes (x then y)
  * 6 PPUADDR: two writes (high then low) set the VRAM address
  * 7 PPUDATA: buffered VRAM read / write, +1 or +32 afterwards
- VRAM is a flat 16 KiB space; nametable and palette mirroring are not modeled.
- Dot/scanline timing (341 dots x 262 lines) raises vblank at scanline 241
  dot 1 and latches an NMI request when PPUCTRL bit 7 is set.

Nothing is rendered. The stub exists so CPU programs that poll PPUSTATUS,
upload OAM through DMA or wait for NMI behave.
*/

use crate::bus::interfaces::VideoUnitPort;

const STATUS_VBLANK: u8 = 0x80;
const STATUS_SPRITE_ZERO: u8 = 0x40;
const STATUS_OVERFLOW: u8 = 0x20;

const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_NMI_ENABLE: u8 = 0x80;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const VBLANK_SCANLINE: i16 = 241;
const LAST_SCANLINE: i16 = 260;

#[derive(Clone)]
pub struct PpuStub {
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,

    write_toggle: bool, // $2005/$2006 latch; reset by a PPUSTATUS read
    scroll_x: u8,
    scroll_y: u8,

    vram_addr: u16,
    read_buffer: u8,
    vram: Box<[u8; 0x4000]>,
    oam: [u8; 256],

    dot: u16,
    scanline: i16, // -1 pre-render, 0..=260
    frame: u64,
    nmi_latch: bool,
}

impl std::fmt::Debug for PpuStub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PpuStub")
            .field("ctrl", &self.ctrl)
            .field("mask", &self.mask)
            .field("status", &self.status)
            .field("scroll", &(self.scroll_x, self.scroll_y))
            .field("vram_addr", &self.vram_addr)
            .field("dot", &self.dot)
            .field("scanline", &self.scanline)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Default for PpuStub {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuStub {
    pub fn new() -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            write_toggle: false,
            scroll_x: 0,
            scroll_y: 0,
            vram_addr: 0,
            read_buffer: 0,
            vram: Box::new([0; 0x4000]),
            oam: [0; 256],
            dot: 0,
            scanline: -1,
            frame: 0,
            nmi_latch: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    pub fn vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Completed frames since power-on.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.vram[(addr & 0x3FFF) as usize]
    }

    fn nmi_enabled(&self) -> bool {
        self.ctrl & CTRL_NMI_ENABLE != 0
    }

    fn vram_increment(&self) -> u16 {
        if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 }
    }

    fn advance_vram_addr(&mut self) {
        self.vram_addr = self.vram_addr.wrapping_add(self.vram_increment()) & 0x3FFF;
    }
}

impl VideoUnitPort for PpuStub {
    fn read_register(&mut self, reg: u8) -> u8 {
        match reg & 0x07 {
            2 => {
                let result = self.status;
                self.status &= !STATUS_VBLANK;
                self.write_toggle = false;
                result
            }
            4 => self.oam[self.oam_addr as usize],
            7 => {
                let addr = self.vram_addr & 0x3FFF;
                let value = self.vram[addr as usize];
                // Palette reads bypass the buffer.
                let out = if addr < 0x3F00 {
                    std::mem::replace(&mut self.read_buffer, value)
                } else {
                    value
                };
                self.advance_vram_addr();
                out
            }
            // write-only registers
            _ => 0,
        }
    }

    fn peek_register(&self, reg: u8) -> u8 {
        match reg & 0x07 {
            2 => self.status,
            4 => self.oam[self.oam_addr as usize],
            7 => {
                let addr = self.vram_addr & 0x3FFF;
                if addr < 0x3F00 {
                    self.read_buffer
                } else {
                    self.peek_vram(addr)
                }
            }
            _ => 0,
        }
    }

    fn write_register(&mut self, reg: u8, value: u8) {
        match reg & 0x07 {
            0 => {
                let was_enabled = self.nmi_enabled();
                self.ctrl = value;
                // Enabling NMI during vblank fires immediately.
                if !was_enabled && self.nmi_enabled() && self.vblank() {
                    self.nmi_latch = true;
                }
            }
            1 => self.mask = value,
            2 => {}
            3 => self.oam_addr = value,
            4 => {
                self.oam[self.oam_addr as usize] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            5 => {
                if self.write_toggle {
                    self.scroll_y = value;
                } else {
                    self.scroll_x = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            6 => {
                if self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0x3F00) | value as u16;
                } else {
                    self.vram_addr = (self.vram_addr & 0x00FF) | (((value & 0x3F) as u16) << 8);
                }
                self.write_toggle = !self.write_toggle;
            }
            _ => {
                self.vram[(self.vram_addr & 0x3FFF) as usize] = value;
                self.advance_vram_addr();
            }
        }
    }

    fn step(&mut self) {
        self.dot += 1;
        if self.dot == 1 {
            if self.scanline == VBLANK_SCANLINE {
                self.status |= STATUS_VBLANK;
                if self.nmi_enabled() {
                    self.nmi_latch = true;
                }
            } else if self.scanline == -1 {
                self.status &= !(STATUS_VBLANK | STATUS_SPRITE_ZERO | STATUS_OVERFLOW);
            }
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = -1;
                self.frame += 1;
            }
        }
    }

    fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_latch)
    }
}
