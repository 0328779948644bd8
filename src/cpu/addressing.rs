/*!
addressing.rs - 6502 addressing modes and operand resolution.

Overview
========
Every opcode belongs to exactly one [`AddressingMode`]; membership is a
static 256-entry table indexed by opcode. [`resolve`] consumes the
operand bytes that follow the opcode (advancing PC) and yields the
[`Operand`] plus a page-cross flag for the timing model.

Hardware quirks reproduced here
===============================
- Zero page,X/Y wraps inside page 0 (`$FF + 1 -> $00`).
- `(d,X)` and `(d),Y` fetch their 16-bit pointer from zero page with the
  high byte address wrapping inside page 0.
- `JMP (ind)` never carries into the high byte of the pointer: a pointer
  at `$10FF` takes its high byte from `$1000`.
- Relative targets are computed from PC after the two-byte branch has
  been consumed; the page-cross flag compares that PC with the target.

Caller assumptions
==================
- PC points at the first operand byte (the opcode has been fetched).
- Callers advance PC exclusively through these helpers.
*/

use crate::cpu::regs::Registers;
use crate::memory::Memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndexedIndirect,
    IndirectIndexed,
    Indirect,
    Relative,
}

impl AddressingMode {
    /// Mode of the given opcode.
    #[inline]
    pub fn of(opcode: u8) -> Self {
        MODES[opcode as usize]
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndexedIndirect | IndirectIndexed
            | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

/// What an instruction operates on once its operand bytes are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Immediate(u8),
    Address(u16),
}

impl Operand {
    #[inline]
    pub fn address(self) -> Option<u16> {
        match self {
            Operand::Address(addr) => Some(addr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    #[inline]
    fn at(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }
}

/// Fetch next byte from the instruction stream, incrementing PC.
#[inline]
pub(crate) fn fetch_byte(regs: &mut Registers, mem: &mut dyn Memory) -> u8 {
    let v = mem.read(regs.pc);
    regs.increment_pc(1);
    v
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
#[inline]
pub(crate) fn fetch_word(regs: &mut Registers, mem: &mut dyn Memory) -> u16 {
    let lo = fetch_byte(regs, mem) as u16;
    let hi = fetch_byte(regs, mem) as u16;
    (hi << 8) | lo
}

#[inline]
fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

fn indexed(base: u16, index: u8) -> Resolved {
    let addr = base.wrapping_add(index as u16);
    Resolved {
        operand: Operand::Address(addr),
        page_crossed: crosses_page(base, addr),
    }
}

/// Consume the operand bytes of `mode` and compute the effective operand.
pub(crate) fn resolve(mode: AddressingMode, regs: &mut Registers, mem: &mut dyn Memory) -> Resolved {
    use AddressingMode::*;
    match mode {
        Implied => Resolved::at(Operand::Implied),
        Accumulator => Resolved::at(Operand::Accumulator),
        Immediate => Resolved::at(Operand::Immediate(fetch_byte(regs, mem))),
        ZeroPage => Resolved::at(Operand::Address(fetch_byte(regs, mem) as u16)),
        ZeroPageX => {
            let zp = fetch_byte(regs, mem).wrapping_add(regs.x);
            Resolved::at(Operand::Address(zp as u16))
        }
        ZeroPageY => {
            let zp = fetch_byte(regs, mem).wrapping_add(regs.y);
            Resolved::at(Operand::Address(zp as u16))
        }
        Absolute => Resolved::at(Operand::Address(fetch_word(regs, mem))),
        AbsoluteX => {
            let base = fetch_word(regs, mem);
            indexed(base, regs.x)
        }
        AbsoluteY => {
            let base = fetch_word(regs, mem);
            indexed(base, regs.y)
        }
        IndexedIndirect => {
            let zp = fetch_byte(regs, mem).wrapping_add(regs.x);
            Resolved::at(Operand::Address(read_word_zp(mem, zp)))
        }
        IndirectIndexed => {
            let zp = fetch_byte(regs, mem);
            let base = read_word_zp(mem, zp);
            indexed(base, regs.y)
        }
        Indirect => {
            let ptr = fetch_word(regs, mem);
            Resolved::at(Operand::Address(read_word_indirect_bug(mem, ptr)))
        }
        Relative => {
            let offset = fetch_byte(regs, mem) as i8;
            let next = regs.pc;
            let target = next.wrapping_add(offset as i16 as u16);
            Resolved {
                operand: Operand::Address(target),
                page_crossed: crosses_page(next, target),
            }
        }
    }
}

/// Read a 16-bit little endian pointer from zero page with wraparound
/// on the high byte.
#[inline]
pub(crate) fn read_word_zp(mem: &mut dyn Memory, base: u8) -> u16 {
    let lo = mem.read(base as u16) as u16;
    let hi = mem.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect): the high byte comes from the same page as the low byte.
#[inline]
pub(crate) fn read_word_indirect_bug(mem: &mut dyn Memory, addr: u16) -> u16 {
    let lo = mem.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = mem.read(hi_addr) as u16;
    (hi << 8) | lo
}

// ---------------------------------------------------------------------
// Opcode -> mode table
// ---------------------------------------------------------------------

const IMP: AddressingMode = AddressingMode::Implied;
const ACC: AddressingMode = AddressingMode::Accumulator;
const IMM: AddressingMode = AddressingMode::Immediate;
const ZP0: AddressingMode = AddressingMode::ZeroPage;
const ZPX: AddressingMode = AddressingMode::ZeroPageX;
const ZPY: AddressingMode = AddressingMode::ZeroPageY;
const ABS: AddressingMode = AddressingMode::Absolute;
const ABX: AddressingMode = AddressingMode::AbsoluteX;
const ABY: AddressingMode = AddressingMode::AbsoluteY;
const IZX: AddressingMode = AddressingMode::IndexedIndirect;
const IZY: AddressingMode = AddressingMode::IndirectIndexed;
const IND: AddressingMode = AddressingMode::Indirect;
const REL: AddressingMode = AddressingMode::Relative;

#[rustfmt::skip]
static MODES: [AddressingMode; 256] = [
//  x0   x1   x2   x3   x4   x5   x6   x7   x8   x9   xA   xB   xC   xD   xE   xF
    IMP, IZX, IMP, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS, // 0x
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // 1x
    ABS, IZX, IMP, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS, // 2x
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // 3x
    IMP, IZX, IMP, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS, // 4x
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // 5x
    IMP, IZX, IMP, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, ACC, IMM, IND, ABS, ABS, ABS, // 6x
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // 7x
    IMM, IZX, IMM, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS, // 8x
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY, // 9x
    IMM, IZX, IMM, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS, // Ax
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY, // Bx
    IMM, IZX, IMM, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS, // Cx
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // Dx
    IMM, IZX, IMM, IZX, ZP0, ZP0, ZP0, ZP0, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS, // Ex
    REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX, // Fx
];
