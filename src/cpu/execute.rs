/*!
execute.rs - 6502 instruction semantics (ALU, flags, stack, RMW).

Purpose
=======
One function per behavior. The dispatch table in `table.rs` refers to
these by function pointer, grouped by calling convention:

```text
no operand           fn(&mut Registers, &mut dyn Memory)
mutates byte         fn(&mut Registers, u8) -> u8
reads byte           fn(&mut Registers, u8)
reads address        fn(&mut Registers, &mut dyn Memory, u16)
conditional branch   fn(&Registers) -> bool
```

Read-modify-write operations never see where their byte lives. The
dispatcher loads it through an [`OperandLocation`] (accumulator or memory),
passes the value in, and stores the returned value back with exactly one
read and one write.

Decimal mode
============
The NES CPU has BCD arithmetic disconnected. SED/CLD toggle the D flag but
ADC/SBC are always binary.

Illegal opcodes
===============
Composites (SLO, RLA, SRE, RRA, DCP, ISC, LAX, SAX, ...) run the legal
primitives in sequence on one fetched value. The unstable group (XAA,
LAX #imm, AHX, SHX, SHY, TAS, LAS) uses the commonly observed behavior:
magic constant $EE for XAA/LAX #imm, and `value & (base_high + 1)` for
the SH* stores with the high address byte replaced on a page cross.
*/

use crate::cpu::flags::StatusFlags;
use crate::cpu::interrupts::{self, IRQ_VECTOR};
use crate::cpu::regs::{Registers, STACK_PAGE};
use crate::memory::Memory;

/// Where a read-modify-write operand lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLocation {
    Accumulator,
    Memory(u16),
}

impl OperandLocation {
    #[inline]
    pub fn load(self, regs: &Registers, mem: &mut dyn Memory) -> u8 {
        match self {
            OperandLocation::Accumulator => regs.a,
            OperandLocation::Memory(addr) => mem.read(addr),
        }
    }

    #[inline]
    pub fn store(self, regs: &mut Registers, mem: &mut dyn Memory, value: u8) {
        match self {
            OperandLocation::Accumulator => regs.a = value,
            OperandLocation::Memory(addr) => mem.write(addr, value),
        }
    }
}

/// Load, apply `op`, store back.
pub(crate) fn read_modify_write(
    regs: &mut Registers,
    mem: &mut dyn Memory,
    location: OperandLocation,
    op: fn(&mut Registers, u8) -> u8,
) {
    let value = location.load(regs, mem);
    let result = op(regs, value);
    location.store(regs, mem, result);
}

// ---------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------

/// Write at $0100|SP, then decrement SP.
#[inline]
pub(crate) fn push(regs: &mut Registers, mem: &mut dyn Memory, value: u8) {
    mem.write(regs.stack_addr(), value);
    regs.sp = regs.sp.wrapping_sub(1);
}

/// Increment SP, then read at $0100|SP.
#[inline]
pub(crate) fn pop(regs: &mut Registers, mem: &mut dyn Memory) -> u8 {
    regs.sp = regs.sp.wrapping_add(1);
    mem.read(STACK_PAGE | regs.sp as u16)
}

/// High byte first so the word sits little-endian in memory.
#[inline]
pub(crate) fn push_word(regs: &mut Registers, mem: &mut dyn Memory, value: u16) {
    push(regs, mem, (value >> 8) as u8);
    push(regs, mem, value as u8);
}

#[inline]
pub(crate) fn pop_word(regs: &mut Registers, mem: &mut dyn Memory) -> u16 {
    let lo = pop(regs, mem) as u16;
    let hi = pop(regs, mem) as u16;
    (hi << 8) | lo
}

pub(crate) fn pha(regs: &mut Registers, mem: &mut dyn Memory) {
    let a = regs.a;
    push(regs, mem, a);
}

pub(crate) fn php(regs: &mut Registers, mem: &mut dyn Memory) {
    let p = regs.status.to_stack_byte(true);
    push(regs, mem, p);
}

pub(crate) fn pla(regs: &mut Registers, mem: &mut dyn Memory) {
    regs.a = pop(regs, mem);
    regs.update_zero_negative(regs.a);
}

pub(crate) fn plp(regs: &mut Registers, mem: &mut dyn Memory) {
    let p = pop(regs, mem);
    regs.status = StatusFlags::from_stack_byte(p);
}

// ---------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------

/// BRK skips its padding byte, then enters the IRQ vector with B set.
pub(crate) fn brk(regs: &mut Registers, mem: &mut dyn Memory) {
    regs.increment_pc(1);
    interrupts::enter(regs, mem, IRQ_VECTOR, true);
}

pub(crate) fn rti(regs: &mut Registers, mem: &mut dyn Memory) {
    plp(regs, mem);
    regs.pc = pop_word(regs, mem);
}

pub(crate) fn rts(regs: &mut Registers, mem: &mut dyn Memory) {
    regs.pc = pop_word(regs, mem).wrapping_add(1);
}

/// PC already points past the operand; the pushed value is the address
/// of the last JSR byte.
pub(crate) fn jsr(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    let ret = regs.pc.wrapping_sub(1);
    push_word(regs, mem, ret);
    regs.pc = addr;
}

pub(crate) fn jmp(regs: &mut Registers, _mem: &mut dyn Memory, addr: u16) {
    regs.pc = addr;
}

pub(crate) fn nop(_regs: &mut Registers, _mem: &mut dyn Memory) {}

// ---------------------------------------------------------------------
// Flag instructions
// ---------------------------------------------------------------------

pub(crate) fn clc(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::CARRY, false);
}
pub(crate) fn sec(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::CARRY, true);
}
pub(crate) fn cli(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::INTERRUPT_DISABLE, false);
}
pub(crate) fn sei(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::INTERRUPT_DISABLE, true);
}
pub(crate) fn clv(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::OVERFLOW, false);
}
pub(crate) fn cld(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::DECIMAL, false);
}
pub(crate) fn sed(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.set_flag(StatusFlags::DECIMAL, true);
}

// ---------------------------------------------------------------------
// Transfers, increments
// ---------------------------------------------------------------------

pub(crate) fn tax(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.x = regs.a;
    regs.update_zero_negative(regs.x);
}
pub(crate) fn tay(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.y = regs.a;
    regs.update_zero_negative(regs.y);
}
pub(crate) fn txa(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.a = regs.x;
    regs.update_zero_negative(regs.a);
}
pub(crate) fn tya(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.a = regs.y;
    regs.update_zero_negative(regs.a);
}
pub(crate) fn tsx(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.x = regs.sp;
    regs.update_zero_negative(regs.x);
}
/// TXS is the one transfer that leaves flags untouched.
pub(crate) fn txs(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.sp = regs.x;
}
pub(crate) fn inx(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.x = regs.x.wrapping_add(1);
    regs.update_zero_negative(regs.x);
}
pub(crate) fn iny(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.y = regs.y.wrapping_add(1);
    regs.update_zero_negative(regs.y);
}
pub(crate) fn dex(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.x = regs.x.wrapping_sub(1);
    regs.update_zero_negative(regs.x);
}
pub(crate) fn dey(regs: &mut Registers, _mem: &mut dyn Memory) {
    regs.y = regs.y.wrapping_sub(1);
    regs.update_zero_negative(regs.y);
}

// ---------------------------------------------------------------------
// Loads / stores
// ---------------------------------------------------------------------

pub(crate) fn lda(regs: &mut Registers, v: u8) {
    regs.a = v;
    regs.update_zero_negative(v);
}
pub(crate) fn ldx(regs: &mut Registers, v: u8) {
    regs.x = v;
    regs.update_zero_negative(v);
}
pub(crate) fn ldy(regs: &mut Registers, v: u8) {
    regs.y = v;
    regs.update_zero_negative(v);
}

pub(crate) fn sta(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    mem.write(addr, regs.a);
}
pub(crate) fn stx(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    mem.write(addr, regs.x);
}
pub(crate) fn sty(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    mem.write(addr, regs.y);
}

// ---------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------

pub(crate) fn and(regs: &mut Registers, v: u8) {
    regs.a &= v;
    regs.update_zero_negative(regs.a);
}
pub(crate) fn ora(regs: &mut Registers, v: u8) {
    regs.a |= v;
    regs.update_zero_negative(regs.a);
}
pub(crate) fn eor(regs: &mut Registers, v: u8) {
    regs.a ^= v;
    regs.update_zero_negative(regs.a);
}

/// Z from A & M; N and V copied from bits 7 and 6 of M.
pub(crate) fn bit(regs: &mut Registers, v: u8) {
    regs.set_flag(StatusFlags::ZERO, regs.a & v == 0);
    regs.set_flag(StatusFlags::NEGATIVE, v & 0x80 != 0);
    regs.set_flag(StatusFlags::OVERFLOW, v & 0x40 != 0);
}

pub(crate) fn adc(regs: &mut Registers, v: u8) {
    let a = regs.a;
    let sum = a as u16 + v as u16 + regs.status.carry_bit() as u16;
    let result = sum as u8;
    regs.set_flag(StatusFlags::CARRY, sum > 0xFF);
    regs.set_flag(StatusFlags::OVERFLOW, (a ^ result) & (v ^ result) & 0x80 != 0);
    regs.a = result;
    regs.update_zero_negative(result);
}

/// A - M - (1 - C), computed as A + !M + C.
pub(crate) fn sbc(regs: &mut Registers, v: u8) {
    adc(regs, v ^ 0xFF);
}

fn compare(regs: &mut Registers, reg: u8, v: u8) {
    let diff = reg.wrapping_sub(v);
    regs.set_flag(StatusFlags::CARRY, reg >= v);
    regs.update_zero_negative(diff);
}
pub(crate) fn cmp(regs: &mut Registers, v: u8) {
    let a = regs.a;
    compare(regs, a, v);
}
pub(crate) fn cpx(regs: &mut Registers, v: u8) {
    let x = regs.x;
    compare(regs, x, v);
}
pub(crate) fn cpy(regs: &mut Registers, v: u8) {
    let y = regs.y;
    compare(regs, y, v);
}

// ---------------------------------------------------------------------
// Shifts / rotates / INC / DEC
// ---------------------------------------------------------------------

pub(crate) fn asl(regs: &mut Registers, v: u8) -> u8 {
    let r = v << 1;
    regs.set_flag(StatusFlags::CARRY, v & 0x80 != 0);
    regs.update_zero_negative(r);
    r
}
pub(crate) fn lsr(regs: &mut Registers, v: u8) -> u8 {
    let r = v >> 1;
    regs.set_flag(StatusFlags::CARRY, v & 0x01 != 0);
    regs.update_zero_negative(r);
    r
}
pub(crate) fn rol(regs: &mut Registers, v: u8) -> u8 {
    let r = (v << 1) | regs.status.carry_bit();
    regs.set_flag(StatusFlags::CARRY, v & 0x80 != 0);
    regs.update_zero_negative(r);
    r
}
pub(crate) fn ror(regs: &mut Registers, v: u8) -> u8 {
    let r = (v >> 1) | (regs.status.carry_bit() << 7);
    regs.set_flag(StatusFlags::CARRY, v & 0x01 != 0);
    regs.update_zero_negative(r);
    r
}
pub(crate) fn inc(regs: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    regs.update_zero_negative(r);
    r
}
pub(crate) fn dec(regs: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    regs.update_zero_negative(r);
    r
}

// ---------------------------------------------------------------------
// Branch conditions
// ---------------------------------------------------------------------

pub(crate) fn bcc(regs: &Registers) -> bool {
    !regs.read_flag(StatusFlags::CARRY)
}
pub(crate) fn bcs(regs: &Registers) -> bool {
    regs.read_flag(StatusFlags::CARRY)
}
pub(crate) fn bne(regs: &Registers) -> bool {
    !regs.read_flag(StatusFlags::ZERO)
}
pub(crate) fn beq(regs: &Registers) -> bool {
    regs.read_flag(StatusFlags::ZERO)
}
pub(crate) fn bpl(regs: &Registers) -> bool {
    !regs.read_flag(StatusFlags::NEGATIVE)
}
pub(crate) fn bmi(regs: &Registers) -> bool {
    regs.read_flag(StatusFlags::NEGATIVE)
}
pub(crate) fn bvc(regs: &Registers) -> bool {
    !regs.read_flag(StatusFlags::OVERFLOW)
}
pub(crate) fn bvs(regs: &Registers) -> bool {
    regs.read_flag(StatusFlags::OVERFLOW)
}

// ---------------------------------------------------------------------
// Illegal: read-modify-write composites
// ---------------------------------------------------------------------

pub(crate) fn slo(regs: &mut Registers, v: u8) -> u8 {
    let r = asl(regs, v);
    ora(regs, r);
    r
}
pub(crate) fn rla(regs: &mut Registers, v: u8) -> u8 {
    let r = rol(regs, v);
    and(regs, r);
    r
}
pub(crate) fn sre(regs: &mut Registers, v: u8) -> u8 {
    let r = lsr(regs, v);
    eor(regs, r);
    r
}
pub(crate) fn rra(regs: &mut Registers, v: u8) -> u8 {
    let r = ror(regs, v);
    adc(regs, r);
    r
}
pub(crate) fn dcp(regs: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cmp(regs, r);
    r
}
pub(crate) fn isc(regs: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    sbc(regs, r);
    r
}

// ---------------------------------------------------------------------
// Illegal: read composites
// ---------------------------------------------------------------------

pub(crate) fn lax(regs: &mut Registers, v: u8) {
    regs.a = v;
    regs.x = v;
    regs.update_zero_negative(v);
}

/// AND #imm, then C = N.
pub(crate) fn anc(regs: &mut Registers, v: u8) {
    and(regs, v);
    let n = regs.read_flag(StatusFlags::NEGATIVE);
    regs.set_flag(StatusFlags::CARRY, n);
}

/// AND #imm, then LSR A.
pub(crate) fn alr(regs: &mut Registers, v: u8) {
    let masked = regs.a & v;
    regs.a = lsr(regs, masked);
}

/// AND #imm, then ROR A with C = bit 6 and V = bit 6 ^ bit 5 of the result.
pub(crate) fn arr(regs: &mut Registers, v: u8) {
    let masked = regs.a & v;
    let r = (masked >> 1) | (regs.status.carry_bit() << 7);
    regs.a = r;
    regs.update_zero_negative(r);
    regs.set_flag(StatusFlags::CARRY, r & 0x40 != 0);
    regs.set_flag(StatusFlags::OVERFLOW, ((r >> 6) ^ (r >> 5)) & 0x01 != 0);
}

/// X = (A & X) - #imm, flags as CMP.
pub(crate) fn axs(regs: &mut Registers, v: u8) {
    let ax = regs.a & regs.x;
    regs.x = ax.wrapping_sub(v);
    regs.set_flag(StatusFlags::CARRY, ax >= v);
    regs.update_zero_negative(regs.x);
}

/// A, X and SP all receive M & SP.
pub(crate) fn las(regs: &mut Registers, v: u8) {
    let r = v & regs.sp;
    regs.a = r;
    regs.x = r;
    regs.sp = r;
    regs.update_zero_negative(r);
}

const UNSTABLE_MAGIC: u8 = 0xEE;

/// XAA/ANE: A = (A | magic) & X & #imm.
pub(crate) fn xaa(regs: &mut Registers, v: u8) {
    regs.a = (regs.a | UNSTABLE_MAGIC) & regs.x & v;
    regs.update_zero_negative(regs.a);
}

/// LAX #imm (LXA): A = X = (A | magic) & #imm.
pub(crate) fn lxa(regs: &mut Registers, v: u8) {
    let r = (regs.a | UNSTABLE_MAGIC) & v;
    lax(regs, r);
}

// ---------------------------------------------------------------------
// Illegal: stores
// ---------------------------------------------------------------------

pub(crate) fn sax(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    mem.write(addr, regs.a & regs.x);
}

/// Shared SH* store: `value & (high byte of the unindexed base + 1)`.
/// When indexing crossed a page the stored value also replaces the high
/// byte of the target address.
fn unstable_store(mem: &mut dyn Memory, addr: u16, index: u8, value: u8) {
    let base = addr.wrapping_sub(index as u16);
    let high = (base >> 8) as u8;
    let stored = value & high.wrapping_add(1);
    let target = if (base ^ addr) & 0xFF00 != 0 {
        ((stored as u16) << 8) | (addr & 0x00FF)
    } else {
        addr
    };
    mem.write(target, stored);
}

/// AHX/SHA (abs,Y and (d),Y).
pub(crate) fn ahx(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    unstable_store(mem, addr, regs.y, regs.a & regs.x);
}

/// SHX (abs,Y).
pub(crate) fn shx(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    unstable_store(mem, addr, regs.y, regs.x);
}

/// SHY (abs,X).
pub(crate) fn shy(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    unstable_store(mem, addr, regs.x, regs.y);
}

/// TAS/SHS: SP = A & X, then store like AHX.
pub(crate) fn tas(regs: &mut Registers, mem: &mut dyn Memory, addr: u16) {
    regs.sp = regs.a & regs.x;
    unstable_store(mem, addr, regs.y, regs.sp);
}
