/*!
interrupts.rs - NMI / IRQ / reset sequencing.

Pending lines are independent bits; both may be set at once. Between
instructions the CPU services at most one:

1. NMI if pending (non-maskable).
2. Otherwise IRQ if pending and I is clear. A masked IRQ stays pending.

Entering a handler pushes PC (high, then low), pushes status (B clear for
hardware interrupts, set for BRK; bit 5 always set), sets I and loads PC
from the vector. Each hardware entry costs 7 cycles.

Reset performs the same stack walk without writing: SP drops by 3 and the
bus is never touched except for the vector fetch.
*/

use crate::cpu::execute::{push, push_word};
use crate::cpu::flags::StatusFlags;
use crate::cpu::regs::Registers;
use crate::memory::Memory;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles charged for NMI, IRQ and reset entry.
pub const INTERRUPT_CYCLES: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
}

impl Interrupt {
    #[inline]
    pub fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptState {
    pub irq_pending: bool,
    pub nmi_pending: bool,
}

impl InterruptState {
    #[inline]
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    #[inline]
    pub fn trigger_irq(&mut self) {
        self.irq_pending = true;
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pick the interrupt to service now (if any) and clear its pending bit.
    pub fn take_serviceable(&mut self, status: StatusFlags) -> Option<Interrupt> {
        if self.nmi_pending {
            self.nmi_pending = false;
            Some(Interrupt::Nmi)
        } else if self.irq_pending && !status.contains(StatusFlags::INTERRUPT_DISABLE) {
            self.irq_pending = false;
            Some(Interrupt::Irq)
        } else {
            None
        }
    }
}

/// Shared handler entry for BRK (`brk = true`), IRQ and NMI.
pub(crate) fn enter(regs: &mut Registers, mem: &mut dyn Memory, vector: u16, brk: bool) {
    let pc = regs.pc;
    push_word(regs, mem, pc);
    let p = regs.status.to_stack_byte(brk);
    push(regs, mem, p);
    regs.set_flag(StatusFlags::INTERRUPT_DISABLE, true);
    regs.pc = mem.read_word(vector);
}

/// Service one interrupt, returning the cycles it cost.
pub(crate) fn service(regs: &mut Registers, mem: &mut dyn Memory, kind: Interrupt) -> u16 {
    enter(regs, mem, kind.vector(), false);
    INTERRUPT_CYCLES
}

/// Reset sequence: I set, SP -= 3 without stack writes, PC from $FFFC.
pub(crate) fn reset(regs: &mut Registers, mem: &mut dyn Memory) -> u16 {
    regs.set_flag(StatusFlags::INTERRUPT_DISABLE, true);
    regs.sp = regs.sp.wrapping_sub(3);
    regs.pc = mem.read_word(RESET_VECTOR);
    INTERRUPT_CYCLES
}
