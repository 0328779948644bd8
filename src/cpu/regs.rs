/*!
regs.rs - 6502 register file.

`Registers` is a plain value type: PC, A, X, Y, SP and the status byte.
All 8-bit arithmetic wraps modulo 256 and PC wraps modulo 65536; helpers
here use wrapping operations exclusively so no caller has to remember.

Stack helpers live in `execute` because they need the bus; everything in
this file is pure.
*/

use crate::cpu::flags::StatusFlags;

/// Base address of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: StatusFlags,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Power-up values before the first reset. Reset then lands SP on $FD.
    pub fn new() -> Self {
        Self {
            pc: 0,
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            status: StatusFlags::default(),
        }
    }

    #[inline]
    pub fn set_flag(&mut self, flag: StatusFlags, on: bool) {
        self.status.set(flag, on);
    }

    #[inline]
    pub fn read_flag(&self, flag: StatusFlags) -> bool {
        self.status.contains(flag)
    }

    #[inline]
    pub fn increment_pc(&mut self, by: u16) {
        self.pc = self.pc.wrapping_add(by);
    }

    /// Z = (value == 0), N = bit 7 of value.
    #[inline]
    pub fn update_zero_negative(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }

    /// Raw status byte as seen by a debugger (bit 5 set, B clear).
    #[inline]
    pub fn status_byte(&self) -> u8 {
        (self.status | StatusFlags::UNUSED).bits()
    }

    /// Absolute address of the current stack slot.
    #[inline]
    pub fn stack_addr(&self) -> u16 {
        STACK_PAGE | self.sp as u16
    }
}
