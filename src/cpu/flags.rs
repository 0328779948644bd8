/*!
flags.rs - 6502 processor status register (P).

Bit layout (7..0): N V U B D I Z C

- `UNUSED` (bit 5) has no latch on real silicon and always reads back as 1.
  The live register keeps it set; every byte pushed to the stack has it set.
- `BREAK` (bit 4) likewise has no latch. It only exists in the pushed copy:
  set by PHP/BRK, clear for IRQ/NMI. Pulling status (PLP/RTI) drops it.
*/

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        StatusFlags::UNUSED | StatusFlags::INTERRUPT_DISABLE
    }
}

impl StatusFlags {
    /// Byte image pushed to the stack. `brk` selects the B bit (PHP/BRK vs IRQ/NMI).
    #[inline]
    pub fn to_stack_byte(self, brk: bool) -> u8 {
        let mut pushed = self | StatusFlags::UNUSED;
        pushed.set(StatusFlags::BREAK, brk);
        pushed.bits()
    }

    /// Live status restored from a stack byte (PLP/RTI).
    #[inline]
    pub fn from_stack_byte(value: u8) -> Self {
        (StatusFlags::from_bits_retain(value) | StatusFlags::UNUSED) - StatusFlags::BREAK
    }

    /// Carry as 0/1 for arithmetic.
    #[inline]
    pub fn carry_bit(self) -> u8 {
        self.contains(StatusFlags::CARRY) as u8
    }
}
