/*!
table.rs - 256-entry opcode dispatch table.

Design
======
- Table: `[OpcodeEntry; 256]`, built once at compile time.
- Each entry is a mnemonic plus an [`OpcodeBehavior`]: the calling
  convention tag and a plain function pointer into `execute.rs`.
- The addressing mode and timing for the same opcode live in their own
  static tables (`addressing::MODES`, `cycles::TIMINGS`); all three are
  indexed by the raw opcode byte.
- Every slot is populated. The twelve JAM opcodes map to `Halt`.

Unofficial mnemonics follow the names commonly used by nestest logs
(SLO, RLA, SRE, RRA, SAX, LAX, DCP, ISC, ANC, ALR, ARR, XAA, AXS, AHX,
SHY, SHX, TAS, LAS) so trace output can be diffed directly.
*/

use crate::cpu::addressing::AddressingMode;
use crate::cpu::cycles::InstructionTiming;
use crate::cpu::execute::*;
use crate::cpu::regs::Registers;
use crate::memory::Memory;

pub type NoOperandFn = fn(&mut Registers, &mut dyn Memory);
pub type MutateFn = fn(&mut Registers, u8) -> u8;
pub type ReadFn = fn(&mut Registers, u8);
pub type AddressFn = fn(&mut Registers, &mut dyn Memory, u16);
pub type BranchFn = fn(&Registers) -> bool;

#[derive(Clone, Copy)]
pub enum OpcodeBehavior {
    /// Implied work. Operand bytes (NOP variants) are consumed and discarded.
    NoOperand(NoOperandFn),
    /// Read-modify-write on the accumulator or a memory byte.
    MutatesAddressedByte(MutateFn),
    /// Consumes the operand value (immediate or loaded from memory).
    ReadsAddressedByte(ReadFn),
    /// Consumes the effective address itself (stores, JMP, JSR).
    ReadsAddressedAddress(AddressFn),
    /// Returns whether the branch is taken.
    ConditionalBranch(BranchFn),
    /// STP/KIL/JAM.
    Halt,
}

impl std::fmt::Debug for OpcodeBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            OpcodeBehavior::NoOperand(_) => "NoOperand",
            OpcodeBehavior::MutatesAddressedByte(_) => "MutatesAddressedByte",
            OpcodeBehavior::ReadsAddressedByte(_) => "ReadsAddressedByte",
            OpcodeBehavior::ReadsAddressedAddress(_) => "ReadsAddressedAddress",
            OpcodeBehavior::ConditionalBranch(_) => "ConditionalBranch",
            OpcodeBehavior::Halt => "Halt",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub behavior: OpcodeBehavior,
}

/// Everything known statically about one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub timing: InstructionTiming,
}

#[inline]
pub fn entry(opcode: u8) -> &'static OpcodeEntry {
    &DISPATCH[opcode as usize]
}

pub fn opcode_info(opcode: u8) -> OpcodeInfo {
    OpcodeInfo {
        opcode,
        mnemonic: DISPATCH[opcode as usize].mnemonic,
        mode: AddressingMode::of(opcode),
        timing: *InstructionTiming::of(opcode),
    }
}

// ------------------------------------------
// Entry constructors
// ------------------------------------------

const fn imp(mnemonic: &'static str, f: NoOperandFn) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        behavior: OpcodeBehavior::NoOperand(f),
    }
}

const fn rmw(mnemonic: &'static str, f: MutateFn) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        behavior: OpcodeBehavior::MutatesAddressedByte(f),
    }
}

const fn rd(mnemonic: &'static str, f: ReadFn) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        behavior: OpcodeBehavior::ReadsAddressedByte(f),
    }
}

const fn at(mnemonic: &'static str, f: AddressFn) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        behavior: OpcodeBehavior::ReadsAddressedAddress(f),
    }
}

const fn br(mnemonic: &'static str, f: BranchFn) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        behavior: OpcodeBehavior::ConditionalBranch(f),
    }
}

const JAM: OpcodeEntry = OpcodeEntry {
    mnemonic: "JAM",
    behavior: OpcodeBehavior::Halt,
};

/// Assign one entry to several opcode slots.
macro_rules! fill {
    ($t:ident, $e:expr, [$($op:expr),+ $(,)?]) => {
        $( $t[$op] = $e; )+
    };
}

// ------------------------------------------
// Dispatch Table (256 entries)
// ------------------------------------------

static DISPATCH: [OpcodeEntry; 256] = {
    let mut t: [OpcodeEntry; 256] = [JAM; 256];

    // Control flow
    t[0x00] = imp("BRK", brk);
    t[0x20] = at("JSR", jsr);
    t[0x40] = imp("RTI", rti);
    t[0x60] = imp("RTS", rts);
    fill!(t, at("JMP", jmp), [0x4C, 0x6C]);

    // Branches
    t[0x10] = br("BPL", bpl);
    t[0x30] = br("BMI", bmi);
    t[0x50] = br("BVC", bvc);
    t[0x70] = br("BVS", bvs);
    t[0x90] = br("BCC", bcc);
    t[0xB0] = br("BCS", bcs);
    t[0xD0] = br("BNE", bne);
    t[0xF0] = br("BEQ", beq);

    // Stack
    t[0x08] = imp("PHP", php);
    t[0x28] = imp("PLP", plp);
    t[0x48] = imp("PHA", pha);
    t[0x68] = imp("PLA", pla);

    // Flags
    t[0x18] = imp("CLC", clc);
    t[0x38] = imp("SEC", sec);
    t[0x58] = imp("CLI", cli);
    t[0x78] = imp("SEI", sei);
    t[0xB8] = imp("CLV", clv);
    t[0xD8] = imp("CLD", cld);
    t[0xF8] = imp("SED", sed);

    // Transfers / index arithmetic
    t[0xAA] = imp("TAX", tax);
    t[0xA8] = imp("TAY", tay);
    t[0x8A] = imp("TXA", txa);
    t[0x98] = imp("TYA", tya);
    t[0xBA] = imp("TSX", tsx);
    t[0x9A] = imp("TXS", txs);
    t[0xE8] = imp("INX", inx);
    t[0xC8] = imp("INY", iny);
    t[0xCA] = imp("DEX", dex);
    t[0x88] = imp("DEY", dey);

    // NOP: official, single-byte illegal, and operand-consuming variants
    fill!(
        t,
        imp("NOP", nop),
        [
            0xEA, 0x1A, 0x3A, 0x5A, 0x7A, 0xDA, 0xFA, // implied
            0x80, 0x82, 0x89, 0xC2, 0xE2, // #imm
            0x04, 0x44, 0x64, // zp
            0x14, 0x34, 0x54, 0x74, 0xD4, 0xF4, // zp,X
            0x0C, // abs
            0x1C, 0x3C, 0x5C, 0x7C, 0xDC, 0xFC, // abs,X
        ]
    );

    // Loads
    fill!(t, rd("LDA", lda), [0xA9, 0xA5, 0xB5, 0xAD, 0xBD, 0xB9, 0xA1, 0xB1]);
    fill!(t, rd("LDX", ldx), [0xA2, 0xA6, 0xB6, 0xAE, 0xBE]);
    fill!(t, rd("LDY", ldy), [0xA0, 0xA4, 0xB4, 0xAC, 0xBC]);

    // Stores
    fill!(t, at("STA", sta), [0x85, 0x95, 0x8D, 0x9D, 0x99, 0x81, 0x91]);
    fill!(t, at("STX", stx), [0x86, 0x96, 0x8E]);
    fill!(t, at("STY", sty), [0x84, 0x94, 0x8C]);

    // Logic / arithmetic
    fill!(t, rd("ORA", ora), [0x09, 0x05, 0x15, 0x0D, 0x1D, 0x19, 0x01, 0x11]);
    fill!(t, rd("AND", and), [0x29, 0x25, 0x35, 0x2D, 0x3D, 0x39, 0x21, 0x31]);
    fill!(t, rd("EOR", eor), [0x49, 0x45, 0x55, 0x4D, 0x5D, 0x59, 0x41, 0x51]);
    fill!(t, rd("ADC", adc), [0x69, 0x65, 0x75, 0x6D, 0x7D, 0x79, 0x61, 0x71]);
    fill!(t, rd("SBC", sbc), [0xE9, 0xE5, 0xF5, 0xED, 0xFD, 0xF9, 0xE1, 0xF1, 0xEB]);
    fill!(t, rd("CMP", cmp), [0xC9, 0xC5, 0xD5, 0xCD, 0xDD, 0xD9, 0xC1, 0xD1]);
    fill!(t, rd("CPX", cpx), [0xE0, 0xE4, 0xEC]);
    fill!(t, rd("CPY", cpy), [0xC0, 0xC4, 0xCC]);
    fill!(t, rd("BIT", bit), [0x24, 0x2C]);

    // Read-modify-write
    fill!(t, rmw("ASL", asl), [0x0A, 0x06, 0x16, 0x0E, 0x1E]);
    fill!(t, rmw("LSR", lsr), [0x4A, 0x46, 0x56, 0x4E, 0x5E]);
    fill!(t, rmw("ROL", rol), [0x2A, 0x26, 0x36, 0x2E, 0x3E]);
    fill!(t, rmw("ROR", ror), [0x6A, 0x66, 0x76, 0x6E, 0x7E]);
    fill!(t, rmw("INC", inc), [0xE6, 0xF6, 0xEE, 0xFE]);
    fill!(t, rmw("DEC", dec), [0xC6, 0xD6, 0xCE, 0xDE]);

    // Illegal read-modify-write composites
    fill!(t, rmw("SLO", slo), [0x07, 0x17, 0x0F, 0x1F, 0x1B, 0x03, 0x13]);
    fill!(t, rmw("RLA", rla), [0x27, 0x37, 0x2F, 0x3F, 0x3B, 0x23, 0x33]);
    fill!(t, rmw("SRE", sre), [0x47, 0x57, 0x4F, 0x5F, 0x5B, 0x43, 0x53]);
    fill!(t, rmw("RRA", rra), [0x67, 0x77, 0x6F, 0x7F, 0x7B, 0x63, 0x73]);
    fill!(t, rmw("DCP", dcp), [0xC7, 0xD7, 0xCF, 0xDF, 0xDB, 0xC3, 0xD3]);
    fill!(t, rmw("ISC", isc), [0xE7, 0xF7, 0xEF, 0xFF, 0xFB, 0xE3, 0xF3]);

    // Illegal reads
    fill!(t, rd("LAX", lax), [0xA7, 0xB7, 0xAF, 0xBF, 0xA3, 0xB3]);
    t[0xAB] = rd("LAX", lxa);
    fill!(t, rd("ANC", anc), [0x0B, 0x2B]);
    t[0x4B] = rd("ALR", alr);
    t[0x6B] = rd("ARR", arr);
    t[0x8B] = rd("XAA", xaa);
    t[0xCB] = rd("AXS", axs);
    t[0xBB] = rd("LAS", las);

    // Illegal stores
    fill!(t, at("SAX", sax), [0x87, 0x97, 0x8F, 0x83]);
    fill!(t, at("AHX", ahx), [0x93, 0x9F]);
    t[0x9C] = at("SHY", shy);
    t[0x9E] = at("SHX", shx);
    t[0x9B] = at("TAS", tas);

    t
};
