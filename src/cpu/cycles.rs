/*!
cycles.rs - per-opcode timing model.

Every opcode owns an [`InstructionTiming`]: base cycles (opcode fetch
included), whether an indexed page cross adds a cycle, whether a taken
branch adds a cycle, and a [`Stability`] class.

`cycle_count(page_crossed, branch_taken)` =
    base
  + (adds_page_cross_cycle  && page_crossed)
  + (adds_branch_taken_cycle && branch_taken)

`Fatal` entries (the twelve JAM opcodes) have no cycle count; executing
one stops the CPU.

Stores and read-modify-write instructions never take the page-cross
penalty; their base count already includes the fix-up cycle.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    /// Documented opcode.
    Stable,
    /// Undocumented but deterministic on every known chip.
    IllegalStable,
    /// Result depends on bus capacitance or timing (SHX/SHY/AHX/TAS/LAS).
    IllegalUnstable,
    /// Result depends on a chip-specific magic constant (XAA, LAX #imm).
    IllegalHighlyUnstable,
    /// Locks up the processor (STP/KIL/JAM).
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionTiming {
    pub base_cycles: u16,
    pub adds_page_cross_cycle: bool,
    pub adds_branch_taken_cycle: bool,
    pub stability: Stability,
}

impl InstructionTiming {
    #[inline]
    pub fn of(opcode: u8) -> &'static InstructionTiming {
        &TIMINGS[opcode as usize]
    }

    /// Cycles consumed, or `None` for an opcode that jams the CPU.
    #[inline]
    pub fn cycle_count(&self, page_crossed: bool, branch_taken: bool) -> Option<u16> {
        if self.stability == Stability::Fatal {
            return None;
        }
        Some(
            self.base_cycles
                + (self.adds_page_cross_cycle && page_crossed) as u16
                + (self.adds_branch_taken_cycle && branch_taken) as u16,
        )
    }
}

#[rustfmt::skip]
const BASE_CYCLES: [u8; 256] = [
//  0  1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
    7, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6, // 0x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 1x
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6, // 2x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 3x
    6, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6, // 4x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 5x
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6, // 6x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 7x
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4, // 8x
    2, 6, 0, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5, // 9x
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4, // Ax
    2, 5, 0, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4, // Bx
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6, // Cx
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // Dx
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6, // Ex
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // Fx
];

const fn is_branch(op: u8) -> bool {
    op & 0x1F == 0x10
}

const fn adds_page_cross(op: u8) -> bool {
    matches!(
        op,
        // ORA AND EOR ADC LDA CMP SBC: (d),Y  a,Y  a,X
        0x11 | 0x19 | 0x1D | 0x31 | 0x39 | 0x3D | 0x51 | 0x59 | 0x5D | 0x71 | 0x79 | 0x7D
            | 0xB1 | 0xB9 | 0xBD | 0xD1 | 0xD9 | 0xDD | 0xF1 | 0xF9 | 0xFD
            // LDY a,X  LDX a,Y
            | 0xBC | 0xBE
            // LAX (d),Y  LAX a,Y  LAS a,Y
            | 0xB3 | 0xBF | 0xBB
            // NOP a,X
            | 0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC
    )
}

const fn stability(op: u8) -> Stability {
    match op {
        0x02 | 0x12 | 0x22 | 0x32 | 0x42 | 0x52 | 0x62 | 0x72 | 0x92 | 0xB2 | 0xD2 | 0xF2 => {
            Stability::Fatal
        }
        0x93 | 0x9F | 0x9E | 0x9C | 0x9B | 0xBB => Stability::IllegalUnstable,
        0x8B | 0xAB => Stability::IllegalHighlyUnstable,
        _ if is_documented(op) => Stability::Stable,
        _ => Stability::IllegalStable,
    }
}

/// The 151 opcodes in the official instruction set.
pub const fn is_documented(op: u8) -> bool {
    match op & 0x03 {
        // Every xxxxxx11 slot is undocumented.
        0x03 => false,
        0x02 => match op {
            0xA2 => true,
            _ if op & 0x1C == 0x08 => matches!(op, 0x0A | 0x2A | 0x4A | 0x6A | 0x8A | 0xAA | 0xCA | 0xEA),
            _ if op & 0x1C == 0x18 => matches!(op, 0x9A | 0xBA),
            _ if op & 0x1C == 0x00 || op & 0x1C == 0x10 => false,
            // zp / abs / zp,X / abs,X shift column
            _ => !matches!(op, 0x9E),
        },
        0x01 => op != 0x89,
        _ => matches!(
            op,
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x24 | 0x28 | 0x2C | 0x30 | 0x38 | 0x40 | 0x48
                | 0x4C | 0x50 | 0x58 | 0x60 | 0x68 | 0x6C | 0x70 | 0x78 | 0x84 | 0x88 | 0x8C
                | 0x90 | 0x94 | 0x98 | 0xA0 | 0xA4 | 0xA8 | 0xAC | 0xB0 | 0xB4 | 0xB8 | 0xBC
                | 0xC0 | 0xC4 | 0xC8 | 0xCC | 0xD0 | 0xD8 | 0xE0 | 0xE4 | 0xE8 | 0xEC | 0xF0
                | 0xF8
        ),
    }
}

const fn build_timings() -> [InstructionTiming; 256] {
    let mut table = [InstructionTiming {
        base_cycles: 0,
        adds_page_cross_cycle: false,
        adds_branch_taken_cycle: false,
        stability: Stability::Stable,
    }; 256];
    let mut i = 0;
    while i < 256 {
        let op = i as u8;
        let branch = is_branch(op);
        table[i] = InstructionTiming {
            base_cycles: BASE_CYCLES[i] as u16,
            adds_page_cross_cycle: branch || adds_page_cross(op),
            adds_branch_taken_cycle: branch,
            stability: stability(op),
        };
        i += 1;
    }
    table
}

static TIMINGS: [InstructionTiming; 256] = build_timings();
