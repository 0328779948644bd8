/*!
cpu::mod - Public façade for the 6502 CPU core.

Layout:

```text
flags.rs       - `StatusFlags` bit set and stack-byte conversions.
regs.rs        - Register file (A, X, Y, SP, PC, P).
addressing.rs  - Addressing modes and operand resolution (page-cross, JMP bug).
cycles.rs      - Per-opcode timing table and stability classification.
execute.rs     - Instruction semantics (ALU, stack, RMW, illegal combos).
table.rs       - 256-entry dispatch table: mnemonic + behavior per opcode.
dispatch/      - Runs one decoded instruction and charges its cycles.
interrupts.rs  - NMI / IRQ / BRK / reset sequences and pending lines.
core/          - `Cpu` facade: step, reset, tracing, DMA stall hand-off.
error.rs       - `CpuError`.
```

Usage:
```rust,ignore
use arness_cpu::{Bus, Cpu};

let mut bus = Bus::new();
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
let cycles = cpu.execute_next_instruction(&mut bus)?;
```
*/

pub mod addressing;
pub mod core;
pub mod cycles;
pub(crate) mod dispatch;
pub mod error;
pub(crate) mod execute;
pub mod flags;
pub mod interrupts;
pub mod regs;
pub mod table;

pub use crate::cpu::addressing::AddressingMode;
pub use crate::cpu::core::Cpu;
pub use crate::cpu::cycles::{InstructionTiming, Stability};
pub use crate::cpu::error::CpuError;
pub use crate::cpu::flags::StatusFlags;
pub use crate::cpu::interrupts::{Interrupt, InterruptState};
pub use crate::cpu::regs::Registers;
pub use crate::cpu::table::{OpcodeInfo, opcode_info};
