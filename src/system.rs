/*!
system.rs - CPU + bus driver and a bounded run harness.

`System::step` executes one instruction, advances the video unit by three
dots per consumed CPU cycle and forwards any vblank NMI to the CPU, where it
is serviced after the next instruction.

`System::run` repeats `step` until one of the [`RunLimits`] trips. The opcode
stop is checked against the next opcode before it executes, so the
registers are left exactly at the stop instruction.

```rust,ignore
let cart = Cartridge::from_ines_file("game.nes")?;
let mut system = System::new(cart);
system.reset();
let outcome = system.run(&RunLimits::default().with_max_instructions(10_000))?;
```
*/

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::{Cpu, CpuError};
use crate::memory::Memory;

/// Why [`System::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CycleLimit,
    InstructionLimit,
    /// The next instruction to execute was this opcode.
    Opcode(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub stop: StopReason,
    /// Instructions executed by this run.
    pub instructions: u64,
    /// CPU cycles consumed by this run.
    pub cycles: u64,
}

/// Stop conditions for [`System::run`]. With no limit set the run only ends
/// on a jam.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLimits {
    pub max_cycles: Option<u64>,
    pub max_instructions: Option<u64>,
    pub stop_on_opcodes: Vec<u8>,
}

impl RunLimits {
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn with_max_instructions(mut self, instructions: u64) -> Self {
        self.max_instructions = Some(instructions);
        self
    }

    pub fn stop_on_opcode(mut self, opcode: u8) -> Self {
        self.stop_on_opcodes.push(opcode);
        self
    }
}

#[derive(Debug)]
pub struct System {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl System {
    /// Bus with a PPU stub and `cartridge` attached; call [`reset`](Self::reset) before stepping.
    pub fn new(cartridge: Cartridge) -> Self {
        let mut bus = Bus::new();
        bus.attach_cartridge(cartridge);
        Self::with_bus(bus)
    }

    pub fn with_bus(bus: Bus) -> Self {
        Self {
            cpu: Cpu::new(),
            bus,
        }
    }

    pub fn reset(&mut self) -> u16 {
        if let Some(cart) = self.bus.cartridge_mut() {
            cart.reset();
        }
        let cycles = self.cpu.reset(&mut self.bus);
        self.bus.step_video(cycles as u32);
        self.bus.take_nmi();
        cycles
    }

    /// Execute one instruction and keep the video unit in lockstep.
    pub fn step(&mut self) -> Result<u16, CpuError> {
        let cycles = self.cpu.execute_next_instruction(&mut self.bus)?;
        self.bus.step_video(cycles as u32);
        if self.bus.take_nmi() {
            self.cpu.trigger_nmi();
        }
        Ok(cycles)
    }

    pub fn run(&mut self, limits: &RunLimits) -> Result<RunOutcome, CpuError> {
        let mut instructions = 0u64;
        let mut cycles = 0u64;
        let stop = loop {
            if limits.max_instructions.is_some_and(|max| instructions >= max) {
                break StopReason::InstructionLimit;
            }
            if limits.max_cycles.is_some_and(|max| cycles >= max) {
                break StopReason::CycleLimit;
            }
            if !limits.stop_on_opcodes.is_empty() {
                let pc = self.cpu.registers().pc;
                let next = self.bus.peek(pc);
                if limits.stop_on_opcodes.contains(&next) {
                    break StopReason::Opcode(next);
                }
            }
            cycles += self.step()? as u64;
            instructions += 1;
        };
        log::debug!(
            target: "cpu",
            "run stopped: {stop:?} after {instructions} instructions, {cycles} cycles"
        );
        Ok(RunOutcome {
            stop,
            instructions,
            cycles,
        })
    }
}
