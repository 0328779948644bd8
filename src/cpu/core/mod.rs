/*!
core::Cpu - public 6502 CPU facade.

Responsibilities
================
- Own the register file, pending-interrupt bits, the running cycle
  counter and the jam latch.
- `execute_next_instruction` runs one full step:
    trace hook -> dispatch -> OAM DMA stall (if the instruction wrote
    the DMA port) -> NMI/IRQ service.
  The returned cycle count covers all of it.
- `reset` performs the 7-cycle reset sequence and clears the jam latch.

Everything is synchronous; between two calls the CPU is always in a
resumable state.

Usage
=====
```rust,ignore
use arness_cpu::{Bus, Cartridge, Cpu};

let mut bus = Bus::new();
bus.attach_cartridge(Cartridge::from_ines_bytes(&rom)?);
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
let cycles = cpu.execute_next_instruction(&mut bus)?;
```
*/

use crate::bus::dma;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::dispatch;
use crate::cpu::error::CpuError;
use crate::cpu::interrupts::{self, InterruptState};
use crate::cpu::regs::Registers;
use crate::cpu::table;
use crate::memory::Memory;
use crate::trace::{NullTracer, TraceLine, Tracer};

pub struct Cpu {
    regs: Registers,
    interrupts: InterruptState,
    cycles: u64,
    jammed: Option<CpuError>,
    tracer: Box<dyn Tracer>,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("interrupts", &self.interrupts)
            .field("cycles", &self.cycles)
            .field("jammed", &self.jammed)
            .finish_non_exhaustive()
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Construct a CPU with power-up register values and no tracing.
    pub fn new() -> Self {
        Self::with_tracer(Box::new(NullTracer))
    }

    pub fn with_tracer(tracer: Box<dyn Tracer>) -> Self {
        Self {
            regs: Registers::new(),
            interrupts: InterruptState::default(),
            cycles: 0,
            jammed: None,
            tracer,
        }
    }

    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.tracer = tracer;
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Direct register access for test harnesses and debuggers.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn interrupts(&self) -> InterruptState {
        self.interrupts
    }

    /// Total CPU cycles since construction (reset, DMA and interrupts included).
    pub fn clock_cycle_count(&self) -> u64 {
        self.cycles
    }

    pub fn is_jammed(&self) -> bool {
        self.jammed.is_some()
    }

    // ---------------------------------------------------------------------
    // Interrupt lines
    // ---------------------------------------------------------------------

    pub fn trigger_nmi(&mut self) {
        self.interrupts.trigger_nmi();
    }

    pub fn trigger_irq(&mut self) {
        self.interrupts.trigger_irq();
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Reset: I set, SP -= 3, pending interrupts dropped, PC from $FFFC.
    pub fn reset(&mut self, mem: &mut dyn Memory) -> u16 {
        self.interrupts.clear();
        self.jammed = None;
        let cycles = interrupts::reset(&mut self.regs, mem);
        self.cycles += cycles as u64;
        log::debug!(target: "cpu", "reset: PC={:04X} SP={:02X}", self.regs.pc, self.regs.sp);
        cycles
    }

    /// Run one instruction plus any DMA stall and interrupt entry it triggers.
    pub fn execute_next_instruction(&mut self, mem: &mut dyn Memory) -> Result<u16, CpuError> {
        if let Some(err) = self.jammed {
            return Err(err);
        }

        if self.tracer.enabled() {
            let line = self.trace_line(mem);
            self.tracer.trace(&line);
        }

        let mut cycles = match dispatch::execute_instruction(&mut self.regs, mem) {
            Ok(c) => c,
            Err(err) => {
                log::warn!(target: "cpu", "{err}");
                self.jammed = Some(err);
                return Err(err);
            }
        };
        self.cycles += cycles as u64;

        if let Some(page) = mem.take_oam_dma_request() {
            let stall = dma::perform_oam_dma(mem, page, self.cycles);
            self.cycles += stall as u64;
            cycles += stall;
        }

        if let Some(kind) = self.interrupts.take_serviceable(self.regs.status) {
            let entry = interrupts::service(&mut self.regs, mem, kind);
            self.cycles += entry as u64;
            cycles += entry;
        }

        Ok(cycles)
    }

    fn trace_line(&self, mem: &mut dyn Memory) -> TraceLine {
        let pc = self.regs.pc;
        let opcode = mem.peek(pc);
        let info = table::opcode_info(opcode);
        let len = AddressingMode::operand_len(info.mode);
        let mut operand = [0u8; 2];
        for (i, slot) in operand.iter_mut().enumerate().take(len as usize) {
            *slot = mem.peek(pc.wrapping_add(1 + i as u16));
        }
        TraceLine {
            pc,
            opcode,
            operand,
            operand_len: len as u8,
            mnemonic: info.mnemonic,
            registers: self.regs,
            cycles: self.cycles,
        }
    }
}
