/*!
trace.rs - per-instruction tracing hooks.

The CPU owns a boxed [`Tracer`] and calls it before executing each
instruction (only if `enabled()` returns true, so the default
[`NullTracer`] costs nothing). Tracers receive a [`TraceLine`] whose
`Display` output follows the nestest log layout:

```text
C000  4C F5 C5  JMP  A:00 X:00 Y:00 P:24 SP:FD CYC:7
```

Implementations
===============
- `NullTracer`   - discards everything (default).
- `LogTracer`    - forwards each line to `log::trace!` (target `cpu::trace`).
- `BufferTracer` - appends lines to a shared buffer; clones share storage,
                   so a test can keep one handle and give the CPU another.
*/

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cpu::regs::Registers;

/// Snapshot of the machine immediately before an instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLine {
    pub pc: u16,
    pub opcode: u8,
    pub operand: [u8; 2],
    pub operand_len: u8,
    pub mnemonic: &'static str,
    pub registers: Registers,
    pub cycles: u64,
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}  {:02X}", self.pc, self.opcode)?;
        for i in 0..2 {
            if i < self.operand_len as usize {
                write!(f, " {:02X}", self.operand[i])?;
            } else {
                f.write_str("   ")?;
            }
        }
        let r = &self.registers;
        write!(
            f,
            "  {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.mnemonic,
            r.a,
            r.x,
            r.y,
            r.status_byte(),
            r.sp,
            self.cycles
        )
    }
}

pub trait Tracer {
    /// When false the CPU skips building trace lines entirely.
    fn enabled(&self) -> bool {
        true
    }

    fn trace(&mut self, line: &TraceLine);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn trace(&mut self, _line: &TraceLine) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn enabled(&self) -> bool {
        log::log_enabled!(target: "cpu::trace", log::Level::Trace)
    }

    fn trace(&mut self, line: &TraceLine) {
        log::trace!(target: "cpu::trace", "{line}");
    }
}

#[derive(Debug, Default, Clone)]
pub struct BufferTracer {
    lines: Rc<RefCell<Vec<String>>>,
}

impl BufferTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl Tracer for BufferTracer {
    fn trace(&mut self, line: &TraceLine) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
