use thiserror::Error;

/// Faults raised by the CPU core.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// A STP/KIL/JAM opcode was executed. The CPU stays halted until reset.
    #[error("CPU jammed by opcode {opcode:02X} at {pc:04X}")]
    Jammed { opcode: u8, pc: u16 },
}
