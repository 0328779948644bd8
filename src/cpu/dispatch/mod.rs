/*!
dispatch - fetch / decode / execute for one instruction.

Overview
========
1. Fetch the opcode at PC and advance PC.
2. Look up mode, timing and behavior for the opcode.
3. Run the behavior under its calling convention:
   - NoOperand: resolve (and read) any operand so PC and bus activity
     match hardware, then call the function.
   - MutatesAddressedByte: accumulator in place, or exactly one read and
     one write of the addressed byte.
   - ReadsAddressedByte: immediate value or one read of the address.
   - ReadsAddressedAddress: the effective address is handed over.
   - ConditionalBranch: PC moves to the target only when taken; the
     page-cross penalty only counts for a taken branch.
   - Halt: the CPU jams.
4. Charge cycles via the timing table.

Interrupt servicing and OAM DMA happen in `core` after this returns.
*/

use crate::cpu::addressing::{self, AddressingMode, Operand, fetch_byte};
use crate::cpu::cycles::InstructionTiming;
use crate::cpu::error::CpuError;
use crate::cpu::execute::{OperandLocation, read_modify_write};
use crate::cpu::regs::Registers;
use crate::cpu::table::{self, OpcodeBehavior};
use crate::memory::Memory;

/// Execute the instruction at PC. Returns the cycles it took.
pub(crate) fn execute_instruction(
    regs: &mut Registers,
    mem: &mut dyn Memory,
) -> Result<u16, CpuError> {
    let pc = regs.pc;
    let opcode = fetch_byte(regs, mem);
    let mode = AddressingMode::of(opcode);
    let timing = InstructionTiming::of(opcode);

    let (page_crossed, branch_taken) = match table::entry(opcode).behavior {
        OpcodeBehavior::Halt => {
            regs.pc = pc;
            return Err(CpuError::Jammed { opcode, pc });
        }
        OpcodeBehavior::NoOperand(op) => {
            let resolved = addressing::resolve(mode, regs, mem);
            if let Operand::Address(addr) = resolved.operand {
                // Operand-carrying NOPs still perform their read.
                let _ = mem.read(addr);
            }
            op(regs, mem);
            (resolved.page_crossed, false)
        }
        OpcodeBehavior::MutatesAddressedByte(op) => {
            let resolved = addressing::resolve(mode, regs, mem);
            let location = match resolved.operand {
                Operand::Address(addr) => OperandLocation::Memory(addr),
                _ => OperandLocation::Accumulator,
            };
            read_modify_write(regs, mem, location, op);
            (resolved.page_crossed, false)
        }
        OpcodeBehavior::ReadsAddressedByte(op) => {
            let resolved = addressing::resolve(mode, regs, mem);
            let value = match resolved.operand {
                Operand::Immediate(v) => v,
                Operand::Address(addr) => mem.read(addr),
                Operand::Accumulator | Operand::Implied => regs.a,
            };
            op(regs, value);
            (resolved.page_crossed, false)
        }
        OpcodeBehavior::ReadsAddressedAddress(op) => {
            let resolved = addressing::resolve(mode, regs, mem);
            let addr = resolved.operand.address().unwrap_or(regs.pc);
            op(regs, mem, addr);
            (resolved.page_crossed, false)
        }
        OpcodeBehavior::ConditionalBranch(cond) => {
            let resolved = addressing::resolve(mode, regs, mem);
            if cond(regs) {
                if let Some(target) = resolved.operand.address() {
                    regs.pc = target;
                }
                (resolved.page_crossed, true)
            } else {
                (false, false)
            }
        }
    };

    timing
        .cycle_count(page_crossed, branch_taken)
        .ok_or(CpuError::Jammed { opcode, pc })
}
