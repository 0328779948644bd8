mod common;

use arness_cpu::cpu::{AddressingMode, Stability, opcode_info};
use arness_cpu::{Bus, Cartridge, Cpu, CpuError, Memory, StatusFlags};
use common::{IRQ, NMI, RESET, cpu_with_program, nrom_image, run};

// ---------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------

#[test]
fn zero_page_x_wraps_inside_page_zero() {
    // LDX #$01 ; LDA $FF,X
    let (mut cpu, mut mem) = cpu_with_program(&[0xA2, 0x01, 0xB5, 0xFF]);
    mem.write(0x0000, 0x42);
    mem.write(0x0100, 0x99);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(run(&mut cpu, &mut mem, 1), 4);
    assert_eq!(cpu.registers().a, 0x42);
}

#[test]
fn indexed_indirect_pointer_wraps_in_zero_page() {
    // LDX #$01 ; LDA ($FE,X)
    let (mut cpu, mut mem) = cpu_with_program(&[0xA2, 0x01, 0xA1, 0xFE]);
    mem.write(0x00FF, 0x34);
    mem.write(0x0000, 0x12);
    mem.write(0x0100, 0x56);
    mem.write(0x1234, 0x77);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(run(&mut cpu, &mut mem, 1), 6);
    assert_eq!(cpu.registers().a, 0x77);
}

#[test]
fn absolute_indexed_page_cross_costs_one_cycle() {
    for (index_load, opcode) in [(0xA2u8, 0xBDu8), (0xA0, 0xB9)] {
        // LDX/LDY #$01 ; LDA $12FF,X/Y ; LDA $1200,X/Y
        let program = [index_load, 0x01, opcode, 0xFF, 0x12, opcode, 0x00, 0x12];
        let (mut cpu, mut mem) = cpu_with_program(&program);
        run(&mut cpu, &mut mem, 1);
        assert_eq!(run(&mut cpu, &mut mem, 1), 5, "crossing, opcode {opcode:02X}");
        assert_eq!(run(&mut cpu, &mut mem, 1), 4, "same page, opcode {opcode:02X}");
    }
}

#[test]
fn stores_never_take_the_page_cross_cycle() {
    // LDX #$01 ; STA $12FF,X ; STA $1200,X
    let (mut cpu, mut mem) =
        cpu_with_program(&[0xA2, 0x01, 0x9D, 0xFF, 0x12, 0x9D, 0x00, 0x12]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
}

#[test]
fn indirect_indexed_page_cross() {
    // LDY #$01 ; LDA ($10),Y ; LDA ($20),Y
    let (mut cpu, mut mem) =
        cpu_with_program(&[0xA0, 0x01, 0xB1, 0x10, 0xB1, 0x20]);
    mem.load(0x0010, &[0xFF, 0x12]);
    mem.load(0x0020, &[0x00, 0x12]);
    mem.write(0x1300, 0xAB);
    mem.write(0x1201, 0xCD);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(run(&mut cpu, &mut mem, 1), 6);
    assert_eq!(cpu.registers().a, 0xAB);
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(cpu.registers().a, 0xCD);
}

#[test]
fn indirect_jmp_reproduces_page_boundary_bug() {
    // JMP ($10FF)
    let (mut cpu, mut mem) = cpu_with_program(&[0x6C, 0xFF, 0x10]);
    mem.write(0x10FF, 0x34);
    mem.write(0x1000, 0x12);
    mem.write(0x1100, 0x56);
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(cpu.registers().pc, 0x1234);
}

#[test]
fn branch_timing() {
    // BNE +2 (taken, same page) ; BEQ +0 (not taken)
    let (mut cpu, mut mem) = cpu_with_program(&[0xD0, 0x02, 0xEA, 0xEA, 0xF0, 0x00]);
    assert_eq!(run(&mut cpu, &mut mem, 1), 3);
    assert_eq!(cpu.registers().pc, 0x8004);
    assert_eq!(run(&mut cpu, &mut mem, 1), 2);
    assert_eq!(cpu.registers().pc, 0x8006);

    // BNE +$10 from $80FC: next PC $80FE, target $810E crosses a page.
    mem.load(0x80FC, &[0xD0, 0x10]);
    cpu.registers_mut().pc = 0x80FC;
    assert_eq!(run(&mut cpu, &mut mem, 1), 4);
    assert_eq!(cpu.registers().pc, 0x810E);

    // Backwards: BNE -4 from $8200 lands on $81FE.
    mem.load(0x8200, &[0xD0, 0xFC]);
    cpu.registers_mut().pc = 0x8200;
    assert_eq!(run(&mut cpu, &mut mem, 1), 4);
    assert_eq!(cpu.registers().pc, 0x81FE);
}

// ---------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------

#[test]
fn adc_signed_overflow() {
    // CLC ; LDA #$50 ; ADC #$50
    let (mut cpu, mut mem) = cpu_with_program(&[0x18, 0xA9, 0x50, 0x69, 0x50]);
    run(&mut cpu, &mut mem, 3);
    let r = cpu.registers();
    assert_eq!(r.a, 0xA0);
    assert!(r.read_flag(StatusFlags::OVERFLOW));
    assert!(r.read_flag(StatusFlags::NEGATIVE));
    assert!(!r.read_flag(StatusFlags::CARRY));
    assert!(!r.read_flag(StatusFlags::ZERO));
}

#[test]
fn sbc_with_carry_clear_borrows_one_more() {
    // SEC ; LDA #$10 ; SBC #$01
    let (mut cpu, mut mem) = cpu_with_program(&[0x38, 0xA9, 0x10, 0xE9, 0x01]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.registers().a, 0x0F);
    assert!(cpu.registers().read_flag(StatusFlags::CARRY));

    // CLC ; LDA #$10 ; SBC #$01
    let (mut cpu, mut mem) = cpu_with_program(&[0x18, 0xA9, 0x10, 0xE9, 0x01]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.registers().a, 0x0E);
    assert!(cpu.registers().read_flag(StatusFlags::CARRY));

    // SEC ; LDA #$00 ; SBC #$01 -> borrow out clears carry
    let (mut cpu, mut mem) = cpu_with_program(&[0x38, 0xA9, 0x00, 0xE9, 0x01]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.registers().a, 0xFF);
    assert!(!cpu.registers().read_flag(StatusFlags::CARRY));
    assert!(cpu.registers().read_flag(StatusFlags::NEGATIVE));
}

#[test]
fn decimal_flag_is_tracked_but_arithmetic_stays_binary() {
    // SED ; CLC ; LDA #$09 ; ADC #$01
    let (mut cpu, mut mem) = cpu_with_program(&[0xF8, 0x18, 0xA9, 0x09, 0x69, 0x01]);
    run(&mut cpu, &mut mem, 4);
    assert!(cpu.registers().read_flag(StatusFlags::DECIMAL));
    assert_eq!(cpu.registers().a, 0x0A);
}

#[test]
fn compare_sets_carry_zero_negative() {
    // LDA #$40 ; CMP #$40 ; CMP #$41
    let (mut cpu, mut mem) = cpu_with_program(&[0xA9, 0x40, 0xC9, 0x40, 0xC9, 0x41]);
    run(&mut cpu, &mut mem, 2);
    let r = *cpu.registers();
    assert!(r.read_flag(StatusFlags::CARRY));
    assert!(r.read_flag(StatusFlags::ZERO));
    run(&mut cpu, &mut mem, 1);
    let r = *cpu.registers();
    assert!(!r.read_flag(StatusFlags::CARRY));
    assert!(!r.read_flag(StatusFlags::ZERO));
    assert!(r.read_flag(StatusFlags::NEGATIVE));
}

#[test]
fn read_modify_write_on_memory_and_accumulator() {
    // LDA #$81 ; ASL A ; ROL $10 ; LSR $11
    let (mut cpu, mut mem) =
        cpu_with_program(&[0xA9, 0x81, 0x0A, 0x26, 0x10, 0x46, 0x11]);
    mem.write(0x0010, 0x40);
    mem.write(0x0011, 0x03);
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.registers().a, 0x02);
    assert!(cpu.registers().read_flag(StatusFlags::CARRY));
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(mem.peek(0x0010), 0x81);
    assert!(!cpu.registers().read_flag(StatusFlags::CARRY));
    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem.peek(0x0011), 0x01);
    assert!(cpu.registers().read_flag(StatusFlags::CARRY));
}

// ---------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------

#[test]
fn stack_push_wraps_from_zero() {
    // LDA #$77 ; PHA ; PLA
    let (mut cpu, mut mem) = cpu_with_program(&[0xA9, 0x77, 0x48, 0x68]);
    run(&mut cpu, &mut mem, 1);
    cpu.registers_mut().sp = 0x00;
    assert_eq!(run(&mut cpu, &mut mem, 1), 3);
    assert_eq!(mem.peek(0x0100), 0x77);
    assert_eq!(cpu.registers().sp, 0xFF);

    cpu.registers_mut().a = 0;
    assert_eq!(run(&mut cpu, &mut mem, 1), 4);
    assert_eq!(cpu.registers().a, 0x77);
    assert_eq!(cpu.registers().sp, 0x00);
}

#[test]
fn jsr_pushes_last_byte_and_rts_returns_after_it() {
    // JSR $8010 ; (at $8010) RTS
    let (mut cpu, mut mem) = cpu_with_program(&[0x20, 0x10, 0x80]);
    mem.write(0x8010, 0x60);
    assert_eq!(run(&mut cpu, &mut mem, 1), 6);
    assert_eq!(cpu.registers().pc, 0x8010);
    assert_eq!(mem.peek(0x01FD), 0x80);
    assert_eq!(mem.peek(0x01FC), 0x02);
    assert_eq!(run(&mut cpu, &mut mem, 1), 6);
    assert_eq!(cpu.registers().pc, 0x8003);
    assert_eq!(cpu.registers().sp, 0xFD);
}

#[test]
fn php_sets_break_on_stack_only_and_plp_drops_it() {
    // PHP ; PLP
    let (mut cpu, mut mem) = cpu_with_program(&[0x08, 0x28]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem.peek(0x01FD), 0x34);
    assert!(!cpu.registers().read_flag(StatusFlags::BREAK));
    run(&mut cpu, &mut mem, 1);
    assert!(!cpu.registers().read_flag(StatusFlags::BREAK));
    assert!(cpu.registers().read_flag(StatusFlags::UNUSED));
}

// ---------------------------------------------------------------------
// Interrupts and reset
// ---------------------------------------------------------------------

#[test]
fn nmi_wins_over_irq_then_irq_follows() {
    // main: CLI ; NOP     NMI handler: CLI
    let (mut cpu, mut mem) = cpu_with_program(&[0x58, 0xEA]);
    mem.write(NMI, 0x58);
    mem.write(IRQ, 0xEA);

    run(&mut cpu, &mut mem, 1);
    cpu.trigger_nmi();
    cpu.trigger_irq();

    assert_eq!(run(&mut cpu, &mut mem, 1), 2 + 7);
    assert_eq!(cpu.registers().pc, NMI);
    assert!(cpu.registers().read_flag(StatusFlags::INTERRUPT_DISABLE));
    assert!(cpu.interrupts().irq_pending);
    assert_eq!(mem.peek(0x01FD), 0x80);
    assert_eq!(mem.peek(0x01FC), 0x02);
    assert_eq!(mem.peek(0x01FB) & 0x30, 0x20);

    // CLI in the handler lets the still-pending IRQ in.
    assert_eq!(run(&mut cpu, &mut mem, 1), 2 + 7);
    assert_eq!(cpu.registers().pc, IRQ);
    assert!(!cpu.interrupts().irq_pending);
}

#[test]
fn irq_waits_while_interrupt_disable_is_set() {
    // NOP ; NOP (I is set after reset)
    let (mut cpu, mut mem) = cpu_with_program(&[0xEA, 0xEA]);
    cpu.trigger_irq();
    assert_eq!(run(&mut cpu, &mut mem, 1), 2);
    assert_eq!(cpu.registers().pc, 0x8001);
    assert!(cpu.interrupts().irq_pending);
}

#[test]
fn reset_reloads_vector_and_clears_pending() {
    let (mut cpu, mut mem) = cpu_with_program(&[0x58, 0xEA]);
    run(&mut cpu, &mut mem, 1);
    cpu.registers_mut().sp = 0x50;
    cpu.trigger_nmi();
    cpu.trigger_irq();
    let before = cpu.clock_cycle_count();

    assert_eq!(cpu.reset(&mut mem), 7);
    let r = cpu.registers();
    assert_eq!(r.pc, RESET);
    assert_eq!(r.sp, 0x4D);
    assert!(r.read_flag(StatusFlags::INTERRUPT_DISABLE));
    assert!(!cpu.interrupts().nmi_pending);
    assert!(!cpu.interrupts().irq_pending);
    assert_eq!(cpu.clock_cycle_count(), before + 7);
    // no stack writes
    assert_eq!(mem.peek(0x0150), 0);
    assert_eq!(mem.peek(0x014F), 0);
}

#[test]
fn brk_then_rti_resumes_two_bytes_later() {
    // BRK ; padding       IRQ handler: RTI
    let (mut cpu, mut mem) = cpu_with_program(&[0x00, 0xFF]);
    mem.write(IRQ, 0x40);

    assert_eq!(run(&mut cpu, &mut mem, 1), 7);
    assert_eq!(cpu.registers().pc, IRQ);
    assert_ne!(mem.peek(0x01FB) & StatusFlags::BREAK.bits(), 0);
    assert!(!cpu.registers().read_flag(StatusFlags::BREAK));

    assert_eq!(run(&mut cpu, &mut mem, 1), 6);
    assert_eq!(cpu.registers().pc, RESET + 2);
    assert!(!cpu.registers().read_flag(StatusFlags::BREAK));
    assert_eq!(cpu.registers().sp, 0xFD);
}

// ---------------------------------------------------------------------
// Jams and illegal opcodes
// ---------------------------------------------------------------------

#[test]
fn every_jam_opcode_halts() {
    for op in [
        0x02u8, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
    ] {
        assert_eq!(opcode_info(op).timing.stability, Stability::Fatal);
        let (mut cpu, mut mem) = cpu_with_program(&[op]);
        let err = cpu.execute_next_instruction(&mut mem).unwrap_err();
        assert_eq!(err, CpuError::Jammed { opcode: op, pc: RESET });
        assert_eq!(cpu.registers().pc, RESET);
        assert_eq!(cpu.execute_next_instruction(&mut mem), Err(err));
    }
}

#[test]
fn stable_illegal_composites() {
    // LAX $10 ; SAX $11 ; DCP $12 ; ISC $13
    let (mut cpu, mut mem) =
        cpu_with_program(&[0xA7, 0x10, 0x87, 0x11, 0xC7, 0x12, 0xE7, 0x13]);
    mem.write(0x0010, 0x3C);
    mem.write(0x0012, 0x3D);
    mem.write(0x0013, 0x0F);

    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.registers().a, 0x3C);
    assert_eq!(cpu.registers().x, 0x3C);

    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem.peek(0x0011), 0x3C);

    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(mem.peek(0x0012), 0x3C);
    assert!(cpu.registers().read_flag(StatusFlags::ZERO));
    assert!(cpu.registers().read_flag(StatusFlags::CARRY));

    // ISC: M = $10, A = $3C - $10 - 0 = $2C
    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem.peek(0x0013), 0x10);
    assert_eq!(cpu.registers().a, 0x2C);
}

#[test]
fn unstable_opcodes_are_not_nops() {
    // LDA #$FF ; LDX #$0F ; XAA #$FF
    let (mut cpu, mut mem) = cpu_with_program(&[0xA9, 0xFF, 0xA2, 0x0F, 0x8B, 0xFF]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.registers().a, 0x0F);
    assert_eq!(opcode_info(0x8B).timing.stability, Stability::IllegalHighlyUnstable);

    // LDX #$FF ; LDY #$01 ; SHX $1200,Y
    let (mut cpu, mut mem) = cpu_with_program(&[0xA2, 0xFF, 0xA0, 0x01, 0x9E, 0x00, 0x12]);
    run(&mut cpu, &mut mem, 2);
    assert_eq!(run(&mut cpu, &mut mem, 1), 5);
    assert_eq!(mem.peek(0x1201), 0x13);
    assert_eq!(opcode_info(0x9E).timing.stability, Stability::IllegalUnstable);
}

#[test]
fn nop_variants_consume_their_operands() {
    // NOP $10 (3) ; NOP $1234,X (4) ; NOP #$00 (2) ; NOP
    let (mut cpu, mut mem) =
        cpu_with_program(&[0x04, 0x10, 0x3C, 0x34, 0x12, 0x80, 0x00, 0xEA]);
    assert_eq!(run(&mut cpu, &mut mem, 1), 3);
    assert_eq!(cpu.registers().pc, 0x8002);
    assert_eq!(run(&mut cpu, &mut mem, 1), 4);
    assert_eq!(cpu.registers().pc, 0x8005);
    assert_eq!(run(&mut cpu, &mut mem, 1), 2);
    assert_eq!(cpu.registers().pc, 0x8007);
}

#[test]
fn opcode_metadata_is_complete() {
    let mut documented = 0;
    for op in 0..=255u8 {
        let info = opcode_info(op);
        assert_eq!(info.opcode, op);
        assert!(!info.mnemonic.is_empty());
        if info.timing.stability == Stability::Stable {
            documented += 1;
        }
    }
    assert_eq!(documented, 151);
    assert_eq!(opcode_info(0x6C).mode, AddressingMode::Indirect);
    assert_eq!(opcode_info(0x6C).mnemonic, "JMP");
    assert_eq!(opcode_info(0xBD).timing.base_cycles, 4);
    assert!(opcode_info(0xBD).timing.adds_page_cross_cycle);
    assert!(!opcode_info(0x9D).timing.adds_page_cross_cycle);
}

// ---------------------------------------------------------------------
// OAM DMA through the real bus
// ---------------------------------------------------------------------

/// Run `prefix` (`prefix_len` instructions, leaving the page in A) and then
/// STA $4014. Returns the STA step's cycles and the cycle DMA started on.
fn dma_cost(prefix: &[u8], prefix_len: usize) -> (u16, u64) {
    let mut program = prefix.to_vec();
    program.extend_from_slice(&[0x8D, 0x14, 0x40]); // STA $4014
    let cart = Cartridge::from_ines_bytes(&nrom_image(&program, RESET, NMI, IRQ)).unwrap();
    let mut bus = Bus::new();
    bus.attach_cartridge(cart);
    for i in 0..=255u8 {
        bus.write(0x0200 + i as u16, i ^ 0x5A);
    }
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    run(&mut cpu, &mut bus, prefix_len);
    let before = cpu.clock_cycle_count();
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.clock_cycle_count(), before + cycles as u64);

    bus.write(0x2003, 0x10);
    assert_eq!(bus.read(0x2004), 0x10 ^ 0x5A);
    (cycles, before + 4)
}

#[test]
fn oam_dma_costs_513_on_even_cycle_and_514_on_odd() {
    // reset 7 + LDA #$02 (2) + STA (4) = 13
    let (cycles, start) = dma_cost(&[0xA9, 0x02], 1);
    assert_eq!(start % 2, 1);
    assert_eq!(cycles, 4 + 514);

    // reset 7 + LDA #$02 (2) + BIT $00 (3) + STA (4) = 16
    let (cycles, start) = dma_cost(&[0xA9, 0x02, 0x24, 0x00], 2);
    assert_eq!(start % 2, 0);
    assert_eq!(cycles, 4 + 513);
}
