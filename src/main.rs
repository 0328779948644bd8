use arness_cpu::trace::{LogTracer, NullTracer, Tracer};
use arness_cpu::{Cartridge, Memory, RunLimits, System};

/// Demo program at $8000: sum 1..=10 into $0200, upload a sprite page with
/// OAM DMA, then spin on a JMP.
const PROGRAM: &[u8] = &[
    0xA9, 0x00, // LDA #$00
    0xA2, 0x0A, // LDX #$0A
    0x18, //       loop: CLC
    0x86, 0x00, // STX $00
    0x65, 0x00, // ADC $00
    0xCA, //       DEX
    0xD0, 0xF8, // BNE loop
    0x8D, 0x00, 0x02, // STA $0200
    0xA9, 0x03, // LDA #$03
    0x8D, 0x14, 0x40, // STA $4014
    0x4C, 0x14, 0x80, // spin: JMP spin
];

fn build_demo_ines() -> Vec<u8> {
    let mut rom = Vec::with_capacity(16 + 16 * 1024 + 8 * 1024);
    rom.extend_from_slice(b"NES\x1A");
    rom.extend_from_slice(&[1, 1, 0, 0, 1]);
    rom.extend_from_slice(&[0u8; 7]);

    let mut prg = vec![0xEAu8; 16 * 1024];
    prg[..PROGRAM.len()].copy_from_slice(PROGRAM);
    // NMI, RESET, IRQ/BRK all point at $8000.
    for slot in prg[0x3FFA..].chunks_exact_mut(2) {
        slot.copy_from_slice(&0x8000u16.to_le_bytes());
    }
    rom.extend_from_slice(&prg);
    rom.extend_from_slice(&[0u8; 8 * 1024]);
    rom
}

fn main() {
    env_logger::init();

    let cart = match Cartridge::from_ines_bytes(&build_demo_ines()) {
        Ok(cart) => cart,
        Err(err) => {
            eprintln!("failed to load demo image: {err}");
            std::process::exit(1);
        }
    };

    let mut system = System::new(cart);
    let tracer: Box<dyn Tracer> = if cfg!(feature = "trace") {
        Box::new(LogTracer)
    } else {
        Box::new(NullTracer)
    };
    system.cpu.set_tracer(tracer);
    system.reset();

    let limits = RunLimits::default().with_max_instructions(100);
    let outcome = match system.run(&limits) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("CPU stopped: {err}");
            std::process::exit(1);
        }
    };

    let regs = *system.cpu.registers();
    let sum = system.bus.read(0x0200);
    println!("stop: {:?}", outcome.stop);
    println!("instructions: {}", outcome.instructions);
    println!("cycles: {}", outcome.cycles);
    println!("A: 0x{:02X}", regs.a);
    println!("X: 0x{:02X}", regs.x);
    println!("Y: 0x{:02X}", regs.y);
    println!("SP: 0x{:02X}", regs.sp);
    println!("PC: 0x{:04X}", regs.pc);
    println!("P (flags): 0b{:08b}", regs.status_byte());
    println!("mem[0x0200]: 0x{:02X}", sum);
}
