/*!
DmaController: OAM DMA state machine.

Behavioral model
- A write of page `$XX` to $4014 copies `$XX00..=$XXFF` into sprite OAM.
- The CPU is halted for the whole transfer:
  - 1 alignment cycle if DMA begins on an even CPU cycle, 2 if odd.
  - Then 256 read/write pairs: read the source byte through the CPU bus
    (with any side effects a CPU read would have), write it to OAMDATA
    ($2004), which advances OAMADDR.
- Total: 513 cycles (even start) or 514 cycles (odd start).

Public API
- `DmaController::start(src_page, cpu_cycle)`
- `DmaController::step_one_cycle(mem)` - one micro-step; true while stalled.
- `DmaController::stall_remaining()`
- `perform_oam_dma(mem, page, cpu_cycle)` - run a whole transfer, return its cost.

Parity
- `cpu_cycle` is the CPU cycle count at which DMA begins, i.e. after the
  triggering write instruction's cycles have been charged.
*/

use crate::memory::Memory;

/// OAMDATA register; every DMA byte lands here.
pub const OAMDATA: u16 = 0x2004;

/// Write port that triggers the transfer.
pub const OAMDMA: u16 = 0x4014;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DmaPhase {
    Read,
    Write,
}

#[derive(Debug)]
pub struct DmaController {
    active: bool,
    src_addr: u16,    // high page << 8
    index: u16,       // 0..=255
    phase: DmaPhase,  // Read -> Write alternating
    latch: u8,        // latched byte between read and write
    align_cycles: u8, // 1 if even start cycle, 2 if odd
}

impl Default for DmaController {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaController {
    pub fn new() -> Self {
        Self {
            active: false,
            src_addr: 0,
            index: 0,
            phase: DmaPhase::Read,
            latch: 0,
            align_cycles: 0,
        }
    }

    /// Begin a transfer from `src_page << 8`.
    pub fn start(&mut self, src_page: u8, cpu_cycle: u64) {
        self.active = true;
        self.src_addr = (src_page as u16) << 8;
        self.index = 0;
        self.phase = DmaPhase::Read;
        self.latch = 0;
        self.align_cycles = 1 + ((cpu_cycle & 1) as u8);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// CPU stall cycles left in the current transfer (alignment included).
    pub fn stall_remaining(&self) -> u32 {
        if !self.active {
            return 0;
        }
        let align = self.align_cycles as u32;
        let bytes_left = 256u32.saturating_sub(self.index as u32);
        let transfer_cycles = match self.phase {
            DmaPhase::Read => bytes_left * 2,
            DmaPhase::Write if bytes_left == 0 => 0,
            DmaPhase::Write => 1 + (bytes_left - 1) * 2,
        };
        align + transfer_cycles
    }

    /// One CPU cycle of DMA work. Returns false when idle.
    pub fn step_one_cycle(&mut self, mem: &mut dyn Memory) -> bool {
        if !self.active {
            return false;
        }

        if self.align_cycles > 0 {
            self.align_cycles -= 1;
            return true;
        }

        match self.phase {
            DmaPhase::Read => {
                self.latch = mem.read(self.src_addr.wrapping_add(self.index));
                self.phase = DmaPhase::Write;
            }
            DmaPhase::Write => {
                mem.write(OAMDATA, self.latch);
                self.index += 1;
                self.phase = DmaPhase::Read;
                if self.index >= 256 {
                    self.active = false;
                }
            }
        }
        true
    }
}

/// Copy one page into OAM through `mem` and return the stall in CPU cycles.
pub fn perform_oam_dma(mem: &mut dyn Memory, page: u8, cpu_cycle: u64) -> u16 {
    let mut dma = DmaController::new();
    dma.start(page, cpu_cycle);
    log::debug!(
        target: "dma",
        "OAM DMA from ${:02X}00 at cycle {} ({} cycles)",
        page,
        cpu_cycle,
        dma.stall_remaining()
    );
    let mut cycles = 0u16;
    while dma.is_active() {
        dma.step_one_cycle(mem);
        cycles += 1;
    }
    cycles
}
