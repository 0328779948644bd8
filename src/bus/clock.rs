/*!
Clock: advances the video unit in step with the CPU.

The CPU runs a whole instruction at a time; afterwards the driver calls
`tick(bus, cycles)` with the cycles that instruction (plus any DMA stall or
interrupt entry) consumed. Each CPU cycle is three PPU dots. A vblank NMI
raised during those dots is latched on the bus until `Bus::take_nmi`.
*/

use crate::bus::Bus;

pub const DOTS_PER_CPU_CYCLE: u32 = 3;

/// Step the video unit `cycles * 3` dots. Returns true if an NMI was raised.
pub fn tick(bus: &mut Bus, cycles: u32) -> bool {
    let mut raised = false;
    for _ in 0..cycles * DOTS_PER_CPU_CYCLE {
        bus.video.step();
        if bus.video.take_nmi() {
            raised = true;
        }
    }
    if raised {
        bus.nmi_pending = true;
    }
    raised
}
