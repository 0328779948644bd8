#![doc = r#"
Bus module: the CPU-visible system bus and its parts.

Overview
- `Bus` owns internal RAM, the video unit (behind `VideoUnitPort`) and the
  optional cartridge, and implements [`Memory`] so the CPU core can run on it.
- The bus never calls back into the CPU. Side channels are polled:
  the OAM DMA page latched by a $4014 write (`take_oam_dma_request`) and a
  vblank NMI latched while stepping the video unit (`take_nmi`).

Modules and responsibilities
- cpu_interface: CPU-visible address decoder; delegates to devices.
- dma: OAM DMA state machine and the whole-transfer helper the CPU calls.
- ram: 2 KiB internal RAM with mirroring.
- clock: steps the video unit three dots per CPU cycle and latches NMI.
- interfaces: the `VideoUnitPort` seam.
"#]

pub mod clock;
pub mod cpu_interface;
pub mod dma;
pub mod interfaces;
pub mod ram;

pub use dma::{DmaController, perform_oam_dma};
pub use interfaces::VideoUnitPort;
pub use ram::Ram;

use crate::cartridge::Cartridge;
use crate::memory::Memory;
use crate::ppu::PpuStub;

pub struct Bus {
    pub(crate) ram: Ram,
    pub(crate) video: Box<dyn VideoUnitPort>,
    pub(crate) cartridge: Option<Cartridge>,
    pub(crate) oam_dma_page: Option<u8>,
    pub(crate) nmi_pending: bool,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("cartridge", &self.cartridge)
            .field("oam_dma_page", &self.oam_dma_page)
            .field("nmi_pending", &self.nmi_pending)
            .finish_non_exhaustive()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// A bus with a [`PpuStub`] video unit and no cartridge.
    pub fn new() -> Self {
        Self::with_video(Box::new(PpuStub::new()))
    }

    pub fn with_video(video: Box<dyn VideoUnitPort>) -> Self {
        Self {
            ram: Ram::new(),
            video,
            cartridge: None,
            oam_dma_page: None,
            nmi_pending: false,
        }
    }

    // -----------------------------
    // Cartridge slot
    // -----------------------------

    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        log::debug!(target: "bus", "cartridge attached: mapper {}", cartridge.mapper_id());
        self.cartridge = Some(cartridge);
    }

    pub fn detach_cartridge(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    // -----------------------------
    // Devices
    // -----------------------------

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn video_mut(&mut self) -> &mut dyn VideoUnitPort {
        self.video.as_mut()
    }

    /// Advance the video unit by `cpu_cycles` CPU cycles (3 dots each).
    /// Returns true if a vblank NMI was raised meanwhile.
    pub fn step_video(&mut self, cpu_cycles: u32) -> bool {
        clock::tick(self, cpu_cycles)
    }

    /// Return and clear the latched NMI request.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }
}

impl Memory for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        cpu_interface::cpu_read(self, addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        cpu_interface::cpu_write(self, addr, value)
    }

    fn peek(&mut self, addr: u16) -> u8 {
        cpu_interface::cpu_peek(self, addr)
    }

    fn take_oam_dma_request(&mut self) -> Option<u8> {
        self.oam_dma_page.take()
    }
}
