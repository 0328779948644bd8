/*!
interfaces: the seam between the CPU bus and the picture processing unit.

The bus owns its video unit as a `Box<dyn VideoUnitPort>`. It only ever
needs five things from it: register reads and writes through the
$2000-$3FFF window (already folded to 0..=7), a side-effect-free register
peek for observers, one dot of progress, and a latched NMI request. Rendering, pattern fetches and nametable mirroring are
the implementation's business.
*/

pub trait VideoUnitPort {
    /// CPU read of register `reg` (0..=7). May have side effects.
    fn read_register(&mut self, reg: u8) -> u8;

    /// What `read_register` would return, without clearing or advancing anything.
    fn peek_register(&self, reg: u8) -> u8;

    /// CPU write of register `reg` (0..=7).
    fn write_register(&mut self, reg: u8, value: u8);

    /// Advance one PPU dot.
    fn step(&mut self);

    /// Return and clear a pending vblank NMI request.
    fn take_nmi(&mut self) -> bool;
}
