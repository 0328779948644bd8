/*
Module: mappers

Bank-switching boards beyond NROM. NROM itself lives next to the `Mapper`
trait in `crate::mapper`.

Implemented:
- MMC1 (Mapper 1)
*/

pub mod mmc1;

pub use mmc1::Mmc1;
