// Cartridge module - mapper abstraction and dispatch.
//
// A `Cartridge` owns the raw ROM/RAM arrays handed down from `RomInfo`; a
// `Mapper` is the behavior that sits between those arrays and the CPU/PPU
// address spaces. The PPU never talks to a `Cartridge` directly -- it talks
// to whichever `Mapper` the factory below built for it.

mod mapper0;
mod mapper4;
mod mapper5;
mod wram;

pub use mapper0::Mapper0;
pub use mapper4::Mapper4;
pub use mapper5::Mapper5;
pub use wram::WramPager;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::UnsupportedMapperError;
use crate::rom::RomInfo;

/// Shared handle to the active mapper, held by both the bus (CPU side) and
/// the PPU (PPU side) so either can reach bank-select state and register
/// accesses without the other owning a separate copy.
pub type MapperHandle = Rc<RefCell<Box<dyn Mapper>>>;

/// Nametable mirroring mode, as published by the mapper to the PPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    SingleScreenLow,
    SingleScreenHigh,
    FourScreen,
}

/// Raw cartridge contents, owned independently of any particular mapper.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub chr_is_ram: bool,
    pub prg_ram: Vec<u8>,
    pub mapper_number: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
}

impl Cartridge {
    pub fn from_rom_info(rom: RomInfo) -> Self {
        Cartridge {
            prg_rom: rom.prg_rom,
            chr_rom: rom.chr_rom,
            chr_is_ram: rom.chr_is_ram,
            prg_ram: rom.prg_ram,
            mapper_number: rom.mapper,
            mirroring: rom.mirroring,
            has_battery: rom.has_battery,
        }
    }
}

/// Where a logical nametable slot (0..3, before mirroring) physically lives.
///
/// Mapper 0 and MMC3 only ever resolve to `Ciram`; MMC5's $5105 register can
/// route a slot to its ExRAM or to a derived fill pattern instead, which is
/// why this is richer than a plain horizontal/vertical/four-screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NametableSource {
    /// Physical CIRAM half (0 or 1), or for four-screen carts the slot index
    /// itself (0..3) into an extended 4 KiB nametable RAM.
    Ciram(u8),
    ExRam,
    Fill,
}

/// Behavior shared by every bank-switching scheme this core implements.
///
/// The bus and PPU hold a `Rc<RefCell<Box<dyn Mapper>>>` (see `machine.rs`);
/// the mapper owns its bank-select registers and publishes the nametable
/// mirroring mode the PPU reads on every nametable access.
pub trait Mapper {
    /// CPU-side read, $4020-$FFFF (WRAM window and PRG-ROM windows).
    fn cpu_read(&mut self, addr: u16) -> u8;
    /// CPU-side write, $4020-$FFFF.
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU-side read, $0000-$1FFF (pattern tables).
    fn ppu_read(&mut self, addr: u16) -> u8;
    /// PPU-side write, $0000-$1FFF.
    fn ppu_write(&mut self, addr: u16, value: u8);

    /// Current nametable mirroring mode.
    fn mirroring(&self) -> Mirroring;

    /// Called by the PPU on every CHR-address-space access (§4.1), so A12-
    /// sensitive mappers (MMC3) can observe the address line. `m2_cycles` is
    /// the number of CPU (M2) cycles that elapsed since the previous call,
    /// used by MMC3's low-period filter.
    fn notify_ppu_addr(&mut self, _addr: u16, _m2_cycles: u32) {}

    /// True if this mapper has asserted its IRQ line and it has not yet been
    /// acknowledged.
    fn irq_pending(&self) -> bool {
        false
    }

    /// Called once per elapsed scanline by the scheduler for scanline-
    /// counting mappers (MMC5). MMC3 ignores this in favor of A12 edges.
    fn scanline_tick(&mut self) {}

    /// Resolve a logical nametable slot (0..3) to its physical backing.
    /// Default derives from `mirroring()`, which is correct for every mapper
    /// except MMC5, which overrides this with its per-slot $5105 register.
    fn nametable_source(&self, slot: u8) -> NametableSource {
        match self.mirroring() {
            Mirroring::Horizontal => NametableSource::Ciram(if slot < 2 { 0 } else { 1 }),
            Mirroring::Vertical => NametableSource::Ciram(if slot == 0 || slot == 2 { 0 } else { 1 }),
            Mirroring::SingleScreenLow => NametableSource::Ciram(0),
            Mirroring::SingleScreenHigh => NametableSource::Ciram(1),
            Mirroring::FourScreen => NametableSource::Ciram(slot),
        }
    }

    /// Read a byte from a non-CIRAM nametable source (ExRAM or fill). Never
    /// called for `NametableSource::Ciram`.
    fn nametable_aux_read(&mut self, _source: NametableSource, _offset: u16) -> u8 {
        0
    }

    /// Write a byte to a non-CIRAM nametable source. Never called for
    /// `NametableSource::Ciram`.
    fn nametable_aux_write(&mut self, _source: NametableSource, _offset: u16, _value: u8) {}

    /// Mapper-specific state for snapshotting (bank registers, IRQ counters,
    /// ...). Mappers with no extra state beyond PRG/CHR-RAM contents (NROM)
    /// can leave this at the default `Null`.
    fn export_state(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Restore mapper-specific state from a value produced by `export_state`.
    fn import_state(&mut self, _state: &serde_json::Value) {}
}

/// Build the mapper implementation named by the cartridge's header.
pub fn build_mapper(cart: Cartridge) -> Result<Box<dyn Mapper>, UnsupportedMapperError> {
    match cart.mapper_number {
        0 => Ok(Box::new(Mapper0::new(cart))),
        4 => Ok(Box::new(Mapper4::new(cart))),
        5 => Ok(Box::new(Mapper5::new(cart))),
        other => {
            log::warn!("unsupported mapper number {}", other);
            Err(UnsupportedMapperError(other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cart(mapper_number: u8) -> Cartridge {
        Cartridge {
            prg_rom: vec![0u8; 32 * 1024],
            chr_rom: vec![0u8; 8 * 1024],
            chr_is_ram: false,
            prg_ram: vec![0u8; 8 * 1024],
            mapper_number,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
        }
    }

    #[test]
    fn dispatches_known_mappers() {
        assert!(build_mapper(test_cart(0)).is_ok());
        assert!(build_mapper(test_cart(4)).is_ok());
        assert!(build_mapper(test_cart(5)).is_ok());
    }

    #[test]
    fn rejects_unknown_mapper() {
        let err = build_mapper(test_cart(99)).unwrap_err();
        assert_eq!(err.0, 99);
    }
}
