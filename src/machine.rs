// Machine - the aggregate wiring CPU, PPU, Bus, mapper, and controller
// together, and the public surface for loading ROMs, running frames, and
// saving/loading state. Grounded on the teacher's `Emulator` struct, scoped
// to the core (no window, no audio output, no hotkeys).

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::bus::Bus;
use crate::cartridge::{build_mapper, Cartridge, MapperHandle};
use crate::config::CoreConfig;
use crate::cpu::Cpu;
use crate::error::{RomError, SnapshotError, UnsupportedMapperError};
use crate::ppu::Ppu;
use crate::rom::RomInfo;
use crate::scheduler::Scheduler;
use crate::snapshot::{slot_path, Snapshot};

/// Failure loading a ROM, covering both header parsing and mapper dispatch.
#[derive(Debug)]
pub enum LoadRomError {
    Rom(RomError),
    UnsupportedMapper(UnsupportedMapperError),
}

impl std::fmt::Display for LoadRomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadRomError::Rom(e) => write!(f, "{}", e),
            LoadRomError::UnsupportedMapper(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadRomError {}

impl From<RomError> for LoadRomError {
    fn from(e: RomError) -> Self {
        LoadRomError::Rom(e)
    }
}

impl From<UnsupportedMapperError> for LoadRomError {
    fn from(e: UnsupportedMapperError) -> Self {
        LoadRomError::UnsupportedMapper(e)
    }
}

pub struct Machine {
    cpu: Cpu,
    bus: Bus,
    ppu: Rc<RefCell<Ppu>>,
    scheduler: Scheduler,
    config: CoreConfig,
    mapper_number: Option<u8>,
    rom_name: Option<String>,
}

impl Machine {
    pub fn new(config: CoreConfig) -> Self {
        let ppu = Rc::new(RefCell::new(Ppu::new()));
        ppu.borrow_mut().set_region(config.region);
        let bus = Bus::new(ppu.clone());
        Machine {
            cpu: Cpu::new(),
            bus,
            ppu,
            scheduler: Scheduler::new(config.region),
            config,
            mapper_number: None,
            rom_name: None,
        }
    }

    /// Parses `data` as an iNES image, builds its mapper, wires it onto the
    /// bus and PPU, and runs a reset. Replaces whatever cartridge was
    /// previously loaded.
    pub fn load_rom(&mut self, data: &[u8], rom_name: Option<String>) -> Result<(), LoadRomError> {
        let rom = RomInfo::from_ines_bytes(data)?;
        let mapper_number = rom.mapper;
        let cart = Cartridge::from_rom_info(rom);
        let mapper: MapperHandle = Rc::new(RefCell::new(build_mapper(cart)?));

        self.ppu.borrow_mut().set_mapper(mapper.clone());
        self.bus.set_mapper(mapper);
        self.mapper_number = Some(mapper_number);
        self.rom_name = rom_name;
        self.reset();
        Ok(())
    }

    /// Resets the CPU/PPU/scheduler to power-on-equivalent state without
    /// reloading the cartridge.
    pub fn reset(&mut self) {
        self.ppu.borrow_mut().reset();
        self.scheduler.set_region(self.config.region);
        self.scheduler.reset(&mut self.cpu, &mut self.bus, &self.ppu);
    }

    /// Runs the machine until the PPU completes one frame.
    pub fn run_frame(&mut self) {
        self.scheduler.run_frame(&mut self.cpu, &mut self.bus, &self.ppu);
    }

    pub fn frame(&self) -> std::cell::Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn set_region(&mut self, region: crate::ppu::Region) {
        self.config.region = region;
        self.ppu.borrow_mut().set_region(region);
        self.scheduler.set_region(region);
    }

    fn rom_stem(&self) -> String {
        self.rom_name
            .as_deref()
            .map(|name| {
                Path::new(name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(name)
                    .to_string()
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn save_state(&mut self) -> Result<Snapshot, SnapshotError> {
        let mapper_number = self.mapper_number.ok_or(SnapshotError::NoRomLoaded)?;
        Ok(Snapshot::capture(
            &self.cpu,
            &mut self.bus,
            &self.ppu,
            mapper_number,
            self.rom_name.clone(),
        ))
    }

    pub fn load_state(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if let Some(expected) = self.mapper_number {
            if snapshot.mapper_number != expected {
                return Err(SnapshotError::MapperMismatch {
                    expected,
                    found: snapshot.mapper_number,
                });
            }
        }
        snapshot.restore(&mut self.cpu, &mut self.bus, &self.ppu)
    }

    pub fn quick_save(&mut self, slot: u8) -> Result<(), SnapshotError> {
        let snapshot = self.save_state()?;
        let path = slot_path(&self.config.save_directory, &self.rom_stem(), slot);
        snapshot.save_to_file(&path)
    }

    pub fn quick_load(&mut self, slot: u8) -> Result<(), SnapshotError> {
        let path = slot_path(&self.config.save_directory, &self.rom_stem(), slot);
        let snapshot = Snapshot::load_from_file(&path)?;
        self.load_state(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rom() -> Vec<u8> {
        let mut rom = vec![0u8; 16 + 32 * 1024 + 8 * 1024];
        rom[0..4].copy_from_slice(b"NES\x1A");
        rom[4] = 2; // 32 KiB PRG
        rom[5] = 1; // 8 KiB CHR
        let prg_start = 16;
        let reset_vector_offset = prg_start + 32 * 1024 - 4;
        rom[reset_vector_offset] = 0x00;
        rom[reset_vector_offset + 1] = 0x80;
        rom
    }

    #[test]
    fn loading_a_rom_resets_pc_to_the_reset_vector() {
        let mut machine = Machine::new(CoreConfig::default());
        machine.load_rom(&test_rom(), Some("test.nes".into())).unwrap();
        assert_eq!(machine.cpu().pc, 0x8000);
    }

    #[test]
    fn save_then_load_state_round_trips_cpu_registers() {
        let mut machine = Machine::new(CoreConfig::default());
        machine.load_rom(&test_rom(), Some("test.nes".into())).unwrap();
        let snapshot = machine.save_state().unwrap();
        machine.load_state(&snapshot).unwrap();
        assert_eq!(machine.cpu().pc, 0x8000);
    }

    #[test]
    fn rejects_a_snapshot_captured_from_a_different_mapper() {
        let mut machine = Machine::new(CoreConfig::default());
        machine.load_rom(&test_rom(), Some("test.nes".into())).unwrap();
        let mut snapshot = machine.save_state().unwrap();
        snapshot.mapper_number = 99;
        let err = machine.load_state(&snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::MapperMismatch { .. }));
    }
}
