// NES core library - cycle-accurate PPU/CPU/mapper emulation.
//
// This crate stops at the core boundary: no window, no audio output, no
// host input plumbing. `machine::Machine` is the entry point a frontend
// wires a framebuffer, controller state, and a render loop around.

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod config;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod machine;
pub mod ppu;
pub mod ram;
pub mod rom;
pub mod scheduler;
pub mod snapshot;

pub use apu::Apu;
pub use bus::{Bus, MemoryMappedDevice};
pub use cartridge::{Cartridge, Mapper, MapperHandle, Mirroring};
pub use config::CoreConfig;
pub use controller::Controller;
pub use cpu::Cpu;
pub use error::{RomError, SnapshotError, UnsupportedMapperError};
pub use machine::{LoadRomError, Machine};
pub use ppu::{Ppu, Region};
pub use ram::Ram;
pub use rom::RomInfo;
pub use scheduler::Scheduler;
pub use snapshot::{CpuState, Snapshot, SNAPSHOT_VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_components_instantiate_and_wire_together() {
        let mut machine = Machine::new(CoreConfig::default());
        let mut rom = vec![0u8; 16 + 32 * 1024 + 8 * 1024];
        rom[0..4].copy_from_slice(b"NES\x1A");
        rom[4] = 2;
        rom[5] = 1;
        let reset_vector_offset = 16 + 32 * 1024 - 4;
        rom[reset_vector_offset] = 0x00;
        rom[reset_vector_offset + 1] = 0x80;

        machine.load_rom(&rom, None).unwrap();
        machine.run_frame();
        assert!(machine.frame().frame_count() >= 1);
    }
}
