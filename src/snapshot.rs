// Top-level save state - a single versioned JSON document aggregating CPU,
// RAM, PPU, APU, and mapper state (§6.3), grounded on the teacher's
// versioned/slot-file save-state format.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::SnapshotError;
use crate::ppu::{Ppu, PpuState};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Plain-data mirror of `Cpu`'s registers. `Cpu` itself carries no `serde`
/// derive since it sits on the hot execution path; this is the only place
/// its fields need to round-trip through JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,
}

impl CpuState {
    fn from_cpu(cpu: &Cpu) -> Self {
        CpuState {
            a: cpu.a,
            x: cpu.x,
            y: cpu.y,
            sp: cpu.sp,
            pc: cpu.pc,
            status: cpu.status,
            cycles: cpu.cycles,
        }
    }

    fn restore_to(&self, cpu: &mut Cpu) {
        cpu.a = self.a;
        cpu.x = self.x;
        cpu.y = self.y;
        cpu.sp = self.sp;
        cpu.pc = self.pc;
        cpu.status = self.status;
        cpu.cycles = self.cycles;
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub timestamp: String,
    pub rom_name: Option<String>,
    pub mapper_number: u8,
    pub cpu: CpuState,
    pub ram: Vec<u8>,
    pub ppu: PpuState,
    pub apu: crate::apu::Apu,
    /// Mapper-specific state (bank registers, IRQ counters, ...), via the
    /// `Mapper::export_state`/`import_state` hooks. Mapper 0 has none.
    pub mapper_state: serde_json::Value,
}

impl Snapshot {
    /// Captures the full machine state. `mapper_number` and `rom_name` are
    /// supplied by the caller (`machine.rs`) since the mapper trait object
    /// itself doesn't retain its iNES mapper number.
    pub fn capture(
        cpu: &Cpu,
        bus: &mut Bus,
        ppu: &Rc<RefCell<Ppu>>,
        mapper_number: u8,
        rom_name: Option<String>,
    ) -> Self {
        let mapper_state = match bus.mapper() {
            Some(mapper) => mapper.borrow().export_state(),
            None => serde_json::Value::Null,
        };

        Snapshot {
            version: SNAPSHOT_VERSION,
            timestamp: chrono::Local::now().to_rfc3339(),
            rom_name,
            mapper_number,
            cpu: CpuState::from_cpu(cpu),
            ram: bus.ram().bytes().to_vec(),
            ppu: ppu.borrow().export_state(),
            apu: bus.apu_mut().clone(),
            mapper_state,
        }
    }

    /// Restores this snapshot onto a live machine. The PPU's dot/scanline
    /// position, write toggle, and read buffer are reset to frame start
    /// rather than restored verbatim (§6.3) -- only the persistent register
    /// and memory contents come back exactly as captured.
    pub fn restore(
        &self,
        cpu: &mut Cpu,
        bus: &mut Bus,
        ppu: &Rc<RefCell<Ppu>>,
    ) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }

        self.cpu.restore_to(cpu);
        bus.ram_mut().load_bytes(&self.ram);
        *bus.apu_mut() = self.apu.clone();

        let mut ppu_state = self.ppu.clone();
        ppu_state.dot = 0;
        ppu_state.scanline = 0;
        ppu_state.write_toggle = false;
        ppu_state.read_buffer = 0;
        ppu.borrow_mut().import_state(&ppu_state);

        if let Some(mapper) = bus.mapper() {
            mapper.borrow_mut().import_state(&self.mapper_state);
        }

        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;
        Ok(snapshot)
    }
}

/// `saves/<rom_stem>/slot_<n>.json`, matching the teacher's per-ROM slot
/// directory convention.
pub fn slot_path(save_dir: &Path, rom_stem: &str, slot: u8) -> PathBuf {
    save_dir.join(rom_stem).join(format!("slot_{}.json", slot))
}
