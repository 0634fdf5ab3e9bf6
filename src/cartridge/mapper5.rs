// Mapper 5 (MMC5) - flexible PRG/CHR banking, ExRAM, nametable fill mode,
// the hardware multiplier, and a scanline IRQ counter (§4.4).
//
// PRG/CHR bank resolution is computed on demand from the current mode and
// registers (same approach as mapper4.rs) rather than eagerly pushing
// windows into a pointer table the way map005.c's `sync_prg`/`sync_chr` do.

use super::{Cartridge, Mapper, Mirroring, NametableSource, WramPager};

const EXRAM_SIZE: usize = 0x400;

/// Snapshot of MMC5 state for save/restore (§4.4, §6.3).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Mmc5State {
    pub prg_mode: u8,
    pub chr_mode: u8,
    pub chr_high: u8,
    pub prg_regs: [u8; 4],
    pub chr_spr: [u16; 8],
    pub chr_bg: [u16; 4],
    pub exram: Vec<u8>,
    pub exram_mode: u8,
    pub nt_reg: u8,
    pub nt_fill: u8,
    pub at_fill: u8,
    pub split_ctrl: u8,
    pub split_scroll: u8,
    pub split_bank: u8,
    pub mul: [u8; 2],
    pub irq_latch: u8,
    pub irq_counter: u8,
    pub irq_enabled: bool,
    pub irq_pending: bool,
    pub wram: WramPager,
}

pub struct Mapper5 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    wram: WramPager,

    prg_mode: u8,
    chr_mode: u8,
    chr_high: u8,
    prg_regs: [u8; 4],
    chr_spr: [u16; 8],
    chr_bg: [u16; 4],

    exram: Vec<u8>,
    exram_mode: u8,
    nt_reg: u8,
    nt_fill: u8,
    at_fill: u8,

    split_ctrl: u8,
    split_scroll: u8,
    split_bank: u8,

    mul: [u8; 2],

    irq_latch: u8,
    irq_counter: u8,
    irq_enabled: bool,
    irq_pending: bool,
}

impl Mapper5 {
    pub fn new(cart: Cartridge) -> Self {
        let wram = WramPager::new(cart.prg_ram.len());
        Mapper5 {
            prg_rom: cart.prg_rom,
            chr_mem: cart.chr_rom,
            chr_is_ram: cart.chr_is_ram,
            prg_ram: cart.prg_ram,
            wram,
            prg_mode: 3,
            chr_mode: 3,
            chr_high: 0,
            prg_regs: [0xFF; 4],
            chr_spr: [0; 8],
            chr_bg: [0; 4],
            exram: vec![0u8; EXRAM_SIZE],
            exram_mode: 0,
            nt_reg: 0,
            nt_fill: 0,
            at_fill: 0,
            split_ctrl: 0,
            split_scroll: 0,
            split_bank: 0,
            mul: [0, 0],
            irq_latch: 0,
            irq_counter: 0,
            irq_enabled: false,
            irq_pending: false,
        }
    }

    fn prg_bank_count(&self) -> usize {
        (self.prg_rom.len() / 0x2000).max(1)
    }

    fn prg_offset(&self, addr: u16) -> usize {
        let banks = self.prg_bank_count();
        let slot = ((addr - 0x8000) / 0x2000) as u8;
        let bank = match self.prg_mode & 3 {
            0 => {
                let base = (self.prg_regs[3] & 0x7F) & !3;
                (base + slot) as usize
            }
            1 => {
                if slot < 2 {
                    ((self.prg_regs[1] & 0x7F) & !1) as usize + slot as usize
                } else {
                    ((self.prg_regs[3] & 0x7F) & !1) as usize + (slot as usize - 2)
                }
            }
            2 => match slot {
                0 => (self.prg_regs[1] & 0x7F) as usize,
                1 => (self.prg_regs[2] & 0x7F) as usize,
                2 => ((self.prg_regs[3] & 0x7F) & !1) as usize,
                3 => (((self.prg_regs[3] & 0x7F) & !1) + 1) as usize,
                _ => unreachable!(),
            },
            _ => (self.prg_regs[slot as usize] & 0x7F) as usize,
        };
        (bank % banks) * 0x2000 + (addr as usize & 0x1FFF)
    }

    fn chr_bank_1k(&self, addr: u16) -> (u16, u16) {
        let page = addr / 0x400;
        let sub = addr % 0x400;
        match self.chr_mode & 3 {
            0 => (self.chr_spr[7].wrapping_mul(8) + page, sub),
            1 => {
                if page < 4 {
                    (self.chr_spr[3].wrapping_mul(4) + page, sub)
                } else {
                    (self.chr_bg[3].wrapping_mul(4) + (page - 4), sub)
                }
            }
            2 => match page {
                0 | 1 => (self.chr_spr[1].wrapping_mul(2) + page, sub),
                2 | 3 => (self.chr_spr[3].wrapping_mul(2) + (page - 2), sub),
                4 | 5 => (self.chr_bg[1].wrapping_mul(2) + (page - 4), sub),
                6 | 7 => (self.chr_bg[3].wrapping_mul(2) + (page - 6), sub),
                _ => unreachable!(),
            },
            _ => (self.chr_spr[page as usize], sub),
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let (bank, sub) = self.chr_bank_1k(addr);
        let total_banks = (self.chr_mem.len() / 0x400).max(1) as u16;
        (bank % total_banks) as usize * 0x400 + sub as usize
    }

    fn fill_read(&self, offset: u16) -> u8 {
        let offset = offset & 0x3FF;
        if offset < 0x3C0 {
            self.nt_fill
        } else {
            let a = self.at_fill & 3;
            a | (a << 2) | (a << 4) | (a << 6)
        }
    }

    pub fn export_state(&self) -> Mmc5State {
        Mmc5State {
            prg_mode: self.prg_mode,
            chr_mode: self.chr_mode,
            chr_high: self.chr_high,
            prg_regs: self.prg_regs,
            chr_spr: self.chr_spr,
            chr_bg: self.chr_bg,
            exram: self.exram.clone(),
            exram_mode: self.exram_mode,
            nt_reg: self.nt_reg,
            nt_fill: self.nt_fill,
            at_fill: self.at_fill,
            split_ctrl: self.split_ctrl,
            split_scroll: self.split_scroll,
            split_bank: self.split_bank,
            mul: self.mul,
            irq_latch: self.irq_latch,
            irq_counter: self.irq_counter,
            irq_enabled: self.irq_enabled,
            irq_pending: self.irq_pending,
            wram: self.wram.clone(),
        }
    }

    pub fn import_state(&mut self, state: &Mmc5State) {
        self.prg_mode = state.prg_mode;
        self.chr_mode = state.chr_mode;
        self.chr_high = state.chr_high;
        self.prg_regs = state.prg_regs;
        self.chr_spr = state.chr_spr;
        self.chr_bg = state.chr_bg;
        self.exram = state.exram.clone();
        self.exram_mode = state.exram_mode;
        self.nt_reg = state.nt_reg;
        self.nt_fill = state.nt_fill;
        self.at_fill = state.at_fill;
        self.split_ctrl = state.split_ctrl;
        self.split_scroll = state.split_scroll;
        self.split_bank = state.split_bank;
        self.mul = state.mul;
        self.irq_latch = state.irq_latch;
        self.irq_counter = state.irq_counter;
        self.irq_enabled = state.irq_enabled;
        self.irq_pending = state.irq_pending;
        self.wram = state.wram.clone();
    }
}

impl Mapper for Mapper5 {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        if (0x5C00..=0x5FFF).contains(&addr) {
            return self.exram[(addr & 0x3FF) as usize];
        }
        match addr {
            0x5204 => {
                let ret = if self.irq_pending { 0x40 } else { 0x00 };
                self.irq_pending = false;
                ret
            }
            0x5205 => ((self.mul[0] as u16 * self.mul[1] as u16) & 0xFF) as u8,
            0x5206 => ((self.mul[0] as u16 * self.mul[1] as u16) >> 8) as u8,
            0x6000..=0x7FFF => self.wram.read(&self.prg_ram, addr - 0x6000),
            0x8000..=0xFFFF => self.prg_rom[self.prg_offset(addr)],
            _ => 0xFF,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        if (0x5C00..=0x5FFF).contains(&addr) {
            if self.exram_mode != 3 {
                self.exram[(addr & 0x3FF) as usize] = value;
            }
            return;
        }
        match addr {
            0x5100 => self.prg_mode = value & 3,
            0x5101 => self.chr_mode = value & 3,
            0x5104 => self.exram_mode = value & 3,
            0x5105 => self.nt_reg = value,
            0x5106 => self.nt_fill = value,
            0x5107 => self.at_fill = value,
            0x5113 => self.wram.select_bank(8, value),
            0x5114..=0x5117 => self.prg_regs[(addr & 3) as usize] = value,
            0x5120..=0x5127 => {
                self.chr_spr[(addr - 0x5120) as usize] = value as u16 | ((self.chr_high as u16) << 8)
            }
            0x5128..=0x512B => {
                self.chr_bg[(addr - 0x5128) as usize] = value as u16 | ((self.chr_high as u16) << 8)
            }
            0x5130 => self.chr_high = value & 3,
            0x5200 => self.split_ctrl = value,
            0x5201 => self.split_scroll = value,
            0x5202 => self.split_bank = value,
            0x5203 => {
                self.irq_latch = value;
                self.irq_counter = value;
                self.irq_pending = false;
            }
            0x5204 => {
                self.irq_enabled = value & 0x80 != 0;
                self.irq_pending = false;
            }
            0x5205 => self.mul[0] = value,
            0x5206 => self.mul[1] = value,
            0x6000..=0x7FFF => self.wram.write(&mut self.prg_ram, addr - 0x6000, value),
            _ => {}
        }
    }

    fn ppu_read(&mut self, addr: u16) -> u8 {
        let offset = self.chr_offset(addr);
        self.chr_mem[offset]
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            let offset = self.chr_offset(addr);
            self.chr_mem[offset] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        // MMC5 never uses the plain four-way mirror table; nametable_source
        // below is authoritative. Report Horizontal as an inert default.
        Mirroring::Horizontal
    }

    fn export_state(&self) -> serde_json::Value {
        serde_json::to_value(Mapper5::export_state(self)).unwrap_or(serde_json::Value::Null)
    }

    fn import_state(&mut self, state: &serde_json::Value) {
        if let Ok(s) = serde_json::from_value(state.clone()) {
            Mapper5::import_state(self, &s);
        }
    }

    fn scanline_tick(&mut self) {
        if !self.irq_enabled {
            return;
        }
        if self.irq_counter == 0 {
            self.irq_pending = true;
            self.irq_counter = self.irq_latch;
        } else {
            self.irq_counter -= 1;
        }
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn nametable_source(&self, slot: u8) -> NametableSource {
        let sel = (self.nt_reg >> (slot * 2)) & 3;
        match sel {
            0 => NametableSource::Ciram(0),
            1 => NametableSource::Ciram(1),
            2 => NametableSource::ExRam,
            _ => NametableSource::Fill,
        }
    }

    fn nametable_aux_read(&mut self, source: NametableSource, offset: u16) -> u8 {
        match source {
            NametableSource::ExRam => self.exram[(offset & 0x3FF) as usize],
            NametableSource::Fill => self.fill_read(offset),
            NametableSource::Ciram(_) => 0,
        }
    }

    fn nametable_aux_write(&mut self, source: NametableSource, offset: u16, value: u8) {
        if let NametableSource::ExRam = source {
            self.exram[(offset & 0x3FF) as usize] = value;
        }
    }
}
