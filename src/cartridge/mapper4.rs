// Mapper 4 (MMC3) - bank-switching PRG/CHR windows plus the A12-edge scanline
// IRQ (§4.3). CHR/PRG windows are computed on demand from the current
// register values rather than cached into pointer tables, which sidesteps
// the "must re-apply all six CHR registers on bit7 toggle" bookkeeping the
// C original needs (map004.c) -- here that toggle just changes which page
// index subsequent reads compute.

use super::{Cartridge, Mapper, Mirroring, WramPager};

/// Snapshot of MMC3 state for save/restore (§4.3, §6.3).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Mmc3State {
    pub bank_select: u8,
    pub chr_regs: [u8; 6],
    pub prg_r6: u8,
    pub prg_r7: u8,
    pub mirroring: Mirroring,
    pub irq_latch: u8,
    pub irq_counter: u8,
    pub irq_enabled: bool,
    pub irq_reload_flag: bool,
    pub irq_pending: bool,
    pub wram: WramPager,
}

pub struct Mapper4 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    wram: WramPager,
    four_screen: bool,
    mirroring: Mirroring,

    bank_select: u8,
    chr_regs: [u8; 6],
    prg_r6: u8,
    prg_r7: u8,

    irq_latch: u8,
    irq_counter: u8,
    irq_enabled: bool,
    irq_reload_flag: bool,
    irq_pending: bool,

    a12_prev: bool,
    low_m2_count: u32,
}

impl Mapper4 {
    pub fn new(cart: Cartridge) -> Self {
        let four_screen = cart.mirroring == Mirroring::FourScreen;
        let wram = WramPager::new(cart.prg_ram.len());
        Mapper4 {
            prg_rom: cart.prg_rom,
            chr_mem: cart.chr_rom,
            chr_is_ram: cart.chr_is_ram,
            prg_ram: cart.prg_ram,
            wram,
            four_screen,
            mirroring: cart.mirroring,
            bank_select: 0,
            chr_regs: [0; 6],
            prg_r6: 0,
            prg_r7: 0,
            irq_latch: 0,
            irq_counter: 0,
            irq_enabled: false,
            irq_reload_flag: false,
            irq_pending: false,
            a12_prev: false,
            low_m2_count: 0,
        }
    }

    fn prg_bank_count(&self) -> usize {
        (self.prg_rom.len() / 0x2000).max(1)
    }

    fn prg_offset(&self, addr: u16) -> usize {
        let banks = self.prg_bank_count();
        let last = banks.saturating_sub(1);
        let penult = banks.saturating_sub(2);
        let slot = ((addr - 0x8000) / 0x2000) as u8;
        let prg_mode_c000 = self.bank_select & 0x40 != 0;
        let bank = match (prg_mode_c000, slot) {
            (false, 0) => self.prg_r6 as usize,
            (false, 1) => self.prg_r7 as usize,
            (false, 2) => penult,
            (false, 3) => last,
            (true, 0) => penult,
            (true, 1) => self.prg_r7 as usize,
            (true, 2) => self.prg_r6 as usize,
            (true, 3) => last,
            _ => unreachable!(),
        };
        (bank % banks) * 0x2000 + (addr as usize & 0x1FFF)
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let page = (addr >> 10) as u8 & 0x7;
        let page_eff = if self.bank_select & 0x80 != 0 {
            page ^ 0x4
        } else {
            page
        };
        let bank = match page_eff {
            0 => self.chr_regs[0] & 0xFE,
            1 => (self.chr_regs[0] & 0xFE) + 1,
            2 => self.chr_regs[1] & 0xFE,
            3 => (self.chr_regs[1] & 0xFE) + 1,
            4 => self.chr_regs[2],
            5 => self.chr_regs[3],
            6 => self.chr_regs[4],
            7 => self.chr_regs[5],
            _ => unreachable!(),
        } as usize;
        // Invalid CHR bank index: masked modulo the number of banks (§7).
        let total_banks = (self.chr_mem.len() / 0x400).max(1);
        (bank % total_banks) * 0x400 + (addr as usize & 0x3FF)
    }

    fn clock_irq(&mut self) {
        if self.irq_reload_flag || self.irq_counter == 0 {
            self.irq_counter = self.irq_latch;
            self.irq_reload_flag = false;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_enabled && self.irq_counter == 0 {
            self.irq_pending = true;
        }
    }

    pub fn export_state(&self) -> Mmc3State {
        Mmc3State {
            bank_select: self.bank_select,
            chr_regs: self.chr_regs,
            prg_r6: self.prg_r6,
            prg_r7: self.prg_r7,
            mirroring: self.mirroring,
            irq_latch: self.irq_latch,
            irq_counter: self.irq_counter,
            irq_enabled: self.irq_enabled,
            irq_reload_flag: self.irq_reload_flag,
            irq_pending: self.irq_pending,
            wram: self.wram.clone(),
        }
    }

    pub fn import_state(&mut self, state: &Mmc3State) {
        self.bank_select = state.bank_select;
        self.chr_regs = state.chr_regs;
        self.prg_r6 = state.prg_r6;
        self.prg_r7 = state.prg_r7;
        self.mirroring = state.mirroring;
        self.irq_latch = state.irq_latch;
        self.irq_counter = state.irq_counter;
        self.irq_enabled = state.irq_enabled;
        self.irq_reload_flag = state.irq_reload_flag;
        self.irq_pending = state.irq_pending;
        self.wram = state.wram.clone();
    }
}

impl Mapper for Mapper4 {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.wram.read(&self.prg_ram, addr - 0x6000),
            0x8000..=0xFFFF => {
                let offset = self.prg_offset(addr);
                self.prg_rom[offset]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => self.wram.write(&mut self.prg_ram, addr - 0x6000, value),
            0x8000..=0xFFFF => match addr & 0xE001 {
                0x8000 => self.bank_select = value,
                0x8001 => match self.bank_select & 0x07 {
                    0 => self.chr_regs[0] = value,
                    1 => self.chr_regs[1] = value,
                    2 => self.chr_regs[2] = value,
                    3 => self.chr_regs[3] = value,
                    4 => self.chr_regs[4] = value,
                    5 => self.chr_regs[5] = value,
                    6 => self.prg_r6 = value,
                    7 => self.prg_r7 = value,
                    _ => unreachable!(),
                },
                0xA000 => {
                    if !self.four_screen {
                        self.mirroring = if value & 1 == 0 {
                            Mirroring::Horizontal
                        } else {
                            Mirroring::Vertical
                        };
                    }
                }
                0xA001 => {
                    self.wram.set_enabled(value & 0x80 != 0);
                    self.wram.set_write_protected(value & 0x40 != 0);
                }
                0xC000 => self.irq_latch = value,
                0xC001 => {
                    self.irq_reload_flag = true;
                    self.irq_counter = 0;
                }
                0xE000 => {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                }
                0xE001 => self.irq_enabled = true,
                _ => unreachable!(),
            },
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
        self.mirroring
    }

    fn export_state(&self) -> serde_json::Value {
        serde_json::to_value(Mapper4::export_state(self)).unwrap_or(serde_json::Value::Null)
    }

    fn import_state(&mut self, state: &serde_json::Value) {
        if let Ok(s) = serde_json::from_value(state.clone()) {
            Mapper4::import_state(self, &s);
        }
    }

    fn notify_ppu_addr(&mut self, addr: u16, m2_cycles: u32) {
        let cur = addr & 0x1000 != 0;
        if !cur {
            self.low_m2_count = (self.low_m2_count + m2_cycles).min(8);
        }
        if !self.a12_prev && cur {
            if self.low_m2_count >= 3 {
                self.clock_irq();
            }
            self.low_m2_count = 0;
        }
        self.a12_prev = cur;
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }
}
