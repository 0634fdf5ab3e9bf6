// Work-RAM pager for the $6000-$7FFF cartridge window (§4.5).
//
// Mirrors the nofrendo wram.c gate: writes are dropped whenever the window
// is disabled, unmapped, or write-protected, and the active 8 KiB bank is
// just an index into the cartridge's PRG-RAM blob. There is no dead-page
// buffer here (unlike the C original's `dead_page`) because reads are
// served by returning $FF directly when the window is disabled; no pointer
// juggling is needed in a safe-Rust model.

const PAGE_SIZE: usize = 0x2000;

/// Gate and bank selector for a cartridge's battery/work RAM window.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WramPager {
    bank_count: usize,
    current_bank: usize,
    enabled: bool,
    write_protected: bool,
}

impl WramPager {
    /// `ram_len` is the total size of the cartridge's WRAM blob in bytes.
    /// Disabled and not write-protected after cart insertion, per §4.5.
    pub fn new(ram_len: usize) -> Self {
        let bank_count = (ram_len / PAGE_SIZE).max(1);
        WramPager {
            bank_count,
            current_bank: 0,
            enabled: false,
            write_protected: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_write_protected(&mut self, protected: bool) {
        self.write_protected = protected;
    }

    /// Accepts 4 KiB or 8 KiB bank-select requests; both select an 8 KiB-
    /// aligned bank (no sub-window paging), per §4.5.
    pub fn select_bank(&mut self, size_kib: usize, bank: u8) {
        if size_kib != 4 && size_kib != 8 {
            return;
        }
        self.current_bank = bank as usize % self.bank_count;
    }

    pub fn read(&self, ram: &[u8], offset: u16) -> u8 {
        if !self.enabled {
            return 0xFF;
        }
        let index = self.current_bank * PAGE_SIZE + offset as usize;
        ram.get(index).copied().unwrap_or(0xFF)
    }

    pub fn write(&self, ram: &mut [u8], offset: u16, value: u8) {
        if !self.enabled || self.write_protected {
            log::debug!("WRAM write dropped (enabled={}, wp={})", self.enabled, self.write_protected);
            return;
        }
        let index = self.current_bank * PAGE_SIZE + offset as usize;
        if let Some(slot) = ram.get_mut(index) {
            *slot = value;
        }
    }
}
