// Mapper 0 (NROM) - the baseline fixed-bank mapper.
//
// No bank switching: $8000-$BFFF is the first 16 KiB of PRG-ROM, $C000-$FFFF
// is the last 16 KiB (which mirrors the first 16 KiB for 16 KiB carts).
// Serves as the dispatch default and as the simplest reference for the
// `Mapper` trait shape the other two mappers implement.

use super::{Cartridge, Mapper, Mirroring};

pub struct Mapper0 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Mapper0 {
    pub fn new(cart: Cartridge) -> Self {
        Mapper0 {
            prg_rom: cart.prg_rom,
            chr_mem: cart.chr_rom,
            chr_is_ram: cart.chr_is_ram,
            mirroring: cart.mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x8000..=0xFFFF => {
                let index = (addr - 0x8000) as usize % self.prg_rom.len();
                self.prg_rom[index]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, _addr: u16, _value: u8) {
        // NROM has no writable registers.
    }

    fn ppu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.chr_mem[addr as usize % self.chr_mem.len()],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            if let 0x0000..=0x1FFF = addr {
                let len = self.chr_mem.len();
                self.chr_mem[addr as usize % len] = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(prg_kib: usize, chr_is_ram: bool) -> Cartridge {
        Cartridge {
            prg_rom: (0..prg_kib * 1024).map(|i| (i & 0xFF) as u8).collect(),
            chr_rom: vec![0u8; 8 * 1024],
            chr_is_ram,
            prg_ram: vec![0u8; 8 * 1024],
            mapper_number: 0,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
        }
    }

    #[test]
    fn sixteen_kib_mirrors_into_upper_window() {
        let mut m = Mapper0::new(cart(16, false));
        assert_eq!(m.cpu_read(0x8000), m.cpu_read(0xC000));
        assert_eq!(m.cpu_read(0xBFFF), m.cpu_read(0xFFFF));
    }

    #[test]
    fn thirty_two_kib_is_not_mirrored() {
        let mut m = Mapper0::new(cart(32, false));
        assert_ne!(m.cpu_read(0x8000), m.cpu_read(0xC000));
    }

    #[test]
    fn chr_rom_ignores_writes() {
        let mut m = Mapper0::new(cart(16, false));
        let before = m.ppu_read(0x0000);
        m.ppu_write(0x0000, !before);
        assert_eq!(m.ppu_read(0x0000), before);
    }

    #[test]
    fn chr_ram_accepts_writes() {
        let mut m = Mapper0::new(cart(16, true));
        m.ppu_write(0x0000, 0x42);
        assert_eq!(m.ppu_read(0x0000), 0x42);
    }
}
