//! PPU unit tests, covering the register file, memory routing, NMI timing,
//! and the per-dot pixel pipeline against the new mapper-backed PPU.

use super::*;
use crate::cartridge::{build_mapper, Cartridge, MapperHandle, Mirroring};
use std::cell::RefCell;
use std::rc::Rc;

const PPUCTRL: u16 = 0x2000;
const PPUMASK: u16 = 0x2001;
const PPUSTATUS: u16 = 0x2002;
const OAMADDR: u16 = 0x2003;
const OAMDATA: u16 = 0x2004;
const PPUSCROLL: u16 = 0x2005;
const PPUADDR: u16 = 0x2006;
const PPUDATA: u16 = 0x2007;

fn nrom_mapper(mirroring: Mirroring) -> MapperHandle {
    let cart = Cartridge {
        prg_rom: vec![0u8; 32 * 1024],
        chr_rom: vec![0u8; 8 * 1024],
        chr_is_ram: true,
        prg_ram: vec![0u8; 8 * 1024],
        mapper_number: 0,
        mirroring,
        has_battery: false,
    };
    Rc::new(RefCell::new(build_mapper(cart).unwrap()))
}

fn wired_ppu(mirroring: Mirroring) -> Ppu {
    let mut ppu = Ppu::new();
    ppu.set_mapper(nrom_mapper(mirroring));
    ppu
}

mod pixel_pipeline;
mod registers;
