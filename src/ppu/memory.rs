// PPU address-space routing, $0000-$3FFF: pattern tables through the
// mapper, nametables through CIRAM (or a mapper's ExRAM/fill source for
// MMC5), and the 32-byte palette with its mirroring quirks.

use super::constants::NAMETABLE_PAGE_SIZE;
use super::Ppu;
use crate::cartridge::NametableSource;

fn mirror_palette_addr(addr: u16) -> usize {
    let mut a = (addr & 0x1F) as usize;
    // $3F10/$14/$18/$1C are mirrors of $3F00/$04/$08/$0C (sprite backdrop
    // aliases the background one).
    if a >= 0x10 && a % 4 == 0 {
        a -= 0x10;
    }
    a
}

/// Resolve a nametable-space address ($2000-$2FFF, pre-mirror-mask) into the
/// mapper's logical slot (0..3) and the 1 KiB offset within it.
fn nametable_slot(addr: u16) -> (u8, u16) {
    let offset = addr & 0x0FFF;
    ((offset / NAMETABLE_PAGE_SIZE as u16) as u8, offset % NAMETABLE_PAGE_SIZE as u16)
}

pub(super) fn read_ppu_memory(ppu: &mut Ppu, addr: u16) -> u8 {
    let addr = addr & 0x3FFF;
    match addr {
        0x0000..=0x1FFF => {
            notify_chr_access(ppu, addr);
            match &ppu.mapper {
                Some(mapper) => mapper.borrow_mut().ppu_read(addr),
                None => 0,
            }
        }
        0x2000..=0x3EFF => {
            let (slot, offset) = nametable_slot(addr);
            let source = match &ppu.mapper {
                Some(mapper) => mapper.borrow().nametable_source(slot),
                None => NametableSource::Ciram(if slot < 2 { 0 } else { 1 }),
            };
            match source {
                NametableSource::Ciram(page) => {
                    ppu.ciram[page as usize * NAMETABLE_PAGE_SIZE + offset as usize]
                }
                other => match &ppu.mapper {
                    Some(mapper) => mapper.borrow_mut().nametable_aux_read(other, offset),
                    None => 0,
                },
            }
        }
        0x3F00..=0x3FFF => ppu.palette_ram[mirror_palette_addr(addr)],
        _ => 0,
    }
}

pub(super) fn write_ppu_memory(ppu: &mut Ppu, addr: u16, value: u8) {
    let addr = addr & 0x3FFF;
    match addr {
        0x0000..=0x1FFF => {
            notify_chr_access(ppu, addr);
            if let Some(mapper) = &ppu.mapper {
                mapper.borrow_mut().ppu_write(addr, value);
            }
        }
        0x2000..=0x3EFF => {
            let (slot, offset) = nametable_slot(addr);
            let source = match &ppu.mapper {
                Some(mapper) => mapper.borrow().nametable_source(slot),
                None => NametableSource::Ciram(if slot < 2 { 0 } else { 1 }),
            };
            match source {
                NametableSource::Ciram(page) => {
                    ppu.ciram[page as usize * NAMETABLE_PAGE_SIZE + offset as usize] = value;
                }
                other => {
                    if let Some(mapper) = &ppu.mapper {
                        mapper.borrow_mut().nametable_aux_write(other, offset, value);
                    }
                }
            }
        }
        0x3F00..=0x3FFF => {
            ppu.palette_ram[mirror_palette_addr(addr)] = value & 0x3F;
        }
        _ => {}
    }
}

/// Convert elapsed PPU dots since the last CHR access into an approximate
/// M2-cycle count and forward it to the mapper's A12 tracker. The PPU runs
/// in per-dot granularity while MMC3's filter is specified in CPU cycles, so
/// this is a deliberate approximation rather than a cycle-for-cycle replay.
fn notify_chr_access(ppu: &mut Ppu, addr: u16) {
    let (num, den) = ppu.region().dot_ratio();
    let dots = std::mem::take(&mut ppu.dots_since_chr_access);
    let m2_cycles = (dots * den) / num.max(1);
    if let Some(mapper) = &ppu.mapper {
        mapper.borrow_mut().notify_ppu_addr(addr, m2_cycles);
    }
}
