// PPU - cycle-accurate background/sprite pixel pipeline and the CPU-visible
// register file ($2000-$2007, mirrored through $3FFF).
//
// `clock()` advances exactly one PPU dot and is the unit the scheduler
// catches the PPU up by; everything else (registers, memory routing, the
// fetch/shift/composite pipeline) hangs off that single entry point.

mod constants;
mod memory;
mod pipeline;
mod registers;

#[cfg(test)]
mod tests;

pub use constants::{Region, SCREEN_HEIGHT, SCREEN_WIDTH};

use constants::*;

use crate::bus::MemoryMappedDevice;
use crate::cartridge::{MapperHandle, Mirroring};

/// Snapshot of PPU state for save/restore (§6.3). Framebuffer contents are
/// not part of the snapshot; the next clocked frame repaints it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PpuState {
    pub region: Region,
    pub scanline: u16,
    pub dot: u16,
    pub odd_frame: bool,
    pub frame: u64,
    pub ctrl: u8,
    pub mask: u8,
    pub status: u8,
    pub oam_addr: u8,
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub write_toggle: bool,
    pub read_buffer: u8,
    pub ciram: Vec<u8>,
    pub palette_ram: Vec<u8>,
    pub oam: Vec<u8>,
    pub nmi_delay: u8,
    pub nmi_line: bool,
    pub dots_since_chr_access: u32,
}

pub struct Ppu {
    region: Region,
    scanline: u16,
    dot: u16,
    odd_frame: bool,
    frame: u64,
    frame_complete: bool,

    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    v: u16,
    t: u16,
    fine_x: u8,
    write_toggle: bool,
    read_buffer: u8,

    ciram: [u8; NAMETABLE_PAGE_SIZE * CIRAM_PAGES],
    palette_ram: [u8; PALETTE_SIZE],
    oam: [u8; 256],
    mirroring: Mirroring,
    mapper: Option<MapperHandle>,

    pub(super) bg_nt_byte: u8,
    pub(super) bg_at_byte: u8,
    pub(super) bg_pattern_lo_latch: u8,
    pub(super) bg_pattern_hi_latch: u8,
    pub(super) bg_pattern_shift_lo: u16,
    pub(super) bg_pattern_shift_hi: u16,
    pub(super) bg_attr_shift_lo: u16,
    pub(super) bg_attr_shift_hi: u16,

    pub(super) secondary_oam: [u8; 32],
    pub(super) sprite_count: u8,
    pub(super) sprite_pattern_shift_lo: [u8; 8],
    pub(super) sprite_pattern_shift_hi: [u8; 8],
    pub(super) sprite_attr: [u8; 8],
    pub(super) sprite_x: [u8; 8],
    pub(super) sprite0_in_range_next: bool,
    pub(super) sprite0_in_range_current: bool,

    nmi_delay: u8,
    nmi_line: bool,
    /// Set by a `$2002` read that lands while `nmi_delay` is still counting
    /// down; the race means that vblank's NMI is dropped for this frame
    /// (§5's "reading status right on the edge can eat the interrupt").
    suppress_nmi: bool,

    dots_since_chr_access: u32,

    frame_buffer: Box<[u8; SCREEN_WIDTH * SCREEN_HEIGHT]>,
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            region: Region::Ntsc,
            scanline: 0,
            dot: 0,
            odd_frame: false,
            frame: 0,
            frame_complete: false,

            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            v: 0,
            t: 0,
            fine_x: 0,
            write_toggle: false,
            read_buffer: 0,

            ciram: [0u8; NAMETABLE_PAGE_SIZE * CIRAM_PAGES],
            palette_ram: [0u8; PALETTE_SIZE],
            oam: [0u8; 256],
            mirroring: Mirroring::Horizontal,
            mapper: None,

            bg_nt_byte: 0,
            bg_at_byte: 0,
            bg_pattern_lo_latch: 0,
            bg_pattern_hi_latch: 0,
            bg_pattern_shift_lo: 0,
            bg_pattern_shift_hi: 0,
            bg_attr_shift_lo: 0,
            bg_attr_shift_hi: 0,

            secondary_oam: [0xFFu8; 32],
            sprite_count: 0,
            sprite_pattern_shift_lo: [0; 8],
            sprite_pattern_shift_hi: [0; 8],
            sprite_attr: [0; 8],
            sprite_x: [0; 8],
            sprite0_in_range_next: false,
            sprite0_in_range_current: false,

            nmi_delay: 0,
            nmi_line: false,
            suppress_nmi: false,

            dots_since_chr_access: 0,

            frame_buffer: Box::new([0u8; SCREEN_WIDTH * SCREEN_HEIGHT]),
        }
    }

    pub fn reset(&mut self) {
        self.scanline = 0;
        self.dot = 0;
        self.odd_frame = false;
        self.ctrl = 0;
        self.mask = 0;
        self.oam_addr = 0;
        self.v = 0;
        self.t = 0;
        self.fine_x = 0;
        self.write_toggle = false;
        self.read_buffer = 0;
        self.nmi_delay = 0;
        self.nmi_line = false;
        self.dots_since_chr_access = 0;
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn set_mapper(&mut self, mapper: MapperHandle) {
        self.mirroring = mapper.borrow().mirroring();
        self.mapper = Some(mapper);
    }

    pub fn write_oam(&mut self, addr: u8, value: u8) {
        self.oam[addr as usize] = value;
    }

    pub fn read_oam(&self, addr: u8) -> u8 {
        self.oam[addr as usize]
    }

    pub fn oam_dma_write(&mut self, value: u8) {
        self.oam[self.oam_addr as usize] = value;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    pub fn frame(&self) -> &[u8; SCREEN_WIDTH * SCREEN_HEIGHT] {
        &self.frame_buffer
    }

    pub fn frame_complete(&mut self) -> bool {
        let complete = self.frame_complete;
        self.frame_complete = false;
        complete
    }

    /// True exactly once per frame, on the dot the CPU's edge-triggered NMI
    /// line should latch. The bus/scheduler is expected to call this once
    /// per `clock()` and raise `Cpu::trigger_nmi()` on a rising edge.
    pub fn nmi_line(&self) -> bool {
        self.nmi_line
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn export_state(&self) -> PpuState {
        PpuState {
            region: self.region,
            scanline: self.scanline,
            dot: self.dot,
            odd_frame: self.odd_frame,
            frame: self.frame,
            ctrl: self.ctrl,
            mask: self.mask,
            status: self.status,
            oam_addr: self.oam_addr,
            v: self.v,
            t: self.t,
            fine_x: self.fine_x,
            write_toggle: self.write_toggle,
            read_buffer: self.read_buffer,
            ciram: self.ciram.to_vec(),
            palette_ram: self.palette_ram.to_vec(),
            oam: self.oam.to_vec(),
            nmi_delay: self.nmi_delay,
            nmi_line: self.nmi_line,
            dots_since_chr_access: self.dots_since_chr_access,
        }
    }

    pub fn import_state(&mut self, state: &PpuState) {
        self.region = state.region;
        self.scanline = state.scanline;
        self.dot = state.dot;
        self.odd_frame = state.odd_frame;
        self.frame = state.frame;
        self.ctrl = state.ctrl;
        self.mask = state.mask;
        self.status = state.status;
        self.oam_addr = state.oam_addr;
        self.v = state.v;
        self.t = state.t;
        self.fine_x = state.fine_x;
        self.write_toggle = state.write_toggle;
        self.read_buffer = state.read_buffer;
        self.ciram.copy_from_slice(&state.ciram);
        self.palette_ram.copy_from_slice(&state.palette_ram);
        self.oam.copy_from_slice(&state.oam);
        self.nmi_delay = state.nmi_delay;
        self.nmi_line = state.nmi_line;
        self.dots_since_chr_access = state.dots_since_chr_access;
    }

    fn rendering_enabled(&self) -> bool {
        self.mask & 0x18 != 0
    }

    fn sprite_height(&self) -> u16 {
        if self.ctrl & 0x20 != 0 {
            16
        } else {
            8
        }
    }

    /// Advance exactly one PPU dot: the per-dot pipeline (step 1), NMI-delay
    /// countdown (step 9), and scanline/frame wraparound with the NTSC odd-
    /// frame dot skip (step 10-11).
    pub fn clock(&mut self) {
        self.tick_nmi_delay();

        let prerender = self.region.prerender_scanline();
        if self.scanline <= LAST_VISIBLE_SCANLINE {
            self.clock_visible_scanline();
        } else if self.scanline == POSTRENDER_SCANLINE {
            // idle
        } else if self.scanline == FIRST_VBLANK_SCANLINE && self.dot == 1 {
            self.enter_vblank();
        } else if self.scanline == prerender {
            self.clock_prerender_scanline();
        }

        self.dots_since_chr_access += 1;

        self.dot += 1;
        if self.scanline == prerender
            && self.odd_frame
            && self.region.has_odd_frame_skip()
            && self.rendering_enabled()
            && self.dot == DOTS_PER_SCANLINE - 1
        {
            // Skip the last dot of the pre-render line on odd frames.
            self.dot = 0;
            self.scanline = 0;
            self.tick_mapper_scanline();
            self.start_frame();
            return;
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            self.tick_mapper_scanline();
            if self.scanline > prerender {
                self.scanline = 0;
                self.start_frame();
            }
        }
    }

    /// Drives MMC5-style scanline-counting mapper IRQs once per scanline
    /// advance, independent of MMC3's PPU-A12-edge filter.
    fn tick_mapper_scanline(&mut self) {
        if let Some(mapper) = &self.mapper {
            mapper.borrow_mut().scanline_tick();
        }
    }

    fn start_frame(&mut self) {
        self.frame += 1;
        self.odd_frame = !self.odd_frame;
        self.frame_complete = true;
    }

    fn enter_vblank(&mut self) {
        self.status |= 0x80;
        if self.ctrl & 0x80 != 0 {
            self.nmi_delay = self.region.nmi_delay_dots();
        }
    }

    fn tick_nmi_delay(&mut self) {
        if self.nmi_delay > 0 {
            self.nmi_delay -= 1;
            if self.nmi_delay == 0 {
                if self.suppress_nmi {
                    self.suppress_nmi = false;
                } else {
                    self.nmi_line = (self.ctrl & 0x80 != 0) && (self.status & 0x80 != 0);
                }
            }
        }
    }

    /// Called from `$2002` reads (registers.rs) when the read landed while
    /// the post-vblank NMI delay was still counting down.
    pub(super) fn note_status_read_race(&mut self) {
        if self.nmi_delay > 0 {
            self.suppress_nmi = true;
        }
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMappedDevice for Ppu {
    fn read(&mut self, addr: u16) -> u8 {
        self.read_register(addr & PPU_REGISTER_MASK)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write_register(addr & PPU_REGISTER_MASK, value);
    }
}
